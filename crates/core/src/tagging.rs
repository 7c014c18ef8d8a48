//! Asset tag derivation.
//!
//! Tags are generated at creation from the product name plus a
//! per-product sequence and are immutable and immortal: a tag issued
//! once is never reissued, even after the asset is soft-deleted or
//! purged. The store owns the sequence counters and the issued-tag
//! registry; this module owns the deterministic derivation.

/// Maximum length of the product-derived tag prefix.
const MAX_PREFIX_LEN: usize = 8;

/// Fallback prefix for product names with no usable characters.
const FALLBACK_PREFIX: &str = "ASSET";

/// Derive the tag prefix from a product name.
///
/// Takes the first word of the name, keeps only alphanumeric characters,
/// uppercases them, and truncates to eight characters.
///
/// # Examples
///
/// ```
/// use stockroom_core::tagging::tag_prefix;
///
/// assert_eq!(tag_prefix("MacBook Pro 16"), "MACBOOK");
/// assert_eq!(tag_prefix("ThinkPad X1 Carbon"), "THINKPAD");
/// assert_eq!(tag_prefix("8GB DDR5 Module"), "8GB");
/// assert_eq!(tag_prefix("---"), "ASSET");
/// ```
pub fn tag_prefix(product_name: &str) -> String {
    let prefix: String = product_name
        .split_whitespace()
        .next()
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(MAX_PREFIX_LEN)
        .collect::<String>()
        .to_ascii_uppercase();

    if prefix.is_empty() {
        FALLBACK_PREFIX.to_string()
    } else {
        prefix
    }
}

/// Build an asset tag from a product name and a per-product sequence
/// number.
///
/// Convention: `{PREFIX}-{NNNNNN}` with the sequence zero-padded to six
/// digits. Sequences above 999999 widen naturally rather than wrapping.
pub fn asset_tag(product_name: &str, sequence: u32) -> String {
    format!("{}-{:06}", tag_prefix(product_name), sequence)
}
