//! Bulk label generation guard and label content derivation.
//!
//! Label rendering itself (PDF layout, printing) is a downstream
//! collaborator; the engine produces the content records and bounds the
//! batch size so a "generate all" request cannot swamp the renderer.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Fixed ceiling for a single bulk label request. Requests exceeding the
/// cap are rejected before any work begins.
pub const MAX_LABEL_BATCH: usize = 2000;

/// Reject oversized label batches up front.
pub fn validate_batch_size(requested: usize) -> Result<(), CoreError> {
    if requested > MAX_LABEL_BATCH {
        return Err(CoreError::TooManyAssets {
            requested,
            limit: MAX_LABEL_BATCH,
        });
    }
    Ok(())
}

/// Printable content for a single asset label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelContent {
    pub asset_tag: String,
    pub serial_number: String,
    pub product_name: String,
}

/// Per-item outcome of a bulk label request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStatus {
    /// Label content was produced.
    Rendered,
    /// No asset with the requested id exists.
    NotFound,
    /// The asset exists but is soft-deleted.
    Deleted,
    /// The batch was cancelled before this item was processed.
    Cancelled,
}

/// Result entry for one asset in a bulk label batch.
#[derive(Debug, Clone, Serialize)]
pub struct LabelResult {
    pub asset_id: DbId,
    pub status: LabelStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelContent>,
}
