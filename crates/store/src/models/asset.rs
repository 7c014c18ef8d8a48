//! Asset entity and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use stockroom_core::hierarchy::{AssetType, ConditionStatus, Importance};
use stockroom_core::status::AssetStatus;
use stockroom_core::types::{DbId, Timestamp};
use validator::Validate;

// ---------------------------------------------------------------------------
// Entity struct
// ---------------------------------------------------------------------------

/// A physical or virtual asset.
///
/// `asset_tag` is derived at creation and immutable; `parent_asset_id`
/// is only ever set on component assets and must reference a live
/// standalone asset; `assigned_to` is always null on components.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub asset_tag: String,
    pub serial_number: String,
    pub product_id: DbId,
    pub asset_type: AssetType,
    pub parent_asset_id: Option<DbId>,
    pub assigned_to: Option<DbId>,
    pub location_id: Option<DbId>,
    pub status: AssetStatus,
    pub importance: Importance,
    pub condition_status: ConditionStatus,
    pub warranty_start_date: Option<NaiveDate>,
    pub warranty_end_date: Option<NaiveDate>,
    pub eol_date: Option<NaiveDate>,
    pub eos_date: Option<NaiveDate>,
    pub vendor_id: Option<DbId>,
    pub invoice_number: Option<String>,
    pub purchase_cost: Option<f64>,
    pub purchase_date: Option<NaiveDate>,
    /// Only meaningful on component assets installed under a parent.
    pub installation_notes: Option<String>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Asset {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for creating a new asset.
///
/// `asset_tag` is never supplied: it is generated from the product name
/// and a per-product sequence. Status defaults to `available`; supplying
/// `assigned_to` makes creation behave like create-then-assign and
/// restricts `status` to `assigned`/`in_use`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAsset {
    #[validate(length(min = 1, max = 128))]
    pub serial_number: String,
    pub product_id: DbId,
    pub asset_type: AssetType,
    pub parent_asset_id: Option<DbId>,
    pub assigned_to: Option<DbId>,
    pub location_id: Option<DbId>,
    pub status: Option<AssetStatus>,
    pub importance: Option<Importance>,
    pub condition_status: Option<ConditionStatus>,
    pub warranty_start_date: Option<NaiveDate>,
    pub warranty_end_date: Option<NaiveDate>,
    pub eol_date: Option<NaiveDate>,
    pub eos_date: Option<NaiveDate>,
    pub vendor_id: Option<DbId>,
    #[validate(length(max = 64))]
    pub invoice_number: Option<String>,
    pub purchase_cost: Option<f64>,
    pub purchase_date: Option<NaiveDate>,
    pub installation_notes: Option<String>,
}

/// DTO for updating an existing asset.
///
/// `None` means "leave unchanged". For the nullable fields where
/// clearing is a real operation (`parent_asset_id`, `location_id`,
/// `installation_notes`), a double `Option` distinguishes an absent key
/// (unchanged) from an explicit JSON `null` (clear). `product_id` is
/// immutable and deliberately absent.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAsset {
    #[validate(length(min = 1, max = 128))]
    pub serial_number: Option<String>,
    pub asset_type: Option<AssetType>,
    #[serde(default, deserialize_with = "double_option")]
    pub parent_asset_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub location_id: Option<Option<DbId>>,
    pub status: Option<AssetStatus>,
    pub importance: Option<Importance>,
    pub condition_status: Option<ConditionStatus>,
    pub warranty_start_date: Option<NaiveDate>,
    pub warranty_end_date: Option<NaiveDate>,
    pub eol_date: Option<NaiveDate>,
    pub eos_date: Option<NaiveDate>,
    pub vendor_id: Option<DbId>,
    #[validate(length(max = 64))]
    pub invoice_number: Option<String>,
    pub purchase_cost: Option<f64>,
    pub purchase_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    pub installation_notes: Option<Option<String>>,
}

/// DTO for assigning an asset to a user.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignAsset {
    pub user_id: DbId,
    /// Caller-chosen active status; must be `assigned` or `in_use`.
    /// Defaults to `assigned`.
    pub status: Option<AssetStatus>,
    /// Explicit location override; when absent the user's location is
    /// inherited.
    pub location_id: Option<DbId>,
}

/// Query parameters for listing/searching assets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetSearchParams {
    pub status: Option<AssetStatus>,
    pub asset_type: Option<AssetType>,
    pub product_id: Option<DbId>,
    pub assigned_to: Option<DbId>,
    pub parent_asset_id: Option<DbId>,
    /// Soft-deleted assets are excluded from default listings.
    #[serde(default)]
    pub include_deleted: bool,
    /// Maximum results (default 50, max 500).
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Deserialize a doubly-optional field: absent key -> `None`, explicit
/// `null` -> `Some(None)`, value -> `Some(Some(v))`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
