//! Software installation entity and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use stockroom_core::licensing::SoftwareType;
use stockroom_core::types::{DbId, Timestamp};
use validator::Validate;

/// A software product installed on an asset, optionally consuming a
/// seat from a license pool.
///
/// `software_type` is derived from the software product at every write,
/// never trusted from caller input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoftwareInstallation {
    pub id: DbId,
    pub asset_id: DbId,
    pub software_product_id: DbId,
    pub software_type: SoftwareType,
    pub license_id: Option<DbId>,
    pub installation_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a new installation on an asset.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInstallation {
    pub software_product_id: DbId,
    pub license_id: Option<DbId>,
    pub installation_date: Option<NaiveDate>,
    #[validate(length(max = 1024))]
    pub notes: Option<String>,
}

/// DTO for updating an installation.
///
/// `None` means "leave unchanged"; an explicit JSON `null` on
/// `license_id`, `installation_date`, or `notes` clears the field
/// (clearing `license_id` releases the held seat).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInstallation {
    pub software_product_id: Option<DbId>,
    #[serde(default, deserialize_with = "double_option")]
    pub license_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub installation_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
