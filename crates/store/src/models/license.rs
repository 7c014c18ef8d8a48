//! License pool entity and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use stockroom_core::licensing::LicenseType;
use stockroom_core::types::{DbId, Timestamp};
use validator::Validate;

/// A finite-capacity grant of licenses for one software product.
///
/// The allocated count is never stored on the record; it is derived
/// from the ledger's active seat set under the pool lock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LicensePool {
    pub id: DbId,
    pub software_product_id: DbId,
    pub license_name: String,
    pub license_type: LicenseType,
    pub total_licenses: u32,
    pub expiration_date: Option<NaiveDate>,
    pub created_at: Timestamp,
}

/// DTO for creating a license pool.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLicensePool {
    pub software_product_id: DbId,
    #[validate(length(min = 1, max = 128))]
    pub license_name: String,
    pub license_type: LicenseType,
    #[validate(range(min = 1))]
    pub total_licenses: u32,
    pub expiration_date: Option<NaiveDate>,
}

/// Pool record plus derived availability, for listings and UI display.
#[derive(Debug, Clone, Serialize)]
pub struct LicensePoolView {
    #[serde(flatten)]
    pub pool: LicensePool,
    pub allocated_count: u32,
    pub available_licenses: u32,
}

/// Query parameters for listing license pools.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LicensePoolParams {
    pub product_id: Option<DbId>,
}
