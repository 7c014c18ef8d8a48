//! License pool and software typing rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Commercial shape of a license pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseType {
    PerUser,
    PerDevice,
    Concurrent,
    Site,
    Volume,
}

/// Kind of software a product provides.
///
/// Always derived from the software product's catalog record at write
/// time, never trusted from caller input, so an installation's recorded
/// type cannot drift from the product's declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoftwareType {
    OperatingSystem,
    Application,
    Utility,
    Driver,
}

/// Installation date must not fall after the pool's expiration date.
///
/// Only enforced when both dates are present; an undated installation or
/// a perpetual pool always passes.
pub fn check_installation_date(
    installation_date: Option<NaiveDate>,
    expiration_date: Option<NaiveDate>,
) -> Result<(), CoreError> {
    if let (Some(installed), Some(expires)) = (installation_date, expiration_date) {
        if installed > expires {
            return Err(CoreError::DateAfterExpiration { installed, expires });
        }
    }
    Ok(())
}
