//! Catalog reference entities: products, vendors, locations, users.
//!
//! Read-mostly data consumed by every other store. Records are
//! immutable per version; there is no delete, so references from assets
//! and installations stay resolvable.

use serde::{Deserialize, Serialize};
use stockroom_core::licensing::SoftwareType;
use stockroom_core::types::{DbId, Timestamp};
use validator::Validate;

// ---------------------------------------------------------------------------
// Entity structs
// ---------------------------------------------------------------------------

/// Top-level classification of a catalog product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Hardware,
    Software,
    Accessory,
}

/// A catalog product. `software_type` is present exactly when
/// `category = software` and is the source every installation derives
/// its own `software_type` from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: DbId,
    pub name: String,
    pub category: ProductCategory,
    pub software_type: Option<SoftwareType>,
    pub created_at: Timestamp,
}

/// A hardware or software vendor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vendor {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

/// A physical location assets and users can be placed at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

/// A user assets can be assigned to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub location_id: Option<DbId>,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for registering a new product.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    pub category: ProductCategory,
    /// Required when `category = software`, rejected otherwise.
    pub software_type: Option<SoftwareType>,
}

/// DTO for registering a new vendor.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVendor {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
}

/// DTO for registering a new location.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLocation {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
}

/// DTO for registering a new user.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub location_id: Option<DbId>,
}
