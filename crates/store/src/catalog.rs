//! Catalog store: products, vendors, locations, users.
//!
//! Read-mostly reference data consulted by every mutation path.
//! Thread-safe via interior `RwLock`; designed to be shared behind the
//! engine's `Arc`. Lookups never block the allocation path: a reference
//! that fails to resolve is a normal validation failure, not a system
//! error.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use tokio::sync::RwLock;
use validator::Validate;

use stockroom_core::error::CoreError;
use stockroom_core::licensing::SoftwareType;
use stockroom_core::types::DbId;

use crate::models::catalog::{
    CreateLocation, CreateProduct, CreateUser, CreateVendor, Location, Product, ProductCategory,
    User, Vendor,
};

/// Holds all catalog reference entities.
pub struct CatalogStore {
    products: RwLock<HashMap<DbId, Product>>,
    vendors: RwLock<HashMap<DbId, Vendor>>,
    locations: RwLock<HashMap<DbId, Location>>,
    users: RwLock<HashMap<DbId, User>>,
    next_id: AtomicI64,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            products: RwLock::new(HashMap::new()),
            vendors: RwLock::new(HashMap::new()),
            locations: RwLock::new(HashMap::new()),
            users: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn alloc_id(&self) -> DbId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    // ── Products ──────────────────────────────────────────────────────

    /// Register a product. Software products must declare a
    /// `software_type`; other categories must not.
    pub async fn create_product(&self, input: &CreateProduct) -> Result<Product, CoreError> {
        input
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        match (input.category, input.software_type) {
            (ProductCategory::Software, None) => {
                return Err(CoreError::Validation(
                    "Software products must declare a software_type".to_string(),
                ))
            }
            (ProductCategory::Software, Some(_)) => {}
            (_, Some(_)) => {
                return Err(CoreError::Validation(
                    "software_type is only valid on software products".to_string(),
                ))
            }
            (_, None) => {}
        }

        let product = Product {
            id: self.alloc_id(),
            name: input.name.clone(),
            category: input.category,
            software_type: input.software_type,
            created_at: chrono::Utc::now(),
        };
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(product)
    }

    pub async fn find_product(&self, id: DbId) -> Option<Product> {
        self.products.read().await.get(&id).cloned()
    }

    pub async fn list_products(&self) -> Vec<Product> {
        let mut products: Vec<_> = self.products.read().await.values().cloned().collect();
        products.sort_by_key(|p| p.id);
        products
    }

    /// Resolve a product that must be a software product, returning the
    /// product together with its declared software type.
    pub async fn software_product(&self, id: DbId) -> Result<(Product, SoftwareType), CoreError> {
        let product = self.find_product(id).await.ok_or_else(|| {
            CoreError::Validation(format!("Unknown software product: {id}"))
        })?;
        match product.software_type {
            Some(software_type) if product.category == ProductCategory::Software => {
                Ok((product, software_type))
            }
            _ => Err(CoreError::Validation(format!(
                "Product {id} is not a software product"
            ))),
        }
    }

    // ── Vendors ───────────────────────────────────────────────────────

    pub async fn create_vendor(&self, input: &CreateVendor) -> Result<Vendor, CoreError> {
        input
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        let vendor = Vendor {
            id: self.alloc_id(),
            name: input.name.clone(),
            created_at: chrono::Utc::now(),
        };
        self.vendors.write().await.insert(vendor.id, vendor.clone());
        Ok(vendor)
    }

    pub async fn find_vendor(&self, id: DbId) -> Option<Vendor> {
        self.vendors.read().await.get(&id).cloned()
    }

    pub async fn list_vendors(&self) -> Vec<Vendor> {
        let mut vendors: Vec<_> = self.vendors.read().await.values().cloned().collect();
        vendors.sort_by_key(|v| v.id);
        vendors
    }

    // ── Locations ─────────────────────────────────────────────────────

    pub async fn create_location(&self, input: &CreateLocation) -> Result<Location, CoreError> {
        input
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        let location = Location {
            id: self.alloc_id(),
            name: input.name.clone(),
            created_at: chrono::Utc::now(),
        };
        self.locations
            .write()
            .await
            .insert(location.id, location.clone());
        Ok(location)
    }

    pub async fn find_location(&self, id: DbId) -> Option<Location> {
        self.locations.read().await.get(&id).cloned()
    }

    pub async fn list_locations(&self) -> Vec<Location> {
        let mut locations: Vec<_> = self.locations.read().await.values().cloned().collect();
        locations.sort_by_key(|l| l.id);
        locations
    }

    // ── Users ─────────────────────────────────────────────────────────

    /// Register a user; a declared home location must resolve.
    pub async fn create_user(&self, input: &CreateUser) -> Result<User, CoreError> {
        input
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        if let Some(location_id) = input.location_id {
            if self.find_location(location_id).await.is_none() {
                return Err(CoreError::Validation(format!(
                    "Unknown location: {location_id}"
                )));
            }
        }
        let user = User {
            id: self.alloc_id(),
            name: input.name.clone(),
            email: input.email.clone(),
            location_id: input.location_id,
            created_at: chrono::Utc::now(),
        };
        self.users.write().await.insert(user.id, user.clone());
        Ok(user)
    }

    pub async fn find_user(&self, id: DbId) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }

    pub async fn list_users(&self) -> Vec<User> {
        let mut users: Vec<_> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        users
    }

    /// Entity counts for the health endpoint.
    pub async fn counts(&self) -> (usize, usize, usize, usize) {
        (
            self.products.read().await.len(),
            self.vendors.read().await.len(),
            self.locations.read().await.len(),
            self.users.read().await.len(),
        )
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}
