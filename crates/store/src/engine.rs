//! Engine facade composing the catalog, asset store, license ledger, and
//! installation ledger into the domain operations.
//!
//! Locking discipline, observed by every operation:
//!
//! 1. At most one asset entity lock is held at a time; cross-asset
//!    validation (parent eligibility, child scans) runs on snapshots
//!    taken while holding no entity lock, followed by a single commit
//!    under the target asset's lock.
//! 2. Pool locks are acquired one at a time, optionally while holding an
//!    asset lock -- never the reverse.
//! 3. Map guards are never held across an entity-lock acquisition.
//!
//! Bulk operations are not transactional: each item is processed
//! independently and the caller receives a per-item result set.

use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use validator::Validate;

use stockroom_core::error::CoreError;
use stockroom_core::hierarchy::{self, AssetType, ConditionStatus, Importance};
use stockroom_core::labels::{self, LabelContent, LabelResult, LabelStatus};
use stockroom_core::status::{self, AssetStatus};
use stockroom_core::types::{DbId, Timestamp};

use crate::assets::AssetStore;
use crate::catalog::CatalogStore;
use crate::installations::InstallationLedger;
use crate::licenses::LicenseLedger;
use crate::models::asset::{AssignAsset, Asset, AssetSearchParams, CreateAsset, UpdateAsset};
use crate::models::installation::{
    CreateInstallation, SoftwareInstallation, UpdateInstallation,
};
use crate::models::license::{CreateLicensePool, LicensePool, LicensePoolView};

/// Which assets a bulk label request targets.
#[derive(Debug, Clone)]
pub enum LabelSelection {
    /// An explicit list of asset ids.
    Ids(Vec<DbId>),
    /// Every live asset, optionally narrowed to one status.
    All { status: Option<AssetStatus> },
}

/// Outcome of a bulk label request.
#[derive(Debug, Clone, Serialize)]
pub struct LabelBatch {
    pub batch_id: Uuid,
    /// Number of labels actually produced.
    pub rendered: usize,
    /// Whether the batch was cut short by cancellation.
    pub cancelled: bool,
    pub results: Vec<LabelResult>,
}

/// Counts shown by the trash purge preview.
#[derive(Debug, Clone, Serialize)]
pub struct TrashPreview {
    pub asset_count: usize,
    pub installation_count: usize,
    /// License seats still bound to soft-deleted assets.
    pub suspended_seats: usize,
}

/// Entity counts for the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub products: usize,
    pub vendors: usize,
    pub locations: usize,
    pub users: usize,
    pub assets: usize,
    pub trashed_assets: usize,
    pub installations: usize,
    pub license_pools: usize,
}

/// The allocation engine. Shared behind an `Arc` across all handlers
/// and background tasks.
pub struct Engine {
    pub catalog: CatalogStore,
    pub assets: AssetStore,
    pub licenses: LicenseLedger,
    pub installations: InstallationLedger,
}

impl Engine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            catalog: CatalogStore::new(),
            assets: AssetStore::new(),
            licenses: LicenseLedger::new(),
            installations: InstallationLedger::new(),
        })
    }

    // ── Assets ────────────────────────────────────────────────────────

    /// Create an asset, generating its tag from the product name.
    pub async fn create_asset(&self, input: &CreateAsset) -> Result<Asset, CoreError> {
        input.validate().map_err(validation_error)?;

        let product = self
            .catalog
            .find_product(input.product_id)
            .await
            .ok_or_else(|| {
                CoreError::Validation(format!("Unknown product: {}", input.product_id))
            })?;
        if let Some(vendor_id) = input.vendor_id {
            if self.catalog.find_vendor(vendor_id).await.is_none() {
                return Err(CoreError::Validation(format!("Unknown vendor: {vendor_id}")));
            }
        }
        if let Some(location_id) = input.location_id {
            if self.catalog.find_location(location_id).await.is_none() {
                return Err(CoreError::Validation(format!(
                    "Unknown location: {location_id}"
                )));
            }
        }

        hierarchy::ensure_parent_link_allowed(input.asset_type, input.parent_asset_id)?;
        hierarchy::ensure_component_unassigned(input.asset_type, input.assigned_to)?;
        hierarchy::validate_warranty_window(input.warranty_start_date, input.warranty_end_date)?;
        if input.installation_notes.is_some() && input.asset_type != AssetType::Component {
            return Err(CoreError::Validation(
                "installation_notes is only valid on component assets".to_string(),
            ));
        }
        if let Some(parent_id) = input.parent_asset_id {
            let parent = self
                .assets
                .find_by_id_include_deleted(parent_id)
                .await
                .ok_or_else(|| {
                    CoreError::StructuralViolation(format!(
                        "Parent asset {parent_id} does not exist"
                    ))
                })?;
            hierarchy::ensure_parent_eligible(parent_id, parent.asset_type, parent.is_deleted())?;
        }

        // Assignment at creation behaves like create-then-assign.
        let (assigned_to, asset_status, location_id) = match input.assigned_to {
            Some(user_id) => {
                let user = self.catalog.find_user(user_id).await.ok_or_else(|| {
                    CoreError::Validation(format!("Unknown user: {user_id}"))
                })?;
                let asset_status = input.status.unwrap_or(AssetStatus::Assigned);
                if !asset_status.is_active_use() {
                    return Err(CoreError::Validation(format!(
                        "Status {asset_status} is not valid for an assigned asset"
                    )));
                }
                (
                    Some(user_id),
                    asset_status,
                    input.location_id.or(user.location_id),
                )
            }
            None => {
                let asset_status = input.status.unwrap_or_default();
                if asset_status.is_active_use() {
                    return Err(CoreError::Validation(format!(
                        "Status {asset_status} requires an assignment"
                    )));
                }
                (None, asset_status, input.location_id)
            }
        };

        let id = self.assets.alloc_id();
        let asset_tag = self.assets.reserve_tag(product.id, &product.name).await;
        let now = chrono::Utc::now();
        let asset = Asset {
            id,
            asset_tag,
            serial_number: input.serial_number.clone(),
            product_id: product.id,
            asset_type: input.asset_type,
            parent_asset_id: input.parent_asset_id,
            assigned_to,
            location_id,
            status: asset_status,
            importance: input.importance.unwrap_or(Importance::Medium),
            condition_status: input.condition_status.unwrap_or(ConditionStatus::Good),
            warranty_start_date: input.warranty_start_date,
            warranty_end_date: input.warranty_end_date,
            eol_date: input.eol_date,
            eos_date: input.eos_date,
            vendor_id: input.vendor_id,
            invoice_number: input.invoice_number.clone(),
            purchase_cost: input.purchase_cost,
            purchase_date: input.purchase_date,
            installation_notes: input.installation_notes.clone(),
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        self.assets.insert(asset.clone()).await;

        tracing::info!(
            asset_id = asset.id,
            asset_tag = %asset.asset_tag,
            asset_type = %asset.asset_type,
            "Asset created"
        );
        Ok(asset)
    }

    /// Get a live asset. Soft-deleted assets are reported as not found;
    /// they are visible through the trash listing instead.
    pub async fn get_asset(&self, id: DbId) -> Result<Asset, CoreError> {
        self.assets
            .find_by_id(id)
            .await
            .ok_or(CoreError::NotFound { entity: "Asset", id })
    }

    pub async fn list_assets(&self, params: &AssetSearchParams) -> Vec<Asset> {
        self.assets.list(params).await
    }

    /// Apply a patch to an asset.
    ///
    /// Cross-entity checks (parent eligibility, child scan) run on
    /// snapshots; target-local invariants are re-validated under the
    /// asset's lock in the commit step.
    pub async fn update_asset(&self, id: DbId, input: &UpdateAsset) -> Result<Asset, CoreError> {
        input.validate().map_err(validation_error)?;

        let current = self
            .assets
            .find_by_id_include_deleted(id)
            .await
            .ok_or(CoreError::NotFound { entity: "Asset", id })?;
        if current.is_deleted() {
            return Err(CoreError::AlreadyDeleted { entity: "Asset", id });
        }

        let new_type = input.asset_type.unwrap_or(current.asset_type);

        // Resolve the target parent link. Promoting away from component
        // clears the link (structural cleanup, same commit).
        let new_parent = match (new_type, &input.parent_asset_id) {
            (AssetType::Standalone, Some(Some(_))) => {
                return Err(CoreError::StructuralViolation(
                    "Standalone assets cannot reference a parent asset".to_string(),
                ))
            }
            (AssetType::Standalone, _) => None,
            (AssetType::Component, Some(explicit)) => *explicit,
            (AssetType::Component, None) => current.parent_asset_id,
        };

        if new_type == AssetType::Component && current.asset_type == AssetType::Standalone {
            if current.assigned_to.is_some() {
                return Err(CoreError::StructuralViolation(
                    "Cannot change an assigned asset into a component; unassign it first"
                        .to_string(),
                ));
            }
            if self.assets.has_live_children(id).await {
                return Err(CoreError::StructuralViolation(
                    "Cannot change into a component: other assets are installed under this asset"
                        .to_string(),
                ));
            }
        }

        if let Some(parent_id) = new_parent {
            if parent_id == id {
                return Err(CoreError::StructuralViolation(
                    "An asset cannot be its own parent".to_string(),
                ));
            }
            let parent = self
                .assets
                .find_by_id_include_deleted(parent_id)
                .await
                .ok_or_else(|| {
                    CoreError::StructuralViolation(format!(
                        "Parent asset {parent_id} does not exist"
                    ))
                })?;
            hierarchy::ensure_parent_eligible(parent_id, parent.asset_type, parent.is_deleted())?;
        }

        if let Some(vendor_id) = input.vendor_id {
            if self.catalog.find_vendor(vendor_id).await.is_none() {
                return Err(CoreError::Validation(format!("Unknown vendor: {vendor_id}")));
            }
        }
        if let Some(Some(location_id)) = input.location_id {
            if self.catalog.find_location(location_id).await.is_none() {
                return Err(CoreError::Validation(format!(
                    "Unknown location: {location_id}"
                )));
            }
        }

        // Commit under the asset lock, re-validating target-local rules
        // against the actual current state.
        let entry = self
            .assets
            .entry(id)
            .await
            .ok_or(CoreError::NotFound { entity: "Asset", id })?;
        let mut asset = entry.lock().await;
        if asset.is_deleted() {
            return Err(CoreError::AlreadyDeleted { entity: "Asset", id });
        }
        if new_type == AssetType::Component && asset.assigned_to.is_some() {
            return Err(CoreError::StructuralViolation(
                "Cannot change an assigned asset into a component; unassign it first".to_string(),
            ));
        }

        let mut new_status = asset.status;
        if let Some(requested) = input.status {
            status::validate_transition(asset.status, requested)?;
            if requested == AssetStatus::Available && asset.assigned_to.is_some() {
                return Err(CoreError::Validation(
                    "Use unassign to return an assigned asset to available".to_string(),
                ));
            }
            if requested.is_active_use() && asset.assigned_to.is_none() {
                return Err(CoreError::Validation(
                    "Use assign to put an asset into active use".to_string(),
                ));
            }
            new_status = requested;
        }

        let warranty_start = input.warranty_start_date.or(asset.warranty_start_date);
        let warranty_end = input.warranty_end_date.or(asset.warranty_end_date);
        hierarchy::validate_warranty_window(warranty_start, warranty_end)?;

        let new_notes = match &input.installation_notes {
            Some(explicit) => {
                if explicit.is_some() && new_type != AssetType::Component {
                    return Err(CoreError::Validation(
                        "installation_notes is only valid on component assets".to_string(),
                    ));
                }
                explicit.clone()
            }
            // Cleared together with the parent link when the asset stops
            // being a component.
            None if new_type != AssetType::Component => None,
            None => asset.installation_notes.clone(),
        };

        if let Some(serial_number) = &input.serial_number {
            asset.serial_number = serial_number.clone();
        }
        asset.asset_type = new_type;
        asset.parent_asset_id = new_parent;
        if let Some(explicit) = &input.location_id {
            asset.location_id = *explicit;
        }
        asset.status = new_status;
        if new_status.clears_assignment() {
            asset.assigned_to = None;
        }
        if let Some(importance) = input.importance {
            asset.importance = importance;
        }
        if let Some(condition_status) = input.condition_status {
            asset.condition_status = condition_status;
        }
        asset.warranty_start_date = warranty_start;
        asset.warranty_end_date = warranty_end;
        if let Some(eol_date) = input.eol_date {
            asset.eol_date = Some(eol_date);
        }
        if let Some(eos_date) = input.eos_date {
            asset.eos_date = Some(eos_date);
        }
        if let Some(vendor_id) = input.vendor_id {
            asset.vendor_id = Some(vendor_id);
        }
        if let Some(invoice_number) = &input.invoice_number {
            asset.invoice_number = Some(invoice_number.clone());
        }
        if let Some(purchase_cost) = input.purchase_cost {
            asset.purchase_cost = Some(purchase_cost);
        }
        if let Some(purchase_date) = input.purchase_date {
            asset.purchase_date = Some(purchase_date);
        }
        asset.installation_notes = new_notes;
        asset.updated_at = chrono::Utc::now();

        tracing::info!(asset_id = id, status = %asset.status, "Asset updated");
        Ok(asset.clone())
    }

    /// Assign an asset to a user.
    pub async fn assign_asset(&self, id: DbId, input: &AssignAsset) -> Result<Asset, CoreError> {
        let user = self
            .catalog
            .find_user(input.user_id)
            .await
            .ok_or_else(|| CoreError::Validation(format!("Unknown user: {}", input.user_id)))?;
        if let Some(location_id) = input.location_id {
            if self.catalog.find_location(location_id).await.is_none() {
                return Err(CoreError::Validation(format!(
                    "Unknown location: {location_id}"
                )));
            }
        }
        let target_status = input.status.unwrap_or(AssetStatus::Assigned);
        if !target_status.is_active_use() {
            return Err(CoreError::Validation(format!(
                "Assignment status must be assigned or in_use, got {target_status}"
            )));
        }

        let entry = self
            .assets
            .entry(id)
            .await
            .ok_or(CoreError::NotFound { entity: "Asset", id })?;
        let mut asset = entry.lock().await;
        if asset.is_deleted() {
            return Err(CoreError::AlreadyDeleted { entity: "Asset", id });
        }
        hierarchy::ensure_assignable(asset.asset_type)?;
        if let Some(user_id) = asset.assigned_to {
            return Err(CoreError::Conflict(format!(
                "Asset {id} is already assigned to user {user_id}"
            )));
        }
        status::validate_transition(asset.status, target_status)?;

        asset.assigned_to = Some(user.id);
        asset.status = target_status;
        // Location is inherited from the user unless explicitly supplied.
        asset.location_id = input
            .location_id
            .or(user.location_id)
            .or(asset.location_id);
        asset.updated_at = chrono::Utc::now();

        tracing::info!(asset_id = id, user_id = user.id, status = %asset.status, "Asset assigned");
        Ok(asset.clone())
    }

    /// Clear an asset's assignment and return it to `available`.
    /// Unassigning an unassigned asset is a no-op.
    pub async fn unassign_asset(&self, id: DbId) -> Result<Asset, CoreError> {
        let entry = self
            .assets
            .entry(id)
            .await
            .ok_or(CoreError::NotFound { entity: "Asset", id })?;
        let mut asset = entry.lock().await;
        if asset.is_deleted() {
            return Err(CoreError::AlreadyDeleted { entity: "Asset", id });
        }
        if asset.assigned_to.is_none() {
            return Ok(asset.clone());
        }

        asset.assigned_to = None;
        asset.status = AssetStatus::Available;
        if hierarchy::CLEAR_LOCATION_ON_UNASSIGN {
            asset.location_id = None;
        }
        asset.updated_at = chrono::Utc::now();

        tracing::info!(asset_id = id, "Asset unassigned");
        Ok(asset.clone())
    }

    // ── Soft delete / restore / purge ─────────────────────────────────

    /// Soft-delete an asset. Its status is untouched; its license seats
    /// move to the suspended set so they stop counting against capacity
    /// while the pool bindings survive for a later restore.
    pub async fn soft_delete_asset(&self, id: DbId) -> Result<(), CoreError> {
        let entry = self
            .assets
            .entry(id)
            .await
            .ok_or(CoreError::NotFound { entity: "Asset", id })?;
        let mut asset = entry.lock().await;
        if asset.is_deleted() {
            return Err(CoreError::AlreadyDeleted { entity: "Asset", id });
        }
        asset.deleted_at = Some(chrono::Utc::now());

        let mut suspended = 0;
        for installation in self.installations.list_for_asset(id).await {
            if let Some(pool_id) = installation.license_id {
                self.licenses.suspend(pool_id, installation.id).await;
                suspended += 1;
            }
        }

        tracing::info!(asset_id = id, suspended_seats = suspended, "Asset soft-deleted");
        Ok(())
    }

    /// Restore a soft-deleted asset, re-validating the structural and
    /// capacity invariants that may have broken while it sat in the
    /// trash. Seat re-acquisition is all-or-nothing: on a capacity
    /// conflict every already-resumed seat is suspended again and the
    /// asset stays deleted.
    pub async fn restore_asset(&self, id: DbId) -> Result<Asset, CoreError> {
        let current = self
            .assets
            .find_by_id_include_deleted(id)
            .await
            .ok_or(CoreError::NotFound { entity: "Asset", id })?;
        if !current.is_deleted() {
            return Err(CoreError::NotDeleted { entity: "Asset", id });
        }

        // Parent check on a snapshot: the world may have changed while
        // this asset was deleted.
        if let Some(parent_id) = current.parent_asset_id {
            match self.assets.find_by_id_include_deleted(parent_id).await {
                None => {
                    return Err(CoreError::RestoreConflict(format!(
                        "Cannot restore: parent asset {parent_id} no longer exists"
                    )))
                }
                Some(parent) if parent.is_deleted() => {
                    return Err(CoreError::RestoreConflict(format!(
                        "Cannot restore: parent asset {parent_id} is deleted. \
                         Restore the parent first"
                    )))
                }
                Some(parent) if parent.asset_type != AssetType::Standalone => {
                    return Err(CoreError::RestoreConflict(format!(
                        "Cannot restore: parent asset {parent_id} is no longer standalone"
                    )))
                }
                Some(_) => {}
            }
        }

        let entry = self
            .assets
            .entry(id)
            .await
            .ok_or(CoreError::NotFound { entity: "Asset", id })?;
        let mut asset = entry.lock().await;
        if !asset.is_deleted() {
            return Err(CoreError::NotDeleted { entity: "Asset", id });
        }
        hierarchy::ensure_component_unassigned(asset.asset_type, asset.assigned_to)?;

        // Re-acquire every held seat, rolling back on the first conflict.
        let held: Vec<(DbId, DbId)> = self
            .installations
            .list_for_asset(id)
            .await
            .into_iter()
            .filter_map(|i| i.license_id.map(|pool_id| (pool_id, i.id)))
            .collect();
        let mut resumed: Vec<(DbId, DbId)> = Vec::new();
        for (pool_id, installation_id) in &held {
            match self.licenses.resume(*pool_id, *installation_id).await {
                Ok(()) => resumed.push((*pool_id, *installation_id)),
                Err(err) => {
                    for (pool_id, installation_id) in resumed {
                        self.licenses.suspend(pool_id, installation_id).await;
                    }
                    tracing::warn!(asset_id = id, error = %err, "Restore rolled back");
                    return Err(err);
                }
            }
        }

        asset.deleted_at = None;

        tracing::info!(asset_id = id, resumed_seats = held.len(), "Asset restored");
        Ok(asset.clone())
    }

    /// All soft-deleted assets, most recently deleted first.
    pub async fn list_trashed(&self) -> Vec<Asset> {
        self.assets.list_trashed().await
    }

    /// Counts of what a purge-all would remove.
    pub async fn trash_preview(&self) -> TrashPreview {
        let trashed = self.assets.list_trashed().await;
        let mut installation_count = 0;
        for asset in &trashed {
            installation_count += self.installations.list_for_asset(asset.id).await.len();
        }
        TrashPreview {
            asset_count: trashed.len(),
            installation_count,
            suspended_seats: self.licenses.suspended_count().await,
        }
    }

    /// Hard-delete a soft-deleted asset: its installations are removed
    /// and their seats released for good. The asset tag stays reserved.
    pub async fn purge_asset(&self, id: DbId) -> Result<(), CoreError> {
        match self.assets.remove_trashed(id).await {
            Some(_) => {
                let removed = self.installations.remove_for_asset(id).await;
                for installation in &removed {
                    if let Some(pool_id) = installation.license_id {
                        self.licenses.release(pool_id, installation.id).await;
                    }
                }
                tracing::info!(
                    asset_id = id,
                    installations = removed.len(),
                    "Asset purged"
                );
                Ok(())
            }
            None => {
                if self.assets.entry(id).await.is_some() {
                    Err(CoreError::NotDeleted { entity: "Asset", id })
                } else {
                    Err(CoreError::NotFound { entity: "Asset", id })
                }
            }
        }
    }

    /// Hard-delete everything in the trash. Best-effort per item;
    /// returns the number of assets removed.
    pub async fn purge_all(&self) -> u64 {
        let trashed = self.assets.list_trashed().await;
        let mut purged = 0;
        for asset in trashed {
            if self.purge_asset(asset.id).await.is_ok() {
                purged += 1;
            }
        }
        purged
    }

    /// Release the suspended seats of assets deleted before `cutoff`,
    /// clearing the installations' pool bindings for good. Used by the
    /// retention policy hook; returns the number of seats released.
    pub async fn reclaim_suspended(&self, cutoff: Timestamp) -> usize {
        let trashed = self.assets.list_trashed().await;
        let mut released = 0;
        for snapshot in trashed {
            let Some(entry) = self.assets.entry(snapshot.id).await else {
                continue;
            };
            let asset = entry.lock().await;
            // Re-check under the lock: a concurrent restore wins.
            let Some(deleted_at) = asset.deleted_at else {
                continue;
            };
            if deleted_at >= cutoff {
                continue;
            }
            for installation in self.installations.list_for_asset(asset.id).await {
                if let Some(pool_id) = installation.license_id {
                    self.licenses.release(pool_id, installation.id).await;
                    let mut updated = installation;
                    updated.license_id = None;
                    updated.updated_at = chrono::Utc::now();
                    self.installations.replace(updated).await;
                    released += 1;
                }
            }
        }
        if released > 0 {
            tracing::info!(released, "Reclaimed suspended license seats");
        }
        released
    }

    // ── Software installations ────────────────────────────────────────

    /// Record a software installation on an asset.
    ///
    /// Validation order: asset is live, product is a software product,
    /// license rules hold and the seat is acquired -- only then is the
    /// record persisted. An installation with an invalid license
    /// reference is never written.
    pub async fn add_installation(
        &self,
        asset_id: DbId,
        input: &CreateInstallation,
    ) -> Result<SoftwareInstallation, CoreError> {
        input.validate().map_err(validation_error)?;

        let entry = self.assets.entry(asset_id).await.ok_or(CoreError::NotFound {
            entity: "Asset",
            id: asset_id,
        })?;
        // Held across the commit so a concurrent soft delete cannot
        // interleave between the liveness check and the insert.
        let asset = entry.lock().await;
        if asset.is_deleted() {
            return Err(CoreError::AlreadyDeleted {
                entity: "Asset",
                id: asset_id,
            });
        }

        let (product, software_type) = self
            .catalog
            .software_product(input.software_product_id)
            .await?;

        let id = self.installations.alloc_id();
        if let Some(pool_id) = input.license_id {
            self.licenses
                .allocate(pool_id, id, product.id, input.installation_date)
                .await?;
        }

        let now = chrono::Utc::now();
        let installation = SoftwareInstallation {
            id,
            asset_id,
            software_product_id: product.id,
            software_type,
            license_id: input.license_id,
            installation_date: input.installation_date,
            notes: input.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        self.installations.insert(installation.clone()).await;

        tracing::info!(
            installation_id = id,
            asset_id,
            software_product_id = product.id,
            license_id = ?input.license_id,
            "Software installation recorded"
        );
        Ok(installation)
    }

    /// Patch an installation. A pool change acquires the new seat before
    /// releasing the old one, so a failed allocation leaves the held
    /// seat untouched; re-validating the unchanged pool never counts the
    /// installation against its own seat.
    pub async fn update_installation(
        &self,
        id: DbId,
        input: &UpdateInstallation,
    ) -> Result<SoftwareInstallation, CoreError> {
        let current = self
            .installations
            .find_by_id(id)
            .await
            .ok_or(CoreError::NotFound {
                entity: "SoftwareInstallation",
                id,
            })?;
        let entry = self
            .assets
            .entry(current.asset_id)
            .await
            .ok_or(CoreError::NotFound {
                entity: "Asset",
                id: current.asset_id,
            })?;
        let asset = entry.lock().await;
        if asset.is_deleted() {
            return Err(CoreError::AlreadyDeleted {
                entity: "Asset",
                id: current.asset_id,
            });
        }
        // Re-read under the asset lock; a concurrent edit may have won.
        let current = self
            .installations
            .find_by_id(id)
            .await
            .ok_or(CoreError::NotFound {
                entity: "SoftwareInstallation",
                id,
            })?;

        let new_product_id = input
            .software_product_id
            .unwrap_or(current.software_product_id);
        let (product, software_type) = self.catalog.software_product(new_product_id).await?;
        let new_license = match &input.license_id {
            Some(explicit) => *explicit,
            None => current.license_id,
        };
        let new_date = match &input.installation_date {
            Some(explicit) => *explicit,
            None => current.installation_date,
        };
        let new_notes = match &input.notes {
            Some(explicit) => explicit.clone(),
            None => current.notes.clone(),
        };

        match (current.license_id, new_license) {
            (old, Some(new_pool)) => {
                self.licenses
                    .allocate(new_pool, id, product.id, new_date)
                    .await?;
                if let Some(old_pool) = old {
                    if old_pool != new_pool {
                        self.licenses.release(old_pool, id).await;
                    }
                }
            }
            (Some(old_pool), None) => {
                self.licenses.release(old_pool, id).await;
            }
            (None, None) => {}
        }

        let updated = SoftwareInstallation {
            software_product_id: product.id,
            software_type,
            license_id: new_license,
            installation_date: new_date,
            notes: new_notes,
            updated_at: chrono::Utc::now(),
            ..current
        };
        self.installations.replace(updated.clone()).await;

        tracing::info!(installation_id = id, license_id = ?new_license, "Installation updated");
        Ok(updated)
    }

    /// Remove an installation, releasing any held seat.
    pub async fn remove_installation(&self, id: DbId) -> Result<(), CoreError> {
        let current = self
            .installations
            .find_by_id(id)
            .await
            .ok_or(CoreError::NotFound {
                entity: "SoftwareInstallation",
                id,
            })?;
        let entry = self
            .assets
            .entry(current.asset_id)
            .await
            .ok_or(CoreError::NotFound {
                entity: "Asset",
                id: current.asset_id,
            })?;
        let asset = entry.lock().await;
        // Installations of a trashed asset are historical records; they
        // go away through restore-then-remove or purge, not here.
        if asset.is_deleted() {
            return Err(CoreError::AlreadyDeleted {
                entity: "Asset",
                id: current.asset_id,
            });
        }

        if let Some(pool_id) = current.license_id {
            self.licenses.release(pool_id, id).await;
        }
        self.installations.remove(id).await;

        tracing::info!(installation_id = id, asset_id = current.asset_id, "Installation removed");
        Ok(())
    }

    /// All installations recorded for an asset, including those of a
    /// soft-deleted asset (historical view).
    pub async fn list_installations(
        &self,
        asset_id: DbId,
    ) -> Result<Vec<SoftwareInstallation>, CoreError> {
        if self
            .assets
            .find_by_id_include_deleted(asset_id)
            .await
            .is_none()
        {
            return Err(CoreError::NotFound {
                entity: "Asset",
                id: asset_id,
            });
        }
        Ok(self.installations.list_for_asset(asset_id).await)
    }

    // ── License pools ─────────────────────────────────────────────────

    /// Create a license pool for a software product.
    pub async fn create_license_pool(
        &self,
        input: &CreateLicensePool,
    ) -> Result<LicensePool, CoreError> {
        input.validate().map_err(validation_error)?;
        self.catalog
            .software_product(input.software_product_id)
            .await?;
        let pool = self.licenses.create_pool(input).await;
        tracing::info!(
            pool_id = pool.id,
            software_product_id = pool.software_product_id,
            total_licenses = pool.total_licenses,
            "License pool created"
        );
        Ok(pool)
    }

    pub async fn get_license_pool(&self, id: DbId) -> Result<LicensePoolView, CoreError> {
        self.licenses.view(id).await.ok_or(CoreError::NotFound {
            entity: "LicensePool",
            id,
        })
    }

    pub async fn list_license_pools(&self, product_id: Option<DbId>) -> Vec<LicensePoolView> {
        self.licenses.list(product_id).await
    }

    // ── Bulk labels ───────────────────────────────────────────────────

    /// Produce label content for a batch of assets.
    ///
    /// The batch-size guard runs before any work. Items are processed
    /// independently; on cancellation the remaining items are marked
    /// `cancelled` and everything already produced stays in the result.
    pub async fn generate_labels(
        &self,
        selection: LabelSelection,
        cancel: &CancellationToken,
    ) -> Result<LabelBatch, CoreError> {
        let ids = match selection {
            LabelSelection::Ids(ids) => {
                labels::validate_batch_size(ids.len())?;
                ids
            }
            LabelSelection::All { status } => {
                let ids = self.assets.live_ids(status).await;
                labels::validate_batch_size(ids.len())?;
                ids
            }
        };

        let batch_id = Uuid::new_v4();
        let mut results = Vec::with_capacity(ids.len());
        let mut rendered = 0;
        let mut cancelled = false;

        for (index, asset_id) in ids.iter().enumerate() {
            if cancel.is_cancelled() {
                cancelled = true;
                results.extend(ids[index..].iter().map(|&asset_id| LabelResult {
                    asset_id,
                    status: LabelStatus::Cancelled,
                    label: None,
                }));
                break;
            }

            let result = match self.assets.find_by_id_include_deleted(*asset_id).await {
                None => LabelResult {
                    asset_id: *asset_id,
                    status: LabelStatus::NotFound,
                    label: None,
                },
                Some(asset) if asset.is_deleted() => LabelResult {
                    asset_id: *asset_id,
                    status: LabelStatus::Deleted,
                    label: None,
                },
                Some(asset) => {
                    let product_name = self
                        .catalog
                        .find_product(asset.product_id)
                        .await
                        .map(|p| p.name)
                        .unwrap_or_default();
                    rendered += 1;
                    LabelResult {
                        asset_id: *asset_id,
                        status: LabelStatus::Rendered,
                        label: Some(LabelContent {
                            asset_tag: asset.asset_tag,
                            serial_number: asset.serial_number,
                            product_name,
                        }),
                    }
                }
            };
            results.push(result);
        }

        tracing::info!(
            batch_id = %batch_id,
            requested = results.len(),
            rendered,
            cancelled,
            "Label batch processed"
        );
        Ok(LabelBatch {
            batch_id,
            rendered,
            cancelled,
            results,
        })
    }

    // ── Health ────────────────────────────────────────────────────────

    pub async fn stats(&self) -> EngineStats {
        let (products, vendors, locations, users) = self.catalog.counts().await;
        let (assets, trashed_assets) = self.assets.counts().await;
        EngineStats {
            products,
            vendors,
            locations,
            users,
            assets,
            trashed_assets,
            installations: self.installations.count().await,
            license_pools: self.licenses.count().await,
        }
    }
}

/// Flatten validator errors into the domain validation error.
fn validation_error(errors: validator::ValidationErrors) -> CoreError {
    CoreError::Validation(errors.to_string())
}
