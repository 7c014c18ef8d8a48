//! Software installation ledger.
//!
//! Flat record store; cross-store validation (asset liveness, product
//! category, license allocation) is orchestrated by the engine, which
//! serializes installation mutations under the owning asset's lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use tokio::sync::RwLock;

use stockroom_core::types::DbId;

use crate::models::installation::SoftwareInstallation;

/// Holds all installation records.
pub struct InstallationLedger {
    installations: RwLock<HashMap<DbId, SoftwareInstallation>>,
    next_id: AtomicI64,
}

impl InstallationLedger {
    pub fn new() -> Self {
        Self {
            installations: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Allocate an id up front so a license seat can be bound to the
    /// installation before the record is inserted.
    pub fn alloc_id(&self) -> DbId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    pub async fn insert(&self, installation: SoftwareInstallation) {
        self.installations
            .write()
            .await
            .insert(installation.id, installation);
    }

    pub async fn find_by_id(&self, id: DbId) -> Option<SoftwareInstallation> {
        self.installations.read().await.get(&id).cloned()
    }

    /// Replace an installation record wholesale (engine-validated).
    pub async fn replace(&self, installation: SoftwareInstallation) {
        self.installations
            .write()
            .await
            .insert(installation.id, installation);
    }

    pub async fn remove(&self, id: DbId) -> Option<SoftwareInstallation> {
        self.installations.write().await.remove(&id)
    }

    /// All installations recorded for one asset, ordered by id.
    pub async fn list_for_asset(&self, asset_id: DbId) -> Vec<SoftwareInstallation> {
        let mut list: Vec<_> = self
            .installations
            .read()
            .await
            .values()
            .filter(|i| i.asset_id == asset_id)
            .cloned()
            .collect();
        list.sort_by_key(|i| i.id);
        list
    }

    /// Remove and return every installation for an asset (purge path).
    pub async fn remove_for_asset(&self, asset_id: DbId) -> Vec<SoftwareInstallation> {
        let mut map = self.installations.write().await;
        let ids: Vec<DbId> = map
            .values()
            .filter(|i| i.asset_id == asset_id)
            .map(|i| i.id)
            .collect();
        ids.into_iter().filter_map(|id| map.remove(&id)).collect()
    }

    /// Record count for the health endpoint.
    pub async fn count(&self) -> usize {
        self.installations.read().await.len()
    }
}

impl Default for InstallationLedger {
    fn default() -> Self {
        Self::new()
    }
}
