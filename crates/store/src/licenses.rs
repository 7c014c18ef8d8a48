//! License pool ledger.
//!
//! Every capacity check and seat mutation for a pool happens under that
//! pool's `Mutex`, making allocate/release linearizable per pool: two
//! installers racing for the last seat cannot both succeed. A pool entry
//! tracks two seat sets:
//!
//! - `active` — seats consumed by installations on live assets; this is
//!   the set `allocated_count` is derived from.
//! - `suspended` — seats whose asset is soft-deleted. The binding
//!   survives (so restore can re-acquire it) but the seat no longer
//!   counts against capacity and may be taken by someone else while the
//!   asset sits in the trash.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use stockroom_core::error::CoreError;
use stockroom_core::licensing;
use stockroom_core::types::DbId;

use crate::models::license::{CreateLicensePool, LicensePool, LicensePoolView};

struct PoolEntry {
    pool: LicensePool,
    active: HashSet<DbId>,
    suspended: HashSet<DbId>,
}

impl PoolEntry {
    fn view(&self) -> LicensePoolView {
        let allocated_count = self.active.len() as u32;
        LicensePoolView {
            available_licenses: self.pool.total_licenses.saturating_sub(allocated_count),
            allocated_count,
            pool: self.pool.clone(),
        }
    }
}

/// Holds all license pools and their seat sets.
pub struct LicenseLedger {
    pools: RwLock<HashMap<DbId, Arc<Mutex<PoolEntry>>>>,
    next_id: AtomicI64,
}

impl LicenseLedger {
    pub fn new() -> Self {
        Self {
            pools: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Create a pool. The software product reference is validated by the
    /// engine before this is called.
    pub async fn create_pool(&self, input: &CreateLicensePool) -> LicensePool {
        let pool = LicensePool {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            software_product_id: input.software_product_id,
            license_name: input.license_name.clone(),
            license_type: input.license_type,
            total_licenses: input.total_licenses,
            expiration_date: input.expiration_date,
            created_at: chrono::Utc::now(),
        };
        self.pools.write().await.insert(
            pool.id,
            Arc::new(Mutex::new(PoolEntry {
                pool: pool.clone(),
                active: HashSet::new(),
                suspended: HashSet::new(),
            })),
        );
        pool
    }

    async fn entry(&self, pool_id: DbId) -> Option<Arc<Mutex<PoolEntry>>> {
        self.pools.read().await.get(&pool_id).cloned()
    }

    /// Pool record plus derived availability.
    pub async fn view(&self, pool_id: DbId) -> Option<LicensePoolView> {
        let entry = self.entry(pool_id).await?;
        let entry = entry.lock().await;
        Some(entry.view())
    }

    /// All pools, optionally filtered by software product, ordered by id.
    pub async fn list(&self, product_id: Option<DbId>) -> Vec<LicensePoolView> {
        let entries: Vec<_> = self.pools.read().await.values().cloned().collect();
        let mut views = Vec::new();
        for entry in entries {
            let entry = entry.lock().await;
            if let Some(product_id) = product_id {
                if entry.pool.software_product_id != product_id {
                    continue;
                }
            }
            views.push(entry.view());
        }
        views.sort_by_key(|v| v.pool.id);
        views
    }

    /// Currently available seat count, for tests and diagnostics.
    pub async fn available(&self, pool_id: DbId) -> Option<u32> {
        self.view(pool_id).await.map(|v| v.available_licenses)
    }

    /// Bind an installation to a pool, consuming one seat.
    ///
    /// Atomic with respect to concurrent allocations on the same pool.
    /// Product match and date rules are always enforced; re-allocating a
    /// seat the installation already holds is a no-op for capacity (an
    /// edit must not count against its own held seat).
    pub async fn allocate(
        &self,
        pool_id: DbId,
        installation_id: DbId,
        software_product_id: DbId,
        installation_date: Option<chrono::NaiveDate>,
    ) -> Result<(), CoreError> {
        let entry = self.entry(pool_id).await.ok_or(CoreError::NotFound {
            entity: "LicensePool",
            id: pool_id,
        })?;
        let mut entry = entry.lock().await;

        if entry.pool.software_product_id != software_product_id {
            return Err(CoreError::PoolMismatch {
                pool_id,
                pool_product_id: entry.pool.software_product_id,
                requested_product_id: software_product_id,
            });
        }
        licensing::check_installation_date(installation_date, entry.pool.expiration_date)?;

        if entry.active.contains(&installation_id) {
            return Ok(());
        }
        if entry.active.len() as u32 >= entry.pool.total_licenses {
            return Err(CoreError::PoolExhausted { pool_id });
        }
        entry.active.insert(installation_id);
        Ok(())
    }

    /// Release an installation's seat. Idempotent: releasing a seat that
    /// was never held (or a pool that no longer exists) succeeds.
    pub async fn release(&self, pool_id: DbId, installation_id: DbId) {
        if let Some(entry) = self.entry(pool_id).await {
            let mut entry = entry.lock().await;
            entry.active.remove(&installation_id);
            entry.suspended.remove(&installation_id);
        }
    }

    /// Move a seat from active to suspended (asset soft-deleted). The
    /// binding survives but no longer counts against capacity.
    pub async fn suspend(&self, pool_id: DbId, installation_id: DbId) {
        if let Some(entry) = self.entry(pool_id).await {
            let mut entry = entry.lock().await;
            if entry.active.remove(&installation_id) {
                entry.suspended.insert(installation_id);
            }
        }
    }

    /// Re-acquire a suspended seat on restore.
    ///
    /// Fails with `RestoreConflict` when the seats freed by the suspend
    /// were taken while the asset was deleted. The seat stays suspended
    /// on failure so the caller can retry or roll back cleanly.
    pub async fn resume(&self, pool_id: DbId, installation_id: DbId) -> Result<(), CoreError> {
        let entry = self.entry(pool_id).await.ok_or(CoreError::NotFound {
            entity: "LicensePool",
            id: pool_id,
        })?;
        let mut entry = entry.lock().await;

        if entry.active.contains(&installation_id) {
            return Ok(());
        }
        if entry.active.len() as u32 >= entry.pool.total_licenses {
            return Err(CoreError::RestoreConflict(format!(
                "License pool {pool_id} has no free seat left for installation \
                 {installation_id}; its seat was taken while the asset was deleted"
            )));
        }
        entry.suspended.remove(&installation_id);
        entry.active.insert(installation_id);
        Ok(())
    }

    /// Number of suspended seats across all pools, for the purge preview.
    pub async fn suspended_count(&self) -> usize {
        let entries: Vec<_> = self.pools.read().await.values().cloned().collect();
        let mut count = 0;
        for entry in entries {
            count += entry.lock().await.suspended.len();
        }
        count
    }

    /// Pool count for the health endpoint.
    pub async fn count(&self) -> usize {
        self.pools.read().await.len()
    }
}

impl Default for LicenseLedger {
    fn default() -> Self {
        Self::new()
    }
}
