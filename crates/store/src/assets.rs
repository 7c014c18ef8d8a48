//! Asset hierarchy store.
//!
//! Each asset lives behind its own `Mutex` so structural mutations are
//! serialized per asset id while edits to different assets proceed in
//! parallel. The outer map guard is never held across an entity-lock
//! acquisition (snapshots clone the `Arc` first), which keeps the store
//! deadlock-free.
//!
//! The tag registry is the single point of mutation for asset tags:
//! per-product sequences plus the set of every tag ever issued. Issued
//! tags survive soft delete and purge, so a tag can never be reused.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use stockroom_core::tagging;
use stockroom_core::types::DbId;

use crate::models::asset::{Asset, AssetSearchParams};

/// Default page size for listings.
const DEFAULT_LIMIT: usize = 50;

/// Hard ceiling for a single listing page.
const MAX_LIMIT: usize = 500;

/// Per-product tag sequences and the immortal issued-tag set.
struct TagRegistry {
    sequences: HashMap<DbId, u32>,
    issued: HashSet<String>,
}

/// Holds all asset records.
pub struct AssetStore {
    assets: RwLock<HashMap<DbId, Arc<Mutex<Asset>>>>,
    tags: Mutex<TagRegistry>,
    next_id: AtomicI64,
}

impl AssetStore {
    pub fn new() -> Self {
        Self {
            assets: RwLock::new(HashMap::new()),
            tags: Mutex::new(TagRegistry {
                sequences: HashMap::new(),
                issued: HashSet::new(),
            }),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn alloc_id(&self) -> DbId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Reserve the next free tag for a product.
    ///
    /// The sequence is bumped under the registry lock until a tag not
    /// seen before comes up, so tags stay unique even across products
    /// whose names collapse to the same prefix.
    pub async fn reserve_tag(&self, product_id: DbId, product_name: &str) -> String {
        let mut registry = self.tags.lock().await;
        loop {
            let seq = registry.sequences.entry(product_id).or_insert(0);
            *seq += 1;
            let tag = tagging::asset_tag(product_name, *seq);
            if registry.issued.insert(tag.clone()) {
                return tag;
            }
        }
    }

    /// Insert a freshly created asset.
    pub async fn insert(&self, asset: Asset) {
        self.assets
            .write()
            .await
            .insert(asset.id, Arc::new(Mutex::new(asset)));
    }

    /// Entry handle for per-asset serialization. The outer map guard is
    /// dropped before the caller locks the entity.
    pub async fn entry(&self, id: DbId) -> Option<Arc<Mutex<Asset>>> {
        self.assets.read().await.get(&id).cloned()
    }

    /// Snapshot an asset regardless of deleted state.
    pub async fn find_by_id_include_deleted(&self, id: DbId) -> Option<Asset> {
        let entry = self.entry(id).await?;
        let asset = entry.lock().await;
        Some(asset.clone())
    }

    /// Snapshot a live asset. Soft-deleted assets are treated as absent.
    pub async fn find_by_id(&self, id: DbId) -> Option<Asset> {
        self.find_by_id_include_deleted(id)
            .await
            .filter(|asset| !asset.is_deleted())
    }

    /// List assets matching the given filters, ordered by id.
    pub async fn list(&self, params: &AssetSearchParams) -> Vec<Asset> {
        let entries: Vec<_> = self.assets.read().await.values().cloned().collect();

        let mut matched = Vec::new();
        for entry in entries {
            let asset = entry.lock().await;
            if asset.is_deleted() && !params.include_deleted {
                continue;
            }
            if let Some(status) = params.status {
                if asset.status != status {
                    continue;
                }
            }
            if let Some(asset_type) = params.asset_type {
                if asset.asset_type != asset_type {
                    continue;
                }
            }
            if let Some(product_id) = params.product_id {
                if asset.product_id != product_id {
                    continue;
                }
            }
            if let Some(assigned_to) = params.assigned_to {
                if asset.assigned_to != Some(assigned_to) {
                    continue;
                }
            }
            if let Some(parent_asset_id) = params.parent_asset_id {
                if asset.parent_asset_id != Some(parent_asset_id) {
                    continue;
                }
            }
            matched.push(asset.clone());
        }

        matched.sort_by_key(|a| a.id);

        let offset = params.offset.unwrap_or(0);
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        matched.into_iter().skip(offset).take(limit).collect()
    }

    /// Ids of every live asset, optionally narrowed to one status,
    /// ordered by id. Unpaginated: used by the bulk-label path, which
    /// applies its own batch-size guard.
    pub async fn live_ids(
        &self,
        status: Option<stockroom_core::status::AssetStatus>,
    ) -> Vec<DbId> {
        let entries: Vec<_> = self.assets.read().await.values().cloned().collect();
        let mut ids = Vec::new();
        for entry in entries {
            let asset = entry.lock().await;
            if asset.is_deleted() {
                continue;
            }
            if let Some(status) = status {
                if asset.status != status {
                    continue;
                }
            }
            ids.push(asset.id);
        }
        ids.sort_unstable();
        ids
    }

    /// Whether any live asset references `id` as its parent.
    pub async fn has_live_children(&self, id: DbId) -> bool {
        let entries: Vec<_> = self.assets.read().await.values().cloned().collect();
        for entry in entries {
            let asset = entry.lock().await;
            if !asset.is_deleted() && asset.parent_asset_id == Some(id) {
                return true;
            }
        }
        false
    }

    /// All soft-deleted assets, most recently deleted first.
    pub async fn list_trashed(&self) -> Vec<Asset> {
        let entries: Vec<_> = self.assets.read().await.values().cloned().collect();
        let mut trashed = Vec::new();
        for entry in entries {
            let asset = entry.lock().await;
            if asset.is_deleted() {
                trashed.push(asset.clone());
            }
        }
        trashed.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));
        trashed
    }

    /// Hard-delete a soft-deleted asset, returning its final state.
    ///
    /// Holds the map write guard while checking the deleted flag so no
    /// concurrent restore can slip in between check and removal. Returns
    /// `None` if the asset is absent or not in the trash. The issued-tag
    /// registry is deliberately left untouched.
    pub async fn remove_trashed(&self, id: DbId) -> Option<Asset> {
        let mut map = self.assets.write().await;
        let entry = map.get(&id)?.clone();
        let asset = entry.lock().await;
        if !asset.is_deleted() {
            return None;
        }
        let removed = asset.clone();
        drop(asset);
        map.remove(&id);
        Some(removed)
    }

    /// (live, trashed) asset counts for the health endpoint.
    pub async fn counts(&self) -> (usize, usize) {
        let entries: Vec<_> = self.assets.read().await.values().cloned().collect();
        let mut live = 0;
        let mut trashed = 0;
        for entry in entries {
            if entry.lock().await.is_deleted() {
                trashed += 1;
            } else {
                live += 1;
            }
        }
        (live, trashed)
    }
}

impl Default for AssetStore {
    fn default() -> Self {
        Self::new()
    }
}
