//! Soft delete, restore, purge, retention reclaim, and bulk labels.

use assert_matches::assert_matches;
use stockroom_core::error::CoreError;
use stockroom_core::hierarchy::AssetType;
use stockroom_core::labels::LabelStatus;
use stockroom_core::licensing::{LicenseType, SoftwareType};
use stockroom_core::types::DbId;
use stockroom_store::engine::LabelSelection;
use stockroom_store::models::asset::{AssetSearchParams, CreateAsset};
use stockroom_store::models::catalog::{CreateProduct, ProductCategory};
use stockroom_store::models::installation::CreateInstallation;
use stockroom_store::models::license::CreateLicensePool;
use stockroom_store::Engine;
use tokio_util::sync::CancellationToken;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_hardware(engine: &Engine, name: &str) -> DbId {
    engine
        .catalog
        .create_product(&CreateProduct {
            name: name.to_string(),
            category: ProductCategory::Hardware,
            software_type: None,
        })
        .await
        .unwrap()
        .id
}

async fn seed_software(engine: &Engine, name: &str) -> DbId {
    engine
        .catalog
        .create_product(&CreateProduct {
            name: name.to_string(),
            category: ProductCategory::Software,
            software_type: Some(SoftwareType::Application),
        })
        .await
        .unwrap()
        .id
}

async fn seed_asset(engine: &Engine, product_id: DbId, serial: &str) -> DbId {
    engine
        .create_asset(&CreateAsset {
            serial_number: serial.to_string(),
            product_id,
            asset_type: AssetType::Standalone,
            parent_asset_id: None,
            assigned_to: None,
            location_id: None,
            status: None,
            importance: None,
            condition_status: None,
            warranty_start_date: None,
            warranty_end_date: None,
            eol_date: None,
            eos_date: None,
            vendor_id: None,
            invoice_number: None,
            purchase_cost: None,
            purchase_date: None,
            installation_notes: None,
        })
        .await
        .unwrap()
        .id
}

async fn seed_pool(engine: &Engine, software_product_id: DbId, total: u32) -> DbId {
    engine
        .create_license_pool(&CreateLicensePool {
            software_product_id,
            license_name: format!("Pool {software_product_id}"),
            license_type: LicenseType::PerDevice,
            total_licenses: total,
            expiration_date: None,
        })
        .await
        .unwrap()
        .id
}

fn install(software_product_id: DbId, license_id: Option<DbId>) -> CreateInstallation {
    CreateInstallation {
        software_product_id,
        license_id,
        installation_date: None,
        notes: None,
    }
}

// ---------------------------------------------------------------------------
// Delete/restore round trip with no external changes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_then_restore_is_lossless() {
    let engine = Engine::new();
    let hw = seed_hardware(&engine, "Laptop").await;
    let sw = seed_software(&engine, "Editor").await;
    let pool = seed_pool(&engine, sw, 2).await;
    let asset_id = seed_asset(&engine, hw, "SN-1").await;
    engine
        .add_installation(asset_id, &install(sw, Some(pool)))
        .await
        .unwrap();

    let before = engine.get_asset(asset_id).await.unwrap();
    let installations_before = engine.list_installations(asset_id).await.unwrap();
    assert_eq!(engine.licenses.available(pool).await, Some(1));

    engine.soft_delete_asset(asset_id).await.unwrap();
    let restored = engine.restore_asset(asset_id).await.unwrap();

    assert_eq!(restored, before, "asset identical aside from deleted_at");
    assert_eq!(
        engine.list_installations(asset_id).await.unwrap(),
        installations_before,
        "installations and pool bindings unchanged"
    );
    assert_eq!(engine.licenses.available(pool).await, Some(1));
}

// ---------------------------------------------------------------------------
// Deleted assets leave listings and capacity accounting
// ---------------------------------------------------------------------------

#[tokio::test]
async fn deleted_asset_leaves_listings_and_frees_capacity() {
    let engine = Engine::new();
    let hw = seed_hardware(&engine, "Laptop").await;
    let sw = seed_software(&engine, "Editor").await;
    let pool = seed_pool(&engine, sw, 1).await;
    let asset_id = seed_asset(&engine, hw, "SN-1").await;
    engine
        .add_installation(asset_id, &install(sw, Some(pool)))
        .await
        .unwrap();
    assert_eq!(engine.licenses.available(pool).await, Some(0));

    engine.soft_delete_asset(asset_id).await.unwrap();

    // Gone from the default listing, visible with include_deleted.
    assert!(engine.list_assets(&AssetSearchParams::default()).await.is_empty());
    let with_deleted = engine
        .list_assets(&AssetSearchParams {
            include_deleted: true,
            ..Default::default()
        })
        .await;
    assert_eq!(with_deleted.len(), 1);

    // Gone from direct lookup, but the historical installation stays.
    assert_matches!(
        engine.get_asset(asset_id).await.unwrap_err(),
        CoreError::NotFound { .. }
    );
    assert_eq!(engine.list_installations(asset_id).await.unwrap().len(), 1);

    // The seat no longer counts against capacity.
    assert_eq!(engine.licenses.available(pool).await, Some(1));
}

#[tokio::test]
async fn double_delete_and_restore_of_live_asset_are_rejected() {
    let engine = Engine::new();
    let hw = seed_hardware(&engine, "Laptop").await;
    let asset_id = seed_asset(&engine, hw, "SN-1").await;

    assert_matches!(
        engine.restore_asset(asset_id).await.unwrap_err(),
        CoreError::NotDeleted { .. }
    );

    engine.soft_delete_asset(asset_id).await.unwrap();
    assert_matches!(
        engine.soft_delete_asset(asset_id).await.unwrap_err(),
        CoreError::AlreadyDeleted { .. }
    );
}

#[tokio::test]
async fn mutating_a_deleted_asset_is_rejected() {
    let engine = Engine::new();
    let hw = seed_hardware(&engine, "Laptop").await;
    let sw = seed_software(&engine, "Editor").await;
    let asset_id = seed_asset(&engine, hw, "SN-1").await;
    engine.soft_delete_asset(asset_id).await.unwrap();

    assert_matches!(
        engine.add_installation(asset_id, &install(sw, None)).await.unwrap_err(),
        CoreError::AlreadyDeleted { .. }
    );
}

// ---------------------------------------------------------------------------
// Restore conflicts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn restore_fails_when_seat_was_taken_while_deleted() {
    let engine = Engine::new();
    let hw = seed_hardware(&engine, "Laptop").await;
    let sw = seed_software(&engine, "Editor").await;
    let pool = seed_pool(&engine, sw, 1).await;

    let asset_a = seed_asset(&engine, hw, "SN-A").await;
    let asset_b = seed_asset(&engine, hw, "SN-B").await;
    engine
        .add_installation(asset_a, &install(sw, Some(pool)))
        .await
        .unwrap();

    engine.soft_delete_asset(asset_a).await.unwrap();
    // The freed seat is taken while A sits in the trash.
    engine
        .add_installation(asset_b, &install(sw, Some(pool)))
        .await
        .unwrap();

    let err = engine.restore_asset(asset_a).await.unwrap_err();
    assert_matches!(err, CoreError::RestoreConflict(_));

    // The asset stays deleted and its binding is not silently dropped.
    assert!(engine.get_asset(asset_a).await.is_err());
    let held = engine.list_installations(asset_a).await.unwrap();
    assert_eq!(held[0].license_id, Some(pool));
    // B's seat is untouched.
    assert_eq!(engine.licenses.available(pool).await, Some(0));
}

#[tokio::test]
async fn restore_conflict_rolls_back_partial_seat_resumes() {
    let engine = Engine::new();
    let hw = seed_hardware(&engine, "Laptop").await;
    let editor = seed_software(&engine, "Editor").await;
    let cad = seed_software(&engine, "CAD Suite").await;
    let editor_pool = seed_pool(&engine, editor, 1).await;
    let cad_pool = seed_pool(&engine, cad, 1).await;

    let asset_a = seed_asset(&engine, hw, "SN-A").await;
    let asset_b = seed_asset(&engine, hw, "SN-B").await;
    engine
        .add_installation(asset_a, &install(editor, Some(editor_pool)))
        .await
        .unwrap();
    engine
        .add_installation(asset_a, &install(cad, Some(cad_pool)))
        .await
        .unwrap();

    engine.soft_delete_asset(asset_a).await.unwrap();
    // Only the CAD seat gets taken while A is deleted.
    engine
        .add_installation(asset_b, &install(cad, Some(cad_pool)))
        .await
        .unwrap();

    let err = engine.restore_asset(asset_a).await.unwrap_err();
    assert_matches!(err, CoreError::RestoreConflict(_));

    // All-or-nothing: the editor seat resumed before the conflict must
    // have been suspended again.
    assert_eq!(engine.licenses.available(editor_pool).await, Some(1));
    assert!(engine.get_asset(asset_a).await.is_err());
}

#[tokio::test]
async fn restore_fails_while_parent_is_still_deleted() {
    let engine = Engine::new();
    let laptop = seed_hardware(&engine, "Laptop").await;
    let ram = seed_hardware(&engine, "RAM Module").await;

    let parent = seed_asset(&engine, laptop, "SN-P").await;
    let component = engine
        .create_asset(&CreateAsset {
            serial_number: "SN-C".to_string(),
            product_id: ram,
            asset_type: AssetType::Component,
            parent_asset_id: Some(parent),
            assigned_to: None,
            location_id: None,
            status: None,
            importance: None,
            condition_status: None,
            warranty_start_date: None,
            warranty_end_date: None,
            eol_date: None,
            eos_date: None,
            vendor_id: None,
            invoice_number: None,
            purchase_cost: None,
            purchase_date: None,
            installation_notes: None,
        })
        .await
        .unwrap();

    engine.soft_delete_asset(component.id).await.unwrap();
    engine.soft_delete_asset(parent).await.unwrap();

    let err = engine.restore_asset(component.id).await.unwrap_err();
    assert_matches!(err, CoreError::RestoreConflict(_));

    // Restoring the parent first unblocks the component.
    engine.restore_asset(parent).await.unwrap();
    engine.restore_asset(component.id).await.unwrap();
}

// ---------------------------------------------------------------------------
// Purge
// ---------------------------------------------------------------------------

#[tokio::test]
async fn purge_removes_installations_and_releases_seats() {
    let engine = Engine::new();
    let hw = seed_hardware(&engine, "Laptop").await;
    let sw = seed_software(&engine, "Editor").await;
    let pool = seed_pool(&engine, sw, 1).await;
    let asset_id = seed_asset(&engine, hw, "SN-1").await;
    engine
        .add_installation(asset_id, &install(sw, Some(pool)))
        .await
        .unwrap();

    engine.soft_delete_asset(asset_id).await.unwrap();

    let preview = engine.trash_preview().await;
    assert_eq!(preview.asset_count, 1);
    assert_eq!(preview.installation_count, 1);
    assert_eq!(preview.suspended_seats, 1);

    engine.purge_asset(asset_id).await.unwrap();

    assert_matches!(
        engine.list_installations(asset_id).await.unwrap_err(),
        CoreError::NotFound { .. }
    );
    assert_eq!(engine.licenses.available(pool).await, Some(1));
    assert_eq!(engine.licenses.suspended_count().await, 0);
}

#[tokio::test]
async fn purge_of_live_asset_is_rejected() {
    let engine = Engine::new();
    let hw = seed_hardware(&engine, "Laptop").await;
    let asset_id = seed_asset(&engine, hw, "SN-1").await;

    assert_matches!(
        engine.purge_asset(asset_id).await.unwrap_err(),
        CoreError::NotDeleted { .. }
    );
}

#[tokio::test]
async fn purge_all_empties_the_trash() {
    let engine = Engine::new();
    let hw = seed_hardware(&engine, "Laptop").await;
    let a = seed_asset(&engine, hw, "SN-1").await;
    let b = seed_asset(&engine, hw, "SN-2").await;
    seed_asset(&engine, hw, "SN-3").await;

    engine.soft_delete_asset(a).await.unwrap();
    engine.soft_delete_asset(b).await.unwrap();

    assert_eq!(engine.purge_all().await, 2);
    assert!(engine.list_trashed().await.is_empty());
    assert_eq!(engine.list_assets(&AssetSearchParams::default()).await.len(), 1);
}

// ---------------------------------------------------------------------------
// Retention reclaim (policy hook)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reclaim_releases_suspended_seats_and_clears_bindings() {
    let engine = Engine::new();
    let hw = seed_hardware(&engine, "Laptop").await;
    let sw = seed_software(&engine, "Editor").await;
    let pool = seed_pool(&engine, sw, 1).await;
    let asset_id = seed_asset(&engine, hw, "SN-1").await;
    engine
        .add_installation(asset_id, &install(sw, Some(pool)))
        .await
        .unwrap();

    engine.soft_delete_asset(asset_id).await.unwrap();
    assert_eq!(engine.licenses.suspended_count().await, 1);

    // Cutoff in the future: every suspended seat is past retention.
    let cutoff = chrono::Utc::now() + chrono::Duration::seconds(5);
    assert_eq!(engine.reclaim_suspended(cutoff).await, 1);
    assert_eq!(engine.licenses.suspended_count().await, 0);
    assert_eq!(engine.licenses.available(pool).await, Some(1));

    // The binding is gone for good: restore succeeds without a seat.
    let restored = engine.restore_asset(asset_id).await.unwrap();
    assert_eq!(restored.id, asset_id);
    let installations = engine.list_installations(asset_id).await.unwrap();
    assert_eq!(installations[0].license_id, None);
}

#[tokio::test]
async fn reclaim_skips_assets_inside_the_retention_window() {
    let engine = Engine::new();
    let hw = seed_hardware(&engine, "Laptop").await;
    let sw = seed_software(&engine, "Editor").await;
    let pool = seed_pool(&engine, sw, 1).await;
    let asset_id = seed_asset(&engine, hw, "SN-1").await;
    engine
        .add_installation(asset_id, &install(sw, Some(pool)))
        .await
        .unwrap();
    engine.soft_delete_asset(asset_id).await.unwrap();

    // Cutoff in the past: the deletion is newer, nothing to reclaim.
    let cutoff = chrono::Utc::now() - chrono::Duration::hours(1);
    assert_eq!(engine.reclaim_suspended(cutoff).await, 0);
    assert_eq!(engine.licenses.suspended_count().await, 1);
}

// ---------------------------------------------------------------------------
// Bulk labels
// ---------------------------------------------------------------------------

// The batch-size guard fires before any work.
#[tokio::test]
async fn oversized_label_batch_is_rejected_up_front() {
    let engine = Engine::new();
    let ids: Vec<DbId> = (1..=2001).collect();

    let err = engine
        .generate_labels(LabelSelection::Ids(ids), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_matches!(
        err,
        CoreError::TooManyAssets {
            requested: 2001,
            limit: 2000,
        }
    );
}

#[tokio::test]
async fn label_batch_reports_per_item_outcomes() {
    let engine = Engine::new();
    let hw = seed_hardware(&engine, "Laptop").await;
    let live = seed_asset(&engine, hw, "SN-1").await;
    let deleted = seed_asset(&engine, hw, "SN-2").await;
    engine.soft_delete_asset(deleted).await.unwrap();

    let batch = engine
        .generate_labels(
            LabelSelection::Ids(vec![live, deleted, 9999]),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(batch.rendered, 1);
    assert!(!batch.cancelled);
    assert_eq!(batch.results.len(), 3);
    assert_eq!(batch.results[0].status, LabelStatus::Rendered);
    let label = batch.results[0].label.as_ref().unwrap();
    assert_eq!(label.product_name, "Laptop");
    assert!(label.asset_tag.starts_with("LAPTOP-"));
    assert_eq!(batch.results[1].status, LabelStatus::Deleted);
    assert_eq!(batch.results[2].status, LabelStatus::NotFound);
}

#[tokio::test]
async fn cancelled_label_batch_marks_remaining_items() {
    let engine = Engine::new();
    let hw = seed_hardware(&engine, "Laptop").await;
    let a = seed_asset(&engine, hw, "SN-1").await;
    let b = seed_asset(&engine, hw, "SN-2").await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let batch = engine
        .generate_labels(LabelSelection::Ids(vec![a, b]), &cancel)
        .await
        .unwrap();
    assert!(batch.cancelled);
    assert_eq!(batch.rendered, 0);
    assert!(batch
        .results
        .iter()
        .all(|r| r.status == LabelStatus::Cancelled));
}

#[tokio::test]
async fn label_all_selection_targets_live_assets() {
    let engine = Engine::new();
    let hw = seed_hardware(&engine, "Laptop").await;
    seed_asset(&engine, hw, "SN-1").await;
    let deleted = seed_asset(&engine, hw, "SN-2").await;
    engine.soft_delete_asset(deleted).await.unwrap();

    let batch = engine
        .generate_labels(
            LabelSelection::All { status: None },
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    assert_eq!(batch.results.len(), 1);
    assert_eq!(batch.rendered, 1);
}
