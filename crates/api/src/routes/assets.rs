//! Route definitions for the asset resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{assets, installations, labels};
use crate::state::AppState;

/// Asset routes mounted at `/assets`.
///
/// ```text
/// GET    /                            -> list_assets
/// POST   /                            -> create_asset
/// POST   /labels/bulk                 -> generate_labels
/// GET    /{id}                        -> get_asset
/// PATCH  /{id}                        -> update_asset
/// DELETE /{id}                        -> delete_asset (soft)
/// POST   /{id}/assign                 -> assign_asset
/// POST   /{id}/unassign               -> unassign_asset
/// POST   /{id}/restore                -> restore_asset
/// GET    /{id}/software-installations -> list_for_asset
/// POST   /{id}/software-installations -> add_installation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/assets",
            get(assets::list_assets).post(assets::create_asset),
        )
        // Registered before /{id} routes so the literal segment is
        // never shadowed by the id matcher.
        .route("/assets/labels/bulk", post(labels::generate_labels))
        .route(
            "/assets/{id}",
            get(assets::get_asset)
                .patch(assets::update_asset)
                .delete(assets::delete_asset),
        )
        .route("/assets/{id}/assign", post(assets::assign_asset))
        .route("/assets/{id}/unassign", post(assets::unassign_asset))
        .route("/assets/{id}/restore", post(assets::restore_asset))
        .route(
            "/assets/{id}/software-installations",
            get(installations::list_for_asset).post(installations::add_installation),
        )
}
