//! Route definitions for the trash / bin.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::trash;
use crate::state::AppState;

/// Trash routes mounted at `/trash`.
///
/// ```text
/// GET    /               -> list_trashed
/// GET    /purge-preview  -> purge_preview
/// DELETE /purge          -> purge_all
/// DELETE /{id}/purge     -> purge_one
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trash", get(trash::list_trashed))
        .route("/trash/purge-preview", get(trash::purge_preview))
        .route("/trash/purge", delete(trash::purge_all))
        .route("/trash/{id}/purge", delete(trash::purge_one))
}
