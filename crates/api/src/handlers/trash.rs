//! Handlers for the `/trash` resource.
//!
//! Lists soft-deleted assets, previews a purge, and hard-deletes
//! (purges) individual or all trashed records. Restore lives on the
//! asset resource (`POST /assets/{id}/restore`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use stockroom_core::types::DbId;
use stockroom_store::models::asset::Asset;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Summary returned by the trash listing.
#[derive(Debug, Serialize)]
pub struct TrashSummary {
    pub items: Vec<Asset>,
    pub total_count: usize,
}

/// GET /api/v1/trash
///
/// All soft-deleted assets, most recently deleted first.
pub async fn list_trashed(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = state.engine.list_trashed().await;
    let total_count = items.len();
    Ok(Json(DataResponse {
        data: TrashSummary { items, total_count },
    }))
}

/// GET /api/v1/trash/purge-preview
///
/// Counts of what a purge-all would remove, including the license seats
/// still bound to trashed assets.
pub async fn purge_preview(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let preview = state.engine.trash_preview().await;
    Ok(Json(DataResponse { data: preview }))
}

/// DELETE /api/v1/trash/purge
///
/// Hard-delete every soft-deleted asset. Best-effort per item.
pub async fn purge_all(State(state): State<AppState>) -> AppResult<StatusCode> {
    let purged = state.engine.purge_all().await;
    tracing::info!(purged, "Trash purged");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/trash/{id}/purge
///
/// Hard-delete a single soft-deleted asset, releasing its seats for
/// good. The asset tag stays reserved forever.
pub async fn purge_one(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.engine.purge_asset(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
