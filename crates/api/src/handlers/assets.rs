//! Handlers for the `/assets` resource.
//!
//! Asset CRUD, assignment, soft delete, and restore. All structural and
//! status invariants are enforced inside the engine as part of each
//! single commit; the handlers stay thin.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use stockroom_core::types::DbId;
use stockroom_store::models::asset::{AssignAsset, AssetSearchParams, CreateAsset, UpdateAsset};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/assets
///
/// List assets with optional filters. Soft-deleted assets are excluded
/// unless `include_deleted=true`.
pub async fn list_assets(
    State(state): State<AppState>,
    Query(params): Query<AssetSearchParams>,
) -> AppResult<impl IntoResponse> {
    let assets = state.engine.list_assets(&params).await;
    Ok(Json(DataResponse { data: assets }))
}

/// POST /api/v1/assets
///
/// Create a new asset; the asset tag is generated server-side.
pub async fn create_asset(
    State(state): State<AppState>,
    Json(input): Json<CreateAsset>,
) -> AppResult<impl IntoResponse> {
    let asset = state.engine.create_asset(&input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: asset })))
}

/// GET /api/v1/assets/{id}
///
/// Get full asset detail including its software installations.
pub async fn get_asset(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let asset = state.engine.get_asset(id).await?;
    let installations = state.engine.list_installations(id).await?;

    let detail = serde_json::json!({
        "asset": asset,
        "software_installations": installations,
    });
    Ok(Json(DataResponse { data: detail }))
}

/// PATCH /api/v1/assets/{id}
///
/// Apply a partial update. Absent fields are left unchanged.
pub async fn update_asset(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAsset>,
) -> AppResult<impl IntoResponse> {
    let asset = state.engine.update_asset(id, &input).await?;
    Ok(Json(DataResponse { data: asset }))
}

/// POST /api/v1/assets/{id}/assign
///
/// Assign the asset to a user. Location is inherited from the user
/// unless explicitly supplied.
pub async fn assign_asset(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AssignAsset>,
) -> AppResult<impl IntoResponse> {
    let asset = state.engine.assign_asset(id, &input).await?;
    Ok(Json(DataResponse { data: asset }))
}

/// POST /api/v1/assets/{id}/unassign
pub async fn unassign_asset(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let asset = state.engine.unassign_asset(id).await?;
    Ok(Json(DataResponse { data: asset }))
}

/// DELETE /api/v1/assets/{id}
///
/// Soft delete: the asset leaves default listings and capacity
/// accounting but keeps its installations for a later restore.
pub async fn delete_asset(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.engine.soft_delete_asset(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/assets/{id}/restore
///
/// Restore a soft-deleted asset. Returns 409 when the parent is gone or
/// the held license seats were taken while the asset was deleted.
pub async fn restore_asset(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let asset = state.engine.restore_asset(id).await?;
    Ok(Json(DataResponse { data: asset }))
}
