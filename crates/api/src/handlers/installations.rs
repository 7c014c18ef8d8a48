//! Handlers for software installations.
//!
//! Installations are created under their asset
//! (`/assets/{id}/software-installations`) and addressed directly for
//! update/removal (`/software-installations/{id}`). License seats are
//! acquired before anything is persisted; a failed allocation never
//! leaves a partial write behind.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use stockroom_core::types::DbId;
use stockroom_store::models::installation::{CreateInstallation, UpdateInstallation};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/assets/{id}/software-installations
///
/// All installations recorded for the asset, including the historical
/// records of a soft-deleted asset.
pub async fn list_for_asset(
    State(state): State<AppState>,
    Path(asset_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let installations = state.engine.list_installations(asset_id).await?;
    Ok(Json(DataResponse {
        data: installations,
    }))
}

/// POST /api/v1/assets/{id}/software-installations
pub async fn add_installation(
    State(state): State<AppState>,
    Path(asset_id): Path<DbId>,
    Json(input): Json<CreateInstallation>,
) -> AppResult<impl IntoResponse> {
    let installation = state.engine.add_installation(asset_id, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: installation }),
    ))
}

/// PATCH /api/v1/software-installations/{id}
///
/// A pool change acquires the new seat before releasing the old one;
/// on failure the old allocation is preserved unchanged.
pub async fn update_installation(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateInstallation>,
) -> AppResult<impl IntoResponse> {
    let installation = state.engine.update_installation(id, &input).await?;
    Ok(Json(DataResponse { data: installation }))
}

/// DELETE /api/v1/software-installations/{id}
///
/// Removes the installation and releases any held license seat.
pub async fn remove_installation(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.engine.remove_installation(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
