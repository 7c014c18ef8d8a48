//! Handlers for the `/license-pools` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use stockroom_core::types::DbId;
use stockroom_store::models::license::{CreateLicensePool, LicensePoolParams};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/license-pools
pub async fn create_pool(
    State(state): State<AppState>,
    Json(input): Json<CreateLicensePool>,
) -> AppResult<impl IntoResponse> {
    let pool = state.engine.create_license_pool(&input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: pool })))
}

/// GET /api/v1/license-pools?product_id=...
///
/// Pools with derived `available_licenses`/`total_licenses` for display.
pub async fn list_pools(
    State(state): State<AppState>,
    Query(params): Query<LicensePoolParams>,
) -> AppResult<impl IntoResponse> {
    let pools = state.engine.list_license_pools(params.product_id).await;
    Ok(Json(DataResponse { data: pools }))
}

/// GET /api/v1/license-pools/{id}
pub async fn get_pool(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let pool = state.engine.get_license_pool(id).await?;
    Ok(Json(DataResponse { data: pool }))
}
