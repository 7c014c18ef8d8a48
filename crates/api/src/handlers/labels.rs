//! Handler for bulk asset-label generation.
//!
//! A guarded batch operation: requests over the fixed ceiling are
//! rejected before any work begins, items are processed independently
//! with per-item outcomes, and in-flight batches stop cooperatively
//! when the server shuts down.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use stockroom_core::status::AssetStatus;
use stockroom_core::types::DbId;
use stockroom_store::engine::LabelSelection;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /assets/labels/bulk`.
///
/// Either an explicit id list or `all: true` (optionally narrowed to
/// one status) must be supplied.
#[derive(Debug, Deserialize)]
pub struct BulkLabelRequest {
    pub asset_ids: Option<Vec<DbId>>,
    #[serde(default)]
    pub all: bool,
    pub status: Option<AssetStatus>,
}

/// POST /api/v1/assets/labels/bulk
pub async fn generate_labels(
    State(state): State<AppState>,
    Json(input): Json<BulkLabelRequest>,
) -> AppResult<impl IntoResponse> {
    let selection = match (input.asset_ids, input.all) {
        (Some(ids), _) => LabelSelection::Ids(ids),
        (None, true) => LabelSelection::All {
            status: input.status,
        },
        (None, false) => {
            return Err(AppError::BadRequest(
                "Either asset_ids or all=true must be supplied".to_string(),
            ))
        }
    };

    let cancel = state.shutdown.child_token();
    let batch = state.engine.generate_labels(selection, &cancel).await?;
    Ok(Json(DataResponse { data: batch }))
}
