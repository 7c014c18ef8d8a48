use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use stockroom_store::engine::EngineStats;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Current engine entity counts.
    pub stats: EngineStats,
}

/// GET /health -- returns service health and engine entity counts.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let stats = state.engine.stats().await;
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        stats,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
