//! Route definitions for license pools.

use axum::routing::get;
use axum::Router;

use crate::handlers::license_pools;
use crate::state::AppState;

/// License pool routes mounted at `/license-pools`.
///
/// ```text
/// GET  /     -> list_pools (with derived availability)
/// POST /     -> create_pool
/// GET  /{id} -> get_pool
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/license-pools",
            get(license_pools::list_pools).post(license_pools::create_pool),
        )
        .route("/license-pools/{id}", get(license_pools::get_pool))
}
