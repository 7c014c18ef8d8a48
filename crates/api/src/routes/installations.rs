//! Route definitions for directly-addressed software installations.
//!
//! Creation and listing are nested under the owning asset; see
//! `routes::assets`.

use axum::routing::patch;
use axum::Router;

use crate::handlers::installations;
use crate::state::AppState;

/// Installation routes mounted at `/software-installations`.
///
/// ```text
/// PATCH  /{id} -> update_installation
/// DELETE /{id} -> remove_installation
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/software-installations/{id}",
        patch(installations::update_installation).delete(installations::remove_installation),
    )
}
