pub mod assets;
pub mod catalog;
pub mod health;
pub mod installations;
pub mod license_pools;
pub mod trash;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /assets                                   list, create
/// /assets/labels/bulk                       bulk label generation (POST)
/// /assets/{id}                              get, patch, soft delete
/// /assets/{id}/assign                       assign (POST)
/// /assets/{id}/unassign                     unassign (POST)
/// /assets/{id}/restore                      restore (POST)
/// /assets/{id}/software-installations       list, create
///
/// /software-installations/{id}              patch, delete
///
/// /license-pools                            list, create
/// /license-pools/{id}                       get
///
/// /trash                                    list soft-deleted assets
/// /trash/purge-preview                      preview purge-all (GET)
/// /trash/purge                              purge all (DELETE)
/// /trash/{id}/purge                         purge one (DELETE)
///
/// /catalog/products                         list, create
/// /catalog/products/{id}                    get
/// /catalog/vendors                          list, create
/// /catalog/locations                        list, create
/// /catalog/users                            list, create
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(assets::router())
        .merge(installations::router())
        .merge(license_pools::router())
        .merge(trash::router())
        .nest("/catalog", catalog::router())
}
