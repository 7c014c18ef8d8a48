//! Route definitions for catalog reference data.

use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Catalog routes, nested at `/catalog`.
///
/// ```text
/// GET  /products      -> list_products
/// POST /products      -> create_product
/// GET  /products/{id} -> get_product
/// GET  /vendors       -> list_vendors
/// POST /vendors       -> create_vendor
/// GET  /locations     -> list_locations
/// POST /locations     -> create_location
/// GET  /users         -> list_users
/// POST /users         -> create_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(catalog::list_products).post(catalog::create_product),
        )
        .route("/products/{id}", get(catalog::get_product))
        .route(
            "/vendors",
            get(catalog::list_vendors).post(catalog::create_vendor),
        )
        .route(
            "/locations",
            get(catalog::list_locations).post(catalog::create_location),
        )
        .route(
            "/users",
            get(catalog::list_users).post(catalog::create_user),
        )
}
