//! Handlers for catalog reference data: products, vendors, locations,
//! and users. Read-mostly; records are immutable once created.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use stockroom_core::error::CoreError;
use stockroom_core::types::DbId;
use stockroom_store::models::catalog::{
    CreateLocation, CreateProduct, CreateUser, CreateVendor,
};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// POST /api/v1/catalog/products
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<CreateProduct>,
) -> AppResult<impl IntoResponse> {
    let product = state.engine.catalog.create_product(&input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: product })))
}

/// GET /api/v1/catalog/products
pub async fn list_products(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let products = state.engine.catalog.list_products().await;
    Ok(Json(DataResponse { data: products }))
}

/// GET /api/v1/catalog/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let product = state
        .engine
        .catalog
        .find_product(id)
        .await
        .ok_or(CoreError::NotFound {
            entity: "Product",
            id,
        })?;
    Ok(Json(DataResponse { data: product }))
}

// ---------------------------------------------------------------------------
// Vendors
// ---------------------------------------------------------------------------

/// POST /api/v1/catalog/vendors
pub async fn create_vendor(
    State(state): State<AppState>,
    Json(input): Json<CreateVendor>,
) -> AppResult<impl IntoResponse> {
    let vendor = state.engine.catalog.create_vendor(&input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: vendor })))
}

/// GET /api/v1/catalog/vendors
pub async fn list_vendors(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let vendors = state.engine.catalog.list_vendors().await;
    Ok(Json(DataResponse { data: vendors }))
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// POST /api/v1/catalog/locations
pub async fn create_location(
    State(state): State<AppState>,
    Json(input): Json<CreateLocation>,
) -> AppResult<impl IntoResponse> {
    let location = state.engine.catalog.create_location(&input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: location })))
}

/// GET /api/v1/catalog/locations
pub async fn list_locations(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let locations = state.engine.catalog.list_locations().await;
    Ok(Json(DataResponse { data: locations }))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// POST /api/v1/catalog/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> AppResult<impl IntoResponse> {
    let user = state.engine.catalog.create_user(&input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// GET /api/v1/catalog/users
pub async fn list_users(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let users = state.engine.catalog.list_users().await;
    Ok(Json(DataResponse { data: users }))
}
