//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the full application router with the same middleware stack as
//! `main.rs` over a fresh in-memory engine, and provides small request
//! helpers over `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use stockroom_api::config::ServerConfig;
use stockroom_api::routes;
use stockroom_api::state::AppState;
use stockroom_store::Engine;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        allocation_retention_days: None,
    }
}

/// Build the full application router over a fresh in-memory engine.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout,
/// tracing, panic recovery) that production uses.
pub fn build_test_app() -> Router {
    let config = test_config();
    let state = AppState {
        engine: Engine::new(),
        config: Arc::new(config),
        shutdown: tokio_util::sync::CancellationToken::new(),
    };

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(["http://localhost:5173".parse().unwrap()]))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a PATCH request with a JSON body.
pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::PATCH)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a DELETE request.
pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Seed a hardware product through the API, returning its id.
pub async fn seed_hardware_product(app: &Router, name: &str) -> i64 {
    let response = post_json(
        app.clone(),
        "/api/v1/catalog/products",
        serde_json::json!({ "name": name, "category": "hardware" }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Seed a software product through the API, returning its id.
pub async fn seed_software_product(app: &Router, name: &str, software_type: &str) -> i64 {
    let response = post_json(
        app.clone(),
        "/api/v1/catalog/products",
        serde_json::json!({
            "name": name,
            "category": "software",
            "software_type": software_type,
        }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Seed a user through the API, returning its id.
pub async fn seed_user(app: &Router, name: &str, location_id: Option<i64>) -> i64 {
    let response = post_json(
        app.clone(),
        "/api/v1/catalog/users",
        serde_json::json!({
            "name": name,
            "email": format!("{}@example.com", name.to_lowercase()),
            "location_id": location_id,
        }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Seed a location through the API, returning its id.
pub async fn seed_location(app: &Router, name: &str) -> i64 {
    let response = post_json(
        app.clone(),
        "/api/v1/catalog/locations",
        serde_json::json!({ "name": name }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create a standalone asset through the API, returning its id.
pub async fn seed_asset(app: &Router, product_id: i64, serial: &str) -> i64 {
    let response = post_json(
        app.clone(),
        "/api/v1/assets",
        serde_json::json!({
            "serial_number": serial,
            "product_id": product_id,
            "asset_type": "standalone",
        }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create a license pool through the API, returning its id.
pub async fn seed_pool(app: &Router, software_product_id: i64, total: u32) -> i64 {
    let response = post_json(
        app.clone(),
        "/api/v1/license-pools",
        serde_json::json!({
            "software_product_id": software_product_id,
            "license_name": format!("Pool {software_product_id}"),
            "license_type": "per_device",
            "total_licenses": total,
        }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
