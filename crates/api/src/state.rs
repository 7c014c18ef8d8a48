use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// The allocation engine.
    pub engine: Arc<stockroom_store::Engine>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Server-wide shutdown token; long-running bulk work derives child
    /// tokens from it so in-flight batches stop cooperatively.
    pub shutdown: CancellationToken,
}
