use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use stockroom_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `stockroom_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map a domain error to an HTTP status and a stable error code.
///
/// Every domain failure is caller-correctable, so nothing here maps to
/// a 5xx: requests that break an invariant get 409, malformed or
/// unresolvable input gets 400, absent entities get 404.
fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    let message = err.to_string();
    match err {
        CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", message),
        CoreError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message),
        CoreError::StructuralViolation(_) => {
            (StatusCode::CONFLICT, "STRUCTURAL_VIOLATION", message)
        }
        CoreError::PoolExhausted { .. } => (StatusCode::CONFLICT, "POOL_EXHAUSTED", message),
        CoreError::PoolMismatch { .. } => (StatusCode::CONFLICT, "POOL_MISMATCH", message),
        CoreError::DateAfterExpiration { .. } => {
            (StatusCode::BAD_REQUEST, "DATE_AFTER_EXPIRATION", message)
        }
        CoreError::AlreadyDeleted { .. } => (StatusCode::CONFLICT, "ALREADY_DELETED", message),
        CoreError::NotDeleted { .. } => (StatusCode::CONFLICT, "NOT_DELETED", message),
        CoreError::TooManyAssets { .. } => (StatusCode::BAD_REQUEST, "TOO_MANY_ASSETS", message),
        CoreError::RestoreConflict(_) => (StatusCode::CONFLICT, "RESTORE_CONFLICT", message),
        CoreError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT", message),
    }
}
