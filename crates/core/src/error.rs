use chrono::NaiveDate;

use crate::types::DbId;

/// Domain-level error for the allocation engine.
///
/// Every variant is a caller-correctable business-rule rejection; there
/// are no infrastructure failures in this crate's scope. The API layer
/// maps each variant to an HTTP status and a stable error code.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Component/assignment or parent/child structure rule breach.
    #[error("Structural violation: {0}")]
    StructuralViolation(String),

    /// No seats left in the license pool at allocation time.
    #[error("License pool {pool_id} has no available licenses")]
    PoolExhausted { pool_id: DbId },

    /// The license pool covers a different software product than the
    /// installation it was offered to.
    #[error(
        "License pool {pool_id} covers software product {pool_product_id}, \
         not {requested_product_id}"
    )]
    PoolMismatch {
        pool_id: DbId,
        pool_product_id: DbId,
        requested_product_id: DbId,
    },

    /// Installation date falls after the license pool's expiration date.
    #[error("Installation date {installed} is after license expiration {expires}")]
    DateAfterExpiration {
        installed: NaiveDate,
        expires: NaiveDate,
    },

    #[error("{entity} with id {id} is already deleted")]
    AlreadyDeleted { entity: &'static str, id: DbId },

    #[error("{entity} with id {id} is not deleted")]
    NotDeleted { entity: &'static str, id: DbId },

    /// Bulk-label guard: the request exceeds the fixed ceiling.
    #[error("Bulk request of {requested} assets exceeds the limit of {limit}")]
    TooManyAssets { requested: usize, limit: usize },

    /// Restore cannot proceed without breaking an invariant that held
    /// before the soft delete (parent gone, seats taken).
    #[error("Restore conflict: {0}")]
    RestoreConflict(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}
