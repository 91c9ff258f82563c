use crate::types::DbId;

/// Domain-level error type shared by all crates.
///
/// Expected business outcomes (admission denials, cart rejections) are NOT
/// errors -- they are typed values in [`crate::campaign`] and [`crate::cart`].
/// `CoreError` covers genuine failures: invalid input, missing entities,
/// broken invariants.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
