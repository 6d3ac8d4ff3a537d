//! Engine error taxonomy

use thiserror::Error;

/// Errors surfaced by the rotation and lifecycle engine.
///
/// Validation failures are detected before any storage access; a storage
/// failure rolls back the whole transaction and surfaces as `Storage`.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("missing caller identity")]
    Unauthenticated,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),
}

impl EngineError {
    pub fn not_found(entity: &str, id: i64) -> Self {
        EngineError::NotFound(format!("{} {}", entity, id))
    }
}
