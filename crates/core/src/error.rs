//! Domain-level error taxonomy shared by the storage and API layers.

use crate::types::DbId;

/// Errors produced by domain logic and storage implementations.
///
/// The API layer maps each variant onto an HTTP status in
/// `leaseflow-api::error`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity lookup came back empty.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input failed a domain validation rule.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The request conflicts with current state (duplicate username,
    /// disallowed status transition).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or invalid credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed to perform the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience alias for domain results.
pub type CoreResult<T> = Result<T, CoreError>;
