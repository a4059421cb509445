//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts). Infrastructure concerns belong elsewhere; the one
/// exception is `Inconsistent`, which reports a detected partial
/// multi-document write and is a server-side fault, not a client error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested resource was not found (domain-level).
    #[error("not found")]
    NotFound,

    /// A membership/cardinality invariant would be violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A workflow precondition was unmet (wrong status, missing section).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Authorization failure at the domain boundary.
    #[error("unauthorized")]
    Unauthorized,

    /// A partial multi-document write was detected and could not be rolled
    /// back. Signals a bug or store failure rather than bad input.
    #[error("inconsistent state: {0}")]
    Inconsistent(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn inconsistent(msg: impl Into<String>) -> Self {
        Self::Inconsistent(msg.into())
    }

    /// Whether this error is the caller's fault (as opposed to a
    /// server-side fault like `Inconsistent`).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Inconsistent(_))
    }
}
