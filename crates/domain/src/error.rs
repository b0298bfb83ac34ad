//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A rejection reason is shorter than the required minimum after trimming.
    #[error("rejection reason must have at least {min} characters")]
    ReasonTooShort {
        /// Minimum number of characters required.
        min: usize,
    },

    /// A proposal status string is not one of the known statuses.
    #[error("invalid proposal status: {0}")]
    InvalidStatus(String),

    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A request or response body could not be encoded or decoded.
    #[error("invalid body: {0}")]
    InvalidBody(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
