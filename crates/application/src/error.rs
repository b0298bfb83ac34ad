//! Application error types

use powershare_domain::DomainError;
use thiserror::Error;

use crate::ports::HttpClientError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Input was rejected before any remote call.
    #[error("validation failed: {0}")]
    Validation(DomainError),

    /// The session is gone: no credentials, or the refresh failed.
    /// The token store has been cleared.
    #[error("session is no longer valid: {reason}")]
    SessionInvalid {
        /// Why the session was invalidated.
        reason: String,
    },

    /// No response was received from the server.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpClientError),

    /// A registry call returned an unexpected status or body.
    #[error("{operation} failed: {message}")]
    RemoteCallFailed {
        /// Operation that failed, e.g. `approve`.
        operation: &'static str,
        /// Status of the response, if one was received.
        status: Option<u16>,
        /// Human-readable detail.
        message: String,
    },

    /// A document could not be downloaded.
    #[error("download failed: {message}")]
    DownloadFailed {
        /// Human-readable detail.
        message: String,
    },

    /// The auth service rejected the login.
    #[error("invalid e-mail or password")]
    InvalidCredentials,

    /// Another transition for the same proposal has not finished yet.
    #[error("a transition for proposal {user_id} is already in progress")]
    TransitionInFlight {
        /// Proposal the caller tried to transition.
        user_id: String,
    },
}

impl ApplicationError {
    /// Builds a `RemoteCallFailed` for a response with an unexpected status.
    #[must_use]
    pub fn unexpected_status(operation: &'static str, status: u16) -> Self {
        Self::RemoteCallFailed {
            operation,
            status: Some(status),
            message: format!("unexpected status {status}"),
        }
    }

    /// Returns true if the caller must log in again.
    #[must_use]
    pub const fn is_session_invalid(&self) -> bool {
        matches!(self, Self::SessionInvalid { .. })
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
