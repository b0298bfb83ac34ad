//! Validated rejection reason.

use std::fmt;

use crate::error::{DomainError, DomainResult};

/// Minimum length, in characters, of a trimmed rejection reason.
pub const MIN_REASON_LEN: usize = 5;

/// A rejection reason that passed local validation.
///
/// The stored text is trimmed and has at least [`MIN_REASON_LEN`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectionReason(String);

impl RejectionReason {
    /// Validates and trims a reason typed by the reviewer.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ReasonTooShort` when the trimmed text is shorter
    /// than [`MIN_REASON_LEN`] characters.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.chars().count() < MIN_REASON_LEN {
            return Err(DomainError::ReasonTooShort {
                min: MIN_REASON_LEN,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the trimmed reason text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the reason and returns its text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
