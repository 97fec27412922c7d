//! Structured failure carried by every fallible licensing operation.

use crate::status::Status;
use thiserror::Error;

/// A failed operation: a taxonomy status plus a contextual message.
///
/// Callers branch on [`LeaseError::status`]; the message is for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({}, code {})", status.description(), status.code())]
pub struct LeaseError {
    status: Status,
    message: String,
}

impl LeaseError {
    /// Creates an error with an explicit message.
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Creates an error whose message is the status description.
    #[must_use]
    pub fn from_status(status: Status) -> Self {
        Self::new(status, status.description())
    }

    /// Prefixes the message with the failing operation, keeping the status.
    #[must_use]
    pub fn context(self, operation: &str) -> Self {
        Self {
            status: self.status,
            message: format!("{operation}: {}", self.message),
        }
    }

    /// Returns the status.
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns the integer status code.
    #[must_use]
    pub fn code(&self) -> i32 {
        self.status.code()
    }

    /// Returns the contextual message (without the status suffix).
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<Status> for LeaseError {
    fn from(status: Status) -> Self {
        Self::from_status(status)
    }
}

/// Result type for licensing operations.
pub type LeaseResult<T> = Result<T, LeaseError>;
