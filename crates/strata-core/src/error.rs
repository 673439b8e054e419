//! Unified error handling for Strata Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{self, DomainError};

/// Root error type for Strata Core operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StrataError {
    /// Errors from the domain layer (invalid input, broken templates).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Errors from the application layer (I/O, builds).
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl StrataError {
    /// Stable code of a domain error (`invalid_value`, `path_collision`, ...).
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Domain(e) => Some(e.code()),
            _ => None,
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Internal { .. } => vec![
                "This appears to be a bug in Strata".into(),
                "Please report it with the output of `strata -vvv`".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                domain::ErrorCategory::Validation => ErrorCategory::Validation,
                domain::ErrorCategory::Collision => ErrorCategory::Collision,
                domain::ErrorCategory::Template => ErrorCategory::Template,
                domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Application(e) if e.is_retryable())
    }
}

/// Error categories for UI display and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Collision,
    Template,
    NotFound,
    Filesystem,
    Harness,
    Internal,
}

/// Convenient result type alias.
pub type StrataResult<T> = Result<T, StrataError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn domain_codes_pass_through() {
        let err: StrataError = DomainError::MissingRequiredParameter {
            name: "orgName".into(),
        }
        .into();
        assert_eq!(err.code(), Some("missing_required_parameter"));
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.to_string(), "required parameter 'orgName' is missing");
    }

    #[test]
    fn io_errors_are_filesystem_category() {
        let err: StrataError = ApplicationError::FilesystemError {
            path: PathBuf::from("/out"),
            reason: "denied".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Filesystem);
        assert_eq!(err.code(), None);
        assert!(!err.is_retryable());
    }

    #[test]
    fn timeouts_are_retryable() {
        let err: StrataError = ApplicationError::Timeout {
            path: PathBuf::from("w"),
            seconds: 1,
        }
        .into();
        assert!(err.is_retryable());
        assert_eq!(err.category(), ErrorCategory::Harness);
    }
}
