//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not generation
//! logic. Logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// A template source could not produce a template.
    #[error("Failed to load template from {source_name}: {reason}")]
    TemplateLoad { source_name: String, reason: String },

    /// Filesystem operation failed (surfaced as-is, never retried).
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// In-memory adapter lock poisoned.
    #[error("Filesystem lock poisoned")]
    StoreLockError,

    /// Destination directory already exists.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// The external build did not finish in time.
    #[error("Build timed out after {seconds}s in {path}")]
    Timeout { path: PathBuf, seconds: u64 },

    /// The external build finished with a failing status.
    #[error("Build failed in {path} (exit code {})", exit_code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    BuildFailure {
        path: PathBuf,
        exit_code: Option<i32>,
        output: String,
    },

    /// The build command could not be started.
    #[error("Could not start build command '{command}': {reason}")]
    BuildLaunch { command: String, reason: String },

    /// Scenario file could not be read or parsed.
    #[error("Failed to load scenarios from {path}: {reason}")]
    ScenarioLoad { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateLoad { source_name, .. } => vec![
                format!("Check the template at {}", source_name),
                "A template directory needs a template.toml at its root".into(),
                "Omit --template to use the built-in onion template".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Remove it or choose a different --output directory".into(),
            ],
            Self::Timeout { seconds, .. } => vec![
                format!("The build exceeded the {}s limit", seconds),
                "Raise it with --timeout".into(),
            ],
            Self::BuildFailure { .. } => vec![
                "Re-run with --keep to inspect the generated solution".into(),
            ],
            Self::BuildLaunch { command, .. } => vec![
                format!("Make sure '{}' is installed and on PATH", command),
                "Or skip builds with --no-build".into(),
            ],
            Self::ScenarioLoad { .. } => vec![
                "Scenario files are TOML with one [[scenarios]] table per scenario".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateLoad { .. } => ErrorCategory::Template,
            Self::FilesystemError { .. } => ErrorCategory::Filesystem,
            Self::ProjectExists { .. } => ErrorCategory::Collision,
            Self::StoreLockError => ErrorCategory::Internal,
            Self::Timeout { .. } | Self::BuildFailure { .. } | Self::BuildLaunch { .. } => {
                ErrorCategory::Harness
            }
            Self::ScenarioLoad { .. } => ErrorCategory::NotFound,
        }
    }

    /// Whether another build attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::BuildFailure { .. })
    }
}
