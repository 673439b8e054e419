//! CLI error type and exit-code mapping.
//!
//! Every failure that reaches `main` is a [`CliError`]. Core errors keep
//! their own suggestions; the CLI only decides how they look and which
//! exit code they produce.

use std::error::Error;

use owo_colors::OwoColorize;
use thiserror::Error;

use strata_core::error::{ErrorCategory as CoreCategory, StrataError};

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input the core never saw.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An error propagated from `strata-core` or the adapters.
    #[error("{0}")]
    Core(#[from] StrataError),

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// The user declined the confirmation prompt.
    #[error("Operation cancelled")]
    Cancelled,

    /// The harness ran but at least one scenario failed.
    #[error("{failed} of {total} scenarios failed")]
    SuiteFailed { failed: usize, total: usize },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message, .. } => vec![
                format!("Check your input: {}", message),
                "Use --help for usage information".into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {}", message),
                "Print the config location with: strata config path".into(),
                "Recreate a default config with: strata init --force".into(),
            ],

            Self::Core(core) => {
                let mut suggestions = core.suggestions();
                if core.category() == CoreCategory::Validation {
                    suggestions.push("List valid parameters with: strata params".into());
                }
                suggestions
            }

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {}", message),
                "Check file permissions".into(),
                "Check available disk space".into(),
            ],

            Self::Cancelled => vec!["No files were written".into()],

            Self::SuiteFailed { .. } => vec![
                "Re-run with --keep to inspect the generated solutions".into(),
                "Write the full report with --report FILE".into(),
            ],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::Cancelled => ErrorCategory::UserError,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation | CoreCategory::Template => ErrorCategory::UserError,
                CoreCategory::Collision => ErrorCategory::Collision,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Filesystem => ErrorCategory::Filesystem,
                CoreCategory::Harness => ErrorCategory::SuiteFailed,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Filesystem,
            Self::SuiteFailed { .. } => ErrorCategory::SuiteFailed,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | Internal      |  1   |
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Collision     |  5   |
    /// | Filesystem    |  6   |
    /// | Suite failed  |  7   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::Internal => 1,
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Collision => 5,
            ErrorCategory::Filesystem => 6,
            ErrorCategory::SuiteFailed => 7,
        }
    }

    /// Stable error code, when the core assigned one.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Core(core) => core.code(),
            _ => None,
        }
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));
        output.push_str(&format!("  {}\n", self.to_string().red()));
        if let Some(code) = self.code() {
            output.push_str(&format!("  {} {}\n", "code:".dimmed(), code.dimmed()));
        }

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "→".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {}\n", suggestion));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(),
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`].
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {}\n", self));
        if let Some(code) = self.code() {
            out.push_str(&format!("  code: {code}\n"));
        }

        if verbose {
            let mut src = std::error::Error::source(self);
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Machine-readable rendering for `--output-format json`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.to_string(),
            "code": self.code(),
            "exit_code": self.exit_code(),
            "suggestions": self.suggestions(),
        })
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError | ErrorCategory::Collision => {
                tracing::warn!(code = self.code(), "User error: {}", self)
            }
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::SuiteFailed => tracing::warn!("Harness: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Filesystem => tracing::error!("Filesystem error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Invalid parameters, broken templates, a declined prompt.
    UserError,
    NotFound,
    Configuration,
    /// The destination already exists.
    Collision,
    Filesystem,
    SuiteFailed,
    Internal,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Extension trait to convert foreign error types into [`CliError`] at
/// call-sites with a descriptive context message.
pub trait IntoCli<T> {
    /// Convert to `CliResult` attaching a human-readable context message.
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

impl<T> IntoCli<T> for Result<T, StrataError> {
    /// Core errors already carry their context; the message is dropped.
    fn with_cli_context<F, S>(self, _f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(CliError::Core)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{io, path::PathBuf};

    use strata_core::{application::ApplicationError, domain::DomainError};

    fn core(err: impl Into<StrataError>) -> CliError {
        CliError::Core(err.into())
    }

    // ── exit codes ────────────────────────────────────────────────────────

    #[test]
    fn invalid_parameters_exit_2() {
        let err = core(DomainError::InvalidValue {
            name: "databaseEngine".into(),
            value: "oracle".into(),
            reason: "expected one of none, sqlserver, postgres, cassandra".into(),
        });
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.code(), Some("invalid_value"));
    }

    #[test]
    fn missing_scenario_file_exits_3() {
        let err = core(ApplicationError::ScenarioLoad {
            path: PathBuf::from("ci.toml"),
            reason: "not found".into(),
        });
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn configuration_exits_4() {
        let err = CliError::ConfigError {
            message: "x".into(),
            source: None,
        };
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn existing_destination_exits_5() {
        let err = core(ApplicationError::ProjectExists {
            path: PathBuf::from("/tmp/Acme.Billing"),
        });
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn filesystem_failures_exit_6() {
        let err = core(ApplicationError::FilesystemError {
            path: PathBuf::from("/out"),
            reason: "denied".into(),
        });
        assert_eq!(err.exit_code(), 6);

        let io = CliError::from(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert_eq!(io.exit_code(), 6);
    }

    #[test]
    fn failed_suite_exits_7() {
        assert_eq!(CliError::SuiteFailed { failed: 1, total: 3 }.exit_code(), 7);
    }

    #[test]
    fn internal_exits_1() {
        let err = core(StrataError::Internal {
            message: "boom".into(),
        });
        assert_eq!(err.exit_code(), 1);
    }

    // ── suggestions and formatting ────────────────────────────────────────

    #[test]
    fn validation_errors_point_at_params() {
        let err = core(DomainError::UnknownParameter {
            name: "useGraphql".into(),
        });
        assert!(err.suggestions().iter().any(|s| s.contains("strata params")));
    }

    #[test]
    fn format_plain_includes_code_and_suggestions() {
        let err = core(DomainError::MissingRequiredParameter {
            name: "orgName".into(),
        });
        let s = err.format_plain(false);
        assert!(s.contains("Error: required parameter 'orgName' is missing"));
        assert!(s.contains("code: missing_required_parameter"));
        assert!(s.contains("Suggestions:"));
        assert!(s.contains("--verbose"));
    }

    #[test]
    fn format_plain_verbose_omits_hint() {
        let s = CliError::Cancelled.format_plain(true);
        assert!(!s.contains("--verbose"));
    }

    #[test]
    fn json_rendering_carries_exit_code() {
        let value = CliError::SuiteFailed { failed: 2, total: 5 }.to_json();
        assert_eq!(value["exit_code"], 7);
        assert_eq!(value["error"], "2 of 5 scenarios failed");
        assert!(value["code"].is_null());
    }

    // ── IntoCli ───────────────────────────────────────────────────────────

    #[test]
    fn into_cli_io_error() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let cli: CliResult<()> = result.with_cli_context(|| "reading report");
        assert!(matches!(cli, Err(CliError::IoError { .. })));
    }
}
