//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `strata-adapters` crate provides implementations.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::{ParameterSchema, Template};
use crate::error::StrataResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `strata_adapters::filesystem::LocalFilesystem` (production)
/// - `strata_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Materialization and the harness' on-disk checks go through this port
/// only, so both can be exercised without touching a real disk.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> StrataResult<()>;

    /// Write content to a file. The parent directory must exist.
    fn write_file(&self, path: &Path, content: &str) -> StrataResult<()>;

    /// Set file permissions.
    fn set_permissions(&self, path: &Path, executable: bool) -> StrataResult<()>;

    /// Check if a file or directory exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> StrataResult<()>;
}

/// Port for an explicit template root.
///
/// The generator never discovers templates on its own; callers pass one of:
/// - `strata_adapters::template_source::BuiltinTemplateSource` (bundled onion template)
/// - `strata_adapters::template_source::DirectoryTemplateSource` (`template.toml` on disk)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateSource: Send + Sync {
    /// Produce a template whose rules are validated against `schema`.
    fn load(&self, schema: &ParameterSchema) -> StrataResult<Template>;

    /// Human-readable location, used in logs and errors.
    fn describe(&self) -> String;
}

/// Port for the downstream build tool.
///
/// Success is judged only on the process exit status. The harness applies
/// the timeout by dropping the returned future; implementations must make
/// sure that stops the underlying process.
///
/// Implemented by `strata_adapters::build_runner::CommandBuildRunner`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BuildRunner: Send + Sync {
    /// Build the solution in `dir`.
    ///
    /// # Errors
    ///
    /// - `BuildFailure` for a non-zero exit status
    /// - `BuildLaunch` if the command cannot be started
    async fn build(&self, dir: &Path) -> StrataResult<()>;

    /// The command line, for reports.
    fn command(&self) -> String;
}
