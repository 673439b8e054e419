//! Infrastructure adapters for Strata.
//!
//! This crate implements the ports defined in `strata-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod build_runner;
pub mod filesystem;
pub mod scenarios;
pub mod template_source;

// Re-export commonly used adapters
pub use build_runner::CommandBuildRunner;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use scenarios::{builtin_scenarios, load_scenarios};
pub use template_source::{BuiltinTemplateSource, DirectoryTemplateSource};
