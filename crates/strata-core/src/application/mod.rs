//! Application layer for Strata.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (`GeneratorService`, `HarnessService`)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! generation logic itself. Inclusion and substitution rules live in
//! `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{GenerationPlan, GeneratorService, HarnessOptions, HarnessService};

// Re-export port traits (for adapter implementation)
pub use ports::{BuildRunner, Filesystem, TemplateSource};

pub use error::ApplicationError;
