//! Strata Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Strata
//! onion-solution generator, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           strata-cli (CLI)              │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (GeneratorService, HarnessService)    │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, TemplateSource, BuildRunner)│
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    strata-adapters (Infrastructure)     │
//! │ (LocalFilesystem, BuiltinTemplateSource)│
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (ParameterSchema, RuleSet, Substitution)│
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::{path::Path, sync::Arc};
//! use strata_core::prelude::*;
//!
//! let generator = GeneratorService::new(Arc::new(filesystem));
//!
//! let mut raw = RawParameters::new();
//! raw.insert("orgName".into(), "Acme".into());
//! raw.insert("name".into(), "Billing".into());
//!
//! let plan = generator.generate(&raw, &template_source, Path::new("./Acme.Billing"))?;
//! println!("{} files", plan.tree.len());
//! ```

pub mod application;
pub mod domain;
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        GenerationPlan, GeneratorService, HarnessOptions, HarnessService,
        ports::{BuildRunner, Filesystem, TemplateSource},
    };
    pub use crate::domain::{
        GeneratedTree, ParameterSchema, ParameterSet, RawParameters, Report, Template,
        TemplateId, TemplateMetadata, TestScenario,
    };
    pub use crate::error::{StrataError, StrataResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
