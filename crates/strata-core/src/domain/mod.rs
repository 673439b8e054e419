// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Strata.
//!
//! Pure generation logic: the parameter schema, inclusion rules, token
//! substitution and the harness data model. All I/O (filesystem, template
//! loading, build processes) is reached through ports defined in the
//! application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or process calls
//! - **Immutable values**: `ParameterSet`, `SubstitutionMap` and `Template`
//!   are never mutated after construction
//! - **Deterministic**: every function here returns the same output for the
//!   same input

pub mod entities;
pub mod error;
pub mod naming;
pub mod parameters;
pub mod predicate;
pub mod rules;
pub mod scenario;
pub mod substitution;

pub use entities::{
    ContentSource, GeneratedFile, GeneratedTree, Permissions, RelativePath, Template,
    TemplateBuilder, TemplateContent, TemplateFile, TemplateId, TemplateMetadata,
};
pub use error::{DomainError, ErrorCategory};
pub use naming::{sanitize_identifier, sanitize_type_name};
pub use parameters::{
    DatabaseEngine, PARAMETER_REGISTRY, ParameterDef, ParameterKind, ParameterSchema,
    ParameterSet, ParameterValue, RawParameters, TestFramework,
};
pub use predicate::Predicate;
pub use rules::{CompiledRule, FileRule, Inclusion, RuleSet};
pub use scenario::{
    BuildExpectation, BuildOutcome, Report, ScenarioResult, ScenarioStatus, Summary, TestScenario,
};
pub use substitution::SubstitutionMap;
