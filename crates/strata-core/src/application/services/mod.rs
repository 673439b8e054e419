//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "generate a solution" or "run the scenario
//! matrix".

pub mod generator_service;
pub mod harness_service;

pub use generator_service::{GenerationPlan, GeneratorService};
pub use harness_service::{HarnessOptions, HarnessService};
