// ============================================================================
// domain/scenario.rs - VALIDATION HARNESS MODEL
// ============================================================================

//! Test scenarios and the suite report.
//!
//! A scenario is a named set of raw parameters plus what should come out of
//! generating them: paths that must exist, paths that must not, whether the
//! generated solution should build, or the error code generation must fail
//! with. Scenarios are plain data; running them is the job of the
//! application layer's harness service.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{error::DomainError, naming::to_kebab_case, parameters::RawParameters};

/// Error codes a scenario may expect generation to fail with.
pub const REJECTION_CODES: &[&str] = &[
    "unknown_parameter",
    "invalid_value",
    "missing_required_parameter",
    "invalid_name",
    "path_collision",
];

/// Whether the external build is expected to pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildExpectation {
    #[default]
    Success,
    Failure,
    /// Never run the build for this scenario.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestScenario {
    pub name: String,

    #[serde(default)]
    pub parameters: RawParameters,

    /// Output paths (files or directories) that must exist.
    #[serde(default)]
    pub expect_present: Vec<String>,

    /// Output paths that must not exist.
    #[serde(default)]
    pub expect_absent: Vec<String>,

    #[serde(default)]
    pub expect_build: BuildExpectation,

    /// Generation must fail with this error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect_error: Option<String>,
}

impl TestScenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: RawParameters::new(),
            expect_present: Vec::new(),
            expect_absent: Vec::new(),
            expect_build: BuildExpectation::Success,
            expect_error: None,
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn present(mut self, paths: &[&str]) -> Self {
        self.expect_present
            .extend(paths.iter().map(|p| (*p).to_string()));
        self
    }

    pub fn absent(mut self, paths: &[&str]) -> Self {
        self.expect_absent.extend(paths.iter().map(|p| (*p).to_string()));
        self
    }

    pub fn build(mut self, expectation: BuildExpectation) -> Self {
        self.expect_build = expectation;
        self
    }

    pub fn rejected_with(mut self, code: impl Into<String>) -> Self {
        self.expect_error = Some(code.into());
        self.expect_build = BuildExpectation::Skip;
        self
    }

    /// Filesystem-friendly form of the name (`No API` → `no-api`).
    pub fn slug(&self) -> String {
        let slug: String = to_kebab_case(&self.name)
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect();
        if slug.is_empty() {
            "scenario".to_string()
        } else {
            slug
        }
    }

    /// # Errors
    ///
    /// `InvalidScenario` for an empty name, an unknown expected error code,
    /// or path expectations combined with an expected rejection.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidScenario(
                "scenario name cannot be empty".into(),
            ));
        }

        if let Some(code) = &self.expect_error {
            if !REJECTION_CODES.contains(&code.as_str()) {
                return Err(DomainError::InvalidScenario(format!(
                    "scenario '{}': unknown expected error '{code}' (expected one of {})",
                    self.name,
                    REJECTION_CODES.join(", ")
                )));
            }
            if !self.expect_present.is_empty() || !self.expect_absent.is_empty() {
                return Err(DomainError::InvalidScenario(format!(
                    "scenario '{}' expects a rejection and cannot also expect paths",
                    self.name
                )));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Results
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    Passed,
    Failed,
}

/// What happened to the external build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BuildOutcome {
    NotRun,
    Succeeded,
    Failed { exit_code: Option<i32> },
    TimedOut { after_secs: u64 },
    /// The build command could not be started.
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub status: ScenarioStatus,
    /// Empty when the scenario passed.
    pub reasons: Vec<String>,
    pub build: BuildOutcome,
    /// Build attempts made (0 when no build ran).
    pub attempts: u32,
    pub duration_ms: u64,
    /// Where the tree was materialized, when artifacts are kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl ScenarioResult {
    pub fn passed(&self) -> bool {
        self.status == ScenarioStatus::Passed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Fraction of passed scenarios in `0.0..=1.0`; `0.0` for an empty suite.
    pub pass_rate: f64,
}

impl Summary {
    pub fn from_results(results: &[ScenarioResult]) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed()).count();
        let pass_rate = if total == 0 {
            0.0
        } else {
            passed as f64 / total as f64
        };
        Self {
            total,
            passed,
            failed: total - passed,
            pass_rate,
        }
    }
}

/// Outcome of one harness run, in scenario input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<ScenarioResult>,
    pub summary: Summary,
}

impl Report {
    pub fn new(
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        results: Vec<ScenarioResult>,
    ) -> Self {
        let summary = Summary::from_results(&results);
        Self {
            started_at,
            finished_at,
            results,
            summary,
        }
    }

    /// True when every scenario passed.
    pub fn is_success(&self) -> bool {
        self.summary.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &ScenarioResult> {
        self.results.iter().filter(|r| !r.passed())
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
