//! Harness Service - runs the generator across a scenario matrix.
//!
//! Each scenario is generated into its own fresh directory under the
//! harness work directory, checked against its expected paths on disk and,
//! when a [`BuildRunner`] is configured, built with a per-scenario timeout.
//!
//! Scenarios run concurrently, bounded by [`HarnessOptions::jobs`]. A failing
//! scenario never stops the others: every scenario produces a
//! [`ScenarioResult`], and the [`Report`] lists them in input order.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{ApplicationError, ports::BuildRunner, services::GeneratorService},
    domain::{
        BuildExpectation, BuildOutcome, RelativePath, Report, ScenarioResult, ScenarioStatus,
        Template, TestScenario,
    },
    error::{StrataError, StrataResult},
};

/// Tuning knobs for a harness run.
#[derive(Debug, Clone)]
pub struct HarnessOptions {
    /// Maximum number of scenarios in flight.
    pub jobs: usize,
    /// Per-attempt build timeout.
    pub timeout: Duration,
    /// Extra build attempts after a failing or timed-out build.
    pub retries: u32,
    /// Parent of the per-scenario output directories.
    pub work_dir: PathBuf,
    /// Leave generated solutions on disk after the run.
    pub keep_artifacts: bool,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            jobs: std::thread::available_parallelism().map_or(1, |n| n.get()),
            timeout: Duration::from_secs(300),
            retries: 0,
            work_dir: std::env::temp_dir().join("strata-harness"),
            keep_artifacts: false,
        }
    }
}

/// Validation harness.
///
/// Cheap to clone; clones share the generator, runner and options.
#[derive(Clone)]
pub struct HarnessService {
    inner: Arc<HarnessInner>,
}

struct HarnessInner {
    generator: Arc<GeneratorService>,
    runner: Option<Arc<dyn BuildRunner>>,
    options: HarnessOptions,
}

impl HarnessService {
    /// `runner` is `None` when builds are disabled; build expectations are
    /// then ignored and every result records [`BuildOutcome::NotRun`].
    pub fn new(
        generator: Arc<GeneratorService>,
        runner: Option<Arc<dyn BuildRunner>>,
        options: HarnessOptions,
    ) -> Self {
        Self {
            inner: Arc::new(HarnessInner {
                generator,
                runner,
                options,
            }),
        }
    }

    pub fn options(&self) -> &HarnessOptions {
        &self.inner.options
    }

    /// Run every scenario and collect the report.
    ///
    /// # Errors
    ///
    /// Only `InvalidScenario`, before anything runs. Failures inside a
    /// scenario are recorded in its result.
    pub async fn run_suite(
        &self,
        template: Arc<Template>,
        scenarios: Vec<TestScenario>,
    ) -> StrataResult<Report> {
        self.run_suite_with(template, scenarios, |_| {}).await
    }

    /// Like [`run_suite`](Self::run_suite), calling `on_result` for each
    /// result as it is collected (in input order).
    #[instrument(skip_all, fields(template = %template.id, scenarios = scenarios.len()))]
    pub async fn run_suite_with<F>(
        &self,
        template: Arc<Template>,
        scenarios: Vec<TestScenario>,
        mut on_result: F,
    ) -> StrataResult<Report>
    where
        F: FnMut(&ScenarioResult),
    {
        for scenario in &scenarios {
            scenario.validate()?;
        }

        let started_at = Utc::now();
        let jobs = self.inner.options.jobs.max(1);
        info!(jobs, work_dir = %self.inner.options.work_dir.display(), "Starting harness run");

        let semaphore = Arc::new(Semaphore::new(jobs));
        let mut handles = Vec::with_capacity(scenarios.len());

        for scenario in scenarios {
            let harness = self.clone();
            let template = Arc::clone(&template);
            let semaphore = Arc::clone(&semaphore);
            let name = scenario.name.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                harness.run_scenario(template, scenario).await
            });
            handles.push((name, handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            let result = handle.await.unwrap_or_else(|e| {
                warn!(scenario = %name, error = %e, "Scenario task aborted");
                ScenarioResult {
                    name,
                    status: ScenarioStatus::Failed,
                    reasons: vec![format!("scenario task aborted: {e}")],
                    build: BuildOutcome::NotRun,
                    attempts: 0,
                    duration_ms: 0,
                    output_dir: None,
                }
            });
            on_result(&result);
            results.push(result);
        }

        let report = Report::new(started_at, Utc::now(), results);
        info!(
            passed = report.summary.passed,
            failed = report.summary.failed,
            "Harness run finished"
        );
        Ok(report)
    }

    #[instrument(skip_all, fields(scenario = %scenario.name))]
    async fn run_scenario(&self, template: Arc<Template>, scenario: TestScenario) -> ScenarioResult {
        let started = Instant::now();
        let dir = self
            .inner
            .options
            .work_dir
            .join(format!("{}-{}", scenario.slug(), Uuid::new_v4().simple()));

        let mut reasons = Vec::new();
        let mut build = BuildOutcome::NotRun;
        let mut attempts = 0;

        let generated = self.generate(&template, &scenario, &dir).await;

        match (&scenario.expect_error, generated) {
            (Some(expected), Err(e)) if e.code() == Some(expected.as_str()) => {
                debug!(code = expected.as_str(), "Rejected as expected");
            }
            (Some(expected), Err(e)) => {
                reasons.push(format!("expected rejection '{expected}', got: {e}"));
            }
            (Some(expected), Ok(())) => {
                reasons.push(format!(
                    "expected rejection '{expected}', but generation succeeded"
                ));
            }
            (None, Err(e)) => {
                reasons.push(format!("generation failed: {e}"));
            }
            (None, Ok(())) => {
                reasons.extend(self.check_paths(&scenario, &dir));

                let runner = self
                    .inner
                    .runner
                    .as_ref()
                    .filter(|_| scenario.expect_build != BuildExpectation::Skip);
                if let Some(runner) = runner {
                    (build, attempts) = self.build(runner.as_ref(), &dir, scenario.expect_build).await;
                    reasons.extend(build_mismatch(&build, scenario.expect_build));
                }
            }
        }

        let output_dir = self.finish(&dir);
        let status = if reasons.is_empty() {
            ScenarioStatus::Passed
        } else {
            ScenarioStatus::Failed
        };
        debug!(?status, "Scenario finished");

        ScenarioResult {
            name: scenario.name,
            status,
            reasons,
            build,
            attempts,
            duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            output_dir,
        }
    }

    /// Generation is synchronous; keep it off the async workers.
    async fn generate(
        &self,
        template: &Arc<Template>,
        scenario: &TestScenario,
        dir: &Path,
    ) -> StrataResult<()> {
        let generator = Arc::clone(&self.inner.generator);
        let template = Arc::clone(template);
        let raw = scenario.parameters.clone();
        let dir = dir.to_path_buf();

        tokio::task::spawn_blocking(move || {
            generator
                .generate_from(&raw, &template, &dir)
                .map(|_| ())
        })
        .await
        .map_err(|e| StrataError::Internal {
            message: format!("generation task failed: {e}"),
        })?
    }

    fn check_paths(&self, scenario: &TestScenario, dir: &Path) -> Vec<String> {
        let fs = self.inner.generator.filesystem();
        let mut reasons = Vec::new();

        for (expected, must_exist) in scenario
            .expect_present
            .iter()
            .map(|p| (p, true))
            .chain(scenario.expect_absent.iter().map(|p| (p, false)))
        {
            let path = match RelativePath::try_new(expected) {
                Ok(path) => path,
                Err(e) => {
                    reasons.push(format!("bad expected path '{expected}': {e}"));
                    continue;
                }
            };
            let exists = fs.exists(&dir.join(path.as_path()));
            if must_exist && !exists {
                reasons.push(format!("expected path missing: {path}"));
            } else if !must_exist && exists {
                reasons.push(format!("unexpected path present: {path}"));
            }
        }

        reasons
    }

    /// Build with the configured timeout, retrying a failing or timed-out
    /// build until it matches the expectation or attempts run out.
    async fn build(
        &self,
        runner: &dyn BuildRunner,
        dir: &Path,
        expected: BuildExpectation,
    ) -> (BuildOutcome, u32) {
        let options = &self.inner.options;
        let mut attempts = 0;

        loop {
            attempts += 1;
            let result = match tokio::time::timeout(options.timeout, runner.build(dir)).await {
                Ok(result) => result,
                Err(_) => Err(ApplicationError::Timeout {
                    path: dir.to_path_buf(),
                    seconds: options.timeout.as_secs(),
                }
                .into()),
            };

            let retryable = result.as_ref().is_err_and(StrataError::is_retryable);
            let outcome = to_outcome(result);

            if !retryable
                || build_mismatch(&outcome, expected).is_none()
                || attempts > options.retries
            {
                return (outcome, attempts);
            }
            warn!(attempt = attempts, ?outcome, "Build attempt failed, retrying");
        }
    }

    /// Remove the scenario directory unless artifacts are kept.
    fn finish(&self, dir: &Path) -> Option<PathBuf> {
        if self.inner.options.keep_artifacts {
            return Some(dir.to_path_buf());
        }

        let fs = self.inner.generator.filesystem();
        if fs.exists(dir) {
            if let Err(e) = fs.remove_dir_all(dir) {
                warn!(error = %e, path = %dir.display(), "Failed to clean up scenario directory");
            }
        }
        None
    }
}

fn to_outcome(result: StrataResult<()>) -> BuildOutcome {
    match result {
        Ok(()) => BuildOutcome::Succeeded,
        Err(StrataError::Application(ApplicationError::BuildFailure { exit_code, .. })) => {
            BuildOutcome::Failed { exit_code }
        }
        Err(StrataError::Application(ApplicationError::Timeout { seconds, .. })) => {
            BuildOutcome::TimedOut { after_secs: seconds }
        }
        Err(e) => BuildOutcome::Error {
            message: e.to_string(),
        },
    }
}

fn build_mismatch(outcome: &BuildOutcome, expected: BuildExpectation) -> Option<String> {
    match (outcome, expected) {
        (BuildOutcome::Succeeded, BuildExpectation::Success)
        | (BuildOutcome::Failed { .. }, BuildExpectation::Failure)
        | (_, BuildExpectation::Skip) => None,
        (BuildOutcome::Succeeded, BuildExpectation::Failure) => {
            Some("build succeeded but was expected to fail".into())
        }
        (BuildOutcome::Failed { exit_code }, _) => Some(format!(
            "build failed (exit code {})",
            exit_code.map_or_else(|| "none".to_string(), |c| c.to_string())
        )),
        (BuildOutcome::TimedOut { after_secs }, _) => {
            Some(format!("build timed out after {after_secs}s"))
        }
        (BuildOutcome::Error { message }, _) => Some(format!("build could not run: {message}")),
        (BuildOutcome::NotRun, _) => Some("build did not run".into()),
    }
}
