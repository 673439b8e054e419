//! Harness runs over the bundled template and the real build runner.

use std::{sync::Arc, time::Duration};

use strata_adapters::{
    BuiltinTemplateSource, CommandBuildRunner, LocalFilesystem, builtin_scenarios,
    scenarios::without_builds,
};
use strata_core::{
    application::{BuildRunner, GeneratorService, HarnessOptions, HarnessService},
    domain::{BuildExpectation, BuildOutcome, ScenarioStatus, TestScenario},
};
use tempfile::TempDir;

fn harness(work: &TempDir, runner: Option<Arc<dyn BuildRunner>>, timeout: Duration) -> HarnessService {
    let generator = Arc::new(GeneratorService::new(Arc::new(LocalFilesystem::new())));
    HarnessService::new(
        generator,
        runner,
        HarnessOptions {
            jobs: 4,
            timeout,
            retries: 0,
            work_dir: work.path().to_path_buf(),
            keep_artifacts: false,
        },
    )
}

fn template() -> Arc<strata_core::domain::Template> {
    let generator = GeneratorService::new(Arc::new(LocalFilesystem::new()));
    Arc::new(generator.load_template(&BuiltinTemplateSource).unwrap())
}

#[tokio::test]
async fn builtin_matrix_passes_without_builds() {
    let work = TempDir::new().unwrap();
    let scenarios = without_builds(builtin_scenarios());
    let total = scenarios.len();

    let report = harness(&work, None, Duration::from_secs(5))
        .run_suite(template(), scenarios)
        .await
        .unwrap();

    let failures: Vec<_> = report
        .failures()
        .map(|r| format!("{}: {:?}", r.name, r.reasons))
        .collect();
    assert!(failures.is_empty(), "{failures:#?}");
    assert_eq!(report.summary.total, total);
    assert!((report.summary.pass_rate - 1.0).abs() < f64::EPSILON);

    // Work directories are cleaned up.
    assert_eq!(std::fs::read_dir(work.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn wrong_expectations_fail_only_their_scenario() {
    let work = TempDir::new().unwrap();
    let scenarios = vec![
        TestScenario::new("Controllers expected without API")
            .param("orgName", "Acme")
            .param("name", "Billing")
            .param("useApi", "false")
            .present(&["src/Acme.Billing.Service/Controllers"])
            .build(BuildExpectation::Skip),
        TestScenario::new("Plain")
            .param("orgName", "Acme")
            .param("name", "Billing")
            .present(&["Acme.Billing.sln"])
            .build(BuildExpectation::Skip),
    ];

    let report = harness(&work, None, Duration::from_secs(5))
        .run_suite(template(), scenarios)
        .await
        .unwrap();

    assert_eq!(report.results[0].status, ScenarioStatus::Failed);
    assert!(report.results[0].reasons[0].contains("Controllers"));
    assert_eq!(report.results[1].status, ScenarioStatus::Passed);
    assert_eq!(report.summary.failed, 1);
}

#[cfg(unix)]
#[tokio::test]
async fn a_hanging_build_times_out_alone() {
    let work = TempDir::new().unwrap();
    let runner = CommandBuildRunner::new(
        "sh",
        vec![
            "-c".into(),
            r#"case "$(basename "$PWD")" in slow-*) sleep 30 ;; esac"#.into(),
        ],
    );

    let scenarios = vec![
        TestScenario::new("Slow").param("orgName", "Acme"),
        TestScenario::new("Fast").param("orgName", "Acme"),
        TestScenario::new("Also fast")
            .param("orgName", "Acme")
            .param("databaseEngine", "sqlserver"),
    ];

    let report = harness(&work, Some(Arc::new(runner)), Duration::from_secs(1))
        .run_suite(template(), scenarios)
        .await
        .unwrap();

    assert!(matches!(
        report.results[0].build,
        BuildOutcome::TimedOut { .. }
    ));
    assert!(!report.results[0].passed());
    assert!(report.results[1].passed());
    assert!(report.results[2].passed());
    assert_eq!(report.results[2].build, BuildOutcome::Succeeded);
}

#[cfg(unix)]
#[tokio::test]
async fn expected_build_failure_passes() {
    let work = TempDir::new().unwrap();
    let runner = CommandBuildRunner::new("false", vec![]);

    let report = harness(&work, Some(Arc::new(runner)), Duration::from_secs(5))
        .run_suite(
            template(),
            vec![
                TestScenario::new("Broken on purpose")
                    .param("orgName", "Acme")
                    .build(BuildExpectation::Failure),
            ],
        )
        .await
        .unwrap();

    assert!(report.is_success());
    assert!(matches!(
        report.results[0].build,
        BuildOutcome::Failed { exit_code: Some(1) }
    ));
}
