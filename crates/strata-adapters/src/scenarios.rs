//! Scenario sources for the validation harness.
//!
//! Either the built-in matrix, which covers every switch of the bundled
//! onion template, or a `scenarios.toml` file:
//!
//! ```toml
//! [[scenarios]]
//! name = "No API"
//! expect_absent = ["src/Acme.Billing.Service/Controllers"]
//! expect_build = "success"           # success | failure | skip
//!
//! [scenarios.parameters]
//! orgName = "Acme"
//! name = "Billing"
//! useApi = "false"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use strata_core::{
    application::ApplicationError,
    domain::{
        BuildExpectation, DatabaseEngine, TestFramework, TestScenario,
        parameters::{
            DATABASE_ENGINE, EXTERNAL_API_CLIENTS, EXTERNAL_DATABASES, NAME, ORG_NAME,
            TEST_FRAMEWORK, USE_API, USE_HEALTH_CHECKS, USE_MESSAGING, USE_SWAGGER,
            USE_VALIDATION, USE_WORKERS,
        },
    },
    error::StrataResult,
};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ScenarioFile {
    #[serde(default)]
    pub scenarios: Vec<TestScenario>,
}

/// Read and parse a scenario file.
///
/// # Errors
///
/// `ScenarioLoad` if the file cannot be read, is not valid TOML, or holds no
/// scenarios.
#[instrument]
pub fn load_scenarios(path: &Path) -> StrataResult<Vec<TestScenario>> {
    let load_error = |reason: String| ApplicationError::ScenarioLoad {
        path: path.to_path_buf(),
        reason,
    };

    let text = std::fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
    let scenarios = parse_scenarios(&text).map_err(load_error)?;
    debug!(count = scenarios.len(), "loaded scenarios");
    Ok(scenarios)
}

/// Parse scenario TOML. Scenario semantics are checked later by the harness.
pub fn parse_scenarios(text: &str) -> Result<Vec<TestScenario>, String> {
    let file: ScenarioFile = toml::from_str(text).map_err(|e| e.to_string())?;
    if file.scenarios.is_empty() {
        return Err("no [[scenarios]] entries".into());
    }
    Ok(file.scenarios)
}

/// Serialize scenarios back into the file format.
pub fn to_toml(scenarios: &[TestScenario]) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(&ScenarioFile {
        scenarios: scenarios.to_vec(),
    })
}

const ORG: &str = "Acme";
const PROJECT: &str = "Billing";

fn service(sub: &str) -> String {
    format!("src/{ORG}.{PROJECT}.Service/{sub}")
}

fn infra(sub: &str) -> String {
    format!("src/{ORG}.{PROJECT}.Infrastructure/{sub}")
}

fn base(name: &str) -> TestScenario {
    TestScenario::new(name)
        .param(ORG_NAME, ORG)
        .param(NAME, PROJECT)
}

fn with_paths(scenario: TestScenario, present: &[String], absent: &[String]) -> TestScenario {
    let present: Vec<&str> = present.iter().map(String::as_str).collect();
    let absent: Vec<&str> = absent.iter().map(String::as_str).collect();
    scenario.present(&present).absent(&absent)
}

/// Scenario matrix for the bundled onion template.
///
/// Paths are output paths for `orgName = Acme`, `name = Billing`.
pub fn builtin_scenarios() -> Vec<TestScenario> {
    let solution = format!("{ORG}.{PROJECT}.sln");
    let controllers = service("Controllers");
    let contracts = service("Contracts");
    let tests_csproj = format!("tests/{ORG}.{PROJECT}.Tests/{ORG}.{PROJECT}.Tests.csproj");

    let mut scenarios = vec![
        with_paths(
            base("Default"),
            &[solution.clone(), controllers.clone(), contracts.clone(), tests_csproj.clone()],
            &[
                format!("src/{ORG}.{PROJECT}.Host/Workers"),
                format!("src/{ORG}.{PROJECT}.Application/Messaging"),
                infra("Persistence/BillingDbContext.cs"),
            ],
        ),
        with_paths(
            base("No API").param(USE_API, "false"),
            &[solution.clone(), service("DependencyInjection.cs")],
            &[controllers.clone(), contracts.clone()],
        ),
    ];

    for engine in DatabaseEngine::NAMES {
        let (present, absent) = match *engine {
            "none" => (
                vec![infra("Persistence/InMemoryBillingRepository.cs")],
                vec![infra("HealthChecks")],
            ),
            "cassandra" => (
                vec![
                    infra("Persistence/CassandraSessionFactory.cs"),
                    infra("HealthChecks/DatabaseHealthCheck.cs"),
                ],
                vec![infra("Persistence/BillingDbContext.cs")],
            ),
            _ => (
                vec![
                    infra("Persistence/BillingDbContext.cs"),
                    infra("HealthChecks/DatabaseHealthCheck.cs"),
                ],
                vec![infra("Persistence/InMemoryBillingRepository.cs")],
            ),
        };
        scenarios.push(with_paths(
            base(&format!("Database {engine}")).param(DATABASE_ENGINE, *engine),
            &present,
            &absent,
        ));
    }

    for framework in TestFramework::NAMES {
        scenarios.push(with_paths(
            base(&format!("Tests {framework}")).param(TEST_FRAMEWORK, *framework),
            &[tests_csproj.clone()],
            &[format!("tests/{ORG}.{PROJECT}.Tests/_framework")],
        ));
    }

    scenarios.push(with_paths(
        base("Minimal")
            .param(USE_API, "false")
            .param(USE_SWAGGER, "false")
            .param(USE_HEALTH_CHECKS, "false")
            .param(USE_VALIDATION, "false"),
        &[solution.clone()],
        &[
            controllers.clone(),
            service("HealthChecks"),
            format!("src/{ORG}.{PROJECT}.Application/Validation"),
        ],
    ));

    scenarios.push(with_paths(
        base("Full")
            .param(USE_MESSAGING, "true")
            .param(USE_WORKERS, "true")
            .param(DATABASE_ENGINE, "postgres"),
        &[
            controllers,
            service("HealthChecks"),
            format!("src/{ORG}.{PROJECT}.Application/Messaging/IMessagePublisher.cs"),
            infra("Messaging/MessagePublisher.cs"),
            format!("src/{ORG}.{PROJECT}.Host/Workers/BillingWorker.cs"),
            format!("src/{ORG}.{PROJECT}.Host/Consumers/BillingMessageConsumer.cs"),
        ],
        &[],
    ));

    scenarios.push(with_paths(
        base("External integrations")
            .param(EXTERNAL_API_CLIENTS, "Payments,Crm")
            .param(EXTERNAL_DATABASES, "Ledger"),
        &[
            infra("Clients/Payments/PaymentsClient.cs"),
            infra("Clients/Crm/ICrmClient.cs"),
            infra("ReadOnly/LedgerReadOnlyContext.cs"),
        ],
        &[infra("Clients/_client")],
    ));

    scenarios.push(
        base("Unsupported database")
            .param(DATABASE_ENGINE, "oracle")
            .rejected_with("invalid_value"),
    );

    scenarios.push(
        TestScenario::new("Missing organization")
            .param(NAME, PROJECT)
            .rejected_with("missing_required_parameter"),
    );

    scenarios
}

/// Builtin scenarios with the build disabled, for `--no-build` runs.
pub fn without_builds(scenarios: Vec<TestScenario>) -> Vec<TestScenario> {
    scenarios
        .into_iter()
        .map(|s| s.build(BuildExpectation::Skip))
        .collect()
}
