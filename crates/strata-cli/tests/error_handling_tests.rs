//! Exit codes and error rendering of the `strata` binary.

use assert_cmd::{Command, cargo::cargo_bin_cmd};
use predicates::prelude::*;
use tempfile::TempDir;

fn strata(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("strata");
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn unsupported_database_engine_exits_2() {
    let dir = TempDir::new().unwrap();
    strata(&dir)
        .args(["new", "--orgName", "Acme", "--name", "Billing", "--databaseEngine", "oracle", "-y"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid_value"))
        .stderr(predicate::str::contains("cassandra"));

    assert!(!dir.path().join("Acme.Billing").exists());
}

#[test]
fn missing_org_name_exits_2() {
    let dir = TempDir::new().unwrap();
    strata(&dir)
        .args(["new", "--name", "Billing", "-y"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("missing_required_parameter"))
        .stderr(predicate::str::contains("strata params"));
}

#[test]
fn unknown_parameter_exits_2() {
    let dir = TempDir::new().unwrap();
    strata(&dir)
        .args(["new", "--orgName", "Acme", "--name", "Billing", "-p", "useGraphql=true", "-y"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown_parameter"));
}

#[test]
fn unusable_name_exits_2() {
    let dir = TempDir::new().unwrap();
    strata(&dir)
        .args(["new", "--orgName", " -!- ", "--name", "Billing", "-y"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid_name"));
}

#[test]
fn existing_destination_exits_5() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("Acme.Billing")).unwrap();

    strata(&dir)
        .args(["new", "--orgName", "Acme", "--name", "Billing", "-y"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn missing_scenario_file_exits_3() {
    let dir = TempDir::new().unwrap();
    strata(&dir)
        .args(["test", "--no-build", "--scenarios", "missing.toml"])
        .assert()
        .code(3);
}

#[test]
fn missing_config_file_exits_4() {
    let dir = TempDir::new().unwrap();
    strata(&dir)
        .args(["--config", "nope.toml", "params"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn failing_scenario_exits_7() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("scenarios.toml"),
        r#"
[[scenarios]]
name = "Controllers without API"
expect_present = ["src/Acme.Billing.Service/Controllers"]
expect_build = "skip"

[scenarios.parameters]
orgName = "Acme"
name = "Billing"
useApi = "false"
"#,
    )
    .unwrap();

    strata(&dir)
        .args(["test", "--no-build", "--scenarios", "scenarios.toml", "--work-dir", "work"])
        .assert()
        .code(7)
        .stdout(predicate::str::contains("expected path missing"))
        .stderr(predicate::str::contains("1 of 1 scenarios failed"));
}

#[test]
fn bad_arguments_exit_2() {
    let dir = TempDir::new().unwrap();
    strata(&dir)
        .args(["test", "--no-build", "--build-command", "make"])
        .assert()
        .code(2);
}

#[test]
fn json_errors_are_machine_readable() {
    let dir = TempDir::new().unwrap();
    let output = strata(&dir)
        .args(["--output-format", "json", "new", "--name", "Billing", "-y"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    // Log lines precede the JSON document on stderr.
    let stderr = String::from_utf8(output.stderr).unwrap();
    let last = stderr.lines().rev().find(|l| !l.trim().is_empty()).unwrap();
    let value: serde_json::Value = serde_json::from_str(last).unwrap();
    assert_eq!(value["code"], "missing_required_parameter");
    assert_eq!(value["exit_code"], 2);
}
