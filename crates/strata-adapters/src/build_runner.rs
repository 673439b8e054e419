//! External build tool adapter.
//!
//! Runs a command (default `dotnet build`) inside the generated solution
//! directory. Success is the exit status only; output is kept so a failing
//! scenario can show why.

use std::{path::Path, process::Stdio};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument};

use strata_core::{
    application::{ApplicationError, ports::BuildRunner},
    error::StrataResult,
};

/// Number of trailing output lines kept in a `BuildFailure`.
const OUTPUT_TAIL_LINES: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBuildRunner {
    program: String,
    args: Vec<String>,
}

impl CommandBuildRunner {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `dotnet build` in the solution root.
    pub fn dotnet() -> Self {
        Self::new("dotnet", vec!["build".into(), "--nologo".into()])
    }

    /// Split a whitespace-separated command line.
    ///
    /// Returns `None` for an empty line. No quoting rules apply.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(String::from);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }
}

impl Default for CommandBuildRunner {
    fn default() -> Self {
        Self::dotnet()
    }
}

#[async_trait]
impl BuildRunner for CommandBuildRunner {
    #[instrument(skip(self), fields(command = %self.command()))]
    async fn build(&self, dir: &Path) -> StrataResult<()> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ApplicationError::BuildLaunch {
                command: self.command(),
                reason: e.to_string(),
            })?;

        if output.status.success() {
            debug!("build succeeded");
            return Ok(());
        }

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        Err(ApplicationError::BuildFailure {
            path: dir.to_path_buf(),
            exit_code: output.status.code(),
            output: tail(&text, OUTPUT_TAIL_LINES),
        }
        .into())
    }

    fn command(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.lines().collect();
    all[all.len().saturating_sub(lines)..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::error::StrataError;
    use tempfile::TempDir;

    #[test]
    fn command_line_parsing() {
        let runner = CommandBuildRunner::from_command_line("  make  -j4 all ").unwrap();
        assert_eq!(runner.command(), "make -j4 all");
        assert!(CommandBuildRunner::from_command_line("   ").is_none());
        assert_eq!(CommandBuildRunner::default().command(), "dotnet build --nologo");
    }

    #[test]
    fn tail_keeps_last_lines() {
        assert_eq!(tail("a\nb\nc\nd", 2), "c\nd");
        assert_eq!(tail("a", 5), "a");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn zero_exit_is_success() {
        let dir = TempDir::new().unwrap();
        let runner = CommandBuildRunner::new("true", vec![]);
        runner.build(dir.path()).await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_build_failure() {
        let dir = TempDir::new().unwrap();
        let runner = CommandBuildRunner::new(
            "sh",
            vec!["-c".into(), "echo compiling; echo broken >&2; exit 3".into()],
        );

        let err = runner.build(dir.path()).await.unwrap_err();
        match err {
            StrataError::Application(ApplicationError::BuildFailure {
                exit_code, output, ..
            }) => {
                assert_eq!(exit_code, Some(3));
                assert!(output.contains("broken"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_program_is_launch_error() {
        let dir = TempDir::new().unwrap();
        let runner = CommandBuildRunner::new("strata-no-such-build-tool", vec![]);

        let err = runner.build(dir.path()).await.unwrap_err();
        assert!(matches!(
            err,
            StrataError::Application(ApplicationError::BuildLaunch { .. })
        ));
        assert!(!err.is_retryable());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn runs_inside_the_solution_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker.sln"), "").unwrap();
        let runner = CommandBuildRunner::new("test", vec!["-f".into(), "marker.sln".into()]);
        runner.build(dir.path()).await.unwrap();
    }
}
