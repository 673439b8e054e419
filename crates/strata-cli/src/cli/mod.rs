//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.
//!
//! Generation parameters are kept as raw strings: the parameter schema in
//! `strata-core` owns parsing, so `--databaseEngine oracle` fails with the
//! same error and exit code as `-p databaseEngine=oracle`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "strata",
    bin_name = "strata",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Onion-architecture .NET solution generator",
    long_about = "Strata generates five-layer onion .NET solutions. Every optional \
                  feature maps to exactly the files that implement it.",
    after_help = "EXAMPLES:\n\
        \x20 strata new --orgName Acme --name Billing\n\
        \x20 strata new --orgName Acme --name Billing --useApi false --databaseEngine postgres\n\
        \x20 strata params\n\
        \x20 strata test --no-build",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a new solution.
    #[command(
        visible_alias = "n",
        about = "Generate a new solution",
        after_help = "EXAMPLES:\n\
            \x20 strata new --orgName Acme --name Billing\n\
            \x20 strata new --orgName Acme --name Billing -p externalApiClients=Payments,Crm\n\
            \x20 strata new --orgName Acme --name Billing --template ./my-template --dry-run"
    )]
    New(Box<NewArgs>),

    /// Describe the generation parameters.
    #[command(
        visible_alias = "p",
        about = "List generation parameters",
        after_help = "EXAMPLES:\n\
            \x20 strata params\n\
            \x20 strata params --format json"
    )]
    Params(ParamsArgs),

    /// Run the validation harness.
    #[command(
        about = "Generate and build a matrix of scenarios",
        after_help = "EXAMPLES:\n\
            \x20 strata test                       # builtin matrix, dotnet build\n\
            \x20 strata test --no-build --jobs 8\n\
            \x20 strata test --scenarios ci.toml --timeout 600 --retries 1"
    )]
    Test(TestArgs),

    /// Initialise a Strata configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 strata init           # default location\n\
            \x20 strata init --local   # ./strata.toml\n\
            \x20 strata init --force   # overwrite"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 strata completions bash > ~/.local/share/bash-completion/completions/strata\n\
            \x20 strata completions zsh  > ~/.zfunc/_strata\n\
            \x20 strata completions fish > ~/.config/fish/completions/strata.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Strata configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 strata config get defaults.org_name\n\
            \x20 strata config list\n\
            \x20 strata config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `strata new`.
///
/// Each generation parameter has its own flag, spelled exactly like the
/// parameter. `-p key=value` accepts any parameter; explicit flags win.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Organization root namespace.
    #[arg(long = "orgName", value_name = "ORG", help = "Organization namespace (e.g. Acme)")]
    pub org_name: Option<String>,

    /// Project name.
    #[arg(long = "name", value_name = "NAME", help = "Project / solution name")]
    pub name: String,

    #[arg(long = "useApi", value_name = "BOOL", help = "Generate controllers and contracts")]
    pub use_api: Option<String>,

    #[arg(long = "useSwagger", value_name = "BOOL", help = "Register Swagger (needs useApi)")]
    pub use_swagger: Option<String>,

    #[arg(long = "useHealthChecks", value_name = "BOOL", help = "Register health checks")]
    pub use_health_checks: Option<String>,

    #[arg(long = "useValidation", value_name = "BOOL", help = "Generate validators")]
    pub use_validation: Option<String>,

    #[arg(long = "useMessaging", value_name = "BOOL", help = "Generate messaging abstractions")]
    pub use_messaging: Option<String>,

    #[arg(long = "useWorkers", value_name = "BOOL", help = "Generate background workers")]
    pub use_workers: Option<String>,

    #[arg(
        long = "databaseEngine",
        value_name = "ENGINE",
        help = "none | sqlserver | postgres | cassandra"
    )]
    pub database_engine: Option<String>,

    #[arg(long = "testFramework", value_name = "FRAMEWORK", help = "xunit | nunit | mstest")]
    pub test_framework: Option<String>,

    #[arg(
        long = "externalApiClients",
        value_name = "LIST",
        help = "Comma-separated API client names"
    )]
    pub external_api_clients: Option<String>,

    #[arg(
        long = "externalDatabases",
        value_name = "LIST",
        help = "Comma-separated read-only database names"
    )]
    pub external_databases: Option<String>,

    /// Extra parameters as `key=value`.
    #[arg(
        short = 'p',
        long = "param",
        value_name = "KEY=VALUE",
        value_parser = parse_key_value,
        help = "Set any parameter (repeatable)"
    )]
    pub params: Vec<(String, String)>,

    /// Destination directory. Defaults to `./<ROOT_NAMESPACE>`.
    #[arg(short = 'o', long = "output", value_name = "DIR", help = "Output directory")]
    pub output: Option<PathBuf>,

    /// Template root containing `template.toml`.
    #[arg(long = "template", value_name = "DIR", help = "Template directory (default: builtin)")]
    pub template: Option<PathBuf>,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes", help = "Skip confirmation and create immediately")]
    pub yes: bool,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}

// ── params ────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ParamsArgs {
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ParamsFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ParamsFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

// ── test ──────────────────────────────────────────────────────────────────────

/// Arguments for `strata test`. Unset values fall back to the `[harness]`
/// config section.
#[derive(Debug, Args)]
pub struct TestArgs {
    /// Scenario file; the builtin matrix is used when omitted.
    #[arg(long = "scenarios", value_name = "FILE", help = "Scenario TOML file")]
    pub scenarios: Option<PathBuf>,

    #[arg(
        long = "build-command",
        value_name = "CMD",
        conflicts_with = "no_build",
        help = "Build command run in each solution (default: dotnet build)"
    )]
    pub build_command: Option<String>,

    #[arg(long = "no-build", help = "Only check generated paths")]
    pub no_build: bool,

    #[arg(short = 'j', long = "jobs", value_name = "N", help = "Concurrent scenarios")]
    pub jobs: Option<usize>,

    #[arg(
        long = "timeout",
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Per-build timeout in seconds (at least 1)"
    )]
    pub timeout: Option<u64>,

    #[arg(long = "retries", value_name = "N", help = "Extra attempts for failed builds")]
    pub retries: Option<u32>,

    #[arg(long = "work-dir", value_name = "DIR", help = "Where scenario solutions are generated")]
    pub work_dir: Option<PathBuf>,

    #[arg(long = "keep", help = "Keep generated solutions after the run")]
    pub keep: bool,

    #[arg(long = "template", value_name = "DIR", help = "Template directory (default: builtin)")]
    pub template: Option<PathBuf>,

    /// Write the JSON report to a file as well.
    #[arg(long = "report", value_name = "FILE", help = "Write the JSON report to FILE")]
    pub report: Option<PathBuf>,
}

// ── init ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `strata.toml` in the current directory.
    #[arg(long = "local", help = "Create local configuration in current directory")]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `harness.jobs`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
