//! Implementation of the `strata new` command.
//!
//! Responsibility: turn flags and config defaults into raw parameters, ask
//! the core for a plan, confirm, and materialize it. No generation logic
//! lives here.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Serialize;
use tracing::{debug, info, instrument};

use strata_adapters::{BuiltinTemplateSource, DirectoryTemplateSource, LocalFilesystem};
use strata_core::{
    application::{ApplicationError, GenerationPlan, GeneratorService, TemplateSource},
    domain::{
        ParameterSchema, ParameterSet, RawParameters, SubstitutionMap,
        parameters::{
            DATABASE_ENGINE, EXTERNAL_API_CLIENTS, EXTERNAL_DATABASES, NAME, ORG_NAME,
            TEST_FRAMEWORK, USE_API, USE_HEALTH_CHECKS, USE_MESSAGING, USE_SWAGGER,
            USE_VALIDATION, USE_WORKERS,
        },
    },
    error::StrataError,
};

use crate::{
    cli::{GlobalArgs, NewArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute the `strata new` command.
///
/// 1. Merge config defaults, `-p` pairs, and explicit flags
/// 2. Load the template and plan the tree (nothing touches disk yet)
/// 3. Resolve the destination and refuse an existing one
/// 4. Early-exit on `--dry-run`
/// 5. Confirm unless `--yes`, `--quiet`, JSON output, or no TTY
/// 6. Materialize and print next steps
#[instrument(skip_all, fields(name = %args.name))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let schema = ParameterSchema::standard();
    let raw = collect_parameters(&args, &config, &schema);
    debug!(?raw, "Raw parameters collected");

    let source = template_source(args.template.as_deref(), &config);
    let service = GeneratorService::with_schema(schema, Arc::new(LocalFilesystem::new()));
    let template = service.load_template(source.as_ref())?;
    let plan = service.plan(&raw, &template)?;

    let destination = match &args.output {
        Some(dir) => dir.clone(),
        None => default_destination(&plan)?,
    };

    if destination.exists() {
        return Err(StrataError::from(ApplicationError::ProjectExists { path: destination }).into());
    }

    if args.dry_run {
        return show_plan(&plan, &destination, &output, true);
    }

    let interactive = !args.yes && !global.quiet && !output.is_json() && output.is_interactive();
    if interactive {
        show_plan(&plan, &destination, &output, false)?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    info!(
        template = %plan.template_id,
        destination = %destination.display(),
        files = plan.tree.len(),
        "Materializing solution"
    );
    service
        .materialize(&plan.tree, &destination)
        .with_cli_context(|| "materializing solution")?;

    if output.is_json() {
        output.json(&PlanSummary::new(&plan, &destination, false))?;
        return Ok(());
    }

    output.success(&format!(
        "Created {} files in {}",
        plan.tree.len(),
        destination.display()
    ))?;
    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  cd {}", destination.display()))?;
    output.print("  ./build.sh")?;

    Ok(())
}

// ── Parameters ────────────────────────────────────────────────────────────────

/// Merge parameter sources, lowest priority first: config defaults, `-p`
/// pairs, explicit flags.
///
/// Keys the schema knows are stored under their canonical name so one
/// parameter given through two sources is not reported as a duplicate.
/// Unknown keys pass through unchanged for the schema to reject.
fn collect_parameters(args: &NewArgs, config: &AppConfig, schema: &ParameterSchema) -> RawParameters {
    let mut raw = RawParameters::new();
    let mut set = |key: &str, value: &str| {
        let key = schema.find(key).map_or(key, |def| def.name);
        raw.insert(key.to_string(), value.to_string());
    };

    let defaults = &config.defaults;
    let config_values = [
        (ORG_NAME, &defaults.org_name),
        (DATABASE_ENGINE, &defaults.database_engine),
        (TEST_FRAMEWORK, &defaults.test_framework),
    ];
    for (key, value) in config_values {
        if let Some(value) = value {
            set(key, value.as_str());
        }
    }

    for (key, value) in &args.params {
        set(key.as_str(), value.as_str());
    }

    set(NAME, args.name.as_str());
    let flags = [
        (ORG_NAME, &args.org_name),
        (USE_API, &args.use_api),
        (USE_SWAGGER, &args.use_swagger),
        (USE_HEALTH_CHECKS, &args.use_health_checks),
        (USE_VALIDATION, &args.use_validation),
        (USE_MESSAGING, &args.use_messaging),
        (USE_WORKERS, &args.use_workers),
        (DATABASE_ENGINE, &args.database_engine),
        (TEST_FRAMEWORK, &args.test_framework),
        (EXTERNAL_API_CLIENTS, &args.external_api_clients),
        (EXTERNAL_DATABASES, &args.external_databases),
    ];
    for (key, value) in flags {
        if let Some(value) = value {
            set(key, value.as_str());
        }
    }

    raw
}

// ── Template and destination ──────────────────────────────────────────────────

/// `--template`, then `templates.dir` from config, then the builtin template.
pub(crate) fn template_source(flag: Option<&Path>, config: &AppConfig) -> Box<dyn TemplateSource> {
    match flag.or(config.templates.dir.as_deref()) {
        Some(dir) => Box::new(DirectoryTemplateSource::new(dir)),
        None => Box::new(BuiltinTemplateSource::new()),
    }
}

/// `./<ROOT_NAMESPACE>` for the planned parameters.
fn default_destination(plan: &GenerationPlan) -> CliResult<PathBuf> {
    let tokens = SubstitutionMap::build(&plan.parameters).map_err(StrataError::from)?;
    let namespace = tokens
        .get("{{ROOT_NAMESPACE}}")
        .ok_or_else(|| StrataError::Internal {
            message: "root namespace token missing from substitution map".into(),
        })?;
    Ok(PathBuf::from(namespace))
}

// ── UI helpers ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct PlanSummary<'a> {
    template: String,
    destination: &'a Path,
    dry_run: bool,
    parameters: &'a ParameterSet,
    files: Vec<String>,
}

impl<'a> PlanSummary<'a> {
    fn new(plan: &'a GenerationPlan, destination: &'a Path, dry_run: bool) -> Self {
        Self {
            template: plan.template_id.to_string(),
            destination,
            dry_run,
            parameters: &plan.parameters,
            files: plan.tree.files().map(|f| f.path.to_slash_string()).collect(),
        }
    }
}

fn show_plan(
    plan: &GenerationPlan,
    destination: &Path,
    out: &OutputManager,
    dry_run: bool,
) -> CliResult<()> {
    if out.is_json() {
        out.json(&PlanSummary::new(plan, destination, dry_run))?;
        return Ok(());
    }

    out.header("Configuration")?;
    out.print(&format!("  Template:    {}", plan.template_id))?;
    out.print(&format!("  Location:    {}", destination.display()))?;
    for (name, value) in plan.parameters.iter() {
        out.print(&format!("  {name:<19}{value}"))?;
    }
    out.print("")?;

    if dry_run {
        out.info(&format!(
            "Dry run: would create {} files ({} bytes)",
            plan.tree.len(),
            plan.tree.total_bytes()
        ))?;
        for file in plan.tree.files() {
            out.print(&format!("  {}", file.path))?;
        }
    }
    Ok(())
}

#[cfg(feature = "interactive")]
fn confirm() -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: std::io::Error::other(e),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm() -> CliResult<bool> {
    use std::io::{self, Write as _};

    print!("Continue? [Y/n] ");
    io::stdout()
        .flush()
        .with_cli_context(|| "failed to flush stdout")?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .with_cli_context(|| "failed to read confirmation input")?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
