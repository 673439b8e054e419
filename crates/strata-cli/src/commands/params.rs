//! Implementation of the `strata params` command.

use serde::Serialize;

use strata_core::domain::{PARAMETER_REGISTRY, ParameterDef, ParameterKind};

use crate::{
    cli::{ParamsArgs, ParamsFormat},
    error::CliResult,
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct ParamView {
    name: &'static str,
    kind: &'static str,
    required: bool,
    default: Option<&'static str>,
    #[serde(skip_serializing_if = "is_unrestricted")]
    allowed: &'static [&'static str],
    description: &'static str,
}

fn is_unrestricted(allowed: &&'static [&'static str]) -> bool {
    allowed.is_empty()
}

impl From<&ParameterDef> for ParamView {
    fn from(def: &ParameterDef) -> Self {
        let allowed: &'static [&'static str] = match def.kind {
            ParameterKind::Choice(values) => values,
            _ => &[],
        };
        Self {
            name: def.name,
            kind: def.kind.label(),
            required: def.is_required(),
            default: def.default,
            allowed,
            description: def.description,
        }
    }
}

pub fn execute(args: ParamsArgs, output: OutputManager) -> CliResult<()> {
    let views: Vec<ParamView> = PARAMETER_REGISTRY.iter().map(ParamView::from).collect();

    // `--output-format json` wins over the table default.
    let format = if output.is_json() {
        ParamsFormat::Json
    } else {
        args.format
    };

    match format {
        ParamsFormat::Table => {
            output.header("Generation parameters:")?;
            for view in &views {
                let default = match (view.required, view.default) {
                    (true, _) => "(required)".to_string(),
                    (false, Some("")) => "(empty)".to_string(),
                    (false, Some(value)) => value.to_string(),
                    (false, None) => String::new(),
                };
                output.print(&format!(
                    "  {:<20} {:<7} {:<12} {}",
                    view.name, view.kind, default, view.description
                ))?;
                if !view.allowed.is_empty() {
                    output.print(&format!("  {:<20} one of: {}", "", view.allowed.join(", ")))?;
                }
            }
        }
        ParamsFormat::List => {
            for view in &views {
                output.print(view.name)?;
            }
        }
        ParamsFormat::Json => output.json(&views)?,
    }

    Ok(())
}
