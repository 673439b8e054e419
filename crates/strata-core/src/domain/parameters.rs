//! Parameter schema and validated parameter sets.
//!
//! # Design
//!
//! The schema is a single static registry, [`PARAMETER_REGISTRY`]: every
//! parameter is described exactly once by its [`ParameterDef`]. Validation,
//! `strata params`, rule checking, and the CLI flags all read from it.
//!
//! # Adding a New Parameter
//!
//! 1. Add one [`ParameterDef`] entry to [`PARAMETER_REGISTRY`]
//! 2. If it should appear in generated files, add a token in `substitution.rs`
//! 3. Reference it from template rules; nothing else changes

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{error::DomainError, naming::is_identifier};

/// Raw, unvalidated input as handed over by the host (CLI flags, scenario files).
pub type RawParameters = BTreeMap<String, String>;

// ── Typed enum values ────────────────────────────────────────────────────────

/// Persistence engine wired into the infrastructure layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseEngine {
    None,
    SqlServer,
    Postgres,
    Cassandra,
}

impl DatabaseEngine {
    pub const NAMES: &'static [&'static str] = &["none", "sqlserver", "postgres", "cassandra"];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::SqlServer => "sqlserver",
            Self::Postgres => "postgres",
            Self::Cassandra => "cassandra",
        }
    }
}

impl fmt::Display for DatabaseEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatabaseEngine {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "sqlserver" => Ok(Self::SqlServer),
            "postgres" => Ok(Self::Postgres),
            "cassandra" => Ok(Self::Cassandra),
            other => Err(invalid_choice(DATABASE_ENGINE, other, Self::NAMES)),
        }
    }
}

/// Unit test framework for the generated test projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestFramework {
    XUnit,
    NUnit,
    MsTest,
}

impl TestFramework {
    pub const NAMES: &'static [&'static str] = &["xunit", "nunit", "mstest"];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::XUnit => "xunit",
            Self::NUnit => "nunit",
            Self::MsTest => "mstest",
        }
    }
}

impl fmt::Display for TestFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestFramework {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xunit" => Ok(Self::XUnit),
            "nunit" => Ok(Self::NUnit),
            "mstest" => Ok(Self::MsTest),
            other => Err(invalid_choice(TEST_FRAMEWORK, other, Self::NAMES)),
        }
    }
}

fn invalid_choice(name: &str, value: &str, allowed: &[&str]) -> DomainError {
    DomainError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
        reason: format!("expected one of {}", allowed.join(", ")),
    }
}

// ── Parameter definitions ────────────────────────────────────────────────────

pub const ORG_NAME: &str = "orgName";
pub const NAME: &str = "name";
pub const USE_API: &str = "useApi";
pub const USE_SWAGGER: &str = "useSwagger";
pub const USE_HEALTH_CHECKS: &str = "useHealthChecks";
pub const USE_VALIDATION: &str = "useValidation";
pub const USE_MESSAGING: &str = "useMessaging";
pub const USE_WORKERS: &str = "useWorkers";
pub const DATABASE_ENGINE: &str = "databaseEngine";
pub const TEST_FRAMEWORK: &str = "testFramework";
pub const EXTERNAL_API_CLIENTS: &str = "externalApiClients";
pub const EXTERNAL_DATABASES: &str = "externalDatabases";

/// The shape of values a parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// Free text that is later sanitized into an identifier.
    Name,
    /// Case-insensitive `true` / `false`.
    Bool,
    /// One of a fixed set of lowercase values.
    Choice(&'static [&'static str]),
    /// Comma-separated identifiers.
    List,
}

impl ParameterKind {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Bool => "bool",
            Self::Choice(_) => "choice",
            Self::List => "list",
        }
    }
}

/// One entry of the parameter catalog.
#[derive(Debug, Clone, Copy)]
pub struct ParameterDef {
    /// Canonical camelCase name, also the CLI flag (`--orgName`).
    pub name: &'static str,
    pub kind: ParameterKind,
    /// `None` marks the parameter as required.
    pub default: Option<&'static str>,
    pub description: &'static str,
}

impl ParameterDef {
    pub const fn is_required(&self) -> bool {
        self.default.is_none()
    }

    /// Parse and normalize one raw value against this definition.
    pub fn parse(&self, raw: &str) -> Result<ParameterValue, DomainError> {
        let value = raw.trim();
        match self.kind {
            ParameterKind::Name => Ok(ParameterValue::Name(value.to_string())),
            ParameterKind::Bool => match value.to_ascii_lowercase().as_str() {
                "true" => Ok(ParameterValue::Bool(true)),
                "false" => Ok(ParameterValue::Bool(false)),
                _ => Err(DomainError::InvalidValue {
                    name: self.name.to_string(),
                    value: raw.to_string(),
                    reason: "expected true or false".into(),
                }),
            },
            ParameterKind::Choice(allowed) => {
                let lower = value.to_ascii_lowercase();
                allowed
                    .iter()
                    .find(|a| **a == lower)
                    .map(|a| ParameterValue::Choice((*a).to_string()))
                    .ok_or_else(|| invalid_choice(self.name, raw, allowed))
            }
            ParameterKind::List => self.parse_list(raw),
        }
    }

    fn parse_list(&self, raw: &str) -> Result<ParameterValue, DomainError> {
        if raw.trim().is_empty() {
            return Ok(ParameterValue::List(Vec::new()));
        }

        let mut seen = HashSet::new();
        let mut items = Vec::new();
        for entry in raw.split(',').map(str::trim) {
            let reason = if entry.is_empty() {
                Some("list entries cannot be empty".to_string())
            } else if !is_identifier(entry) {
                Some(format!(
                    "'{entry}' is not an identifier (letters, digits and '_', not starting with a digit)"
                ))
            } else if !seen.insert(entry.to_ascii_lowercase()) {
                Some(format!("'{entry}' is listed more than once"))
            } else {
                None
            };

            if let Some(reason) = reason {
                return Err(DomainError::InvalidValue {
                    name: self.name.to_string(),
                    value: raw.to_string(),
                    reason,
                });
            }
            items.push(entry.to_string());
        }

        Ok(ParameterValue::List(items))
    }
}

/// Single source of truth for recognized generation parameters.
pub static PARAMETER_REGISTRY: &[ParameterDef] = &[
    ParameterDef {
        name: ORG_NAME,
        kind: ParameterKind::Name,
        default: None,
        description: "Organization root namespace (e.g. Acme or Contoso.Retail)",
    },
    ParameterDef {
        name: NAME,
        kind: ParameterKind::Name,
        default: Some("Service"),
        description: "Project / solution name appended to the organization namespace",
    },
    ParameterDef {
        name: USE_API,
        kind: ParameterKind::Bool,
        default: Some("true"),
        description: "Generate HTTP controllers and request/response contracts",
    },
    ParameterDef {
        name: USE_SWAGGER,
        kind: ParameterKind::Bool,
        default: Some("true"),
        description: "Register OpenAPI/Swagger (only together with useApi)",
    },
    ParameterDef {
        name: USE_HEALTH_CHECKS,
        kind: ParameterKind::Bool,
        default: Some("true"),
        description: "Register health check endpoints and probes",
    },
    ParameterDef {
        name: USE_VALIDATION,
        kind: ParameterKind::Bool,
        default: Some("true"),
        description: "Generate request validators in the application layer",
    },
    ParameterDef {
        name: USE_MESSAGING,
        kind: ParameterKind::Bool,
        default: Some("false"),
        description: "Generate message publisher/consumer abstractions",
    },
    ParameterDef {
        name: USE_WORKERS,
        kind: ParameterKind::Bool,
        default: Some("false"),
        description: "Generate background worker implementations",
    },
    ParameterDef {
        name: DATABASE_ENGINE,
        kind: ParameterKind::Choice(DatabaseEngine::NAMES),
        default: Some("none"),
        description: "Persistence engine for the infrastructure layer",
    },
    ParameterDef {
        name: TEST_FRAMEWORK,
        kind: ParameterKind::Choice(TestFramework::NAMES),
        default: Some("xunit"),
        description: "Test framework for the generated test projects",
    },
    ParameterDef {
        name: EXTERNAL_API_CLIENTS,
        kind: ParameterKind::List,
        default: Some(""),
        description: "Comma-separated external API client names",
    },
    ParameterDef {
        name: EXTERNAL_DATABASES,
        kind: ParameterKind::List,
        default: Some(""),
        description: "Comma-separated external read-only database names",
    },
];

// ── Schema ───────────────────────────────────────────────────────────────────

/// Read-only catalog of parameter definitions.
#[derive(Debug, Clone, Copy)]
pub struct ParameterSchema {
    defs: &'static [ParameterDef],
}

impl ParameterSchema {
    /// Schema over an arbitrary static catalog.
    pub const fn new(defs: &'static [ParameterDef]) -> Self {
        Self { defs }
    }

    /// The process-wide catalog ([`PARAMETER_REGISTRY`]).
    pub const fn standard() -> Self {
        Self::new(PARAMETER_REGISTRY)
    }

    pub fn definitions(&self) -> &'static [ParameterDef] {
        self.defs
    }

    /// Look up a definition; names match case-insensitively.
    pub fn find(&self, name: &str) -> Option<&'static ParameterDef> {
        self.defs.iter().find(|d| d.name.eq_ignore_ascii_case(name))
    }

    /// Validate raw input into an immutable [`ParameterSet`].
    ///
    /// Checks run in a fixed order so the reported error is deterministic:
    /// unknown keys first (in sorted key order), then each definition in
    /// catalog order.
    ///
    /// # Errors
    ///
    /// - `UnknownParameter` for keys outside the catalog
    /// - `InvalidValue` for malformed values or a key given twice in different casing
    /// - `MissingRequiredParameter` for absent required parameters
    pub fn validate(&self, raw: &RawParameters) -> Result<ParameterSet, DomainError> {
        let mut supplied: BTreeMap<&'static str, &str> = BTreeMap::new();

        for (key, value) in raw {
            let def = self
                .find(key.trim())
                .ok_or_else(|| DomainError::UnknownParameter { name: key.clone() })?;

            if supplied.insert(def.name, value.as_str()).is_some() {
                return Err(DomainError::InvalidValue {
                    name: def.name.to_string(),
                    value: value.clone(),
                    reason: "parameter given more than once".into(),
                });
            }
        }

        let mut values = BTreeMap::new();
        for def in self.defs {
            let value = match (supplied.get(def.name), def.default) {
                (Some(raw_value), _) => def.parse(raw_value)?,
                (None, Some(default)) => def.parse(default)?,
                (None, None) => {
                    return Err(DomainError::MissingRequiredParameter {
                        name: def.name.to_string(),
                    });
                }
            };
            values.insert(def.name.to_string(), value);
        }

        Ok(ParameterSet { values })
    }
}

impl Default for ParameterSchema {
    fn default() -> Self {
        Self::standard()
    }
}

// ── Values ───────────────────────────────────────────────────────────────────

/// A validated, normalized parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Name(String),
    Bool(bool),
    Choice(String),
    List(Vec<String>),
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(s) | Self::Choice(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::List(items) => f.write_str(&items.join(",")),
        }
    }
}

/// Validated, immutable generation input.
///
/// Every catalog parameter is present (defaults filled in); values are
/// normalized (choices lowercase, lists trimmed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParameterSet {
    values: BTreeMap<String, ParameterValue>,
}

impl ParameterSet {
    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.values.get(name)
    }

    /// Boolean value of a flag, `None` if absent or not a bool.
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(ParameterValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ParameterValue::Name(s) | ParameterValue::Choice(s)) => Some(s),
            _ => None,
        }
    }

    pub fn list(&self, name: &str) -> &[String] {
        match self.values.get(name) {
            Some(ParameterValue::List(items)) => items,
            _ => &[],
        }
    }

    pub fn database_engine(&self) -> DatabaseEngine {
        self.text(DATABASE_ENGINE)
            .and_then(|s| s.parse().ok())
            .unwrap_or(DatabaseEngine::None)
    }

    pub fn test_framework(&self) -> TestFramework {
        self.text(TEST_FRAMEWORK)
            .and_then(|s| s.parse().ok())
            .unwrap_or(TestFramework::XUnit)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
