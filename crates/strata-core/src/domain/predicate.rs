//! Boolean conditions over a [`ParameterSet`].
//!
//! Predicates are the only way a template expresses dependencies between
//! parameters. There is no inference: `useSwagger` depends on `useApi` only
//! because a rule says `all = [{ flag = "useApi" }, { flag = "useSwagger" }]`.
//!
//! In `template.toml` predicates are written as externally tagged values:
//!
//! ```toml
//! when = "always"
//! when = { flag = "useApi" }
//! when = { not = { flag = "useApi" } }
//! when = { equals = { param = "databaseEngine", value = "postgres" } }
//! when = { any_of = { param = "databaseEngine", values = ["sqlserver", "postgres"] } }
//! when = { non_empty = "externalApiClients" }
//! when = { all = [{ flag = "useApi" }, { flag = "useSwagger" }] }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::parameters::{ParameterKind, ParameterSchema, ParameterSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    Always,
    Flag(String),
    Not(Box<Predicate>),
    Equals { param: String, value: String },
    NotEquals { param: String, value: String },
    AnyOf { param: String, values: Vec<String> },
    NonEmpty(String),
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
}

impl Predicate {
    pub fn flag(param: impl Into<String>) -> Self {
        Self::Flag(param.into())
    }

    pub fn equals(param: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Equals {
            param: param.into(),
            value: value.into(),
        }
    }

    pub fn non_empty(param: impl Into<String>) -> Self {
        Self::NonEmpty(param.into())
    }

    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    pub fn and(self, other: Predicate) -> Self {
        match self {
            Self::All(mut parts) => {
                parts.push(other);
                Self::All(parts)
            }
            first => Self::All(vec![first, other]),
        }
    }

    /// Evaluate against validated parameters.
    ///
    /// Pure and total: a parameter missing from the set reads as `false`
    /// / empty, which cannot happen once the predicate has been
    /// [`canonicalize`](Self::canonicalize)d against the same schema.
    pub fn evaluate(&self, params: &ParameterSet) -> bool {
        match self {
            Self::Always => true,
            Self::Flag(name) => params.flag(name).unwrap_or(false),
            Self::Not(inner) => !inner.evaluate(params),
            Self::Equals { param, value } => params.text(param) == Some(value.as_str()),
            Self::NotEquals { param, value } => params.text(param) != Some(value.as_str()),
            Self::AnyOf { param, values } => params
                .text(param)
                .is_some_and(|actual| values.iter().any(|v| v == actual)),
            Self::NonEmpty(name) => !params.list(name).is_empty(),
            Self::All(parts) => parts.iter().all(|p| p.evaluate(params)),
            Self::Any(parts) => parts.iter().any(|p| p.evaluate(params)),
        }
    }

    /// Check the predicate against the schema and rewrite parameter names
    /// and enum values into their canonical spelling.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when a parameter is unknown, has the
    /// wrong kind for the operator, or an enum value is outside the allowed
    /// set.
    pub fn canonicalize(self, schema: &ParameterSchema) -> Result<Self, String> {
        let lookup = |name: &str| {
            schema
                .find(name)
                .ok_or_else(|| format!("unknown parameter '{name}'"))
        };

        let canonical_value = |param: &str, value: &str| -> Result<(String, String), String> {
            let def = lookup(param)?;
            match def.kind {
                ParameterKind::Choice(allowed) => allowed
                    .iter()
                    .find(|a| a.eq_ignore_ascii_case(value))
                    .map(|a| (def.name.to_string(), (*a).to_string()))
                    .ok_or_else(|| {
                        format!(
                            "'{value}' is not an allowed value of '{}' ({})",
                            def.name,
                            allowed.join(", ")
                        )
                    }),
                ParameterKind::Name => Ok((def.name.to_string(), value.to_string())),
                other => Err(format!(
                    "'{}' is a {} parameter and cannot be compared to a value",
                    def.name,
                    other.label()
                )),
            }
        };

        Ok(match self {
            Self::Always => Self::Always,
            Self::Flag(name) => {
                let def = lookup(&name)?;
                if def.kind != ParameterKind::Bool {
                    return Err(format!("'{}' is not a boolean parameter", def.name));
                }
                Self::Flag(def.name.to_string())
            }
            Self::Not(inner) => Self::Not(Box::new(inner.canonicalize(schema)?)),
            Self::Equals { param, value } => {
                let (param, value) = canonical_value(&param, &value)?;
                Self::Equals { param, value }
            }
            Self::NotEquals { param, value } => {
                let (param, value) = canonical_value(&param, &value)?;
                Self::NotEquals { param, value }
            }
            Self::AnyOf { param, values } => {
                if values.is_empty() {
                    return Err(format!("any_of over '{param}' needs at least one value"));
                }
                let mut canonical = Vec::with_capacity(values.len());
                let mut name = param.clone();
                for value in &values {
                    let (p, v) = canonical_value(&param, value)?;
                    name = p;
                    canonical.push(v);
                }
                Self::AnyOf {
                    param: name,
                    values: canonical,
                }
            }
            Self::NonEmpty(name) => {
                let def = lookup(&name)?;
                if def.kind != ParameterKind::List {
                    return Err(format!("'{}' is not a list parameter", def.name));
                }
                Self::NonEmpty(def.name.to_string())
            }
            Self::All(parts) => Self::All(
                parts
                    .into_iter()
                    .map(|p| p.canonicalize(schema))
                    .collect::<Result<_, _>>()?,
            ),
            Self::Any(parts) => Self::Any(
                parts
                    .into_iter()
                    .map(|p| p.canonicalize(schema))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }
}

impl Default for Predicate {
    fn default() -> Self {
        Self::Always
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, parts: &[Predicate], op: &str) -> fmt::Result {
            f.write_str("(")?;
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    write!(f, " {op} ")?;
                }
                write!(f, "{part}")?;
            }
            f.write_str(")")
        }

        match self {
            Self::Always => f.write_str("always"),
            Self::Flag(name) => f.write_str(name),
            Self::Not(inner) => write!(f, "!{inner}"),
            Self::Equals { param, value } => write!(f, "{param} == {value}"),
            Self::NotEquals { param, value } => write!(f, "{param} != {value}"),
            Self::AnyOf { param, values } => write!(f, "{param} in [{}]", values.join(", ")),
            Self::NonEmpty(name) => write!(f, "nonEmpty({name})"),
            Self::All(parts) => join(f, parts, "&&"),
            Self::Any(parts) => join(f, parts, "||"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parameters::RawParameters;

    fn params(pairs: &[(&str, &str)]) -> ParameterSet {
        let mut raw: RawParameters = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        raw.entry("orgName".into()).or_insert_with(|| "Acme".into());
        ParameterSchema::standard().validate(&raw).unwrap()
    }

    #[test]
    fn flag_follows_the_parameter() {
        let p = Predicate::flag("useApi");
        assert!(p.evaluate(&params(&[])));
        assert!(!p.evaluate(&params(&[("useApi", "false")])));
        assert!(p.clone().negate().evaluate(&params(&[("useApi", "false")])));
    }

    #[test]
    fn conjunction_requires_both() {
        let swagger = Predicate::flag("useApi").and(Predicate::flag("useSwagger"));
        assert!(swagger.evaluate(&params(&[])));
        assert!(!swagger.evaluate(&params(&[("useApi", "false")])));
        assert!(!swagger.evaluate(&params(&[("useSwagger", "false")])));
    }

    #[test]
    fn enum_comparisons() {
        let pg = Predicate::equals("databaseEngine", "postgres");
        assert!(pg.evaluate(&params(&[("databaseEngine", "Postgres")])));
        assert!(!pg.evaluate(&params(&[])));

        let relational = Predicate::AnyOf {
            param: "databaseEngine".into(),
            values: vec!["sqlserver".into(), "postgres".into()],
        };
        assert!(relational.evaluate(&params(&[("databaseEngine", "sqlserver")])));
        assert!(!relational.evaluate(&params(&[("databaseEngine", "cassandra")])));

        let any_db = Predicate::NotEquals {
            param: "databaseEngine".into(),
            value: "none".into(),
        };
        assert!(!any_db.evaluate(&params(&[])));
    }

    #[test]
    fn non_empty_lists() {
        let p = Predicate::non_empty("externalApiClients");
        assert!(!p.evaluate(&params(&[])));
        assert!(p.evaluate(&params(&[("externalApiClients", "Payments")])));
    }

    #[test]
    fn canonicalize_fixes_spelling() {
        let schema = ParameterSchema::standard();
        let p = Predicate::equals("DATABASEENGINE", "PostGres")
            .canonicalize(&schema)
            .unwrap();
        assert_eq!(p, Predicate::equals("databaseEngine", "postgres"));
    }

    #[test]
    fn canonicalize_rejects_bad_references() {
        let schema = ParameterSchema::standard();

        let err = Predicate::flag("useGraphQl").canonicalize(&schema).unwrap_err();
        assert!(err.contains("unknown parameter"));

        let err = Predicate::flag("databaseEngine").canonicalize(&schema).unwrap_err();
        assert!(err.contains("not a boolean"));

        let err = Predicate::equals("databaseEngine", "oracle")
            .canonicalize(&schema)
            .unwrap_err();
        assert!(err.contains("oracle"));

        let err = Predicate::non_empty("useApi").canonicalize(&schema).unwrap_err();
        assert!(err.contains("not a list"));

        let nested = Predicate::flag("useApi").and(Predicate::flag("nope"));
        assert!(nested.canonicalize(&schema).is_err());
    }

    #[test]
    fn display_is_readable() {
        let p = Predicate::flag("useApi").and(Predicate::equals("databaseEngine", "postgres").negate());
        assert_eq!(p.to_string(), "(useApi && !databaseEngine == postgres)");
    }

    #[test]
    fn deserializes_from_toml_shapes() {
        #[derive(Deserialize)]
        struct Rule {
            when: Predicate,
        }

        let rule: Rule = from_json(r#"{"when": {"all": [{"flag": "useApi"}, {"flag": "useSwagger"}]}}"#);
        assert_eq!(
            rule.when,
            Predicate::flag("useApi").and(Predicate::flag("useSwagger"))
        );

        let rule: Rule = from_json(r#"{"when": "always"}"#);
        assert_eq!(rule.when, Predicate::Always);

        let rule: Rule =
            from_json(r#"{"when": {"equals": {"param": "testFramework", "value": "nunit"}}}"#);
        assert_eq!(rule.when, Predicate::equals("testFramework", "nunit"));
    }

    fn from_json<T: serde::de::DeserializeOwned>(json: &str) -> T {
        serde_json::from_str(json).unwrap()
    }
}
