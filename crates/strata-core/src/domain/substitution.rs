//! Token substitution for file contents and output paths.
//!
//! ## Built-in Tokens
//!
//! | Token | Example | Source |
//! |-------|---------|--------|
//! | `{{ORG_NAME}}` | `Acme` | sanitized `orgName` |
//! | `{{PROJECT_NAME}}` | `Billing` | sanitized `name` |
//! | `{{ROOT_NAMESPACE}}` | `Acme.Billing` | both |
//! | `{{ORG_NAME_LOWER}}` | `acme` | computed |
//! | `{{PROJECT_NAME_LOWER}}` | `billing` | computed |
//! | `{{PROJECT_NAME_KEBAB}}` | `billing` | computed |
//! | `{{DATABASE_ENGINE}}` | `postgres` | `databaseEngine` |
//! | `{{TEST_FRAMEWORK}}` | `nunit` | `testFramework` |
//! | `{{USE_API}}` … | `true` | one per boolean parameter |
//! | `{{ITEM}}`, `{{ITEM_LOWER}}` | `Payments` | bound per repeated file |
//!
//! Tokens are replaced in the fixed order above. No value can contain `{{`,
//! so applying a map twice gives the same result as applying it once.

use crate::domain::{
    entities::common::RelativePath,
    error::DomainError,
    naming::{sanitize_identifier, sanitize_type_name, to_kebab_case},
    parameters::{
        NAME, ORG_NAME, PARAMETER_REGISTRY, ParameterKind, ParameterSet, USE_API, USE_SWAGGER,
    },
};

pub const ORG_NAME_TOKEN: &str = "{{ORG_NAME}}";
pub const PROJECT_NAME_TOKEN: &str = "{{PROJECT_NAME}}";
pub const ROOT_NAMESPACE_TOKEN: &str = "{{ROOT_NAMESPACE}}";
pub const ITEM_TOKEN: &str = "{{ITEM}}";
pub const ITEM_LOWER_TOKEN: &str = "{{ITEM_LOWER}}";

/// Deterministic token → value mapping for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionMap {
    entries: Vec<(String, String)>,
}

impl SubstitutionMap {
    /// Derive the map from validated parameters.
    ///
    /// # Errors
    ///
    /// `InvalidName` if `orgName` or `name` sanitize to nothing.
    ///
    /// `orgName` may keep dots as namespace separators; `name` is collapsed
    /// into one identifier because it also appears in type names.
    pub fn build(params: &ParameterSet) -> Result<Self, DomainError> {
        let org = sanitize_identifier(ORG_NAME, params.text(ORG_NAME).unwrap_or_default())?;
        let project = sanitize_type_name(NAME, params.text(NAME).unwrap_or_default())?;

        let mut entries = vec![
            (ORG_NAME_TOKEN.to_string(), org.clone()),
            (PROJECT_NAME_TOKEN.to_string(), project.clone()),
            (ROOT_NAMESPACE_TOKEN.to_string(), format!("{org}.{project}")),
            ("{{ORG_NAME_LOWER}}".to_string(), org.to_lowercase()),
            ("{{PROJECT_NAME_LOWER}}".to_string(), project.to_lowercase()),
            ("{{PROJECT_NAME_KEBAB}}".to_string(), to_kebab_case(&project)),
            (
                "{{DATABASE_ENGINE}}".to_string(),
                params.database_engine().to_string(),
            ),
            (
                "{{TEST_FRAMEWORK}}".to_string(),
                params.test_framework().to_string(),
            ),
        ];

        for def in PARAMETER_REGISTRY
            .iter()
            .filter(|d| d.kind == ParameterKind::Bool)
        {
            let mut enabled = params.flag(def.name).unwrap_or(false);
            if def.name == USE_SWAGGER {
                enabled &= params.flag(USE_API).unwrap_or(false);
            }
            entries.push((bool_token(def.name), enabled.to_string()));
        }

        Ok(Self { entries })
    }

    /// A copy of this map with `{{ITEM}}` / `{{ITEM_LOWER}}` bound.
    pub fn with_item(&self, item: &str) -> Self {
        let mut entries = self.entries.clone();
        entries.push((ITEM_TOKEN.to_string(), item.to_string()));
        entries.push((ITEM_LOWER_TOKEN.to_string(), item.to_lowercase()));
        Self { entries }
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, v)| v.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }

    /// Replace every token in `text`.
    pub fn apply(&self, text: &str) -> String {
        let mut result = text.to_string();
        for (token, value) in &self.entries {
            if result.contains(token.as_str()) {
                result = result.replace(token.as_str(), value);
            }
        }
        result
    }

    /// Substitute an output path.
    ///
    /// # Errors
    ///
    /// Fails if the substituted path is not a valid relative path.
    pub fn apply_path(&self, path: &RelativePath) -> Result<RelativePath, DomainError> {
        RelativePath::try_new(self.apply(&path.to_slash_string()))
    }
}

/// `useHealthChecks` → `{{USE_HEALTH_CHECKS}}`.
pub fn bool_token(parameter: &str) -> String {
    let words = to_kebab_case(parameter).replace('-', "_").to_uppercase();
    format!("{{{{{words}}}}}")
}

/// Every token the engine knows, in substitution order.
pub fn known_tokens() -> Vec<String> {
    let mut tokens: Vec<String> = [
        ORG_NAME_TOKEN,
        PROJECT_NAME_TOKEN,
        ROOT_NAMESPACE_TOKEN,
        "{{ORG_NAME_LOWER}}",
        "{{PROJECT_NAME_LOWER}}",
        "{{PROJECT_NAME_KEBAB}}",
        "{{DATABASE_ENGINE}}",
        "{{TEST_FRAMEWORK}}",
    ]
    .into_iter()
    .map(String::from)
    .collect();

    tokens.extend(
        PARAMETER_REGISTRY
            .iter()
            .filter(|d| d.kind == ParameterKind::Bool)
            .map(|d| bool_token(d.name)),
    );
    tokens.push(ITEM_TOKEN.to_string());
    tokens.push(ITEM_LOWER_TOKEN.to_string());
    tokens
}

/// First known token still present in `text`.
///
/// Unknown `{{...}}` sequences are ignored: C# format strings and
/// interpolations legitimately contain doubled braces.
pub fn find_leftover(text: &str) -> Option<String> {
    if !text.contains("{{") {
        return None;
    }
    known_tokens().into_iter().find(|t| text.contains(t.as_str()))
}

/// Fail with `LeftoverPlaceholder` if a known token survived in `text`.
pub fn ensure_substituted(path: &str, text: &str) -> Result<(), DomainError> {
    match find_leftover(text) {
        Some(token) => Err(DomainError::LeftoverPlaceholder {
            path: path.to_string(),
            token,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parameters::{ParameterSchema, RawParameters};

    fn map(pairs: &[(&str, &str)]) -> SubstitutionMap {
        let raw: RawParameters = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let params = ParameterSchema::standard().validate(&raw).unwrap();
        SubstitutionMap::build(&params).unwrap()
    }

    #[test]
    fn names_and_namespace() {
        let m = map(&[("orgName", "Acme"), ("name", "Billing")]);
        assert_eq!(m.get("{{ORG_NAME}}"), Some("Acme"));
        assert_eq!(m.get("{{PROJECT_NAME}}"), Some("Billing"));
        assert_eq!(m.get("{{ROOT_NAMESPACE}}"), Some("Acme.Billing"));
        assert_eq!(m.get("{{ORG_NAME_LOWER}}"), Some("acme"));
        assert_eq!(m.get("{{PROJECT_NAME_KEBAB}}"), Some("billing"));
    }

    #[test]
    fn names_are_sanitized_before_use() {
        let m = map(&[("orgName", "contoso retail"), ("name", "order-intake")]);
        assert_eq!(m.get("{{ROOT_NAMESPACE}}"), Some("ContosoRetail.OrderIntake"));
        assert_eq!(m.get("{{PROJECT_NAME_KEBAB}}"), Some("order-intake"));
    }

    #[test]
    fn dotted_project_name_becomes_one_identifier() {
        let m = map(&[("orgName", "Contoso.Retail"), ("name", "Billing.Api")]);
        assert_eq!(m.get("{{PROJECT_NAME}}"), Some("BillingApi"));
        assert_eq!(m.get("{{ROOT_NAMESPACE}}"), Some("Contoso.Retail.BillingApi"));
        assert_eq!(m.apply("I{{PROJECT_NAME}}Repository"), "IBillingApiRepository");
    }

    #[test]
    fn empty_name_after_sanitizing_is_invalid() {
        let raw: RawParameters = [("orgName".to_string(), "!!!".to_string())].into();
        let params = ParameterSchema::standard().validate(&raw).unwrap();
        let err = SubstitutionMap::build(&params).unwrap_err();
        assert_eq!(err.code(), "invalid_name");
    }

    #[test]
    fn boolean_tokens() {
        let m = map(&[("orgName", "Acme"), ("useWorkers", "true")]);
        assert_eq!(m.get("{{USE_WORKERS}}"), Some("true"));
        assert_eq!(m.get("{{USE_MESSAGING}}"), Some("false"));
        assert_eq!(m.get("{{USE_HEALTH_CHECKS}}"), Some("true"));
    }

    #[test]
    fn swagger_token_follows_api() {
        let m = map(&[("orgName", "Acme"), ("useApi", "false")]);
        assert_eq!(m.get("{{USE_SWAGGER}}"), Some("false"));
    }

    #[test]
    fn apply_replaces_everywhere() {
        let m = map(&[("orgName", "Acme"), ("name", "Billing")]);
        let text = "namespace {{ROOT_NAMESPACE}}.Domain;\n// {{ORG_NAME}} {{ORG_NAME}}";
        assert_eq!(m.apply(text), "namespace Acme.Billing.Domain;\n// Acme Acme");
    }

    #[test]
    fn apply_is_idempotent() {
        let m = map(&[("orgName", "Acme"), ("name", "Billing")]).with_item("Payments");
        let text = "{{ROOT_NAMESPACE}}.Clients.{{ITEM}} {{ITEM_LOWER}} {{USE_API}}";
        let once = m.apply(text);
        assert_eq!(m.apply(&once), once);
        assert_eq!(find_leftover(&once), None);
    }

    #[test]
    fn paths_are_substituted() {
        let m = map(&[("orgName", "Acme"), ("name", "Billing")]).with_item("Payments");
        let path = RelativePath::try_new("src/{{ROOT_NAMESPACE}}.Infrastructure/Clients/{{ITEM}}/{{ITEM}}Client.cs").unwrap();
        assert_eq!(
            m.apply_path(&path).unwrap().to_string(),
            "src/Acme.Billing.Infrastructure/Clients/Payments/PaymentsClient.cs"
        );
    }

    #[test]
    fn unbound_item_is_a_leftover() {
        let m = map(&[("orgName", "Acme")]);
        let out = m.apply("class {{ITEM}}Client {}");
        let err = ensure_substituted("Client.cs", &out).unwrap_err();
        assert_eq!(
            err,
            DomainError::LeftoverPlaceholder {
                path: "Client.cs".into(),
                token: "{{ITEM}}".into()
            }
        );
    }

    #[test]
    fn unknown_braces_are_not_leftovers() {
        assert_eq!(find_leftover("$\"{{ \\\"status\\\": {code} }}\""), None);
        assert_eq!(find_leftover("{{SOMETHING_ELSE}}"), None);
    }

    #[test]
    fn bool_token_spelling() {
        assert_eq!(bool_token("useApi"), "{{USE_API}}");
        assert_eq!(bool_token("useHealthChecks"), "{{USE_HEALTH_CHECKS}}");
    }

    #[test]
    fn every_value_is_token_free() {
        let m = map(&[("orgName", "Acme"), ("name", "Billing")]).with_item("X");
        assert!(m.entries().all(|(_, v)| !v.contains("{{")));
        assert_eq!(known_tokens().len(), m.entries().count());
    }
}
