// ============================================================================
// domain/error.rs - GENERATION ERROR DOMAIN
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (harness reports keep a copy per scenario)
/// - Categorizable (for CLI display and exit codes)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ========================================================================
    // Parameter Errors (reject the whole request before any output)
    // ========================================================================
    #[error("unknown parameter '{name}'")]
    UnknownParameter { name: String },

    #[error("invalid value '{value}' for parameter '{name}': {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },

    #[error("required parameter '{name}' is missing")]
    MissingRequiredParameter { name: String },

    #[error("'{value}' is not usable as a name for '{parameter}': nothing is left after sanitizing")]
    InvalidName { parameter: String, value: String },

    // ========================================================================
    // Generation Errors (abort before anything is written)
    // ========================================================================
    #[error("output path '{path}' is produced by both '{first}' and '{second}'")]
    PathCollision {
        path: String,
        first: String,
        second: String,
    },

    #[error("placeholder '{token}' survived substitution in '{path}'")]
    LeftoverPlaceholder { path: String, token: String },

    // ========================================================================
    // Template Errors (the template itself is broken)
    // ========================================================================
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Template '{template_id}' has no content")]
    EmptyTemplate { template_id: String },

    #[error("Duplicate path in template: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("invalid rule for '{path}': {reason}")]
    InvalidRule { path: String, reason: String },

    // ========================================================================
    // Scenario Errors
    // ========================================================================
    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),
}

impl DomainError {
    /// Stable machine-readable code.
    ///
    /// Scenario files match expected rejections against these codes, so they
    /// must never change once published.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnknownParameter { .. } => "unknown_parameter",
            Self::InvalidValue { .. } => "invalid_value",
            Self::MissingRequiredParameter { .. } => "missing_required_parameter",
            Self::InvalidName { .. } => "invalid_name",
            Self::PathCollision { .. } => "path_collision",
            Self::LeftoverPlaceholder { .. } => "leftover_placeholder",
            Self::InvalidTemplate(_)
            | Self::EmptyTemplate { .. }
            | Self::DuplicatePath { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::InvalidRule { .. } => "invalid_template",
            Self::InvalidScenario(_) => "invalid_scenario",
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownParameter { name } => vec![
                format!("'{}' is not a recognized parameter", name),
                "Try: strata params".into(),
            ],
            Self::InvalidValue { name, reason, .. } => vec![
                format!("Fix the value of '{}': {}", name, reason),
                "Try: strata params to see allowed values".into(),
            ],
            Self::MissingRequiredParameter { name } => vec![
                format!("Pass --{} <value>", name),
                "Or set it in your configuration defaults".into(),
            ],
            Self::InvalidName { parameter, .. } => vec![
                format!("'{}' must contain at least one letter or digit", parameter),
                "Examples: Acme, Contoso.Retail, Billing".into(),
            ],
            Self::PathCollision { path, .. } => vec![
                format!("Two template files resolve to '{}'", path),
                "Check list parameters for duplicate entries".into(),
                "Check template rules for overlapping renames".into(),
            ],
            Self::LeftoverPlaceholder { token, .. } => vec![
                format!("The template uses '{}' where no value is available", token),
                "This is a template defect; report it to the template author".into(),
            ],
            Self::EmptyTemplate { template_id } => vec![
                format!("Template '{}' is corrupted", template_id),
                "Please report this issue or use a different template".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownParameter { .. }
            | Self::InvalidValue { .. }
            | Self::MissingRequiredParameter { .. }
            | Self::InvalidName { .. }
            | Self::InvalidScenario(_) => ErrorCategory::Validation,
            Self::PathCollision { .. } => ErrorCategory::Collision,
            Self::InvalidTemplate(_)
            | Self::EmptyTemplate { .. }
            | Self::DuplicatePath { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::InvalidRule { .. } => ErrorCategory::Template,
            Self::LeftoverPlaceholder { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Collision,
    Template,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_errors_are_validation() {
        let err = DomainError::InvalidValue {
            name: "databaseEngine".into(),
            value: "oracle".into(),
            reason: "expected one of none, sqlserver, postgres, cassandra".into(),
        };
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.code(), "invalid_value");
        assert!(err.to_string().contains("oracle"));
        assert!(err.to_string().contains("databaseEngine"));
    }

    #[test]
    fn collision_has_its_own_category() {
        let err = DomainError::PathCollision {
            path: "a".into(),
            first: "x".into(),
            second: "y".into(),
        };
        assert_eq!(err.category(), ErrorCategory::Collision);
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn missing_parameter_suggests_flag() {
        let err = DomainError::MissingRequiredParameter {
            name: "orgName".into(),
        };
        assert!(err.suggestions().iter().any(|s| s.contains("--orgName")));
    }
}
