// ============================================================================
// domain/rules.rs - CONDITIONAL INCLUSION ENGINE
// ============================================================================

//! File rules and the inclusion decision.
//!
//! ## Semantics
//!
//! - A rule governs its own path and every path beneath it.
//! - A template path is included iff **every** governing rule evaluates true.
//!   Paths without a governing rule are always included.
//! - Conjunction is commutative, so the order rules are declared in never
//!   changes the result.
//! - A rule may also move its subtree (`rename`) or emit it once per entry
//!   of a list parameter (`repeat`). At most one of each may govern a path.

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::common::RelativePath,
    error::DomainError,
    parameters::{ParameterKind, ParameterSchema, ParameterSet},
    predicate::Predicate,
};

/// A rule as declared by a template author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRule {
    /// Template path (file or directory) this rule governs.
    pub path: String,

    #[serde(default)]
    pub when: Predicate,

    /// Replacement for the `path` prefix in the output tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rename: Option<String>,

    /// List parameter to iterate; `{{ITEM}}` is bound per entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<String>,
}

impl FileRule {
    pub fn new(path: impl Into<String>, when: Predicate) -> Self {
        Self {
            path: path.into(),
            when,
            rename: None,
            repeat: None,
        }
    }

    pub fn rename_to(mut self, output: impl Into<String>) -> Self {
        self.rename = Some(output.into());
        self
    }

    pub fn repeat_over(mut self, list_parameter: impl Into<String>) -> Self {
        self.repeat = Some(list_parameter.into());
        self
    }
}

/// A rule checked against the schema and the template's paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRule {
    pub path: RelativePath,
    pub when: Predicate,
    pub rename: Option<RelativePath>,
    pub repeat: Option<String>,
}

impl CompiledRule {
    pub fn governs(&self, path: &RelativePath) -> bool {
        path.is_within(&self.path)
    }
}

/// One file the generator must emit, before substitution.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Inclusion {
    /// Path inside the template.
    pub source: RelativePath,
    /// Output path, still containing tokens.
    pub output: RelativePath,
    /// Bound `{{ITEM}}` value for repeated files.
    pub item: Option<String>,
}

/// Validated rules of one template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    /// Validate declared rules against the schema and the template paths.
    ///
    /// # Errors
    ///
    /// `InvalidRule` when a rule:
    /// - references an unknown parameter, the wrong kind, or a foreign enum value
    /// - repeats over a non-list parameter
    /// - governs no template path
    /// - overlaps another renaming or repeating rule on the same path
    pub fn compile(
        rules: Vec<FileRule>,
        schema: &ParameterSchema,
        paths: &[RelativePath],
    ) -> Result<Self, DomainError> {
        let mut compiled = Vec::with_capacity(rules.len());

        for rule in rules {
            let invalid = |reason: String| DomainError::InvalidRule {
                path: rule.path.clone(),
                reason,
            };

            let path = RelativePath::try_new(&rule.path).map_err(|e| invalid(e.to_string()))?;
            let when = rule.when.clone().canonicalize(schema).map_err(invalid)?;

            let rename = rule
                .rename
                .as_deref()
                .map(RelativePath::try_new)
                .transpose()
                .map_err(|e| invalid(format!("bad rename target: {e}")))?;

            let repeat = match rule.repeat.as_deref() {
                None => None,
                Some(name) => {
                    let def = schema
                        .find(name)
                        .ok_or_else(|| invalid(format!("unknown parameter '{name}'")))?;
                    if def.kind != ParameterKind::List {
                        return Err(invalid(format!(
                            "repeat needs a list parameter, '{}' is {}",
                            def.name,
                            def.kind.label()
                        )));
                    }
                    Some(def.name.to_string())
                }
            };

            if !paths.iter().any(|p| p.is_within(&path)) {
                return Err(invalid("matches no file in the template".into()));
            }

            compiled.push(CompiledRule {
                path,
                when,
                rename,
                repeat,
            });
        }

        let set = Self { rules: compiled };
        set.check_overlaps(paths)?;
        Ok(set)
    }

    fn check_overlaps(&self, paths: &[RelativePath]) -> Result<(), DomainError> {
        for path in paths {
            let renames = self.governing(path).filter(|r| r.rename.is_some()).count();
            let repeats = self.governing(path).filter(|r| r.repeat.is_some()).count();

            let reason = match (renames > 1, repeats > 1) {
                (true, _) => "governed by more than one renaming rule",
                (_, true) => "governed by more than one repeating rule",
                _ => continue,
            };
            return Err(DomainError::InvalidRule {
                path: path.to_string(),
                reason: reason.into(),
            });
        }
        Ok(())
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules whose path is `path` or one of its ancestors.
    pub fn governing<'a>(
        &'a self,
        path: &'a RelativePath,
    ) -> impl Iterator<Item = &'a CompiledRule> + 'a {
        self.rules.iter().filter(move |r| r.governs(path))
    }

    /// Inclusion decision for a single template path.
    pub fn includes(&self, path: &RelativePath, params: &ParameterSet) -> bool {
        self.governing(path).all(|r| r.when.evaluate(params))
    }

    /// Decide which template paths are emitted and where.
    ///
    /// The result is sorted, so equal inputs always produce equal output
    /// regardless of the order of `paths` or of the rules.
    pub fn resolve<'a>(
        &self,
        paths: impl IntoIterator<Item = &'a RelativePath>,
        params: &ParameterSet,
    ) -> Vec<Inclusion> {
        let mut included = Vec::new();

        for source in paths {
            if !self.includes(source, params) {
                continue;
            }

            let output = self
                .governing(source)
                .find_map(|r| {
                    r.rename
                        .as_ref()
                        .and_then(|target| source.replace_prefix(&r.path, target))
                })
                .unwrap_or_else(|| source.clone());

            match self.governing(source).find_map(|r| r.repeat.as_deref()) {
                Some(list) => {
                    for item in params.list(list) {
                        included.push(Inclusion {
                            source: source.clone(),
                            output: output.clone(),
                            item: Some(item.clone()),
                        });
                    }
                }
                None => included.push(Inclusion {
                    source: source.clone(),
                    output,
                    item: None,
                }),
            }
        }

        included.sort();
        included
    }
}
