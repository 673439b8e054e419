//! Template aggregate: files plus the rules that decide which of them are
//! emitted for a given parameter set.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Template (Aggregate Root)                                  │
//! │  ├── TemplateId          name@version                       │
//! │  ├── TemplateMetadata    human-readable info                │
//! │  ├── Vec<TemplateFile>   what can be emitted                │
//! │  │    └── path (may contain tokens), content, permissions   │
//! │  └── RuleSet             when / where it is emitted         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `Template` is only ever constructed through [`TemplateBuilder::build`],
//! which compiles the rules against the parameter schema. Holding a
//! `Template` therefore means its rules reference real parameters and real
//! paths.

use std::collections::HashSet;
use std::fmt;

use crate::domain::{
    entities::common::{Permissions, RelativePath},
    error::DomainError,
    parameters::ParameterSchema,
    rules::{FileRule, RuleSet},
};

// ============================================================================
// Template Identity
// ============================================================================

/// Template identifier, displayed as `name@version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateId {
    name: String,
    version: String,
}

impl TemplateId {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Parse from `name@version`.
    ///
    /// # Errors
    ///
    /// `InvalidTemplate` if there is not exactly one `@`.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.split_once('@') {
            Some((name, version)) if !version.contains('@') => Ok(Self::new(name, version)),
            _ => Err(DomainError::InvalidTemplate(format!(
                "Invalid template ID format: {s}. Expected 'name@version'"
            ))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

// ============================================================================
// Template Metadata
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMetadata {
    /// Display name shown by `strata params` and in reports.
    pub name: String,
    pub description: String,
    pub author: String,
    pub tags: Vec<String>,
}

impl TemplateMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            author: "Strata".to_string(),
            tags: Vec::new(),
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

// ============================================================================
// Files and Content
// ============================================================================

/// One file inside the template.
#[derive(Debug, Clone)]
pub struct TemplateFile {
    /// Template path; may contain tokens such as `{{ROOT_NAMESPACE}}`.
    pub path: RelativePath,
    pub content: TemplateContent,
    pub permissions: Permissions,
}

impl TemplateFile {
    /// Content is classified automatically: text containing `{{` is
    /// parameterized, anything else is copied verbatim.
    pub fn new(path: RelativePath, content: impl Into<ContentSource>) -> Self {
        let source = content.into();
        let content = if source.contains_placeholder() {
            TemplateContent::Parameterized(source)
        } else {
            TemplateContent::Literal(source)
        };
        Self {
            path,
            content,
            permissions: Permissions::read_write(),
        }
    }

    pub fn with_content(mut self, content: TemplateContent) -> Self {
        self.content = content;
        self
    }

    pub fn executable(mut self) -> Self {
        self.permissions = Permissions::executable();
        self
    }
}

/// How a file's content is treated during generation.
#[derive(Debug, Clone)]
pub enum TemplateContent {
    /// Copied as-is; no substitution, no leftover check.
    Literal(ContentSource),
    /// Tokens are substituted and the result must be token-free.
    Parameterized(ContentSource),
}

impl TemplateContent {
    pub fn source(&self) -> &ContentSource {
        match self {
            Self::Literal(s) | Self::Parameterized(s) => s,
        }
    }

    pub fn is_parameterized(&self) -> bool {
        matches!(self, Self::Parameterized(_))
    }
}

/// Content storage: compiled-in text or text loaded at runtime.
#[derive(Debug, Clone)]
pub enum ContentSource {
    Static(&'static str),
    Owned(String),
}

impl From<&'static str> for ContentSource {
    fn from(s: &'static str) -> Self {
        Self::Static(s)
    }
}

impl From<String> for ContentSource {
    fn from(s: String) -> Self {
        Self::Owned(s)
    }
}

impl ContentSource {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Static(s) => s,
            Self::Owned(s) => s,
        }
    }

    pub fn contains_placeholder(&self) -> bool {
        self.as_str().contains("{{")
    }
}

// ============================================================================
// Core Template Aggregate
// ============================================================================

/// A validated template.
///
/// ## Invariants (checked by [`TemplateBuilder::build`])
///
/// 1. `id.name` is non-empty and contains no `@`
/// 2. `metadata.name` is non-empty
/// 3. there is at least one file
/// 4. file paths are unique
/// 5. every rule is valid against the parameter schema and matches a file
#[derive(Debug, Clone)]
pub struct Template {
    pub id: TemplateId,
    pub metadata: TemplateMetadata,
    pub files: Vec<TemplateFile>,
    pub rules: RuleSet,
}

impl Template {
    pub fn builder() -> TemplateBuilder {
        TemplateBuilder::default()
    }

    pub fn file(&self, path: &RelativePath) -> Option<&TemplateFile> {
        self.files.iter().find(|f| &f.path == path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &RelativePath> {
        self.files.iter().map(|f| &f.path)
    }
}

/// Builder for [`Template`]; validation happens in [`build`](Self::build).
#[derive(Debug, Default)]
pub struct TemplateBuilder {
    id: Option<TemplateId>,
    metadata: Option<TemplateMetadata>,
    files: Vec<TemplateFile>,
    rules: Vec<FileRule>,
}

impl TemplateBuilder {
    pub fn id(mut self, id: TemplateId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn metadata(mut self, metadata: TemplateMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn add_file(mut self, file: TemplateFile) -> Self {
        self.files.push(file);
        self
    }

    pub fn files(mut self, files: impl IntoIterator<Item = TemplateFile>) -> Self {
        self.files.extend(files);
        self
    }

    pub fn rule(mut self, rule: FileRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = FileRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Consume the builder and produce a validated template.
    ///
    /// # Errors
    ///
    /// - `InvalidTemplate` for a missing/malformed id or metadata
    /// - `EmptyTemplate` if there are no files
    /// - `DuplicatePath` if two files share a path
    /// - `InvalidRule` from rule compilation
    pub fn build(self, schema: &ParameterSchema) -> Result<Template, DomainError> {
        let id = self
            .id
            .ok_or_else(|| DomainError::InvalidTemplate("template id is required".into()))?;
        if id.name().is_empty() || id.name().contains('@') {
            return Err(DomainError::InvalidTemplate(format!(
                "invalid template name '{}'",
                id.name()
            )));
        }

        let metadata = self
            .metadata
            .ok_or_else(|| DomainError::InvalidTemplate("template metadata is required".into()))?;
        if metadata.name.is_empty() {
            return Err(DomainError::InvalidTemplate(
                "Metadata name cannot be empty".into(),
            ));
        }

        if self.files.is_empty() {
            return Err(DomainError::EmptyTemplate {
                template_id: id.to_string(),
            });
        }

        let mut seen = HashSet::new();
        for file in &self.files {
            if !seen.insert(&file.path) {
                return Err(DomainError::DuplicatePath {
                    path: file.path.to_string(),
                });
            }
        }

        let paths: Vec<RelativePath> = self.files.iter().map(|f| f.path.clone()).collect();
        let rules = RuleSet::compile(self.rules, schema, &paths)?;

        Ok(Template {
            id,
            metadata,
            files: self.files,
            rules,
        })
    }
}
