//! Template root on disk.
//!
//! A template directory holds a `template.toml` manifest next to the files
//! it can emit. Paths and file contents may carry `{{TOKEN}}` placeholders.
//!
//! # Directory layout expected
//!
//! ```text
//! onion/
//! ├── template.toml                          ← manifest (required)
//! ├── {{ROOT_NAMESPACE}}.sln
//! └── src/
//!     └── {{ROOT_NAMESPACE}}.Api/
//!         └── Controllers/
//!             └── HealthController.cs
//! ```
//!
//! # `template.toml` format
//!
//! ```toml
//! [template]
//! id      = "onion"
//! version = "1.0.0"
//!
//! [metadata]
//! name        = "Onion solution"
//! description = "Five-layer .NET solution"   # optional
//! author      = "Acme"                       # optional
//! tags        = ["dotnet"]                   # optional
//!
//! # Optional per-file overrides. Files not listed are auto-detected:
//! # content containing {{ is parameterized, everything else is literal.
//! [[files]]
//! path       = "build.sh"
//! type       = "literal"      # literal | parameterized
//! executable = true
//!
//! [[rules]]
//! path = "src/{{ROOT_NAMESPACE}}.Api/Controllers"
//! when = { flag = "useApi" }
//!
//! [[rules]]
//! path   = "src/{{ROOT_NAMESPACE}}.Infrastructure/Clients/_item"
//! rename = "src/{{ROOT_NAMESPACE}}.Infrastructure/Clients/{{ITEM}}"
//! repeat = "externalApiClients"
//! ```

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use strata_core::{
    application::{ApplicationError, ports::TemplateSource},
    domain::{
        ContentSource, FileRule, ParameterSchema, RelativePath, Template, TemplateContent,
        TemplateFile, TemplateId, TemplateMetadata,
    },
    error::{StrataError, StrataResult},
};

/// Name of the manifest file at the template root.
pub const MANIFEST_FILE: &str = "template.toml";

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised representation of a `template.toml` file.
#[derive(Debug, Deserialize, Clone)]
pub struct TemplateManifest {
    pub template: TemplateSection,
    pub metadata: MetadataSection,
    #[serde(default)]
    pub files: Vec<FileEntry>,
    #[serde(default)]
    pub rules: Vec<FileRule>,
}

/// `[template]` section — identity of the template.
#[derive(Debug, Deserialize, Clone)]
pub struct TemplateSection {
    pub id: String,
    pub version: String,
}

/// `[metadata]` section — human-facing information about the template.
#[derive(Debug, Deserialize, Clone)]
pub struct MetadataSection {
    pub name: String,
    pub description: Option<String>,
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One entry under `[[files]]`.
#[derive(Debug, Deserialize, Clone)]
pub struct FileEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub file_type: Option<FileType>,
    #[serde(default)]
    pub executable: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Copied verbatim.
    Literal,
    /// `{{TOKEN}}` placeholders are substituted.
    Parameterized,
}

// ── Source ────────────────────────────────────────────────────────────────────

/// Loads one [`Template`] from an explicit directory.
#[derive(Debug, Clone)]
pub struct DirectoryTemplateSource {
    root: PathBuf,
}

impl DirectoryTemplateSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn load_error(&self, reason: impl Into<String>) -> StrataError {
        ApplicationError::TemplateLoad {
            source_name: self.describe(),
            reason: reason.into(),
        }
        .into()
    }

    fn read_manifest(&self) -> StrataResult<TemplateManifest> {
        let manifest_path = self.root.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Err(self.load_error(format!("missing {MANIFEST_FILE}")));
        }

        let raw = fs::read_to_string(&manifest_path)
            .map_err(|e| self.load_error(format!("failed to read {MANIFEST_FILE}: {e}")))?;

        toml::from_str(&raw)
            .map_err(|e| self.load_error(format!("failed to parse {MANIFEST_FILE}: {e}")))
    }

    /// Walk the template root, returning every file except the manifest,
    /// sorted by path.
    fn read_files(&self, manifest: &TemplateManifest) -> StrataResult<Vec<TemplateFile>> {
        let overrides: HashMap<RelativePath, &FileEntry> = manifest
            .files
            .iter()
            .map(|entry| Ok((RelativePath::try_new(&entry.path)?, entry)))
            .collect::<StrataResult<_>>()?;

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| self.load_error(format!("directory walk error: {e}")))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let rel = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(|e| self.load_error(e.to_string()))?;
            if rel == Path::new(MANIFEST_FILE) {
                continue;
            }

            let path = RelativePath::try_new(rel.to_string_lossy())?;
            let text = fs::read_to_string(entry.path())
                .map_err(|e| self.load_error(format!("failed to read '{path}': {e}")))?;

            let mut file = TemplateFile::new(path.clone(), ContentSource::from(text));
            if let Some(entry) = overrides.get(&path) {
                file = apply_override(file, entry);
            }
            files.push(file);
        }

        for path in overrides.keys() {
            if !files.iter().any(|f| &f.path == path) {
                return Err(self.load_error(format!(
                    "[[files]] entry '{path}' does not match any file"
                )));
            }
        }

        Ok(files)
    }
}

fn apply_override(file: TemplateFile, entry: &FileEntry) -> TemplateFile {
    let source = file.content.source().clone();
    let mut file = match entry.file_type {
        Some(FileType::Literal) => file.with_content(TemplateContent::Literal(source)),
        Some(FileType::Parameterized) => file.with_content(TemplateContent::Parameterized(source)),
        None => file,
    };
    if entry.executable {
        file = file.executable();
    }
    file
}

impl TemplateSource for DirectoryTemplateSource {
    #[instrument(skip_all, fields(root = %self.root.display()))]
    fn load(&self, schema: &ParameterSchema) -> StrataResult<Template> {
        let manifest = self.read_manifest()?;
        let files = self.read_files(&manifest)?;
        debug!(files = files.len(), rules = manifest.rules.len(), "Read template directory");

        let metadata = TemplateMetadata::new(manifest.metadata.name)
            .description(manifest.metadata.description.unwrap_or_default())
            .author(manifest.metadata.author.unwrap_or_else(|| "Strata".into()))
            .tags(manifest.metadata.tags);

        Ok(Template::builder()
            .id(TemplateId::new(manifest.template.id, manifest.template.version))
            .metadata(metadata)
            .files(files)
            .rules(manifest.rules)
            .build(schema)?)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::domain::{DomainError, Predicate};
    use tempfile::TempDir;

    const MANIFEST: &str = r#"
[template]
id      = "mini"
version = "1.2.0"

[metadata]
name = "Mini"
tags = ["dotnet"]

[[files]]
path       = "build.sh"
type       = "literal"
executable = true

[[rules]]
path = "src/{{ROOT_NAMESPACE}}.Api/Controllers"
when = { flag = "useApi" }

[[rules]]
path = "src/{{ROOT_NAMESPACE}}.Infrastructure"
when = { any_of = { param = "databaseEngine", values = ["postgres", "sqlserver"] } }
"#;

    fn template_dir(manifest: &str, files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(MANIFEST_FILE), manifest).unwrap();
        for (rel, content) in files {
            let full = temp.path().join(rel);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        temp
    }

    fn files() -> Vec<(&'static str, &'static str)> {
        vec![
            ("{{ROOT_NAMESPACE}}.sln", "Solution {{ROOT_NAMESPACE}}"),
            ("build.sh", "echo {{ROOT_NAMESPACE}}"),
            ("src/{{ROOT_NAMESPACE}}.Api/Controllers/HealthController.cs", "class C {}"),
            ("src/{{ROOT_NAMESPACE}}.Infrastructure/Db.cs", "class Db {}"),
        ]
    }

    #[test]
    fn loads_manifest_files_and_rules() {
        let dir = template_dir(MANIFEST, &files());
        let template = DirectoryTemplateSource::new(dir.path())
            .load(&ParameterSchema::standard())
            .unwrap();

        assert_eq!(template.id.to_string(), "mini@1.2.0");
        assert_eq!(template.metadata.author, "Strata");
        assert_eq!(template.metadata.tags, vec!["dotnet"]);
        assert_eq!(template.files.len(), 4);
        assert_eq!(template.rules.len(), 2);
        assert_eq!(
            template.rules.rules()[0].when,
            Predicate::flag("useApi")
        );
    }

    #[test]
    fn file_overrides_apply() {
        let dir = template_dir(MANIFEST, &files());
        let template = DirectoryTemplateSource::new(dir.path())
            .load(&ParameterSchema::standard())
            .unwrap();

        let script = template
            .file(&RelativePath::try_new("build.sh").unwrap())
            .unwrap();
        assert!(!script.content.is_parameterized());
        assert!(script.permissions.executable_flag());

        let sln = template
            .file(&RelativePath::try_new("{{ROOT_NAMESPACE}}.sln").unwrap())
            .unwrap();
        assert!(sln.content.is_parameterized());
    }

    #[test]
    fn missing_manifest_is_a_load_error() {
        let temp = TempDir::new().unwrap();
        let err = DirectoryTemplateSource::new(temp.path())
            .load(&ParameterSchema::standard())
            .unwrap_err();
        assert!(matches!(
            err,
            StrataError::Application(ApplicationError::TemplateLoad { .. })
        ));
    }

    #[test]
    fn malformed_manifest_is_a_load_error() {
        let dir = template_dir("[template\nid=", &files());
        let err = DirectoryTemplateSource::new(dir.path())
            .load(&ParameterSchema::standard())
            .unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn rules_on_unknown_parameters_are_rejected() {
        let manifest = r#"
[template]
id = "bad"
version = "1"

[metadata]
name = "Bad"

[[rules]]
path = "src"
when = { flag = "useTelemetry" }
"#;
        let dir = template_dir(manifest, &[("src/a.cs", "")]);
        let err = DirectoryTemplateSource::new(dir.path())
            .load(&ParameterSchema::standard())
            .unwrap_err();
        assert!(matches!(
            err,
            StrataError::Domain(DomainError::InvalidRule { .. })
        ));
    }

    #[test]
    fn override_for_unknown_file_is_rejected() {
        let manifest = r#"
[template]
id = "bad"
version = "1"

[metadata]
name = "Bad"

[[files]]
path = "nope.sh"
executable = true
"#;
        let dir = template_dir(manifest, &[("a.txt", "")]);
        let err = DirectoryTemplateSource::new(dir.path())
            .load(&ParameterSchema::standard())
            .unwrap_err();
        assert!(err.to_string().contains("nope.sh"));
    }
}
