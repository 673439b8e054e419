//! Generator Service - main application orchestrator.
//!
//! This service coordinates the generation workflow:
//! 1. Validate raw parameters against the schema
//! 2. Resolve which template files are included, and where they go
//! 3. Build the substitution map
//! 4. Substitute paths and contents into a [`GeneratedTree`]
//!    (collisions and leftover tokens are detected here)
//! 5. Write the tree to the filesystem, all or nothing
//!
//! Steps 1-4 are pure ([`GeneratorService::plan`]); only step 5 touches the
//! `Filesystem` port.

use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateSource},
    },
    domain::{
        GeneratedFile, GeneratedTree, ParameterSchema, ParameterSet, RawParameters,
        SubstitutionMap, Template, TemplateContent, TemplateId, substitution::ensure_substituted,
    },
    error::{StrataError, StrataResult},
};

/// Result of planning a generation run.
#[derive(Debug, Clone)]
pub struct GenerationPlan {
    pub template_id: TemplateId,
    pub parameters: ParameterSet,
    pub tree: GeneratedTree,
}

/// Main generation service.
pub struct GeneratorService {
    schema: ParameterSchema,
    filesystem: Arc<dyn Filesystem>,
}

impl GeneratorService {
    /// Create a generator over the standard parameter catalog.
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self::with_schema(ParameterSchema::standard(), filesystem)
    }

    pub fn with_schema(schema: ParameterSchema, filesystem: Arc<dyn Filesystem>) -> Self {
        Self { schema, filesystem }
    }

    pub fn schema(&self) -> &ParameterSchema {
        &self.schema
    }

    pub fn filesystem(&self) -> &dyn Filesystem {
        self.filesystem.as_ref()
    }

    /// Load and validate a template from an explicit source.
    #[instrument(skip_all, fields(source = %source.describe()))]
    pub fn load_template(&self, source: &dyn TemplateSource) -> StrataResult<Template> {
        let template = source.load(&self.schema)?;
        debug!(
            template = %template.id,
            files = template.files.len(),
            rules = template.rules.len(),
            "Template loaded"
        );
        Ok(template)
    }

    /// Generate a solution into `destination`.
    ///
    /// This is the main use case. Nothing is written unless planning
    /// succeeds; a failed write removes `destination` again.
    #[instrument(
        skip_all,
        fields(
            source = %source.describe(),
            destination = %destination.display()
        )
    )]
    pub fn generate(
        &self,
        raw: &RawParameters,
        source: &dyn TemplateSource,
        destination: &Path,
    ) -> StrataResult<GenerationPlan> {
        let template = self.load_template(source)?;
        self.generate_from(raw, &template, destination)
    }

    /// Like [`generate`](Self::generate) with an already loaded template.
    pub fn generate_from(
        &self,
        raw: &RawParameters,
        template: &Template,
        destination: &Path,
    ) -> StrataResult<GenerationPlan> {
        let plan = self.plan(raw, template)?;
        self.materialize(&plan.tree, destination)?;

        info!(
            files = plan.tree.len(),
            bytes = plan.tree.total_bytes(),
            destination = %destination.display(),
            "Generation completed successfully"
        );
        Ok(plan)
    }

    /// Compute the generated tree without writing anything.
    ///
    /// # Errors
    ///
    /// Domain errors propagate unchanged: parameter validation errors,
    /// `InvalidName`, `PathCollision`, `LeftoverPlaceholder`.
    #[instrument(skip_all, fields(template = %template.id))]
    pub fn plan(&self, raw: &RawParameters, template: &Template) -> StrataResult<GenerationPlan> {
        let parameters = self.schema.validate(raw)?;

        let inclusions = template.rules.resolve(template.paths(), &parameters);
        debug!(
            included = inclusions.len(),
            available = template.files.len(),
            "Inclusion resolved"
        );

        let map = SubstitutionMap::build(&parameters)?;

        let mut tree = GeneratedTree::new();
        for inclusion in &inclusions {
            let file = template.file(&inclusion.source).ok_or_else(|| {
                StrataError::Internal {
                    message: format!("included path '{}' has no template file", inclusion.source),
                }
            })?;

            let scoped: Cow<'_, SubstitutionMap> = match &inclusion.item {
                Some(item) => Cow::Owned(map.with_item(item)),
                None => Cow::Borrowed(&map),
            };

            let path = scoped.apply_path(&inclusion.output)?;
            let path_text = path.to_string();
            ensure_substituted(&path_text, &path_text)?;

            let content = match &file.content {
                TemplateContent::Parameterized(source) => {
                    let text = scoped.apply(source.as_str());
                    ensure_substituted(&path_text, &text)?;
                    text
                }
                TemplateContent::Literal(source) => source.as_str().to_string(),
            };

            tree.insert(GeneratedFile {
                path,
                content,
                permissions: file.permissions,
                source: inclusion.source.clone(),
            })?;
        }

        Ok(GenerationPlan {
            template_id: template.id.clone(),
            parameters,
            tree,
        })
    }

    /// Write a planned tree with rollback on failure.
    ///
    /// # Errors
    ///
    /// - `ProjectExists` if `destination` already exists (nothing is touched)
    /// - the original `FilesystemError` if a write fails
    pub fn materialize(&self, tree: &GeneratedTree, destination: &Path) -> StrataResult<()> {
        if self.filesystem.exists(destination) {
            return Err(ApplicationError::ProjectExists {
                path: destination.to_path_buf(),
            }
            .into());
        }

        match self.write_all(tree, destination) {
            Ok(()) => {
                debug!(files = tree.len(), "Successfully wrote all files");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Write failed, attempting rollback");
                self.rollback(destination);
                Err(e)
            }
        }
    }

    fn write_all(&self, tree: &GeneratedTree, destination: &Path) -> StrataResult<()> {
        self.filesystem.create_dir_all(destination)?;

        for dir in tree.directories() {
            self.filesystem.create_dir_all(&destination.join(dir.as_path()))?;
        }

        for file in tree.files() {
            let path = destination.join(file.path.as_path());
            self.filesystem.write_file(&path, &file.content)?;

            if file.permissions.executable_flag() {
                self.filesystem.set_permissions(&path, true)?;
            }
        }

        Ok(())
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, root: &Path) {
        if let Err(e) = self.filesystem.remove_dir_all(root) {
            warn!(
                error = %e,
                path = %root.display(),
                "Rollback failed"
            );
        } else {
            info!("Rollback successful");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::output::{MockFilesystem, MockTemplateSource};
    use crate::domain::{
        DomainError, FileRule, Predicate, RelativePath, TemplateFile, TemplateMetadata,
    };
    use std::path::PathBuf;

    fn file(path: &str, content: &'static str) -> TemplateFile {
        TemplateFile::new(RelativePath::try_new(path).unwrap(), content)
    }

    fn template() -> Template {
        Template::builder()
            .id(TemplateId::new("mini", "1.0.0"))
            .metadata(TemplateMetadata::new("Mini"))
            .add_file(file("{{ROOT_NAMESPACE}}.sln", "Project {{ROOT_NAMESPACE}}"))
            .add_file(file(
                "src/{{ROOT_NAMESPACE}}.Service/Controllers/PingController.cs",
                "namespace {{ROOT_NAMESPACE}}.Service.Controllers;",
            ))
            .add_file(file(
                "src/{{ROOT_NAMESPACE}}.Infrastructure/Clients/{{ITEM}}Client.cs",
                "class {{ITEM}}Client {}",
            ))
            .add_file(file("LICENSE", "MIT"))
            .rule(FileRule::new(
                "src/{{ROOT_NAMESPACE}}.Service/Controllers",
                Predicate::flag("useApi"),
            ))
            .rule(
                FileRule::new(
                    "src/{{ROOT_NAMESPACE}}.Infrastructure/Clients",
                    Predicate::Always,
                )
                .repeat_over("externalApiClients"),
            )
            .build(&ParameterSchema::standard())
            .unwrap()
    }

    fn raw(pairs: &[(&str, &str)]) -> RawParameters {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn paths(plan: &GenerationPlan) -> Vec<String> {
        plan.tree.files().map(|f| f.path.to_string()).collect()
    }

    fn service(fs: MockFilesystem) -> GeneratorService {
        GeneratorService::new(Arc::new(fs))
    }

    #[test]
    fn plan_substitutes_paths_and_content() {
        let svc = service(MockFilesystem::new());
        let plan = svc
            .plan(
                &raw(&[("orgName", "Acme"), ("name", "Billing"), ("externalApiClients", "Payments")]),
                &template(),
            )
            .unwrap();

        assert_eq!(
            paths(&plan),
            vec![
                "Acme.Billing.sln",
                "LICENSE",
                "src/Acme.Billing.Infrastructure/Clients/PaymentsClient.cs",
                "src/Acme.Billing.Service/Controllers/PingController.cs",
            ]
        );
        let sln = plan
            .tree
            .get(&RelativePath::try_new("Acme.Billing.sln").unwrap())
            .unwrap();
        assert_eq!(sln.content, "Project Acme.Billing");
    }

    #[test]
    fn plan_is_deterministic() {
        let svc = service(MockFilesystem::new());
        let input = raw(&[("orgName", "Acme"), ("externalApiClients", "B,A")]);
        let first = svc.plan(&input, &template()).unwrap();
        let second = svc.plan(&input, &template()).unwrap();
        assert_eq!(first.tree, second.tree);
    }

    #[test]
    fn validation_errors_propagate_unchanged() {
        let svc = service(MockFilesystem::new());
        let err = svc
            .plan(&raw(&[("orgName", "Acme"), ("databaseEngine", "oracle")]), &template())
            .unwrap_err();
        assert_eq!(err.code(), Some("invalid_value"));

        let err = svc.plan(&raw(&[("name", "Billing")]), &template()).unwrap_err();
        assert_eq!(
            err,
            StrataError::Domain(DomainError::MissingRequiredParameter {
                name: "orgName".into()
            })
        );
    }

    #[test]
    fn items_differing_only_in_case_are_rejected() {
        let tpl = Template::builder()
            .id(TemplateId::new("collide", "1.0.0"))
            .metadata(TemplateMetadata::new("Collide"))
            .add_file(file("clients/{{ITEM_LOWER}}.txt", "{{ITEM}}"))
            .rule(FileRule::new("clients", Predicate::Always).repeat_over("externalApiClients"))
            .build(&ParameterSchema::standard())
            .unwrap();

        let mut fs = MockFilesystem::new();
        fs.expect_exists().never();
        fs.expect_write_file().never();

        // Duplicates differing only in case are rejected by the schema.
        let err = service(fs)
            .plan(&raw(&[("orgName", "Acme"), ("externalApiClients", "Pay,pay")]), &tpl)
            .unwrap_err();
        assert_eq!(err.code(), Some("invalid_value"));
    }

    #[test]
    fn two_template_files_on_one_output_path_collide() {
        let tpl = Template::builder()
            .id(TemplateId::new("collide", "1.0.0"))
            .metadata(TemplateMetadata::new("Collide"))
            .add_file(file("{{PROJECT_NAME}}.txt", "a"))
            .add_file(file("Service.txt", "b"))
            .build(&ParameterSchema::standard())
            .unwrap();

        let err = service(MockFilesystem::new())
            .plan(&raw(&[("orgName", "Acme")]), &tpl)
            .unwrap_err();
        assert_eq!(err.code(), Some("path_collision"));
    }

    #[test]
    fn unbound_item_is_a_leftover() {
        let tpl = Template::builder()
            .id(TemplateId::new("leftover", "1.0.0"))
            .metadata(TemplateMetadata::new("Leftover"))
            .add_file(file("README.md", "client {{ITEM}}"))
            .build(&ParameterSchema::standard())
            .unwrap();

        let err = service(MockFilesystem::new())
            .plan(&raw(&[("orgName", "Acme")]), &tpl)
            .unwrap_err();
        assert_eq!(err.code(), Some("leftover_placeholder"));
    }

    #[test]
    fn existing_destination_is_refused() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_create_dir_all().never();

        let err = service(fs)
            .generate_from(&raw(&[("orgName", "Acme")]), &template(), Path::new("/out"))
            .unwrap_err();
        assert!(matches!(
            err,
            StrataError::Application(ApplicationError::ProjectExists { .. })
        ));
    }

    #[test]
    fn failed_write_rolls_back_and_surfaces_the_io_error() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|path, _| {
            Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "disk full".into(),
            }
            .into())
        });
        fs.expect_remove_dir_all()
            .withf(|p| p == Path::new("/out"))
            .times(1)
            .returning(|_| Ok(()));

        let err = service(fs)
            .generate_from(&raw(&[("orgName", "Acme")]), &template(), Path::new("/out"))
            .unwrap_err();
        assert!(matches!(
            err,
            StrataError::Application(ApplicationError::FilesystemError { ref reason, .. }) if reason == "disk full"
        ));
    }

    #[test]
    fn invalid_input_never_touches_the_filesystem() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().never();
        fs.expect_create_dir_all().never();
        fs.expect_write_file().never();

        let err = service(fs)
            .generate_from(&raw(&[("orgName", "Acme"), ("bogus", "1")]), &template(), Path::new("/out"))
            .unwrap_err();
        assert_eq!(err.code(), Some("unknown_parameter"));
    }

    #[test]
    fn generate_loads_from_the_given_source() {
        let mut source = MockTemplateSource::new();
        source.expect_describe().return_const("mock".to_string());
        source.expect_load().times(1).returning(|_| Ok(template()));

        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().times(3).returning(|_, _| Ok(()));

        let plan = service(fs)
            .generate(&raw(&[("orgName", "Acme")]), &source, &PathBuf::from("/out"))
            .unwrap();
        assert_eq!(plan.tree.len(), 3);
        assert_eq!(plan.template_id.name(), "mini");
    }
}
