//! End-to-end generation through the real adapters.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
    sync::Arc,
};

use strata_adapters::{
    BuiltinTemplateSource, DirectoryTemplateSource, LocalFilesystem, MemoryFilesystem,
};
use strata_core::{
    application::{ApplicationError, Filesystem, GeneratorService, TemplateSource},
    domain::{RawParameters, RelativePath},
    error::StrataError,
};
use tempfile::TempDir;

fn raw(pairs: &[(&str, &str)]) -> RawParameters {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn planned_paths(service: &GeneratorService, params: &RawParameters) -> BTreeSet<String> {
    let template = service.load_template(&BuiltinTemplateSource).unwrap();
    service
        .plan(params, &template)
        .unwrap()
        .tree
        .files()
        .map(|f| f.path.to_string())
        .collect()
}

#[test]
fn postgres_nunit_solution_is_written_to_disk() {
    let out = TempDir::new().unwrap();
    let dest = out.path().join("billing");
    let service = GeneratorService::new(Arc::new(LocalFilesystem::new()));

    service
        .generate(
            &raw(&[
                ("orgName", "Acme"),
                ("name", "Billing"),
                ("databaseEngine", "postgres"),
                ("testFramework", "nunit"),
            ]),
            &BuiltinTemplateSource,
            &dest,
        )
        .unwrap();

    let infra = dest.join("src/Acme.Billing.Infrastructure");
    let csproj = std::fs::read_to_string(infra.join("Acme.Billing.Infrastructure.csproj")).unwrap();
    assert!(csproj.contains("Npgsql.EntityFrameworkCore.PostgreSQL"));
    assert!(infra.join("Persistence/BillingDbContext.cs").is_file());
    assert!(!infra.join("_database").exists());

    let tests = std::fs::read_to_string(
        dest.join("tests/Acme.Billing.Tests/Acme.Billing.Tests.csproj"),
    )
    .unwrap();
    assert!(tests.contains("NUnit"));
    assert!(!tests.contains("xunit"));

    let service_dir = dest.join("src/Acme.Billing.Service");
    assert!(service_dir.join("Controllers/BillingController.cs").is_file());
    assert!(service_dir.join("Contracts/Requests/CreateBillingItemRequest.cs").is_file());
    assert!(service_dir.join("Contracts/Responses/BillingItemResponse.cs").is_file());

    let sln = std::fs::read_to_string(dest.join("Acme.Billing.sln")).unwrap();
    assert!(sln.contains("Acme.Billing.Domain"));
    assert!(!sln.contains("{{"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(dest.join("build.sh")).unwrap().permissions().mode();
        assert_ne!(mode & 0o111, 0);
    }
}

#[test]
fn disabling_the_api_removes_only_controllers_and_contracts() {
    let service = GeneratorService::new(Arc::new(MemoryFilesystem::new()));
    let with_api = planned_paths(&service, &raw(&[("orgName", "Acme"), ("name", "Billing")]));
    let without_api = planned_paths(
        &service,
        &raw(&[("orgName", "Acme"), ("name", "Billing"), ("useApi", "false")]),
    );

    assert!(without_api.is_subset(&with_api));
    let removed: Vec<_> = with_api.difference(&without_api).collect();
    assert!(!removed.is_empty());
    for path in removed {
        assert!(
            path.starts_with("src/Acme.Billing.Service/Controllers/")
                || path.starts_with("src/Acme.Billing.Service/Contracts/"),
            "unexpected removal: {path}"
        );
    }
}

#[test]
fn api_off_on_disk_drops_controllers_contracts_and_swagger() {
    let out = TempDir::new().unwrap();
    let dest = out.path().join("billing");
    let service = GeneratorService::new(Arc::new(LocalFilesystem::new()));

    service
        .generate(
            &raw(&[
                ("orgName", "Acme"),
                ("name", "Billing"),
                ("useApi", "false"),
                ("useSwagger", "true"),
            ]),
            &BuiltinTemplateSource,
            &dest,
        )
        .unwrap();

    let service_dir = dest.join("src/Acme.Billing.Service");
    assert!(!service_dir.join("Controllers").exists());
    assert!(!service_dir.join("Contracts").exists());
    assert!(service_dir.join("Acme.Billing.Service.csproj").is_file());
    assert!(service_dir.join("DependencyInjection.cs").is_file());

    let props = std::fs::read_to_string(dest.join("Directory.Build.props")).unwrap();
    assert!(props.contains("<UseApi>false</UseApi>"));
    assert!(props.contains("<UseSwagger>false</UseSwagger>"));
}

#[test]
fn dotted_project_name_yields_valid_type_names() {
    let service = GeneratorService::new(Arc::new(MemoryFilesystem::new()));
    let template = service.load_template(&BuiltinTemplateSource).unwrap();
    let plan = service
        .plan(&raw(&[("orgName", "Acme"), ("name", "Billing.Api")]), &template)
        .unwrap();

    let entity = plan
        .tree
        .get(&RelativePath::try_new("src/Acme.BillingApi.Domain/Entities/BillingApiItem.cs").unwrap())
        .unwrap();
    assert!(entity.content.contains("public sealed class BillingApiItem"));

    for file in plan.tree.files() {
        assert!(
            !file.content.contains("Billing.Api"),
            "dotted name leaked into {}",
            file.path
        );
    }
}

#[test]
fn swagger_without_api_is_inert() {
    let service = GeneratorService::new(Arc::new(MemoryFilesystem::new()));
    let template = service.load_template(&BuiltinTemplateSource).unwrap();
    let plan = service
        .plan(
            &raw(&[("orgName", "Acme"), ("useApi", "false"), ("useSwagger", "true")]),
            &template,
        )
        .unwrap();

    let props = plan
        .tree
        .files()
        .find(|f| f.path.to_string() == "Directory.Build.props")
        .unwrap();
    assert!(props.content.contains("<UseSwagger>false</UseSwagger>"));
}

#[test]
fn generation_is_deterministic() {
    let params = raw(&[
        ("orgName", "Contoso.Retail"),
        ("name", "Orders"),
        ("externalApiClients", "Payments,Crm"),
        ("useMessaging", "true"),
    ]);

    let first = MemoryFilesystem::new();
    let second = MemoryFilesystem::new();
    for fs in [&first, &second] {
        GeneratorService::new(Arc::new(fs.clone()))
            .generate(&params, &BuiltinTemplateSource, Path::new("/out"))
            .unwrap();
    }

    assert_eq!(first.snapshot(), second.snapshot());
    assert!(
        first
            .list_files()
            .contains(&PathBuf::from("/out/Contoso.Retail.Orders.sln"))
    );
}

#[test]
fn failed_write_leaves_nothing_behind() {
    let fs = MemoryFilesystem::new();
    fs.fail_after(5);
    let service = GeneratorService::new(Arc::new(fs.clone()));

    let err = service
        .generate(&raw(&[("orgName", "Acme")]), &BuiltinTemplateSource, Path::new("/out"))
        .unwrap_err();

    assert!(matches!(
        err,
        StrataError::Application(ApplicationError::FilesystemError { .. })
    ));
    assert!(fs.list_files().is_empty());
    assert!(!fs.exists(Path::new("/out")));
}

#[test]
fn existing_destination_is_refused() {
    let out = TempDir::new().unwrap();
    let service = GeneratorService::new(Arc::new(LocalFilesystem::new()));

    let err = service
        .generate(&raw(&[("orgName", "Acme")]), &BuiltinTemplateSource, out.path())
        .unwrap_err();

    assert!(matches!(
        err,
        StrataError::Application(ApplicationError::ProjectExists { .. })
    ));
}

#[test]
fn invalid_parameters_are_rejected_before_writing() {
    let fs = MemoryFilesystem::new();
    let service = GeneratorService::new(Arc::new(fs.clone()));

    let cases = [
        (raw(&[("orgName", "Acme"), ("databaseEngine", "oracle")]), "invalid_value"),
        (raw(&[("name", "Billing")]), "missing_required_parameter"),
        (raw(&[("orgName", "Acme"), ("useGraphQl", "true")]), "unknown_parameter"),
        (raw(&[("orgName", " -!- ")]), "invalid_name"),
    ];

    for (params, code) in cases {
        let err = service
            .generate(&params, &BuiltinTemplateSource, Path::new("/out"))
            .unwrap_err();
        assert_eq!(err.code(), Some(code), "{params:?}");
    }
    assert!(fs.is_empty());
}

#[test]
fn directory_template_generates_like_builtin_rules() {
    let root = TempDir::new().unwrap();
    std::fs::write(
        root.path().join("template.toml"),
        r#"
[template]
id = "mini"
version = "0.1.0"

[metadata]
name = "Mini"

[[rules]]
path = "src/{{ROOT_NAMESPACE}}.Api"
when = { flag = "useApi" }
"#,
    )
    .unwrap();
    let api = root.path().join("src/{{ROOT_NAMESPACE}}.Api");
    std::fs::create_dir_all(&api).unwrap();
    std::fs::write(api.join("Controller.cs"), "namespace {{ROOT_NAMESPACE}}.Api;").unwrap();
    std::fs::write(root.path().join("README.md"), "# {{PROJECT_NAME}}").unwrap();

    let source = DirectoryTemplateSource::new(root.path());
    assert!(source.describe().contains(&root.path().display().to_string()));

    let fs = MemoryFilesystem::new();
    let service = GeneratorService::new(Arc::new(fs.clone()));
    service
        .generate(
            &raw(&[("orgName", "Acme"), ("name", "Mini")]),
            &source,
            Path::new("/out"),
        )
        .unwrap();

    assert_eq!(
        fs.read_file(Path::new("/out/src/Acme.Mini.Api/Controller.cs")).as_deref(),
        Some("namespace Acme.Mini.Api;")
    );
    assert_eq!(
        fs.read_file(Path::new("/out/README.md")).as_deref(),
        Some("# Mini")
    );
}
