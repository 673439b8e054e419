//! The bundled onion solution template.
//!
//! Compiled into the binary, so `strata new` works without a template
//! directory. The generated solution has five layer projects under `src/`
//! and one test project under `tests/`:
//!
//! ```text
//! {{ROOT_NAMESPACE}}.sln
//! Directory.Build.props            feature flags as MSBuild properties
//! src/
//! ├── {{ROOT_NAMESPACE}}.Domain          entities, repository abstractions
//! ├── {{ROOT_NAMESPACE}}.Application     orchestrators, validators, messaging ports
//! ├── {{ROOT_NAMESPACE}}.Infrastructure  persistence (per engine), clients, read-only contexts
//! ├── {{ROOT_NAMESPACE}}.Service         controllers, contracts, DI wiring, health checks
//! └── {{ROOT_NAMESPACE}}.Host            entry point, workers, consumers
//! tests/
//! └── {{ROOT_NAMESPACE}}.Tests           one of xunit / nunit / mstest
//! ```
//!
//! Variant files live under `_database/<engine>` and `_framework/<name>`
//! directories; rules pick exactly one variant and rename it into place.
//! Swagger has no files of its own: it is switched on in `Program.cs` via the
//! `USE_SWAGGER` compile constant, so turning the API off removes only the
//! controller and contract subtrees.

use tracing::instrument;

use strata_core::{
    application::ports::TemplateSource,
    domain::{
        FileRule, ParameterSchema, Predicate, RelativePath, Template, TemplateFile, TemplateId,
        TemplateMetadata,
        parameters::{
            DATABASE_ENGINE, EXTERNAL_API_CLIENTS, EXTERNAL_DATABASES, TEST_FRAMEWORK, USE_API,
            USE_HEALTH_CHECKS, USE_MESSAGING, USE_VALIDATION, USE_WORKERS,
        },
    },
    error::StrataResult,
};

pub const TEMPLATE_NAME: &str = "onion";
pub const TEMPLATE_VERSION: &str = "1.0.0";

/// Template source for the bundled onion template.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplateSource;

impl BuiltinTemplateSource {
    pub fn new() -> Self {
        Self
    }

    pub fn metadata() -> TemplateMetadata {
        TemplateMetadata::new("Onion solution (.NET)")
            .description(
                "Five-layer onion solution with optional API, persistence, messaging and workers",
            )
            .tags(vec!["dotnet".into(), "onion".into(), "csharp".into()])
    }

    /// Every file the template can emit, before any rule is applied.
    pub fn files() -> StrataResult<Vec<TemplateFile>> {
        FILES
            .iter()
            .map(|(path, content)| -> StrataResult<TemplateFile> {
                let file = TemplateFile::new(RelativePath::try_new(path)?, *content);
                Ok(if EXECUTABLES.contains(path) {
                    file.executable()
                } else {
                    file
                })
            })
            .collect()
    }

    /// Inclusion rules, as a template author would write them.
    pub fn rules() -> Vec<FileRule> {
        let infra = "src/{{ROOT_NAMESPACE}}.Infrastructure";
        let tests = "tests/{{ROOT_NAMESPACE}}.Tests";

        let mut rules = vec![
            // API surface: exactly the controllers and their contracts.
            FileRule::new(
                "src/{{ROOT_NAMESPACE}}.Service/Controllers",
                Predicate::flag(USE_API),
            ),
            FileRule::new(
                "src/{{ROOT_NAMESPACE}}.Service/Contracts",
                Predicate::flag(USE_API),
            ),
            FileRule::new(
                "src/{{ROOT_NAMESPACE}}.Service/HealthChecks",
                Predicate::flag(USE_HEALTH_CHECKS),
            ),
            FileRule::new(
                "src/{{ROOT_NAMESPACE}}.Application/Validation",
                Predicate::flag(USE_VALIDATION),
            ),
            FileRule::new(
                "src/{{ROOT_NAMESPACE}}.Application/Messaging",
                Predicate::flag(USE_MESSAGING),
            ),
            FileRule::new(format!("{infra}/Messaging"), Predicate::flag(USE_MESSAGING)),
            FileRule::new(
                "src/{{ROOT_NAMESPACE}}.Host/Consumers",
                Predicate::flag(USE_MESSAGING),
            ),
            FileRule::new(
                "src/{{ROOT_NAMESPACE}}.Host/Workers",
                Predicate::flag(USE_WORKERS),
            ),
            FileRule::new(
                format!("{infra}/HealthChecks"),
                Predicate::flag(USE_HEALTH_CHECKS).and(Predicate::NotEquals {
                    param: DATABASE_ENGINE.into(),
                    value: "none".into(),
                }),
            ),
            FileRule::new(format!("{infra}/Clients/_client"), Predicate::Always)
                .rename_to(format!("{infra}/Clients/{{{{ITEM}}}}"))
                .repeat_over(EXTERNAL_API_CLIENTS),
            FileRule::new(format!("{infra}/ReadOnly"), Predicate::Always)
                .repeat_over(EXTERNAL_DATABASES),
        ];

        for engine in ["none", "sqlserver", "postgres", "cassandra"] {
            rules.push(
                FileRule::new(
                    format!("{infra}/_database/{engine}"),
                    Predicate::equals(DATABASE_ENGINE, engine),
                )
                .rename_to(infra),
            );
        }

        for framework in ["xunit", "nunit", "mstest"] {
            rules.push(
                FileRule::new(
                    format!("{tests}/_framework/{framework}"),
                    Predicate::equals(TEST_FRAMEWORK, framework),
                )
                .rename_to(tests),
            );
        }

        rules
    }
}

impl TemplateSource for BuiltinTemplateSource {
    #[instrument(skip_all)]
    fn load(&self, schema: &ParameterSchema) -> StrataResult<Template> {
        Ok(Template::builder()
            .id(TemplateId::new(TEMPLATE_NAME, TEMPLATE_VERSION))
            .metadata(Self::metadata())
            .files(Self::files()?)
            .rules(Self::rules())
            .build(schema)?)
    }

    fn describe(&self) -> String {
        format!("builtin:{TEMPLATE_NAME}@{TEMPLATE_VERSION}")
    }
}

const EXECUTABLES: &[&str] = &["build.sh"];

// ── Content ───────────────────────────────────────────────────────────────────

const FILES: &[(&str, &str)] = &[
    // ── Solution root ─────────────────────────────────────────────────────
    ("{{ROOT_NAMESPACE}}.sln", SOLUTION),
    ("Directory.Build.props", BUILD_PROPS),
    ("README.md", README),
    (".gitignore", GITIGNORE),
    ("build.sh", BUILD_SH),
    // ── Domain ────────────────────────────────────────────────────────────
    (
        "src/{{ROOT_NAMESPACE}}.Domain/{{ROOT_NAMESPACE}}.Domain.csproj",
        DOMAIN_CSPROJ,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Domain/Entities/EntityBase.cs",
        ENTITY_BASE,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Domain/Entities/{{PROJECT_NAME}}Item.cs",
        ENTITY,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Domain/Abstractions/I{{PROJECT_NAME}}Repository.cs",
        REPOSITORY_PORT,
    ),
    // ── Application ───────────────────────────────────────────────────────
    (
        "src/{{ROOT_NAMESPACE}}.Application/{{ROOT_NAMESPACE}}.Application.csproj",
        APPLICATION_CSPROJ,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Application/Orchestrators/I{{PROJECT_NAME}}Orchestrator.cs",
        ORCHESTRATOR_PORT,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Application/Orchestrators/{{PROJECT_NAME}}Orchestrator.cs",
        ORCHESTRATOR,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Application/Validation/{{PROJECT_NAME}}ItemValidator.cs",
        VALIDATOR,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Application/Messaging/IMessagePublisher.cs",
        MESSAGE_PUBLISHER_PORT,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Application/Messaging/IMessageConsumer.cs",
        MESSAGE_CONSUMER_PORT,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Application/DependencyInjection.cs",
        APPLICATION_DI,
    ),
    // ── Infrastructure ────────────────────────────────────────────────────
    (
        "src/{{ROOT_NAMESPACE}}.Infrastructure/_database/none/{{ROOT_NAMESPACE}}.Infrastructure.csproj",
        INFRASTRUCTURE_CSPROJ_NONE,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Infrastructure/_database/none/Persistence/InMemory{{PROJECT_NAME}}Repository.cs",
        REPOSITORY_IN_MEMORY,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Infrastructure/_database/sqlserver/{{ROOT_NAMESPACE}}.Infrastructure.csproj",
        INFRASTRUCTURE_CSPROJ_SQLSERVER,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Infrastructure/_database/sqlserver/Persistence/{{PROJECT_NAME}}DbContext.cs",
        DB_CONTEXT_SQLSERVER,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Infrastructure/_database/sqlserver/Persistence/{{PROJECT_NAME}}Repository.cs",
        REPOSITORY_EF,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Infrastructure/_database/postgres/{{ROOT_NAMESPACE}}.Infrastructure.csproj",
        INFRASTRUCTURE_CSPROJ_POSTGRES,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Infrastructure/_database/postgres/Persistence/{{PROJECT_NAME}}DbContext.cs",
        DB_CONTEXT_POSTGRES,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Infrastructure/_database/postgres/Persistence/{{PROJECT_NAME}}Repository.cs",
        REPOSITORY_EF,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Infrastructure/_database/cassandra/{{ROOT_NAMESPACE}}.Infrastructure.csproj",
        INFRASTRUCTURE_CSPROJ_CASSANDRA,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Infrastructure/_database/cassandra/Persistence/CassandraSessionFactory.cs",
        CASSANDRA_SESSION,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Infrastructure/_database/cassandra/Persistence/{{PROJECT_NAME}}Repository.cs",
        REPOSITORY_CASSANDRA,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Infrastructure/Clients/_client/I{{ITEM}}Client.cs",
        CLIENT_PORT,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Infrastructure/Clients/_client/{{ITEM}}Client.cs",
        CLIENT,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Infrastructure/ReadOnly/{{ITEM}}ReadOnlyContext.cs",
        READ_ONLY_CONTEXT,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Infrastructure/Messaging/MessagePublisher.cs",
        MESSAGE_PUBLISHER,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Infrastructure/HealthChecks/DatabaseHealthCheck.cs",
        DATABASE_HEALTH_CHECK,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Infrastructure/DependencyInjection.cs",
        INFRASTRUCTURE_DI,
    ),
    // ── Service ───────────────────────────────────────────────────────────
    (
        "src/{{ROOT_NAMESPACE}}.Service/{{ROOT_NAMESPACE}}.Service.csproj",
        SERVICE_CSPROJ,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Service/Controllers/{{PROJECT_NAME}}Controller.cs",
        CONTROLLER,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Service/Contracts/Requests/Create{{PROJECT_NAME}}ItemRequest.cs",
        CREATE_REQUEST,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Service/Contracts/Responses/{{PROJECT_NAME}}ItemResponse.cs",
        ITEM_RESPONSE,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Service/HealthChecks/HealthCheckRegistration.cs",
        HEALTH_CHECK_REGISTRATION,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Service/DependencyInjection.cs",
        SERVICE_DI,
    ),
    // ── Host ──────────────────────────────────────────────────────────────
    (
        "src/{{ROOT_NAMESPACE}}.Host/{{ROOT_NAMESPACE}}.Host.csproj",
        HOST_CSPROJ,
    ),
    ("src/{{ROOT_NAMESPACE}}.Host/Program.cs", PROGRAM),
    ("src/{{ROOT_NAMESPACE}}.Host/appsettings.json", APPSETTINGS),
    (
        "src/{{ROOT_NAMESPACE}}.Host/Workers/{{PROJECT_NAME}}Worker.cs",
        WORKER,
    ),
    (
        "src/{{ROOT_NAMESPACE}}.Host/Consumers/{{PROJECT_NAME}}MessageConsumer.cs",
        MESSAGE_CONSUMER,
    ),
    // ── Tests ─────────────────────────────────────────────────────────────
    (
        "tests/{{ROOT_NAMESPACE}}.Tests/_framework/xunit/{{ROOT_NAMESPACE}}.Tests.csproj",
        TESTS_CSPROJ_XUNIT,
    ),
    (
        "tests/{{ROOT_NAMESPACE}}.Tests/_framework/xunit/{{PROJECT_NAME}}OrchestratorTests.cs",
        TESTS_XUNIT,
    ),
    (
        "tests/{{ROOT_NAMESPACE}}.Tests/_framework/nunit/{{ROOT_NAMESPACE}}.Tests.csproj",
        TESTS_CSPROJ_NUNIT,
    ),
    (
        "tests/{{ROOT_NAMESPACE}}.Tests/_framework/nunit/{{PROJECT_NAME}}OrchestratorTests.cs",
        TESTS_NUNIT,
    ),
    (
        "tests/{{ROOT_NAMESPACE}}.Tests/_framework/mstest/{{ROOT_NAMESPACE}}.Tests.csproj",
        TESTS_CSPROJ_MSTEST,
    ),
    (
        "tests/{{ROOT_NAMESPACE}}.Tests/_framework/mstest/{{PROJECT_NAME}}OrchestratorTests.cs",
        TESTS_MSTEST,
    ),
];

const SOLUTION: &str = r#"
Microsoft Visual Studio Solution File, Format Version 12.00
# Visual Studio Version 17
VisualStudioVersion = 17.0.31903.59
MinimumVisualStudioVersion = 10.0.40219.1
Project("{2150E333-8FDC-42A3-9474-1A3956D46DE8}") = "src", "src", "{6A1F3C52-0E4B-4C39-9F0B-2D8C61A0B001}"
EndProject
Project("{2150E333-8FDC-42A3-9474-1A3956D46DE8}") = "tests", "tests", "{6A1F3C52-0E4B-4C39-9F0B-2D8C61A0B002}"
EndProject
Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "{{ROOT_NAMESPACE}}.Domain", "src\{{ROOT_NAMESPACE}}.Domain\{{ROOT_NAMESPACE}}.Domain.csproj", "{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1001}"
EndProject
Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "{{ROOT_NAMESPACE}}.Application", "src\{{ROOT_NAMESPACE}}.Application\{{ROOT_NAMESPACE}}.Application.csproj", "{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1002}"
EndProject
Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "{{ROOT_NAMESPACE}}.Infrastructure", "src\{{ROOT_NAMESPACE}}.Infrastructure\{{ROOT_NAMESPACE}}.Infrastructure.csproj", "{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1003}"
EndProject
Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "{{ROOT_NAMESPACE}}.Service", "src\{{ROOT_NAMESPACE}}.Service\{{ROOT_NAMESPACE}}.Service.csproj", "{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1004}"
EndProject
Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "{{ROOT_NAMESPACE}}.Host", "src\{{ROOT_NAMESPACE}}.Host\{{ROOT_NAMESPACE}}.Host.csproj", "{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1005}"
EndProject
Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "{{ROOT_NAMESPACE}}.Tests", "tests\{{ROOT_NAMESPACE}}.Tests\{{ROOT_NAMESPACE}}.Tests.csproj", "{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1006}"
EndProject
Global
	GlobalSection(SolutionConfigurationPlatforms) = preSolution
		Debug|Any CPU = Debug|Any CPU
		Release|Any CPU = Release|Any CPU
	EndGlobalSection
	GlobalSection(ProjectConfigurationPlatforms) = postSolution
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1001}.Debug|Any CPU.ActiveCfg = Debug|Any CPU
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1001}.Debug|Any CPU.Build.0 = Debug|Any CPU
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1001}.Release|Any CPU.ActiveCfg = Release|Any CPU
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1001}.Release|Any CPU.Build.0 = Release|Any CPU
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1002}.Debug|Any CPU.ActiveCfg = Debug|Any CPU
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1002}.Debug|Any CPU.Build.0 = Debug|Any CPU
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1002}.Release|Any CPU.ActiveCfg = Release|Any CPU
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1002}.Release|Any CPU.Build.0 = Release|Any CPU
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1003}.Debug|Any CPU.ActiveCfg = Debug|Any CPU
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1003}.Debug|Any CPU.Build.0 = Debug|Any CPU
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1003}.Release|Any CPU.ActiveCfg = Release|Any CPU
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1003}.Release|Any CPU.Build.0 = Release|Any CPU
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1004}.Debug|Any CPU.ActiveCfg = Debug|Any CPU
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1004}.Debug|Any CPU.Build.0 = Debug|Any CPU
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1004}.Release|Any CPU.ActiveCfg = Release|Any CPU
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1004}.Release|Any CPU.Build.0 = Release|Any CPU
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1005}.Debug|Any CPU.ActiveCfg = Debug|Any CPU
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1005}.Debug|Any CPU.Build.0 = Debug|Any CPU
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1005}.Release|Any CPU.ActiveCfg = Release|Any CPU
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1005}.Release|Any CPU.Build.0 = Release|Any CPU
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1006}.Debug|Any CPU.ActiveCfg = Debug|Any CPU
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1006}.Debug|Any CPU.Build.0 = Debug|Any CPU
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1006}.Release|Any CPU.ActiveCfg = Release|Any CPU
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1006}.Release|Any CPU.Build.0 = Release|Any CPU
	EndGlobalSection
	GlobalSection(NestedProjects) = preSolution
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1001} = {6A1F3C52-0E4B-4C39-9F0B-2D8C61A0B001}
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1002} = {6A1F3C52-0E4B-4C39-9F0B-2D8C61A0B001}
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1003} = {6A1F3C52-0E4B-4C39-9F0B-2D8C61A0B001}
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1004} = {6A1F3C52-0E4B-4C39-9F0B-2D8C61A0B001}
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1005} = {6A1F3C52-0E4B-4C39-9F0B-2D8C61A0B001}
		{0B8E2A64-1C55-4E0B-A3F1-5D3E7A9C1006} = {6A1F3C52-0E4B-4C39-9F0B-2D8C61A0B002}
	EndGlobalSection
EndGlobal
"#;

const BUILD_PROPS: &str = r#"<Project>
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
    <Nullable>enable</Nullable>
    <ImplicitUsings>enable</ImplicitUsings>
    <TreatWarningsAsErrors>false</TreatWarningsAsErrors>
    <Company>{{ORG_NAME}}</Company>
    <Product>{{PROJECT_NAME}}</Product>

    <UseApi>{{USE_API}}</UseApi>
    <UseSwagger>{{USE_SWAGGER}}</UseSwagger>
    <UseHealthChecks>{{USE_HEALTH_CHECKS}}</UseHealthChecks>
    <UseValidation>{{USE_VALIDATION}}</UseValidation>
    <UseMessaging>{{USE_MESSAGING}}</UseMessaging>
    <UseWorkers>{{USE_WORKERS}}</UseWorkers>
    <DatabaseEngine>{{DATABASE_ENGINE}}</DatabaseEngine>
  </PropertyGroup>

  <PropertyGroup Condition="'$(UseApi)' == 'true'">
    <DefineConstants>$(DefineConstants);USE_API</DefineConstants>
  </PropertyGroup>
  <PropertyGroup Condition="'$(UseSwagger)' == 'true'">
    <DefineConstants>$(DefineConstants);USE_SWAGGER</DefineConstants>
  </PropertyGroup>
  <PropertyGroup Condition="'$(UseHealthChecks)' == 'true'">
    <DefineConstants>$(DefineConstants);USE_HEALTH_CHECKS</DefineConstants>
  </PropertyGroup>
  <PropertyGroup Condition="'$(UseValidation)' == 'true'">
    <DefineConstants>$(DefineConstants);USE_VALIDATION</DefineConstants>
  </PropertyGroup>
  <PropertyGroup Condition="'$(UseMessaging)' == 'true'">
    <DefineConstants>$(DefineConstants);USE_MESSAGING</DefineConstants>
  </PropertyGroup>
  <PropertyGroup Condition="'$(UseWorkers)' == 'true'">
    <DefineConstants>$(DefineConstants);USE_WORKERS</DefineConstants>
  </PropertyGroup>
  <PropertyGroup Condition="'$(DatabaseEngine)' != 'none'">
    <DefineConstants>$(DefineConstants);USE_DATABASE</DefineConstants>
  </PropertyGroup>
</Project>
"#;

const README: &str = r#"# {{ROOT_NAMESPACE}}

Onion-architecture solution for {{ORG_NAME}} {{PROJECT_NAME}}.

| Project | Role |
|---|---|
| `{{ROOT_NAMESPACE}}.Domain` | entities and repository abstractions |
| `{{ROOT_NAMESPACE}}.Application` | orchestrators and application ports |
| `{{ROOT_NAMESPACE}}.Infrastructure` | persistence ({{DATABASE_ENGINE}}), external clients |
| `{{ROOT_NAMESPACE}}.Service` | service registration and HTTP surface |
| `{{ROOT_NAMESPACE}}.Host` | process entry point |
| `{{ROOT_NAMESPACE}}.Tests` | {{TEST_FRAMEWORK}} tests |

Every generated method body throws `NotImplementedException`.

```sh
./build.sh
```
"#;

const GITIGNORE: &str = "bin/\nobj/\n.vs/\n*.user\nTestResults/\n";

const BUILD_SH: &str = r#"#!/bin/sh
set -eu
cd "$(dirname "$0")"
dotnet build {{ROOT_NAMESPACE}}.sln "$@"
"#;

const DOMAIN_CSPROJ: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <RootNamespace>{{ROOT_NAMESPACE}}.Domain</RootNamespace>
  </PropertyGroup>
</Project>
"#;

const ENTITY_BASE: &str = r#"namespace {{ROOT_NAMESPACE}}.Domain.Entities;

public abstract class EntityBase
{
    public Guid Id { get; protected set; }
}
"#;

const ENTITY: &str = r#"namespace {{ROOT_NAMESPACE}}.Domain.Entities;

public sealed class {{PROJECT_NAME}}Item : EntityBase
{
    public string Name { get; private set; } = string.Empty;

    public static {{PROJECT_NAME}}Item Create(string name)
    {
        throw new NotImplementedException();
    }
}
"#;

const REPOSITORY_PORT: &str = r#"using {{ROOT_NAMESPACE}}.Domain.Entities;

namespace {{ROOT_NAMESPACE}}.Domain.Abstractions;

public interface I{{PROJECT_NAME}}Repository
{
    Task<{{PROJECT_NAME}}Item?> FindAsync(Guid id, CancellationToken cancellationToken);

    Task AddAsync({{PROJECT_NAME}}Item item, CancellationToken cancellationToken);
}
"#;

const APPLICATION_CSPROJ: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <RootNamespace>{{ROOT_NAMESPACE}}.Application</RootNamespace>
  </PropertyGroup>

  <ItemGroup>
    <ProjectReference Include="..\{{ROOT_NAMESPACE}}.Domain\{{ROOT_NAMESPACE}}.Domain.csproj" />
  </ItemGroup>

  <ItemGroup>
    <PackageReference Include="Microsoft.Extensions.DependencyInjection.Abstractions" Version="8.0.1" />
  </ItemGroup>

  <ItemGroup Condition="'$(UseValidation)' == 'true'">
    <PackageReference Include="FluentValidation.DependencyInjectionExtensions" Version="11.9.0" />
  </ItemGroup>
</Project>
"#;

const ORCHESTRATOR_PORT: &str = r#"using {{ROOT_NAMESPACE}}.Domain.Entities;

namespace {{ROOT_NAMESPACE}}.Application.Orchestrators;

public interface I{{PROJECT_NAME}}Orchestrator
{
    Task<{{PROJECT_NAME}}Item?> GetAsync(Guid id, CancellationToken cancellationToken);

    Task<Guid> CreateAsync(string name, CancellationToken cancellationToken);
}
"#;

const ORCHESTRATOR: &str = r#"using {{ROOT_NAMESPACE}}.Domain.Abstractions;
using {{ROOT_NAMESPACE}}.Domain.Entities;

namespace {{ROOT_NAMESPACE}}.Application.Orchestrators;

public sealed class {{PROJECT_NAME}}Orchestrator : I{{PROJECT_NAME}}Orchestrator
{
    private readonly I{{PROJECT_NAME}}Repository _repository;

    public {{PROJECT_NAME}}Orchestrator(I{{PROJECT_NAME}}Repository repository)
    {
        _repository = repository;
    }

    public Task<{{PROJECT_NAME}}Item?> GetAsync(Guid id, CancellationToken cancellationToken)
    {
        throw new NotImplementedException();
    }

    public Task<Guid> CreateAsync(string name, CancellationToken cancellationToken)
    {
        throw new NotImplementedException();
    }
}
"#;

const VALIDATOR: &str = r#"using FluentValidation;
using {{ROOT_NAMESPACE}}.Domain.Entities;

namespace {{ROOT_NAMESPACE}}.Application.Validation;

public sealed class {{PROJECT_NAME}}ItemValidator : AbstractValidator<{{PROJECT_NAME}}Item>
{
    public {{PROJECT_NAME}}ItemValidator()
    {
        RuleFor(item => item.Name).NotEmpty();
    }
}
"#;

const MESSAGE_PUBLISHER_PORT: &str = r#"namespace {{ROOT_NAMESPACE}}.Application.Messaging;

public interface IMessagePublisher
{
    Task PublishAsync<TMessage>(TMessage message, CancellationToken cancellationToken)
        where TMessage : class;
}
"#;

const MESSAGE_CONSUMER_PORT: &str = r#"namespace {{ROOT_NAMESPACE}}.Application.Messaging;

public interface IMessageConsumer<in TMessage>
    where TMessage : class
{
    Task ConsumeAsync(TMessage message, CancellationToken cancellationToken);
}
"#;

const APPLICATION_DI: &str = r#"using Microsoft.Extensions.DependencyInjection;
using {{ROOT_NAMESPACE}}.Application.Orchestrators;

namespace {{ROOT_NAMESPACE}}.Application;

public static class DependencyInjection
{
    public static IServiceCollection AddApplication(this IServiceCollection services)
    {
        services.AddScoped<I{{PROJECT_NAME}}Orchestrator, {{PROJECT_NAME}}Orchestrator>();
#if USE_VALIDATION
        FluentValidation.ServiceCollectionExtensions.AddValidatorsFromAssembly(
            services, typeof(DependencyInjection).Assembly);
#endif
        return services;
    }
}
"#;

const INFRASTRUCTURE_CSPROJ_NONE: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <RootNamespace>{{ROOT_NAMESPACE}}.Infrastructure</RootNamespace>
  </PropertyGroup>

  <ItemGroup>
    <ProjectReference Include="..\{{ROOT_NAMESPACE}}.Application\{{ROOT_NAMESPACE}}.Application.csproj" />
  </ItemGroup>

  <ItemGroup>
    <PackageReference Include="Microsoft.Extensions.Http" Version="8.0.0" />
  </ItemGroup>
</Project>
"#;

const INFRASTRUCTURE_CSPROJ_SQLSERVER: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <RootNamespace>{{ROOT_NAMESPACE}}.Infrastructure</RootNamespace>
  </PropertyGroup>

  <ItemGroup>
    <ProjectReference Include="..\{{ROOT_NAMESPACE}}.Application\{{ROOT_NAMESPACE}}.Application.csproj" />
  </ItemGroup>

  <ItemGroup>
    <PackageReference Include="Microsoft.Extensions.Http" Version="8.0.0" />
    <PackageReference Include="Microsoft.EntityFrameworkCore.SqlServer" Version="8.0.4" />
    <PackageReference Include="Microsoft.Extensions.Diagnostics.HealthChecks" Version="8.0.4" />
  </ItemGroup>
</Project>
"#;

const INFRASTRUCTURE_CSPROJ_POSTGRES: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <RootNamespace>{{ROOT_NAMESPACE}}.Infrastructure</RootNamespace>
  </PropertyGroup>

  <ItemGroup>
    <ProjectReference Include="..\{{ROOT_NAMESPACE}}.Application\{{ROOT_NAMESPACE}}.Application.csproj" />
  </ItemGroup>

  <ItemGroup>
    <PackageReference Include="Microsoft.Extensions.Http" Version="8.0.0" />
    <PackageReference Include="Npgsql.EntityFrameworkCore.PostgreSQL" Version="8.0.2" />
    <PackageReference Include="Microsoft.Extensions.Diagnostics.HealthChecks" Version="8.0.4" />
  </ItemGroup>
</Project>
"#;

const INFRASTRUCTURE_CSPROJ_CASSANDRA: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <RootNamespace>{{ROOT_NAMESPACE}}.Infrastructure</RootNamespace>
  </PropertyGroup>

  <ItemGroup>
    <ProjectReference Include="..\{{ROOT_NAMESPACE}}.Application\{{ROOT_NAMESPACE}}.Application.csproj" />
  </ItemGroup>

  <ItemGroup>
    <PackageReference Include="Microsoft.Extensions.Http" Version="8.0.0" />
    <PackageReference Include="CassandraCSharpDriver" Version="3.20.1" />
    <PackageReference Include="Microsoft.Extensions.Diagnostics.HealthChecks" Version="8.0.4" />
  </ItemGroup>
</Project>
"#;

const REPOSITORY_IN_MEMORY: &str = r#"using {{ROOT_NAMESPACE}}.Domain.Abstractions;
using {{ROOT_NAMESPACE}}.Domain.Entities;

namespace {{ROOT_NAMESPACE}}.Infrastructure.Persistence;

public sealed class InMemory{{PROJECT_NAME}}Repository : I{{PROJECT_NAME}}Repository
{
    public Task<{{PROJECT_NAME}}Item?> FindAsync(Guid id, CancellationToken cancellationToken)
    {
        throw new NotImplementedException();
    }

    public Task AddAsync({{PROJECT_NAME}}Item item, CancellationToken cancellationToken)
    {
        throw new NotImplementedException();
    }
}
"#;

const DB_CONTEXT_SQLSERVER: &str = r#"using Microsoft.EntityFrameworkCore;
using {{ROOT_NAMESPACE}}.Domain.Entities;

namespace {{ROOT_NAMESPACE}}.Infrastructure.Persistence;

// SQL Server
public sealed class {{PROJECT_NAME}}DbContext : DbContext
{
    public {{PROJECT_NAME}}DbContext(DbContextOptions<{{PROJECT_NAME}}DbContext> options)
        : base(options)
    {
    }

    public DbSet<{{PROJECT_NAME}}Item> Items => Set<{{PROJECT_NAME}}Item>();
}
"#;

const DB_CONTEXT_POSTGRES: &str = r#"using Microsoft.EntityFrameworkCore;
using {{ROOT_NAMESPACE}}.Domain.Entities;

namespace {{ROOT_NAMESPACE}}.Infrastructure.Persistence;

// PostgreSQL
public sealed class {{PROJECT_NAME}}DbContext : DbContext
{
    public {{PROJECT_NAME}}DbContext(DbContextOptions<{{PROJECT_NAME}}DbContext> options)
        : base(options)
    {
    }

    public DbSet<{{PROJECT_NAME}}Item> Items => Set<{{PROJECT_NAME}}Item>();

    protected override void OnModelCreating(ModelBuilder modelBuilder)
    {
        modelBuilder.HasDefaultSchema("{{PROJECT_NAME_LOWER}}");
    }
}
"#;

const REPOSITORY_EF: &str = r#"using {{ROOT_NAMESPACE}}.Domain.Abstractions;
using {{ROOT_NAMESPACE}}.Domain.Entities;

namespace {{ROOT_NAMESPACE}}.Infrastructure.Persistence;

public sealed class {{PROJECT_NAME}}Repository : I{{PROJECT_NAME}}Repository
{
    private readonly {{PROJECT_NAME}}DbContext _context;

    public {{PROJECT_NAME}}Repository({{PROJECT_NAME}}DbContext context)
    {
        _context = context;
    }

    public Task<{{PROJECT_NAME}}Item?> FindAsync(Guid id, CancellationToken cancellationToken)
    {
        throw new NotImplementedException();
    }

    public Task AddAsync({{PROJECT_NAME}}Item item, CancellationToken cancellationToken)
    {
        throw new NotImplementedException();
    }
}
"#;

const CASSANDRA_SESSION: &str = r#"using Cassandra;

namespace {{ROOT_NAMESPACE}}.Infrastructure.Persistence;

public sealed class CassandraSessionFactory
{
    public const string Keyspace = "{{PROJECT_NAME_LOWER}}";

    public ISession Create()
    {
        throw new NotImplementedException();
    }
}
"#;

const REPOSITORY_CASSANDRA: &str = r#"using {{ROOT_NAMESPACE}}.Domain.Abstractions;
using {{ROOT_NAMESPACE}}.Domain.Entities;

namespace {{ROOT_NAMESPACE}}.Infrastructure.Persistence;

public sealed class {{PROJECT_NAME}}Repository : I{{PROJECT_NAME}}Repository
{
    private readonly CassandraSessionFactory _sessions;

    public {{PROJECT_NAME}}Repository(CassandraSessionFactory sessions)
    {
        _sessions = sessions;
    }

    public Task<{{PROJECT_NAME}}Item?> FindAsync(Guid id, CancellationToken cancellationToken)
    {
        throw new NotImplementedException();
    }

    public Task AddAsync({{PROJECT_NAME}}Item item, CancellationToken cancellationToken)
    {
        throw new NotImplementedException();
    }
}
"#;

const CLIENT_PORT: &str = r#"namespace {{ROOT_NAMESPACE}}.Infrastructure.Clients.{{ITEM}};

public interface I{{ITEM}}Client
{
    Task<string> GetStatusAsync(CancellationToken cancellationToken);
}
"#;

const CLIENT: &str = r#"namespace {{ROOT_NAMESPACE}}.Infrastructure.Clients.{{ITEM}};

public sealed class {{ITEM}}Client : I{{ITEM}}Client
{
    public const string HttpClientName = "{{ITEM_LOWER}}";

    private readonly HttpClient _http;

    public {{ITEM}}Client(IHttpClientFactory factory)
    {
        _http = factory.CreateClient(HttpClientName);
    }

    public Task<string> GetStatusAsync(CancellationToken cancellationToken)
    {
        throw new NotImplementedException();
    }
}
"#;

const READ_ONLY_CONTEXT: &str = r#"namespace {{ROOT_NAMESPACE}}.Infrastructure.ReadOnly;

public sealed class {{ITEM}}ReadOnlyContext
{
    public const string ConnectionStringName = "{{ITEM}}";

    public Task<IReadOnlyList<T>> QueryAsync<T>(string query, CancellationToken cancellationToken)
    {
        throw new NotImplementedException();
    }
}
"#;

const MESSAGE_PUBLISHER: &str = r#"using {{ROOT_NAMESPACE}}.Application.Messaging;

namespace {{ROOT_NAMESPACE}}.Infrastructure.Messaging;

public sealed class MessagePublisher : IMessagePublisher
{
    public Task PublishAsync<TMessage>(TMessage message, CancellationToken cancellationToken)
        where TMessage : class
    {
        throw new NotImplementedException();
    }
}
"#;

const DATABASE_HEALTH_CHECK: &str = r#"using Microsoft.Extensions.Diagnostics.HealthChecks;

namespace {{ROOT_NAMESPACE}}.Infrastructure.HealthChecks;

public sealed class DatabaseHealthCheck : IHealthCheck
{
    public const string Name = "{{DATABASE_ENGINE}}";

    public Task<HealthCheckResult> CheckHealthAsync(
        HealthCheckContext context,
        CancellationToken cancellationToken = default)
    {
        throw new NotImplementedException();
    }
}
"#;

const INFRASTRUCTURE_DI: &str = r#"using Microsoft.Extensions.DependencyInjection;
using {{ROOT_NAMESPACE}}.Domain.Abstractions;
using {{ROOT_NAMESPACE}}.Infrastructure.Persistence;

namespace {{ROOT_NAMESPACE}}.Infrastructure;

public static class DependencyInjection
{
    public static IServiceCollection AddInfrastructure(this IServiceCollection services)
    {
        services.AddHttpClient();
#if USE_DATABASE
        services.AddScoped<I{{PROJECT_NAME}}Repository, {{PROJECT_NAME}}Repository>();
#else
        services.AddSingleton<I{{PROJECT_NAME}}Repository, InMemory{{PROJECT_NAME}}Repository>();
#endif
#if USE_MESSAGING
        services.AddSingleton<Application.Messaging.IMessagePublisher, Messaging.MessagePublisher>();
#endif
        return services;
    }
}
"#;

const SERVICE_CSPROJ: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <RootNamespace>{{ROOT_NAMESPACE}}.Service</RootNamespace>
  </PropertyGroup>

  <ItemGroup>
    <FrameworkReference Include="Microsoft.AspNetCore.App" />
  </ItemGroup>

  <ItemGroup>
    <ProjectReference Include="..\{{ROOT_NAMESPACE}}.Application\{{ROOT_NAMESPACE}}.Application.csproj" />
    <ProjectReference Include="..\{{ROOT_NAMESPACE}}.Infrastructure\{{ROOT_NAMESPACE}}.Infrastructure.csproj" />
  </ItemGroup>

  <ItemGroup Condition="'$(UseSwagger)' == 'true'">
    <PackageReference Include="Swashbuckle.AspNetCore" Version="6.5.0" />
  </ItemGroup>
</Project>
"#;

const CONTROLLER: &str = r#"using Microsoft.AspNetCore.Mvc;
using {{ROOT_NAMESPACE}}.Application.Orchestrators;
using {{ROOT_NAMESPACE}}.Service.Contracts.Requests;
using {{ROOT_NAMESPACE}}.Service.Contracts.Responses;

namespace {{ROOT_NAMESPACE}}.Service.Controllers;

[ApiController]
[Route("api/{{PROJECT_NAME_KEBAB}}")]
public sealed class {{PROJECT_NAME}}Controller : ControllerBase
{
    private readonly I{{PROJECT_NAME}}Orchestrator _orchestrator;

    public {{PROJECT_NAME}}Controller(I{{PROJECT_NAME}}Orchestrator orchestrator)
    {
        _orchestrator = orchestrator;
    }

    [HttpGet("{id:guid}")]
    public Task<ActionResult<{{PROJECT_NAME}}ItemResponse>> Get(Guid id, CancellationToken cancellationToken)
    {
        throw new NotImplementedException();
    }

    [HttpPost]
    public Task<ActionResult<{{PROJECT_NAME}}ItemResponse>> Create(
        Create{{PROJECT_NAME}}ItemRequest request,
        CancellationToken cancellationToken)
    {
        throw new NotImplementedException();
    }
}
"#;

const CREATE_REQUEST: &str = r#"namespace {{ROOT_NAMESPACE}}.Service.Contracts.Requests;

public sealed record Create{{PROJECT_NAME}}ItemRequest(string Name);
"#;

const ITEM_RESPONSE: &str = r#"namespace {{ROOT_NAMESPACE}}.Service.Contracts.Responses;

public sealed record {{PROJECT_NAME}}ItemResponse(Guid Id, string Name);
"#;

const HEALTH_CHECK_REGISTRATION: &str = r#"using Microsoft.Extensions.DependencyInjection;

namespace {{ROOT_NAMESPACE}}.Service.HealthChecks;

public static class HealthCheckRegistration
{
    public const string LivenessPath = "/health/live";
    public const string ReadinessPath = "/health/ready";

    public static IServiceCollection AddServiceHealthChecks(this IServiceCollection services)
    {
        var checks = services.AddHealthChecks();
#if USE_DATABASE
        checks.AddCheck<Infrastructure.HealthChecks.DatabaseHealthCheck>(
            Infrastructure.HealthChecks.DatabaseHealthCheck.Name);
#endif
        return services;
    }
}
"#;

const SERVICE_DI: &str = r#"using Microsoft.Extensions.DependencyInjection;
using {{ROOT_NAMESPACE}}.Application;
using {{ROOT_NAMESPACE}}.Infrastructure;

namespace {{ROOT_NAMESPACE}}.Service;

public static class DependencyInjection
{
    public static IServiceCollection AddService(this IServiceCollection services)
    {
        services.AddApplication();
        services.AddInfrastructure();
#if USE_HEALTH_CHECKS
        HealthChecks.HealthCheckRegistration.AddServiceHealthChecks(services);
#endif
#if USE_API
        services.AddControllers().AddApplicationPart(typeof(DependencyInjection).Assembly);
#endif
        return services;
    }
}
"#;

const HOST_CSPROJ: &str = r#"<Project Sdk="Microsoft.NET.Sdk.Web">
  <PropertyGroup>
    <RootNamespace>{{ROOT_NAMESPACE}}.Host</RootNamespace>
    <AssemblyName>{{ROOT_NAMESPACE}}</AssemblyName>
  </PropertyGroup>

  <ItemGroup>
    <ProjectReference Include="..\{{ROOT_NAMESPACE}}.Service\{{ROOT_NAMESPACE}}.Service.csproj" />
  </ItemGroup>
</Project>
"#;

const PROGRAM: &str = r#"using {{ROOT_NAMESPACE}}.Service;

var builder = WebApplication.CreateBuilder(args);

builder.Services.AddService();
#if USE_SWAGGER
builder.Services.AddEndpointsApiExplorer();
builder.Services.AddSwaggerGen();
#endif
#if USE_WORKERS
builder.Services.AddHostedService<{{ROOT_NAMESPACE}}.Host.Workers.{{PROJECT_NAME}}Worker>();
#endif
#if USE_MESSAGING
builder.Services.AddHostedService<{{ROOT_NAMESPACE}}.Host.Consumers.{{PROJECT_NAME}}MessageConsumer>();
#endif

var app = builder.Build();

#if USE_SWAGGER
app.UseSwagger();
app.UseSwaggerUI();
#endif
#if USE_HEALTH_CHECKS
app.MapHealthChecks({{ROOT_NAMESPACE}}.Service.HealthChecks.HealthCheckRegistration.LivenessPath);
app.MapHealthChecks({{ROOT_NAMESPACE}}.Service.HealthChecks.HealthCheckRegistration.ReadinessPath);
#endif
#if USE_API
app.MapControllers();
#endif

app.Run();
"#;

const APPSETTINGS: &str = r#"{
  "Logging": {
    "LogLevel": {
      "Default": "Information",
      "Microsoft.AspNetCore": "Warning"
    }
  },
  "Persistence": {
    "Engine": "{{DATABASE_ENGINE}}",
    "Database": "{{PROJECT_NAME_LOWER}}"
  },
  "AllowedHosts": "*"
}
"#;

const WORKER: &str = r#"namespace {{ROOT_NAMESPACE}}.Host.Workers;

public sealed class {{PROJECT_NAME}}Worker : BackgroundService
{
    protected override Task ExecuteAsync(CancellationToken stoppingToken)
    {
        throw new NotImplementedException();
    }
}
"#;

const MESSAGE_CONSUMER: &str = r#"namespace {{ROOT_NAMESPACE}}.Host.Consumers;

public sealed class {{PROJECT_NAME}}MessageConsumer : BackgroundService
{
    protected override Task ExecuteAsync(CancellationToken stoppingToken)
    {
        throw new NotImplementedException();
    }
}
"#;

const TESTS_CSPROJ_XUNIT: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <RootNamespace>{{ROOT_NAMESPACE}}.Tests</RootNamespace>
    <IsPackable>false</IsPackable>
    <IsTestProject>true</IsTestProject>
  </PropertyGroup>

  <ItemGroup>
    <PackageReference Include="Microsoft.NET.Test.Sdk" Version="17.9.0" />
    <PackageReference Include="xunit" Version="2.7.0" />
    <PackageReference Include="xunit.runner.visualstudio" Version="2.5.7" />
  </ItemGroup>

  <ItemGroup>
    <ProjectReference Include="..\..\src\{{ROOT_NAMESPACE}}.Application\{{ROOT_NAMESPACE}}.Application.csproj" />
  </ItemGroup>
</Project>
"#;

const TESTS_XUNIT: &str = r#"using {{ROOT_NAMESPACE}}.Application.Orchestrators;
using Xunit;

namespace {{ROOT_NAMESPACE}}.Tests;

public class {{PROJECT_NAME}}OrchestratorTests
{
    [Fact(Skip = "Not yet implemented")]
    public void CreateAsync_returns_new_id()
    {
        throw new NotImplementedException();
    }
}
"#;

const TESTS_CSPROJ_NUNIT: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <RootNamespace>{{ROOT_NAMESPACE}}.Tests</RootNamespace>
    <IsPackable>false</IsPackable>
    <IsTestProject>true</IsTestProject>
  </PropertyGroup>

  <ItemGroup>
    <PackageReference Include="Microsoft.NET.Test.Sdk" Version="17.9.0" />
    <PackageReference Include="NUnit" Version="4.1.0" />
    <PackageReference Include="NUnit3TestAdapter" Version="4.5.0" />
  </ItemGroup>

  <ItemGroup>
    <ProjectReference Include="..\..\src\{{ROOT_NAMESPACE}}.Application\{{ROOT_NAMESPACE}}.Application.csproj" />
  </ItemGroup>
</Project>
"#;

const TESTS_NUNIT: &str = r#"using {{ROOT_NAMESPACE}}.Application.Orchestrators;
using NUnit.Framework;

namespace {{ROOT_NAMESPACE}}.Tests;

[TestFixture]
public class {{PROJECT_NAME}}OrchestratorTests
{
    [Test]
    [Ignore("Not yet implemented")]
    public void CreateAsync_returns_new_id()
    {
        throw new NotImplementedException();
    }
}
"#;

const TESTS_CSPROJ_MSTEST: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <RootNamespace>{{ROOT_NAMESPACE}}.Tests</RootNamespace>
    <IsPackable>false</IsPackable>
    <IsTestProject>true</IsTestProject>
  </PropertyGroup>

  <ItemGroup>
    <PackageReference Include="Microsoft.NET.Test.Sdk" Version="17.9.0" />
    <PackageReference Include="MSTest.TestAdapter" Version="3.3.1" />
    <PackageReference Include="MSTest.TestFramework" Version="3.3.1" />
  </ItemGroup>

  <ItemGroup>
    <ProjectReference Include="..\..\src\{{ROOT_NAMESPACE}}.Application\{{ROOT_NAMESPACE}}.Application.csproj" />
  </ItemGroup>
</Project>
"#;

const TESTS_MSTEST: &str = r#"using {{ROOT_NAMESPACE}}.Application.Orchestrators;
using Microsoft.VisualStudio.TestTools.UnitTesting;

namespace {{ROOT_NAMESPACE}}.Tests;

[TestClass]
public class {{PROJECT_NAME}}OrchestratorTests
{
    [TestMethod]
    [Ignore("Not yet implemented")]
    public void CreateAsync_returns_new_id()
    {
        throw new NotImplementedException();
    }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::domain::{RawParameters, substitution::find_leftover};

    fn template() -> Template {
        BuiltinTemplateSource
            .load(&ParameterSchema::standard())
            .unwrap()
    }

    fn output_paths(raw: &[(&str, &str)]) -> Vec<String> {
        let raw: RawParameters = raw
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let template = template();
        let params = ParameterSchema::standard().validate(&raw).unwrap();
        template
            .rules
            .resolve(template.paths(), &params)
            .into_iter()
            .map(|i| i.output.to_string())
            .collect()
    }

    #[test]
    fn builtin_template_compiles() {
        let template = template();
        assert_eq!(template.id.to_string(), "onion@1.0.0");
        assert_eq!(template.files.len(), FILES.len());
        assert!(template
            .file(&RelativePath::try_new("build.sh").unwrap())
            .unwrap()
            .permissions
            .executable_flag());
    }

    #[test]
    fn exactly_one_database_variant_is_selected() {
        for engine in ["none", "sqlserver", "postgres", "cassandra"] {
            let paths = output_paths(&[("orgName", "Acme"), ("databaseEngine", engine)]);
            let csproj = paths
                .iter()
                .filter(|p| p.ends_with("{{ROOT_NAMESPACE}}.Infrastructure.csproj"))
                .count();
            assert_eq!(csproj, 1, "engine {engine}");
            assert!(paths.iter().all(|p| !p.contains("_database")));
        }
    }

    #[test]
    fn exactly_one_test_framework_is_selected() {
        for framework in ["xunit", "nunit", "mstest"] {
            let paths = output_paths(&[("orgName", "Acme"), ("testFramework", framework)]);
            assert!(paths.contains(
                &"tests/{{ROOT_NAMESPACE}}.Tests/{{ROOT_NAMESPACE}}.Tests.csproj".to_string()
            ));
            assert!(paths.iter().all(|p| !p.contains("_framework")));
        }
    }

    #[test]
    fn client_folders_repeat_per_entry() {
        let paths = output_paths(&[("orgName", "Acme"), ("externalApiClients", "Payments,Crm")]);
        let clients: Vec<_> = paths.iter().filter(|p| p.contains("/Clients/")).collect();
        assert_eq!(clients.len(), 4);
        assert!(paths.iter().all(|p| !p.contains("_client")));
    }

    #[test]
    fn only_known_tokens_appear_in_content() {
        // C# code must not contain doubled braces that look like tokens.
        for (path, content) in FILES {
            for (start, _) in content.match_indices("{{") {
                let rest = &content[start..];
                let end = rest.find("}}").map(|e| e + 2).unwrap_or(rest.len());
                let token = &rest[..end];
                assert!(
                    find_leftover(token).is_some(),
                    "unknown token {token} in {path}"
                );
            }
        }
    }
}
