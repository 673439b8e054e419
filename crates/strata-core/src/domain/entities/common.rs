use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::domain::error::DomainError;

/// A path inside a template or a generated tree.
///
/// Invariant: never absolute, never contains `..`, never empty. Enforced at
/// construction. Template paths and output paths always use `/` when
/// displayed, so rule matching behaves the same on every platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// Fallible constructor.
    ///
    /// Accepts both `/` and `\` as separators; `.` components are dropped.
    pub fn try_new(path: impl AsRef<str>) -> Result<Self, DomainError> {
        let raw = path.as_ref();
        let normalized = raw.replace('\\', "/");
        let candidate = Path::new(&normalized);

        if candidate.is_absolute() || normalized.starts_with('/') {
            return Err(DomainError::AbsolutePathNotAllowed {
                path: raw.to_string(),
            });
        }

        let mut clean = PathBuf::new();
        for component in candidate.components() {
            match component {
                Component::Normal(part) => clean.push(part),
                Component::CurDir => {}
                _ => {
                    return Err(DomainError::InvalidTemplate(format!(
                        "path '{raw}' must stay inside the output directory"
                    )));
                }
            }
        }

        if clean.as_os_str().is_empty() {
            return Err(DomainError::InvalidTemplate("path cannot be empty".into()));
        }

        Ok(Self(clean))
    }

    /// Whether `self` equals `prefix` or lies beneath it (component-wise).
    pub fn is_within(&self, prefix: &RelativePath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Replace the leading `prefix` with `replacement`.
    ///
    /// Returns `None` if `self` is not within `prefix`.
    pub fn replace_prefix(
        &self,
        prefix: &RelativePath,
        replacement: &RelativePath,
    ) -> Option<RelativePath> {
        let rest = self.0.strip_prefix(&prefix.0).ok()?;
        if rest.as_os_str().is_empty() {
            Some(replacement.clone())
        } else {
            Some(Self(replacement.0.join(rest)))
        }
    }

    /// Path with `/` separators regardless of platform.
    pub fn to_slash_string(&self) -> String {
        self.0
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_slash_string())
    }
}

/// Permissions a generated file is written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    executable: bool,
}

impl Permissions {
    pub const fn read_write() -> Self {
        Self { executable: false }
    }

    /// Scripts shipped with the template (e.g. `build.sh`).
    pub const fn executable() -> Self {
        Self { executable: true }
    }

    pub const fn executable_flag(&self) -> bool {
        self.executable
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::read_write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(s: &str) -> RelativePath {
        RelativePath::try_new(s).unwrap()
    }

    #[test]
    fn rejects_absolute_and_escaping_paths() {
        assert!(matches!(
            RelativePath::try_new("/etc/passwd"),
            Err(DomainError::AbsolutePathNotAllowed { .. })
        ));
        assert!(RelativePath::try_new("src/../../etc").is_err());
        assert!(RelativePath::try_new("").is_err());
        assert!(RelativePath::try_new("./").is_err());
    }

    #[test]
    fn normalizes_separators() {
        assert_eq!(rel("src\\Domain\\Entity.cs").to_slash_string(), "src/Domain/Entity.cs");
        assert_eq!(rel("./src//Domain/").to_slash_string(), "src/Domain");
    }

    #[test]
    fn within_is_component_wise() {
        assert!(rel("src/Api/Controllers/A.cs").is_within(&rel("src/Api")));
        assert!(rel("src/Api").is_within(&rel("src/Api")));
        assert!(!rel("src/ApiClient/A.cs").is_within(&rel("src/Api")));
    }

    #[test]
    fn replace_prefix_keeps_the_rest() {
        let moved = rel("infra/postgres/Context.cs")
            .replace_prefix(&rel("infra/postgres"), &rel("infra/Persistence"))
            .unwrap();
        assert_eq!(moved.to_slash_string(), "infra/Persistence/Context.cs");

        let exact = rel("a.postgres.csproj")
            .replace_prefix(&rel("a.postgres.csproj"), &rel("a.csproj"))
            .unwrap();
        assert_eq!(exact.to_slash_string(), "a.csproj");

        assert!(rel("other/x").replace_prefix(&rel("infra"), &rel("y")).is_none());
    }
}
