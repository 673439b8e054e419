use std::collections::BTreeMap;

use crate::domain::{
    entities::common::{Permissions, RelativePath},
    error::DomainError,
};

/// Final file tree ready for materialization.
///
/// The output of planning: every path is substituted, every file is
/// token-free, and no two files share an output path. It contains no
/// business logic, only data. Iteration is sorted by output path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedTree {
    files: BTreeMap<RelativePath, GeneratedFile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: RelativePath,
    pub content: String,
    pub permissions: Permissions,
    /// Template path the file was produced from, kept for collision reports.
    pub source: RelativePath,
}

impl GeneratedFile {
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

impl GeneratedTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file.
    ///
    /// # Errors
    ///
    /// `PathCollision` if another file already claims the same output path.
    pub fn insert(&mut self, file: GeneratedFile) -> Result<(), DomainError> {
        if let Some(existing) = self.files.get(&file.path) {
            return Err(DomainError::PathCollision {
                path: file.path.to_string(),
                first: existing.source.to_string(),
                second: file.source.to_string(),
            });
        }
        self.files.insert(file.path.clone(), file);
        Ok(())
    }

    pub fn get(&self, path: &RelativePath) -> Option<&GeneratedFile> {
        self.files.get(path)
    }

    pub fn files(&self) -> impl Iterator<Item = &GeneratedFile> {
        self.files.values()
    }

    /// Distinct parent directories, sorted.
    pub fn directories(&self) -> Vec<RelativePath> {
        let mut dirs: Vec<RelativePath> = self
            .files
            .keys()
            .filter_map(|p| p.as_path().parent())
            .filter(|parent| !parent.as_os_str().is_empty())
            .filter_map(|parent| RelativePath::try_new(parent.to_string_lossy()).ok())
            .collect();
        dirs.sort();
        dirs.dedup();
        dirs
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.files.values().map(GeneratedFile::size).sum()
    }
}
