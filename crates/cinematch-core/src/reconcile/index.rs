use std::collections::HashMap;
use std::path::Path;

use crate::error::{CatalogError, Result};

/// Image extensions recognized by the asset store, in lookup priority order.
pub const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".webp"];

/// Case-insensitive index over candidate asset filenames.
///
/// Names keep the order they were supplied in; that order breaks ties in
/// fuzzy matching. When two names differ only by case, the first one wins.
#[derive(Debug, Clone, Default)]
pub struct AssetIndex {
    names: Vec<String>,
    by_lower: HashMap<String, usize>,
    basenames: Vec<(String, usize)>,
}

impl AssetIndex {
    /// Builds an index from candidate filenames.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = Self::default();
        for name in names {
            index.insert(name.into());
        }
        index
    }

    /// Lists `dir` and indexes every file whose extension is in `extensions`
    /// (case-insensitive). Names are sorted so the index is reproducible.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::AssetDirMissing` if `dir` does not exist, or
    /// `CatalogError::Io` if it cannot be read.
    pub fn from_dir(dir: &Path, extensions: &[&str]) -> Result<Self> {
        if !dir.is_dir() {
            return Err(CatalogError::AssetDirMissing(dir.to_path_buf()));
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let lower = name.to_lowercase();
            if extensions.iter().any(|ext| lower.ends_with(&ext.to_lowercase())) {
                names.push(name);
            }
        }
        names.sort();

        Ok(Self::new(names))
    }

    fn insert(&mut self, name: String) {
        let lower = name.to_lowercase();
        if self.by_lower.contains_key(&lower) {
            return;
        }
        let idx = self.names.len();
        let stem = match lower.rfind('.') {
            Some(dot) if dot > 0 => lower[..dot].to_string(),
            _ => lower.clone(),
        };
        self.by_lower.insert(lower, idx);
        self.basenames.push((stem, idx));
        self.names.push(name);
    }

    /// Looks up a filename case-insensitively, returning the stored spelling.
    pub fn get(&self, file_name: &str) -> Option<&str> {
        self.by_lower
            .get(&file_name.to_lowercase())
            .map(|&idx| self.names[idx].as_str())
    }

    /// Lowercase basenames (extension stripped) paired with their original
    /// filename, in index order.
    pub fn basenames(&self) -> impl Iterator<Item = (&str, &str)> {
        self.basenames
            .iter()
            .map(|(stem, idx)| (stem.as_str(), self.names[*idx].as_str()))
    }

    /// Original filenames in index order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
