//! Catalog store seam. The engines only read entries; the batch sync writes
//! resolved image paths back through [`CatalogStore::set_image`].

use crate::error::{CatalogError, Result};
use crate::types::CatalogEntry;

/// Source of catalog entries with a write path for resolved assets.
pub trait CatalogStore {
    /// Returns a snapshot of every entry, in store order.
    fn entries(&self) -> Result<Vec<CatalogEntry>>;

    /// Records the resolved image path for entry `id`.
    fn set_image(&mut self, id: i64, path: &str) -> Result<()>;
}

/// Vector-backed store, useful for embedding the engines and for tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    entries: Vec<CatalogEntry>,
}

impl InMemoryCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Borrow the stored entries.
    pub fn as_slice(&self) -> &[CatalogEntry] {
        &self.entries
    }
}

impl CatalogStore for InMemoryCatalog {
    fn entries(&self) -> Result<Vec<CatalogEntry>> {
        Ok(self.entries.clone())
    }

    fn set_image(&mut self, id: i64, path: &str) -> Result<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| CatalogError::Store(format!("no entry with id {id}")))?;
        entry.image = Some(path.to_string());
        Ok(())
    }
}
