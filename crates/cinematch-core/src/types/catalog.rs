use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::vector::decode_vector;

/// A single catalog record as yielded by the catalog store.
///
/// The embedding is kept in its stored byte form and decoded on every read,
/// so the matching engines never hold a second copy of the vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Store identifier.
    pub id: i64,

    /// Display title.
    pub title: String,

    /// Raw little-endian `f32` components.
    #[serde(default)]
    pub embedding: Vec<u8>,

    /// Release year.
    pub year: Option<i32>,

    /// Genre list as stored (comma separated).
    pub genre: Option<String>,

    /// Resolved image asset path, relative to the media root.
    pub image: Option<String>,
}

impl CatalogEntry {
    /// Creates an entry with only an identifier and title.
    #[must_use]
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            embedding: Vec::new(),
            year: None,
            genre: None,
            image: None,
        }
    }

    /// Sets the raw embedding bytes.
    #[must_use]
    pub fn with_embedding(mut self, bytes: Vec<u8>) -> Self {
        self.embedding = bytes;
        self
    }

    /// Sets the release year.
    #[must_use]
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Sets the genre string.
    #[must_use]
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    /// Decodes the stored embedding.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CorruptVector` tagged with this entry's id when
    /// the buffer does not hold exactly `dimensions` components.
    pub fn decode_embedding(&self, dimensions: usize) -> Result<Vec<f32>> {
        decode_vector(&self.embedding, dimensions).map_err(|err| err.with_entry_id(self.id))
    }

    /// Returns `true` if an image asset has been associated.
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image.as_deref().is_some_and(|path| !path.is_empty())
    }
}

impl std::fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)?;
        if let Some(year) = self.year {
            write!(f, " ({year})")?;
        }
        Ok(())
    }
}
