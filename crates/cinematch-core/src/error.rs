use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during catalog matching operations.
///
/// A missing match is never an error: the engines report it as `None` or
/// [`crate::Resolution::Unresolved`].
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A stored embedding does not decode to the expected dimensionality.
    #[error(
        "corrupt vector for entry {id}: expected {expected} components, got {actual_bytes} bytes"
    )]
    CorruptVector {
        /// Identifier of the offending catalog entry (0 when unknown).
        id: i64,
        /// Expected number of `f32` components.
        expected: usize,
        /// Length of the stored byte buffer.
        actual_bytes: usize,
    },

    /// The asset directory to index does not exist.
    #[error("asset directory not found: {}", .0.display())]
    AssetDirMissing(PathBuf),

    /// Filesystem error while listing assets.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),

    /// The catalog store failed to read or write an entry.
    #[error("catalog store error: {0}")]
    Store(String),
}

impl CatalogError {
    /// Tags a `CorruptVector` error with the offending entry's id.
    #[must_use]
    pub fn with_entry_id(self, entry_id: i64) -> Self {
        match self {
            Self::CorruptVector {
                expected,
                actual_bytes,
                ..
            } => Self::CorruptVector {
                id: entry_id,
                expected,
                actual_bytes,
            },
            other => other,
        }
    }
}

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
