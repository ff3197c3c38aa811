//! # Cinematch Core
//!
//! Matching engine for a movie catalog. Provides the vector primitives used
//! by semantic search and the tolerant title-to-asset reconciler.
//!
//! ## Quick Start
//!
//! ```rust
//! use cinematch_core::reconcile::{AssetIndex, Reconciler};
//!
//! let reconciler = Reconciler::with_defaults().unwrap();
//! let index = AssetIndex::new(["m_Matrix.jpg", "Amelie_2001.png"]);
//!
//! let found = reconciler.resolve_asset("The Matrix", &index);
//! assert_eq!(found.matched().map(|m| m.file_name.as_str()), Some("m_Matrix.jpg"));
//! ```
pub mod error;
pub mod normalize;
pub mod reconcile;
pub mod store;
pub mod types;
pub mod vector;

// Re-export primary API
pub use error::{CatalogError, Result};
pub use normalize::{NameVariants, TitleNormalizer, VariantRule, VariantRules};
pub use reconcile::{AssetIndex, Reconciler, ReconcilerConfig, SyncReport, sync_images};
pub use store::{CatalogStore, InMemoryCatalog};
pub use types::{
    AssetMatch, CatalogEntry, EmbeddingMatch, MatchStrategy, Resolution, Scan, SkipReason,
    SkippedEntry,
};
pub use vector::{best_match, cosine_similarity, decode_vector, encode_vector, rank, scan};
