//! # Cinematch
//!
//! Matches queries against a movie catalog: semantic search over embedding
//! vectors ([`embed`]) and tolerant reconciliation of titles to poster files
//! ([`core::reconcile`]).

pub use cinematch_core as core;
pub use cinematch_embed as embed;

pub use cinematch_core::{
    AssetIndex, AssetMatch, CatalogEntry, CatalogError, CatalogStore, EmbeddingMatch,
    InMemoryCatalog, MatchStrategy, Reconciler, ReconcilerConfig, Resolution, SyncReport,
    sync_images,
};
pub use cinematch_embed::{
    EmbeddingConfig, EmbeddingMatcher, EmbeddingProvider, MatchError, OpenAiEmbeddings,
    ProviderError,
};
