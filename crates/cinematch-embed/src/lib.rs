//! # Cinematch Embed
//!
//! Semantic catalog search. Embeds a free-text query through an external
//! provider, then scores every catalog vector by cosine similarity with a
//! brute-force scan.

pub mod config;
pub mod error;
pub mod matcher;
pub mod provider;

pub use config::EmbeddingConfig;
pub use error::{MatchError, ProviderError};
pub use matcher::EmbeddingMatcher;
pub use provider::{EmbeddingProvider, OpenAiEmbeddings};
