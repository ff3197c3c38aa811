pub mod catalog;
pub mod matching;

pub use catalog::CatalogEntry;
pub use matching::{
    AssetMatch, EmbeddingMatch, MatchStrategy, Resolution, Scan, SkipReason, SkippedEntry,
};
