use std::fmt;

use serde::{Deserialize, Serialize};

use super::catalog::CatalogEntry;

/// The best-scoring catalog entry for one query vector.
///
/// Scores are only comparable within a single query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmbeddingMatch<'a> {
    /// The winning entry.
    pub entry: &'a CatalogEntry,
    /// Position of the entry in the scanned catalog.
    pub index: usize,
    /// Cosine similarity in `[-1.0, 1.0]`.
    pub score: f32,
}

/// Why a catalog entry did not take part in scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Stored bytes do not decode to the expected dimensionality.
    CorruptVector,
    /// One of the vectors has zero norm, so the similarity is undefined.
    ZeroNorm,
}

/// An entry left out of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Identifier of the entry.
    pub id: i64,
    /// Position of the entry in the scanned catalog.
    pub index: usize,
    /// Reason it was skipped.
    pub reason: SkipReason,
}

/// Outcome of a full brute-force scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scan<'a> {
    /// Best entry, or `None` when nothing produced a defined similarity.
    pub best: Option<EmbeddingMatch<'a>>,
    /// Every scored entry, in catalog order.
    pub scored: Vec<EmbeddingMatch<'a>>,
    /// Entries excluded from scoring.
    pub skipped: Vec<SkippedEntry>,
}

/// Which resolution step produced an asset match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStrategy {
    /// A variant with a known extension matched a candidate name exactly.
    Exact,
    /// The primary variant was close enough to a candidate basename.
    Fuzzy,
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Fuzzy => write!(f, "fuzzy"),
        }
    }
}

/// A title resolved to one candidate asset filename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetMatch {
    /// Candidate filename exactly as listed by the asset store.
    pub file_name: String,
    /// Strategy that produced the match.
    pub strategy: MatchStrategy,
    /// The variant (or prefixed form) that matched.
    pub variant: String,
    /// Similarity ratio for fuzzy matches.
    pub ratio: Option<f64>,
}

/// Result of reconciling one title against the asset index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Resolution {
    /// An asset was found.
    Resolved(AssetMatch),
    /// Nothing met the acceptance criteria.
    Unresolved {
        /// Variants that were tried, most faithful first.
        attempted: Vec<String>,
    },
}

impl Resolution {
    /// Returns the match, if any.
    #[must_use]
    pub fn matched(&self) -> Option<&AssetMatch> {
        match self {
            Self::Resolved(m) => Some(m),
            Self::Unresolved { .. } => None,
        }
    }

    /// Returns `true` if an asset was found.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved(m) => {
                write!(f, "{} ({}", m.file_name, m.strategy)?;
                if let Some(ratio) = m.ratio {
                    write!(f, ", ratio={ratio:.2}")?;
                }
                write!(f, ")")
            }
            Self::Unresolved { attempted } => {
                write!(f, "not found (tried: ")?;
                for (i, variant) in attempted.iter().take(3).enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{variant}")?;
                }
                write!(f, "...)")
            }
        }
    }
}
