//! # Vector Primitives
//!
//! Byte decoding for stored embeddings, cosine similarity and the
//! brute-force catalog scan. No index is built: every query touches every
//! entry, O(n·d).

use tracing::{debug, warn};

use crate::error::{CatalogError, Result};
use crate::types::{CatalogEntry, EmbeddingMatch, Scan, SkipReason, SkippedEntry};

/// Size in bytes of one stored component.
const COMPONENT_BYTES: usize = std::mem::size_of::<f32>();

/// Decodes a little-endian `f32` buffer.
///
/// # Errors
///
/// Returns `CatalogError::CorruptVector` if the buffer length is not a
/// multiple of four or does not hold exactly `dimensions` components.
pub fn decode_vector(bytes: &[u8], dimensions: usize) -> Result<Vec<f32>> {
    if bytes.len() % COMPONENT_BYTES != 0 || bytes.len() / COMPONENT_BYTES != dimensions {
        return Err(CatalogError::CorruptVector {
            id: 0,
            expected: dimensions,
            actual_bytes: bytes.len(),
        });
    }

    Ok(bytes
        .chunks_exact(COMPONENT_BYTES)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

/// Encodes components as little-endian bytes, the inverse of [`decode_vector`].
#[must_use]
pub fn encode_vector(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Cosine similarity `dot(a, b) / (‖a‖·‖b‖)`.
///
/// Returns `None` when the lengths differ, either vector is empty, or either
/// norm is zero. Accumulates in `f64`.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let (dot, norm_a, norm_b) = a.iter().zip(b).fold(
        (0.0f64, 0.0f64, 0.0f64),
        |(dot, na, nb), (&x, &y)| {
            let (x, y) = (f64::from(x), f64::from(y));
            (dot + x * y, na + x * x, nb + y * y)
        },
    );

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }

    Some((dot / denom) as f32)
}

/// Scores every catalog entry against `query`.
///
/// Entries whose stored vector is corrupt are logged and skipped; entries
/// with an undefined similarity are skipped. The incumbent best is only
/// replaced by a strictly greater score, so the earliest entry wins ties.
pub fn scan<'a>(query: &[f32], catalog: &'a [CatalogEntry], dimensions: usize) -> Scan<'a> {
    let mut result = Scan::default();

    for (index, entry) in catalog.iter().enumerate() {
        let vector = match entry.decode_embedding(dimensions) {
            Ok(v) => v,
            Err(err) => {
                warn!(id = entry.id, title = %entry.title, "skipping entry: {err}");
                result.skipped.push(SkippedEntry {
                    id: entry.id,
                    index,
                    reason: SkipReason::CorruptVector,
                });
                continue;
            }
        };

        let Some(score) = cosine_similarity(query, &vector) else {
            debug!(id = entry.id, "similarity undefined (zero norm)");
            result.skipped.push(SkippedEntry {
                id: entry.id,
                index,
                reason: SkipReason::ZeroNorm,
            });
            continue;
        };

        let candidate = EmbeddingMatch {
            entry,
            index,
            score,
        };
        if result.best.is_none_or(|best| score > best.score) {
            result.best = Some(candidate);
        }
        result.scored.push(candidate);
    }

    result
}

/// Returns the best entry for `query`, or `None` for an empty or fully
/// unscorable catalog.
#[must_use]
pub fn best_match<'a>(
    query: &[f32],
    catalog: &'a [CatalogEntry],
    dimensions: usize,
) -> Option<EmbeddingMatch<'a>> {
    scan(query, catalog, dimensions).best
}

/// Returns up to `limit` scored entries, best first. Ties keep catalog order.
#[must_use]
pub fn rank<'a>(
    query: &[f32],
    catalog: &'a [CatalogEntry],
    dimensions: usize,
    limit: usize,
) -> Vec<EmbeddingMatch<'a>> {
    let mut scored = scan(query, catalog, dimensions).scored;
    // Stable sort keeps the earlier index first among equal scores.
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(limit);
    scored
}
