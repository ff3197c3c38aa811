use cinematch_core::{CatalogEntry, CatalogStore, EmbeddingMatch, vector};
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult, Result};
use crate::provider::EmbeddingProvider;

/// Semantic matcher over a caller-supplied catalog snapshot.
///
/// Holds only the provider and the dimensionality contract; catalog vectors
/// are decoded from their stored bytes on every scan.
pub struct EmbeddingMatcher<P> {
    provider: P,
    dimensions: usize,
}

impl<P: EmbeddingProvider> EmbeddingMatcher<P> {
    /// Create a matcher that expects `dimensions`-long vectors.
    pub fn new(provider: P, dimensions: usize) -> Self {
        Self {
            provider,
            dimensions,
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Embeds `query` and checks it against the dimensionality contract.
    ///
    /// # Errors
    ///
    /// Returns the provider's error unchanged, or
    /// `ProviderError::InvalidDimensions` for a wrongly sized vector.
    pub fn embed_query(&self, query: &str) -> ProviderResult<Vec<f32>> {
        let vector = self.provider.embed(query)?;
        if vector.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        if vector.len() != self.dimensions {
            return Err(ProviderError::InvalidDimensions {
                expected: self.dimensions,
                actual: vector.len(),
            });
        }
        Ok(vector)
    }

    /// Returns the catalog entry most similar to `query`.
    ///
    /// `Ok(None)` means no match: the catalog is empty or no entry had a
    /// scorable vector. An empty catalog short-circuits without calling the
    /// provider. Corrupt entries are logged and skipped; ties keep the
    /// earliest entry.
    ///
    /// # Errors
    ///
    /// Returns `MatchError::Provider` if the query cannot be embedded.
    pub fn find_best_match<'a>(
        &self,
        query: &str,
        catalog: &'a [CatalogEntry],
    ) -> Result<Option<EmbeddingMatch<'a>>> {
        if catalog.is_empty() {
            debug!("empty catalog, skipping provider call");
            return Ok(None);
        }

        let query_vector = self.embed_query(query)?;
        let scan = vector::scan(&query_vector, catalog, self.dimensions);

        match &scan.best {
            Some(best) => info!(
                query,
                model = self.provider.model_name(),
                title = %best.entry.title,
                score = best.score,
                skipped = scan.skipped.len(),
                "best match"
            ),
            None => info!(query, skipped = scan.skipped.len(), "no scorable entries"),
        }

        Ok(scan.best)
    }

    /// Returns up to `limit` entries ranked by similarity to `query`.
    ///
    /// # Errors
    ///
    /// Returns `MatchError::Provider` if the query cannot be embedded.
    pub fn rank<'a>(
        &self,
        query: &str,
        catalog: &'a [CatalogEntry],
        limit: usize,
    ) -> Result<Vec<EmbeddingMatch<'a>>> {
        if catalog.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self.embed_query(query)?;
        Ok(vector::rank(&query_vector, catalog, self.dimensions, limit))
    }

    /// Reads a snapshot from `store` and returns the best entry, owned.
    ///
    /// # Errors
    ///
    /// Returns `MatchError::Catalog` if the store cannot be read, or
    /// `MatchError::Provider` if the query cannot be embedded.
    pub fn find_in_store<S: CatalogStore + ?Sized>(
        &self,
        query: &str,
        store: &S,
    ) -> Result<Option<(CatalogEntry, f32)>> {
        let snapshot = store.entries()?;
        Ok(self
            .find_best_match(query, &snapshot)?
            .map(|m| (m.entry.clone(), m.score)))
    }
}
