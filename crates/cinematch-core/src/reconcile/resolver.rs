//! # Fuzzy Name Reconciler
//!
//! Resolves a human title to one asset filename: exact lookup of every
//! variant and extension first, then a shared-subsequence ratio of the
//! primary variant against all candidate basenames.

use similar::TextDiff;
use tracing::debug;

use crate::error::Result;
use crate::normalize::{NameVariants, TitleNormalizer, VariantRules};
use crate::reconcile::index::{AssetIndex, IMAGE_EXTENSIONS};
use crate::types::{AssetMatch, MatchStrategy, Resolution};

/// Minimum similarity ratio for a fuzzy match to be accepted.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.75;

/// Prefix used by the asset naming convention (`m_<title>.<ext>`).
pub const DEFAULT_PREFIX: &str = "m_";

/// Configuration for the reconciler.
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Filename prefix tried before the bare form.
    pub prefix: String,
    /// Extensions tried for exact lookup, in priority order.
    pub extensions: Vec<String>,
    /// Minimum fuzzy ratio in `[0.0, 1.0]`.
    pub fuzzy_threshold: f64,
    /// Variant generation rules.
    pub rules: VariantRules,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            extensions: IMAGE_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            rules: VariantRules::default(),
        }
    }
}

impl ReconcilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filename prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the extension priority list.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the fuzzy acceptance threshold.
    pub fn with_fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.fuzzy_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Replace the variant rule table.
    pub fn with_rules(mut self, rules: VariantRules) -> Self {
        self.rules = rules;
        self
    }
}

/// Title-to-asset reconciler. Stateless across calls.
pub struct Reconciler {
    config: ReconcilerConfig,
    normalizer: TitleNormalizer,
}

impl Reconciler {
    /// Create a reconciler with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::RegexError` if the normalizer fails to build.
    pub fn new(config: ReconcilerConfig) -> Result<Self> {
        Ok(Self {
            config,
            normalizer: TitleNormalizer::new()?,
        })
    }

    /// Create a reconciler with default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(ReconcilerConfig::default())
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Normalizes `title` and expands it into its ordered variant set.
    pub fn variants(&self, title: &str) -> NameVariants {
        let canonical = self.normalizer.canonical(title);
        self.config.rules.generate(&canonical)
    }

    /// Resolves `title` against the candidate index.
    ///
    /// # Examples
    /// ```
    /// use cinematch_core::reconcile::{AssetIndex, Reconciler};
    /// use cinematch_core::MatchStrategy;
    ///
    /// let reconciler = Reconciler::with_defaults().unwrap();
    /// let index = AssetIndex::new(["m_Matrix.jpg"]);
    /// let found = reconciler.resolve_asset("The Matrix", &index);
    ///
    /// let m = found.matched().unwrap();
    /// assert_eq!(m.file_name, "m_Matrix.jpg");
    /// assert_eq!(m.strategy, MatchStrategy::Exact);
    /// ```
    pub fn resolve_asset(&self, title: &str, index: &AssetIndex) -> Resolution {
        let variants = self.variants(title);

        if let Some(found) = self
            .resolve_exact(&variants, index)
            .or_else(|| self.resolve_fuzzy(&variants, index))
        {
            debug!(title, file = %found.file_name, strategy = %found.strategy, "asset resolved");
            return Resolution::Resolved(found);
        }

        Resolution::Unresolved {
            attempted: variants.into_vec(),
        }
    }

    /// Filenames reported for unresolved variants, using the configured
    /// prefix and the highest-priority extension.
    pub fn attempted_file_names(&self, attempted: &[String]) -> Vec<String> {
        let ext = self.config.extensions.first().map_or("", String::as_str);
        attempted
            .iter()
            .map(|variant| format!("{}{variant}{ext}", self.config.prefix))
            .collect()
    }

    /// Tries `<prefix><variant><ext>` then `<variant><ext>` for every variant
    /// and extension, in priority order. The first hit wins.
    fn resolve_exact(&self, variants: &NameVariants, index: &AssetIndex) -> Option<AssetMatch> {
        for variant in variants.iter() {
            for ext in &self.config.extensions {
                let bare = format!("{variant}{ext}");
                let prefixed = format!("{}{bare}", self.config.prefix);
                for candidate in [prefixed, bare] {
                    if let Some(file_name) = index.get(&candidate) {
                        return Some(AssetMatch {
                            file_name: file_name.to_string(),
                            strategy: MatchStrategy::Exact,
                            variant: variant.to_string(),
                            ratio: None,
                        });
                    }
                }
            }
        }
        None
    }

    /// Scores the primary variant and its prefixed form against every
    /// basename. The best ratio wins; ties keep the earlier candidate and the
    /// bare form. Accepted only at or above the threshold.
    fn resolve_fuzzy(&self, variants: &NameVariants, index: &AssetIndex) -> Option<AssetMatch> {
        let primary = variants.primary()?.to_lowercase();
        let references = [
            primary.clone(),
            format!("{}{primary}", self.config.prefix.to_lowercase()),
        ];

        let mut best: Option<(f64, &str, &str)> = None;
        for reference in &references {
            for (stem, file_name) in index.basenames() {
                let ratio = stem_ratio(reference, stem);
                if best.is_none_or(|(score, _, _)| ratio > score) {
                    best = Some((ratio, reference.as_str(), file_name));
                }
            }
        }

        let (ratio, reference, file_name) = best?;
        if ratio < self.config.fuzzy_threshold {
            debug!(reference, ratio, "best fuzzy candidate below threshold");
            return None;
        }

        Some(AssetMatch {
            file_name: file_name.to_string(),
            strategy: MatchStrategy::Fuzzy,
            variant: reference.to_string(),
            ratio: Some(ratio),
        })
    }
}

/// Fuzzy ratio between two lowercase strings in `[0.0, 1.0]`.
///
/// `2 * M / T`, where `M` is the number of characters in the longest shared
/// subsequence and `T` the combined length.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    f64::from(TextDiff::from_chars(a, b).ratio())
}

/// Ratio against a basename, also trying it without a `_<year>` suffix.
fn stem_ratio(reference: &str, stem: &str) -> f64 {
    let full = similarity_ratio(reference, stem);
    match strip_year_suffix(stem) {
        Some(bare) => full.max(similarity_ratio(reference, bare)),
        None => full,
    }
}

/// `"amelie_2001"` -> `Some("amelie")`.
fn strip_year_suffix(stem: &str) -> Option<&str> {
    let (head, tail) = stem.rsplit_once('_')?;
    (!head.is_empty() && tail.len() == 4 && tail.bytes().all(|b| b.is_ascii_digit()))
        .then_some(head)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconciler() -> Reconciler {
        Reconciler::with_defaults().unwrap()
    }

    #[test]
    fn article_stripped_variant_matches_prefixed_file() {
        let index = AssetIndex::new(["m_Matrix.jpg", "m_Heat.png"]);
        let res = reconciler().resolve_asset("The Matrix", &index);
        let m = res.matched().unwrap();
        assert_eq!(m.file_name, "m_Matrix.jpg");
        assert_eq!(m.strategy, MatchStrategy::Exact);
        assert_eq!(m.variant, "Matrix");
        assert_eq!(m.ratio, None);
    }

    #[test]
    fn prefixed_form_beats_bare_form() {
        let index = AssetIndex::new(["Heat.png", "m_Heat.png"]);
        let res = reconciler().resolve_asset("Heat", &index);
        assert_eq!(res.matched().unwrap().file_name, "m_Heat.png");
    }

    #[test]
    fn variant_order_beats_extension_order() {
        // Canonical variant with a late extension wins over a later variant
        // with the first extension.
        let index = AssetIndex::new(["m_Matrix.png", "m_The_Matrix.webp"]);
        let res = reconciler().resolve_asset("The Matrix", &index);
        assert_eq!(res.matched().unwrap().file_name, "m_The_Matrix.webp");
    }

    #[test]
    fn exact_lookup_is_case_insensitive() {
        let index = AssetIndex::new(["M_AMELIE.JPEG"]);
        let res = reconciler().resolve_asset("Amélie", &index);
        let m = res.matched().unwrap();
        assert_eq!(m.file_name, "M_AMELIE.JPEG");
        assert_eq!(m.strategy, MatchStrategy::Exact);
    }

    #[test]
    fn hyphen_variant_matches() {
        let index = AssetIndex::new(["Alice-in-Wonderland.webp"]);
        let res = reconciler().resolve_asset("Alice in Wonderland", &index);
        assert_eq!(
            res.matched().unwrap().file_name,
            "Alice-in-Wonderland.webp"
        );
    }

    #[test]
    fn fuzzy_fallback_accepts_close_basename() {
        let index = AssetIndex::new(["Amelie_2001.png", "m_Zodiac.jpg"]);
        let res = reconciler().resolve_asset("Amélie", &index);
        let m = res.matched().unwrap();
        assert_eq!(m.file_name, "Amelie_2001.png");
        assert_eq!(m.strategy, MatchStrategy::Fuzzy);
        assert_eq!(m.variant, "amelie");
        assert_eq!(m.ratio, Some(1.0));
    }

    #[test]
    fn shared_prefix_alone_is_not_a_match() {
        for (title, file) in [
            ("Star Wars", "m_Star_Trek.jpg"),
            ("Up", "m_Upgrade.png"),
            ("Alien", "m_Aliens_vs_Predator.png"),
        ] {
            let index = AssetIndex::new([file]);
            let res = reconciler().resolve_asset(title, &index);
            assert!(!res.is_resolved(), "{title} matched {res:?}");
        }
    }

    #[test]
    fn ratio_at_threshold_is_accepted() {
        // "m_heat" vs "m_heathers": 2 * 6 / 16 = 0.75
        let index = AssetIndex::new(["m_Heathers.jpg"]);
        let res = reconciler().resolve_asset("Heat", &index);
        let m = res.matched().unwrap();
        assert_eq!(m.strategy, MatchStrategy::Fuzzy);
        assert_eq!(m.variant, "m_heat");
        assert_eq!(m.ratio, Some(DEFAULT_FUZZY_THRESHOLD));

        let stricter =
            Reconciler::new(ReconcilerConfig::new().with_fuzzy_threshold(0.76)).unwrap();
        assert!(!stricter.resolve_asset("Heat", &index).is_resolved());
    }

    #[test]
    fn fuzzy_tie_keeps_earlier_candidate() {
        let index = AssetIndex::new(["m_Godfathe.jpg", "m_Godfathr.jpg"]);
        let m = reconciler().resolve_asset("Godfather", &index).matched().cloned().unwrap();
        assert_eq!(m.file_name, "m_Godfathe.jpg");

        let index = AssetIndex::new(["m_Godfathr.jpg", "m_Godfathe.jpg"]);
        let m = reconciler().resolve_asset("Godfather", &index).matched().cloned().unwrap();
        assert_eq!(m.file_name, "m_Godfathr.jpg");
    }

    #[test]
    fn fuzzy_tie_keeps_bare_form() {
        // With an empty prefix both references are the same string; the bare
        // one is scored first and must be kept.
        let r = Reconciler::new(ReconcilerConfig::new().with_prefix("")).unwrap();
        let index = AssetIndex::new(["Godfathr.jpg"]);
        let m = r.resolve_asset("Godfather", &index).matched().cloned().unwrap();
        assert_eq!(m.variant, "godfather");
        assert_eq!(m.file_name, "Godfathr.jpg");
    }

    #[test]
    fn year_suffix_is_stripped_only_for_four_digits() {
        assert_eq!(strip_year_suffix("amelie_2001"), Some("amelie"));
        assert_eq!(strip_year_suffix("rocky_2"), None);
        assert_eq!(strip_year_suffix("_2001"), None);
        assert_eq!(strip_year_suffix("heat"), None);
    }

    #[test]
    fn fuzzy_fallback_rejects_weak_candidates() {
        let index = AssetIndex::new(["m_Zodiac.jpg", "Heat.png"]);
        let res = reconciler().resolve_asset("Amélie", &index);
        match res {
            Resolution::Unresolved { attempted } => assert_eq!(attempted, vec!["Amelie"]),
            other => panic!("expected unresolved, got {other:?}"),
        }
    }

    #[test]
    fn fuzzy_matches_prefixed_basename() {
        let index = AssetIndex::new(["m_Godfathr.jpg"]);
        let res = reconciler().resolve_asset("Godfather", &index);
        let m = res.matched().unwrap();
        assert_eq!(m.file_name, "m_Godfathr.jpg");
        assert_eq!(m.variant, "m_godfather");
    }

    #[test]
    fn empty_index_is_unresolved() {
        let res = reconciler().resolve_asset("The Matrix", &AssetIndex::default());
        assert!(!res.is_resolved());
    }

    #[test]
    fn empty_title_is_unresolved_without_attempts() {
        let index = AssetIndex::new(["m_Heat.png"]);
        match reconciler().resolve_asset("  ", &index) {
            Resolution::Unresolved { attempted } => assert!(attempted.is_empty()),
            other => panic!("expected unresolved, got {other:?}"),
        }
    }

    #[test]
    fn threshold_is_clamped_and_configurable() {
        let config = ReconcilerConfig::new().with_fuzzy_threshold(4.0);
        assert_eq!(config.fuzzy_threshold, 1.0);

        let strict = Reconciler::new(ReconcilerConfig::new().with_fuzzy_threshold(0.99)).unwrap();
        let index = AssetIndex::new(["m_Godfathr.jpg"]);
        assert!(!strict.resolve_asset("Godfather", &index).is_resolved());
    }

    #[test]
    fn custom_prefix_and_extensions() {
        let config = ReconcilerConfig::new()
            .with_prefix("poster-")
            .with_extensions([".gif"]);
        let r = Reconciler::new(config).unwrap();
        let index = AssetIndex::new(["poster-Heat.gif", "m_Heat.png"]);
        assert_eq!(
            r.resolve_asset("Heat", &index).matched().unwrap().file_name,
            "poster-Heat.gif"
        );
    }

    #[test]
    fn attempted_file_names_follow_config() {
        let attempted = vec!["The_Matrix".to_string(), "Matrix".to_string()];
        assert_eq!(
            reconciler().attempted_file_names(&attempted),
            vec!["m_The_Matrix.png", "m_Matrix.png"]
        );

        let custom = Reconciler::new(
            ReconcilerConfig::new()
                .with_prefix("poster-")
                .with_extensions([".gif"]),
        )
        .unwrap();
        assert_eq!(custom.attempted_file_names(&attempted[1..]), vec!["poster-Matrix.gif"]);
    }

    #[test]
    fn similarity_ratio_bounds() {
        assert_eq!(similarity_ratio("amelie", "amelie"), 1.0);
        assert_eq!(similarity_ratio("abcd", "abxy"), 0.5);
        assert!(similarity_ratio("amelie", "amelie_2001") < 0.75);
        assert_eq!(stem_ratio("amelie", "amelie_2001"), 1.0);
        assert!(similarity_ratio("amelie", "zodiac") < 0.75);
        assert_eq!(similarity_ratio("", "heat"), 0.0);
    }
}
