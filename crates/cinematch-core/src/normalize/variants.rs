//! # Name Variants
//!
//! Alternative renderings of a canonical token that match common asset
//! naming conventions. Generation is driven by an ordered rule table so the
//! heuristics can be tested and extended without touching the resolver.

use serde::{Deserialize, Serialize};

/// Word separator inside canonical tokens.
pub const SEPARATOR: char = '_';

/// Leading definite articles stripped by the default rules (English,
/// Spanish, French).
pub const DEFAULT_ARTICLES: &[&str] = &["the_", "el_", "la_", "los_", "las_", "le_", "les_"];

/// Short words dropped by the default rules.
pub const DEFAULT_STOP_WORDS: &[&str] = &["a", "of", "the", "and"];

/// One transformation applied to the canonical token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariantRule {
    /// Remove a leading prefix, compared case-insensitively. Each matching
    /// prefix yields its own variant.
    StripPrefix(Vec<String>),
    /// Replace every separator with the given character.
    ReplaceSeparator(char),
    /// Drop the listed words (case-insensitive) when the token has at least
    /// `min_words` words and something remains.
    DropWords {
        /// Words to remove.
        words: Vec<String>,
        /// Minimum word count for the rule to apply.
        min_words: usize,
    },
    /// Keep only the text before the first separator.
    TruncateAtSeparator,
}

impl VariantRule {
    /// Applies the rule, pushing zero or more variants onto `out`.
    fn apply(&self, token: &str, out: &mut Vec<String>) {
        match self {
            Self::StripPrefix(prefixes) => {
                for prefix in prefixes {
                    if let Some(rest) = strip_prefix_ignore_case(token, prefix) {
                        out.push(rest.to_string());
                    }
                }
            }
            Self::ReplaceSeparator(replacement) => {
                out.push(token.replace(SEPARATOR, &replacement.to_string()));
            }
            Self::DropWords { words, min_words } => {
                let parts: Vec<&str> = token.split(SEPARATOR).collect();
                if parts.len() >= *min_words {
                    let kept: Vec<&str> = parts
                        .into_iter()
                        .filter(|part| !words.iter().any(|w| w.eq_ignore_ascii_case(part)))
                        .collect();
                    if !kept.is_empty() {
                        out.push(kept.join(&SEPARATOR.to_string()));
                    }
                }
            }
            Self::TruncateAtSeparator => {
                if let Some((head, _)) = token.split_once(SEPARATOR) {
                    out.push(head.to_string());
                }
            }
        }
    }
}

/// Case-insensitive ASCII prefix strip that never splits a character.
fn strip_prefix_ignore_case<'a>(token: &'a str, prefix: &str) -> Option<&'a str> {
    let head = token.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &token[prefix.len()..])
}

/// Ordered table of variant rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRules {
    rules: Vec<VariantRule>,
}

impl Default for VariantRules {
    fn default() -> Self {
        Self::new(vec![
            VariantRule::StripPrefix(DEFAULT_ARTICLES.iter().map(|s| (*s).to_string()).collect()),
            VariantRule::ReplaceSeparator('-'),
            VariantRule::DropWords {
                words: DEFAULT_STOP_WORDS.iter().map(|s| (*s).to_string()).collect(),
                min_words: 3,
            },
            VariantRule::TruncateAtSeparator,
        ])
    }
}

impl VariantRules {
    /// Creates a rule table; rules run in the given order.
    pub fn new(rules: Vec<VariantRule>) -> Self {
        Self { rules }
    }

    /// Appends a rule to the end of the table.
    pub fn with_rule(mut self, rule: VariantRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// The rules in application order.
    pub fn rules(&self) -> &[VariantRule] {
        &self.rules
    }

    /// Generates the ordered variant set for a canonical token.
    ///
    /// # Examples
    /// ```
    /// use cinematch_core::normalize::VariantRules;
    ///
    /// let variants = VariantRules::default().generate("The_Matrix");
    /// assert_eq!(variants.primary(), Some("The_Matrix"));
    /// assert!(variants.contains("Matrix"));
    /// ```
    pub fn generate(&self, canonical: &str) -> NameVariants {
        let mut raw = vec![canonical.to_string()];
        for rule in &self.rules {
            rule.apply(canonical, &mut raw);
        }
        NameVariants::from_raw(raw)
    }
}

/// Ordered, deduplicated, non-empty set of name variants.
///
/// The first element is the canonical token, the most faithful rendering,
/// and the one used for fuzzy scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameVariants(Vec<String>);

impl NameVariants {
    fn from_raw(raw: Vec<String>) -> Self {
        let mut variants: Vec<String> = Vec::with_capacity(raw.len());
        for v in raw {
            if !v.is_empty() && !variants.contains(&v) {
                variants.push(v);
            }
        }
        Self(variants)
    }

    /// The canonical token, if the title produced one.
    pub fn primary(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Returns `true` if `variant` is in the set (exact comparison).
    pub fn contains(&self, variant: &str) -> bool {
        self.0.iter().any(|v| v == variant)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}
