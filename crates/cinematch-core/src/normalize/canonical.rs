use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::error::Result;

/// Characters trimmed from both ends of a canonical token.
const EDGE_SEPARATORS: &[char] = &['_', '.', '-'];

/// Converts human titles into canonical filename-like tokens.
///
/// `"Amélie & Co."` becomes `"Amelie_and_Co"`: diacritics are folded to
/// their base letters, `&` is spelled out, punctuation other than `.` and
/// `-` becomes whitespace, and words are joined with single underscores.
///
/// Folding runs first, so non-ASCII punctuation such as typographic quotes
/// is dropped outright (`Schindler’s` -> `Schindlers`) while a straight
/// apostrophe splits the word (`Schindler's` -> `Schindler_s`).
pub struct TitleNormalizer {
    re_disallowed: Regex,
    re_whitespace: Regex,
    re_underscores: Regex,
}

impl TitleNormalizer {
    /// Constructs a normalizer with pre-compiled patterns.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::RegexError` if any pattern fails to compile
    /// (should never happen with the static patterns defined here).
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_disallowed: Regex::new(r"[^A-Za-z0-9_\s.\-]")?,
            re_whitespace: Regex::new(r"\s+")?,
            re_underscores: Regex::new(r"_+")?,
        })
    }

    /// Returns the canonical token for `title`.
    ///
    /// Empty or whitespace-only titles yield an empty token. The function is
    /// idempotent: normalizing a canonical token returns it unchanged.
    ///
    /// # Examples
    /// ```
    /// use cinematch_core::normalize::TitleNormalizer;
    ///
    /// let normalizer = TitleNormalizer::new().unwrap();
    /// assert_eq!(normalizer.canonical("Amélie & Co."), "Amelie_and_Co");
    /// assert_eq!(normalizer.canonical("The Matrix"), "The_Matrix");
    /// ```
    pub fn canonical(&self, title: &str) -> String {
        let ascii = fold_to_ascii(title.trim());
        let replaced = replace_literals(&ascii);
        let cleaned = self.re_disallowed.replace_all(&replaced, " ");
        let collapsed = self.re_whitespace.replace_all(cleaned.trim(), "_");
        let joined = self.re_underscores.replace_all(&collapsed, "_");
        joined.trim_matches(EDGE_SEPARATORS).to_string()
    }
}

/// Spells out `&`.
fn replace_literals(s: &str) -> String {
    s.replace('&', " and ")
}

/// Compatibility decomposition followed by dropping every non-ASCII code
/// point, which leaves accented letters as their base letter.
fn fold_to_ascii(s: &str) -> String {
    s.nfkd().filter(char::is_ascii).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(title: &str) -> String {
        TitleNormalizer::new().unwrap().canonical(title)
    }

    #[test]
    fn strips_diacritics() {
        assert_eq!(canonical("Café"), "Cafe");
        assert_eq!(canonical("Amélie"), "Amelie");
        assert_eq!(canonical("Pokémon: Mewtwo Strikes Back"), "Pokemon_Mewtwo_Strikes_Back");
    }

    #[test]
    fn spells_out_ampersand_and_trims_trailing_dot() {
        assert_eq!(canonical("Amélie & Co."), "Amelie_and_Co");
        assert_eq!(canonical("Fast & Furious"), "Fast_and_Furious");
    }

    #[test]
    fn joins_words_with_single_underscore() {
        assert_eq!(canonical("The Matrix"), "The_Matrix");
        assert_eq!(canonical("  Alice   in \t Wonderland "), "Alice_in_Wonderland");
        assert_eq!(canonical("Star Wars: Episode IV"), "Star_Wars_Episode_IV");
        assert_eq!(canonical("Snake__Eyes"), "Snake_Eyes");
    }

    #[test]
    fn keeps_inner_dots_and_hyphens() {
        assert_eq!(canonical("Mr. Smith Goes to Washington"), "Mr._Smith_Goes_to_Washington");
        assert_eq!(canonical("Spider-Man"), "Spider-Man");
        assert_eq!(canonical("WALL·E"), "WALLE");
    }

    #[test]
    fn curly_apostrophe_is_dropped_straight_one_splits() {
        assert_eq!(canonical("Schindler\u{2019}s List"), "Schindlers_List");
        assert_eq!(canonical("Schindler's List"), "Schindler_s_List");
        assert_eq!(canonical("\u{201C}Quoted\u{201D} Title"), "Quoted_Title");
    }

    #[test]
    fn empty_and_punctuation_only_titles() {
        assert_eq!(canonical(""), "");
        assert_eq!(canonical("   "), "");
        assert_eq!(canonical("?!"), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        let normalizer = TitleNormalizer::new().unwrap();
        for title in [
            "Amélie & Co.",
            "The Matrix",
            "Mr. Smith Goes to Washington",
            "Léon: The Professional",
            "Spider-Man: Into the Spider-Verse",
        ] {
            let once = normalizer.canonical(title);
            assert_eq!(normalizer.canonical(&once), once, "not idempotent for {title:?}");
        }
        assert_eq!(normalizer.canonical("Amelie_and_Co"), "Amelie_and_Co");
    }
}
