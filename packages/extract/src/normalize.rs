//! Text normalization for OCR-prone listing text.
//!
//! A cleaning pass collapses whitespace, rewrites known artifacts, splits
//! glued words, spaces out glue punctuation, fixes casing and drops
//! trailing noise such as `(…)` groups and `| LABEL` suffixes. The pass is
//! repeated until the text stops changing, so normalizing already
//! normalized text is a no-op.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::tables::ExtractionTables;

/// Upper bound on cleaning passes. Each pass after the first only undoes
/// artifacts recreated by casing, so the text settles quickly.
const MAX_PASSES: usize = 4;

/// Punctuation that gets surrounded by spaces when it glues two words.
pub const GLUE_PUNCTUATION: [char; 4] = ['&', ':', '/', '-'];

static TRAILING_PARENTHETICAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)\s*$").expect("valid regex"));
static TRAILING_PIPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\|\s*[A-Za-z\s]+$").expect("valid regex"));

/// Normalizes listing text using the artifact, stopword and proper-noun
/// tables.
#[derive(Debug, Clone)]
pub struct Normalizer {
    substitutions: Vec<(String, String)>,
    /// Lowercased.
    stopwords: BTreeSet<String>,
    proper_nouns: BTreeSet<String>,
}

impl Normalizer {
    /// Builds a normalizer from the lookup tables.
    #[must_use]
    pub fn new(tables: &ExtractionTables) -> Self {
        Self {
            substitutions: tables
                .artifact_substitutions
                .iter()
                .map(|s| (s.from.clone(), s.to.clone()))
                .collect(),
            stopwords: tables.stopwords.iter().map(|w| w.to_lowercase()).collect(),
            proper_nouns: tables.proper_nouns.iter().cloned().collect(),
        }
    }

    /// Normalizes `raw`. Never fails; empty or whitespace-only input yields
    /// an empty string.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> String {
        let mut current = self.clean(raw);

        for _ in 1..MAX_PASSES {
            let next = self.clean(&current);
            if next == current {
                break;
            }
            current = next;
        }

        current
    }

    /// Whether `word` is in the stopword table (case-insensitive).
    #[must_use]
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }

    fn clean(&self, raw: &str) -> String {
        let mut text = collapse_whitespace(raw);

        for (from, to) in &self.substitutions {
            if text.contains(from.as_str()) {
                text = text.replace(from.as_str(), to);
            }
        }

        let text = split_camel_case(&text);
        let text = space_glue_punctuation(&text);
        let text = collapse_whitespace(&text);
        let text = self.apply_casing(&text);

        strip_trailing_noise(&text)
    }

    fn apply_casing(&self, text: &str) -> String {
        text.split_whitespace()
            .enumerate()
            .map(|(i, token)| {
                let lower = token.to_lowercase();
                if i > 0 && self.stopwords.contains(&lower) {
                    lower
                } else if self.proper_nouns.contains(token) {
                    token.to_string()
                } else {
                    title_case(token)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Collapses every whitespace run to a single space and trims the ends.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Inserts a space before a capital that starts a new word (`ClimateWeek`,
/// `2025Summit`) when it directly follows a lowercase letter or a digit.
fn split_camel_case(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0
            && c.is_uppercase()
            && chars.get(i + 1).is_some_and(|next| next.is_lowercase())
            && chars
                .get(i - 1)
                .is_some_and(|prev| prev.is_lowercase() || prev.is_ascii_digit())
        {
            out.push(' ');
        }
        out.push(c);
    }

    out
}

/// Surrounds glue punctuation with spaces when it sits between two word
/// characters (`Energy&Storage` becomes `Energy & Storage`).
fn space_glue_punctuation(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);

    for (i, &c) in chars.iter().enumerate() {
        let glued = GLUE_PUNCTUATION.contains(&c)
            && i > 0
            && chars.get(i - 1).is_some_and(|&prev| is_word_char(prev))
            && chars.get(i + 1).is_some_and(|&next| is_word_char(next));

        if glued {
            out.push(' ');
            out.push(c);
            out.push(' ');
        } else {
            out.push(c);
        }
    }

    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Uppercases a leading letter and lowercases everything after it.
///
/// Letters in the middle of a token are never capitalized, so the output
/// contains no camel-case boundary for the next pass to split.
///
/// A token that starts with a digit or punctuation keeps its letters
/// lowercase: `2nd` stays `2nd` and `(hosted` stays `(hosted`. Word-wise
/// title casing in the style of Python's `str.title()` would yield `2Nd`
/// and `(Hosted` instead. Keeping them lowercase is what makes `normalize`
/// idempotent, since `2Nd` would be split again on the next pass.
fn title_case(token: &str) -> String {
    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut out = String::with_capacity(token.len());
    if first.is_alphabetic() {
        out.extend(first.to_uppercase());
    } else {
        out.push(first);
    }
    out.extend(chars.flat_map(char::to_lowercase));
    out
}

/// Repeatedly strips a trailing `(…)` group and a trailing `| words`
/// suffix.
fn strip_trailing_noise(text: &str) -> String {
    let mut current = text.trim().to_string();

    loop {
        let without_parens = TRAILING_PARENTHETICAL_RE.replace(&current, "");
        let stripped = TRAILING_PIPE_RE.replace(&without_parens, "").trim().to_string();
        if stripped == current {
            return current;
        }
        current = stripped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::new(&ExtractionTables::embedded())
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(collapse_whitespace("  a \t b\n\nc  "), "a b c");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn applies_artifact_substitutions() {
        let n = normalizer();
        assert_eq!(n.normalize("SFClimate Week Kickoff"), "SF Climate Week Kickoff");
        assert_eq!(n.normalize("The ClimateWeek Mixer"), "The Climate Week Mixer");
    }

    #[test]
    fn splits_camel_case_after_lowercase_or_digit() {
        assert_eq!(split_camel_case("solarPanel"), "solar Panel");
        assert_eq!(split_camel_case("2025Summit"), "2025 Summit");
        assert_eq!(split_camel_case("Summit"), "Summit");
        assert_eq!(split_camel_case("SF"), "SF");
    }

    #[test]
    fn spaces_glue_punctuation_between_words() {
        assert_eq!(space_glue_punctuation("Energy&Storage"), "Energy & Storage");
        assert_eq!(space_glue_punctuation("Food/Ag"), "Food / Ag");
        assert_eq!(space_glue_punctuation("Energy & Storage"), "Energy & Storage");
        assert_eq!(space_glue_punctuation("-lead"), "-lead");
    }

    #[test]
    fn fixes_casing_with_exceptions() {
        let n = normalizer();
        assert_eq!(
            n.normalize("THE FUTURE OF ENERGY IN SF"),
            "The Future of Energy in SF"
        );
        assert_eq!(n.normalize("co2 removal with PBS"), "Co2 Removal with PBS");
        assert_eq!(n.normalize("CO2 removal"), "CO2 Removal");
    }

    #[test]
    fn title_case_never_capitalizes_mid_token() {
        assert_eq!(title_case("2nd"), "2nd");
        assert_eq!(title_case("kICKOFF"), "Kickoff");
        assert_eq!(title_case("(hosted"), "(hosted");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn strips_trailing_parenthetical_and_pipe_suffix() {
        let n = normalizer();
        assert_eq!(n.normalize("Solar Summit (Day 1)"), "Solar Summit");
        assert_eq!(n.normalize("Solar Summit | Energy"), "Solar Summit");
        assert_eq!(n.normalize("Solar Summit (a) (b)"), "Solar Summit");
        assert_eq!(n.normalize("Solar Summit | one | two"), "Solar Summit");
    }

    #[test]
    fn keeps_pipe_suffix_with_ampersand() {
        let n = normalizer();
        assert_eq!(
            n.normalize("Kickoff | Energy & Storage"),
            "Kickoff | Energy & Storage"
        );
    }

    #[test]
    fn handles_degenerate_input() {
        let n = normalizer();
        assert_eq!(n.normalize(""), "");
        assert_eq!(n.normalize("   \n\t "), "");
        assert_eq!(n.normalize("&"), "&");
        assert_eq!(n.normalize("ß"), "Ss");
        assert_eq!(n.normalize("()"), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        let n = normalizer();
        let inputs = [
            "SFClimate Week Kickoff",
            "  the   FUTURE of ENERGY&storage  ",
            "aon the waterfront",
            "Aon Aon",
            "netZero Breakfast: Carbon/Capture (RSVP required)",
            "Panel | Buildings & Infrastructure",
            "Solar Summit (a) (b) | x",
            "Acme Corp; ENERGY",
            "2025Summit on co2-removal",
            "123 Main St, San Francisco, CA 94105",
            "ClimateWeekClimateWeek",
            "ÉNERGIE propre",
            "•",
            "",
        ];

        for input in inputs {
            let once = n.normalize(input);
            let twice = n.normalize(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn substitution_recreated_by_casing_is_resolved() {
        let n = normalizer();
        assert_eq!(n.normalize("aon the waterfront"), "On the Waterfront");
    }

    #[test]
    fn recognizes_stopwords_case_insensitively() {
        let n = normalizer();
        assert!(n.is_stopword("The"));
        assert!(n.is_stopword("of"));
        assert!(!n.is_stopword("Energy"));
    }
}
