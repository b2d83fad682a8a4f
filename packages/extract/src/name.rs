//! Building an event title from the detail lines that make up its name.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::Normalizer;
use crate::tables::ExtractionTables;

static TRAILING_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\|\s*[A-Za-z\s&]+$").expect("valid regex"));

/// Joins name lines into a single cleaned title.
///
/// Protection from duplicate removal is positional: only tokens that sit
/// inside an occurrence of a whole protected phrase survive as repeats. A
/// word that merely belongs to some protected phrase gets no protection on
/// its own, so in `Climate Week Mixer Week Two` the second `Week` is
/// dropped. This is deliberately narrower than keeping every word that
/// appears in any protected phrase.
#[derive(Debug, Clone)]
pub struct NameJoiner {
    /// Each protected phrase as a sequence of lowercased words.
    protected_phrases: Vec<Vec<String>>,
}

impl NameJoiner {
    #[must_use]
    pub fn new(tables: &ExtractionTables) -> Self {
        Self {
            protected_phrases: tables
                .protected_phrases
                .iter()
                .map(|phrase| phrase.split_whitespace().map(str::to_lowercase).collect())
                .filter(|words: &Vec<String>| !words.is_empty())
                .collect(),
        }
    }

    /// Joins `lines` with spaces, normalizes the result, drops a trailing
    /// `| LABEL & LABEL` suffix and removes repeated words.
    ///
    /// A repeated word survives when it is part of an occurrence of a
    /// protected phrase.
    #[must_use]
    pub fn join<S: AsRef<str>>(&self, normalizer: &Normalizer, lines: &[S]) -> String {
        let joined = lines
            .iter()
            .map(AsRef::<str>::as_ref)
            .collect::<Vec<_>>()
            .join(" ");
        let normalized = normalizer.normalize(&joined);
        let trimmed = TRAILING_LABEL_RE.replace(&normalized, "");

        self.dedup_words(trimmed.trim())
    }

    fn dedup_words(&self, text: &str) -> String {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let protected = self.protected_positions(&lowered);

        let mut seen = BTreeSet::new();
        let mut kept = Vec::with_capacity(tokens.len());

        for (i, token) in tokens.iter().enumerate() {
            let first_time = seen.insert(lowered[i].as_str());
            if first_time || protected[i] {
                kept.push(*token);
            }
        }

        kept.join(" ")
    }

    /// Marks every token index covered by an occurrence of a protected
    /// phrase.
    fn protected_positions(&self, lowered: &[String]) -> Vec<bool> {
        let mut protected = vec![false; lowered.len()];

        for phrase in &self.protected_phrases {
            if phrase.len() > lowered.len() {
                continue;
            }
            for start in 0..=(lowered.len() - phrase.len()) {
                let end = start + phrase.len();
                if lowered[start..end] == phrase[..] {
                    protected[start..end].fill(true);
                }
            }
        }

        protected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Normalizer, NameJoiner) {
        let tables = ExtractionTables::embedded();
        (Normalizer::new(&tables), NameJoiner::new(&tables))
    }

    #[test]
    fn strips_trailing_category_label() {
        let (n, j) = setup();
        assert_eq!(
            j.join(&n, &["SF Climate Week Kickoff", "| Energy & Storage"]),
            "SF Climate Week Kickoff"
        );
    }

    #[test]
    fn joins_wrapped_lines() {
        let (n, j) = setup();
        assert_eq!(
            j.join(&n, &["The Future of", "GRID STORAGE"]),
            "The Future of Grid Storage"
        );
    }

    #[test]
    fn drops_repeated_words() {
        let (n, j) = setup();
        assert_eq!(
            j.join(&n, &["Solar Solar Breakfast", "breakfast"]),
            "Solar Breakfast"
        );
    }

    #[test]
    fn keeps_repeats_inside_protected_phrases() {
        let (n, j) = setup();
        assert_eq!(
            j.join(&n, &["Climate Action Night", "Climate Week Closing"]),
            "Climate Action Night Climate Week Closing"
        );
        assert_eq!(
            j.join(&n, &["Climate Week Climate Week"]),
            "Climate Week Climate Week"
        );
    }

    #[test]
    fn repeats_outside_phrase_occurrences_are_dropped() {
        let (n, j) = setup();
        assert_eq!(
            j.join(&n, &["Climate Week Mixer", "Week Two"]),
            "Climate Week Mixer Two"
        );
    }

    #[test]
    fn empty_lines_yield_empty_name() {
        let (n, j) = setup();
        let empty: [&str; 0] = [];
        assert_eq!(j.join(&n, &empty), "");
        assert_eq!(j.join(&n, &["   "]), "");
    }
}
