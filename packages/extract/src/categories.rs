//! Splitting organizer text into organizer names and category labels.
//!
//! Listings print the hosting organizations and the event's topic labels
//! in the same block (e.g. `Acme Corp; ENERGY | STORAGE`). Each separated
//! part either contains one of the known category keywords, in which case
//! the canonical keyword is recorded, or it is treated as an organizer.

use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::Normalizer;
use crate::tables::ExtractionTables;

static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;|]|\band\b").expect("valid regex"));

/// Result of splitting an organizer/category block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySplit {
    /// Organizer fragments in source order, joined with `"; "`.
    pub organizers: String,
    /// Canonical category keywords, first occurrence order, no duplicates.
    pub categories: Vec<String>,
}

#[derive(Debug, Clone)]
struct Keyword {
    canonical: String,
    /// Lowercased keyword as written.
    literal: String,
    /// Lowercased keyword after normalization, so `IN-PERSON EVENT` also
    /// matches the spaced-out `in - person event`.
    normalized: String,
}

impl Keyword {
    fn matches(&self, lower_part: &str) -> bool {
        lower_part.contains(&self.literal)
            || (!self.normalized.is_empty() && lower_part.contains(&self.normalized))
    }
}

/// Classifies parts of an organizer block against the category keywords.
#[derive(Debug, Clone)]
pub struct CategorySplitter {
    /// Longest keyword first. Keywords of equal length keep table order.
    keywords: Vec<Keyword>,
}

impl CategorySplitter {
    /// Builds a splitter from the keyword table.
    #[must_use]
    pub fn new(tables: &ExtractionTables, normalizer: &Normalizer) -> Self {
        let mut keywords: Vec<Keyword> = tables
            .category_keywords
            .iter()
            .map(|keyword| Keyword {
                canonical: keyword.clone(),
                literal: keyword.to_lowercase(),
                normalized: normalizer.normalize(keyword).to_lowercase(),
            })
            .collect();

        keywords.sort_by_key(|k| std::cmp::Reverse(k.canonical.chars().count()));

        Self { keywords }
    }

    /// Returns the canonical keyword contained in `part`, if any.
    ///
    /// When several keywords match, the longest one wins.
    #[must_use]
    pub fn classify(&self, part: &str) -> Option<&str> {
        let lower = part.to_lowercase();
        self.keywords
            .iter()
            .find(|k| k.matches(&lower))
            .map(|k| k.canonical.as_str())
    }

    /// Normalizes `text` and splits it into organizers and categories.
    #[must_use]
    pub fn split(&self, normalizer: &Normalizer, text: &str) -> CategorySplit {
        let normalized = normalizer.normalize(text);
        let mut organizers: Vec<&str> = Vec::new();
        let mut categories: Vec<String> = Vec::new();

        for part in SEPARATOR_RE.split(&normalized) {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            match self.classify(part) {
                Some(keyword) => {
                    if !categories.iter().any(|c| c == keyword) {
                        categories.push(keyword.to_string());
                    }
                }
                None => organizers.push(part),
            }
        }

        CategorySplit {
            organizers: organizers.join("; "),
            categories,
        }
    }
}
