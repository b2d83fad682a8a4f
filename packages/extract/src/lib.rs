#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Heuristic extraction of event records from PDF event-listing text.
//!
//! Event listings exported to PDF (conference schedules, city-wide event
//! weeks) lose their structure: titles wrap across lines, OCR glues words
//! together, and organizer names run into topic labels. This crate turns
//! that text, plus any hyperlinks recovered from the document, back into
//! [`EventRecord`]s.
//!
//! The primary entry point is [`EventExtractor`]. Its lookup tables
//! (artifact substitutions, stopwords, category keywords, and so on) are
//! injected at construction as [`ExtractionTables`], so a different corpus
//! only needs a different TOML document.

pub mod categories;
pub mod export;
pub mod links;
pub mod name;
pub mod normalize;
pub mod segment;
pub mod tables;
pub mod url;

pub use event_listing_event_models::{EventRecord, ExtractionMode, Hyperlink};

use categories::{CategorySplit, CategorySplitter};
use name::NameJoiner;
use normalize::Normalizer;
use tables::ExtractionTables;
use url::UrlExtractor;

/// Errors from loading lookup tables or building an extractor.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The tables document is not valid TOML or has an unexpected shape.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A pattern built from a table entry failed to compile.
    #[error("Invalid regex pattern: {0}")]
    Regex(#[from] regex::Error),

    /// A table entry is unusable.
    #[error("Invalid extraction tables: {message}")]
    Invalid {
        /// Description of what went wrong.
        message: String,
    },
}

/// Turns listing text into event records.
///
/// An extractor holds only read-only tables and compiled patterns, so one
/// instance can be shared across threads and reused for any number of
/// documents.
#[derive(Debug, Clone)]
pub struct EventExtractor {
    pub(crate) normalizer: Normalizer,
    pub(crate) splitter: CategorySplitter,
    pub(crate) joiner: NameJoiner,
    pub(crate) urls: UrlExtractor,
    pub(crate) location_hints: Vec<String>,
}

impl EventExtractor {
    /// Builds an extractor from `tables`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Regex`] if a URL trigger phrase cannot be
    /// compiled into a pattern.
    pub fn new(tables: &ExtractionTables) -> Result<Self, ConfigError> {
        let normalizer = Normalizer::new(tables);
        let splitter = CategorySplitter::new(tables, &normalizer);

        Ok(Self {
            splitter,
            joiner: NameJoiner::new(tables),
            urls: UrlExtractor::new(tables)?,
            location_hints: tables.location_hints.clone(),
            normalizer,
        })
    }

    /// Builds an extractor from the embedded default tables.
    ///
    /// # Panics
    ///
    /// Panics if the embedded tables fail to load.
    #[must_use]
    pub fn embedded() -> Self {
        Self::new(&ExtractionTables::embedded())
            .unwrap_or_else(|e| panic!("Failed to build extractor from tables/default.toml: {e}"))
    }

    /// Cleans OCR-prone text. See [`Normalizer::normalize`].
    #[must_use]
    pub fn normalize(&self, text: &str) -> String {
        self.normalizer.normalize(text)
    }

    /// Splits an organizer block into organizers and category keywords.
    #[must_use]
    pub fn split_categories(&self, text: &str) -> CategorySplit {
        self.splitter.split(&self.normalizer, text)
    }

    /// Joins wrapped title lines into one event name.
    #[must_use]
    pub fn join_name<S: AsRef<str>>(&self, lines: &[S]) -> String {
        self.joiner.join(&self.normalizer, lines)
    }

    /// Finds a registration URL in `text`.
    #[must_use]
    pub fn extract_url(&self, text: &str) -> Option<String> {
        self.urls.extract(text)
    }

    /// Extracts one record per event in `text`, in source order.
    ///
    /// Each hyperlink URL is assigned to at most one event; an event with no
    /// matching hyperlink keeps an empty link. Text without any event
    /// boundary yields an empty list.
    #[must_use]
    pub fn extract(&self, text: &str, hyperlinks: &[Hyperlink]) -> Vec<EventRecord> {
        segment::segment(self, text, hyperlinks)
    }
}

impl Default for EventExtractor {
    fn default() -> Self {
        Self::embedded()
    }
}
