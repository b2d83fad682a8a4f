#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Event record and hyperlink types for PDF event listings.
//!
//! Every extraction run turns the text of an event listing (plus any
//! hyperlinks found alongside it) into a sequence of [`EventRecord`]s. The
//! field names match the column names of the tabular export.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// How the text of a PDF event listing is obtained.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ExtractionMode {
    /// Read the embedded text layer of the PDF.
    #[default]
    Direct,
    /// Run optical character recognition over the rendered pages.
    Ocr,
}

impl ExtractionMode {
    /// Whether this mode can also recover hyperlink annotations.
    ///
    /// OCR only sees pixels, so it never produces hyperlinks.
    #[must_use]
    pub const fn yields_hyperlinks(self) -> bool {
        matches!(self, Self::Direct)
    }
}

/// A hyperlink found in the source document.
///
/// `text` is the snippet of document text surrounding the link, which is
/// what gets matched against an event's detail lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperlink {
    /// Target URL.
    pub url: String,
    /// Context snippet near the link.
    pub text: String,
    /// One-based page number.
    pub page: u32,
}

impl Hyperlink {
    /// Creates a hyperlink. Page numbers below 1 are clamped to 1.
    #[must_use]
    pub fn new(url: impl Into<String>, text: impl Into<String>, page: u32) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
            page: page.max(1),
        }
    }
}

/// One event extracted from a listing.
///
/// Every field defaults to the empty string; fields that the listing does
/// not provide stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Date as printed in the listing (e.g. `"Apr 20, 2025"`).
    pub date: String,
    /// Start time without the zone suffix (e.g. `"2:30 PM"`).
    pub start_time: String,
    /// End time without the zone suffix. Empty when the listing gives no
    /// time range.
    pub end_time: String,
    /// Cleaned event title.
    pub event_name: String,
    /// Organizer names joined with `"; "`.
    pub organizers: String,
    /// Category labels joined with `", "`.
    pub categories: String,
    /// Venue or address line.
    pub location: String,
    /// Registration link.
    pub link: String,
}

impl EventRecord {
    /// Creates a record with the date and time fields taken from a boundary
    /// line. All derived fields start empty.
    #[must_use]
    pub fn new(
        date: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            ..Self::default()
        }
    }

    /// Category labels as a list.
    #[must_use]
    pub fn category_list(&self) -> Vec<&str> {
        self.categories
            .split(", ")
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect()
    }
}
