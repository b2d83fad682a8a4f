//! Finding a registration URL in free text.
//!
//! Patterns are tried in priority order: explicit `http(s)://` or `www.`
//! tokens first, then the token following each configured trigger phrase.
//! The first pattern that yields a non-empty match wins.

use std::sync::LazyLock;

use regex::Regex;

use crate::ConfigError;
use crate::tables::ExtractionTables;

static DIRECT_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s<>"]+|www\.[^\s<>"]+"#).expect("valid regex")
});

const TRAILING_PUNCTUATION: [char; 3] = ['.', ',', ')'];

/// Extracts URLs using the direct pattern plus one pattern per trigger
/// phrase.
#[derive(Debug, Clone)]
pub struct UrlExtractor {
    /// One regex per trigger, in table order. Capture group 1 is the URL
    /// token.
    triggers: Vec<Regex>,
}

impl UrlExtractor {
    /// Compiles a pattern for each of the table's URL triggers.
    ///
    /// Triggers match case-insensitively anywhere in the text, so `Visit `
    /// also fires inside `Revisit `.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Regex`] if a trigger pattern fails to compile.
    pub fn new(tables: &ExtractionTables) -> Result<Self, ConfigError> {
        let triggers = tables
            .url_triggers
            .iter()
            .map(|trigger| {
                Regex::new(&format!(
                    r#"(?i){}([^\s<>"]+)"#,
                    regex::escape(trigger)
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { triggers })
    }

    /// Returns the first URL found in `text`, with trailing `.`, `,` and
    /// `)` removed and `https://` prepended when no scheme is present.
    #[must_use]
    pub fn extract(&self, text: &str) -> Option<String> {
        let direct = DIRECT_URL_RE.find(text).map(|m| m.as_str());
        let triggered = self
            .triggers
            .iter()
            .filter_map(|re| re.captures(text))
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()));

        direct
            .into_iter()
            .chain(triggered)
            .map(|candidate| candidate.trim_end_matches(TRAILING_PUNCTUATION))
            .find(|candidate| !candidate.is_empty())
            .map(with_scheme)
    }
}

fn with_scheme(url: &str) -> String {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}
