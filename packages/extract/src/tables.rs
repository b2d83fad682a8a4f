//! Lookup tables that drive the extraction heuristics.
//!
//! The tables are plain data: which OCR artifacts to rewrite, which words
//! keep their casing, which labels count as categories, and so on. A
//! default set tuned for SF Climate Week listings is baked into the binary
//! at compile time via [`include_str!`]; other corpora can supply their own
//! TOML document with [`ExtractionTables::from_toml_str`].

use serde::Deserialize;

use crate::ConfigError;

/// The default tables, embedded at compile time.
const DEFAULT_TABLES_TOML: &str = include_str!("../tables/default.toml");

/// A single literal replacement for a known OCR or PDF extraction artifact.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Substitution {
    /// Garbled text as it appears in the source.
    pub from: String,
    /// Corrected text.
    pub to: String,
}

/// Every lookup table consumed by the extraction pipeline.
///
/// Missing tables deserialize as empty lists.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractionTables {
    /// Ordered artifact replacements, applied first to last.
    #[serde(default)]
    pub artifact_substitutions: Vec<Substitution>,
    /// Words forced to lowercase unless they start the string. Compared
    /// case-insensitively.
    #[serde(default)]
    pub stopwords: Vec<String>,
    /// Tokens whose exact spelling is kept by title-casing.
    #[serde(default)]
    pub proper_nouns: Vec<String>,
    /// Canonical category labels.
    #[serde(default)]
    pub category_keywords: Vec<String>,
    /// Multi-word names whose words are never dropped as duplicates.
    #[serde(default)]
    pub protected_phrases: Vec<String>,
    /// Substrings that mark a detail line as a location.
    #[serde(default)]
    pub location_hints: Vec<String>,
    /// Phrases that introduce a bare registration URL (e.g. `"RSVP: "`).
    #[serde(default)]
    pub url_triggers: Vec<String>,
}

impl ExtractionTables {
    /// Parses tables from a TOML document and validates them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the document is malformed and
    /// [`ConfigError::Invalid`] if a table contains an empty entry that
    /// would match everywhere.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let tables: Self = toml::de::from_str(toml_str)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Returns the embedded default tables.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed (this is a compile-time
    /// asset, so it is covered by the crate's tests).
    #[must_use]
    pub fn embedded() -> Self {
        Self::from_toml_str(DEFAULT_TABLES_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse tables/default.toml: {e}"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.artifact_substitutions.iter().any(|s| s.from.is_empty()) {
            return Err(invalid("artifact substitution with an empty `from`"));
        }

        let non_blank = [
            ("stopwords", &self.stopwords),
            ("proper_nouns", &self.proper_nouns),
            ("category_keywords", &self.category_keywords),
            ("protected_phrases", &self.protected_phrases),
            ("location_hints", &self.location_hints),
            ("url_triggers", &self.url_triggers),
        ];
        for (name, entries) in non_blank {
            if entries.iter().any(|e| e.trim().is_empty()) {
                return Err(invalid(&format!("blank entry in `{name}`")));
            }
        }

        Ok(())
    }
}

impl Default for ExtractionTables {
    fn default() -> Self {
        Self::embedded()
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Invalid {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_embedded_tables() {
        let tables = ExtractionTables::embedded();
        assert_eq!(tables.artifact_substitutions.len(), 3);
        assert_eq!(tables.artifact_substitutions[0].from, "SFClimate");
        assert!(tables.stopwords.iter().any(|w| w == "with"));
        assert!(tables.proper_nouns.iter().any(|w| w == "CO2"));
        assert_eq!(tables.stopwords.len(), 14);
        assert_eq!(tables.proper_nouns.len(), 8);
        assert_eq!(tables.category_keywords.len(), 10);
        assert_eq!(
            tables.protected_phrases,
            vec!["San Francisco", "Climate Week", "CO2"]
        );
        assert_eq!(tables.location_hints, vec!["San Francisco", "CA", "California"]);
        assert_eq!(
            tables.url_triggers,
            vec!["Register at ", "RSVP: ", "Link: ", "Visit "]
        );
    }

    #[test]
    fn rejects_table_key_swallowed_by_substitution_entry() {
        let toml = "[[artifact_substitutions]]\nfrom = \"a\"\nto = \"b\"\nstopwords = [\"the\"]\n";
        let err = ExtractionTables::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn missing_tables_default_to_empty() {
        let tables = ExtractionTables::from_toml_str("stopwords = [\"the\"]").unwrap();
        assert_eq!(tables.stopwords, vec!["the"]);
        assert!(tables.category_keywords.is_empty());
        assert!(tables.artifact_substitutions.is_empty());
    }

    #[test]
    fn rejects_unknown_table() {
        let err = ExtractionTables::from_toml_str("stop_words = []").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn rejects_blank_keyword() {
        let err = ExtractionTables::from_toml_str("category_keywords = [\"ENERGY\", \" \"]")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn rejects_empty_substitution_source() {
        let toml = "[[artifact_substitutions]]\nfrom = \"\"\nto = \"x\"\n";
        let err = ExtractionTables::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
