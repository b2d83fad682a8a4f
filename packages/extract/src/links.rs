//! Assigning document hyperlinks to events.

use std::collections::BTreeSet;

use event_listing_event_models::Hyperlink;

/// Hands out hyperlinks to events, each URL at most once per run.
///
/// A hyperlink matches an event when any of the event's detail lines,
/// lowercased, is a substring of the hyperlink's lowercased context text.
#[derive(Debug)]
pub struct HyperlinkMatcher<'a> {
    links: &'a [Hyperlink],
    contexts: Vec<String>,
    used: BTreeSet<&'a str>,
}

impl<'a> HyperlinkMatcher<'a> {
    #[must_use]
    pub fn new(links: &'a [Hyperlink]) -> Self {
        Self {
            links,
            contexts: links.iter().map(|l| l.text.to_lowercase()).collect(),
            used: BTreeSet::new(),
        }
    }

    /// Returns the URL of the first unused hyperlink, in input order, whose
    /// context contains one of `lines`, and marks that URL as used.
    ///
    /// Blank lines never match.
    pub fn claim<S: AsRef<str>>(&mut self, lines: &[S]) -> Option<&'a str> {
        let needles: Vec<String> = lines
            .iter()
            .map(|line| line.as_ref().trim().to_lowercase())
            .filter(|line| !line.is_empty())
            .collect();

        if needles.is_empty() {
            return None;
        }

        let index = self.links.iter().zip(&self.contexts).position(|(link, context)| {
            !self.used.contains(link.url.as_str())
                && needles.iter().any(|needle| context.contains(needle.as_str()))
        })?;

        let links = self.links;
        let url = links[index].url.as_str();
        self.used.insert(url);
        log::trace!("claim: matched hyperlink {url}");

        Some(url)
    }

    /// Number of distinct URLs handed out so far.
    #[must_use]
    pub fn claimed(&self) -> usize {
        self.used.len()
    }
}
