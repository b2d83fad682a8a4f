//! Splitting listing text into events.
//!
//! The segmenter walks the text line by line. A boundary line (one that
//! carries both `•` and `PDT`) opens a new event; every line after it, up
//! to the next boundary, belongs to that event's detail block. Lines before
//! the first boundary are discarded.

use event_listing_event_models::{EventRecord, Hyperlink};

use crate::EventExtractor;
use crate::links::HyperlinkMatcher;
use crate::normalize::GLUE_PUNCTUATION;

const BULLET: char = '•';
const TIME_ZONE: &str = "PDT";
/// Lines with at most this many tokens count as a location unless they are
/// written in all caps.
const MAX_SHORT_LOCATION_TOKENS: usize = 4;

/// Whether `line` starts a new event.
#[must_use]
pub fn is_boundary_line(line: &str) -> bool {
    line.contains(BULLET) && line.contains(TIME_ZONE)
}

/// Reads the date and time range from a boundary line.
///
/// `Apr 20, 2025 • 2:30 PM - 4:30 PM PDT` yields date `Apr 20, 2025`,
/// start `2:30 PM` and end `4:30 PM`. Missing parts come back empty.
#[must_use]
pub fn parse_boundary_line(line: &str) -> EventRecord {
    let mut segments = line.split(BULLET);
    let date = segments.next().map(strip_time_zone).unwrap_or_default();

    let (start_time, end_time) = segments.next().map_or_else(
        || (String::new(), String::new()),
        |time| {
            let mut times = time.split('-');
            (
                times.next().map(strip_time_zone).unwrap_or_default(),
                times.next().map(strip_time_zone).unwrap_or_default(),
            )
        },
    );

    EventRecord::new(date, start_time, end_time)
}

fn strip_time_zone(part: &str) -> String {
    part.replace(TIME_ZONE, "").trim().to_string()
}

enum State<'t> {
    Scanning,
    Building {
        record: EventRecord,
        details: Vec<&'t str>,
    },
}

/// Runs the state machine over `text`, sealing one record per boundary
/// line.
pub(crate) fn segment(
    extractor: &EventExtractor,
    text: &str,
    hyperlinks: &[Hyperlink],
) -> Vec<EventRecord> {
    let mut matcher = HyperlinkMatcher::new(hyperlinks);
    let mut events = Vec::new();
    let mut state = State::Scanning;
    let mut discarded = 0_usize;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if is_boundary_line(line) {
            if let State::Building { record, details } = state {
                events.push(populate(extractor, &mut matcher, record, &details));
            }

            let record = parse_boundary_line(line);
            log::debug!(
                "segment: event boundary date={:?} start={:?} end={:?}",
                record.date,
                record.start_time,
                record.end_time
            );
            state = State::Building {
                record,
                details: Vec::new(),
            };
            continue;
        }

        match &mut state {
            State::Scanning => discarded += 1,
            State::Building { details, .. } => details.push(line),
        }
    }

    if let State::Building { record, details } = state {
        events.push(populate(extractor, &mut matcher, record, &details));
    }

    if discarded > 0 {
        log::debug!("segment: discarded {discarded} line(s) before the first event");
    }
    log::info!(
        "segment: extracted {} event(s), {} with a document hyperlink",
        events.len(),
        matcher.claimed()
    );

    events
}

/// Fills the derived fields of `record` from its detail block.
///
/// The name is joined from the whole block. Only the lines after the name
/// span are classified as location or organizer text.
fn populate(
    extractor: &EventExtractor,
    matcher: &mut HyperlinkMatcher<'_>,
    mut record: EventRecord,
    details: &[&str],
) -> EventRecord {
    if details.is_empty() {
        return record;
    }

    let normalizer = &extractor.normalizer;
    let name_len = name_span(extractor, details);
    record.event_name = extractor.joiner.join(normalizer, details);

    if let Some(url) = matcher.claim(details) {
        record.link = url.to_string();
    }

    let mut organizer_lines = Vec::new();
    for &line in &details[name_len..] {
        if is_location_line(&extractor.location_hints, line) {
            record.location = normalizer.normalize(line);
        } else {
            organizer_lines.push(line);
        }
    }

    if !organizer_lines.is_empty() {
        let split = extractor
            .splitter
            .split(normalizer, &organizer_lines.join("; "));
        record.organizers = normalizer.normalize(&split.organizers);
        record.categories = split.categories.join(", ");
    }

    record
}

/// Number of leading detail lines consumed by the event name.
///
/// The first line always does. A following line continues the name when
/// the name so far ends in glue punctuation or a stopword, or when the line
/// itself starts in lowercase.
fn name_span(extractor: &EventExtractor, details: &[&str]) -> usize {
    let mut len = 1;

    while let Some(next) = details.get(len) {
        let previous = details[len - 1];
        let dangling = previous.ends_with(GLUE_PUNCTUATION)
            || previous
                .split_whitespace()
                .next_back()
                .is_some_and(|word| extractor.normalizer.is_stopword(word));
        let lowercase_start = next.chars().next().is_some_and(char::is_lowercase);

        if !(dangling || lowercase_start) {
            break;
        }
        len += 1;
    }

    len
}

/// Location hints match as plain case-sensitive substrings, so `CA` also
/// fires inside `CARBON`.
fn is_location_line(hints: &[String], line: &str) -> bool {
    hints.iter().any(|hint| line.contains(hint.as_str()))
        || (line.split_whitespace().count() <= MAX_SHORT_LOCATION_TOKENS && !is_all_caps(line))
}

/// Whether `line` is made only of uppercase letters, whitespace and `&`.
fn is_all_caps(line: &str) -> bool {
    !line.is_empty()
        && line
            .chars()
            .all(|c| c.is_uppercase() || c.is_whitespace() || c == '&')
}
