//! Tabular and JSON output for extracted events.

use std::io::Write;

use event_listing_event_models::EventRecord;
use thiserror::Error;

/// Output column order.
pub const CSV_COLUMNS: [&str; 8] = [
    "date",
    "start_time",
    "end_time",
    "event_name",
    "link",
    "organizers",
    "categories",
    "location",
];

/// Errors from writing exported events.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV encoding or write error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error flushing the underlying writer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn columns(record: &EventRecord) -> [&str; 8] {
    [
        &record.date,
        &record.start_time,
        &record.end_time,
        &record.event_name,
        &record.link,
        &record.organizers,
        &record.categories,
        &record.location,
    ]
}

/// Writes a header row followed by one row per record.
///
/// # Errors
///
/// Returns [`ExportError`] if a row cannot be written or the writer cannot
/// be flushed.
pub fn write_csv<W: Write>(records: &[EventRecord], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(CSV_COLUMNS)?;
    for record in records {
        csv_writer.write_record(columns(record))?;
    }
    csv_writer.flush()?;

    log::debug!("write_csv: wrote {} row(s)", records.len());

    Ok(())
}

/// Converts records to a JSON array of objects keyed by column name.
#[must_use]
pub fn to_json(records: &[EventRecord]) -> serde_json::Value {
    serde_json::Value::Array(records.iter().map(record_to_json).collect())
}

fn record_to_json(record: &EventRecord) -> serde_json::Value {
    let mut map = serde_json::Map::new();

    for (column, value) in CSV_COLUMNS.iter().zip(columns(record)) {
        map.insert(
            (*column).to_string(),
            serde_json::Value::String(value.to_string()),
        );
    }

    serde_json::Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EventRecord {
        EventRecord {
            event_name: "Solar Breakfast, Day 1".to_string(),
            organizers: "Acme Corp; Beta Labs".to_string(),
            categories: "ENERGY, STORAGE".to_string(),
            link: "https://solar.org".to_string(),
            ..EventRecord::new("Apr 20, 2025", "9:00 AM", "10:00 AM")
        }
    }

    #[test]
    fn writes_header_and_quoted_rows() {
        let mut out = Vec::new();
        write_csv(&[sample()], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some("date,start_time,end_time,event_name,link,organizers,categories,location")
        );
        assert_eq!(
            lines.next(),
            Some(
                "\"Apr 20, 2025\",9:00 AM,10:00 AM,\"Solar Breakfast, Day 1\",https://solar.org,Acme Corp; Beta Labs,\"ENERGY, STORAGE\","
            )
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_export_has_only_header() {
        let mut out = Vec::new();
        write_csv(&[], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec!["date,start_time,end_time,event_name,link,organizers,categories,location"]
        );
    }

    #[test]
    fn json_uses_column_names() {
        let json = to_json(&[sample()]);
        let first = &json.as_array().unwrap()[0];
        assert_eq!(first["event_name"], "Solar Breakfast, Day 1");
        assert_eq!(first["location"], "");
        assert_eq!(first.as_object().unwrap().len(), CSV_COLUMNS.len());
    }
}
