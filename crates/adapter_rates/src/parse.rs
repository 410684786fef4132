//! Tolerant parsing of the external rates table.
//!
//! The source is loosely structured: comma- or tab-delimited text or a JSON
//! array of records, with inconsistent header casing, BOM artifacts, percent
//! signs and decimal commas in the rate column, and timestamps embedded in
//! the date column. Formats are tried in a fixed order and rows are cleaned
//! individually; rows that cannot be repaired are dropped.

use calc_core::RateStep;
use chrono::NaiveDate;
use serde_json::Value;

use crate::error::FeedError;

/// Column holding the ISO date a rate becomes effective.
const FIELD_DATE_FROM: &str = "date_from";
/// Column holding the annual rate in percent.
const FIELD_KEY_RATE: &str = "key_rate";

/// A row as read from the source, before cleaning.
#[derive(Debug, Clone)]
struct RawRow {
    date_from: String,
    key_rate: String,
}

/// Outcome of cleaning a single raw row.
enum RowOutcome {
    Step(RateStep),
    Rejected(&'static str),
}

/// Parses fetched text into rate steps.
///
/// Strategies are tried in order: comma-delimited, tab-delimited, JSON array
/// of records. The first strategy yielding a table that contains both
/// required columns wins; if none does, the parse fails with a schema error
/// naming the columns. Rows whose date or rate cannot be cleaned are dropped
/// with a debug log; a source with zero usable rows is a valid, empty
/// outcome.
///
/// Steps are returned in source order; [`calc_core::RateSchedule::from_steps`]
/// sorts and deduplicates.
pub fn parse_steps(text: &str) -> Result<Vec<RateStep>, FeedError> {
    let rows = read_delimited(text, b',')
        .or_else(|| read_delimited(text, b'\t'))
        .or_else(|| read_json(text))
        .ok_or(FeedError::MissingColumns)?;

    let mut steps = Vec::with_capacity(rows.len());
    for row in &rows {
        match clean_row(row) {
            RowOutcome::Step(step) => steps.push(step),
            RowOutcome::Rejected(reason) => {
                tracing::debug!(
                    date_from = %row.date_from,
                    key_rate = %row.key_rate,
                    reason,
                    "Dropping rates row"
                );
            }
        }
    }
    Ok(steps)
}

/// Reads delimited text, returning `None` when the required columns are not
/// present under this delimiter.
fn read_delimited(text: &str, delimiter: u8) -> Option<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers().ok()?.clone();
    let date_idx = find_column(&headers, FIELD_DATE_FROM)?;
    let rate_idx = find_column(&headers, FIELD_KEY_RATE)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        // A structurally damaged record is row-level damage, not a parse
        // failure of the whole table.
        let Ok(record) = record else { continue };
        rows.push(RawRow {
            date_from: record.get(date_idx).unwrap_or_default().to_string(),
            key_rate: record.get(rate_idx).unwrap_or_default().to_string(),
        });
    }
    Some(rows)
}

/// Reads a JSON array of records, returning `None` when the text is not such
/// an array or its records lack the required fields.
fn read_json(text: &str) -> Option<Vec<RawRow>> {
    let records: Vec<serde_json::Map<String, Value>> = serde_json::from_str(text).ok()?;

    let Some(first) = records.first() else {
        // An empty array carries no schema to check; zero rows is valid.
        return Some(Vec::new());
    };
    if json_field(first, FIELD_DATE_FROM).is_none() || json_field(first, FIELD_KEY_RATE).is_none() {
        return None;
    }

    Some(
        records
            .iter()
            .map(|record| RawRow {
                date_from: json_field(record, FIELD_DATE_FROM).unwrap_or_default(),
                key_rate: json_field(record, FIELD_KEY_RATE).unwrap_or_default(),
            })
            .collect(),
    )
}

fn json_field(record: &serde_json::Map<String, Value>, name: &str) -> Option<String> {
    record
        .iter()
        .find(|(key, _)| normalize_header(key) == name)
        .map(|(_, value)| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| normalize_header(h) == name)
}

/// Case-folds a header and strips surrounding whitespace and a leading
/// byte-order-mark artifact.
fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_lowercase()
}

fn clean_row(row: &RawRow) -> RowOutcome {
    let Some(date_from) = clean_date(&row.date_from) else {
        return RowOutcome::Rejected("unparseable date");
    };
    let Some(key_rate) = clean_rate(&row.key_rate) else {
        return RowOutcome::Rejected("unparseable rate");
    };
    RowOutcome::Step(RateStep::new(date_from, key_rate))
}

/// Parses the first 10 characters of the trimmed value as an ISO calendar
/// date, tolerating embedded time components ("2024-03-01T00:00:00").
fn clean_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim_start_matches('\u{feff}').trim();
    let prefix: String = trimmed.chars().take(10).collect();
    NaiveDate::parse_from_str(&prefix, "%Y-%m-%d").ok()
}

/// Parses a rate value, tolerating a percent suffix and a decimal comma.
fn clean_rate(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace('%', "").replace(',', ".");
    cleaned.trim().parse::<f64>().ok()
}
