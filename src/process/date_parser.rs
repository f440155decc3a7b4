use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::process::utils::clean_str;

/// Export format of the "Start date" column, e.g. `"Jan 1, 2021 12:00 AM"`.
const START_DATE_FORMATS: &[&str] = &["%b %d, %Y %I:%M %p", "%b %d %Y %I:%M %p"];

/// ISO-like forms accepted in a dedicated `timestamp` column.
const ISO_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse `"Jan 1, 2021 12:00 AM"` (comma optional) → naive local time.
pub fn parse_start_date(s: &str) -> Option<NaiveDateTime> {
    let s = clean_str(s);
    START_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&s, fmt).ok())
}

/// Parse an ISO-like timestamp. An RFC 3339 offset is accepted and dropped; the wall
/// clock time is kept as written. A bare `YYYY-MM-DD` means midnight.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = clean_str(s);
    ISO_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&s, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(&s)
                .ok()
                .map(|dt| dt.naive_local())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
