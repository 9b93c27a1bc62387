use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::types::DueDate;

/// Offset-less layouts tried in order after RFC 3339. Values are taken as UTC.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// True for the two "no due date" sentinels: the empty string and a single space.
pub fn is_blank(raw: &str) -> bool {
    raw.is_empty() || raw == " "
}

/// Parse a due date into a UTC instant.
///
/// Surrounding whitespace is ignored. Accepts RFC 3339 with an offset, the
/// `DATE_TIME_FORMATS` layouts, or a bare `YYYY-MM-DD` (midnight). Returns `None` for
/// anything else; the local timezone and locale are never consulted.
pub fn parse_due_date(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Classify a raw due-date field. Blank is checked before any parsing happens, so
/// blank sentinels never reach the parser; an absent field counts as blank.
pub fn classify(raw: Option<&str>) -> DueDate {
    match raw {
        None => DueDate::Blank,
        Some(text) if is_blank(text) => DueDate::Blank,
        Some(text) => parse_due_date(text)
            .map(DueDate::Scheduled)
            .unwrap_or(DueDate::Unparseable),
    }
}
