//! Date parsing for contract and creation timestamps
//!
//! Dates come from spreadsheet cells and form inputs, so several formats
//! are accepted. Date-only values resolve to midnight.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %b %Y"];

const SECONDS_PER_DAY: i64 = 86_400;

/// Parse a timestamp string into a naive UTC date-time
pub fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }

    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }

    None
}

/// Milliseconds since epoch, or 0 when unparseable
pub fn timestamp_millis(raw: Option<&str>) -> i64 {
    raw.and_then(parse_date_time)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or(0)
}

/// Whole days from `today` at midnight until `end`, rounded up
///
/// Negative when `end` is already behind us.
pub fn days_until(end: NaiveDateTime, today: NaiveDate) -> i64 {
    let secs = (end - today.and_time(NaiveTime::MIN)).num_seconds();
    let whole = secs.div_euclid(SECONDS_PER_DAY);
    if secs.rem_euclid(SECONDS_PER_DAY) > 0 {
        whole + 1
    } else {
        whole
    }
}
