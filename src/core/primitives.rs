use chrono::{DateTime, NaiveDateTime, Timelike, Utc};

use crate::error::{ReportError, ReportResult};

/// Display string used in place of a timestamp that failed to parse.
pub const MALFORMED_TIMESTAMP_LABEL: &str = "00:00:00";

const MINUTES_PER_DAY: f64 = 1_440.0;

/// Parses an ISO-8601 timestamp into UTC.
///
/// Accepts RFC 3339 with an offset (`Z`, `+09:00`) and offset-less
/// `YYYY-MM-DDTHH:MM:SS[.fff]` values, which are read as UTC.
pub fn parse_timestamp(input: &str) -> ReportResult<DateTime<Utc>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ReportError::MalformedTimestamp(input.to_owned()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return Ok(naive.and_utc());
        }
    }

    Err(ReportError::MalformedTimestamp(input.to_owned()))
}

#[must_use]
pub fn datetime_to_unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}

/// Minutes elapsed since UTC midnight, including the fractional seconds part.
#[must_use]
pub fn datetime_to_minutes_of_day(time: DateTime<Utc>) -> f64 {
    f64::from(time.hour()) * 60.0
        + f64::from(time.minute())
        + (f64::from(time.second()) + f64::from(time.nanosecond()) / 1e9) / 60.0
}

/// `HH:MM:SS` label for a Unix-seconds value.
#[must_use]
pub fn format_unix_seconds_label(seconds: f64) -> String {
    if !seconds.is_finite() {
        return MALFORMED_TIMESTAMP_LABEL.to_owned();
    }
    match DateTime::<Utc>::from_timestamp(seconds.round() as i64, 0) {
        Some(dt) => dt.format("%H:%M:%S").to_string(),
        None => MALFORMED_TIMESTAMP_LABEL.to_owned(),
    }
}

/// `HH:MM` label for a minutes-of-day value. Values outside one day wrap.
#[must_use]
pub fn format_minutes_of_day_label(minutes: f64) -> String {
    if !minutes.is_finite() {
        return MALFORMED_TIMESTAMP_LABEL.to_owned();
    }
    let wrapped = minutes.round().rem_euclid(MINUTES_PER_DAY) as u32;
    format!("{:02}:{:02}", wrapped / 60, wrapped % 60)
}
