//! Conversion of timestamp columns to seconds elapsed since the first row.
//!
//! ISO 8601 timestamps are read as local wall-clock time: a trailing UTC
//! offset is dropped and fractional seconds are truncated. Columns that only
//! hold a time of day (`HH:MM:SS`) fall back to a manual parse which assumes
//! that a decreasing hour means the recording crossed midnight.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

#[derive(Debug, Clone, PartialEq)]
pub enum IsoParse {
    Parsed(Vec<f64>),
    NeedsManualFallback(String),
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Seconds since the first row, trying ISO 8601 first and clock times second.
pub fn elapsed_seconds(values: &[String]) -> Result<Vec<f64>, String> {
    match parse_iso_column(values) {
        IsoParse::Parsed(seconds) => Ok(seconds),
        IsoParse::NeedsManualFallback(reason) => {
            log::debug!("falling back to clock time parsing: {reason}");
            elapsed_from_clock_times(values).map_err(|err| format!("{reason}; {err}"))
        }
    }
}

pub fn parse_iso_column(values: &[String]) -> IsoParse {
    let mut stamps = Vec::with_capacity(values.len());
    for (row, value) in values.iter().enumerate() {
        match parse_wall_clock(value) {
            Some(ts) => stamps.push(ts),
            None => {
                return IsoParse::NeedsManualFallback(format!(
                    "row {row}: '{value}' is not an ISO 8601 timestamp"
                ))
            }
        }
    }
    let Some(&first) = stamps.first() else {
        return IsoParse::Parsed(Vec::new());
    };
    IsoParse::Parsed(stamps.iter().map(|ts| (ts - first) as f64).collect())
}

/// Parse `HH:MM:SS` values. Every time the hour drops below the hour of the
/// previous row, one more day is added to all following rows.
pub fn elapsed_from_clock_times(values: &[String]) -> Result<Vec<f64>, String> {
    let mut elapsed = Vec::with_capacity(values.len());
    let mut start = None;
    let mut previous_hour = None;
    let mut days = 0;
    for (row, value) in values.iter().enumerate() {
        let (hour, minute, second) = parse_hms(value)
            .ok_or_else(|| format!("row {row}: '{value}' is not a HH:MM:SS time"))?;
        if previous_hour.is_some_and(|prev| hour < prev) {
            days += 1;
        }
        previous_hour = Some(hour);
        let seconds = (hour + 24 * days) * 3600 + minute * 60 + second;
        let base = *start.get_or_insert(seconds);
        elapsed.push((seconds - base) as f64);
    }
    Ok(elapsed)
}

fn parse_hms(raw: &str) -> Option<(i64, i64, i64)> {
    let mut parts = raw.trim().split(':');
    let hour = parts.next()?.trim().parse().ok()?;
    let minute = parts.next()?.trim().parse().ok()?;
    let second = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((hour, minute, second))
}

/// Unix seconds of the wall-clock time in `raw`, interpreted in the local
/// time zone.
fn parse_wall_clock(raw: &str) -> Option<i64> {
    let naive = parse_naive(raw.trim())?;
    let ts = match Local.from_local_datetime(&naive).earliest() {
        Some(dt) => dt.timestamp(),
        // wall-clock time skipped by a DST change
        None => {
            let offset = Local.offset_from_utc_datetime(&naive).local_minus_utc();
            naive.and_utc().timestamp() - i64::from(offset)
        }
    };
    Some(ts)
}

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.naive_local());
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
