//! Elapsed-time breakdown between two calendar timestamps.
//!
//! The forecast pipeline works in fractional days; this module turns two
//! absolute timestamps (e.g. "when I pitched" and "now") into both a
//! human-readable component breakdown and the fractional totals the query
//! layer consumes. Unparsable input is an explicit error, never a NaN smuggled
//! into the time axis.

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::DurationBreakdown;
use crate::error::AppError;

/// Accepted timestamp layouts, tried in order.
const FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse a timestamp string. Bare dates are read as midnight.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, AppError> {
    let trimmed = input.trim();
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }
    Err(AppError::date(format!(
        "Unparsable timestamp '{trimmed}' (expected e.g. 2024-01-02T13:30:15)."
    )))
}

/// Break down the duration between two timestamps.
///
/// When `end` precedes `start` the two are swapped and the breakdown is
/// reported on the swapped pair, with `swapped` set.
pub fn duration_between(start: NaiveDateTime, end: NaiveDateTime) -> DurationBreakdown {
    let (start, end, swapped) = if end < start {
        (end, start, true)
    } else {
        (start, end, false)
    };

    let total_seconds_i = (end - start).num_seconds();
    let total_seconds = total_seconds_i as f64;

    let mut remaining = total_seconds_i;
    let days = remaining / 86_400;
    remaining -= days * 86_400;
    let hours = remaining / 3_600;
    remaining -= hours * 3_600;
    let minutes = remaining / 60;
    remaining -= minutes * 60;
    let seconds = remaining;

    DurationBreakdown {
        swapped,
        days,
        hours,
        minutes,
        seconds,
        total_days: total_seconds / 86_400.0,
        total_hours: total_seconds / 3_600.0,
        total_minutes: total_seconds / 60.0,
        total_seconds,
    }
}

/// Convenience wrapper over string timestamps.
pub fn duration_between_strs(start: &str, end: &str) -> Result<DurationBreakdown, AppError> {
    Ok(duration_between(
        parse_timestamp(start)?,
        parse_timestamp(end)?,
    ))
}
