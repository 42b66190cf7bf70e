//! Coordinate and date parsing for strip readings.
//!
//! Coordinates arrive as strings in either plain decimal degrees
//! (`"13.7563"`) or DMS notation (`13°45'30.5"N`). The decimal grammar
//! is tried first; DMS is only attempted when the decimal parse fails.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

use crate::CoordinateError;

/// DMS coordinate pattern, e.g. `13°45'30.5"N`. Whitespace is allowed
/// after the degree sign and before the hemisphere letter; the
/// hemisphere letter is case-insensitive.
static DMS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\d+)°\s*(\d+)'(\d+(?:\.\d+)?)"\s*([NSEWnsew])$"#).expect("valid regex")
});

/// Normalizes a raw coordinate string into decimal degrees.
///
/// Accepts a plain decimal number (optionally signed) or a DMS string
/// matching `D°M'S"H`. DMS values are converted as
/// `D + M/60 + S/3600`, negated for the `S` and `W` hemispheres.
///
/// # Errors
///
/// Returns [`CoordinateError::Format`] when the input matches neither
/// grammar. Callers should drop the affected reading rather than abort
/// the batch.
pub fn parse_coordinate(raw: &str) -> Result<f64, CoordinateError> {
    let trimmed = raw.trim();

    if let Ok(decimal) = trimmed.parse::<f64>() {
        return Ok(decimal);
    }

    let format_err = || CoordinateError::Format {
        input: raw.to_string(),
    };

    let caps = DMS_RE.captures(trimmed).ok_or_else(format_err)?;

    let degrees: f64 = caps[1].parse().map_err(|_| format_err())?;
    let minutes: f64 = caps[2].parse().map_err(|_| format_err())?;
    let seconds: f64 = caps[3].parse().map_err(|_| format_err())?;

    let decimal = degrees + minutes / 60.0 + seconds / 3600.0;

    match caps[4].to_uppercase().as_str() {
        "S" | "W" => Ok(-decimal),
        _ => Ok(decimal),
    }
}

/// Parses a strip reading date string (ISO 8601, with or without
/// fractional seconds or a UTC offset, or date-only at midnight).
#[must_use]
pub fn parse_reading_date(s: &str) -> Option<DateTime<Utc>> {
    let trimmed = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    None
}
