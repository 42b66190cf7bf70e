//! Temporal filtering of strip readings.
//!
//! Aggregation only considers readings from the current calendar month.
//! The reference clock is supplied by the caller so the filter stays
//! pure and testable.

use chrono::{DateTime, Datelike, Utc};
use water_map_reading_models::StripReading;

use crate::parsing::parse_reading_date;

/// A record carrying a raw timestamp string.
pub trait Timestamped {
    /// The raw ISO-8601 timestamp attached to this record.
    fn timestamp(&self) -> &str;
}

impl Timestamped for StripReading {
    fn timestamp(&self) -> &str {
        &self.date
    }
}

/// Returns the records whose timestamp falls in the same calendar month
/// and year as `now`.
///
/// Records with unparseable timestamps are dropped silently (treated as
/// "not in the current month"). Input order is preserved.
#[must_use]
pub fn filter_current_month<R>(records: &[R], now: DateTime<Utc>) -> Vec<R>
where
    R: Timestamped + Clone,
{
    records
        .iter()
        .filter(|record| {
            parse_reading_date(record.timestamp())
                .is_some_and(|date| date.year() == now.year() && date.month() == now.month())
        })
        .cloned()
        .collect()
}
