//! Province status reduction over the current month's readings.
//!
//! Each reading is normalized, attributed to a province, and counted
//! as good or bad against the classifier's "good" color token. A
//! province is `Good` when good readings are at least as common as bad
//! ones; the tie goes to `Good` deliberately.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use water_map_reading::filter::filter_current_month;
use water_map_reading::parsing::parse_coordinate;
use water_map_reading_models::{ProvinceStatus, StripReading, WaterStatus};
use water_map_spatial::BoundaryIndex;

/// Per-province good/bad counters for one aggregation pass.
#[derive(Default)]
struct Tally {
    good: u64,
    bad: u64,
}

/// Normalizes a reading's coordinate strings into decimal degrees.
///
/// Returns `None` (with a warning) when either coordinate fails both
/// the decimal and DMS grammars; the reading is dropped from the pass.
fn resolve_point(reading: &StripReading) -> Option<(f64, f64)> {
    match (
        parse_coordinate(&reading.latitude),
        parse_coordinate(&reading.longitude),
    ) {
        (Ok(lat), Ok(lng)) => Some((lat, lng)),
        (Err(err), _) | (_, Err(err)) => {
            log::warn!("Skipping reading {}: {err}", reading.id);
            None
        }
    }
}

/// Attributes a reading to a province, or drops it.
fn resolve_province<'a>(
    reading: &StripReading,
    boundaries: &'a BoundaryIndex,
) -> Option<&'a str> {
    let (lat, lng) = resolve_point(reading)?;
    let Some(province) = boundaries.lookup_province(lng, lat) else {
        log::warn!(
            "No province found for reading {} at ({lat}, {lng})",
            reading.id
        );
        return None;
    };
    Some(province)
}

/// Reduces this month's readings to one status per province.
///
/// A reading counts as good when its quality color equals
/// `good_color`, bad otherwise. Provinces with no valid, resolvable
/// readings this month are absent from the output. The result is
/// ordered by province name.
#[must_use]
pub fn province_status(
    readings: &[StripReading],
    boundaries: &BoundaryIndex,
    now: DateTime<Utc>,
    good_color: &str,
) -> Vec<ProvinceStatus> {
    let mut tallies: BTreeMap<String, Tally> = BTreeMap::new();

    for reading in filter_current_month(readings, now) {
        let Some(province) = resolve_province(&reading, boundaries) else {
            continue;
        };

        let tally = tallies.entry(province.to_string()).or_default();
        if reading.quality_color == good_color {
            tally.good += 1;
        } else {
            tally.bad += 1;
        }
    }

    tallies
        .into_iter()
        .map(|(province, tally)| ProvinceStatus {
            province,
            status: if tally.good >= tally.bad {
                WaterStatus::Good
            } else {
                WaterStatus::Bad
            },
        })
        .collect()
}

/// Picks the most frequent raw quality color per province this month.
///
/// Used by map rendering to color province polygons. Ties break to the
/// lexicographically smallest color token so the result is
/// deterministic.
#[must_use]
pub fn province_quality_colors(
    readings: &[StripReading],
    boundaries: &BoundaryIndex,
    now: DateTime<Utc>,
) -> BTreeMap<String, String> {
    let mut counts: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();

    for reading in filter_current_month(readings, now) {
        let Some(province) = resolve_province(&reading, boundaries) else {
            continue;
        };

        *counts
            .entry(province.to_string())
            .or_default()
            .entry(reading.quality_color)
            .or_insert(0) += 1;
    }

    counts
        .into_iter()
        .filter_map(|(province, colors)| {
            // Token-ordered iteration plus strictly-greater replacement
            // means equal counts keep the smallest token.
            let mut best: Option<(String, u64)> = None;
            for (color, count) in colors {
                match &best {
                    Some((_, best_count)) if count <= *best_count => {}
                    _ => best = Some((color, count)),
                }
            }
            best.map(|(color, _)| (province, color))
        })
        .collect()
}
