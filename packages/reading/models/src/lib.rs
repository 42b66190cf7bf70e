#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Water-quality strip reading and province status types.
//!
//! These types carry crowdsourced test-strip readings from the public
//! strip-status endpoint through the aggregation pipeline. Coordinates
//! arrive as strings (decimal or DMS) and are normalized downstream;
//! the quality color is a token from the classifier's palette.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A public strip reading as returned by the strip-status endpoint.
///
/// Coordinate fields are raw strings because submitters record them in
/// either decimal degrees or DMS notation (e.g. `13°45'30.5"N`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StripReading {
    /// Unique strip reading identifier.
    #[serde(rename = "s_id")]
    pub id: String,
    /// Latitude as submitted (decimal or DMS string).
    #[serde(rename = "s_latitude")]
    pub latitude: String,
    /// Longitude as submitted (decimal or DMS string).
    #[serde(rename = "s_longitude")]
    pub longitude: String,
    /// Human-readable quality label (e.g. "pH 7.2").
    #[serde(rename = "s_quality")]
    pub quality: String,
    /// Quality color token assigned by the classifier (e.g. `"#00c951"`).
    #[serde(rename = "s_qualitycolor")]
    pub quality_color: String,
    /// ISO-8601 timestamp of when the strip was read.
    #[serde(rename = "s_date")]
    pub date: String,
    /// Test strip brand, when known.
    #[serde(default)]
    pub brand_name: Option<String>,
}

/// Aggregated water-quality status for a province.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum WaterStatus {
    /// Good readings were at least as common as bad ones this month.
    Good,
    /// Bad readings outnumbered good ones this month.
    Bad,
}

/// One province's aggregated status for the current month.
///
/// Provinces with no matched readings produce no entry at all, rather
/// than a neutral status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceStatus {
    /// Province name as it appears in the boundary dataset.
    pub province: String,
    /// Winning status among this month's readings.
    pub status: WaterStatus,
}
