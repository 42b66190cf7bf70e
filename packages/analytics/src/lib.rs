#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-province water-quality status aggregation.
//!
//! Consumes the month's public strip readings, attributes each reading
//! to a province via the spatial index, and reduces per-province
//! quality counts into one representative status. The whole pass is a
//! pure, synchronous batch transform: per-record failures are skipped,
//! never raised, and no state survives between invocations.

pub mod status;

pub use status::{province_quality_colors, province_status};
