#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Strip reading coordinate normalization and temporal filtering.
//!
//! Submitters record coordinates in either decimal degrees or DMS
//! notation, and reading dates in a few ISO-8601 variants. This crate
//! normalizes both so the spatial and analytics layers only ever see
//! decimal degrees and parsed timestamps.

pub mod filter;
pub mod parsing;

use thiserror::Error;

/// Errors that can occur while normalizing strip reading coordinates.
#[derive(Debug, Error)]
pub enum CoordinateError {
    /// The input matched neither the decimal nor the DMS grammar.
    #[error("Invalid coordinate format: {input}")]
    Format {
        /// The raw coordinate string that failed to parse.
        input: String,
    },
}
