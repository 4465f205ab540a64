//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - source identifiers and request windows (`SourceKind`, `SeriesId`, `TimeWindow`)
//! - raw and normalized series (`RawObservation`, `CanonicalSeries`)
//! - the merged output (`CombinedTable`) and catalog entries (`Indicator`)

pub mod types;

pub use types::*;
