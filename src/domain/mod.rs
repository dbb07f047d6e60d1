//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - axis and trace configuration (`Scale`, `TraceStyle`, `ChartSpec`)
//! - smoothed per-location series (`SmoothedSeries`)
//! - run configuration and per-chart outcomes (`RunConfig`, `ChartOutcome`)

pub mod types;

pub use types::*;
