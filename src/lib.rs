//! `covid-charts` library crate.
//!
//! The binary (`covid-charts`) is a thin wrapper around this library so that:
//!
//! - the smoothing and ingest logic is testable without network access
//! - charts can be rendered from any dataset that fits a schema

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod smooth;
