//! Remote COVID-19 dataset sources.

pub mod fetch;

pub use fetch::*;
