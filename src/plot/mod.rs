//! Chart rendering.
//!
//! - PNG output via Plotters (`chart`)
//! - titles, axis labels and file names (`labels`)
//! - font registration for chart text (`font`)

pub mod chart;
pub mod font;
pub mod labels;

pub use chart::*;
pub use font::*;
pub use labels::*;
