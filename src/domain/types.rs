//! Shared domain types.
//!
//! These types are intentionally small and serializable so they can be:
//!
//! - passed between the ingest, smoothing and rendering stages
//! - written to the run manifest (JSON)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Field name that selects the "days since first case" x-axis.
pub const DATE_FIELD: &str = "date";

/// Axis scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    Linear,
    Log,
}

impl Scale {
    /// Whether a value can be placed on an axis with this scale.
    ///
    /// Log axes mask non-positive values rather than failing.
    pub fn accepts(self, value: f64) -> bool {
        match self {
            Scale::Linear => value.is_finite(),
            Scale::Log => value.is_finite() && value > 0.0,
        }
    }
}

/// How a single location's series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum TraceStyle {
    /// Connected line, stroke width in pixels.
    Line { width: u32 },
    /// Unconnected circular markers, radius in pixels.
    Markers { size: u32 },
}

/// One chart in the run plan: which metric pair, how the axes scale, and how
/// traces are drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub x_field: String,
    pub y_field: String,
    pub x_scale: Scale,
    pub y_scale: Scale,
    pub style: TraceStyle,
}

impl ChartSpec {
    pub fn new(
        x_field: &str,
        y_field: &str,
        x_scale: Scale,
        y_scale: Scale,
        style: TraceStyle,
    ) -> Self {
        Self {
            x_field: x_field.to_string(),
            y_field: y_field.to_string(),
            x_scale,
            y_scale,
            style,
        }
    }

    /// True when x is the relative day count rather than a metric column.
    pub fn is_time_axis(&self) -> bool {
        self.x_field == DATE_FIELD
    }
}

/// A smoothed `(x, y)` series for one location, ready to plot.
///
/// Invariant: `points` is non-empty and x is non-decreasing.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedSeries {
    pub location: String,
    pub points: Vec<(f64, f64)>,
}

impl SmoothedSeries {
    /// The point that receives the location label.
    pub fn last(&self) -> Option<(f64, f64)> {
        self.points.last().copied()
    }
}

/// Outcome of rendering one chart (used for the console summary and manifest).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartOutcome {
    pub title: String,
    pub path: PathBuf,
    pub spec: ChartSpec,
    /// Locations that produced a trace, with their point counts.
    pub plotted: Vec<(String, usize)>,
    /// Locations that were requested but had no qualifying data.
    pub skipped: Vec<String>,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory the downloaded CSVs are written to.
    pub data_dir: PathBuf,
    /// Directory the PNG charts are written to.
    pub out_dir: PathBuf,
    /// Explicit TrueType font; when `None`, the bundled font is used.
    pub font: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub world: bool,
    pub us_states: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            out_dir: PathBuf::from("."),
            font: None,
            manifest: None,
            world: true,
            us_states: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_scale_masks_non_positive_values() {
        assert!(Scale::Log.accepts(1.0));
        assert!(!Scale::Log.accepts(0.0));
        assert!(!Scale::Log.accepts(-3.0));
        assert!(Scale::Linear.accepts(0.0));
        assert!(!Scale::Linear.accepts(f64::NAN));
    }

    #[test]
    fn time_axis_is_detected_by_field_name() {
        let by_date = ChartSpec::new(
            DATE_FIELD,
            "running total",
            Scale::Linear,
            Scale::Log,
            TraceStyle::Line { width: 1 },
        );
        assert!(by_date.is_time_axis());

        let by_total = ChartSpec::new(
            "running total",
            "total_deaths",
            Scale::Log,
            Scale::Log,
            TraceStyle::Markers { size: 1 },
        );
        assert!(!by_total.is_time_axis());
    }
}
