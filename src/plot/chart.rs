//! PNG chart rendering with Plotters.
//!
//! One chart per metric pair: every location's smoothed series is drawn on a
//! shared figure, either as a connected line or as unconnected markers, and the
//! final point of each series is labelled with the location name.
//!
//! Axis types differ between linear and log scales, so the drawing code is
//! generic over the coordinate spec and [`render_chart`] picks the combination.

use std::path::Path;

use plotters::coord::Shift;
use plotters::coord::ranged1d::{AsRangedCoord, ValueFormatter};
use plotters::prelude::*;

use crate::domain::{ChartSpec, Scale, SmoothedSeries, TraceStyle};
use crate::error::AppError;
use crate::plot::font::{FONT_FAMILY, ensure_chart_font};
use crate::plot::labels::ChartLabels;

/// Output image size in pixels (a 13x9 inch figure at 100 dpi).
pub const CHART_SIZE: (u32, u32) = (1300, 900);

/// Render `series` to a PNG at `path`, replacing any existing file.
///
/// Returns the traces actually drawn as `(location, points)`: a series whose
/// points all fall off a log axis is not drawn.
pub fn render_chart(
    path: &Path,
    spec: &ChartSpec,
    series: &[SmoothedSeries],
) -> Result<Vec<(String, usize)>, AppError> {
    ensure_chart_font()?;
    let labels = ChartLabels::for_spec(spec);
    let visible = visible_series(series, spec);
    let (x0, x1) = axis_range(visible.iter().flat_map(|s| s.points.iter().map(|p| p.0)), spec.x_scale);
    let (y0, y1) = axis_range(visible.iter().flat_map(|s| s.points.iter().map(|p| p.1)), spec.y_scale);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let frame = Frame {
        labels: &labels,
        series: &visible,
        style: spec.style,
    };
    match (spec.x_scale, spec.y_scale) {
        (Scale::Linear, Scale::Linear) => frame.draw(&root, x0..x1, y0..y1)?,
        (Scale::Linear, Scale::Log) => frame.draw(&root, x0..x1, (y0..y1).log_scale())?,
        (Scale::Log, Scale::Linear) => frame.draw(&root, (x0..x1).log_scale(), y0..y1)?,
        (Scale::Log, Scale::Log) => frame.draw(&root, (x0..x1).log_scale(), (y0..y1).log_scale())?,
    }

    root.present().map_err(draw_err)?;
    Ok(visible
        .iter()
        .map(|s| (s.location.clone(), s.points.len()))
        .collect())
}

struct Frame<'a> {
    labels: &'a ChartLabels,
    series: &'a [SmoothedSeries],
    style: TraceStyle,
}

impl Frame<'_> {
    fn draw<X, Y>(
        &self,
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        x_spec: X,
        y_spec: Y,
    ) -> Result<(), AppError>
    where
        X: AsRangedCoord<Value = f64>,
        Y: AsRangedCoord<Value = f64>,
        X::CoordDescType: ValueFormatter<f64>,
        Y::CoordDescType: ValueFormatter<f64>,
    {
        let mut chart = ChartBuilder::on(root)
            .margin(20)
            .caption(&self.labels.title, (FONT_FAMILY, 28))
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(x_spec, y_spec)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc(self.labels.x_axis.as_str())
            .y_desc(self.labels.y_axis.as_str())
            .label_style((FONT_FAMILY, 14))
            .axis_desc_style((FONT_FAMILY, 18))
            .draw()
            .map_err(draw_err)?;

        for (idx, s) in self.series.iter().enumerate() {
            let color = Palette99::pick(idx).mix(0.9);
            match self.style {
                TraceStyle::Line { width } => {
                    chart
                        .draw_series(LineSeries::new(s.points.iter().copied(), color.stroke_width(width)))
                        .map_err(draw_err)?;
                }
                TraceStyle::Markers { size } => {
                    chart
                        .draw_series(s.points.iter().map(|&p| Circle::new(p, size, color.filled())))
                        .map_err(draw_err)?;
                }
            }

            if let Some(last) = s.last() {
                chart
                    .draw_series(std::iter::once(Text::new(
                        s.location.clone(),
                        last,
                        (FONT_FAMILY, 12),
                    )))
                    .map_err(draw_err)?;
            }
        }

        Ok(())
    }
}

/// Points that can be placed on the chart's axes; empty series are dropped.
fn visible_series(series: &[SmoothedSeries], spec: &ChartSpec) -> Vec<SmoothedSeries> {
    series
        .iter()
        .filter_map(|s| {
            let points: Vec<(f64, f64)> = s
                .points
                .iter()
                .copied()
                .filter(|&(x, y)| spec.x_scale.accepts(x) && spec.y_scale.accepts(y))
                .collect();
            if points.is_empty() {
                None
            } else {
                Some(SmoothedSeries {
                    location: s.location.clone(),
                    points,
                })
            }
        })
        .collect()
}

/// Data range padded by 5% (in log space for log axes).
///
/// Degenerate or empty ranges get a fixed span so the axis is still valid.
pub fn axis_range(values: impl Iterator<Item = f64>, scale: Scale) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }

    match scale {
        Scale::Linear => {
            if !(min.is_finite() && max.is_finite()) {
                return (0.0, 1.0);
            }
            if (max - min).abs() < 1e-12 {
                return (min - 0.5, max + 0.5);
            }
            let pad = (max - min) * 0.05;
            (min - pad, max + pad)
        }
        Scale::Log => {
            if !(min.is_finite() && max.is_finite()) || min <= 0.0 {
                return (1.0, 10.0);
            }
            let (lo, hi) = (min.log10(), max.log10());
            if (hi - lo).abs() < 1e-12 {
                return (min / 2.0, max * 2.0);
            }
            let pad = (hi - lo) * 0.05;
            (10f64.powf(lo - pad), 10f64.powf(hi + pad))
        }
    }
}

fn draw_err<E: std::fmt::Display>(err: E) -> AppError {
    AppError::output(format!("Chart rendering failed: {err}"))
}
