//! Per-location smoothing: the transform applied to every series before it is
//! plotted.
//!
//! Two x-axis modes:
//!
//! - **time** (`x = "date"`): y in date order, leading zero/missing days
//!   trimmed, x re-indexed as days since the first non-zero observation
//! - **metric**: `(x, y)` pairs ordered by x
//!
//! Both then take a 7-sample trailing mean of y (x is the value at the end of
//! each window) and drop any pair that is still missing a value.

use tracing::debug;

use crate::domain::{DATE_FIELD, SmoothedSeries};
use crate::error::AppError;
use crate::io::ingest::{Dataset, LocationTable};
use crate::math::{SMOOTHING_WINDOW, first_nonzero, trailing_mean};

/// Smooth `y_field` against `x_field` for each requested location.
///
/// Locations that are absent from the dataset, or that end up with no points,
/// are left out of the result. That is not an error.
pub fn smooth_locations(
    dataset: &Dataset,
    x_field: &str,
    y_field: &str,
    locations: &[&str],
) -> Result<Vec<SmoothedSeries>, AppError> {
    ensure_field(dataset, y_field)?;
    if x_field != DATE_FIELD {
        ensure_field(dataset, x_field)?;
    }

    let mut out = Vec::with_capacity(locations.len());
    for &location in locations {
        let Some(table) = dataset.location(location) else {
            debug!(location, "location not in dataset");
            continue;
        };

        let points = smooth_table(table, x_field, y_field);
        if points.is_empty() {
            debug!(location, x_field, y_field, "no data after smoothing");
            continue;
        }
        out.push(SmoothedSeries {
            location: location.to_string(),
            points,
        });
    }

    Ok(out)
}

/// Smooth one location's columns. Unknown fields yield an empty series.
pub fn smooth_table(table: &LocationTable, x_field: &str, y_field: &str) -> Vec<(f64, f64)> {
    let Some(ys) = table.field(y_field) else {
        return Vec::new();
    };

    if x_field == DATE_FIELD {
        smooth_by_day(ys)
    } else {
        match table.field(x_field) {
            Some(xs) => smooth_by_metric(xs, ys),
            None => Vec::new(),
        }
    }
}

/// Time mode: trim the leading run of zero/missing days, then smooth.
///
/// Missing days before the first case are trimmed along with the zeros, so
/// day 0 is the first reported non-zero value rather than the location's first
/// row. Dropping only the zeros would keep those leading gaps, shift every x
/// by their count, and void the first windows.
///
/// x is the day index relative to the first non-zero observation, taken at the
/// end of each averaging window (so the first point sits at x = 6).
pub fn smooth_by_day(ys: &[Option<f64>]) -> Vec<(f64, f64)> {
    let trimmed = &ys[first_nonzero(ys)..];
    let xs: Vec<Option<f64>> = (0..trimmed.len()).map(|i| Some(i as f64)).collect();
    pair_windows(&xs, trimmed)
}

/// Metric mode: order pairs by x, then smooth y.
///
/// Rows without an x value are dropped first, since they have no place in
/// x-order. The sort is stable so ties keep their date order.
pub fn smooth_by_metric(xs: &[Option<f64>], ys: &[Option<f64>]) -> Vec<(f64, f64)> {
    let mut pairs: Vec<(f64, Option<f64>)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| x.map(|x| (x, *y)))
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let xs: Vec<Option<f64>> = pairs.iter().map(|(x, _)| Some(*x)).collect();
    let ys: Vec<Option<f64>> = pairs.iter().map(|(_, y)| *y).collect();
    pair_windows(&xs, &ys)
}

fn pair_windows(xs: &[Option<f64>], ys: &[Option<f64>]) -> Vec<(f64, f64)> {
    let means = trailing_mean(ys, SMOOTHING_WINDOW);
    xs.iter()
        .skip(SMOOTHING_WINDOW - 1)
        .zip(means)
        .filter_map(|(x, y)| Some(((*x)?, y?)))
        .collect()
}

fn ensure_field(dataset: &Dataset, field: &str) -> Result<(), AppError> {
    if dataset.has_field(field) {
        Ok(())
    } else {
        Err(AppError::config(format!("Unknown dataset field: `{field}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::{DatasetSchema, FieldMapping, read_dataset};

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    fn mean(values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }

    #[test]
    fn trims_leading_zeros_and_averages_weekly() {
        let raw = [0.0, 0.0, 3.0, 5.0, 8.0, 0.0, 10.0, 12.0, 15.0, 18.0, 21.0, 24.0, 28.0];
        let out = smooth_by_day(&some(&raw));

        // 13 samples, 2 leading zeros -> 11 samples -> 5 weekly means.
        assert_eq!(out.len(), 5);
        let xs: Vec<f64> = out.iter().map(|p| p.0).collect();
        assert_eq!(xs, vec![6.0, 7.0, 8.0, 9.0, 10.0]);

        // Interior zeros are real observations and stay in the window.
        let trimmed = &raw[2..];
        for (i, &(_, y)) in out.iter().enumerate() {
            let expected = mean(&trimmed[i..i + 7]);
            assert!((y - expected).abs() < 1e-12, "point {i}: {y} != {expected}");
        }
    }

    #[test]
    fn untrimmed_series_yields_len_minus_six() {
        let raw: Vec<f64> = (1..=20).map(f64::from).collect();
        let out = smooth_by_day(&some(&raw));
        assert_eq!(out.len(), 14);
        assert_eq!(out[0], (6.0, 4.0));
        assert!(out.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn short_or_all_zero_series_is_empty() {
        assert!(smooth_by_day(&some(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])).is_empty());
        assert!(smooth_by_day(&some(&[0.0; 30])).is_empty());
        assert!(smooth_by_day(&[]).is_empty());
    }

    #[test]
    fn leading_missing_days_are_trimmed_with_zeros() {
        let mut raw = vec![None, Some(0.0), None];
        raw.extend(some(&[7.0; 7]));
        assert_eq!(smooth_by_day(&raw), vec![(6.0, 7.0)]);
    }

    #[test]
    fn windows_with_gaps_are_dropped() {
        let mut raw = some(&[1.0; 10]);
        raw[8] = None;
        let out = smooth_by_day(&raw);
        // Windows end at 6..=9; those ending at 8 and 9 include the gap.
        assert_eq!(out, vec![(6.0, 1.0), (7.0, 1.0)]);
    }

    #[test]
    fn metric_mode_orders_by_x_and_pairs_window_end() {
        let xs = vec![Some(70.0), Some(10.0), None, Some(20.0), Some(30.0), Some(40.0), Some(50.0), Some(60.0), Some(80.0)];
        let ys = some(&[7.0, 1.0, 99.0, 2.0, 3.0, 4.0, 5.0, 6.0, 8.0]);
        let out = smooth_by_metric(&xs, &ys);
        assert_eq!(out, vec![(70.0, 4.0), (80.0, 5.0)]);
    }

    #[test]
    fn smoothing_is_deterministic() {
        let raw: Vec<f64> = (0..40).map(|i| ((i * 37) % 11) as f64).collect();
        let first = smooth_by_day(&some(&raw));
        let second = smooth_by_day(&some(&raw));
        assert_eq!(first, second);
    }

    fn dataset() -> Dataset {
        let mut csv = String::from("location,date,total_cases,new_cases\n");
        for day in 1..=10 {
            csv.push_str(&format!("Ireland,2020-03-{day:02},{},{}\n", day * 10, 10));
            csv.push_str(&format!("Japan,2020-03-{day:02},0,0\n"));
        }
        let schema = DatasetSchema {
            location_column: "location",
            date_column: "date",
            fields: vec![
                FieldMapping {
                    column: "total_cases",
                    field: "running total",
                },
                FieldMapping {
                    column: "new_cases",
                    field: "daily_new_cases",
                },
            ],
            derived: Vec::new(),
        };
        read_dataset(csv.as_bytes(), &schema).unwrap()
    }

    #[test]
    fn absent_and_empty_locations_are_skipped_without_error() {
        let data = dataset();
        let out = smooth_locations(&data, DATE_FIELD, "running total", &["Atlantis", "Japan", "Ireland"]).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].location, "Ireland");
        assert_eq!(out[0].points.len(), 4);
        assert_eq!(out[0].last(), Some((9.0, 70.0)));
    }

    #[test]
    fn metric_pair_uses_x_values() {
        let data = dataset();
        let out = smooth_locations(&data, "running total", "daily_new_cases", &["Ireland"]).unwrap();
        let xs: Vec<f64> = out[0].points.iter().map(|p| p.0).collect();
        assert_eq!(xs, vec![70.0, 80.0, 90.0, 100.0]);
        assert!(out[0].points.iter().all(|p| (p.1 - 10.0).abs() < 1e-12));
    }

    #[test]
    fn unknown_field_is_an_error() {
        let data = dataset();
        let err = smooth_locations(&data, DATE_FIELD, "hospitalizations", &["Ireland"]).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_CONFIG);
    }
}
