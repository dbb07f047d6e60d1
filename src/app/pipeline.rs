//! The fixed chart plan and the per-chart workflow:
//! dataset -> smoothing per location -> PNG.

use std::path::Path;

use tracing::{debug, info};

use crate::data::{
    DatasetSource, FIELD_DAILY_NEW_CASES, FIELD_DEATHS, FIELD_NEW_TESTS, FIELD_RUNNING_TOTAL,
    FIELD_TOTAL_DEATHS,
};
use crate::domain::{ChartOutcome, ChartSpec, DATE_FIELD, Scale, TraceStyle};
use crate::error::AppError;
use crate::io::ingest::Dataset;
use crate::plot::{ChartLabels, render_chart};
use crate::smooth::smooth_locations;

pub const COUNTRIES: &[&str] = &[
    "China",
    "Singapore",
    "South Korea",
    "Japan",
    "United States",
    "United Kingdom",
    "Ireland",
    "France",
    "Russia",
    "Israel",
    "Taiwan",
    "India",
    "Australia",
    "New Zealand",
    "Canada",
    "Mexico",
    "Italy",
];

pub const STATES: &[&str] = &[
    "California",
    "Massachusetts",
    "New York",
    "Washington",
    "New Jersey",
    "Oregon",
    "Kansas",
    "Texas",
    "Georgia",
    "Florida",
    "Arizona",
    "Vermont",
    "Hawaii",
    "Montana",
    "Alaska",
    "Idaho",
];

const LINE: TraceStyle = TraceStyle::Line { width: 1 };
const MARKERS: TraceStyle = TraceStyle::Markers { size: 1 };

/// A set of charts drawn from one dataset for one list of locations.
#[derive(Debug, Clone)]
pub struct ChartPlan {
    pub source: DatasetSource,
    /// Appended to every file name, e.g. `by country`.
    pub suffix: &'static str,
    pub locations: &'static [&'static str],
    pub charts: Vec<ChartSpec>,
}

/// Country comparisons from the OWID dataset.
pub fn world_plan() -> ChartPlan {
    use Scale::{Linear, Log};
    ChartPlan {
        source: DatasetSource::Owid,
        suffix: "by country",
        locations: COUNTRIES,
        charts: vec![
            ChartSpec::new(DATE_FIELD, FIELD_RUNNING_TOTAL, Linear, Log, LINE),
            ChartSpec::new(FIELD_RUNNING_TOTAL, FIELD_DAILY_NEW_CASES, Log, Log, MARKERS),
            ChartSpec::new(FIELD_NEW_TESTS, FIELD_DAILY_NEW_CASES, Log, Log, MARKERS),
            ChartSpec::new(DATE_FIELD, FIELD_NEW_TESTS, Linear, Log, MARKERS),
            ChartSpec::new(FIELD_RUNNING_TOTAL, FIELD_TOTAL_DEATHS, Log, Log, MARKERS),
        ],
    }
}

/// U.S. state comparisons from the NYT dataset.
pub fn us_plan() -> ChartPlan {
    use Scale::{Linear, Log};
    ChartPlan {
        source: DatasetSource::NytStates,
        suffix: "by US state",
        locations: STATES,
        charts: vec![
            ChartSpec::new(FIELD_RUNNING_TOTAL, FIELD_DAILY_NEW_CASES, Log, Log, MARKERS),
            ChartSpec::new(DATE_FIELD, FIELD_DAILY_NEW_CASES, Linear, Linear, LINE),
            ChartSpec::new(FIELD_RUNNING_TOTAL, FIELD_DEATHS, Log, Log, MARKERS),
        ],
    }
}

/// Render every chart in `plan` into `out_dir`.
pub fn run_plan(
    plan: &ChartPlan,
    dataset: &Dataset,
    out_dir: &Path,
) -> Result<Vec<ChartOutcome>, AppError> {
    plan.charts
        .iter()
        .map(|spec| plot_chart(dataset, spec, plan.locations, plan.suffix, out_dir))
        .collect()
}

/// Smooth each location's series for `spec` and write one PNG.
pub fn plot_chart(
    dataset: &Dataset,
    spec: &ChartSpec,
    locations: &[&str],
    suffix: &str,
    out_dir: &Path,
) -> Result<ChartOutcome, AppError> {
    info!(y = %spec.y_field, x = %spec.x_field, "plotting");

    let series = smooth_locations(dataset, &spec.x_field, &spec.y_field, locations)?;
    let labels = ChartLabels::for_spec(spec);
    let path = out_dir.join(labels.file_name(suffix));

    let plotted = render_chart(&path, spec, &series)?;
    debug!(path = %path.display(), traces = plotted.len(), "chart written");

    let skipped = locations
        .iter()
        .filter(|l| !plotted.iter().any(|(p, _)| p == *l))
        .map(|l| l.to_string())
        .collect();

    Ok(ChartOutcome {
        title: labels.title,
        path,
        spec: spec.clone(),
        plotted,
        skipped,
    })
}
