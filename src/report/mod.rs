//! Console reporting for a run.
//!
//! Formatting lives here so the pipeline only collects [`ChartOutcome`]s and
//! output changes stay localized.

use crate::domain::ChartOutcome;
use crate::io::ingest::Dataset;

/// One line describing a loaded dataset.
pub fn format_dataset_summary(name: &str, dataset: &Dataset) -> String {
    let mut out = format!(
        "{name}: {} rows read, {} used, {} locations",
        dataset.rows_read,
        dataset.rows_used,
        dataset.locations.len()
    );
    if !dataset.row_errors.is_empty() {
        out.push_str(&format!(" ({} rows skipped)", dataset.row_errors.len()));
    }
    out
}

/// Summary table of every chart written during the run.
pub fn format_run_summary(charts: &[ChartOutcome]) -> String {
    let mut out = String::new();
    out.push_str("=== covid-charts ===\n");

    if charts.is_empty() {
        out.push_str("No charts written.\n");
        return out;
    }

    for chart in charts {
        let points: usize = chart.plotted.iter().map(|(_, n)| n).sum();
        out.push_str(&format!(
            "{}\n  traces={} points={} -> {}\n",
            chart.title,
            chart.plotted.len(),
            points,
            chart.path.display()
        ));
        if !chart.skipped.is_empty() {
            out.push_str(&format!("  no data: {}\n", chart.skipped.join(", ")));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::domain::{ChartSpec, DATE_FIELD, Scale, TraceStyle};

    fn outcome(skipped: &[&str]) -> ChartOutcome {
        ChartOutcome {
            title: "COVID-19 daily new cases vs. Time Since First Infection (Days)".to_string(),
            path: PathBuf::from("out/chart.png"),
            spec: ChartSpec::new(
                DATE_FIELD,
                "daily_new_cases",
                Scale::Linear,
                Scale::Linear,
                TraceStyle::Line { width: 1 },
            ),
            plotted: vec![("Texas".to_string(), 100), ("Hawaii".to_string(), 80)],
            skipped: skipped.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn summary_counts_traces_and_points() {
        let text = format_run_summary(&[outcome(&[])]);
        assert!(text.contains("traces=2 points=180"), "{text}");
        assert!(!text.contains("no data"), "{text}");
    }

    #[test]
    fn summary_lists_skipped_locations() {
        let text = format_run_summary(&[outcome(&["Guam", "Atlantis"])]);
        assert!(text.contains("no data: Guam, Atlantis"), "{text}");
    }

    #[test]
    fn empty_run_is_reported() {
        assert!(format_run_summary(&[]).contains("No charts written."));
    }
}
