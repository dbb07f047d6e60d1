//! Export a JSON manifest of the charts written during a run.
//!
//! The manifest is meant for scripts that pick up the PNGs afterwards: it lists
//! each file with its metric pair, axis scales and which locations made it in.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::ChartOutcome;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub tool: String,
    pub generated: chrono::DateTime<chrono::Utc>,
    pub charts: Vec<ChartOutcome>,
}

/// Write the run manifest as pretty-printed JSON.
pub fn write_manifest(path: &Path, charts: &[ChartOutcome]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::output(format!("Failed to create manifest '{}': {e}", path.display()))
    })?;

    let manifest = RunManifest {
        tool: env!("CARGO_PKG_NAME").to_string(),
        generated: chrono::Utc::now(),
        charts: charts.to_vec(),
    };

    serde_json::to_writer_pretty(file, &manifest)
        .map_err(|e| AppError::output(format!("Failed to write manifest: {e}")))?;

    Ok(())
}

/// Read a manifest back (used by tests and downstream tooling).
pub fn read_manifest(path: &Path) -> Result<RunManifest, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::config(format!("Failed to open manifest '{}': {e}", path.display()))
    })?;
    serde_json::from_reader(file).map_err(|e| AppError::config(format!("Invalid manifest: {e}")))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::domain::{ChartSpec, Scale, TraceStyle};

    #[test]
    fn manifest_lists_plotted_and_skipped_locations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charts.json");

        let outcome = ChartOutcome {
            title: "COVID-19 deaths vs. running total".to_string(),
            path: PathBuf::from("COVID-19 deaths vs. running total-by US state.png"),
            spec: ChartSpec::new(
                "running total",
                "deaths",
                Scale::Log,
                Scale::Log,
                TraceStyle::Markers { size: 1 },
            ),
            plotted: vec![("Oregon".to_string(), 120)],
            skipped: vec!["Guam".to_string()],
        };
        write_manifest(&path, &[outcome]).unwrap();

        let manifest = read_manifest(&path).unwrap();
        assert_eq!(manifest.tool, "covid-charts");
        assert_eq!(manifest.charts.len(), 1);
        let chart = &manifest.charts[0];
        assert_eq!(chart.plotted, vec![("Oregon".to_string(), 120)]);
        assert_eq!(chart.skipped, vec!["Guam".to_string()]);
        assert_eq!(chart.spec.style, TraceStyle::Markers { size: 1 });
    }
}
