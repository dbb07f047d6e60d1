//! Remote dataset download (OWID worldwide, NYT U.S. states).
//!
//! Each run downloads a fresh copy over the previous one. There is no retry
//! and no checksum; any failure aborts the run.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use tracing::info;

use crate::error::AppError;
use crate::io::ingest::{DatasetSchema, DerivedField, FieldMapping};

const OWID_URL: &str = "https://covid.ourworldindata.org/data/owid-covid-data.csv";
const NYT_URL: &str = "https://raw.githubusercontent.com/nytimes/covid-19-data/master/us-states.csv";

/// Cumulative case count (both datasets).
pub const FIELD_RUNNING_TOTAL: &str = "running total";
pub const FIELD_DAILY_NEW_CASES: &str = "daily_new_cases";
pub const FIELD_NEW_TESTS: &str = "new_tests";
pub const FIELD_TOTAL_DEATHS: &str = "total_deaths";
/// NYT cumulative deaths (the column keeps its source name).
pub const FIELD_DEATHS: &str = "deaths";

/// The datasets a run can chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetSource {
    /// Our World in Data, one row per (country, day).
    Owid,
    /// New York Times, one row per (U.S. state, day).
    NytStates,
}

impl DatasetSource {
    pub fn display_name(self) -> &'static str {
        match self {
            DatasetSource::Owid => "OWID worldwide",
            DatasetSource::NytStates => "NYT U.S. states",
        }
    }

    /// Environment variable that overrides the download URL.
    pub fn url_env_var(self) -> &'static str {
        match self {
            DatasetSource::Owid => "OWID_DATASET_URL",
            DatasetSource::NytStates => "NYT_DATASET_URL",
        }
    }

    pub fn default_url(self) -> &'static str {
        match self {
            DatasetSource::Owid => OWID_URL,
            DatasetSource::NytStates => NYT_URL,
        }
    }

    /// Local file name the download is written to.
    pub fn file_name(self) -> &'static str {
        match self {
            DatasetSource::Owid => "owid-covid-data.csv",
            DatasetSource::NytStates => "us-state-by-statecovid-data.csv",
        }
    }

    pub fn schema(self) -> DatasetSchema {
        match self {
            DatasetSource::Owid => DatasetSchema {
                location_column: "location",
                date_column: "date",
                fields: vec![
                    FieldMapping {
                        column: "total_cases",
                        field: FIELD_RUNNING_TOTAL,
                    },
                    FieldMapping {
                        column: "new_cases",
                        field: FIELD_DAILY_NEW_CASES,
                    },
                    FieldMapping {
                        column: "new_tests",
                        field: FIELD_NEW_TESTS,
                    },
                    FieldMapping {
                        column: "total_deaths",
                        field: FIELD_TOTAL_DEATHS,
                    },
                ],
                derived: Vec::new(),
            },
            // NYT only publishes cumulative counts; daily cases are derived.
            DatasetSource::NytStates => DatasetSchema {
                location_column: "state",
                date_column: "date",
                fields: vec![
                    FieldMapping {
                        column: "cases",
                        field: FIELD_RUNNING_TOTAL,
                    },
                    FieldMapping {
                        column: "deaths",
                        field: FIELD_DEATHS,
                    },
                ],
                derived: vec![DerivedField::DailyChange {
                    source: FIELD_RUNNING_TOTAL,
                    target: FIELD_DAILY_NEW_CASES,
                }],
            },
        }
    }
}

pub struct DatasetClient {
    client: Client,
}

impl DatasetClient {
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::fetch(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Download `source` into `dest_dir`, overwriting the previous copy.
    pub fn fetch(&self, source: DatasetSource, dest_dir: &Path) -> Result<PathBuf, AppError> {
        let url = resolve_url(source);
        let dest = dest_dir.join(source.file_name());
        info!(dataset = source.display_name(), %url, "downloading dataset");
        let bytes = self.download(&url, &dest)?;
        info!(path = %dest.display(), bytes, "dataset saved");
        Ok(dest)
    }

    /// Stream `url` into `dest`. The body goes to a `.part` file first, so a
    /// failed download never replaces (or creates) `dest`.
    pub fn download(&self, url: &str, dest: &Path) -> Result<u64, AppError> {
        let mut resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| AppError::fetch(format!("Request to {url} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::fetch(format!(
                "Request to {url} failed with status {}.",
                resp.status()
            )));
        }

        if let Some(dir) = dest.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| {
                AppError::fetch(format!("Failed to create data dir '{}': {e}", dir.display()))
            })?;
        }

        let partial = dest.with_extension("part");
        let written = File::create(&partial)
            .map_err(|e| e.to_string())
            .and_then(|mut file| resp.copy_to(&mut file).map_err(|e| e.to_string()));
        let written = match written {
            Ok(n) => n,
            Err(e) => {
                let _ = fs::remove_file(&partial);
                return Err(AppError::fetch(format!(
                    "Failed to save response from {url} to '{}': {e}",
                    partial.display()
                )));
            }
        };

        fs::rename(&partial, dest).map_err(|e| {
            AppError::fetch(format!("Failed to write dataset '{}': {e}", dest.display()))
        })?;
        Ok(written)
    }
}

/// Download URL for `source`: the environment override if set, else the default.
pub fn resolve_url(source: DatasetSource) -> String {
    dotenvy::dotenv().ok();
    url_from(std::env::var(source.url_env_var()).ok(), source)
}

fn url_from(overridden: Option<String>, source: DatasetSource) -> String {
    match overridden {
        Some(url) if !url.trim().is_empty() => url.trim().to_string(),
        _ => source.default_url().to_string(),
    }
}
