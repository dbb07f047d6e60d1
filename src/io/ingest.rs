//! CSV ingest and normalization.
//!
//! This module turns a downloaded dataset CSV into a table keyed by
//! `(location, date)` holding only the metric columns a chart plan needs.
//!
//! Design goals:
//! - **Strict schema** for the columns we rely on (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (rows are date-sorted per location)
//! - **Separation of concerns**: no smoothing or plotting here

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::error::{AppError, EXIT_NO_DATA};

/// Load a CSV column under an in-program field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    pub column: &'static str,
    pub field: &'static str,
}

/// A field computed from another after loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivedField {
    /// Day-over-day change of a cumulative field (first day is missing).
    DailyChange {
        source: &'static str,
        target: &'static str,
    },
}

/// Which columns of a dataset to read and what to call them.
#[derive(Debug, Clone)]
pub struct DatasetSchema {
    pub location_column: &'static str,
    pub date_column: &'static str,
    pub fields: Vec<FieldMapping>,
    pub derived: Vec<DerivedField>,
}

/// All rows for a single location, in ascending date order.
#[derive(Debug, Clone, Default)]
pub struct LocationTable {
    pub dates: Vec<NaiveDate>,
    fields: HashMap<String, Vec<Option<f64>>>,
}

impl LocationTable {
    /// Column for `field`, aligned with `dates`.
    pub fn field(&self, field: &str) -> Option<&[Option<f64>]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    fn derive(&mut self, derived: DerivedField) {
        match derived {
            DerivedField::DailyChange { source, target } => {
                let Some(values) = self.fields.get(source) else {
                    return;
                };
                let mut out = Vec::with_capacity(values.len());
                out.push(None);
                for w in values.windows(2) {
                    out.push(match (w[0], w[1]) {
                        (Some(prev), Some(curr)) => Some(curr - prev),
                        _ => None,
                    });
                }
                out.truncate(values.len());
                self.fields.insert(target.to_string(), out);
            }
        }
    }
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: per-location tables + the field names they carry.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub locations: BTreeMap<String, LocationTable>,
    pub fields: Vec<String>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

impl Dataset {
    pub fn location(&self, name: &str) -> Option<&LocationTable> {
        self.locations.get(name)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }
}

/// Open a CSV file and ingest it with `schema`.
pub fn load_dataset(path: &Path, schema: &DatasetSchema) -> Result<Dataset, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::config(format!("Failed to open CSV '{}': {e}", path.display()))
    })?;
    read_dataset(file, schema)
}

/// Ingest CSV data from any reader.
pub fn read_dataset<R: Read>(reader: R, schema: &DatasetSchema) -> Result<Dataset, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::config(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    let location_idx = require_column(&header_map, schema.location_column)?;
    let date_idx = require_column(&header_map, schema.date_column)?;
    let field_idx = schema
        .fields
        .iter()
        .map(|m| require_column(&header_map, m.column))
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows: BTreeMap<String, Vec<(NaiveDate, Vec<Option<f64>>)>> = BTreeMap::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_used = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, location_idx, date_idx, &field_idx) {
            Ok((location, date, values)) => {
                rows.entry(location).or_default().push((date, values));
                rows_used += 1;
            }
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if rows_used == 0 {
        return Err(AppError::new(EXIT_NO_DATA, "No valid rows found in dataset."));
    }

    let mut locations = BTreeMap::new();
    for (location, mut entries) in rows {
        entries.sort_by_key(|(date, _)| *date);
        let mut table = LocationTable {
            dates: entries.iter().map(|(d, _)| *d).collect(),
            fields: HashMap::new(),
        };
        for (col, mapping) in schema.fields.iter().enumerate() {
            let column = entries.iter().map(|(_, values)| values[col]).collect();
            table.fields.insert(mapping.field.to_string(), column);
        }
        for derived in &schema.derived {
            table.derive(*derived);
        }
        locations.insert(location, table);
    }

    let mut fields: Vec<String> = schema.fields.iter().map(|m| m.field.to_string()).collect();
    for derived in &schema.derived {
        match derived {
            DerivedField::DailyChange { target, .. } => fields.push(target.to_string()),
        }
    }

    Ok(Dataset {
        locations,
        fields,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Strip a UTF-8 BOM on the first header, or it never matches.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn require_column(header_map: &HashMap<String, usize>, column: &str) -> Result<usize, AppError> {
    header_map
        .get(&normalize_header_name(column))
        .copied()
        .ok_or_else(|| AppError::config(format!("Missing required column: `{column}`")))
}

fn parse_row(
    record: &StringRecord,
    location_idx: usize,
    date_idx: usize,
    field_idx: &[usize],
) -> Result<(String, NaiveDate, Vec<Option<f64>>), String> {
    let location = record.get(location_idx).unwrap_or("").trim();
    if location.is_empty() {
        return Err("Missing location".to_string());
    }

    let raw_date = record.get(date_idx).unwrap_or("").trim();
    let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{raw_date}': {e}"))?;

    let values = field_idx
        .iter()
        .map(|&idx| record.get(idx).and_then(parse_value))
        .collect();

    Ok((location.to_string(), date, values))
}

fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
