//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and installs logging
//! - downloads each dataset
//! - smooths and plots every chart in the plan
//! - prints the run summary and writes the optional manifest

use std::fs;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::data::DatasetClient;
use crate::domain::RunConfig;
use crate::error::AppError;
use crate::io::ingest::load_dataset;

pub mod pipeline;

/// Entry point for the `covid-charts` binary.
pub fn run() -> Result<(), AppError> {
    init_logging();
    let cli = Cli::parse();
    let config = run_config_from_args(&cli);
    run_with_config(&config)
}

/// Execute a full run: fetch, smooth, plot, report.
pub fn run_with_config(config: &RunConfig) -> Result<(), AppError> {
    fs::create_dir_all(&config.out_dir).map_err(|e| {
        AppError::output(format!(
            "Failed to create output dir '{}': {e}",
            config.out_dir.display()
        ))
    })?;

    crate::plot::register_chart_font(config.font.as_deref())?;
    let client = DatasetClient::new()?;

    let mut plans = Vec::new();
    if config.world {
        plans.push(pipeline::world_plan());
    }
    if config.us_states {
        plans.push(pipeline::us_plan());
    }

    let mut charts = Vec::new();
    for plan in &plans {
        let path = client.fetch(plan.source, &config.data_dir)?;
        let dataset = load_dataset(&path, &plan.source.schema())?;
        if let Some(first) = dataset.row_errors.first() {
            warn!(
                dataset = plan.source.display_name(),
                skipped = dataset.row_errors.len(),
                "skipped malformed rows (first at line {}: {})",
                first.line,
                first.message
            );
        }
        println!(
            "{}",
            crate::report::format_dataset_summary(plan.source.display_name(), &dataset)
        );

        charts.extend(pipeline::run_plan(plan, &dataset, &config.out_dir)?);
    }

    println!("{}", crate::report::format_run_summary(&charts));

    if let Some(path) = &config.manifest {
        crate::io::export::write_manifest(path, &charts)?;
    }

    Ok(())
}

pub fn run_config_from_args(args: &Cli) -> RunConfig {
    RunConfig {
        data_dir: args.data_dir.clone(),
        out_dir: args.out_dir.clone(),
        font: args.font.clone(),
        manifest: args.manifest.clone(),
        world: !args.skip_world,
        us_states: !args.skip_us,
    }
}

/// Log to stderr; `RUST_LOG` overrides the default `info` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed (e.g. by an embedding program).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
