//! Command-line parsing.
//!
//! Every flag is optional: a bare `covid-charts` downloads both datasets into
//! the working directory and writes all charts next to them.

use std::path::PathBuf;

use clap::Parser;

/// Top-level CLI.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "covid-charts",
    version,
    about = "Smoothed COVID-19 comparison charts by country and U.S. state"
)]
pub struct Cli {
    /// Directory the downloaded CSV datasets are written to.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Directory the PNG charts are written to.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// TrueType font for chart text (defaults to the bundled DejaVu Sans).
    #[arg(long, value_name = "TTF")]
    pub font: Option<PathBuf>,

    /// Write a JSON manifest of the charts produced.
    #[arg(long, value_name = "JSON")]
    pub manifest: Option<PathBuf>,

    /// Skip the worldwide (by country) charts.
    #[arg(long)]
    pub skip_world: bool,

    /// Skip the U.S. state charts.
    #[arg(long)]
    pub skip_us: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_write_to_working_directory() {
        let cli = Cli::parse_from(["covid-charts"]);
        assert_eq!(cli.data_dir, PathBuf::from("."));
        assert_eq!(cli.out_dir, PathBuf::from("."));
        assert!(cli.font.is_none());
        assert!(!cli.skip_world && !cli.skip_us);
    }

    #[test]
    fn flags_are_parsed() {
        let cli = Cli::parse_from([
            "covid-charts",
            "--out-dir",
            "charts",
            "--manifest",
            "charts/run.json",
            "--skip-us",
        ]);
        assert_eq!(cli.out_dir, PathBuf::from("charts"));
        assert_eq!(cli.manifest, Some(PathBuf::from("charts/run.json")));
        assert!(cli.skip_us);
    }
}
