//! txstat - per-segment transaction statistics and mean-volume comparison.
//!
//! Reads a headerless delimited transaction log (transaction number, client
//! id, volume in RUR, segment), aggregates per-segment statistics out of
//! core, and reports mean-volume confidence intervals plus a two-sample
//! t-test between two configured segments.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use tx_common::{AnalysisConfig, Result};
use tx_core::report::{render, OutputFormat};

/// Per-segment transaction statistics and mean-volume comparison
#[derive(Parser, Debug)]
#[command(name = "txstat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the delimited transaction log (defaults to the configured path)
    input: Option<PathBuf>,

    /// Load analysis settings from a TOML file
    #[arg(long, value_name = "FILE", env = "TXSTAT_CONFIG")]
    config: Option<PathBuf>,

    /// First segment of the comparison
    #[arg(long, value_name = "LABEL")]
    baseline: Option<String>,

    /// Second segment of the comparison
    #[arg(long, value_name = "LABEL")]
    comparison: Option<String>,

    /// Significance level for the mean-difference test
    #[arg(long, value_name = "ALPHA")]
    significance: Option<f64>,

    /// Tail probability for the mean intervals (0.05 = 90% coverage)
    #[arg(long, value_name = "TAIL")]
    tail: Option<f64>,

    /// Field delimiter
    #[arg(long, value_name = "CHAR")]
    delimiter: Option<char>,

    /// Rows per ingest chunk
    #[arg(long, value_name = "ROWS")]
    chunk_rows: Option<usize>,

    /// Assume equal variances (pooled test instead of Welch's)
    #[arg(long)]
    equal_variance: bool,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (errors only)
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Resolve the effective configuration: file (or defaults), then flag
    /// overrides.
    fn resolve_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_toml_file(path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(baseline) = &self.baseline {
            config.baseline_segment = baseline.clone();
        }
        if let Some(comparison) = &self.comparison {
            config.comparison_segment = comparison.clone();
        }
        if let Some(significance) = self.significance {
            config.significance_level = significance;
        }
        if let Some(tail) = self.tail {
            config.tail_probability = tail;
        }
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        if let Some(chunk_rows) = self.chunk_rows {
            config.chunk_rows = chunk_rows;
        }
        if self.equal_variance {
            config.equal_variance = true;
        }
        config.validate()?;
        Ok(config)
    }
}

// Logs go to stderr; stdout is reserved for the report payload.
fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.resolve_config()?;
    let report = tx_core::pipeline::run(&config)?;
    println!("{}", render(&report, cli.format)?);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "analysis failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
