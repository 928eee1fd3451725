//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initializes logging
//! - parses CLI arguments
//! - loads the city registry and builds the weather client
//! - runs the pipeline
//! - prints the summary line

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::data::{CityRegistry, WeatherClient};
use crate::error::AppError;
use crate::pipeline::{self, ArtifactPaths};
use crate::report;

/// Entry point for the `wrank` binary.
pub fn run() -> Result<(), AppError> {
    init_logging();
    let cli = Cli::parse();

    match execute(&cli) {
        Ok(()) => Ok(()),
        Err(err) => {
            error!(error = %err, "pipeline run failed");
            Err(err)
        }
    }
}

fn execute(cli: &Cli) -> Result<(), AppError> {
    let registry = CityRegistry::from_file(&cli.cities)?;
    let client = WeatherClient::from_env()
        .map_err(|e| AppError::Config(format!("cannot build weather client: {e}")))?;
    let paths = ArtifactPaths::in_dir(&cli.out_dir);

    let output = pipeline::run(
        &client,
        &registry,
        &paths,
        cli.fetch_concurrency,
        cli.workers,
    )?;

    let summary = report::format_summary(&output.rankings.best);
    info!("{summary}");
    println!("{summary}");
    Ok(())
}

/// `RUST_LOG`-controlled logging to stderr, defaulting to `info`.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
