//! Command-line parsing.
//!
//! Kept separate from orchestration so argument concerns never leak into
//! the pipeline stages.

use std::path::PathBuf;

use clap::Parser;

use crate::pipeline::fetch::DEFAULT_FETCH_CONCURRENCY;

/// Rank cities by daytime weather favorability.
#[derive(Debug, Parser)]
#[command(name = "wrank", version, about = "Rank cities by daytime weather favorability")]
pub struct Cli {
    /// Path to the city registry JSON (display name -> source identifier).
    #[arg(long, default_value = "cities.json")]
    pub cities: PathBuf,

    /// Directory the calculated-data and rating artifacts are written into.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Concurrent forecast fetches (I/O pool size).
    #[arg(long, default_value_t = DEFAULT_FETCH_CONCURRENCY)]
    pub fetch_concurrency: usize,

    /// Reducer pool size (defaults to available cores minus one).
    #[arg(long)]
    pub workers: Option<usize>,
}
