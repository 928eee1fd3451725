//! The concurrent pipeline: fetch → aggregate → hand-off channel → rank.
//!
//! Control flow is strictly one-directional and single-pass. The fetch and
//! aggregation stages each run their own bounded rayon pool; the hand-off
//! channel between aggregation and ranking is the only structure shared
//! across a stage boundary (single producer, single consumer, terminated by
//! exactly one end-of-stream sentinel).

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use crate::data::{CityRegistry, ForecastSource};
use crate::domain::CityStat;
use crate::error::AppError;
use crate::report::Rankings;

pub mod aggregate;
pub mod fetch;
pub mod rank;

/// Message type carried by the hand-off channel.
///
/// The consumer loop terminates on `EndOfStream`; a disconnect before the
/// sentinel means the producer aborted and is surfaced as an error, never a
/// hang.
#[derive(Debug)]
pub enum Handoff {
    City(CityStat),
    EndOfStream,
}

/// Where the two artifacts of a run land.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub calculated: PathBuf,
    pub rating: PathBuf,
}

pub const CALCULATED_FILE: &str = "cities_calculated_data.json";
pub const RATING_FILE: &str = "cities_rating.json";

impl ArtifactPaths {
    pub fn in_dir(dir: &Path) -> ArtifactPaths {
        ArtifactPaths {
            calculated: dir.join(CALCULATED_FILE),
            rating: dir.join(RATING_FILE),
        }
    }
}

/// All computed outputs of one pipeline run.
#[derive(Debug)]
pub struct RunOutput {
    /// The full per-city statistics, sorted by city name (the calculated
    /// artifact's content).
    pub calculated: Vec<CityStat>,
    /// The ranked, day-stripped collection plus the best-cities set.
    pub rankings: Rankings,
}

/// Execute the full pipeline against a forecast source.
///
/// The ranking consumer is spawned before aggregation dispatches so its
/// drain loop overlaps the reductions. On an upstream failure the consumer's
/// resulting channel error is discarded in favor of the originating error.
pub fn run<S: ForecastSource + Sync>(
    source: &S,
    registry: &CityRegistry,
    paths: &ArtifactPaths,
    fetch_concurrency: usize,
    workers: Option<usize>,
) -> Result<RunOutput, AppError> {
    let forecasts = fetch::fetch_all(source, registry, fetch_concurrency)?;

    let (tx, rx) = mpsc::channel::<Handoff>();
    let rating_path = paths.rating.clone();
    let consumer = thread::spawn(move || rank::drain_and_rank(rx, &rating_path));

    let aggregated = aggregate::aggregate(forecasts, tx, &paths.calculated, workers);
    let drained = consumer
        .join()
        .map_err(|_| AppError::ChannelProtocol("ranking stage panicked".to_string()));

    // Upstream errors win: if aggregation failed, the consumer saw a bare
    // disconnect and its protocol error is only a symptom.
    let calculated = aggregated?;
    let rankings = drained??;

    Ok(RunOutput {
        calculated,
        rankings,
    })
}
