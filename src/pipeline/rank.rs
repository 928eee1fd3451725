//! Ranking stage: drain the hand-off channel, rank, persist, summarize.

use std::path::Path;
use std::sync::mpsc;

use tracing::info;

use crate::error::AppError;
use crate::io::write_stats_json;
use crate::pipeline::Handoff;
use crate::report::{rank_cities, Rankings};

/// Drain the channel until the end-of-stream sentinel, then sort, assign
/// ratings, and persist the ranking artifact.
///
/// A disconnect before the sentinel means the producer aborted; it surfaces
/// as a `ChannelProtocol` error (which the pipeline discards in favor of
/// the producer's own error). Any message after the sentinel is a
/// producer bug.
pub fn drain_and_rank(rx: mpsc::Receiver<Handoff>, rating_path: &Path) -> Result<Rankings, AppError> {
    info!("start analyzing statistics");

    let mut stats = Vec::new();
    loop {
        match rx.recv() {
            Ok(Handoff::City(stat)) => stats.push(stat),
            Ok(Handoff::EndOfStream) => break,
            Err(mpsc::RecvError) => {
                return Err(AppError::ChannelProtocol(
                    "hand-off channel closed before end-of-stream".to_string(),
                ));
            }
        }
    }
    if rx.try_recv().is_ok() {
        return Err(AppError::ChannelProtocol(
            "message received after end-of-stream".to_string(),
        ));
    }

    let rankings = rank_cities(stats);
    write_stats_json(rating_path, &rankings.ranked)?;

    info!(best = ?rankings.best, "end analyzing statistics");
    Ok(rankings)
}
