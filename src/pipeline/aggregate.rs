//! Aggregation stage: fan the statistics reducer out over a CPU pool and
//! stream completed results onto the hand-off channel.
//!
//! The pool leaves one core for orchestration. Reductions are dispatched
//! with a short-circuiting iterator so the first failure cancels remaining
//! dispatch; reductions already in flight may finish, but their results are
//! discarded. On success the full collection is persisted (sorted by city
//! name, so artifacts are deterministic regardless of completion order) and
//! exactly one end-of-stream sentinel is pushed. On failure the producer
//! side of the channel is dropped without a sentinel, which the consumer
//! observes as a disconnect instead of a hang.

use std::path::Path;
use std::sync::mpsc;
use std::thread;

use rayon::prelude::*;
use tracing::{error, info};

use crate::domain::{CityStat, RawForecast};
use crate::error::AppError;
use crate::io::write_stats_json;
use crate::pipeline::Handoff;
use crate::stats;

/// Reducer pool size: available cores minus one for orchestration.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}

/// Reduce all fetched forecasts, stream each `CityStat` to the hand-off
/// channel as it completes, persist the calculated artifact, and terminate
/// the channel with the sentinel.
pub fn aggregate(
    forecasts: Vec<RawForecast>,
    handoff: mpsc::Sender<Handoff>,
    calculated_path: &Path,
    workers: Option<usize>,
) -> Result<Vec<CityStat>, AppError> {
    info!(cities = forecasts.len(), "start aggregating statistics");

    let workers = workers.unwrap_or_else(default_workers).max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| AppError::Config(format!("failed to build reducer pool: {e}")))?;

    let total = forecasts.len();
    let (results_tx, results_rx) = mpsc::channel::<Result<CityStat, AppError>>();

    // Fan the reductions out on a helper thread so this thread is free to
    // forward completed results downstream while the pool is still busy.
    let producer = thread::spawn(move || {
        pool.install(|| {
            let _ = forecasts
                .into_par_iter()
                .try_for_each_with(results_tx, |tx, forecast| {
                    let result = reduce_city(&forecast);
                    let failed = result.is_err();
                    // A hung-up receiver means the aggregation thread already
                    // gave up; stop dispatching either way.
                    if tx.send(result).is_err() || failed {
                        Err(())
                    } else {
                        Ok(())
                    }
                });
        });
    });

    let mut collected: Vec<CityStat> = Vec::with_capacity(total);
    let mut first_err: Option<AppError> = None;

    for result in results_rx.iter() {
        match result {
            Ok(stat) if first_err.is_none() => {
                if handoff.send(Handoff::City(stat.clone())).is_err() {
                    first_err = Some(AppError::ChannelProtocol(
                        "ranking stage hung up before end-of-stream".to_string(),
                    ));
                    continue;
                }
                collected.push(stat);
            }
            Err(err) if first_err.is_none() => {
                error!(city = err.city().unwrap_or("unknown"), error = %err, "city reduction failed");
                first_err = Some(err);
            }
            // Late completions after a failure are discarded.
            _ => {}
        }
    }

    producer
        .join()
        .map_err(|_| AppError::ChannelProtocol("reducer pool panicked".to_string()))?;

    if let Some(err) = first_err {
        // Dropping `handoff` here, without a sentinel, tells the consumer
        // the stream aborted.
        return Err(err);
    }

    collected.sort_by(|a, b| a.city.cmp(&b.city));
    write_stats_json(calculated_path, &collected)?;

    handoff.send(Handoff::EndOfStream).map_err(|_| {
        AppError::ChannelProtocol("ranking stage hung up before end-of-stream".to_string())
    })?;

    info!(cities = collected.len(), "end aggregating statistics");
    Ok(collected)
}

fn reduce_city(forecast: &RawForecast) -> Result<CityStat, AppError> {
    stats::reduce(forecast).map_err(|cause| AppError::ReduceFailed {
        city: forecast.city_name().to_string(),
        cause,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Condition, GeoObject, Locality, RawDay, RawHour};
    use chrono::NaiveDate;
    use std::fs;
    use std::path::PathBuf;

    fn forecast(name: &str, temp: f64) -> RawForecast {
        let hours = (0..24)
            .map(|h| RawHour {
                hour: h,
                temp,
                condition: Condition::Clear,
            })
            .collect();
        RawForecast {
            geo_object: GeoObject {
                locality: Locality {
                    name: name.to_string(),
                },
            },
            forecasts: vec![RawDay {
                date: NaiveDate::from_ymd_opt(2022, 5, 26).unwrap(),
                hours,
            }],
        }
    }

    fn scratch_file(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("wrank-agg-{tag}-{}.json", std::process::id()))
    }

    #[test]
    fn streams_every_stat_then_exactly_one_sentinel() {
        let path = scratch_file("stream");
        let (tx, rx) = mpsc::channel();

        let collected = aggregate(
            vec![forecast("A", 10.0), forecast("B", 20.0)],
            tx,
            &path,
            Some(2),
        )
        .unwrap();
        assert_eq!(collected.len(), 2);

        let mut cities = Vec::new();
        let mut sentinels = 0;
        for msg in rx.iter() {
            match msg {
                Handoff::City(stat) => cities.push(stat.city),
                Handoff::EndOfStream => sentinels += 1,
            }
        }
        cities.sort();
        assert_eq!(cities, ["A", "B"]);
        assert_eq!(sentinels, 1);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn artifact_is_sorted_by_city_name() {
        let path = scratch_file("sorted");
        let (tx, _rx_keepalive) = mpsc::channel();

        let collected = aggregate(
            vec![forecast("ZURICH", 10.0), forecast("ATHENS", 20.0)],
            tx,
            &path,
            Some(2),
        )
        .unwrap();
        assert_eq!(collected[0].city, "ATHENS");
        assert_eq!(collected[1].city, "ZURICH");

        let text = fs::read_to_string(&path).unwrap();
        let athens = text.find("ATHENS").unwrap();
        let zurich = text.find("ZURICH").unwrap();
        assert!(athens < zurich);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn reducer_failure_drops_the_channel_without_a_sentinel() {
        let path = scratch_file("fail");
        let (tx, rx) = mpsc::channel();

        // One city has no valid day at all.
        let mut sparse = forecast("SPARSE", 10.0);
        sparse.forecasts[0].hours.retain(|h| h.hour != 12);

        let err = aggregate(
            vec![forecast("FINE", 10.0), sparse],
            tx,
            &path,
            Some(1),
        )
        .unwrap_err();
        match err {
            AppError::ReduceFailed { city, .. } => assert_eq!(city, "SPARSE"),
            other => panic!("expected ReduceFailed, got {other:?}"),
        }

        // Drain: items may precede the abort, but no sentinel ever arrives.
        for msg in rx.iter() {
            assert!(matches!(msg, Handoff::City(_)));
        }
        assert!(!path.exists(), "no artifact may be written on failure");
    }
}
