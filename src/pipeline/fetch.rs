//! Fetch stage: fan the forecast source out across all cities.
//!
//! The pool is I/O-bound, so its size is a fixed cap independent of core
//! count — large enough to overlap the network round-trips, small enough
//! not to hammer the remote source.

use rayon::prelude::*;
use tracing::{error, info};

use crate::data::{CityRegistry, ForecastSource};
use crate::domain::RawForecast;
use crate::error::AppError;

/// Concurrent fetch cap, independent of city count.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 10;

/// Fetch every registered city's forecast, failing the whole run on the
/// first error.
///
/// Already-dispatched fetches may still complete after a failure; their
/// results are discarded by the fail-fast collect.
pub fn fetch_all<S: ForecastSource + Sync>(
    source: &S,
    registry: &CityRegistry,
    concurrency: usize,
) -> Result<Vec<RawForecast>, AppError> {
    info!(cities = registry.len(), "start receiving forecasts");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(concurrency.max(1))
        .build()
        .map_err(|e| AppError::Config(format!("failed to build fetch pool: {e}")))?;

    let entries: Vec<(&str, &str)> = registry.iter().collect();
    let forecasts = pool.install(|| {
        entries
            .par_iter()
            .map(|&(city, city_id)| {
                source.fetch(city_id).map_err(|cause| {
                    error!(city, error = %cause, "forecast fetch failed");
                    AppError::FetchFailed {
                        city: city.to_string(),
                        cause,
                    }
                })
            })
            .collect::<Result<Vec<_>, AppError>>()
    })?;

    info!(cities = forecasts.len(), "end receiving forecasts");
    Ok(forecasts)
}
