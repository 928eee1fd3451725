//! Statistics reducer: one raw forecast in, one `CityStat` out.
//!
//! The reducer is a pure function (aside from start/end log events) and is
//! what the aggregation stage fans out across its CPU worker pool. All of
//! the daytime / rainless / rounding policy lives here.

use tracing::info;

use crate::domain::{CityStat, DayStat, RawForecast, RawHour};

/// First daytime hour (inclusive).
pub const DAYTIME_START: u8 = 9;
/// Last daytime hour (inclusive).
pub const DAYTIME_END: u8 = 19;
/// Number of daytime hours a day must record to be valid.
pub const DAYTIME_HOURS: u32 = 11;

/// Why reduction failed for a city.
#[derive(Debug, PartialEq, Eq)]
pub enum ReduceError {
    /// No day in the forecast recorded complete daytime coverage, so the
    /// city averages are undefined.
    NoValidDays,
}

impl std::fmt::Display for ReduceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReduceError::NoValidDays => write!(
                f,
                "no day with complete daytime coverage ({DAYTIME_START}-{DAYTIME_END}h)"
            ),
        }
    }
}

impl std::error::Error for ReduceError {}

/// Round to one decimal place, ties to even.
///
/// This is the pinned rounding policy for every derived average; the
/// reference behavior rounds the same way.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Compute per-day and aggregate daytime statistics for one city.
///
/// Days with exactly [`DAYTIME_HOURS`] recorded daytime hours get a full
/// `DayStat` and fold into the city averages; any other day contributes
/// only a bare date record. Zero valid days is fatal.
pub fn reduce(forecast: &RawForecast) -> Result<CityStat, ReduceError> {
    let city = forecast.city_name().to_string();
    info!(city = %city, "start calculating city statistics");

    let mut days = Vec::with_capacity(forecast.forecasts.len());
    let mut valid_days: u32 = 0;
    let mut sum_of_day_averages = 0.0;
    let mut sum_of_rainless_counts: u32 = 0;

    for day in &forecast.forecasts {
        let scan = scan_daytime(&day.hours);
        if scan.hours_seen == DAYTIME_HOURS {
            let day_average = round1(scan.temp_sum / DAYTIME_HOURS as f64);
            valid_days += 1;
            sum_of_day_averages += day_average;
            sum_of_rainless_counts += scan.rainless;
            days.push(DayStat {
                date: day.date,
                rainless_hours: Some(scan.rainless),
                average_temperature: Some(day_average),
            });
        } else {
            days.push(DayStat::bare(day.date));
        }
    }

    if valid_days == 0 {
        return Err(ReduceError::NoValidDays);
    }

    let stat = CityStat {
        city,
        days,
        average_temperature: round1(sum_of_day_averages / valid_days as f64),
        average_rainless_hours: round1(sum_of_rainless_counts as f64 / valid_days as f64),
        rating: None,
    };
    info!(city = %stat.city, "end calculating city statistics");
    Ok(stat)
}

struct DaytimeScan {
    hours_seen: u32,
    temp_sum: f64,
    rainless: u32,
}

fn scan_daytime(hours: &[RawHour]) -> DaytimeScan {
    let mut scan = DaytimeScan {
        hours_seen: 0,
        temp_sum: 0.0,
        rainless: 0,
    };
    for hour in hours {
        if (DAYTIME_START..=DAYTIME_END).contains(&hour.hour) {
            scan.hours_seen += 1;
            scan.temp_sum += hour.temp;
            if hour.condition.is_rainless() {
                scan.rainless += 1;
            }
        }
    }
    scan
}
