//! Raw forecast documents and derived statistics.
//!
//! The raw types mirror the source's JSON schema closely enough to
//! deserialize it directly; the derived types are what the pipeline hands
//! between stages and persists as artifacts.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Sky condition for one forecast hour.
///
/// The source uses a fixed kebab-case vocabulary. Conditions we have never
/// seen deserialize to `Other` rather than failing the whole payload; an
/// unknown condition is never counted as rainless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    Clear,
    PartlyCloudy,
    Cloudy,
    Overcast,
    Drizzle,
    LightRain,
    Rain,
    ModerateRain,
    HeavyRain,
    ContinuousHeavyRain,
    Showers,
    WetSnow,
    LightSnow,
    Snow,
    SnowShowers,
    Hail,
    Thunderstorm,
    ThunderstormWithRain,
    ThunderstormWithHail,
    #[serde(other)]
    Other,
}

impl Condition {
    /// Whether this condition counts toward a day's rainless hours.
    pub fn is_rainless(self) -> bool {
        matches!(
            self,
            Condition::Clear
                | Condition::PartlyCloudy
                | Condition::Cloudy
                | Condition::Overcast
                | Condition::Drizzle
        )
    }
}

/// One recorded hour of a forecast day.
#[derive(Debug, Clone, Deserialize)]
pub struct RawHour {
    /// Hour of day, 0-23. The source encodes this as a JSON string.
    #[serde(deserialize_with = "hour_of_day")]
    pub hour: u8,
    /// Forecast temperature in °C.
    pub temp: f64,
    pub condition: Condition,
}

/// One forecast day: a calendar date plus its recorded hours.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDay {
    pub date: NaiveDate,
    pub hours: Vec<RawHour>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Locality {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeoObject {
    pub locality: Locality,
}

/// A city's multi-day forecast document as returned by the source.
#[derive(Debug, Clone, Deserialize)]
pub struct RawForecast {
    pub geo_object: GeoObject,
    pub forecasts: Vec<RawDay>,
}

impl RawForecast {
    /// The city display name carried inside the document.
    pub fn city_name(&self) -> &str {
        &self.geo_object.locality.name
    }
}

/// Accept the source's string-encoded hour as well as a plain integer,
/// rejecting anything outside 0-23.
fn hour_of_day<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Num(u8),
        Text(String),
    }

    let hour = match Repr::deserialize(deserializer)? {
        Repr::Num(n) => n,
        Repr::Text(s) => s
            .trim()
            .parse::<u8>()
            .map_err(|e| serde::de::Error::custom(format!("invalid hour '{s}': {e}")))?,
    };
    if hour > 23 {
        return Err(serde::de::Error::custom(format!(
            "hour {hour} out of range 0-23"
        )));
    }
    Ok(hour)
}

/// Daytime statistics for one forecast day.
///
/// The optionals are present exactly when the day recorded the full 11
/// daytime hours; an incomplete day serializes as a bare date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayStat {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rainless_hours: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_temperature: Option<f64>,
}

impl DayStat {
    /// A date-only record for a day with incomplete daytime coverage.
    pub fn bare(date: NaiveDate) -> DayStat {
        DayStat {
            date,
            rainless_hours: None,
            average_temperature: None,
        }
    }
}

/// Per-city aggregate statistics.
///
/// Created by the statistics reducer with `rating` absent; the ranking
/// stage attaches the rating and drops the day-level detail before
/// persisting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityStat {
    pub city: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub days: Vec<DayStat>,
    /// Average of daily average daytime temperatures over valid days.
    pub average_temperature: f64,
    /// Average of daily rainless-hour counts over valid days.
    pub average_rainless_hours: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u32>,
}

impl CityStat {
    /// Favorability key: (rainless hours, temperature), both already
    /// rounded to one decimal. Ranking sorts descending on this pair.
    pub fn score(&self) -> (f64, f64) {
        (self.average_rainless_hours, self.average_temperature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_parses_kebab_case() {
        let c: Condition = serde_json::from_str("\"partly-cloudy\"").unwrap();
        assert_eq!(c, Condition::PartlyCloudy);
        let c: Condition = serde_json::from_str("\"thunderstorm-with-hail\"").unwrap();
        assert_eq!(c, Condition::ThunderstormWithHail);
    }

    #[test]
    fn unknown_condition_is_other_and_not_rainless() {
        let c: Condition = serde_json::from_str("\"volcanic-ash\"").unwrap();
        assert_eq!(c, Condition::Other);
        assert!(!c.is_rainless());
    }

    #[test]
    fn rainless_set_matches_vocabulary() {
        for c in [
            Condition::Clear,
            Condition::PartlyCloudy,
            Condition::Cloudy,
            Condition::Overcast,
            Condition::Drizzle,
        ] {
            assert!(c.is_rainless(), "{c:?}");
        }
        for c in [Condition::Rain, Condition::Snow, Condition::Hail] {
            assert!(!c.is_rainless(), "{c:?}");
        }
    }

    #[test]
    fn raw_hour_accepts_string_and_integer_hours() {
        let h: RawHour =
            serde_json::from_str(r#"{"hour": "10", "temp": 12.5, "condition": "clear"}"#).unwrap();
        assert_eq!(h.hour, 10);
        let h: RawHour =
            serde_json::from_str(r#"{"hour": 23, "temp": -3.0, "condition": "snow"}"#).unwrap();
        assert_eq!(h.hour, 23);
    }

    #[test]
    fn raw_hour_rejects_out_of_range_hours() {
        let res: Result<RawHour, _> =
            serde_json::from_str(r#"{"hour": "24", "temp": 0.0, "condition": "clear"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn raw_forecast_exposes_city_name() {
        let json = r#"{
            "geo_object": {"locality": {"name": "Moscow"}},
            "forecasts": [
                {"date": "2022-05-26", "hours": [
                    {"hour": "9", "temp": 18.4, "condition": "overcast"}
                ]}
            ]
        }"#;
        let fc: RawForecast = serde_json::from_str(json).unwrap();
        assert_eq!(fc.city_name(), "Moscow");
        assert_eq!(fc.forecasts.len(), 1);
        assert_eq!(fc.forecasts[0].hours[0].hour, 9);
    }

    #[test]
    fn incomplete_day_serializes_as_bare_date() {
        let day = DayStat::bare(NaiveDate::from_ymd_opt(2022, 5, 26).unwrap());
        let json = serde_json::to_string(&day).unwrap();
        assert_eq!(json, r#"{"date":"2022-05-26"}"#);
    }
}
