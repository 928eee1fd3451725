//! Forecast source adapter.
//!
//! The pipeline only consumes the `ForecastSource` contract; the production
//! implementation is a blocking HTTP client against the remote weather API.
//! No retry policy lives here or anywhere in the core — one failed fetch is
//! fatal for the whole run.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::domain::RawForecast;

const DEFAULT_BASE_URL: &str = "https://code.s3.yandex.net/async-module";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Why a single forecast fetch failed.
#[derive(Debug)]
pub enum SourceError {
    /// Network failure or non-success HTTP status.
    Unavailable(String),
    /// The response arrived but did not deserialize as a forecast document.
    InvalidPayload(String),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Unavailable(msg) => write!(f, "source unavailable: {msg}"),
            SourceError::InvalidPayload(msg) => write!(f, "invalid payload: {msg}"),
        }
    }
}

impl std::error::Error for SourceError {}

/// Contract consumed by the fetch stage.
///
/// Implementations must be safely callable from multiple worker threads at
/// once; the fetch stage takes `S: ForecastSource + Sync`.
pub trait ForecastSource {
    /// Fetch the raw multi-day forecast for one city identifier.
    fn fetch(&self, city_id: &str) -> Result<RawForecast, SourceError>;
}

/// Blocking HTTP client for the remote weather API.
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherClient {
    /// Build a client from the environment (`.env` honored).
    ///
    /// - `WEATHER_API_BASE` overrides the default endpoint
    /// - `WEATHER_API_KEY` is sent as a request header when present
    pub fn from_env() -> Result<WeatherClient, SourceError> {
        dotenvy::dotenv().ok();
        let base_url =
            std::env::var("WEATHER_API_BASE").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let api_key = std::env::var("WEATHER_API_KEY").ok();
        Self::new(base_url, api_key)
    }

    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<WeatherClient, SourceError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SourceError::Unavailable(format!("failed to build HTTP client: {e}")))?;
        Ok(WeatherClient {
            client,
            base_url: base_url.into(),
            api_key,
        })
    }
}

impl ForecastSource for WeatherClient {
    fn fetch(&self, city_id: &str) -> Result<RawForecast, SourceError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), city_id);

        let mut req = self.client.get(&url);
        if let Some(key) = &self.api_key {
            req = req.header("X-Yandex-Weather-Key", key);
        }

        let resp = req
            .send()
            .map_err(|e| SourceError::Unavailable(format!("request to '{url}' failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Unavailable(format!(
                "'{url}' returned HTTP {status}"
            )));
        }

        resp.json::<RawForecast>()
            .map_err(|e| SourceError::InvalidPayload(format!("from '{url}': {e}")))
    }
}
