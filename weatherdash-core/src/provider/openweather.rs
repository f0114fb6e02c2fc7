use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    error::WeatherError,
    model::{Locator, Query},
    normalize::{CurrentPayload, ForecastPayload},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Builds a provider using the key, base URL and timeout from `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_key(config.api_key(), config)
    }

    fn with_key(api_key: Option<String>, config: &Config) -> Result<Self> {
        let api_key = api_key.ok_or_else(|| {
            anyhow::anyhow!(
                "No API key configured.\n\
                 Hint: run `weatherdash configure` or set WEATHERDASH_API_KEY."
            )
        })?;

        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            api_key,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn query_params(&self, query: &Query) -> Vec<(&'static str, String)> {
        let mut params = match &query.locator {
            Locator::City(name) => vec![("q", name.clone())],
            Locator::Coordinates { lat, lon } => vec![("lat", lat.to_string()), ("lon", lon.to_string())],
        };
        params.push(("appid", self.api_key.clone()));
        params.push(("units", query.units.as_str().to_string()));
        params
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &Query,
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{endpoint}", self.base_url);
        tracing::debug!(%endpoint, locator = %query.locator, units = %query.units, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&self.query_params(query))
            .send()
            .await
            .map_err(|e| {
                // The URL carries the API key.
                let e = e.without_url();
                tracing::warn!(%endpoint, error = %e, "OpenWeather request failed");
                WeatherError::NetworkError(e.to_string())
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::NetworkError(format!("failed to read {endpoint} body: {}", e.without_url()))
        })?;

        if !status.is_success() {
            let err = WeatherError::from_status(status);
            tracing::warn!(%endpoint, %status, body = %truncate_body(&body), "OpenWeather returned {err}");
            return Err(err);
        }

        serde_json::from_str(&body)
            .map_err(|e| WeatherError::MalformedResponse(format!("{endpoint}: {e}")))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_current(&self, query: &Query) -> Result<CurrentPayload, WeatherError> {
        self.get_json("weather", query).await
    }

    async fn fetch_forecast(&self, query: &Query) -> Result<ForecastPayload, WeatherError> {
        self.get_json("forecast", query).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
