use crate::{
    error::WeatherError,
    model::Query,
    normalize::{CurrentPayload, ForecastPayload},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Upstream source of raw weather payloads.
///
/// Implementations classify their own transport and status failures; the
/// coordinator only joins and normalizes.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_current(&self, query: &Query) -> Result<CurrentPayload, WeatherError>;

    async fn fetch_forecast(&self, query: &Query) -> Result<ForecastPayload, WeatherError>;
}
