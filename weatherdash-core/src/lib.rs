//! Core library for `weatherdash`.
//!
//! This crate defines:
//! - The upstream provider seam and its OpenWeather client
//! - Normalization of provider payloads into canonical records
//! - Daily and hourly aggregation of forecast steps
//! - [`WeatherService`], which joins both upstream calls into one [`WeatherReport`]
//!
//! It is used by `weatherdash-cli`, but can also be reused by other binaries or services.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod service;
pub mod units;

pub use config::{Config, ProviderConfig};
pub use error::WeatherError;
pub use model::{
    Condition, CurrentConditions, DaySummary, ForecastDay, HourlySample, Locator, Query,
    QueryError, WeatherReport,
};
pub use provider::{OpenWeatherProvider, WeatherProvider};
pub use service::WeatherService;
pub use units::Units;
