use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::units::Units;

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("Please enter a city name")]
    EmptyCity,

    #[error("Invalid coordinates ({lat}, {lon}): latitude must be within ±90 and longitude within ±180")]
    InvalidCoordinates { lat: f64, lon: f64 },
}

/// Place a query is about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locator {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

impl Locator {
    pub fn city(name: &str) -> Result<Self, QueryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(QueryError::EmptyCity);
        }
        Ok(Locator::City(name.to_string()))
    }

    pub fn coordinates(lat: f64, lon: f64) -> Result<Self, QueryError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(QueryError::InvalidCoordinates { lat, lon });
        }
        Ok(Locator::Coordinates { lat, lon })
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locator::City(name) => f.write_str(name),
            Locator::Coordinates { lat, lon } => write!(f, "{lat:.4},{lon:.4}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub locator: Locator,
    pub units: Units,
}

impl Query {
    pub fn new(locator: Locator, units: Units) -> Self {
        Self { locator, units }
    }
}

/// Short condition text plus the provider's icon code (e.g. `10d`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    pub icon: String,
}

impl Condition {
    pub fn icon_url(&self) -> String {
        format!("{ICON_BASE_URL}/{}@2x.png", self.icon)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub name: String,
    pub country: String,
    pub localtime: DateTime<FixedOffset>,
    pub temp_c: f64,
    pub temp_f: f64,
    pub condition: Condition,
    pub feelslike_c: f64,
    pub feelslike_f: f64,
    pub humidity: u8,
    pub wind_kph: f64,
    pub pressure_mb: f64,
    /// 0 when the provider does not report it.
    pub uv: f64,
    pub vis_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub maxtemp_c: f64,
    pub maxtemp_f: f64,
    pub mintemp_c: f64,
    pub mintemp_f: f64,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub day: DaySummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySample {
    /// Local `HH:MM` on a 24-hour clock.
    pub time: String,
    pub temp_c: f64,
    pub temp_f: f64,
    pub condition: Condition,
    pub humidity: u8,
    pub wind_kph: f64,
}

/// Current conditions, daily forecast and hourly window for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastDay>,
    pub hourly: Vec<HourlySample>,
}
