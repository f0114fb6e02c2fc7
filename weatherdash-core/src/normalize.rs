//! Provider payload schema and its translation into canonical records.

use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::Deserialize;

use crate::{
    error::WeatherError,
    model::{Condition, CurrentConditions},
    units::{Units, celsius_to_fahrenheit},
};

/// Visibility assumed when the provider omits it, in kilometres.
pub const DEFAULT_VIS_KM: f64 = 10.0;

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherEntry {
    pub main: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sys {
    pub country: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: f64,
}

/// Body of the current-conditions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentPayload {
    pub name: String,
    #[serde(default)]
    pub sys: Sys,
    pub main: CurrentMain,
    /// Metres.
    pub visibility: Option<f64>,
    pub wind: Wind,
    #[serde(default)]
    pub weather: Vec<WeatherEntry>,
    /// Shift from UTC in seconds.
    pub timezone: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastMain {
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    pub main: ForecastMain,
    pub wind: Wind,
    #[serde(default)]
    pub weather: Vec<WeatherEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastCity {
    pub name: String,
    pub country: Option<String>,
    pub timezone: Option<i32>,
}

/// Body of the multi-step forecast endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPayload {
    pub city: ForecastCity,
    pub list: Vec<ForecastEntry>,
}

/// One forecast step after unit normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSample {
    pub at: DateTime<Utc>,
    pub temp_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub condition: Condition,
    pub humidity: u8,
    pub wind_kph: f64,
}

pub fn normalize_current(
    payload: CurrentPayload,
    units: Units,
    now: DateTime<Utc>,
) -> Result<CurrentConditions, WeatherError> {
    let condition = first_condition(&payload.weather, "current conditions")?;

    let temp_c = units.temp_to_celsius(payload.main.temp);
    let feelslike_c = units.temp_to_celsius(payload.main.feels_like);
    let offset = utc_offset(payload.timezone);

    Ok(CurrentConditions {
        name: payload.name,
        country: payload.sys.country.unwrap_or_default(),
        localtime: now.with_timezone(&offset),
        temp_c,
        temp_f: celsius_to_fahrenheit(temp_c),
        condition,
        feelslike_c,
        feelslike_f: celsius_to_fahrenheit(feelslike_c),
        humidity: payload.main.humidity,
        wind_kph: units.wind_to_kph(payload.wind.speed),
        pressure_mb: payload.main.pressure,
        uv: 0.0,
        vis_km: payload.visibility.map(|m| m / 1000.0).unwrap_or(DEFAULT_VIS_KM),
    })
}

/// Normalizes every forecast step, preserving input order.
pub fn normalize_forecast(
    payload: &ForecastPayload,
    units: Units,
) -> Result<Vec<ForecastSample>, WeatherError> {
    payload
        .list
        .iter()
        .map(|entry| {
            let at = DateTime::from_timestamp(entry.dt, 0).ok_or_else(|| {
                WeatherError::MalformedResponse(format!("forecast timestamp {} out of range", entry.dt))
            })?;
            let condition = first_condition(&entry.weather, "forecast entry")?;

            Ok(ForecastSample {
                at,
                temp_c: units.temp_to_celsius(entry.main.temp),
                temp_min_c: units.temp_to_celsius(entry.main.temp_min),
                temp_max_c: units.temp_to_celsius(entry.main.temp_max),
                condition,
                humidity: entry.main.humidity,
                wind_kph: units.wind_to_kph(entry.wind.speed),
            })
        })
        .collect()
}

/// Offset of the location, falling back to the host's when the provider sends none.
pub fn utc_offset(shift_secs: Option<i32>) -> FixedOffset {
    shift_secs
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| *Local::now().offset())
}

fn first_condition(weather: &[WeatherEntry], what: &str) -> Result<Condition, WeatherError> {
    weather
        .first()
        .map(|w| Condition { text: w.main.clone(), icon: w.icon.clone() })
        .ok_or_else(|| WeatherError::MalformedResponse(format!("{what} has an empty weather array")))
}
