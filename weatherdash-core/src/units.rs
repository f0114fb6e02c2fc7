//! Unit conversions used wherever a dual-unit field is produced.

use serde::{Deserialize, Serialize};

/// Unit system requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial]
    }

    /// Converts a temperature reported in this unit system to Celsius.
    pub fn temp_to_celsius(&self, value: f64) -> f64 {
        match self {
            Units::Metric => value,
            Units::Imperial => fahrenheit_to_celsius(value),
        }
    }

    /// Converts a wind speed reported in this unit system (m/s or mph) to km/h.
    pub fn wind_to_kph(&self, value: f64) -> f64 {
        match self {
            Units::Metric => mps_to_kph(value),
            Units::Imperial => mph_to_kph(value),
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" | "c" | "celsius" => Ok(Units::Metric),
            "imperial" | "f" | "fahrenheit" => Ok(Units::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

pub fn mps_to_kph(v: f64) -> f64 {
    v * 3.6
}

pub fn mph_to_kph(v: f64) -> f64 {
    v * 1.609344
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn freezing_and_boiling_points() {
        assert!((celsius_to_fahrenheit(0.0) - 32.0).abs() < EPS);
        assert!((celsius_to_fahrenheit(100.0) - 212.0).abs() < EPS);
        assert!((celsius_to_fahrenheit(-40.0) + 40.0).abs() < EPS);
        assert!((celsius_to_fahrenheit(18.0) - 64.4).abs() < EPS);
    }

    #[test]
    fn fahrenheit_survives_round_trip() {
        for f in [-459.67, -40.0, 0.0, 32.0, 64.4, 98.6, 451.0, 1.0e6] {
            let back = celsius_to_fahrenheit(fahrenheit_to_celsius(f));
            assert!((back - f).abs() < 1e-6, "{f} came back as {back}");
        }
    }

    #[test]
    fn wind_speeds_convert_to_kph() {
        assert!((mps_to_kph(10.0) - 36.0).abs() < EPS);
        assert!((mph_to_kph(10.0) - 16.09344).abs() < EPS);
        assert!((Units::Metric.wind_to_kph(5.0) - 18.0).abs() < EPS);
        assert!((Units::Imperial.wind_to_kph(1.0) - 1.609344).abs() < EPS);
    }

    #[test]
    fn units_as_str_roundtrip() {
        for units in Units::all() {
            let parsed = Units::try_from(units.as_str()).expect("roundtrip should succeed");
            assert_eq!(*units, parsed);
        }
    }

    #[test]
    fn unknown_units_error() {
        let err = Units::try_from("kelvin").unwrap_err();
        assert!(err.to_string().contains("Unknown unit system"));
    }
}
