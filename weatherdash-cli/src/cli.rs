use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select};
use weatherdash_core::{Config, Locator, OpenWeatherProvider, Query, Units, WeatherService};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Current weather and forecast in the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the provider API key and default units.
    Configure,

    /// Show current conditions, the next 24 hours and a 5-day forecast.
    Show {
        /// City name, e.g. "London" or "New York".
        #[arg(conflicts_with_all = ["lat", "lon"], required_unless_present_all = ["lat", "lon"])]
        city: Option<String>,

        /// Latitude, used together with --lon instead of a city name.
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude, used together with --lat.
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Unit system; defaults to the configured one.
        #[arg(long, value_parser = parse_units)]
        units: Option<Units>,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn parse_units(s: &str) -> Result<Units, String> {
    Units::try_from(s).map_err(|e| e.to_string())
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, lat, lon, units, json } => {
                let locator = match (city, lat, lon) {
                    (Some(city), _, _) => Locator::city(&city)?,
                    (None, Some(lat), Some(lon)) => Locator::coordinates(lat, lon)?,
                    _ => return Err(anyhow!("Provide a city name or both --lat and --lon")),
                };
                show(locator, units, json).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let units = Select::new("Default units:", Units::all().to_vec())
        .with_starting_cursor(config.units() as usize)
        .prompt()
        .context("Failed to read default units")?;

    config.set_api_key(api_key.trim().to_string());
    config.set_default_units(units);
    config.save()?;

    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(locator: Locator, units: Option<Units>, json: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    let units = units.unwrap_or_else(|| config.units());

    let provider = OpenWeatherProvider::from_config(&config)?;
    let service = WeatherService::new(Arc::new(provider));

    let report = service
        .query(&Query::new(locator, units))
        .await
        .map_err(|e| anyhow!("{} ({e})", e.user_message()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", output::render_report(&report, units)?);
    }
    Ok(())
}
