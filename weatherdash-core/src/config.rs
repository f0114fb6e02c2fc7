use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{
    provider::openweather::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT},
    units::Units,
};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "WEATHERDASH_API_KEY";

/// Upstream provider settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_units = "metric"
///
/// [provider]
/// api_key = "..."
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub default_units: Option<Units>,

    #[serde(default)]
    pub provider: ProviderConfig,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid configuration TOML")
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "saved configuration");
        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherdash", "weatherdash")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.provider.api_key = Some(api_key);
    }

    pub fn set_default_units(&mut self, units: Units) {
        self.default_units = Some(units);
    }

    /// API key from the environment, falling back to the stored one.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.stored_api_key().map(str::to_owned))
    }

    pub fn stored_api_key(&self) -> Option<&str> {
        self.provider.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    pub fn units(&self) -> Units {
        self.default_units.unwrap_or_default()
    }

    pub fn base_url(&self) -> &str {
        self.provider.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        self.provider.timeout_secs.map(Duration::from_secs).unwrap_or(DEFAULT_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_empty() {
        let cfg = Config::default();

        assert_eq!(cfg.units(), Units::Metric);
        assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout(), DEFAULT_TIMEOUT);
        assert!(cfg.stored_api_key().is_none());
    }

    #[test]
    fn parses_full_toml() {
        let cfg = Config::from_toml(
            r#"
            default_units = "imperial"

            [provider]
            api_key = "OPEN_KEY"
            base_url = "http://localhost:9000"
            timeout_secs = 3
            "#,
        )
        .expect("valid config");

        assert_eq!(cfg.units(), Units::Imperial);
        assert_eq!(cfg.stored_api_key(), Some("OPEN_KEY"));
        assert_eq!(cfg.base_url(), "http://localhost:9000");
        assert_eq!(cfg.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn provider_section_is_optional() {
        let cfg = Config::from_toml("default_units = \"metric\"").expect("valid config");
        assert!(cfg.provider.api_key.is_none());
    }

    #[test]
    fn rejects_unknown_units() {
        let err = Config::from_toml("default_units = \"kelvin\"").unwrap_err();
        assert!(err.to_string().contains("Invalid configuration TOML"));
    }

    #[test]
    fn blank_stored_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());
        assert!(cfg.stored_api_key().is_none());

        cfg.set_api_key("KEY".into());
        assert_eq!(cfg.stored_api_key(), Some("KEY"));
    }

    #[test]
    fn toml_roundtrip_keeps_settings() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.set_default_units(Units::Imperial);

        let text = toml::to_string_pretty(&cfg).expect("serializable");
        let back = Config::from_toml(&text).expect("parsable");

        assert_eq!(back.stored_api_key(), Some("KEY"));
        assert_eq!(back.units(), Units::Imperial);
    }
}
