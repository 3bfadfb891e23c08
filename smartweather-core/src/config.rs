use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::Coordinate;

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// OpenWeather credentials and endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,

    #[serde(default = "default_provider_base_url")]
    pub base_url: String,
}

/// Reverse-geocoding endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    #[serde(default = "default_geocoder_base_url")]
    pub base_url: String,

    /// Nominatim rejects requests without an identifying agent.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_base_url(),
            user_agent: default_user_agent(),
            language: default_language(),
        }
    }
}

/// Where a fresh session starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub query: String,
}

impl Default for DefaultLocation {
    fn default() -> Self {
        // Salem, Tamil Nadu
        Self { latitude: 11.7188, longitude: 78.0779, query: "Salem,IN".to_string() }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// timeout_secs = 10
///
/// [openweather]
/// api_key = "..."
///
/// [geocoder]
/// user_agent = "weather_app"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub openweather: Option<ProviderConfig>,

    #[serde(default)]
    pub geocoder: GeocoderConfig,

    #[serde(default)]
    pub default_location: DefaultLocation,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openweather: None,
            geocoder: GeocoderConfig::default(),
            default_location: DefaultLocation::default(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_provider_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_geocoder_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_user_agent() -> String {
    "weather_app".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

const fn default_timeout() -> u64 {
    10
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
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

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "smartweather", "smartweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set or replace the OpenWeather API key, keeping a custom base URL if one is stored.
    pub fn upsert_api_key(&mut self, api_key: String) {
        match self.openweather.as_mut() {
            Some(provider) => provider.api_key = api_key,
            None => {
                self.openweather =
                    Some(ProviderConfig { api_key, base_url: default_provider_base_url() })
            }
        }
    }

    /// API key from the environment, falling back to the stored one.
    pub fn api_key(&self) -> Option<String> {
        self.api_key_from(std::env::var(API_KEY_ENV).ok())
    }

    /// Same as [`Config::api_key`] with the environment value passed in.
    pub fn api_key_from(&self, env: Option<String>) -> Option<String> {
        env.filter(|k| !k.trim().is_empty())
            .or_else(|| self.stored_api_key().map(str::to_owned))
    }

    pub fn stored_api_key(&self) -> Option<&str> {
        self.openweather
            .as_ref()
            .map(|p| p.api_key.as_str())
            .filter(|k| !k.trim().is_empty())
    }

    /// Like [`Config::api_key`], but with a hint on how to fix a missing key.
    pub fn require_api_key(&self) -> Result<String> {
        self.require_api_key_from(std::env::var(API_KEY_ENV).ok())
    }

    pub fn require_api_key_from(&self, env: Option<String>) -> Result<String> {
        self.api_key_from(env).ok_or_else(|| {
            anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: run `smartweather configure` or set {API_KEY_ENV}."
            )
        })
    }

    pub fn provider_base_url(&self) -> String {
        self.openweather
            .as_ref()
            .map(|p| p.base_url.clone())
            .unwrap_or_else(default_provider_base_url)
    }

    pub fn default_coordinate(&self) -> Result<Coordinate> {
        Coordinate::new(self.default_location.latitude, self.default_location.longitude)
            .context("Configured default location is invalid")
    }
}
