use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WeatherError;
use crate::recommend::Recommendation;

/// A validated point on the globe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, WeatherError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(WeatherError::validation(format!(
                "latitude {latitude} is outside [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherError::validation(format!(
                "longitude {longitude} is outside [-180, 180]"
            )));
        }

        Ok(Self { latitude, longitude })
    }

    /// Parse user-entered text, e.g. from a prompt or a command-line flag.
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, WeatherError> {
        let lat = parse_number("latitude", latitude)?;
        let lon = parse_number("longitude", longitude)?;
        Self::new(lat, lon)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

fn parse_number(field: &str, raw: &str) -> Result<f64, WeatherError> {
    let value: f64 = raw.trim().parse().map_err(|_| {
        WeatherError::validation(format!("{field} '{raw}' is not a number"))
    })?;

    if !value.is_finite() {
        return Err(WeatherError::validation(format!("{field} '{raw}' is not a finite number")));
    }

    Ok(value)
}

/// What a lookup is keyed on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Location {
    Coordinate(Coordinate),
    /// Free text such as "Salem,IN", passed to the provider unchanged.
    Query(String),
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Coordinate(c) => write!(f, "{c}"),
            Location::Query(q) => f.write_str(q),
        }
    }
}

/// Human-readable naming of a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub country: String,
}

impl std::fmt::Display for Place {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.name, self.country)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_ms: f64,
    pub rainfall_mm_1h: f64,
    /// Short label, e.g. "Clouds".
    pub condition: String,
    /// Longer text, e.g. "scattered clouds".
    pub description: String,
    pub observed_at: DateTime<Utc>,
    /// Station name as reported by the provider, if any.
    pub provider_name: Option<String>,
    pub provider_country: Option<String>,
}

impl WeatherSnapshot {
    pub fn recommendation(&self) -> Recommendation {
        Recommendation::for_conditions(self.temperature_c, self.humidity_pct, self.rainfall_mm_1h)
    }
}

/// A snapshot together with the JSON document it was decoded from.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather {
    pub snapshot: WeatherSnapshot,
    pub raw: serde_json::Value,
}

/// One predicted 3-hour slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    /// Calendar date in the forecast city's local offset.
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_ms: f64,
    pub rainfall_mm_3h: f64,
    pub description: String,
}
