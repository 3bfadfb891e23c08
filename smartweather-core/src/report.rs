use serde::Serialize;

use crate::{
    error::WeatherError,
    forecast::ForecastTable,
    model::{CurrentWeather, Place, WeatherSnapshot},
    profile::{ForecastProfile, flatten_attributes, profile_forecast},
    recommend::Recommendation,
};

/// A labelled value ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
}

impl Metric {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self { label, value: value.into() }
    }
}

pub fn format_temperature(celsius: f64) -> String {
    format!("{celsius:.1}°C")
}

/// Shortest round-trip rendering that always keeps a decimal point (`4.0`, `4.12`).
fn format_measure(value: f64, unit: &str) -> String {
    format!("{value:?} {unit}")
}

pub fn current_metrics(snapshot: &WeatherSnapshot, recommendation: &Recommendation) -> Vec<Metric> {
    vec![
        Metric::new("Temperature", format_temperature(snapshot.temperature_c)),
        Metric::new("Humidity", format!("{}%", snapshot.humidity_pct)),
        Metric::new("Condition", snapshot.condition.clone()),
        Metric::new("Wind Speed", format_measure(snapshot.wind_speed_ms, "m/s")),
        Metric::new("Rainfall (1h)", format_measure(snapshot.rainfall_mm_1h, "mm")),
        Metric::new("HVAC Action", recommendation.hvac.as_str()),
        Metric::new("Irrigation Action", recommendation.irrigation.as_str()),
    ]
}

/// Result of one successful current-conditions fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentReport {
    pub place: Place,
    pub current: CurrentWeather,
    pub recommendation: Recommendation,
}

impl CurrentReport {
    pub fn new(place: Place, current: CurrentWeather) -> Self {
        let recommendation = current.snapshot.recommendation();
        Self { place, current, recommendation }
    }

    pub fn metrics(&self) -> Vec<Metric> {
        current_metrics(&self.current.snapshot, &self.recommendation)
    }

    /// Every attribute of the raw provider response.
    pub fn attributes(&self) -> Vec<(String, String)> {
        flatten_attributes(&self.current.raw)
    }
}

/// Current conditions plus the forecast attempted after them.
///
/// A forecast failure does not discard the current report.
#[derive(Debug)]
pub struct Analysis {
    pub current: CurrentReport,
    pub forecast: Result<ForecastTable, WeatherError>,
}

impl Analysis {
    pub fn profile(&self) -> Option<ForecastProfile> {
        self.forecast.as_ref().ok().map(profile_forecast)
    }
}
