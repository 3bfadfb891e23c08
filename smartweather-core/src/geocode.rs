//! Reverse geocoding: coordinate → human-readable place.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, time::Duration};
use tracing::debug;

use crate::{
    config::GeocoderConfig,
    error::WeatherError,
    model::{Coordinate, Place},
};

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn reverse(&self, coordinate: Coordinate) -> Result<Place, WeatherError>;
}

/// OpenStreetMap Nominatim `/reverse` client.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    base_url: String,
    language: String,
    http: Client,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig, timeout: Duration) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(timeout)
            .build()
            .map_err(|e| WeatherError::connection("Failed to build geocoder HTTP client", e))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            http,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct NmAddress {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NmReverse {
    display_name: Option<String>,
    #[serde(default)]
    address: NmAddress,
    /// Set instead of a result when nothing is found at the point.
    error: Option<String>,
}

/// Most specific component of the formatted address, plus the country.
fn place_from_response(parsed: NmReverse) -> Result<Place, WeatherError> {
    if let Some(err) = parsed.error {
        return Err(WeatherError::Connection(format!("Geocoder found no place: {err}")));
    }

    let address = parsed
        .display_name
        .ok_or_else(|| WeatherError::Connection("Geocoder response had no address".to_string()))?;

    let name = address.split(',').next().unwrap_or_default().trim().to_string();
    if name.is_empty() {
        return Err(WeatherError::Connection("Geocoder returned an empty address".to_string()));
    }

    Ok(Place { name, country: parsed.address.country.unwrap_or_default() })
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn reverse(&self, coordinate: Coordinate) -> Result<Place, WeatherError> {
        let url = format!("{}/reverse", self.base_url);

        debug!(%coordinate, "Reverse geocoding");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", coordinate.latitude().to_string()),
                ("lon", coordinate.longitude().to_string()),
                ("format", "jsonv2".to_string()),
                ("accept-language", self.language.clone()),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::connection("Failed to send request to geocoder", e))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::connection("Failed to read geocoder response body", e))?;

        if !status.is_success() {
            return Err(WeatherError::Connection(format!(
                "Geocoder returned status {status}: {}",
                crate::provider::truncate_body(&body)
            )));
        }

        let parsed: NmReverse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::connection("Failed to parse geocoder JSON", e))?;

        place_from_response(parsed)
    }
}
