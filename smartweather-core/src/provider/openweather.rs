use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::{
    error::WeatherError,
    model::{CurrentWeather, ForecastEntry, Location, WeatherSnapshot},
    provider::truncate_body,
};

use super::WeatherProvider;

/// `/weather` is queried without a `units` parameter, so its temperatures are Kelvin.
pub const KELVIN_OFFSET: f64 = 273.15;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WeatherError::connection("Failed to build HTTP client", e))?;

        Ok(Self { api_key, base_url: base_url.trim_end_matches('/').to_string(), http })
    }

    fn location_params(location: &Location) -> Vec<(&'static str, String)> {
        match location {
            Location::Coordinate(c) => vec![
                ("lat", c.latitude().to_string()),
                ("lon", c.longitude().to_string()),
            ],
            Location::Query(q) => vec![("q", q.clone())],
        }
    }

    /// One GET; non-success statuses keep the raw body.
    async fn get_body(
        &self,
        endpoint: &str,
        location: &Location,
        metric: bool,
    ) -> Result<String, WeatherError> {
        let url = format!("{}/{endpoint}", self.base_url);

        let mut params = Self::location_params(location);
        params.push(("appid", self.api_key.clone()));
        if metric {
            params.push(("units", "metric".to_string()));
        }

        debug!(%location, endpoint, "Requesting OpenWeather");

        let res = self.http.get(&url).query(&params).send().await.map_err(|e| {
            WeatherError::connection(&format!("Failed to send request to OpenWeather ({endpoint})"), e)
        })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::connection(&format!("Failed to read OpenWeather {endpoint} response body"), e)
        })?;

        if !status.is_success() {
            debug!(status = status.as_u16(), body = %truncate_body(&body), "OpenWeather {endpoint} request failed");
            return Err(WeatherError::ProviderStatus { status: status.as_u16(), body });
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Default, Deserialize)]
struct OwWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
    #[serde(rename = "3h")]
    three_hours: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: Option<String>,
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
    #[serde(default)]
    rain: OwRain,
    #[serde(default)]
    sys: OwSys,
}

#[derive(Debug, Default, Deserialize)]
struct OwCity {
    /// Seconds east of UTC.
    timezone: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
    #[serde(default)]
    rain: OwRain,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    #[serde(default)]
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

pub(crate) fn parse_current(body: &str) -> Result<CurrentWeather, WeatherError> {
    let raw: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| WeatherError::connection("Failed to parse OpenWeather current JSON", e))?;
    let parsed: OwCurrentResponse = serde_json::from_value(raw.clone())
        .map_err(|e| WeatherError::connection("Unexpected OpenWeather current JSON shape", e))?;

    let (condition, description) = parsed
        .weather
        .first()
        .map(|w| (w.main.clone(), w.description.clone()))
        .unwrap_or_else(|| ("Unknown".to_string(), "Unknown".to_string()));

    let snapshot = WeatherSnapshot {
        temperature_c: parsed.main.temp - KELVIN_OFFSET,
        humidity_pct: parsed.main.humidity,
        wind_speed_ms: parsed.wind.speed,
        rainfall_mm_1h: parsed.rain.one_hour.unwrap_or(0.0),
        condition,
        description,
        observed_at: unix_to_utc(parsed.dt).unwrap_or_else(Utc::now),
        provider_name: parsed.name.filter(|n| !n.trim().is_empty()),
        provider_country: parsed.sys.country.filter(|c| !c.trim().is_empty()),
    };

    Ok(CurrentWeather { snapshot, raw })
}

pub(crate) fn parse_forecast(body: &str) -> Result<Vec<ForecastEntry>, WeatherError> {
    let parsed: OwForecastResponse = serde_json::from_str(body)
        .map_err(|e| WeatherError::connection("Failed to parse OpenWeather forecast JSON", e))?;

    let offset = parsed
        .city
        .timezone
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix());

    parsed
        .list
        .into_iter()
        .map(|e| {
            let timestamp = unix_to_utc(e.dt).ok_or_else(|| {
                WeatherError::Connection(format!("Forecast timestamp {} is out of range", e.dt))
            })?;
            let local = timestamp.with_timezone(&offset);

            let description = e
                .weather
                .first()
                .map(|w| w.description.clone())
                .unwrap_or_else(|| "Unknown".to_string());

            Ok(ForecastEntry {
                timestamp,
                date: local.date_naive(),
                time: local.time(),
                // Already Celsius: requested with units=metric.
                temperature_c: e.main.temp,
                humidity_pct: e.main.humidity,
                wind_speed_ms: e.wind.speed,
                rainfall_mm_3h: e.rain.three_hours.unwrap_or(0.0),
                description,
            })
        })
        .collect()
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_current(&self, location: &Location) -> Result<CurrentWeather, WeatherError> {
        let body = self.get_body("weather", location, false).await?;
        parse_current(&body)
    }

    async fn fetch_forecast(&self, location: &Location) -> Result<Vec<ForecastEntry>, WeatherError> {
        let body = self.get_body("forecast", location, true).await?;
        let entries = parse_forecast(&body)?;
        debug!(%location, entries = entries.len(), "Decoded OpenWeather forecast");
        Ok(entries)
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}
