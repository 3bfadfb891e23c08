//! Core library for the `smartweather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstractions over the weather provider and the reverse geocoder
//! - HVAC and irrigation recommendation rules
//! - Forecast tables, profiling and the per-interaction dashboard cycle
//!
//! It is used by `smartweather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod geocode;
pub mod model;
pub mod profile;
pub mod provider;
pub mod recommend;
pub mod report;
pub mod resolver;
pub mod session;

pub use config::{Config, GeocoderConfig, ProviderConfig};
pub use dashboard::Dashboard;
pub use error::WeatherError;
pub use forecast::{ForecastRow, ForecastTable, aggregate};
pub use geocode::{Geocoder, NominatimGeocoder};
pub use model::{Coordinate, CurrentWeather, ForecastEntry, Location, Place, WeatherSnapshot};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
pub use recommend::{
    HvacAction, IrrigationAction, Recommendation, irrigation_decision, optimize_hvac, recommend,
};
pub use report::{Analysis, CurrentReport, Metric};
pub use resolver::{LocationResolver, ResolvedLocation};
pub use session::Session;
