//! One fetch cycle per user interaction.

use std::time::Duration;
use tracing::info;

use crate::{
    Config,
    error::WeatherError,
    forecast::aggregate,
    geocode::{Geocoder, NominatimGeocoder},
    model::{Coordinate, Location},
    provider::{WeatherProvider, provider_from_config},
    report::{Analysis, CurrentReport},
    resolver::{LocationResolver, ResolvedLocation},
    session::Session,
};

#[derive(Debug)]
pub struct Dashboard {
    provider: Box<dyn WeatherProvider>,
    geocoder: Box<dyn Geocoder>,
}

impl Dashboard {
    pub fn new(provider: Box<dyn WeatherProvider>, geocoder: Box<dyn Geocoder>) -> Self {
        Self { provider, geocoder }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = provider_from_config(config)?;
        let geocoder =
            NominatimGeocoder::new(&config.geocoder, Duration::from_secs(config.timeout_secs))?;

        Ok(Self::new(provider, Box::new(geocoder)))
    }

    /// Current conditions at a picked point, named by reverse geocoding once they arrived.
    ///
    /// An invalid point leaves the session untouched and makes no request. A failed fetch makes
    /// no geocoder request either.
    pub async fn inspect_point(
        &self,
        session: &mut Session,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentReport, WeatherError> {
        let coordinate = Coordinate::new(latitude, longitude)?;
        let location = Location::Coordinate(coordinate);
        session.select(location.clone());

        info!(%location, "Fetching current conditions for point");
        let current = self.provider.fetch_current(&location).await?;

        let place = LocationResolver::new(self.geocoder.as_ref()).name_point(coordinate).await;
        let place = ResolvedLocation { location, place }.place_or_provider(&current.snapshot);

        Ok(CurrentReport::new(place, current))
    }

    /// Current conditions for a query, then its forecast.
    ///
    /// A current-conditions failure aborts the cycle; a forecast failure is kept in the result
    /// next to the current report.
    pub async fn analyze_query(
        &self,
        session: &mut Session,
        query: &str,
    ) -> Result<Analysis, WeatherError> {
        let resolved = LocationResolver::resolve_by_query(query)?;
        session.select(resolved.location.clone());

        info!(location = %resolved.location, "Fetching current conditions for query");
        let current = self.provider.fetch_current(&resolved.location).await?;
        let place = resolved.place_or_provider(&current.snapshot);
        let current = CurrentReport::new(place, current);

        let forecast = match self.provider.fetch_forecast(&resolved.location).await {
            Ok(entries) => Ok(aggregate(entries)),
            Err(e) => {
                info!(location = %resolved.location, error = %e, "Forecast unavailable");
                Err(e)
            }
        };

        Ok(Analysis { current, forecast })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CurrentWeather, ForecastEntry, Place, WeatherSnapshot};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    #[derive(Debug, Default)]
    struct FakeProvider {
        calls: Arc<Mutex<Vec<String>>>,
        current_status: Option<u16>,
        forecast_status: Option<u16>,
    }

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            temperature_c: 35.0,
            humidity_pct: 30,
            wind_speed_ms: 2.0,
            rainfall_mm_1h: 0.0,
            condition: "Clear".into(),
            description: "clear sky".into(),
            observed_at: Utc::now(),
            provider_name: Some("Salem".into()),
            provider_country: Some("IN".into()),
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn fetch_current(&self, location: &Location) -> Result<CurrentWeather, WeatherError> {
            self.calls.lock().unwrap().push(format!("current {location}"));
            match self.current_status {
                Some(status) => Err(WeatherError::ProviderStatus { status, body: "nope".into() }),
                None => Ok(CurrentWeather { snapshot: snapshot(), raw: serde_json::json!({}) }),
            }
        }

        async fn fetch_forecast(
            &self,
            location: &Location,
        ) -> Result<Vec<ForecastEntry>, WeatherError> {
            self.calls.lock().unwrap().push(format!("forecast {location}"));
            match self.forecast_status {
                Some(status) => Err(WeatherError::ProviderStatus { status, body: "nope".into() }),
                None => Ok(vec![crate::forecast::tests::entry(1_700_000_000, 10.0, 50, 0.0, "mist")]),
            }
        }
    }

    #[derive(Debug, Default)]
    struct DownGeocoder {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Geocoder for DownGeocoder {
        async fn reverse(&self, _coordinate: Coordinate) -> Result<Place, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(WeatherError::Connection("unreachable".into()))
        }
    }

    fn dashboard(provider: FakeProvider) -> (Dashboard, Session) {
        let session = Session::new(Coordinate::new(11.7188, 78.0779).unwrap());
        (Dashboard::new(Box::new(provider), Box::new(DownGeocoder::default())), session)
    }

    #[tokio::test]
    async fn point_falls_back_to_provider_naming() {
        let (dashboard, mut session) = dashboard(FakeProvider::default());

        let report = dashboard.inspect_point(&mut session, 48.8566, 2.3522).await.unwrap();

        assert_eq!(report.place.to_string(), "Salem, IN");
        assert_eq!(session.coordinate(), Some(Coordinate::new(48.8566, 2.3522).unwrap()));
    }

    #[tokio::test]
    async fn invalid_point_keeps_session_and_skips_fetch() {
        let provider = FakeProvider::default();
        let calls = provider.calls.clone();
        let (dashboard, mut session) = dashboard(provider);
        let before = session.clone();

        let err = dashboard.inspect_point(&mut session, 100.0, 0.0).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(session, before);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn point_is_named_only_after_current_conditions_arrive() {
        let geocoder = DownGeocoder::default();
        let lookups = geocoder.calls.clone();
        let session = Session::new(Coordinate::new(11.7188, 78.0779).unwrap());

        let failing = Dashboard::new(
            Box::new(FakeProvider { current_status: Some(404), ..Default::default() }),
            Box::new(geocoder),
        );
        let mut s = session.clone();
        let err = failing.inspect_point(&mut s, 48.8566, 2.3522).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(lookups.load(Ordering::SeqCst), 0);

        let geocoder = DownGeocoder { calls: lookups.clone() };
        let working = Dashboard::new(Box::new(FakeProvider::default()), Box::new(geocoder));
        let mut s = session;
        working.inspect_point(&mut s, 48.8566, 2.3522).await.unwrap();
        assert_eq!(lookups.load(Ordering::SeqCst), 1);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn handled_failures_stay_below_warn() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let (point, mut session) = dashboard(FakeProvider::default());
        point.inspect_point(&mut session, 48.8566, 2.3522).await.unwrap();

        let (query, mut session) =
            dashboard(FakeProvider { forecast_status: Some(500), ..Default::default() });
        query.analyze_query(&mut session, "Salem,IN").await.unwrap();

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.is_empty(), "unexpected log output: {output}");
    }

    #[tokio::test]
    async fn forecast_failure_keeps_current_report() {
        let (dashboard, mut session) =
            dashboard(FakeProvider { forecast_status: Some(500), ..Default::default() });

        let analysis = dashboard.analyze_query(&mut session, "Salem,IN").await.unwrap();

        assert_eq!(analysis.current.place.name, "Salem");
        assert_eq!(analysis.forecast.as_ref().unwrap_err().status(), Some(500));
        assert!(analysis.profile().is_none());
    }

    #[tokio::test]
    async fn current_failure_stops_before_forecast() {
        let provider = FakeProvider { current_status: Some(404), ..Default::default() };
        let calls = provider.calls.clone();
        let (dashboard, mut session) = dashboard(provider);

        let err = dashboard.analyze_query(&mut session, "Nowhereland,XX").await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(session.location(), &Location::Query("Nowhereland,XX".into()));
        assert_eq!(*calls.lock().unwrap(), vec!["current Nowhereland,XX".to_string()]);
    }

    #[tokio::test]
    async fn fetches_run_in_order() {
        let provider = FakeProvider::default();
        let calls = provider.calls.clone();
        let (dashboard, mut session) = dashboard(provider);

        let analysis = dashboard.analyze_query(&mut session, "Salem,IN").await.unwrap();

        assert_eq!(
            *calls.lock().unwrap(),
            vec!["current Salem,IN".to_string(), "forecast Salem,IN".to_string()]
        );
        assert_eq!(analysis.forecast.as_ref().unwrap().len(), 1);
        assert_eq!(analysis.profile().unwrap().rows, 1);
    }
}
