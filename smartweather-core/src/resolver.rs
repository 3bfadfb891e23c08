use tracing::debug;

use crate::{
    error::WeatherError,
    geocode::Geocoder,
    model::{Coordinate, Location, Place, WeatherSnapshot},
};

/// Name used when neither the geocoder nor the provider can name a point.
pub const UNKNOWN_PLACE: &str = "Unknown Location";

/// A location ready for lookup, with the geocoder's naming when it had one.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub location: Location,
    pub place: Option<Place>,
}

impl ResolvedLocation {
    /// Geocoded place, else the provider's own station naming.
    pub fn place_or_provider(&self, snapshot: &WeatherSnapshot) -> Place {
        if let Some(place) = &self.place {
            return place.clone();
        }

        Place {
            name: snapshot.provider_name.clone().unwrap_or_else(|| UNKNOWN_PLACE.to_string()),
            country: snapshot.provider_country.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug)]
pub struct LocationResolver<'a> {
    geocoder: &'a dyn Geocoder,
}

impl<'a> LocationResolver<'a> {
    pub fn new(geocoder: &'a dyn Geocoder) -> Self {
        Self { geocoder }
    }

    /// Validates the point and makes one reverse lookup. Lookup failures are not errors.
    pub async fn resolve_by_coordinate(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ResolvedLocation, WeatherError> {
        let coordinate = Coordinate::new(latitude, longitude)?;
        let place = self.name_point(coordinate).await;

        Ok(ResolvedLocation { location: Location::Coordinate(coordinate), place })
    }

    /// One reverse lookup for an already validated point; `None` when the geocoder fails.
    pub async fn name_point(&self, coordinate: Coordinate) -> Option<Place> {
        match self.geocoder.reverse(coordinate).await {
            Ok(place) => {
                debug!(%coordinate, %place, "Reverse geocoded");
                Some(place)
            }
            Err(e) => {
                debug!(%coordinate, error = %e, "Reverse geocoding failed, using provider naming");
                None
            }
        }
    }

    /// Queries are only trimmed; the provider decides whether they match anything.
    pub fn resolve_by_query(text: &str) -> Result<ResolvedLocation, WeatherError> {
        let query = text.trim();
        if query.is_empty() {
            return Err(WeatherError::validation("location query is empty"));
        }

        Ok(ResolvedLocation { location: Location::Query(query.to_string()), place: None })
    }
}
