//! # Geocoding Client Module
//!
//! Resolves a free-text place query to coordinates through a
//! Nominatim-style search endpoint. Only the first candidate is
//! requested; an empty candidate list means the place is unknown.

use serde::Deserialize;
use tracing::debug;

use crate::errors::SnapMapError;

/// A latitude/longitude pair produced by geocoding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// One geocoding candidate as returned by the search endpoint.
/// Coordinates are string-encoded decimals.
#[derive(Debug, Deserialize)]
pub struct GeocodeCandidate {
    lat: String,
    lon: String,
}

impl GeocodeCandidate {
    /// Parse the string-encoded coordinates into a point
    pub fn to_point(&self) -> Result<GeoPoint, SnapMapError> {
        let latitude = self
            .lat
            .parse()
            .map_err(|_| SnapMapError::Geocoding(format!("unparsable latitude: {}", self.lat)))?;
        let longitude = self
            .lon
            .parse()
            .map_err(|_| SnapMapError::Geocoding(format!("unparsable longitude: {}", self.lon)))?;
        Ok(GeoPoint {
            latitude,
            longitude,
        })
    }
}

/// Client for the geocoding search endpoint
pub struct GeocodingClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GeocodingClient {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    /// Resolve a free-text query to the first matching point.
    ///
    /// Returns `Ok(None)` when the service has no candidate for the
    /// query. Transport and decode failures map to
    /// [`SnapMapError::Geocoding`]. The call is attempted exactly once.
    pub async fn resolve(&self, query: &str) -> Result<Option<GeoPoint>, SnapMapError> {
        debug!(query = %query, "Resolving location query");

        let candidates: Vec<GeocodeCandidate> = self
            .http
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| SnapMapError::Geocoding(e.to_string()))?
            .error_for_status()
            .map_err(|e| SnapMapError::Geocoding(e.to_string()))?
            .json()
            .await
            .map_err(|e| SnapMapError::Geocoding(e.to_string()))?;

        match candidates.first() {
            Some(candidate) => {
                let point = candidate.to_point()?;
                debug!(
                    latitude = point.latitude,
                    longitude = point.longitude,
                    "Location query resolved"
                );
                Ok(Some(point))
            }
            None => Ok(None),
        }
    }
}
