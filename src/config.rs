//! # Snap Map Configuration Module
//!
//! This module defines the configuration for the snapmap command:
//! upstream service endpoints, the city-scale query tuning values and
//! the pagination session idle timeout.

use std::env;
use std::time::Duration;

use tracing::warn;

// Constants for upstream endpoints
pub const GEOCODING_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const TILE_API_BASE: &str = "https://ms.sc-jpl.com/web/";
pub const LATEST_TILE_SET_ENDPOINT: &str = "getLatestTileSet";
pub const PLAYLIST_ENDPOINT: &str = "getPlaylist";

/// Radius of a city-scale query, in meters. Domain tuning value, not a
/// protocol constant.
pub const CITY_RADIUS_METERS: f64 = 11811.130585458892;
/// Zoom level of a city-scale query.
pub const CITY_ZOOM_LEVEL: f64 = 8.301441394685607;
/// Idle window after which a pagination session expires.
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 120;

/// Configuration structure for the snapmap command
#[derive(Debug, Clone)]
pub struct SnapMapConfig {
    /// Geocoding search endpoint
    pub geocoding_url: String,
    /// Base URL of the tile service; endpoint paths are appended to it
    pub tile_api_base: String,
    /// Feed query radius in meters
    pub radius_meters: f64,
    /// Feed query zoom level
    pub zoom_level: f64,
    /// Idle window before a session expires and cleans up its message
    pub idle_timeout: Duration,
}

impl Default for SnapMapConfig {
    fn default() -> Self {
        Self {
            geocoding_url: GEOCODING_URL.to_string(),
            tile_api_base: TILE_API_BASE.to_string(),
            radius_meters: CITY_RADIUS_METERS,
            zoom_level: CITY_ZOOM_LEVEL,
            idle_timeout: Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
        }
    }
}

impl SnapMapConfig {
    /// Build a configuration from the environment, falling back to the
    /// defaults for anything unset. Unparsable values are ignored with a
    /// warning rather than aborting startup.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(value) = env::var("SNAPMAP_GEOCODING_URL") {
            config.geocoding_url = value;
        }
        if let Ok(value) = env::var("SNAPMAP_TILE_API_BASE") {
            config.tile_api_base = value;
        }
        if let Ok(value) = env::var("SNAPMAP_RADIUS_METERS") {
            match value.parse() {
                Ok(radius) => config.radius_meters = radius,
                Err(_) => warn!(value = %value, "Ignoring unparsable SNAPMAP_RADIUS_METERS"),
            }
        }
        if let Ok(value) = env::var("SNAPMAP_ZOOM_LEVEL") {
            match value.parse() {
                Ok(zoom) => config.zoom_level = zoom,
                Err(_) => warn!(value = %value, "Ignoring unparsable SNAPMAP_ZOOM_LEVEL"),
            }
        }
        if let Ok(value) = env::var("SNAPMAP_IDLE_TIMEOUT_SECS") {
            match value.parse() {
                Ok(secs) => config.idle_timeout = Duration::from_secs(secs),
                Err(_) => warn!(value = %value, "Ignoring unparsable SNAPMAP_IDLE_TIMEOUT_SECS"),
            }
        }

        config
    }

    /// Full URL of the latest-tile-set endpoint
    pub fn latest_tile_set_url(&self) -> String {
        format!("{}{}", self.tile_api_base, LATEST_TILE_SET_ENDPOINT)
    }

    /// Full URL of the playlist endpoint
    pub fn playlist_url(&self) -> String {
        format!("{}{}", self.tile_api_base, PLAYLIST_ENDPOINT)
    }
}
