//! # Snap Map Error Types Module
//!
//! This module defines custom error types for the outbound calls the
//! snapmap command makes. A location without geocoding candidates and an
//! empty snap feed are ordinary outcomes, not errors, and are modelled as
//! `Ok(None)` / `Ok(vec![])` by the clients.

use crate::snap_map::TileSetType;

/// Custom error types for snap map operations
#[derive(Debug, Clone)]
pub enum SnapMapError {
    /// Geocoding transport or decode errors
    Geocoding(String),
    /// Tile-set listing transport or decode errors
    TileSet(String),
    /// The upstream tile-set listing has no descriptor for the requested type
    TileSetUnavailable(TileSetType),
    /// Playlist transport or decode errors
    Playlist(String),
}

impl std::fmt::Display for SnapMapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapMapError::Geocoding(msg) => write!(f, "Geocoding error: {msg}"),
            SnapMapError::TileSet(msg) => write!(f, "Tile set error: {msg}"),
            SnapMapError::TileSetUnavailable(ty) => {
                write!(f, "No tile set available for type {ty}")
            }
            SnapMapError::Playlist(msg) => write!(f, "Playlist error: {msg}"),
        }
    }
}

impl std::error::Error for SnapMapError {}
