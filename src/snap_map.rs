//! # Snap Map Client Module
//!
//! Client for the Snap Map tile service. A feed fetch is two chained
//! calls: resolve the current dataset epoch for a tile-set type, then
//! request the playlist manifest around a point and keep only the
//! elements that carry playable media.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::SnapMapConfig;
use crate::errors::SnapMapError;
use crate::geocoding::GeoPoint;

/// Tile-set categories exposed by the upstream service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileSetType {
    /// Point-of-interest dataset
    Poi,
    /// Heat/density dataset
    Heat,
}

impl TileSetType {
    /// Position of this type's descriptor in the latest-tile-set
    /// response. The ordering is a property of the upstream service and
    /// is not validated here.
    fn descriptor_index(self) -> usize {
        match self {
            TileSetType::Poi => 0,
            TileSetType::Heat => 1,
        }
    }

    /// Numeric code carried in playlist requests
    fn request_code(self) -> u8 {
        match self {
            TileSetType::Poi => 0,
            TileSetType::Heat => 1,
        }
    }
}

impl std::fmt::Display for TileSetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TileSetType::Poi => write!(f, "POI"),
            TileSetType::Heat => write!(f, "HEAT"),
        }
    }
}

/// Opaque identifier selecting a snapshot of the tile dataset
pub type TileEpoch = u64;

/// A single playable snap extracted from the playlist manifest
#[derive(Debug, Clone, PartialEq)]
pub struct Snap {
    pub title: String,
    pub timestamp_millis: i64,
    /// Full media URL, concatenated from the upstream prefix and suffix
    pub media_url: String,
}

#[derive(Debug, Deserialize)]
struct LatestTileSetResponse {
    #[serde(rename = "tileSetInfos", default)]
    tile_set_infos: Vec<TileSetInfo>,
}

#[derive(Debug, Deserialize)]
struct TileSetInfo {
    id: TileSetId,
}

#[derive(Debug, Deserialize)]
struct TileSetId {
    epoch: TileEpoch,
}

#[derive(Debug, Deserialize, Default)]
struct PlaylistResponse {
    #[serde(default)]
    manifest: Manifest,
}

#[derive(Debug, Deserialize, Default)]
struct Manifest {
    #[serde(default)]
    elements: Vec<ManifestElement>,
}

#[derive(Debug, Deserialize, Default)]
struct ManifestElement {
    /// Millisecond timestamp, string-encoded upstream
    #[serde(default)]
    timestamp: String,
    #[serde(rename = "snapInfo", default)]
    snap_info: SnapInfo,
}

#[derive(Debug, Deserialize, Default)]
struct SnapInfo {
    #[serde(default)]
    title: TitleInfo,
    #[serde(rename = "streamingMediaInfo", default)]
    streaming_media_info: StreamingMediaInfo,
}

#[derive(Debug, Deserialize, Default)]
struct TitleInfo {
    #[serde(default)]
    fallback: String,
}

#[derive(Debug, Deserialize, Default)]
struct StreamingMediaInfo {
    #[serde(rename = "prefixUrl", default)]
    prefix_url: String,
    #[serde(rename = "mediaUrl", default)]
    media_url: String,
}

impl ManifestElement {
    /// Keep only elements exposing a playable media prefix
    fn into_snap(self) -> Option<Snap> {
        let media = self.snap_info.streaming_media_info;
        if media.prefix_url.is_empty() {
            return None;
        }
        Some(Snap {
            title: self.snap_info.title.fallback,
            timestamp_millis: self.timestamp.parse().unwrap_or_default(),
            media_url: format!("{}{}", media.prefix_url, media.media_url),
        })
    }
}

/// Select the epoch for a tile-set type from the descriptor list.
///
/// A missing descriptor is an explicit error; falling back to a sentinel
/// epoch would silently select an invalid or empty dataset.
fn select_epoch(
    response: &LatestTileSetResponse,
    ty: TileSetType,
) -> Result<TileEpoch, SnapMapError> {
    response
        .tile_set_infos
        .get(ty.descriptor_index())
        .map(|info| info.id.epoch)
        .ok_or(SnapMapError::TileSetUnavailable(ty))
}

fn extract_snaps(response: PlaylistResponse) -> Vec<Snap> {
    response
        .manifest
        .elements
        .into_iter()
        .filter_map(ManifestElement::into_snap)
        .collect()
}

/// Client for the tile service: epoch resolution and snap feed fetches
pub struct SnapMapClient {
    http: reqwest::Client,
    config: SnapMapConfig,
}

impl SnapMapClient {
    pub fn new(http: reqwest::Client, config: SnapMapConfig) -> Self {
        Self { http, config }
    }

    /// Fetch the current epoch for a tile-set type.
    ///
    /// One POST with an empty body to the latest-tile-set endpoint; the
    /// epoch is read at the type's fixed position in the response.
    pub async fn resolve_epoch(&self, ty: TileSetType) -> Result<TileEpoch, SnapMapError> {
        let response: LatestTileSetResponse = self
            .http
            .post(self.config.latest_tile_set_url())
            .json(&json!({}))
            .send()
            .await
            .map_err(|e| SnapMapError::TileSet(e.to_string()))?
            .error_for_status()
            .map_err(|e| SnapMapError::TileSet(e.to_string()))?
            .json()
            .await
            .map_err(|e| SnapMapError::TileSet(e.to_string()))?;

        let epoch = select_epoch(&response, ty)?;
        debug!(tile_set_type = %ty, epoch = epoch, "Resolved tile set epoch");
        Ok(epoch)
    }

    /// Fetch the playable snaps around a point, in upstream order.
    ///
    /// Resolves an epoch first, then requests the playlist manifest with
    /// the configured radius and zoom. An empty result is an ordinary
    /// outcome, distinct from a transport failure.
    pub async fn fetch_snaps(
        &self,
        point: GeoPoint,
        ty: TileSetType,
    ) -> Result<Vec<Snap>, SnapMapError> {
        let epoch = self.resolve_epoch(ty).await?;

        let body = json!({
            "requestGeoPoint": { "lat": point.latitude, "lon": point.longitude },
            "zoomLevel": self.config.zoom_level,
            "tileSetId": { "flavor": "default", "epoch": epoch, "type": ty.request_code() },
            "radiusMeters": self.config.radius_meters,
        });

        let response: PlaylistResponse = self
            .http
            .post(self.config.playlist_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| SnapMapError::Playlist(e.to_string()))?
            .error_for_status()
            .map_err(|e| SnapMapError::Playlist(e.to_string()))?
            .json()
            .await
            .map_err(|e| SnapMapError::Playlist(e.to_string()))?;

        let snaps = extract_snaps(response);
        debug!(snap_count = snaps.len(), "Playlist manifest filtered");
        Ok(snaps)
    }
}
