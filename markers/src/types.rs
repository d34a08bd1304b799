//! Domain types for markers.
//!
//! A marker is a point on the map. Once the remote store has accepted it, it
//! carries the store's identifier and its creation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier assigned by the remote marker store
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(String);

impl MarkerId {
    /// Wrap a store-assigned identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MarkerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for MarkerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Rejected coordinate
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidCoordinate {
    /// Latitude is NaN, infinite, or outside [-90, 90]
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),

    /// Longitude is NaN, infinite, or outside [-180, 180]
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

/// Geographic coordinate in degrees
///
/// Values coming from the map widget are wrapped as-is with
/// [`LatLng::from_raw`] and checked with [`LatLng::is_valid`] by the reducer;
/// [`LatLng::new`] validates up front.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude, degrees north
    pub lat: f64,
    /// Longitude, degrees east
    pub lng: f64,
}

impl LatLng {
    /// Create a validated coordinate
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinate`] if either component is not finite or
    /// out of range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, InvalidCoordinate> {
        let position = Self::from_raw(lat, lng);
        if !Self::lat_in_range(lat) {
            return Err(InvalidCoordinate::Latitude(lat));
        }
        if !Self::lng_in_range(lng) {
            return Err(InvalidCoordinate::Longitude(lng));
        }
        Ok(position)
    }

    /// Wrap a coordinate without validating it
    #[must_use]
    pub const fn from_raw(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components finite and in range
    #[must_use]
    pub fn is_valid(&self) -> bool {
        Self::lat_in_range(self.lat) && Self::lng_in_range(self.lng)
    }

    fn lat_in_range(lat: f64) -> bool {
        lat.is_finite() && (-90.0..=90.0).contains(&lat)
    }

    fn lng_in_range(lng: f64) -> bool {
        lng.is_finite() && (-180.0..=180.0).contains(&lng)
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Lat: {:.5}, Lng: {:.5}", self.lat, self.lng)
    }
}

/// Map camera: where the map is centered and how far it is zoomed in
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Center of the viewport
    pub center: LatLng,
    /// Zoom level (map widget scale, 0 = whole world)
    pub zoom: u8,
}

/// A marker about to be created in the remote store
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewMarker {
    /// Where the user clicked
    pub position: LatLng,
    /// When the click happened
    pub created_at: DateTime<Utc>,
}

/// A marker in the session's list
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Store identifier; `None` once a drag has replaced the local copy
    pub id: Option<MarkerId>,
    /// Current position
    pub position: LatLng,
    /// Creation time, if known
    pub created_at: Option<DateTime<Utc>>,
}

impl Marker {
    /// A marker the store has accepted under `id`
    #[must_use]
    pub const fn persisted(id: MarkerId, new_marker: NewMarker) -> Self {
        Self {
            id: Some(id),
            position: new_marker.position,
            created_at: Some(new_marker.created_at),
        }
    }

    /// A local-only marker at `position`, with no identifier or timestamp
    #[must_use]
    pub const fn unsaved(position: LatLng) -> Self {
        Self {
            id: None,
            position,
            created_at: None,
        }
    }

    /// Whether the marker carries a store identifier
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}
