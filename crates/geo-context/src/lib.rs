//! Geographic Context Library
//!
//! Derives the geographic context of a coordinate pair — coastal flag,
//! forest-coverage band, seismic-hazard band — from a data-driven atlas of
//! bounding regions. The atlas is constructed once at startup (built-in
//! defaults or a JSON file) and borrowed read-only by every request; new
//! regions are additive data, not new branching code.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod atlas;

pub use atlas::{BoundingBox, ForestBand, GeoAtlas, Region, SeismicBand, SeismicZone};

#[derive(Error, Debug)]
pub enum GeoError {
    #[error("latitude {0} outside [-90, 90]")]
    InvalidLatitude(f64),
    #[error("longitude {0} outside [-180, 180]")]
    InvalidLongitude(f64),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("atlas parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GeoError>;

/// Validate latitude is in valid range
fn is_valid_latitude(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && lat.is_finite()
}

/// Validate longitude is in valid range
fn is_valid_longitude(lon: f64) -> bool {
    (-180.0..=180.0).contains(&lon) && lon.is_finite()
}

/// A validated coordinate pair.
///
/// Construction rejects non-finite or out-of-range values; downstream band
/// lookups are total for any `Location` that exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !is_valid_latitude(latitude) {
            return Err(GeoError::InvalidLatitude(latitude));
        }
        if !is_valid_longitude(longitude) {
            return Err(GeoError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// Geographic context derived from the atlas for one location.
///
/// Recomputed from the location on every request, never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoContext {
    /// False only inside a known landlocked region; coastal otherwise.
    pub is_coastal: bool,
    pub forest_band: ForestBand,
    pub seismic_band: SeismicBand,
    /// Name of the matched seismic zone, e.g. "Nepal Himalayan Collision Zone".
    pub seismic_zone: String,
}
