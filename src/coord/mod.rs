//! Geographic coordinates
//!
//! This module handles:
//! - The `Coordinates` value used throughout the widget
//! - Sanitizing raw form input into clamped coordinates

pub mod sanitize;

pub use sanitize::{sanitize, CoordInput, RawValue};

use crate::constants::geo::{MAX_LAT, MAX_LNG, MIN_LAT, MIN_LNG};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Create coordinates pulled into the valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn clamped(lat: f64, lng: f64) -> Self {
        Self {
            lat: lat.max(MIN_LAT).min(MAX_LAT),
            lng: lng.max(MIN_LNG).min(MAX_LNG),
        }
    }

    /// Build from a GeoJSON position (`[lng, lat]`)
    pub fn from_position(position: [f64; 2]) -> Self {
        Self::clamped(position[1], position[0])
    }

    /// GeoJSON position order (`[lng, lat]`)
    pub fn to_position(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    pub fn is_in_range(&self) -> bool {
        (MIN_LAT..=MAX_LAT).contains(&self.lat) && (MIN_LNG..=MAX_LNG).contains(&self.lng)
    }
}

/// Renders as `lat, lng`, the coordinate label shown under the map
impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lat, self.lng)
    }
}
