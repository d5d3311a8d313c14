//! Widget state and the form fields it is persisted through

use crate::coord::Coordinates;
use crate::geojson::GeoFeature;
use crate::status::StatusFlags;
use serde::{Deserialize, Serialize};

/// State of one widget instance
///
/// Only `GeocoderWidget` mutates it; hosts read it through
/// `GeocoderWidget::state`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WidgetState {
    /// Raw search text
    pub query: String,
    /// Persisted human-readable description
    pub formatted: String,
    /// `None` means no location is set
    pub coordinates: Option<Coordinates>,
    /// Geocoder that produced the value
    pub provider: String,
    pub status: StatusFlags,
    /// Parsed form of `geojson`, used for the marker
    pub geo_feature: Option<GeoFeature>,
    /// Item value as the endpoint sent it, mirrored into the hidden field
    pub geojson: String,
}

impl WidgetState {
    /// The value was chosen interactively and must not be geocoded again
    pub fn skip_geocoding(&self) -> bool {
        self.status.skip_geocoding()
    }
}

/// Transient presentation state, never persisted
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UiState {
    /// Text of the visible description area
    pub description: String,
    /// Description is a placeholder message rather than an address
    pub description_italic: bool,
    /// `lat, lng` label under the map
    pub coordinate_label: String,
    pub clear_visible: bool,
    pub input_focused: bool,
    /// Measured height of the query input, mirrored into the layout
    pub input_height: Option<f32>,
    /// Label shown in the popup while previewing a dragged position
    pub preview_label: Option<String>,
}

/// Values of the host form inputs
///
/// `query` is the visible search input; the others are hidden inputs that
/// the host form submits.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FormFields {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub formatted: String,
    #[serde(default)]
    pub provider: String,
    /// Encoded status integer
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub lat: String,
    #[serde(default)]
    pub lng: String,
    /// Serialized GeoJSON feature
    #[serde(default)]
    pub geojson: String,
}

/// Facets reset by `GeocoderWidget::clear`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearOptions {
    pub input: bool,
    pub description: bool,
    pub coords: bool,
    pub provider: bool,
    pub geojson: bool,
    pub status: bool,
}

impl ClearOptions {
    /// Reset every facet
    pub fn all() -> Self {
        Self {
            input: true,
            description: true,
            coords: true,
            provider: true,
            geojson: true,
            status: true,
        }
    }
}

impl Default for ClearOptions {
    fn default() -> Self {
        Self::all()
    }
}
