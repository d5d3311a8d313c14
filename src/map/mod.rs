//! Map rendering boundary
//!
//! The widget never draws tiles itself. It drives a map library through the
//! `MapSurface` trait; `HeadlessMap` records the calls for tests and for the
//! command line.

pub mod headless;

pub use headless::HeadlessMap;

use crate::constants::map::{POPUP_MAX_WIDTH, TILE_ATTRIBUTION, TILE_URL};
use crate::coord::Coordinates;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Handle of a layer added to a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u64);

/// Raster tile source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub url: String,
    pub attribution: String,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url: TILE_URL.to_string(),
            attribution: TILE_ATTRIBUTION.to_string(),
        }
    }
}

/// What a marker popup shows
#[derive(Debug, Clone, PartialEq)]
pub enum PopupContent {
    /// Spinner while a reverse lookup is in flight
    Loading,
    /// The committed label
    Label(String),
    /// A previewed label with an action that commits it
    Preview { label: String, apply: String },
    /// Inline message, e.g. "not found"
    Message(String),
}

impl PopupContent {
    /// Text a screen reader or a terminal would show
    pub fn text(&self) -> String {
        match self {
            Self::Loading => "...".to_string(),
            Self::Label(label) | Self::Message(label) => label.clone(),
            Self::Preview { label, apply } => format!("{} [{}]", label, apply),
        }
    }
}

/// Popup behavior of the field marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupOptions {
    pub close_button: bool,
    pub auto_close: bool,
    pub close_on_escape: bool,
    pub max_width: u32,
}

impl Default for PopupOptions {
    fn default() -> Self {
        Self {
            close_button: false,
            auto_close: false,
            close_on_escape: false,
            max_width: POPUP_MAX_WIDTH,
        }
    }
}

/// A point marker to add to the map
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub position: Coordinates,
    pub draggable: bool,
    pub popup: PopupContent,
    pub popup_options: PopupOptions,
    pub open_popup_on_add: bool,
}

/// Operations the widget needs from a map library
pub trait MapSurface {
    /// Jump to a view without animation
    fn set_view(&mut self, center: Coordinates, zoom: u8);

    fn add_tile_layer(&mut self, layer: &TileLayer);

    /// Add a marker and return its layer handle
    fn add_marker(&mut self, marker: MarkerSpec) -> LayerId;

    /// Remove a layer. Unknown ids are ignored.
    fn remove_layer(&mut self, id: LayerId);

    fn set_popup(&mut self, id: LayerId, content: PopupContent);

    fn open_popup(&mut self, id: LayerId);

    /// Move a marker (the library usually already did this during a drag)
    fn set_marker_position(&mut self, id: LayerId, position: Coordinates);

    /// Animate the view to `center`
    fn fly_to(&mut self, center: Coordinates, zoom: u8, duration: Duration);

    /// Recompute the container size after it became visible
    fn invalidate_size(&mut self);
}
