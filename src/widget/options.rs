//! Typed widget options

use crate::config::defaults::{
    DEFAULT_APPLY_LABEL, DEFAULT_CENTER, DEFAULT_DETAIL_ZOOM, DEFAULT_FLY_DURATION_MS,
    DEFAULT_INITIAL_ZOOM, DEFAULT_MIN_QUERY_LENGTH, DEFAULT_NOT_FOUND_LABEL,
};
use crate::coord::Coordinates;
use crate::endpoint::SelectableItem;
use crate::map::TileLayer;
use crate::status::StatusBits;
use crate::widget::state::WidgetState;
use std::fmt;
use std::time::Duration;

/// Called once the widget finished initializing
pub type CreateCallback = Box<dyn FnMut(&WidgetState)>;

/// Called when a non-empty candidate list opens
pub type OpenCallback = Box<dyn FnMut(&[SelectableItem])>;

/// Labels rendered by the widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub not_found: String,
    pub apply: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            not_found: DEFAULT_NOT_FOUND_LABEL.to_string(),
            apply: DEFAULT_APPLY_LABEL.to_string(),
        }
    }
}

/// Widget options
pub struct WidgetOptions {
    /// Zoom when the field is empty
    pub initial_zoom: u8,
    /// Zoom when a location is shown
    pub detail_zoom: u8,
    /// Encoding of the hidden status field
    pub status_bits: StatusBits,
    /// Length of the animated recentring
    pub fly_duration: Duration,
    /// Autocomplete gate
    pub min_query_length: usize,
    /// Map center for empty fields
    pub default_center: Coordinates,
    pub labels: Labels,
    pub tile_layer: TileLayer,
    pub on_create: Option<CreateCallback>,
    pub on_open: Option<OpenCallback>,
}

impl WidgetOptions {
    pub fn with_on_create(mut self, callback: impl FnMut(&WidgetState) + 'static) -> Self {
        self.on_create = Some(Box::new(callback));
        self
    }

    pub fn with_on_open(mut self, callback: impl FnMut(&[SelectableItem]) + 'static) -> Self {
        self.on_open = Some(Box::new(callback));
        self
    }
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            initial_zoom: DEFAULT_INITIAL_ZOOM,
            detail_zoom: DEFAULT_DETAIL_ZOOM,
            status_bits: StatusBits::default(),
            fly_duration: Duration::from_millis(DEFAULT_FLY_DURATION_MS),
            min_query_length: DEFAULT_MIN_QUERY_LENGTH,
            default_center: Coordinates::new(DEFAULT_CENTER[0], DEFAULT_CENTER[1]),
            labels: Labels::default(),
            tile_layer: TileLayer::default(),
            on_create: None,
            on_open: None,
        }
    }
}

impl fmt::Debug for WidgetOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetOptions")
            .field("initial_zoom", &self.initial_zoom)
            .field("detail_zoom", &self.detail_zoom)
            .field("status_bits", &self.status_bits)
            .field("fly_duration", &self.fly_duration)
            .field("min_query_length", &self.min_query_length)
            .field("default_center", &self.default_center)
            .field("labels", &self.labels)
            .field("tile_layer", &self.tile_layer)
            .field("on_create", &self.on_create.is_some())
            .field("on_open", &self.on_open.is_some())
            .finish()
    }
}
