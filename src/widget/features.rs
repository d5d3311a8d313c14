//! The single feature layer of a widget
//!
//! A widget shows at most one marker. `replace` always removes the old layer
//! before adding the new one, so the map never holds two.

use crate::coord::Coordinates;
use crate::geojson::GeoFeature;
use crate::map::{LayerId, MapSurface, MarkerSpec, PopupContent, PopupOptions};
use tracing::debug;

/// Owner of the displayed feature and its map layer
#[derive(Debug, Default)]
pub struct GeoFeatureStore {
    layer: Option<LayerId>,
    feature: Option<GeoFeature>,
    preview: bool,
}

impl GeoFeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `feature` as a draggable marker with `popup` opened
    pub fn replace<M: MapSurface>(
        &mut self,
        map: &mut M,
        feature: GeoFeature,
        popup: PopupContent,
    ) -> LayerId {
        self.remove(map);

        let preview = matches!(popup, PopupContent::Preview { .. });
        let id = map.add_marker(MarkerSpec {
            position: feature.coordinates(),
            draggable: true,
            popup,
            popup_options: PopupOptions::default(),
            open_popup_on_add: true,
        });
        debug!(layer = id.0, preview, "feature layer replaced");

        self.layer = Some(id);
        self.feature = Some(feature);
        self.preview = preview;
        id
    }

    /// Detach the current layer; does nothing when there is none
    pub fn remove<M: MapSurface>(&mut self, map: &mut M) {
        if let Some(id) = self.layer.take() {
            map.remove_layer(id);
            debug!(layer = id.0, "feature layer removed");
        }
        self.feature = None;
        self.preview = false;
    }

    /// Replace the popup content of the current marker
    ///
    /// The preview flag follows the content, so a pending preview is dropped
    /// once its popup is replaced.
    pub fn set_popup<M: MapSurface>(&mut self, map: &mut M, content: PopupContent) {
        self.preview = self.layer.is_some() && matches!(content, PopupContent::Preview { .. });
        if let Some(id) = self.layer {
            map.set_popup(id, content);
            map.open_popup(id);
        }
    }

    /// Record that the marker was dropped at `coords`
    pub fn moved<M: MapSurface>(&mut self, map: &mut M, coords: Coordinates) {
        if let Some(id) = self.layer {
            map.set_marker_position(id, coords);
        }
        if let Some(feature) = self.feature.as_mut() {
            feature.set_coordinates(coords);
        }
    }

    pub fn layer(&self) -> Option<LayerId> {
        self.layer
    }

    pub fn feature(&self) -> Option<&GeoFeature> {
        self.feature.as_ref()
    }

    /// Number of layers owned on the map (0 or 1)
    pub fn count(&self) -> usize {
        usize::from(self.layer.is_some())
    }

    /// The marker shows a preview awaiting confirmation
    pub fn is_preview(&self) -> bool {
        self.preview
    }
}
