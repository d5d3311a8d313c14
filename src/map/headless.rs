//! Headless map
//!
//! Keeps the map state in memory instead of drawing it. Used by the test
//! suite and by the CLI to show what a browser map would display.

use crate::coord::Coordinates;
use crate::map::{LayerId, MapSurface, MarkerSpec, PopupContent, TileLayer};
use std::collections::BTreeMap;
use std::time::Duration;

/// A marker currently on the map
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub spec: MarkerSpec,
    pub popup_open: bool,
}

/// Last animated recentring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flight {
    pub center: Coordinates,
    pub zoom: u8,
    pub duration: Duration,
}

/// In-memory map
#[derive(Debug, Default)]
pub struct HeadlessMap {
    center: Option<Coordinates>,
    zoom: u8,
    tiles: Vec<TileLayer>,
    markers: BTreeMap<LayerId, Marker>,
    next_id: u64,
    flights: Vec<Flight>,
    size_invalidations: usize,
}

impl HeadlessMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn center(&self) -> Option<Coordinates> {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn tiles(&self) -> &[TileLayer] {
        &self.tiles
    }

    /// Number of marker layers currently on the map
    pub fn layer_count(&self) -> usize {
        self.markers.len()
    }

    pub fn marker(&self, id: LayerId) -> Option<&Marker> {
        self.markers.get(&id)
    }

    pub fn markers(&self) -> impl Iterator<Item = (&LayerId, &Marker)> {
        self.markers.iter()
    }

    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    pub fn last_flight(&self) -> Option<&Flight> {
        self.flights.last()
    }

    pub fn size_invalidations(&self) -> usize {
        self.size_invalidations
    }
}

impl MapSurface for HeadlessMap {
    fn set_view(&mut self, center: Coordinates, zoom: u8) {
        self.center = Some(center);
        self.zoom = zoom;
    }

    fn add_tile_layer(&mut self, layer: &TileLayer) {
        self.tiles.push(layer.clone());
    }

    fn add_marker(&mut self, marker: MarkerSpec) -> LayerId {
        self.next_id += 1;
        let id = LayerId(self.next_id);
        let popup_open = marker.open_popup_on_add;
        self.markers.insert(
            id,
            Marker {
                spec: marker,
                popup_open,
            },
        );
        id
    }

    fn remove_layer(&mut self, id: LayerId) {
        self.markers.remove(&id);
    }

    fn set_popup(&mut self, id: LayerId, content: PopupContent) {
        if let Some(marker) = self.markers.get_mut(&id) {
            marker.spec.popup = content;
        }
    }

    fn open_popup(&mut self, id: LayerId) {
        if let Some(marker) = self.markers.get_mut(&id) {
            marker.popup_open = true;
        }
    }

    fn set_marker_position(&mut self, id: LayerId, position: Coordinates) {
        if let Some(marker) = self.markers.get_mut(&id) {
            marker.spec.position = position;
        }
    }

    fn fly_to(&mut self, center: Coordinates, zoom: u8, duration: Duration) {
        self.center = Some(center);
        self.zoom = zoom;
        self.flights.push(Flight {
            center,
            zoom,
            duration,
        });
    }

    fn invalidate_size(&mut self) {
        self.size_invalidations += 1;
    }
}
