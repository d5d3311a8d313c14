//! Geocoder field widget
//!
//! `GeocoderWidget` is a sans-IO state machine. Event methods update the
//! state and return request descriptors; the host runs the lookup and feeds
//! the result back through `receive_matches` / `receive_reverse`. `search`
//! and `drag_marker` do both steps against a `GeocodeEndpoint`.

pub mod autocomplete;
pub mod features;
pub mod options;
pub mod registry;
pub mod reverse;
pub mod state;

#[cfg(test)]
mod tests;

pub use autocomplete::{AutocompleteController, Indicator, Phase, QueryRequest};
pub use features::GeoFeatureStore;
pub use options::{Labels, WidgetOptions};
pub use registry::WidgetRegistry;
pub use reverse::{ReverseGeocodeController, ReverseOutcome, ReverseRequest};
pub use state::{ClearOptions, FormFields, UiState, WidgetState};

use crate::coord::{sanitize, CoordInput, Coordinates, RawValue};
use crate::endpoint::{GeocodeEndpoint, MatchResponse, SelectableItem};
use crate::error::Result;
use crate::geojson::{looks_like_geojson, GeoFeature};
use crate::map::{MapSurface, PopupContent};
use crate::status::{Flag, StatusFlags};
use crate::value::FieldValue;
use tracing::{debug, error, warn};

/// Whether the host should run its default handling for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Continue,
    Suppress,
}

/// Keys the widget reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other,
}

/// One geocoder field instance bound to a map
pub struct GeocoderWidget<M: MapSurface> {
    options: WidgetOptions,
    map: M,
    state: WidgetState,
    ui: UiState,
    features: GeoFeatureStore,
    autocomplete: AutocompleteController,
    reverse: ReverseGeocodeController,
    last_item: Option<SelectableItem>,
}

impl<M: MapSurface> GeocoderWidget<M> {
    /// Restore a widget from the host form fields
    ///
    /// Invalid stored coordinates or GeoJSON are logged and dropped, so this
    /// never fails.
    pub fn new(fields: &FormFields, options: WidgetOptions, map: M) -> Self {
        let autocomplete = AutocompleteController::new(options.min_query_length);
        let mut widget = Self {
            options,
            map,
            state: WidgetState::default(),
            ui: UiState::default(),
            features: GeoFeatureStore::new(),
            autocomplete,
            reverse: ReverseGeocodeController::new(),
            last_item: None,
        };
        widget.restore(fields);

        if let Some(on_create) = widget.options.on_create.as_mut() {
            on_create(&widget.state);
        }
        widget
    }

    fn restore(&mut self, fields: &FormFields) {
        self.state.query = fields.query.clone();
        self.state.formatted = fields.formatted.clone();
        self.state.provider = fields.provider.clone();
        self.state.status = self.decode_status(&fields.status);
        self.ui.description = fields.formatted.clone();

        if let Err(e) = self.set_lat_lng(fields.lat.as_str(), fields.lng.as_str(), false) {
            warn!(error = %e, lat = %fields.lat, lng = %fields.lng, "ignoring stored coordinates");
            self.apply_coordinates(None);
        }

        self.state.geo_feature = parse_stored_feature(&fields.geojson);
        self.state.geojson = if self.state.geo_feature.is_some() {
            fields.geojson.trim().to_string()
        } else {
            String::new()
        };

        let center = self.state.coordinates.unwrap_or(self.options.default_center);
        let zoom = if self.state.geo_feature.is_some() {
            self.options.detail_zoom
        } else {
            self.options.initial_zoom
        };
        self.map.set_view(center, zoom);
        self.map.add_tile_layer(&self.options.tile_layer);

        if let Some(feature) = self.state.geo_feature.clone() {
            let popup = PopupContent::Label(self.state.formatted.clone());
            self.features.replace(&mut self.map, feature, popup);
        }

        self.ui.clear_visible = !self.state.query.is_empty();
        debug!(
            status = %self.state.status,
            coordinates = ?self.state.coordinates,
            "widget restored"
        );
    }

    fn decode_status(&self, raw: &str) -> StatusFlags {
        let raw = raw.trim();
        if raw.is_empty() {
            return StatusFlags::on();
        }
        match raw.parse::<u32>() {
            Ok(value) => self.options.status_bits.decode(value),
            Err(_) => {
                warn!(status = raw, "ignoring non-numeric stored status");
                StatusFlags::on()
            }
        }
    }

    /// Apply a selected or reverse-geocoded item
    ///
    /// In preview mode only the marker popup changes; the persisted fields
    /// are left alone until the preview is applied.
    pub fn set_item(&mut self, item: SelectableItem, center: bool, preview: bool) -> Result<()> {
        let (Some(label), Some(value)) = (item.label.clone(), item.value.clone()) else {
            if !preview {
                debug!("incomplete item, restoring query");
                let query = std::mem::take(&mut self.state.query);
                self.clear(ClearOptions::all());
                self.state.query = query;
            }
            return Ok(());
        };

        let feature = GeoFeature::parse(&value).inspect_err(|e| {
            error!(error = %e, label = %label, "selected item carries invalid GeoJSON");
        })?;
        let coords = sanitize(feature.position(), RawValue::Missing, true)?;
        self.last_item = Some(item.clone());

        let popup = if preview {
            self.ui.preview_label = Some(label.clone());
            PopupContent::Preview {
                label,
                apply: self.options.labels.apply.clone(),
            }
        } else {
            if let Some(total) = item.total {
                self.state.status.mark_total(total);
            }
            self.set_description(&label, false);
            self.apply_coordinates(coords);
            if let Some(provider) = feature.provider() {
                self.state.provider = provider.to_string();
            }
            self.state.geo_feature = Some(feature.clone());
            self.state.geojson = value;
            self.state.status.add(Flag::SKIP_GEOCODING);
            self.ui.clear_visible = true;
            self.ui.preview_label = None;
            PopupContent::Label(label)
        };

        let target = if preview {
            feature.coordinates()
        } else {
            self.state.coordinates.unwrap_or_else(|| feature.coordinates())
        };
        self.features.replace(&mut self.map, feature, popup);

        if center {
            self.map
                .fly_to(target, self.options.detail_zoom, self.options.fly_duration);
        }
        debug!(preview, center, status = %self.state.status, "item applied");
        Ok(())
    }

    /// Reset the selected facets
    pub fn clear(&mut self, options: ClearOptions) {
        if options.input {
            self.state.query.clear();
            self.ui.clear_visible = false;
            self.autocomplete.close();
        }
        if options.description {
            self.state.formatted.clear();
            self.ui.description = self.options.labels.not_found.clone();
            self.ui.description_italic = true;
            self.ui.preview_label = None;
        }
        if options.coords {
            self.apply_coordinates(None);
        }
        if options.provider {
            self.state.provider.clear();
        }
        if options.geojson {
            self.features.remove(&mut self.map);
            self.state.geo_feature = None;
            self.state.geojson.clear();
        }
        if options.status {
            self.state.status.set(Flag::ON);
        }
        debug!(?options, "widget cleared");
    }

    /// Set the coordinates from raw input
    ///
    /// Both blank clears them. Non-numeric input is rejected and leaves the
    /// current coordinates unchanged.
    pub fn set_lat_lng(
        &mut self,
        lat: impl Into<CoordInput>,
        lng: impl Into<RawValue>,
        reverse: bool,
    ) -> Result<()> {
        let coords = sanitize(lat, lng, reverse)?;
        self.apply_coordinates(coords);
        Ok(())
    }

    fn apply_coordinates(&mut self, coords: Option<Coordinates>) {
        self.state.coordinates = coords;
        self.ui.coordinate_label = coords.map(|c| c.to_string()).unwrap_or_default();
    }

    fn set_description(&mut self, value: &str, italic: bool) {
        self.ui.description = value.to_string();
        self.ui.description_italic = italic && !value.is_empty();
        self.state.formatted = value.to_string();
    }

    /// The query text changed
    pub fn input(&mut self, text: &str) -> Option<QueryRequest> {
        self.state.query = text.to_string();
        self.ui.clear_visible = !text.is_empty();
        self.autocomplete.begin(text)
    }

    /// Feed a forward lookup result back. Returns `None` for stale results.
    pub fn receive_matches(
        &mut self,
        request: &QueryRequest,
        result: Result<MatchResponse>,
    ) -> Option<&[SelectableItem]> {
        self.autocomplete.complete(request, result)?;

        let items = self.autocomplete.items();
        if !items.is_empty() {
            if let Some(on_open) = self.options.on_open.as_mut() {
                on_open(items);
            }
        }
        Some(items)
    }

    /// A candidate was picked from the list
    pub fn select(&mut self, index: usize) -> Result<EventOutcome> {
        let Some(item) = self.autocomplete.select(index) else {
            return Ok(EventOutcome::Continue);
        };
        self.set_item(item, true, false)?;
        self.ui.input_focused = false;
        self.autocomplete.reset_indicator();
        Ok(EventOutcome::Suppress)
    }

    pub fn focus(&mut self) {
        self.ui.input_focused = true;
    }

    pub fn blur(&mut self) {
        self.ui.input_focused = false;
        self.autocomplete.close();
        self.autocomplete.reset_indicator();
    }

    pub fn key_up(&mut self) {
        self.autocomplete.reset_indicator();
    }

    /// Enter must not submit the host form
    pub fn key_down(&mut self, key: Key) -> EventOutcome {
        match key {
            Key::Enter => EventOutcome::Suppress,
            Key::Other => EventOutcome::Continue,
        }
    }

    /// The marker was dropped at `coords`
    pub fn marker_drag_end(&mut self, coords: Coordinates) -> ReverseRequest {
        let coords = Coordinates::clamped(coords.lat, coords.lng);
        self.features.moved(&mut self.map, coords);
        self.features.set_popup(&mut self.map, PopupContent::Loading);
        self.ui.preview_label = None;
        self.last_item = None;
        self.reverse.begin(coords)
    }

    /// Feed a reverse lookup result back
    pub fn receive_reverse(
        &mut self,
        request: &ReverseRequest,
        result: Result<MatchResponse>,
    ) -> Result<()> {
        match self.reverse.complete(request, result) {
            ReverseOutcome::Stale => Ok(()),
            ReverseOutcome::Found(item) if !item.is_complete() => {
                debug!("reverse lookup returned an incomplete item");
                self.last_item = None;
                self.show_not_found_popup();
                Ok(())
            }
            ReverseOutcome::Found(item) => {
                let applied = self.set_item(item, false, true);
                if applied.is_err() {
                    self.last_item = None;
                    self.show_not_found_popup();
                }
                applied
            }
            ReverseOutcome::NotFound => {
                self.mark_reverse_not_found(false);
                Ok(())
            }
            ReverseOutcome::Failed(_) => {
                self.mark_reverse_not_found(true);
                Ok(())
            }
        }
    }

    fn mark_reverse_not_found(&mut self, failed: bool) {
        self.clear(ClearOptions {
            geojson: false,
            ..ClearOptions::all()
        });
        self.state.status.mark_not_found();
        self.last_item = None;
        if failed {
            self.state.status.add(Flag::ERROR);
        }
        self.show_not_found_popup();
    }

    fn show_not_found_popup(&mut self) {
        let message = PopupContent::Message(self.options.labels.not_found.clone());
        self.features.set_popup(&mut self.map, message);
    }

    /// Commit the previewed reverse lookup result
    pub fn apply_preview(&mut self) -> Result<()> {
        if !self.features.is_preview() {
            return Ok(());
        }
        match self.last_item.clone() {
            Some(item) => self.set_item(item, true, false),
            None => Ok(()),
        }
    }

    /// The panel holding the widget became visible
    pub fn panel_shown(&mut self, input_height: Option<f32>) {
        self.map.invalidate_size();
        self.ui.input_height = input_height;

        if let Some(feature) = self.state.geo_feature.clone() {
            let popup = PopupContent::Label(self.state.formatted.clone());
            self.features.replace(&mut self.map, feature, popup);
        }
    }

    /// Type `text` and run the resulting lookup against `endpoint`
    pub async fn search<E: GeocodeEndpoint>(
        &mut self,
        endpoint: &E,
        text: &str,
    ) -> Vec<SelectableItem> {
        let Some(request) = self.input(text) else {
            return Vec::new();
        };
        let result = endpoint.query(&request.term).await;
        self.receive_matches(&request, result)
            .map(<[SelectableItem]>::to_vec)
            .unwrap_or_default()
    }

    /// Drop the marker at `coords` and run the reverse lookup
    pub async fn drag_marker<E: GeocodeEndpoint>(
        &mut self,
        endpoint: &E,
        coords: Coordinates,
    ) -> Result<()> {
        let request = self.marker_drag_end(coords);
        let result = endpoint.reverse(request.coords).await;
        self.receive_reverse(&request, result)
    }

    /// Current values of the host form inputs
    pub fn fields(&self) -> FormFields {
        FormFields {
            query: self.state.query.clone(),
            formatted: self.state.formatted.clone(),
            provider: self.state.provider.clone(),
            status: self.options.status_bits.encode(self.state.status).to_string(),
            lat: self
                .state
                .coordinates
                .map(|c| c.lat.to_string())
                .unwrap_or_default(),
            lng: self
                .state
                .coordinates
                .map(|c| c.lng.to_string())
                .unwrap_or_default(),
            geojson: self.state.geojson.clone(),
        }
    }

    /// The value the backend would persist
    pub fn value(&self) -> FieldValue {
        FieldValue::from_state(&self.state)
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn indicator(&self) -> Indicator {
        self.autocomplete.indicator()
    }

    /// Candidates currently listed
    pub fn candidates(&self) -> &[SelectableItem] {
        self.autocomplete.items()
    }

    pub fn features(&self) -> &GeoFeatureStore {
        &self.features
    }

    pub fn last_item(&self) -> Option<&SelectableItem> {
        self.last_item.as_ref()
    }

    pub fn is_reverse_pending(&self) -> bool {
        self.reverse.is_pending()
    }

    pub fn options(&self) -> &WidgetOptions {
        &self.options
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }
}

fn parse_stored_feature(raw: &str) -> Option<GeoFeature> {
    if raw.trim().is_empty() {
        return None;
    }
    let value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "stored geojson is not JSON");
            return None;
        }
    };
    if !looks_like_geojson(&value) {
        debug!("stored geojson has no type, ignoring");
        return None;
    }
    match GeoFeature::from_value(value) {
        Ok(feature) => Some(feature),
        Err(e) => {
            warn!(error = %e, "ignoring stored geojson");
            None
        }
    }
}
