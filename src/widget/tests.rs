//! Widget flows against a headless map

use super::*;
use crate::endpoint::Match;
use crate::error::Error;
use crate::map::HeadlessMap;
use crate::status::StatusBits;
use approx::assert_relative_eq;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

const BERLIN: &str =
    r#"{"type":"Feature","geometry":{"type":"Point","coordinates":[13.4,52.5]}}"#;
const HAMBURG: &str = r#"{"type":"Feature","geometry":{"type":"Point","coordinates":[9.99,53.55]},"properties":{"providedBy":"nominatim"}}"#;

fn widget() -> GeocoderWidget<HeadlessMap> {
    GeocoderWidget::new(&FormFields::default(), WidgetOptions::default(), HeadlessMap::new())
}

fn berlin(total: usize) -> SelectableItem {
    SelectableItem::new("Berlin", BERLIN, total)
}

fn matches(entries: &[(&str, &str)]) -> MatchResponse {
    MatchResponse::new(entries.iter().map(|(t, n)| Match::new(*t, *n)).collect())
}

/// Endpoint answering from memory; `None` simulates a transport failure
struct CannedEndpoint {
    forward: Option<MatchResponse>,
    reverse: Option<MatchResponse>,
}

impl GeocodeEndpoint for CannedEndpoint {
    async fn query(&self, _term: &str) -> Result<MatchResponse> {
        self.forward
            .clone()
            .ok_or_else(|| Error::Endpoint("connection refused".to_string()))
    }

    async fn reverse(&self, _coords: Coordinates) -> Result<MatchResponse> {
        self.reverse
            .clone()
            .ok_or_else(|| Error::Endpoint("connection refused".to_string()))
    }
}

#[test]
fn test_new_empty_field() {
    let w = widget();
    let map = w.map();

    assert_eq!(w.state().status, StatusFlags::on());
    assert_eq!(w.state().coordinates, None);
    assert_eq!(map.zoom(), 5);
    let center = map.center().unwrap();
    assert_relative_eq!(center.lat, 51.1657);
    assert_relative_eq!(center.lng, 10.4515);
    assert_eq!(map.tiles().len(), 1);
    assert_eq!(map.layer_count(), 0);
    assert!(!w.ui().clear_visible);
}

#[test]
fn test_set_item_single_result() {
    let mut w = widget();
    w.set_item(berlin(1), false, false).unwrap();

    let state = w.state();
    assert_eq!(state.formatted, "Berlin");
    assert_eq!(state.coordinates, Some(Coordinates::new(52.5, 13.4)));
    assert!(state.status.has(Flag::SINGLE_RESULT));
    assert!(state.skip_geocoding());
    assert_eq!(w.features().count(), 1);
    assert_eq!(w.map().layer_count(), 1);
    assert_eq!(w.ui().coordinate_label, "52.5, 13.4");
    assert!(w.ui().clear_visible);
    assert!(!w.ui().description_italic);
}

#[test]
fn test_set_item_total_zero_is_not_found() {
    let mut w = widget();
    w.set_item(berlin(3), false, false).unwrap();
    w.set_item(berlin(0), false, false).unwrap();

    let status = w.state().status;
    assert!(status.has(Flag::NOT_FOUND));
    assert!(!status.has(Flag::SINGLE_RESULT | Flag::MULTIPLE_RESULTS));
    assert_eq!(w.map().layer_count(), 1);
}

#[test]
fn test_set_item_takes_provider_from_feature() {
    let mut w = widget();
    w.set_item(SelectableItem::new("Hamburg", HAMBURG, 1), false, false)
        .unwrap();
    assert_eq!(w.state().provider, "nominatim");
}

#[test]
fn test_set_item_center_flies_to_detail_zoom() {
    let mut w = widget();
    w.set_item(berlin(1), true, false).unwrap();

    let flight = w.map().last_flight().unwrap();
    assert_eq!(flight.center, Coordinates::new(52.5, 13.4));
    assert_eq!(flight.zoom, 15);
    assert_eq!(flight.duration, Duration::from_millis(600));
}

#[test]
fn test_set_item_invalid_geojson_leaves_state() {
    let mut w = widget();
    w.set_item(berlin(1), false, false).unwrap();
    let before = w.state().clone();

    let bad = SelectableItem::new("Nowhere", "{not json", 1);
    assert!(matches!(
        w.set_item(bad, false, false),
        Err(Error::InvalidGeoJson(_))
    ));

    let polygon = r#"{"type":"Feature","geometry":{"type":"Polygon","coordinates":[]}}"#;
    let bad = SelectableItem::new("Area", polygon, 1);
    assert!(w.set_item(bad, false, false).is_err());

    assert_eq!(w.state(), &before);
    assert_eq!(w.map().layer_count(), 1);
}

#[test]
fn test_set_item_incomplete_restores_query() {
    let mut w = widget();
    w.input("Berl");
    w.set_item(berlin(1), false, false).unwrap();

    let incomplete = SelectableItem {
        label: Some("Berlin".to_string()),
        value: None,
        total: Some(1),
    };
    w.set_item(incomplete, false, false).unwrap();

    assert_eq!(w.state().query, "Berl");
    assert_eq!(w.state().coordinates, None);
    assert_eq!(w.state().status, StatusFlags::on());
    assert_eq!(w.map().layer_count(), 0);
}

#[test]
fn test_set_item_incomplete_preview_ignored() {
    let mut w = widget();
    w.set_item(berlin(1), false, false).unwrap();
    let before = w.state().clone();

    w.set_item(SelectableItem::default(), false, true).unwrap();
    assert_eq!(w.state(), &before);
}

#[test]
fn test_clear_keeps_coords() {
    let mut w = widget();
    w.input("Berlin");
    w.set_item(SelectableItem::new("Hamburg", HAMBURG, 1), false, false)
        .unwrap();

    w.clear(ClearOptions {
        coords: false,
        ..ClearOptions::default()
    });

    let state = w.state();
    assert_eq!(state.query, "");
    assert_eq!(state.formatted, "");
    assert_eq!(state.provider, "");
    assert_eq!(state.geo_feature, None);
    assert_eq!(state.geojson, "");
    assert_eq!(state.status, StatusFlags::on());
    assert_eq!(state.coordinates, Some(Coordinates::new(53.55, 9.99)));

    assert_eq!(w.ui().description, "Not found");
    assert!(w.ui().description_italic);
    assert!(!w.ui().clear_visible);
    assert_eq!(w.map().layer_count(), 0);
}

#[test]
fn test_clear_twice_is_harmless() {
    let mut w = widget();
    w.set_item(berlin(1), false, false).unwrap();
    w.clear(ClearOptions::all());
    w.clear(ClearOptions::all());
    assert_eq!(w.map().layer_count(), 0);
    assert_eq!(w.fields().lat, "");
}

#[test]
fn test_set_lat_lng() {
    let mut w = widget();
    w.set_lat_lng("100", "13.4", false).unwrap();
    assert_eq!(w.state().coordinates, Some(Coordinates::new(90.0, 13.4)));
    assert_eq!(w.ui().coordinate_label, "90, 13.4");

    assert!(w.set_lat_lng("abc", "13.4", false).is_err());
    assert_eq!(w.state().coordinates, Some(Coordinates::new(90.0, 13.4)));

    w.set_lat_lng("", "", false).unwrap();
    assert_eq!(w.state().coordinates, None);
    assert_eq!(w.ui().coordinate_label, "");
}

#[test]
fn test_round_trip_through_fields() {
    let mut first = widget();
    first.input("berlin");
    first.set_item(berlin(2), false, false).unwrap();

    let fields = first.fields();
    assert_eq!(fields.status, (1 | 4 | 8).to_string());

    let second = GeocoderWidget::new(&fields, WidgetOptions::default(), HeadlessMap::new());
    assert_eq!(second.state(), first.state());
    assert_eq!(second.fields(), fields);

    assert_eq!(second.map().zoom(), 15);
    assert_eq!(second.map().center(), Some(Coordinates::new(52.5, 13.4)));
    assert_eq!(second.map().layer_count(), 1);
    assert!(second.ui().clear_visible);
}

#[test]
fn test_value_matches_state() {
    let mut w = widget();
    w.set_item(berlin(1), false, false).unwrap();

    let value = w.value();
    assert_eq!(value.formatted, "Berlin");
    assert_eq!(value.lat, "52.5");
    assert_eq!(value.lng, "13.4");
    assert_eq!(value.coordinates(), Some([13.4, 52.5]));
    assert!(value.is_single_result());
    assert_eq!(value.geodata["geometry"]["type"], "Point");
}

#[test]
fn test_geojson_field_keeps_item_value() {
    let raw = r#"{"type":"Feature","id":"osm-42","geometry":{"type":"Point","coordinates":[13.4,52.5]},"properties":{"z":1,"a":2},"bounds":{"south":52.3,"west":13.0,"north":52.7,"east":13.8}}"#;
    let mut w = widget();
    w.set_item(SelectableItem::new("Berlin", raw, 1), false, false)
        .unwrap();

    assert_eq!(w.fields().geojson, raw);
    let value = w.value();
    assert_eq!(value.geodata["id"], "osm-42");
    assert_eq!(value.geodata["bounds"]["north"], 52.7);
    assert_eq!(value.geodata["properties"]["z"], 1);

    let fields = w.fields();
    let restored = GeocoderWidget::new(&fields, WidgetOptions::default(), HeadlessMap::new());
    assert_eq!(restored.fields().geojson, raw);
}

#[test]
fn test_new_drops_invalid_stored_values() {
    let fields = FormFields {
        lat: "north".to_string(),
        lng: "13.4".to_string(),
        geojson: "[]".to_string(),
        status: "garbage".to_string(),
        ..FormFields::default()
    };
    let w = GeocoderWidget::new(&fields, WidgetOptions::default(), HeadlessMap::new());

    assert_eq!(w.state().coordinates, None);
    assert_eq!(w.state().geo_feature, None);
    assert_eq!(w.state().status, StatusFlags::on());
    assert_eq!(w.map().zoom(), 5);
}

#[test]
fn test_on_create_fires_once() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let options = WidgetOptions::default().with_on_create(move |state: &WidgetState| {
        sink.borrow_mut().push(state.query.clone());
    });
    let fields = FormFields {
        query: "Berlin".to_string(),
        ..FormFields::default()
    };

    let w = GeocoderWidget::new(&fields, options, HeadlessMap::new());
    assert_eq!(*seen.borrow(), vec!["Berlin".to_string()]);
    assert!(w.ui().clear_visible);
}

#[test]
fn test_autocomplete_select_flow() {
    let opened = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&opened);
    let options = WidgetOptions::default().with_on_open(move |items: &[SelectableItem]| {
        *counter.borrow_mut() += items.len();
    });
    let mut w = GeocoderWidget::new(&FormFields::default(), options, HeadlessMap::new());

    assert!(w.input("B").is_none());
    let request = w.input("Berlin ").unwrap();
    assert_eq!(request.term, "Berlin");
    assert_eq!(w.indicator(), Indicator::Loading);

    let items = w
        .receive_matches(&request, Ok(matches(&[("Berlin", BERLIN), ("Hamburg", HAMBURG)])))
        .unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(*opened.borrow(), 2);
    assert_eq!(w.indicator(), Indicator::HasResults);

    assert_eq!(w.select(0).unwrap(), EventOutcome::Suppress);
    let status = w.state().status;
    assert!(status.has(Flag::SINGLE_RESULT));
    assert!(status.skip_geocoding());
    assert_eq!(w.state().query, "Berlin ");
    assert!(w.candidates().is_empty());
    assert_eq!(w.map().flights().len(), 1);
}

#[test]
fn test_select_out_of_range() {
    let mut w = widget();
    assert_eq!(w.select(3).unwrap(), EventOutcome::Continue);
}

#[test]
fn test_stale_matches_do_not_overwrite() {
    let mut w = widget();
    let old = w.input("Ham").unwrap();
    let new = w.input("Berlin").unwrap();

    w.receive_matches(&new, Ok(matches(&[("Berlin", BERLIN)])))
        .unwrap();
    assert!(w
        .receive_matches(&old, Ok(matches(&[("Hamburg", HAMBURG)])))
        .is_none());

    assert_eq!(w.candidates()[0].label.as_deref(), Some("Berlin"));
}

#[test]
fn test_autocomplete_failure_leaves_state() {
    let mut w = widget();
    w.set_item(berlin(1), false, false).unwrap();
    let before = w.state().clone();

    let request = w.input("Hamburg").unwrap();
    let items = w
        .receive_matches(&request, Err(Error::Endpoint("timeout".to_string())))
        .unwrap();
    assert!(items.is_empty());
    assert_eq!(w.indicator(), Indicator::NoResults);
    assert_eq!(w.state().coordinates, before.coordinates);
    assert_eq!(w.state().status, before.status);
}

#[test]
fn test_keys_and_blur() {
    let mut w = widget();
    assert_eq!(w.key_down(Key::Enter), EventOutcome::Suppress);
    assert_eq!(w.key_down(Key::Other), EventOutcome::Continue);

    w.focus();
    let request = w.input("Berlin").unwrap();
    w.receive_matches(&request, Ok(matches(&[])));
    w.key_up();
    assert_eq!(w.indicator(), Indicator::Idle);

    w.blur();
    assert!(!w.ui().input_focused);
}

#[test]
fn test_drag_preview_then_apply() {
    let mut w = widget();
    w.set_item(berlin(1), false, false).unwrap();

    let request = w.marker_drag_end(Coordinates::new(53.55, 9.99));
    assert!(w.is_reverse_pending());
    let layer = w.features().layer().unwrap();
    assert_eq!(w.map().marker(layer).unwrap().spec.popup, PopupContent::Loading);

    w.receive_reverse(&request, Ok(matches(&[("Hamburg", HAMBURG)])))
        .unwrap();

    // preview only touches the popup and leaves the view alone
    assert!(w.map().flights().is_empty());
    assert_eq!(w.state().formatted, "Berlin");
    assert_eq!(w.state().coordinates, Some(Coordinates::new(52.5, 13.4)));
    assert_eq!(w.ui().preview_label.as_deref(), Some("Hamburg"));
    assert!(w.features().is_preview());
    let layer = w.features().layer().unwrap();
    assert_eq!(
        w.map().marker(layer).unwrap().spec.popup,
        PopupContent::Preview {
            label: "Hamburg".to_string(),
            apply: "Apply".to_string(),
        }
    );

    w.apply_preview().unwrap();
    assert_eq!(w.state().formatted, "Hamburg");
    assert_eq!(w.state().coordinates, Some(Coordinates::new(53.55, 9.99)));
    assert_eq!(w.state().provider, "nominatim");
    assert!(w.state().status.has(Flag::SINGLE_RESULT));
    assert!(!w.features().is_preview());
    assert_eq!(w.map().layer_count(), 1);
}

#[test]
fn test_apply_after_failed_second_drag_keeps_state() {
    let mut w = widget();
    w.set_item(berlin(1), false, false).unwrap();

    let request = w.marker_drag_end(Coordinates::new(53.55, 9.99));
    w.receive_reverse(&request, Ok(matches(&[("Hamburg", HAMBURG)])))
        .unwrap();
    assert!(w.features().is_preview());

    let request = w.marker_drag_end(Coordinates::new(48.14, 11.58));
    assert!(!w.features().is_preview());
    assert_eq!(w.ui().preview_label, None);

    let result = w.receive_reverse(&request, Ok(matches(&[("Broken", "{broken")])));
    assert!(matches!(result, Err(Error::InvalidGeoJson(_))));
    let layer = w.features().layer().unwrap();
    assert_eq!(
        w.map().marker(layer).unwrap().spec.popup,
        PopupContent::Message("Not found".to_string())
    );

    w.apply_preview().unwrap();
    assert_eq!(w.state().formatted, "Berlin");
    assert_eq!(w.state().coordinates, Some(Coordinates::new(52.5, 13.4)));
    assert!(w.map().flights().is_empty());
}

#[test]
fn test_drag_with_incomplete_match_shows_not_found() {
    let mut w = widget();
    w.set_item(berlin(1), false, false).unwrap();

    let request = w.marker_drag_end(Coordinates::new(53.55, 9.99));
    let response: MatchResponse =
        serde_json::from_str(r#"{"matches":[{"title":"Hamburg"}]}"#).unwrap();
    w.receive_reverse(&request, Ok(response)).unwrap();

    let layer = w.features().layer().unwrap();
    assert_eq!(
        w.map().marker(layer).unwrap().spec.popup,
        PopupContent::Message("Not found".to_string())
    );
    assert!(!w.is_reverse_pending());
    assert_eq!(w.state().formatted, "Berlin");
}

#[test]
fn test_apply_preview_without_preview() {
    let mut w = widget();
    w.set_item(berlin(1), false, false).unwrap();
    w.apply_preview().unwrap();
    assert!(w.map().flights().is_empty());
}

#[test]
fn test_drag_not_found_keeps_marker() {
    let mut w = widget();
    w.set_item(berlin(1), false, false).unwrap();

    let request = w.marker_drag_end(Coordinates::new(0.0, -30.0));
    w.receive_reverse(&request, Ok(MatchResponse::default()))
        .unwrap();

    let status = w.state().status;
    assert!(status.has(Flag::NOT_FOUND));
    assert!(!status.has(Flag::ERROR));
    assert!(!status.skip_geocoding());
    assert_eq!(w.state().coordinates, None);
    assert_eq!(w.map().layer_count(), 1);

    let layer = w.features().layer().unwrap();
    let marker = w.map().marker(layer).unwrap();
    assert_eq!(marker.spec.position, Coordinates::new(0.0, -30.0));
    assert_eq!(marker.spec.popup, PopupContent::Message("Not found".to_string()));
}

#[test]
fn test_drag_failure_sets_error() {
    let mut w = widget();
    w.set_item(berlin(1), false, false).unwrap();

    let request = w.marker_drag_end(Coordinates::new(1.0, 1.0));
    w.receive_reverse(&request, Err(Error::Endpoint("timeout".to_string())))
        .unwrap();

    assert!(w.state().status.has(Flag::NOT_FOUND | Flag::ERROR));
    assert!(w.state().status.has(Flag::ERROR));
}

#[test]
fn test_stale_reverse_ignored() {
    let mut w = widget();
    w.set_item(berlin(1), false, false).unwrap();

    let first = w.marker_drag_end(Coordinates::new(1.0, 1.0));
    let second = w.marker_drag_end(Coordinates::new(53.55, 9.99));

    w.receive_reverse(&second, Ok(matches(&[("Hamburg", HAMBURG)])))
        .unwrap();
    w.receive_reverse(&first, Ok(MatchResponse::default()))
        .unwrap();

    assert!(!w.state().status.has(Flag::NOT_FOUND));
    assert_eq!(w.ui().preview_label.as_deref(), Some("Hamburg"));
}

#[test]
fn test_panel_shown_restores_marker() {
    let mut w = widget();
    w.set_item(berlin(1), false, false).unwrap();

    w.panel_shown(Some(28.0));
    w.panel_shown(None);

    assert_eq!(w.map().size_invalidations(), 2);
    assert_eq!(w.map().layer_count(), 1);
    assert_eq!(w.ui().input_height, None);
}

#[test]
fn test_custom_status_bits_in_fields() {
    let options = WidgetOptions {
        status_bits: StatusBits {
            skip_geocoding: 64,
            ..StatusBits::default()
        },
        ..WidgetOptions::default()
    };
    let mut w = GeocoderWidget::new(&FormFields::default(), options, HeadlessMap::new());
    w.set_item(berlin(1), false, false).unwrap();

    assert_eq!(w.fields().status, (1 | 2 | 64).to_string());
    assert_eq!(w.value().status.bits(), 1 | 2 | 8);
}

#[tokio::test]
async fn test_search_and_drag_against_endpoint() {
    let endpoint = CannedEndpoint {
        forward: Some(matches(&[("Berlin", BERLIN)])),
        reverse: Some(matches(&[("Hamburg", HAMBURG)])),
    };
    let mut w = widget();

    let items = w.search(&endpoint, "Berlin").await;
    assert_eq!(items, vec![SelectableItem::new("Berlin", BERLIN, 1)]);
    w.select(0).unwrap();
    assert_eq!(w.state().formatted, "Berlin");

    w.drag_marker(&endpoint, Coordinates::new(53.55, 9.99))
        .await
        .unwrap();
    assert_eq!(w.ui().preview_label.as_deref(), Some("Hamburg"));
}

#[tokio::test]
async fn test_search_short_input_skips_endpoint() {
    let endpoint = CannedEndpoint {
        forward: None,
        reverse: None,
    };
    let mut w = widget();
    assert!(w.search(&endpoint, "B").await.is_empty());
    assert_eq!(w.indicator(), Indicator::Idle);
}

#[tokio::test]
async fn test_drag_against_failing_endpoint() {
    let endpoint = CannedEndpoint {
        forward: None,
        reverse: None,
    };
    let mut w = widget();
    w.set_item(berlin(1), false, false).unwrap();

    w.drag_marker(&endpoint, Coordinates::new(1.0, 1.0))
        .await
        .unwrap();
    assert!(w.state().status.has(Flag::ERROR));
    assert!(!w.is_reverse_pending());
}
