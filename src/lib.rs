//! geocoder-field: state core of a map-backed geocoder form field
//!
//! A form field that lets an editor search for a place, pick it from an
//! autocomplete list, see it on a map and drag the marker to refine it. This
//! crate holds everything except the drawing: the widget state machine, the
//! persisted field value, coordinate sanitizing, the status bitmask and the
//! geocoding endpoint clients.
//!
//! ## Features
//!
//! - Sans-IO widget: events in, lookup requests out, stale responses dropped
//! - Nominatim and host ajax endpoints
//! - Headless map surface for tests and the CLI
//!
//! ## Quick Start
//!
//! ```rust
//! use geocoder_field::map::HeadlessMap;
//! use geocoder_field::widget::{FormFields, GeocoderWidget, WidgetOptions};
//! use geocoder_field::endpoint::SelectableItem;
//!
//! let mut widget = GeocoderWidget::new(
//!     &FormFields::default(),
//!     WidgetOptions::default(),
//!     HeadlessMap::new(),
//! );
//!
//! let berlin = r#"{"type":"Feature","geometry":{"type":"Point","coordinates":[13.4,52.5]}}"#;
//! widget
//!     .set_item(SelectableItem::new("Berlin", berlin, 1), true, false)
//!     .unwrap();
//!
//! let fields = widget.fields();
//! assert_eq!(fields.lat, "52.5");
//! assert_eq!(fields.status, "11");
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod endpoint;
pub mod error;
pub mod format;
pub mod geojson;
pub mod map;
pub mod status;
pub mod value;
pub mod widget;

// Re-export commonly used types
pub use config::Config;
pub use coord::Coordinates;
pub use error::{Error, Result};
pub use status::{Flag, StatusFlags};
pub use value::FieldValue;
pub use widget::GeocoderWidget;
