//! Persisted field value
//!
//! The shape the backend stores for one geocoder field. Coordinates are kept
//! as text, the way they travel through the form.

use crate::constants::geo::{MAX_LAT, MAX_LNG, MIN_LAT, MIN_LNG};
use crate::status::{Flag, StatusBits, StatusFlags};
use crate::widget::{FormFields, WidgetState};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::warn;

fn empty_geodata() -> Value {
    Value::Array(Vec::new())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    #[serde(default)]
    pub status: StatusFlags,
    #[serde(default)]
    pub formatted: String,
    #[serde(default)]
    pub query: String,
    /// Stored GeoJSON feature, `[]` when there is none
    #[serde(default = "empty_geodata")]
    pub geodata: Value,
    #[serde(default)]
    pub lat: String,
    #[serde(default)]
    pub lng: String,
    #[serde(default)]
    pub provider: String,
}

impl Default for FieldValue {
    fn default() -> Self {
        Self {
            status: StatusFlags::on(),
            formatted: String::new(),
            query: String::new(),
            geodata: empty_geodata(),
            lat: String::new(),
            lng: String::new(),
            provider: String::new(),
        }
    }
}

impl FieldValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) -> &mut Self {
        *self = Self::default();
        self
    }

    /// Numeric text is clamped into range, anything else is stored as empty
    pub fn set_lat(&mut self, value: &str) -> &mut Self {
        self.lat = clamp_numeric(value, MIN_LAT, MAX_LAT);
        self
    }

    pub fn set_lng(&mut self, value: &str) -> &mut Self {
        self.lng = clamp_numeric(value, MIN_LNG, MAX_LNG);
        self
    }

    /// `[lng, lat]`, when both are set
    pub fn coordinates(&self) -> Option<[f64; 2]> {
        let lat = self.lat.parse::<f64>().ok()?;
        let lng = self.lng.parse::<f64>().ok()?;
        Some([lng, lat])
    }

    pub fn set_status(&mut self, flags: Flag) -> &mut Self {
        self.status.set(flags);
        self
    }

    pub fn add_status(&mut self, flags: Flag) -> &mut Self {
        self.status.add(flags);
        self
    }

    pub fn remove_status(&mut self, flags: Flag) -> &mut Self {
        self.status.remove(flags);
        self
    }

    pub fn has_status(&self, flags: Flag) -> bool {
        self.status.has(flags)
    }

    pub fn set_single_result(&mut self) -> &mut Self {
        self.status.mark_single_result();
        self
    }

    pub fn set_multiple_results(&mut self) -> &mut Self {
        self.status.mark_multiple_results();
        self
    }

    pub fn set_not_found(&mut self) -> &mut Self {
        self.status.mark_not_found();
        self
    }

    pub fn has_result(&self) -> bool {
        self.is_single_result() || self.is_multiple_results()
    }

    pub fn is_single_result(&self) -> bool {
        self.status.has(Flag::SINGLE_RESULT)
    }

    pub fn is_multiple_results(&self) -> bool {
        self.status.has(Flag::MULTIPLE_RESULTS)
    }

    pub fn is_not_found(&self) -> bool {
        self.status.has(Flag::NOT_FOUND)
    }

    /// Snapshot of a widget's persisted state
    pub fn from_state(state: &WidgetState) -> Self {
        let geodata = match state.geojson.as_str() {
            "" => empty_geodata(),
            raw => serde_json::from_str(raw).unwrap_or_else(|e| {
                warn!(error = %e, "widget geojson is not JSON");
                empty_geodata()
            }),
        };

        Self {
            status: state.status,
            formatted: state.formatted.clone(),
            query: state.query.clone(),
            geodata,
            lat: state
                .coordinates
                .map(|c| c.lat.to_string())
                .unwrap_or_default(),
            lng: state
                .coordinates
                .map(|c| c.lng.to_string())
                .unwrap_or_default(),
            provider: state.provider.clone(),
        }
    }

    /// Read the submitted form inputs
    pub fn from_fields(fields: &FormFields, bits: &StatusBits) -> Self {
        let status = match fields.status.trim() {
            "" => StatusFlags::on(),
            raw => raw.parse::<u32>().map(|v| bits.decode(v)).unwrap_or_else(|_| {
                warn!(status = raw, "non-numeric status field");
                StatusFlags::on()
            }),
        };

        let geodata = match fields.geojson.trim() {
            "" => empty_geodata(),
            raw => serde_json::from_str(raw).unwrap_or_else(|e| {
                warn!(error = %e, "geojson field is not JSON");
                empty_geodata()
            }),
        };

        let mut value = Self {
            status,
            formatted: fields.formatted.clone(),
            query: fields.query.clone(),
            geodata,
            provider: fields.provider.clone(),
            ..Self::default()
        };
        value.set_lat(&fields.lat).set_lng(&fields.lng);
        value
    }

    /// Render back into form inputs
    pub fn to_fields(&self, bits: &StatusBits) -> FormFields {
        let geojson = match &self.geodata {
            Value::Null => String::new(),
            Value::Array(items) if items.is_empty() => String::new(),
            other => other.to_string(),
        };

        FormFields {
            query: self.query.clone(),
            formatted: self.formatted.clone(),
            provider: self.provider.clone(),
            status: bits.encode(self.status).to_string(),
            lat: self.lat.clone(),
            lng: self.lng.clone(),
            geojson,
        }
    }
}

/// Renders the formatted address
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted)
    }
}

fn clamp_numeric(value: &str, min: f64, max: f64) -> String {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => n.max(min).min(max).to_string(),
        _ => String::new(),
    }
}
