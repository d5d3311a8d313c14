//! GeoJSON point features
//!
//! The geocoding endpoint serializes each match as a GeoJSON `Feature` with a
//! `Point` geometry. Only that shape is accepted here; other geometry types
//! are rejected at parse time so the widget never places a marker it cannot
//! position.

use crate::coord::Coordinates;
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Property naming the geocoder that produced a feature
pub const PROVIDER_PROPERTY: &str = "providedBy";

/// Point geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[lng, lat]`, optionally followed by an altitude
    pub coordinates: Vec<f64>,
}

/// A GeoJSON feature holding one point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoFeature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Geometry,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Map::is_empty"
    )]
    pub properties: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,
}

impl GeoFeature {
    /// Build a point feature at `coords`
    pub fn point(coords: Coordinates, properties: Map<String, Value>) -> Self {
        Self {
            kind: "Feature".to_string(),
            geometry: Geometry {
                kind: "Point".to_string(),
                coordinates: coords.to_position().to_vec(),
            },
            properties,
            bbox: None,
        }
    }

    /// Parse a serialized feature, as found in a selectable item's value
    pub fn parse(raw: &str) -> Result<Self> {
        let feature: Self = serde_json::from_str(raw)
            .map_err(|e| Error::InvalidGeoJson(format!("Failed to parse feature: {}", e)))?;
        feature.validate()?;
        Ok(feature)
    }

    /// Parse a feature from an already decoded JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        let feature: Self = serde_json::from_value(value)
            .map_err(|e| Error::InvalidGeoJson(format!("Failed to parse feature: {}", e)))?;
        feature.validate()?;
        Ok(feature)
    }

    fn validate(&self) -> Result<()> {
        if self.kind != "Feature" {
            return Err(Error::InvalidGeoJson(format!(
                "Expected a Feature, got {}",
                self.kind
            )));
        }
        if self.geometry.kind != "Point" {
            return Err(Error::InvalidGeoJson(format!(
                "Expected a Point geometry, got {}",
                self.geometry.kind
            )));
        }
        if self.geometry.coordinates.len() < 2 {
            return Err(Error::InvalidGeoJson(
                "Point needs at least two coordinates".to_string(),
            ));
        }
        if !self.geometry.coordinates.iter().all(|c| c.is_finite()) {
            return Err(Error::InvalidGeoJson(
                "Point coordinates must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// The `[lng, lat]` position
    pub fn position(&self) -> [f64; 2] {
        [self.geometry.coordinates[0], self.geometry.coordinates[1]]
    }

    /// Marker position, clamped into range
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::from_position(self.position())
    }

    /// Move the point, keeping every other member
    pub fn set_coordinates(&mut self, coords: Coordinates) {
        let [lng, lat] = coords.to_position();
        self.geometry.coordinates[0] = lng;
        self.geometry.coordinates[1] = lat;
    }

    /// The geocoder that produced this feature, if recorded
    pub fn provider(&self) -> Option<&str> {
        self.properties.get(PROVIDER_PROPERTY).and_then(Value::as_str)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Cheap structural check used on stored payloads: an object with a `type`
pub fn looks_like_geojson(value: &Value) -> bool {
    value.as_object().is_some_and(|object| object.contains_key("type"))
}
