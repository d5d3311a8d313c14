//! Coordinate sanitizing
//!
//! Turns raw lat/lng input (form field text, numbers, or a GeoJSON style
//! pair) into clamped `Coordinates`. Out-of-range values are pulled to the
//! nearest bound; non-numeric values are rejected instead of being coerced.

use crate::coord::Coordinates;
use crate::error::{Error, Result};

/// A single raw coordinate component
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Missing,
    Number(f64),
    Text(String),
}

impl RawValue {
    fn is_blank(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Number(_) => false,
            Self::Text(text) => text.trim().is_empty(),
        }
    }

    fn to_number(&self, axis: &str) -> Result<f64> {
        let value = match self {
            Self::Missing => {
                return Err(Error::InvalidCoordinates(format!("{} is missing", axis)));
            }
            Self::Number(n) => *n,
            Self::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                Error::InvalidCoordinates(format!("{} is not a number: {:?}", axis, text))
            })?,
        };

        if !value.is_finite() {
            return Err(Error::InvalidCoordinates(format!(
                "{} is not finite: {}",
                axis, value
            )));
        }
        Ok(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// The latitude argument: a scalar, or an ordered pair carrying both values
#[derive(Debug, Clone, PartialEq)]
pub enum CoordInput {
    Value(RawValue),
    Pair(RawValue, RawValue),
}

impl From<RawValue> for CoordInput {
    fn from(value: RawValue) -> Self {
        Self::Value(value)
    }
}

impl From<f64> for CoordInput {
    fn from(value: f64) -> Self {
        Self::Value(RawValue::Number(value))
    }
}

impl From<&str> for CoordInput {
    fn from(value: &str) -> Self {
        Self::Value(RawValue::from(value))
    }
}

impl From<String> for CoordInput {
    fn from(value: String) -> Self {
        Self::Value(RawValue::Text(value))
    }
}

impl From<[f64; 2]> for CoordInput {
    fn from(pair: [f64; 2]) -> Self {
        Self::Pair(RawValue::Number(pair[0]), RawValue::Number(pair[1]))
    }
}

/// Sanitize a lat/lng pair
///
/// When `lat` is a pair, `lng` is ignored and the pair is unpacked as
/// `(lat, lng)`, or `(lng, lat)` when `reverse` is set (GeoJSON order).
///
/// Returns `Ok(None)` when both components are blank.
pub fn sanitize(
    lat: impl Into<CoordInput>,
    lng: impl Into<RawValue>,
    reverse: bool,
) -> Result<Option<Coordinates>> {
    let (lat, lng) = match lat.into() {
        CoordInput::Value(lat) => (lat, lng.into()),
        CoordInput::Pair(a, b) if reverse => (b, a),
        CoordInput::Pair(a, b) => (a, b),
    };

    match (lat.is_blank(), lng.is_blank()) {
        (true, true) => return Ok(None),
        (true, false) | (false, true) => {
            return Err(Error::InvalidCoordinates(
                "latitude and longitude must both be set or both be empty".to_string(),
            ));
        }
        (false, false) => {}
    }

    let lat = lat.to_number("latitude")?;
    let lng = lng.to_number("longitude")?;

    Ok(Some(Coordinates::clamped(lat, lng)))
}
