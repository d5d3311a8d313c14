//! Geocoding endpoint clients
//!
//! The widget consumes one response shape, `{"matches": [{"title", "name"}]}`,
//! where `name` is a serialized GeoJSON point feature. `AjaxEndpoint` talks
//! to a host that already serves that shape; `NominatimEndpoint` builds it
//! from OpenStreetMap Nominatim results.

pub mod ajax;
pub mod formatter;
pub mod nominatim;

use crate::config::EndpointConfig;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::future::Future;

pub use ajax::AjaxEndpoint;
pub use formatter::{Address, AddressFormatter};
pub use nominatim::NominatimEndpoint;

/// One raw match returned by the endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Human-readable label
    #[serde(default)]
    pub title: String,
    /// Serialized GeoJSON feature
    #[serde(default)]
    pub name: String,
    /// Anything else the endpoint sent along
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Match {
    pub fn new(title: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            name: name.into(),
            extra: Map::new(),
        }
    }

    /// Convert into a selectable item carrying the total match count
    ///
    /// A missing or empty `title` or `name` leaves the item incomplete.
    pub fn to_item(&self, total: usize) -> SelectableItem {
        let present = |s: &str| (!s.is_empty()).then(|| s.to_string());
        SelectableItem {
            label: present(&self.title),
            value: present(&self.name),
            total: Some(total),
        }
    }
}

/// Endpoint response body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    #[serde(default)]
    pub matches: Vec<Match>,
}

impl MatchResponse {
    pub fn new(matches: Vec<Match>) -> Self {
        Self { matches }
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// All matches as items, each carrying the total count
    pub fn to_items(&self) -> Vec<SelectableItem> {
        let total = self.matches.len();
        self.matches.iter().map(|m| m.to_item(total)).collect()
    }
}

/// An entry of the autocomplete list
///
/// `label` and `value` are optional so that incomplete items coming from a
/// host can be represented and rejected by the widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectableItem {
    #[serde(default)]
    pub label: Option<String>,
    /// Serialized GeoJSON feature
    #[serde(default)]
    pub value: Option<String>,
    /// How many matches this item was chosen from
    #[serde(default)]
    pub total: Option<usize>,
}

impl SelectableItem {
    pub fn new(label: impl Into<String>, value: impl Into<String>, total: usize) -> Self {
        Self {
            label: Some(label.into()),
            value: Some(value.into()),
            total: Some(total),
        }
    }

    /// Both label and value are present
    pub fn is_complete(&self) -> bool {
        self.label.is_some() && self.value.is_some()
    }
}

/// Trait for geocoding endpoints
pub trait GeocodeEndpoint: Send + Sync {
    /// Forward lookup of a free-text query
    fn query(&self, term: &str) -> impl Future<Output = Result<MatchResponse>> + Send;

    /// Reverse lookup of a position
    fn reverse(&self, coords: Coordinates) -> impl Future<Output = Result<MatchResponse>> + Send;
}

/// Supported endpoint kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    /// Host CMS ajax endpoint already answering with matches
    Ajax,
    /// OpenStreetMap Nominatim
    Nominatim,
}

impl std::str::FromStr for EndpointKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ajax" | "host" => Ok(Self::Ajax),
            "nominatim" | "osm" => Ok(Self::Nominatim),
            _ => Err(format!("Unknown endpoint kind: {}", s)),
        }
    }
}

impl std::fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ajax => write!(f, "ajax"),
            Self::Nominatim => write!(f, "nominatim"),
        }
    }
}

/// Endpoint selected by configuration
#[derive(Debug, Clone)]
pub enum AnyEndpoint {
    Ajax(AjaxEndpoint),
    Nominatim(NominatimEndpoint),
}

impl GeocodeEndpoint for AnyEndpoint {
    async fn query(&self, term: &str) -> Result<MatchResponse> {
        match self {
            Self::Ajax(endpoint) => endpoint.query(term).await,
            Self::Nominatim(endpoint) => endpoint.query(term).await,
        }
    }

    async fn reverse(&self, coords: Coordinates) -> Result<MatchResponse> {
        match self {
            Self::Ajax(endpoint) => endpoint.reverse(coords).await,
            Self::Nominatim(endpoint) => endpoint.reverse(coords).await,
        }
    }
}

/// Build the endpoint described by the configuration
pub fn get_endpoint(config: &EndpointConfig) -> Result<AnyEndpoint> {
    let kind: EndpointKind = config.kind.parse().map_err(Error::Config)?;
    match kind {
        EndpointKind::Ajax => Ok(AnyEndpoint::Ajax(AjaxEndpoint::from_config(config)?)),
        EndpointKind::Nominatim => Ok(AnyEndpoint::Nominatim(NominatimEndpoint::from_config(
            config,
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_response_without_matches_is_empty() {
        let response: MatchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.is_empty());
    }

    #[test]
    fn test_match_keeps_extra_fields() {
        let raw = r#"{"matches":[{"title":"Berlin","name":"{}","provider":"x"}]}"#;
        let response: MatchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.matches[0].title, "Berlin");
        assert_eq!(response.matches[0].extra["provider"], "x");
    }

    #[test]
    fn test_match_without_name_is_incomplete() {
        let raw = r#"{"matches":[{"title":"A"},{"title":"B","name":"{}"}]}"#;
        let response: MatchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.matches.len(), 2);

        let items = response.to_items();
        assert_eq!(items[0].label.as_deref(), Some("A"));
        assert_eq!(items[0].value, None);
        assert!(!items[0].is_complete());
        assert_eq!(items[1], SelectableItem::new("B", "{}", 2));
    }

    #[test]
    fn test_to_items_carries_total() {
        let response = MatchResponse::new(vec![Match::new("A", "a"), Match::new("B", "b")]);
        let items = response.to_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1], SelectableItem::new("B", "b", 2));
    }

    #[test]
    fn test_item_completeness() {
        assert!(SelectableItem::new("a", "b", 1).is_complete());
        let item: SelectableItem = serde_json::from_str(r#"{"label":"only"}"#).unwrap();
        assert!(!item.is_complete());
        assert_eq!(item.total, None);
    }

    #[test]
    fn test_endpoint_kind_from_str() {
        assert_eq!("ajax".parse::<EndpointKind>(), Ok(EndpointKind::Ajax));
        assert_eq!("Nominatim".parse::<EndpointKind>(), Ok(EndpointKind::Nominatim));
        assert!("google".parse::<EndpointKind>().is_err());
    }

    #[test]
    fn test_get_endpoint() {
        let mut config = Config::default();
        assert!(matches!(
            get_endpoint(&config.endpoint).unwrap(),
            AnyEndpoint::Nominatim(_)
        ));

        config.endpoint.kind = "ajax".to_string();
        config.endpoint.url = "http://localhost/geocoder".to_string();
        assert!(matches!(get_endpoint(&config.endpoint).unwrap(), AnyEndpoint::Ajax(_)));

        config.endpoint.kind = "unknown".to_string();
        assert!(matches!(get_endpoint(&config.endpoint), Err(Error::Config(_))));
    }
}
