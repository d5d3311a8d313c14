//! Nominatim geocoding endpoint (OpenStreetMap)
//!
//! Uses the free Nominatim API and converts its results into the match list
//! the widget consumes. Each match carries a point feature whose properties
//! hold the structured address and `providedBy = "nominatim"`.
//! Rate limit: 1 request per second (enforced by User-Agent requirement)

use crate::config::EndpointConfig;
use crate::constants::api::{NOMINATIM_PROVIDER, NOMINATIM_URL, USER_AGENT};
use crate::coord::Coordinates;
use crate::endpoint::formatter::{Address, AddressFormatter};
use crate::endpoint::{GeocodeEndpoint, Match, MatchResponse};
use crate::error::{Error, Result};
use crate::geojson::{GeoFeature, PROVIDER_PROPERTY};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;

/// Nominatim endpoint
#[derive(Debug, Clone)]
pub struct NominatimEndpoint {
    client: reqwest::Client,
    base_url: String,
    language: String,
    limit: usize,
    formatter: AddressFormatter,
}

/// Nominatim result item (`format=jsonv2`)
#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    display_name: String,
    #[serde(default)]
    address: Option<NominatimAddress>,
}

/// Nominatim `addressdetails=1` block
#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    road: Option<String>,
    pedestrian: Option<String>,
    house_number: Option<String>,
    postcode: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    hamlet: Option<String>,
    municipality: Option<String>,
    suburb: Option<String>,
    city_district: Option<String>,
    borough: Option<String>,
    state: Option<String>,
    country: Option<String>,
    country_code: Option<String>,
}

impl From<NominatimAddress> for Address {
    fn from(a: NominatimAddress) -> Self {
        Address {
            street_name: a.road.or(a.pedestrian),
            street_number: a.house_number,
            postal_code: a.postcode,
            locality: a
                .city
                .or(a.town)
                .or(a.village)
                .or(a.hamlet)
                .or(a.municipality),
            sub_locality: a.suburb.or(a.city_district).or(a.borough),
            admin_level_1: a.state,
            country: a.country,
            country_code: a.country_code,
        }
    }
}

impl NominatimEndpoint {
    /// Create a new Nominatim endpoint against the public instance
    pub fn new() -> Result<Self> {
        Self::with_options(
            NOMINATIM_URL,
            "en",
            5,
            AddressFormatter::native(),
            Duration::from_secs(10),
        )
    }

    /// Create an endpoint against any Nominatim instance
    pub fn with_options(
        base_url: &str,
        language: &str,
        limit: usize,
        formatter: AddressFormatter,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            language: language.to_string(),
            limit: limit.max(1),
            formatter,
        })
    }

    pub fn from_config(config: &EndpointConfig) -> Result<Self> {
        let base_url = if config.url.trim().is_empty() {
            NOMINATIM_URL
        } else {
            config.url.as_str()
        };
        Self::with_options(
            base_url,
            &config.language,
            config.limit,
            AddressFormatter::new(&config.formatter),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Parse lat/lng strings to f64
    fn parse_coords(lat: &str, lng: &str) -> Result<(f64, f64)> {
        let lat: f64 = lat
            .parse()
            .map_err(|_| Error::Endpoint(format!("Invalid latitude: {}", lat)))?;
        let lng: f64 = lng
            .parse()
            .map_err(|_| Error::Endpoint(format!("Invalid longitude: {}", lng)))?;
        Ok((lat, lng))
    }

    /// Turn one Nominatim result into a widget match
    fn to_match(&self, result: NominatimResult) -> Result<Match> {
        let (lat, lng) = Self::parse_coords(&result.lat, &result.lon)?;
        let address: Address = result.address.unwrap_or_default().into();
        let title = self.formatter.format(&address, &result.display_name);

        let mut properties = match serde_json::to_value(&address)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        properties.insert(
            PROVIDER_PROPERTY.to_string(),
            Value::String(NOMINATIM_PROVIDER.to_string()),
        );
        properties.insert(
            "displayName".to_string(),
            Value::String(result.display_name),
        );
        properties.insert("formattedAddress".to_string(), Value::String(title.clone()));

        let feature = GeoFeature::point(Coordinates::clamped(lat, lng), properties);
        Ok(Match::new(title, feature.to_json_string()?))
    }

    async fn get_json(&self, url: &str) -> Result<Option<Value>> {
        debug!(url = %url, "nominatim request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Endpoint(format!("Nominatim request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Error::Endpoint(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let value = response
            .json()
            .await
            .map_err(|e| Error::Endpoint(format!("Failed to parse Nominatim response: {}", e)))?;
        Ok(Some(value))
    }

    /// Convert a search response (array) into matches
    fn search_matches(&self, value: Value) -> Result<MatchResponse> {
        let results: Vec<NominatimResult> = serde_json::from_value(value)
            .map_err(|e| Error::Endpoint(format!("Failed to parse Nominatim response: {}", e)))?;

        let matches = results
            .into_iter()
            .map(|result| self.to_match(result))
            .collect::<Result<Vec<_>>>()?;
        Ok(MatchResponse::new(matches))
    }

    /// Convert a reverse response (single object or error object)
    fn reverse_matches(&self, value: Value) -> Result<MatchResponse> {
        if value.get("error").is_some() {
            return Ok(MatchResponse::default());
        }

        let result: NominatimResult = serde_json::from_value(value)
            .map_err(|e| Error::Endpoint(format!("Failed to parse Nominatim response: {}", e)))?;
        Ok(MatchResponse::new(vec![self.to_match(result)?]))
    }
}

impl GeocodeEndpoint for NominatimEndpoint {
    async fn query(&self, term: &str) -> Result<MatchResponse> {
        let url = format!(
            "{}/search?q={}&format=jsonv2&addressdetails=1&limit={}&accept-language={}",
            self.base_url,
            urlencoding::encode(term),
            self.limit,
            urlencoding::encode(&self.language)
        );

        match self.get_json(&url).await? {
            Some(value) => self.search_matches(value),
            None => Ok(MatchResponse::default()),
        }
    }

    async fn reverse(&self, coords: Coordinates) -> Result<MatchResponse> {
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=jsonv2&addressdetails=1&accept-language={}",
            self.base_url,
            coords.lat,
            coords.lng,
            urlencoding::encode(&self.language)
        );

        match self.get_json(&url).await? {
            Some(value) => self.reverse_matches(value),
            None => Ok(MatchResponse::default()),
        }
    }
}
