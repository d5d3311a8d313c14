//! Host ajax endpoint
//!
//! The CMS module answers `GET <url>?q=geocoder=<term>` and
//! `GET <url>?q=geocoder.reverse=<lat>,<lng>` with a match list.

use crate::config::EndpointConfig;
use crate::constants::api::{FORWARD_QUERY_PREFIX, REVERSE_QUERY_PREFIX, USER_AGENT};
use crate::coord::Coordinates;
use crate::endpoint::{GeocodeEndpoint, MatchResponse};
use crate::error::{Error, Result};
use std::time::Duration;
use tracing::debug;

/// Client for the host's geocoder ajax URL
#[derive(Debug, Clone)]
pub struct AjaxEndpoint {
    client: reqwest::Client,
    url: String,
}

impl AjaxEndpoint {
    /// Create a client for `url`
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(Error::Config("Ajax endpoint needs a url".to_string()));
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, url })
    }

    pub fn from_config(config: &EndpointConfig) -> Result<Self> {
        Self::new(config.url.clone(), Duration::from_secs(config.timeout_secs))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Value of the `q` parameter for a forward lookup
    pub fn forward_param(term: &str) -> String {
        format!("{}{}", FORWARD_QUERY_PREFIX, term)
    }

    /// Value of the `q` parameter for a reverse lookup
    pub fn reverse_param(coords: Coordinates) -> String {
        format!("{}{},{}", REVERSE_QUERY_PREFIX, coords.lat, coords.lng)
    }

    async fn fetch(&self, q: String) -> Result<MatchResponse> {
        debug!(url = %self.url, q = %q, "geocoder ajax request");

        let response = self
            .client
            .get(&self.url)
            .query(&[("q", q.as_str())])
            .send()
            .await
            .map_err(|e| Error::Endpoint(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Endpoint(format!(
                "Endpoint returned status: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Endpoint(format!("Failed to parse endpoint response: {}", e)))
    }
}

impl GeocodeEndpoint for AjaxEndpoint {
    async fn query(&self, term: &str) -> Result<MatchResponse> {
        self.fetch(Self::forward_param(term)).await
    }

    async fn reverse(&self, coords: Coordinates) -> Result<MatchResponse> {
        self.fetch(Self::reverse_param(coords)).await
    }
}
