//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/geocoder-field/config.toml

pub mod defaults;

use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::map::TileLayer;
use crate::widget::options::{Labels, WidgetOptions};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Widget behavior
    #[serde(default)]
    pub widget: WidgetConfig,

    /// User-visible labels
    #[serde(default)]
    pub labels: LabelsConfig,

    /// Map tiles
    #[serde(default)]
    pub map: MapConfig,

    /// Geocoding endpoint
    #[serde(default)]
    pub endpoint: EndpointConfig,
}

/// Widget behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Zoom when the field is empty
    #[serde(default = "default_initial_zoom")]
    pub initial_zoom: u8,

    /// Zoom when a location is shown
    #[serde(default = "default_detail_zoom")]
    pub detail_zoom: u8,

    /// Recentring animation length in milliseconds
    #[serde(default = "default_fly_duration_ms")]
    pub fly_duration_ms: u64,

    /// Minimum query length before autocomplete asks the endpoint
    #[serde(default = "default_min_query_length")]
    pub min_query_length: usize,

    /// Map center for empty fields, `[lat, lng]`
    #[serde(default = "default_center")]
    pub default_center: [f64; 2],
}

/// User-visible labels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelsConfig {
    #[serde(default = "default_not_found")]
    pub not_found: String,

    #[serde(default = "default_apply")]
    pub apply: String,
}

/// Map tiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_tile_url")]
    pub tile_url: String,

    #[serde(default = "default_attribution")]
    pub attribution: String,
}

/// Geocoding endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// "nominatim" or "ajax"
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Ajax URL, or a Nominatim base URL (empty: public instance)
    #[serde(default)]
    pub url: String,

    /// Response language
    #[serde(default = "default_language")]
    pub language: String,

    /// Number of candidates requested
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Address mapping, e.g. "%S %n, %z %L", or "native"
    #[serde(default = "default_formatter")]
    pub formatter: String,
}

// Default value functions for serde
fn default_initial_zoom() -> u8 {
    DEFAULT_INITIAL_ZOOM
}
fn default_detail_zoom() -> u8 {
    DEFAULT_DETAIL_ZOOM
}
fn default_fly_duration_ms() -> u64 {
    DEFAULT_FLY_DURATION_MS
}
fn default_min_query_length() -> usize {
    DEFAULT_MIN_QUERY_LENGTH
}
fn default_center() -> [f64; 2] {
    DEFAULT_CENTER
}
fn default_not_found() -> String {
    DEFAULT_NOT_FOUND_LABEL.to_string()
}
fn default_apply() -> String {
    DEFAULT_APPLY_LABEL.to_string()
}
fn default_tile_url() -> String {
    TileLayer::default().url
}
fn default_attribution() -> String {
    TileLayer::default().attribution
}
fn default_kind() -> String {
    DEFAULT_ENDPOINT_KIND.to_string()
}
fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}
fn default_limit() -> usize {
    DEFAULT_LIMIT
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_formatter() -> String {
    DEFAULT_FORMATTER.to_string()
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            initial_zoom: default_initial_zoom(),
            detail_zoom: default_detail_zoom(),
            fly_duration_ms: default_fly_duration_ms(),
            min_query_length: default_min_query_length(),
            default_center: default_center(),
        }
    }
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            not_found: default_not_found(),
            apply: default_apply(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_url: default_tile_url(),
            attribution: default_attribution(),
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            url: String::new(),
            language: default_language(),
            limit: default_limit(),
            timeout_secs: default_timeout_secs(),
            formatter: default_formatter(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["widget", "initial_zoom"] => Some(self.widget.initial_zoom.to_string()),
            ["widget", "detail_zoom"] => Some(self.widget.detail_zoom.to_string()),
            ["widget", "fly_duration_ms"] => Some(self.widget.fly_duration_ms.to_string()),
            ["widget", "min_query_length"] => Some(self.widget.min_query_length.to_string()),
            ["widget", "default_center"] => Some(format!(
                "{},{}",
                self.widget.default_center[0], self.widget.default_center[1]
            )),

            ["labels", "not_found"] => Some(self.labels.not_found.clone()),
            ["labels", "apply"] => Some(self.labels.apply.clone()),

            ["map", "tile_url"] => Some(self.map.tile_url.clone()),
            ["map", "attribution"] => Some(self.map.attribution.clone()),

            ["endpoint", "kind"] => Some(self.endpoint.kind.clone()),
            ["endpoint", "url"] => Some(self.endpoint.url.clone()),
            ["endpoint", "language"] => Some(self.endpoint.language.clone()),
            ["endpoint", "limit"] => Some(self.endpoint.limit.to_string()),
            ["endpoint", "timeout_secs"] => Some(self.endpoint.timeout_secs.to_string()),
            ["endpoint", "formatter"] => Some(self.endpoint.formatter.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["widget", "initial_zoom"] => {
                self.widget.initial_zoom = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid zoom value: {}", value))
                })?;
            }
            ["widget", "detail_zoom"] => {
                self.widget.detail_zoom = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid zoom value: {}", value))
                })?;
            }
            ["widget", "fly_duration_ms"] => {
                self.widget.fly_duration_ms = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid duration value: {}", value))
                })?;
            }
            ["widget", "min_query_length"] => {
                self.widget.min_query_length = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid length value: {}", value))
                })?;
            }
            ["widget", "default_center"] => {
                self.widget.default_center = parse_center(value)?;
            }

            ["labels", "not_found"] => {
                self.labels.not_found = value.to_string();
            }
            ["labels", "apply"] => {
                self.labels.apply = value.to_string();
            }

            ["map", "tile_url"] => {
                self.map.tile_url = value.to_string();
            }
            ["map", "attribution"] => {
                self.map.attribution = value.to_string();
            }

            ["endpoint", "kind"] => {
                value
                    .parse::<crate::endpoint::EndpointKind>()
                    .map_err(Error::Config)?;
                self.endpoint.kind = value.to_lowercase();
            }
            ["endpoint", "url"] => {
                self.endpoint.url = value.to_string();
            }
            ["endpoint", "language"] => {
                self.endpoint.language = value.to_string();
            }
            ["endpoint", "limit"] => {
                self.endpoint.limit = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid limit value: {}", value))
                })?;
            }
            ["endpoint", "timeout_secs"] => {
                self.endpoint.timeout_secs = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid timeout value: {}", value))
                })?;
            }
            ["endpoint", "formatter"] => {
                self.endpoint.formatter = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "widget.initial_zoom",
            "widget.detail_zoom",
            "widget.fly_duration_ms",
            "widget.min_query_length",
            "widget.default_center",
            "labels.not_found",
            "labels.apply",
            "map.tile_url",
            "map.attribution",
            "endpoint.kind",
            "endpoint.url",
            "endpoint.language",
            "endpoint.limit",
            "endpoint.timeout_secs",
            "endpoint.formatter",
        ]
    }

    /// Typed widget options built from this configuration
    pub fn widget_options(&self) -> WidgetOptions {
        let [lat, lng] = self.widget.default_center;
        WidgetOptions {
            initial_zoom: self.widget.initial_zoom,
            detail_zoom: self.widget.detail_zoom,
            fly_duration: Duration::from_millis(self.widget.fly_duration_ms),
            min_query_length: self.widget.min_query_length,
            default_center: Coordinates::clamped(lat, lng),
            labels: Labels {
                not_found: self.labels.not_found.clone(),
                apply: self.labels.apply.clone(),
            },
            tile_layer: TileLayer {
                url: self.map.tile_url.clone(),
                attribution: self.map.attribution.clone(),
            },
            ..WidgetOptions::default()
        }
    }
}

/// Parse "lat,lng"
fn parse_center(value: &str) -> Result<[f64; 2]> {
    let invalid = || Error::Config(format!("Invalid center value (expected lat,lng): {}", value));

    let (lat, lng) = value.split_once(',').ok_or_else(invalid)?;
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;

    let center = Coordinates::new(lat, lng);
    if !center.is_in_range() {
        return Err(invalid());
    }
    Ok([lat, lng])
}
