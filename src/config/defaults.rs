//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Zoom used when no location is set yet
pub const DEFAULT_INITIAL_ZOOM: u8 = 5;

/// Zoom used when showing a single location
pub const DEFAULT_DETAIL_ZOOM: u8 = 15;

/// Duration of the animated recentring in milliseconds
pub const DEFAULT_FLY_DURATION_MS: u64 = 600;

/// Autocomplete only queries the endpoint from this many characters on
pub const DEFAULT_MIN_QUERY_LENGTH: usize = 2;

/// Map center used when the field is empty (`[lat, lng]`)
pub const DEFAULT_CENTER: [f64; 2] = [51.1657, 10.4515];

/// Label shown when a lookup found nothing
pub const DEFAULT_NOT_FOUND_LABEL: &str = "Not found";

/// Label of the popup action committing a previewed location
pub const DEFAULT_APPLY_LABEL: &str = "Apply";

/// Default endpoint kind
pub const DEFAULT_ENDPOINT_KIND: &str = "nominatim";

/// Default response language
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default number of autocomplete candidates requested
pub const DEFAULT_LIMIT: usize = 5;

/// Default HTTP timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default address mapping (provider label)
pub const DEFAULT_FORMATTER: &str = "native";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "geocoder-field";
