//! Centralized constants for the geocoder-field crate
//!
//! Values shared by the widget, the endpoint clients and the configuration
//! defaults live here so they stay consistent.

/// Geographic bounds
pub mod geo {
    /// Smallest valid latitude
    pub const MIN_LAT: f64 = -90.0;

    /// Largest valid latitude
    pub const MAX_LAT: f64 = 90.0;

    /// Smallest valid longitude
    pub const MIN_LNG: f64 = -180.0;

    /// Largest valid longitude
    pub const MAX_LNG: f64 = 180.0;
}

/// External API endpoints and request conventions
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// User agent sent to geocoding services
    pub const USER_AGENT: &str = concat!("geocoder-field/", env!("CARGO_PKG_VERSION"));

    /// Prefix of a forward query sent to the host ajax endpoint
    pub const FORWARD_QUERY_PREFIX: &str = "geocoder=";

    /// Prefix of a reverse query sent to the host ajax endpoint
    pub const REVERSE_QUERY_PREFIX: &str = "geocoder.reverse=";

    /// Provider id written into features built from Nominatim results
    pub const NOMINATIM_PROVIDER: &str = "nominatim";
}

/// Map presentation
pub mod map {
    /// OpenStreetMap raster tiles
    pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

    /// Attribution required by the OpenStreetMap tile usage policy
    pub const TILE_ATTRIBUTION: &str =
        "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

    /// Maximum popup width in pixels
    pub const POPUP_MAX_WIDTH: u32 = 195;
}
