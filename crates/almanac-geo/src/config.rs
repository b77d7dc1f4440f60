//! Provider configuration for the geocoding and places clients.
//!
//! Credentials and endpoints are passed to each client at construction.
//! Nothing in this crate reads the environment; the binary builds a
//! [`GeoConfig`] from its own settings.

use std::time::Duration;

/// Default Google Geocoding endpoint.
pub const DEFAULT_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Default Google Places (new) API base URL.
pub const DEFAULT_PLACES_URL: &str = "https://places.googleapis.com";

/// Default timeout applied to every provider HTTP call, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

/// Settings shared by the geocoding and places clients.
#[derive(Clone)]
pub struct GeoConfig {
    /// Provider API key. `None` (or blank) disables both providers.
    pub api_key: Option<String>,
    /// Full URL of the geocoding endpoint.
    pub geocode_url: String,
    /// Base URL of the places API (no trailing slash).
    pub places_url: String,
    /// Per-request timeout for provider calls.
    pub timeout: Duration,
}

impl GeoConfig {
    /// Create a configuration with the default endpoints and timeout.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            geocode_url: DEFAULT_GEOCODE_URL.to_owned(),
            places_url: DEFAULT_PLACES_URL.to_owned(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Override the geocoding endpoint.
    #[must_use]
    pub fn with_geocode_url(mut self, url: &str) -> Self {
        url.clone_into(&mut self.geocode_url);
        self
    }

    /// Override the places base URL. A trailing slash is dropped.
    #[must_use]
    pub fn with_places_url(mut self, url: &str) -> Self {
        url.trim_end_matches('/').clone_into(&mut self.places_url);
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The API key, if one is configured and non-blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl core::fmt::Debug for GeoConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GeoConfig")
            .field("api_key", &self.credential().map(|_| "<redacted>"))
            .field("geocode_url", &self.geocode_url)
            .field("places_url", &self.places_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_key_is_no_credential() {
        assert_eq!(GeoConfig::new(None).credential(), None);
        assert_eq!(GeoConfig::new(Some(String::from("   "))).credential(), None);
        assert_eq!(
            GeoConfig::new(Some(String::from("abc"))).credential(),
            Some("abc")
        );
    }

    #[test]
    fn debug_redacts_key() {
        let config = GeoConfig::new(Some(String::from("secret-key")));
        let printed = format!("{config:?}");
        assert!(!printed.contains("secret-key"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn places_url_drops_trailing_slash() {
        let config = GeoConfig::new(None).with_places_url("http://127.0.0.1:9000/");
        assert_eq!(config.places_url, "http://127.0.0.1:9000");
    }
}
