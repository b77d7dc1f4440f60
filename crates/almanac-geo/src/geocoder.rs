//! Address-to-coordinate lookup.
//!
//! The [`Geocoder`] trait is the seam the lifecycle manager depends on;
//! [`GoogleGeocoder`] implements it against the Google Geocoding API via
//! `reqwest`. Geocoding is best effort: every failure mode (no key, blank
//! address, transport error, bad status, empty or malformed response) yields
//! [`GeocodeOutcome::Unavailable`] rather than an error.

use std::future::Future;

use almanac_types::Coordinates;
use tracing::{debug, warn};

use crate::config::GeoConfig;
use crate::error::GeoError;

/// Result of a geocoding attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeocodeOutcome {
    /// The provider resolved the address.
    Found(Coordinates),
    /// No coordinates could be obtained, for whatever reason.
    Unavailable,
}

impl GeocodeOutcome {
    /// The resolved coordinates, if any.
    pub const fn coordinates(self) -> Option<Coordinates> {
        match self {
            Self::Found(coordinates) => Some(coordinates),
            Self::Unavailable => None,
        }
    }
}

/// Something that can turn a free-text address into coordinates.
pub trait Geocoder: Send + Sync {
    /// Resolve `address`. Never fails; degradation is reported as
    /// [`GeocodeOutcome::Unavailable`].
    fn geocode(&self, address: &str) -> impl Future<Output = GeocodeOutcome> + Send;
}

/// Client for the Google Geocoding API.
///
/// Sends `GET {geocode_url}?address=...&key=...` and reads
/// `results[0].geometry.location`.
pub struct GoogleGeocoder {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GoogleGeocoder {
    /// Create a geocoder from configuration.
    ///
    /// A missing credential is not an error: the geocoder is created in a
    /// disabled state and answers [`GeocodeOutcome::Unavailable`] without
    /// touching the network.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &GeoConfig) -> Result<Self, GeoError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint: config.geocode_url.clone(),
            api_key: config.credential().map(ToOwned::to_owned),
        })
    }

    /// Whether a credential is configured.
    pub const fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Perform the provider round-trip.
    async fn lookup(&self, address: &str, key: &str) -> Result<Option<Coordinates>, GeoError> {
        let url = geocode_url(&self.endpoint, address, key)?;

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(GeoError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response.json().await?;
        let location = extract_location(&json);
        if location.is_none() {
            debug!(
                provider_status = json.get("status").and_then(serde_json::Value::as_str),
                "geocoder returned no usable result"
            );
        }
        Ok(location)
    }
}

impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> GeocodeOutcome {
        let Some(key) = self.api_key.as_deref() else {
            debug!("geocoding skipped: no credential configured");
            return GeocodeOutcome::Unavailable;
        };

        let address = address.trim();
        if address.is_empty() {
            return GeocodeOutcome::Unavailable;
        }

        match self.lookup(address, key).await {
            Ok(Some(coordinates)) => GeocodeOutcome::Found(coordinates),
            Ok(None) => GeocodeOutcome::Unavailable,
            Err(e) => {
                warn!(error = %e, "geocoding request failed");
                GeocodeOutcome::Unavailable
            }
        }
    }
}

/// Build the request URL with `address` and `key` percent-encoded as query
/// parameters.
///
/// # Errors
///
/// Returns [`GeoError::InvalidUrl`] if `endpoint` is not a valid URL.
pub fn geocode_url(endpoint: &str, address: &str, key: &str) -> Result<reqwest::Url, GeoError> {
    reqwest::Url::parse_with_params(endpoint, &[("address", address), ("key", key)])
        .map_err(|e| GeoError::InvalidUrl(format!("{endpoint}: {e}")))
}

/// Read `results[0].geometry.location.{lat,lng}` from a geocoding response.
fn extract_location(json: &serde_json::Value) -> Option<Coordinates> {
    let location = json
        .get("results")
        .and_then(|r| r.get(0))
        .and_then(|r| r.get("geometry"))
        .and_then(|g| g.get("location"))?;

    let lat = location.get("lat").and_then(serde_json::Value::as_f64)?;
    let lng = location.get("lng").and_then(serde_json::Value::as_f64)?;

    (lat.is_finite() && lng.is_finite()).then_some(Coordinates::new(lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_encodes_spaces_and_punctuation() {
        let url = geocode_url(
            "https://maps.googleapis.com/maps/api/geocode/json",
            "123 Main St, Deadwood & Lead, SD",
            "k3y",
        );
        let url = url.map(String::from).unwrap_or_default();
        assert_eq!(
            url,
            "https://maps.googleapis.com/maps/api/geocode/json?address=123+Main+St%2C+Deadwood+%26+Lead%2C+SD&key=k3y"
        );
    }

    #[test]
    fn bad_endpoint_is_invalid_url() {
        assert!(matches!(
            geocode_url("not a url", "x", "k"),
            Err(GeoError::InvalidUrl(_))
        ));
    }

    #[test]
    fn extract_first_result() {
        let json = serde_json::json!({
            "status": "OK",
            "results": [
                {"geometry": {"location": {"lat": 44.4097, "lng": -103.5091}}},
                {"geometry": {"location": {"lat": 1.0, "lng": 2.0}}}
            ]
        });
        let found = extract_location(&json);
        assert_eq!(found, Some(Coordinates::new(44.4097, -103.5091)));
    }

    #[test]
    fn extract_handles_empty_and_malformed() {
        let empty = serde_json::json!({"status": "ZERO_RESULTS", "results": []});
        assert_eq!(extract_location(&empty), None);

        let no_geometry = serde_json::json!({"results": [{"formatted_address": "x"}]});
        assert_eq!(extract_location(&no_geometry), None);

        let string_lat = serde_json::json!({
            "results": [{"geometry": {"location": {"lat": "44.1", "lng": -103.0}}}]
        });
        assert_eq!(extract_location(&string_lat), None);

        assert_eq!(extract_location(&serde_json::json!({"error_message": "denied"})), None);
    }

    #[tokio::test]
    async fn no_credential_is_unavailable() {
        let geocoder = GoogleGeocoder::new(&GeoConfig::new(None));
        let outcome = match geocoder {
            Ok(g) => g.geocode("1 Main St").await,
            Err(_) => GeocodeOutcome::Found(Coordinates::new(0.0, 0.0)),
        };
        assert_eq!(outcome, GeocodeOutcome::Unavailable);
    }

    #[tokio::test]
    async fn blank_address_is_unavailable_without_network() {
        // Blank input short-circuits before any request is built.
        let config = GeoConfig::new(Some(String::from("key")))
            .with_geocode_url("http://127.0.0.1:9/geocode");
        let outcome = match GoogleGeocoder::new(&config) {
            Ok(g) => g.geocode("   ").await,
            Err(_) => GeocodeOutcome::Found(Coordinates::new(0.0, 0.0)),
        };
        assert_eq!(outcome, GeocodeOutcome::Unavailable);
    }
}
