//! Pass-through client for the Google Places (new) API.
//!
//! Both operations are unopinionated proxies: the client attaches the
//! credential and the fixed headers, forwards the call, and hands back the
//! provider's JSON untouched. Unlike geocoding there is no fallback, so
//! failures surface as [`GeoError`].

use serde_json::Value;

use crate::config::GeoConfig;
use crate::error::GeoError;

/// Fields requested from the place details endpoint.
pub const DETAILS_FIELD_MASK: &str = "id,formattedAddress,addressComponents";

const API_KEY_HEADER: &str = "X-Goog-Api-Key";
const FIELD_MASK_HEADER: &str = "X-Goog-FieldMask";
const SESSION_TOKEN_HEADER: &str = "X-Goog-SessionToken";

/// Client for place autocomplete and place details.
pub struct PlacesClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl PlacesClient {
    /// Create a places client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &GeoConfig) -> Result<Self, GeoError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.places_url.clone(),
            api_key: config.credential().map(ToOwned::to_owned),
        })
    }

    /// Forward an autocomplete request body to
    /// `POST /v1/places:autocomplete` and return the provider's response.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::MissingCredential`] when no key is configured,
    /// [`GeoError::Http`] on transport failure, and [`GeoError::Status`] on a
    /// non-success response.
    pub async fn autocomplete(&self, body: &Value) -> Result<Value, GeoError> {
        let key = self.key()?;
        let url = format!("{}/v1/places:autocomplete", self.base_url);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, key)
            .json(body)
            .send()
            .await?;

        read_json(response).await
    }

    /// Look up a place by id via `GET /v1/places/{place_id}` with the fixed
    /// [`DETAILS_FIELD_MASK`]. A non-blank `session_token` is forwarded so
    /// the provider can correlate it with preceding autocomplete calls.
    ///
    /// # Errors
    ///
    /// Same as [`PlacesClient::autocomplete`], plus [`GeoError::InvalidUrl`]
    /// if the base URL cannot carry a path.
    pub async fn details(
        &self,
        place_id: &str,
        session_token: Option<&str>,
    ) -> Result<Value, GeoError> {
        let key = self.key()?;
        let url = details_url(&self.base_url, place_id)?;

        let mut request = self
            .client
            .get(url)
            .header(API_KEY_HEADER, key)
            .header(FIELD_MASK_HEADER, DETAILS_FIELD_MASK);

        if let Some(token) = session_token.map(str::trim).filter(|t| !t.is_empty()) {
            request = request.header(SESSION_TOKEN_HEADER, token);
        }

        let response = request.send().await?;
        read_json(response).await
    }

    fn key(&self) -> Result<&str, GeoError> {
        self.api_key.as_deref().ok_or(GeoError::MissingCredential)
    }
}

/// Build `{base}/v1/places/{place_id}` with the id encoded as one path segment.
fn details_url(base_url: &str, place_id: &str) -> Result<reqwest::Url, GeoError> {
    let mut url = reqwest::Url::parse(base_url)
        .map_err(|e| GeoError::InvalidUrl(format!("{base_url}: {e}")))?;

    url.path_segments_mut()
        .map_err(|()| GeoError::InvalidUrl(format!("{base_url}: cannot be a base")))?
        .pop_if_empty()
        .extend(["v1", "places", place_id]);

    Ok(url)
}

/// Turn a provider response into JSON, mapping non-success statuses to
/// [`GeoError::Status`].
async fn read_json(response: reqwest::Response) -> Result<Value, GeoError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read error body".to_owned());
        tracing::warn!(status = status.as_u16(), "places provider returned an error");
        return Err(GeoError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json().await?)
}
