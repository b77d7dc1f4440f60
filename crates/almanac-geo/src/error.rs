//! Error types for provider calls.
//!
//! Only the places pass-through surfaces [`GeoError`]; geocoding failures are
//! folded into [`GeocodeOutcome::Unavailable`](crate::GeocodeOutcome).

/// Errors that can occur when calling an external geo provider.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    /// No API key is configured.
    #[error("provider credential is not configured")]
    MissingCredential,

    /// Building the client or sending the request failed.
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("provider returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// A provider URL could not be constructed.
    #[error("invalid provider URL: {0}")]
    InvalidUrl(String),
}
