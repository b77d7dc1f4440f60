//! Error types for the HTTP layer.
//!
//! [`ApiError`] unifies service, provider, identity, and request-shape
//! failures into one enum that converts into a JSON response via its
//! [`IntoResponse`] implementation.

use almanac_core::ServiceError;
use almanac_geo::GeoError;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors that can occur while serving a request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The lifecycle or search layer refused or failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The places provider failed.
    #[error(transparent)]
    Places(#[from] GeoError),

    /// The caller identity header is missing or malformed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A path, query, or body could not be parsed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Service(ServiceError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            Self::Service(ServiceError::PermissionDenied { .. }) => {
                (StatusCode::FORBIDDEN, self.to_string())
            }
            Self::Service(ServiceError::Validation(msg)) | Self::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            Self::Service(ServiceError::Storage(e)) => {
                tracing::error!(error = %e, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    String::from("internal storage error"),
                )
            }
            Self::Places(GeoError::MissingCredential) => {
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
            Self::Places(e) => {
                tracing::warn!(error = %e, "places pass-through failed");
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, self.to_string()),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
