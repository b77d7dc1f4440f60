//! Geospatial support for Riders Almanac.
//!
//! # Modules
//!
//! - [`geometry`] -- Great-circle distance, bounding boxes, radius queries
//! - [`geocoder`] -- The [`Geocoder`] seam and the Google Geocoding client
//! - [`places`] -- Google Places autocomplete/details pass-through
//! - [`config`] -- Provider credentials, endpoints, and timeout
//! - [`error`] -- Provider error type

pub mod config;
pub mod error;
pub mod geocoder;
pub mod geometry;
pub mod places;

// Re-export primary types for convenience.
pub use config::GeoConfig;
pub use error::GeoError;
pub use geocoder::{GeocodeOutcome, Geocoder, GoogleGeocoder};
pub use geometry::{BoundingBox, NearQuery, great_circle_miles};
pub use places::PlacesClient;
