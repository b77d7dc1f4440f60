//! Event lifecycle and proximity search for Riders Almanac.
//!
//! This crate holds the rules of the system; storage and geocoding are
//! reached through the traits in `almanac-db` and `almanac-geo`.
//!
//! # Modules
//!
//! - [`lifecycle`] -- [`EventService`]: create, read, update, soft delete, upcoming
//! - [`proximity`] -- [`ProximitySearch`]: radius search with clamping
//! - [`authz`] -- Owner-or-moderator authorization
//! - [`enrichment`] -- Best-effort geocoding of addresses
//! - [`error`] -- [`ServiceError`] taxonomy

pub mod authz;
pub mod enrichment;
pub mod error;
pub mod lifecycle;
pub mod proximity;

#[cfg(test)]
mod testing;

// Re-export primary types for convenience.
pub use error::ServiceError;
pub use lifecycle::EventService;
pub use proximity::{DEFAULT_RADIUS_MILES, ProximitySearch};
