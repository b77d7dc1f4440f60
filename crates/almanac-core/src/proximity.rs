//! "Near me" search.
//!
//! A query is validated, its radius clamped, and then turned into a
//! [`NearQuery`] carrying both the exact circle and its bounding box. The
//! store filters by the box first and by great-circle distance second.

use std::sync::Arc;

use almanac_db::EventStore;
use almanac_geo::NearQuery;
use almanac_types::{Coordinates, Event};

use crate::error::ServiceError;

/// Smallest radius a query is widened to, in miles.
pub const MIN_RADIUS_MILES: f64 = 0.1;

/// Largest radius a query is narrowed to, in miles.
pub const MAX_RADIUS_MILES: f64 = 200.0;

/// Radius used when the caller does not give one, in miles.
pub const DEFAULT_RADIUS_MILES: f64 = 25.0;

/// Radius search over active events.
pub struct ProximitySearch<S> {
    store: Arc<S>,
}

impl<S: EventStore> ProximitySearch<S> {
    /// Create a search over a shared store.
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Active, live, geocoded events within `radius_miles` of
    /// (`latitude`, `longitude`), by start ascending.
    ///
    /// The radius is clamped to [`MIN_RADIUS_MILES`]..=[`MAX_RADIUS_MILES`];
    /// the boundary is inclusive.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Validation`] for a non-finite input or a coordinate
    /// outside the globe, [`ServiceError::Storage`] if the store fails.
    pub async fn list_near(
        &self,
        latitude: f64,
        longitude: f64,
        radius_miles: f64,
    ) -> Result<Vec<Event>, ServiceError> {
        let query = near_query(latitude, longitude, radius_miles)?;
        let events = self.store.find_near(&query).await?;
        tracing::debug!(
            latitude,
            longitude,
            radius_miles = query.radius_miles,
            count = events.len(),
            "Proximity search"
        );
        Ok(events)
    }
}

/// Validate the inputs and build the two-phase query.
///
/// # Errors
///
/// Returns [`ServiceError::Validation`] for a non-finite input, a latitude
/// outside `[-90, 90]`, or a longitude outside `[-180, 180]`.
pub fn near_query(latitude: f64, longitude: f64, radius_miles: f64) -> Result<NearQuery, ServiceError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(ServiceError::Validation(format!(
            "latitude must be within [-90, 90], got {latitude}"
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(ServiceError::Validation(format!(
            "longitude must be within [-180, 180], got {longitude}"
        )));
    }
    if !radius_miles.is_finite() {
        return Err(ServiceError::Validation(String::from("radius must be a finite number")));
    }

    let radius = radius_miles.clamp(MIN_RADIUS_MILES, MAX_RADIUS_MILES);
    Ok(NearQuery::new(Coordinates::new(latitude, longitude), radius))
}
