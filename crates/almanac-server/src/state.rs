//! Shared application state for the HTTP server.

use std::sync::Arc;

use almanac_core::{EventService, ProximitySearch};
use almanac_db::{EventStore, UserStore};
use almanac_geo::{Geocoder, PlacesClient};

/// Shared state for the Axum application, injected via `State`.
///
/// Generic over the store and geocoder so the same router serves
/// `PostgreSQL` in production and the in-memory store in development and
/// tests.
pub struct AppState<S, G> {
    /// Event lifecycle operations.
    pub events: EventService<S, G>,
    /// Radius search.
    pub proximity: ProximitySearch<S>,
    /// Places autocomplete/details pass-through.
    pub places: PlacesClient,
}

impl<S, G> AppState<S, G>
where
    S: EventStore + UserStore,
    G: Geocoder,
{
    /// Wire the services over one shared store.
    pub fn new(store: Arc<S>, geocoder: G, places: PlacesClient) -> Self {
        Self {
            events: EventService::new(Arc::clone(&store), geocoder),
            proximity: ProximitySearch::new(store),
            places,
        }
    }
}
