//! Axum router construction.
//!
//! Assembles all routes into a single [`Router`] with CORS enabled for the
//! browser front end and request tracing.

use std::sync::Arc;

use almanac_db::{EventStore, UserStore};
use almanac_geo::Geocoder;
use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// See [`handlers`] for the endpoint table. CORS allows any origin; the
/// `X-User-Id` header must be permitted for the browser to send it.
pub fn build_router<S, G>(state: Arc<AppState<S, G>>) -> Router
where
    S: EventStore + UserStore + 'static,
    G: Geocoder + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        // Events
        .route(
            "/api/events",
            post(handlers::create_event::<S, G>).get(handlers::list_events::<S, G>),
        )
        .route("/api/events/upcoming", get(handlers::upcoming_events::<S, G>))
        .route("/api/events/near", get(handlers::near_events::<S, G>))
        .route(
            "/api/events/{id}",
            get(handlers::get_event::<S, G>)
                .patch(handlers::update_event::<S, G>)
                .delete(handlers::delete_event::<S, G>),
        )
        .route("/api/events/{id}/audit", get(handlers::audit_event::<S, G>))
        // Places
        .route("/api/places/suggest", post(handlers::places_suggest::<S, G>))
        .route("/api/places/details", get(handlers::places_details::<S, G>))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
