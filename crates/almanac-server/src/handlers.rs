//! REST API endpoint handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Liveness probe |
//! | `POST` | `/api/events` | Create an event for the caller |
//! | `GET` | `/api/events?from&to` | Active events in a start window |
//! | `GET` | `/api/events/upcoming?limit` | Next events as cards |
//! | `GET` | `/api/events/near?lat&lng&radius` | Radius search |
//! | `GET` | `/api/events/{id}` | Single live event |
//! | `GET` | `/api/events/{id}/audit` | Single event, deleted or not |
//! | `PATCH` | `/api/events/{id}` | Partial update |
//! | `DELETE` | `/api/events/{id}` | Soft delete |
//! | `POST` | `/api/places/suggest` | Places autocomplete pass-through |
//! | `GET` | `/api/places/details` | Places details pass-through |

use std::sync::Arc;

use almanac_core::DEFAULT_RADIUS_MILES;
use almanac_db::{EventStore, UserStore};
use almanac_geo::Geocoder;
use almanac_types::{CreateEventRequest, Event, EventId, UpcomingEvent, UpdateEventRequest};
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::ApiError;
use crate::identity::CurrentUser;
use crate::state::AppState;

/// Cards returned by `/api/events/upcoming` when no limit is given.
pub const DEFAULT_UPCOMING_LIMIT: i64 = 6;

type Shared<S, G> = State<Arc<AppState<S, G>>>;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for `GET /api/events`.
#[derive(Debug, serde::Deserialize)]
pub struct WindowQuery {
    /// Inclusive lower bound on start (RFC 3339).
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on start (RFC 3339).
    pub to: Option<DateTime<Utc>>,
}

/// Query parameters for `GET /api/events/upcoming`.
#[derive(Debug, serde::Deserialize)]
pub struct UpcomingQuery {
    /// Number of cards, clamped to 1..=12.
    pub limit: Option<i64>,
}

/// Query parameters for `GET /api/events/near`.
#[derive(Debug, serde::Deserialize)]
pub struct NearQueryParams {
    /// Center latitude.
    pub lat: f64,
    /// Center longitude.
    pub lng: f64,
    /// Radius in miles, clamped to 0.1..=200.
    pub radius: Option<f64>,
}

/// Query parameters for `GET /api/places/details`.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetailsQuery {
    /// Provider place id.
    pub place_id: String,
    /// Session token from the preceding autocomplete calls.
    pub session_token: Option<String>,
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// Liveness probe.
pub async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// `POST /api/events` -- create an event owned by the caller.
pub async fn create_event<S, G>(
    State(state): Shared<S, G>,
    CurrentUser(user): CurrentUser,
    body: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Event>), ApiError>
where
    S: EventStore + UserStore,
    G: Geocoder,
{
    let Json(request) = body?;
    let event = state.events.create(user, request).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// `GET /api/events` -- active events starting in `[from, to)`.
pub async fn list_events<S, G>(
    State(state): Shared<S, G>,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<Vec<Event>>, ApiError>
where
    S: EventStore + UserStore,
    G: Geocoder,
{
    let Query(window) = query?;
    Ok(Json(state.events.list(window.from, window.to).await?))
}

/// `GET /api/events/upcoming` -- next events that have not finished.
pub async fn upcoming_events<S, G>(
    State(state): Shared<S, G>,
    query: Result<Query<UpcomingQuery>, QueryRejection>,
) -> Result<Json<Vec<UpcomingEvent>>, ApiError>
where
    S: EventStore + UserStore,
    G: Geocoder,
{
    let Query(params) = query?;
    let limit = params.limit.unwrap_or(DEFAULT_UPCOMING_LIMIT);
    Ok(Json(state.events.upcoming(limit).await?))
}

/// `GET /api/events/near` -- active geocoded events within a radius.
pub async fn near_events<S, G>(
    State(state): Shared<S, G>,
    query: Result<Query<NearQueryParams>, QueryRejection>,
) -> Result<Json<Vec<Event>>, ApiError>
where
    S: EventStore + UserStore,
    G: Geocoder,
{
    let Query(params) = query?;
    let radius = params.radius.unwrap_or(DEFAULT_RADIUS_MILES);
    Ok(Json(
        state.proximity.list_near(params.lat, params.lng, radius).await?,
    ))
}

/// `GET /api/events/{id}` -- a live event.
pub async fn get_event<S, G>(
    State(state): Shared<S, G>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Event>, ApiError>
where
    S: EventStore + UserStore,
    G: Geocoder,
{
    let Path(id) = path?;
    Ok(Json(state.events.get_active(EventId::from(id)).await?))
}

/// `GET /api/events/{id}/audit` -- an event even if deleted, for its owner
/// or a moderator.
pub async fn audit_event<S, G>(
    State(state): Shared<S, G>,
    CurrentUser(user): CurrentUser,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Event>, ApiError>
where
    S: EventStore + UserStore,
    G: Geocoder,
{
    let Path(id) = path?;
    Ok(Json(state.events.audit(EventId::from(id), user).await?))
}

/// `PATCH /api/events/{id}` -- partial update.
pub async fn update_event<S, G>(
    State(state): Shared<S, G>,
    CurrentUser(user): CurrentUser,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateEventRequest>, JsonRejection>,
) -> Result<Json<Event>, ApiError>
where
    S: EventStore + UserStore,
    G: Geocoder,
{
    let Path(id) = path?;
    let Json(request) = body?;
    Ok(Json(
        state.events.update(EventId::from(id), user, request).await?,
    ))
}

/// `DELETE /api/events/{id}` -- soft delete.
pub async fn delete_event<S, G>(
    State(state): Shared<S, G>,
    CurrentUser(user): CurrentUser,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError>
where
    S: EventStore + UserStore,
    G: Geocoder,
{
    let Path(id) = path?;
    state.events.delete(EventId::from(id), user).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Places
// ---------------------------------------------------------------------------

/// `POST /api/places/suggest` -- forward an autocomplete body verbatim.
pub async fn places_suggest<S, G>(
    State(state): Shared<S, G>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError>
where
    S: EventStore + UserStore,
    G: Geocoder,
{
    let Json(request) = body?;
    Ok(Json(state.places.autocomplete(&request).await?))
}

/// `GET /api/places/details` -- look up one place.
pub async fn places_details<S, G>(
    State(state): Shared<S, G>,
    query: Result<Query<PlaceDetailsQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError>
where
    S: EventStore + UserStore,
    G: Geocoder,
{
    let Query(params) = query?;
    Ok(Json(
        state
            .places
            .details(&params.place_id, params.session_token.as_deref())
            .await?,
    ))
}
