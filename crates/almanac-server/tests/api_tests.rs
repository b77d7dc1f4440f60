//! Integration tests for the HTTP API.
//!
//! Tests drive the Axum `Router` directly via `tower::ServiceExt` over the
//! in-memory store, without starting a TCP server. Geocoding and places
//! calls go to a stub provider bound on a loopback port when a test needs
//! them; otherwise the provider is left unconfigured.

#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::needless_pass_by_value
)]

use std::sync::Arc;
use std::time::Duration;

use almanac_db::MemoryStore;
use almanac_geo::{GeoConfig, GoogleGeocoder, PlacesClient};
use almanac_server::router::build_router;
use almanac_server::state::AppState;
use almanac_types::{Role, UserId};
use axum::body::Body;
use axum::extract::{Path, Query};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

// =========================================================================
// Harness
// =========================================================================

struct TestApp {
    router: Router,
    rider: UserId,
    stranger: UserId,
    moderator: UserId,
}

async fn make_app(geo: &GeoConfig) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let rider = store.add_user("rider", [Role::User]).await.unwrap().id;
    let stranger = store.add_user("stranger", [Role::User]).await.unwrap().id;
    let moderator = store
        .add_user("moderator", [Role::User, Role::Mod])
        .await
        .unwrap()
        .id;

    let geocoder = GoogleGeocoder::new(geo).unwrap();
    let places = PlacesClient::new(geo).unwrap();
    let state = Arc::new(AppState::new(store, geocoder, places));

    TestApp {
        router: build_router(state),
        rider,
        stranger,
        moderator,
    }
}

/// An app whose provider has no credential.
async fn offline_app() -> TestApp {
    make_app(&GeoConfig::new(None)).await
}

/// Bind a stub provider on an ephemeral port and return its base URL.
async fn spawn_provider(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(
    app: &TestApp,
    method: Method,
    uri: &str,
    user: Option<UserId>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        request = request.header("x-user-id", user.to_string());
    }
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

fn at(days_from_now: i64) -> DateTime<Utc> {
    Utc::now() + chrono::Duration::days(days_from_now)
}

fn bike_night(start: DateTime<Utc>) -> Value {
    json!({
        "title": "Thursday Bike Night",
        "event_type": "BIKE_NIGHT",
        "start": start,
        "street": "1 Main St",
        "city": "Sturgis",
        "state": "SD",
    })
}

async fn create(app: &TestApp, owner: UserId, body: Value) -> Value {
    let (status, json) = send(app, Method::POST, "/api/events", Some(owner), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {json}");
    json
}

fn ids(json: &Value) -> Vec<i64> {
    json.as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_i64().unwrap())
        .collect()
}

// =========================================================================
// Health and identity
// =========================================================================

#[tokio::test]
async fn test_health() {
    let app = offline_app().await;
    let (status, json) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_missing_identity_is_unauthorized() {
    let app = offline_app().await;
    let (status, json) = send(&app, Method::POST, "/api/events", None, Some(bike_night(at(3)))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["status"], 401);
}

#[tokio::test]
async fn test_malformed_identity_is_unauthorized() {
    let app = offline_app().await;
    let request = Request::delete("/api/events/1")
        .header("x-user-id", "rider")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =========================================================================
// Create and read
// =========================================================================

#[tokio::test]
async fn test_create_event() {
    let app = offline_app().await;
    let event = create(&app, app.rider, bike_night(at(3))).await;

    assert_eq!(event["owner_id"], app.rider.into_inner());
    assert_eq!(event["title"], "Thursday Bike Night");
    assert_eq!(event["status"], "ACTIVE");
    assert_eq!(event["address"]["city"], "Sturgis");
    assert!(event["coordinates"].is_null());
    assert!(event["deletion"].is_null());
}

#[tokio::test]
async fn test_create_for_unknown_user_is_not_found() {
    let app = offline_app().await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/events",
        Some(UserId::from(9_999)),
        Some(bike_night(at(3))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_rejects_blank_title() {
    let app = offline_app().await;
    let mut body = bike_night(at(3));
    body["title"] = json!("   ");

    let (status, json) = send(&app, Method::POST, "/api/events", Some(app.rider), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
    assert!(json["error"].as_str().unwrap().contains("title"));
}

#[tokio::test]
async fn test_create_rejects_end_before_start() {
    let app = offline_app().await;
    let mut body = bike_night(at(3));
    body["end"] = json!(at(2));

    let (status, _) = send(&app, Method::POST, "/api/events", Some(app.rider), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_rejects_unknown_event_type() {
    let app = offline_app().await;
    let mut body = bike_night(at(3));
    body["event_type"] = json!("TRACK_DAY");

    let (status, json) = send(&app, Method::POST, "/api/events", Some(app.rider), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn test_get_event() {
    let app = offline_app().await;
    let event = create(&app, app.rider, bike_night(at(3))).await;
    let id = event["id"].as_i64().unwrap();

    let (status, json) = send(&app, Method::GET, &format!("/api/events/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, event);

    let (status, _) = send(&app, Method::GET, "/api/events/424242", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/api/events/not-a-number", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =========================================================================
// Update and delete
// =========================================================================

#[tokio::test]
async fn test_update_by_stranger_is_forbidden() {
    let app = offline_app().await;
    let event = create(&app, app.rider, bike_night(at(3))).await;
    let uri = format!("/api/events/{}", event["id"]);

    let (status, _) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(app.stranger),
        Some(json!({"title": "Mine now"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, unchanged) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(unchanged["title"], "Thursday Bike Night");
}

#[tokio::test]
async fn test_partial_update_by_owner() {
    let app = offline_app().await;
    let mut body = bike_night(at(3));
    body["description"] = json!("Burgers at six");
    let event = create(&app, app.rider, body).await;
    let uri = format!("/api/events/{}", event["id"]);

    let (status, updated) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(app.rider),
        Some(json!({"title": "Moved indoors", "description": null, "status": "POSTPONED"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Moved indoors");
    assert!(updated["description"].is_null());
    assert_eq!(updated["status"], "POSTPONED");
    assert_eq!(updated["owner_id"], event["owner_id"]);
    assert_eq!(updated["start"], event["start"]);
    assert_eq!(updated["address"], event["address"]);
}

#[tokio::test]
async fn test_moderator_may_update() {
    let app = offline_app().await;
    let event = create(&app, app.rider, bike_night(at(3))).await;
    let uri = format!("/api/events/{}", event["id"]);

    let (status, updated) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(app.moderator),
        Some(json!({"status": "CANCELLED"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "CANCELLED");
}

#[tokio::test]
async fn test_update_rejects_invalid_status() {
    let app = offline_app().await;
    let event = create(&app, app.rider, bike_night(at(3))).await;
    let uri = format!("/api/events/{}", event["id"]);

    let (status, json) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(app.rider),
        Some(json!({"title": "Renamed", "status": "POSSIBLY"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("POSSIBLY"));

    let (_, unchanged) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(unchanged["title"], "Thursday Bike Night");
}

#[tokio::test]
async fn test_soft_delete_lifecycle() {
    let app = offline_app().await;
    let event = create(&app, app.rider, bike_night(at(3))).await;
    let uri = format!("/api/events/{}", event["id"]);
    let audit = format!("{uri}/audit");

    let (status, _) = send(&app, Method::DELETE, &uri, Some(app.stranger), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = send(&app, Method::DELETE, &uri, Some(app.rider), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(json.is_null());

    // Deleting again is a no-op.
    let (status, _) = send(&app, Method::DELETE, &uri, Some(app.rider), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(app.rider),
        Some(json!({"title": "Back from the dead"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, record) = send(&app, Method::GET, &audit, Some(app.rider), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["deletion"]["deleted_by"], app.rider.into_inner());

    let (status, _) = send(&app, Method::GET, &audit, Some(app.moderator), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, &audit, Some(app.stranger), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, listed) = send(&app, Method::GET, "/api/events", None, None).await;
    assert!(ids(&listed).is_empty());
}

// =========================================================================
// Listings
// =========================================================================

#[tokio::test]
async fn test_list_events_in_window() {
    let app = offline_app().await;
    let early = create(&app, app.rider, bike_night(at(1))).await;
    let middle = create(&app, app.rider, bike_night(at(5))).await;
    let late = create(&app, app.rider, bike_night(at(20))).await;

    let (status, all) = send(&app, Method::GET, "/api/events", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        ids(&all),
        vec![
            early["id"].as_i64().unwrap(),
            middle["id"].as_i64().unwrap(),
            late["id"].as_i64().unwrap(),
        ]
    );

    let from = at(2).to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let to = at(10).to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let (status, window) = send(
        &app,
        Method::GET,
        &format!("/api/events?from={from}&to={to}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&window), vec![middle["id"].as_i64().unwrap()]);

    let (status, _) = send(&app, Method::GET, "/api/events?from=yesterday", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upcoming_default_and_clamp() {
    let app = offline_app().await;
    for day in 1..=14 {
        create(&app, app.rider, bike_night(at(day))).await;
    }

    let (status, cards) = send(&app, Method::GET, "/api/events/upcoming", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let cards = cards.as_array().unwrap().clone();
    assert_eq!(cards.len(), 6);
    assert_eq!(cards[0]["location"], "1 Main St, Sturgis, SD");
    assert!(cards[0].get("owner_id").is_none());

    let (_, many) = send(&app, Method::GET, "/api/events/upcoming?limit=50", None, None).await;
    assert_eq!(many.as_array().unwrap().len(), 12);

    let (_, few) = send(&app, Method::GET, "/api/events/upcoming?limit=0", None, None).await;
    assert_eq!(few.as_array().unwrap().len(), 1);
}

// =========================================================================
// Proximity
// =========================================================================

/// Geocode stub placing every Sturgis address downtown and Rapid City
/// about 25 miles west.
async fn geocode_stub(Query(params): Query<std::collections::HashMap<String, String>>) -> Json<Value> {
    let address = params.get("address").cloned().unwrap_or_default();
    let location = if address.contains("Sturgis") {
        json!({"lat": 44.4097, "lng": -103.5091})
    } else if address.contains("Rapid City") {
        json!({"lat": 44.0805, "lng": -103.2310})
    } else {
        return Json(json!({"status": "ZERO_RESULTS", "results": []}));
    };
    Json(json!({"status": "OK", "results": [{"geometry": {"location": location}}]}))
}

async fn geocoding_app() -> TestApp {
    let base = spawn_provider(Router::new().route("/geocode", get(geocode_stub))).await;
    let geo = GeoConfig::new(Some(String::from("test-key")))
        .with_geocode_url(&format!("{base}/geocode"))
        .with_places_url(&base)
        .with_timeout(Duration::from_millis(500));
    make_app(&geo).await
}

#[tokio::test]
async fn test_near_events() {
    let app = geocoding_app().await;
    let sturgis = create(&app, app.rider, bike_night(at(3))).await;
    assert!((sturgis["coordinates"]["latitude"].as_f64().unwrap() - 44.4097).abs() < 1e-9);

    let mut rapid = bike_night(at(4));
    rapid["city"] = json!("Rapid City");
    let rapid = create(&app, app.rider, rapid).await;

    let mut nowhere = bike_night(at(5));
    nowhere["city"] = json!("Atlantis");
    let nowhere = create(&app, app.rider, nowhere).await;
    assert!(nowhere["coordinates"].is_null());

    let (status, close) = send(
        &app,
        Method::GET,
        "/api/events/near?lat=44.41&lng=-103.51&radius=5",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&close), vec![sturgis["id"].as_i64().unwrap()]);

    let (_, wide) = send(&app, Method::GET, "/api/events/near?lat=44.41&lng=-103.51&radius=60", None, None).await;
    assert_eq!(
        ids(&wide),
        vec![sturgis["id"].as_i64().unwrap(), rapid["id"].as_i64().unwrap()]
    );

    // Default radius is 25 miles.
    let (_, default) = send(&app, Method::GET, "/api/events/near?lat=44.41&lng=-103.51", None, None).await;
    assert!(ids(&default).contains(&sturgis["id"].as_i64().unwrap()));
}

#[tokio::test]
async fn test_near_rejects_bad_coordinates() {
    let app = offline_app().await;

    let (status, _) = send(&app, Method::GET, "/api/events/near?lat=95&lng=0", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/api/events/near?lng=0", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/api/events/near?lat=north&lng=0", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =========================================================================
// Places
// =========================================================================

#[tokio::test]
async fn test_places_without_credential_is_unavailable() {
    let app = offline_app().await;
    let (status, json) = send(
        &app,
        Method::POST,
        "/api/places/suggest",
        None,
        Some(json!({"input": "Sturg"})),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["status"], 503);

    let (status, _) = send(&app, Method::GET, "/api/places/details?placeId=abc", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

async fn details_stub(Path(place_id): Path<String>, headers: HeaderMap) -> Json<Value> {
    let session = headers
        .get("x-goog-sessiontoken")
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned);
    Json(json!({
        "id": place_id,
        "formattedAddress": "1 Main St, Sturgis, SD 57785, USA",
        "session": session,
    }))
}

#[tokio::test]
async fn test_places_details_pass_through() {
    let base = spawn_provider(Router::new().route("/v1/places/{id}", get(details_stub))).await;
    let geo = GeoConfig::new(Some(String::from("test-key")))
        .with_places_url(&base)
        .with_timeout(Duration::from_millis(500));
    let app = make_app(&geo).await;

    let (status, json) = send(
        &app,
        Method::GET,
        "/api/places/details?placeId=ChIJ123&sessionToken=tok-1",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], "ChIJ123");
    assert_eq!(json["session"], "tok-1");

    let (status, _) = send(&app, Method::GET, "/api/places/details", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
