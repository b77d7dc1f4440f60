//! Riders Almanac API server entry point.
//!
//! Loads configuration from the environment, initializes logging, picks the
//! store (`PostgreSQL` when `DATABASE_URL` is set, in-memory otherwise), and
//! serves the HTTP API until `Ctrl-C`.

use std::sync::Arc;

use almanac_db::{EventStore, MemoryStore, PgStore, PostgresPool, UserStore};
use almanac_geo::{GoogleGeocoder, PlacesClient};
use almanac_server::{AppConfig, AppState, build_router, start_server};
use almanac_types::Role;
use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("loading configuration")?;
    init_tracing(config.log_json);

    info!(
        host = %config.server.host,
        port = config.server.port,
        database = config.database_url.is_some(),
        provider_timeout_ms = config.geo.timeout.as_millis(),
        "almanac-server starting"
    );

    let geocoder = GoogleGeocoder::new(&config.geo).context("building geocoder")?;
    let places = PlacesClient::new(&config.geo).context("building places client")?;
    if !geocoder.is_enabled() {
        warn!("GOOGLE_MAPS_API_KEY not set; geocoding and places are disabled");
    }

    if let Some(url) = config.database_url.as_deref() {
        let pool = PostgresPool::connect(url, config.db_max_connections)
            .await
            .context("connecting to PostgreSQL")?;
        pool.run_migrations().await.context("running migrations")?;

        let store = Arc::new(PgStore::new(&pool));
        serve(&config, store, geocoder, places).await?;
        pool.close().await;
    } else {
        warn!("DATABASE_URL not set; using the in-memory store");
        let store = Arc::new(MemoryStore::new());
        seed_development_users(&store).await?;
        serve(&config, store, geocoder, places).await?;
    }

    Ok(())
}

async fn serve<S>(
    config: &AppConfig,
    store: Arc<S>,
    geocoder: GoogleGeocoder,
    places: PlacesClient,
) -> anyhow::Result<()>
where
    S: EventStore + UserStore + 'static,
{
    let state = Arc::new(AppState::new(store, geocoder, places));
    start_server(&config.server, build_router(state))
        .await
        .context("serving HTTP")
}

/// The in-memory store starts empty; give it a rider and an admin so the
/// API is usable straight away.
async fn seed_development_users(store: &MemoryStore) -> anyhow::Result<()> {
    let rider = store.add_user("rider", [Role::User]).await?;
    let admin = store.add_user("admin", [Role::User, Role::Admin]).await?;
    info!(
        rider_id = %rider.id,
        admin_id = %admin.id,
        "seeded development users (send as X-User-Id)"
    );
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
