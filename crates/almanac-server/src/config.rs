//! Configuration loaded from environment variables.
//!
//! Every variable is optional. Without `DATABASE_URL` the server runs on the
//! in-memory store; without `GOOGLE_MAPS_API_KEY` geocoding degrades to "no
//! coordinates" and the places endpoints answer 503.

use std::time::Duration;

use almanac_db::postgres::DEFAULT_MAX_CONNECTIONS;
use almanac_geo::GeoConfig;
use almanac_geo::config::{DEFAULT_GEOCODE_URL, DEFAULT_PLACES_URL, DEFAULT_TIMEOUT_MS};

use crate::server::ServerConfig;

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("invalid {name}: {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Parse failure.
        reason: String,
    },
}

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `PostgreSQL` URL; `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Pool size for `PostgreSQL`.
    pub db_max_connections: u32,
    /// Bind address.
    pub server: ServerConfig,
    /// Geocoding and places provider settings.
    pub geo: GeoConfig,
    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// Variables:
    /// - `DATABASE_URL` -- `PostgreSQL` connection string (unset: in-memory store)
    /// - `DB_MAX_CONNECTIONS` -- pool size (default 10)
    /// - `HOST` -- bind host (default `0.0.0.0`)
    /// - `PORT` -- bind port (default 8080)
    /// - `GOOGLE_MAPS_API_KEY` -- provider credential (unset: geocoding disabled)
    /// - `GEOCODE_URL` -- geocoding endpoint override
    /// - `PLACES_BASE_URL` -- places API base override
    /// - `PROVIDER_TIMEOUT_MS` -- timeout for provider calls (default 3000)
    /// - `LOG_FORMAT` -- `json` for JSON logs, anything else for text
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a numeric variable does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = ServerConfig::default();

        let db_max_connections = parse_or(&var, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        let port = parse_or(&var, "PORT", defaults.port)?;
        let timeout_ms = parse_or(&var, "PROVIDER_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?;

        let geo = GeoConfig::new(var("GOOGLE_MAPS_API_KEY"))
            .with_geocode_url(&var("GEOCODE_URL").unwrap_or_else(|| DEFAULT_GEOCODE_URL.to_owned()))
            .with_places_url(&var("PLACES_BASE_URL").unwrap_or_else(|| DEFAULT_PLACES_URL.to_owned()))
            .with_timeout(Duration::from_millis(timeout_ms));

        Ok(Self {
            database_url: var("DATABASE_URL"),
            db_max_connections,
            server: ServerConfig {
                host: var("HOST").unwrap_or(defaults.host),
                port,
            },
            geo,
            log_json: var("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json")),
        })
    }
}

fn parse_or<T>(
    var: impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    var(name).map_or(Ok(default), |raw| {
        raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        })
    })
}
