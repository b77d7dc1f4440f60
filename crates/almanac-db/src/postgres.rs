//! `PostgreSQL` pool for the event store.
//!
//! The binary hands over `DATABASE_URL` and a pool size; everything else
//! is fixed here. Queries are built at runtime, so no database is needed at
//! compile time.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::error::DbError;

/// Pool size used when none is configured.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// How long a request waits for a free connection before failing.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connections idle this long are closed.
const IDLE_TIMEOUT: Duration = Duration::from_secs(300);

/// Shared connection pool, migrated on demand.
#[derive(Clone)]
pub struct PostgresPool {
    pool: PgPool,
}

impl PostgresPool {
    /// Open a pool of up to `max_connections` connections to `url`.
    ///
    /// Only the host and database name are logged; credentials in the URL
    /// never reach the logs.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] for an unparsable URL or a zero pool
    /// size, and [`DbError::Postgres`] if the first connection fails.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, DbError> {
        if max_connections == 0 {
            return Err(DbError::Config(String::from(
                "pool needs at least one connection",
            )));
        }

        let options: PgConnectOptions = url
            .parse()
            .map_err(|e: sqlx::Error| DbError::Config(format!("invalid database URL: {e}")))?;
        let host = options.get_host().to_owned();
        let database = options.get_database().map(ToOwned::to_owned);

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .idle_timeout(IDLE_TIMEOUT)
            .connect_with(options)
            .await?;

        tracing::info!(%host, ?database, max_connections, "Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Create or upgrade the `users`, `user_roles`, and `events` tables.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Migration`] if a migration fails.
    pub async fn run_migrations(&self) -> Result<(), DbError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Event store schema is current");
        Ok(())
    }

    /// The underlying [`PgPool`], for building stores.
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Wait for in-flight queries and close every connection.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("PostgreSQL pool closed");
    }
}
