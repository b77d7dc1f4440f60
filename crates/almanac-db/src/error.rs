//! Error types for the data layer.
//!
//! All errors are propagated via [`DbError`] which wraps the underlying
//! [`sqlx`] errors with context about which operation failed. Expected
//! absence is not an error: lookups return `Ok(None)`.

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored row could not be turned into an entity.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A row expected to exist was not there when writing.
    #[error("Row not found: {0}")]
    RowNotFound(String),

    /// The in-memory id sequence ran out.
    #[error("Identifier sequence exhausted: {0}")]
    SequenceExhausted(&'static str),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
