//! Data layer for Riders Almanac.
//!
//! The lifecycle manager and proximity search depend only on the
//! [`EventStore`] and [`UserStore`] traits. Two backends implement them:
//!
//! ```text
//! EventService / ProximitySearch
//!     |
//!     +-- EventStore + UserStore
//!         |-- PgStore      (PostgreSQL via PostgresPool, migrations)
//!         +-- MemoryStore  (process memory, development and tests)
//! ```
//!
//! # Modules
//!
//! - [`store`] -- The store traits, window filters, and paging
//! - [`postgres`] -- `PostgreSQL` connection pool and migrations
//! - [`event_store`] -- `PostgreSQL` store implementation and row mapping
//! - [`memory`] -- In-memory store implementation
//! - [`error`] -- Shared error types

pub mod error;
pub mod event_store;
pub mod memory;
pub mod postgres;
pub mod store;

// Re-export primary types for convenience.
pub use error::DbError;
pub use event_store::{EventRow, PgStore, UserRow};
pub use memory::MemoryStore;
pub use postgres::PostgresPool;
pub use store::{EventStore, EventWindow, Page, UserStore};
