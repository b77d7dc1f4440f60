//! HTTP API server for Riders Almanac.
//!
//! This crate exposes the event lifecycle, proximity search, and the places
//! pass-through over an Axum router. Caller identity arrives in the
//! `X-User-Id` header; service errors map to JSON error bodies with the
//! matching status code.
//!
//! # Modules
//!
//! - [`config`] -- Environment-driven [`AppConfig`]
//! - [`handlers`] -- Endpoint handlers and query parameter types
//! - [`identity`] -- The [`CurrentUser`] extractor
//! - [`router`] -- [`build_router`]
//! - [`server`] -- Bind and serve with graceful shutdown
//! - [`state`] -- [`AppState`] wiring services over one store
//! - [`error`] -- [`ApiError`] and its HTTP mapping
//!
//! [`CurrentUser`]: identity::CurrentUser

pub mod config;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use config::{AppConfig, ConfigError};
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
