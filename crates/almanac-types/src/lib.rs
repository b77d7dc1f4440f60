//! Shared type definitions for Riders Almanac.
//!
//! This crate is the single source of truth for the entity model used across
//! the workspace: the store, the lifecycle manager, and the HTTP surface all
//! speak these types. Public entities also flow to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe wrappers for store-assigned identifiers
//! - [`enums`] -- Event status, event type, and user roles
//! - [`structs`] -- Events, users, addresses, coordinates
//! - [`patch`] -- Tri-state field for partial updates
//! - [`requests`] -- Create and update payloads

pub mod enums;
pub mod ids;
pub mod patch;
pub mod requests;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{EventStatus, EventType, ParseEnumError, Role};
pub use ids::{EventId, UserId};
pub use patch::Patch;
pub use requests::{CreateEventRequest, UpdateEventRequest};
pub use structs::{Address, Coordinates, Event, NewEvent, SoftDeletion, UpcomingEvent, User};
