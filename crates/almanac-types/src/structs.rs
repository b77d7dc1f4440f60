//! Core entity structs: events, users, addresses, and coordinates.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{EventStatus, EventType, Role};
use crate::ids::{EventId, UserId};

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// Free-text postal address of an event. Every component is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Address {
    /// Street and number.
    pub street: Option<String>,
    /// City or town.
    pub city: Option<String>,
    /// State or region.
    pub state: Option<String>,
    /// Postal code.
    pub zip: Option<String>,
}

impl Address {
    /// Human-readable single line: trimmed, non-blank components joined
    /// with `", "` in street, city, state, zip order.
    ///
    /// Absent and blank components are skipped, so the result never has
    /// doubled or trailing separators.
    pub fn line(&self) -> String {
        [&self.street, &self.city, &self.state, &self.zip]
            .into_iter()
            .filter_map(|part| part.as_deref().map(str::trim))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Whether no component carries any non-whitespace text.
    pub fn is_blank(&self) -> bool {
        self.line().is_empty()
    }
}

/// A latitude/longitude pair in decimal degrees.
///
/// Events hold `Option<Coordinates>`, so the two values are always present
/// or absent together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Coordinates {
    /// Degrees north of the equator (negative for south).
    pub latitude: f64,
    /// Degrees east of Greenwich (negative for west).
    pub longitude: f64,
}

impl Coordinates {
    /// Create a coordinate pair.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// A registered user as seen by the event lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct User {
    /// Store-assigned identifier.
    pub id: UserId,
    /// Display name.
    pub username: String,
    /// Roles granted to the user.
    pub roles: BTreeSet<Role>,
}

impl User {
    /// Whether any held role allows moderating other users' events.
    pub fn is_moderator(&self) -> bool {
        self.roles.iter().any(|role| role.can_moderate())
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Record of a soft deletion. Presence on an [`Event`] means it is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SoftDeletion {
    /// When the event was deleted.
    pub deleted_at: DateTime<Utc>,
    /// Who deleted it.
    pub deleted_by: UserId,
}

/// A motorcycle event listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Event {
    /// Store-assigned identifier.
    pub id: EventId,
    /// The user who created the event. Never changes.
    pub owner_id: UserId,
    /// Headline shown in listings.
    pub title: String,
    /// Category of the event.
    pub event_type: EventType,
    /// Reference to the flyer image.
    pub flyer: Option<String>,
    /// Long-form description.
    pub description: Option<String>,
    /// When the event starts.
    pub start: DateTime<Utc>,
    /// When the event ends, if known. Never before `start`.
    pub end: Option<DateTime<Utc>>,
    /// Where the event takes place.
    pub address: Address,
    /// Geocoded position of `address`, when geocoding succeeded.
    pub coordinates: Option<Coordinates>,
    /// Publication status.
    pub status: EventStatus,
    /// Soft-deletion record, if the event has been deleted.
    pub deletion: Option<SoftDeletion>,
    /// When the record was inserted.
    pub created_at: DateTime<Utc>,
    /// When the record was last saved.
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Whether the event has been soft-deleted.
    pub const fn is_deleted(&self) -> bool {
        self.deletion.is_some()
    }

    /// The end instant if present, otherwise the start.
    pub fn effective_end(&self) -> DateTime<Utc> {
        self.end.unwrap_or(self.start)
    }
}

/// An event that has not been persisted yet.
///
/// The store assigns the id and the audit timestamps on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    /// The creating user.
    pub owner_id: UserId,
    /// Headline shown in listings.
    pub title: String,
    /// Category of the event.
    pub event_type: EventType,
    /// Reference to the flyer image.
    pub flyer: Option<String>,
    /// Long-form description.
    pub description: Option<String>,
    /// When the event starts.
    pub start: DateTime<Utc>,
    /// When the event ends, if known.
    pub end: Option<DateTime<Utc>>,
    /// Where the event takes place.
    pub address: Address,
    /// Geocoded position of `address`.
    pub coordinates: Option<Coordinates>,
    /// Initial publication status.
    pub status: EventStatus,
}

/// Card-sized projection of an event for the "upcoming" strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct UpcomingEvent {
    /// Event identifier.
    pub id: EventId,
    /// Headline.
    pub title: String,
    /// Start instant.
    pub start: DateTime<Utc>,
    /// End instant, if known.
    pub end: Option<DateTime<Utc>>,
    /// Category.
    pub event_type: EventType,
    /// Single-line address (see [`Address::line`]).
    pub location: String,
    /// Flyer reference.
    pub flyer: Option<String>,
}

impl From<&Event> for UpcomingEvent {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            title: event.title.clone(),
            start: event.start,
            end: event.end,
            event_type: event.event_type,
            location: event.address.line(),
            flyer: event.flyer.clone(),
        }
    }
}
