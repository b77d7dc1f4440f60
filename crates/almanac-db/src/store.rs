//! The store contract consumed by the lifecycle manager and proximity search.
//!
//! Both backends ([`PgStore`](crate::PgStore) and
//! [`MemoryStore`](crate::MemoryStore)) implement these traits with identical
//! semantics:
//!
//! - soft-deleted events never appear in window, upcoming, or near scans
//! - every scan is ordered by start ascending, ties broken by id
//! - "not found" is `Ok(None)`, never an error

use std::future::Future;

use almanac_geo::NearQuery;
use almanac_types::{Event, EventId, EventStatus, NewEvent, User, UserId};
use chrono::{DateTime, Utc};

use crate::error::DbError;

/// Filters for a time-window scan. `None` leaves a bound unconstrained.
///
/// An event matches when `from <= start < to` and its status equals
/// `status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventWindow {
    /// Inclusive lower bound on start.
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on start.
    pub to: Option<DateTime<Utc>>,
    /// Required status.
    pub status: Option<EventStatus>,
}

impl EventWindow {
    /// Window over active events between the given bounds.
    pub const fn active(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self {
            from,
            to,
            status: Some(EventStatus::Active),
        }
    }

    /// Whether a live event falls inside the window. Deletion is checked
    /// separately by the store.
    pub fn matches(&self, event: &Event) -> bool {
        self.from.is_none_or(|from| event.start >= from)
            && self.to.is_none_or(|to| event.start < to)
            && self.status.is_none_or(|status| event.status == status)
    }
}

/// Offset/limit paging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Rows to skip.
    pub offset: u32,
    /// Maximum rows to return.
    pub limit: u32,
}

impl Page {
    /// The first `limit` rows.
    pub const fn first(limit: u32) -> Self {
        Self { offset: 0, limit }
    }
}

/// Persistence of events.
pub trait EventStore: Send + Sync {
    /// Fetch an event by id, deleted or not.
    fn get_by_id(&self, id: EventId) -> impl Future<Output = Result<Option<Event>, DbError>> + Send;

    /// Fetch an event by id unless it has been soft-deleted.
    fn get_active_by_id(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<Option<Event>, DbError>> + Send;

    /// Whether a live event with this id is owned by `owner`.
    fn exists_owned_active(
        &self,
        id: EventId,
        owner: UserId,
    ) -> impl Future<Output = Result<bool, DbError>> + Send;

    /// Live events inside `window`, by start ascending.
    fn find_window(
        &self,
        window: &EventWindow,
    ) -> impl Future<Output = Result<Vec<Event>, DbError>> + Send;

    /// Live active events whose effective end is at or after `now`, by start
    /// ascending, paged.
    fn find_upcoming(
        &self,
        now: DateTime<Utc>,
        page: Page,
    ) -> impl Future<Output = Result<Vec<Event>, DbError>> + Send;

    /// Live active events with coordinates inside the query's bounding box
    /// and within its radius, by start ascending.
    fn find_near(
        &self,
        query: &NearQuery,
    ) -> impl Future<Output = Result<Vec<Event>, DbError>> + Send;

    /// Persist a new event. The store assigns the id and audit timestamps.
    fn insert(&self, event: NewEvent) -> impl Future<Output = Result<Event, DbError>> + Send;

    /// Write back every mutable field of an existing event and refresh
    /// `updated_at`. The owner is never changed.
    fn save(&self, event: &Event) -> impl Future<Output = Result<Event, DbError>> + Send;
}

/// Read access to users.
pub trait UserStore: Send + Sync {
    /// Fetch a user with their roles.
    fn get_user(&self, id: UserId) -> impl Future<Output = Result<Option<User>, DbError>> + Send;
}
