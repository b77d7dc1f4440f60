//! In-memory implementation of the store contract.
//!
//! Backs the development server when no database is configured and the
//! lifecycle tests. Semantics match [`PgStore`](crate::PgStore), including
//! the two-phase proximity filter.

use std::collections::{BTreeMap, BTreeSet};

use almanac_geo::NearQuery;
use almanac_types::{Event, EventId, EventStatus, NewEvent, Role, User, UserId};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::DbError;
use crate::store::{EventStore, EventWindow, Page, UserStore};

#[derive(Debug, Default)]
struct Tables {
    events: BTreeMap<EventId, Event>,
    users: BTreeMap<UserId, User>,
    last_event_id: i64,
    last_user_id: i64,
}

/// Event and user store held in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with the given roles.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::SequenceExhausted`] if no id is left.
    pub async fn add_user(
        &self,
        username: &str,
        roles: impl IntoIterator<Item = Role>,
    ) -> Result<User, DbError> {
        let mut tables = self.tables.write().await;
        let id = tables
            .last_user_id
            .checked_add(1)
            .ok_or(DbError::SequenceExhausted("users"))?;
        tables.last_user_id = id;

        let user = User {
            id: UserId::from(id),
            username: username.to_owned(),
            roles: roles.into_iter().collect::<BTreeSet<_>>(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    /// Live events matching `keep`, by start ascending then id.
    async fn scan(&self, keep: impl Fn(&Event) -> bool + Send) -> Vec<Event> {
        let tables = self.tables.read().await;
        let mut events: Vec<Event> = tables
            .events
            .values()
            .filter(|e| !e.is_deleted() && keep(e))
            .cloned()
            .collect();
        // Map iteration is by id, so a stable sort on start keeps id as tie-breaker.
        events.sort_by_key(|e| e.start);
        events
    }
}

impl EventStore for MemoryStore {
    async fn get_by_id(&self, id: EventId) -> Result<Option<Event>, DbError> {
        Ok(self.tables.read().await.events.get(&id).cloned())
    }

    async fn get_active_by_id(&self, id: EventId) -> Result<Option<Event>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables.events.get(&id).filter(|e| !e.is_deleted()).cloned())
    }

    async fn exists_owned_active(&self, id: EventId, owner: UserId) -> Result<bool, DbError> {
        let tables = self.tables.read().await;
        Ok(tables
            .events
            .get(&id)
            .is_some_and(|e| e.owner_id == owner && !e.is_deleted()))
    }

    async fn find_window(&self, window: &EventWindow) -> Result<Vec<Event>, DbError> {
        let window = *window;
        Ok(self.scan(move |e| window.matches(e)).await)
    }

    async fn find_upcoming(&self, now: DateTime<Utc>, page: Page) -> Result<Vec<Event>, DbError> {
        let events = self
            .scan(move |e| e.status == EventStatus::Active && e.effective_end() >= now)
            .await;

        let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
        Ok(events.into_iter().skip(offset).take(limit).collect())
    }

    async fn find_near(&self, query: &NearQuery) -> Result<Vec<Event>, DbError> {
        let query = *query;
        Ok(self
            .scan(move |e| {
                e.status == EventStatus::Active
                    && e.coordinates.is_some_and(|point| query.admits(point))
            })
            .await)
    }

    async fn insert(&self, event: NewEvent) -> Result<Event, DbError> {
        let mut tables = self.tables.write().await;
        let id = tables
            .last_event_id
            .checked_add(1)
            .ok_or(DbError::SequenceExhausted("events"))?;
        tables.last_event_id = id;

        let now = Utc::now();
        let stored = Event {
            id: EventId::from(id),
            owner_id: event.owner_id,
            title: event.title,
            event_type: event.event_type,
            flyer: event.flyer,
            description: event.description,
            start: event.start,
            end: event.end,
            address: event.address,
            coordinates: event.coordinates,
            status: event.status,
            deletion: None,
            created_at: now,
            updated_at: now,
        };
        tables.events.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn save(&self, event: &Event) -> Result<Event, DbError> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .events
            .get_mut(&event.id)
            .ok_or_else(|| DbError::RowNotFound(format!("events/{}", event.id)))?;

        *slot = Event {
            owner_id: slot.owner_id,
            created_at: slot.created_at,
            updated_at: Utc::now(),
            ..event.clone()
        };
        Ok(slot.clone())
    }
}

impl UserStore for MemoryStore {
    async fn get_user(&self, id: UserId) -> Result<Option<User>, DbError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }
}
