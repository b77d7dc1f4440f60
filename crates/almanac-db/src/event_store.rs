//! `PostgreSQL` implementation of the store contract.
//!
//! Writes run inside a transaction so an event's fields, including geocoded
//! coordinates, are committed together or not at all. Proximity search
//! pushes both phases into SQL: the bounding box is an indexable range
//! predicate and the law-of-cosines distance is evaluated only on rows that
//! survive it.

use std::collections::BTreeSet;

use almanac_geo::NearQuery;
use almanac_geo::geometry::EARTH_RADIUS_MILES;
use almanac_types::{
    Address, Coordinates, Event, EventId, EventStatus, NewEvent, Role, SoftDeletion, User, UserId,
};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::DbError;
use crate::postgres::PostgresPool;
use crate::store::{EventStore, EventWindow, Page, UserStore};

/// Expands to a `SELECT` over every `events` column followed by `$tail`.
macro_rules! select_events {
    ($tail:literal) => {
        concat!(
            "SELECT id, owner_id, title, event_type, flyer, description, start_time, end_time, ",
            "street, city, state, zip, latitude, longitude, status, is_deleted, deleted_at, ",
            "deleted_by, created_at, updated_at FROM events ",
            $tail
        )
    };
}

/// Column list for `RETURNING` clauses.
const RETURNING_EVENT: &str = "id, owner_id, title, event_type, flyer, description, start_time, \
    end_time, street, city, state, zip, latitude, longitude, status, is_deleted, deleted_at, \
    deleted_by, created_at, updated_at";

/// Event and user persistence on `PostgreSQL`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store over a connected pool.
    pub fn new(pool: &PostgresPool) -> Self {
        Self {
            pool: pool.pool().clone(),
        }
    }

    /// Register a user with the given roles.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails (for example on a
    /// duplicate username).
    pub async fn insert_user(&self, username: &str, roles: &BTreeSet<Role>) -> Result<User, DbError> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar("INSERT INTO users (username) VALUES ($1) RETURNING id")
            .bind(username)
            .fetch_one(&mut *tx)
            .await?;

        for role in roles {
            sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1, $2)")
                .bind(id)
                .bind(role.as_str())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        tracing::debug!(user_id = id, "Inserted user");

        Ok(User {
            id: UserId::from(id),
            username: username.to_owned(),
            roles: roles.clone(),
        })
    }

    async fn fetch_events(
        &self,
        query: sqlx::query::QueryAs<'_, sqlx::Postgres, EventRow, sqlx::postgres::PgArguments>,
    ) -> Result<Vec<Event>, DbError> {
        query
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Event::try_from)
            .collect()
    }
}

impl EventStore for PgStore {
    async fn get_by_id(&self, id: EventId) -> Result<Option<Event>, DbError> {
        sqlx::query_as::<_, EventRow>(select_events!("WHERE id = $1"))
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await?
            .map(Event::try_from)
            .transpose()
    }

    async fn get_active_by_id(&self, id: EventId) -> Result<Option<Event>, DbError> {
        sqlx::query_as::<_, EventRow>(select_events!("WHERE id = $1 AND NOT is_deleted"))
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await?
            .map(Event::try_from)
            .transpose()
    }

    async fn exists_owned_active(&self, id: EventId, owner: UserId) -> Result<bool, DbError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM events WHERE id = $1 AND owner_id = $2 AND NOT is_deleted)",
        )
        .bind(id.into_inner())
        .bind(owner.into_inner())
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn find_window(&self, window: &EventWindow) -> Result<Vec<Event>, DbError> {
        let query = sqlx::query_as::<_, EventRow>(select_events!(
            "WHERE NOT is_deleted
               AND ($1::TIMESTAMPTZ IS NULL OR start_time >= $1)
               AND ($2::TIMESTAMPTZ IS NULL OR start_time < $2)
               AND ($3::TEXT IS NULL OR status = $3)
             ORDER BY start_time, id"
        ))
        .bind(window.from)
        .bind(window.to)
        .bind(window.status.map(EventStatus::as_str));

        let events = self.fetch_events(query).await?;
        tracing::debug!(count = events.len(), "Window scan");
        Ok(events)
    }

    async fn find_upcoming(&self, now: DateTime<Utc>, page: Page) -> Result<Vec<Event>, DbError> {
        let query = sqlx::query_as::<_, EventRow>(select_events!(
            "WHERE NOT is_deleted
               AND status = $1
               AND COALESCE(end_time, start_time) >= $2
             ORDER BY start_time, id
             OFFSET $3 LIMIT $4"
        ))
        .bind(EventStatus::Active.as_str())
        .bind(now)
        .bind(i64::from(page.offset))
        .bind(i64::from(page.limit));

        self.fetch_events(query).await
    }

    async fn find_near(&self, near: &NearQuery) -> Result<Vec<Event>, DbError> {
        let query = sqlx::query_as::<_, EventRow>(select_events!(
            "WHERE NOT is_deleted
               AND status = $1
               AND latitude IS NOT NULL AND longitude IS NOT NULL
               AND latitude BETWEEN $2 AND $3
               AND longitude BETWEEN $4 AND $5
               AND $6::DOUBLE PRECISION * ACOS(LEAST(1.0, GREATEST(-1.0,
                     COS(RADIANS($7::DOUBLE PRECISION)) * COS(RADIANS(latitude))
                       * COS(RADIANS(longitude) - RADIANS($8::DOUBLE PRECISION))
                     + SIN(RADIANS($7::DOUBLE PRECISION)) * SIN(RADIANS(latitude))
                   ))) <= $9
             ORDER BY start_time, id"
        ))
        .bind(EventStatus::Active.as_str())
        .bind(near.bounds.min_lat)
        .bind(near.bounds.max_lat)
        .bind(near.bounds.min_lng)
        .bind(near.bounds.max_lng)
        .bind(EARTH_RADIUS_MILES)
        .bind(near.center.latitude)
        .bind(near.center.longitude)
        .bind(near.radius_miles);

        let events = self.fetch_events(query).await?;
        tracing::debug!(
            count = events.len(),
            radius_miles = near.radius_miles,
            "Radius scan"
        );
        Ok(events)
    }

    async fn insert(&self, event: NewEvent) -> Result<Event, DbError> {
        let sql = format!(
            "INSERT INTO events (owner_id, title, event_type, flyer, description, start_time, \
             end_time, street, city, state, zip, latitude, longitude, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {RETURNING_EVENT}"
        );

        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(event.owner_id.into_inner())
            .bind(&event.title)
            .bind(event.event_type.as_str())
            .bind(&event.flyer)
            .bind(&event.description)
            .bind(event.start)
            .bind(event.end)
            .bind(&event.address.street)
            .bind(&event.address.city)
            .bind(&event.address.state)
            .bind(&event.address.zip)
            .bind(event.coordinates.map(|c| c.latitude))
            .bind(event.coordinates.map(|c| c.longitude))
            .bind(event.status.as_str())
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        Event::try_from(row)
    }

    async fn save(&self, event: &Event) -> Result<Event, DbError> {
        let sql = format!(
            "UPDATE events SET title = $2, event_type = $3, flyer = $4, description = $5, \
             start_time = $6, end_time = $7, street = $8, city = $9, state = $10, zip = $11, \
             latitude = $12, longitude = $13, status = $14, is_deleted = $15, \
             deleted_at = $16, deleted_by = $17, updated_at = now() \
             WHERE id = $1 \
             RETURNING {RETURNING_EVENT}"
        );

        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(event.id.into_inner())
            .bind(&event.title)
            .bind(event.event_type.as_str())
            .bind(&event.flyer)
            .bind(&event.description)
            .bind(event.start)
            .bind(event.end)
            .bind(&event.address.street)
            .bind(&event.address.city)
            .bind(&event.address.state)
            .bind(&event.address.zip)
            .bind(event.coordinates.map(|c| c.latitude))
            .bind(event.coordinates.map(|c| c.longitude))
            .bind(event.status.as_str())
            .bind(event.is_deleted())
            .bind(event.deletion.map(|d| d.deleted_at))
            .bind(event.deletion.map(|d| d.deleted_by.into_inner()))
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::RowNotFound(format!("events/{}", event.id)))?;
        tx.commit().await?;

        Event::try_from(row)
    }
}

impl UserStore for PgStore {
    async fn get_user(&self, id: UserId) -> Result<Option<User>, DbError> {
        sqlx::query_as::<_, UserRow>(
            r"SELECT u.id, u.username,
                     COALESCE(ARRAY_AGG(r.role) FILTER (WHERE r.role IS NOT NULL), '{}') AS roles
              FROM users u
              LEFT JOIN user_roles r ON r.user_id = u.id
              WHERE u.id = $1
              GROUP BY u.id, u.username",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await?
        .map(User::try_from)
        .transpose()
    }
}

/// A row from the `events` table.
///
/// Enumerations are stored as text and parsed on conversion to [`Event`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRow {
    /// Event id.
    pub id: i64,
    /// Owning user id.
    pub owner_id: i64,
    /// Headline.
    pub title: String,
    /// Category name.
    pub event_type: String,
    /// Flyer reference.
    pub flyer: Option<String>,
    /// Long-form description.
    pub description: Option<String>,
    /// Start instant.
    pub start_time: DateTime<Utc>,
    /// End instant.
    pub end_time: Option<DateTime<Utc>>,
    /// Street.
    pub street: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State.
    pub state: Option<String>,
    /// Postal code.
    pub zip: Option<String>,
    /// Geocoded latitude.
    pub latitude: Option<f64>,
    /// Geocoded longitude.
    pub longitude: Option<f64>,
    /// Status name.
    pub status: String,
    /// Soft-delete flag.
    pub is_deleted: bool,
    /// When the event was deleted.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Who deleted it.
    pub deleted_by: Option<i64>,
    /// Insert timestamp.
    pub created_at: DateTime<Utc>,
    /// Last save timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = DbError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let decode = |e: almanac_types::ParseEnumError| DbError::Decode(format!("event {}: {e}", row.id));

        let event_type = row.event_type.parse().map_err(decode)?;
        let status = row.status.parse().map_err(decode)?;

        let coordinates = match (row.latitude, row.longitude) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            (None, None) => None,
            _ => {
                return Err(DbError::Decode(format!(
                    "event {}: latitude and longitude must be set together",
                    row.id
                )));
            }
        };

        let deletion = match (row.is_deleted, row.deleted_at, row.deleted_by) {
            (false, _, _) => None,
            (true, Some(deleted_at), Some(deleted_by)) => Some(SoftDeletion {
                deleted_at,
                deleted_by: UserId::from(deleted_by),
            }),
            (true, _, _) => {
                return Err(DbError::Decode(format!(
                    "event {}: deleted without deletion record",
                    row.id
                )));
            }
        };

        Ok(Self {
            id: EventId::from(row.id),
            owner_id: UserId::from(row.owner_id),
            title: row.title,
            event_type,
            flyer: row.flyer,
            description: row.description,
            start: row.start_time,
            end: row.end_time,
            address: Address {
                street: row.street,
                city: row.city,
                state: row.state,
                zip: row.zip,
            },
            coordinates,
            status,
            deletion,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A user joined with their aggregated roles.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    /// User id.
    pub id: i64,
    /// Display name.
    pub username: String,
    /// Role names.
    pub roles: Vec<String>,
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let roles = row
            .roles
            .iter()
            .map(|r| r.parse::<Role>())
            .collect::<Result<BTreeSet<_>, _>>()
            .map_err(|e| DbError::Decode(format!("user {}: {e}", row.id)))?;

        Ok(Self {
            id: UserId::from(row.id),
            username: row.username,
            roles,
        })
    }
}
