//! Error taxonomy of the event lifecycle.

use almanac_db::DbError;
use almanac_types::{EventId, UserId};

/// Errors returned by [`EventService`](crate::EventService) and
/// [`ProximitySearch`](crate::ProximitySearch).
///
/// Geocoding never appears here: it degrades to "no coordinates".
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// An event or user id does not resolve.
    #[error("{entity} {id} not found")]
    NotFound {
        /// What kind of record was looked up.
        entity: &'static str,
        /// The id that did not resolve.
        id: i64,
    },

    /// The caller is neither the owner nor a moderator.
    #[error("user {user_id} may not modify event {event_id}")]
    PermissionDenied {
        /// The caller.
        user_id: UserId,
        /// The event they tried to modify.
        event_id: EventId,
    },

    /// Input failed boundary validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The store failed.
    #[error(transparent)]
    Storage(#[from] DbError),
}

impl ServiceError {
    pub(crate) const fn event_not_found(id: EventId) -> Self {
        Self::NotFound {
            entity: "event",
            id: id.into_inner(),
        }
    }

    pub(crate) const fn user_not_found(id: UserId) -> Self {
        Self::NotFound {
            entity: "user",
            id: id.into_inner(),
        }
    }
}
