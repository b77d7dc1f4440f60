//! Type-safe identifier wrappers around store-assigned `i64` keys.
//!
//! Every persisted entity has a strongly-typed ID so an event id can never be
//! passed where a user id is expected. Values are assigned by the store
//! (`BIGSERIAL` in `PostgreSQL`, a counter in the in-memory store) and never
//! change after insertion.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around `i64` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub i64);

        impl $name {
            /// Return the inner `i64` value.
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for an event listing.
    EventId
}

define_id! {
    /// Unique identifier for a registered user.
    UserId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_serializes_as_bare_number() {
        let id = EventId::from(42);
        assert_eq!(serde_json::to_string(&id).ok().as_deref(), Some("42"));
        let back: Result<EventId, _> = serde_json::from_str("42");
        assert_eq!(back.ok(), Some(id));
    }

    #[test]
    fn id_display_matches_inner() {
        let id = UserId::from(7);
        assert_eq!(id.to_string(), "7");
        assert_eq!(i64::from(id), 7);
    }
}
