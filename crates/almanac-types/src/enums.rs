//! Enumeration types for event listings and user roles.
//!
//! Every enum serializes as its `SCREAMING_SNAKE_CASE` name, which is also the
//! text stored in `PostgreSQL`. Parsing is exact and case-sensitive.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A text value did not name any variant of the target enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct ParseEnumError {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Implements `as_str`, `Display`, `FromStr` and `ALL` for a fieldless enum.
macro_rules! text_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The stored and serialized name of this variant.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(ParseEnumError {
                        kind: $kind,
                        value: other.to_owned(),
                    }),
                }
            }
        }
    };
}

/// Publication status of an event.
///
/// Any variant may be set by an authorized editor; there is no state machine.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum EventStatus {
    /// Listed and visible in browsing and search.
    #[default]
    Active,
    /// Called off by the organizer.
    Cancelled,
    /// Moved to a date not yet announced.
    Postponed,
    /// Already took place.
    Completed,
}

text_enum!(EventStatus, "event status", {
    Active => "ACTIVE",
    Cancelled => "CANCELLED",
    Postponed => "POSTPONED",
    Completed => "COMPLETED",
});

/// Category of a motorcycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum EventType {
    /// Group ride.
    Ride,
    /// Multi-day rally.
    Rally,
    /// Recurring evening meetup at a venue.
    BikeNight,
    /// Bike show or exhibition.
    Show,
    /// Track or off-road race.
    Race,
    /// Charity or memorial run.
    Charity,
    /// Informal club meetup.
    Meetup,
    /// Anything else.
    Other,
}

text_enum!(EventType, "event type", {
    Ride => "RIDE",
    Rally => "RALLY",
    BikeNight => "BIKE_NIGHT",
    Show => "SHOW",
    Race => "RACE",
    Charity => "CHARITY",
    Meetup => "MEETUP",
    Other => "OTHER",
});

/// A role held by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum Role {
    /// Regular rider account.
    User,
    /// Community moderator.
    Mod,
    /// Site administrator.
    Admin,
}

text_enum!(Role, "role", {
    User => "USER",
    Mod => "MOD",
    Admin => "ADMIN",
});

impl Role {
    /// Whether this role may modify events owned by other users.
    pub const fn can_moderate(self) -> bool {
        matches!(self, Self::Mod | Self::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_exact_names_only() {
        assert_eq!("ACTIVE".parse::<EventStatus>(), Ok(EventStatus::Active));
        assert_eq!("CANCELLED".parse::<EventStatus>(), Ok(EventStatus::Cancelled));
        assert!("active".parse::<EventStatus>().is_err());
        assert!("DELETED".parse::<EventStatus>().is_err());
    }

    #[test]
    fn text_matches_serde_name() {
        for status in EventStatus::ALL {
            let json = serde_json::to_string(status).unwrap_or_default();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        for kind in EventType::ALL {
            let json = serde_json::to_string(kind).unwrap_or_default();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn only_mod_and_admin_moderate() {
        assert!(Role::Admin.can_moderate());
        assert!(Role::Mod.can_moderate());
        assert!(!Role::User.can_moderate());
    }

    #[test]
    fn parse_error_names_the_enum() {
        let err = "NOPE".parse::<Role>().err();
        assert_eq!(
            err.map(|e| e.to_string()).as_deref(),
            Some("unknown role value: \"NOPE\"")
        );
    }
}
