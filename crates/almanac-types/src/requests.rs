//! Request payloads accepted by the event lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::EventType;
use crate::patch::Patch;
use crate::structs::Address;

/// Fields supplied when creating an event. The owner comes from the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEventRequest {
    /// Headline; must not be blank.
    pub title: String,
    /// Category.
    pub event_type: EventType,
    /// Flyer image reference.
    #[serde(default)]
    pub flyer: Option<String>,
    /// Start instant.
    pub start: DateTime<Utc>,
    /// End instant; must not precede `start`.
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    /// Street and number.
    #[serde(default)]
    pub street: Option<String>,
    /// City or town.
    #[serde(default)]
    pub city: Option<String>,
    /// State or region.
    #[serde(default)]
    pub state: Option<String>,
    /// Postal code.
    #[serde(default)]
    pub zip: Option<String>,
    /// Long-form description.
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateEventRequest {
    /// The address components of the request.
    pub fn address(&self) -> Address {
        Address {
            street: self.street.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip: self.zip.clone(),
        }
    }
}

/// Partial update of an event. Absent fields are left untouched.
///
/// Non-nullable fields use `Option` (absent or set). Nullable fields use
/// [`Patch`] so an explicit `null` clears the stored value. `status` is
/// carried as raw text and validated by the lifecycle manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    /// New headline.
    #[serde(default)]
    pub title: Option<String>,
    /// New category.
    #[serde(default)]
    pub event_type: Option<EventType>,
    /// New flyer reference, or `null` to remove it.
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub flyer: Patch<String>,
    /// New start instant.
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    /// New end instant, or `null` to remove it.
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub end: Patch<DateTime<Utc>>,
    /// New street.
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub street: Patch<String>,
    /// New city.
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub city: Patch<String>,
    /// New state.
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub state: Patch<String>,
    /// New postal code.
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub zip: Patch<String>,
    /// New description, or `null` to remove it.
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub description: Patch<String>,
    /// New status name (e.g. `CANCELLED`).
    #[serde(default)]
    pub status: Option<String>,
}

impl UpdateEventRequest {
    /// Whether any address component is mentioned in the request.
    pub const fn touches_address(&self) -> bool {
        self.street.is_present()
            || self.city.is_present()
            || self.state.is_present()
            || self.zip.is_present()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_only_update_leaves_everything_else_absent() {
        let req: UpdateEventRequest =
            serde_json::from_str(r#"{"title": "Moved indoors"}"#).unwrap_or_default();
        assert_eq!(req.title.as_deref(), Some("Moved indoors"));
        assert_eq!(req.street, Patch::Keep);
        assert_eq!(req.end, Patch::Keep);
        assert!(req.start.is_none());
        assert!(req.status.is_none());
        assert!(!req.touches_address());
    }

    #[test]
    fn clearing_an_address_part_counts_as_touching_it() {
        let req: UpdateEventRequest =
            serde_json::from_str(r#"{"zip": null}"#).unwrap_or_default();
        assert_eq!(req.zip, Patch::Clear);
        assert!(req.touches_address());
    }

    #[test]
    fn title_only_update_survives_a_serde_round_trip() {
        let req = UpdateEventRequest {
            title: Some(String::from("Renamed")),
            ..UpdateEventRequest::default()
        };
        let json = serde_json::to_value(&req).unwrap_or_default();
        assert!(json.get("street").is_none());
        assert!(json.get("end").is_none());

        let back: UpdateEventRequest = serde_json::from_value(json).unwrap_or_default();
        assert_eq!(back, req);
        assert!(!back.touches_address());
    }

    #[test]
    fn cleared_fields_survive_a_serde_round_trip() {
        let req = UpdateEventRequest {
            description: Patch::Clear,
            city: Patch::Set(String::from("Deadwood")),
            ..UpdateEventRequest::default()
        };
        let json = serde_json::to_string(&req).unwrap_or_default();
        let back: UpdateEventRequest = serde_json::from_str(&json).unwrap_or_default();
        assert_eq!(back, req);
    }

    #[test]
    fn create_request_defaults_optional_fields() {
        let json = r#"{"title": "Bike Night", "event_type": "BIKE_NIGHT", "start": "2026-06-01T23:00:00Z"}"#;
        let req: Result<CreateEventRequest, _> = serde_json::from_str(json);
        let req = req.ok();
        assert_eq!(req.as_ref().map(|r| r.event_type), Some(EventType::BikeNight));
        assert!(req.is_some_and(|r| r.address().is_blank()));
    }
}
