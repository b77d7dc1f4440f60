//! The event lifecycle manager.
//!
//! [`EventService`] orchestrates create, read, update, and soft delete on top
//! of the store traits. It owns the rules the store does not know about:
//!
//! - the owner comes from the caller and never changes afterwards
//! - only the owner or a moderator may update or delete
//! - an update applies only the fields present in the request
//! - touching any address component re-runs geocoding
//! - deletion flips the soft-delete record; rows are never removed
//!
//! Each mutation ends in exactly one store write, so the fields of one event
//! (geocoded coordinates included) land together.

use std::sync::Arc;

use almanac_db::{EventStore, EventWindow, Page, UserStore};
use almanac_geo::Geocoder;
use almanac_types::{
    CreateEventRequest, Event, EventId, EventStatus, NewEvent, SoftDeletion, UpcomingEvent,
    UpdateEventRequest, User, UserId,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::authz::ensure_can_modify;
use crate::enrichment::enrich;
use crate::error::ServiceError;

/// Fewest cards the upcoming strip returns.
pub const MIN_UPCOMING: i64 = 1;

/// Most cards the upcoming strip returns.
pub const MAX_UPCOMING: i64 = 12;

/// Event lifecycle operations over a store and a geocoder.
pub struct EventService<S, G> {
    store: Arc<S>,
    geocoder: G,
}

impl<S, G> EventService<S, G>
where
    S: EventStore + UserStore,
    G: Geocoder,
{
    /// Create a service over a shared store.
    pub const fn new(store: Arc<S>, geocoder: G) -> Self {
        Self { store, geocoder }
    }

    /// The underlying store.
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Create an event owned by `owner_id`.
    ///
    /// The event starts `ACTIVE`. If any address component is non-blank the
    /// address is geocoded; a failed lookup leaves the event without
    /// coordinates but does not fail the create.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if the owner does not exist
    /// - [`ServiceError::Validation`] for a blank title or an end before the start
    /// - [`ServiceError::Storage`] if the store fails
    pub async fn create(
        &self,
        owner_id: UserId,
        request: CreateEventRequest,
    ) -> Result<Event, ServiceError> {
        let owner = self.require_user(owner_id).await?;

        let title = non_blank_title(&request.title)?;
        check_chronology(request.start, request.end)?;

        let address = request.address();
        let mut coordinates = None;
        enrich(&self.geocoder, &address, &mut coordinates).await;

        let event = self
            .store
            .insert(NewEvent {
                owner_id: owner.id,
                title,
                event_type: request.event_type,
                flyer: request.flyer,
                description: request.description,
                start: request.start,
                end: request.end,
                address,
                coordinates,
                status: EventStatus::Active,
            })
            .await?;

        info!(
            event_id = %event.id,
            owner_id = %owner.id,
            geocoded = event.coordinates.is_some(),
            "Event created"
        );
        Ok(event)
    }

    /// Fetch an event by id, including soft-deleted ones.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if no event has this id.
    pub async fn get(&self, id: EventId) -> Result<Event, ServiceError> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::event_not_found(id))
    }

    /// Fetch a live event by id.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if no event has this id or it has
    /// been soft-deleted.
    pub async fn get_active(&self, id: EventId) -> Result<Event, ServiceError> {
        self.store
            .get_active_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::event_not_found(id))
    }

    /// Fetch an event, deleted or not, on behalf of someone allowed to
    /// modify it.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotFound`] for an unknown event or caller, and
    /// [`ServiceError::PermissionDenied`] for anyone but the owner or a
    /// moderator.
    pub async fn audit(&self, id: EventId, current: UserId) -> Result<Event, ServiceError> {
        let event = self.get(id).await?;
        let user = self.require_user(current).await?;
        ensure_can_modify(&user, &event)?;
        Ok(event)
    }

    /// Active, live events starting in `[from, to)`, by start ascending.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] if the store fails.
    pub async fn list(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Event>, ServiceError> {
        let events = self.store.find_window(&EventWindow::active(from, to)).await?;
        debug!(count = events.len(), "Listed events");
        Ok(events)
    }

    /// Apply a partial update on behalf of `current`.
    ///
    /// Absent fields are untouched and a `null` clears a nullable field. The
    /// status, when given, must name an [`EventStatus`]. If any address
    /// component is present the address is geocoded again; a failed lookup
    /// keeps the previous coordinates.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] for an unknown or deleted event, or an unknown caller
    /// - [`ServiceError::PermissionDenied`] if the caller may not modify the event
    /// - [`ServiceError::Validation`] for a bad status, a blank title, or an end before the start
    /// - [`ServiceError::Storage`] if the store fails
    pub async fn update(
        &self,
        id: EventId,
        current: UserId,
        request: UpdateEventRequest,
    ) -> Result<Event, ServiceError> {
        let mut event = self.get_active(id).await?;
        let user = self.require_user(current).await?;
        ensure_can_modify(&user, &event)?;

        let status = request
            .status
            .as_deref()
            .map(str::parse::<EventStatus>)
            .transpose()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;
        let readdress = request.touches_address();

        if let Some(title) = request.title.as_deref() {
            event.title = non_blank_title(title)?;
        }
        if let Some(event_type) = request.event_type {
            event.event_type = event_type;
        }
        if let Some(start) = request.start {
            event.start = start;
        }
        if let Some(status) = status {
            event.status = status;
        }
        request.flyer.apply_to(&mut event.flyer);
        request.end.apply_to(&mut event.end);
        request.description.apply_to(&mut event.description);
        request.street.apply_to(&mut event.address.street);
        request.city.apply_to(&mut event.address.city);
        request.state.apply_to(&mut event.address.state);
        request.zip.apply_to(&mut event.address.zip);

        check_chronology(event.start, event.end)?;

        if readdress {
            enrich(&self.geocoder, &event.address, &mut event.coordinates).await;
        }

        let saved = self.store.save(&event).await?;
        info!(
            event_id = %saved.id,
            user_id = %user.id,
            readdressed = readdress,
            "Event updated"
        );
        Ok(saved)
    }

    /// Soft-delete an event on behalf of `current`.
    ///
    /// Deleting an event that is already deleted changes nothing and keeps
    /// the original deletion record.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] for an unknown event or caller
    /// - [`ServiceError::PermissionDenied`] if the caller may not modify the event
    /// - [`ServiceError::Storage`] if the store fails
    pub async fn delete(&self, id: EventId, current: UserId) -> Result<Event, ServiceError> {
        let mut event = self.get(id).await?;
        let user = self.require_user(current).await?;
        ensure_can_modify(&user, &event)?;

        if event.is_deleted() {
            debug!(event_id = %id, "Event already deleted");
            return Ok(event);
        }

        event.deletion = Some(SoftDeletion {
            deleted_at: Utc::now(),
            deleted_by: user.id,
        });
        let saved = self.store.save(&event).await?;

        info!(event_id = %saved.id, user_id = %user.id, "Event deleted");
        Ok(saved)
    }

    /// The next active events that have not finished yet, as cards.
    ///
    /// `limit` is clamped to [`MIN_UPCOMING`]..=[`MAX_UPCOMING`].
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] if the store fails.
    pub async fn upcoming(&self, limit: i64) -> Result<Vec<UpcomingEvent>, ServiceError> {
        let limit = clamp_upcoming(limit);
        let events = self
            .store
            .find_upcoming(Utc::now(), Page::first(limit))
            .await?;
        Ok(events.iter().map(UpcomingEvent::from).collect())
    }

    /// Whether `user` owns the live event `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] if the store fails.
    pub async fn is_owner(&self, id: EventId, user: UserId) -> Result<bool, ServiceError> {
        Ok(self.store.exists_owned_active(id, user).await?)
    }

    async fn require_user(&self, id: UserId) -> Result<User, ServiceError> {
        self.store
            .get_user(id)
            .await?
            .ok_or_else(|| ServiceError::user_not_found(id))
    }
}

fn clamp_upcoming(limit: i64) -> u32 {
    u32::try_from(limit.clamp(MIN_UPCOMING, MAX_UPCOMING)).unwrap_or(1)
}

fn non_blank_title(title: &str) -> Result<String, ServiceError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ServiceError::Validation(String::from("title must not be blank")));
    }
    Ok(title.to_owned())
}

fn check_chronology(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Result<(), ServiceError> {
    match end {
        Some(end) if end < start => Err(ServiceError::Validation(String::from(
            "end must not be before start",
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use almanac_db::MemoryStore;
    use almanac_types::{Coordinates, EventType, Patch, Role};
    use chrono::Duration;

    use super::*;
    use crate::testing::RecordingGeocoder;

    struct Fixture {
        service: EventService<MemoryStore, RecordingGeocoder>,
        owner: User,
        stranger: User,
        moderator: User,
        admin: User,
    }

    async fn fixture(geocoder: RecordingGeocoder) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let owner = store.add_user("owner", [Role::User]).await.unwrap();
        let stranger = store.add_user("stranger", [Role::User]).await.unwrap();
        let moderator = store.add_user("moderator", [Role::User, Role::Mod]).await.unwrap();
        let admin = store.add_user("admin", [Role::Admin]).await.unwrap();
        Fixture {
            service: EventService::new(store, geocoder),
            owner,
            stranger,
            moderator,
            admin,
        }
    }

    fn request(title: &str, start: DateTime<Utc>) -> CreateEventRequest {
        CreateEventRequest {
            title: title.to_owned(),
            event_type: EventType::Ride,
            flyer: Some(String::from("flyers/ride.png")),
            start,
            end: Some(start + Duration::hours(3)),
            street: Some(String::from("123 Main St")),
            city: Some(String::from("Sturgis")),
            state: Some(String::from("SD")),
            zip: None,
            description: Some(String::from("Kickstands up at noon")),
        }
    }

    fn addressless(title: &str, start: DateTime<Utc>) -> CreateEventRequest {
        CreateEventRequest {
            street: None,
            city: Some(String::from("  ")),
            state: None,
            zip: Some(String::new()),
            ..request(title, start)
        }
    }

    fn soon() -> DateTime<Utc> {
        Utc::now() + Duration::days(7)
    }

    // -- create --------------------------------------------------------------

    #[tokio::test]
    async fn create_geocodes_address() {
        let f = fixture(RecordingGeocoder::found(44.41, -103.51)).await;
        let event = f.service.create(f.owner.id, request("Rally", soon())).await.unwrap();

        assert_eq!(event.owner_id, f.owner.id);
        assert_eq!(event.status, EventStatus::Active);
        assert!(!event.is_deleted());
        assert_eq!(event.coordinates, Some(Coordinates::new(44.41, -103.51)));
        assert_eq!(
            f.service.geocoder.calls().await,
            vec![String::from("123 Main St, Sturgis, SD")]
        );
    }

    #[tokio::test]
    async fn create_with_blank_address_never_geocodes() {
        let f = fixture(RecordingGeocoder::found(1.0, 1.0)).await;
        let event = f.service.create(f.owner.id, addressless("Ride", soon())).await.unwrap();

        assert_eq!(event.coordinates, None);
        assert!(f.service.geocoder.calls().await.is_empty());
    }

    #[tokio::test]
    async fn create_survives_unavailable_geocoder() {
        let f = fixture(RecordingGeocoder::unavailable()).await;
        let event = f.service.create(f.owner.id, request("Ride", soon())).await.unwrap();

        assert_eq!(event.coordinates, None);
        assert_eq!(f.service.geocoder.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn create_validates_input() {
        let f = fixture(RecordingGeocoder::unavailable()).await;

        let missing_owner = f.service.create(UserId::from(404), request("Ride", soon())).await;
        assert!(matches!(
            missing_owner,
            Err(ServiceError::NotFound { entity: "user", id: 404 })
        ));

        let blank = f.service.create(f.owner.id, request("  ", soon())).await;
        assert!(matches!(blank, Err(ServiceError::Validation(_))));

        let mut backwards = request("Ride", soon());
        backwards.end = Some(backwards.start - Duration::minutes(1));
        let backwards = f.service.create(f.owner.id, backwards).await;
        assert!(matches!(backwards, Err(ServiceError::Validation(_))));
    }

    // -- update --------------------------------------------------------------

    #[tokio::test]
    async fn title_only_update_leaves_everything_else() {
        let f = fixture(RecordingGeocoder::found(44.41, -103.51)).await;
        let created = f.service.create(f.owner.id, request("Ride", soon())).await.unwrap();

        let update = UpdateEventRequest {
            title: Some(String::from("Sunset Ride")),
            ..UpdateEventRequest::default()
        };
        let updated = f.service.update(created.id, f.owner.id, update).await.unwrap();

        assert_eq!(updated.title, "Sunset Ride");
        assert_eq!(updated.start, created.start);
        assert_eq!(updated.end, created.end);
        assert_eq!(updated.address, created.address);
        assert_eq!(updated.status, created.status);
        assert_eq!(updated.coordinates, created.coordinates);
        assert_eq!(updated.flyer, created.flyer);
        assert_eq!(f.service.geocoder.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn street_only_update_regeocodes() {
        let f = fixture(RecordingGeocoder::found(44.41, -103.51)).await;
        let created = f.service.create(f.owner.id, request("Ride", soon())).await.unwrap();

        let update = UpdateEventRequest {
            street: Patch::Set(String::from("1 Lazelle St")),
            ..UpdateEventRequest::default()
        };
        let updated = f.service.update(created.id, f.owner.id, update).await.unwrap();

        assert_eq!(updated.address.city.as_deref(), Some("Sturgis"));
        assert_eq!(
            f.service.geocoder.calls().await,
            vec![
                String::from("123 Main St, Sturgis, SD"),
                String::from("1 Lazelle St, Sturgis, SD"),
            ]
        );
    }

    #[tokio::test]
    async fn failed_regeocode_keeps_coordinates() {
        let f = fixture(RecordingGeocoder::unavailable()).await;
        let created = f.service.create(f.owner.id, request("Ride", soon())).await.unwrap();

        // Seed coordinates directly, as if an earlier lookup had succeeded.
        let mut seeded = created.clone();
        seeded.coordinates = Some(Coordinates::new(44.41, -103.51));
        f.service.store().save(&seeded).await.unwrap();

        let update = UpdateEventRequest {
            zip: Patch::Set(String::from("57785")),
            ..UpdateEventRequest::default()
        };
        let updated = f.service.update(created.id, f.owner.id, update).await.unwrap();

        assert_eq!(updated.address.zip.as_deref(), Some("57785"));
        assert_eq!(updated.coordinates, Some(Coordinates::new(44.41, -103.51)));
    }

    #[tokio::test]
    async fn explicit_null_clears_nullable_fields() {
        let f = fixture(RecordingGeocoder::unavailable()).await;
        let created = f.service.create(f.owner.id, request("Ride", soon())).await.unwrap();

        let update = UpdateEventRequest {
            end: Patch::Clear,
            flyer: Patch::Clear,
            ..UpdateEventRequest::default()
        };
        let updated = f.service.update(created.id, f.owner.id, update).await.unwrap();

        assert_eq!(updated.end, None);
        assert_eq!(updated.flyer, None);
        assert_eq!(updated.description, created.description);
    }

    #[tokio::test]
    async fn status_must_be_known() {
        let f = fixture(RecordingGeocoder::unavailable()).await;
        let created = f.service.create(f.owner.id, request("Ride", soon())).await.unwrap();

        let bad = UpdateEventRequest {
            title: Some(String::from("Should not stick")),
            status: Some(String::from("ARCHIVED")),
            ..UpdateEventRequest::default()
        };
        let result = f.service.update(created.id, f.owner.id, bad).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
        assert_eq!(f.service.get(created.id).await.unwrap().title, "Ride");

        let good = UpdateEventRequest {
            status: Some(String::from("POSTPONED")),
            ..UpdateEventRequest::default()
        };
        let updated = f.service.update(created.id, f.owner.id, good).await.unwrap();
        assert_eq!(updated.status, EventStatus::Postponed);
    }

    #[tokio::test]
    async fn update_cannot_move_end_before_start() {
        let f = fixture(RecordingGeocoder::unavailable()).await;
        let created = f.service.create(f.owner.id, request("Ride", soon())).await.unwrap();

        let update = UpdateEventRequest {
            start: Some(created.start + Duration::days(1)),
            ..UpdateEventRequest::default()
        };
        let result = f.service.update(created.id, f.owner.id, update).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn only_owner_and_moderators_may_update() {
        let f = fixture(RecordingGeocoder::unavailable()).await;
        let created = f.service.create(f.owner.id, request("Ride", soon())).await.unwrap();
        let rename = |t: &str| UpdateEventRequest {
            title: Some(t.to_owned()),
            ..UpdateEventRequest::default()
        };

        let denied = f.service.update(created.id, f.stranger.id, rename("Mine now")).await;
        assert!(matches!(denied, Err(ServiceError::PermissionDenied { .. })));

        for user in [&f.owner, &f.moderator, &f.admin] {
            let updated = f
                .service
                .update(created.id, user.id, rename(&user.username))
                .await
                .unwrap();
            assert_eq!(updated.title, user.username);
            assert_eq!(updated.owner_id, f.owner.id);
        }
    }

    #[tokio::test]
    async fn update_unknown_targets() {
        let f = fixture(RecordingGeocoder::unavailable()).await;
        let created = f.service.create(f.owner.id, request("Ride", soon())).await.unwrap();

        let missing_event = f
            .service
            .update(EventId::from(999), f.owner.id, UpdateEventRequest::default())
            .await;
        assert!(matches!(missing_event, Err(ServiceError::NotFound { entity: "event", .. })));

        let missing_user = f
            .service
            .update(created.id, UserId::from(999), UpdateEventRequest::default())
            .await;
        assert!(matches!(missing_user, Err(ServiceError::NotFound { entity: "user", .. })));
    }

    // -- delete --------------------------------------------------------------

    #[tokio::test]
    async fn delete_is_soft_and_hides_event() {
        let f = fixture(RecordingGeocoder::unavailable()).await;
        let created = f.service.create(f.owner.id, request("Ride", soon())).await.unwrap();

        let deleted = f.service.delete(created.id, f.owner.id).await.unwrap();
        let deletion = deleted.deletion.unwrap();
        assert_eq!(deletion.deleted_by, f.owner.id);

        assert!(f.service.get(created.id).await.unwrap().is_deleted());
        assert!(matches!(
            f.service.get_active(created.id).await,
            Err(ServiceError::NotFound { .. })
        ));
        assert!(f.service.list(None, None).await.unwrap().is_empty());
        assert!(f.service.upcoming(12).await.unwrap().is_empty());
        assert!(!f.service.is_owner(created.id, f.owner.id).await.unwrap());

        let update = f
            .service
            .update(created.id, f.owner.id, UpdateEventRequest::default())
            .await;
        assert!(matches!(update, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn second_delete_keeps_original_record() {
        let f = fixture(RecordingGeocoder::unavailable()).await;
        let created = f.service.create(f.owner.id, request("Ride", soon())).await.unwrap();

        let first = f.service.delete(created.id, f.owner.id).await.unwrap();
        let second = f.service.delete(created.id, f.moderator.id).await.unwrap();
        assert_eq!(first.deletion, second.deletion);
    }

    #[tokio::test]
    async fn stranger_cannot_delete() {
        let f = fixture(RecordingGeocoder::unavailable()).await;
        let created = f.service.create(f.owner.id, request("Ride", soon())).await.unwrap();

        let denied = f.service.delete(created.id, f.stranger.id).await;
        assert!(matches!(denied, Err(ServiceError::PermissionDenied { .. })));
        assert!(!f.service.get(created.id).await.unwrap().is_deleted());

        let deleted = f.service.delete(created.id, f.admin.id).await.unwrap();
        assert_eq!(deleted.deletion.map(|d| d.deleted_by), Some(f.admin.id));
    }

    // -- reads ---------------------------------------------------------------

    #[tokio::test]
    async fn list_is_ordered_and_active_only() {
        let f = fixture(RecordingGeocoder::unavailable()).await;
        let base = soon();
        let later = f.service.create(f.owner.id, addressless("later", base + Duration::days(2))).await.unwrap();
        let first = f.service.create(f.owner.id, addressless("first", base)).await.unwrap();
        let cancelled = f.service.create(f.owner.id, addressless("off", base + Duration::days(1))).await.unwrap();
        f.service
            .update(
                cancelled.id,
                f.owner.id,
                UpdateEventRequest {
                    status: Some(String::from("CANCELLED")),
                    ..UpdateEventRequest::default()
                },
            )
            .await
            .unwrap();

        let all = f.service.list(None, None).await.unwrap();
        assert_eq!(all.iter().map(|e| e.id).collect::<Vec<_>>(), vec![first.id, later.id]);

        let bounded = f
            .service
            .list(Some(base), Some(base + Duration::days(2)))
            .await
            .unwrap();
        assert_eq!(bounded.iter().map(|e| e.id).collect::<Vec<_>>(), vec![first.id]);
    }

    #[tokio::test]
    async fn upcoming_clamps_limit_and_projects_location() {
        let f = fixture(RecordingGeocoder::unavailable()).await;
        for day in 1..=15 {
            let mut r = request("Ride", Utc::now() + Duration::days(day));
            r.state = Some(String::new());
            r.zip = Some(String::from(" 57785 "));
            f.service.create(f.owner.id, r).await.unwrap();
        }

        let cards = f.service.upcoming(50).await.unwrap();
        assert_eq!(cards.len(), 12);
        assert!(cards.windows(2).all(|w| w[0].start <= w[1].start));
        assert_eq!(cards[0].location, "123 Main St, Sturgis, 57785");

        assert_eq!(f.service.upcoming(0).await.unwrap().len(), 1);
        assert_eq!(f.service.upcoming(-3).await.unwrap().len(), 1);
        assert_eq!(f.service.upcoming(6).await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn upcoming_skips_finished_events() {
        let f = fixture(RecordingGeocoder::unavailable()).await;
        let mut past = request("Done", Utc::now() - Duration::days(2));
        past.end = Some(Utc::now() - Duration::days(1));
        f.service.create(f.owner.id, past).await.unwrap();

        let mut ongoing = request("Still going", Utc::now() - Duration::days(1));
        ongoing.end = Some(Utc::now() + Duration::days(1));
        let ongoing = f.service.create(f.owner.id, ongoing).await.unwrap();

        let cards = f.service.upcoming(12).await.unwrap();
        assert_eq!(cards.iter().map(|c| c.id).collect::<Vec<_>>(), vec![ongoing.id]);
    }

    #[tokio::test]
    async fn audit_requires_modify_rights() {
        let f = fixture(RecordingGeocoder::unavailable()).await;
        let created = f.service.create(f.owner.id, request("Ride", soon())).await.unwrap();
        f.service.delete(created.id, f.owner.id).await.unwrap();

        assert!(f.service.audit(created.id, f.owner.id).await.unwrap().is_deleted());
        assert!(f.service.audit(created.id, f.moderator.id).await.is_ok());
        assert!(matches!(
            f.service.audit(created.id, f.stranger.id).await,
            Err(ServiceError::PermissionDenied { .. })
        ));
    }

    #[tokio::test]
    async fn ownership_check() {
        let f = fixture(RecordingGeocoder::unavailable()).await;
        let created = f.service.create(f.owner.id, request("Ride", soon())).await.unwrap();

        assert!(f.service.is_owner(created.id, f.owner.id).await.unwrap());
        assert!(!f.service.is_owner(created.id, f.moderator.id).await.unwrap());
        assert!(!f.service.is_owner(EventId::from(77), f.owner.id).await.unwrap());
    }

    #[test]
    fn upcoming_limit_bounds() {
        assert_eq!(clamp_upcoming(i64::MIN), 1);
        assert_eq!(clamp_upcoming(7), 7);
        assert_eq!(clamp_upcoming(i64::MAX), 12);
    }
}
