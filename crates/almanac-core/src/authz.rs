//! Ownership and role authorization for event mutations.

use almanac_types::{Event, User};

use crate::error::ServiceError;

/// Whether `user` may modify `event`: they own it, or they hold a role that
/// can moderate.
pub fn can_modify(user: &User, event: &Event) -> bool {
    user.id == event.owner_id || user.is_moderator()
}

/// Fail with [`ServiceError::PermissionDenied`] unless [`can_modify`] holds.
///
/// # Errors
///
/// Returns [`ServiceError::PermissionDenied`] for a non-owner without an
/// elevated role.
pub fn ensure_can_modify(user: &User, event: &Event) -> Result<(), ServiceError> {
    if can_modify(user, event) {
        Ok(())
    } else {
        tracing::warn!(
            user_id = %user.id,
            event_id = %event.id,
            "Modification denied"
        );
        Err(ServiceError::PermissionDenied {
            user_id: user.id,
            event_id: event.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use almanac_types::{Address, EventId, EventStatus, EventType, Role, UserId};
    use chrono::Utc;

    use super::*;

    fn user(id: i64, roles: &[Role]) -> User {
        User {
            id: UserId::from(id),
            username: format!("user{id}"),
            roles: roles.iter().copied().collect::<BTreeSet<_>>(),
        }
    }

    fn owned_by(owner: i64) -> Event {
        let now = Utc::now();
        Event {
            id: EventId::from(10),
            owner_id: UserId::from(owner),
            title: String::from("Poker run"),
            event_type: EventType::Charity,
            flyer: None,
            description: None,
            start: now,
            end: None,
            address: Address::default(),
            coordinates: None,
            status: EventStatus::Active,
            deletion: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn owner_may_modify() {
        assert!(ensure_can_modify(&user(1, &[Role::User]), &owned_by(1)).is_ok());
        assert!(ensure_can_modify(&user(1, &[]), &owned_by(1)).is_ok());
    }

    #[test]
    fn moderators_may_modify_anything() {
        assert!(can_modify(&user(2, &[Role::Mod]), &owned_by(1)));
        assert!(can_modify(&user(3, &[Role::User, Role::Admin]), &owned_by(1)));
    }

    #[test]
    fn stranger_is_denied() {
        let result = ensure_can_modify(&user(2, &[Role::User]), &owned_by(1));
        assert!(matches!(
            result,
            Err(ServiceError::PermissionDenied { user_id, .. }) if user_id == UserId::from(2)
        ));
    }
}
