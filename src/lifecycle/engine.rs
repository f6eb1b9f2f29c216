use crate::entities::booking::{self, BookingStatus};

use super::{ActorRole, BookingError};

/// Who may drive an edge of the status graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Allowed {
    Provider,
    Requester,
    Either,
}

impl Allowed {
    fn permits(self, role: ActorRole) -> bool {
        match self {
            Allowed::Either => true,
            Allowed::Provider => role == ActorRole::Provider,
            Allowed::Requester => role == ActorRole::Requester,
        }
    }
}

fn edge(from: BookingStatus, to: BookingStatus) -> Option<Allowed> {
    use BookingStatus::*;

    match (from, to) {
        (Pending, Confirmed) | (Pending, Declined) => Some(Allowed::Provider),
        (Pending, Cancelled) => Some(Allowed::Requester),
        (Confirmed, Completed) | (Confirmed, Cancelled) => Some(Allowed::Either),
        _ => None,
    }
}

/// Whether `from -> to` exists in the status graph, regardless of actor.
pub fn is_legal(from: BookingStatus, to: BookingStatus) -> bool {
    edge(from, to).is_some()
}

/// Apply `requested` to `booking` on behalf of `role`.
///
/// Pure: depends only on the current status, the requested status and the
/// role. Timestamps are stamped when the new state is persisted.
pub fn transition(
    booking: &booking::Model,
    requested: BookingStatus,
    role: ActorRole,
) -> Result<booking::Model, BookingError> {
    let allowed = edge(booking.status, requested).ok_or(BookingError::InvalidTransition {
        from: booking.status,
        to: requested,
    })?;

    if !allowed.permits(role) {
        return Err(BookingError::Forbidden(match allowed {
            Allowed::Provider => "Only the provider can make this change",
            _ => "Only the requester can make this change",
        }));
    }

    let mut next = booking.clone();
    next.status = requested;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::Iterable;
    use uuid::Uuid;

    fn booking_in(status: BookingStatus) -> booking::Model {
        let now = Utc::now().into();
        booking::Model {
            id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            requester_id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            message: "Hi, is Saturday free?".to_string(),
            status,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn provider_confirms_pending() {
        let b = booking_in(BookingStatus::Pending);
        let next = transition(&b, BookingStatus::Confirmed, ActorRole::Provider).unwrap();
        assert_eq!(next.status, BookingStatus::Confirmed);
        assert_eq!(next.id, b.id);
        assert_eq!(next.message, b.message);
    }

    #[test]
    fn provider_declines_pending() {
        let b = booking_in(BookingStatus::Pending);
        let next = transition(&b, BookingStatus::Declined, ActorRole::Provider).unwrap();
        assert_eq!(next.status, BookingStatus::Declined);
    }

    #[test]
    fn requester_cannot_confirm() {
        let b = booking_in(BookingStatus::Pending);
        let err = transition(&b, BookingStatus::Confirmed, ActorRole::Requester).unwrap_err();
        assert!(matches!(err, BookingError::Forbidden(_)));
    }

    #[test]
    fn only_requester_cancels_pending() {
        let b = booking_in(BookingStatus::Pending);
        assert!(transition(&b, BookingStatus::Cancelled, ActorRole::Requester).is_ok());
        let err = transition(&b, BookingStatus::Cancelled, ActorRole::Provider).unwrap_err();
        assert!(matches!(err, BookingError::Forbidden(_)));
    }

    #[test]
    fn either_party_finishes_confirmed() {
        let b = booking_in(BookingStatus::Confirmed);
        for role in [ActorRole::Provider, ActorRole::Requester] {
            assert!(transition(&b, BookingStatus::Completed, role).is_ok());
            assert!(transition(&b, BookingStatus::Cancelled, role).is_ok());
        }
    }

    #[test]
    fn confirmed_cannot_go_back_to_pending() {
        let b = booking_in(BookingStatus::Confirmed);
        let err = transition(&b, BookingStatus::Pending, ActorRole::Requester).unwrap_err();
        assert!(matches!(
            err,
            BookingError::InvalidTransition {
                from: BookingStatus::Confirmed,
                to: BookingStatus::Pending
            }
        ));
    }

    #[test]
    fn same_status_is_rejected() {
        for status in BookingStatus::iter() {
            let b = booking_in(status);
            for role in [ActorRole::Provider, ActorRole::Requester] {
                let err = transition(&b, status, role).unwrap_err();
                assert!(matches!(err, BookingError::InvalidTransition { .. }));
            }
        }
    }

    #[test]
    fn terminal_statuses_have_no_exits() {
        for from in BookingStatus::iter().filter(|s| s.is_terminal()) {
            for to in BookingStatus::iter() {
                assert!(!is_legal(from, to), "{from} -> {to} should be illegal");
            }
        }
    }

    #[test]
    fn only_table_edges_are_legal() {
        let expected = [
            (BookingStatus::Pending, BookingStatus::Confirmed),
            (BookingStatus::Pending, BookingStatus::Declined),
            (BookingStatus::Pending, BookingStatus::Cancelled),
            (BookingStatus::Confirmed, BookingStatus::Completed),
            (BookingStatus::Confirmed, BookingStatus::Cancelled),
        ];

        for from in BookingStatus::iter() {
            for to in BookingStatus::iter() {
                assert_eq!(is_legal(from, to), expected.contains(&(from, to)), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn nothing_returns_to_pending() {
        for from in BookingStatus::iter() {
            assert!(!is_legal(from, BookingStatus::Pending));
        }
    }
}
