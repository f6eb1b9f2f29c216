//! Booking lifecycle: the status graph, the create guard and the
//! persistence steps that tie them to the store.

pub mod engine;
pub mod guard;
pub mod store;

use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::booking::{self, BookingStatus};

pub use engine::transition;
pub use guard::check_can_create;

/// Failures a booking operation can report.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Service is not accepting bookings")]
    ServiceUnavailable,

    #[error("You already have a pending booking for this service")]
    DuplicatePendingBooking,

    #[error("Cannot change booking status from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("You cannot book your own service")]
    SelfBooking,

    #[error("Store error: {0}")]
    Store(#[from] DbErr),
}

/// Which side of a booking the acting user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
    Provider,
    Requester,
}

impl ActorRole {
    /// Resolve the role of `actor_id` on `booking`. Users who are neither
    /// the requester nor the provider get `Forbidden`.
    pub fn resolve(booking: &booking::Model, actor_id: Uuid) -> Result<Self, BookingError> {
        if actor_id == booking.provider_id {
            Ok(ActorRole::Provider)
        } else if actor_id == booking.requester_id {
            Ok(ActorRole::Requester)
        } else {
            Err(BookingError::Forbidden("You are not a participant in this booking"))
        }
    }
}
