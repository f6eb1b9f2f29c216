use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::booking::{self, BookingStatus};
use crate::entities::service;

use super::BookingError;

/// Check that `requester_id` may open a new booking on `service_id`.
///
/// Checks run in order and stop at the first failure: the service exists,
/// it is active, it is not the requester's own, and the requester holds no
/// pending booking for it. Returns the service so the caller can copy its
/// owner onto the booking.
///
/// Run this on the same transaction as the insert; the partial unique index
/// on pending bookings catches whatever still slips through.
pub async fn check_can_create<C: ConnectionTrait>(
    conn: &C,
    service_id: Uuid,
    requester_id: Uuid,
) -> Result<service::Model, BookingError> {
    let service = service::Entity::find_by_id(service_id)
        .one(conn)
        .await?
        .ok_or(BookingError::NotFound("Service"))?;

    if !service.is_active {
        return Err(BookingError::ServiceUnavailable);
    }

    if service.provider_id == requester_id {
        return Err(BookingError::SelfBooking);
    }

    let pending = booking::Entity::find()
        .filter(booking::Column::ServiceId.eq(service_id))
        .filter(booking::Column::RequesterId.eq(requester_id))
        .filter(booking::Column::Status.eq(BookingStatus::Pending))
        .count(conn)
        .await?;

    if pending > 0 {
        return Err(BookingError::DuplicatePendingBooking);
    }

    Ok(service)
}
