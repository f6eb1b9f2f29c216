use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::db::is_unique_violation;
use crate::entities::booking::{self, BookingStatus};
use crate::entities::service;

use super::{check_can_create, transition, ActorRole, BookingError};

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub service_id: Uuid,
    pub requester_id: Uuid,
    pub message: String,
}

/// Optional narrowing of a participant's booking list.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookingFilter {
    pub requester_id: Option<Uuid>,
    pub provider_id: Option<Uuid>,
}

/// Guard and insert a pending booking inside one transaction.
pub async fn create_pending(
    db: &DatabaseConnection,
    new: NewBooking,
) -> Result<booking::Model, BookingError> {
    let txn = db.begin().await?;

    let service = check_can_create(&txn, new.service_id, new.requester_id).await?;
    let booking = insert_pending(&txn, &service, new.requester_id, new.message).await?;

    txn.commit().await?;

    tracing::info!(
        booking_id = %booking.id,
        service_id = %booking.service_id,
        requester_id = %booking.requester_id,
        "Booking requested"
    );

    Ok(booking)
}

/// Insert a pending booking for an already-guarded service.
///
/// A second pending row for the same service and requester violates the
/// unique index and comes back as `DuplicatePendingBooking`.
pub async fn insert_pending<C: ConnectionTrait>(
    conn: &C,
    service: &service::Model,
    requester_id: Uuid,
    message: String,
) -> Result<booking::Model, BookingError> {
    let now = Utc::now();

    let new_booking = booking::ActiveModel {
        id: Set(Uuid::new_v4()),
        service_id: Set(service.id),
        requester_id: Set(requester_id),
        provider_id: Set(service.provider_id),
        message: Set(message),
        status: Set(BookingStatus::Pending),
        notes: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    new_booking.insert(conn).await.map_err(|e| {
        if is_unique_violation(&e) {
            BookingError::DuplicatePendingBooking
        } else {
            BookingError::Store(e)
        }
    })
}

/// Move a booking to `requested` on behalf of `actor_id`.
///
/// The write only lands if the stored status is still the one the decision
/// was made against; a booking changed in between is reported as an invalid
/// transition.
pub async fn apply_transition(
    db: &DatabaseConnection,
    booking_id: Uuid,
    actor_id: Uuid,
    requested: BookingStatus,
    notes: Option<String>,
) -> Result<booking::Model, BookingError> {
    let current = booking::Entity::find_by_id(booking_id)
        .one(db)
        .await?
        .ok_or(BookingError::NotFound("Booking"))?;

    let role = ActorRole::resolve(&current, actor_id)?;
    let next = transition(&current, requested, role)?;

    let mut update = booking::Entity::update_many()
        .col_expr(booking::Column::Status, Expr::value(next.status))
        .col_expr(
            booking::Column::UpdatedAt,
            Expr::value(sea_orm::prelude::DateTimeWithTimeZone::from(Utc::now())),
        )
        .filter(booking::Column::Id.eq(booking_id))
        .filter(booking::Column::Status.eq(current.status));

    if let Some(notes) = notes {
        update = update.col_expr(booking::Column::Notes, Expr::value(notes));
    }

    let result = update.exec(db).await?;

    if result.rows_affected == 0 {
        tracing::warn!(
            booking_id = %booking_id,
            from = %current.status,
            to = %requested,
            "Booking changed before status write"
        );
        return Err(BookingError::InvalidTransition {
            from: current.status,
            to: requested,
        });
    }

    tracing::info!(
        booking_id = %booking_id,
        actor_id = %actor_id,
        from = %current.status,
        to = %next.status,
        "Booking status changed"
    );

    booking::Entity::find_by_id(booking_id)
        .one(db)
        .await?
        .ok_or(BookingError::NotFound("Booking"))
}

/// Bookings `viewer` takes part in, newest first.
pub async fn list_for(
    db: &DatabaseConnection,
    viewer: Uuid,
    filter: BookingFilter,
) -> Result<Vec<booking::Model>, BookingError> {
    let mut query = booking::Entity::find().filter(
        Condition::any()
            .add(booking::Column::RequesterId.eq(viewer))
            .add(booking::Column::ProviderId.eq(viewer)),
    );

    if let Some(requester_id) = filter.requester_id {
        query = query.filter(booking::Column::RequesterId.eq(requester_id));
    }
    if let Some(provider_id) = filter.provider_id {
        query = query.filter(booking::Column::ProviderId.eq(provider_id));
    }

    Ok(query
        .order_by_desc(booking::Column::CreatedAt)
        .all(db)
        .await?)
}
