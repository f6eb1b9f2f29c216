use std::collections::HashMap;

use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::booking::{self, BookingStatus};
use crate::entities::{service, user};
use crate::error::{AppError, AppResult};
use crate::handlers::services::ServiceSummary;
use crate::handlers::users::UserSummary;
use crate::lifecycle::store::{self, BookingFilter, NewBooking};
use crate::lifecycle::{ActorRole, BookingError};
use crate::utils::extract::{AppJson, AppPath, AppQuery};
use crate::utils::jwt::Claims;
use crate::AppState;

const MAX_MESSAGE_LEN: usize = 2000;

/// A booking with its service and both parties expanded
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    pub id: Uuid,
    pub service_id: Uuid,
    pub requester_id: Uuid,
    pub provider_id: Uuid,
    pub message: String,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub service: Option<ServiceSummary>,
    pub requester: Option<UserSummary>,
    pub provider: Option<UserSummary>,
}

#[derive(Debug, Serialize)]
pub struct BookingEnvelope {
    pub booking: BookingView,
}

#[derive(Debug, Serialize)]
pub struct BookingListResponse {
    pub bookings: Vec<BookingView>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListQuery {
    pub requester_id: Option<Uuid>,
    pub provider_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub service_id: Uuid,
    pub requester_id: Option<Uuid>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
    pub notes: Option<String>,
}

/// Fetch the related services and users for `bookings` and assemble views,
/// keeping the input order.
async fn expand(
    db: &DatabaseConnection,
    bookings: Vec<booking::Model>,
) -> AppResult<Vec<BookingView>> {
    if bookings.is_empty() {
        return Ok(Vec::new());
    }

    let mut service_ids: Vec<Uuid> = bookings.iter().map(|b| b.service_id).collect();
    service_ids.sort();
    service_ids.dedup();

    let mut user_ids: Vec<Uuid> = bookings
        .iter()
        .flat_map(|b| [b.requester_id, b.provider_id])
        .collect();
    user_ids.sort();
    user_ids.dedup();

    let services: HashMap<Uuid, service::Model> = service::Entity::find()
        .filter(service::Column::Id.is_in(service_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    let users: HashMap<Uuid, user::Model> = user::Entity::find()
        .filter(user::Column::Id.is_in(user_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    Ok(bookings
        .into_iter()
        .map(|b| BookingView {
            service: services.get(&b.service_id).map(ServiceSummary::from),
            requester: users.get(&b.requester_id).map(UserSummary::from),
            provider: users.get(&b.provider_id).map(UserSummary::from),
            id: b.id,
            service_id: b.service_id,
            requester_id: b.requester_id,
            provider_id: b.provider_id,
            message: b.message,
            status: b.status,
            notes: b.notes,
            created_at: b.created_at.with_timezone(&Utc),
            updated_at: b.updated_at.with_timezone(&Utc),
        })
        .collect())
}

async fn expand_one(db: &DatabaseConnection, booking: booking::Model) -> AppResult<BookingView> {
    expand(db, vec![booking])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal("Expanded booking went missing".to_string()))
}

/// List the caller's bookings, newest first
pub async fn list_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppQuery(query): AppQuery<BookingListQuery>,
) -> AppResult<Json<BookingListResponse>> {
    let names_someone_else = [query.requester_id, query.provider_id]
        .into_iter()
        .flatten()
        .any(|id| id != claims.sub);

    if names_someone_else {
        return Err(AppError::Forbidden(
            "You can only list your own bookings".to_string(),
        ));
    }

    let filter = BookingFilter {
        requester_id: query.requester_id,
        provider_id: query.provider_id,
    };
    let bookings = store::list_for(&state.db, claims.sub, filter).await?;

    Ok(Json(BookingListResponse {
        bookings: expand(&state.db, bookings).await?,
    }))
}

/// Request a booking on someone else's service
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(payload): AppJson<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<BookingEnvelope>)> {
    if payload.requester_id.is_some_and(|id| id != claims.sub) {
        return Err(AppError::Forbidden(
            "You can only request bookings for yourself".to_string(),
        ));
    }

    let message = payload.message.trim().to_string();
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err(AppError::BadRequest(format!(
            "Message cannot exceed {} characters",
            MAX_MESSAGE_LEN
        )));
    }

    let booking = store::create_pending(
        &state.db,
        NewBooking {
            service_id: payload.service_id,
            requester_id: claims.sub,
            message,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(BookingEnvelope {
            booking: expand_one(&state.db, booking).await?,
        }),
    ))
}

/// Get one booking the caller takes part in
pub async fn get_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppPath(booking_id): AppPath<Uuid>,
) -> AppResult<Json<BookingEnvelope>> {
    let booking = booking::Entity::find_by_id(booking_id)
        .one(&state.db)
        .await?
        .ok_or(BookingError::NotFound("Booking"))?;

    ActorRole::resolve(&booking, claims.sub)?;

    Ok(Json(BookingEnvelope {
        booking: expand_one(&state.db, booking).await?,
    }))
}

/// Move a booking along its lifecycle
pub async fn update_booking_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppPath(booking_id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateStatusRequest>,
) -> AppResult<Json<BookingEnvelope>> {
    let requested: BookingStatus = payload.status.parse().map_err(AppError::BadRequest)?;

    let booking = store::apply_transition(
        &state.db,
        booking_id,
        claims.sub,
        requested,
        payload.notes,
    )
    .await?;

    Ok(Json(BookingEnvelope {
        booking: expand_one(&state.db, booking).await?,
    }))
}
