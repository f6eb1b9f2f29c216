use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::service;
use crate::error::{AppError, AppResult};
use crate::utils::extract::{AppJson, AppPath, AppQuery};
use crate::utils::jwt::Claims;
use crate::AppState;

/// The service fields embedded in an expanded booking
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub duration: i32,
    pub price: f64,
    pub category: String,
    pub location: String,
}

impl From<&service::Model> for ServiceSummary {
    fn from(s: &service::Model) -> Self {
        Self {
            id: s.id,
            title: s.title.clone(),
            description: s.description.clone(),
            duration: s.duration,
            price: s.price,
            category: s.category.clone(),
            location: s.location.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse {
    #[serde(flatten)]
    pub summary: ServiceSummary,
    pub provider_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<service::Model> for ServiceResponse {
    fn from(s: service::Model) -> Self {
        Self {
            summary: ServiceSummary::from(&s),
            provider_id: s.provider_id,
            is_active: s.is_active,
            created_at: s.created_at.with_timezone(&Utc),
            updated_at: s.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceListQuery {
    pub category: Option<String>,
    pub provider_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub duration: i32,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<i32>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub is_active: Option<bool>,
}

fn validate_title(title: &str) -> AppResult<()> {
    if title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }
    Ok(())
}

fn validate_duration(duration: i32) -> AppResult<()> {
    if duration <= 0 {
        return Err(AppError::BadRequest("Duration must be positive".to_string()));
    }
    Ok(())
}

fn validate_price(price: f64) -> AppResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::BadRequest("Price cannot be negative".to_string()));
    }
    Ok(())
}

/// List active services, newest first
pub async fn list_services(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ServiceListQuery>,
) -> AppResult<Json<Vec<ServiceResponse>>> {
    let mut select = service::Entity::find().filter(service::Column::IsActive.eq(true));

    if let Some(category) = query.category {
        select = select.filter(service::Column::Category.eq(category));
    }
    if let Some(provider_id) = query.provider_id {
        select = select.filter(service::Column::ProviderId.eq(provider_id));
    }

    let services = select
        .order_by_desc(service::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(services.into_iter().map(ServiceResponse::from).collect()))
}

/// Get one service, active or not
pub async fn get_service(
    State(state): State<AppState>,
    AppPath(service_id): AppPath<Uuid>,
) -> AppResult<Json<ServiceResponse>> {
    let service = service::Entity::find_by_id(service_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Service not found".to_string()))?;

    Ok(Json(ServiceResponse::from(service)))
}

/// Offer a new service as the logged-in user
pub async fn create_service(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(payload): AppJson<CreateServiceRequest>,
) -> AppResult<(StatusCode, Json<ServiceResponse>)> {
    validate_title(&payload.title)?;
    validate_duration(payload.duration)?;
    validate_price(payload.price)?;

    let now = Utc::now();
    let new_service = service::ActiveModel {
        id: Set(Uuid::new_v4()),
        provider_id: Set(claims.sub),
        title: Set(payload.title.trim().to_string()),
        description: Set(payload.description),
        duration: Set(payload.duration),
        price: Set(payload.price),
        category: Set(payload.category),
        location: Set(payload.location),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    let service = new_service.insert(&state.db).await?;
    tracing::info!(service_id = %service.id, provider_id = %claims.sub, "Service created");

    Ok((StatusCode::CREATED, Json(ServiceResponse::from(service))))
}

/// Edit or (de)activate a service the caller owns
pub async fn update_service(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppPath(service_id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateServiceRequest>,
) -> AppResult<Json<ServiceResponse>> {
    let service = service::Entity::find_by_id(service_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Service not found".to_string()))?;

    if service.provider_id != claims.sub {
        return Err(AppError::Forbidden(
            "You can only edit your own services".to_string(),
        ));
    }

    let mut active: service::ActiveModel = service.into();

    if let Some(title) = payload.title {
        validate_title(&title)?;
        active.title = Set(title.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(duration) = payload.duration {
        validate_duration(duration)?;
        active.duration = Set(duration);
    }
    if let Some(price) = payload.price {
        validate_price(price)?;
        active.price = Set(price);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(location) = payload.location {
        active.location = Set(location);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now().into());

    let updated = active.update(&state.db).await?;
    Ok(Json(ServiceResponse::from(updated)))
}
