use axum::{
    extract::State,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::user;
use crate::error::{AppError, AppResult};
use crate::utils::extract::{AppJson, AppPath};
use crate::utils::jwt::Claims;
use crate::AppState;

/// What other users get to see of someone: no email, no credentials
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub display_name: String,
    pub avatar: Option<String>,
    pub rating: f64,
    pub review_count: i32,
}

impl From<&user::Model> for UserSummary {
    fn from(u: &user::Model) -> Self {
        Self {
            id: u.id,
            display_name: u.display_name.clone(),
            avatar: u.avatar.clone(),
            rating: u.rating,
            review_count: u.review_count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfileResponse {
    #[serde(flatten)]
    pub summary: UserSummary,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub summary: UserSummary,
    pub email: String,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for ProfileResponse {
    fn from(u: user::Model) -> Self {
        Self {
            summary: UserSummary::from(&u),
            email: u.email,
            bio: u.bio,
            created_at: u.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
}

/// Public profile page
pub async fn get_profile(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<Uuid>,
) -> AppResult<Json<PublicProfileResponse>> {
    let user = user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(PublicProfileResponse {
        summary: UserSummary::from(&user),
        bio: user.bio,
        created_at: user.created_at.with_timezone(&Utc),
    }))
}

/// The caller's own profile
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<ProfileResponse>> {
    let user = user::Entity::find_by_id(claims.sub)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(ProfileResponse::from(user)))
}

/// Edit the caller's own profile
pub async fn update_me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> AppResult<Json<ProfileResponse>> {
    let user = user::Entity::find_by_id(claims.sub)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let mut active: user::ActiveModel = user.into();

    if let Some(name) = payload.display_name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::BadRequest("Display name cannot be empty".to_string()));
        }
        active.display_name = Set(name);
    }

    if let Some(avatar) = payload.avatar {
        active.avatar = Set(Some(avatar).filter(|a| !a.is_empty()));
    }

    if let Some(bio) = payload.bio {
        active.bio = Set(Some(bio).filter(|b| !b.is_empty()));
    }

    let updated = active.update(&state.db).await?;
    Ok(Json(ProfileResponse::from(updated)))
}
