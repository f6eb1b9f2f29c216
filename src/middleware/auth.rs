use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejection,
    TypedHeader,
};

use crate::error::{AppError, AppResult};
use crate::utils::jwt::verify_token;
use crate::AppState;

/// Extract and validate JWT token from Authorization header
pub async fn auth_middleware(
    State(state): State<AppState>,
    auth: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let TypedHeader(auth) = auth.map_err(|e| {
        AppError::Unauthorized(if e.is_missing() {
            "Missing bearer token".to_string()
        } else {
            "Malformed authorization header".to_string()
        })
    })?;

    let claims = verify_token(auth.token(), &state.config.jwt_secret)?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
