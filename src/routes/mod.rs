use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::handlers::{auth, bookings, services, users};
use crate::middleware::auth::auth_middleware;
use crate::middleware::user_rate_limit::create_user_governor;
use crate::AppState;

/// Build the API router. The per-IP limiter is layered on in `main`, since
/// it needs the peer address from the listener.
pub fn create_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/services", get(services::list_services))
        .route("/api/services/{id}", get(services::get_service))
        .route("/api/users/{id}", get(users::get_profile));

    // Authenticated routes, rate limited per user. route_layer keeps these
    // mergeable with the public methods on the same paths.
    let protected_routes = Router::new()
        .route("/api/users/me", get(users::me).patch(users::update_me))
        .route("/api/services", post(services::create_service))
        .route("/api/services/{id}", patch(services::update_service))
        .route(
            "/api/bookings",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route(
            "/api/bookings/{id}",
            get(bookings::get_booking).patch(bookings::update_booking_status),
        )
        .route_layer(create_user_governor())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
