//! Service directory, profiles and account endpoints.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use crate::common::TestApp;

#[tokio::test]
async fn register_then_login_returns_tokens() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "email": "Marta@Example.com",
                "password": "correct horse",
                "displayName": "Marta"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["email"], "marta@example.com");
    assert_eq!(body["user"]["displayName"], "Marta");
    assert_eq!(body["user"]["reviewCount"], 0);
    assert!(body["user"].get("passwordHash").is_none());

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "marta@example.com", "password": "correct horse" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = app.send(Method::GET, "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["displayName"], "Marta");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "marta@example.com", "password": "wrong password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_rejects_short_password_and_taken_email() {
    let app = TestApp::new().await;
    let existing = app.create_user("Paula").await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "email": "new@example.com", "password": "short", "displayName": "New" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "email": existing.model.email,
                "password": "long enough",
                "displayName": "Copy"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already registered");
}

#[tokio::test]
async fn public_profile_hides_email() {
    let app = TestApp::new().await;
    let user = app.create_user("Paula").await;

    let (status, body) = app
        .send(Method::GET, &format!("/api/users/{}", user.id()), None, None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["displayName"], "Paula");
    assert_eq!(body["rating"], 4.5);
    assert!(body.get("email").is_none());

    let (status, _) = app
        .send(Method::GET, &format!("/api/users/{}", Uuid::new_v4()), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_profile_changes_display_fields() {
    let app = TestApp::new().await;
    let user = app.create_user("Paula").await;

    let (status, body) = app
        .send(
            Method::PATCH,
            "/api/users/me",
            Some(&user.token),
            Some(json!({ "displayName": "Paula S.", "bio": "Teaching guitar since 2010" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["displayName"], "Paula S.");
    assert_eq!(body["bio"], "Teaching guitar since 2010");
}

#[tokio::test]
async fn provider_creates_and_lists_service() {
    let app = TestApp::new().await;
    let provider = app.create_user("Paula").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/services",
            Some(&provider.token),
            Some(json!({
                "title": "Portrait photography",
                "description": "Outdoor session, 20 edited photos",
                "duration": 90,
                "price": 80.0,
                "category": "photography",
                "location": "Porto"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["providerId"], provider.id().to_string());
    assert_eq!(body["isActive"], true);

    let (status, body) = app
        .send(Method::GET, "/api/services?category=photography", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let services = body.as_array().unwrap();
    assert_eq!(services.len(), 1);
    assert_eq!(services[0]["title"], "Portrait photography");
}

#[tokio::test]
async fn invalid_service_is_rejected() {
    let app = TestApp::new().await;
    let provider = app.create_user("Paula").await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/services",
            Some(&provider.token),
            Some(json!({ "title": "Free hugs", "duration": 0, "price": 0.0, "category": "misc" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/services",
            Some(&provider.token),
            Some(json!({ "title": "Discount", "duration": 30, "price": -5.0, "category": "misc" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deactivated_service_leaves_listing_and_blocks_bookings() {
    let app = TestApp::new().await;
    let provider = app.create_user("Paula").await;
    let requester = app.create_user("Rui").await;
    let service = app.create_service(&provider, true).await;

    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/api/services/{}", service.id),
            Some(&provider.token),
            Some(json!({ "isActive": false })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isActive"], false);

    let (_, body) = app.send(Method::GET, "/api/services", None, None).await;
    assert!(body.as_array().unwrap().is_empty());

    let (status, _) = app.request_booking(&requester, service.id).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_owner_edits_service() {
    let app = TestApp::new().await;
    let provider = app.create_user("Paula").await;
    let other = app.create_user("Ivo").await;
    let service = app.create_service(&provider, true).await;

    let (status, _) = app
        .send(
            Method::PATCH,
            &format!("/api/services/{}", service.id),
            Some(&other.token),
            Some(json!({ "price": 1.0 })),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}
