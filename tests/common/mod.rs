//! Shared harness: the real router over a freshly migrated in-memory SQLite
//! database, plus fixture helpers that write straight to the store.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use marketplace_backend::{
    config::Config,
    entities::{service, user},
    routes,
    utils::jwt::create_token,
    AppState,
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub config: Config,
}

pub struct TestUser {
    pub model: user::Model,
    pub token: String,
}

impl TestUser {
    pub fn id(&self) -> Uuid {
        self.model.id
    }
}

impl TestApp {
    pub async fn new() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        // One connection, so every query sees the same in-memory database
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let db = Database::connect(options)
            .await
            .expect("Failed to open in-memory database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let config = Config {
            database_url: "sqlite::memory:".to_string(),
            database_max_connections: 1,
            jwt_secret: "test-secret".to_string(),
            jwt_expiration_hours: 1,
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
        };

        let router = routes::create_router(AppState {
            db: db.clone(),
            config: config.clone(),
        });

        Self { router, db, config }
    }

    pub async fn create_user(&self, display_name: &str) -> TestUser {
        let id = Uuid::new_v4();
        let model = user::ActiveModel {
            id: Set(id),
            email: Set(format!("{}@example.com", id)),
            password_hash: Set("not-a-real-hash".to_string()),
            display_name: Set(display_name.to_string()),
            avatar: Set(Some(format!("https://cdn.example.com/{}.png", id))),
            bio: Set(None),
            rating: Set(4.5),
            review_count: Set(12),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .expect("Failed to create user");

        let token = create_token(model.id, &model.email, &self.config.jwt_secret, 1)
            .expect("Failed to create token");

        TestUser { model, token }
    }

    pub async fn create_service(&self, provider: &TestUser, is_active: bool) -> service::Model {
        let now = Utc::now();
        service::ActiveModel {
            id: Set(Uuid::new_v4()),
            provider_id: Set(provider.id()),
            title: Set("Guitar lesson".to_string()),
            description: Set("One hour of beginner guitar".to_string()),
            duration: Set(60),
            price: Set(25.0),
            category: Set("music".to_string()),
            location: Set("Lisbon".to_string()),
            is_active: Set(is_active),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await
        .expect("Failed to create service")
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("Failed to build request"))
            .await
            .expect("Router failed");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, json)
    }

    /// POST /api/bookings as `requester`
    pub async fn request_booking(
        &self,
        requester: &TestUser,
        service_id: Uuid,
    ) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/api/bookings",
            Some(&requester.token),
            Some(serde_json::json!({
                "serviceId": service_id,
                "requesterId": requester.id(),
                "message": "Is next Saturday morning free?"
            })),
        )
        .await
    }

    /// PATCH /api/bookings/{id} as `actor`
    pub async fn set_status(
        &self,
        actor: &TestUser,
        booking_id: &str,
        status: &str,
    ) -> (StatusCode, Value) {
        self.send(
            Method::PATCH,
            &format!("/api/bookings/{}", booking_id),
            Some(&actor.token),
            Some(serde_json::json!({ "status": status })),
        )
        .await
    }
}

pub fn booking_id(body: &Value) -> String {
    body["booking"]["id"]
        .as_str()
        .expect("response has a booking id")
        .to_string()
}
