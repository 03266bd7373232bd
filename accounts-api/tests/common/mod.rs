/// Common test utilities for HTTP tests
///
/// Builds the full router over an in-memory store and a recording publisher,
/// so the tests need neither PostgreSQL nor Redis.

use std::sync::Arc;

use accounts_api::app::{build_router, AppState};
use accounts_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use accounts_shared::accounts::AccountService;
use accounts_shared::auth::password::{Argon2Hasher, HashingConfig};
use accounts_shared::events::{EventPublisher, MemoryPublisher};
use accounts_shared::store::MemoryUserStore;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Router plus handles on its collaborators
pub struct TestContext {
    pub app: axum::Router,
    pub store: Arc<MemoryUserStore>,
    pub publisher: Arc<MemoryPublisher>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_publisher(MemoryPublisher::new())
    }

    pub fn with_publisher(publisher: MemoryPublisher) -> Self {
        let store = Arc::new(MemoryUserStore::new());
        let publisher = Arc::new(publisher);
        let app = test_router(store.clone(), publisher.clone());

        Self { app, store, publisher }
    }

    /// Sends a request and returns the status and JSON body (Null when empty)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };

        (status, json)
    }

    pub async fn post_json(&self, uri: &str, body: Value, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        self.send(builder.body(Body::from(body.to_string())).unwrap()).await
    }

    /// POST with a raw body and an optional content type
    pub async fn post_raw(
        &self,
        uri: &str,
        body: &str,
        content_type: Option<&str>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("POST").uri(uri);

        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        self.send(builder.body(Body::from(body.to_string())).unwrap()).await
    }

    /// POST without a body
    pub async fn post_empty(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("POST").uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Registers a user and returns (user_id, token)
    pub async fn register(&self, email: &str, password: &str) -> (String, String) {
        let (status, body) = self
            .post_json(
                "/v1/auth/register",
                serde_json::json!({"email_address": email, "password": password}),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

        (
            body["user_id"].as_str().unwrap().to_string(),
            body["token"].as_str().unwrap().to_string(),
        )
    }
}

/// Router over `store` with any publisher
pub fn test_router(store: Arc<MemoryUserStore>, publisher: Arc<dyn EventPublisher>) -> axum::Router {
    let accounts = AccountService::new(
        store,
        Arc::new(Argon2Hasher::new(HashingConfig::minimal())),
    );

    build_router(AppState::new(accounts, publisher, test_config()))
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "postgresql://unused".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
            ttl_hours: 1,
        },
        redis_url: None,
    }
}
