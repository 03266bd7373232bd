/// Application state and router builder
///
/// # Routes
///
/// | Method | Path | Auth |
/// |--------|------|------|
/// | GET | `/health` | none |
/// | POST | `/v1/auth/register` | none |
/// | POST | `/v1/auth/login` | none |
/// | POST | `/v1/users/current/deactivate` | bearer token |
/// | POST | `/v1/users/current/activate` | bearer token |

use std::sync::Arc;
use std::time::Duration;

use accounts_shared::accounts::AccountService;
use accounts_shared::auth::jwt::{self, Claims};
use accounts_shared::events::{publish_event, DomainEvent, EventPublisher};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use uuid::Uuid;

use crate::{config::Config, error::ApiResult, middleware::auth::jwt_auth_layer};

/// Longest a handler waits on the event publisher
pub const PUBLISH_TIMEOUT: Duration = Duration::from_millis(250);

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Store and hasher
    pub accounts: AccountService,

    /// Destination for domain events
    pub publisher: Arc<dyn EventPublisher>,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(accounts: AccountService, publisher: Arc<dyn EventPublisher>, config: Config) -> Self {
        Self {
            accounts,
            publisher,
            config: Arc::new(config),
        }
    }

    /// Gets the JWT secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Signs a token for `user_id` with the configured lifetime
    pub fn issue_token(&self, user_id: Uuid) -> ApiResult<String> {
        let claims = Claims::new(user_id, self.config.jwt.ttl());
        Ok(jwt::create_token(&claims, self.jwt_secret())?)
    }

    /// Publishes an event after its transition committed
    ///
    /// Failures and publishes slower than [`PUBLISH_TIMEOUT`] are logged and
    /// dropped; the transition stands.
    pub async fn publish<E: DomainEvent>(&self, event: &E) {
        match tokio::time::timeout(PUBLISH_TIMEOUT, publish_event(self.publisher.as_ref(), event)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(
                    topic = E::TOPIC,
                    user_id = %event.user_id(),
                    error = %e,
                    "Failed to publish domain event"
                );
            }
            Err(_) => {
                tracing::warn!(
                    topic = E::TOPIC,
                    user_id = %event.user_id(),
                    timeout_ms = PUBLISH_TIMEOUT.as_millis() as u64,
                    "Timed out publishing domain event"
                );
            }
        }
    }
}

/// Builds the complete router with middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let user_routes = Router::new()
        .route("/current/deactivate", post(routes::users::deactivate))
        .route("/current/activate", post(routes::users::activate))
        .layer(axum::middleware::from_fn_with_state(state.clone(), jwt_auth_layer));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_routes);

    let cors = if state.config.api.cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
