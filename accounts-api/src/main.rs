//! # Accounts API Server
//!
//! Connects to PostgreSQL, applies migrations, picks an event publisher
//! (Redis Streams when `REDIS_URL` is set, the trace log otherwise) and
//! serves the router until Ctrl-C.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/accounts JWT_SECRET=... cargo run -p accounts-api
//! ```
//!
//! `LOG_FORMAT=json` switches the log output to JSON lines.

use std::sync::Arc;

use accounts_api::{
    app::{build_router, AppState},
    config::Config,
};
use accounts_shared::{
    accounts::AccountService,
    auth::password::{Argon2Hasher, HashingConfig},
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    events::{EventPublisher, LogPublisher, RedisConfig, RedisStreamPublisher},
    store::PgUserStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Accounts API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        max_connections: config.database.max_connections,
        ..DatabaseConfig::new(config.database.url.clone())
    })
    .await?;

    run_migrations(&pool).await?;

    let publisher: Arc<dyn EventPublisher> = match &config.redis_url {
        Some(url) => Arc::new(RedisStreamPublisher::connect(RedisConfig::new(url.clone())).await?),
        None => {
            tracing::warn!("REDIS_URL not set, domain events will only be logged");
            Arc::new(LogPublisher)
        }
    };

    let accounts = AccountService::new(
        Arc::new(PgUserStore::new(pool.clone())),
        Arc::new(Argon2Hasher::new(HashingConfig::default())),
    );

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(accounts, publisher, config));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    tracing::info!("Server stopped");

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "accounts_api=debug,accounts_shared=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
