//! # TaskDeck API Server
//!
//! This is the main API server for TaskDeck, providing account registration,
//! stateless bearer-token login, and per-user task management over HTTP.
//!
//! ## Architecture
//!
//! The API server is built with Axum and provides:
//! - Authentication endpoints (register, login, logout, me, verify)
//! - Task CRUD endpoints scoped to the authenticated owner
//! - Health and banner endpoints for probes
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskdeck-api
//! ```

use taskdeck_api::app::{build_router, AppState};
use taskdeck_api::config::Config;
use taskdeck_shared::db::migrations::run_migrations_with_retry;
use taskdeck_shared::db::pool::{create_pool_with_retry, DatabaseConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Startup attempts for database connection and schema migration
const STARTUP_ATTEMPTS: u32 = 4;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "taskdeck_api=debug,taskdeck_shared=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TaskDeck API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration
    let config = Config::from_env()?;

    // Connect to the database, retrying while it comes up
    let db_config = DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    };
    let pool = create_pool_with_retry(db_config, STARTUP_ATTEMPTS).await?;

    // Apply schema migrations with the same retry posture
    run_migrations_with_retry(&pool, STARTUP_ATTEMPTS).await?;

    // Build the application
    let bind_address = config.bind_address();
    let state = AppState::new(pool, config);
    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
