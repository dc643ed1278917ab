// Main entry point for the chat relay server

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gigchat::adapters::http::{build_router, AppState};
use gigchat::adapters::{InMemoryMessageStore, PostgresMessageStore};
use gigchat::config::{AppConfig, DatabaseConfig, StoreBackend};
use gigchat::ports::MessageStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing(&config);

    config.validate().context("Invalid configuration")?;
    tracing::info!(
        environment = ?config.server.environment,
        echo_policy = ?config.relay.echo_policy,
        "Configuration loaded"
    );

    let store = connect_store(&config.database).await?;
    let app = build_router(AppState::new(store, config.relay.clone()), &config.server);

    let addr = config.server.bind_address;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    tracing::info!("Starting server on {}", addr);
    tracing::info!("WebSocket endpoint: ws://{}/ws", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_filter));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn connect_store(database: &DatabaseConfig) -> Result<Arc<dyn MessageStore>> {
    let url = match database.backend() {
        StoreBackend::Postgres { url } => url,
        StoreBackend::InMemory => {
            tracing::warn!("No database configured, using in-memory message store");
            return Ok(Arc::new(InMemoryMessageStore::new()));
        }
    };

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .connect(url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    if database.run_migrations {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;
        tracing::info!("Migrations complete");
    }

    Ok(Arc::new(PostgresMessageStore::new(pool)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
