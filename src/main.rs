// src/main.rs

use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use lernify_backend::config::{Config, StorageBackend};
use lernify_backend::engine::{MemoryProgressStore, PgProgressStore, ProgressStore};
use lernify_backend::models::catalog::Catalog;
use lernify_backend::routes;
use lernify_backend::state::AppState;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env()?;

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let catalog = Catalog::from_path(&config.catalog_path).map_err(|e| {
        tracing::error!("Failed to load step catalog: {}", e);
        e
    })?;
    tracing::info!(
        "Loaded step catalog from {} ({} domains)",
        config.catalog_path.display(),
        catalog.domains().len()
    );

    let store: Arc<dyn ProgressStore> = match config.storage {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or("DATABASE_URL must be set for the postgres backend")?;
            let pool = connect_with_retry(database_url).await?;

            // Run Migrations Automatically
            tracing::info!("Running migrations...");
            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Migrations applied successfully.");

            Arc::new(PgProgressStore::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory progress store; attempts are lost on restart");
            Arc::new(MemoryProgressStore::new())
        }
    };

    let addr = config.bind_addr;

    // Create AppState
    let state = AppState {
        store,
        catalog: Arc::new(catalog),
        config,
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    // Start the server
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Initialize Database Pool with Retry
async fn connect_with_retry(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let mut retry_count = 0;
    loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await
        {
            Ok(pool) => {
                tracing::info!("Database connected...");
                return Ok(pool);
            }
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    tracing::error!("Failed to connect to database after 5 retries: {}", e);
                    return Err(e);
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
