// src/main.rs

use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use leaderboard::config::Config;
use leaderboard::error::AppError;
use leaderboard::routes;
use leaderboard::services::result_store::{MemoryResultStore, PgResultStore, ResultStore};
use leaderboard::state::AppState;
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

    let store = build_store(&config).await?;

    let state = AppState {
        store,
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    tracing::info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    axum::serve(listener, app).await?;
    Ok(())
}

/// Postgres when `DATABASE_URL` is set, otherwise the in-memory store.
async fn build_store(config: &Config) -> Result<Arc<dyn ResultStore>, AppError> {
    let Some(database_url) = &config.database_url else {
        tracing::warn!("DATABASE_URL not set, serving results from memory");
        let store = match &config.seed_file {
            Some(path) => {
                let json = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| AppError::Config(format!("SEED_FILE {}: {}", path, e)))?;
                let store = MemoryResultStore::from_json(&json)?;
                tracing::info!("Seeded {} results from {}", store.len().await, path);
                store
            }
            None => MemoryResultStore::default(),
        };
        return Ok(Arc::new(store));
    };

    let pool = connect_with_retry(database_url).await?;
    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations applied successfully.");

    Ok(Arc::new(PgResultStore::new(pool)))
}

async fn connect_with_retry(database_url: &str) -> Result<PgPool, AppError> {
    let mut retry_count = 0;
    loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await
        {
            Ok(pool) => return Ok(pool),
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    tracing::error!("Failed to connect to database after 5 retries");
                    return Err(e.into());
                }
                tracing::warn!(
                    "Database not ready, retrying in 2s... (Attempt {})",
                    retry_count
                );
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }
}
