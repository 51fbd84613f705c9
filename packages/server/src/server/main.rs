// Main entry point for the ContentFlow API server

use std::sync::Arc;

use anyhow::{Context, Result};
use contentflow_core::kernel::{scheduled_tasks, OpenAIClient, ServerDeps, WordPressAdapter};
use contentflow_core::server::build_app;
use contentflow_core::Config;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,contentflow_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ContentFlow backend");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    // Build dependencies
    let deps = Arc::new(ServerDeps::new(
        pool,
        Arc::new(OpenAIClient::new(config.openai_api_key.clone())),
        Arc::new(WordPressAdapter::new()),
    ));

    // Optional in-process scheduler (external cron is the default trigger)
    let _scheduler = if config.enable_scheduler {
        Some(scheduled_tasks::start_scheduler(deps.clone()).await?)
    } else {
        None
    };

    // Build application
    let app = build_app(deps, config.cron_secret.clone());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
