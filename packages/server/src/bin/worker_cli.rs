//! One-shot worker CLI for the Planner and Executor.
//!
//! Runs a single planning or execution pass against the configured database
//! and exits. Useful for operating the system from external cron or for
//! manual runs during development.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use contentflow_core::config::Config;
use contentflow_core::domains::publishing::execute_due_post;
use contentflow_core::domains::scheduling::plan_daily_posts;
use contentflow_core::kernel::{OpenAIClient, ServerDeps, WordPressAdapter};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "worker_cli")]
#[command(about = "Run a single planning or execution pass")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the daily planner once across all active projects
    Plan,

    /// Claim and execute due posts, one at a time
    Execute {
        /// Number of posts to attempt in this run
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,contentflow_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    let deps = Arc::new(ServerDeps::new(
        pool,
        Arc::new(OpenAIClient::new(config.openai_api_key.clone())),
        Arc::new(WordPressAdapter::new()),
    ));

    match cli.command {
        Commands::Plan => {
            tracing::info!("Running daily planner");
            plan_daily_posts(&deps).await?;
            tracing::info!("Planning pass complete");
        }
        Commands::Execute { count } => {
            tracing::info!(count, "Running executor");
            for _ in 0..count {
                execute_due_post(&deps).await?;
            }
            tracing::info!("Execution pass complete");
        }
    }

    Ok(())
}
