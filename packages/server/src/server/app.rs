//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{health_handler, trigger_execute, trigger_plan};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub deps: Arc<ServerDeps>,
    pub cron_secret: String,
}

/// Build the axum application with all routes and middleware.
pub fn build_app(deps: Arc<ServerDeps>, cron_secret: String) -> Router {
    let state = AppState {
        db_pool: deps.db_pool.clone(),
        deps,
        cron_secret,
    };

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/cron/plan", post(trigger_plan))
        .route("/api/cron/execute", post(trigger_execute))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(Extension(state))
}
