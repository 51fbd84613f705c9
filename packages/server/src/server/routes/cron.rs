//! Cron trigger endpoints for the Planner and the Executor.
//!
//! Both endpoints are guarded by the X-Cron-Secret header, run the batch in
//! the background and answer 202 immediately: the external cron only
//! triggers, it never waits for the batch.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
};
use tracing::info;

use crate::domains::publishing::execute_due_post;
use crate::domains::scheduling::plan_daily_posts;
use crate::server::app::AppState;

const CRON_SECRET_HEADER: &str = "x-cron-secret";

fn secret_matches(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(CRON_SECRET_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value == expected)
        .unwrap_or(false)
}

/// Trigger endpoint for the PLANNER cron job (runs once a day).
pub async fn trigger_plan(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> (StatusCode, &'static str) {
    if !secret_matches(&headers, &state.cron_secret) {
        return (StatusCode::UNAUTHORIZED, "Unauthorized: invalid cron secret");
    }

    info!("PLANNER cron job triggered");
    let deps = state.deps.clone();
    tokio::spawn(async move {
        if let Err(e) = plan_daily_posts(&deps).await {
            tracing::error!("Daily planning failed: {:#}", e);
        }
    });

    (StatusCode::ACCEPTED, "Daily post planning started")
}

/// Trigger endpoint for the EXECUTOR cron job (runs every few minutes).
pub async fn trigger_execute(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> (StatusCode, &'static str) {
    if !secret_matches(&headers, &state.cron_secret) {
        return (StatusCode::UNAUTHORIZED, "Unauthorized: invalid cron secret");
    }

    info!("EXECUTOR cron job triggered");
    let deps = state.deps.clone();
    tokio::spawn(async move {
        if let Err(e) = execute_due_post(&deps).await {
            tracing::error!("Post execution failed: {:#}", e);
        }
    });

    (StatusCode::ACCEPTED, "Post execution started")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use crate::kernel::{MockAI, MockWordPress, ServerDeps};
    use crate::server::build_app;

    fn test_app() -> axum::Router {
        // Lazy pool: never connects unless a handler touches the database.
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/contentflow_test")
            .unwrap();
        let deps = Arc::new(ServerDeps::new(
            pool,
            Arc::new(MockAI::new()),
            Arc::new(MockWordPress::new()),
        ));
        build_app(deps, "top-secret".to_string())
    }

    #[tokio::test]
    async fn plan_trigger_rejects_missing_secret() {
        let app = test_app();
        let response = app
            .oneshot(
                Request::post("/api/cron/plan")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn execute_trigger_rejects_wrong_secret() {
        let app = test_app();
        let response = app
            .oneshot(
                Request::post("/api/cron/execute")
                    .header("X-Cron-Secret", "wrong")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn plan_trigger_accepts_valid_secret() {
        let app = test_app();
        let response = app
            .oneshot(
                Request::post("/api/cron/plan")
                    .header("X-Cron-Secret", "top-secret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::ACCEPTED);
    }
}
