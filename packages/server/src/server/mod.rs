//! HTTP surface: health check and cron trigger endpoints.

pub mod app;
pub mod routes;

pub use app::{build_app, AppState};
