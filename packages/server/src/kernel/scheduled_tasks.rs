//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! Optional in-process alternative to external cron hitting the trigger
//! endpoints: planning runs daily at midnight UTC, execution every five
//! minutes. Overlapping executor ticks are safe because claiming is
//! lock-and-skip-locked at the database.

use std::sync::Arc;

use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::publishing::execute_due_post;
use crate::domains::scheduling::plan_daily_posts;

use super::ServerDeps;

/// Start all scheduled tasks
pub async fn start_scheduler(deps: Arc<ServerDeps>) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    // Daily planning - midnight UTC
    let plan_deps = deps.clone();
    let plan_job = Job::new_async("0 0 0 * * *", move |_uuid, _lock| {
        let deps = plan_deps.clone();
        Box::pin(async move {
            if let Err(e) = plan_daily_posts(&deps).await {
                tracing::error!("Daily planning task failed: {:#}", e);
            }
        })
    })?;
    scheduler.add(plan_job).await?;

    // Post execution - every 5 minutes
    let execute_deps = deps.clone();
    let execute_job = Job::new_async("0 */5 * * * *", move |_uuid, _lock| {
        let deps = execute_deps.clone();
        Box::pin(async move {
            if let Err(e) = execute_due_post(&deps).await {
                tracing::error!("Post execution task failed: {:#}", e);
            }
        })
    })?;
    scheduler.add(execute_job).await?;

    scheduler.start().await?;

    tracing::info!("Scheduled tasks started (planning daily at midnight, execution every 5 minutes)");
    Ok(scheduler)
}
