//! Planner - daily batch that binds unused keywords to randomized publish
//! slots.
//!
//! Runs once per invocation over every active project. Only writes to the
//! keyword pool and the job store; no external API calls. A failure in one
//! project's batch never aborts the others.

use anyhow::Result;
use chrono::{Duration, Utc};
use rand::Rng;
use sqlx::PgPool;
use tracing::{debug, error, info, warn};

use crate::domains::projects::{Keyword, Project};
use crate::kernel::ServerDeps;

use super::models::ScheduledPost;

/// Earliest a planned post may go out.
const MIN_PUBLISH_OFFSET_SECS: i64 = 5 * 60;

/// Latest a planned post may go out (the next 24h window).
const MAX_PUBLISH_OFFSET_SECS: i64 = 24 * 60 * 60;

/// Plan today's posts for all active projects.
pub async fn plan_daily_posts(deps: &ServerDeps) -> Result<()> {
    info!("starting daily post planning");

    let projects = Project::find_active(&deps.db_pool).await?;

    for project in &projects {
        if let Err(e) = plan_project(project, &deps.db_pool).await {
            // Per-project isolation: log and move on to the next project.
            error!(
                project = %project.name,
                error = %format!("{:#}", e),
                "failed to plan posts for project"
            );
        }
    }

    info!(projects = projects.len(), "daily post planning finished");
    Ok(())
}

async fn plan_project(project: &Project, pool: &PgPool) -> Result<()> {
    let quota = draw_daily_quota(
        project.min_posts_per_day,
        project.max_posts_per_day,
        &mut rand::rng(),
    );

    if quota == 0 {
        debug!(project = %project.name, "quota is zero, skipping");
        return Ok(());
    }

    let keywords = Keyword::sample_unused(project.id, i64::from(quota), pool).await?;

    if (keywords.len() as i32) < quota {
        // Partial fulfillment is not an error; schedule what is available.
        warn!(
            project = %project.name,
            wanted = quota,
            available = keywords.len(),
            "not enough unused keywords"
        );
    }

    let now = Utc::now();
    let mut scheduled = 0;

    for keyword in keywords {
        let publish_at = now + random_publish_offset(&mut rand::rng());

        // Keyword-consume and job-insert must commit together.
        let mut tx = pool.begin().await?;

        if !keyword.consume(&mut tx).await? {
            // A concurrent planner run captured this keyword first.
            tx.rollback().await?;
            continue;
        }

        ScheduledPost::new(project.id, keyword.id, publish_at)
            .insert(&mut tx)
            .await?;

        tx.commit().await?;
        scheduled += 1;

        info!(
            project = %project.name,
            keyword = %keyword.keyword,
            publish_at = %publish_at,
            "scheduled post"
        );
    }

    info!(project = %project.name, scheduled, "project planning complete");
    Ok(())
}

/// Draw today's post count, inclusive-uniform within the project's bounds.
///
/// Out-of-range bounds are clamped rather than rejected; the schema enforces
/// min <= max for operator-created projects.
pub fn draw_daily_quota<R: Rng>(min: i32, max: i32, rng: &mut R) -> i32 {
    let max = max.max(0);
    let min = min.clamp(0, max);
    rng.random_range(min..=max)
}

/// Uniform publish offset within [5 minutes, 24 hours].
pub fn random_publish_offset<R: Rng>(rng: &mut R) -> Duration {
    Duration::seconds(rng.random_range(MIN_PUBLISH_OFFSET_SECS..=MAX_PUBLISH_OFFSET_SECS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_stays_within_bounds() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let quota = draw_daily_quota(1, 5, &mut rng);
            assert!((1..=5).contains(&quota));
        }
    }

    #[test]
    fn quota_is_exact_when_bounds_collapse() {
        let mut rng = rand::rng();
        assert_eq!(draw_daily_quota(3, 3, &mut rng), 3);
        assert_eq!(draw_daily_quota(0, 0, &mut rng), 0);
    }

    #[test]
    fn quota_clamps_degenerate_bounds() {
        let mut rng = rand::rng();
        assert_eq!(draw_daily_quota(-2, -1, &mut rng), 0);
        // min above max falls back to max
        assert_eq!(draw_daily_quota(7, 2, &mut rng), 2);
    }

    #[test]
    fn publish_offset_stays_within_the_24h_window() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let offset = random_publish_offset(&mut rng);
            assert!(offset >= Duration::minutes(5));
            assert!(offset <= Duration::hours(24));
        }
    }
}
