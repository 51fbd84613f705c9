//! Executor - claims one due post and drives it through the pipeline.
//!
//! The claim commits before any external work starts, so concurrent executor
//! runs coordinate purely through the job store's row locks. A fatal error
//! anywhere after the claim always reaches the failure update; retry is
//! nothing more than being re-claimed while retries remain.

use anyhow::{Context, Result};
use tracing::{debug, error, info};

use crate::domains::projects::{Article, Keyword, Project};
use crate::domains::scheduling::ScheduledPost;
use crate::kernel::ServerDeps;

use super::pipeline::{run_pipeline, PublishedArticle};

/// Claim and process a single due post, if any.
///
/// An empty claim is a clean no-op. Pipeline errors are persisted on the job
/// row, never returned; the Result only covers the claim and the failure
/// bookkeeping itself.
pub async fn execute_due_post(deps: &ServerDeps) -> Result<()> {
    let Some(job) = ScheduledPost::claim_next(&deps.db_pool).await? else {
        debug!("no due posts");
        return Ok(());
    };

    info!(post_id = %job.id, retry_count = job.retry_count, "processing scheduled post");

    match process_job(&job, deps).await {
        Ok(article) => {
            info!(
                post_id = %job.id,
                post_url = %article.post_url,
                "scheduled post published"
            );
            Ok(())
        }
        Err(e) => {
            // Render the full cause chain so the stored message carries any
            // structured API payload.
            let message = format!("{:#}", e);
            error!(post_id = %job.id, error = %message, "scheduled post failed");
            ScheduledPost::mark_failed(job.id, &message, &deps.db_pool).await?;
            Ok(())
        }
    }
}

/// Load the job's context, run the pipeline and finalize on success.
async fn process_job(job: &ScheduledPost, deps: &ServerDeps) -> Result<PublishedArticle> {
    let project = Project::find_by_id(job.project_id, &deps.db_pool)
        .await
        .context("project not found for this post")?;
    let keyword = Keyword::find_by_id(job.keyword_id, &deps.db_pool)
        .await
        .context("keyword not found for this post")?;

    let article = run_pipeline(&project, &keyword, deps.ai.as_ref(), deps.wordpress.as_ref())
        .await?;

    finalize(job, &article, deps).await?;
    Ok(article)
}

/// Record success: completion fields on the job row plus the durable article,
/// in one transaction.
async fn finalize(
    job: &ScheduledPost,
    article: &PublishedArticle,
    deps: &ServerDeps,
) -> Result<()> {
    let mut tx = deps.db_pool.begin().await?;

    ScheduledPost::mark_completed(
        job.id,
        article.wp_post_id,
        &article.post_url,
        article.media_id,
        &mut tx,
    )
    .await?;

    Article::new(
        job.project_id,
        job.keyword_id,
        article.wp_post_id,
        article.post_url.as_str(),
        article.title.as_str(),
    )
    .insert(&mut tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
