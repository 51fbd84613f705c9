//! ScheduledPost model - the job store.
//!
//! Rows double as the durable schedule and the work queue. The Planner only
//! inserts `pending` rows; the Executor claims them with
//! `FOR UPDATE SKIP LOCKED` and drives the status transitions.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Ceiling on re-attempts for a failed post before permanent exclusion.
pub const MAX_RETRIES: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "post_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

/// Single source of truth for the claim predicate.
///
/// The SQL in `claim_next` must mirror this exactly; both the Planner's
/// exclusions and the Executor's claim derive from it.
pub fn is_eligible(
    status: PostStatus,
    retry_count: i32,
    publish_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> bool {
    match status {
        PostStatus::Pending => publish_at <= now,
        PostStatus::Failed => retry_count < MAX_RETRIES,
        PostStatus::Processing | PostStatus::Completed => false,
    }
}

/// Scheduled post - binds a project and a keyword to a publish time and
/// tracks pipeline status.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScheduledPost {
    pub id: Uuid,
    pub project_id: Uuid,
    pub keyword_id: Uuid,
    pub publish_at: DateTime<Utc>,
    pub status: PostStatus,
    pub retry_count: i32,
    pub error_message: Option<String>,
    pub wordpress_post_id: Option<i64>,
    pub wordpress_post_url: Option<String>,
    pub wordpress_media_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScheduledPost {
    pub fn new(project_id: Uuid, keyword_id: Uuid, publish_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            keyword_id,
            publish_at,
            status: PostStatus::Pending,
            retry_count: 0,
            error_message: None,
            wordpress_post_id: None,
            wordpress_post_url: None,
            wordpress_media_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn is_eligible_at(&self, now: DateTime<Utc>) -> bool {
        is_eligible(self.status, self.retry_count, self.publish_at, now)
    }

    /// Insert the post. Runs in the same transaction that consumes the
    /// keyword.
    pub async fn insert(&self, conn: &mut PgConnection) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO scheduled_posts (
                id, project_id, keyword_id, publish_at, status, retry_count,
                error_message, wordpress_post_id, wordpress_post_url,
                wordpress_media_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(self.id)
        .bind(self.project_id)
        .bind(self.keyword_id)
        .bind(self.publish_at)
        .bind(self.status)
        .bind(self.retry_count)
        .bind(&self.error_message)
        .bind(self.wordpress_post_id)
        .bind(&self.wordpress_post_url)
        .bind(self.wordpress_media_id)
        .bind(self.created_at)
        .bind(self.updated_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Atomically claim the oldest due post, flipping it to `processing`.
    ///
    /// `FOR UPDATE SKIP LOCKED` guarantees at-most-one claimant per row under
    /// concurrent executor runs. The claim commits before any external work
    /// starts. Returns None (a normal empty result) when nothing is due.
    pub async fn claim_next(pool: &PgPool) -> Result<Option<Self>> {
        let post = sqlx::query_as::<_, Self>(
            r#"
            UPDATE scheduled_posts
            SET status = 'processing', updated_at = NOW()
            WHERE id = (
                SELECT id
                FROM scheduled_posts
                WHERE (status = 'pending' AND publish_at <= NOW())
                   OR (status = 'failed' AND retry_count < $1)
                ORDER BY publish_at
                LIMIT 1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING id, project_id, keyword_id, publish_at, status, retry_count,
                      error_message, wordpress_post_id, wordpress_post_url,
                      wordpress_media_id, created_at, updated_at
            "#,
        )
        .bind(MAX_RETRIES)
        .fetch_optional(pool)
        .await?;

        Ok(post)
    }

    /// Record pipeline success. Runs in the finalize transaction alongside
    /// the article insert.
    pub async fn mark_completed(
        id: Uuid,
        wp_post_id: i64,
        post_url: &str,
        media_id: Option<i64>,
        conn: &mut PgConnection,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE scheduled_posts
            SET status = 'completed',
                error_message = NULL,
                wordpress_post_id = $1,
                wordpress_post_url = $2,
                wordpress_media_id = $3,
                updated_at = NOW()
            WHERE id = $4
            "#,
        )
        .bind(wp_post_id)
        .bind(post_url)
        .bind(media_id)
        .bind(id)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Record a fatal pipeline error. The post becomes re-claimable until
    /// `retry_count` reaches MAX_RETRIES.
    pub async fn mark_failed(id: Uuid, error: &str, pool: &PgPool) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE scheduled_posts
            SET status = 'failed',
                retry_count = retry_count + 1,
                error_message = $1,
                updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(error)
        .bind(id)
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_post() -> ScheduledPost {
        ScheduledPost::new(Uuid::new_v4(), Uuid::new_v4(), Utc::now())
    }

    #[test]
    fn new_post_starts_pending_with_zero_retries() {
        let post = sample_post();
        assert_eq!(post.status, PostStatus::Pending);
        assert_eq!(post.retry_count, 0);
        assert!(post.error_message.is_none());
        assert!(post.wordpress_post_url.is_none());
    }

    #[test]
    fn pending_post_is_eligible_once_due() {
        let now = Utc::now();
        assert!(is_eligible(PostStatus::Pending, 0, now - Duration::minutes(1), now));
        assert!(is_eligible(PostStatus::Pending, 0, now, now));
    }

    #[test]
    fn pending_post_is_not_eligible_before_publish_time() {
        let now = Utc::now();
        assert!(!is_eligible(PostStatus::Pending, 0, now + Duration::minutes(1), now));
    }

    #[test]
    fn processing_and_completed_posts_are_never_eligible() {
        let now = Utc::now();
        let past = now - Duration::hours(1);
        assert!(!is_eligible(PostStatus::Processing, 0, past, now));
        assert!(!is_eligible(PostStatus::Completed, 0, past, now));
    }

    #[test]
    fn failed_post_is_eligible_while_retries_remain() {
        let now = Utc::now();
        let past = now - Duration::hours(1);
        assert!(is_eligible(PostStatus::Failed, 0, past, now));
        assert!(is_eligible(PostStatus::Failed, MAX_RETRIES - 1, past, now));
    }

    #[test]
    fn failed_post_with_exhausted_retries_is_terminal() {
        let now = Utc::now();
        let past = now - Duration::hours(1);
        assert!(!is_eligible(PostStatus::Failed, MAX_RETRIES, past, now));
        assert!(!is_eligible(PostStatus::Failed, MAX_RETRIES + 1, past, now));
    }

    #[test]
    fn failed_post_retry_eligibility_ignores_publish_time() {
        // A failed post is re-claimable immediately; publish_at only orders it.
        let now = Utc::now();
        assert!(is_eligible(PostStatus::Failed, 1, now + Duration::hours(1), now));
    }
}
