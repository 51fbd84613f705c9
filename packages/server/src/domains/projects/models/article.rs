use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use uuid::Uuid;

/// Article - durable record of a successfully published post, for reporting.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    pub id: Uuid,
    pub project_id: Uuid,
    pub keyword_id: Uuid,
    pub wp_post_id: i64,
    pub post_url: String,
    pub title: String,
    pub published_at: DateTime<Utc>,
}

impl Article {
    pub fn new(
        project_id: Uuid,
        keyword_id: Uuid,
        wp_post_id: i64,
        post_url: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            keyword_id,
            wp_post_id,
            post_url: post_url.into(),
            title: title.into(),
            published_at: Utc::now(),
        }
    }

    /// Insert the article. Runs in the finalize transaction alongside the
    /// scheduled post's completion update.
    pub async fn insert(&self, conn: &mut PgConnection) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO articles (id, project_id, keyword_id, wp_post_id, post_url, title, published_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(self.id)
        .bind(self.project_id)
        .bind(self.keyword_id)
        .bind(self.wp_post_id)
        .bind(&self.post_url)
        .bind(&self.title)
        .bind(self.published_at)
        .execute(conn)
        .await?;

        Ok(())
    }
}
