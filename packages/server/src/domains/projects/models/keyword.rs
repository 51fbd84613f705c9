use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Keyword - a topic seed consumed by exactly one scheduled post.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Keyword {
    pub id: Uuid,
    pub project_id: Uuid,
    pub keyword: String,
    pub is_used: bool,
    pub created_at: DateTime<Utc>,
}

impl Keyword {
    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Self> {
        let keyword = sqlx::query_as::<_, Self>(
            r#"
            SELECT id, project_id, keyword, is_used, created_at
            FROM keywords
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(keyword)
    }

    /// Uniform random sample of unused keywords for a project.
    ///
    /// Selection is intentionally unordered-random to avoid bias toward
    /// insertion order. The sample itself takes no locks; `consume` guards
    /// against a concurrent planner run capturing the same keyword.
    pub async fn sample_unused(project_id: Uuid, limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        let keywords = sqlx::query_as::<_, Self>(
            r#"
            SELECT id, project_id, keyword, is_used, created_at
            FROM keywords
            WHERE project_id = $1 AND is_used = FALSE
            ORDER BY RANDOM()
            LIMIT $2
            "#,
        )
        .bind(project_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(keywords)
    }

    /// Flip the keyword to used, returning false if another transaction
    /// already consumed it. Must run inside the same transaction that inserts
    /// the keyword's scheduled post.
    pub async fn consume(&self, conn: &mut PgConnection) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE keywords
            SET is_used = TRUE
            WHERE id = $1 AND is_used = FALSE
            "#,
        )
        .bind(self.id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
