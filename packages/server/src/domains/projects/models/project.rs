use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use wordpress::WordPressSite;

/// Project - a configured WordPress publishing target with posting-volume
/// bounds and its own keyword pool.
///
/// Owned by the operator (created via the CRUD surface); read-only to the
/// planning/publishing core.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,

    // WordPress credentials (application password auth)
    pub wp_url: String,
    pub wp_user: String,
    pub wp_password: String,

    // Daily posting bounds, min <= max enforced by the schema
    pub min_posts_per_day: i32,
    pub max_posts_per_day: i32,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// All projects eligible for planning.
    pub async fn find_active(pool: &PgPool) -> Result<Vec<Self>> {
        let projects = sqlx::query_as::<_, Self>(
            r#"
            SELECT id, name, wp_url, wp_user, wp_password,
                   min_posts_per_day, max_posts_per_day, is_active,
                   created_at, updated_at
            FROM projects
            WHERE is_active = TRUE
            ORDER BY created_at
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Self> {
        let project = sqlx::query_as::<_, Self>(
            r#"
            SELECT id, name, wp_url, wp_user, wp_password,
                   min_posts_per_day, max_posts_per_day, is_active,
                   created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    /// Connection details for this project's WordPress install.
    pub fn wordpress_site(&self) -> WordPressSite {
        WordPressSite {
            base_url: self.wp_url.clone(),
            username: self.wp_user.clone(),
            app_password: self.wp_password.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wordpress_site_carries_the_project_credentials() {
        let project = Project {
            id: Uuid::new_v4(),
            name: "Tech Blog".to_string(),
            wp_url: "https://blog.example.com".to_string(),
            wp_user: "publisher".to_string(),
            wp_password: "app-pass".to_string(),
            min_posts_per_day: 1,
            max_posts_per_day: 3,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let site = project.wordpress_site();
        assert_eq!(site.base_url, "https://blog.example.com");
        assert_eq!(site.username, "publisher");
        assert_eq!(site.app_password, "app-pass");
    }
}
