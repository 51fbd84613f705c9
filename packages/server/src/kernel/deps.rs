//! Server dependencies (using traits for testability)
//!
//! Central dependency container handed to the Planner and Executor. External
//! services sit behind trait abstractions so pipeline logic is testable
//! without network access.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use wordpress::models::{Category, CreatedPost, Media, NewPost};
use wordpress::{WordPressService, WordPressSite};

use super::{BaseAI, BaseWordPress};

// =============================================================================
// WordPressService Adapter (implements BaseWordPress trait)
// =============================================================================

/// Wrapper around the wordpress REST client that implements BaseWordPress.
#[derive(Default)]
pub struct WordPressAdapter {
    service: WordPressService,
}

impl WordPressAdapter {
    pub fn new() -> Self {
        Self {
            service: WordPressService::new(),
        }
    }
}

#[async_trait]
impl BaseWordPress for WordPressAdapter {
    async fn get_categories(&self, site: &WordPressSite) -> Result<Vec<Category>> {
        Ok(self.service.get_categories(site).await?)
    }

    async fn upload_image(
        &self,
        site: &WordPressSite,
        image_url: &str,
        title: &str,
    ) -> Result<Media> {
        Ok(self.service.upload_image(site, image_url, title).await?)
    }

    async fn create_post(&self, site: &WordPressSite, post: &NewPost) -> Result<CreatedPost> {
        Ok(self.service.create_post(site, post).await?)
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to the Planner and Executor.
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// AI client for all LLM operations. Callers pass specific model constants
    /// (GPT_4_TURBO, GPT_4) to select the model per-call.
    pub ai: Arc<dyn BaseAI>,
    pub wordpress: Arc<dyn BaseWordPress>,
}

impl ServerDeps {
    pub fn new(db_pool: PgPool, ai: Arc<dyn BaseAI>, wordpress: Arc<dyn BaseWordPress>) -> Self {
        Self {
            db_pool,
            ai,
            wordpress,
        }
    }
}
