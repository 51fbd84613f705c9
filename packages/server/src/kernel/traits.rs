// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Prompt construction (what to ask for) lives in the domain layers.

use anyhow::Result;
use async_trait::async_trait;
use wordpress::models::{Category, CreatedPost, Media, NewPost};
use wordpress::WordPressSite;

// =============================================================================
// AI Trait (Infrastructure - Generic LLM capabilities)
// =============================================================================

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Complete a prompt with an LLM (returns raw text response).
    /// If model is None, uses the default model.
    async fn complete(&self, prompt: &str, model: Option<&str>) -> Result<String>;

    /// Complete a prompt expecting a JSON object response (returns raw JSON string).
    /// Parse with serde_json::from_str in calling code.
    async fn complete_json(&self, prompt: &str, model: Option<&str>) -> Result<String> {
        // Default implementation calls complete
        self.complete(prompt, model).await
    }

    /// Generate an image from a prompt, returning a URL to the rendered asset.
    async fn generate_image(&self, prompt: &str) -> Result<String>;
}

// =============================================================================
// WordPress Trait (Infrastructure - publishing target)
// =============================================================================

/// Publishing operations against one WordPress site.
///
/// Every call takes the target site so a single implementation serves all
/// projects; credentials are read from the Project row per job.
#[async_trait]
pub trait BaseWordPress: Send + Sync {
    /// List available categories. An empty list is valid and means
    /// "no categorization possible".
    async fn get_categories(&self, site: &WordPressSite) -> Result<Vec<Category>>;

    /// Fetch the image behind `image_url` and upload it to the site's media
    /// library.
    async fn upload_image(
        &self,
        site: &WordPressSite,
        image_url: &str,
        title: &str,
    ) -> Result<Media>;

    /// Create a post and return its id and public URL.
    async fn create_post(&self, site: &WordPressSite, post: &NewPost) -> Result<CreatedPost>;
}
