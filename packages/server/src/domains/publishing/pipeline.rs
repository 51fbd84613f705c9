//! Content pipeline - turns one claimed post into a published article.
//!
//! Stages run in strict sequence; each feeds the next. Body generation and
//! the final publish are fatal. The featured image, category and SEO stages
//! are best-effort: their errors are logged and the pipeline continues with
//! "none" for that slot.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

use crate::domains::projects::{Keyword, Project};
use crate::kernel::{BaseAI, BaseWordPress, GPT_4, GPT_4_TURBO};
use wordpress::models::{Category, NewPost, PostMeta};

/// Upstream analysis of a keyword: language, SEO title and a suggested
/// category from the site's existing ones.
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordAnalysis {
    pub language: String,
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Result of a successful pipeline run, ready to finalize.
#[derive(Debug, Clone)]
pub struct PublishedArticle {
    pub wp_post_id: i64,
    pub post_url: String,
    pub title: String,
    pub media_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SeoResponse {
    meta_title: String,
    meta_description: String,
}

/// Run the full pipeline for one claimed post.
///
/// The caller (the Executor) loads the project and keyword, and owns all job
/// store updates; this function only talks to the collaborators.
pub async fn run_pipeline(
    project: &Project,
    keyword: &Keyword,
    ai: &dyn BaseAI,
    wp: &dyn BaseWordPress,
) -> Result<PublishedArticle> {
    let site = project.wordpress_site();

    // The category list is fetched up front so the analysis prompt can offer
    // the existing names. An empty list just means no categorization.
    let categories = match wp.get_categories(&site).await {
        Ok(categories) => categories,
        Err(e) => {
            warn!(
                error = %format!("{:#}", e),
                "failed to list categories, continuing without"
            );
            Vec::new()
        }
    };

    let analysis = analyze_keyword(&keyword.keyword, &categories, ai)
        .await
        .context("keyword analysis failed")?;

    let body = ai
        .complete(&article_prompt(&analysis), Some(GPT_4))
        .await
        .context("article generation failed")?;

    let media_id = publish_featured_image(&analysis, &site, ai, wp).await;
    let category_id = resolve_category(analysis.category.as_deref(), &categories);
    let meta = generate_seo_meta(&body, &analysis.language, ai).await;

    let new_post = NewPost {
        title: analysis.title.clone(),
        content: body,
        status: "publish".to_string(),
        categories: category_id.into_iter().collect(),
        featured_media: media_id,
        meta,
    };

    let created = wp
        .create_post(&site, &new_post)
        .await
        .context("failed to publish post")?;

    Ok(PublishedArticle {
        wp_post_id: created.id,
        post_url: created.link,
        title: created.title.rendered,
        media_id,
    })
}

/// Analyze the keyword: detect language, craft a title, suggest a category.
async fn analyze_keyword(
    keyword: &str,
    categories: &[Category],
    ai: &dyn BaseAI,
) -> Result<KeywordAnalysis> {
    let raw = ai
        .complete_json(&analysis_prompt(keyword, categories), Some(GPT_4_TURBO))
        .await?;
    parse_analysis(&raw)
}

/// Generate the featured image and upload it to the site's media library.
///
/// Best-effort: any failure is logged and the post goes out without a
/// featured image.
async fn publish_featured_image(
    analysis: &KeywordAnalysis,
    site: &wordpress::WordPressSite,
    ai: &dyn BaseAI,
    wp: &dyn BaseWordPress,
) -> Option<i64> {
    let image_url = match ai.generate_image(&image_prompt(&analysis.title)).await {
        Ok(url) => url,
        Err(e) => {
            warn!(
                error = %format!("{:#}", e),
                "featured image generation failed, publishing without"
            );
            return None;
        }
    };

    match wp.upload_image(site, &image_url, &analysis.title).await {
        Ok(media) => Some(media.id),
        Err(e) => {
            warn!(
                error = %format!("{:#}", e),
                "featured image upload failed, publishing without"
            );
            None
        }
    }
}

/// Match the suggested category name against the site's categories.
///
/// Tolerates junk suggestions by falling back to none; no category is ever
/// guessed.
pub fn resolve_category(suggestion: Option<&str>, categories: &[Category]) -> Option<i64> {
    let suggestion = suggestion?.trim();
    if suggestion.is_empty() {
        return None;
    }
    categories
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(suggestion))
        .map(|c| c.id)
}

/// Generate SEO metadata for the article. Best-effort: degrades to no meta.
async fn generate_seo_meta(body: &str, language: &str, ai: &dyn BaseAI) -> Option<PostMeta> {
    let raw = match ai
        .complete_json(&seo_prompt(body, language), Some(GPT_4_TURBO))
        .await
    {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %format!("{:#}", e), "SEO meta generation failed, publishing without");
            return None;
        }
    };

    match parse_json_response::<SeoResponse>(&raw) {
        Ok(seo) => Some(PostMeta::new(seo.meta_title, seo.meta_description)),
        Err(e) => {
            warn!(error = %e, "unparseable SEO meta response, publishing without");
            None
        }
    }
}

fn parse_analysis(raw: &str) -> Result<KeywordAnalysis> {
    parse_json_response(raw).context("unparseable keyword analysis response")
}

/// Parse an LLM JSON response, tolerating markdown code fences.
fn parse_json_response<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T> {
    let trimmed = raw.trim();
    let stripped = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .unwrap_or(trimmed);
    Ok(serde_json::from_str(stripped.trim())?)
}

// =============================================================================
// Prompts
// =============================================================================

fn analysis_prompt(keyword: &str, categories: &[Category]) -> String {
    let names = categories
        .iter()
        .map(|c| format!("\"{}\"", c.name))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Analyze the keyword: "{keyword}".
Based on this keyword, provide the following in JSON format:
1. "language": The ISO 639-1 code for the language of the keyword (e.g., "en", "pl", "de").
2. "title": A compelling, SEO-friendly article title in that language.
3. "category": The most relevant category from the following list: [{names}]. Choose only one, or null if none fit.

Your response must be a single, valid JSON object and nothing else."#
    )
}

fn article_prompt(analysis: &KeywordAnalysis) -> String {
    format!(
        r#"Write a high-quality, unique article of at least 200 words in {language}.
The title of the article is: "{title}".
The article should be well-structured with a clear introduction, body with headings (using <h2> tags), and a conclusion.
The tone should be informative and engaging.
Do not include the main title in the body of your response. Start directly with the first paragraph."#,
        language = analysis.language,
        title = analysis.title,
    )
}

fn image_prompt(title: &str) -> String {
    format!(
        r#"Create a high-resolution, photorealistic image suitable as a featured image for a blog post titled: "{title}".
Strictly no text of any kind in the image.
Avoid illustration or digital-art styles; the image should be indistinguishable from a professional photograph with natural lighting and true-to-life colors.
The main subject should be in sharp focus and directly related to the article's theme."#
    )
}

fn seo_prompt(body: &str, language: &str) -> String {
    let excerpt: String = body.chars().take(1500).collect();
    format!(
        r#"Based on the following article content, generate SEO metadata in {language}.
Provide the response as a valid JSON object with two keys: "meta_title" and "meta_description".
- "meta_title": A concise and SEO-optimized title, max 60 characters.
- "meta_description": A compelling summary, max 160 characters.

Article Content:
---
{excerpt}...
---

Your response must be a single, valid JSON object and nothing else."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{MockAI, MockWordPress};
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_project() -> Project {
        Project {
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
        }
    }

    fn sample_keyword(project: &Project) -> Keyword {
        Keyword {
            id: Uuid::new_v4(),
            project_id: project.id,
            keyword: "rust async runtimes".to_string(),
            is_used: true,
            created_at: Utc::now(),
        }
    }

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: 4,
                name: "Technology".to_string(),
            },
            Category {
                id: 9,
                name: "Lifestyle".to_string(),
            },
        ]
    }

    fn script_happy_path(ai: &MockAI) {
        ai.push_completion(
            r#"{"language": "en", "title": "A Guide to Rust Async", "category": "Technology"}"#,
        );
        ai.push_completion("<p>Article body.</p>");
        ai.set_image_url("https://images.example.com/1.png");
        ai.push_completion(r#"{"meta_title": "Rust Async", "meta_description": "A guide."}"#);
    }

    #[tokio::test]
    async fn happy_path_publishes_with_image_category_and_meta() {
        let project = sample_project();
        let keyword = sample_keyword(&project);
        let ai = MockAI::new();
        let wp = MockWordPress::new();
        wp.set_categories(categories());
        script_happy_path(&ai);

        let article = run_pipeline(&project, &keyword, &ai, &wp).await.unwrap();

        assert_eq!(article.wp_post_id, 100);
        assert_eq!(article.post_url, "https://example.com/?p=100");
        assert_eq!(article.media_id, Some(1));

        let posts = wp.created_posts.lock().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "A Guide to Rust Async");
        assert_eq!(posts[0].categories, vec![4]);
        assert_eq!(posts[0].featured_media, Some(1));
        assert!(posts[0].meta.is_some());
    }

    #[tokio::test]
    async fn body_generation_failure_is_fatal() {
        let project = sample_project();
        let keyword = sample_keyword(&project);
        let ai = MockAI::new();
        let wp = MockWordPress::new();
        ai.push_completion(r#"{"language": "en", "title": "T", "category": null}"#);
        ai.push_completion_error("rate limited");

        let err = run_pipeline(&project, &keyword, &ai, &wp)
            .await
            .unwrap_err();

        assert!(format!("{:#}", err).contains("rate limited"));
        assert!(wp.created_posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unparseable_analysis_is_fatal() {
        let project = sample_project();
        let keyword = sample_keyword(&project);
        let ai = MockAI::new();
        let wp = MockWordPress::new();
        ai.push_completion("not json at all");

        let err = run_pipeline(&project, &keyword, &ai, &wp)
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("keyword analysis"));
    }

    #[tokio::test]
    async fn image_failure_still_publishes_without_media() {
        let project = sample_project();
        let keyword = sample_keyword(&project);
        let ai = MockAI::new();
        let wp = MockWordPress::new();
        wp.set_categories(categories());
        ai.push_completion(
            r#"{"language": "en", "title": "T", "category": "Technology"}"#,
        );
        ai.push_completion("<p>Body</p>");
        ai.set_image_error("image API down");
        ai.push_completion(r#"{"meta_title": "T", "meta_description": "D"}"#);

        let article = run_pipeline(&project, &keyword, &ai, &wp).await.unwrap();

        assert_eq!(article.media_id, None);
        let posts = wp.created_posts.lock().unwrap();
        assert_eq!(posts[0].featured_media, None);
        assert_eq!(posts[0].categories, vec![4]);
    }

    #[tokio::test]
    async fn upload_failure_still_publishes_without_media() {
        let project = sample_project();
        let keyword = sample_keyword(&project);
        let ai = MockAI::new();
        let wp = MockWordPress::new();
        wp.set_upload_error("media endpoint 503");
        script_happy_path(&ai);

        let article = run_pipeline(&project, &keyword, &ai, &wp).await.unwrap();
        assert_eq!(article.media_id, None);
    }

    #[tokio::test]
    async fn empty_category_list_publishes_uncategorized() {
        let project = sample_project();
        let keyword = sample_keyword(&project);
        let ai = MockAI::new();
        let wp = MockWordPress::new();
        script_happy_path(&ai);

        run_pipeline(&project, &keyword, &ai, &wp).await.unwrap();

        let posts = wp.created_posts.lock().unwrap();
        assert!(posts[0].categories.is_empty());
    }

    #[tokio::test]
    async fn category_listing_error_degrades_to_uncategorized() {
        let project = sample_project();
        let keyword = sample_keyword(&project);
        let ai = MockAI::new();
        let wp = MockWordPress::new();
        wp.set_categories_error("categories endpoint down");
        script_happy_path(&ai);

        run_pipeline(&project, &keyword, &ai, &wp).await.unwrap();

        let posts = wp.created_posts.lock().unwrap();
        assert!(posts[0].categories.is_empty());
    }

    #[tokio::test]
    async fn unparseable_seo_response_degrades_to_no_meta() {
        let project = sample_project();
        let keyword = sample_keyword(&project);
        let ai = MockAI::new();
        let wp = MockWordPress::new();
        wp.set_categories(categories());
        ai.push_completion(r#"{"language": "en", "title": "T", "category": "Technology"}"#);
        ai.push_completion("<p>Body</p>");
        ai.set_image_url("https://images.example.com/1.png");
        ai.push_completion("sorry, I cannot do that");

        run_pipeline(&project, &keyword, &ai, &wp).await.unwrap();

        let posts = wp.created_posts.lock().unwrap();
        assert!(posts[0].meta.is_none());
    }

    #[tokio::test]
    async fn publish_error_propagates_with_api_payload() {
        let project = sample_project();
        let keyword = sample_keyword(&project);
        let ai = MockAI::new();
        let wp = MockWordPress::new();
        wp.set_create_error("WordPress API error (500): internal_server_error");
        script_happy_path(&ai);

        let err = run_pipeline(&project, &keyword, &ai, &wp)
            .await
            .unwrap_err();
        let rendered = format!("{:#}", err);
        assert!(rendered.contains("500"));
        assert!(rendered.contains("failed to publish post"));
    }

    #[test]
    fn resolve_category_matches_case_insensitively() {
        assert_eq!(resolve_category(Some("technology"), &categories()), Some(4));
        assert_eq!(resolve_category(Some("Lifestyle"), &categories()), Some(9));
    }

    #[test]
    fn resolve_category_falls_back_to_none_on_junk() {
        assert_eq!(resolve_category(Some("42"), &categories()), None);
        assert_eq!(resolve_category(Some(""), &categories()), None);
        assert_eq!(resolve_category(None, &categories()), None);
        assert_eq!(resolve_category(Some("Technology"), &[]), None);
    }

    #[test]
    fn parse_json_response_tolerates_code_fences() {
        let fenced = "```json\n{\"language\": \"en\", \"title\": \"T\"}\n```";
        let analysis: KeywordAnalysis = parse_json_response(fenced).unwrap();
        assert_eq!(analysis.language, "en");
        assert_eq!(analysis.category, None);
    }
}
