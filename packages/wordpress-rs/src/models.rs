use serde::{Deserialize, Serialize};

/// A category as returned by `GET /wp-json/wp/v2/categories`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A media item as returned by `POST /wp-json/wp/v2/media`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    pub id: i64,
    #[serde(default)]
    pub source_url: Option<String>,
}

/// WordPress renders post titles as `{ "rendered": "..." }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedText {
    pub rendered: String,
}

/// A post as returned by `POST /wp-json/wp/v2/posts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedPost {
    pub id: i64,
    pub link: String,
    pub title: RenderedText,
}

/// SEO metadata attached to a post.
///
/// Keys cover both Yoast SEO and Rank Math so either plugin picks them up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMeta {
    #[serde(rename = "_yoast_wpseo_title")]
    pub meta_title: String,
    #[serde(rename = "_yoast_wpseo_metadesc")]
    pub meta_description: String,
    pub rank_math_title: String,
    pub rank_math_description: String,
}

impl PostMeta {
    pub fn new(meta_title: impl Into<String>, meta_description: impl Into<String>) -> Self {
        let title = meta_title.into();
        let description = meta_description.into();
        Self {
            meta_title: title.clone(),
            meta_description: description.clone(),
            rank_math_title: title,
            rank_math_description: description,
        }
    }
}

/// Payload for `POST /wp-json/wp/v2/posts`.
#[derive(Debug, Clone, Serialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub status: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_media: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PostMeta>,
}

impl NewPost {
    /// A post that is published immediately.
    pub fn published(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            status: "publish".to_string(),
            categories: Vec::new(),
            featured_media: None,
            meta: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_post_omits_empty_optional_fields() {
        let post = NewPost::published("Title", "Body");
        let json = serde_json::to_value(&post).unwrap();
        assert!(json.get("categories").is_none());
        assert!(json.get("featured_media").is_none());
        assert!(json.get("meta").is_none());
        assert_eq!(json["status"], "publish");
    }

    #[test]
    fn new_post_serializes_seo_meta_for_both_plugins() {
        let mut post = NewPost::published("Title", "Body");
        post.meta = Some(PostMeta::new("SEO Title", "SEO Description"));
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["meta"]["_yoast_wpseo_title"], "SEO Title");
        assert_eq!(json["meta"]["rank_math_description"], "SEO Description");
    }
}
