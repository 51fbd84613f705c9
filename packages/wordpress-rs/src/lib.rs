// WordPress REST API (wp/v2) client for programmatic publishing.
//
// Authenticates with application passwords (HTTP Basic auth) per site, so one
// service instance can publish to any number of WordPress installs.

pub mod models;

use reqwest::{header, Client};

use crate::models::{Category, CreatedPost, Media, NewPost};

/// Connection details for one WordPress install.
#[derive(Debug, Clone)]
pub struct WordPressSite {
    pub base_url: String,
    pub username: String,
    pub app_password: String,
}

#[derive(Debug, thiserror::Error)]
pub enum WordPressError {
    /// The API answered with a non-success status; `body` carries the raw
    /// error payload so callers can persist it.
    #[error("WordPress API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Client for the WordPress REST API.
#[derive(Debug, Clone, Default)]
pub struct WordPressService {
    http: Client,
}

impl WordPressService {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }

    fn api_url(site: &WordPressSite, path: &str) -> String {
        format!("{}/wp-json/wp/v2{}", site.base_url.trim_end_matches('/'), path)
    }

    /// List the site's categories (up to 100).
    ///
    /// An empty list is a valid result and means no categorization is possible.
    pub async fn get_categories(
        &self,
        site: &WordPressSite,
    ) -> Result<Vec<Category>, WordPressError> {
        let response = self
            .http
            .get(Self::api_url(site, "/categories"))
            .query(&[("per_page", "100")])
            .basic_auth(&site.username, Some(&site.app_password))
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Download an image from `image_url` and upload it to the site's media
    /// library, returning the created media item.
    pub async fn upload_image(
        &self,
        site: &WordPressSite,
        image_url: &str,
        title: &str,
    ) -> Result<Media, WordPressError> {
        let image = self.http.get(image_url).send().await?;
        let image = check_status(image).await?;
        let bytes = image.bytes().await?;

        let filename = image_filename(title);
        let response = self
            .http
            .post(Self::api_url(site, "/media"))
            .basic_auth(&site.username, Some(&site.app_password))
            .header(header::CONTENT_TYPE, "image/png")
            .header(
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            )
            .query(&[("title", title), ("alt_text", title)])
            .body(bytes)
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Create a post, returning its id and public URL.
    pub async fn create_post(
        &self,
        site: &WordPressSite,
        post: &NewPost,
    ) -> Result<CreatedPost, WordPressError> {
        let response = self
            .http
            .post(Self::api_url(site, "/posts"))
            .basic_auth(&site.username, Some(&site.app_password))
            .json(post)
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

/// Turn a non-success response into `WordPressError::Api` carrying the body.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, WordPressError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(WordPressError::Api {
        status: status.as_u16(),
        body,
    })
}

/// Build a unique media filename from a post title.
pub fn image_filename(title: &str) -> String {
    let slug: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect();
    format!("{}-{}.png", slug, chrono::Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> WordPressSite {
        WordPressSite {
            base_url: "https://example.com/".to_string(),
            username: "admin".to_string(),
            app_password: "secret".to_string(),
        }
    }

    #[test]
    fn api_url_strips_trailing_slash() {
        let url = WordPressService::api_url(&site(), "/posts");
        assert_eq!(url, "https://example.com/wp-json/wp/v2/posts");
    }

    #[test]
    fn image_filename_slugs_the_title() {
        let name = image_filename("The Ultimate Guide to Rust!");
        assert!(name.starts_with("the-ultimate-guide-to-rust-"));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn api_error_display_includes_status_and_body() {
        let err = WordPressError::Api {
            status: 500,
            body: "{\"code\":\"internal_server_error\"}".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("500"));
        assert!(rendered.contains("internal_server_error"));
    }
}
