//! Scriptable mock collaborators for pipeline tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use wordpress::models::{Category, CreatedPost, Media, NewPost, RenderedText};
use wordpress::WordPressSite;

use super::{BaseAI, BaseWordPress};

/// BaseAI implementation that replays scripted responses in call order.
#[derive(Default)]
pub struct MockAI {
    completions: Mutex<VecDeque<Result<String, String>>>,
    image: Mutex<Option<Result<String, String>>>,
}

impl MockAI {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_completion(&self, text: &str) {
        self.completions
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
    }

    pub fn push_completion_error(&self, message: &str) {
        self.completions
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    pub fn set_image_url(&self, url: &str) {
        *self.image.lock().unwrap() = Some(Ok(url.to_string()));
    }

    pub fn set_image_error(&self, message: &str) {
        *self.image.lock().unwrap() = Some(Err(message.to_string()));
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete(&self, _prompt: &str, _model: Option<&str>) -> Result<String> {
        match self.completions.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("no scripted completion left")),
        }
    }

    async fn generate_image(&self, _prompt: &str) -> Result<String> {
        match self.image.lock().unwrap().clone() {
            Some(Ok(url)) => Ok(url),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("no scripted image")),
        }
    }
}

/// BaseWordPress implementation with configurable results that records the
/// posts it was asked to create.
pub struct MockWordPress {
    categories: Mutex<Result<Vec<Category>, String>>,
    upload: Mutex<Result<Media, String>>,
    create: Mutex<Result<CreatedPost, String>>,
    pub created_posts: Mutex<Vec<NewPost>>,
}

impl Default for MockWordPress {
    fn default() -> Self {
        Self {
            categories: Mutex::new(Ok(Vec::new())),
            upload: Mutex::new(Ok(Media {
                id: 1,
                source_url: None,
            })),
            create: Mutex::new(Ok(CreatedPost {
                id: 100,
                link: "https://example.com/?p=100".to_string(),
                title: RenderedText {
                    rendered: "Mock Post".to_string(),
                },
            })),
            created_posts: Mutex::new(Vec::new()),
        }
    }
}

impl MockWordPress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_categories(&self, categories: Vec<Category>) {
        *self.categories.lock().unwrap() = Ok(categories);
    }

    pub fn set_categories_error(&self, message: &str) {
        *self.categories.lock().unwrap() = Err(message.to_string());
    }

    pub fn set_upload(&self, media: Media) {
        *self.upload.lock().unwrap() = Ok(media);
    }

    pub fn set_upload_error(&self, message: &str) {
        *self.upload.lock().unwrap() = Err(message.to_string());
    }

    pub fn set_create(&self, post: CreatedPost) {
        *self.create.lock().unwrap() = Ok(post);
    }

    pub fn set_create_error(&self, message: &str) {
        *self.create.lock().unwrap() = Err(message.to_string());
    }
}

#[async_trait]
impl BaseWordPress for MockWordPress {
    async fn get_categories(&self, _site: &WordPressSite) -> Result<Vec<Category>> {
        self.categories
            .lock()
            .unwrap()
            .clone()
            .map_err(|message| anyhow!(message))
    }

    async fn upload_image(
        &self,
        _site: &WordPressSite,
        _image_url: &str,
        _title: &str,
    ) -> Result<Media> {
        self.upload
            .lock()
            .unwrap()
            .clone()
            .map_err(|message| anyhow!(message))
    }

    async fn create_post(&self, _site: &WordPressSite, post: &NewPost) -> Result<CreatedPost> {
        self.created_posts.lock().unwrap().push(post.clone());
        self.create
            .lock()
            .unwrap()
            .clone()
            .map_err(|message| anyhow!(message))
    }
}
