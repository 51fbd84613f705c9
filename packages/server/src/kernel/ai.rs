// AI implementation using OpenAI
//
// This is the infrastructure implementation of BaseAI.
// Business logic (what to prompt for) lives in domain layers.

use anyhow::{Context, Result};
use async_trait::async_trait;
use rig::completion::Prompt;
use rig::providers::openai;
use serde::{Deserialize, Serialize};

use super::{BaseAI, DALL_E_3, GPT_4, GPT_4_TURBO};

#[derive(Debug, Serialize)]
struct ImageRequest {
    model: String,
    prompt: String,
    n: u8,
    size: String,
    quality: String,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: String,
}

/// OpenAI implementation of AI capabilities
#[derive(Clone)]
pub struct OpenAIClient {
    client: openai::Client,
    api_key: String,
}

impl OpenAIClient {
    pub fn new(api_key: String) -> Self {
        let client = openai::Client::new(&api_key);
        Self { client, api_key }
    }
}

/// First 200 characters of the prompt, for error logs. Prompts embed
/// user-language keywords and titles, so truncation must respect char
/// boundaries.
fn prompt_preview(prompt: &str) -> String {
    prompt.chars().take(200).collect()
}

#[async_trait]
impl BaseAI for OpenAIClient {
    async fn complete(&self, prompt: &str, model: Option<&str>) -> Result<String> {
        let model_id = model.unwrap_or(GPT_4_TURBO);

        tracing::debug!(
            prompt_length = prompt.len(),
            model = model_id,
            "Building OpenAI agent for completion"
        );

        let agent = match model_id {
            GPT_4 => self
                .client
                .agent(openai::GPT_4)
                .preamble("You are a helpful assistant.")
                .max_tokens(4096)
                .build(),
            _ => self
                .client
                .agent(model_id)
                .preamble("You are a helpful assistant.")
                .max_tokens(4096)
                .build(),
        };

        let response = agent
            .prompt(prompt)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    model = model_id,
                    prompt_preview = %prompt_preview(prompt),
                    "OpenAI API call failed"
                );
                e
            })
            .context("Failed to call OpenAI API")?;

        tracing::debug!(
            response_length = response.len(),
            model = model_id,
            "OpenAI API response received"
        );

        Ok(response)
    }

    async fn generate_image(&self, prompt: &str) -> Result<String> {
        // rig's completion API does not cover image generation; call the
        // images endpoint directly (same approach as embeddings elsewhere).
        let http_client = reqwest::Client::new();

        let request = ImageRequest {
            model: DALL_E_3.to_string(),
            prompt: prompt.to_string(),
            n: 1,
            size: "1024x1024".to_string(),
            quality: "standard".to_string(),
        };

        let response = http_client
            .post("https://api.openai.com/v1/images/generations")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send image request to OpenAI")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI image API error ({}): {}", status, body);
        }

        let image_response: ImageResponse = response
            .json()
            .await
            .context("Failed to parse image response")?;

        let url = image_response
            .data
            .into_iter()
            .next()
            .map(|d| d.url)
            .ok_or_else(|| anyhow::anyhow!("No image returned"))?;

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_preview_truncates_on_char_boundaries() {
        // A multibyte character straddling the 200-byte mark must not panic.
        let mut prompt = "a".repeat(199);
        prompt.push('ł');
        prompt.push_str(" dalszy ciąg artykułu");

        let preview = prompt_preview(&prompt);
        assert_eq!(preview.chars().count(), 200);
        assert!(preview.ends_with('ł'));
    }

    #[test]
    fn prompt_preview_keeps_short_prompts_whole() {
        assert_eq!(prompt_preview("krótki"), "krótki");
    }
}
