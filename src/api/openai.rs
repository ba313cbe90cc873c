use super::types::*;
use super::utils::check_response_status;
use super::Generator;
use crate::config::{ApiKey, PhiloConfig};
use crate::error::{PhiloError, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;

#[derive(Clone)]
pub struct OpenAIClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OpenAIClient {
    pub fn new(
        api_key: &ApiKey,
        base_url: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key.expose()))
                .map_err(|e| PhiloError::Config(format!("Invalid OpenAI API key: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| PhiloError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            temperature,
        })
    }

    pub fn from_config(config: &PhiloConfig) -> Result<Self> {
        Self::new(
            config.api_key()?,
            config.base_url.clone(),
            config.model.clone(),
            config.temperature,
            config.request_timeout(),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    pub async fn create_chat_completion(&self, prompt: &str) -> Result<ChatCompletionResponse> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: self.temperature,
        };

        tracing::debug!(
            model = %self.model,
            temperature = self.temperature,
            prompt_chars = prompt.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.completions_url())
            .json(&request)
            .send()
            .await?;
        let response = check_response_status(response).await?;
        let body = response.text().await?;
        let parsed = parse_completion(&body)?;

        if let Some(usage) = parsed.usage {
            tracing::info!(
                id = %parsed.id,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Chat completion received"
            );
        }

        Ok(parsed)
    }
}

impl Generator for OpenAIClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let parsed = self.create_chat_completion(prompt).await?;
        extract_text(parsed)
    }
}

fn parse_completion(body: &str) -> Result<ChatCompletionResponse> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(error = %e, body_chars = body.len(), "Unreadable chat completion response");
        PhiloError::Json(e)
    })
}

/// Text of the first choice; an answer without text is a failed generation.
fn extract_text(response: ChatCompletionResponse) -> Result<String> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| PhiloError::Generation("OpenAI response contained no choices".to_string()))?;

    match choice.message.content {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(PhiloError::Generation(format!(
            "OpenAI response contained no text (finish reason: {})",
            choice.finish_reason.as_deref().unwrap_or("unknown")
        ))),
    }
}
