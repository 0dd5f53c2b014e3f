//! Groq client implementation
//!
//! Posts OpenAI-style `chat/completions` requests and maps every
//! provider-side fault onto [`UpstreamError`].

use super::{CompletionClient, UpstreamError};
use crate::config::ProviderSettings;
use crate::core::generation::{GenerationResult, TokenUsage};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

/// Upstream chat-completion client for the Groq API
#[derive(Debug, Clone)]
pub struct GroqClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    model: String,
    usage: TokenUsage,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}

impl GroqClient {
    /// Build a client from provider settings. Returns `None` when no API key
    /// is configured or the HTTP client cannot be constructed; the caller is
    /// expected to keep serving with generation disabled.
    pub fn from_settings(settings: &ProviderSettings) -> Option<Self> {
        let api_key = settings.api_key.clone()?;

        let http = match reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                error!("Error initializing upstream HTTP client: {}", e);
                return None;
            }
        };

        Some(Self {
            http,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            api_key,
            model: settings.model.clone(),
        })
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> std::result::Result<GenerationResult, UpstreamError> {
        debug!("Sending completion request for model {}", self.model);

        let body = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "max_tokens": max_tokens,
            "temperature": temperature,
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Parse(e.to_string()))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or(UpstreamError::NoChoices)?;

        Ok(GenerationResult {
            generated_text: choice.message.content,
            model: completion.model,
            usage: completion.usage,
        })
    }
}
