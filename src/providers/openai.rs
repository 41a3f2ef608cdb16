//! OpenAI-compatible provider implementation
//!
//! Connects to any endpoint speaking the OpenAI chat-completions wire
//! format. The base URL is configurable so tests can point the provider
//! at a mock server.

use crate::config::OpenAiConfig;
use crate::error::{LovechatError, Result};
use crate::providers::{ChatTurn, Completion, CompletionRequest, Provider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI-compatible API provider
///
/// # Examples
///
/// ```no_run
/// use lovechat::config::OpenAiConfig;
/// use lovechat::providers::{OpenAiProvider, Provider};
///
/// let config = OpenAiConfig::default();
/// let provider = OpenAiProvider::new(config);
/// assert!(provider.is_ok());
/// ```
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiConfig,
}

/// Request body for the chat completions endpoint
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    max_tokens: u32,
    temperature: f32,
    presence_penalty: f32,
    frequency_penalty: f32,
}

/// Response body from the chat completions endpoint
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ChatUsage {
    #[serde(default)]
    total_tokens: u32,
}

impl OpenAiProvider {
    /// Creates a new provider instance
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("lovechat/0.2.0")
            .build()
            .map_err(|e| LovechatError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized OpenAI provider: base={}, model={}",
            config.api_base.as_deref().unwrap_or(DEFAULT_API_BASE),
            config.model
        );

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        let base = self
            .config
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/');
        format!("{}/chat/completions", base)
    }

    fn api_key(&self) -> Option<String> {
        std::env::var(&self.config.api_key_env).ok()
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
        let body = ChatCompletionRequest {
            model: &request.model,
            messages: &request.messages,
            max_tokens: request.sampling.max_tokens,
            temperature: request.sampling.temperature,
            presence_penalty: request.sampling.presence_penalty,
            frequency_penalty: request.sampling.frequency_penalty,
        };

        let mut builder = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = self.api_key() {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            LovechatError::Provider(format!("Completion request failed: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LovechatError::ProviderApi {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            LovechatError::Provider(format!("Invalid completion response: {}", e))
        })?;

        let text = parsed
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                LovechatError::Provider("Completion response contained no text".to_string())
            })?;

        let tokens_used = parsed.usage.unwrap_or_default().total_tokens;

        Ok(Completion {
            text,
            model: request.model.clone(),
            tokens_used,
        })
    }
}
