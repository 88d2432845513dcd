//! OpenAI-compatible chat backend implementation.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use noteum_core::{ChatBackend, ChatMessage, Error, GenerationOptions, Result};

use super::types::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse, WireMessage};

/// Default API endpoint (the hosted chat-completion service the original
/// deployment authenticates to with a GitHub token).
pub const DEFAULT_BASE_URL: &str = "https://models.inference.ai.azure.com";

/// Default generation model.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default HTTP client timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default transport retry count.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Configuration for the OpenAI-compatible backend.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key for authentication (optional for local endpoints).
    pub api_key: Option<String>,
    /// Model to use for generation.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Retries for transport-level failures. HTTP error statuses other than
    /// 429/5xx do not retry.
    pub max_retries: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// OpenAI-compatible chat backend.
pub struct OpenAiBackend {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiBackend {
    /// Create a new backend with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "openai",
            model = %config.model,
            base_url = %config.base_url,
            "Initializing chat backend"
        );

        Ok(Self { client, config })
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(OpenAiConfig::default())
    }

    /// Create from environment variables.
    ///
    /// Reads `NOTEUM_AI_BASE_URL`, `NOTEUM_AI_API_KEY` (falling back to
    /// `GITHUB_TOKEN`, which the default hosted endpoint authenticates with),
    /// `NOTEUM_AI_MODEL`, `NOTEUM_AI_TIMEOUT`, and `NOTEUM_AI_MAX_RETRIES`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("NOTEUM_AI_API_KEY")
            .or_else(|_| std::env::var("GITHUB_TOKEN"))
            .ok();

        if api_key.is_none() {
            warn!(
                subsystem = "inference",
                component = "openai",
                "No API key configured (NOTEUM_AI_API_KEY or GITHUB_TOKEN); \
                 requests to authenticated endpoints will be rejected"
            );
        }

        let config = OpenAiConfig {
            base_url: std::env::var("NOTEUM_AI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            api_key,
            model: std::env::var("NOTEUM_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            timeout_seconds: std::env::var("NOTEUM_AI_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            max_retries: std::env::var("NOTEUM_AI_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_RETRIES),
        };

        Self::new(config)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// Build the chat completions request with authentication if configured.
    fn build_request(&self, body: &ChatCompletionRequest) -> reqwest::RequestBuilder {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let mut req = self.client.post(&url);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        req.header("Content-Type", "application/json").json(body)
    }

    /// Parse the error envelope out of a non-success response.
    async fn error_message(response: reqwest::Response) -> String {
        response
            .json::<ApiErrorResponse>()
            .await
            .map(|body| body.error.message)
            .unwrap_or_else(|_| "Unknown error".to_string())
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    async fn chat(&self, messages: &[ChatMessage], opts: &GenerationOptions) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            temperature: opts.temperature,
            top_p: opts.top_p,
            max_tokens: opts.max_tokens,
        };

        debug!(
            subsystem = "inference",
            component = "openai",
            op = "chat",
            model = %self.config.model,
            message_count = messages.len(),
            "Running chat completion"
        );

        let mut attempt = 0u32;
        let response = loop {
            match self.build_request(&request).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        break response;
                    }
                    // 429 and 5xx are transient on hosted endpoints; anything
                    // else is a caller error and retrying cannot help.
                    let transient = status.as_u16() == 429 || status.is_server_error();
                    if transient && attempt < self.config.max_retries {
                        attempt += 1;
                        warn!(
                            subsystem = "inference",
                            component = "openai",
                            status = status.as_u16(),
                            attempt = attempt,
                            "Transient API failure, retrying"
                        );
                        continue;
                    }
                    let message = Self::error_message(response).await;
                    return Err(Error::Inference(format!(
                        "Chat API returned {}: {}",
                        status, message
                    )));
                }
                Err(e) if e.is_timeout() => {
                    return Err(Error::Timeout(format!("Chat completion request: {}", e)));
                }
                Err(e) => {
                    if attempt < self.config.max_retries {
                        attempt += 1;
                        warn!(
                            subsystem = "inference",
                            component = "openai",
                            error = %e,
                            attempt = attempt,
                            "Transport failure, retrying"
                        );
                        continue;
                    }
                    return Err(Error::Request(format!("Request failed: {}", e)));
                }
            }
        };

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        let content = result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Inference("Response contained no choices".to_string()))?;

        debug!(
            subsystem = "inference",
            component = "openai",
            op = "chat",
            response_len = content.len(),
            "Chat completion finished"
        );
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OpenAiConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_backend_creation() {
        let backend = OpenAiBackend::with_defaults();
        assert!(backend.is_ok());
        assert_eq!(backend.unwrap().config().base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_model_name_accessor() {
        let config = OpenAiConfig {
            model: "test-model".to_string(),
            ..Default::default()
        };
        let backend = OpenAiBackend::new(config).unwrap();
        assert_eq!(backend.model_name(), "test-model");
    }

    #[test]
    fn test_custom_config() {
        let config = OpenAiConfig {
            base_url: "http://localhost:8080/v1".to_string(),
            api_key: Some("test-key".to_string()),
            model: "local-model".to_string(),
            timeout_seconds: 5,
            max_retries: 0,
        };
        let cloned = config.clone();
        assert_eq!(cloned.base_url, "http://localhost:8080/v1");
        assert_eq!(cloned.api_key.as_deref(), Some("test-key"));
        assert_eq!(cloned.max_retries, 0);
    }
}
