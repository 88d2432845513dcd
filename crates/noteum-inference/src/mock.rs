//! Mock chat backend for deterministic testing.
//!
//! Answers are produced without any network I/O. Configure a default
//! response, per-question response mappings, simulated latency, and forced
//! failures; every call is logged for assertions.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use noteum_inference::MockChatBackend;
//!
//! let backend = MockChatBackend::new()
//!     .with_fixed_response("<p>Mock answer</p>")
//!     .with_response_mapping("what's on my list?", "<ul><li>milk</li></ul>");
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use noteum_core::{ChatBackend, ChatMessage, ChatRole, Error, GenerationOptions, Result};

/// Mock chat backend for testing.
#[derive(Clone)]
pub struct MockChatBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    default_response: String,
    mapped_responses: HashMap<String, String>,
    latency: Option<Duration>,
    failure: Option<String>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            default_response: "<p>Mock response</p>".to_string(),
            mapped_responses: HashMap::new(),
            latency: None,
            failure: None,
        }
    }
}

impl Default for MockChatBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChatBackend {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the response returned when no mapping matches.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Map a specific final user message to a specific response.
    pub fn with_response_mapping(
        mut self,
        question: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .mapped_responses
            .insert(question.into(), response.into());
        self
    }

    /// Simulate latency on every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        Arc::make_mut(&mut self.config).latency = Some(latency);
        self
    }

    /// Make every call fail with an inference error.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).failure = Some(message.into());
        self
    }

    /// All message lists this backend was called with.
    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.call_log.lock().unwrap().clone()
    }

    /// Number of chat calls made.
    pub fn call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatBackend for MockChatBackend {
    async fn chat(&self, messages: &[ChatMessage], _opts: &GenerationOptions) -> Result<String> {
        self.call_log.lock().unwrap().push(messages.to_vec());

        if let Some(latency) = self.config.latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(message) = &self.config.failure {
            return Err(Error::Inference(message.clone()));
        }

        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        Ok(self
            .config
            .mapped_responses
            .get(last_user)
            .cloned()
            .unwrap_or_else(|| self.config.default_response.clone()))
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
