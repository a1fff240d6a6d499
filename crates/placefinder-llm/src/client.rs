//! HTTP client for an OpenAI-compatible chat-completions endpoint.
//!
//! Wraps `reqwest` with bearer-token auth, a per-attempt timeout and the
//! retry policy in [`crate::retry`]. The client holds only read-only
//! configuration and may be shared across concurrent requests.

use std::time::Duration;

use placefinder_core::config::{DEFAULT_LLM_API_URL, DEFAULT_LLM_MODEL};
use placefinder_core::AppConfig;
use reqwest::Client;

use crate::error::LlmError;
use crate::retry::retry_with_backoff;
use crate::types::{upstream_error_message, ChatMessage, ChatRequest, ChatResponse};

const CONNECT_TIMEOUT_MS: u64 = 10_000;

/// Settings for [`CompletionClient`].
#[derive(Clone)]
pub struct CompletionConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    /// Base delay for exponential backoff: `base_delay_ms * 2^attempt`.
    pub base_delay_ms: u64,
    /// Per-attempt request timeout.
    pub timeout_ms: u64,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: DEFAULT_LLM_API_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            max_retries: 3,
            base_delay_ms: 1_000,
            timeout_ms: 30_000,
            temperature: 0.3,
            max_tokens: 2_000,
        }
    }
}

impl CompletionConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            api_key: config.llm_api_key.clone().unwrap_or_default(),
            api_url: config.llm_api_url.clone(),
            model: config.llm_model.clone(),
            max_retries: config.llm_max_retries,
            base_delay_ms: config.llm_base_delay_ms,
            timeout_ms: config.llm_timeout_ms,
            ..Self::default()
        }
    }
}

impl std::fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_key", &"[redacted]")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("max_retries", &self.max_retries)
            .field("base_delay_ms", &self.base_delay_ms)
            .field("timeout_ms", &self.timeout_ms)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Chat-completion client with bounded retry.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    client: Client,
    config: CompletionConfig,
}

impl CompletionClient {
    /// Creates a client from `config`.
    ///
    /// A missing API key is not an error here; it is reported by
    /// [`CompletionClient::complete`] so the process can still start.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: CompletionConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(
                CONNECT_TIMEOUT_MS.min(config.timeout_ms),
            ))
            .user_agent("placefinder/0.1 (place-search)")
            .build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    /// Sends `prompt` as a single user message and returns the text of the
    /// first choice (`""` if the response carries none).
    ///
    /// # Errors
    ///
    /// - [`LlmError::Configuration`] if no API key is configured (no request is sent).
    /// - [`LlmError::Auth`] on HTTP 401 (not retried).
    /// - [`LlmError::PayloadTooLarge`] on HTTP 400 mentioning "too long" (not retried).
    /// - [`LlmError::Completion`] for anything else once retries are exhausted.
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        if self.config.api_key.trim().is_empty() {
            return Err(LlmError::Configuration);
        }

        retry_with_backoff(self.config.max_retries, self.config.base_delay_ms, || {
            self.attempt(prompt)
        })
        .await
    }

    /// One POST to the completion endpoint, without retry.
    async fn attempt(&self, prompt: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::from_transport(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::from_transport(&e))?;

        if !status.is_success() {
            let message = upstream_error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });
            return Err(LlmError::from_status(status.as_u16(), message));
        }

        match serde_json::from_str::<ChatResponse>(&body) {
            Ok(parsed) => Ok(parsed.into_first_content()),
            Err(e) => {
                tracing::debug!(error = %e, "completion body is not a chat response; treating as empty");
                Ok(String::new())
            }
        }
    }
}
