//! Wire types for the OpenAI-compatible chat-completions endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: [ChatMessage<'a>; 1],
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

/// Subset of the chat-completions response that carries the answer text.
///
/// Every level is optional so a partial body degrades to empty text instead
/// of a decode error.
#[derive(Debug, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Text of `choices[0].message.content`, or `""` when any level is missing.
    #[must_use]
    pub fn into_first_content(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default()
    }
}

/// Error envelope: `{ "error": { "message": "..." } }`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    pub message: Option<String>,
}

/// Extracts `error.message` from an error response body, if present.
pub(crate) fn upstream_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error)
        .and_then(|d| d.message)
        .filter(|m| !m.trim().is_empty())
}
