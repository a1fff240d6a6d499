//! Chat-completion client for placefinder.
//!
//! Sends a single user prompt to an OpenAI-compatible chat endpoint and
//! returns the raw text of the first choice, retrying transient failures
//! with exponential back-off.

pub mod client;
pub mod error;
pub mod types;

mod retry;

pub use client::{CompletionClient, CompletionConfig};
pub use error::LlmError;
