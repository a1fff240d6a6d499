//! Retry with exponential back-off for the completion client.
//!
//! [`retry_with_backoff`] wraps one completion attempt and retries it on
//! transient errors. Credential, auth and payload-size failures are returned
//! immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::LlmError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - HTTP 429 (rate limit) and any 5xx.
/// - Failures with no HTTP status: connect errors, timeouts, aborted bodies.
/// - Any failure whose message mentions a timeout.
///
/// **Not retriable:**
/// - [`LlmError::Configuration`], [`LlmError::Auth`], [`LlmError::PayloadTooLarge`].
/// - [`LlmError::Http`]: client construction failed, nothing was sent.
/// - Any other 4xx.
pub(crate) fn is_retriable(err: &LlmError) -> bool {
    match err {
        LlmError::Completion {
            status: None,
            ..
        } => true,
        LlmError::Completion {
            status: Some(status),
            message,
        } => {
            *status == 429 || *status >= 500 || message.to_lowercase().contains("timeout")
        }
        LlmError::Configuration
        | LlmError::Auth
        | LlmError::PayloadTooLarge
        | LlmError::Http(_) => false,
    }
}

/// Delay before retry number `attempt + 1`: `base_delay_ms * 2^attempt`.
pub(crate) fn backoff_delay(base_delay_ms: u64, attempt: u32) -> Duration {
    Duration::from_millis(base_delay_ms.saturating_mul(1u64 << attempt.min(32)))
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// Back-off schedule with `base_delay_ms = 1_000`:
///
/// | Retry | Sleep before it |
/// |-------|-----------------|
/// | 1     | 1 000 ms        |
/// | 2     | 2 000 ms        |
/// | 3     | 4 000 ms        |
///
/// Attempts never overlap. Non-retriable errors are returned immediately, and
/// the last error is returned once retries are exhausted.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    base_delay_ms: u64,
    mut operation: F,
) -> Result<T, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                let delay = backoff_delay(base_delay_ms, attempt);
                attempt += 1;
                #[allow(clippy::cast_possible_truncation)]
                let delay_ms = delay.as_millis() as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "completion transient error, retrying after back-off"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
