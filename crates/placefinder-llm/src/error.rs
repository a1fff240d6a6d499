use thiserror::Error;

/// Errors returned by [`crate::CompletionClient`].
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key was configured. Never retried.
    #[error("completion API key is not configured")]
    Configuration,

    /// The endpoint rejected the API key (HTTP 401). Never retried.
    #[error("completion API key is invalid or expired")]
    Auth,

    /// The endpoint rejected the prompt as too long (HTTP 400). Never retried;
    /// the caller has to split the input.
    #[error("prompt is too long for the completion model; split it into smaller chunks")]
    PayloadTooLarge,

    /// Any other failure. `status` is `None` for network-level failures
    /// (connect, timeout, aborted body).
    #[error("completion request failed: {} - {message}", status_label(.status))]
    Completion { status: Option<u16>, message: String },

    /// The underlying `reqwest::Client` could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

#[allow(clippy::ref_option)]
fn status_label(status: &Option<u16>) -> String {
    status.map_or_else(|| "network".to_string(), |s| s.to_string())
}

impl LlmError {
    /// Maps a non-2xx HTTP response onto the error taxonomy.
    pub(crate) fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => Self::Auth,
            400 if message.to_lowercase().contains("too long") => Self::PayloadTooLarge,
            _ => Self::Completion {
                status: Some(status),
                message,
            },
        }
    }

    /// Maps a transport failure (no usable response) onto the error taxonomy.
    pub(crate) fn from_transport(err: &reqwest::Error) -> Self {
        Self::Completion {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }

    /// Upstream HTTP status, when the failure carried one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth => Some(401),
            Self::PayloadTooLarge => Some(400),
            Self::Completion { status, .. } => *status,
            Self::Configuration | Self::Http(_) => None,
        }
    }
}
