use thiserror::Error;

/// Errors returned by [`crate::GeocodingClient`].
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// No API key was configured; no request is sent.
    #[error("geocoding API key is not configured")]
    Configuration,

    /// Network, TLS, timeout or non-2xx HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a status other than `OK` / `ZERO_RESULTS`.
    #[error("geocoding API error: {0}")]
    ApiError(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
