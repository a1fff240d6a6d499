//! HTTP client for a Google-style geocoding endpoint.
//!
//! Wraps `reqwest` with API key handling, a fixed per-lookup timeout, and
//! provider status checking. `ZERO_RESULTS` is a normal empty answer; any
//! other non-`OK` status surfaces as [`GeocodeError::ApiError`].

use std::time::Duration;

use placefinder_core::config::DEFAULT_GEOCODE_URL;
use placefinder_core::AppConfig;
use reqwest::{Client, Url};

use crate::error::GeocodeError;
use crate::types::{GeocodeResponse, GeocodeResult, GeocodedPlace};

/// Settings for [`GeocodingClient`].
#[derive(Clone)]
pub struct GeocodeConfig {
    pub api_key: String,
    pub url: String,
    pub timeout_ms: u64,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            url: DEFAULT_GEOCODE_URL.to_string(),
            timeout_ms: 15_000,
        }
    }
}

impl GeocodeConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            api_key: config.geocode_api_key.clone().unwrap_or_default(),
            url: config.geocode_url.clone(),
            timeout_ms: config.geocode_timeout_ms,
        }
    }
}

impl std::fmt::Debug for GeocodeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodeConfig")
            .field("api_key", &"[redacted]")
            .field("url", &self.url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Geocoding client. Stateless apart from configuration; cheap to clone.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl GeocodingClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::ApiError`] if the endpoint
    /// is not a valid URL.
    pub fn new(config: GeocodeConfig) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent("placefinder/0.1 (geocoding)")
            .build()?;

        let base_url = Url::parse(&config.url).map_err(|e| {
            GeocodeError::ApiError(format!("invalid geocode URL '{}': {e}", config.url))
        })?;

        Ok(Self {
            client,
            api_key: config.api_key,
            base_url,
        })
    }

    /// Looks up `query` and returns at most `limit` hits, best first.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Configuration`] if no API key is configured.
    /// - [`GeocodeError::Http`] on network failure, timeout or non-2xx status.
    /// - [`GeocodeError::ApiError`] if the provider reports an error status.
    /// - [`GeocodeError::Deserialize`] if the body is not a geocode response.
    pub async fn geocode(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<GeocodedPlace>, GeocodeError> {
        if self.api_key.trim().is_empty() {
            return Err(GeocodeError::Configuration);
        }

        let url = self.build_url(query);
        let response = self.client.get(url).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;

        let envelope: GeocodeResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: format!("geocode(address={query})"),
                source: e,
            })?;

        Self::check_api_status(&envelope)?;

        let returned = envelope.results.len();
        let places: Vec<GeocodedPlace> = envelope
            .results
            .into_iter()
            .filter_map(|v| serde_json::from_value::<GeocodeResult>(v).ok())
            .map(GeocodedPlace::from)
            .take(limit)
            .collect();

        tracing::debug!(
            query,
            status = %envelope.status,
            returned,
            kept = places.len(),
            "geocode lookup complete"
        );

        Ok(places)
    }

    /// Builds the request URL with `address` and `key` percent-encoded.
    fn build_url(&self, query: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("address", query)
            .append_pair("key", &self.api_key);
        url
    }

    fn check_api_status(envelope: &GeocodeResponse) -> Result<(), GeocodeError> {
        match envelope.status.as_str() {
            "" | "OK" | "ZERO_RESULTS" => Ok(()),
            other => {
                let msg = envelope
                    .error_message
                    .as_deref()
                    .map_or_else(|| other.to_string(), |m| format!("{other}: {m}"));
                Err(GeocodeError::ApiError(msg))
            }
        }
    }
}
