//! Seams between the pipeline and its external collaborators.
//!
//! The HTTP clients implement these directly; tests substitute in-process
//! fakes.

use std::future::Future;

use placefinder_geocode::{GeocodeError, GeocodedPlace, GeocodingClient};
use placefinder_llm::{CompletionClient, LlmError};

/// Turns a prompt into raw model text.
pub trait Completer: Send + Sync {
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, LlmError>> + Send;
}

/// Turns a free-text place description into candidate coordinates.
pub trait Geocoder: Send + Sync {
    fn geocode(
        &self,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<GeocodedPlace>, GeocodeError>> + Send;
}

impl Completer for CompletionClient {
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, LlmError>> + Send {
        CompletionClient::complete(self, prompt)
    }
}

impl Geocoder for GeocodingClient {
    fn geocode(
        &self,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<GeocodedPlace>, GeocodeError>> + Send {
        GeocodingClient::geocode(self, query, limit)
    }
}
