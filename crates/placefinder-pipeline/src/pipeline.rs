//! End-to-end orchestration: prompt → completion → extraction → enrichment → radius.

use placefinder_core::{AppConfig, ResultSet, SearchRequest};
use placefinder_geocode::{GeocodeConfig, GeocodingClient};
use placefinder_llm::{CompletionClient, CompletionConfig};

use crate::enrich::CoordinateEnricher;
use crate::error::{BuildError, PipelineError};
use crate::extract::extract_candidates;
use crate::prompt::build_prompt;
use crate::radius::radius_km;
use crate::traits::{Completer, Geocoder};

/// Composes a [`Completer`] and a [`Geocoder`] into a place search.
///
/// Holds no per-request state; one instance serves concurrent requests.
#[derive(Debug, Clone)]
pub struct EnrichmentPipeline<C, G> {
    completer: C,
    enricher: CoordinateEnricher<G>,
}

/// Pipeline backed by the real HTTP clients.
pub type HttpPipeline = EnrichmentPipeline<CompletionClient, GeocodingClient>;

impl HttpPipeline {
    /// Builds both HTTP clients from process configuration.
    ///
    /// Missing credentials are not an error here; they surface per call.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if either HTTP client cannot be constructed.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, BuildError> {
        let completer = CompletionClient::new(CompletionConfig::from_app_config(config))?;
        let geocoder = GeocodingClient::new(GeocodeConfig::from_app_config(config))?;
        Ok(Self::new(completer, geocoder))
    }
}

impl<C: Completer, G: Geocoder> EnrichmentPipeline<C, G> {
    pub fn new(completer: C, geocoder: G) -> Self {
        Self {
            completer,
            enricher: CoordinateEnricher::new(geocoder),
        }
    }

    /// Runs one search.
    ///
    /// Unparseable model output yields an empty result, and failed geocode
    /// lookups leave coordinates unresolved; neither is an error.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Completion`] when the completion call fails
    /// terminally (after any retries).
    pub async fn run(&self, request: &SearchRequest) -> Result<ResultSet, PipelineError> {
        let prompt = build_prompt(request);
        let raw = self.completer.complete(&prompt).await?;

        let candidates = extract_candidates(&raw);
        if candidates.is_empty() {
            tracing::info!(raw_len = raw.len(), "model output produced no candidates");
            return Ok(ResultSet::empty());
        }

        let places = self.enricher.enrich(&candidates).await;
        let radius = radius_km(&places);

        tracing::info!(
            places = places.len(),
            unresolved = places.iter().filter(|p| !p.has_coordinates()).count(),
            radius_km = radius,
            "search complete"
        );

        Ok(ResultSet { places, radius })
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
