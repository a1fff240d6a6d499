use placefinder_geocode::GeocodeError;
use placefinder_llm::LlmError;
use thiserror::Error;

/// Hard failure of a pipeline run.
///
/// Only the completion step can fail a run; extraction and geocoding
/// problems degrade the result instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Completion(#[from] LlmError),
}

/// Failure to construct the HTTP-backed pipeline.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to build completion client: {0}")]
    Completion(#[from] LlmError),

    #[error("failed to build geocoding client: {0}")]
    Geocoder(#[from] GeocodeError),
}
