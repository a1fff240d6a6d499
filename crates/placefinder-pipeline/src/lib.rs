//! Prompt-to-places enrichment pipeline.
//!
//! Asks the completion model for a JSON list of candidate places, extracts
//! it leniently, fills in missing coordinates through the geocoder, and
//! computes the covering radius of the result.

pub mod enrich;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod prompt;
pub mod radius;
pub mod traits;

pub use enrich::CoordinateEnricher;
pub use error::{BuildError, PipelineError};
pub use extract::{extract_candidates, RawCandidate};
pub use pipeline::{EnrichmentPipeline, HttpPipeline};
pub use prompt::build_prompt;
pub use radius::{haversine_km, radius_km};
pub use traits::{Completer, Geocoder};
