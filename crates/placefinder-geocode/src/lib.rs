//! Geocoding client: free-text place description to candidate coordinates.

pub mod client;
pub mod error;
pub mod types;

pub use client::{GeocodeConfig, GeocodingClient};
pub use error::GeocodeError;
pub use types::GeocodedPlace;
