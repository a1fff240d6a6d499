use serde::{Deserialize, Serialize};

/// One geocoding hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodedPlace {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Top-level geocode response envelope.
///
/// `results` stays as raw values so one malformed entry can be skipped
/// without failing the whole lookup.
#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResult {
    #[serde(default)]
    pub formatted_address: String,
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<GeocodeResult> for GeocodedPlace {
    fn from(r: GeocodeResult) -> Self {
        Self {
            name: r.formatted_address.clone(),
            address: r.formatted_address,
            latitude: r.geometry.location.lat,
            longitude: r.geometry.location.lng,
        }
    }
}
