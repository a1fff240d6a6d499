use serde::{Deserialize, Serialize};

/// Upper bound on the number of places a single search returns.
pub const MAX_PLACES: usize = 5;

/// Minimum prompt length (in characters) accepted by the front doors.
pub const MIN_PROMPT_CHARS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Input to a single pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub prompt: String,
    pub user_location: Option<UserLocation>,
}

impl SearchRequest {
    pub fn new(prompt: impl Into<String>, user_location: Option<UserLocation>) -> Self {
        Self {
            prompt: prompt.into(),
            user_location,
        }
    }

    /// Builds a request from loose front-door inputs.
    ///
    /// The location is attached only when both coordinates are present.
    pub fn from_parts(prompt: impl Into<String>, longitude: Option<f64>, latitude: Option<f64>) -> Self {
        let user_location = match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(UserLocation {
                latitude,
                longitude,
            }),
            _ => None,
        };
        Self::new(prompt, user_location)
    }

    /// Returns `true` when the prompt meets [`MIN_PROMPT_CHARS`].
    #[must_use]
    pub fn has_valid_prompt(&self) -> bool {
        self.prompt.chars().count() >= MIN_PROMPT_CHARS
    }
}

/// A candidate place after field defaulting and coordinate completion.
///
/// `latitude`/`longitude` are `NaN` when neither the model nor the geocoder
/// produced a usable value; `NaN` serializes as JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedPlace {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: String,
    pub description: String,
}

impl EnrichedPlace {
    /// Returns `true` when both coordinates are finite numbers.
    #[must_use]
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Final payload of one search: ordered places plus covering radius in km.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    #[serde(rename = "queries")]
    pub places: Vec<EnrichedPlace>,
    pub radius: f64,
}

impl ResultSet {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            places: Vec::new(),
            radius: 0.0,
        }
    }
}
