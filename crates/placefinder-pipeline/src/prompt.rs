use placefinder_core::{SearchRequest, MAX_PLACES};

const RESPONSE_SCHEMA: &str = r#"Reply ONLY with valid JSON in the following format:
{
  "queries": [
    {
      "id": number,
      "name": string,
      "city": string,
      "province": string,
      "country": string,
      "latitude": number,
      "longitude": number,
      "category": string,
      "description": string
    }
  ]
}"#;

/// Builds the full model instruction for one search.
///
/// The schema block is fixed. The user's location, when present, is given
/// longitude first.
#[must_use]
pub fn build_prompt(request: &SearchRequest) -> String {
    let location = request
        .user_location
        .map(|loc| format!("my location is {}, {}. ", loc.longitude, loc.latitude))
        .unwrap_or_default();
    format!(
        "{RESPONSE_SCHEMA}\nMaximum {MAX_PLACES} items, {location}\
         Use Google Maps coordinates for longitude and latitude.\nInstruction: {}",
        request.prompt
    )
}
