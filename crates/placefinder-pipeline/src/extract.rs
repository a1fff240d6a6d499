//! Lenient extraction of candidate places from raw model text.
//!
//! The model is asked for strict JSON but routinely wraps it in prose or
//! code fences. Everything between the first `{` and the last `}` is parsed;
//! any failure yields no candidates rather than an error.

use placefinder_core::MAX_PLACES;
use serde_json::{Map, Value};

/// Untrusted record decoded from model JSON.
///
/// Fields are kept as raw JSON values and coerced on read: strings default to
/// `""`, numbers to `NaN`. Nothing here fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCandidate {
    fields: Map<String, Value>,
}

impl RawCandidate {
    /// Wraps a `queries[]` entry. Non-object entries become an empty record
    /// so they still occupy their position.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    /// Field value, treating JSON `null` as absent.
    fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    /// String view of a field: strings as-is, numbers and booleans rendered,
    /// everything else `""`.
    #[must_use]
    pub fn text(&self, key: &str) -> String {
        match self.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    /// Explicit integer id, if the model supplied one.
    ///
    /// Floats are accepted only when they carry no fractional part.
    #[must_use]
    pub fn id(&self) -> Option<i64> {
        let Some(Value::Number(n)) = self.get("id") else {
            return None;
        };
        if let Some(i) = n.as_i64() {
            return Some(i);
        }
        let f = n.as_f64()?;
        #[allow(clippy::cast_precision_loss)]
        let in_range = f.abs() < i64::MAX as f64;
        #[allow(clippy::cast_possible_truncation)]
        let truncated = f as i64;
        (f.is_finite() && f.fract() == 0.0 && in_range).then_some(truncated)
    }

    /// Numeric coordinate, `None` when the field is absent or `null`.
    ///
    /// A present but unusable value coerces to `NaN`.
    #[must_use]
    pub fn coordinate(&self, key: &str) -> Option<f64> {
        self.get(key).map(coerce_number)
    }

    /// Query for the geocoder: usable name, city, province and country
    /// joined with `", "`. `None` unless a name or city is usable.
    #[must_use]
    pub fn geocode_query(&self) -> Option<String> {
        let name = self.query_part("name");
        let city = self.query_part("city");
        if name.is_none() && city.is_none() {
            return None;
        }
        let parts: Vec<String> = [
            name,
            city,
            self.query_part("province"),
            self.query_part("country"),
        ]
        .into_iter()
        .flatten()
        .collect();
        Some(parts.join(", "))
    }

    /// Field as geocode text: non-empty strings and non-zero numbers.
    /// Booleans, zero and compound values contribute nothing.
    fn query_part(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) if n.as_f64().is_some_and(|f| f.abs() > 0.0) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Numbers pass through; numeric strings are parsed; anything else is `NaN`.
fn coerce_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        _ => f64::NAN,
    };
    if n.is_finite() {
        n
    } else {
        f64::NAN
    }
}

/// Pulls at most [`MAX_PLACES`] candidates out of `raw_text`, in emission order.
#[must_use]
pub fn extract_candidates(raw_text: &str) -> Vec<RawCandidate> {
    let (Some(start), Some(end)) = (raw_text.find('{'), raw_text.rfind('}')) else {
        tracing::debug!("model output contains no JSON object");
        return Vec::new();
    };
    if end <= start {
        tracing::debug!("model output braces are out of order");
        return Vec::new();
    }

    let payload: Value = match serde_json::from_str(&raw_text[start..=end]) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(error = %e, "model output is not valid JSON");
            return Vec::new();
        }
    };

    let Some(queries) = payload.get("queries").and_then(Value::as_array) else {
        tracing::debug!("model output has no queries array");
        return Vec::new();
    };

    if queries.len() > MAX_PLACES {
        tracing::debug!(
            returned = queries.len(),
            kept = MAX_PLACES,
            "model returned too many places; truncating"
        );
    }

    queries
        .iter()
        .take(MAX_PLACES)
        .cloned()
        .map(RawCandidate::from_value)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate(value: Value) -> RawCandidate {
        RawCandidate::from_value(value)
    }

    #[test]
    fn extracts_json_wrapped_in_prose_and_fences() {
        let raw = "Sure! Here you go:\n```json\n{\"queries\":[{\"name\":\"Braga\"},{\"name\":\"Dago\"}]}\n```\nEnjoy.";
        let out = extract_candidates(raw);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].text("name"), "Braga");
        assert_eq!(out[1].text("name"), "Dago");
    }

    #[test]
    fn no_braces_yields_empty() {
        assert!(extract_candidates("I could not find anything.").is_empty());
        assert!(extract_candidates("").is_empty());
    }

    #[test]
    fn reversed_braces_yield_empty() {
        assert!(extract_candidates("} nothing here {").is_empty());
    }

    #[test]
    fn invalid_json_yields_empty() {
        assert!(extract_candidates("{ queries: [ {name: 'x'} ] }").is_empty());
        assert!(extract_candidates("{\"queries\": [ }").is_empty());
    }

    #[test]
    fn missing_or_mistyped_queries_yield_empty() {
        assert!(extract_candidates("{\"places\": []}").is_empty());
        assert!(extract_candidates("{\"queries\": {\"name\": \"x\"}}").is_empty());
        assert!(extract_candidates("{\"queries\": \"none\"}").is_empty());
    }

    #[test]
    fn keeps_only_first_five() {
        let items: Vec<Value> = (1..=8).map(|i| json!({ "id": i, "name": format!("p{i}") })).collect();
        let raw = json!({ "queries": items }).to_string();
        let out = extract_candidates(&raw);
        assert_eq!(out.len(), 5);
        assert_eq!(out[0].id(), Some(1));
        assert_eq!(out[4].id(), Some(5));
    }

    #[test]
    fn non_object_entries_keep_their_position() {
        let out = extract_candidates(r#"{"queries": [42, {"name": "Real"}]}"#);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], RawCandidate::default());
        assert_eq!(out[1].text("name"), "Real");
    }

    #[test]
    fn text_coerces_scalars_and_defaults_the_rest() {
        let c = candidate(json!({
            "name": "Warung",
            "city": 12,
            "province": true,
            "country": null,
            "category": ["food"],
        }));
        assert_eq!(c.text("name"), "Warung");
        assert_eq!(c.text("city"), "12");
        assert_eq!(c.text("province"), "true");
        assert_eq!(c.text("country"), "");
        assert_eq!(c.text("category"), "");
        assert_eq!(c.text("description"), "");
    }

    #[test]
    fn id_accepts_integers_and_whole_floats_only() {
        assert_eq!(candidate(json!({ "id": 99 })).id(), Some(99));
        assert_eq!(candidate(json!({ "id": 3.0 })).id(), Some(3));
        assert_eq!(candidate(json!({ "id": 2.5 })).id(), None);
        assert_eq!(candidate(json!({ "id": "7" })).id(), None);
        assert_eq!(candidate(json!({})).id(), None);
    }

    #[test]
    fn coordinate_distinguishes_absent_from_unusable() {
        let c = candidate(json!({
            "latitude": "-6.9147",
            "longitude": "east",
            "altitude": null,
        }));
        assert!((c.coordinate("latitude").unwrap() - -6.9147).abs() < 1e-12);
        assert!(c.coordinate("longitude").unwrap().is_nan());
        assert_eq!(c.coordinate("altitude"), None);
        assert_eq!(c.coordinate("missing"), None);
    }

    #[test]
    fn coordinate_rejects_non_finite_strings() {
        let c = candidate(json!({ "latitude": "inf", "longitude": "NaN" }));
        assert!(c.coordinate("latitude").unwrap().is_nan());
        assert!(c.coordinate("longitude").unwrap().is_nan());
    }

    #[test]
    fn geocode_query_joins_non_empty_parts() {
        let c = candidate(json!({
            "name": "Gedung Sate",
            "city": "Bandung",
            "province": "",
            "country": "Indonesia",
        }));
        assert_eq!(
            c.geocode_query().as_deref(),
            Some("Gedung Sate, Bandung, Indonesia")
        );
    }

    #[test]
    fn geocode_query_skips_booleans_and_zero() {
        let c = candidate(json!({ "name": false, "city": "Bandung", "province": 0 }));
        assert_eq!(c.geocode_query().as_deref(), Some("Bandung"));

        let c = candidate(json!({ "name": true, "city": false, "country": "Indonesia" }));
        assert_eq!(c.geocode_query(), None);

        let c = candidate(json!({ "name": 21, "city": "Bogor" }));
        assert_eq!(c.geocode_query().as_deref(), Some("21, Bogor"));
    }

    #[test]
    fn geocode_query_requires_name_or_city() {
        let c = candidate(json!({ "province": "West Java", "country": "Indonesia" }));
        assert_eq!(c.geocode_query(), None);

        let c = candidate(json!({ "city": "Bogor" }));
        assert_eq!(c.geocode_query().as_deref(), Some("Bogor"));
    }
}
