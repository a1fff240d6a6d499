//! Coordinate completion for extracted candidates.

use futures::future::join_all;
use placefinder_core::EnrichedPlace;

use crate::extract::RawCandidate;
use crate::traits::Geocoder;

/// Fills in missing coordinates via a [`Geocoder`] and applies field defaults.
#[derive(Debug, Clone)]
pub struct CoordinateEnricher<G> {
    geocoder: G,
}

impl<G: Geocoder> CoordinateEnricher<G> {
    pub fn new(geocoder: G) -> Self {
        Self { geocoder }
    }

    /// Enriches every candidate concurrently.
    ///
    /// Output has the same length and order as `candidates` regardless of
    /// which lookups finish first. A failed lookup leaves that candidate's
    /// coordinates unresolved (`NaN`) and never affects the others.
    pub async fn enrich(&self, candidates: &[RawCandidate]) -> Vec<EnrichedPlace> {
        join_all(
            candidates
                .iter()
                .enumerate()
                .map(|(index, candidate)| self.enrich_one(index, candidate)),
        )
        .await
    }

    async fn enrich_one(&self, index: usize, candidate: &RawCandidate) -> EnrichedPlace {
        let mut latitude = candidate.coordinate("latitude");
        let mut longitude = candidate.coordinate("longitude");

        if latitude.is_none() || longitude.is_none() {
            if let Some(query) = candidate.geocode_query() {
                match self.geocoder.geocode(&query, 1).await {
                    Ok(hits) => match hits.first() {
                        Some(hit) => {
                            latitude = Some(hit.latitude);
                            longitude = Some(hit.longitude);
                        }
                        None => {
                            tracing::debug!(index, query = %query, "geocoder returned no match");
                        }
                    },
                    Err(e) => {
                        tracing::warn!(index, query = %query, error = %e, "geocode lookup failed");
                    }
                }
            }
        }

        let position = i64::try_from(index + 1).unwrap_or(i64::MAX);

        EnrichedPlace {
            id: candidate.id().unwrap_or(position),
            name: candidate.text("name"),
            city: candidate.text("city"),
            province: candidate.text("province"),
            country: candidate.text("country"),
            latitude: latitude.unwrap_or(f64::NAN),
            longitude: longitude.unwrap_or(f64::NAN),
            category: candidate.text("category"),
            description: candidate.text("description"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::Mutex;
    use std::time::Duration;

    use placefinder_geocode::{GeocodeError, GeocodedPlace};
    use serde_json::json;

    use super::*;

    /// Geocoder backed by a fixed table. Unknown queries fail; each hit can
    /// carry a delay to shuffle completion order.
    #[derive(Default)]
    struct TableGeocoder {
        hits: HashMap<String, (f64, f64, u64)>,
        empty: Vec<String>,
        calls: Mutex<Vec<String>>,
    }

    impl TableGeocoder {
        fn with(mut self, query: &str, lat: f64, lng: f64, delay_ms: u64) -> Self {
            self.hits.insert(query.to_string(), (lat, lng, delay_ms));
            self
        }

        fn with_empty(mut self, query: &str) -> Self {
            self.empty.push(query.to_string());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Geocoder for TableGeocoder {
        fn geocode(
            &self,
            query: &str,
            limit: usize,
        ) -> impl Future<Output = Result<Vec<GeocodedPlace>, GeocodeError>> + Send {
            assert_eq!(limit, 1);
            self.calls.lock().unwrap().push(query.to_string());
            let hit = self.hits.get(query).copied();
            let empty = self.empty.iter().any(|q| q == query);
            let query = query.to_string();
            async move {
                match hit {
                    Some((lat, lng, delay_ms)) => {
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                        Ok(vec![GeocodedPlace {
                            name: query.clone(),
                            address: query,
                            latitude: lat,
                            longitude: lng,
                        }])
                    }
                    None if empty => Ok(Vec::new()),
                    None => Err(GeocodeError::ApiError("OVER_QUERY_LIMIT".to_string())),
                }
            }
        }
    }

    fn candidates(values: &[serde_json::Value]) -> Vec<RawCandidate> {
        values.iter().cloned().map(RawCandidate::from_value).collect()
    }

    #[tokio::test]
    async fn present_coordinates_pass_through_without_lookup() {
        let enricher = CoordinateEnricher::new(TableGeocoder::default());
        let input = candidates(&[json!({
            "id": 4,
            "name": "Alun-alun",
            "city": "Bandung",
            "latitude": -6.921,
            "longitude": "107.607",
        })]);

        let out = enricher.enrich(&input).await;

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 4);
        assert!((out[0].latitude - -6.921).abs() < 1e-12);
        assert!((out[0].longitude - 107.607).abs() < 1e-12);
        assert!(enricher.geocoder.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_coordinates_are_geocoded_from_joined_fields() {
        let geocoder = TableGeocoder::default().with(
            "Gedung Sate, Bandung, West Java, Indonesia",
            -6.9025,
            107.6188,
            0,
        );
        let enricher = CoordinateEnricher::new(geocoder);
        let input = candidates(&[json!({
            "name": "Gedung Sate",
            "city": "Bandung",
            "province": "West Java",
            "country": "Indonesia",
            "latitude": -6.9,
        })]);

        let out = enricher.enrich(&input).await;

        assert!((out[0].latitude - -6.9025).abs() < 1e-12);
        assert!((out[0].longitude - 107.6188).abs() < 1e-12);
        assert_eq!(
            enricher.geocoder.calls(),
            vec!["Gedung Sate, Bandung, West Java, Indonesia".to_string()]
        );
    }

    #[tokio::test]
    async fn failed_lookup_leaves_nan_and_does_not_affect_others() {
        let geocoder = TableGeocoder::default()
            .with("Good, Bogor", -6.6, 106.8, 0)
            .with_empty("Ghost");
        let enricher = CoordinateEnricher::new(geocoder);
        let input = candidates(&[
            json!({ "name": "Broken", "city": "Nowhere" }),
            json!({ "name": "Good", "city": "Bogor" }),
            json!({ "name": "Ghost" }),
        ]);

        let out = enricher.enrich(&input).await;

        assert_eq!(out.len(), 3);
        assert!(out[0].latitude.is_nan() && out[0].longitude.is_nan());
        assert!((out[1].latitude - -6.6).abs() < 1e-12);
        assert!(out[2].latitude.is_nan());
    }

    #[tokio::test]
    async fn partial_coordinates_without_name_or_city_stay_unresolved() {
        let enricher = CoordinateEnricher::new(TableGeocoder::default());
        let input = candidates(&[json!({ "country": "Indonesia", "longitude": 106.8 })]);

        let out = enricher.enrich(&input).await;

        assert!(out[0].latitude.is_nan());
        assert!((out[0].longitude - 106.8).abs() < 1e-12);
        assert!(enricher.geocoder.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn output_order_follows_input_not_completion() {
        let geocoder = TableGeocoder::default()
            .with("Slow", 1.0, 1.0, 300)
            .with("Medium", 2.0, 2.0, 200)
            .with("Fast", 3.0, 3.0, 100);
        let enricher = CoordinateEnricher::new(geocoder);
        let input = candidates(&[
            json!({ "name": "Slow" }),
            json!({ "name": "Medium" }),
            json!({ "name": "Fast" }),
        ]);

        let started = tokio::time::Instant::now();
        let out = enricher.enrich(&input).await;

        let names: Vec<&str> = out.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Slow", "Medium", "Fast"]);
        assert!((out[2].latitude - 3.0).abs() < 1e-12);
        // Lookups overlap: total wait is the slowest one, not the sum.
        assert!(started.elapsed() < Duration::from_millis(400));
    }

    #[tokio::test]
    async fn defaults_fill_absent_fields_and_positional_ids() {
        let enricher = CoordinateEnricher::new(TableGeocoder::default());
        let input = candidates(&[
            json!({ "id": 99, "latitude": 0, "longitude": 0 }),
            json!({ "id": "x", "latitude": 1, "longitude": 1 }),
            json!(null),
        ]);

        let out = enricher.enrich(&input).await;

        assert_eq!(out[0].id, 99);
        assert_eq!(out[1].id, 2);
        assert_eq!(out[2].id, 3);
        assert_eq!(out[0].name, "");
        assert_eq!(out[0].city, "");
        assert_eq!(out[0].province, "");
        assert_eq!(out[0].country, "");
        assert_eq!(out[0].category, "");
        assert_eq!(out[0].description, "");
        assert!(out[2].latitude.is_nan());
    }
}
