//! Great-circle distance and the covering radius of a result set.

use placefinder_core::EnrichedPlace;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between two points given in degrees.
#[must_use]
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Largest distance from the first place to any place, rounded to 2 decimals.
///
/// Returns 0 for an empty list. Places with unresolved coordinates yield a
/// non-finite distance and are skipped, so the result is never negative or
/// `NaN`.
#[must_use]
pub fn radius_km(places: &[EnrichedPlace]) -> f64 {
    let Some(reference) = places.first() else {
        return 0.0;
    };

    let max = places
        .iter()
        .map(|p| haversine_km(reference.latitude, reference.longitude, p.latitude, p.longitude))
        .filter(|d| d.is_finite())
        .fold(0.0_f64, f64::max);

    (max * 100.0).round() / 100.0
}
