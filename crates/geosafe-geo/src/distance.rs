//! Great-circle distance.

use geosafe_model::Location;

/// Sphere radius used for distances (WGS84 equatorial radius).
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Haversine distance between two locations, in meters.
pub fn distance_m(a: Location, b: Location) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Clamp guards against rounding pushing h slightly above 1.
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Check if `b` lies within `radius_m` of `a` (inclusive).
pub fn within(a: Location, b: Location, radius_m: f64) -> bool {
    distance_m(a, b) <= radius_m
}

/// Location `meters` due north of `origin`. Useful for placing points at a
/// known distance.
pub fn offset_north(origin: Location, meters: f64) -> Location {
    let dlat = (meters / EARTH_RADIUS_M).to_degrees();
    Location::new(origin.latitude + dlat, origin.longitude)
}
