use crate::models::{BoundingBox, Coordinate};

/// Earth's radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers per degree of latitude, rounded down so boxes err on the wide side
const KM_PER_DEGREE: f64 = 111.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `a` - First point
/// * `b` - Second point
///
/// # Returns
/// Great-circle distance in kilometers
#[inline]
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1_rad = a.latitude.to_radians();
    let lat2_rad = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Calculate a bounding box around a center point
///
/// This is much faster than Haversine for pre-filtering.
/// 1° latitude ≈ 111km; the longitude half-width is the circle's true reach,
/// `asin(sin(r / R) / cos(latitude))`, wider than `r / (111 * cos(latitude))`
/// away from the equator.
///
/// Every point within `radius_km` lies inside the box. The box is still only a
/// coarse filter: near the poles it covers far more than the circle, so exact
/// distance must be checked afterwards. Longitudes are not wrapped: a box that
/// crosses the antimeridian has `min_lon < -180` or `max_lon > 180`, which
/// [`is_within_bounding_box`] understands.
pub fn bounding_box(center: Coordinate, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km / KM_PER_DEGREE;

    let min_lat = (center.latitude - lat_delta).max(-90.0);
    let max_lat = (center.latitude + lat_delta).min(90.0);

    // Meridians converge towards the poles
    let cos_lat = center.latitude.to_radians().cos().abs();
    let reach = lat_delta.to_radians().sin() / cos_lat;

    let touches_pole = min_lat <= -90.0 || max_lat >= 90.0;
    let (min_lon, max_lon) = if touches_pole || !reach.is_finite() || reach >= 1.0 {
        (-180.0, 180.0)
    } else {
        let lon_delta = reach.asin().to_degrees();
        (center.longitude - lon_delta, center.longitude + lon_delta)
    };

    BoundingBox {
        min_lat,
        max_lat,
        min_lon,
        max_lon,
    }
}

/// Check if a point is within a bounding box
#[inline]
pub fn is_within_bounding_box(point: Coordinate, bbox: &BoundingBox) -> bool {
    if point.latitude < bbox.min_lat || point.latitude > bbox.max_lat {
        return false;
    }

    let lon = point.longitude;
    (lon >= bbox.min_lon && lon <= bbox.max_lon)
        || (lon + 360.0 >= bbox.min_lon && lon + 360.0 <= bbox.max_lon)
        || (lon - 360.0 >= bbox.min_lon && lon - 360.0 <= bbox.max_lon)
}
