use std::cmp::Ordering;

use crate::core::distance::{bounding_box, distance_km};
use crate::core::error::{AnalyticsError, AnalyticsResult};
use crate::models::{BoundingBox, Coordinate, Course, NearbyCourse};

/// Nearby-course search over a candidate catalog
///
/// # Pipeline Stages
/// 1. Bounding box query, run by the store via [`GeoSearch::search_box`]
/// 2. Exact Haversine distance, dropping anything beyond the radius
/// 3. Ascending sort by distance, ties kept in input order
#[derive(Debug, Clone, Copy)]
pub struct GeoSearch {
    default_radius_km: f64,
}

impl GeoSearch {
    pub fn new(default_radius_km: f64) -> Self {
        Self { default_radius_km }
    }

    pub fn default_radius_km(&self) -> f64 {
        self.default_radius_km
    }

    /// Bounding box to hand to the course catalog for a radius query
    pub fn search_box(&self, center: Coordinate, radius_km: Option<f64>) -> AnalyticsResult<BoundingBox> {
        let radius_km = radius_km.unwrap_or(self.default_radius_km);
        validate_query(center, radius_km)?;
        Ok(bounding_box(center, radius_km))
    }

    /// See [`nearby_courses`]; falls back to the configured default radius
    pub fn nearby(
        &self,
        center: Coordinate,
        radius_km: Option<f64>,
        catalog: Vec<Course>,
    ) -> AnalyticsResult<Vec<NearbyCourse>> {
        nearby_courses(center, radius_km.unwrap_or(self.default_radius_km), catalog)
    }
}

impl Default for GeoSearch {
    fn default() -> Self {
        Self::new(50.0)
    }
}

fn validate_query(center: Coordinate, radius_km: f64) -> AnalyticsResult<()> {
    if !center.is_valid() {
        return Err(AnalyticsError::InvalidInput(format!(
            "invalid search center ({}, {})",
            center.latitude, center.longitude
        )));
    }
    if !radius_km.is_finite() || radius_km < 0.0 {
        return Err(AnalyticsError::InvalidInput(format!(
            "radius must be a non-negative number of kilometers, got {}",
            radius_km
        )));
    }
    Ok(())
}

/// Courses within `radius_km` of `center`, nearest first
///
/// The catalog may be any candidate set. Exact distance is the only filter,
/// so a course within the radius is never lost whatever box the store used. An empty catalog or a radius that
/// reaches nothing yields an empty list.
pub fn nearby_courses(
    center: Coordinate,
    radius_km: f64,
    catalog: Vec<Course>,
) -> AnalyticsResult<Vec<NearbyCourse>> {
    validate_query(center, radius_km)?;

    let total_candidates = catalog.len();

    let mut nearby = Vec::new();
    for course in catalog {
        if !course.coordinate.is_valid() {
            return Err(AnalyticsError::InvalidInput(format!(
                "course {} has invalid coordinates ({}, {})",
                course.id, course.coordinate.latitude, course.coordinate.longitude
            )));
        }

        let distance_km = distance_km(center, course.coordinate);
        if distance_km <= radius_km {
            nearby.push(NearbyCourse { course, distance_km });
        }
    }

    // Stable sort keeps catalog order on equal distances
    nearby.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(Ordering::Equal)
    });

    tracing::debug!(
        "{} of {} candidate courses within {} km",
        nearby.len(),
        total_candidates,
        radius_km
    );

    Ok(nearby)
}
