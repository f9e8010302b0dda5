use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::domain::Coordinate;

/// Query string for the nearby courses endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NearbyCoursesQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    #[serde(alias = "lon", alias = "lng")]
    pub longitude: f64,
    #[validate(range(min = 0.0))]
    #[serde(alias = "radius_km", rename = "radiusKm", default)]
    pub radius_km: Option<f64>,
}

impl NearbyCoursesQuery {
    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Request to record one "A beats B" answer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_distinct_courses"))]
pub struct RecordPreferenceRequest {
    #[serde(alias = "winner_id", rename = "winnerId")]
    pub winner_id: Uuid,
    #[serde(alias = "loser_id", rename = "loserId")]
    pub loser_id: Uuid,
}

fn validate_distinct_courses(req: &RecordPreferenceRequest) -> Result<(), ValidationError> {
    if req.winner_id == req.loser_id {
        return Err(ValidationError::new("same_course"));
    }
    Ok(())
}
