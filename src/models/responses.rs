use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::HandicapCalculation;
use crate::models::domain::{Course, NearbyCourse, RankedCourse};

/// Response for the handicap recalculation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandicapResponse {
    #[serde(rename = "playerId")]
    pub player_id: Uuid,
    #[serde(flatten)]
    pub calculation: HandicapCalculation,
}

/// Response for the nearby courses endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyCoursesResponse {
    pub courses: Vec<NearbyCourse>,
    #[serde(rename = "radiusKm")]
    pub radius_km: f64,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Response for the rankings endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingsResponse {
    #[serde(rename = "playerId")]
    pub player_id: Uuid,
    pub rankings: Vec<RankedCourse>,
    #[serde(rename = "totalPreferences")]
    pub total_preferences: usize,
}

/// Next pair of courses to compare
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoursePairResponse {
    pub first: Course,
    pub second: Course,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
