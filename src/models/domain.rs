use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A played round as stored by the round store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub id: Uuid,
    #[serde(rename = "playerId")]
    pub player_id: Uuid,
    #[serde(rename = "courseId")]
    pub course_id: Uuid,
    pub score: i32,
    #[serde(rename = "datePlayed")]
    pub date_played: DateTime<Utc>,
}

/// Difficulty figures for a course, needed to turn a score into a differential
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CourseRating {
    #[serde(rename = "courseId")]
    pub course_id: Uuid,
    pub rating: f64,
    pub slope: u16,
}

/// A round joined with its course's rating, if the course has one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedRound {
    #[serde(flatten)]
    pub round: Round,
    #[serde(default)]
    pub rating: Option<CourseRating>,
}

impl RatedRound {
    pub fn new(round: Round, rating: Option<CourseRating>) -> Self {
        Self { round, rating }
    }
}

/// WGS-84 position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// True when both components are finite and inside the WGS-84 ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Golf course as listed in the course catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
}

/// One "A beats B" answer from a player; an edge in their tournament graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preference {
    #[serde(rename = "playerId")]
    pub player_id: Uuid,
    #[serde(rename = "winnerCourseId")]
    pub winner_course_id: Uuid,
    #[serde(rename = "loserCourseId")]
    pub loser_course_id: Uuid,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Course with its tally from a player's preference log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCourse {
    pub course: Course,
    pub wins: u32,
    pub losses: u32,
    #[serde(rename = "winRate")]
    pub win_rate: f64,
}

impl RankedCourse {
    /// Number of comparisons this course took part in
    pub fn comparisons(&self) -> u32 {
        self.wins + self.losses
    }
}

/// Course paired with its great-circle distance from a search center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyCourse {
    pub course: Course,
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}
