// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{BoundingBox, Coordinate, Course, CourseRating, NearbyCourse, Preference, RankedCourse, RatedRound, Round};
pub use requests::{NearbyCoursesQuery, RecordPreferenceRequest};
pub use responses::{CoursePairResponse, ErrorResponse, HandicapResponse, HealthResponse, NearbyCoursesResponse, RankingsResponse};
