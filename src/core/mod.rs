// Core algorithm exports
pub mod distance;
pub mod error;
pub mod geosearch;
pub mod handicap;
pub mod ranking;
pub mod stats;

pub use distance::{bounding_box, distance_km, is_within_bounding_box};
pub use error::{AnalyticsError, AnalyticsResult};
pub use geosearch::{nearby_courses, GeoSearch};
pub use handicap::{compute_handicap, differential, DifferentialTable, HandicapCalculation, HandicapSettings};
pub use ranking::{compared_pairs, new_preference, pick_pair, pick_pair_avoiding, rank, PreferenceRanker};
pub use stats::{course_stats, overall_stats, CourseStats, OverallStats};
