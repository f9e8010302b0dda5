//! Swing Analytics - golf analytics and ranking core for the Swing app
//!
//! Three pure engines over already-fetched data: a handicap index from a
//! player's round history, a nearby-course search, and a pairwise preference
//! ranking of courses. The HTTP layer and store adapters around them fetch the
//! data and persist the one derived value the core produces, the handicap.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    bounding_box, compute_handicap, distance_km, nearby_courses, pick_pair, rank, AnalyticsError,
    HandicapSettings,
};
pub use models::{Coordinate, Course, CourseRating, Preference, RankedCourse, RatedRound, Round};
