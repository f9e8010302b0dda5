use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{BoundingBox, Course, Preference, RatedRound};

/// Errors raised by storage adapters
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Source of a player's rounds joined with course ratings
#[async_trait]
pub trait RoundSource: Send + Sync {
    /// Rounds ordered by play date, most recent first. A round whose course has
    /// no rating or slope comes back with `rating: None`. `limit` of `None`
    /// returns the whole history.
    async fn rated_rounds(
        &self,
        player_id: Uuid,
        limit: Option<usize>,
    ) -> Result<Vec<RatedRound>, StoreError>;

    /// Distinct ids of every course the player has a round on
    async fn played_course_ids(&self, player_id: Uuid) -> Result<Vec<Uuid>, StoreError>;
}

/// Course catalog
#[async_trait]
pub trait CourseCatalog: Send + Sync {
    /// Courses inside the box. Boxes crossing the antimeridian carry
    /// longitudes beyond ±180 and must be matched with wrap-around.
    async fn courses_in_box(&self, bbox: &BoundingBox) -> Result<Vec<Course>, StoreError>;

    async fn courses_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Course>, StoreError>;
}

/// Append-only log of course preferences, keyed by player
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn insert_preference(&self, preference: &Preference) -> Result<(), StoreError>;

    async fn preferences_for_player(&self, player_id: Uuid) -> Result<Vec<Preference>, StoreError>;
}

/// Player profile fields written by the analytics core
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn handicap(&self, player_id: Uuid) -> Result<Option<f64>, StoreError>;

    /// Plain overwrite; the last writer wins
    async fn update_handicap(&self, player_id: Uuid, handicap: f64) -> Result<(), StoreError>;
}

/// Liveness probe for the health endpoint
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

/// Everything the HTTP layer needs from storage
pub trait GolfStore: RoundSource + CourseCatalog + PreferenceStore + ProfileStore + StoreHealth {}

impl<T> GolfStore for T where T: RoundSource + CourseCatalog + PreferenceStore + ProfileStore + StoreHealth {}
