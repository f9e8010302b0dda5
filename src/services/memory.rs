use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::is_within_bounding_box;
use crate::models::{BoundingBox, Course, CourseRating, Preference, RatedRound, Round};
use crate::services::store::{
    CourseCatalog, PreferenceStore, ProfileStore, RoundSource, StoreError, StoreHealth,
};

#[derive(Debug, Default)]
struct Tables {
    courses: Vec<Course>,
    ratings: HashMap<Uuid, CourseRating>,
    rounds: Vec<Round>,
    preferences: Vec<Preference>,
    handicaps: HashMap<Uuid, Option<f64>>,
}

/// Process-local store for tests and `storage.backend = "memory"`
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a course, optionally with its rating and slope
    pub async fn add_course(&self, course: Course, rating: Option<(f64, u16)>) {
        let mut tables = self.tables.write().await;
        if let Some((rating, slope)) = rating {
            tables.ratings.insert(
                course.id,
                CourseRating {
                    course_id: course.id,
                    rating,
                    slope,
                },
            );
        }
        tables.courses.retain(|c| c.id != course.id);
        tables.courses.push(course);
    }

    pub async fn add_round(&self, round: Round) {
        self.tables.write().await.rounds.push(round);
    }

    pub async fn remove_round(&self, round_id: Uuid) -> bool {
        let mut tables = self.tables.write().await;
        let before = tables.rounds.len();
        tables.rounds.retain(|r| r.id != round_id);
        tables.rounds.len() != before
    }

    /// Register a player profile with no handicap yet
    pub async fn add_profile(&self, player_id: Uuid) {
        self.tables
            .write()
            .await
            .handicaps
            .entry(player_id)
            .or_insert(None);
    }
}

#[async_trait]
impl RoundSource for InMemoryStore {
    async fn rated_rounds(
        &self,
        player_id: Uuid,
        limit: Option<usize>,
    ) -> Result<Vec<RatedRound>, StoreError> {
        let tables = self.tables.read().await;

        let mut rounds: Vec<RatedRound> = tables
            .rounds
            .iter()
            .filter(|r| r.player_id == player_id)
            .map(|r| RatedRound::new(r.clone(), tables.ratings.get(&r.course_id).copied()))
            .collect();

        rounds.sort_by(|a, b| {
            b.round
                .date_played
                .cmp(&a.round.date_played)
                .then_with(|| a.round.id.cmp(&b.round.id))
        });
        if let Some(limit) = limit {
            rounds.truncate(limit);
        }

        Ok(rounds)
    }

    async fn played_course_ids(&self, player_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        let tables = self.tables.read().await;
        let mut seen = HashSet::new();

        Ok(tables
            .rounds
            .iter()
            .filter(|r| r.player_id == player_id && seen.insert(r.course_id))
            .map(|r| r.course_id)
            .collect())
    }
}

#[async_trait]
impl CourseCatalog for InMemoryStore {
    async fn courses_in_box(&self, bbox: &BoundingBox) -> Result<Vec<Course>, StoreError> {
        let tables = self.tables.read().await;

        Ok(tables
            .courses
            .iter()
            .filter(|c| is_within_bounding_box(c.coordinate, bbox))
            .cloned()
            .collect())
    }

    async fn courses_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Course>, StoreError> {
        let tables = self.tables.read().await;

        Ok(tables
            .courses
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PreferenceStore for InMemoryStore {
    async fn insert_preference(&self, preference: &Preference) -> Result<(), StoreError> {
        self.tables.write().await.preferences.push(preference.clone());
        Ok(())
    }

    async fn preferences_for_player(&self, player_id: Uuid) -> Result<Vec<Preference>, StoreError> {
        let tables = self.tables.read().await;

        Ok(tables
            .preferences
            .iter()
            .filter(|p| p.player_id == player_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn handicap(&self, player_id: Uuid) -> Result<Option<f64>, StoreError> {
        self.tables
            .read()
            .await
            .handicaps
            .get(&player_id)
            .copied()
            .ok_or_else(|| StoreError::NotFound(format!("profile {}", player_id)))
    }

    async fn update_handicap(&self, player_id: Uuid, handicap: f64) -> Result<(), StoreError> {
        if !handicap.is_finite() {
            return Err(StoreError::InvalidInput(format!(
                "refusing to store non-finite handicap for {}",
                player_id
            )));
        }

        let mut tables = self.tables.write().await;
        match tables.handicaps.get_mut(&player_id) {
            Some(slot) => {
                *slot = Some(handicap);
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("profile {}", player_id))),
        }
    }
}

#[async_trait]
impl StoreHealth for InMemoryStore {}
