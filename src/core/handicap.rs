use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::core::error::{AnalyticsError, AnalyticsResult};
use crate::models::{CourseRating, RatedRound};

/// Slope of a course of standard difficulty
pub const STANDARD_SLOPE: f64 = 113.0;

/// Which best-of-N table decides how many differentials are averaged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifferentialTable {
    /// Pre-2020 USGA table: best 10 of 20
    #[default]
    Legacy,
    /// World Handicap System table: best 8 of 20, with low-count adjustments
    WorldHandicapSystem,
}

impl DifferentialTable {
    /// How many of the lowest differentials to average, and the adjustment
    /// added to that average, given `available` differentials
    pub fn selection(&self, available: usize) -> (usize, f64) {
        match self {
            DifferentialTable::Legacy => {
                let used = match available {
                    0..=6 => 1,
                    7 | 8 => 2,
                    9 | 10 => 3,
                    11 | 12 => 4,
                    13 | 14 => 5,
                    15 | 16 => 6,
                    17 => 7,
                    18 => 8,
                    19 => 9,
                    _ => 10,
                };
                (used, 0.0)
            }
            DifferentialTable::WorldHandicapSystem => match available {
                0..=3 => (1, -2.0),
                4 => (1, -1.0),
                5 => (1, 0.0),
                6 => (2, -1.0),
                7 | 8 => (2, 0.0),
                9..=11 => (3, 0.0),
                12..=14 => (4, 0.0),
                15 | 16 => (5, 0.0),
                17 | 18 => (6, 0.0),
                19 => (7, 0.0),
                _ => (8, 0.0),
            },
        }
    }
}

/// Tunables for the handicap engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandicapSettings {
    pub multiplier: f64,
    pub max_rounds_considered: usize,
    pub min_rounds_required: usize,
    pub table: DifferentialTable,
}

impl Default for HandicapSettings {
    fn default() -> Self {
        Self {
            multiplier: 0.96,
            max_rounds_considered: 20,
            min_rounds_required: 5,
            table: DifferentialTable::Legacy,
        }
    }
}

/// Outcome of a successful handicap computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandicapCalculation {
    /// The value to publish on the player's profile
    #[serde(rename = "handicapIndex")]
    pub handicap_index: f64,
    #[serde(rename = "differentialsUsed")]
    pub differentials_used: usize,
    #[serde(rename = "differentialsAvailable")]
    pub differentials_available: usize,
    /// Rounds in the input that had no course rating
    #[serde(rename = "roundsSkipped")]
    pub rounds_skipped: usize,
}

/// Score differential for one round: `(score - rating) * 113 / slope`
pub fn differential(score: i32, rating: &CourseRating) -> AnalyticsResult<f64> {
    if score <= 0 {
        return Err(AnalyticsError::InvalidInput(format!(
            "score must be positive, got {}",
            score
        )));
    }
    if rating.slope == 0 {
        return Err(AnalyticsError::InvalidInput(format!(
            "course {} has a slope of zero",
            rating.course_id
        )));
    }
    if !rating.rating.is_finite() {
        return Err(AnalyticsError::InvalidInput(format!(
            "course {} has a non-finite rating",
            rating.course_id
        )));
    }

    Ok((f64::from(score) - rating.rating) * STANDARD_SLOPE / f64::from(rating.slope))
}

/// Compute a handicap index from a player's round history
///
/// Rounds may arrive in any order. The most recent `max_rounds_considered`
/// rounds that carry a course rating are used; rounds without a rating are
/// skipped, never substituted. Fails with [`AnalyticsError::InsufficientData`]
/// when fewer than `min_rounds_required` remain, in which case the caller must
/// keep the previously published handicap.
pub fn compute_handicap(
    rounds: &[RatedRound],
    settings: &HandicapSettings,
) -> AnalyticsResult<HandicapCalculation> {
    if !settings.multiplier.is_finite() || settings.multiplier <= 0.0 {
        return Err(AnalyticsError::InvalidInput(format!(
            "handicap multiplier must be positive, got {}",
            settings.multiplier
        )));
    }

    let mut rated: Vec<(&RatedRound, &CourseRating)> = rounds
        .iter()
        .filter_map(|r| r.rating.as_ref().map(|rating| (r, rating)))
        .collect();
    let rounds_skipped = rounds.len() - rated.len();

    // Most recent first; the id keeps the cut at N stable when dates tie
    rated.sort_by(|(a, _), (b, _)| {
        b.round
            .date_played
            .cmp(&a.round.date_played)
            .then_with(|| a.round.id.cmp(&b.round.id))
    });
    rated.truncate(settings.max_rounds_considered);

    let mut differentials = rated
        .iter()
        .map(|(r, rating)| differential(r.round.score, rating))
        .collect::<AnalyticsResult<Vec<f64>>>()?;

    let required = settings.min_rounds_required.max(1);
    let available = differentials.len();
    if available < required {
        tracing::debug!(
            "Handicap not computed: {} qualifying rounds, {} required ({} without rating)",
            available,
            required,
            rounds_skipped
        );
        return Err(AnalyticsError::InsufficientData { available, required });
    }

    let (used, adjustment) = settings.table.selection(available);
    let used = used.min(available);

    differentials.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let best = &differentials[..used];
    let average = best.iter().sum::<f64>() / used as f64;
    let handicap_index = (average + adjustment) * settings.multiplier;

    tracing::debug!(
        "Handicap {:.2} from best {} of {} differentials",
        handicap_index,
        used,
        available
    );

    Ok(HandicapCalculation {
        handicap_index,
        differentials_used: used,
        differentials_available: available,
        rounds_skipped,
    })
}
