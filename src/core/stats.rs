use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::error::{AnalyticsError, AnalyticsResult};
use crate::core::handicap::differential;
use crate::models::RatedRound;

/// One point of a player's score history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreTrendPoint {
    #[serde(rename = "roundId")]
    pub round_id: Uuid,
    #[serde(rename = "courseId")]
    pub course_id: Uuid,
    #[serde(rename = "datePlayed")]
    pub date_played: DateTime<Utc>,
    pub score: i32,
    /// Missing when the course has no usable rating
    pub differential: Option<f64>,
}

/// Summary across every round a player has logged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    #[serde(rename = "totalRounds")]
    pub total_rounds: usize,
    #[serde(rename = "averageScore")]
    pub average_score: f64,
    #[serde(rename = "bestScore")]
    pub best_score: i32,
    #[serde(rename = "worstScore")]
    pub worst_score: i32,
    /// Newest first
    #[serde(rename = "scoreTrend")]
    pub score_trend: Vec<ScoreTrendPoint>,
}

/// Summary of a player's rounds on a single course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseStats {
    #[serde(rename = "courseId")]
    pub course_id: Uuid,
    #[serde(rename = "roundsPlayed")]
    pub rounds_played: usize,
    #[serde(rename = "averageScore")]
    pub average_score: f64,
    #[serde(rename = "bestScore")]
    pub best_score: i32,
    #[serde(rename = "worstScore")]
    pub worst_score: i32,
}

struct ScoreSummary {
    count: usize,
    average: f64,
    best: i32,
    worst: i32,
}

fn summarize<'a>(rounds: impl Iterator<Item = &'a RatedRound>) -> AnalyticsResult<ScoreSummary> {
    let mut count = 0usize;
    let mut total = 0i64;
    let mut best = i32::MAX;
    let mut worst = i32::MIN;

    for r in rounds {
        count += 1;
        total += i64::from(r.round.score);
        best = best.min(r.round.score);
        worst = worst.max(r.round.score);
    }

    if count == 0 {
        return Err(AnalyticsError::InsufficientData {
            available: 0,
            required: 1,
        });
    }

    Ok(ScoreSummary {
        count,
        average: total as f64 / count as f64,
        best,
        worst,
    })
}

/// Totals and score trend over all of a player's rounds
pub fn overall_stats(rounds: &[RatedRound]) -> AnalyticsResult<OverallStats> {
    let summary = summarize(rounds.iter())?;

    let mut score_trend: Vec<ScoreTrendPoint> = rounds
        .iter()
        .map(|r| ScoreTrendPoint {
            round_id: r.round.id,
            course_id: r.round.course_id,
            date_played: r.round.date_played,
            score: r.round.score,
            differential: r.rating.as_ref().and_then(|rating| {
                differential(r.round.score, rating)
                    .map_err(|e| {
                        tracing::warn!("No differential for round {}: {}", r.round.id, e);
                    })
                    .ok()
            }),
        })
        .collect();
    score_trend.sort_by(|a, b| {
        b.date_played
            .cmp(&a.date_played)
            .then_with(|| a.round_id.cmp(&b.round_id))
    });

    Ok(OverallStats {
        total_rounds: summary.count,
        average_score: summary.average,
        best_score: summary.best,
        worst_score: summary.worst,
        score_trend,
    })
}

/// Summary over the rounds played on `course_id`
pub fn course_stats(course_id: Uuid, rounds: &[RatedRound]) -> AnalyticsResult<CourseStats> {
    let summary = summarize(rounds.iter().filter(|r| r.round.course_id == course_id))?;

    Ok(CourseStats {
        course_id,
        rounds_played: summary.count,
        average_score: summary.average,
        best_score: summary.best,
        worst_score: summary.worst,
    })
}
