use chrono::{DateTime, Utc};
use rand::seq::{index, IndexedRandom};
use rand::Rng;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::core::error::{AnalyticsError, AnalyticsResult};
use crate::models::{Course, Preference, RankedCourse};

/// Unordered pair of course ids, smaller id first
pub type PairKey = (Uuid, Uuid);

pub fn pair_key(a: Uuid, b: Uuid) -> PairKey {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Replay a preference log into a ranked course list
///
/// Every edge counts, duplicates included. Order is win rate descending, then
/// number of comparisons descending, then course id ascending, so the result
/// depends only on the multiset of edges and never on log or map order.
/// Edges naming a course missing from `catalog` only count for the side that
/// is present.
pub fn rank(preferences: &[Preference], catalog: &[Course]) -> Vec<RankedCourse> {
    let courses: HashMap<Uuid, &Course> = catalog.iter().map(|c| (c.id, c)).collect();
    let mut tally: HashMap<Uuid, (u32, u32)> = HashMap::new();

    for pref in preferences {
        if courses.contains_key(&pref.winner_course_id) {
            tally.entry(pref.winner_course_id).or_default().0 += 1;
        }
        if courses.contains_key(&pref.loser_course_id) {
            tally.entry(pref.loser_course_id).or_default().1 += 1;
        }
    }

    let mut ranked: Vec<RankedCourse> = tally
        .into_iter()
        .filter_map(|(id, (wins, losses))| {
            courses.get(&id).map(|course| RankedCourse {
                course: (*course).clone(),
                wins,
                losses,
                win_rate: f64::from(wins) / f64::from((wins + losses).max(1)),
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.win_rate
            .partial_cmp(&a.win_rate)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.comparisons().cmp(&a.comparisons()))
            .then_with(|| a.course.id.cmp(&b.course.id))
    });

    tracing::debug!(
        "Ranked {} courses from {} preferences",
        ranked.len(),
        preferences.len()
    );

    ranked
}

/// Build the edge for "`winner` beat `loser`", ready to append to the log
pub fn new_preference(
    player_id: Uuid,
    winner_course_id: Uuid,
    loser_course_id: Uuid,
    created_at: DateTime<Utc>,
) -> AnalyticsResult<Preference> {
    if winner_course_id == loser_course_id {
        return Err(AnalyticsError::InvalidInput(format!(
            "course {} cannot be compared with itself",
            winner_course_id
        )));
    }

    Ok(Preference {
        player_id,
        winner_course_id,
        loser_course_id,
        created_at,
    })
}

/// Unordered pairs a player has already been asked about
pub fn compared_pairs(preferences: &[Preference]) -> HashSet<PairKey> {
    preferences
        .iter()
        .map(|p| pair_key(p.winner_course_id, p.loser_course_id))
        .collect()
}

fn distinct_courses(courses: &[Course]) -> Vec<&Course> {
    let mut seen = HashSet::new();
    courses.iter().filter(|c| seen.insert(c.id)).collect()
}

/// Uniformly random unordered pair of distinct courses
///
/// Has no memory of earlier pairs, so repeats are possible.
pub fn pick_pair<R: Rng + ?Sized>(courses: &[Course], rng: &mut R) -> AnalyticsResult<(Course, Course)> {
    let distinct = distinct_courses(courses);
    if distinct.len() < 2 {
        return Err(AnalyticsError::Unavailable {
            available: distinct.len(),
        });
    }

    let picked = index::sample(rng, distinct.len(), 2);
    Ok((
        distinct[picked.index(0)].clone(),
        distinct[picked.index(1)].clone(),
    ))
}

/// Like [`pick_pair`] but prefers pairs not in `compared`
///
/// Once every pair has been compared it falls back to [`pick_pair`].
pub fn pick_pair_avoiding<R: Rng + ?Sized>(
    courses: &[Course],
    compared: &HashSet<PairKey>,
    rng: &mut R,
) -> AnalyticsResult<(Course, Course)> {
    let distinct = distinct_courses(courses);
    if distinct.len() < 2 {
        return Err(AnalyticsError::Unavailable {
            available: distinct.len(),
        });
    }

    let mut fresh = Vec::new();
    for (i, a) in distinct.iter().enumerate() {
        for b in &distinct[i + 1..] {
            if !compared.contains(&pair_key(a.id, b.id)) {
                fresh.push((*a, *b));
            }
        }
    }

    match fresh.choose(rng) {
        Some((a, b)) => Ok(((*a).clone(), (*b).clone())),
        None => {
            tracing::debug!("All {} course pairs already compared, allowing repeats", compared.len());
            pick_pair(courses, rng)
        }
    }
}

/// Preference ranking engine with its pairing policy
#[derive(Debug, Clone, Copy, Default)]
pub struct PreferenceRanker {
    avoid_repeat_pairs: bool,
}

impl PreferenceRanker {
    pub fn new(avoid_repeat_pairs: bool) -> Self {
        Self { avoid_repeat_pairs }
    }

    pub fn avoids_repeat_pairs(&self) -> bool {
        self.avoid_repeat_pairs
    }

    pub fn rank(&self, preferences: &[Preference], catalog: &[Course]) -> Vec<RankedCourse> {
        rank(preferences, catalog)
    }

    /// Next pair to show, honouring the repeat policy
    pub fn next_pair<R: Rng + ?Sized>(
        &self,
        played: &[Course],
        history: &[Preference],
        rng: &mut R,
    ) -> AnalyticsResult<(Course, Course)> {
        if self.avoid_repeat_pairs {
            pick_pair_avoiding(played, &compared_pairs(history), rng)
        } else {
            pick_pair(played, rng)
        }
    }
}
