use actix_web::{web, HttpResponse};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::config::Settings;
use crate::core::{
    compute_handicap, course_stats, nearby_courses, new_preference, overall_stats, GeoSearch,
    HandicapSettings, PreferenceRanker,
};
use crate::models::{
    CoursePairResponse, HandicapResponse, HealthResponse, NearbyCoursesQuery,
    NearbyCoursesResponse, RankingsResponse, RecordPreferenceRequest,
};
use crate::routes::error::ApiError;
use crate::services::{CourseCatalog, GolfStore, PreferenceStore, ProfileStore, RoundSource, StoreHealth};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GolfStore>,
    pub handicap: HandicapSettings,
    pub geo: GeoSearch,
    pub max_radius_km: f64,
    pub ranker: PreferenceRanker,
}

impl AppState {
    pub fn new(store: Arc<dyn GolfStore>, settings: &Settings) -> Self {
        Self {
            store,
            handicap: HandicapSettings::from(&settings.handicap),
            geo: GeoSearch::from(&settings.search),
            max_radius_km: settings.search.max_radius_km,
            ranker: PreferenceRanker::from(&settings.ranking),
        }
    }
}

/// Configure all golf analytics routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/courses/nearby", web::get().to(find_nearby_courses))
        .route("/players/{player_id}/handicap", web::post().to(recalculate_handicap))
        .route("/players/{player_id}/rankings", web::get().to(get_rankings))
        .route("/players/{player_id}/pair", web::get().to(next_pair))
        .route("/players/{player_id}/preferences", web::post().to(record_preference))
        .route("/players/{player_id}/stats", web::get().to(get_overall_stats))
        .route("/players/{player_id}/stats/courses/{course_id}", web::get().to(get_course_stats));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let healthy = state.store.health_check().await.unwrap_or(false);
    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Recalculate and publish a player's handicap
///
/// POST /api/v1/players/{player_id}/handicap
///
/// With too few rated rounds this answers 422 and leaves the stored handicap
/// as it was.
async fn recalculate_handicap(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let player_id = path.into_inner();

    // The engine picks the most recent rated rounds itself, so unrated
    // rounds must not eat into a query limit
    let rounds = state.store.rated_rounds(player_id, None).await?;

    let calculation = compute_handicap(&rounds, &state.handicap).map_err(|e| {
        tracing::warn!("Keeping previous handicap for {}: {}", player_id, e);
        e
    })?;

    state
        .store
        .update_handicap(player_id, calculation.handicap_index)
        .await?;

    tracing::info!(
        "Handicap for {} is {:.1} (best {} of {})",
        player_id,
        calculation.handicap_index,
        calculation.differentials_used,
        calculation.differentials_available
    );

    Ok(HttpResponse::Ok().json(HandicapResponse {
        player_id,
        calculation,
    }))
}

/// Find courses near a point
///
/// GET /api/v1/courses/nearby?latitude=..&longitude=..&radiusKm=..
///
/// `radiusKm` defaults to `search.default_radius_km`; anything above
/// `search.max_radius_km` is rejected with 400. The radius searched is echoed
/// back as `radiusKm`.
async fn find_nearby_courses(
    state: web::Data<AppState>,
    query: web::Query<NearbyCoursesQuery>,
) -> Result<HttpResponse, ApiError> {
    query.validate()?;

    let center = query.center();
    let radius_km = query.radius_km.unwrap_or(state.geo.default_radius_km());
    if radius_km > state.max_radius_km {
        return Err(ApiError::BadRequest {
            error: "radius_too_large",
            message: format!(
                "radiusKm {} exceeds the maximum of {} km",
                radius_km, state.max_radius_km
            ),
        });
    }

    let bbox = state.geo.search_box(center, Some(radius_km))?;
    let candidates = state.store.courses_in_box(&bbox).await?;
    let total_candidates = candidates.len();

    let courses = nearby_courses(center, radius_km, candidates)?;

    tracing::info!(
        "Found {} courses within {} km of ({}, {}) from {} candidates",
        courses.len(),
        radius_km,
        center.latitude,
        center.longitude,
        total_candidates
    );

    Ok(HttpResponse::Ok().json(NearbyCoursesResponse {
        courses,
        radius_km,
        total_candidates,
    }))
}

/// Replay the player's whole preference log
async fn replay_rankings(state: &AppState, player_id: Uuid) -> Result<RankingsResponse, ApiError> {
    let preferences = state.store.preferences_for_player(player_id).await?;

    let course_ids: Vec<Uuid> = preferences
        .iter()
        .flat_map(|p| [p.winner_course_id, p.loser_course_id])
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let courses = state.store.courses_by_ids(&course_ids).await?;

    let rankings = state.ranker.rank(&preferences, &courses);

    tracing::debug!(
        "Player {} has {} ranked courses from {} preferences",
        player_id,
        rankings.len(),
        preferences.len()
    );

    Ok(RankingsResponse {
        player_id,
        rankings,
        total_preferences: preferences.len(),
    })
}

/// GET /api/v1/players/{player_id}/rankings
async fn get_rankings(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let response = replay_rankings(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Next pair of played courses to ask the player about
///
/// GET /api/v1/players/{player_id}/pair
async fn next_pair(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let player_id = path.into_inner();

    let played_ids = state.store.played_course_ids(player_id).await?;
    let played = state.store.courses_by_ids(&played_ids).await?;
    let history = if state.ranker.avoids_repeat_pairs() {
        state.store.preferences_for_player(player_id).await?
    } else {
        Vec::new()
    };

    let (first, second) = state
        .ranker
        .next_pair(&played, &history, &mut rand::rng())
        .map_err(|e| {
            tracing::warn!("No pair for {}: {}", player_id, e);
            e
        })?;

    Ok(HttpResponse::Ok().json(CoursePairResponse { first, second }))
}

/// Record a preference and return the updated ranking
///
/// POST /api/v1/players/{player_id}/preferences
///
/// Request body:
/// ```json
/// {
///   "winnerId": "uuid",
///   "loserId": "uuid"
/// }
/// ```
async fn record_preference(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<RecordPreferenceRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;
    let player_id = path.into_inner();

    let known = state
        .store
        .courses_by_ids(&[req.winner_id, req.loser_id])
        .await?;
    for id in [req.winner_id, req.loser_id] {
        if !known.iter().any(|c| c.id == id) {
            return Err(ApiError::NotFound(format!("course {}", id)));
        }
    }

    let preference = new_preference(player_id, req.winner_id, req.loser_id, chrono::Utc::now())?;
    state.store.insert_preference(&preference).await?;

    tracing::info!(
        "Player {} preferred {} over {}",
        player_id,
        req.winner_id,
        req.loser_id
    );

    let response = replay_rankings(&state, player_id).await?;
    Ok(HttpResponse::Created().json(response))
}

/// GET /api/v1/players/{player_id}/stats
async fn get_overall_stats(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let rounds = state.store.rated_rounds(path.into_inner(), None).await?;
    Ok(HttpResponse::Ok().json(overall_stats(&rounds)?))
}

/// GET /api/v1/players/{player_id}/stats/courses/{course_id}
async fn get_course_stats(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, ApiError> {
    let (player_id, course_id) = path.into_inner();
    let rounds = state.store.rated_rounds(player_id, None).await?;
    Ok(HttpResponse::Ok().json(course_stats(course_id, &rounds)?))
}
