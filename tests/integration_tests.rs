// Integration tests for Swing analytics: HTTP routes over the in-memory store

use actix_web::{http::StatusCode, test, web, App};
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use swing_analytics::config::Settings;
use swing_analytics::models::{Coordinate, Course, Round};
use swing_analytics::routes::{self, handle_json_payload_error, handle_query_payload_error, AppState};
use swing_analytics::services::{GolfStore, InMemoryStore, ProfileStore};

const PLAYER: u128 = 1;

fn course_at(n: u128, name: &str, lat: f64, lon: f64) -> Course {
    Course {
        id: Uuid::from_u128(n),
        name: name.to_string(),
        city: "New York".to_string(),
        state: "NY".to_string(),
        coordinate: Coordinate::new(lat, lon),
    }
}

fn round(n: u128, course: u128, score: i32, days_ago: i64) -> Round {
    Round {
        id: Uuid::from_u128(n),
        player_id: Uuid::from_u128(PLAYER),
        course_id: Uuid::from_u128(course),
        score,
        date_played: Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap() - Duration::days(days_ago),
    }
}

/// Four courses around Manhattan, three rated at 72.0 / 113 and one unrated
async fn seeded_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    store.add_course(course_at(10, "Battery Links", 40.72, -74.01), Some((72.0, 113))).await;
    store.add_course(course_at(11, "Midtown Greens", 40.75, -73.98), Some((72.0, 113))).await;
    store.add_course(course_at(12, "Harlem Hills", 40.80, -74.00), Some((72.0, 113))).await;
    store.add_course(course_at(13, "Catskill Pines", 41.50, -74.00), None).await;
    store.add_profile(Uuid::from_u128(PLAYER)).await;
    store
}

fn settings_with(avoid_repeat_pairs: bool) -> Settings {
    let mut settings = Settings::default();
    settings.ranking.avoid_repeat_pairs = avoid_repeat_pairs;
    settings
}

macro_rules! app {
    ($store:expr, $settings:expr) => {{
        let store: Arc<dyn GolfStore> = $store.clone();
        let state = AppState::new(store, &$settings);
        test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
                .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
                .configure(routes::configure_routes),
        )
        .await
    }};
}

fn player_uri(suffix: &str) -> String {
    format!("/api/v1/players/{}/{}", Uuid::from_u128(PLAYER), suffix)
}

#[actix_web::test]
async fn test_health_reports_healthy() {
    let store = seeded_store().await;
    let app = app!(store, Settings::default());

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_nearby_courses_nearest_first() {
    let store = seeded_store().await;
    let app = app!(store, Settings::default());

    let req = test::TestRequest::get()
        .uri("/api/v1/courses/nearby?latitude=40.7128&longitude=-74.0060&radiusKm=25")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let names: Vec<&str> = body["courses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["course"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Battery Links", "Midtown Greens", "Harlem Hills"]);
    assert_eq!(body["radiusKm"], 25.0);
}

#[actix_web::test]
async fn test_nearby_courses_default_radius() {
    let store = seeded_store().await;
    let app = app!(store, Settings::default());

    // 50 km default still leaves the Catskills course out
    let req = test::TestRequest::get()
        .uri("/api/v1/courses/nearby?lat=40.7128&lon=-74.0060")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["courses"].as_array().unwrap().len(), 3);
    assert_eq!(body["radiusKm"], 50.0);
}

#[actix_web::test]
async fn test_nearby_courses_rejects_bad_query() {
    let store = seeded_store().await;
    let app = app!(store, Settings::default());

    let req = test::TestRequest::get()
        .uri("/api/v1/courses/nearby?latitude=95.0&longitude=0.0")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/v1/courses/nearby?longitude=0.0")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_query");
}

#[actix_web::test]
async fn test_nearby_courses_radius_above_cap_rejected() {
    let store = seeded_store().await;
    let mut settings = Settings::default();
    settings.search.max_radius_km = 100.0;
    let app = app!(store, settings);

    let req = test::TestRequest::get()
        .uri("/api/v1/courses/nearby?latitude=40.7128&longitude=-74.0060&radiusKm=150")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "radius_too_large");

    // The cap itself is allowed and echoed back
    let req = test::TestRequest::get()
        .uri("/api/v1/courses/nearby?latitude=40.7128&longitude=-74.0060&radiusKm=100")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["radiusKm"], 100.0);
    assert_eq!(body["courses"].as_array().unwrap().len(), 4);
}

#[actix_web::test]
async fn test_handicap_insufficient_rounds_keeps_profile() {
    let store = seeded_store().await;
    for (i, score) in [80, 82, 84].into_iter().enumerate() {
        store.add_round(round(100 + i as u128, 10, score, i as i64)).await;
    }
    // Unrated rounds never count towards the minimum
    store.add_round(round(200, 13, 70, 0)).await;
    store.add_round(round(201, 13, 70, 1)).await;

    let app = app!(store, Settings::default());
    let req = test::TestRequest::post().uri(&player_uri("handicap")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "insufficient_data");
    assert_eq!(store.handicap(Uuid::from_u128(PLAYER)).await.unwrap(), None);
}

#[actix_web::test]
async fn test_handicap_recalculated_and_stored() {
    let store = seeded_store().await;
    for (i, score) in [80, 82, 84, 86, 88].into_iter().enumerate() {
        store.add_round(round(100 + i as u128, 10 + (i as u128 % 3), score, i as i64)).await;
    }

    let app = app!(store, Settings::default());
    let req = test::TestRequest::post().uri(&player_uri("handicap")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let index = body["handicapIndex"].as_f64().unwrap();
    assert!((index - 7.68).abs() < 1e-9);
    assert_eq!(body["differentialsUsed"], 1);

    let stored = store.handicap(Uuid::from_u128(PLAYER)).await.unwrap().unwrap();
    assert!((stored - 7.68).abs() < 1e-9);
}

#[actix_web::test]
async fn test_handicap_follows_round_removal() {
    let store = seeded_store().await;
    for (i, score) in [78, 82, 84, 86, 88, 90].into_iter().enumerate() {
        store.add_round(round(100 + i as u128, 10, score, i as i64)).await;
    }
    let app = app!(store, Settings::default());

    let req = test::TestRequest::post().uri(&player_uri("handicap")).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!((body["handicapIndex"].as_f64().unwrap() - 6.0 * 0.96).abs() < 1e-9);

    // Deleting the best round is picked up by the next recalculation
    assert!(store.remove_round(Uuid::from_u128(100)).await);
    let req = test::TestRequest::post().uri(&player_uri("handicap")).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!((body["handicapIndex"].as_f64().unwrap() - 10.0 * 0.96).abs() < 1e-9);
}

#[actix_web::test]
async fn test_handicap_unknown_profile_is_not_found() {
    let store = seeded_store().await;
    let stranger = Uuid::from_u128(77);
    for i in 0..5 {
        let mut r = round(300 + i, 10, 85, i as i64);
        r.player_id = stranger;
        store.add_round(r).await;
    }

    let app = app!(store, Settings::default());
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/players/{}/handicap", stranger))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_record_preferences_and_rank() {
    let store = seeded_store().await;
    let app = app!(store, Settings::default());

    let answers = [(10, 11), (10, 12), (11, 12), (12, 11), (11, 12)];
    let mut last = Value::Null;
    for (winner, loser) in answers {
        let req = test::TestRequest::post()
            .uri(&player_uri("preferences"))
            .set_json(json!({
                "winnerId": Uuid::from_u128(winner),
                "loserId": Uuid::from_u128(loser),
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        last = test::read_body_json(resp).await;
    }
    assert_eq!(last["totalPreferences"], 5);

    let req = test::TestRequest::get().uri(&player_uri("rankings")).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, last);

    let names: Vec<&str> = body["rankings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["course"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Battery Links", "Midtown Greens", "Harlem Hills"]);
    assert_eq!(body["rankings"][0]["winRate"], 1.0);
}

#[actix_web::test]
async fn test_record_preference_rejects_bad_pairs() {
    let store = seeded_store().await;
    let app = app!(store, Settings::default());

    let same = Uuid::from_u128(10);
    let req = test::TestRequest::post()
        .uri(&player_uri("preferences"))
        .set_json(json!({ "winnerId": same, "loserId": same }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri(&player_uri("preferences"))
        .set_json(json!({ "winnerId": Uuid::from_u128(10), "loserId": Uuid::from_u128(99) }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri(&player_uri("preferences"))
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_json");

    let req = test::TestRequest::get().uri(&player_uri("rankings")).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["totalPreferences"], 0);
}

#[actix_web::test]
async fn test_pair_needs_two_played_courses() {
    let store = seeded_store().await;
    store.add_round(round(100, 10, 85, 0)).await;
    store.add_round(round(101, 10, 87, 1)).await;
    let app = app!(store, Settings::default());

    let req = test::TestRequest::get().uri(&player_uri("pair")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "unavailable");
}

#[actix_web::test]
async fn test_pair_avoids_compared_pairs() {
    let store = seeded_store().await;
    for (i, course) in [10, 11, 12].into_iter().enumerate() {
        store.add_round(round(100 + i as u128, course, 85, i as i64)).await;
    }
    let app = app!(store, settings_with(true));

    for (winner, loser) in [(10, 11), (12, 10)] {
        let req = test::TestRequest::post()
            .uri(&player_uri("preferences"))
            .set_json(json!({
                "winnerId": Uuid::from_u128(winner),
                "loserId": Uuid::from_u128(loser),
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    for _ in 0..10 {
        let req = test::TestRequest::get().uri(&player_uri("pair")).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let mut names = vec![
            body["first"]["name"].as_str().unwrap().to_string(),
            body["second"]["name"].as_str().unwrap().to_string(),
        ];
        names.sort();
        assert_eq!(names, vec!["Harlem Hills", "Midtown Greens"]);
    }
}

#[actix_web::test]
async fn test_stats_endpoints() {
    let store = seeded_store().await;
    store.add_round(round(100, 10, 80, 0)).await;
    store.add_round(round(101, 10, 90, 2)).await;
    store.add_round(round(102, 13, 85, 1)).await;
    let app = app!(store, Settings::default());

    let req = test::TestRequest::get().uri(&player_uri("stats")).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["totalRounds"], 3);
    assert_eq!(body["bestScore"], 80);
    assert_eq!(body["worstScore"], 90);
    assert_eq!(body["scoreTrend"][0]["roundId"], json!(Uuid::from_u128(100)));

    let req = test::TestRequest::get()
        .uri(&player_uri(&format!("stats/courses/{}", Uuid::from_u128(10))))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["roundsPlayed"], 2);
    assert_eq!(body["averageScore"], 85.0);

    let req = test::TestRequest::get()
        .uri(&player_uri(&format!("stats/courses/{}", Uuid::from_u128(11))))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
