use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use find_numbers_back::{
    config::AppConfig,
    dao::ranking_store::MemoryRankingStore,
    routes,
    state::{AppState, SharedState},
};

async fn app_with_store(config: AppConfig) -> (Router, SharedState) {
    let state = AppState::with_store(config, Arc::new(MemoryRankingStore::new())).await;
    (routes::router(state.clone()), state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body readable")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_raw(body: &str) -> Request<Body> {
    Request::post("/rankings")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

fn post(body: Value) -> Request<Body> {
    post_raw(&body.to_string())
}

#[tokio::test]
async fn submitted_score_is_listed_on_its_leaderboard() {
    let (app, _) = app_with_store(AppConfig::default()).await;

    let (status, body) = send(
        &app,
        post(json!({"name": "Alice", "time": 12.345, "game_mode": 4})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let stored = body.as_array().expect("array of inserted rows");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["game_mode"], "4x4");
    assert!(stored[0]["id"].is_string());
    assert!(stored[0]["created_at"].is_string());

    let (status, body) = send(&app, get("/rankings?game_mode=4")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Alice");
    assert_eq!(body[0]["time"], 12.345);
    assert_eq!(body[0]["game_mode"], "4x4");

    let (_, other_mode) = send(&app, get("/rankings?game_mode=5x5")).await;
    assert_eq!(other_mode, json!([]));
}

#[tokio::test]
async fn leaderboard_lists_each_player_once() {
    let (app, _) = app_with_store(AppConfig::default()).await;
    for (name, time) in [("bob", 10.0), ("BOB", 8.0), ("carl", 9.0)] {
        let (status, _) = send(
            &app,
            post(json!({"name": name, "time": time, "game_mode": "4"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = send(&app, get("/rankings?game_mode=4x4")).await;
    let entries: Vec<(String, f64)> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|row| {
            (
                row["name"].as_str().unwrap().to_owned(),
                row["time"].as_f64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        entries,
        vec![("BOB".to_owned(), 8.0), ("carl".to_owned(), 9.0)]
    );
}

#[tokio::test]
async fn leaderboard_honours_configured_limit() {
    let (app, _) = app_with_store(AppConfig::default().with_leaderboard_limit(2)).await;
    for (index, name) in ["a", "b", "c"].into_iter().enumerate() {
        send(
            &app,
            post(json!({"name": name, "time": 3.0 - index as f64, "game_mode": 6})),
        )
        .await;
    }

    let (_, body) = send(&app, get("/rankings?game_mode=6")).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["c", "b"]);
}

#[tokio::test]
async fn missing_time_is_a_client_error() {
    let (app, _) = app_with_store(AppConfig::default()).await;

    let (status, body) = send(&app, post(json!({"name": "dave", "game_mode": 4}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("missing name, time, or game_mode")
    );

    let (_, listed) = send(&app, get("/rankings")).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn malformed_body_is_a_client_error() {
    let (app, _) = app_with_store(AppConfig::default()).await;

    let (status, body) = send(&app, post_raw("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, _) = send(
        &app,
        post(json!({"name": "eve", "time": 3.0, "game_mode": 9})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_queries_answer_json_bad_requests() {
    let (app, _) = app_with_store(AppConfig::default()).await;

    let (status, body) = send(&app, get("/rankings?game_mode=7x7")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("unsupported game mode")
    );

    let (status, body) = send(&app, get("/rankings?game_mode=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, body) = send(&app, get("/rankings?name=")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("name"));

    let (status, body) = send(&app, get("/rankings?name=a&name=b")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn history_lists_a_players_times_oldest_first() {
    let (app, _) = app_with_store(AppConfig::default()).await;
    for (name, time, mode) in [("gus", 9.0, 4), ("gus", 7.0, 5), ("gus", 8.0, 4), ("ann", 1.0, 4)] {
        send(
            &app,
            post(json!({"name": name, "time": time, "game_mode": mode})),
        )
        .await;
    }

    let (status, body) = send(&app, get("/rankings?name=gus&game_mode=4")).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    let times: Vec<f64> = rows.iter().map(|row| row["time"].as_f64().unwrap()).collect();
    assert_eq!(times, vec![9.0, 8.0]);
    assert!(rows[0].get("name").is_none());
    assert!(rows[0]["created_at"].is_string());
}

#[tokio::test]
async fn degraded_mode_answers_service_unavailable() {
    let (app, state) = app_with_store(AppConfig::default()).await;
    state.clear_ranking_store().await;

    let (status, _) = send(&app, get("/rankings?game_mode=4")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = send(
        &app,
        post(json!({"name": "zed", "time": 4.0, "game_mode": 4})),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, body) = send(&app, get("/healthcheck")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn openapi_document_describes_rankings() {
    let (app, _) = app_with_store(AppConfig::default()).await;
    let (status, body) = send(&app, get(routes::docs::OPENAPI_PATH)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/rankings"]["get"].is_object());
    assert!(body["paths"]["/rankings"]["post"].is_object());
}
