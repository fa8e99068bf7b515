use std::{
    sync::Arc,
    time::{Duration, UNIX_EPOCH},
};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use duum_back::{
    config::AppConfig,
    dao::store::MemoryStore,
    routes,
    state::{AppState, ManualClock},
};

fn app() -> Router {
    let clock = ManualClock::new(UNIX_EPOCH + Duration::from_secs(1_700_000_000));
    let state = AppState::with_store(
        AppConfig::default(),
        Arc::new(clock),
        Arc::new(MemoryStore::new()),
    );
    routes::router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

#[tokio::test]
async fn submit_returns_created_record() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/scores",
        Some(json!({
            "player_name": "Ace",
            "score": 1500,
            "level": 4,
            "kills": 37,
            "time_played": 312,
            "mode": "easy"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({
            "id": 1,
            "player_name": "Ace",
            "score": 1500,
            "level": 4,
            "kills": 37,
            "time_played": 312,
            "mode": "easy",
            "created_at": "2023-11-14T22:13:20Z"
        })
    );
}

#[tokio::test]
async fn empty_body_stores_defaults() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/api/scores", None).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["player_name"], "Anonymous");
    assert_eq!(body["score"], 0);
    assert_eq!(body["level"], 1);
    assert_eq!(body["mode"], "normal");
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/api/scores", Some(json!(42))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("bad request"));
}

#[tokio::test]
async fn scores_are_ranked_per_mode() {
    let app = app();
    for (name, score, mode) in [
        ("Bo", 900, "easy"),
        ("Ace", 1500, "easy"),
        ("Cy", 2000, "normal"),
    ] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/scores",
            Some(json!({"player_name": name, "score": score, "mode": mode})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, Method::GET, "/api/scores?mode=easy", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["player_name"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(names, ["Ace", "Bo"]);

    let (_, body) = send(&app, Method::GET, "/api/scores", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["player_name"], "Cy");

    let (_, body) = send(&app, Method::GET, "/api/scores?mode=hard", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn scores_query_limit_is_validated() {
    let app = app();
    let (status, _) = send(&app, Method::GET, "/api/scores?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::GET, "/api/scores?limit=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn leaderboard_groups_modes() {
    let app = app();
    send(
        &app,
        Method::POST,
        "/api/scores",
        Some(json!({"player_name": "E", "score": 10, "mode": "easy"})),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/api/leaderboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["easy"][0]["player_name"], "E");
    assert_eq!(body["normal"], json!([]));
}

#[tokio::test]
async fn session_lifecycle_over_http() {
    let app = app();
    let (status, started) = send(
        &app,
        Method::POST,
        "/api/sessions",
        Some(json!({"session_id": "run-42", "player_name": "Ace"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(started["ended_at"], Value::Null);
    assert_eq!(started["final_score"], 0);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/sessions",
        Some(json!({"session_id": "run-42"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, ended) = send(
        &app,
        Method::POST,
        "/api/sessions/run-42/end",
        Some(json!({"final_score": 500})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ended["final_score"], 500);
    assert!(ended["ended_at"].is_string());

    let (status, again) = send(
        &app,
        Method::POST,
        "/api/sessions/run-42/end",
        Some(json!({"final_score": 900})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(again["message"].as_str().unwrap().contains("already ended"));

    let (status, fetched) = send(&app, Method::GET, "/api/sessions/run-42", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, ended);
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let app = app();
    let (status, _) = send(&app, Method::GET, "/api/sessions/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/sessions/ghost/end",
        Some(json!({"final_score": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_session_start_is_bad_request() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/sessions",
        Some(json!({"session_id": "run", "player_name": "x".repeat(51)})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("validation failed"));
}

#[tokio::test]
async fn degraded_backend_answers_503() {
    let state = AppState::new(
        AppConfig::default(),
        Arc::new(ManualClock::new(UNIX_EPOCH)),
    );
    let app = routes::router(state);

    let (status, _) = send(&app, Method::GET, "/api/scores", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, body) = send(&app, Method::GET, "/healthcheck", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn session_routes_accept_empty_bodies() {
    let app = app();
    let (status, started) = send(&app, Method::POST, "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let session_id = started["session_id"].as_str().unwrap().to_owned();
    assert!(!session_id.is_empty());
    assert_eq!(started["player_name"], Value::Null);

    let uri = format!("/api/sessions/{session_id}/end");
    let (status, ended) = send(&app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ended["final_score"], 0);
    assert!(ended["ended_at"].is_string());

    let (status, body) = send(&app, Method::POST, "/api/sessions/nobody/end", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());
}
