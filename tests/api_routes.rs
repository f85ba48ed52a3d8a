//! Drives the HTTP router against an in-memory task store

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use pomotask::{
    create_router,
    cycle::CycleSettings,
    render::StatusBoard,
    services::MemoryTaskApi,
    state::AppState,
    tasks::spawn_cycle,
};

fn app_with(titles: &[&str]) -> Router {
    let api = Arc::new(MemoryTaskApi::with_titles(titles.iter().copied()));
    let board = Arc::new(StatusBoard::new());
    let channels = spawn_cycle(api, board.clone(), CycleSettings::default());
    let state = AppState::new(channels.commands, channels.snapshots, board, 0, "test".into());
    create_router(Arc::new(state))
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(json) => Body::from(json.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app_with(&[]);
    let (status, body) = call(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn start_pause_resume_cycle() {
    let app = app_with(&["Plan", "Write"]);

    let (status, body) = call(&app, "POST", "/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cycle"]["phase"], "working");
    assert_eq!(body["cycle"]["current_task"], "1");

    let (status, body) = call(&app, "POST", "/pause", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cycle"]["countdown_active"], false);
    assert!(body["cycle"]["paused_remaining_ms"].as_u64().unwrap() > 0);

    let (status, _) = call(&app, "POST", "/pause", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = call(&app, "POST", "/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cycle"]["phase"], "working");
    assert_eq!(body["cycle"]["countdown_active"], true);
    assert!(body["cycle"]["paused_remaining_ms"].is_null());

    let (_, status_body) = call(&app, "GET", "/status", None).await;
    let rows = status_body["board"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["active"], true);
    assert_eq!(status_body["last_action"], "start");
}

#[tokio::test]
async fn add_and_delete_tasks() {
    let app = app_with(&[]);

    let (status, body) = call(&app, "POST", "/tasks", Some(json!({"title": "Review"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["task"]["title"], "Review");
    let id = body["task"]["id"].as_str().unwrap().to_string();

    let (status, _) = call(&app, "POST", "/tasks", Some(json!({"title": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(&app, "DELETE", &format!("/tasks/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cycle"]["total_tasks"], 0);

    let (status, _) = call(&app, "DELETE", &format!("/tasks/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_list_finishes_and_reload_resets() {
    let app = app_with(&[]);

    let (_, body) = call(&app, "POST", "/start", None).await;
    assert_eq!(body["cycle"]["phase"], "finished");

    let (status, _) = call(&app, "POST", "/start", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    call(&app, "POST", "/tasks", Some(json!({"title": "Late task"}))).await;
    let (status, body) = call(&app, "POST", "/reload", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cycle"]["phase"], "idle");
    assert_eq!(body["cycle"]["open_tasks"], 1);
}
