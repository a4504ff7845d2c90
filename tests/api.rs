mod common;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    sync::Arc,
};

use common::{harness, RecordingNotifier};
use focus_timer::{
    create_router,
    services::{Chime, ChimePlayer},
    AppState, CompletionHooks,
};
use serde_json::Value;
use tower::ServiceExt;

async fn call(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn status_reports_full_default_session() {
    let h = harness(25);
    let app = create_router(h.state.clone());

    let (status, body) = call(&app, "GET", "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["time"], "25:00");
    assert_eq!(body["timer"]["progress"], 1.0);
    assert_eq!(body["timer"]["running"], false);
    assert_eq!(body["timer"]["button"], "start");
    assert!(body["last_action"].is_null());
}

#[tokio::test]
async fn start_pause_and_toggle() {
    let h = harness(25);
    let app = create_router(h.state.clone());

    let (status, body) = call(&app, "POST", "/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["timer"]["running"], true);
    assert_eq!(body["timer"]["button"], "pause");

    let (_, body) = call(&app, "POST", "/toggle", None).await;
    assert_eq!(body["timer"]["running"], false);
    assert_eq!(body["timer"]["button"], "resume");

    let (_, body) = call(&app, "POST", "/toggle", None).await;
    assert_eq!(body["timer"]["running"], true);

    let (_, body) = call(&app, "POST", "/pause", None).await;
    assert_eq!(body["timer"]["running"], false);

    let (_, body) = call(&app, "GET", "/status", None).await;
    assert_eq!(body["last_action"], "pause");
}

#[tokio::test]
async fn invalid_duration_is_rejected_with_error_flag() {
    let h = harness(25);
    let app = create_router(h.state.clone());

    let (status, body) = call(&app, "POST", "/duration", Some(r#"{"minutes":"181"}"#)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "error");
    assert_eq!(body["timer"]["input_error"], true);
    assert_eq!(body["timer"]["total_seconds"], 1500);

    let (status, body) = call(&app, "POST", "/input", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["input_error"], false);
}

#[tokio::test]
async fn valid_duration_and_reset() {
    let h = harness(25);
    let app = create_router(h.state.clone());

    let (status, body) = call(&app, "POST", "/duration", Some(r#"{"minutes":"45"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["total_seconds"], 2700);
    assert_eq!(body["timer"]["time"], "45:00");

    call(&app, "POST", "/start", None).await;
    h.state.tick().unwrap();
    h.state.tick().unwrap();

    let (_, body) = call(&app, "POST", "/reset", None).await;
    assert_eq!(body["timer"]["remaining_seconds"], 2700);
    assert_eq!(body["timer"]["running"], false);
    assert_eq!(body["timer"]["button"], "start");
}

#[tokio::test]
async fn health_check() {
    let h = harness(25);
    let app = create_router(h.state.clone());

    let (status, body) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

struct BrokenChime;

impl ChimePlayer for BrokenChime {
    fn play(&self, _chime: &Chime) {
        panic!("audio driver crashed");
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[tokio::test]
async fn unreadable_timer_returns_500_without_snapshot() {
    let hooks = CompletionHooks {
        chime: Arc::new(BrokenChime),
        notifier: Arc::new(RecordingNotifier::default()),
    };
    let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), 1, hooks));
    state.start().unwrap();

    let crashed = catch_unwind(AssertUnwindSafe(|| {
        for _ in 0..60 {
            let _ = state.tick();
        }
    }));
    assert!(crashed.is_err());

    let app = create_router(state.clone());
    let (status, body) = call(&app, "POST", "/start", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert!(body.get("timer").is_none());
}
