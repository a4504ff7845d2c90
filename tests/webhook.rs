use std::time::Duration;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use focus_timer::services::{webhook::SESSION_COMPLETED, Completion, Notifier, WebhookNotifier, WebhookPayload};
use tokio::{net::TcpListener, sync::mpsc};

/// Start a local receiver answering every post with `reply`
async fn receiver(reply: StatusCode) -> (String, mpsc::UnboundedReceiver<WebhookPayload>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = Router::new()
        .route(
            "/hook",
            post(
                move |State(tx): State<mpsc::UnboundedSender<WebhookPayload>>,
                 Json(payload): Json<WebhookPayload>| async move {
                    let _ = tx.send(payload);
                    reply
                },
            ),
        )
        .with_state(tx);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/hook", addr), rx)
}

fn notifier(url: String) -> WebhookNotifier {
    WebhookNotifier::new(url, "sam".to_string(), "Focus Timer".to_string()).unwrap()
}

#[tokio::test]
async fn completion_is_posted_without_waiting() {
    let (url, mut rx) = receiver(StatusCode::OK).await;

    notifier(url).session_completed(&Completion::now(1500));

    let payload = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("webhook delivered")
        .unwrap();
    assert_eq!(payload.user, "sam");
    assert_eq!(payload.app, "Focus Timer");
    assert_eq!(payload.action, SESSION_COMPLETED);
    assert!(!payload.time.is_empty());
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let (url, mut rx) = receiver(StatusCode::INTERNAL_SERVER_ERROR).await;
    let notifier = notifier(url);
    let payload = WebhookPayload::session_completed("sam", "Focus Timer", &Completion::now(60));

    let result = notifier.send(&payload).await;
    assert!(result.is_err());
    assert_eq!(rx.recv().await.unwrap(), payload);
}

#[tokio::test]
async fn unreachable_endpoint_is_an_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let notifier = notifier(format!("http://{}/hook", addr));
    let payload = WebhookPayload::session_completed("sam", "Focus Timer", &Completion::now(60));
    assert!(notifier.send(&payload).await.is_err());
}
