//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc, time::Duration};
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::Stream;
use tracing::{error, info, warn};

use crate::{
    error::TimerError,
    state::{AppState, TimerSnapshot},
};
use super::responses::{ApiResponse, DurationRequest, HealthResponse, StatusResponse};

type ApiResult = Result<Json<ApiResponse>, (StatusCode, Json<ApiResponse>)>;

/// Map a controller result onto an HTTP response
fn respond(result: Result<TimerSnapshot, TimerError>, message: &str, state: &AppState) -> ApiResult {
    match result {
        Ok(timer) => {
            info!("{}", message);
            Ok(Json(ApiResponse::ok(message.to_string(), timer)))
        }
        Err(e @ TimerError::InvalidDuration { .. }) => {
            warn!("{}", e);
            match state.snapshot() {
                Ok(timer) => Err((
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(ApiResponse::error(e.to_string(), timer)),
                )),
                Err(e) => Err(internal_error(e)),
            }
        }
        Err(e) => Err(internal_error(e)),
    }
}

fn internal_error(e: TimerError) -> (StatusCode, Json<ApiResponse>) {
    error!("Timer operation failed: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::failure(e.to_string())),
    )
}

/// Handle POST /start - Start or resume the timer
pub async fn start_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    respond(state.start(), "Timer started", &state)
}

/// Handle POST /pause - Pause the timer
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    respond(state.pause(), "Timer paused", &state)
}

/// Handle POST /toggle - Pause when running, otherwise start
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    respond(state.toggle(), "Timer toggled", &state)
}

/// Handle POST /reset - Refill the current session
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    respond(state.reset(), "Timer reset", &state)
}

/// Handle POST /duration - Set a custom session length
pub async fn duration_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DurationRequest>,
) -> ApiResult {
    respond(state.set_duration(&request.minutes), "Session length updated", &state)
}

/// Handle POST /input - The duration field was edited
pub async fn input_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    respond(state.clear_input_error(), "Input error cleared", &state)
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.snapshot() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /events - Stream timer snapshots as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut snapshots = state.subscribe();

    let stream = async_stream::stream! {
        loop {
            let json = serde_json::to_string(&*snapshots.borrow_and_update());
            match json {
                Ok(json) => yield Ok(Event::default().event("timer").data(json)),
                Err(e) => warn!("Failed to encode timer snapshot: {}", e),
            }

            if snapshots.changed().await.is_err() {
                break;
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
