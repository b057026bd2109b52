//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{error::TimerError, state::AppState};
use super::responses::{AddTimeRequest, ApiResponse, ErrorResponse, HealthResponse, StatusResponse};

type Rejection = (StatusCode, Json<ErrorResponse>);
type ApiResult = Result<Json<ApiResponse>, Rejection>;

/// Map a controller error to an HTTP status and body
fn reject(action: &str, e: TimerError) -> Rejection {
    let status = match e {
        TimerError::InvalidState { .. } => StatusCode::CONFLICT,
        TimerError::InvalidArgument(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TimerError::NoRuntime | TimerError::Poisoned(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!("{} failed: {}", action, e);
    } else {
        warn!("{} rejected: {}", action, e);
    }
    (status, Json(ErrorResponse::new(e.to_string())))
}

/// Build the success response for an accepted intent
fn accepted(state: &AppState, action: &str, message: String) -> ApiResult {
    state.record_action(action);
    let snapshot = state.timer.snapshot().map_err(|e| reject(action, e))?;
    Ok(Json(ApiResponse::new(message, snapshot)))
}

/// Handle POST /time - Add an increment to the configured duration
pub async fn add_time_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddTimeRequest>,
) -> ApiResult {
    let total = state
        .timer
        .on_add_time(request.amount, request.unit)
        .map_err(|e| reject("add-time", e))?;

    info!("Add time endpoint called - duration is {}s", total);
    accepted(&state, "add-time", format!("Duration set to {}s", total))
}

/// Handle POST /reset - Clear the configured duration
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    state.timer.on_reset().map_err(|e| reject("reset", e))?;

    info!("Reset endpoint called");
    accepted(&state, "reset", "Duration reset".to_string())
}

/// Handle POST /start - Start the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    state.timer.on_start().map_err(|e| reject("start", e))?;

    info!("Start endpoint called - countdown started");
    accepted(&state, "start", "Countdown started".to_string())
}

/// Handle POST /stop - Cancel the countdown
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    let stopped = state.timer.on_stop().map_err(|e| reject("stop", e))?;

    info!("Stop endpoint called");
    if stopped {
        return accepted(&state, "stop", "Countdown stopped".to_string());
    }

    let snapshot = state.timer.snapshot().map_err(|e| reject("stop", e))?;
    Ok(Json(ApiResponse::new("Timer already idle", snapshot)))
}

/// Handle GET /status - Return current timer state
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, Rejection> {
    let timer = state.timer.snapshot().map_err(|e| reject("status", e))?;
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

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
