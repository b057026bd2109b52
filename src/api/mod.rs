//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/time", post(add_time_handler))
        .route("/reset", post(reset_handler))
        .route("/start", post(start_handler))
        .route("/stop", post(stop_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{
        state::{TimerController, TimerStatus},
        tasks::CountdownEngine,
    };

    fn router() -> Router {
        let timer = TimerController::new(CountdownEngine::default(), Some(99 * 3600 + 59 * 60 + 59));
        create_router(Arc::new(AppState::new(timer, 0, "127.0.0.1".to_string())))
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn add_time_updates_display() {
        let app = router();

        let (status, body) = call(&app, "POST", "/time", Some(json!({"amount": 1, "unit": "hours"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timer"]["total_seconds"], 3600);

        call(&app, "POST", "/time", Some(json!({"amount": 1, "unit": "minutes"}))).await;
        call(&app, "POST", "/time", Some(json!({"amount": 1, "unit": "seconds"}))).await;

        let (status, body) = call(&app, "GET", "/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timer"]["display"], "01:01:01");
        assert_eq!(body["timer"]["status"], "IDLE");
        assert_eq!(body["timer"]["controls"]["stop"], false);
        assert_eq!(body["last_action"], "add-time");
    }

    #[tokio::test]
    async fn invalid_amount_is_unprocessable() {
        let app = router();

        let (status, body) = call(&app, "POST", "/time", Some(json!({"amount": -5, "unit": "seconds"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status"], "error");

        let (status, _) = call(&app, "POST", "/time", Some(json!({"amount": 100, "unit": "hours"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test(start_paused = true)]
    async fn running_timer_rejects_configuration() {
        let app = router();
        call(&app, "POST", "/time", Some(json!({"amount": 5, "unit": "minutes"}))).await;

        let (status, body) = call(&app, "POST", "/start", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timer"]["status"], serde_json::to_value(TimerStatus::Running).unwrap());
        assert_eq!(body["timer"]["display"], "00:05:00.0");

        for (method, uri, payload) in [
            ("POST", "/start", None),
            ("POST", "/reset", None),
            ("POST", "/time", Some(json!({"amount": 1, "unit": "seconds"}))),
        ] {
            let (status, _) = call(&app, method, uri, payload).await;
            assert_eq!(status, StatusCode::CONFLICT, "{} {}", method, uri);
        }

        let (status, body) = call(&app, "POST", "/stop", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timer"]["display"], "00:05:00");

        let (status, _) = call(&app, "POST", "/stop", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn stop_while_idle_is_not_recorded() {
        let app = router();
        call(&app, "POST", "/time", Some(json!({"amount": 5, "unit": "seconds"}))).await;

        let (status, body) = call(&app, "POST", "/stop", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Timer already idle");

        let (_, body) = call(&app, "GET", "/status", None).await;
        assert_eq!(body["last_action"], "add-time");
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = call(&router(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
