//! HTTP adapter over the session store.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use calbot_application::SessionStore;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
    #[serde(default = "default_session_id")]
    session_id: String,
}

fn default_session_id() -> String {
    "default".to_string()
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    response: String,
    session_id: String,
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
    message: String,
}

impl StatusResponse {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok",
            message: message.into(),
        }
    }
}

/// Error body in the `{"detail": ...}` shape.
struct ApiError {
    status: StatusCode,
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

pub fn router(store: Arc<SessionStore>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/chat", post(chat))
        .route("/sessions/{session_id}", delete(reset_session))
        .with_state(store)
}

/// Binds `addr` and serves until the process is stopped.
pub async fn run(store: Arc<SessionStore>, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(addr, "Serving Cal.com AI Chatbot");

    axum::serve(listener, router(store))
        .await
        .context("HTTP server failed")
}

async fn health_check() -> Json<StatusResponse> {
    Json(StatusResponse::ok("Cal.com AI Chatbot is running."))
}

async fn chat(
    State(store): State<Arc<SessionStore>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if request.message.trim().is_empty() {
        return Err(ApiError {
            status: StatusCode::BAD_REQUEST,
            detail: "Message must not be empty.".to_string(),
        });
    }

    let reply = store
        .send(&request.session_id, &request.message)
        .await
        .map_err(|err| {
            tracing::error!(session_id = %request.session_id, "Chat turn failed: {}", err);
            ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                detail: err.to_string(),
            }
        })?;

    Ok(Json(ChatResponse {
        response: reply,
        session_id: request.session_id,
    }))
}

async fn reset_session(
    State(store): State<Arc<SessionStore>>,
    Path(session_id): Path<String>,
) -> Json<StatusResponse> {
    store.reset(&session_id).await;
    Json(StatusResponse::ok(format!(
        "Session '{session_id}' has been reset."
    )))
}
