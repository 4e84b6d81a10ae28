//! API endpoint handlers
//!
//! This module implements the HTTP endpoints of the prompt proxy: chat and
//! image prompts, plus the service description and health check.

use crate::core::catalog::{ModelCatalog, PromptKind};
use crate::core::config::Config;
use crate::core::service::PromptService;
use crate::models::response::NormalizedResponse;
use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{Instrument, debug, info_span};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub service: Arc<PromptService>,
}

/// Query parameters accepted by the prompt endpoints
#[derive(Debug, Default, Deserialize)]
pub struct PromptRequest {
    pub prompt: Option<String>,
    pub model: Option<String>,
}

/// Create the API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/chat", get(chat))
        .route("/dalle", get(dalle))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Every prompt response is sent with status 200 as JSON. Plain text from the
/// upstream is written verbatim.
impl IntoResponse for NormalizedResponse {
    fn into_response(self) -> Response {
        match self {
            NormalizedResponse::PlainText(text) => {
                ([(header::CONTENT_TYPE, "application/json")], text).into_response()
            }
            other => Json(other).into_response(),
        }
    }
}

/// Undecodable query strings are treated as if no parameters were given
fn prompt_request(query: Result<Query<PromptRequest>, QueryRejection>) -> PromptRequest {
    match query {
        Ok(Query(request)) => request,
        Err(rejection) => {
            debug!("Unreadable query string: {}", rejection);
            PromptRequest::default()
        }
    }
}

/// GET /chat - Forward a chat prompt
async fn chat(
    State(state): State<AppState>,
    query: Result<Query<PromptRequest>, QueryRejection>,
) -> NormalizedResponse {
    let request = prompt_request(query);
    let span = info_span!("chat", request_id = %uuid::Uuid::new_v4());

    state
        .service
        .chatbot(request.prompt.as_deref(), request.model.as_deref())
        .instrument(span)
        .await
}

/// GET /dalle - Forward an image generation prompt
async fn dalle(
    State(state): State<AppState>,
    query: Result<Query<PromptRequest>, QueryRejection>,
) -> NormalizedResponse {
    let request = prompt_request(query);
    let span = info_span!("dalle", request_id = %uuid::Uuid::new_v4());

    state
        .service
        .generate_image(request.prompt.as_deref(), request.model.as_deref())
        .instrument(span)
        .await
}

/// GET / - Root endpoint
async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "message": concat!("Prompt Proxy v", env!("CARGO_PKG_VERSION")),
        "status": "running",
        "config": {
            "base_api": state.config.base_api,
            "request_timeout": state.config.request_timeout,
        },
        "endpoints": {
            "chat": "/chat",
            "image": "/dalle",
            "health": "/health",
        },
        "models": {
            "chat": ModelCatalog::models(PromptKind::Chat),
            "image": ModelCatalog::models(PromptKind::Image),
        },
    }))
}

/// GET /health - Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
