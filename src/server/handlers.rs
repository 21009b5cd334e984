//! HTTP request handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::AppState;
use super::response;
use crate::types::{ChatRequest, Mode};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct MessageRequest {
    #[serde(default)]
    message: String,
    #[serde(default)]
    mode: Option<String>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    reply: String,
    provider: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    providers: Vec<String>,
    total_providers: usize,
}

#[derive(Serialize)]
pub struct VersionResponse {
    version: &'static str,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/message
pub async fn post_message(
    State(state): State<AppState>,
    body: Result<Json<MessageRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return response::bad_request(format!("Invalid request body: {}", rejection.body_text()))
                .into_response();
        }
    };

    let raw_mode = req.mode.as_deref().unwrap_or(Mode::default().as_str());
    let request = match ChatRequest::parse(&req.message, raw_mode) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "rejected chat request");
            return e.into_response();
        }
    };

    match state.orchestrator.dispatch(&request).await {
        Ok(reply) => (
            StatusCode::OK,
            Json(MessageResponse {
                reply: reply.text,
                provider: reply.provider_used,
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let registry = state.orchestrator.registry();
    let status = if registry.is_empty() {
        "degraded"
    } else {
        "healthy"
    };
    Json(HealthResponse {
        status,
        providers: registry.names(),
        total_providers: registry.len(),
    })
}

/// GET /livez
pub async fn livez() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// GET /version
pub async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: crate::PKG_VERSION,
    })
}
