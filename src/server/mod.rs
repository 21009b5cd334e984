//! HTTP service exposing the orchestrator to the frontend.
//!
//! This module provides:
//! - Shared application state (`AppState`)
//! - The axum router (`build_app`)
//! - Request handlers (`handlers`)
//! - Error-to-response mapping (`response`)

pub mod handlers;
pub mod response;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;

use crate::orchestrator::FallbackOrchestrator;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<FallbackOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: FallbackOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

pub fn build_app(state: AppState, request_timeout_secs: u64) -> Router {
    Router::new()
        .route("/api/message", post(handlers::post_message))
        .route("/health", get(handlers::health))
        .route("/livez", get(handlers::livez))
        .route("/version", get(handlers::version))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(request_timeout_secs),
        ))
}
