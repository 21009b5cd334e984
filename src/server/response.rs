//! JSON error bodies for the HTTP surface.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::MunezError;
use crate::types::Attempt;

/// Body of every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<Vec<Attempt>>,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            attempts: None,
        }
    }
}

pub fn bad_request(detail: impl Into<String>) -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::BAD_REQUEST, Json(ErrorBody::new(detail)))
}

impl IntoResponse for MunezError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = match self {
            MunezError::InvalidRequest(detail) => ErrorBody::new(detail),
            MunezError::AllProvidersFailed { attempts } => ErrorBody {
                detail: "All API providers failed".to_string(),
                attempts: Some(attempts),
            },
            other => ErrorBody::new(other.to_string()),
        };
        (status, Json(body)).into_response()
    }
}
