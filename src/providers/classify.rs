//! Mapping of HTTP outcomes to [`ProviderFailure`] variants.
//!
//! Shared by every adapter so the same provider response always maps to
//! the same failure kind.

use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::types::ProviderFailure;

/// Body substrings that mark a quota or rate-limit rejection.
const QUOTA_MARKERS: &[&str] = &[
    "quota",
    "rate limit",
    "rate_limit",
    "limit exceeded",
    "resource_exhausted",
];

/// Body substrings that mark a credential rejection on a non-401 status.
const AUTH_MARKERS: &[&str] = &["api key not valid", "api_key_invalid", "invalid api key"];

/// Longest error body excerpt kept in a failure detail.
const MAX_DETAIL_LEN: usize = 200;

/// Classify a non-success status and its body.
///
/// Pure function of its inputs.
pub fn classify_status(status: u16, body: &str) -> ProviderFailure {
    let detail = excerpt(body);
    match status {
        401 | 403 => ProviderFailure::AuthFailure(format!("HTTP {status}: {detail}")),
        402 | 429 => ProviderFailure::QuotaExceeded(format!("HTTP {status}: {detail}")),
        _ => {
            let lower = body.to_lowercase();
            if QUOTA_MARKERS.iter().any(|m| lower.contains(m)) {
                ProviderFailure::QuotaExceeded(format!("HTTP {status}: {detail}"))
            } else if AUTH_MARKERS.iter().any(|m| lower.contains(m)) {
                ProviderFailure::AuthFailure(format!("HTTP {status}: {detail}"))
            } else {
                ProviderFailure::Upstream {
                    status,
                    message: detail,
                }
            }
        }
    }
}

/// Classify a transport-level error (connect, timeout, body read).
pub fn transport_failure(err: reqwest::Error) -> ProviderFailure {
    if err.is_timeout() {
        ProviderFailure::NetworkError(format!("request timed out: {err}"))
    } else {
        ProviderFailure::NetworkError(err.to_string())
    }
}

/// Read a response fully and decode it as `T`.
///
/// Non-success statuses go through [`classify_status`] even when the error
/// body cannot be read; the status alone decides in that case. A success
/// body that fails to arrive is a `NetworkError`, one that does not decode
/// is a `MalformedResponse`.
pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ProviderFailure> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(classify_status(status.as_u16(), &body));
    }

    let body = response.text().await.map_err(transport_failure)?;
    serde_json::from_str(&body).map_err(|e| ProviderFailure::MalformedResponse(e.to_string()))
}

/// Reject empty or whitespace-only replies.
pub fn non_empty(text: String) -> Result<String, ProviderFailure> {
    if text.trim().is_empty() {
        Err(ProviderFailure::MalformedResponse(
            "empty reply text".to_string(),
        ))
    } else {
        Ok(text)
    }
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_DETAIL_LEN) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
