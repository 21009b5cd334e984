//! Wire-level tests for each provider adapter against a mock server.
//!
//! Every adapter must map the same HTTP outcomes to the same failure kinds:
//! 401/403 → auth, 429 → quota, garbage 200 → malformed, empty 200 →
//! malformed, refused connection → network.

use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use munez::providers::{GeminiAdapter, HuggingFaceAdapter, OpenAiCompatibleAdapter};
use munez::{ChatAdapter, FailureKind, Mode};

const GROQ_MODEL: &str = "llama-3.3-70b-versatile";
const HF_MODEL: &str = "meta-llama/Meta-Llama-3-70B-Instruct";
const GEMINI_MODEL: &str = "gemini-flash-latest";

fn groq(base: &str) -> OpenAiCompatibleAdapter {
    OpenAiCompatibleAdapter::new("Groq", Client::new(), base, "test_key", GROQ_MODEL)
}

fn huggingface(base: &str) -> HuggingFaceAdapter {
    HuggingFaceAdapter::new("Hugging Face", Client::new(), base, "test_key", HF_MODEL)
}

fn gemini(base: &str) -> GeminiAdapter {
    GeminiAdapter::new("Gemini", Client::new(), base, "test_key", GEMINI_MODEL)
}

fn completion(content: serde_json::Value) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
}

async fn failure_kind(adapter: &dyn ChatAdapter) -> FailureKind {
    adapter
        .call("hello", Mode::Chat)
        .await
        .expect_err("expected a failed attempt")
        .kind()
}

// ============================================================================
// OpenAI-compatible (Groq / Together AI)
// ============================================================================

#[tokio::test]
async fn openai_compat_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test_key"))
        .and(body_partial_json(json!({
            "model": GROQ_MODEL,
            "messages": [
                {"role": "system", "content": Mode::Summarize.instruction()},
                {"role": "user", "content": "long article"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!("**Summary**"))))
        .expect(1)
        .mount(&server)
        .await;

    let reply = groq(&server.uri())
        .call("long article", Mode::Summarize)
        .await
        .unwrap();
    assert_eq!(reply, "**Summary**");
}

#[tokio::test]
async fn openai_compat_status_mapping() {
    for (status, expected) in [
        (401, FailureKind::AuthFailure),
        (403, FailureKind::AuthFailure),
        (429, FailureKind::QuotaExceeded),
        (500, FailureKind::UpstreamError),
    ] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_string("nope"))
            .mount(&server)
            .await;

        assert_eq!(
            failure_kind(&groq(&server.uri())).await,
            expected,
            "status {status}"
        );
    }
}

#[tokio::test]
async fn openai_compat_quota_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"message": "Rate limit reached for model", "type": "tokens"}
        })))
        .mount(&server)
        .await;

    assert_eq!(
        failure_kind(&groq(&server.uri())).await,
        FailureKind::QuotaExceeded
    );
}

#[tokio::test]
async fn openai_compat_garbage_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    assert_eq!(
        failure_kind(&groq(&server.uri())).await,
        FailureKind::MalformedResponse
    );
}

#[tokio::test]
async fn openai_compat_empty_choices_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    assert_eq!(
        failure_kind(&groq(&server.uri())).await,
        FailureKind::MalformedResponse
    );
}

#[tokio::test]
async fn openai_compat_whitespace_reply_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!("  \n "))))
        .mount(&server)
        .await;

    assert_eq!(
        failure_kind(&groq(&server.uri())).await,
        FailureKind::MalformedResponse
    );
}

#[tokio::test]
async fn connection_refused_is_network_error() {
    let adapter = groq("http://127.0.0.1:1");
    assert_eq!(failure_kind(&adapter).await, FailureKind::NetworkError);
}

#[tokio::test]
async fn client_timeout_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion(json!("late")))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let http = Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let adapter = OpenAiCompatibleAdapter::new("Groq", http, server.uri(), "k", GROQ_MODEL);
    assert_eq!(failure_kind(&adapter).await, FailureKind::NetworkError);
}

// ============================================================================
// Truncated bodies
// ============================================================================

/// Serve one response that promises a 500-byte body, sends a few bytes of
/// it and closes the connection.
async fn truncated_server(status_line: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        read_request(&mut socket).await;
        let head = format!(
            "HTTP/1.1 {status_line}\r\n\
             Content-Type: application/json\r\n\
             Content-Length: 500\r\n\
             \r\n\
             {{\"error\": {{"
        );
        let _ = socket.write_all(head.as_bytes()).await;
        let _ = socket.shutdown().await;
    });

    format!("http://{addr}")
}

/// Consume request headers and the body they announce.
async fn read_request(socket: &mut tokio::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let Ok(n) = socket.read(&mut chunk).await else {
            return;
        };
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                return;
            }
        }
    }
}

#[tokio::test]
async fn truncated_error_body_keeps_status_classification() {
    for (status_line, expected) in [
        ("429 Too Many Requests", FailureKind::QuotaExceeded),
        ("401 Unauthorized", FailureKind::AuthFailure),
        ("403 Forbidden", FailureKind::AuthFailure),
    ] {
        let base = truncated_server(status_line).await;
        assert_eq!(
            failure_kind(&groq(&base)).await,
            expected,
            "{status_line}"
        );
    }
}

#[tokio::test]
async fn truncated_success_body_is_network_error() {
    let base = truncated_server("200 OK").await;
    assert_eq!(
        failure_kind(&gemini(&base)).await,
        FailureKind::NetworkError
    );
}

// ============================================================================
// Hugging Face
// ============================================================================

#[tokio::test]
async fn huggingface_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/models/{HF_MODEL}")))
        .and(header("Authorization", "Bearer test_key"))
        .and(body_partial_json(json!({
            "parameters": {"max_new_tokens": 2048, "return_full_text": false}
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"generated_text": " Hi there!"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reply = huggingface(&server.uri())
        .call("hello", Mode::Chat)
        .await
        .unwrap();
    assert_eq!(reply, " Hi there!");
}

#[tokio::test]
async fn huggingface_model_loading_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": "Model is currently loading", "estimated_time": 20.0
        })))
        .mount(&server)
        .await;

    assert_eq!(
        failure_kind(&huggingface(&server.uri())).await,
        FailureKind::UpstreamError
    );
}

#[tokio::test]
async fn huggingface_unauthorized_is_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid token"})))
        .mount(&server)
        .await;

    assert_eq!(
        failure_kind(&huggingface(&server.uri())).await,
        FailureKind::AuthFailure
    );
}

#[tokio::test]
async fn huggingface_empty_list_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    assert_eq!(
        failure_kind(&huggingface(&server.uri())).await,
        FailureKind::MalformedResponse
    );
}

// ============================================================================
// Gemini
// ============================================================================

#[tokio::test]
async fn gemini_success_joins_parts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v1beta/models/{GEMINI_MODEL}:generateContent")))
        .and(header("x-goog-api-key", "test_key"))
        .and(body_partial_json(json!({
            "systemInstruction": {"parts": [{"text": Mode::Grammar.instruction()}]},
            "contents": [{"role": "user", "parts": [{"text": "me and him goes"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "He and I go."}, {"text": " Fixed."}]},
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = gemini(&server.uri())
        .call("me and him goes", Mode::Grammar)
        .await
        .unwrap();
    assert_eq!(reply, "He and I go. Fixed.");
}

#[tokio::test]
async fn gemini_resource_exhausted_is_quota() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"code": 429, "status": "RESOURCE_EXHAUSTED"}
        })))
        .mount(&server)
        .await;

    assert_eq!(
        failure_kind(&gemini(&server.uri())).await,
        FailureKind::QuotaExceeded
    );
}

#[tokio::test]
async fn gemini_invalid_key_on_400_is_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT"
            }
        })))
        .mount(&server)
        .await;

    assert_eq!(
        failure_kind(&gemini(&server.uri())).await,
        FailureKind::AuthFailure
    );
}

#[tokio::test]
async fn gemini_blocked_candidate_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        })))
        .mount(&server)
        .await;

    assert_eq!(
        failure_kind(&gemini(&server.uri())).await,
        FailureKind::MalformedResponse
    );
}

#[tokio::test]
async fn same_response_always_same_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let adapter = gemini(&server.uri());
    for _ in 0..3 {
        assert_eq!(failure_kind(&adapter).await, FailureKind::QuotaExceeded);
    }
}
