// ABOUTME: End-to-end tests for the HTTP provider adapters against a local mock server
// ABOUTME: Request shape, response extraction and status-to-error classification per backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::time::Duration;

use pierre_meal_planner::llm::{
    GeminiProvider, GenerationOptions, GroqProvider, LlmProvider, OpenAiCompatibleConfig,
    OpenAiCompatibleProvider, ProviderError, ProviderErrorKind,
};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

// ============================================================================
// Mock Server
// ============================================================================

struct CapturedRequest {
    head: String,
    body: Value,
}

/// Serve exactly one HTTP response and hand back the request that was received
async fn serve_once(
    status: u16,
    extra_headers: &'static str,
    response_body: String,
) -> (String, oneshot::Receiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0_u8; 4096];
        let (head, body_start) = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break (String::from_utf8_lossy(&buf[..pos]).into_owned(), pos + 4);
            }
        };
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while buf.len() < body_start + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending body");
            buf.extend_from_slice(&chunk[..n]);
        }
        let body = serde_json::from_slice(&buf[body_start..body_start + content_length])
            .unwrap_or(Value::Null);

        let reply = format!(
            "HTTP/1.1 {status} Mock\r\nContent-Type: application/json\r\n{extra_headers}Content-Length: {}\r\nConnection: close\r\n\r\n{response_body}",
            response_body.len()
        );
        socket.write_all(reply.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        let _ = tx.send(CapturedRequest { head, body });
    });

    (format!("http://{addr}"), rx)
}

fn chat_completion(content: &str) -> String {
    json!({
        "choices": [{
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

fn openai_error(message: &str) -> String {
    json!({"error": {"message": message, "type": "invalid_request_error"}}).to_string()
}

// ============================================================================
// Groq
// ============================================================================

#[tokio::test]
async fn test_groq_success_and_request_shape() {
    let (base, captured) = serve_once(200, "", chat_completion("{\"name\": \"x\"}")).await;
    let provider = GroqProvider::new("gsk-test").unwrap().with_base_url(&base);

    let options = GenerationOptions::default().with_temperature(0.7).with_max_tokens(900);
    let text = provider.generate_text("make a salad", &options).await.unwrap();
    assert_eq!(text, "{\"name\": \"x\"}");

    let request = captured.await.unwrap();
    assert!(request.head.starts_with("POST /chat/completions"));
    assert!(request
        .head
        .to_lowercase()
        .contains("authorization: bearer gsk-test"));
    assert_eq!(request.body["model"], "llama-3.3-70b-versatile");
    assert_eq!(request.body["messages"][0]["content"], "make a salad");
    assert_eq!(request.body["response_format"]["type"], "json_object");
    assert_eq!(request.body["max_tokens"], 900);
}

#[tokio::test]
async fn test_groq_unauthorized_is_invalid_credentials() {
    let (base, _captured) = serve_once(401, "", openai_error("Invalid API Key")).await;
    let provider = GroqProvider::new("gsk-wrong").unwrap().with_base_url(&base);

    let err = provider
        .generate_text("prompt", &GenerationOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ProviderErrorKind::InvalidCredentials);
    assert!(err.to_string().contains("Invalid API Key"));
}

#[tokio::test]
async fn test_groq_rate_limit_reads_retry_after() {
    let (base, _captured) =
        serve_once(429, "Retry-After: 3\r\n", openai_error("Rate limit reached")).await;
    let provider = GroqProvider::new("gsk-test").unwrap().with_base_url(&base);

    let err = provider
        .generate_text("prompt", &GenerationOptions::default())
        .await
        .unwrap_err();
    match err {
        ProviderError::RateLimited { retry_after, .. } => {
            assert_eq!(retry_after, Some(Duration::from_secs(3)));
        }
        other => panic!("expected rate limited, got {other:?}"),
    }
}

#[tokio::test]
async fn test_groq_server_error_is_network() {
    let (base, _captured) = serve_once(503, "", "upstream unavailable".to_owned()).await;
    let provider = GroqProvider::new("gsk-test").unwrap().with_base_url(&base);

    let err = provider
        .generate_text("prompt", &GenerationOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ProviderErrorKind::Network);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_groq_undecodable_envelope_is_unknown() {
    let (base, _captured) = serve_once(200, "", "<html>gateway</html>".to_owned()).await;
    let provider = GroqProvider::new("gsk-test").unwrap().with_base_url(&base);

    let err = provider
        .generate_text("prompt", &GenerationOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ProviderErrorKind::Unknown);
}

#[test]
fn test_groq_rejects_empty_key() {
    let err = GroqProvider::new("").unwrap_err();
    assert_eq!(err.kind(), ProviderErrorKind::Configuration);
}

#[tokio::test]
async fn test_connection_refused_is_network() {
    // Bind then drop to get a port with nothing listening
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let provider = GroqProvider::new("gsk-test")
        .unwrap()
        .with_base_url(format!("http://{addr}"));
    let err = provider
        .generate_text("prompt", &GenerationOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ProviderErrorKind::Network);
}

// ============================================================================
// Gemini
// ============================================================================

#[tokio::test]
async fn test_gemini_success_and_request_shape() {
    let body = json!({
        "candidates": [{
            "content": {"parts": [{"text": "{\"name\": \"soup\"}"}]},
            "finishReason": "STOP"
        }]
    })
    .to_string();
    let (base, captured) = serve_once(200, "", body).await;
    let provider = GeminiProvider::new("g-key").unwrap().with_base_url(&base);

    let text = provider
        .generate_text("make soup", &GenerationOptions::default().with_model("gemini-test"))
        .await
        .unwrap();
    assert_eq!(text, "{\"name\": \"soup\"}");

    let request = captured.await.unwrap();
    assert!(request
        .head
        .starts_with("POST /models/gemini-test:generateContent"));
    assert!(request.head.to_lowercase().contains("x-goog-api-key: g-key"));
    assert_eq!(request.body["contents"][0]["parts"][0]["text"], "make soup");
    assert_eq!(
        request.body["generationConfig"]["responseMimeType"],
        "application/json"
    );
}

#[tokio::test]
async fn test_gemini_empty_candidates_is_unknown() {
    let (base, _captured) = serve_once(200, "", json!({"candidates": []}).to_string()).await;
    let provider = GeminiProvider::new("g-key").unwrap().with_base_url(&base);

    let err = provider
        .generate_text("prompt", &GenerationOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ProviderErrorKind::Unknown);
}

#[tokio::test]
async fn test_gemini_forbidden_is_invalid_credentials() {
    let body = json!({"error": {"code": 403, "message": "API key not valid"}}).to_string();
    let (base, _captured) = serve_once(403, "", body).await;
    let provider = GeminiProvider::new("g-key").unwrap().with_base_url(&base);

    let err = provider
        .generate_text("prompt", &GenerationOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ProviderErrorKind::InvalidCredentials);
}

// ============================================================================
// OpenAI-Compatible
// ============================================================================

#[tokio::test]
async fn test_local_server_without_key() {
    let (base, captured) = serve_once(200, "", chat_completion("{}")).await;
    let provider = OpenAiCompatibleProvider::new(OpenAiCompatibleConfig::local(&base)).unwrap();

    let text = provider
        .generate_text("prompt", &GenerationOptions::default())
        .await
        .unwrap();
    assert_eq!(text, "{}");

    let request = captured.await.unwrap();
    assert!(!request.head.to_lowercase().contains("authorization:"));
}

#[tokio::test]
async fn test_openai_bad_request_is_unknown_with_status() {
    let (base, _captured) = serve_once(400, "", openai_error("context length exceeded")).await;
    let mut config = OpenAiCompatibleConfig::openai("sk-test");
    config.base_url = base;
    let provider = OpenAiCompatibleProvider::new(config).unwrap();

    let err = provider
        .generate_text("prompt", &GenerationOptions::default())
        .await
        .unwrap_err();
    match err {
        ProviderError::Unknown { status, retryable, .. } => {
            assert_eq!(status, Some(400));
            assert!(!retryable);
        }
        other => panic!("expected unknown, got {other:?}"),
    }
}
