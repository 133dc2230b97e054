// ABOUTME: Tests for the provider failure taxonomy, HTTP classification and provider factory
// ABOUTME: Retryability per kind, Retry-After parsing, backend selection and app error mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::error::Error as StdError;
use std::io;
use std::time::Duration;

use pierre_meal_planner::config::{GenerationConfig, ProviderType};
use pierre_meal_planner::errors::{AppError, ErrorCode};
use pierre_meal_planner::llm::{
    classify_http_status, create_provider, parse_retry_after, LlmCapabilities, LlmProvider,
    OpenAiCompatibleConfig, ProviderError, ProviderErrorKind,
};
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};

// ============================================================================
// Kinds And Retryability
// ============================================================================

#[test]
fn test_retryable_kinds() {
    assert!(ProviderError::network("groq", "reset").is_retryable());
    assert!(ProviderError::rate_limited("groq", "slow", None).is_retryable());

    assert!(!ProviderError::invalid_credentials("groq", "bad").is_retryable());
    assert!(!ProviderError::parsing("bad json", "raw").is_retryable());
    assert!(!ProviderError::validation(None, "bad").is_retryable());
    assert!(!ProviderError::configuration("missing").is_retryable());
    assert!(!ProviderError::unknown("groq", "odd").is_retryable());
}

#[test]
fn test_kind_serializes_kebab_case() {
    let json = serde_json::to_string(&ProviderErrorKind::InvalidCredentials).unwrap();
    assert_eq!(json, "\"invalid-credentials\"");
    assert_eq!(ProviderErrorKind::RateLimited.to_string(), "rate-limited");
}

#[test]
fn test_parsing_error_keeps_raw_and_previews_display() {
    let raw = "x".repeat(1000);
    let err = ProviderError::parsing("no object", raw.clone());
    assert_eq!(err.raw_text(), Some(raw.as_str()));
    assert!(err.to_string().len() < 400);
    assert!(err.to_string().ends_with("...)"));
}

#[test]
fn test_source_is_preserved() {
    let err = ProviderError::network("gemini", "down")
        .with_source(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
    let source = err.source().unwrap();
    assert_eq!(source.to_string(), "refused");
}

// ============================================================================
// HTTP Classification
// ============================================================================

#[test]
fn test_status_classification() {
    let cases = [
        (401, ProviderErrorKind::InvalidCredentials),
        (403, ProviderErrorKind::InvalidCredentials),
        (429, ProviderErrorKind::RateLimited),
        (408, ProviderErrorKind::Network),
        (500, ProviderErrorKind::Network),
        (503, ProviderErrorKind::Network),
        (400, ProviderErrorKind::Unknown),
        (404, ProviderErrorKind::Unknown),
    ];
    for (status, kind) in cases {
        assert_eq!(
            classify_http_status("groq", status, "message", None).kind(),
            kind,
            "status {status}"
        );
    }
}

#[test]
fn test_unclassified_status_is_not_retryable() {
    let err = classify_http_status("groq", 422, "unprocessable", None);
    assert!(!err.is_retryable());
    match err {
        ProviderError::Unknown { status, .. } => assert_eq!(status, Some(422)),
        other => panic!("expected unknown, got {other:?}"),
    }
}

#[test]
fn test_rate_limit_carries_retry_after() {
    let err = classify_http_status("groq", 429, "slow down", Some(Duration::from_secs(7)));
    match err {
        ProviderError::RateLimited { retry_after, .. } => {
            assert_eq!(retry_after, Some(Duration::from_secs(7)));
        }
        other => panic!("expected rate limited, got {other:?}"),
    }
}

#[test]
fn test_parse_retry_after_header() {
    let mut headers = HeaderMap::new();
    assert_eq!(parse_retry_after(&headers), None);

    headers.insert(RETRY_AFTER, HeaderValue::from_static("12"));
    assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(12)));

    headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
    assert_eq!(parse_retry_after(&headers), None);
}

// ============================================================================
// Provider Factory
// ============================================================================

#[test]
fn test_provider_type_parsing() {
    assert_eq!("groq".parse::<ProviderType>().unwrap(), ProviderType::Groq);
    assert_eq!("Gemini".parse::<ProviderType>().unwrap(), ProviderType::Gemini);
    assert_eq!("google".parse::<ProviderType>().unwrap(), ProviderType::Gemini);
    assert_eq!("openai".parse::<ProviderType>().unwrap(), ProviderType::OpenAi);
    assert_eq!("ollama".parse::<ProviderType>().unwrap(), ProviderType::Local);

    let err = "claude-on-a-toaster".parse::<ProviderType>().unwrap_err();
    assert_eq!(err.kind(), ProviderErrorKind::Configuration);
}

#[test]
fn test_cloud_provider_requires_key() {
    let config = GenerationConfig::new(ProviderType::Groq, None);
    let err = create_provider(&config).unwrap_err();
    assert_eq!(err.kind(), ProviderErrorKind::Configuration);
    assert!(err.to_string().contains("GROQ_API_KEY"));

    let blank = GenerationConfig::new(ProviderType::Gemini, Some("   ".to_owned()));
    assert!(create_provider(&blank).is_err());
}

#[test]
fn test_create_each_backend() {
    let groq = create_provider(&GenerationConfig::new(ProviderType::Groq, Some("gsk".into())))
        .unwrap();
    assert_eq!(groq.name(), "groq");
    assert_eq!(groq.provider_type(), ProviderType::Groq);

    let gemini =
        create_provider(&GenerationConfig::new(ProviderType::Gemini, Some("key".into()))).unwrap();
    assert_eq!(gemini.name(), "gemini");
    assert!(gemini.capabilities().supports_json_mode());

    let openai =
        create_provider(&GenerationConfig::new(ProviderType::OpenAi, Some("sk".into()))).unwrap();
    assert_eq!(openai.provider_type(), ProviderType::OpenAi);
    assert!(!openai.capabilities().is_local());

    let local = create_provider(&GenerationConfig::new(ProviderType::Local, None)).unwrap();
    assert_eq!(local.provider_type(), ProviderType::Local);
    assert_eq!(local.name(), "ollama");
}

#[test]
fn test_model_override_applied() {
    let mut config = GenerationConfig::new(ProviderType::Groq, Some("gsk".into()));
    config.model = Some("llama-3.1-8b-instant".to_owned());
    let provider = create_provider(&config).unwrap();
    assert_eq!(provider.default_model(), "llama-3.1-8b-instant");
}

#[test]
fn test_local_server_detection() {
    let vllm = OpenAiCompatibleConfig::local("http://localhost:8000/v1");
    assert_eq!(vllm.provider_name, "vllm");
    assert!(vllm.capabilities.contains(LlmCapabilities::LOCAL));
    assert_eq!(
        vllm.capabilities,
        LlmCapabilities::JSON_MODE | LlmCapabilities::LOCAL
    );

    let localai = OpenAiCompatibleConfig::local("http://localhost:8080/v1");
    assert_eq!(localai.provider_name, "localai");
    assert!(!localai.capabilities.supports_json_mode());

    let ollama = OpenAiCompatibleConfig::default();
    assert_eq!(ollama.provider_name, "ollama");
}

#[test]
fn test_debug_output_redacts_key() {
    let config = GenerationConfig::new(ProviderType::Groq, Some("gsk-secret-value".into()));
    assert!(!format!("{config:?}").contains("gsk-secret-value"));
    let provider = create_provider(&config).unwrap();
    assert!(!format!("{provider:?}").contains("gsk-secret-value"));
}

// ============================================================================
// Application Error Mapping
// ============================================================================

#[test]
fn test_app_error_codes_follow_kind() {
    let cases = [
        (ProviderError::invalid_credentials("p", "m"), ErrorCode::ExternalAuthFailed),
        (ProviderError::rate_limited("p", "m", None), ErrorCode::ExternalRateLimited),
        (ProviderError::network("p", "m"), ErrorCode::ExternalServiceUnavailable),
        (ProviderError::parsing("m", "raw"), ErrorCode::ExternalResponseInvalid),
        (ProviderError::validation(Some("servings"), "m"), ErrorCode::InvalidInput),
        (ProviderError::configuration("m"), ErrorCode::ConfigError),
        (ProviderError::unknown("p", "m"), ErrorCode::ExternalServiceError),
    ];
    for (error, code) in cases {
        assert_eq!(AppError::from(error).code, code);
    }
}
