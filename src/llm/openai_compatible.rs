// ABOUTME: Generic OpenAI-compatible text-generation adapter for cloud and local endpoints
// ABOUTME: Supports OpenAI, Ollama, vLLM, LocalAI and any chat-completions compatible API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `OpenAI`-Compatible Provider
//!
//! One adapter for every endpoint speaking the `OpenAI` chat completions
//! protocol: the `OpenAI` cloud itself and local servers.
//!
//! ## Supported Backends
//!
//! - **`OpenAI`**: <https://api.openai.com/v1> (API key required)
//! - **Ollama**: <http://localhost:11434/v1>
//! - **vLLM**: <http://localhost:8000/v1>
//! - **`LocalAI`**: <http://localhost:8080/v1>

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

use super::error::{classify_http_status, classify_transport_error, parse_retry_after, truncate_body};
use super::{GenerationOptions, LlmCapabilities, LlmProvider, ProviderError};

// ============================================================================
// Configuration Constants
// ============================================================================

/// `OpenAI` cloud endpoint
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model on the `OpenAI` cloud
const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default local base URL (Ollama)
pub const LOCAL_BASE_URL: &str = "http://localhost:11434/v1";

/// Default model for local inference
const LOCAL_DEFAULT_MODEL: &str = "qwen2.5:14b-instruct";

/// Connection timeout for local servers (more lenient than cloud)
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Request timeout (local inference can be slower)
const REQUEST_TIMEOUT_SECS: u64 = 300;

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Configuration for the `OpenAI`-compatible provider
#[derive(Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL for the API (e.g., <http://localhost:11434/v1>)
    pub base_url: String,
    /// API key (optional for local servers)
    pub api_key: Option<String>,
    /// Default model to use
    pub default_model: String,
    /// Provider name for logging
    pub provider_name: &'static str,
    /// Provider display name
    pub display_name: &'static str,
    /// Capabilities of this provider
    pub capabilities: LlmCapabilities,
}

impl OpenAiCompatibleConfig {
    /// Configuration for the `OpenAI` cloud
    #[must_use]
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            base_url: OPENAI_BASE_URL.to_owned(),
            api_key: Some(api_key.into()),
            default_model: OPENAI_DEFAULT_MODEL.to_owned(),
            provider_name: "openai",
            display_name: "OpenAI",
            capabilities: LlmCapabilities::JSON_MODE,
        }
    }

    /// Configuration for a local server, display name guessed from the port
    #[must_use]
    pub fn local(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let (provider_name, display_name, capabilities) = if base_url.contains(":11434") {
            ("ollama", "Ollama (Local)", LlmCapabilities::JSON_MODE)
        } else if base_url.contains(":8000") {
            ("vllm", "vLLM (Local)", LlmCapabilities::JSON_MODE)
        } else if base_url.contains(":8080") {
            ("localai", "LocalAI", LlmCapabilities::empty())
        } else {
            ("local", "Local LLM", LlmCapabilities::empty())
        };

        Self {
            base_url,
            api_key: None,
            default_model: LOCAL_DEFAULT_MODEL.to_owned(),
            provider_name,
            display_name,
            capabilities: capabilities | LlmCapabilities::LOCAL,
        }
    }
}

impl fmt::Debug for OpenAiCompatibleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiCompatibleConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("default_model", &self.default_model)
            .field("provider_name", &self.provider_name)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

impl Default for OpenAiCompatibleConfig {
    fn default() -> Self {
        Self::local(LOCAL_BASE_URL)
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Generic `OpenAI`-compatible provider
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                ProviderError::configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        info!(
            "Initializing {} provider: base_url={}, model={}",
            config.display_name, config.base_url, config.default_model
        );

        Ok(Self { client, config })
    }

    /// Provider configuration
    #[must_use]
    pub const fn config(&self) -> &OpenAiCompatibleConfig {
        &self.config
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    /// Add authorization header if API key is configured
    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.api_key {
            Some(ref api_key) if !api_key.is_empty() => request.bearer_auth(api_key),
            _ => request,
        }
    }

    fn error_message(body: &str) -> String {
        serde_json::from_str::<OpenAiErrorResponse>(body)
            .map_or_else(|_| truncate_body(body), |r| r.error.message)
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        self.config.provider_name
    }

    fn display_name(&self) -> &'static str {
        self.config.display_name
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.config.capabilities
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, prompt, options), fields(provider = self.config.provider_name, model = %options.model.as_deref().unwrap_or(&self.config.default_model)))]
    async fn generate_text(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, ProviderError> {
        let provider = self.config.provider_name;
        let model = options
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);

        let request = OpenAiRequest {
            model,
            messages: vec![OpenAiMessage {
                role: "user",
                content: prompt,
            }],
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            response_format: self
                .config
                .capabilities
                .supports_json_mode()
                .then_some(ResponseFormat {
                    format_type: "json_object",
                }),
        };

        debug!(prompt_chars = prompt.len(), "Sending chat completion request");

        let response = self
            .add_auth_header(self.client.post(self.api_url("chat/completions")))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(base_url = %self.config.base_url, error = %e, "Failed to reach endpoint");
                classify_transport_error(provider, e)
            })?;

        let status = response.status();
        let retry_after = parse_retry_after(response.headers());
        let body = response
            .text()
            .await
            .map_err(|e| classify_transport_error(provider, e))?;

        if !status.is_success() {
            error!(status = %status, "{} API error", self.config.display_name);
            return Err(classify_http_status(
                provider,
                status.as_u16(),
                &Self::error_message(&body),
                retry_after,
            ));
        }

        let parsed: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::unknown(provider, format!("Failed to decode response: {e}"))
                .with_source(e)
        })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::unknown(provider, "API returned no choices"))?;

        let content = choice.message.content.unwrap_or_default();
        debug!(
            chars = content.len(),
            finish_reason = ?choice.finish_reason,
            "Received chat completion"
        );

        Ok(content)
    }
}
