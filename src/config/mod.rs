// ABOUTME: Configuration for recipe generation: provider selection, credentials and retry tuning
// ABOUTME: Explicit configuration values with an optional environment loader and validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for the meal planner
//!
//! Every component receives its configuration as an explicit value at
//! construction time:
//!
//! - **Generation**: provider backend, credential, model overrides and retry tuning
//! - **Prompts**: role statement, diet/meal/difficulty text tables and output schema
//! - **Allocation**: per-meal weights and adjustments (re-exported from `pierre-nutrition`)
//!
//! [`GenerationConfig::from_env`] is a convenience loader for binaries; library
//! code never reads the environment on its own.

/// Prompt text tables and output schema template
pub mod prompts;

pub use prompts::PromptConfig;
pub use pierre_nutrition::AllocationConfig;

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use crate::llm::ProviderError;

// ============================================================================
// Provider Selection
// ============================================================================

/// Supported text-generation backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Groq LPU inference for Llama models (default)
    #[default]
    Groq,
    /// Google Gemini
    Gemini,
    /// `OpenAI` cloud
    OpenAi,
    /// Local OpenAI-compatible server (Ollama, vLLM, `LocalAI`)
    Local,
}

impl ProviderType {
    /// Backend-specific API key variable used when `MEAL_LLM_API_KEY` is unset
    #[must_use]
    pub const fn api_key_env(&self) -> &'static str {
        match self {
            Self::Groq => "GROQ_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Local => "LOCAL_LLM_API_KEY",
        }
    }

    /// Whether the backend refuses requests without a credential
    #[must_use]
    pub const fn requires_api_key(&self) -> bool {
        !matches!(self, Self::Local)
    }

    /// Lowercase identifier
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "groq" => Ok(Self::Groq),
            "gemini" | "google" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAi),
            "local" | "ollama" | "vllm" | "localai" => Ok(Self::Local),
            other => Err(ProviderError::configuration(format!(
                "Unknown LLM provider '{other}' (expected groq, gemini, openai or local)"
            ))),
        }
    }
}

// ============================================================================
// Retry Tuning
// ============================================================================

/// Bounded retry with exponential backoff
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Attempt ceiling, including the first attempt
    pub max_attempts: u32,
    /// Delay after the first failed attempt
    pub base_delay_ms: u64,
    /// Growth factor between consecutive delays
    pub backoff_multiplier: f64,
    /// Upper bound on any single delay
    pub max_delay_ms: u64,
    /// Per-attempt deadline around the provider call; `None` leaves it to the
    /// HTTP client
    pub attempt_timeout: Option<Duration>,
    /// Add random jitter on top of the computed delay
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            backoff_multiplier: 2.0,
            max_delay_ms: 10_000,
            attempt_timeout: None,
            jitter: false,
        }
    }
}

impl RetryConfig {
    /// Delay to wait after failed attempt `attempt` (1-based):
    /// `min(base * multiplier^(attempt - 1), cap)`
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let delay_ms = (self.base_delay_ms as f64) * self.backoff_multiplier.powi(exponent);
        let capped_ms = delay_ms.min(self.max_delay_ms as f64).max(0.0);
        Duration::from_secs_f64(capped_ms / 1000.0)
    }

    /// Check the tuning values are usable
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the offending value
    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.max_attempts == 0 {
            return Err(ProviderError::configuration(
                "max_attempts must be at least 1",
            ));
        }
        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(ProviderError::configuration(format!(
                "backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            )));
        }
        if self.base_delay_ms > self.max_delay_ms {
            return Err(ProviderError::configuration(format!(
                "base_delay_ms ({}) must not exceed max_delay_ms ({})",
                self.base_delay_ms, self.max_delay_ms
            )));
        }
        if self.attempt_timeout == Some(Duration::ZERO) {
            return Err(ProviderError::configuration(
                "attempt_timeout must be greater than zero",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Generation Configuration
// ============================================================================

/// Everything the orchestrator and adapters need, supplied at construction
#[derive(Clone, PartialEq, Default)]
pub struct GenerationConfig {
    /// Backend to talk to
    pub provider: ProviderType,
    /// Credential; optional only for local servers
    pub api_key: Option<String>,
    /// Endpoint override
    pub base_url: Option<String>,
    /// Model override
    pub model: Option<String>,
    /// Token limit override
    pub max_tokens: Option<u32>,
    /// Temperature override (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Retry tuning
    pub retry: RetryConfig,
}

impl GenerationConfig {
    /// Provider selector variable
    pub const PROVIDER_ENV: &'static str = "MEAL_LLM_PROVIDER";
    /// Credential variable, checked before the backend's own key variable
    pub const API_KEY_ENV: &'static str = "MEAL_LLM_API_KEY";
    /// Endpoint override variable
    pub const BASE_URL_ENV: &'static str = "MEAL_LLM_BASE_URL";
    /// Model override variable
    pub const MODEL_ENV: &'static str = "MEAL_LLM_MODEL";
    /// Token limit variable
    pub const MAX_TOKENS_ENV: &'static str = "MEAL_LLM_MAX_TOKENS";
    /// Temperature variable
    pub const TEMPERATURE_ENV: &'static str = "MEAL_LLM_TEMPERATURE";
    /// Attempt ceiling variable
    pub const MAX_ATTEMPTS_ENV: &'static str = "MEAL_LLM_MAX_ATTEMPTS";
    /// Base delay variable
    pub const BASE_DELAY_MS_ENV: &'static str = "MEAL_LLM_BASE_DELAY_MS";
    /// Delay cap variable
    pub const MAX_DELAY_MS_ENV: &'static str = "MEAL_LLM_MAX_DELAY_MS";
    /// Backoff multiplier variable
    pub const BACKOFF_MULTIPLIER_ENV: &'static str = "MEAL_LLM_BACKOFF_MULTIPLIER";
    /// Per-attempt timeout variable
    pub const ATTEMPT_TIMEOUT_SECS_ENV: &'static str = "MEAL_LLM_ATTEMPT_TIMEOUT_SECS";
    /// Jitter toggle variable
    pub const BACKOFF_JITTER_ENV: &'static str = "MEAL_LLM_BACKOFF_JITTER";

    /// Configuration for a backend with a credential and default tuning
    #[must_use]
    pub fn new(provider: ProviderType, api_key: Option<String>) -> Self {
        Self {
            provider,
            api_key,
            ..Self::default()
        }
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown provider, an unparsable
    /// value, or a cloud backend without a credential
    pub fn from_env() -> Result<Self, ProviderError> {
        let provider = match non_empty_env(Self::PROVIDER_ENV) {
            Some(name) => name.parse()?,
            None => ProviderType::default(),
        };
        let api_key =
            non_empty_env(Self::API_KEY_ENV).or_else(|| non_empty_env(provider.api_key_env()));

        let defaults = RetryConfig::default();
        let retry = RetryConfig {
            max_attempts: parse_env(Self::MAX_ATTEMPTS_ENV)?.unwrap_or(defaults.max_attempts),
            base_delay_ms: parse_env(Self::BASE_DELAY_MS_ENV)?.unwrap_or(defaults.base_delay_ms),
            backoff_multiplier: parse_env(Self::BACKOFF_MULTIPLIER_ENV)?
                .unwrap_or(defaults.backoff_multiplier),
            max_delay_ms: parse_env(Self::MAX_DELAY_MS_ENV)?.unwrap_or(defaults.max_delay_ms),
            attempt_timeout: parse_env::<u64>(Self::ATTEMPT_TIMEOUT_SECS_ENV)?
                .map(Duration::from_secs),
            jitter: non_empty_env(Self::BACKOFF_JITTER_ENV)
                .is_some_and(|v| v.eq_ignore_ascii_case("true") || v == "1"),
        };

        let config = Self {
            provider,
            api_key,
            base_url: non_empty_env(Self::BASE_URL_ENV),
            model: non_empty_env(Self::MODEL_ENV),
            max_tokens: parse_env(Self::MAX_TOKENS_ENV)?,
            temperature: parse_env(Self::TEMPERATURE_ENV)?,
            retry,
        };
        config.validate()?;

        debug!(
            provider = %config.provider,
            model = config.model.as_deref().unwrap_or("default"),
            max_attempts = config.retry.max_attempts,
            "Loaded generation configuration from environment"
        );
        Ok(config)
    }

    /// Check the configuration is complete and consistent
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the problem
    pub fn validate(&self) -> Result<(), ProviderError> {
        let has_key = self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty());
        if self.provider.requires_api_key() && !has_key {
            return Err(ProviderError::configuration(format!(
                "{} requires an API key (set {} or {})",
                self.provider,
                Self::API_KEY_ENV,
                self.provider.api_key_env()
            )));
        }
        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ProviderError::configuration(format!(
                    "temperature must be between 0.0 and 2.0, got {temperature}"
                )));
            }
        }
        if self.max_tokens == Some(0) {
            return Err(ProviderError::configuration(
                "max_tokens must be greater than zero",
            ));
        }
        self.retry.validate()
    }
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("retry", &self.retry)
            .finish()
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(name: &str) -> Result<Option<T>, ProviderError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    non_empty_env(name)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| {
                ProviderError::configuration(format!("Invalid value for {name} ('{raw}'): {e}"))
            })
        })
        .transpose()
}
