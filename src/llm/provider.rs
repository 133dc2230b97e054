// ABOUTME: Provider selector building a concrete text-generation backend from configuration
// ABOUTME: ChatProvider enum dispatching to Groq, Gemini or OpenAI-compatible adapters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # LLM Provider Selector
//!
//! [`create_provider`] turns an explicit [`GenerationConfig`] into a ready
//! adapter. Nothing here reads the environment; callers that want env-driven
//! setup go through [`GenerationConfig::from_env`] first.

use std::fmt;

use async_trait::async_trait;
use tracing::{debug, info};

use super::{
    GeminiProvider, GenerationOptions, GroqProvider, LlmCapabilities, LlmProvider,
    OpenAiCompatibleConfig, OpenAiCompatibleProvider, ProviderError,
};
use crate::config::{GenerationConfig, ProviderType};

/// Unified provider wrapping whichever backend is configured
pub enum ChatProvider {
    /// Google Gemini
    Gemini(GeminiProvider),
    /// Groq
    Groq(GroqProvider),
    /// `OpenAI` cloud or a local OpenAI-compatible server
    OpenAiCompatible(OpenAiCompatibleProvider),
}

impl ChatProvider {
    /// Backend selector this provider was built for
    #[must_use]
    pub fn provider_type(&self) -> ProviderType {
        match self {
            Self::Gemini(_) => ProviderType::Gemini,
            Self::Groq(_) => ProviderType::Groq,
            Self::OpenAiCompatible(p) => {
                if p.capabilities().is_local() {
                    ProviderType::Local
                } else {
                    ProviderType::OpenAi
                }
            }
        }
    }
}

/// Build the configured backend
///
/// # Errors
///
/// Returns a configuration error if a cloud backend has no API key or the
/// HTTP client cannot be created
pub fn create_provider(config: &GenerationConfig) -> Result<ChatProvider, ProviderError> {
    info!("Initializing LLM provider: {}", config.provider);

    let provider = match config.provider {
        ProviderType::Groq => {
            let mut groq = GroqProvider::new(required_key(config)?)?;
            if let Some(model) = &config.model {
                groq = groq.with_default_model(model);
            }
            if let Some(base_url) = &config.base_url {
                groq = groq.with_base_url(base_url);
            }
            ChatProvider::Groq(groq)
        }
        ProviderType::Gemini => {
            let mut gemini = GeminiProvider::new(required_key(config)?)?;
            if let Some(model) = &config.model {
                gemini = gemini.with_default_model(model);
            }
            if let Some(base_url) = &config.base_url {
                gemini = gemini.with_base_url(base_url);
            }
            ChatProvider::Gemini(gemini)
        }
        ProviderType::OpenAi => {
            let mut openai = OpenAiCompatibleConfig::openai(required_key(config)?);
            apply_overrides(&mut openai, config);
            ChatProvider::OpenAiCompatible(OpenAiCompatibleProvider::new(openai)?)
        }
        ProviderType::Local => {
            let mut local = config
                .base_url
                .as_deref()
                .map_or_else(OpenAiCompatibleConfig::default, OpenAiCompatibleConfig::local);
            local.api_key.clone_from(&config.api_key);
            apply_overrides(&mut local, config);
            ChatProvider::OpenAiCompatible(OpenAiCompatibleProvider::new(local)?)
        }
    };

    debug!(
        "Provider {} initialized with model: {}",
        provider.display_name(),
        provider.default_model()
    );
    Ok(provider)
}

fn required_key(config: &GenerationConfig) -> Result<&str, ProviderError> {
    config
        .api_key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| {
            ProviderError::configuration(format!(
                "{} requires an API key (set {} or {})",
                config.provider,
                GenerationConfig::API_KEY_ENV,
                config.provider.api_key_env(),
            ))
        })
}

fn apply_overrides(target: &mut OpenAiCompatibleConfig, config: &GenerationConfig) {
    if let Some(model) = &config.model {
        target.default_model.clone_from(model);
    }
    if let Some(base_url) = &config.base_url {
        target.base_url.clone_from(base_url);
    }
}

impl fmt::Debug for ChatProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gemini(_) => f.debug_tuple("ChatProvider::Gemini").finish(),
            Self::Groq(_) => f.debug_tuple("ChatProvider::Groq").finish(),
            Self::OpenAiCompatible(p) => f
                .debug_tuple("ChatProvider::OpenAiCompatible")
                .field(&p.name())
                .finish(),
        }
    }
}

#[async_trait]
impl LlmProvider for ChatProvider {
    fn name(&self) -> &'static str {
        match self {
            Self::Gemini(p) => p.name(),
            Self::Groq(p) => p.name(),
            Self::OpenAiCompatible(p) => p.name(),
        }
    }

    fn display_name(&self) -> &'static str {
        match self {
            Self::Gemini(p) => p.display_name(),
            Self::Groq(p) => p.display_name(),
            Self::OpenAiCompatible(p) => p.display_name(),
        }
    }

    fn capabilities(&self) -> LlmCapabilities {
        match self {
            Self::Gemini(p) => p.capabilities(),
            Self::Groq(p) => p.capabilities(),
            Self::OpenAiCompatible(p) => p.capabilities(),
        }
    }

    fn default_model(&self) -> &str {
        match self {
            Self::Gemini(p) => p.default_model(),
            Self::Groq(p) => p.default_model(),
            Self::OpenAiCompatible(p) => p.default_model(),
        }
    }

    async fn generate_text(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, ProviderError> {
        match self {
            Self::Gemini(p) => p.generate_text(prompt, options).await,
            Self::Groq(p) => p.generate_text(prompt, options).await,
            Self::OpenAiCompatible(p) => p.generate_text(prompt, options).await,
        }
    }
}
