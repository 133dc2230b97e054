// ABOUTME: Text-generation provider abstraction for recipe generation
// ABOUTME: Defines the LlmProvider contract, generation options and capability flags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # LLM Provider Interface
//!
//! A provider adapter wraps exactly one text-generation backend behind
//! [`LlmProvider::generate_text`]. Adapters perform one outbound call per
//! invocation, keep no state between calls beyond an immutable HTTP client,
//! and translate every backend failure into a [`ProviderError`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use pierre_meal_planner::llm::{GenerationOptions, GroqProvider, LlmProvider};
//!
//! # async fn example() -> Result<(), pierre_meal_planner::llm::ProviderError> {
//! let provider = GroqProvider::new("gsk-...")?;
//! let text = provider
//!     .generate_text("Give me a breakfast recipe", &GenerationOptions::default())
//!     .await?;
//! println!("{text}");
//! # Ok(())
//! # }
//! ```

mod error;
mod gemini;
mod groq;
mod openai_compatible;
mod provider;

pub use error::{
    classify_http_status, classify_transport_error, parse_retry_after, BoxError, ProviderError,
    ProviderErrorKind,
};
pub use gemini::GeminiProvider;
pub use groq::GroqProvider;
pub use openai_compatible::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};
pub use provider::{create_provider, ChatProvider};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ============================================================================
// Capability Flags
// ============================================================================

bitflags::bitflags! {
    /// Provider capability flags
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LlmCapabilities: u8 {
        /// Backend can be asked to return a bare JSON object
        const JSON_MODE = 0b0000_0001;
        /// Backend runs on the caller's own hardware
        const LOCAL = 0b0000_0010;
    }
}

impl LlmCapabilities {
    /// Check if JSON mode is supported
    #[must_use]
    pub const fn supports_json_mode(&self) -> bool {
        self.contains(Self::JSON_MODE)
    }

    /// Check if the backend runs locally
    #[must_use]
    pub const fn is_local(&self) -> bool {
        self.contains(Self::LOCAL)
    }
}

// ============================================================================
// Request Options
// ============================================================================

/// Per-call overrides; `None` fields fall back to the adapter's defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (provider-specific)
    pub model: Option<String>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0 - 2.0)
    pub temperature: Option<f32>,
}

impl GenerationOptions {
    /// Set the model to use
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the maximum tokens
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

// ============================================================================
// Provider Trait
// ============================================================================

/// Uniform text-generation capability
///
/// The orchestrator depends only on this trait, so adding a backend never
/// touches orchestration logic.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Unique provider identifier (e.g., "groq", "gemini")
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Provider capabilities
    fn capabilities(&self) -> LlmCapabilities;

    /// Model used when the options name none
    fn default_model(&self) -> &str;

    /// Generate text for a single prompt
    ///
    /// # Errors
    ///
    /// Returns a classified [`ProviderError`]; raw transport or backend
    /// errors never escape an adapter.
    async fn generate_text(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, ProviderError>;
}
