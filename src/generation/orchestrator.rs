// ABOUTME: Generation orchestrator coordinating validation, prompting, provider calls and parsing
// ABOUTME: Bounded retry with exponential backoff, fast-fail on non-retryable errors, per-attempt logs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Recipe Generator
//!
//! Per request the generator runs
//! `validate -> (build prompt -> call provider -> parse) -> success`, going
//! back to `build prompt` with a fresh seed after a failure that may succeed
//! on another try. Validation failures are reported before the attempt
//! counter moves; invalid credentials, configuration errors and unclassified
//! failures stop immediately.
//!
//! Backoff sleeps go through the [`Sleeper`] trait so the schedule can be
//! observed without waiting in real time.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{error, field, info, instrument, warn, Span};
use uuid::Uuid;

use pierre_nutrition::GeneratedRecipe;

use super::image::{spawn_image_task, ImageGenerator};
use super::{parse_recipe, validate_request, GenerationRequest, PromptBuilder, ValidationWarning};
use crate::config::{GenerationConfig, PromptConfig, RetryConfig};
use crate::llm::{create_provider, GenerationOptions, LlmProvider, ProviderError, ProviderErrorKind};

/// Suspension point between attempts
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        time::sleep(duration).await;
    }
}

/// Successful generation result
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    /// Correlation id of the request in logs
    pub request_id: Uuid,
    /// Parsed, structurally valid recipe
    pub recipe: GeneratedRecipe,
    /// Attempts used, including the successful one
    pub attempts: u32,
    /// Soft findings from request validation
    pub warnings: Vec<ValidationWarning>,
}

/// Whether the orchestrator should make another attempt after `error`
///
/// Parsing failures are retried with a fresh prompt even though the error
/// itself is not retryable: a new seed often yields a well-formed payload.
#[must_use]
pub fn should_retry(error: &ProviderError) -> bool {
    matches!(error.kind(), ProviderErrorKind::Parsing) || error.is_retryable()
}

/// Turns generation requests into validated recipes
pub struct RecipeGenerator {
    provider: Arc<dyn LlmProvider>,
    prompts: PromptBuilder,
    retry: RetryConfig,
    options: GenerationOptions,
    sleeper: Arc<dyn Sleeper>,
}

impl RecipeGenerator {
    /// Create a generator around an existing provider
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the retry tuning is invalid
    pub fn new(provider: Arc<dyn LlmProvider>, retry: RetryConfig) -> Result<Self, ProviderError> {
        retry.validate()?;
        Ok(Self {
            provider,
            prompts: PromptBuilder::new(PromptConfig::default())?,
            retry,
            options: GenerationOptions::default(),
            sleeper: Arc::new(TokioSleeper),
        })
    }

    /// Build the configured provider and a generator around it
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the configuration is incomplete or
    /// the provider cannot be created
    pub fn from_config(config: &GenerationConfig) -> Result<Self, ProviderError> {
        config.validate()?;
        let provider: Arc<dyn LlmProvider> = Arc::new(create_provider(config)?);
        let options = GenerationOptions {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        };
        Ok(Self::new(provider, config.retry.clone())?.with_options(options))
    }

    /// Replace the prompt tables
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the tables or template are malformed
    pub fn with_prompt_config(mut self, config: PromptConfig) -> Result<Self, ProviderError> {
        self.prompts = PromptBuilder::new(config)?;
        Ok(self)
    }

    /// Set per-call provider options
    #[must_use]
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the backoff sleeper
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Provider in use
    #[must_use]
    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    /// Retry tuning in use
    #[must_use]
    pub const fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Generate one recipe for `request`
    ///
    /// # Errors
    ///
    /// Returns a validation error before any provider call if the request is
    /// invalid, the first non-retryable error, or the last error once the
    /// attempt ceiling is reached
    #[instrument(
        skip(self, request),
        fields(
            request_id = field::Empty,
            provider = self.provider.name(),
            meal_type = ?request.meal_type,
            diet_type = ?request.diet_type,
        )
    )]
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationOutcome, ProviderError> {
        let request_id = Uuid::new_v4();
        Span::current().record("request_id", field::display(request_id));

        let validated = validate_request(request).map_err(|e| {
            warn!(error = %e, "Generation request rejected before any provider call");
            e
        })?;

        let max_attempts = self.retry.max_attempts;
        let mut attempt = 0;
        loop {
            attempt += 1;
            let seed = PromptBuilder::random_seed();
            let prompt = self.prompts.build(&validated, seed);
            info!(attempt, max_attempts, seed, "Starting generation attempt");

            let error = match self.run_attempt(&prompt).await {
                Ok(recipe) => {
                    info!(
                        attempt,
                        max_attempts,
                        outcome = "success",
                        recipe = %recipe.name,
                        "Generation attempt succeeded"
                    );
                    return Ok(GenerationOutcome {
                        request_id,
                        recipe,
                        attempts: attempt,
                        warnings: validated.warnings,
                    });
                }
                Err(error) => error,
            };

            if !should_retry(&error) {
                error!(
                    attempt,
                    max_attempts,
                    outcome = "fatal",
                    error_kind = %error.kind(),
                    error = %error,
                    "Generation attempt failed with a non-retryable error"
                );
                return Err(error);
            }
            if attempt >= max_attempts {
                error!(
                    attempt,
                    max_attempts,
                    outcome = "exhausted",
                    error_kind = %error.kind(),
                    error = %error,
                    "Generation failed after exhausting all attempts"
                );
                return Err(error);
            }

            let delay = self.backoff_delay(attempt, &error);
            warn!(
                attempt,
                max_attempts,
                outcome = "retry",
                error_kind = %error.kind(),
                error = %error,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "Generation attempt failed, backing off"
            );
            self.sleeper.sleep(delay).await;
        }
    }

    /// Generate a recipe and start image generation without waiting for it
    ///
    /// The recipe is returned as soon as it is parsed. The image runs as a
    /// detached task; its failures are logged and never surfaced here. Callers
    /// may await the handle or drop it.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Self::generate`]
    pub async fn generate_with_image(
        &self,
        request: &GenerationRequest,
        images: Arc<dyn ImageGenerator>,
    ) -> Result<(GenerationOutcome, JoinHandle<Option<String>>), ProviderError> {
        let outcome = self.generate(request).await?;
        let handle = spawn_image_task(images, outcome.recipe.clone(), outcome.request_id);
        Ok((outcome, handle))
    }

    /// One provider call plus parse, bounded by the optional attempt timeout
    async fn run_attempt(&self, prompt: &str) -> Result<GeneratedRecipe, ProviderError> {
        let call = self.provider.generate_text(prompt, &self.options);
        let text = match self.retry.attempt_timeout {
            Some(limit) => time::timeout(limit, call).await.map_err(|_| {
                ProviderError::network(
                    self.provider.name(),
                    format!("attempt timed out after {}ms", limit.as_millis()),
                )
            })??,
            None => call.await?,
        };
        parse_recipe(&text)
    }

    /// Exponential delay, raised to the backend's `Retry-After` hint (capped)
    /// and optionally jittered
    fn backoff_delay(&self, attempt: u32, error: &ProviderError) -> Duration {
        let cap = Duration::from_millis(self.retry.max_delay_ms);
        let mut delay = self.retry.delay_for_attempt(attempt);
        if let ProviderError::RateLimited {
            retry_after: Some(hint),
            ..
        } = error
        {
            delay = delay.max((*hint).min(cap));
        }
        if self.retry.jitter {
            let max_jitter_ms = u64::try_from(delay.as_millis() / 4).unwrap_or(0);
            if max_jitter_ms > 0 {
                delay += Duration::from_millis(rand::thread_rng().gen_range(0..=max_jitter_ms));
            }
        }
        delay
    }
}
