// ABOUTME: Main library entry point for the Pierre meal planner
// ABOUTME: Recipe generation pipeline over pluggable text-generation backends plus macro planning
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Meal Planner
//!
//! Turns structured meal requests into validated, structured recipes using an
//! external text-generation backend, and splits daily calorie budgets into
//! per-meal macro targets.
//!
//! ## Architecture
//!
//! - **llm**: provider adapters (Groq, Gemini, OpenAI-compatible) and the
//!   shared `ProviderError` taxonomy
//! - **generation**: input validation, prompt building, response parsing and
//!   the retrying `RecipeGenerator`
//! - **nutrition**: macro allocation engine and recipe scaler
//! - **config**: generation, retry and prompt configuration
//! - **batch**: recipe file writer used by the `generate-recipes` binary
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pierre_meal_planner::config::GenerationConfig;
//! use pierre_meal_planner::generation::{GenerationRequest, RecipeGenerator};
//! use pierre_meal_planner::nutrition::{DietType, Difficulty, MealType};
//!
//! # async fn example() -> Result<(), pierre_meal_planner::llm::ProviderError> {
//! let generator = RecipeGenerator::from_config(&GenerationConfig::from_env()?)?;
//! let request = GenerationRequest::new(DietType::Vegan, MealType::Dinner, Difficulty::Easy)
//!     .with_servings(2)
//!     .with_total_time(30)
//!     .with_protein_target(35.0);
//!
//! let outcome = generator.generate(&request).await?;
//! println!("{} after {} attempt(s)", outcome.recipe.name, outcome.attempts);
//! # Ok(())
//! # }
//! ```

/// Recipe file output for batch runs
pub mod batch;

/// Generation, retry and prompt configuration
pub mod config;

/// Unified application error type
pub mod errors;

/// Recipe generation pipeline
pub mod generation;

/// Text-generation provider adapters
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Nutrition math (re-exported from `pierre-nutrition`)
pub mod nutrition;
