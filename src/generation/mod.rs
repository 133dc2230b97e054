// ABOUTME: Recipe generation pipeline from structured request to parsed recipe
// ABOUTME: Validation, prompt construction, response parsing, retrying orchestrator and image task
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Recipe Generation
//!
//! ```text
//! GenerationRequest
//!     -> validate_request        (hard failures stop here, warnings logged)
//!     -> PromptBuilder::build    (pure, fresh seed per attempt)
//!     -> LlmProvider::generate_text
//!     -> parse_recipe            (structural checks, no coercion)
//!     -> GenerationOutcome
//! ```
//!
//! [`RecipeGenerator`] drives the attempts and backoff. Everything it calls is
//! usable on its own.

mod image;
mod orchestrator;
mod parser;
mod prompt;
mod request;
mod validation;

pub use image::{spawn_image_task, ImageGenerator};
pub use orchestrator::{should_retry, GenerationOutcome, RecipeGenerator, Sleeper, TokioSleeper};
pub use parser::{extract_json_object, parse_recipe, REQUIRED_FIELDS, REQUIRED_NUTRITION_FIELDS};
pub use prompt::PromptBuilder;
pub use request::GenerationRequest;
pub use validation::{
    macro_consistency_warning, validate_request, ValidatedRequest, ValidationWarning,
    CALORIES_RANGE, CARBS_WARN_G, FAT_WARN_G, KETO_CARBS_WARN_G, MACRO_CONSISTENCY_TOLERANCE,
    PLANT_FORWARD_PROTEIN_WARN_G, PROTEIN_WARN_G, SERVINGS_RANGE, TOTAL_TIME_RANGE,
};
