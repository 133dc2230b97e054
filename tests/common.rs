// ABOUTME: Shared test utilities for meal planner integration tests
// ABOUTME: Recipe fixtures, a scripted provider stub and a sleeper that records backoff delays
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `pierre_meal_planner`

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use pierre_meal_planner::generation::{GenerationRequest, Sleeper};
use pierre_meal_planner::llm::{GenerationOptions, LlmCapabilities, LlmProvider, ProviderError};
use pierre_meal_planner::nutrition::{DietType, Difficulty, GeneratedRecipe, MealType};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("warn")
            .with_test_writer()
            .try_init();
    });
}

/// Well-formed recipe payload as a backend would return it
pub fn valid_recipe_json() -> String {
    r#"{
        "name": "Smoky Chickpea Bowl",
        "description": "Roasted chickpeas over herbed quinoa with tahini dressing",
        "ingredients": [
            {"name": "chickpeas", "amount": 240, "unit": "g"},
            {"name": "quinoa", "amount": 150, "unit": "g"},
            {"name": "tahini", "amount": 30, "unit": "g"}
        ],
        "instructions": [
            {"stepNumber": 1, "description": "Roast the chickpeas with smoked paprika"},
            {"stepNumber": 2, "description": "Cook the quinoa and fold in the herbs"},
            {"stepNumber": 3, "description": "Top with chickpeas and dressing"}
        ],
        "prepTime": 10,
        "cookTime": 25,
        "servings": 2,
        "mealTypes": ["dinner"],
        "dietTypes": ["vegan"],
        "tags": [{"name": "high-fiber"}],
        "difficulty": "easy",
        "nutritionalInfo": {
            "calories": 800,
            "protein": 36,
            "carbohydrates": 104,
            "fat": 26,
            "fiber": 22
        }
    }"#
    .to_owned()
}

/// Parsed form of [`valid_recipe_json`]
pub fn sample_recipe() -> GeneratedRecipe {
    serde_json::from_str(&valid_recipe_json()).unwrap()
}

/// Request that passes validation without warnings
pub fn valid_request() -> GenerationRequest {
    GenerationRequest::new(DietType::Vegan, MealType::Dinner, Difficulty::Easy)
        .with_servings(2)
        .with_total_time(40)
        .with_protein_target(35.0)
}

/// Provider that replays scripted results and records every prompt
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<String, ProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn display_name(&self) -> &'static str {
        "Scripted Test Provider"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::JSON_MODE
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn generate_text(
        &self,
        prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_owned());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::network("scripted", "script exhausted")))
    }
}

/// Sleeper that returns immediately and remembers each requested delay
#[derive(Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}
