// ABOUTME: Prompt text tables injected into the recipe prompt builder
// ABOUTME: Diet guidelines, meal and difficulty context, and the output schema template
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Prompt Configuration
//!
//! The output schema template is loaded at compile time from a markdown file
//! so it can be edited without touching code. Templates may reference only
//! the placeholders in [`PromptConfig::PLACEHOLDERS`].

use std::collections::HashMap;

use pierre_nutrition::{DietType, Difficulty, MealType};

use crate::llm::ProviderError;

/// Stock output schema template
pub const RECIPE_SCHEMA_TEMPLATE: &str = include_str!("recipe_schema.md");

/// Stock role statement
pub const DEFAULT_ROLE_STATEMENT: &str = "You are a professional chef and registered dietitian \
creating original, practical recipes for a personalized meal plan.";

/// Guidance for one diet type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DietGuidance {
    /// Free-form guideline text
    pub guidelines: String,
    /// Ingredients that must never appear
    pub restricted_ingredients: Vec<String>,
}

impl DietGuidance {
    fn new(guidelines: &str, restricted: &[&str]) -> Self {
        Self {
            guidelines: guidelines.to_owned(),
            restricted_ingredients: restricted.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

/// Text tables consumed by the prompt builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptConfig {
    /// Opening role statement
    pub role_statement: String,
    /// Per-diet guidance
    pub diet_guidance: HashMap<DietType, DietGuidance>,
    /// Per-meal qualitative context
    pub meal_context: HashMap<MealType, String>,
    /// Per-difficulty qualitative context
    pub difficulty_context: HashMap<Difficulty, String>,
    /// Output schema with `{{placeholder}}` tokens
    pub schema_template: String,
}

impl PromptConfig {
    /// Placeholders the schema template may reference
    pub const PLACEHOLDERS: [&'static str; 4] = ["servings", "mealType", "dietType", "difficulty"];

    /// Reject incomplete tables and unknown or unterminated placeholders
    ///
    /// # Errors
    ///
    /// Returns a configuration error; a malformed template is a programming
    /// error, not something a caller can fix per request
    pub fn validate(&self) -> Result<(), ProviderError> {
        if let Some(missing) = DietType::ALL
            .iter()
            .find(|d| !self.diet_guidance.contains_key(*d))
        {
            return Err(ProviderError::configuration(format!(
                "Prompt configuration has no guidance for diet type '{missing}'"
            )));
        }
        if let Some(missing) = MealType::ALL
            .iter()
            .find(|m| !self.meal_context.contains_key(*m))
        {
            return Err(ProviderError::configuration(format!(
                "Prompt configuration has no context for meal type '{missing}'"
            )));
        }
        if let Some(missing) = Difficulty::ALL
            .iter()
            .find(|d| !self.difficulty_context.contains_key(*d))
        {
            return Err(ProviderError::configuration(format!(
                "Prompt configuration has no context for difficulty '{missing}'"
            )));
        }

        for token in template_tokens(&self.schema_template)? {
            if !Self::PLACEHOLDERS.contains(&token) {
                return Err(ProviderError::configuration(format!(
                    "Schema template references unknown placeholder '{{{{{token}}}}}'"
                )));
            }
        }
        Ok(())
    }
}

/// Names of every `{{token}}` in a template
///
/// # Errors
///
/// Returns a configuration error on an unterminated `{{`
pub fn template_tokens(template: &str) -> Result<Vec<&str>, ProviderError> {
    let mut tokens = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let end = after.find("}}").ok_or_else(|| {
            ProviderError::configuration("Schema template has an unterminated '{{' placeholder")
        })?;
        tokens.push(after[..end].trim());
        rest = &after[end + 2..];
    }
    Ok(tokens)
}

impl Default for PromptConfig {
    fn default() -> Self {
        let diet_guidance = HashMap::from([
            (
                DietType::Standard,
                DietGuidance::new(
                    "Balanced whole-food recipe with lean protein, vegetables and whole grains.",
                    &[],
                ),
            ),
            (
                DietType::Vegan,
                DietGuidance::new(
                    "Entirely plant-based. Use legumes, tofu, tempeh, seitan, nuts and seeds for protein.",
                    &["meat", "poultry", "fish", "seafood", "eggs", "dairy", "honey", "gelatin"],
                ),
            ),
            (
                DietType::Vegetarian,
                DietGuidance::new(
                    "No meat or fish. Eggs and dairy are allowed; favour legumes and whole grains.",
                    &["meat", "poultry", "fish", "seafood", "gelatin"],
                ),
            ),
            (
                DietType::Pescatarian,
                DietGuidance::new(
                    "Fish and seafood are the only animal flesh allowed; eggs and dairy are fine.",
                    &["beef", "pork", "lamb", "poultry", "game"],
                ),
            ),
            (
                DietType::Keto,
                DietGuidance::new(
                    "Very low carbohydrate (under 20g net carbs per serving), high fat, moderate protein.",
                    &["sugar", "grains", "bread", "pasta", "rice", "potatoes", "most fruit"],
                ),
            ),
            (
                DietType::Paleo,
                DietGuidance::new(
                    "Whole unprocessed foods: meat, fish, eggs, vegetables, fruit, nuts and seeds.",
                    &["grains", "legumes", "dairy", "refined sugar", "processed oils"],
                ),
            ),
        ]);

        let meal_context = HashMap::from([
            (
                MealType::Breakfast,
                "A breakfast that is quick to assemble in the morning and keeps energy steady.".to_owned(),
            ),
            (
                MealType::Lunch,
                "A satisfying lunch that travels well and does not cause an afternoon slump.".to_owned(),
            ),
            (
                MealType::Dinner,
                "A hearty dinner that is the main protein source of the day.".to_owned(),
            ),
            (
                MealType::Snack,
                "A small snack, portable and simple, bridging the gap between meals.".to_owned(),
            ),
        ]);

        let difficulty_context = HashMap::from([
            (
                Difficulty::Easy,
                "Beginner friendly: few ingredients, basic techniques, minimal equipment.".to_owned(),
            ),
            (
                Difficulty::Medium,
                "Intermediate: a few techniques and some multitasking are fine.".to_owned(),
            ),
            (
                Difficulty::Hard,
                "Advanced: multi-stage preparation and refined techniques are welcome.".to_owned(),
            ),
        ]);

        Self {
            role_statement: DEFAULT_ROLE_STATEMENT.to_owned(),
            diet_guidance,
            meal_context,
            difficulty_context,
            schema_template: RECIPE_SCHEMA_TEMPLATE.to_owned(),
        }
    }
}
