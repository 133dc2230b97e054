// ABOUTME: Prompt builder turning a validated generation request into provider prompt text
// ABOUTME: Injects diet rules, meal and difficulty context, targets, exclusions and a uniqueness seed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Prompt construction
//!
//! [`PromptBuilder::build`] is pure: the same request and seed always yield
//! the same text. The seed is printed in the prompt so repeated identical
//! requests still produce varied recipes.

use std::fmt::Write as _;

use rand::Rng;

use super::ValidatedRequest;
use crate::config::PromptConfig;
use crate::llm::ProviderError;

/// Builds recipe prompts from injected text tables
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    config: PromptConfig,
}

impl PromptBuilder {
    /// Create a builder, rejecting malformed prompt configuration up front
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a table is incomplete or the schema
    /// template references an unknown placeholder
    pub fn new(config: PromptConfig) -> Result<Self, ProviderError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Random uniqueness seed for one attempt
    #[must_use]
    pub fn random_seed() -> u32 {
        rand::thread_rng().gen_range(100_000..1_000_000)
    }

    /// Assemble the prompt for `request` using `seed`
    #[must_use]
    pub fn build(&self, request: &ValidatedRequest, seed: u32) -> String {
        let mut prompt = String::with_capacity(2048);
        let cfg = &self.config;

        let _ = writeln!(prompt, "{}", cfg.role_statement);
        let _ = writeln!(
            prompt,
            "\nRecipe request #{seed}: create a new, original recipe. Treat the request number as a \
             creative seed so that repeated requests produce different dishes."
        );

        let _ = writeln!(prompt, "\nDiet: {}", request.diet_type);
        if let Some(guidance) = cfg.diet_guidance.get(&request.diet_type) {
            let _ = writeln!(prompt, "Guidelines: {}", guidance.guidelines);
            if !guidance.restricted_ingredients.is_empty() {
                let _ = writeln!(
                    prompt,
                    "Never use: {}",
                    guidance.restricted_ingredients.join(", ")
                );
            }
        }

        let _ = write!(prompt, "\nMeal: {}", request.meal_type);
        if let Some(context) = cfg.meal_context.get(&request.meal_type) {
            let _ = write!(prompt, ". {context}");
        }
        let _ = write!(prompt, "\nDifficulty: {}", request.difficulty);
        if let Some(context) = cfg.difficulty_context.get(&request.difficulty) {
            let _ = write!(prompt, ". {context}");
        }
        let _ = writeln!(prompt, "\nServings: {}", request.servings);
        let _ = writeln!(
            prompt,
            "Total time (prep + cook): at most {} minutes",
            request.total_time_mins
        );

        push_list(
            &mut prompt,
            "Allergies (exclude completely, including traces)",
            &request.allergies,
        );
        push_list(&mut prompt, "Disliked ingredients (avoid)", &request.disliked_ingredients);
        push_list(&mut prompt, "Dietary restrictions", &request.dietary_restrictions);
        push_list(&mut prompt, "Preferred cuisines", &request.preferred_cuisines);

        let _ = writeln!(prompt, "\nNutrition targets for the whole recipe:");
        if let Some(calories) = request.calorie_target {
            let _ = writeln!(prompt, "- Calories: {calories:.0} kcal");
        }
        let _ = writeln!(prompt, "- Protein: {:.0} g", request.protein_target);
        if let Some(carbs) = request.carb_target {
            let _ = writeln!(prompt, "- Carbohydrates: {carbs:.0} g");
        }
        if let Some(fat) = request.fat_target {
            let _ = writeln!(prompt, "- Fat: {fat:.0} g");
        }

        prompt.push('\n');
        prompt.push_str(&self.render_schema(request));
        prompt
    }

    /// Substitute request values into the schema template
    fn render_schema(&self, request: &ValidatedRequest) -> String {
        let template = &self.config.schema_template;
        let servings = request.servings.to_string();

        // Placeholders were checked in `new`; this walk cannot fail.
        let mut out = String::with_capacity(template.len());
        let mut rest = template.as_str();
        while let Some(start) = rest.find("{{") {
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                break;
            };
            out.push_str(&rest[..start]);
            let name = after[..end].trim();
            out.push_str(placeholder_value(name, request, &servings).unwrap_or_default());
            rest = &after[end + 2..];
        }
        out.push_str(rest);
        out
    }

    /// Prompt configuration in use
    #[must_use]
    pub const fn config(&self) -> &PromptConfig {
        &self.config
    }
}

fn placeholder_value<'a>(
    name: &str,
    request: &'a ValidatedRequest,
    servings: &'a str,
) -> Option<&'a str> {
    match name {
        "servings" => Some(servings),
        "mealType" => Some(request.meal_type.as_str()),
        "dietType" => Some(request.diet_type.as_str()),
        "difficulty" => Some(request.difficulty.as_str()),
        _ => None,
    }
}

fn push_list(prompt: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(prompt, "\n{heading}:");
    for item in items {
        let _ = writeln!(prompt, "- {item}");
    }
}
