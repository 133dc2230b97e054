// ABOUTME: Recipe scaler rescaling an existing recipe to a target calorie figure
// ABOUTME: Proportional ingredient, nutrition and servings scaling with per-field integer rounding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Recipe Scaler
//!
//! Every ingredient amount, nutrition figure and the servings count is
//! multiplied by `target / source` calories and rounded to the nearest
//! integer on its own. Rounded macro grams therefore need not add back up to
//! the rounded calorie figure exactly; that approximation is accepted.

use crate::allocation::MacroAllocation;
use crate::models::{GeneratedRecipe, NutritionalInfo, RecipeIngredient};
use thiserror::Error;
use tracing::debug;

/// Errors raised when a recipe cannot be rescaled
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScaleError {
    /// Source recipe reports zero, negative or non-finite calories
    #[error("Recipe '{name}' has no usable calorie figure ({calories})")]
    SourceCalories {
        /// Recipe name
        name: String,
        /// Reported calories
        calories: f64,
    },

    /// Target calories are zero, negative or non-finite
    #[error("Target calories must be positive, got {0}")]
    TargetCalories(f64),
}

/// Rescale `recipe` so its nutrition block reports `target_calories`
///
/// The source recipe is left untouched; a new value is returned.
///
/// # Errors
///
/// Returns an error if either calorie figure is not positive
pub fn scale_recipe(
    recipe: &GeneratedRecipe,
    target_calories: f64,
) -> Result<GeneratedRecipe, ScaleError> {
    let source_calories = recipe.nutritional_info.calories;
    if !source_calories.is_finite() || source_calories <= 0.0 {
        return Err(ScaleError::SourceCalories {
            name: recipe.name.clone(),
            calories: source_calories,
        });
    }
    if !target_calories.is_finite() || target_calories <= 0.0 {
        return Err(ScaleError::TargetCalories(target_calories));
    }

    let factor = target_calories / source_calories;
    debug!(
        recipe = %recipe.name,
        source_calories,
        target_calories,
        factor,
        "Scaling recipe"
    );

    let ingredients = recipe
        .ingredients
        .iter()
        .map(|i| RecipeIngredient {
            name: i.name.clone(),
            amount: (i.amount * factor).round(),
            unit: i.unit.clone(),
        })
        .collect();

    let n = &recipe.nutritional_info;
    let nutritional_info = NutritionalInfo {
        calories: (n.calories * factor).round(),
        protein: (n.protein * factor).round(),
        carbohydrates: (n.carbohydrates * factor).round(),
        fat: (n.fat * factor).round(),
        fiber: (n.fiber * factor).round(),
    };

    Ok(GeneratedRecipe {
        ingredients,
        nutritional_info,
        servings: scaled_servings(recipe.servings, factor),
        ..recipe.clone()
    })
}

/// Rescale `recipe` to the total calories of a macro allocation
///
/// # Errors
///
/// Returns an error if the recipe or the allocation has no positive calories
pub fn scale_recipe_to_allocation(
    recipe: &GeneratedRecipe,
    allocation: &MacroAllocation,
) -> Result<GeneratedRecipe, ScaleError> {
    scale_recipe(recipe, allocation.total_calories())
}

/// Rounded servings, never below one
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scaled_servings(servings: u32, factor: f64) -> u32 {
    let scaled = (f64::from(servings) * factor).round();
    if scaled < 1.0 {
        1
    } else if scaled > f64::from(u32::MAX) {
        u32::MAX
    } else {
        scaled as u32
    }
}
