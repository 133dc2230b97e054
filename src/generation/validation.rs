// ABOUTME: Input validation for recipe generation requests before any provider call
// ABOUTME: Separates hard failures (validation errors) from soft warnings that are logged
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Request validation
//!
//! A hard failure is returned as [`ProviderError::Validation`] and the
//! request never reaches the network. Soft findings are collected as
//! [`ValidationWarning`]s, logged, and the request proceeds.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use tracing::warn;

use pierre_nutrition::allocation::{CARB_KCAL_PER_G, FAT_KCAL_PER_G, PROTEIN_KCAL_PER_G};
use pierre_nutrition::{DietType, Difficulty, MealType};

use super::GenerationRequest;
use crate::llm::ProviderError;

/// Protein above this is suspicious for any single recipe (g)
pub const PROTEIN_WARN_G: f64 = 200.0;
/// Carbohydrate above this is suspicious (g)
pub const CARBS_WARN_G: f64 = 500.0;
/// Fat above this is suspicious (g)
pub const FAT_WARN_G: f64 = 200.0;
/// Allowed total time range (minutes)
pub const TOTAL_TIME_RANGE: RangeInclusive<u32> = 1..=480;
/// Allowed servings range
pub const SERVINGS_RANGE: RangeInclusive<u32> = 1..=20;
/// Allowed calorie target range (kcal)
pub const CALORIES_RANGE: RangeInclusive<f64> = 50.0..=5000.0;
/// Relative tolerance between macro-implied calories and the calorie target
pub const MACRO_CONSISTENCY_TOLERANCE: f64 = 0.15;
/// Protein above this is flagged for vegan/vegetarian requests (g)
pub const PLANT_FORWARD_PROTEIN_WARN_G: f64 = 120.0;
/// Carbohydrate above this is flagged for keto requests (g)
pub const KETO_CARBS_WARN_G: f64 = 50.0;

/// Non-fatal finding about a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    /// Field the finding is about
    pub field: String,
    /// Human-readable explanation
    pub message: String,
}

impl ValidationWarning {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_owned(),
            message: message.into(),
        }
    }
}

/// A request that passed validation, with required fields unwrapped
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    /// Dietary regime
    pub diet_type: DietType,
    /// Meal slot
    pub meal_type: MealType,
    /// Difficulty tier
    pub difficulty: Difficulty,
    /// Number of servings
    pub servings: u32,
    /// Time budget in minutes
    pub total_time_mins: u32,
    /// Protein target (g)
    pub protein_target: f64,
    /// Calorie target (kcal)
    pub calorie_target: Option<f64>,
    /// Carbohydrate target (g)
    pub carb_target: Option<f64>,
    /// Fat target (g)
    pub fat_target: Option<f64>,
    /// Allergens that must be excluded
    pub allergies: Vec<String>,
    /// Ingredients to avoid
    pub disliked_ingredients: Vec<String>,
    /// Cuisines to lean towards
    pub preferred_cuisines: Vec<String>,
    /// Additional restrictions
    pub dietary_restrictions: Vec<String>,
    /// Soft findings
    pub warnings: Vec<ValidationWarning>,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ProviderError> {
    value.ok_or_else(|| ProviderError::missing_field(field))
}

fn non_negative_finite(value: f64, field: &str) -> Result<f64, ProviderError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ProviderError::validation(
            Some(field),
            format!("{field} must be a non-negative number, got {value}"),
        ))
    }
}

fn clean_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Validate a request before any provider call
///
/// # Errors
///
/// Returns [`ProviderError::Validation`] naming the first field that is
/// missing or outside its hard bounds
pub fn validate_request(request: &GenerationRequest) -> Result<ValidatedRequest, ProviderError> {
    let diet_type = required(request.diet_type, "dietType")?;
    let meal_type = required(request.meal_type, "mealType")?;
    let difficulty = required(request.difficulty, "difficulty")?;
    let protein_target = non_negative_finite(
        required(request.protein_target, "proteinTarget")?,
        "proteinTarget",
    )?;
    let total_time_mins = required(request.total_time_mins, "totalTime")?;
    let servings = required(request.servings, "servings")?;

    if !TOTAL_TIME_RANGE.contains(&total_time_mins) {
        return Err(ProviderError::validation(
            Some("totalTime"),
            format!(
                "total time must be between {} and {} minutes, got {total_time_mins}",
                TOTAL_TIME_RANGE.start(),
                TOTAL_TIME_RANGE.end()
            ),
        ));
    }
    if !SERVINGS_RANGE.contains(&servings) {
        return Err(ProviderError::validation(
            Some("servings"),
            format!(
                "servings must be between {} and {}, got {servings}",
                SERVINGS_RANGE.start(),
                SERVINGS_RANGE.end()
            ),
        ));
    }

    let calorie_target = match request.calorie_target {
        Some(calories) if !calories.is_finite() || !CALORIES_RANGE.contains(&calories) => {
            return Err(ProviderError::validation(
                Some("calorieTarget"),
                format!(
                    "calories must be between {} and {}, got {calories}",
                    CALORIES_RANGE.start(),
                    CALORIES_RANGE.end()
                ),
            ));
        }
        other => other,
    };
    let carb_target = request
        .carb_target
        .map(|c| non_negative_finite(c, "carbTarget"))
        .transpose()?;
    let fat_target = request
        .fat_target
        .map(|f| non_negative_finite(f, "fatTarget"))
        .transpose()?;

    let mut warnings = Vec::new();
    if protein_target > PROTEIN_WARN_G {
        warnings.push(ValidationWarning::new(
            "proteinTarget",
            format!("{protein_target}g protein is unusually high for one recipe"),
        ));
    }
    if let Some(carbs) = carb_target.filter(|c| *c > CARBS_WARN_G) {
        warnings.push(ValidationWarning::new(
            "carbTarget",
            format!("{carbs}g carbohydrate is unusually high for one recipe"),
        ));
    }
    if let Some(fat) = fat_target.filter(|f| *f > FAT_WARN_G) {
        warnings.push(ValidationWarning::new(
            "fatTarget",
            format!("{fat}g fat is unusually high for one recipe"),
        ));
    }
    if let (Some(calories), Some(carbs), Some(fat)) = (calorie_target, carb_target, fat_target) {
        if let Some(warning) = macro_consistency_warning(calories, protein_target, carbs, fat) {
            warnings.push(warning);
        }
    }
    warnings.extend(diet_warnings(diet_type, protein_target, carb_target));

    for warning in &warnings {
        warn!(field = %warning.field, "Generation request warning: {}", warning.message);
    }

    Ok(ValidatedRequest {
        diet_type,
        meal_type,
        difficulty,
        servings,
        total_time_mins,
        protein_target,
        calorie_target,
        carb_target,
        fat_target,
        allergies: clean_list(&request.allergies),
        disliked_ingredients: clean_list(&request.disliked_ingredients),
        preferred_cuisines: clean_list(&request.preferred_cuisines),
        dietary_restrictions: clean_list(&request.dietary_restrictions),
        warnings,
    })
}

/// Warn when `protein*4 + carbs*4 + fat*9` is more than 15% away from the
/// calorie target
#[must_use]
pub fn macro_consistency_warning(
    calories: f64,
    protein_g: f64,
    carbs_g: f64,
    fat_g: f64,
) -> Option<ValidationWarning> {
    let implied = fat_g.mul_add(
        FAT_KCAL_PER_G,
        protein_g.mul_add(PROTEIN_KCAL_PER_G, carbs_g * CARB_KCAL_PER_G),
    );
    let deviation = (implied - calories).abs() / calories;
    (deviation > MACRO_CONSISTENCY_TOLERANCE).then(|| {
        ValidationWarning::new(
            "calorieTarget",
            format!(
                "macro targets imply {implied:.0} kcal but the calorie target is {calories:.0} kcal ({:.0}% apart)",
                deviation * 100.0
            ),
        )
    })
}

fn diet_warnings(
    diet_type: DietType,
    protein_g: f64,
    carb_target: Option<f64>,
) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    if diet_type.is_plant_forward() && protein_g > PLANT_FORWARD_PROTEIN_WARN_G {
        warnings.push(ValidationWarning::new(
            "proteinTarget",
            format!(
                "{protein_g}g protein is hard to reach in a single {diet_type} recipe without supplements"
            ),
        ));
    }
    if diet_type == DietType::Keto {
        if let Some(carbs) = carb_target.filter(|c| *c > KETO_CARBS_WARN_G) {
            warnings.push(ValidationWarning::new(
                "carbTarget",
                format!("{carbs}g carbohydrate is incompatible with a keto recipe"),
            ));
        }
    }
    warnings
}
