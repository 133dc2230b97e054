// ABOUTME: Structured recipe generation request supplied by callers
// ABOUTME: Diet, meal, difficulty, servings, time budget, macro targets and exclusion lists
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use pierre_nutrition::{DietType, Difficulty, MacroAllocation, MealType};

/// Structured input describing the recipe to produce
///
/// Required fields are `Option`s so that a request deserialized from a caller
/// can be checked by [`validate_request`](super::validate_request) before any
/// provider call instead of failing at the serde boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Dietary regime
    pub diet_type: Option<DietType>,
    /// Meal slot
    pub meal_type: Option<MealType>,
    /// Difficulty tier
    pub difficulty: Option<Difficulty>,
    /// Number of servings (1-20)
    pub servings: Option<u32>,
    /// Prep plus cook time budget in minutes (1-480)
    pub total_time_mins: Option<u32>,
    /// Calorie target (kcal)
    pub calorie_target: Option<f64>,
    /// Protein target (g)
    pub protein_target: Option<f64>,
    /// Carbohydrate target (g)
    pub carb_target: Option<f64>,
    /// Fat target (g)
    pub fat_target: Option<f64>,
    /// Allergens that must be excluded
    #[serde(default)]
    pub allergies: Vec<String>,
    /// Ingredients the eater dislikes
    #[serde(default)]
    pub disliked_ingredients: Vec<String>,
    /// Cuisines to lean towards
    #[serde(default)]
    pub preferred_cuisines: Vec<String>,
    /// Additional free-form restrictions (e.g. "low sodium")
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
}

impl GenerationRequest {
    /// Request for a diet, meal and difficulty; remaining fields start empty
    #[must_use]
    pub fn new(diet_type: DietType, meal_type: MealType, difficulty: Difficulty) -> Self {
        Self {
            diet_type: Some(diet_type),
            meal_type: Some(meal_type),
            difficulty: Some(difficulty),
            ..Self::default()
        }
    }

    /// Set servings
    #[must_use]
    pub const fn with_servings(mut self, servings: u32) -> Self {
        self.servings = Some(servings);
        self
    }

    /// Set the total time budget
    #[must_use]
    pub const fn with_total_time(mut self, minutes: u32) -> Self {
        self.total_time_mins = Some(minutes);
        self
    }

    /// Set the protein target in grams
    #[must_use]
    pub const fn with_protein_target(mut self, grams: f64) -> Self {
        self.protein_target = Some(grams);
        self
    }

    /// Fill all four nutrition targets from a per-meal allocation
    #[must_use]
    pub fn with_targets(mut self, allocation: &MacroAllocation) -> Self {
        let grams = allocation.to_grams();
        self.calorie_target = Some(allocation.total_calories().round());
        self.protein_target = Some(grams.protein_g.round());
        self.carb_target = Some(grams.carbs_g.round());
        self.fat_target = Some(grams.fat_g.round());
        self
    }

    /// Add an allergen to exclude
    #[must_use]
    pub fn with_allergy(mut self, allergen: impl Into<String>) -> Self {
        self.allergies.push(allergen.into());
        self
    }
}
