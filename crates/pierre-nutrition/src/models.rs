// ABOUTME: Recipe value types and the diet, meal and difficulty vocabularies shared across the planner
// ABOUTME: Defines GeneratedRecipe, RecipeIngredient, RecipeInstruction, NutritionalInfo and enums
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Error returned when a vocabulary value is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {vocabulary} '{value}'")]
pub struct UnknownVariant {
    /// Which vocabulary was being parsed (diet type, meal type, ...)
    pub vocabulary: &'static str,
    /// The rejected input
    pub value: String,
}

/// Categorical dietary regime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DietType {
    /// No dietary restriction
    #[default]
    Standard,
    /// No animal products
    Vegan,
    /// No meat or fish
    Vegetarian,
    /// Vegetarian plus fish and seafood
    Pescatarian,
    /// Very low carbohydrate, high fat
    Keto,
    /// No grains, legumes, dairy or processed food
    Paleo,
}

impl DietType {
    /// All supported diet types, in display order
    pub const ALL: [Self; 6] = [
        Self::Standard,
        Self::Vegan,
        Self::Vegetarian,
        Self::Pescatarian,
        Self::Keto,
        Self::Paleo,
    ];

    /// Lowercase identifier used in prompts and payloads
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Vegan => "vegan",
            Self::Vegetarian => "vegetarian",
            Self::Pescatarian => "pescatarian",
            Self::Keto => "keto",
            Self::Paleo => "paleo",
        }
    }

    /// Whether the diet excludes meat
    #[must_use]
    pub const fn is_plant_forward(&self) -> bool {
        matches!(self, Self::Vegan | Self::Vegetarian)
    }
}

impl Display for DietType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DietType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant {
                vocabulary: "diet type",
                value: s.to_owned(),
            })
    }
}

/// Meal slot within a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    /// Morning meal
    Breakfast,
    /// Midday meal
    Lunch,
    /// Evening meal
    Dinner,
    /// Small meal between main meals
    Snack,
}

impl MealType {
    /// All supported meal types, in the order they occur during a day
    pub const ALL: [Self; 4] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snack];

    /// Lowercase identifier used in prompts and payloads
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        }
    }
}

impl Display for MealType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant {
                vocabulary: "meal type",
                value: s.to_owned(),
            })
    }
}

/// Cooking difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Few ingredients, basic techniques
    Easy,
    /// Some technique required
    #[default]
    Medium,
    /// Multi-stage, advanced techniques
    Hard,
}

impl Difficulty {
    /// All supported difficulty tiers
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Lowercase identifier used in prompts and payloads
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant {
                vocabulary: "difficulty",
                value: s.to_owned(),
            })
    }
}

/// Single ingredient line of a generated recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    /// Human-readable ingredient name
    pub name: String,
    /// Amount in `unit`
    pub amount: f64,
    /// Free-form unit as produced by the provider (g, ml, cup, piece, ...)
    pub unit: String,
}

/// Ordered cooking step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeInstruction {
    /// 1-based position of the step
    pub step_number: u32,
    /// What to do
    pub description: String,
}

/// Free-form recipe tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeTag {
    /// Tag label
    pub name: String,
}

/// Nutrition block of a recipe (whole recipe as reported by the provider)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutritionalInfo {
    /// Energy in kcal
    pub calories: f64,
    /// Protein in grams
    pub protein: f64,
    /// Carbohydrates in grams
    pub carbohydrates: f64,
    /// Fat in grams
    pub fat: f64,
    /// Fiber in grams
    pub fiber: f64,
}

/// A validated recipe produced from provider output
///
/// Values are never mutated after creation; rescaling produces a new recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedRecipe {
    /// Recipe name
    pub name: String,
    /// Short description
    pub description: String,
    /// Ordered ingredient list
    pub ingredients: Vec<RecipeIngredient>,
    /// Ordered instruction list
    pub instructions: Vec<RecipeInstruction>,
    /// Preparation time in minutes
    pub prep_time: u32,
    /// Cooking time in minutes
    pub cook_time: u32,
    /// Number of servings
    pub servings: u32,
    /// Meal types this recipe suits
    pub meal_types: Vec<String>,
    /// Diets this recipe complies with
    pub diet_types: Vec<String>,
    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<RecipeTag>,
    /// Difficulty label
    pub difficulty: String,
    /// Nutrition block
    pub nutritional_info: NutritionalInfo,
}

impl GeneratedRecipe {
    /// Prep plus cook time in minutes
    #[must_use]
    pub const fn total_time_mins(&self) -> u32 {
        self.prep_time.saturating_add(self.cook_time)
    }
}
