// ABOUTME: Macro allocation engine turning a daily calorie figure into per-meal macro budgets
// ABOUTME: Immutable MacroAllocation values with scale/add, even or custom distribution, adjustments
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Macro Allocation
//!
//! A [`MacroAllocation`] is a calorie budget split across protein, carbohydrate
//! and fat. Every operation returns a new value.
//!
//! ```
//! use pierre_nutrition::{AllocationConfig, MacroAllocationEngine};
//!
//! let engine = MacroAllocationEngine::new(AllocationConfig::default()).unwrap();
//! let daily = engine.calculate_macro_calories(2000.0).unwrap();
//! let meals = engine.distribute(&daily, 4, None).unwrap();
//! assert_eq!(meals.len(), 4);
//! ```

use crate::config::{AllocationConfig, ConfigError};
use crate::models::MealType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// kcal per gram of protein
pub const PROTEIN_KCAL_PER_G: f64 = 4.0;
/// kcal per gram of carbohydrate
pub const CARB_KCAL_PER_G: f64 = 4.0;
/// kcal per gram of fat
pub const FAT_KCAL_PER_G: f64 = 9.0;

/// Share of a calorie total given to protein
pub const PROTEIN_SHARE: f64 = 0.4;
/// Share of a calorie total given to carbohydrates
pub const CARB_SHARE: f64 = 0.4;
/// Share of a calorie total given to fat
pub const FAT_SHARE: f64 = 0.2;

/// Errors raised by the allocation engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocationError {
    /// Calorie total was zero, negative or not a number
    #[error("Total calories must be positive, got {0}")]
    NonPositiveCalories(f64),

    /// Distribution requested over zero meals
    #[error("Meal count must be at least 1")]
    NoMeals,

    /// Custom distribution length differs from the meal count
    #[error("Distribution has {actual} entries but {expected} meals were requested")]
    DistributionLength {
        /// Requested meal count
        expected: usize,
        /// Entries in the supplied distribution
        actual: usize,
    },

    /// Custom distribution does not sum to 100 once rounded
    #[error("Distribution must sum to 100, got {0}")]
    DistributionSum(f64),

    /// Custom distribution contains a negative or non-finite share
    #[error("Distribution shares must be non-negative, got {0}")]
    NegativeShare(f64),
}

/// Calorie budget split across the three macronutrients
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MacroAllocation {
    /// Calories from protein
    pub protein_calories: f64,
    /// Calories from carbohydrates
    pub carb_calories: f64,
    /// Calories from fat
    pub fat_calories: f64,
}

/// Allocation where any field may be absent; absent fields count as zero
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PartialMacroAllocation {
    /// Calories from protein
    pub protein_calories: Option<f64>,
    /// Calories from carbohydrates
    pub carb_calories: Option<f64>,
    /// Calories from fat
    pub fat_calories: Option<f64>,
}

impl From<MacroAllocation> for PartialMacroAllocation {
    fn from(a: MacroAllocation) -> Self {
        Self {
            protein_calories: Some(a.protein_calories),
            carb_calories: Some(a.carb_calories),
            fat_calories: Some(a.fat_calories),
        }
    }
}

/// Macro budget expressed in grams
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroGrams {
    /// Protein in grams
    pub protein_g: f64,
    /// Carbohydrates in grams
    pub carbs_g: f64,
    /// Fat in grams
    pub fat_g: f64,
}

impl MacroAllocation {
    /// Create an allocation from three calorie figures
    #[must_use]
    pub const fn new(protein_calories: f64, carb_calories: f64, fat_calories: f64) -> Self {
        Self {
            protein_calories,
            carb_calories,
            fat_calories,
        }
    }

    /// Multiply all three figures by `factor`; no bounds checking
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            protein_calories: self.protein_calories * factor,
            carb_calories: self.carb_calories * factor,
            fat_calories: self.fat_calories * factor,
        }
    }

    /// Elementwise sum, treating absent fields of `other` as zero
    #[must_use]
    pub fn add(&self, other: &PartialMacroAllocation) -> Self {
        Self {
            protein_calories: self.protein_calories + other.protein_calories.unwrap_or(0.0),
            carb_calories: self.carb_calories + other.carb_calories.unwrap_or(0.0),
            fat_calories: self.fat_calories + other.fat_calories.unwrap_or(0.0),
        }
    }

    /// Sum of the three calorie figures
    #[must_use]
    pub fn total_calories(&self) -> f64 {
        self.protein_calories + self.carb_calories + self.fat_calories
    }

    /// Convert calorie figures to grams (4/4/9 kcal per gram)
    #[must_use]
    pub fn to_grams(&self) -> MacroGrams {
        MacroGrams {
            protein_g: self.protein_calories / PROTEIN_KCAL_PER_G,
            carbs_g: self.carb_calories / CARB_KCAL_PER_G,
            fat_g: self.fat_calories / FAT_KCAL_PER_G,
        }
    }

    /// Same allocation with negative figures raised to zero
    #[must_use]
    pub fn clamped_non_negative(&self) -> Self {
        Self {
            protein_calories: self.protein_calories.max(0.0),
            carb_calories: self.carb_calories.max(0.0),
            fat_calories: self.fat_calories.max(0.0),
        }
    }
}

/// Macro budget for one meal slot of a planned day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MealTarget {
    /// Which meal this budget is for
    pub meal_type: MealType,
    /// Calorie budget for the meal
    pub allocation: MacroAllocation,
}

/// Turns calorie totals into macro budgets using an injected configuration
#[derive(Debug, Clone, Default)]
pub struct MacroAllocationEngine {
    config: AllocationConfig,
}

impl MacroAllocationEngine {
    /// Create an engine over a validated configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a meal weight or adjustment is invalid
    pub fn new(config: AllocationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &AllocationConfig {
        &self.config
    }

    /// Split a calorie total 40/40/20 across protein, carbohydrate and fat
    ///
    /// The ratio is fixed; only meal weights and adjustments are configurable.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::NonPositiveCalories`] when `total_calories <= 0`
    pub fn calculate_macro_calories(
        &self,
        total_calories: f64,
    ) -> Result<MacroAllocation, AllocationError> {
        if !total_calories.is_finite() || total_calories <= 0.0 {
            return Err(AllocationError::NonPositiveCalories(total_calories));
        }

        Ok(MacroAllocation {
            protein_calories: total_calories * PROTEIN_SHARE,
            carb_calories: total_calories * CARB_SHARE,
            fat_calories: total_calories * FAT_SHARE,
        })
    }

    /// Distribute an allocation over `meal_count` meals
    ///
    /// Without a distribution every meal receives `100 / meal_count` percent.
    /// A custom distribution must have exactly `meal_count` entries that sum
    /// to 100 once rounded.
    ///
    /// # Errors
    ///
    /// Returns an error for zero meals, a length mismatch, a negative share,
    /// or a sum other than 100
    pub fn distribute(
        &self,
        total: &MacroAllocation,
        meal_count: usize,
        distribution: Option<&[f64]>,
    ) -> Result<Vec<MacroAllocation>, AllocationError> {
        if meal_count == 0 {
            return Err(AllocationError::NoMeals);
        }

        let Some(shares) = distribution else {
            let factor = 1.0 / meal_count as f64;
            return Ok(vec![total.scale(factor); meal_count]);
        };

        if shares.len() != meal_count {
            return Err(AllocationError::DistributionLength {
                expected: meal_count,
                actual: shares.len(),
            });
        }
        if let Some(bad) = shares.iter().find(|s| !s.is_finite() || **s < 0.0) {
            return Err(AllocationError::NegativeShare(*bad));
        }
        let sum: f64 = shares.iter().sum();
        if (sum.round() - 100.0).abs() > f64::EPSILON {
            return Err(AllocationError::DistributionSum(sum));
        }

        Ok(shares.iter().map(|pct| total.scale(pct / 100.0)).collect())
    }

    /// Add each registered adjustment to the allocation at its index
    ///
    /// Indices without an adjustment pass through unchanged.
    #[must_use]
    pub fn apply_adjustments(
        &self,
        allocations: &[MacroAllocation],
        adjustments: Option<&HashMap<usize, PartialMacroAllocation>>,
    ) -> Vec<MacroAllocation> {
        allocations
            .iter()
            .enumerate()
            .map(|(index, allocation)| {
                adjustments
                    .and_then(|a| a.get(&index))
                    .map_or(*allocation, |adjustment| allocation.add(adjustment))
            })
            .collect()
    }

    /// Plan a day: split the daily total, distribute it over the meal slots
    /// by configured weight, then apply the configured per-meal adjustments
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive calorie total or an empty meal list
    pub fn plan_meals(
        &self,
        daily_calories: f64,
        meals: &[MealType],
    ) -> Result<Vec<MealTarget>, AllocationError> {
        if meals.is_empty() {
            return Err(AllocationError::NoMeals);
        }

        let daily = self.calculate_macro_calories(daily_calories)?;

        let weights: Vec<f64> = meals.iter().map(|m| self.config.weight_for(*m)).collect();
        let weight_sum: f64 = weights.iter().sum();
        let shares: Vec<f64> = weights.iter().map(|w| w / weight_sum * 100.0).collect();

        let distributed = self.distribute(&daily, meals.len(), Some(&shares))?;

        let adjustments: HashMap<usize, PartialMacroAllocation> = meals
            .iter()
            .enumerate()
            .filter_map(|(index, meal)| {
                self.config
                    .meal_adjustments
                    .get(meal)
                    .map(|adjustment| (index, *adjustment))
            })
            .collect();

        let adjusted = self.apply_adjustments(&distributed, Some(&adjustments));

        debug!(
            daily_calories,
            meal_count = meals.len(),
            adjusted_meals = adjustments.len(),
            "Planned per-meal macro budgets"
        );

        Ok(meals
            .iter()
            .zip(adjusted)
            .map(|(meal_type, allocation)| MealTarget {
                meal_type: *meal_type,
                allocation: allocation.clamped_non_negative(),
            })
            .collect())
    }
}
