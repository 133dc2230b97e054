// ABOUTME: Injected configuration for the macro allocation engine
// ABOUTME: Per-meal-type weights and per-meal-type calorie adjustments used when planning a day
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Allocation configuration.
//!
//! The engine never reads module-level state: every table it uses lives in an
//! [`AllocationConfig`] value handed to it at construction. The 40/40/20
//! macro split itself is fixed and not part of the configuration.

use crate::allocation::PartialMacroAllocation;
use crate::models::MealType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Numeric value outside valid range for parameter
    #[error("Value out of range: {0}")]
    ValueOutOfRange(String),
}

/// Macro allocation engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationConfig {
    /// Relative weight of each meal type when planning a day
    pub meal_weights: HashMap<MealType, f64>,
    /// Calorie shifts applied to a meal type after distribution
    pub meal_adjustments: HashMap<MealType, PartialMacroAllocation>,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        let meal_weights = HashMap::from([
            (MealType::Breakfast, 25.0),
            (MealType::Lunch, 35.0),
            (MealType::Dinner, 30.0),
            (MealType::Snack, 10.0),
        ]);

        // Zero-sum shifts: carb-leaning breakfast, protein-leaning dinner
        let meal_adjustments = HashMap::from([
            (
                MealType::Breakfast,
                PartialMacroAllocation {
                    protein_calories: None,
                    carb_calories: Some(25.0),
                    fat_calories: Some(-25.0),
                },
            ),
            (
                MealType::Dinner,
                PartialMacroAllocation {
                    protein_calories: Some(25.0),
                    carb_calories: Some(-25.0),
                    fat_calories: None,
                },
            ),
        ]);

        Self {
            meal_weights,
            meal_adjustments,
        }
    }
}

impl AllocationConfig {
    /// Weight for a meal type; unknown meal types weigh the same as a snack
    #[must_use]
    pub fn weight_for(&self, meal_type: MealType) -> f64 {
        self.meal_weights
            .get(&meal_type)
            .copied()
            .unwrap_or(DEFAULT_MEAL_WEIGHT)
    }

    /// Validate the meal weights and adjustments
    ///
    /// # Errors
    ///
    /// Returns an error if any weight is not positive or an adjustment is not finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (meal_type, weight) in &self.meal_weights {
            if !weight.is_finite() || *weight <= 0.0 {
                return Err(ConfigError::ValueOutOfRange(format!(
                    "{meal_type} weight must be positive, got {weight}"
                )));
            }
        }
        for (meal_type, adjustment) in &self.meal_adjustments {
            let figures = [
                adjustment.protein_calories,
                adjustment.carb_calories,
                adjustment.fat_calories,
            ];
            if figures.iter().flatten().any(|v| !v.is_finite()) {
                return Err(ConfigError::ValueOutOfRange(format!(
                    "{meal_type} adjustment must be finite, got {figures:?}"
                )));
            }
        }
        Ok(())
    }
}

/// Weight used for meal types missing from the weight table
const DEFAULT_MEAL_WEIGHT: f64 = 10.0;
