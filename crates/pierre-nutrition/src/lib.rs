// ABOUTME: Pure nutrition math for the Pierre meal planner
// ABOUTME: Recipe value types, macro allocation engine, recipe scaler and daily calorie targets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Nutrition
//!
//! I/O-free numeric core of the meal planner. Nothing in this crate touches
//! the network or global state, so every function is deterministic for its
//! inputs.
//!
//! ## Modules
//!
//! - **models**: `GeneratedRecipe` and the diet/meal/difficulty vocabularies
//! - **allocation**: `MacroAllocation` values and the `MacroAllocationEngine`
//! - **scaler**: rescaling a recipe to a calorie target
//! - **daily_targets**: daily calorie estimate from a body profile
//! - **config**: injected allocation configuration

/// Macro allocation engine and allocation value types
pub mod allocation;
/// Allocation engine configuration
pub mod config;
/// Daily calorie estimation from a body profile
pub mod daily_targets;
/// Recipe value types and enum vocabularies
pub mod models;
/// Recipe rescaling
pub mod scaler;

pub use allocation::{
    AllocationError, MacroAllocation, MacroAllocationEngine, MacroGrams, MealTarget,
    PartialMacroAllocation,
};
pub use config::{AllocationConfig, ConfigError};
pub use daily_targets::{
    estimate_daily_calories, ActivityLevel, BodyProfile, Gender, ProfileError, WeightGoal,
};
pub use models::{
    DietType, Difficulty, GeneratedRecipe, MealType, NutritionalInfo, RecipeIngredient,
    RecipeInstruction, RecipeTag, UnknownVariant,
};
pub use scaler::{scale_recipe, scale_recipe_to_allocation, ScaleError};
