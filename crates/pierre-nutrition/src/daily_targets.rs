// ABOUTME: Daily calorie target estimation from a body profile for meal planning
// ABOUTME: Mifflin-St Jeor BMR, activity multiplier and goal adjustment with input validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Daily calorie estimation
//!
//! Produces the daily calorie figure that the allocation engine splits into
//! per-meal budgets.
//!
//! # Scientific References
//!
//! - Mifflin, M.D., et al. (1990). A new predictive equation for resting energy expenditure.
//!   *American Journal of Clinical Nutrition*, 51(2), 241-247.
//!   <https://doi.org/10.1093/ajcn/51.2.241>

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest daily target the planner will hand out (kcal/day)
pub const MIN_DAILY_CALORIES: f64 = 1200.0;

/// Invalid body profile
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    /// A profile field is outside the range the formula is validated for
    #[error("Invalid profile: {0}")]
    OutOfRange(&'static str),
}

/// Biological sex used by the BMR formula
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male constant (+5)
    Male,
    /// Female constant (-161)
    Female,
}

/// Habitual activity level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// 1-3 days/week
    LightlyActive,
    /// 3-5 days/week
    ModeratelyActive,
    /// 6-7 days/week
    VeryActive,
    /// Hard training twice a day
    ExtraActive,
}

impl ActivityLevel {
    /// TDEE multiplier (`McArdle` et al. 2010)
    #[must_use]
    pub const fn factor(&self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::LightlyActive => 1.375,
            Self::ModeratelyActive => 1.55,
            Self::VeryActive => 1.725,
            Self::ExtraActive => 1.9,
        }
    }
}

/// Weight goal of the diet plan
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeightGoal {
    /// Caloric deficit
    LoseWeight,
    /// Caloric balance
    #[default]
    Maintain,
    /// Caloric surplus
    GainWeight,
}

impl WeightGoal {
    /// Daily kcal offset applied to TDEE
    #[must_use]
    pub const fn calorie_offset(&self) -> f64 {
        match self {
            Self::LoseWeight => -500.0,
            Self::Maintain => 0.0,
            Self::GainWeight => 300.0,
        }
    }
}

/// Inputs for the daily calorie estimate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyProfile {
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Height in centimeters
    pub height_cm: f64,
    /// Age in years
    pub age: u32,
    /// Biological sex
    pub gender: Gender,
    /// Activity level
    pub activity_level: ActivityLevel,
    /// Weight goal
    pub goal: WeightGoal,
}

/// Basal Metabolic Rate using Mifflin-St Jeor
///
/// `BMR = 10 * weight_kg + 6.25 * height_cm - 5 * age + (5 | -161)`
///
/// # Errors
///
/// Returns an error if weight, height or age is out of range
pub fn calculate_bmr(profile: &BodyProfile) -> Result<f64, ProfileError> {
    if !(profile.weight_kg > 0.0 && profile.weight_kg <= 300.0) {
        return Err(ProfileError::OutOfRange(
            "weight must be between 0 and 300 kg",
        ));
    }
    if !(profile.height_cm > 0.0 && profile.height_cm <= 300.0) {
        return Err(ProfileError::OutOfRange(
            "height must be between 0 and 300 cm",
        ));
    }
    if !(10..=120).contains(&profile.age) {
        return Err(ProfileError::OutOfRange(
            "age must be between 10 and 120 years",
        ));
    }

    let gender_constant = match profile.gender {
        Gender::Male => 5.0,
        Gender::Female => -161.0,
    };

    Ok(10.0f64.mul_add(
        profile.weight_kg,
        6.25f64.mul_add(profile.height_cm, -5.0 * f64::from(profile.age)),
    ) + gender_constant)
}

/// Daily calorie target: BMR x activity factor + goal offset, floored at
/// [`MIN_DAILY_CALORIES`]
///
/// # Errors
///
/// Returns an error if the profile is out of range
pub fn estimate_daily_calories(profile: &BodyProfile) -> Result<f64, ProfileError> {
    let tdee = calculate_bmr(profile)? * profile.activity_level.factor();
    Ok((tdee + profile.goal.calorie_offset())
        .round()
        .max(MIN_DAILY_CALORIES))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> BodyProfile {
        BodyProfile {
            weight_kg: 75.0,
            height_cm: 180.0,
            age: 30,
            gender: Gender::Male,
            activity_level: ActivityLevel::Sedentary,
            goal: WeightGoal::Maintain,
        }
    }

    #[test]
    fn test_bmr_male_typical() {
        // 750 + 1125 - 150 + 5
        let bmr = calculate_bmr(&profile()).unwrap();
        assert!((bmr - 1730.0).abs() < 1e-9);
    }

    #[test]
    fn test_daily_calories_with_goal() {
        let maintain = estimate_daily_calories(&profile()).unwrap();
        assert!((maintain - 2076.0).abs() < 1e-9);

        let lose = estimate_daily_calories(&BodyProfile {
            goal: WeightGoal::LoseWeight,
            ..profile()
        })
        .unwrap();
        assert!((lose - 1576.0).abs() < 1e-9);
    }

    #[test]
    fn test_floor_applied() {
        let small = BodyProfile {
            weight_kg: 40.0,
            height_cm: 140.0,
            age: 70,
            gender: Gender::Female,
            activity_level: ActivityLevel::Sedentary,
            goal: WeightGoal::LoseWeight,
        };
        assert!((estimate_daily_calories(&small).unwrap() - MIN_DAILY_CALORIES).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let bad = BodyProfile {
            age: 5,
            ..profile()
        };
        assert!(calculate_bmr(&bad).is_err());
    }
}
