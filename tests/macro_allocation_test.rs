// ABOUTME: Integration tests for the macro allocation engine and daily calorie targets
// ABOUTME: Day planning with default weights and adjustments, distribution rules and config checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::collections::HashMap;

use pierre_meal_planner::nutrition::{
    estimate_daily_calories, ActivityLevel, AllocationConfig, AllocationError, BodyProfile,
    ConfigError, Gender, MacroAllocation, MacroAllocationEngine, MealType,
    PartialMacroAllocation, WeightGoal,
};

const TOLERANCE: f64 = 1e-6;

fn engine() -> MacroAllocationEngine {
    MacroAllocationEngine::new(AllocationConfig::default()).unwrap()
}

fn assert_allocation(actual: &MacroAllocation, protein: f64, carbs: f64, fat: f64) {
    assert!(
        (actual.protein_calories - protein).abs() < TOLERANCE
            && (actual.carb_calories - carbs).abs() < TOLERANCE
            && (actual.fat_calories - fat).abs() < TOLERANCE,
        "expected {protein}/{carbs}/{fat}, got {actual:?}"
    );
}

fn assert_same(actual: &MacroAllocation, expected: &MacroAllocation) {
    assert_allocation(
        actual,
        expected.protein_calories,
        expected.carb_calories,
        expected.fat_calories,
    );
}

// ============================================================================
// Allocation Values
// ============================================================================

#[test]
fn test_split_is_two_two_one_and_sums_to_total() {
    let e = engine();
    for total in [1.0, 450.0, 1000.0, 2000.0, 3333.3] {
        let a = e.calculate_macro_calories(total).unwrap();
        assert!((a.total_calories() - total).abs() < TOLERANCE);
        assert_allocation(&a, total * 0.4, total * 0.4, total * 0.2);
    }
}

#[test]
fn test_scale_twice_equals_scale_by_product() {
    let base = MacroAllocation::new(800.0, 800.0, 400.0);
    let factors = [0.0, 0.1, 0.5, 1.0, 1.75, 4.0, -1.0, -0.3];

    for f1 in factors {
        for f2 in factors {
            assert_same(&base.scale(f1).scale(f2), &base.scale(f1 * f2));
        }
    }
    assert_same(&base.scale(0.0), &MacroAllocation::default());
    assert_allocation(&base.scale(-1.0), -800.0, -800.0, -400.0);
}

// ============================================================================
// Distribution
// ============================================================================

#[test]
fn test_even_distribution() {
    let total = MacroAllocation::new(900.0, 900.0, 300.0);
    let meals = engine().distribute(&total, 3, None).unwrap();

    assert_eq!(meals.len(), 3);
    for meal in &meals {
        assert_same(meal, &total.scale(1.0 / 3.0));
    }
}

#[test]
fn test_custom_distribution() {
    let total = MacroAllocation::new(800.0, 800.0, 400.0);
    let meals = engine()
        .distribute(&total, 3, Some(&[25.0, 45.0, 30.0]))
        .unwrap();

    assert_allocation(&meals[0], 200.0, 200.0, 100.0);
    assert_allocation(&meals[1], 360.0, 360.0, 180.0);
    assert_allocation(&meals[2], 240.0, 240.0, 120.0);
}

#[test]
fn test_distribution_tolerates_rounding_drift() {
    let total = MacroAllocation::new(300.0, 300.0, 300.0);
    let third = 100.0 / 3.0;
    assert!(engine()
        .distribute(&total, 3, Some(&[third, third, third]))
        .is_ok());
}

#[test]
fn test_distribution_errors() {
    let total = MacroAllocation::new(100.0, 100.0, 100.0);
    let e = engine();

    assert_eq!(e.distribute(&total, 0, None), Err(AllocationError::NoMeals));
    assert_eq!(
        e.distribute(&total, 3, Some(&[50.0, 50.0])),
        Err(AllocationError::DistributionLength {
            expected: 3,
            actual: 2
        })
    );
    assert_eq!(
        e.distribute(&total, 2, Some(&[60.0, 60.0])),
        Err(AllocationError::DistributionSum(120.0))
    );
    assert_eq!(
        e.distribute(&total, 2, Some(&[120.0, -20.0])),
        Err(AllocationError::NegativeShare(-20.0))
    );
}

#[test]
fn test_adjustments_by_index() {
    let meals = vec![MacroAllocation::new(100.0, 100.0, 100.0); 2];
    let shift = PartialMacroAllocation {
        protein_calories: Some(20.0),
        carb_calories: Some(-20.0),
        fat_calories: None,
    };
    let adjusted = engine().apply_adjustments(&meals, Some(&HashMap::from([(0, shift)])));

    assert_allocation(&adjusted[0], 120.0, 80.0, 100.0);
    assert_allocation(&adjusted[1], 100.0, 100.0, 100.0);
    assert_eq!(engine().apply_adjustments(&meals, None), meals);
}

// ============================================================================
// Day Planning
// ============================================================================

#[test]
fn test_plan_three_meals_with_default_config() {
    let plan = engine()
        .plan_meals(
            2000.0,
            &[MealType::Breakfast, MealType::Lunch, MealType::Dinner],
        )
        .unwrap();

    assert_eq!(plan.len(), 3);
    assert_eq!(plan[0].meal_type, MealType::Breakfast);
    assert_eq!(plan[2].meal_type, MealType::Dinner);

    // Weights 25/35/30 over a 800/800/400 day, then the zero-sum shifts
    let breakfast_share = 25.0 / 90.0;
    assert_allocation(
        &plan[0].allocation,
        800.0 * breakfast_share,
        800.0 * breakfast_share + 25.0,
        400.0 * breakfast_share - 25.0,
    );
    let lunch_share = 35.0 / 90.0;
    assert_allocation(
        &plan[1].allocation,
        800.0 * lunch_share,
        800.0 * lunch_share,
        400.0 * lunch_share,
    );
    let dinner_share = 30.0 / 90.0;
    assert_allocation(
        &plan[2].allocation,
        800.0 * dinner_share + 25.0,
        800.0 * dinner_share - 25.0,
        400.0 * dinner_share,
    );

    let total: f64 = plan.iter().map(|t| t.allocation.total_calories()).sum();
    assert!((total - 2000.0).abs() < TOLERANCE);
}

#[test]
fn test_plan_clamps_small_meals_at_zero() {
    // A 60 kcal breakfast has 12 kcal of fat before the -25 shift
    let plan = engine().plan_meals(60.0, &[MealType::Breakfast]).unwrap();
    assert!(plan[0].allocation.fat_calories.abs() < TOLERANCE);
    assert!(plan[0].allocation.carb_calories > 24.0);
}

#[test]
fn test_plan_rejects_bad_input() {
    let e = engine();
    assert_eq!(
        e.plan_meals(2000.0, &[]).unwrap_err(),
        AllocationError::NoMeals
    );
    assert!(matches!(
        e.plan_meals(-1.0, &[MealType::Lunch]),
        Err(AllocationError::NonPositiveCalories(_))
    ));
}

#[test]
fn test_plan_with_custom_weights() {
    let config = AllocationConfig {
        meal_weights: HashMap::from([(MealType::Lunch, 3.0), (MealType::Dinner, 1.0)]),
        meal_adjustments: HashMap::new(),
    };

    let plan = MacroAllocationEngine::new(config)
        .unwrap()
        .plan_meals(2000.0, &[MealType::Lunch, MealType::Dinner])
        .unwrap();
    assert_allocation(&plan[0].allocation, 600.0, 600.0, 300.0);
    assert_allocation(&plan[1].allocation, 200.0, 200.0, 100.0);
}

#[test]
fn test_grams_for_planned_meal() {
    let grams = MacroAllocation::new(200.0, 240.0, 135.0).to_grams();
    assert!((grams.protein_g - 50.0).abs() < TOLERANCE);
    assert!((grams.carbs_g - 60.0).abs() < TOLERANCE);
    assert!((grams.fat_g - 15.0).abs() < TOLERANCE);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_adjustments_must_be_finite() {
    let mut config = AllocationConfig::default();
    config.meal_adjustments.insert(
        MealType::Lunch,
        PartialMacroAllocation {
            fat_calories: Some(f64::NAN),
            ..PartialMacroAllocation::default()
        },
    );
    assert!(matches!(
        MacroAllocationEngine::new(config),
        Err(ConfigError::ValueOutOfRange(_))
    ));
}

#[test]
fn test_weights_must_be_positive() {
    let mut config = AllocationConfig::default();
    config.meal_weights.insert(MealType::Snack, 0.0);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValueOutOfRange(_))
    ));
    assert!(MacroAllocationEngine::new(config).is_err());
}

// ============================================================================
// Daily Targets
// ============================================================================

#[test]
fn test_daily_estimate_feeds_planner() {
    let profile = BodyProfile {
        weight_kg: 70.0,
        height_cm: 175.0,
        age: 30,
        gender: Gender::Male,
        activity_level: ActivityLevel::ModeratelyActive,
        goal: WeightGoal::Maintain,
    };
    let daily = estimate_daily_calories(&profile).unwrap();
    assert!(daily > 2000.0 && daily < 3000.0, "daily estimate {daily}");

    let plan = engine().plan_meals(daily, &MealType::ALL).unwrap();
    assert_eq!(plan.len(), 4);
    let total: f64 = plan.iter().map(|t| t.allocation.total_calories()).sum();
    assert!((total - daily).abs() < TOLERANCE);
}
