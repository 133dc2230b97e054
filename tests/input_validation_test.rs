// ABOUTME: Tests for generation request validation before any provider call
// ABOUTME: Required fields, hard bounds, list cleanup and soft warnings for suspicious targets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::valid_request;
use pierre_meal_planner::generation::{
    macro_consistency_warning, validate_request, GenerationRequest,
};
use pierre_meal_planner::errors::{AppError, ErrorCode};
use pierre_meal_planner::llm::{ProviderError, ProviderErrorKind};
use pierre_meal_planner::nutrition::{DietType, Difficulty, MacroAllocation, MealType};

fn validation_field(err: &ProviderError) -> Option<&str> {
    match err {
        ProviderError::Validation { field, .. } => field.as_deref(),
        other => panic!("expected validation error, got {other:?}"),
    }
}

// ============================================================================
// Required Fields
// ============================================================================

#[test]
fn test_valid_request_passes_without_warnings() {
    let validated = validate_request(&valid_request()).unwrap();
    assert_eq!(validated.diet_type, DietType::Vegan);
    assert_eq!(validated.meal_type, MealType::Dinner);
    assert_eq!(validated.difficulty, Difficulty::Easy);
    assert_eq!(validated.servings, 2);
    assert_eq!(validated.total_time_mins, 40);
    assert!(validated.warnings.is_empty());
}

#[test]
fn test_missing_fields_reported_in_order() {
    let empty = GenerationRequest::default();
    let err = validate_request(&empty).unwrap_err();
    assert_eq!(err.kind(), ProviderErrorKind::Validation);
    assert!(!err.is_retryable());
    assert_eq!(validation_field(&err), Some("dietType"));

    let cases: [(fn(&mut GenerationRequest), &str); 5] = [
        (|r| r.meal_type = None, "mealType"),
        (|r| r.difficulty = None, "difficulty"),
        (|r| r.protein_target = None, "proteinTarget"),
        (|r| r.total_time_mins = None, "totalTime"),
        (|r| r.servings = None, "servings"),
    ];
    for (clear, field) in cases {
        let mut request = valid_request();
        clear(&mut request);
        let err = validate_request(&request).unwrap_err();
        assert_eq!(validation_field(&err), Some(field));
        assert!(matches!(err, ProviderError::Validation { missing: true, .. }));
    }
}

#[test]
fn test_missing_and_out_of_range_map_to_different_codes() {
    let mut request = valid_request();
    request.servings = None;
    let missing = AppError::from(validate_request(&request).unwrap_err());
    assert_eq!(missing.code, ErrorCode::MissingRequiredField);

    let out_of_range = validate_request(&valid_request().with_total_time(0)).unwrap_err();
    assert!(matches!(
        out_of_range,
        ProviderError::Validation { missing: false, .. }
    ));
    assert_eq!(AppError::from(out_of_range).code, ErrorCode::InvalidInput);
}

#[test]
fn test_unknown_enum_value_rejected_at_deserialization() {
    let result: Result<GenerationRequest, _> =
        serde_json::from_str(r#"{"dietType": "carnivore", "mealType": "dinner"}"#);
    assert!(result.is_err());
}

#[test]
fn test_request_deserializes_from_camel_case() {
    let request: GenerationRequest = serde_json::from_str(
        r#"{
            "dietType": "keto",
            "mealType": "lunch",
            "difficulty": "hard",
            "servings": 4,
            "totalTimeMins": 60,
            "proteinTarget": 45,
            "allergies": ["peanuts"]
        }"#,
    )
    .unwrap();
    let validated = validate_request(&request).unwrap();
    assert_eq!(validated.diet_type, DietType::Keto);
    assert_eq!(validated.allergies, vec!["peanuts".to_owned()]);
    assert!(validated.disliked_ingredients.is_empty());
}

// ============================================================================
// Hard Bounds
// ============================================================================

#[test]
fn test_total_time_bounds() {
    for minutes in [0, 481] {
        let err = validate_request(&valid_request().with_total_time(minutes)).unwrap_err();
        assert_eq!(validation_field(&err), Some("totalTime"));
    }
    assert!(validate_request(&valid_request().with_total_time(1)).is_ok());
    assert!(validate_request(&valid_request().with_total_time(480)).is_ok());
}

#[test]
fn test_servings_bounds() {
    for servings in [0, 21] {
        let err = validate_request(&valid_request().with_servings(servings)).unwrap_err();
        assert_eq!(validation_field(&err), Some("servings"));
    }
    assert!(validate_request(&valid_request().with_servings(20)).is_ok());
}

#[test]
fn test_calorie_bounds() {
    for calories in [49.0, 5001.0, f64::NAN] {
        let mut request = valid_request();
        request.calorie_target = Some(calories);
        let err = validate_request(&request).unwrap_err();
        assert_eq!(validation_field(&err), Some("calorieTarget"));
    }
}

#[test]
fn test_negative_protein_rejected() {
    let err = validate_request(&valid_request().with_protein_target(-5.0)).unwrap_err();
    assert_eq!(validation_field(&err), Some("proteinTarget"));
}

#[test]
fn test_zero_protein_accepted() {
    assert!(validate_request(&valid_request().with_protein_target(0.0)).is_ok());
}

// ============================================================================
// Soft Warnings
// ============================================================================

#[test]
fn test_high_protein_warns_but_passes() {
    let mut request = valid_request().with_protein_target(250.0);
    request.diet_type = Some(DietType::Standard);
    let validated = validate_request(&request).unwrap();
    assert_eq!(validated.warnings.len(), 1);
    assert_eq!(validated.warnings[0].field, "proteinTarget");
}

#[test]
fn test_high_carbs_and_fat_warn() {
    let mut request = valid_request();
    request.carb_target = Some(550.0);
    request.fat_target = Some(210.0);
    let validated = validate_request(&request).unwrap();
    let fields: Vec<&str> = validated.warnings.iter().map(|w| w.field.as_str()).collect();
    assert_eq!(fields, vec!["carbTarget", "fatTarget"]);
}

#[test]
fn test_keto_carb_conflict_warns() {
    let mut request = GenerationRequest::new(DietType::Keto, MealType::Lunch, Difficulty::Medium)
        .with_servings(1)
        .with_total_time(30)
        .with_protein_target(40.0);
    request.carb_target = Some(80.0);
    let validated = validate_request(&request).unwrap();
    assert!(validated
        .warnings
        .iter()
        .any(|w| w.field == "carbTarget" && w.message.contains("keto")));
}

#[test]
fn test_macro_consistency_warning() {
    // 30*4 + 50*4 + 20*9 = 500
    assert!(macro_consistency_warning(500.0, 30.0, 50.0, 20.0).is_none());
    assert!(macro_consistency_warning(560.0, 30.0, 50.0, 20.0).is_none());
    let warning = macro_consistency_warning(800.0, 30.0, 50.0, 20.0).unwrap();
    assert_eq!(warning.field, "calorieTarget");
}

#[test]
fn test_targets_from_allocation_are_consistent() {
    let allocation = MacroAllocation::new(200.0, 240.0, 135.0);
    let request = valid_request().with_targets(&allocation);
    assert_eq!(request.calorie_target, Some(575.0));
    assert_eq!(request.protein_target, Some(50.0));
    assert_eq!(request.carb_target, Some(60.0));
    assert_eq!(request.fat_target, Some(15.0));

    let validated = validate_request(&request).unwrap();
    assert!(validated.warnings.is_empty());
}

#[test]
fn test_list_entries_are_trimmed_and_blank_dropped() {
    let mut request = valid_request().with_allergy("  shellfish ").with_allergy("   ");
    request.preferred_cuisines = vec!["thai".to_owned(), String::new()];
    let validated = validate_request(&request).unwrap();
    assert_eq!(validated.allergies, vec!["shellfish".to_owned()]);
    assert_eq!(validated.preferred_cuisines, vec!["thai".to_owned()]);
}
