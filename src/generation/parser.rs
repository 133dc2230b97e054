// ABOUTME: Response parser extracting a recipe JSON object from free-form provider text
// ABOUTME: Slices first '{' to last '}', parses, and structurally validates required recipe fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Response parsing and structural validation
//!
//! Nothing here coerces or repairs data. A payload that is structurally
//! invalid is rejected whole, with a [`ProviderError::Parsing`] that carries
//! the raw provider text.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use pierre_nutrition::GeneratedRecipe;

use crate::llm::ProviderError;

/// Top-level fields every recipe payload must carry
pub const REQUIRED_FIELDS: [&str; 11] = [
    "name",
    "description",
    "ingredients",
    "instructions",
    "prepTime",
    "cookTime",
    "servings",
    "mealTypes",
    "dietTypes",
    "difficulty",
    "nutritionalInfo",
];

/// Keys every `nutritionalInfo` object must carry
pub const REQUIRED_NUTRITION_FIELDS: [&str; 5] =
    ["calories", "protein", "carbohydrates", "fat", "fiber"];

/// Slice between the first `{` and the last `}` of `raw`
#[must_use]
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

/// Parse provider text into a recipe
///
/// # Errors
///
/// Returns a parsing error when no object can be located, the slice is not
/// valid JSON, a required field is missing, `ingredients`/`instructions` are
/// not non-empty lists, `nutritionalInfo` is not an object with every
/// nutrient, or a field has the wrong type. The message names the field.
pub fn parse_recipe(raw: &str) -> Result<GeneratedRecipe, ProviderError> {
    let slice = extract_json_object(raw)
        .ok_or_else(|| ProviderError::parsing("No JSON object found in provider response", raw))?;

    let value: Value = serde_json::from_str(slice).map_err(|e| {
        ProviderError::parsing(format!("Invalid JSON in provider response: {e}"), raw)
            .with_source(e)
    })?;

    let Value::Object(object) = &value else {
        return Err(ProviderError::parsing(
            "Provider response is not a JSON object",
            raw,
        ));
    };
    check_structure(object, raw)?;

    Ok(GeneratedRecipe {
        name: field(object, "name", raw)?,
        description: field(object, "description", raw)?,
        ingredients: field(object, "ingredients", raw)?,
        instructions: field(object, "instructions", raw)?,
        prep_time: field(object, "prepTime", raw)?,
        cook_time: field(object, "cookTime", raw)?,
        servings: field(object, "servings", raw)?,
        meal_types: field(object, "mealTypes", raw)?,
        diet_types: field(object, "dietTypes", raw)?,
        tags: match object.get("tags") {
            None | Some(Value::Null) => Vec::new(),
            Some(_) => field(object, "tags", raw)?,
        },
        difficulty: field(object, "difficulty", raw)?,
        nutritional_info: field(object, "nutritionalInfo", raw)?,
    })
}

/// Decode one top-level field without coercion
fn field<T: DeserializeOwned>(
    object: &Map<String, Value>,
    key: &str,
    raw: &str,
) -> Result<T, ProviderError> {
    let value = object.get(key).cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|e| {
        ProviderError::parsing(format!("Field '{key}' has an invalid value: {e}"), raw)
            .with_source(e)
    })
}

fn check_structure(object: &Map<String, Value>, raw: &str) -> Result<(), ProviderError> {
    if let Some(missing) = REQUIRED_FIELDS
        .iter()
        .find(|field| matches!(object.get(**field), None | Some(Value::Null)))
    {
        return Err(ProviderError::parsing(
            format!("Missing required field '{missing}'"),
            raw,
        ));
    }

    for list in ["ingredients", "instructions"] {
        match object.get(list) {
            Some(Value::Array(items)) if !items.is_empty() => {}
            Some(Value::Array(_)) => {
                return Err(ProviderError::parsing(
                    format!("Field '{list}' must not be empty"),
                    raw,
                ));
            }
            _ => {
                return Err(ProviderError::parsing(
                    format!("Field '{list}' must be a list"),
                    raw,
                ));
            }
        }
    }

    let Some(Value::Object(nutrition)) = object.get("nutritionalInfo") else {
        return Err(ProviderError::parsing(
            "Field 'nutritionalInfo' must be an object",
            raw,
        ));
    };
    if let Some(missing) = REQUIRED_NUTRITION_FIELDS
        .iter()
        .find(|key| matches!(nutrition.get(**key), None | Some(Value::Null)))
    {
        return Err(ProviderError::parsing(
            format!("Missing required field 'nutritionalInfo.{missing}'"),
            raw,
        ));
    }
    Ok(())
}
