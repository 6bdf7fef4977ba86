// ABOUTME: Turns raw model replies into recipe data, however messy the reply
// ABOUTME: Tries strict JSON first, then a brace window, then a line scan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

//! # Reply Parsing
//!
//! Models asked for strict JSON still wander: fences around the object,
//! prose before it, string-typed numbers, ingredient objects instead of
//! strings. [`parse_meal_reply`] absorbs all of that in stages:
//!
//! 1. Strip a surrounding markdown code fence.
//! 2. Parse the whole text as JSON, or failing that the window between the
//!    first `{` and the last `}`.
//! 3. From structured JSON, keep every well-formed recipe entry and drop
//!    malformed siblings individually.
//! 4. With no JSON at all, scan for list lines that look like dish names
//!    and synthesize placeholder recipes ([`ParseMode::Heuristic`]).
//!
//! Only a reply with nothing salvageable becomes [`PlannerError::Parse`];
//! the caller decides what to do with that.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::PlannerError;
use crate::models::{Recipe, RecipeCategory};

/// Cooking time assumed when a recipe entry does not carry a usable one
pub const DEFAULT_RECIPE_MINUTES: u32 = 30;

/// Upper bound on recipes synthesized by the line scanner
pub const MAX_SCANNED_RECIPES: usize = 4;

// A dish name line: "1. Miso soup", "2) Salad", "- Rice", "・肉じゃが"
static RECIPE_LINE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:\d{1,2}[.)]\s+|[-*・•]\s*)(?P<item>.+)$").ok()
});

// Longer than this and a scanned line is prose, not a dish name
const MAX_NAME_LENGTH: usize = 80;

/// How a reply was reduced to recipe data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// The reply carried structured JSON
    Structured,
    /// The reply was unstructured; recipes were salvaged by the line scanner
    Heuristic,
}

/// A model reply reduced to meal content
#[derive(Debug, Clone)]
pub struct ParsedMeal {
    /// Meal title, when the reply carried one
    pub title: Option<String>,
    /// Meal description, when the reply carried one
    pub description: Option<String>,
    /// Well-formed recipes, never empty
    pub recipes: Vec<Recipe>,
    /// Nutrition notes keyed by nutrient or aspect
    pub nutrition_info: BTreeMap<String, String>,
    /// Meal-level tips
    pub tips: Vec<String>,
    /// How the reply was reduced
    pub mode: ParseMode,
}

/// Reduce a raw model reply to meal content
///
/// # Errors
///
/// Returns [`PlannerError::Parse`] carrying the original reply when nothing
/// recipe-shaped can be recovered from it.
pub fn parse_meal_reply(raw: &str) -> Result<ParsedMeal, PlannerError> {
    let stripped = strip_code_fence(raw);

    if let Some(value) = extract_json(stripped) {
        return structured_meal(&value, raw);
    }

    // No JSON anywhere: salvage whatever reads like a dish list
    let recipes = scan_recipe_lines(raw);
    if recipes.is_empty() {
        warn!("Reply contained neither JSON nor recognizable recipe lines");
        return Err(PlannerError::parse(raw));
    }

    debug!(count = recipes.len(), "Salvaged recipes from an unstructured reply");
    Ok(ParsedMeal {
        title: None,
        description: None,
        recipes,
        nutrition_info: BTreeMap::new(),
        tips: Vec::new(),
        mode: ParseMode::Heuristic,
    })
}

// ============================================================================
// JSON Extraction
// ============================================================================

/// Remove a markdown code fence wrapping the whole reply, if present
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(without_open) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let without_lang = without_open.strip_prefix("json").unwrap_or(without_open);
    let inner = without_lang.strip_suffix("```").unwrap_or(without_lang);
    inner.trim()
}

/// Find a JSON object in the text: the whole text, or the outermost braces
fn extract_json(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        if value.is_object() {
            return Some(value);
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end])
        .ok()
        .filter(Value::is_object)
}

fn structured_meal(value: &Value, raw: &str) -> Result<ParsedMeal, PlannerError> {
    let Some(entries) = value
        .get("recipes")
        .or_else(|| value.get("meals"))
        .and_then(Value::as_array)
    else {
        warn!("JSON reply carries no recipes array");
        return Err(PlannerError::parse(raw));
    };

    let recipes: Vec<Recipe> = entries.iter().filter_map(recipe_from_value).collect();
    if recipes.is_empty() {
        warn!(
            entries = entries.len(),
            "JSON reply had a recipes array but no usable entries"
        );
        return Err(PlannerError::parse(raw));
    }

    Ok(ParsedMeal {
        title: string_field(value, "title"),
        description: string_field(value, "description"),
        recipes,
        nutrition_info: nutrition_map(value.get("nutritionInfo")),
        tips: value.get("tips").map(string_items).unwrap_or_default(),
        mode: ParseMode::Structured,
    })
}

/// One recipe entry, or `None` when it is malformed
///
/// Well-formed means a non-empty name plus non-empty ingredient and
/// instruction lists. Everything else is coerced or defaulted.
fn recipe_from_value(value: &Value) -> Option<Recipe> {
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())?;

    let ingredients = value
        .get("ingredients")
        .map(string_items)
        .unwrap_or_default();
    if ingredients.is_empty() {
        return None;
    }

    let instructions = value
        .get("instructions")
        .map(string_items)
        .unwrap_or_default();
    if instructions.is_empty() {
        return None;
    }

    let category = value
        .get("category")
        .and_then(Value::as_str)
        .map_or(RecipeCategory::Main, RecipeCategory::from_label);

    let cooking_time = value
        .get("cookingTime")
        .or_else(|| value.get("cooking_time"))
        .and_then(coerce_number)
        .unwrap_or(DEFAULT_RECIPE_MINUTES);

    let mut recipe = Recipe::new(name, category)
        .with_cooking_time(cooking_time)
        .with_ingredients(ingredients)
        .with_instructions(instructions)
        .with_tips(value.get("tips").map(string_items).unwrap_or_default());

    if let Some(calories) = value.get("calories").and_then(coerce_number) {
        recipe = recipe.with_calories(calories);
    }

    Some(recipe)
}

// ============================================================================
// Lenient Coercion
// ============================================================================

/// Accept a number or a numeric string, including "20 minutes" style suffixes
fn coerce_number(value: &Value) -> Option<u32> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .and_then(|integer| u32::try_from(integer).ok())
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|f| *f >= 0.0 && *f <= f64::from(u32::MAX))
                    .map(|f| f as u32)
            }),
        Value::String(text) => {
            let trimmed = text.trim();
            trimmed.parse().ok().or_else(|| {
                let digits: String =
                    trimmed.chars().take_while(char::is_ascii_digit).collect();
                digits.parse().ok()
            })
        }
        _ => None,
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// A list of strings, tolerating numbers, lone scalars, and ingredient
/// objects shaped `{"name": ..., "amount": ...}`
fn string_items(value: &Value) -> Vec<String> {
    let Some(items) = value.as_array() else {
        return scalar_string(value).into_iter().collect();
    };
    items.iter().filter_map(item_string).collect()
}

fn item_string(value: &Value) -> Option<String> {
    if let Some(text) = scalar_string(value) {
        return Some(text);
    }

    let object = value.as_object()?;
    let name = object
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())?;
    match object.get("amount").and_then(Value::as_str).map(str::trim) {
        Some(amount) if !amount.is_empty() => Some(format!("{name} ({amount})")),
        _ => Some(name.to_owned()),
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(scalar_string)
}

fn nutrition_map(value: Option<&Value>) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    let Some(object) = value.and_then(Value::as_object) else {
        return map;
    };
    for (key, entry) in object {
        if let Some(text) = scalar_string(entry) {
            map.insert(key.clone(), text);
        }
    }
    map
}

// ============================================================================
// Line Scanner
// ============================================================================

/// Salvage dish names from list-like lines in an unstructured reply
fn scan_recipe_lines(raw: &str) -> Vec<Recipe> {
    let mut names: Vec<String> = Vec::new();

    if let Some(pattern) = RECIPE_LINE.as_ref() {
        for capture in pattern.captures_iter(raw) {
            if names.len() >= MAX_SCANNED_RECIPES {
                break;
            }
            if let Some(item) = capture.name("item") {
                let name = clean_scanned_name(item.as_str());
                if !name.is_empty() && !names.iter().any(|n| n.eq_ignore_ascii_case(&name)) {
                    names.push(name);
                }
            }
        }
    }

    if names.is_empty() {
        // Last resort: lines that talk about a recipe directly
        for line in raw.lines() {
            if names.len() >= MAX_SCANNED_RECIPES {
                break;
            }
            if line.to_lowercase().contains("recipe") || line.contains("レシピ") {
                let name = clean_scanned_name(line);
                if !name.is_empty() {
                    names.push(name);
                }
            }
        }
    }

    names.into_iter().map(placeholder_recipe).collect()
}

fn clean_scanned_name(line: &str) -> String {
    let cleaned = line
        .trim()
        .trim_matches('*')
        .trim_end_matches(|c| matches!(c, ':' | '：' | '.' | '。'))
        .trim();
    if cleaned.is_empty() || cleaned.chars().count() > MAX_NAME_LENGTH {
        return String::new();
    }
    cleaned.to_owned()
}

fn placeholder_recipe(name: String) -> Recipe {
    Recipe::new(name, RecipeCategory::Other)
        .with_cooking_time(DEFAULT_RECIPE_MINUTES)
        .with_ingredients(vec!["Ingredients as available".to_owned()])
        .with_instructions(vec!["Prepare following your usual method".to_owned()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_stripping() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn test_coerce_number_variants() {
        assert_eq!(coerce_number(&serde_json::json!(20)), Some(20));
        assert_eq!(coerce_number(&serde_json::json!(19.6)), Some(19));
        assert_eq!(coerce_number(&serde_json::json!("25")), Some(25));
        assert_eq!(coerce_number(&serde_json::json!("25 minutes")), Some(25));
        assert_eq!(coerce_number(&serde_json::json!("soon")), None);
        assert_eq!(coerce_number(&serde_json::json!(-3)), None);
        assert_eq!(coerce_number(&serde_json::json!(null)), None);
    }

    #[test]
    fn test_ingredient_objects_flatten_to_strings() {
        let items = string_items(&serde_json::json!([
            "tofu",
            {"name": "soy sauce", "amount": "2 tbsp"},
            {"name": "mirin"},
            {"amount": "missing name"},
            42
        ]));
        assert_eq!(items, vec!["tofu", "soy sauce (2 tbsp)", "mirin", "42"]);
    }

    #[test]
    fn test_scanned_names_are_cleaned_and_bounded() {
        assert_eq!(clean_scanned_name("  **Miso soup**:  "), "Miso soup");
        assert_eq!(clean_scanned_name("肉じゃが。"), "肉じゃが");
        assert_eq!(clean_scanned_name(&"x".repeat(200)), "");
    }
}
