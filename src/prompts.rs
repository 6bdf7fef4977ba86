// ABOUTME: Prompt construction for meal generation requests
// ABOUTME: Renders preferences and temporal context into the model prompt
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

//! # Prompt Construction
//!
//! Builds the two messages sent to the provider: a fixed system prompt that
//! pins down the output contract, and a user prompt rendered from the
//! caller's [`MealPreferences`] plus the derived season and time of day.
//! The user prompt embeds the exact JSON shape the parser expects, which is
//! what keeps the happy path of [`crate::parser`] cheap.

use crate::models::{MealPreferences, Season, TimeOfDay};

/// System prompt framing every meal generation conversation
pub const MEAL_SYSTEM_PROMPT: &str = "You are a home cooking assistant that plans complete, \
    balanced meals. You reply with exactly one JSON object and nothing else: no prose before \
    or after it, and no markdown code fences.";

/// Cuisine used when the preferences do not name one
pub const DEFAULT_CUISINE: &str = "washoku (Japanese home cooking)";

// The shape the model is asked to reply in. Field names here must stay in
// sync with what the parser looks for.
const REPLY_SCHEMA: &str = r#"{
  "title": "short meal title",
  "description": "one or two sentences about the meal",
  "recipes": [
    {
      "name": "dish name",
      "category": "main | side | soup | rice",
      "ingredients": ["ingredient with amount"],
      "cookingTime": 20,
      "calories": 300,
      "instructions": ["step one", "step two"]
    }
  ],
  "nutritionInfo": {"protein": "source of protein", "vegetables": "vegetables used"},
  "tips": ["a practical cooking tip"]
}"#;

/// Render the user prompt for one generation request
#[must_use]
pub fn render_meal_prompt(
    season: Season,
    time_of_day: TimeOfDay,
    preferences: &MealPreferences,
) -> String {
    let cuisine = preferences.cuisine.as_deref().unwrap_or(DEFAULT_CUISINE);
    let ingredients = if preferences.ingredients.is_empty() {
        "whatever is in season".to_owned()
    } else {
        preferences.ingredients.join(", ")
    };
    let restrictions = if preferences.dietary_restrictions.is_empty() {
        "none".to_owned()
    } else {
        preferences.dietary_restrictions.join(", ")
    };
    let meal_type = preferences.meal_type;
    let servings = preferences.servings;
    let cooking_time = preferences.cooking_time;
    let difficulty = preferences.difficulty;
    let seasonal_note = season.seasonal_note();

    format!(
        "Plan a {season} {time_of_day} ({meal_type}) in the style of {cuisine}.\n\
         Seasonal guidance: {seasonal_note}.\n\
         \n\
         Ingredients to use: {ingredients}\n\
         Servings: {servings}\n\
         Total cooking time: at most {cooking_time} minutes\n\
         Dietary restrictions: {restrictions}\n\
         Difficulty: {difficulty}\n\
         \n\
         Reply with a single JSON object in exactly this shape:\n\
         {REPLY_SCHEMA}\n\
         \n\
         Do not wrap the JSON in markdown code fences."
    )
}
