// ABOUTME: End-to-end pipeline tests with a scripted provider, no network
// ABOUTME: Covers the model, heuristic, and fallback paths plus totality
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::needless_raw_string_hashes)]

mod common;

use std::time::Duration;

use common::{ScriptedProvider, ScriptedReply};
use kondate::llm::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};
use kondate::{
    generate_meal_suggestion, MealPlanner, MealPreferences, PlannerConfig, ProviderKind, Season,
    SuggestionSource, TimeOfDay,
};

const STIR_FRY_REPLY: &str = r#"```json
{"recipes":[{"name":"Chicken stir-fry","ingredients":["chicken","cabbage"],"instructions":["cut","fry"],"cookingTime":20,"calories":300}]}
```"#;

const TWO_RECIPE_REPLY: &str = r#"{
    "title": "Simple dinner",
    "description": "A main and a soup",
    "recipes": [
        {
            "name": "Grilled mackerel",
            "category": "main",
            "ingredients": ["2 mackerel fillets", "salt"],
            "cookingTime": 15,
            "calories": 220,
            "instructions": ["Salt the fillets", "Grill until done"]
        },
        {
            "name": "Wakame miso soup",
            "category": "soup",
            "ingredients": ["wakame", "miso", "dashi"],
            "cookingTime": 10,
            "calories": 45,
            "instructions": ["Warm the dashi", "Dissolve the miso"]
        }
    ],
    "nutritionInfo": {"protein": "fish"},
    "tips": ["Serve hot"]
}"#;

fn planner(replies: Vec<ScriptedReply>) -> MealPlanner {
    common::init_test_logging();
    MealPlanner::with_provider(
        Box::new(ScriptedProvider::new(replies)),
        PlannerConfig::default(),
    )
}

#[tokio::test]
async fn test_fenced_json_reply_produces_model_suggestion() {
    let planner = planner(vec![ScriptedReply::Content(STIR_FRY_REPLY.to_owned())]);
    let preferences = MealPreferences::new()
        .with_ingredients(vec!["chicken".to_owned(), "cabbage".to_owned()])
        .with_servings(2);

    let suggestion = planner
        .generate_for(Season::Autumn, TimeOfDay::Dinner, &preferences)
        .await;

    assert_eq!(suggestion.source, SuggestionSource::Model);
    assert_eq!(suggestion.recipes.len(), 1);
    assert_eq!(suggestion.recipes[0].name, "Chicken stir-fry");
    assert_eq!(suggestion.total_cooking_time, 20);
    assert_eq!(suggestion.total_calories, 300);
    // No title in the reply: the pipeline supplies one
    assert_eq!(suggestion.title, "autumn dinner plan");
}

#[tokio::test]
async fn test_provider_error_falls_back() {
    let planner = planner(vec![ScriptedReply::ProviderStatus(
        429,
        "rate limited".to_owned(),
    )]);

    let suggestion = planner.generate(&MealPreferences::new()).await;

    assert_eq!(suggestion.source, SuggestionSource::Fallback);
    assert!(!suggestion.recipes.is_empty());
}

#[tokio::test]
async fn test_prose_reply_falls_back() {
    let planner = planner(vec![ScriptedReply::Content(
        "I am sorry, I cannot help with meal planning right now.".to_owned(),
    )]);

    let suggestion = planner.generate(&MealPreferences::new()).await;

    assert_eq!(suggestion.source, SuggestionSource::Fallback);
    assert!(!suggestion.recipes.is_empty());
}

#[tokio::test]
async fn test_missing_api_key_is_a_config_error() {
    common::init_test_logging();
    let config = PlannerConfig::new(ProviderKind::Groq);

    let err = MealPlanner::from_config(config.clone()).unwrap_err();
    assert!(err.is_config());

    let err = generate_meal_suggestion(config, &MealPreferences::new())
        .await
        .unwrap_err();
    assert!(err.is_config());
}

#[tokio::test]
async fn test_generation_is_total_across_failure_modes() {
    let failure_modes = [
        ScriptedReply::Transport(common::refused_connection_error().await),
        ScriptedReply::ProviderStatus(429, "rate limited".to_owned()),
        ScriptedReply::ProviderStatus(500, "internal error".to_owned()),
        ScriptedReply::Empty,
        ScriptedReply::Content("no json here, just words".to_owned()),
        ScriptedReply::Content(r#"{"recipes": []}"#.to_owned()),
        ScriptedReply::Content(r#"{"note": "an object without recipes"}"#.to_owned()),
    ];

    for mode in failure_modes {
        let planner = planner(vec![mode]);
        let suggestion = planner.generate(&MealPreferences::new()).await;

        assert!(!suggestion.recipes.is_empty());
        let time_sum: u32 = suggestion.recipes.iter().map(|r| r.cooking_time).sum();
        let calorie_sum: u32 = suggestion
            .recipes
            .iter()
            .map(|r| r.calories.unwrap_or(0))
            .sum();
        assert_eq!(suggestion.total_cooking_time, time_sum);
        assert_eq!(suggestion.total_calories, calorie_sum);
    }
}

#[tokio::test]
async fn test_unreachable_endpoint_falls_back() {
    common::init_test_logging();
    let endpoint = OpenAiCompatibleConfig::ollama().with_base_url("http://127.0.0.1:1");
    let provider = OpenAiCompatibleProvider::new(endpoint, Duration::from_secs(5)).unwrap();
    let planner = MealPlanner::with_provider(Box::new(provider), PlannerConfig::default());

    let suggestion = planner
        .generate_for(Season::Winter, TimeOfDay::Dinner, &MealPreferences::new())
        .await;

    assert_eq!(suggestion.source, SuggestionSource::Fallback);
    assert!(!suggestion.recipes.is_empty());
}

#[tokio::test]
async fn test_extreme_recipe_values_saturate_totals() {
    let reply = r#"{"recipes":[
        {"name":"Endless braise","ingredients":["time"],"instructions":["wait"],"cookingTime":4294967295,"calories":4294967295},
        {"name":"Second course","ingredients":["patience"],"instructions":["wait again"],"cookingTime":4294967295,"calories":2}
    ]}"#;
    let planner = planner(vec![ScriptedReply::Content(reply.to_owned())]);

    let suggestion = planner
        .generate_for(Season::Winter, TimeOfDay::Dinner, &MealPreferences::new())
        .await;

    assert_eq!(suggestion.source, SuggestionSource::Model);
    assert_eq!(suggestion.recipes.len(), 2);
    assert_eq!(suggestion.total_cooking_time, u32::MAX);
    assert_eq!(suggestion.total_calories, u32::MAX);
}

#[tokio::test]
async fn test_bulleted_reply_is_salvaged_as_heuristic() {
    let planner = planner(vec![ScriptedReply::Content(
        "Here are some ideas for tonight:\n\
         1. Miso soup\n\
         2. Grilled salmon\n\
         3. Spinach ohitashi\n\
         4. Steamed rice\n\
         5. Pickled plum\n\
         Enjoy your meal!"
            .to_owned(),
    )]);

    let suggestion = planner.generate(&MealPreferences::new()).await;

    assert_eq!(suggestion.source, SuggestionSource::Heuristic);
    assert!(suggestion.recipes.len() <= 4);
    assert_eq!(suggestion.recipes[0].name, "Miso soup");
    for recipe in &suggestion.recipes {
        assert!(!recipe.ingredients.is_empty());
        assert!(!recipe.instructions.is_empty());
    }
}

#[tokio::test]
async fn test_structured_reply_carries_meal_metadata() {
    let planner = planner(vec![ScriptedReply::Content(TWO_RECIPE_REPLY.to_owned())]);

    let suggestion = planner
        .generate_for(Season::Winter, TimeOfDay::Dinner, &MealPreferences::new())
        .await;

    assert_eq!(suggestion.source, SuggestionSource::Model);
    assert_eq!(suggestion.title, "Simple dinner");
    assert_eq!(suggestion.description, "A main and a soup");
    assert_eq!(suggestion.recipes.len(), 2);
    assert_eq!(suggestion.total_cooking_time, 25);
    assert_eq!(suggestion.total_calories, 265);
    assert_eq!(suggestion.nutrition_info["protein"], "fish");
    assert_eq!(suggestion.tips, vec!["Serve hot"]);
}

#[tokio::test]
async fn test_fallback_carries_requested_context() {
    let planner = planner(vec![ScriptedReply::Empty]);

    let suggestion = planner
        .generate_for(Season::Summer, TimeOfDay::Breakfast, &MealPreferences::new())
        .await;

    assert_eq!(suggestion.source, SuggestionSource::Fallback);
    assert_eq!(suggestion.season, Season::Summer);
    assert_eq!(suggestion.time_of_day, TimeOfDay::Breakfast);
}

#[tokio::test]
async fn test_regeneration_creates_a_fresh_suggestion() {
    let planner = planner(vec![
        ScriptedReply::Content(STIR_FRY_REPLY.to_owned()),
        ScriptedReply::Content(STIR_FRY_REPLY.to_owned()),
    ]);
    let preferences = MealPreferences::new();

    let first = planner
        .generate_for(Season::Spring, TimeOfDay::Dinner, &preferences)
        .await;
    let second = planner
        .generate_for(Season::Spring, TimeOfDay::Dinner, &preferences)
        .await;

    assert_ne!(first.id, second.id);
    assert_eq!(first.recipes.len(), second.recipes.len());
}

#[tokio::test]
async fn test_shopping_list_merges_recipe_ingredients() {
    let planner = planner(vec![ScriptedReply::Content(TWO_RECIPE_REPLY.to_owned())]);

    let suggestion = planner
        .generate_for(Season::Winter, TimeOfDay::Dinner, &MealPreferences::new())
        .await;

    let list = suggestion.shopping_list();
    assert!(list.contains(&"2 mackerel fillets".to_owned()));
    assert!(list.contains(&"wakame".to_owned()));
    assert_eq!(list.len(), 5);
}
