// ABOUTME: Parser behavior tests: fences, coercion, filtering, line scanning
// ABOUTME: Exercises every reduction stage with realistic messy replies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::needless_raw_string_hashes)]

use kondate::errors::PlannerError;
use kondate::models::RecipeCategory;
use kondate::parser::{parse_meal_reply, ParseMode, DEFAULT_RECIPE_MINUTES, MAX_SCANNED_RECIPES};

const PLAIN_REPLY: &str = r#"{"recipes":[{"name":"Oyakodon","category":"main","ingredients":["chicken","egg","onion","rice"],"cookingTime":25,"calories":600,"instructions":["Simmer the chicken and onion","Add the egg and serve over rice"]}]}"#;

#[test]
fn test_fence_stripping_is_idempotent() {
    let fenced = format!("```json\n{PLAIN_REPLY}\n```");
    let bare_fence = format!("```\n{PLAIN_REPLY}\n```");

    let unfenced = parse_meal_reply(PLAIN_REPLY).unwrap();
    let from_fenced = parse_meal_reply(&fenced).unwrap();
    let from_bare = parse_meal_reply(&bare_fence).unwrap();

    assert_eq!(unfenced.mode, ParseMode::Structured);
    assert_eq!(unfenced.recipes, from_fenced.recipes);
    assert_eq!(unfenced.recipes, from_bare.recipes);
}

#[test]
fn test_json_embedded_in_prose_is_found() {
    let reply = format!("Here is your meal plan!\n{PLAIN_REPLY}\nEnjoy!");
    let parsed = parse_meal_reply(&reply).unwrap();
    assert_eq!(parsed.mode, ParseMode::Structured);
    assert_eq!(parsed.recipes[0].name, "Oyakodon");
}

#[test]
fn test_meals_key_is_accepted_as_recipes() {
    let reply = r#"{"meals":[{"name":"Udon","ingredients":["udon","mentsuyu"],"instructions":["Boil","Serve"]}]}"#;
    let parsed = parse_meal_reply(reply).unwrap();
    assert_eq!(parsed.recipes.len(), 1);
    assert_eq!(parsed.recipes[0].name, "Udon");
}

#[test]
fn test_entry_without_instructions_is_excluded() {
    let reply = r#"{"recipes":[
        {"name":"Broken dish","ingredients":["something"]},
        {"name":"Good dish","ingredients":["tofu"],"instructions":["Warm it"]}
    ]}"#;
    let parsed = parse_meal_reply(reply).unwrap();
    assert_eq!(parsed.recipes.len(), 1);
    assert_eq!(parsed.recipes[0].name, "Good dish");
}

#[test]
fn test_entry_without_name_or_ingredients_is_excluded() {
    let reply = r#"{"recipes":[
        {"ingredients":["a"],"instructions":["b"]},
        {"name":"  ","ingredients":["a"],"instructions":["b"]},
        {"name":"No ingredients","ingredients":[],"instructions":["b"]},
        {"name":"Kept","ingredients":["a"],"instructions":["b"]}
    ]}"#;
    let parsed = parse_meal_reply(reply).unwrap();
    assert_eq!(parsed.recipes.len(), 1);
    assert_eq!(parsed.recipes[0].name, "Kept");
}

#[test]
fn test_all_entries_malformed_is_a_parse_error() {
    let reply = r#"{"recipes":[{"name":"No steps","ingredients":["a"]},{"ingredients":["b"],"instructions":["c"]}]}"#;
    assert!(parse_meal_reply(reply).is_err());
}

#[test]
fn test_json_without_recipes_is_a_parse_error() {
    let reply = r#"{"title":"A plan with nothing in it","tips":["none"]}"#;
    assert!(parse_meal_reply(reply).is_err());
}

#[test]
fn test_numeric_fields_are_coerced() {
    let reply = r#"{"recipes":[
        {"name":"String time","ingredients":["a"],"instructions":["b"],"cookingTime":"25 minutes","calories":"480"},
        {"name":"Missing time","ingredients":["a"],"instructions":["b"]},
        {"name":"Float time","ingredients":["a"],"instructions":["b"],"cookingTime":12.7}
    ]}"#;
    let parsed = parse_meal_reply(reply).unwrap();

    assert_eq!(parsed.recipes[0].cooking_time, 25);
    assert_eq!(parsed.recipes[0].calories, Some(480));
    assert_eq!(parsed.recipes[1].cooking_time, DEFAULT_RECIPE_MINUTES);
    assert_eq!(parsed.recipes[1].calories, None);
    assert_eq!(parsed.recipes[2].cooking_time, 12);
}

#[test]
fn test_structured_ingredient_records_are_flattened() {
    let reply = r#"{"recipes":[{
        "name":"Nikujaga",
        "ingredients":[{"name":"potato","amount":"3"},{"name":"beef"},"1 onion"],
        "instructions":["Simmer everything"]
    }]}"#;
    let parsed = parse_meal_reply(reply).unwrap();
    assert_eq!(
        parsed.recipes[0].ingredients,
        vec!["potato (3)", "beef", "1 onion"]
    );
}

#[test]
fn test_category_labels_are_mapped() {
    let reply = r#"{"recipes":[
        {"name":"A","category":"汁物","ingredients":["x"],"instructions":["y"]},
        {"name":"B","category":"something weird","ingredients":["x"],"instructions":["y"]},
        {"name":"C","ingredients":["x"],"instructions":["y"]}
    ]}"#;
    let parsed = parse_meal_reply(reply).unwrap();
    assert_eq!(parsed.recipes[0].category, RecipeCategory::Soup);
    assert_eq!(parsed.recipes[1].category, RecipeCategory::Other);
    // No label at all defaults to main
    assert_eq!(parsed.recipes[2].category, RecipeCategory::Main);
}

#[test]
fn test_meal_metadata_is_extracted_leniently() {
    let reply = r#"{
        "title": " Balanced dinner ",
        "description": "Fish and vegetables",
        "recipes":[{"name":"Fish","ingredients":["fish"],"instructions":["Grill"]}],
        "nutritionInfo": {"protein": "fish", "calories": 500, "fiber": null},
        "tips": ["Eat slowly", 5]
    }"#;
    let parsed = parse_meal_reply(reply).unwrap();

    assert_eq!(parsed.title.as_deref(), Some("Balanced dinner"));
    assert_eq!(parsed.description.as_deref(), Some("Fish and vegetables"));
    assert_eq!(parsed.nutrition_info["protein"], "fish");
    assert_eq!(parsed.nutrition_info["calories"], "500");
    assert!(!parsed.nutrition_info.contains_key("fiber"));
    assert_eq!(parsed.tips, vec!["Eat slowly", "5"]);
}

#[test]
fn test_numbered_lines_are_scanned() {
    let reply = "Tonight I suggest:\n1. Miso soup\n2) Grilled salmon\n3. Rice";
    let parsed = parse_meal_reply(reply).unwrap();

    assert_eq!(parsed.mode, ParseMode::Heuristic);
    let names: Vec<&str> = parsed.recipes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Miso soup", "Grilled salmon", "Rice"]);
    for recipe in &parsed.recipes {
        assert_eq!(recipe.category, RecipeCategory::Other);
        assert_eq!(recipe.cooking_time, DEFAULT_RECIPE_MINUTES);
        assert!(!recipe.ingredients.is_empty());
        assert!(!recipe.instructions.is_empty());
    }
}

#[test]
fn test_japanese_bullets_are_scanned() {
    let reply = "おすすめの献立です。\n・肉じゃが\n・ほうれん草のおひたし\n・味噌汁";
    let parsed = parse_meal_reply(reply).unwrap();

    assert_eq!(parsed.mode, ParseMode::Heuristic);
    assert_eq!(parsed.recipes[0].name, "肉じゃが");
    assert_eq!(parsed.recipes.len(), 3);
}

#[test]
fn test_scanner_caps_synthesized_recipes() {
    let reply = "- one\n- two\n- three\n- four\n- five\n- six";
    let parsed = parse_meal_reply(reply).unwrap();
    assert_eq!(parsed.recipes.len(), MAX_SCANNED_RECIPES);
}

#[test]
fn test_recipe_word_line_is_a_last_resort() {
    let reply = "Try this recipe tonight\nIt goes well with rice";
    let parsed = parse_meal_reply(reply).unwrap();
    assert_eq!(parsed.mode, ParseMode::Heuristic);
    assert_eq!(parsed.recipes[0].name, "Try this recipe tonight");
}

#[test]
fn test_plain_prose_is_a_parse_error_preserving_the_reply() {
    let reply = "The weather is lovely today and cooking sounds like a fine idea.";
    match parse_meal_reply(reply) {
        Err(PlannerError::Parse { raw }) => assert_eq!(raw, reply),
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn test_unbalanced_braces_are_a_parse_error() {
    assert!(parse_meal_reply("} backwards {").is_err());
    assert!(parse_meal_reply("{ not json at all").is_err());
}
