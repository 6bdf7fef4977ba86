// ABOUTME: Crate root for kondate, an AI-assisted meal planning library
// ABOUTME: Wires config, providers, prompting, parsing, and fallback together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

//! # Kondate
//!
//! AI-assisted meal planning built around one guarantee: once a planner is
//! constructed, asking it for a meal always produces a complete suggestion.
//! A prompt is rendered from the caller's preferences plus the current
//! season and time of day, sent to an LLM provider, and the reply is parsed
//! leniently. If the provider is down, the reply is garbage, or anything
//! else goes wrong at runtime, a curated seasonal fallback meal is served
//! instead; the [`MealSuggestion::source`] field says which path produced
//! the result.
//!
//! ## Features
//!
//! - **Providers**: Groq, Google Gemini, and any OpenAI-compatible endpoint
//!   (Ollama, vLLM, OpenRouter) behind one [`llm::LlmProvider`] trait
//! - **Lenient parsing**: code fences, embedded JSON, string-typed numbers,
//!   and ingredient objects are all absorbed; unstructured replies are
//!   salvaged by a line scanner
//! - **Seasonal fallback**: a curated washoku table keyed by season and
//!   time of day, served whenever generation fails
//! - **Derived plans**: aggregate totals, a deduplicated shopping list, and
//!   a back-planned cooking schedule on every suggestion
//!
//! ## Example
//!
//! ```rust,no_run
//! use kondate::{MealPlanner, MealPreferences, PlannerConfig, ProviderKind};
//!
//! # async fn run() -> Result<(), kondate::PlannerError> {
//! let config = PlannerConfig::new(ProviderKind::Groq).with_api_key("gsk_...");
//! let planner = MealPlanner::from_config(config)?;
//!
//! let preferences = MealPreferences::new()
//!     .with_ingredients(vec!["chicken".to_owned(), "cabbage".to_owned()])
//!     .with_servings(2);
//! let suggestion = planner.generate(&preferences).await;
//!
//! println!("{} ({} min)", suggestion.title, suggestion.total_cooking_time);
//! for item in suggestion.shopping_list() {
//!     println!("- {item}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod fallback;
pub mod llm;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod prompts;

pub use config::{PlannerConfig, ProviderKind};
pub use errors::PlannerError;
pub use models::{
    Difficulty, MealPreferences, MealSuggestion, MealType, Recipe, RecipeCategory, Season,
    SuggestionSource, TimeOfDay,
};
pub use pipeline::{generate_meal_suggestion, MealPlanner};
