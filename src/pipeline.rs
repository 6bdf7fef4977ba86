// ABOUTME: The meal generation pipeline: prompt, complete, parse, fall back
// ABOUTME: MealPlanner always returns a usable suggestion once constructed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

//! # Generation Pipeline
//!
//! [`MealPlanner`] wires the other modules together: it renders the prompt,
//! calls the provider, parses the reply, and substitutes fallback content
//! when anything downstream of construction goes wrong. The split of
//! failure handling is deliberate:
//!
//! - Configuration problems (missing key, bad client) surface as errors
//!   from [`MealPlanner::from_config`], before any request is made.
//! - Runtime problems (network, provider status, unusable reply) never
//!   surface at all; [`MealPlanner::generate`] degrades to the seasonal
//!   fallback table and always returns a complete suggestion.

use std::fmt;

use tracing::{debug, info, instrument, warn};

use crate::config::PlannerConfig;
use crate::errors::PlannerError;
use crate::fallback::fallback_suggestion;
use crate::llm::{ChatMessage, ChatProvider, ChatRequest, LlmProvider};
use crate::models::{MealPreferences, MealSuggestion, Season, SuggestionSource, TimeOfDay};
use crate::parser::{parse_meal_reply, ParseMode, ParsedMeal};
use crate::prompts::{render_meal_prompt, MEAL_SYSTEM_PROMPT};

/// The meal generation pipeline
pub struct MealPlanner {
    provider: Box<dyn LlmProvider>,
    config: PlannerConfig,
}

impl MealPlanner {
    /// Build a planner for the provider a config describes
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Config`] when the config cannot produce a
    /// working provider (missing API key, unbuildable HTTP client). This is
    /// the last point where this pipeline reports errors; generation itself
    /// always succeeds.
    pub fn from_config(config: PlannerConfig) -> Result<Self, PlannerError> {
        let provider = ChatProvider::from_config(&config)?;
        info!(
            provider = provider.name(),
            model = provider.default_model(),
            "Meal planner ready"
        );
        Ok(Self {
            provider: Box::new(provider),
            config,
        })
    }

    /// Build a planner from the `KONDATE_LLM_*` environment variables
    ///
    /// # Errors
    ///
    /// Same failure modes as [`MealPlanner::from_config`].
    pub fn from_env() -> Result<Self, PlannerError> {
        Self::from_config(PlannerConfig::from_env())
    }

    /// Build a planner around an existing provider
    ///
    /// The config still supplies the sampling parameters and model
    /// override; its provider selection and credentials are ignored.
    #[must_use]
    pub fn with_provider(provider: Box<dyn LlmProvider>, config: PlannerConfig) -> Self {
        Self { provider, config }
    }

    /// Name of the provider this planner talks to
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Generate a meal suggestion for right now
    ///
    /// Season and time of day come from the local clock. Never fails: any
    /// provider or parse problem degrades to the seasonal fallback table.
    pub async fn generate(&self, preferences: &MealPreferences) -> MealSuggestion {
        self.generate_for(Season::current(), TimeOfDay::current(), preferences)
            .await
    }

    /// Generate a meal suggestion for an explicit season and time of day
    #[instrument(
        skip(self, preferences),
        fields(season = %season, time_of_day = %time_of_day)
    )]
    pub async fn generate_for(
        &self,
        season: Season,
        time_of_day: TimeOfDay,
        preferences: &MealPreferences,
    ) -> MealSuggestion {
        let prompt = render_meal_prompt(season, time_of_day, preferences);
        debug!(chars = prompt.len(), "Rendered meal prompt");

        let raw = match self.invoke(prompt).await {
            Ok(reply) => reply,
            Err(error) => {
                warn!("Falling back after provider error: {error}");
                return fallback_suggestion(season, time_of_day);
            }
        };

        match parse_meal_reply(&raw) {
            Ok(parsed) => {
                debug!(
                    recipes = parsed.recipes.len(),
                    mode = ?parsed.mode,
                    "Parsed model reply"
                );
                suggestion_from_parsed(parsed, season, time_of_day)
            }
            Err(error) => {
                warn!("Falling back after unusable reply: {error}");
                fallback_suggestion(season, time_of_day)
            }
        }
    }

    async fn invoke(&self, prompt: String) -> Result<String, PlannerError> {
        let mut request = ChatRequest::new(vec![
            ChatMessage::system(MEAL_SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ])
        .with_temperature(self.config.temperature)
        .with_max_tokens(self.config.max_tokens);
        if let Some(model) = &self.config.model {
            request = request.with_model(model);
        }

        let response = self.provider.complete(&request).await?;
        Ok(response.content)
    }
}

impl fmt::Debug for MealPlanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MealPlanner")
            .field("provider", &self.provider.name())
            .field("config", &self.config)
            .finish()
    }
}

fn suggestion_from_parsed(
    parsed: ParsedMeal,
    season: Season,
    time_of_day: TimeOfDay,
) -> MealSuggestion {
    let source = match parsed.mode {
        ParseMode::Structured => SuggestionSource::Model,
        ParseMode::Heuristic => SuggestionSource::Heuristic,
    };
    let title = parsed
        .title
        .unwrap_or_else(|| format!("{season} {time_of_day} plan"));
    let description = parsed.description.unwrap_or_default();

    MealSuggestion::new(
        title,
        description,
        season,
        time_of_day,
        parsed.recipes,
        source,
    )
    .with_nutrition_info(parsed.nutrition_info)
    .with_tips(parsed.tips)
}

/// One-shot convenience: build a planner and generate a single suggestion
///
/// # Errors
///
/// Returns [`PlannerError::Config`] when the config cannot produce a
/// working provider. Generation itself never fails.
pub async fn generate_meal_suggestion(
    config: PlannerConfig,
    preferences: &MealPreferences,
) -> Result<MealSuggestion, PlannerError> {
    let planner = MealPlanner::from_config(config)?;
    Ok(planner.generate(preferences).await)
}
