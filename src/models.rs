// ABOUTME: Domain models for meal planning: preferences, recipes, and suggestions
// ABOUTME: Defines Season, TimeOfDay, Recipe, MealSuggestion, and related enums
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

//! # Meal Planning Models
//!
//! The data flowing through the pipeline: [`MealPreferences`] in,
//! [`MealSuggestion`] out. A suggestion owns its [`Recipe`] list and its
//! aggregate totals are computed once at construction, never edited
//! afterwards. Regenerating a plan creates a new suggestion with a new id.

use std::collections::{BTreeMap, HashSet};
use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, Datelike, Local, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Default number of servings when the caller does not specify one
pub const DEFAULT_SERVINGS: u32 = 2;

/// Default cooking time budget in minutes
pub const DEFAULT_COOKING_TIME_MINS: u32 = 45;

// ============================================================================
// Derived Context Enums
// ============================================================================

/// Season of the year, derived from the current month
///
/// Used to select contextually appropriate prompt framing and fallback
/// content. The month boundaries follow the Japanese convention
/// (spring starts in March).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    /// March through May
    Spring,
    /// June through August
    Summer,
    /// September through November
    Autumn,
    /// December through February
    Winter,
}

impl Season {
    /// Classify a calendar month (1-12)
    #[must_use]
    pub const fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            9..=11 => Self::Autumn,
            _ => Self::Winter,
        }
    }

    /// Season of the local clock right now
    ///
    /// Meals are a local-time concern, so this reads the local calendar
    /// rather than UTC.
    #[must_use]
    pub fn current() -> Self {
        Self::from_month(Local::now().month())
    }

    /// Lowercase identifier used in prompts and serialization
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
        }
    }

    /// Short framing note embedded in the generation prompt
    #[must_use]
    pub const fn seasonal_note(&self) -> &'static str {
        match self {
            Self::Spring => "fresh greens and new harvest vegetables are in season",
            Self::Summer => "favor light, refreshing dishes that hold up in the heat",
            Self::Autumn => "mushrooms, root vegetables, and oily fish are at their best",
            Self::Winter => "warming simmered dishes and hot pots are welcome",
        }
    }
}

impl Display for Season {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Part of the day a meal is being planned for, derived from the current hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// 05:00 through 10:59
    Breakfast,
    /// 11:00 through 15:59
    Lunch,
    /// Everything else, including late night
    Dinner,
}

impl TimeOfDay {
    /// Classify an hour of the day (0-23)
    #[must_use]
    pub const fn from_hour(hour: u32) -> Self {
        match hour {
            5..=10 => Self::Breakfast,
            11..=15 => Self::Lunch,
            _ => Self::Dinner,
        }
    }

    /// Time of day of the local clock right now
    #[must_use]
    pub fn current() -> Self {
        Self::from_hour(Local::now().hour())
    }

    /// Lowercase identifier used in prompts and serialization
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
        }
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Preference Enums
// ============================================================================

/// Kind of meal the user is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    /// Morning meal
    Breakfast,
    /// Midday meal
    Lunch,
    /// Evening meal (default)
    #[default]
    Dinner,
    /// Light snack between meals
    Snack,
}

impl MealType {
    /// Parse from string with fallback to the default
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "breakfast" => Self::Breakfast,
            "lunch" => Self::Lunch,
            "snack" => Self::Snack,
            _ => Self::Dinner, // Default fallback (including "dinner")
        }
    }

    /// Lowercase identifier used in prompts and serialization
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        }
    }
}

impl Display for MealType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Requested cooking difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Simple everyday cooking (default)
    #[default]
    Easy,
    /// Some technique required
    Medium,
    /// Involved, multi-step cooking
    Hard,
}

impl Difficulty {
    /// Parse from string with fallback to the default
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "medium" | "normal" => Self::Medium,
            "hard" | "advanced" => Self::Hard,
            _ => Self::Easy, // Default fallback (including "easy")
        }
    }

    /// Lowercase identifier used in prompts and serialization
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Recipe
// ============================================================================

/// Role a recipe plays within a meal
///
/// Model replies label categories inconsistently (English or Japanese),
/// so [`RecipeCategory::from_label`] accepts both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecipeCategory {
    /// Main dish (default)
    #[default]
    Main,
    /// Side dish
    Side,
    /// Soup
    Soup,
    /// Rice or other staple
    Rice,
    /// Anything that does not fit the meal structure
    Other,
}

impl RecipeCategory {
    /// Parse a free-form category label, accepting English and Japanese
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "main" | "main dish" | "主菜" | "メイン" => Self::Main,
            "side" | "side dish" | "副菜" => Self::Side,
            "soup" | "汁物" | "スープ" | "味噌汁" => Self::Soup,
            "rice" | "staple" | "主食" | "ご飯" | "ごはん" => Self::Rice,
            _ => Self::Other,
        }
    }

    /// Lowercase identifier used in serialization
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Side => "side",
            Self::Soup => "soup",
            Self::Rice => "rice",
            Self::Other => "other",
        }
    }
}

impl Display for RecipeCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// A single recipe within a meal suggestion
///
/// Owned exclusively by its parent [`MealSuggestion`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Dish name
    pub name: String,
    /// Role within the meal
    pub category: RecipeCategory,
    /// Ingredient list, one entry per item
    pub ingredients: Vec<String>,
    /// Active cooking time in minutes
    pub cooking_time: u32,
    /// Calories per serving, when known
    pub calories: Option<u32>,
    /// Ordered preparation steps
    pub instructions: Vec<String>,
    /// Optional cooking tips
    pub tips: Vec<String>,
}

impl Recipe {
    /// Create a recipe with a name and category; fill the rest with builders
    #[must_use]
    pub fn new(name: impl Into<String>, category: RecipeCategory) -> Self {
        Self {
            name: name.into(),
            category,
            ingredients: Vec::new(),
            cooking_time: 0,
            calories: None,
            instructions: Vec::new(),
            tips: Vec::new(),
        }
    }

    /// Set the ingredient list
    #[must_use]
    pub fn with_ingredients(mut self, ingredients: Vec<String>) -> Self {
        self.ingredients = ingredients;
        self
    }

    /// Set the cooking time in minutes
    #[must_use]
    pub const fn with_cooking_time(mut self, minutes: u32) -> Self {
        self.cooking_time = minutes;
        self
    }

    /// Set the calorie count
    #[must_use]
    pub const fn with_calories(mut self, calories: u32) -> Self {
        self.calories = Some(calories);
        self
    }

    /// Set the preparation steps
    #[must_use]
    pub fn with_instructions(mut self, instructions: Vec<String>) -> Self {
        self.instructions = instructions;
        self
    }

    /// Set the cooking tips
    #[must_use]
    pub fn with_tips(mut self, tips: Vec<String>) -> Self {
        self.tips = tips;
        self
    }
}

// ============================================================================
// Preferences
// ============================================================================

/// Structured user input to the generation pipeline
///
/// Immutable once handed to the pipeline. Missing fields take the documented
/// defaults, both here and when deserializing partial input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealPreferences {
    /// Ingredients the user wants to use up
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Number of people eating
    #[serde(default = "default_servings")]
    pub servings: u32,
    /// Total cooking time budget in minutes
    #[serde(default = "default_cooking_time")]
    pub cooking_time: u32,
    /// Kind of meal requested
    #[serde(default)]
    pub meal_type: MealType,
    /// Free-form restrictions ("vegetarian", "no pork", ...)
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    /// Requested difficulty
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Cooking style; `None` means washoku (Japanese home cooking)
    #[serde(default)]
    pub cuisine: Option<String>,
}

const fn default_servings() -> u32 {
    DEFAULT_SERVINGS
}

const fn default_cooking_time() -> u32 {
    DEFAULT_COOKING_TIME_MINS
}

impl Default for MealPreferences {
    fn default() -> Self {
        Self {
            ingredients: Vec::new(),
            servings: DEFAULT_SERVINGS,
            cooking_time: DEFAULT_COOKING_TIME_MINS,
            meal_type: MealType::default(),
            dietary_restrictions: Vec::new(),
            difficulty: Difficulty::default(),
            cuisine: None,
        }
    }
}

impl MealPreferences {
    /// Preferences with every field at its default
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ingredients to use
    #[must_use]
    pub fn with_ingredients(mut self, ingredients: Vec<String>) -> Self {
        self.ingredients = ingredients;
        self
    }

    /// Set the number of servings
    #[must_use]
    pub const fn with_servings(mut self, servings: u32) -> Self {
        self.servings = servings;
        self
    }

    /// Set the cooking time budget in minutes
    #[must_use]
    pub const fn with_cooking_time(mut self, minutes: u32) -> Self {
        self.cooking_time = minutes;
        self
    }

    /// Set the meal type
    #[must_use]
    pub const fn with_meal_type(mut self, meal_type: MealType) -> Self {
        self.meal_type = meal_type;
        self
    }

    /// Set the dietary restrictions
    #[must_use]
    pub fn with_restrictions(mut self, restrictions: Vec<String>) -> Self {
        self.dietary_restrictions = restrictions;
        self
    }

    /// Set the difficulty
    #[must_use]
    pub const fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Set the cooking style
    #[must_use]
    pub fn with_cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = Some(cuisine.into());
        self
    }
}

// ============================================================================
// Meal Suggestion
// ============================================================================

/// Where a suggestion's content came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    /// Parsed from a structured model reply
    Model,
    /// Synthesized by the line scanner from an unstructured reply
    Heuristic,
    /// Produced by the deterministic seasonal table
    Fallback,
}

/// One step in a back-planned cooking schedule
///
/// Offsets are minutes after cooking begins; every recipe finishes at the
/// same moment when started at its offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Recipe to start
    pub recipe_name: String,
    /// Minutes to wait after cooking begins before starting this recipe
    pub start_offset: u32,
    /// Minutes this recipe takes
    pub duration: u32,
}

/// A complete generated meal plan
///
/// Produced once per generation request and never mutated afterwards.
/// The recipe list is never empty: the pipeline substitutes fallback
/// content before it would ever produce an empty plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealSuggestion {
    /// Opaque id: creation time in milliseconds plus a random suffix
    pub id: String,
    /// Plan title
    pub title: String,
    /// Short description of the meal
    pub description: String,
    /// Season the plan was generated for
    pub season: Season,
    /// Time of day the plan was generated for
    pub time_of_day: TimeOfDay,
    /// The recipes making up the meal
    pub recipes: Vec<Recipe>,
    /// Sum of the recipes' cooking times in minutes
    pub total_cooking_time: u32,
    /// Sum of the recipes' calories (unknown calories count as zero)
    pub total_calories: u32,
    /// Free-form nutrition notes keyed by nutrient or aspect
    pub nutrition_info: BTreeMap<String, String>,
    /// General tips for the whole meal
    pub tips: Vec<String>,
    /// Where the content came from
    pub source: SuggestionSource,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl MealSuggestion {
    /// Assemble a suggestion, computing the aggregate totals from the recipes
    ///
    /// This is the only way totals are ever set; they are not editable
    /// afterwards, so they always equal the arithmetic sum of the contained
    /// recipes' fields. The sums saturate at `u32::MAX`, so extreme
    /// model-supplied values cannot overflow them.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        season: Season,
        time_of_day: TimeOfDay,
        recipes: Vec<Recipe>,
        source: SuggestionSource,
    ) -> Self {
        let total_cooking_time = recipes
            .iter()
            .fold(0u32, |sum, r| sum.saturating_add(r.cooking_time));
        let total_calories = recipes
            .iter()
            .fold(0u32, |sum, r| sum.saturating_add(r.calories.unwrap_or(0)));

        Self {
            id: generate_id(),
            title: title.into(),
            description: description.into(),
            season,
            time_of_day,
            recipes,
            total_cooking_time,
            total_calories,
            nutrition_info: BTreeMap::new(),
            tips: Vec::new(),
            source,
            created_at: Utc::now(),
        }
    }

    /// Attach free-form nutrition notes
    #[must_use]
    pub fn with_nutrition_info(mut self, nutrition_info: BTreeMap<String, String>) -> Self {
        self.nutrition_info = nutrition_info;
        self
    }

    /// Attach meal-level tips
    #[must_use]
    pub fn with_tips(mut self, tips: Vec<String>) -> Self {
        self.tips = tips;
        self
    }

    /// Combined ingredient list across all recipes, deduplicated
    ///
    /// Keeps first-seen spelling and order; duplicates are detected
    /// case-insensitively after trimming.
    #[must_use]
    pub fn shopping_list(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut list = Vec::new();
        for recipe in &self.recipes {
            for ingredient in &recipe.ingredients {
                let item = ingredient.trim();
                if item.is_empty() {
                    continue;
                }
                if seen.insert(item.to_lowercase()) {
                    list.push(item.to_owned());
                }
            }
        }
        list
    }

    /// Back-planned start offsets so every recipe finishes together
    ///
    /// The longest recipe starts immediately; shorter ones start later.
    /// Entries are ordered by start offset, ties keeping recipe order.
    #[must_use]
    pub fn cooking_schedule(&self) -> Vec<ScheduleEntry> {
        let finish = self
            .recipes
            .iter()
            .map(|r| r.cooking_time)
            .max()
            .unwrap_or(0);

        let mut entries: Vec<ScheduleEntry> = self
            .recipes
            .iter()
            .map(|recipe| ScheduleEntry {
                recipe_name: recipe.name.clone(),
                start_offset: finish - recipe.cooking_time,
                duration: recipe.cooking_time,
            })
            .collect();
        entries.sort_by_key(|entry| entry.start_offset);
        entries
    }
}

/// Time-based id with a random suffix
///
/// Uniqueness is not cryptographically guaranteed; collisions are
/// negligible for interactive single-user use.
fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = rand::random::<u32>();
    format!("meal-{millis}-{suffix:08x}")
}
