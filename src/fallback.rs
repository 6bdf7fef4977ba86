// ABOUTME: Deterministic fallback meals served when generation fails
// ABOUTME: A static washoku table keyed by season and time of day
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

//! # Fallback Meals
//!
//! When the provider is unreachable or its reply yields nothing usable, the
//! pipeline still owes the caller a complete meal. This module holds a
//! static table of home-style Japanese meals, one per season and time of
//! day, plus a generic meal for any combination the table were ever to
//! miss. Content here is authored, not generated, so callers can rely on
//! it being sensible.

use tracing::debug;

use crate::models::{
    MealSuggestion, Recipe, RecipeCategory, Season, SuggestionSource, TimeOfDay,
};

/// Meal-level tips attached to every fallback suggestion
const FALLBACK_TIPS: &[&str] = &[
    "Prepare all ingredients before turning on the heat",
    "Taste and adjust the seasoning just before serving",
];

#[derive(Debug, Clone, Copy)]
struct FallbackRecipe {
    name: &'static str,
    category: RecipeCategory,
    ingredients: &'static [&'static str],
    cooking_time: u32,
    calories: u32,
    instructions: &'static [&'static str],
}

impl FallbackRecipe {
    fn to_recipe(self) -> Recipe {
        Recipe::new(self.name, self.category)
            .with_ingredients(self.ingredients.iter().map(|&s| s.to_owned()).collect())
            .with_cooking_time(self.cooking_time)
            .with_calories(self.calories)
            .with_instructions(self.instructions.iter().map(|&s| s.to_owned()).collect())
    }
}

#[derive(Debug, Clone, Copy)]
struct FallbackMeal {
    title: &'static str,
    description: &'static str,
    recipes: &'static [FallbackRecipe],
}

const STEAMED_RICE: FallbackRecipe = FallbackRecipe {
    name: "Steamed rice",
    category: RecipeCategory::Rice,
    ingredients: &["2 cups rice", "Water"],
    cooking_time: 30,
    calories: 250,
    instructions: &[
        "Rinse the rice until the water runs mostly clear",
        "Cook in a rice cooker or covered pot until fluffy",
    ],
};

const GENERIC_MEAL: FallbackMeal = FallbackMeal {
    title: "Simple home-style meal",
    description: "A quick meal that works at any time of year",
    recipes: &[FallbackRecipe {
        name: "Simple tasty dish",
        category: RecipeCategory::Main,
        ingredients: &["Whatever is in the refrigerator", "Salt", "Soy sauce"],
        cooking_time: 20,
        calories: 250,
        instructions: &[
            "Cut everything to an even size",
            "Cook through and season to taste",
        ],
    }],
};

const FALLBACK_TABLE: &[(Season, TimeOfDay, FallbackMeal)] = &[
    (
        Season::Spring,
        TimeOfDay::Breakfast,
        FallbackMeal {
            title: "Spring morning set",
            description: "A gentle start with rolled egg and spring greens",
            recipes: &[
                FallbackRecipe {
                    name: "Tamagoyaki",
                    category: RecipeCategory::Main,
                    ingredients: &["3 eggs", "1 tsp sugar", "1 tsp soy sauce", "Oil"],
                    cooking_time: 10,
                    calories: 180,
                    instructions: &[
                        "Beat the eggs with sugar and soy sauce",
                        "Roll thin layers in an oiled pan until set",
                    ],
                },
                FallbackRecipe {
                    name: "Nanohana miso soup",
                    category: RecipeCategory::Soup,
                    ingredients: &["1 bunch nanohana", "2 tbsp miso", "600 ml dashi"],
                    cooking_time: 10,
                    calories: 50,
                    instructions: &[
                        "Simmer the nanohana briefly in the dashi",
                        "Dissolve the miso off the heat",
                    ],
                },
                STEAMED_RICE,
            ],
        },
    ),
    (
        Season::Spring,
        TimeOfDay::Lunch,
        FallbackMeal {
            title: "Takenoko rice lunch",
            description: "Bamboo shoot rice with a crisp green salad",
            recipes: &[
                FallbackRecipe {
                    name: "Takenoko gohan",
                    category: RecipeCategory::Rice,
                    ingredients: &[
                        "2 cups rice",
                        "150 g boiled bamboo shoot",
                        "1 sheet aburaage",
                        "2 tbsp soy sauce",
                        "400 ml dashi",
                    ],
                    cooking_time: 45,
                    calories: 420,
                    instructions: &[
                        "Slice the bamboo shoot and aburaage thin",
                        "Cook with the rice, dashi, and soy sauce",
                    ],
                },
                FallbackRecipe {
                    name: "Snap pea and egg salad",
                    category: RecipeCategory::Side,
                    ingredients: &["150 g snap peas", "2 boiled eggs", "1 tbsp mayonnaise"],
                    cooking_time: 10,
                    calories: 120,
                    instructions: &[
                        "Blanch the snap peas and cool in cold water",
                        "Toss with chopped egg and mayonnaise",
                    ],
                },
            ],
        },
    ),
    (
        Season::Spring,
        TimeOfDay::Dinner,
        FallbackMeal {
            title: "Spring dinner set",
            description: "Miso-marinated fish with new potatoes and clam soup",
            recipes: &[
                FallbackRecipe {
                    name: "Sawara saikyo-yaki",
                    category: RecipeCategory::Main,
                    ingredients: &["2 fillets spanish mackerel", "3 tbsp saikyo miso", "1 tbsp mirin"],
                    cooking_time: 20,
                    calories: 230,
                    instructions: &[
                        "Marinate the fillets in miso and mirin",
                        "Wipe off the marinade and grill until golden",
                    ],
                },
                FallbackRecipe {
                    name: "Simmered new potatoes",
                    category: RecipeCategory::Side,
                    ingredients: &["400 g new potatoes", "300 ml dashi", "2 tbsp soy sauce", "1 tbsp sugar"],
                    cooking_time: 25,
                    calories: 160,
                    instructions: &[
                        "Simmer the potatoes in dashi until tender",
                        "Season and reduce until glossy",
                    ],
                },
                FallbackRecipe {
                    name: "Clear clam soup",
                    category: RecipeCategory::Soup,
                    ingredients: &["200 g asari clams", "Piece of kombu", "Mitsuba"],
                    cooking_time: 15,
                    calories: 40,
                    instructions: &[
                        "Heat the clams with kombu until they open",
                        "Season lightly with salt and top with mitsuba",
                    ],
                },
            ],
        },
    ),
    (
        Season::Summer,
        TimeOfDay::Breakfast,
        FallbackMeal {
            title: "Cool summer morning",
            description: "Chilled tofu and crisp pickles for a hot day",
            recipes: &[
                FallbackRecipe {
                    name: "Hiyayakko",
                    category: RecipeCategory::Main,
                    ingredients: &[
                        "1 block silken tofu",
                        "Grated ginger",
                        "Sliced scallion",
                        "Soy sauce",
                        "Katsuobushi",
                    ],
                    cooking_time: 5,
                    calories: 90,
                    instructions: &[
                        "Drain and quarter the tofu",
                        "Top with ginger, scallion, katsuobushi, and soy sauce",
                    ],
                },
                FallbackRecipe {
                    name: "Salted cucumber pickles",
                    category: RecipeCategory::Side,
                    ingredients: &["2 cucumbers", "1 tsp salt", "Toasted sesame"],
                    cooking_time: 10,
                    calories: 30,
                    instructions: &[
                        "Smash the cucumbers and toss with salt",
                        "Rest ten minutes and finish with sesame",
                    ],
                },
                STEAMED_RICE,
            ],
        },
    ),
    (
        Season::Summer,
        TimeOfDay::Lunch,
        FallbackMeal {
            title: "Chilled somen lunch",
            description: "Cold noodles with smoky grilled eggplant",
            recipes: &[
                FallbackRecipe {
                    name: "Chilled somen",
                    category: RecipeCategory::Main,
                    ingredients: &["200 g somen noodles", "Mentsuyu", "Sliced scallion", "Grated ginger"],
                    cooking_time: 15,
                    calories: 350,
                    instructions: &[
                        "Boil the somen briefly and chill in ice water",
                        "Serve with diluted mentsuyu, scallion, and ginger",
                    ],
                },
                FallbackRecipe {
                    name: "Grilled eggplant",
                    category: RecipeCategory::Side,
                    ingredients: &["2 eggplants", "Grated ginger", "Katsuobushi", "Soy sauce"],
                    cooking_time: 15,
                    calories: 70,
                    instructions: &[
                        "Grill the eggplants whole until the skin chars",
                        "Peel, tear into strips, and top with ginger and katsuobushi",
                    ],
                },
            ],
        },
    ),
    (
        Season::Summer,
        TimeOfDay::Dinner,
        FallbackMeal {
            title: "Summer stamina dinner",
            description: "Ginger pork with bright, cooling sides",
            recipes: &[
                FallbackRecipe {
                    name: "Ginger pork",
                    category: RecipeCategory::Main,
                    ingredients: &[
                        "300 g sliced pork loin",
                        "1 knob grated ginger",
                        "2 tbsp soy sauce",
                        "1 tbsp mirin",
                        "Shredded cabbage",
                    ],
                    cooking_time: 20,
                    calories: 380,
                    instructions: &[
                        "Sear the pork and pour over the ginger sauce",
                        "Serve on a bed of shredded cabbage",
                    ],
                },
                FallbackRecipe {
                    name: "Tomato and shiso salad",
                    category: RecipeCategory::Side,
                    ingredients: &["2 tomatoes", "4 shiso leaves", "Ponzu"],
                    cooking_time: 5,
                    calories: 45,
                    instructions: &[
                        "Slice the tomatoes and shred the shiso",
                        "Dress with ponzu just before serving",
                    ],
                },
                FallbackRecipe {
                    name: "Myoga miso soup",
                    category: RecipeCategory::Soup,
                    ingredients: &["2 myoga buds", "Half block tofu", "2 tbsp miso", "600 ml dashi"],
                    cooking_time: 10,
                    calories: 55,
                    instructions: &[
                        "Warm the tofu in the dashi",
                        "Dissolve the miso and top with sliced myoga",
                    ],
                },
            ],
        },
    ),
    (
        Season::Autumn,
        TimeOfDay::Breakfast,
        FallbackMeal {
            title: "Autumn morning set",
            description: "Grilled salmon with seasoned spinach",
            recipes: &[
                FallbackRecipe {
                    name: "Grilled salted salmon",
                    category: RecipeCategory::Main,
                    ingredients: &["2 salted salmon fillets"],
                    cooking_time: 15,
                    calories: 200,
                    instructions: &[
                        "Grill the fillets skin side first",
                        "Turn once and cook until just done",
                    ],
                },
                FallbackRecipe {
                    name: "Spinach ohitashi",
                    category: RecipeCategory::Side,
                    ingredients: &["1 bunch spinach", "100 ml dashi", "1 tsp soy sauce", "Katsuobushi"],
                    cooking_time: 10,
                    calories: 40,
                    instructions: &[
                        "Blanch the spinach and squeeze out the water",
                        "Soak in seasoned dashi and top with katsuobushi",
                    ],
                },
                STEAMED_RICE,
            ],
        },
    ),
    (
        Season::Autumn,
        TimeOfDay::Lunch,
        FallbackMeal {
            title: "Mushroom rice lunch",
            description: "Fragrant mushroom rice with silky egg custard",
            recipes: &[
                FallbackRecipe {
                    name: "Kinoko takikomi gohan",
                    category: RecipeCategory::Rice,
                    ingredients: &[
                        "2 cups rice",
                        "1 pack shimeji",
                        "1 pack maitake",
                        "1 sheet aburaage",
                        "2 tbsp soy sauce",
                    ],
                    cooking_time: 50,
                    calories: 400,
                    instructions: &[
                        "Trim the mushrooms and slice the aburaage",
                        "Cook everything with the rice and seasonings",
                    ],
                },
                FallbackRecipe {
                    name: "Chawanmushi",
                    category: RecipeCategory::Main,
                    ingredients: &["2 eggs", "300 ml dashi", "50 g chicken", "Kamaboko", "Mitsuba"],
                    cooking_time: 25,
                    calories: 130,
                    instructions: &[
                        "Strain the egg and dashi mixture over the fillings",
                        "Steam gently until just set",
                    ],
                },
            ],
        },
    ),
    (
        Season::Autumn,
        TimeOfDay::Dinner,
        FallbackMeal {
            title: "Sanma dinner set",
            description: "Salt-grilled autumn fish with kabocha and miso soup",
            recipes: &[
                FallbackRecipe {
                    name: "Sanma shioyaki",
                    category: RecipeCategory::Main,
                    ingredients: &["2 sanma", "Salt", "Grated daikon", "Sudachi"],
                    cooking_time: 20,
                    calories: 310,
                    instructions: &[
                        "Salt the fish and rest ten minutes",
                        "Grill until the skin crisps; serve with daikon and sudachi",
                    ],
                },
                FallbackRecipe {
                    name: "Simmered kabocha",
                    category: RecipeCategory::Side,
                    ingredients: &["Quarter kabocha", "300 ml dashi", "2 tbsp soy sauce", "1 tbsp sugar"],
                    cooking_time: 20,
                    calories: 140,
                    instructions: &[
                        "Cut the kabocha into chunks",
                        "Simmer skin side down until tender",
                    ],
                },
                FallbackRecipe {
                    name: "Nameko miso soup",
                    category: RecipeCategory::Soup,
                    ingredients: &["1 pack nameko", "Half block tofu", "2 tbsp miso", "600 ml dashi"],
                    cooking_time: 10,
                    calories: 50,
                    instructions: &[
                        "Rinse the nameko and warm in the dashi with tofu",
                        "Dissolve the miso off the heat",
                    ],
                },
            ],
        },
    ),
    (
        Season::Winter,
        TimeOfDay::Breakfast,
        FallbackMeal {
            title: "Warm winter morning",
            description: "Hot rice porridge to start a cold day",
            recipes: &[
                FallbackRecipe {
                    name: "Egg zosui",
                    category: RecipeCategory::Main,
                    ingredients: &["2 bowls cooked rice", "2 eggs", "600 ml dashi", "Sliced scallion"],
                    cooking_time: 15,
                    calories: 280,
                    instructions: &[
                        "Simmer the rice in dashi until it loosens",
                        "Stir in the beaten egg and top with scallion",
                    ],
                },
                FallbackRecipe {
                    name: "Yuzu pickled daikon",
                    category: RecipeCategory::Side,
                    ingredients: &["300 g daikon", "1 tsp salt", "Piece of kombu", "Yuzu peel"],
                    cooking_time: 10,
                    calories: 25,
                    instructions: &[
                        "Slice the daikon thin and salt it",
                        "Press with kombu and yuzu peel for a few hours",
                    ],
                },
            ],
        },
    ),
    (
        Season::Winter,
        TimeOfDay::Lunch,
        FallbackMeal {
            title: "Niku udon lunch",
            description: "A single warming bowl of beef udon",
            recipes: &[FallbackRecipe {
                name: "Niku udon",
                category: RecipeCategory::Main,
                ingredients: &[
                    "2 portions udon",
                    "200 g sliced beef",
                    "1 onion",
                    "Mentsuyu",
                    "Sliced scallion",
                ],
                cooking_time: 20,
                calories: 520,
                instructions: &[
                    "Simmer the beef and onion in diluted mentsuyu",
                    "Pour over boiled udon and top with scallion",
                ],
            }],
        },
    ),
    (
        Season::Winter,
        TimeOfDay::Dinner,
        FallbackMeal {
            title: "Yosenabe dinner",
            description: "Everything-in-one hot pot with rice",
            recipes: &[
                FallbackRecipe {
                    name: "Yosenabe",
                    category: RecipeCategory::Main,
                    ingredients: &[
                        "300 g chicken thigh",
                        "Quarter napa cabbage",
                        "1 block tofu",
                        "4 shiitake",
                        "1 bunch scallion",
                        "Kombu dashi",
                    ],
                    cooking_time: 30,
                    calories: 420,
                    instructions: &[
                        "Simmer the chicken in kombu dashi, skimming as needed",
                        "Add the vegetables and tofu in order of cooking time",
                    ],
                },
                STEAMED_RICE,
            ],
        },
    ),
];

/// The deterministic meal for a season and time of day
///
/// Always succeeds and always contains at least one recipe. Content comes
/// from the static table; only the suggestion id and timestamp vary
/// between calls.
#[must_use]
pub fn fallback_suggestion(season: Season, time_of_day: TimeOfDay) -> MealSuggestion {
    let meal = FALLBACK_TABLE
        .iter()
        .find(|(s, t, _)| *s == season && *t == time_of_day)
        .map_or(GENERIC_MEAL, |(_, _, meal)| *meal);

    debug!(season = %season, time_of_day = %time_of_day, title = meal.title, "Serving fallback meal");

    MealSuggestion::new(
        meal.title,
        meal.description,
        season,
        time_of_day,
        meal.recipes.iter().map(|recipe| recipe.to_recipe()).collect(),
        SuggestionSource::Fallback,
    )
    .with_tips(FALLBACK_TIPS.iter().map(|&tip| tip.to_owned()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEASONS: [Season; 4] = [
        Season::Spring,
        Season::Summer,
        Season::Autumn,
        Season::Winter,
    ];
    const TIMES: [TimeOfDay; 3] = [TimeOfDay::Breakfast, TimeOfDay::Lunch, TimeOfDay::Dinner];

    #[test]
    fn test_table_covers_every_combination() {
        for season in SEASONS {
            for time_of_day in TIMES {
                assert!(
                    FALLBACK_TABLE
                        .iter()
                        .any(|(s, t, _)| *s == season && *t == time_of_day),
                    "missing fallback for {season} {time_of_day}"
                );
            }
        }
    }

    #[test]
    fn test_every_fallback_is_complete() {
        for season in SEASONS {
            for time_of_day in TIMES {
                let suggestion = fallback_suggestion(season, time_of_day);
                assert_eq!(suggestion.source, SuggestionSource::Fallback);
                assert!(!suggestion.recipes.is_empty());
                assert!(!suggestion.tips.is_empty());
                for recipe in &suggestion.recipes {
                    assert!(!recipe.name.is_empty());
                    assert!(!recipe.ingredients.is_empty());
                    assert!(!recipe.instructions.is_empty());
                    assert!(recipe.cooking_time > 0);
                }
            }
        }
    }

    #[test]
    fn test_fallback_content_is_deterministic() {
        let first = fallback_suggestion(Season::Winter, TimeOfDay::Dinner);
        let second = fallback_suggestion(Season::Winter, TimeOfDay::Dinner);
        assert_eq!(first.title, second.title);
        assert_eq!(first.total_cooking_time, second.total_cooking_time);
        assert_eq!(first.total_calories, second.total_calories);
        let names = |s: &MealSuggestion| {
            s.recipes.iter().map(|r| r.name.clone()).collect::<Vec<_>>()
        };
        assert_eq!(names(&first), names(&second));
        // Each generation is still a fresh suggestion
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_generic_meal_is_usable() {
        let recipe = GENERIC_MEAL.recipes[0].to_recipe();
        assert_eq!(recipe.name, "Simple tasty dish");
        assert_eq!(recipe.cooking_time, 20);
        assert_eq!(recipe.calories, Some(250));
    }
}
