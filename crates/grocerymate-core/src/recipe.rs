//! Recipes and the ingredients they require

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::feasibility::Measured;

pub const DEFAULT_SERVINGS: i32 = 2;

fn default_servings() -> i32 {
    DEFAULT_SERVINGS
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub instructions: String,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub servings: i32,
    pub calories: Option<i32>,
    pub is_healthy: bool,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub required_ingredients: Vec<RequiredIngredient>,
}

/// An ingredient a recipe calls for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredIngredient {
    pub id: i64,
    pub recipe_id: i64,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRequiredIngredient {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

/// Payload for creating a recipe. Also the shape generated recipes are parsed into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecipe {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub instructions: String,
    #[serde(default)]
    pub prep_time: Option<i32>,
    #[serde(default)]
    pub cook_time: Option<i32>,
    #[serde(default = "default_servings")]
    pub servings: i32,
    #[serde(default)]
    pub calories: Option<i32>,
    #[serde(default = "default_true")]
    pub is_healthy: bool,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub required_ingredients: Vec<NewRequiredIngredient>,
}

/// Partial update for a recipe.
///
/// Nullable fields accept an explicit `null` to clear them. When
/// `required_ingredients` is present it replaces the whole list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::serde_util::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::serde_util::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub prep_time: Option<Option<i32>>,
    #[serde(
        default,
        deserialize_with = "crate::serde_util::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub cook_time: Option<Option<i32>>,
    #[serde(default)]
    pub servings: Option<i32>,
    #[serde(
        default,
        deserialize_with = "crate::serde_util::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub calories: Option<Option<i32>>,
    #[serde(default)]
    pub is_healthy: Option<bool>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub required_ingredients: Option<Vec<NewRequiredIngredient>>,
}

impl Recipe {
    /// Build a recipe from a creation payload. `next_ingredient_id` hands out
    /// ids for the nested ingredients.
    pub fn new(
        id: i64,
        owner_id: i64,
        new: NewRecipe,
        now: DateTime<Utc>,
        mut next_ingredient_id: impl FnMut() -> i64,
    ) -> Self {
        let required_ingredients = new
            .required_ingredients
            .into_iter()
            .map(|ingredient| ingredient.into_required(next_ingredient_id(), id))
            .collect();

        Self {
            id,
            owner_id,
            title: new.title,
            description: new.description,
            instructions: new.instructions,
            prep_time: new.prep_time,
            cook_time: new.cook_time,
            servings: new.servings,
            calories: new.calories,
            is_healthy: new.is_healthy,
            is_public: new.is_public,
            created_at: now,
            updated_at: now,
            required_ingredients,
        }
    }

    /// Owners see their own recipes; everyone sees public ones.
    pub fn is_visible_to(&self, user_id: Option<i64>) -> bool {
        self.is_public || user_id == Some(self.owner_id)
    }

    /// Case-insensitive substring match on the title.
    pub fn matches_search(&self, search: &str) -> bool {
        self.title.to_lowercase().contains(&search.to_lowercase())
    }

    pub fn apply(
        &mut self,
        update: RecipeUpdate,
        now: DateTime<Utc>,
        mut next_ingredient_id: impl FnMut() -> i64,
    ) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(instructions) = update.instructions {
            self.instructions = instructions;
        }
        if let Some(prep_time) = update.prep_time {
            self.prep_time = prep_time;
        }
        if let Some(cook_time) = update.cook_time {
            self.cook_time = cook_time;
        }
        if let Some(servings) = update.servings {
            self.servings = servings;
        }
        if let Some(calories) = update.calories {
            self.calories = calories;
        }
        if let Some(is_healthy) = update.is_healthy {
            self.is_healthy = is_healthy;
        }
        if let Some(is_public) = update.is_public {
            self.is_public = is_public;
        }
        if let Some(ingredients) = update.required_ingredients {
            let recipe_id = self.id;
            self.required_ingredients = ingredients
                .into_iter()
                .map(|ingredient| ingredient.into_required(next_ingredient_id(), recipe_id))
                .collect();
        }
        self.updated_at = now;
    }
}

/// Demo recipes. Both are cookable from [`crate::inventory::demo_ingredients`].
pub fn sample_recipes() -> Vec<NewRecipe> {
    let needs = |name: &str, quantity: f64, unit: &str| NewRequiredIngredient {
        name: name.to_string(),
        quantity,
        unit: unit.to_string(),
    };

    vec![
        NewRecipe {
            title: "Grilled Chicken Salad".to_string(),
            description: Some("Healthy protein-packed salad with fresh vegetables".to_string()),
            instructions: "1. Grill chicken\n2. Chop vegetables\n3. Mix\n4. Season".to_string(),
            prep_time: Some(20),
            cook_time: Some(15),
            servings: 2,
            calories: Some(350),
            is_healthy: true,
            is_public: true,
            required_ingredients: vec![
                needs("Chicken Breast", 2.0, "kg"),
                needs("Lettuce", 1.0, "pcs"),
                needs("Tomato", 5.0, "pcs"),
                needs("Olive Oil", 1.0, "liter"),
            ],
        },
        NewRecipe {
            title: "Fruit Smoothie".to_string(),
            description: Some("Refreshing and vitamin-rich smoothie".to_string()),
            instructions: "1. Blend all ingredients".to_string(),
            prep_time: Some(10),
            cook_time: Some(0),
            servings: 2,
            calories: Some(150),
            is_healthy: true,
            is_public: true,
            required_ingredients: vec![
                needs("Banana", 6.0, "pcs"),
                needs("Strawberry", 200.0, "grams"),
            ],
        },
    ]
}

impl NewRequiredIngredient {
    pub fn into_required(self, id: i64, recipe_id: i64) -> RequiredIngredient {
        RequiredIngredient {
            id,
            recipe_id,
            name: self.name,
            quantity: self.quantity,
            unit: self.unit,
        }
    }
}

impl Measured for RequiredIngredient {
    fn name(&self) -> &str {
        &self.name
    }

    fn quantity(&self) -> f64 {
        self.quantity
    }

    fn unit(&self) -> &str {
        &self.unit
    }
}

impl Measured for NewRequiredIngredient {
    fn name(&self) -> &str {
        &self.name
    }

    fn quantity(&self) -> f64 {
        self.quantity
    }

    fn unit(&self) -> &str {
        &self.unit
    }
}
