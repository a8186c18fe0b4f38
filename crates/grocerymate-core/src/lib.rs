//! GroceryMate Core - household inventory, recipes and shopping lists
//!
//! This crate provides:
//! - The owned domain records (ingredients, recipes, shopping lists)
//! - Explicit partial-update structs for each record
//! - Field validation that reports every violation at once
//! - The feasibility matcher that checks recipes against an inventory

pub mod feasibility;
pub mod inventory;
pub mod recipe;
pub mod shopping;
pub mod validation;

mod serde_util;

pub use feasibility::{
    check_recipe, check_recipes, evaluate, AvailableItem, Evaluation, FeasibilityReport,
    InventoryIndex, MatchResult, Measured, MissingItem, Outcome, Stock,
};
pub use inventory::{Ingredient, IngredientUpdate, InventoryItem, NewIngredient};
pub use recipe::{NewRecipe, NewRequiredIngredient, Recipe, RecipeUpdate, RequiredIngredient};
pub use shopping::{NewShoppingItem, NewShoppingList, ShoppingItem, ShoppingItemUpdate, ShoppingList};
pub use validation::ValidationError;
