//! Demo data for the authenticated caller.

use axum::{extract::State, Json};
use chrono::Utc;
use grocerymate_core::inventory::demo_ingredients;
use grocerymate_core::recipe::sample_recipes;
use grocerymate_core::shopping::sample_shopping_lists;
use grocerymate_core::{Ingredient, Recipe, ShoppingList};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct SeedSummary {
    pub message: String,
    pub ingredients_added: usize,
    pub recipes_added: usize,
    pub shopping_lists_added: usize,
}

/// Seed demo ingredients, recipes and a shopping list for the caller.
///
/// Ingredients and shopping lists the caller already owns under the same name
/// are skipped, as are recipes with an existing title. Seeding twice adds
/// nothing the second time.
pub async fn seed_me(State(state): State<Arc<AppState>>, user: AuthUser) -> Json<SeedSummary> {
    let now = Utc::now();
    let store = &state.store;
    let owner_id = user.user_id;

    let ingredients_added = {
        let mut ingredients = store.ingredients.write().await;
        let mut added = 0;
        for sample in demo_ingredients() {
            if ingredients
                .iter()
                .any(|i| i.owner_id == owner_id && i.name == sample.name)
            {
                continue;
            }
            ingredients.push(Ingredient::new(store.ingredient_ids.next(), owner_id, sample, now));
            added += 1;
        }
        added
    };

    let recipes_added = {
        let mut recipes = store.recipes.write().await;
        let mut added = 0;
        for sample in sample_recipes() {
            if recipes
                .iter()
                .any(|r| r.owner_id == owner_id && r.title == sample.title)
            {
                continue;
            }
            recipes.push(Recipe::new(store.recipe_ids.next(), owner_id, sample, now, || {
                store.recipe_ingredient_ids.next()
            }));
            added += 1;
        }
        added
    };

    let shopping_lists_added = {
        let mut lists = store.shopping_lists.write().await;
        let mut added = 0;
        for sample in sample_shopping_lists() {
            if lists
                .iter()
                .any(|l| l.owner_id == owner_id && l.name == sample.list.name)
            {
                continue;
            }
            let mut list = ShoppingList::new(store.shopping_list_ids.next(), owner_id, sample.list, now);
            for (item, is_purchased) in sample.items {
                list.add_item(store.shopping_item_ids.next(), item, now)
                    .is_purchased = is_purchased;
            }
            lists.push(list);
            added += 1;
        }
        added
    };

    info!(
        "Seeded demo data for user {}: {} ingredients, {} recipes, {} shopping lists",
        owner_id, ingredients_added, recipes_added, shopping_lists_added
    );
    Json(SeedSummary {
        message: format!(
            "Sample data seeded successfully for current user (ID {})",
            owner_id
        ),
        ingredients_added,
        recipes_added,
        shopping_lists_added,
    })
}
