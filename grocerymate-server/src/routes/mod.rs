pub mod ai;
pub mod health;
pub mod ingredients;
pub mod recipes;
pub mod seed;
pub mod shopping_lists;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::state::AppState;

/// All application routes. Static segments are matched before `:id`.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics))
        .route(
            "/api/ingredients",
            get(ingredients::list_ingredients).post(ingredients::create_ingredient),
        )
        .route("/api/ingredients/expiring/soon", get(ingredients::expiring_soon))
        .route("/api/ingredients/seed-sample", post(ingredients::seed_sample))
        .route(
            "/api/ingredients/:id",
            get(ingredients::get_ingredient)
                .put(ingredients::update_ingredient)
                .delete(ingredients::delete_ingredient),
        )
        .route(
            "/api/recipes",
            get(recipes::list_recipes).post(recipes::create_recipe),
        )
        .route("/api/recipes/check-inventory", get(recipes::check_all_recipes))
        .route("/api/recipes/generate", post(recipes::generate_recipe))
        .route(
            "/api/recipes/:id",
            get(recipes::get_recipe)
                .put(recipes::update_recipe)
                .delete(recipes::delete_recipe),
        )
        .route(
            "/api/recipes/:id/check-inventory",
            get(recipes::check_single_recipe),
        )
        .route(
            "/api/shopping-lists",
            get(shopping_lists::list_shopping_lists).post(shopping_lists::create_shopping_list),
        )
        .route(
            "/api/shopping-lists/items/:item_id",
            put(shopping_lists::update_item).delete(shopping_lists::delete_item),
        )
        .route(
            "/api/shopping-lists/:id",
            get(shopping_lists::get_shopping_list).delete(shopping_lists::delete_shopping_list),
        )
        .route("/api/shopping-lists/:id/items", post(shopping_lists::add_item))
        .route(
            "/api/shopping-lists/:id/items/clear-purchased",
            post(shopping_lists::clear_purchased),
        )
        .route("/api/seed/me", post(seed::seed_me))
        .route("/api/ai/recipe", get(ai::recipe_from_ingredients))
        .route("/api/ai/ask", get(ai::ask))
}
