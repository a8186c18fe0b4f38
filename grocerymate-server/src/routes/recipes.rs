//! Recipe endpoints, including feasibility checks against the caller's inventory.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use grocerymate_core::validation::{validate_new_recipe, validate_recipe_update};
use grocerymate_core::{
    check_recipe, check_recipes, FeasibilityReport, InventoryIndex, NewRecipe, Recipe,
    RecipeUpdate,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::auth::{AuthUser, MaybeAuth};
use crate::error::AppError;
use crate::state::AppState;

fn default_limit() -> usize {
    100
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRecipeResponse {
    pub status: String,
    pub recipe: NewRecipe,
}

pub async fn list_recipes(
    State(state): State<Arc<AppState>>,
    auth: MaybeAuth,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Recipe>> {
    let user_id = auth.user_id();
    let search = query.search.as_deref().filter(|s| !s.is_empty());

    let recipes = state.store.recipes.read().await;
    Json(
        recipes
            .iter()
            .filter(|r| r.is_visible_to(user_id))
            .filter(|r| search.map_or(true, |s| r.matches_search(s)))
            .skip(query.skip)
            .take(query.limit)
            .cloned()
            .collect(),
    )
}

pub async fn create_recipe(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<NewRecipe>,
) -> Result<(StatusCode, Json<Recipe>), AppError> {
    validate_new_recipe(&req)?;

    let store = &state.store;
    let recipe = Recipe::new(store.recipe_ids.next(), user.user_id, req, Utc::now(), || {
        store.recipe_ingredient_ids.next()
    });
    store.recipes.write().await.push(recipe.clone());

    info!(
        "User {} created recipe {} with {} ingredients",
        user.user_id,
        recipe.id,
        recipe.required_ingredients.len()
    );
    Ok((StatusCode::CREATED, Json(recipe)))
}

pub async fn get_recipe(
    State(state): State<Arc<AppState>>,
    auth: MaybeAuth,
    Path(id): Path<i64>,
) -> Result<Json<Recipe>, AppError> {
    let recipes = state.store.recipes.read().await;
    recipes
        .iter()
        .find(|r| r.id == id && r.is_visible_to(auth.user_id()))
        .cloned()
        .map(Json)
        .ok_or(AppError::NotFound("Recipe"))
}

pub async fn update_recipe(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(update): Json<RecipeUpdate>,
) -> Result<Json<Recipe>, AppError> {
    validate_recipe_update(&update)?;

    let store = &state.store;
    let mut recipes = store.recipes.write().await;
    let recipe = recipes
        .iter_mut()
        .find(|r| r.id == id && r.owner_id == user.user_id)
        .ok_or(AppError::NotFound("Recipe"))?;

    recipe.apply(update, Utc::now(), || store.recipe_ingredient_ids.next());
    Ok(Json(recipe.clone()))
}

pub async fn delete_recipe(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let mut recipes = state.store.recipes.write().await;
    let position = recipes
        .iter()
        .position(|r| r.id == id && r.owner_id == user.user_id)
        .ok_or(AppError::NotFound("Recipe"))?;

    recipes.remove(position);
    Ok(StatusCode::NO_CONTENT)
}

/// Feasibility of every recipe visible to the caller. One inventory index
/// serves the whole batch.
pub async fn check_all_recipes(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Json<Vec<FeasibilityReport>> {
    let inventory = state.store.inventory_of(user.user_id).await;
    let index = InventoryIndex::build(&inventory);

    let recipes = state.store.recipes.read().await;
    let reports = check_recipes(
        &index,
        recipes
            .iter()
            .filter(|r| r.is_visible_to(Some(user.user_id)))
            .map(|r| (r.id, r.required_ingredients.as_slice())),
    );

    state.metrics.record_checks(&reports);
    info!(
        "Checked {} recipes for user {}: {} feasible",
        reports.len(),
        user.user_id,
        reports.iter().filter(|r| r.can_make).count()
    );
    Json(reports)
}

pub async fn check_single_recipe(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<FeasibilityReport>, AppError> {
    let required = {
        let recipes = state.store.recipes.read().await;
        recipes
            .iter()
            .find(|r| r.id == id && r.is_visible_to(Some(user.user_id)))
            .map(|r| r.required_ingredients.clone())
            .ok_or(AppError::NotFound("Recipe"))?
    };

    let inventory = state.store.inventory_of(user.user_id).await;
    let report = check_recipe(id, &required, &InventoryIndex::build(&inventory));

    state.metrics.record_checks([&report]);
    Ok(Json(report))
}

/// Suggest a recipe from the caller's inventory. The suggestion is returned,
/// not saved.
pub async fn generate_recipe(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<GenerateRecipeResponse>, AppError> {
    let assistant = state.assistant_for("generate")?;

    let inventory = state.store.inventory_of(user.user_id).await;
    let result = assistant.suggest_recipe(&inventory).await;
    state.metrics.record_ai("generate", &result);

    Ok(Json(GenerateRecipeResponse {
        status: "success".to_string(),
        recipe: result?,
    }))
}
