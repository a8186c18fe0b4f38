//! Inventory endpoints. Every route is scoped to the authenticated owner.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Duration, Utc};
use grocerymate_core::inventory::{sample_ingredients, DEFAULT_EXPIRING_DAYS};
use grocerymate_core::validation::{validate_ingredient_update, validate_new_ingredient};
use grocerymate_core::{Ingredient, IngredientUpdate, NewIngredient};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExpiringQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn list_ingredients(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Ingredient>> {
    let ingredients = state.store.ingredients.read().await;
    Json(
        ingredients
            .iter()
            .filter(|i| i.owner_id == user.user_id)
            .filter(|i| query.location.as_ref().map_or(true, |loc| &i.location == loc))
            .cloned()
            .collect(),
    )
}

pub async fn create_ingredient(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<NewIngredient>,
) -> Result<(StatusCode, Json<Ingredient>), AppError> {
    validate_new_ingredient(&req)?;

    let ingredient = Ingredient::new(state.store.ingredient_ids.next(), user.user_id, req, Utc::now());
    state.store.ingredients.write().await.push(ingredient.clone());

    info!("User {} added ingredient {}", user.user_id, ingredient.id);
    Ok((StatusCode::CREATED, Json(ingredient)))
}

pub async fn get_ingredient(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Ingredient>, AppError> {
    let ingredients = state.store.ingredients.read().await;
    ingredients
        .iter()
        .find(|i| i.id == id && i.owner_id == user.user_id)
        .cloned()
        .map(Json)
        .ok_or(AppError::NotFound("Ingredient"))
}

pub async fn update_ingredient(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(update): Json<IngredientUpdate>,
) -> Result<Json<Ingredient>, AppError> {
    validate_ingredient_update(&update)?;

    let mut ingredients = state.store.ingredients.write().await;
    let ingredient = ingredients
        .iter_mut()
        .find(|i| i.id == id && i.owner_id == user.user_id)
        .ok_or(AppError::NotFound("Ingredient"))?;

    // An empty body changes nothing, including `updated_at`.
    if !update.is_empty() {
        ingredient.apply(update, Utc::now());
    }
    Ok(Json(ingredient.clone()))
}

pub async fn delete_ingredient(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let mut ingredients = state.store.ingredients.write().await;
    let position = ingredients
        .iter()
        .position(|i| i.id == id && i.owner_id == user.user_id)
        .ok_or(AppError::NotFound("Ingredient"))?;

    ingredients.remove(position);
    Ok(StatusCode::NO_CONTENT)
}

/// Items with an expiry date within the next `days` days. Already expired
/// items are included.
pub async fn expiring_soon(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<ExpiringQuery>,
) -> Json<Vec<Ingredient>> {
    let days = query.days.unwrap_or(DEFAULT_EXPIRING_DAYS);
    let today = Utc::now().date_naive();
    let threshold = Duration::try_days(days)
        .and_then(|offset| today.checked_add_signed(offset))
        .unwrap_or(if days < 0 { chrono::NaiveDate::MIN } else { chrono::NaiveDate::MAX });

    let mut expiring: Vec<Ingredient> = state
        .store
        .inventory_of(user.user_id)
        .await
        .into_iter()
        .filter(|i| i.is_expiring_by(threshold))
        .collect();
    expiring.sort_by_key(|i| i.expiry_date);

    Json(expiring)
}

pub async fn seed_sample(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Json<MessageResponse> {
    let now = Utc::now();
    let mut ingredients = state.store.ingredients.write().await;
    for sample in sample_ingredients() {
        ingredients.push(Ingredient::new(
            state.store.ingredient_ids.next(),
            user.user_id,
            sample,
            now,
        ));
    }

    info!("Seeded sample ingredients for user {}", user.user_id);
    Json(MessageResponse {
        message: format!(
            "Sample ingredients seeded successfully for user {}",
            user.user_id
        ),
    })
}
