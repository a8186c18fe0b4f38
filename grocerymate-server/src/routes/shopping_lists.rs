//! Shopping list endpoints. Item ownership is resolved through the parent list.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use grocerymate_core::validation::{
    validate_new_shopping_item, validate_new_shopping_list, validate_shopping_item_update,
};
use grocerymate_core::{
    NewShoppingItem, NewShoppingList, ShoppingItem, ShoppingItemUpdate, ShoppingList,
};
use std::sync::Arc;
use tracing::info;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Lists owned by the caller, newest first.
pub async fn list_shopping_lists(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Json<Vec<ShoppingList>> {
    let lists = state.store.shopping_lists.read().await;
    let mut owned: Vec<ShoppingList> = lists
        .iter()
        .filter(|l| l.owner_id == user.user_id)
        .cloned()
        .collect();
    owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    Json(owned)
}

pub async fn create_shopping_list(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<NewShoppingList>,
) -> Result<(StatusCode, Json<ShoppingList>), AppError> {
    validate_new_shopping_list(&req)?;

    let list = ShoppingList::new(state.store.shopping_list_ids.next(), user.user_id, req, Utc::now());
    state.store.shopping_lists.write().await.push(list.clone());

    info!("User {} created shopping list {}", user.user_id, list.id);
    Ok((StatusCode::CREATED, Json(list)))
}

pub async fn get_shopping_list(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ShoppingList>, AppError> {
    let lists = state.store.shopping_lists.read().await;
    lists
        .iter()
        .find(|l| l.id == id && l.owner_id == user.user_id)
        .cloned()
        .map(Json)
        .ok_or(AppError::NotFound("Shopping list"))
}

/// Deleting a list removes its items with it.
pub async fn delete_shopping_list(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let mut lists = state.store.shopping_lists.write().await;
    let position = lists
        .iter()
        .position(|l| l.id == id && l.owner_id == user.user_id)
        .ok_or(AppError::NotFound("Shopping list"))?;

    lists.remove(position);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_item(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<NewShoppingItem>,
) -> Result<(StatusCode, Json<ShoppingItem>), AppError> {
    validate_new_shopping_item(&req)?;

    let mut lists = state.store.shopping_lists.write().await;
    let list = lists
        .iter_mut()
        .find(|l| l.id == id && l.owner_id == user.user_id)
        .ok_or(AppError::NotFound("Shopping list"))?;

    let item = list
        .add_item(state.store.shopping_item_ids.next(), req, Utc::now())
        .clone();
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_item(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(item_id): Path<i64>,
    Json(update): Json<ShoppingItemUpdate>,
) -> Result<Json<ShoppingItem>, AppError> {
    validate_shopping_item_update(&update)?;

    let mut lists = state.store.shopping_lists.write().await;
    let item = lists
        .iter_mut()
        .filter(|l| l.owner_id == user.user_id)
        .find_map(|l| l.item_mut(item_id))
        .ok_or(AppError::NotFound("Shopping item"))?;

    item.apply(update);
    Ok(Json(item.clone()))
}

pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(item_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let mut lists = state.store.shopping_lists.write().await;
    lists
        .iter_mut()
        .filter(|l| l.owner_id == user.user_id)
        .find_map(|l| l.remove_item(item_id))
        .ok_or(AppError::NotFound("Shopping item"))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Remove purchased items and return the remaining list.
pub async fn clear_purchased(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ShoppingList>, AppError> {
    let mut lists = state.store.shopping_lists.write().await;
    let list = lists
        .iter_mut()
        .find(|l| l.id == id && l.owner_id == user.user_id)
        .ok_or(AppError::NotFound("Shopping list"))?;

    let removed = list.clear_purchased();
    info!("Cleared {} purchased items from list {}", removed, id);
    Ok(Json(list.clone()))
}
