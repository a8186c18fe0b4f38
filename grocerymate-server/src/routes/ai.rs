//! Free-form AI endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecipeQuery {
    /// Comma-separated ingredient names
    pub ingredients: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeSuggestion {
    pub ingredients: String,
    pub recipe: String,
}

#[derive(Debug, Deserialize)]
pub struct AskQuery {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Answer {
    pub question: String,
    pub answer: String,
}

pub async fn recipe_from_ingredients(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(query): Query<RecipeQuery>,
) -> Result<Json<RecipeSuggestion>, AppError> {
    let assistant = state.assistant_for("recipe")?;

    let result = assistant.recipe_for_ingredients(&query.ingredients).await;
    state.metrics.record_ai("recipe", &result);

    Ok(Json(RecipeSuggestion {
        recipe: result?,
        ingredients: query.ingredients,
    }))
}

pub async fn ask(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(query): Query<AskQuery>,
) -> Result<Json<Answer>, AppError> {
    let assistant = state.assistant_for("ask")?;

    let result = assistant.ask(&query.question).await;
    state.metrics.record_ai("ask", &result);

    Ok(Json(Answer {
        answer: result?,
        question: query.question,
    }))
}
