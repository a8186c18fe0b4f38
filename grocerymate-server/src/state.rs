//! Shared application state and the in-process record store.

use grocerymate_ai::{AiError, RecipeAssistant};
use grocerymate_core::{Ingredient, Recipe, ShoppingList};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::JwtVerifier;
use crate::metrics::AppMetrics;

/// Monotonic id sequence starting at 1.
#[derive(Debug, Default)]
pub struct IdSequence(AtomicI64);

impl IdSequence {
    pub fn next(&self) -> i64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Records kept in memory, one lock per collection.
#[derive(Default)]
pub struct Store {
    pub ingredients: RwLock<Vec<Ingredient>>,
    pub recipes: RwLock<Vec<Recipe>>,
    pub shopping_lists: RwLock<Vec<ShoppingList>>,
    pub ingredient_ids: IdSequence,
    pub recipe_ids: IdSequence,
    pub recipe_ingredient_ids: IdSequence,
    pub shopping_list_ids: IdSequence,
    pub shopping_item_ids: IdSequence,
}

impl Store {
    /// Inventory owned by `owner_id`, in insertion order.
    pub async fn inventory_of(&self, owner_id: i64) -> Vec<Ingredient> {
        self.ingredients
            .read()
            .await
            .iter()
            .filter(|ingredient| ingredient.owner_id == owner_id)
            .cloned()
            .collect()
    }
}

/// Application state shared across handlers
pub struct AppState {
    pub store: Store,
    pub jwt: JwtVerifier,
    /// Absent when no LLM provider is configured.
    pub assistant: Option<Arc<dyn RecipeAssistant>>,
    pub metrics: AppMetrics,
}

impl AppState {
    pub fn new(jwt_secret: &str, assistant: Option<Arc<dyn RecipeAssistant>>) -> Self {
        Self {
            store: Store::default(),
            jwt: JwtVerifier::new(jwt_secret),
            assistant,
            metrics: AppMetrics::new(),
        }
    }

    /// The configured assistant. When none is configured the call still counts
    /// as a failed `endpoint` request.
    pub fn assistant_for(&self, endpoint: &'static str) -> Result<&dyn RecipeAssistant, AiError> {
        match &self.assistant {
            Some(assistant) => Ok(assistant.as_ref()),
            None => {
                let missing = Err(AiError::NotConfigured);
                self.metrics.record_ai(endpoint, &missing);
                missing
            }
        }
    }
}
