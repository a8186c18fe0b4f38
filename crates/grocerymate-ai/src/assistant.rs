//! The recipe assistant seam used by the HTTP layer

use async_trait::async_trait;
use grocerymate_core::{Ingredient, NewRecipe};
use tracing::info;

use crate::client::{LlmClient, ResponseFormat};
use crate::error::AiError;
use crate::prompt::{
    build_ingredient_list_prompt, build_inventory_prompt, parse_recipe_response, SYSTEM_PROMPT,
};

#[async_trait]
pub trait RecipeAssistant: Send + Sync {
    /// Suggest a structured recipe that uses the given inventory.
    async fn suggest_recipe(&self, inventory: &[Ingredient]) -> Result<NewRecipe, AiError>;

    /// Free-text recipe for a comma-separated ingredient list.
    async fn recipe_for_ingredients(&self, ingredients: &str) -> Result<String, AiError>;

    /// Free-form cooking question.
    async fn ask(&self, question: &str) -> Result<String, AiError>;
}

#[async_trait]
impl RecipeAssistant for LlmClient {
    async fn suggest_recipe(&self, inventory: &[Ingredient]) -> Result<NewRecipe, AiError> {
        info!("Generating recipe from {} inventory items", inventory.len());
        let user_prompt = build_inventory_prompt(inventory);
        self.generate_with(
            SYSTEM_PROMPT,
            &user_prompt,
            ResponseFormat::Json,
            parse_recipe_response,
        )
        .await
    }

    async fn recipe_for_ingredients(&self, ingredients: &str) -> Result<String, AiError> {
        self.generate("", &build_ingredient_list_prompt(ingredients))
            .await
    }

    async fn ask(&self, question: &str) -> Result<String, AiError> {
        self.generate("", question).await
    }
}
