//! Prompt building and response parsing for recipe suggestions

use grocerymate_core::validation::validate_new_recipe;
use grocerymate_core::{Ingredient, NewRecipe};

use crate::error::AiError;

/// System prompt for generating a structured recipe from an inventory
pub const SYSTEM_PROMPT: &str = r#"You are an expert culinary assistant. Your task is to generate one complete and detailed recipe that uses as many of the provided ingredients as possible.

The recipe MUST be returned as JSON with this shape:
{
  "title": "<concise title>",
  "description": "<short description>",
  "instructions": "<step by step instructions>",
  "prep_time": <minutes>,
  "cook_time": <minutes>,
  "servings": <number of servings>,
  "calories": <estimated calories per serving>,
  "is_healthy": true | false,
  "is_public": false,
  "required_ingredients": [
    { "name": "<ingredient>", "quantity": <number>, "unit": "<unit>" }
  ]
}

Guidelines:
1. List every required ingredient, including those already in the inventory
2. Use the same ingredient names and units as the inventory where possible
3. Keep the instructions easy to follow
4. Output ONLY valid JSON, no explanation"#;

/// Build the user prompt for an inventory-based recipe
pub fn build_inventory_prompt(inventory: &[Ingredient]) -> String {
    format!(
        r#"Generate a creative and delicious recipe using the following ingredients from a user's inventory.
Prioritize a simple, weeknight-friendly meal.

User Inventory:
{inventory}

If necessary, you may suggest adding 2-3 common staple ingredients (like salt, pepper, oil) not listed above."#,
        inventory = format_inventory(inventory)
    )
}

/// One line per item: `- name (qty unit, Category: c) (Expires: d)`
pub fn format_inventory(inventory: &[Ingredient]) -> String {
    if inventory.is_empty() {
        return "(empty)".to_string();
    }

    inventory
        .iter()
        .map(|item| {
            let expiry = item
                .expiry_date
                .map(|date| format!(" (Expires: {})", date))
                .unwrap_or_default();
            format!(
                "- {} ({} {}, Category: {}){}",
                item.name, item.quantity, item.unit, item.category, expiry
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Free-form recipe prompt from a comma-separated ingredient list
pub fn build_ingredient_list_prompt(ingredients: &str) -> String {
    format!(
        "Generate a simple and appetizing recipe in English using these ingredients: {}.",
        ingredients
    )
}

/// Strip a surrounding markdown code fence, if any.
pub fn extract_json(response: &str) -> &str {
    if response.contains("```json") {
        response
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .map(|s| s.trim())
            .unwrap_or(response)
    } else if response.contains("```") {
        response
            .split("```")
            .nth(1)
            .map(|s| s.trim())
            .unwrap_or(response)
    } else {
        response.trim()
    }
}

/// Parse an LLM response into a recipe creation payload and validate it.
///
/// Generated recipes are always private.
pub fn parse_recipe_response(response: &str) -> Result<NewRecipe, AiError> {
    let json_str = extract_json(response);
    let mut recipe: NewRecipe =
        serde_json::from_str(json_str).map_err(|e| AiError::InvalidJson(e.to_string()))?;
    recipe.is_public = false;
    validate_new_recipe(&recipe).map_err(AiError::InvalidRecipe)?;
    Ok(recipe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use grocerymate_core::NewIngredient;

    fn ingredient(name: &str, quantity: f64, unit: &str, expiry: Option<NaiveDate>) -> Ingredient {
        Ingredient::new(
            1,
            1,
            NewIngredient {
                name: name.to_string(),
                category: "Produce".to_string(),
                location: "Fridge".to_string(),
                quantity,
                unit: unit.to_string(),
                expiry_date: expiry,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_format_inventory() {
        let inventory = vec![
            ingredient("Tomato", 5.0, "pcs", NaiveDate::from_ymd_opt(2026, 5, 1)),
            ingredient("Basil", 0.5, "bunch", None),
        ];
        let text = format_inventory(&inventory);
        assert_eq!(
            text,
            "- Tomato (5 pcs, Category: Produce) (Expires: 2026-05-01)\n- Basil (0.5 bunch, Category: Produce)"
        );
    }

    #[test]
    fn test_build_inventory_prompt() {
        let prompt = build_inventory_prompt(&[ingredient("Rice", 1.0, "kg", None)]);
        assert!(prompt.contains("User Inventory:"));
        assert!(prompt.contains("- Rice (1 kg, Category: Produce)"));
    }

    #[test]
    fn test_empty_inventory_prompt() {
        assert!(build_inventory_prompt(&[]).contains("(empty)"));
    }

    #[test]
    fn test_ingredient_list_prompt() {
        assert_eq!(
            build_ingredient_list_prompt("chicken,rice"),
            "Generate a simple and appetizing recipe in English using these ingredients: chicken,rice."
        );
    }

    #[test]
    fn test_parse_recipe_response_plain() {
        let response = r#"{
            "title": "Tomato Rice",
            "instructions": "Cook the rice, add tomatoes.",
            "servings": 2,
            "required_ingredients": [
                {"name": "Rice", "quantity": 0.2, "unit": "kg"},
                {"name": "Tomato", "quantity": 2, "unit": "pcs"}
            ]
        }"#;
        let recipe = parse_recipe_response(response).unwrap();
        assert_eq!(recipe.title, "Tomato Rice");
        assert_eq!(recipe.required_ingredients.len(), 2);
        assert!(recipe.is_healthy);
    }

    #[test]
    fn test_parse_recipe_response_fenced() {
        let response = "Here you go:\n```json\n{\"title\": \"Salad\", \"instructions\": \"Toss.\", \"is_public\": true}\n```\nEnjoy!";
        let recipe = parse_recipe_response(response).unwrap();
        assert_eq!(recipe.title, "Salad");
        assert!(!recipe.is_public);
    }

    #[test]
    fn test_parse_recipe_response_invalid_json() {
        let err = parse_recipe_response("I could not think of a recipe.").unwrap_err();
        assert!(matches!(err, AiError::InvalidJson(_)));
    }

    #[test]
    fn test_parse_recipe_response_rejects_invalid_recipe() {
        let response = r#"{"title": "", "instructions": "Nothing", "servings": 0}"#;
        match parse_recipe_response(response) {
            Err(AiError::InvalidRecipe(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected InvalidRecipe, got {:?}", other),
        }
    }
}
