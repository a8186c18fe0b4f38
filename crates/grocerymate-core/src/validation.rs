//! Field validation for create and update payloads
//!
//! Every validator collects all violations before returning, so callers can
//! report them together.

use crate::inventory::{IngredientUpdate, InventoryItem, NewIngredient};
use crate::recipe::{NewRecipe, NewRequiredIngredient, RecipeUpdate};
use crate::shopping::{NewShoppingItem, NewShoppingList, ShoppingItemUpdate};
use thiserror::Error;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_CATEGORY_LEN: usize = 50;
pub const MAX_LOCATION_LEN: usize = 50;
pub const MAX_UNIT_LEN: usize = 20;
pub const MAX_TITLE_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Empty { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    #[error("{field} must be greater than 0")]
    NotPositive { field: String },

    #[error("{field} cannot be negative")]
    Negative { field: String },

    #[error("{field} must be at least {min}")]
    BelowMinimum { field: String, min: i64 },
}

impl ValidationError {
    pub fn field(&self) -> &str {
        match self {
            Self::Empty { field }
            | Self::TooLong { field, .. }
            | Self::NotFinite { field }
            | Self::NotPositive { field }
            | Self::Negative { field }
            | Self::BelowMinimum { field, .. } => field,
        }
    }
}

fn finish(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_text(field: &str, value: &str, max: usize, errors: &mut Vec<ValidationError>) {
    if value.trim().is_empty() {
        errors.push(ValidationError::Empty {
            field: field.to_string(),
        });
    }
    if value.chars().count() > max {
        errors.push(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
}

fn check_positive(field: &str, value: f64, errors: &mut Vec<ValidationError>) {
    if !value.is_finite() {
        errors.push(ValidationError::NotFinite {
            field: field.to_string(),
        });
    } else if value <= 0.0 {
        errors.push(ValidationError::NotPositive {
            field: field.to_string(),
        });
    }
}

fn check_non_negative(field: &str, value: f64, errors: &mut Vec<ValidationError>) {
    if !value.is_finite() {
        errors.push(ValidationError::NotFinite {
            field: field.to_string(),
        });
    } else if value < 0.0 {
        errors.push(ValidationError::Negative {
            field: field.to_string(),
        });
    }
}

fn check_minimum(field: &str, value: i32, min: i64, errors: &mut Vec<ValidationError>) {
    if i64::from(value) < min {
        if min == 0 {
            errors.push(ValidationError::Negative {
                field: field.to_string(),
            });
        } else {
            errors.push(ValidationError::BelowMinimum {
                field: field.to_string(),
                min,
            });
        }
    }
}

pub fn validate_new_ingredient(new: &NewIngredient) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_text("name", &new.name, MAX_NAME_LEN, &mut errors);
    check_text("category", &new.category, MAX_CATEGORY_LEN, &mut errors);
    check_text("location", &new.location, MAX_LOCATION_LEN, &mut errors);
    check_non_negative("quantity", new.quantity, &mut errors);
    check_text("unit", &new.unit, MAX_UNIT_LEN, &mut errors);
    finish(errors)
}

/// Checks a bare `{name, quantity, unit}` row before it reaches the matcher.
pub fn validate_inventory_item(item: &InventoryItem) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_text("name", &item.name, MAX_NAME_LEN, &mut errors);
    check_non_negative("quantity", item.quantity, &mut errors);
    check_text("unit", &item.unit, MAX_UNIT_LEN, &mut errors);
    finish(errors)
}

pub fn validate_ingredient_update(update: &IngredientUpdate) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    if let Some(name) = &update.name {
        check_text("name", name, MAX_NAME_LEN, &mut errors);
    }
    if let Some(category) = &update.category {
        check_text("category", category, MAX_CATEGORY_LEN, &mut errors);
    }
    if let Some(location) = &update.location {
        check_text("location", location, MAX_LOCATION_LEN, &mut errors);
    }
    if let Some(quantity) = update.quantity {
        check_non_negative("quantity", quantity, &mut errors);
    }
    if let Some(unit) = &update.unit {
        check_text("unit", unit, MAX_UNIT_LEN, &mut errors);
    }
    finish(errors)
}

fn validate_required_ingredients(
    ingredients: &[NewRequiredIngredient],
    errors: &mut Vec<ValidationError>,
) {
    for (i, ingredient) in ingredients.iter().enumerate() {
        let prefix = format!("required_ingredients[{}]", i);
        check_text(&format!("{}.name", prefix), &ingredient.name, MAX_NAME_LEN, errors);
        check_positive(&format!("{}.quantity", prefix), ingredient.quantity, errors);
        check_text(&format!("{}.unit", prefix), &ingredient.unit, MAX_UNIT_LEN, errors);
    }
}

pub fn validate_new_recipe(new: &NewRecipe) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_text("title", &new.title, MAX_TITLE_LEN, &mut errors);
    if let Some(prep_time) = new.prep_time {
        check_minimum("prep_time", prep_time, 0, &mut errors);
    }
    if let Some(cook_time) = new.cook_time {
        check_minimum("cook_time", cook_time, 0, &mut errors);
    }
    check_minimum("servings", new.servings, 1, &mut errors);
    if let Some(calories) = new.calories {
        check_minimum("calories", calories, 0, &mut errors);
    }
    validate_required_ingredients(&new.required_ingredients, &mut errors);

    finish(errors)
}

pub fn validate_recipe_update(update: &RecipeUpdate) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(title) = &update.title {
        check_text("title", title, MAX_TITLE_LEN, &mut errors);
    }
    if let Some(Some(prep_time)) = update.prep_time {
        check_minimum("prep_time", prep_time, 0, &mut errors);
    }
    if let Some(Some(cook_time)) = update.cook_time {
        check_minimum("cook_time", cook_time, 0, &mut errors);
    }
    if let Some(servings) = update.servings {
        check_minimum("servings", servings, 1, &mut errors);
    }
    if let Some(Some(calories)) = update.calories {
        check_minimum("calories", calories, 0, &mut errors);
    }
    if let Some(ingredients) = &update.required_ingredients {
        validate_required_ingredients(ingredients, &mut errors);
    }

    finish(errors)
}

pub fn validate_new_shopping_list(new: &NewShoppingList) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_text("name", &new.name, MAX_NAME_LEN, &mut errors);
    finish(errors)
}

pub fn validate_new_shopping_item(new: &NewShoppingItem) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_text("item_name", &new.item_name, MAX_NAME_LEN, &mut errors);
    check_positive("quantity", new.quantity, &mut errors);
    check_text("unit", &new.unit, MAX_UNIT_LEN, &mut errors);
    finish(errors)
}

pub fn validate_shopping_item_update(
    update: &ShoppingItemUpdate,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    if let Some(item_name) = &update.item_name {
        check_text("item_name", item_name, MAX_NAME_LEN, &mut errors);
    }
    if let Some(quantity) = update.quantity {
        check_positive("quantity", quantity, &mut errors);
    }
    if let Some(unit) = &update.unit {
        check_text("unit", unit, MAX_UNIT_LEN, &mut errors);
    }
    finish(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_ingredient() -> NewIngredient {
        NewIngredient {
            name: "Flour".to_string(),
            category: "Baking".to_string(),
            location: "Pantry".to_string(),
            quantity: 1.0,
            unit: "kg".to_string(),
            expiry_date: None,
        }
    }

    fn valid_recipe() -> NewRecipe {
        serde_json::from_value(serde_json::json!({
            "title": "Omelette",
            "instructions": "Whisk and cook.",
            "required_ingredients": [{"name": "Egg", "quantity": 3, "unit": "pcs"}]
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_ingredient() {
        assert!(validate_new_ingredient(&valid_ingredient()).is_ok());
    }

    #[test]
    fn test_zero_inventory_quantity_allowed() {
        let mut ingredient = valid_ingredient();
        ingredient.quantity = 0.0;
        assert!(validate_new_ingredient(&ingredient).is_ok());
    }

    #[test]
    fn test_ingredient_collects_all_errors() {
        let mut ingredient = valid_ingredient();
        ingredient.name = "   ".to_string();
        ingredient.unit = "u".repeat(21);
        ingredient.quantity = -1.0;

        let errors = validate_new_ingredient(&ingredient).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::Empty { field } if field == "name")));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::TooLong { field, max: 20 } if field == "unit")));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::Negative { field } if field == "quantity")));
    }

    #[test]
    fn test_demo_data_is_valid() {
        for ingredient in crate::inventory::demo_ingredients() {
            assert!(validate_new_ingredient(&ingredient).is_ok(), "{}", ingredient.name);
        }
        for recipe in crate::recipe::sample_recipes() {
            assert!(validate_new_recipe(&recipe).is_ok(), "{}", recipe.title);
        }
        for sample in crate::shopping::sample_shopping_lists() {
            assert!(validate_new_shopping_list(&sample.list).is_ok());
            for (item, _) in &sample.items {
                assert!(validate_new_shopping_item(item).is_ok(), "{}", item.item_name);
            }
        }
    }

    #[test]
    fn test_inventory_item_rules() {
        let row = |name: &str, quantity: f64, unit: &str| InventoryItem {
            name: name.to_string(),
            quantity,
            unit: unit.to_string(),
        };
        assert!(validate_inventory_item(&row("Egg", 0.0, "pcs")).is_ok());

        let errors = validate_inventory_item(&row("", -5.0, " ")).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(ValidationError::field).collect();
        assert_eq!(fields, vec!["name", "quantity", "unit"]);

        let errors = validate_inventory_item(&row("Egg", f64::INFINITY, "pcs")).unwrap_err();
        assert!(matches!(errors[0], ValidationError::NotFinite { .. }));
    }

    #[test]
    fn test_non_finite_quantity() {
        let mut ingredient = valid_ingredient();
        ingredient.quantity = f64::NAN;
        let errors = validate_new_ingredient(&ingredient).unwrap_err();
        assert!(matches!(errors[0], ValidationError::NotFinite { .. }));
    }

    #[test]
    fn test_ingredient_update_checks_present_fields_only() {
        assert!(validate_ingredient_update(&IngredientUpdate::default()).is_ok());

        let update = IngredientUpdate {
            category: Some(String::new()),
            ..Default::default()
        };
        let errors = validate_ingredient_update(&update).unwrap_err();
        assert_eq!(errors[0].field(), "category");
    }

    #[test]
    fn test_valid_recipe() {
        assert!(validate_new_recipe(&valid_recipe()).is_ok());
    }

    #[test]
    fn test_recipe_rules() {
        let mut recipe = valid_recipe();
        recipe.title = "t".repeat(201);
        recipe.servings = 0;
        recipe.prep_time = Some(-5);
        recipe.required_ingredients[0].quantity = 0.0;

        let errors = validate_new_recipe(&recipe).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field()).collect();
        assert_eq!(
            fields,
            vec!["title", "prep_time", "servings", "required_ingredients[0].quantity"]
        );
        assert!(matches!(
            errors[2],
            ValidationError::BelowMinimum { min: 1, .. }
        ));
    }

    #[test]
    fn test_recipe_update_allows_clearing() {
        let update: RecipeUpdate =
            serde_json::from_str(r#"{"calories": null, "prep_time": null}"#).unwrap();
        assert!(validate_recipe_update(&update).is_ok());

        let update: RecipeUpdate = serde_json::from_str(r#"{"calories": -1}"#).unwrap();
        assert!(validate_recipe_update(&update).is_err());
    }

    #[test]
    fn test_shopping_item_rules() {
        let item = NewShoppingItem {
            item_name: "Milk".to_string(),
            quantity: 0.0,
            unit: "l".to_string(),
        };
        let errors = validate_new_shopping_item(&item).unwrap_err();
        assert!(matches!(errors[0], ValidationError::NotPositive { .. }));

        let update = ShoppingItemUpdate {
            is_purchased: Some(true),
            ..Default::default()
        };
        assert!(validate_shopping_item_update(&update).is_ok());
    }

    #[test]
    fn test_shopping_list_name_required() {
        let errors = validate_new_shopping_list(&NewShoppingList {
            name: String::new(),
        })
        .unwrap_err();
        assert_eq!(errors[0].to_string(), "name cannot be empty");
    }
}
