//! Integration tests for the recipe feasibility matcher

use grocerymate_core::inventory::demo_ingredients;
use grocerymate_core::recipe::sample_recipes;
use grocerymate_core::{
    check_recipe, check_recipes, evaluate, Ingredient, InventoryIndex, InventoryItem,
    MatchResult, NewRequiredIngredient,
};

fn stock(name: &str, quantity: f64, unit: &str) -> InventoryItem {
    InventoryItem {
        name: name.to_string(),
        quantity,
        unit: unit.to_string(),
    }
}

fn need(name: &str, quantity: f64, unit: &str) -> NewRequiredIngredient {
    NewRequiredIngredient {
        name: name.to_string(),
        quantity,
        unit: unit.to_string(),
    }
}

fn pantry() -> Vec<InventoryItem> {
    vec![
        stock("Flour", 2.0, "kg"),
        stock("Egg", 6.0, "pcs"),
        stock("Milk", 1.0, "l"),
        stock("Sugar", 200.0, "g"),
        stock("Egg", 6.0, "pcs"),
        stock("Butter", 1.0, "block"),
    ]
}

fn requirement_sets() -> Vec<Vec<NewRequiredIngredient>> {
    vec![
        vec![],
        vec![need("Flour", 1.0, "kg")],
        vec![need("flour", 3.0, "kg"), need("EGG", 10.0, "pcs")],
        vec![need("Butter", 100.0, "g"), need("Salt", 1.0, "pinch")],
        vec![
            need("Milk", 1.0, "L"),
            need("Sugar", 200.0, "g"),
            need("Vanilla", 1.0, "tsp"),
            need("Egg", 13.0, "pcs"),
        ],
    ]
}

#[test]
fn test_every_requirement_yields_one_entry() {
    let index = InventoryIndex::build(&pantry());
    for required in requirement_sets() {
        let report = check_recipe(1, &required, &index);
        assert_eq!(
            report.missing_items.len() + report.available_items.len(),
            required.len()
        );
    }
}

#[test]
fn test_can_make_iff_nothing_missing() {
    let index = InventoryIndex::build(&pantry());
    for required in requirement_sets() {
        let report = check_recipe(1, &required, &index);
        assert_eq!(report.can_make, report.missing_items.is_empty());
    }
}

#[test]
fn test_flour_scenarios() {
    let required = need("Flour", 1.0, "kg");

    let enough = InventoryIndex::build(&[stock("Flour", 2.0, "kg")]);
    assert_eq!(evaluate(&required, &enough).result(), MatchResult::Available);

    let short = InventoryIndex::build(&[stock("Flour", 0.5, "kg")]);
    let report = check_recipe(1, &[need("Flour", 1.0, "kg")], &short);
    assert_eq!(evaluate(&required, &short).result(), MatchResult::Insufficient);
    assert_eq!(report.missing_items[0].available_quantity, Some(0.5));

    let wrong_unit = InventoryIndex::build(&[stock("Flour", 2.0, "cups")]);
    let report = check_recipe(1, &[need("Flour", 1.0, "kg")], &wrong_unit);
    assert_eq!(
        evaluate(&required, &wrong_unit).result(),
        MatchResult::Insufficient
    );
    assert_eq!(report.missing_items[0].available_unit.as_deref(), Some("cups"));
    assert!(!report.can_make);
}

#[test]
fn test_empty_inventory_misses_everything() {
    let index = InventoryIndex::build::<InventoryItem, _>(&[]);
    let required = vec![need("Flour", 1.0, "kg"), need("Egg", 2.0, "pcs")];
    let report = check_recipe(9, &required, &index);

    assert!(!report.can_make);
    assert!(report.available_items.is_empty());
    assert!(report
        .missing_items
        .iter()
        .all(|item| item.reason == "Missing entirely"));
}

#[test]
fn test_duplicate_rows_aggregate() {
    let index = InventoryIndex::build(&[stock("Egg", 6.0, "pcs"), stock("Egg", 6.0, "pcs")]);
    let report = check_recipe(1, &[need("Egg", 10.0, "pcs")], &index);
    assert!(report.can_make);
    assert_eq!(report.available_items[0].quantity, 12.0);
}

#[test]
fn test_name_matching_ignores_case() {
    let index = InventoryIndex::build(&[stock("flour", 1.0, "kg")]);
    assert_eq!(
        evaluate(&need("FLOUR", 1.0, "kg"), &index).result(),
        MatchResult::Available
    );
}

#[test]
fn test_matcher_is_idempotent_and_order_stable() {
    let inventory = pantry();
    let sets = requirement_sets();
    let recipes: Vec<(i64, &[NewRequiredIngredient])> = sets
        .iter()
        .enumerate()
        .map(|(i, required)| (i as i64 + 1, required.as_slice()))
        .collect();

    let first = check_recipes(&InventoryIndex::build(&inventory), recipes.clone());
    let second = check_recipes(&InventoryIndex::build(&inventory), recipes);

    assert_eq!(first, second);
    let ids: Vec<i64> = first.iter().map(|report| report.recipe_id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);

    let last = &first[4];
    let missing: Vec<&str> = last.missing_items.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(missing, vec!["Vanilla", "Egg"]);
}

#[test]
fn test_inventory_order_does_not_change_sums() {
    let mut reversed = pantry();
    reversed.reverse();

    let forward = InventoryIndex::build(&pantry());
    let backward = InventoryIndex::build(&reversed);
    for (name, unit) in [("egg", "pcs"), ("flour", "kg"), ("sugar", "g")] {
        assert_eq!(
            forward.get(name, unit).map(|s| s.quantity),
            backward.get(name, unit).map(|s| s.quantity)
        );
    }
}

#[test]
fn test_matcher_does_not_mutate_inputs() {
    let inventory = pantry();
    let snapshot = inventory.clone();
    let required = vec![need("Flour", 5.0, "kg")];

    let index = InventoryIndex::build(&inventory);
    let _ = check_recipe(1, &required, &index);

    assert_eq!(inventory, snapshot);
    assert_eq!(required[0].quantity, 5.0);
}

#[test]
fn demo_inventory_covers_sample_recipes() {
    let now = chrono::Utc::now();
    let inventory: Vec<Ingredient> = demo_ingredients()
        .into_iter()
        .enumerate()
        .map(|(i, new)| Ingredient::new(i as i64 + 1, 1, new, now))
        .collect();
    let index = InventoryIndex::build(&inventory);

    for recipe in sample_recipes() {
        let report = check_recipe(1, &recipe.required_ingredients, &index);
        assert!(report.can_make, "{} should be cookable", recipe.title);
        assert_eq!(report.available_items.len(), recipe.required_ingredients.len());
    }
}
