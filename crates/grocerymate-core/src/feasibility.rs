//! Recipe feasibility against a user's inventory
//!
//! Names and units are compared after lowercasing and nothing else: no
//! trimming, no plural folding, no unit conversion. "Flour" in `kg` and
//! "flour" in `cups` are unrelated stock and never satisfy each other.
//!
//! The matcher is pure. It reads the inventory and the requirements, builds
//! a throwaway [`InventoryIndex`], and returns a fresh [`FeasibilityReport`]
//! per recipe.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

pub const REASON_MISSING: &str = "Missing entirely";
pub const REASON_INSUFFICIENT: &str = "Insufficient quantity or unit mismatch";

/// Anything with a name, an amount and a unit.
pub trait Measured {
    fn name(&self) -> &str;
    fn quantity(&self) -> f64;
    fn unit(&self) -> &str;
}

/// Lowercase a name or unit for comparison.
pub fn normalize(value: &str) -> String {
    value.to_lowercase()
}

/// Cumulative stock held under one `(name, unit)` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    /// Display name of the last inventory row folded into this key
    pub name: String,
    /// Display unit of the last inventory row folded into this key
    pub unit: String,
    pub quantity: f64,
}

/// Inventory grouped by normalized name, then by normalized unit.
///
/// Units for a name keep first-seen order so lookups that need "some entry
/// for this name" are deterministic for a given input.
#[derive(Debug, Clone, Default)]
pub struct InventoryIndex {
    entries: HashMap<String, Vec<(String, Stock)>>,
}

impl InventoryIndex {
    /// Build an index from inventory rows. Quantities under identical keys sum.
    pub fn build<'a, T, I>(items: I) -> Self
    where
        T: Measured + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut index = Self::default();
        for item in items {
            index.insert(item);
        }
        index
    }

    /// Fold a single inventory row into the index.
    pub fn insert<T: Measured + ?Sized>(&mut self, item: &T) {
        let units = self.entries.entry(normalize(item.name())).or_default();
        let unit_key = normalize(item.unit());

        match units.iter_mut().find(|(key, _)| *key == unit_key) {
            Some((_, stock)) => {
                stock.quantity += item.quantity();
                stock.name = item.name().to_string();
                stock.unit = item.unit().to_string();
            }
            None => units.push((
                unit_key,
                Stock {
                    name: item.name().to_string(),
                    unit: item.unit().to_string(),
                    quantity: item.quantity(),
                },
            )),
        }
    }

    /// Stock held for an exact `(name, unit)` pair, compared case-insensitively.
    pub fn get(&self, name: &str, unit: &str) -> Option<&Stock> {
        let unit_key = normalize(unit);
        self.entries
            .get(&normalize(name))?
            .iter()
            .find(|(key, _)| *key == unit_key)
            .map(|(_, stock)| stock)
    }

    /// Whether any stock exists for a name under any unit.
    pub fn contains_name(&self, name: &str) -> bool {
        self.entries.contains_key(&normalize(name))
    }

    /// All stock for a name, in first-seen unit order.
    pub fn stock_for(&self, name: &str) -> impl Iterator<Item = &Stock> {
        self.entries
            .get(&normalize(name))
            .into_iter()
            .flat_map(|units| units.iter().map(|(_, stock)| stock))
    }

    /// Number of distinct `(name, unit)` keys.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Classification of one required ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchResult {
    Available,
    Missing,
    Insufficient,
}

/// What the evaluator found for a requirement.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Same unit, enough quantity. Carries the stock that satisfied it.
    Available(Stock),
    /// Nothing under this name in any unit.
    Missing,
    /// Stock exists but in another unit or short on quantity.
    Insufficient(Stock),
}

/// Result of checking one required ingredient against the index.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub outcome: Outcome,
}

impl Evaluation {
    pub fn result(&self) -> MatchResult {
        match self.outcome {
            Outcome::Available(_) => MatchResult::Available,
            Outcome::Missing => MatchResult::Missing,
            Outcome::Insufficient(_) => MatchResult::Insufficient,
        }
    }
}

/// Evaluate one requirement.
///
/// Order of the decision rule:
/// 1. no stock under the name in any unit => `Missing`
/// 2. same-unit stock with cumulative quantity `>=` required => `Available`
/// 3. otherwise `Insufficient`, reporting the same-unit stock if present,
///    else the first-seen stock for the name
pub fn evaluate<T: Measured + ?Sized>(required: &T, index: &InventoryIndex) -> Evaluation {
    let outcome = match index.get(required.name(), required.unit()) {
        Some(stock) if stock.quantity >= required.quantity() => Outcome::Available(stock.clone()),
        Some(stock) => Outcome::Insufficient(stock.clone()),
        None => match index.stock_for(required.name()).next() {
            Some(stock) => Outcome::Insufficient(stock.clone()),
            None => Outcome::Missing,
        },
    };

    Evaluation {
        name: required.name().to_string(),
        quantity: required.quantity(),
        unit: required.unit().to_string(),
        outcome,
    }
}

/// A required ingredient that cannot be covered entirely from inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingItem {
    pub name: String,
    /// Required quantity
    pub quantity: f64,
    pub unit: String,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_unit: Option<String>,
}

/// Inventory stock that covers a required ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableItem {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

/// Per-recipe verdict. Built per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityReport {
    pub recipe_id: i64,
    pub can_make: bool,
    pub missing_items: Vec<MissingItem>,
    pub available_items: Vec<AvailableItem>,
}

impl FeasibilityReport {
    /// Total number of requirements classified in this report.
    pub fn evaluated_count(&self) -> usize {
        self.missing_items.len() + self.available_items.len()
    }
}

/// Check one recipe. Every requirement yields exactly one entry, in input order.
pub fn check_recipe<T: Measured>(
    recipe_id: i64,
    required: &[T],
    index: &InventoryIndex,
) -> FeasibilityReport {
    let mut missing_items = Vec::new();
    let mut available_items = Vec::new();

    for requirement in required {
        let evaluation = evaluate(requirement, index);
        match evaluation.outcome {
            Outcome::Available(stock) => available_items.push(AvailableItem {
                name: stock.name,
                quantity: stock.quantity,
                unit: stock.unit,
            }),
            Outcome::Missing => missing_items.push(MissingItem {
                name: evaluation.name,
                quantity: evaluation.quantity,
                unit: evaluation.unit,
                reason: REASON_MISSING.to_string(),
                available_quantity: None,
                available_unit: None,
            }),
            Outcome::Insufficient(stock) => missing_items.push(MissingItem {
                name: evaluation.name,
                quantity: evaluation.quantity,
                unit: evaluation.unit,
                reason: REASON_INSUFFICIENT.to_string(),
                available_quantity: Some(stock.quantity),
                available_unit: Some(stock.unit),
            }),
        }
    }

    let can_make = missing_items.is_empty();
    debug!(
        "Recipe {} feasibility: can_make={}, missing={}, available={}",
        recipe_id,
        can_make,
        missing_items.len(),
        available_items.len()
    );

    FeasibilityReport {
        recipe_id,
        can_make,
        missing_items,
        available_items,
    }
}

/// Check several recipes against one shared index, preserving recipe order.
pub fn check_recipes<'a, T, I>(index: &InventoryIndex, recipes: I) -> Vec<FeasibilityReport>
where
    T: Measured + 'a,
    I: IntoIterator<Item = (i64, &'a [T])>,
{
    recipes
        .into_iter()
        .map(|(recipe_id, required)| check_recipe(recipe_id, required, index))
        .collect()
}
