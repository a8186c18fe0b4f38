//! Inventory records held by a user

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::feasibility::Measured;

/// Number of days ahead the "expiring soon" view looks by default.
pub const DEFAULT_EXPIRING_DAYS: i64 = 7;

/// One stocked ingredient in a user's inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub category: String,
    pub location: String,
    pub quantity: f64,
    pub unit: String,
    pub expiry_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating an ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewIngredient {
    pub name: String,
    pub category: String,
    pub location: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
}

/// Partial update. Absent fields are left untouched; `expiry_date: null`
/// clears the date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngredientUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::serde_util::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiry_date: Option<Option<NaiveDate>>,
}

impl IngredientUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.location.is_none()
            && self.quantity.is_none()
            && self.unit.is_none()
            && self.expiry_date.is_none()
    }
}

impl Ingredient {
    pub fn new(id: i64, owner_id: i64, new: NewIngredient, now: DateTime<Utc>) -> Self {
        Self {
            id,
            owner_id,
            name: new.name,
            category: new.category,
            location: new.location,
            quantity: new.quantity,
            unit: new.unit,
            expiry_date: new.expiry_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply the fields present in `update` and refresh `updated_at`.
    pub fn apply(&mut self, update: IngredientUpdate, now: DateTime<Utc>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(location) = update.location {
            self.location = location;
        }
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        if let Some(unit) = update.unit {
            self.unit = unit;
        }
        if let Some(expiry_date) = update.expiry_date {
            self.expiry_date = expiry_date;
        }
        self.updated_at = now;
    }

    /// True when the item has an expiry date on or before `threshold`.
    /// Already-expired items count.
    pub fn is_expiring_by(&self, threshold: NaiveDate) -> bool {
        self.expiry_date.is_some_and(|date| date <= threshold)
    }
}

/// The starter inventory offered to new users.
pub fn sample_ingredients() -> Vec<NewIngredient> {
    let sample = |name: &str, category: &str, location: &str, quantity: f64, unit: &str| {
        NewIngredient {
            name: name.to_string(),
            category: category.to_string(),
            location: location.to_string(),
            quantity,
            unit: unit.to_string(),
            expiry_date: None,
        }
    };

    vec![
        sample("Chicken Breast", "Meat", "Fridge", 2.0, "kg"),
        sample("Lettuce", "Produce", "Fridge", 1.0, "pcs"),
        sample("Tomato", "Produce", "Fridge", 5.0, "pcs"),
        sample("Olive Oil", "Oil", "Pantry", 1.0, "liter"),
    ]
}

/// The full demo inventory seeded alongside the sample recipes.
pub fn demo_ingredients() -> Vec<NewIngredient> {
    let expires = |month: u32, day: u32| NaiveDate::from_ymd_opt(2025, month, day);
    let demo = |name: &str,
                category: &str,
                location: &str,
                quantity: f64,
                unit: &str,
                expiry_date: Option<NaiveDate>| NewIngredient {
        name: name.to_string(),
        category: category.to_string(),
        location: location.to_string(),
        quantity,
        unit: unit.to_string(),
        expiry_date,
    };

    vec![
        demo("Chicken Breast", "Meat", "Fridge", 2.0, "kg", expires(11, 5)),
        demo("Lettuce", "Vegetables", "Fridge", 1.0, "pcs", expires(11, 4)),
        demo("Tomato", "Vegetables", "Fridge", 5.0, "pcs", expires(11, 4)),
        demo("Olive Oil", "Oil", "Pantry", 1.0, "liter", None),
        demo("Banana", "Fruits", "Fridge", 6.0, "pcs", expires(11, 2)),
        demo("Strawberry", "Fruits", "Fridge", 200.0, "grams", expires(11, 1)),
    ]
}

/// The matcher's view of an inventory row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

impl Measured for InventoryItem {
    fn name(&self) -> &str {
        &self.name
    }

    fn quantity(&self) -> f64 {
        self.quantity
    }

    fn unit(&self) -> &str {
        &self.unit
    }
}

impl Measured for Ingredient {
    fn name(&self) -> &str {
        &self.name
    }

    fn quantity(&self) -> f64 {
        self.quantity
    }

    fn unit(&self) -> &str {
        &self.unit
    }
}
