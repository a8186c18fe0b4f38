//! Shopping lists and their items

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_quantity() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<ShoppingItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: i64,
    pub shopping_list_id: i64,
    pub item_name: String,
    pub quantity: f64,
    pub unit: String,
    pub is_purchased: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewShoppingList {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewShoppingItem {
    pub item_name: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    pub unit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItemUpdate {
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub is_purchased: Option<bool>,
}

impl ShoppingList {
    pub fn new(id: i64, owner_id: i64, new: NewShoppingList, now: DateTime<Utc>) -> Self {
        Self {
            id,
            owner_id,
            name: new.name,
            created_at: now,
            items: Vec::new(),
        }
    }

    pub fn add_item(
        &mut self,
        id: i64,
        new: NewShoppingItem,
        now: DateTime<Utc>,
    ) -> &mut ShoppingItem {
        self.items.push(ShoppingItem {
            id,
            shopping_list_id: self.id,
            item_name: new.item_name,
            quantity: new.quantity,
            unit: new.unit,
            is_purchased: false,
            created_at: now,
        });
        let last = self.items.len() - 1;
        &mut self.items[last]
    }

    pub fn item_mut(&mut self, item_id: i64) -> Option<&mut ShoppingItem> {
        self.items.iter_mut().find(|item| item.id == item_id)
    }

    /// Remove an item, returning it if it was on this list.
    pub fn remove_item(&mut self, item_id: i64) -> Option<ShoppingItem> {
        let position = self.items.iter().position(|item| item.id == item_id)?;
        Some(self.items.remove(position))
    }

    /// Drop every purchased item. Returns how many were removed.
    pub fn clear_purchased(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !item.is_purchased);
        before - self.items.len()
    }
}

/// A list offered as demo data, with each item's purchased flag.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleShoppingList {
    pub list: NewShoppingList,
    pub items: Vec<(NewShoppingItem, bool)>,
}

pub fn sample_shopping_lists() -> Vec<SampleShoppingList> {
    let item = |item_name: &str, quantity: f64, unit: &str, is_purchased: bool| {
        (
            NewShoppingItem {
                item_name: item_name.to_string(),
                quantity,
                unit: unit.to_string(),
            },
            is_purchased,
        )
    };

    vec![SampleShoppingList {
        list: NewShoppingList {
            name: "Weekly Groceries".to_string(),
        },
        items: vec![
            item("Milk", 1.0, "liter", false),
            item("Eggs", 12.0, "pcs", false),
            item("Bread", 1.0, "loaf", true),
        ],
    }]
}

impl ShoppingItem {
    pub fn apply(&mut self, update: ShoppingItemUpdate) {
        if let Some(item_name) = update.item_name {
            self.item_name = item_name;
        }
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        if let Some(unit) = update.unit {
            self.unit = unit;
        }
        if let Some(is_purchased) = update.is_purchased {
            self.is_purchased = is_purchased;
        }
    }
}
