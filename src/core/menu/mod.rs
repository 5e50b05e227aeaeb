//! Menu catalogue collaborator
//!
//! The engine only reads dishes through [`MenuLookup`]; [`Menu`] is the in-memory
//! catalogue the host manages.

use crate::core::errors::{EngineError, EngineResult};
use crate::core::types::DishId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    pub id: DishId,
    pub name: String,
    pub price: Decimal,
    pub description: String,
}

/// Read-only dish lookup consumed by the engine
pub trait MenuLookup {
    fn find_dish(&self, id: DishId) -> Option<Dish>;
}

/// In-memory menu catalogue
#[derive(Debug, Clone, Default)]
pub struct Menu {
    dishes: BTreeMap<DishId, Dish>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    fn validate(name: &str, price: Decimal) -> EngineResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::Invalid("dish name cannot be empty".to_string()));
        }
        if price < Decimal::ZERO {
            return Err(EngineError::Invalid(format!("dish price cannot be negative, got {}", price)));
        }
        Ok(name.to_string())
    }

    pub fn add_dish(&mut self, id: DishId, name: &str, price: Decimal, description: &str) -> EngineResult<&Dish> {
        if id.0 == 0 {
            return Err(EngineError::Invalid("dish id must be positive".to_string()));
        }
        let name = Self::validate(name, price)?;
        if self.dishes.contains_key(&id) {
            return Err(EngineError::Conflict(format!("{} already exists", id)));
        }
        let dish = Dish {
            id,
            name,
            price,
            description: description.trim().to_string(),
        };
        Ok(self.dishes.entry(id).or_insert(dish))
    }

    pub fn update_dish(&mut self, id: DishId, name: &str, price: Decimal) -> EngineResult<&Dish> {
        let name = Self::validate(name, price)?;
        let dish = self
            .dishes
            .get_mut(&id)
            .ok_or_else(|| EngineError::NotFound(format!("{} is not on the menu", id)))?;
        dish.name = name;
        dish.price = price;
        Ok(dish)
    }

    pub fn remove_dish(&mut self, id: DishId) -> EngineResult<Dish> {
        self.dishes
            .remove(&id)
            .ok_or_else(|| EngineError::NotFound(format!("{} is not on the menu", id)))
    }

    /// Dishes sorted by id
    pub fn dishes(&self) -> Vec<&Dish> {
        self.dishes.values().collect()
    }

    pub fn len(&self) -> usize {
        self.dishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }
}

impl MenuLookup for Menu {
    fn find_dish(&self, id: DishId) -> Option<Dish> {
        self.dishes.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_find() {
        let mut menu = Menu::new();
        menu.add_dish(DishId(1), " Feijoada ", Decimal::new(4590, 2), "black bean stew").unwrap();
        let dish = menu.find_dish(DishId(1)).unwrap();
        assert_eq!(dish.name, "Feijoada");
        assert_eq!(dish.price, Decimal::new(4590, 2));
        assert!(menu.find_dish(DishId(2)).is_none());
    }

    #[test]
    fn test_add_validation() {
        let mut menu = Menu::new();
        menu.add_dish(DishId(1), "Water", Decimal::ZERO, "").unwrap();
        assert!(matches!(menu.add_dish(DishId(1), "Soda", Decimal::ONE, ""), Err(EngineError::Conflict(_))));
        assert!(matches!(menu.add_dish(DishId(2), "", Decimal::ONE, ""), Err(EngineError::Invalid(_))));
        assert!(matches!(menu.add_dish(DishId(3), "Tea", Decimal::new(-1, 0), ""), Err(EngineError::Invalid(_))));
        assert!(matches!(menu.add_dish(DishId(0), "Tea", Decimal::ONE, ""), Err(EngineError::Invalid(_))));
        assert_eq!(menu.len(), 1);
    }

    #[test]
    fn test_update_and_remove() {
        let mut menu = Menu::new();
        menu.add_dish(DishId(4), "Pudim", Decimal::new(12, 0), "").unwrap();
        menu.update_dish(DishId(4), "Pudim de Leite", Decimal::new(14, 0)).unwrap();
        assert_eq!(menu.find_dish(DishId(4)).unwrap().price, Decimal::new(14, 0));
        assert!(matches!(menu.update_dish(DishId(5), "X", Decimal::ONE), Err(EngineError::NotFound(_))));

        menu.remove_dish(DishId(4)).unwrap();
        assert!(menu.is_empty());
        assert!(matches!(menu.remove_dish(DishId(4)), Err(EngineError::NotFound(_))));
    }
}
