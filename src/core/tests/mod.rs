
use crate::core::config::RestaurantConfig;
use crate::core::engine::Restaurant;
use crate::core::menu::Menu;
use crate::core::types::{DishId, StaffId, TableId};
use rust_decimal::Decimal;

pub(crate) fn money(units: i64, cents: u32) -> Decimal {
    Decimal::new(units * 100 + cents as i64, 2)
}

pub(crate) fn test_menu() -> Menu {
    let mut menu = Menu::new();
    menu.add_dish(DishId(1), "Feijoada", money(45, 90), "black bean stew").unwrap();
    menu.add_dish(DishId(2), "Pão de queijo", money(12, 0), "").unwrap();
    menu.add_dish(DishId(3), "Moqueca", money(58, 50), "fish stew").unwrap();
    menu
}

/// Tables [4, 2, 2, 6] as ids 1..=4, the given waiters, no cooks
pub(crate) fn restaurant_with(config: RestaurantConfig, waiters: &[&str]) -> Restaurant {
    let mut restaurant = Restaurant::new(config, test_menu());
    for name in waiters {
        restaurant.hire_waiter(name, money(1500, 0)).unwrap();
    }
    for (id, capacity) in [(1, 4), (2, 2), (3, 2), (4, 6)] {
        restaurant.add_table(TableId(id), capacity).unwrap();
    }
    restaurant
}

/// Starter layout with two waiters and one cook
pub(crate) fn starter() -> (Restaurant, StaffId) {
    let mut restaurant = restaurant_with(RestaurantConfig::default(), &["Carlos", "Beatriz"]);
    let cook = restaurant.hire_cook("Ana", money(1800, 0)).unwrap().id;
    (restaurant, cook)
}
