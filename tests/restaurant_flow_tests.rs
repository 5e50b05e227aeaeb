use rbistro::core::records::TableRecord;
use rbistro::core::store::Persistence;
use rbistro::core::tables::TableStatus;
use rbistro::{
    Arrival, DishId, DrainMode, EngineError, ErrorKind, Failure, Menu, Restaurant, RestaurantConfig, TableId,
};
use rust_decimal::Decimal;

fn money(units: i64) -> Decimal {
    Decimal::new(units, 0)
}

/// Opening layout of a small bistro
fn open_bistro(config: RestaurantConfig) -> Restaurant {
    let mut menu = Menu::new();
    menu.add_dish(DishId(1), "Bacalhau", Decimal::new(3850, 2), "salt cod").unwrap();
    menu.add_dish(DishId(2), "Caldo verde", Decimal::new(900, 2), "kale soup").unwrap();
    menu.add_dish(DishId(3), "Pastel de nata", Decimal::new(350, 2), "").unwrap();

    let mut restaurant = Restaurant::new(config, menu).with_persistence(Persistence::in_memory());
    restaurant.hire_waiter("Carlos", money(1500)).unwrap();
    restaurant.hire_waiter("Beatriz", money(1500)).unwrap();
    restaurant.hire_cook("Ana", money(1800)).unwrap();
    for (id, capacity) in [(1, 4), (2, 2), (3, 2), (4, 6)] {
        restaurant.add_table(TableId(id), capacity).unwrap();
    }
    restaurant
}

#[test]
fn test_evening_service() {
    let mut restaurant = open_bistro(RestaurantConfig::default());

    let arrivals: Vec<Arrival> = [2, 5, 4, 2, 3].iter().map(|size| restaurant.arrive(*size).unwrap()).collect();
    let tables: Vec<Option<TableId>> = arrivals.iter().map(|a| a.seating().map(|s| s.table)).collect();
    assert_eq!(
        tables,
        vec![Some(TableId(2)), Some(TableId(4)), Some(TableId(1)), Some(TableId(3)), None]
    );

    // table 4 orders two rounds
    restaurant.place_order(TableId(4), DishId(1), 3).unwrap();
    restaurant.place_order(TableId(4), DishId(2), 2).unwrap();
    restaurant.confirm(TableId(4)).unwrap();
    restaurant.ready(TableId(4)).unwrap();
    restaurant.deliver(TableId(4)).unwrap();
    restaurant.place_order(TableId(4), DishId(3), 5).unwrap();
    restaurant.confirm(TableId(4)).unwrap();
    restaurant.ready(TableId(4)).unwrap();
    restaurant.deliver(TableId(4)).unwrap();

    let bill = restaurant.bill_for(TableId(4)).unwrap();
    assert_eq!(bill.orders.len(), 2);
    assert_eq!(bill.total, Decimal::new(15100, 2));

    let checkout = restaurant.finalize(TableId(4), Some(money(15))).unwrap();
    assert_eq!(checkout.suggested_gratuity, Decimal::new(1510, 2));

    // the queued party of three waits for a table of at least three
    let cleaning = restaurant.clean(TableId(4)).unwrap();
    assert_eq!(cleaning.seated.len(), 1);
    assert_eq!(cleaning.seated[0].party, arrivals[4].party());
    assert!(restaurant.queue().is_empty());

    assert_eq!(restaurant.most_ordered_dish().unwrap().dish, DishId(3));
    let top = &restaurant.waiter_report()[0];
    assert_eq!(top.gratuity, money(15));
    assert_eq!(top.tables_served, 1);
    restaurant.validate_consistency().unwrap();
}

#[test]
fn test_greedy_auto_drain_skips_large_party() {
    let config = RestaurantConfig::default().with_auto_drain(Some(DrainMode::Greedy));
    let mut restaurant = open_bistro(config);
    for size in [2, 5, 4, 2] {
        restaurant.arrive(size).unwrap();
    }
    let large = restaurant.arrive(6).unwrap().party();
    let pair = restaurant.arrive(2).unwrap().party();

    restaurant.finalize(TableId(3), None).unwrap();
    let cleaning = restaurant.clean(TableId(3)).unwrap();
    assert_eq!(cleaning.seated.len(), 1);
    assert_eq!(cleaning.seated[0].party, pair);
    assert_eq!(restaurant.queue()[0].party, large);
}

#[test]
fn test_persisted_tables_follow_the_engine() {
    let mut restaurant = open_bistro(RestaurantConfig::default());
    restaurant.arrive(2).unwrap();
    restaurant.finalize(TableId(2), None).unwrap();

    let stored: Vec<TableRecord> = restaurant.persistence().unwrap().tables.get_all();
    let dirty = stored.iter().find(|t| t.id == TableId(2)).unwrap();
    assert_eq!(dirty.status, TableStatus::Dirty);
    assert_eq!(dirty.occupant, None);
    assert_eq!(stored, restaurant.tables());
}

#[test]
fn test_records_serialize_for_presentation() {
    let mut restaurant = open_bistro(RestaurantConfig::default());
    let arrival = restaurant.arrive(2).unwrap();

    let json = serde_json::to_value(&arrival).unwrap();
    assert_eq!(json["outcome"], "seated");
    assert_eq!(json["table"], 2);

    restaurant.place_order(TableId(2), DishId(2), 1).unwrap();
    let bill = serde_json::to_value(restaurant.bill_for(TableId(2)).unwrap()).unwrap();
    assert_eq!(bill["total"], "9.00");

    let err: EngineError = restaurant.deliver(TableId(2)).unwrap_err();
    let failure = serde_json::to_value(Failure::from(err)).unwrap();
    assert_eq!(failure["kind"], "invalid_state");
}

#[test]
fn test_rejected_commands_change_nothing() {
    let mut restaurant = open_bistro(RestaurantConfig::default());
    let before = restaurant.tables();

    assert_eq!(restaurant.add_table(TableId(0), 4).unwrap_err().kind(), ErrorKind::Invalid);
    assert_eq!(restaurant.add_table(TableId(5), 0).unwrap_err().kind(), ErrorKind::Invalid);
    assert_eq!(restaurant.clean(TableId(1)).unwrap_err().kind(), ErrorKind::InvalidState);
    assert_eq!(restaurant.finalize(TableId(7), None).unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(restaurant.hire_waiter("Duarte", money(-1)).unwrap_err().kind(), ErrorKind::Invalid);

    assert_eq!(restaurant.tables(), before);
    assert_eq!(restaurant.staff().len(), 3);
}
