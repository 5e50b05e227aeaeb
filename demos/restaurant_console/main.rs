use rbistro::core::records::{Arrival, Seating};
use rbistro::{DishId, EngineResult, Failure, Menu, Restaurant, RestaurantConfig, TableId};
use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};

mod commands;

use commands::{parse, Command, HELP};

/// Opening layout: four tables, two waiters, one cook and a short menu
fn starter_restaurant() -> EngineResult<Restaurant> {
    let mut menu = Menu::new();
    menu.add_dish(DishId(1), "Feijoada", Decimal::new(4590, 2), "black bean stew with pork")?;
    menu.add_dish(DishId(2), "Moqueca", Decimal::new(5850, 2), "fish stew with coconut milk")?;
    menu.add_dish(DishId(3), "Pão de queijo", Decimal::new(1200, 2), "cheese bread, six pieces")?;
    menu.add_dish(DishId(4), "Brigadeiro", Decimal::new(800, 2), "chocolate truffle")?;
    menu.add_dish(DishId(5), "Guaraná", Decimal::new(650, 2), "")?;

    let mut restaurant = Restaurant::new(RestaurantConfig::default(), menu);
    restaurant.hire_waiter("Carlos", Decimal::new(1500, 0))?;
    restaurant.hire_waiter("Beatriz", Decimal::new(1500, 0))?;
    restaurant.hire_cook("Ana", Decimal::new(1800, 0))?;
    for (id, capacity) in [(1, 4), (2, 2), (3, 2), (4, 6)] {
        restaurant.add_table(TableId(id), capacity)?;
    }
    Ok(restaurant)
}

fn print_seating(seating: &Seating) {
    println!(
        "{} ({} guests) seated at {} (capacity {}), waiter {}, {}",
        seating.party, seating.party_size, seating.table, seating.table_capacity, seating.waiter, seating.bill
    );
}

fn print_status(restaurant: &Restaurant) {
    println!("Tables:");
    for table in restaurant.tables() {
        let occupant = table.occupant.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string());
        let waiter = table.waiter.map(|w| w.to_string()).unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<9} cap {:<2} {:<9} party {:<9} waiter {}",
            table.id.to_string(),
            table.capacity,
            format!("{:?}", table.status),
            occupant,
            waiter
        );
    }
    println!("Queue:");
    for (position, entry) in restaurant.queue().iter().enumerate() {
        println!("  {}. {} ({} guests)", position + 1, entry.party, entry.size);
    }
    println!("Staff:");
    for member in restaurant.staff() {
        println!(
            "  {:<10} {:<10} {:<7} load {} gratuity {}",
            member.id.to_string(),
            member.name,
            format!("{:?}", member.role),
            member.load,
            member.gratuity
        );
    }
    let backlog = restaurant.kitchen().backlog();
    if !backlog.is_empty() {
        println!("Kitchen backlog: {:?}", backlog);
    }
}

fn print_report(restaurant: &Restaurant) {
    println!("Dish popularity:");
    for entry in restaurant.dish_popularity() {
        println!("  {:<16} {}", entry.name, entry.quantity);
    }
    println!("Waiters:");
    for entry in restaurant.waiter_report() {
        println!(
            "  {:<10} served {} gratuity {} (avg {})",
            entry.name, entry.tables_served, entry.gratuity, entry.average_gratuity
        );
    }
    println!("Payroll:");
    for line in restaurant.payroll() {
        println!("  {:<10} {:?} {}", line.name, line.role, line.total);
    }
}

/// Run one command; `Ok(false)` ends the session
fn execute(restaurant: &mut Restaurant, command: Command) -> EngineResult<bool> {
    match command {
        Command::Arrive { size } => match restaurant.arrive(size)? {
            Arrival::Seated(seating) => print_seating(&seating),
            Arrival::Queued { party, position, .. } => {
                println!("{} queued at position {}", party, position)
            }
        },
        Command::Leave { party } => {
            restaurant.leave_queue(party)?;
            println!("{} left the queue", party);
        }
        Command::Order {
            table,
            dish,
            quantity,
            note,
        } => {
            let order = restaurant.place_order_with_note(table, dish, quantity, &note)?;
            println!("{} now has {} line(s), subtotal {}", order.id, order.lines.len(), order.subtotal);
        }
        Command::Confirm { table } => {
            let dispatch = restaurant.confirm(table)?;
            match dispatch.cook {
                Some(cook) => println!("{} confirmed, {} is preparing it", dispatch.order.id, cook),
                None => println!("{} confirmed, waiting for a cook", dispatch.order.id),
            }
        }
        Command::Ready { table } => println!("{} is ready", restaurant.ready(table)?.id),
        Command::Deliver { table } => println!("{} delivered", restaurant.deliver(table)?.id),
        Command::Cancel { table } => println!("{} cancelled", restaurant.cancel(table)?.id),
        Command::Finalize { table, gratuity } => {
            let checkout = restaurant.finalize(table, gratuity)?;
            println!(
                "{} closed: total {}, gratuity {} (suggested {})",
                checkout.bill.id, checkout.total, checkout.gratuity, checkout.suggested_gratuity
            );
        }
        Command::Clean { table } => {
            let cleaning = restaurant.clean(table)?;
            println!("{} is clean", cleaning.table.id);
            cleaning.seated.iter().for_each(print_seating);
        }
        Command::AddTable { table, capacity } => {
            let added = restaurant.add_table(table, capacity)?;
            println!("{} added with capacity {}", added.table.id, added.table.capacity);
            added.seated.iter().for_each(print_seating);
        }
        Command::Resize { table, capacity } => {
            let record = restaurant.resize_table(table, capacity)?;
            println!("{} now seats {}", record.id, record.capacity);
        }
        Command::HireWaiter { name, pay } => {
            let member = restaurant.hire_waiter(&name, pay)?;
            println!("hired waiter {} as {}", member.name, member.id);
        }
        Command::HireCook { name, pay } => {
            let member = restaurant.hire_cook(&name, pay)?;
            println!("hired cook {} as {}", member.name, member.id);
        }
        Command::Dismiss { staff } => {
            let member = restaurant.dismiss(staff)?;
            println!("{} ({}) dismissed, owed {}", member.name, member.id, member.pay);
        }
        Command::Drain { mode } => {
            let seated = restaurant.drain_queue(mode)?;
            if seated.is_empty() {
                println!("nobody could be seated");
            }
            seated.iter().for_each(print_seating);
        }
        Command::Bill { table } => {
            let bill = restaurant.bill_for(table)?;
            for id in &bill.orders {
                if let Some(order) = restaurant.ledger().order(*id) {
                    println!("  {} {:?}", id, order.status());
                    for line in order.lines() {
                        println!("    {} x{} @ {}", line.name, line.quantity, line.unit_price);
                    }
                }
            }
            println!("{} total {}", bill.id, bill.total);
        }
        Command::Status => print_status(restaurant),
        Command::Menu => {
            for dish in restaurant.menu().dishes() {
                println!("  {:<3} {:<16} {:>7}  {}", dish.id.0, dish.name, dish.price, dish.description);
            }
        }
        Command::Report => print_report(restaurant),
        Command::Help => println!("{}", HELP),
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .format_timestamp(None)
        .init();

    let mut restaurant = starter_restaurant()?;
    println!("rbistro console, type 'help' for commands");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    print!("> ");
    stdout.flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        match parse(&line) {
            Ok(Some(command)) => match execute(&mut restaurant, command) {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => {
                    let failure = Failure::from(err);
                    println!("error [{:?}]: {}", failure.kind, failure.detail);
                }
            },
            Ok(None) => {}
            Err(message) => println!("error: {}", message),
        }
        print!("> ");
        stdout.flush()?;
    }
    Ok(())
}
