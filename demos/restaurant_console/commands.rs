use rbistro::core::config::DrainMode;
use rbistro::{DishId, PartyId, StaffId, TableId};
use rust_decimal::Decimal;

/// One operator command read from the console
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Arrive { size: u32 },
    Leave { party: PartyId },
    Order { table: TableId, dish: DishId, quantity: u32, note: String },
    Confirm { table: TableId },
    Ready { table: TableId },
    Deliver { table: TableId },
    Cancel { table: TableId },
    Finalize { table: TableId, gratuity: Option<Decimal> },
    Clean { table: TableId },
    AddTable { table: TableId, capacity: u32 },
    Resize { table: TableId, capacity: u32 },
    HireWaiter { name: String, pay: Decimal },
    HireCook { name: String, pay: Decimal },
    Dismiss { staff: StaffId },
    Drain { mode: DrainMode },
    Bill { table: TableId },
    Status,
    Menu,
    Report,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  arrive <size>                 party walks in
  leave <party>                 queued party gives up
  order <table> <dish> <qty> [note]
  confirm|ready|deliver|cancel <table>
  finalize <table> [gratuity]   close the bill, table becomes DIRTY
  clean <table>                 table becomes FREE, queue is drained
  add-table <id> <capacity>
  resize <table> <capacity>
  hire-waiter <name> <pay>
  hire-cook <name> <pay>
  dismiss <staff>
  drain [strict|greedy]
  bill <table> | status | menu | report | help | quit";

fn number<T: std::str::FromStr>(args: &[&str], index: usize, what: &str) -> Result<T, String> {
    let raw = args.get(index).ok_or_else(|| format!("missing {}", what))?;
    raw.parse().map_err(|_| format!("{} must be a number, got '{}'", what, raw))
}

fn money(args: &[&str], index: usize, what: &str) -> Result<Decimal, String> {
    let raw = args.get(index).ok_or_else(|| format!("missing {}", what))?;
    raw.parse::<Decimal>()
        .map_err(|_| format!("{} must be an amount, got '{}'", what, raw))
}

fn table(args: &[&str]) -> Result<TableId, String> {
    number(args, 0, "table").map(TableId)
}

pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match verb.to_ascii_lowercase().as_str() {
        "arrive" => Command::Arrive {
            size: number(&args, 0, "party size")?,
        },
        "leave" => Command::Leave {
            party: PartyId(number(&args, 0, "party")?),
        },
        "order" => Command::Order {
            table: table(&args)?,
            dish: DishId(number(&args, 1, "dish")?),
            quantity: number(&args, 2, "quantity")?,
            note: args.get(3..).map(|rest| rest.join(" ")).unwrap_or_default(),
        },
        "confirm" => Command::Confirm { table: table(&args)? },
        "ready" => Command::Ready { table: table(&args)? },
        "deliver" => Command::Deliver { table: table(&args)? },
        "cancel" => Command::Cancel { table: table(&args)? },
        "finalize" => Command::Finalize {
            table: table(&args)?,
            gratuity: match args.get(1) {
                Some(_) => Some(money(&args, 1, "gratuity")?),
                None => None,
            },
        },
        "clean" => Command::Clean { table: table(&args)? },
        "add-table" => Command::AddTable {
            table: table(&args)?,
            capacity: number(&args, 1, "capacity")?,
        },
        "resize" => Command::Resize {
            table: table(&args)?,
            capacity: number(&args, 1, "capacity")?,
        },
        "hire-waiter" | "hire-cook" => {
            let (name, pay) = match args.split_last() {
                Some((pay, name)) if !name.is_empty() => (name.join(" "), money(&[*pay], 0, "pay")?),
                _ => return Err(format!("usage: {} <name> <pay>", verb)),
            };
            if verb.eq_ignore_ascii_case("hire-waiter") {
                Command::HireWaiter { name, pay }
            } else {
                Command::HireCook { name, pay }
            }
        }
        "dismiss" => Command::Dismiss {
            staff: StaffId(number(&args, 0, "staff")?),
        },
        "drain" => Command::Drain {
            mode: match args.first().map(|mode| mode.to_ascii_lowercase()) {
                None => DrainMode::default(),
                Some(mode) if mode == "strict" => DrainMode::Strict,
                Some(mode) if mode == "greedy" => DrainMode::Greedy,
                Some(other) => return Err(format!("unknown drain mode '{}'", other)),
            },
        },
        "bill" => Command::Bill { table: table(&args)? },
        "status" => Command::Status,
        "menu" => Command::Menu,
        "report" => Command::Report,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_order_with_note() {
        let command = parse("order 2 1 3 no onions please").unwrap().unwrap();
        assert_eq!(
            command,
            Command::Order {
                table: TableId(2),
                dish: DishId(1),
                quantity: 3,
                note: "no onions please".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_hire_keeps_multiword_name() {
        let command = parse("hire-waiter Maria da Silva 1500.00").unwrap().unwrap();
        assert_eq!(
            command,
            Command::HireWaiter {
                name: "Maria da Silva".to_string(),
                pay: Decimal::new(150000, 2),
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse("arrive two").is_err());
        assert!(parse("finalize 1 lots").is_err());
        assert!(parse("drain sideways").is_err());
        assert!(parse("juggle").is_err());
        assert_eq!(parse("   ").unwrap(), None);
    }
}
