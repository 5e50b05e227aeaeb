//! Plain data records exchanged with collaborators
//!
//! Operations return these instead of references into the engine, so neither the
//! presentation layer nor a persistence store can mutate live state.

use crate::core::orders::{Bill, LineItem, Order, OrderStatus};
use crate::core::party::{Party, PartyStatus};
use crate::core::queue::QueueEntry;
use crate::core::staff::{Duty, Role, StaffMember};
use crate::core::tables::{Table, TableStatus};
use crate::core::types::{BillId, OrderId, PartyId, StaffId, TableId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyRecord {
    pub id: PartyId,
    pub size: u32,
    pub status: PartyStatus,
}

impl From<&Party> for PartyRecord {
    fn from(party: &Party) -> Self {
        Self {
            id: party.id(),
            size: party.size(),
            status: party.status(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    pub id: TableId,
    pub capacity: u32,
    pub status: TableStatus,
    pub occupant: Option<PartyId>,
    pub bill: Option<BillId>,
    pub waiter: Option<StaffId>,
}

impl From<&Table> for TableRecord {
    fn from(table: &Table) -> Self {
        Self {
            id: table.id(),
            capacity: table.capacity(),
            status: table.status(),
            occupant: table.occupant(),
            bill: table.bill(),
            waiter: table.waiter(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffRecord {
    pub id: StaffId,
    pub name: String,
    pub role: Role,
    pub base_pay: Decimal,
    /// Tables held (waiter) or orders in preparation (cook)
    pub load: usize,
    pub tables: Vec<TableId>,
    pub orders: Vec<OrderId>,
    pub gratuity: Decimal,
    pub tables_served: u32,
    pub orders_completed: u32,
    pub pay: Decimal,
}

impl From<&StaffMember> for StaffRecord {
    fn from(member: &StaffMember) -> Self {
        let (tables_served, orders_completed) = match member.duty() {
            Duty::Waiter(duty) => (duty.tables_served, 0),
            Duty::Cook(duty) => (0, duty.orders_completed),
        };
        Self {
            id: member.id(),
            name: member.name().to_string(),
            role: member.role(),
            base_pay: member.base_pay(),
            load: member.load(),
            tables: member.tables(),
            orders: member.orders(),
            gratuity: member.gratuity(),
            tables_served,
            orders_completed,
            pay: member.pay(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub table: TableId,
    pub bill: BillId,
    pub status: OrderStatus,
    pub cook: Option<StaffId>,
    pub lines: Vec<LineItem>,
    pub subtotal: Decimal,
}

impl From<&Order> for OrderRecord {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id(),
            table: order.table(),
            bill: order.bill(),
            status: order.status(),
            cook: order.cook(),
            lines: order.lines().to_vec(),
            subtotal: order.subtotal(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillRecord {
    pub id: BillId,
    pub table: TableId,
    pub party: PartyId,
    pub orders: Vec<OrderId>,
    pub open: bool,
    /// Derived from the orders at the time the record was taken
    pub total: Decimal,
    pub gratuity: Option<Decimal>,
}

impl BillRecord {
    pub fn new(bill: &Bill, total: Decimal) -> Self {
        Self {
            id: bill.id(),
            table: bill.table(),
            party: bill.party(),
            orders: bill.orders().to_vec(),
            open: bill.is_open(),
            total,
            gratuity: bill.gratuity(),
        }
    }
}

/// Wait queue membership
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueRecord {
    pub party: PartyId,
    pub size: u32,
    /// Arrival ticket; ordering by ticket gives queue order
    pub ticket: u64,
}

impl From<&QueueEntry> for QueueRecord {
    fn from(entry: &QueueEntry) -> Self {
        Self {
            party: entry.party,
            size: entry.size,
            ticket: entry.ticket,
        }
    }
}

/// A party placed at a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seating {
    pub party: PartyId,
    pub party_size: u32,
    pub table: TableId,
    pub table_capacity: u32,
    pub waiter: StaffId,
    pub bill: BillId,
}

/// Outcome of an arrival
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Arrival {
    Seated(Seating),
    Queued {
        party: PartyId,
        party_size: u32,
        /// One-based place in line
        position: usize,
    },
}

impl Arrival {
    pub fn party(&self) -> PartyId {
        match self {
            Arrival::Seated(seating) => seating.party,
            Arrival::Queued { party, .. } => *party,
        }
    }

    pub fn seating(&self) -> Option<&Seating> {
        match self {
            Arrival::Seated(seating) => Some(seating),
            Arrival::Queued { .. } => None,
        }
    }
}

/// Outcome of confirming an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispatch {
    pub order: OrderRecord,
    /// Cook now preparing it; `None` means the order waits in the kitchen backlog
    pub cook: Option<StaffId>,
}

/// Outcome of closing a visit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkout {
    pub bill: BillRecord,
    pub total: Decimal,
    pub gratuity: Decimal,
    pub suggested_gratuity: Decimal,
    pub waiter: Option<StaffId>,
    pub party: PartyId,
}

/// Outcome of cleaning a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cleaning {
    pub table: TableRecord,
    /// Parties seated by the follow-up queue pass
    pub seated: Vec<Seating>,
}

/// Outcome of registering a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableAdded {
    pub table: TableRecord,
    pub seated: Vec<Seating>,
}
