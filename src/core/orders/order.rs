use crate::core::errors::{EngineError, EngineResult};
use crate::core::menu::Dish;
use crate::core::types::{BillId, DishId, OrderId, StaffId, TableId};
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Preparation lifecycle of an order
///
/// Forward path: OPEN -> CONFIRMED -> IN_PREPARATION -> READY -> DELIVERED, one step at a
/// time. CANCELLED is reachable from OPEN or CONFIRMED only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Open,
    Confirmed,
    InPreparation,
    Ready,
    Delivered,
    Cancelled,
}

/// One dish line of an order
///
/// Name and unit price are copied from the menu when the line is added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub dish: DishId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub note: Option<String>,
}

impl LineItem {
    pub fn new(dish: &Dish, quantity: u32) -> EngineResult<Self> {
        if quantity == 0 {
            return Err(EngineError::Invalid("quantity must be positive".to_string()));
        }
        Ok(Self {
            dish: dish.id,
            name: dish.name.clone(),
            unit_price: dish.price,
            quantity,
            note: None,
        })
    }

    /// Attach a kitchen note, ignored when blank
    pub fn with_note(mut self, note: &str) -> Self {
        let note = note.trim();
        self.note = (!note.is_empty()).then(|| note.to_string());
        self
    }

    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A ticket of line items for one table visit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub(crate) id: OrderId,
    pub(crate) table: TableId,
    pub(crate) bill: BillId,
    pub(crate) lines: Vec<LineItem>,
    pub(crate) status: OrderStatus,
    pub(crate) cook: Option<StaffId>,
}

impl Order {
    pub(crate) fn new(id: OrderId, table: TableId, bill: BillId) -> Self {
        Self {
            id,
            table,
            bill,
            lines: Vec::new(),
            status: OrderStatus::Open,
            cook: None,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn table(&self) -> TableId {
        self.table
    }

    pub fn bill(&self) -> BillId {
        self.bill
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Cook that prepared or is preparing the order
    pub fn cook(&self) -> Option<StaffId> {
        self.cook
    }

    /// Sum of price x quantity over all lines
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(LineItem::subtotal).sum()
    }

    fn advance(&mut self, from: OrderStatus, to: OrderStatus) -> EngineResult<()> {
        if self.status != from {
            return Err(EngineError::InvalidState(format!(
                "{} is {:?}, expected {:?} before moving to {:?}",
                self.id, self.status, from, to
            )));
        }
        debug!("[Order] {} {:?} -> {:?}", self.id, from, to);
        self.status = to;
        Ok(())
    }

    pub fn add_line_item(&mut self, item: LineItem) -> EngineResult<()> {
        if self.status != OrderStatus::Open {
            return Err(EngineError::InvalidState(format!(
                "{} is {:?}, items can only be added while OPEN",
                self.id, self.status
            )));
        }
        self.lines.push(item);
        Ok(())
    }

    /// OPEN -> CONFIRMED, requires at least one line
    pub fn confirm(&mut self) -> EngineResult<()> {
        if self.status == OrderStatus::Open && self.lines.is_empty() {
            return Err(EngineError::InvalidState(format!("{} has no items to confirm", self.id)));
        }
        self.advance(OrderStatus::Open, OrderStatus::Confirmed)
    }

    /// CONFIRMED -> IN_PREPARATION under `cook`
    pub fn start_preparation(&mut self, cook: StaffId) -> EngineResult<()> {
        self.advance(OrderStatus::Confirmed, OrderStatus::InPreparation)?;
        self.cook = Some(cook);
        Ok(())
    }

    /// IN_PREPARATION -> READY
    pub fn finish_preparation(&mut self) -> EngineResult<()> {
        self.advance(OrderStatus::InPreparation, OrderStatus::Ready)
    }

    /// READY -> DELIVERED
    pub fn deliver(&mut self) -> EngineResult<()> {
        self.advance(OrderStatus::Ready, OrderStatus::Delivered)
    }

    /// OPEN or CONFIRMED -> CANCELLED
    pub fn cancel(&mut self) -> EngineResult<()> {
        match self.status {
            OrderStatus::Open | OrderStatus::Confirmed => {
                debug!("[Order] {} {:?} -> Cancelled", self.id, self.status);
                self.status = OrderStatus::Cancelled;
                Ok(())
            }
            other => Err(EngineError::InvalidState(format!(
                "{} is {:?}, only OPEN or CONFIRMED orders can be cancelled",
                self.id, other
            ))),
        }
    }
}
