use crate::core::errors::{EngineError, EngineResult};
use crate::core::types::{BillId, OrderId, PartyId, TableId};
use rust_decimal::Decimal;

/// Financial aggregate of one seated party's visit
///
/// Open from seating until checkout, then closed for good. The total is always derived
/// from the orders, see `OrderLedger::bill_total`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bill {
    pub(crate) id: BillId,
    pub(crate) table: TableId,
    pub(crate) party: PartyId,
    pub(crate) orders: Vec<OrderId>,
    pub(crate) open: bool,
    pub(crate) gratuity: Option<Decimal>,
}

impl Bill {
    pub(crate) fn new(id: BillId, table: TableId, party: PartyId) -> Self {
        Self {
            id,
            table,
            party,
            orders: Vec::new(),
            open: true,
            gratuity: None,
        }
    }

    pub fn id(&self) -> BillId {
        self.id
    }

    pub fn table(&self) -> TableId {
        self.table
    }

    pub fn party(&self) -> PartyId {
        self.party
    }

    pub fn orders(&self) -> &[OrderId] {
        &self.orders
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Gratuity left at checkout, `None` while open
    pub fn gratuity(&self) -> Option<Decimal> {
        self.gratuity
    }

    pub(crate) fn add_order(&mut self, order: OrderId) -> EngineResult<()> {
        if !self.open {
            return Err(EngineError::Conflict(format!("{} is closed", self.id)));
        }
        self.orders.push(order);
        Ok(())
    }

    /// Close the bill; irreversible
    ///
    /// Orders that have not reached DELIVERED do not block closing.
    pub(crate) fn close(&mut self, gratuity: Decimal) -> EngineResult<()> {
        if !self.open {
            return Err(EngineError::Conflict(format!("{} is already closed", self.id)));
        }
        self.open = false;
        self.gratuity = Some(gratuity);
        Ok(())
    }
}
