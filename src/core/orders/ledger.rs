use crate::core::errors::{EngineError, EngineResult};
use crate::core::identity::IdAllocator;
use crate::core::orders::bill::Bill;
use crate::core::orders::order::{Order, OrderStatus};
use crate::core::types::{BillId, OrderId, PartyId, TableId};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Arena of every order and bill, kept for history and statistics
#[derive(Debug, Default)]
pub struct OrderLedger {
    orders: BTreeMap<OrderId, Order>,
    bills: BTreeMap<BillId, Bill>,
    order_ids: IdAllocator,
    bill_ids: IdAllocator,
}

impl OrderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a bill for a party just seated at `table`
    pub fn open_bill(&mut self, table: TableId, party: PartyId) -> &Bill {
        let id = BillId(self.bill_ids.allocate());
        self.bills.entry(id).or_insert(Bill::new(id, table, party))
    }

    pub fn bill(&self, id: BillId) -> Option<&Bill> {
        self.bills.get(&id)
    }

    pub fn require_bill(&self, id: BillId) -> EngineResult<&Bill> {
        self.bills
            .get(&id)
            .ok_or_else(|| EngineError::internal(format!("{} is referenced but missing", id)))
    }

    fn require_bill_mut(&mut self, id: BillId) -> EngineResult<&mut Bill> {
        self.bills
            .get_mut(&id)
            .ok_or_else(|| EngineError::internal(format!("{} is referenced but missing", id)))
    }

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    pub fn require_order(&self, id: OrderId) -> EngineResult<&Order> {
        self.orders
            .get(&id)
            .ok_or_else(|| EngineError::NotFound(format!("{} does not exist", id)))
    }

    pub(crate) fn order_mut(&mut self, id: OrderId) -> EngineResult<&mut Order> {
        self.orders
            .get_mut(&id)
            .ok_or_else(|| EngineError::NotFound(format!("{} does not exist", id)))
    }

    /// The bill's OPEN order, created and appended to the bill if there is none
    pub fn open_order(&mut self, bill: BillId) -> EngineResult<OrderId> {
        if let Some(existing) = self.latest_with_status(bill, OrderStatus::Open)? {
            return Ok(existing);
        }

        let (table, open) = {
            let bill = self.require_bill(bill)?;
            (bill.table, bill.open)
        };
        if !open {
            return Err(EngineError::Conflict(format!("{} is closed", bill)));
        }
        let id = OrderId(self.order_ids.allocate());
        self.require_bill_mut(bill)?.add_order(id)?;
        self.orders.insert(id, Order::new(id, table, bill));
        Ok(id)
    }

    /// Newest order on the bill currently in `status`
    pub fn latest_with_status(&self, bill: BillId, status: OrderStatus) -> EngineResult<Option<OrderId>> {
        self.latest_where(bill, |current| current == status)
    }

    /// Newest order on the bill whose status satisfies `accept`
    pub fn latest_where(
        &self,
        bill: BillId,
        accept: impl Fn(OrderStatus) -> bool,
    ) -> EngineResult<Option<OrderId>> {
        let bill = self.require_bill(bill)?;
        for id in bill.orders.iter().rev() {
            let order = self
                .orders
                .get(id)
                .ok_or_else(|| EngineError::internal(format!("{} lists missing {}", bill.id, id)))?;
            if accept(order.status) {
                return Ok(Some(*id));
            }
        }
        Ok(None)
    }

    /// Sum of all non-cancelled order subtotals on the bill
    pub fn bill_total(&self, bill: BillId) -> EngineResult<Decimal> {
        let bill = self.require_bill(bill)?;
        let mut total = Decimal::ZERO;
        for id in &bill.orders {
            let order = self
                .orders
                .get(id)
                .ok_or_else(|| EngineError::internal(format!("{} lists missing {}", bill.id, id)))?;
            if order.status != OrderStatus::Cancelled {
                total += order.subtotal();
            }
        }
        Ok(total)
    }

    pub(crate) fn close_bill(&mut self, bill: BillId, gratuity: Decimal) -> EngineResult<()> {
        self.require_bill_mut(bill)?.close(gratuity)
    }

    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }

    pub fn bills(&self) -> impl Iterator<Item = &Bill> {
        self.bills.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::menu::Dish;
    use crate::core::orders::order::LineItem;
    use crate::core::types::DishId;

    fn dish(cents: i64) -> Dish {
        Dish {
            id: DishId(1),
            name: "Moqueca".to_string(),
            price: Decimal::new(cents, 2),
            description: String::new(),
        }
    }

    #[test]
    fn test_open_order_is_reused_until_confirmed() {
        let mut ledger = OrderLedger::new();
        let bill = ledger.open_bill(TableId(1), PartyId(1)).id();

        let first = ledger.open_order(bill).unwrap();
        assert_eq!(ledger.open_order(bill).unwrap(), first);

        let order = ledger.order_mut(first).unwrap();
        order.add_line_item(LineItem::new(&dish(1000), 1).unwrap()).unwrap();
        order.confirm().unwrap();

        let second = ledger.open_order(bill).unwrap();
        assert_ne!(second, first);
        assert_eq!(ledger.bill(bill).unwrap().orders(), &[first, second]);
    }

    #[test]
    fn test_total_sums_orders_and_skips_cancelled() {
        let mut ledger = OrderLedger::new();
        let bill = ledger.open_bill(TableId(1), PartyId(1)).id();

        let kept = ledger.open_order(bill).unwrap();
        ledger.order_mut(kept).unwrap().add_line_item(LineItem::new(&dish(1500), 2).unwrap()).unwrap();
        ledger.order_mut(kept).unwrap().confirm().unwrap();

        let dropped = ledger.open_order(bill).unwrap();
        ledger.order_mut(dropped).unwrap().add_line_item(LineItem::new(&dish(900), 1).unwrap()).unwrap();
        assert_eq!(ledger.bill_total(bill).unwrap(), Decimal::new(3900, 2));

        ledger.order_mut(dropped).unwrap().cancel().unwrap();
        assert_eq!(ledger.bill_total(bill).unwrap(), Decimal::new(3000, 2));
    }

    #[test]
    fn test_closed_bill_gets_no_new_orders() {
        let mut ledger = OrderLedger::new();
        let bill = ledger.open_bill(TableId(1), PartyId(1)).id();
        ledger.close_bill(bill, Decimal::ZERO).unwrap();
        assert!(matches!(ledger.open_order(bill), Err(EngineError::Conflict(_))));
        assert!(matches!(ledger.close_bill(bill, Decimal::ZERO), Err(EngineError::Conflict(_))));
    }
}
