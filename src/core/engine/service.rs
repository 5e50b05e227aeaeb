//! Orders, checkout and staffing

use super::{Kitchen, Restaurant};
use crate::core::errors::{EngineError, EngineResult};
use crate::core::menu::MenuLookup;
use crate::core::orders::{LineItem, OrderStatus};
use crate::core::records::{BillRecord, Checkout, Dispatch, OrderRecord, StaffRecord};
use crate::core::staff::Role;
use crate::core::types::{DishId, OrderId, StaffId, TableId};
use log::{debug, info, warn};
use rust_decimal::Decimal;

impl<M: MenuLookup> Restaurant<M> {
    /// Add `quantity` of a dish to the table's OPEN order, opening one if needed
    pub fn place_order(&mut self, table: TableId, dish: DishId, quantity: u32) -> EngineResult<OrderRecord> {
        self.place_order_with_note(table, dish, quantity, "")
    }

    pub fn place_order_with_note(
        &mut self,
        table: TableId,
        dish: DishId,
        quantity: u32,
        note: &str,
    ) -> EngineResult<OrderRecord> {
        let dish = self
            .menu
            .find_dish(dish)
            .ok_or_else(|| EngineError::NotFound(format!("{} is not on the menu", dish)))?;
        let item = LineItem::new(&dish, quantity)?.with_note(note);
        let bill = self.open_bill_at(table)?;

        let order = self.ledger.open_order(bill)?;
        self.ledger.order_mut(order)?.add_line_item(item)?;
        self.mirror_order(order);
        self.mirror_bill(bill);
        info!("[Orders] {} x{} added to {} at {}", dish.name, quantity, order, table);
        Ok(OrderRecord::from(self.ledger.require_order(order)?))
    }

    /// Confirm the table's OPEN order and hand it to the kitchen
    pub fn confirm(&mut self, table: TableId) -> EngineResult<Dispatch> {
        let order = self.order_at(table, OrderStatus::Open)?;
        let cook = self.kitchen.confirm_and_assign(order, &mut self.ledger, &mut self.roster)?;
        self.mirror_order(order);
        if let Some(cook) = cook {
            self.mirror_staff(cook);
        }
        info!("[Orders] {} at {} confirmed", order, table);
        Ok(Dispatch {
            order: OrderRecord::from(self.ledger.require_order(order)?),
            cook,
        })
    }

    /// Put a CONFIRMED order under a chosen cook
    pub fn assign_cook(&mut self, order: OrderId, cook: StaffId) -> EngineResult<OrderRecord> {
        Kitchen::start(cook, order, &mut self.ledger, &mut self.roster)?;
        self.kitchen.withdraw(order);
        self.mirror_order(order);
        self.mirror_staff(cook);
        Ok(OrderRecord::from(self.ledger.require_order(order)?))
    }

    /// The kitchen finished the table's order in preparation
    pub fn ready(&mut self, table: TableId) -> EngineResult<OrderRecord> {
        let order = self.order_at(table, OrderStatus::InPreparation)?;
        let cook = Kitchen::finish(order, &mut self.ledger, &mut self.roster)?;
        self.mirror_order(order);
        self.mirror_staff(cook);
        self.dispatch_backlog()?;
        Ok(OrderRecord::from(self.ledger.require_order(order)?))
    }

    /// Serve the table's READY order
    pub fn deliver(&mut self, table: TableId) -> EngineResult<OrderRecord> {
        let order = self.order_at(table, OrderStatus::Ready)?;
        self.ledger.order_mut(order)?.deliver()?;
        self.mirror_order(order);
        info!("[Orders] {} delivered to {}", order, table);
        Ok(OrderRecord::from(self.ledger.require_order(order)?))
    }

    /// Cancel the table's newest OPEN or CONFIRMED order
    pub fn cancel(&mut self, table: TableId) -> EngineResult<OrderRecord> {
        let bill = self.open_bill_at(table)?;
        let order = self
            .ledger
            .latest_where(bill, |status| matches!(status, OrderStatus::Open | OrderStatus::Confirmed))?
            .ok_or_else(|| EngineError::InvalidState(format!("{} has no order that can be cancelled", table)))?;

        self.ledger.order_mut(order)?.cancel()?;
        self.kitchen.withdraw(order);
        self.mirror_order(order);
        self.mirror_bill(bill);
        info!("[Orders] {} at {} cancelled", order, table);
        Ok(OrderRecord::from(self.ledger.require_order(order)?))
    }

    /// Close the visit at `table`
    ///
    /// Closes the bill with the given gratuity (zero when omitted), releases the table to
    /// DIRTY and credits the waiter. The waiter keeps the table until it is cleaned.
    pub fn finalize(&mut self, table: TableId, gratuity: Option<Decimal>) -> EngineResult<Checkout> {
        let gratuity = gratuity.unwrap_or(Decimal::ZERO);
        if gratuity < Decimal::ZERO {
            return Err(EngineError::Invalid(format!("gratuity cannot be negative, got {}", gratuity)));
        }

        let bill = self.open_bill_at(table)?;
        let waiter = self.tables.require(table)?.waiter();
        if let Some(waiter) = waiter {
            if self.roster.require(waiter)?.role() != Role::Waiter {
                return Err(EngineError::internal(format!("{} is served by non-waiter {}", table, waiter)));
            }
        }
        let total = self.ledger.bill_total(bill)?;
        let pending = self
            .ledger
            .require_bill(bill)?
            .orders()
            .iter()
            .filter_map(|id| self.ledger.order(*id))
            .filter(|order| !matches!(order.status(), OrderStatus::Delivered | OrderStatus::Cancelled))
            .count();
        if pending > 0 {
            warn!("[Checkout] {} closes with {} order(s) not delivered", bill, pending);
        }

        self.ledger.close_bill(bill, gratuity)?;
        let vacated = self.tables.release(table, &mut self.parties)?;
        if let Some(waiter) = waiter {
            self.roster.close_visit(waiter, gratuity)?;
            self.mirror_staff(waiter);
        }

        self.mirror_bill(bill);
        self.mirror_table(table);
        self.mirror_party(vacated.party);

        let suggested_gratuity = (total * self.config.suggested_gratuity_rate).round_dp(2);
        info!("[Checkout] {} at {} closed: total {}, gratuity {}", bill, table, total, gratuity);
        Ok(Checkout {
            bill: BillRecord::new(self.ledger.require_bill(bill)?, total),
            total,
            gratuity,
            suggested_gratuity,
            waiter,
            party: vacated.party,
        })
    }

    /// Hire a waiter; parties queued for lack of a waiter are seated right away
    pub fn hire_waiter(&mut self, name: &str, base_pay: Decimal) -> EngineResult<StaffRecord> {
        let id = self.roster.hire_waiter(name, base_pay)?.id();
        self.mirror_staff(id);
        let seated = self.auto_drain()?;
        if !seated.is_empty() {
            debug!("[Seating] hiring {} seated {} waiting parties", id, seated.len());
        }
        Ok(StaffRecord::from(self.roster.require(id)?))
    }

    /// Hire a cook, who immediately picks up any backlog
    pub fn hire_cook(&mut self, name: &str, base_pay: Decimal) -> EngineResult<StaffRecord> {
        let id = self.roster.hire_cook(name, base_pay)?.id();
        self.mirror_staff(id);
        self.dispatch_backlog()?;
        Ok(StaffRecord::from(self.roster.require(id)?))
    }

    /// Remove a staff member with no tables or orders in hand
    pub fn dismiss(&mut self, id: StaffId) -> EngineResult<StaffRecord> {
        let member = self.roster.dismiss(id)?;
        self.mirror_staff(id);
        Ok(StaffRecord::from(&member))
    }

    fn dispatch_backlog(&mut self) -> EngineResult<()> {
        for (order, cook) in self.kitchen.dispatch_backlog(&mut self.ledger, &mut self.roster)? {
            self.mirror_order(order);
            self.mirror_staff(cook);
        }
        Ok(())
    }

    /// Newest order in `status` on the open bill at `table`
    fn order_at(&self, table: TableId, status: OrderStatus) -> EngineResult<OrderId> {
        let bill = self.open_bill_at(table)?;
        self.ledger
            .latest_with_status(bill, status)?
            .ok_or_else(|| EngineError::InvalidState(format!("{} has no {:?} order", table, status)))
    }
}
