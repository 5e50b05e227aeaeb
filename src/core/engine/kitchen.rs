use crate::core::errors::{EngineError, EngineResult};
use crate::core::orders::{OrderLedger, OrderStatus};
use crate::core::staff::{Role, StaffRoster};
use crate::core::types::{OrderId, StaffId};
use log::{debug, info, warn};
use std::collections::VecDeque;

/// Kitchen dispatch
///
/// Hands confirmed orders to the least-loaded cook. Orders confirmed while no cook is on
/// the roster wait in a FIFO backlog until one becomes available.
#[derive(Debug, Default)]
pub struct Kitchen {
    backlog: VecDeque<OrderId>,
}

impl Kitchen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders waiting for a cook, oldest first
    pub fn backlog(&self) -> Vec<OrderId> {
        self.backlog.iter().copied().collect()
    }

    pub fn is_waiting(&self, order: OrderId) -> bool {
        self.backlog.contains(&order)
    }

    /// OPEN -> CONFIRMED, then straight into preparation when a cook is free
    pub fn confirm_and_assign(
        &mut self,
        order: OrderId,
        ledger: &mut OrderLedger,
        roster: &mut StaffRoster,
    ) -> EngineResult<Option<StaffId>> {
        ledger.order_mut(order)?.confirm()?;
        match roster.least_loaded_cook() {
            Some(cook) => {
                Self::start(cook, order, ledger, roster)?;
                Ok(Some(cook))
            }
            None => {
                warn!("[Kitchen] no cook on duty, {} waits in the backlog", order);
                self.backlog.push_back(order);
                Ok(None)
            }
        }
    }

    /// CONFIRMED -> IN_PREPARATION under `cook`
    pub fn start(
        cook: StaffId,
        order: OrderId,
        ledger: &mut OrderLedger,
        roster: &mut StaffRoster,
    ) -> EngineResult<()> {
        if roster.require(cook)?.role() != Role::Cook {
            return Err(EngineError::Invalid(format!("{} is not a cook", cook)));
        }
        ledger.order_mut(order)?.start_preparation(cook)?;
        roster.start_order(cook, order)?;
        info!("[Kitchen] {} started {}", cook, order);
        Ok(())
    }

    /// IN_PREPARATION -> READY, freeing the cook's slot
    pub fn finish(order: OrderId, ledger: &mut OrderLedger, roster: &mut StaffRoster) -> EngineResult<StaffId> {
        let current = ledger.require_order(order)?;
        if current.status() != OrderStatus::InPreparation {
            return Err(EngineError::InvalidState(format!(
                "{} is {:?}, only an order IN_PREPARATION can be marked ready",
                order,
                current.status()
            )));
        }
        let cook = current
            .cook()
            .ok_or_else(|| EngineError::internal(format!("{} is in preparation without a cook", order)))?;

        roster.finish_order(cook, order)?;
        ledger.order_mut(order)?.finish_preparation()?;
        info!("[Kitchen] {} finished {}", cook, order);
        Ok(cook)
    }

    /// Hand backlog orders to available cooks, oldest first
    ///
    /// Entries no longer CONFIRMED (cancelled meanwhile) are dropped.
    pub fn dispatch_backlog(
        &mut self,
        ledger: &mut OrderLedger,
        roster: &mut StaffRoster,
    ) -> EngineResult<Vec<(OrderId, StaffId)>> {
        let mut dispatched = Vec::new();
        while let Some(&order) = self.backlog.front() {
            if ledger.require_order(order)?.status() != OrderStatus::Confirmed {
                debug!("[Kitchen] dropping stale backlog entry {}", order);
                self.backlog.pop_front();
                continue;
            }
            let Some(cook) = roster.least_loaded_cook() else {
                break;
            };
            Self::start(cook, order, ledger, roster)?;
            self.backlog.pop_front();
            dispatched.push((order, cook));
        }
        Ok(dispatched)
    }

    /// Remove an order from the backlog, returning whether it was waiting
    pub fn withdraw(&mut self, order: OrderId) -> bool {
        match self.backlog.iter().position(|waiting| *waiting == order) {
            Some(position) => {
                self.backlog.remove(position);
                true
            }
            None => false,
        }
    }
}
