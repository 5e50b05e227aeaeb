//! Operations engine
//!
//! [`Restaurant`] owns every registry and exposes one method per operator command.
//! Each call runs to completion before returning a plain record or an [`EngineError`];
//! a host that serves several operators must wrap each call in one lock.

pub mod kitchen;
mod seating;
mod service;

pub use kitchen::Kitchen;

use crate::core::config::RestaurantConfig;
use crate::core::errors::{EngineError, EngineResult};
use crate::core::menu::{Menu, MenuLookup};
use crate::core::orders::OrderLedger;
use crate::core::party::PartyBook;
use crate::core::queue::WaitQueue;
use crate::core::records::{BillRecord, OrderRecord, PartyRecord, QueueRecord, StaffRecord, TableRecord};
use crate::core::staff::{Duty, StaffRoster};
use crate::core::store::{self, Persistence};
use crate::core::tables::{TableRegistry, TableStatus};
use crate::core::types::{BillId, OrderId, PartyId, StaffId, TableId};

/// The restaurant operations engine
pub struct Restaurant<M: MenuLookup = Menu> {
    pub(crate) config: RestaurantConfig,
    pub(crate) tables: TableRegistry,
    pub(crate) queue: WaitQueue,
    pub(crate) roster: StaffRoster,
    pub(crate) parties: PartyBook,
    pub(crate) ledger: OrderLedger,
    pub(crate) kitchen: Kitchen,
    pub(crate) menu: M,
    pub(crate) persistence: Option<Persistence>,
}

impl<M: MenuLookup> Restaurant<M> {
    /// Create an empty restaurant: no tables, no staff
    pub fn new(config: RestaurantConfig, menu: M) -> Self {
        let roster = StaffRoster::new(config.waiter_table_cap, config.staff_id_base);
        Self {
            config,
            tables: TableRegistry::new(),
            queue: WaitQueue::new(),
            roster,
            parties: PartyBook::new(),
            ledger: OrderLedger::new(),
            kitchen: Kitchen::new(),
            menu,
            persistence: None,
        }
    }

    /// Mirror every successful mutation into `persistence`
    pub fn with_persistence(mut self, persistence: Persistence) -> Self {
        self.persistence = Some(persistence);
        self
    }

    pub fn config(&self) -> &RestaurantConfig {
        &self.config
    }

    pub fn menu(&self) -> &M {
        &self.menu
    }

    /// Host-side menu management; the engine itself only reads dishes
    pub fn menu_mut(&mut self) -> &mut M {
        &mut self.menu
    }

    pub fn persistence(&self) -> Option<&Persistence> {
        self.persistence.as_ref()
    }

    pub fn table_registry(&self) -> &TableRegistry {
        &self.tables
    }

    pub fn wait_queue(&self) -> &WaitQueue {
        &self.queue
    }

    pub fn roster(&self) -> &StaffRoster {
        &self.roster
    }

    pub fn ledger(&self) -> &OrderLedger {
        &self.ledger
    }

    pub fn kitchen(&self) -> &Kitchen {
        &self.kitchen
    }

    // ----- snapshots -----

    pub fn tables(&self) -> Vec<TableRecord> {
        self.tables.iter().map(TableRecord::from).collect()
    }

    /// Waiting parties, front of the line first
    pub fn queue(&self) -> Vec<QueueRecord> {
        self.queue.iter().map(QueueRecord::from).collect()
    }

    pub fn staff(&self) -> Vec<StaffRecord> {
        self.roster.iter().map(StaffRecord::from).collect()
    }

    pub fn parties(&self) -> Vec<PartyRecord> {
        self.parties.iter().map(PartyRecord::from).collect()
    }

    pub fn orders(&self) -> Vec<OrderRecord> {
        self.ledger.orders().map(OrderRecord::from).collect()
    }

    pub fn bill(&self, id: BillId) -> EngineResult<BillRecord> {
        let bill = self
            .ledger
            .bill(id)
            .ok_or_else(|| EngineError::NotFound(format!("{} does not exist", id)))?;
        Ok(BillRecord::new(bill, self.ledger.bill_total(id)?))
    }

    /// Open bill of the party seated at `table`
    pub fn bill_for(&self, table: TableId) -> EngineResult<BillRecord> {
        self.bill(self.open_bill_at(table)?)
    }

    pub(crate) fn open_bill_at(&self, table: TableId) -> EngineResult<BillId> {
        let table = self.tables.require(table)?;
        table
            .bill()
            .ok_or_else(|| EngineError::InvalidState(format!("{} has no open bill", table.id())))
    }

    /// Cross-check links between tables, staff, parties and bills
    pub fn validate_consistency(&self) -> Result<(), String> {
        self.tables.validate_consistency()?;

        for table in self.tables.iter() {
            if let Some(waiter) = table.waiter() {
                if self.roster.waiter_of(table.id()) != Some(waiter) {
                    return Err(format!("{} names {} but is not in their set", table.id(), waiter));
                }
            }
            if let Some(bill) = table.bill() {
                match self.ledger.bill(bill) {
                    Some(b) if b.is_open() && b.table() == table.id() => {}
                    _ => return Err(format!("{} links {} which is not its open bill", table.id(), bill)),
                }
            }
            if table.status() == TableStatus::Occupied && table.bill().is_none() {
                return Err(format!("{} is OCCUPIED without a bill", table.id()));
            }
        }

        for member in self.roster.iter() {
            if let Duty::Waiter(duty) = member.duty() {
                if duty.tables.len() > self.roster.table_cap() {
                    return Err(format!("{} exceeds the table cap", member.id()));
                }
                for table in &duty.tables {
                    match self.tables.get(*table) {
                        Some(t) if t.waiter() == Some(member.id()) => {}
                        _ => return Err(format!("{} holds {} without a matching link", member.id(), table)),
                    }
                }
            }
        }

        for entry in self.queue.iter() {
            match self.parties.get(entry.party) {
                Some(party) if party.status() == crate::core::party::PartyStatus::Waiting => {}
                _ => return Err(format!("{} is queued but not WAITING", entry.party)),
            }
        }
        Ok(())
    }

    // ----- persistence mirroring -----

    pub(crate) fn mirror_party(&mut self, id: PartyId) {
        if let (Some(persistence), Some(party)) = (self.persistence.as_mut(), self.parties.get(id)) {
            store::upsert(persistence.parties.as_mut(), PartyRecord::from(party));
        }
    }

    pub(crate) fn mirror_table(&mut self, id: TableId) {
        if let (Some(persistence), Some(table)) = (self.persistence.as_mut(), self.tables.get(id)) {
            store::upsert(persistence.tables.as_mut(), TableRecord::from(table));
        }
    }

    pub(crate) fn mirror_staff(&mut self, id: StaffId) {
        let Some(persistence) = self.persistence.as_mut() else {
            return;
        };
        match self.roster.get(id) {
            Some(member) => store::upsert(persistence.staff.as_mut(), StaffRecord::from(member)),
            None => store::discard(persistence.staff.as_mut(), id),
        }
    }

    pub(crate) fn mirror_order(&mut self, id: OrderId) {
        if let (Some(persistence), Some(order)) = (self.persistence.as_mut(), self.ledger.order(id)) {
            store::upsert(persistence.orders.as_mut(), OrderRecord::from(order));
        }
    }

    pub(crate) fn mirror_bill(&mut self, id: BillId) {
        let Some(persistence) = self.persistence.as_mut() else {
            return;
        };
        if let (Some(bill), Ok(total)) = (self.ledger.bill(id), self.ledger.bill_total(id)) {
            store::upsert(persistence.bills.as_mut(), BillRecord::new(bill, total));
        }
    }

    /// Sync queue membership of one party: present while queued, removed otherwise
    pub(crate) fn mirror_queue(&mut self, party: PartyId) {
        let Some(persistence) = self.persistence.as_mut() else {
            return;
        };
        match self.queue.iter().find(|entry| entry.party == party) {
            Some(entry) => store::upsert(persistence.queue.as_mut(), QueueRecord::from(entry)),
            None => store::discard(persistence.queue.as_mut(), party),
        }
    }
}

impl Restaurant<Menu> {
    /// Empty restaurant with default configuration and an empty menu
    pub fn with_defaults() -> Self {
        Self::new(RestaurantConfig::default(), Menu::new())
    }
}
