//! Arrivals, queue draining and table lifecycle

use super::Restaurant;
use crate::core::config::DrainMode;
use crate::core::errors::{EngineError, EngineResult};
use crate::core::menu::MenuLookup;
use crate::core::records::{Arrival, Cleaning, PartyRecord, Seating, TableAdded, TableRecord};
use crate::core::types::{PartyId, TableId};
use log::{debug, info, warn};

impl<M: MenuLookup> Restaurant<M> {
    /// A party of `size` walks in
    ///
    /// Seated at the best-fitting FREE table when a waiter has a free slot, queued otherwise.
    pub fn arrive(&mut self, size: u32) -> EngineResult<Arrival> {
        let party = self.parties.create(size)?.id();
        self.mirror_party(party);

        if let Some(table) = self.tables.find_free(size) {
            match self.seat(party, table) {
                Ok(seating) => return Ok(Arrival::Seated(seating)),
                Err(err @ (EngineError::CapacityExceeded(_) | EngineError::InvalidState(_))) => {
                    debug!("[Seating] {} not seated at {}: {}", party, table, err);
                }
                Err(err) => return Err(err),
            }
        }

        let entry = self.queue.enqueue(self.parties.require(party)?)?;
        self.mirror_queue(party);
        let position = self.queue.len();
        info!("[Seating] {} of {} queued at position {}", party, entry.size, position);
        Ok(Arrival::Queued {
            party,
            party_size: entry.size,
            position,
        })
    }

    /// A queued party gives up waiting
    pub fn leave_queue(&mut self, party: PartyId) -> EngineResult<PartyRecord> {
        if !self.queue.contains(party) {
            return Err(EngineError::NotFound(format!("{} is not waiting", party)));
        }
        self.parties.get_mut(party)?.depart()?;
        self.queue.remove(party)?;
        self.mirror_queue(party);
        self.mirror_party(party);
        info!("[Seating] {} left the queue", party);
        Ok(PartyRecord::from(self.parties.require(party)?))
    }

    /// Seat waiting parties at free tables in arrival order
    ///
    /// Each candidate gets the best-fitting FREE table for its size. A party with no
    /// fitting table stops the pass under [`DrainMode::Strict`] and is skipped under
    /// [`DrainMode::Greedy`]. The pass always stops once no waiter has a free slot.
    pub fn drain_queue(&mut self, mode: DrainMode) -> EngineResult<Vec<Seating>> {
        let mut seated = Vec::new();
        for candidate in self.queue.snapshot() {
            if !self.queue.contains(candidate.party) {
                continue;
            }
            if self.roster.least_loaded_waiter().is_none() {
                debug!("[Seating] no waiter has a free slot, queue pass stops");
                break;
            }
            let Some(table) = self.tables.find_free(candidate.size) else {
                match mode {
                    DrainMode::Strict => break,
                    DrainMode::Greedy => continue,
                }
            };

            let capacity = self.tables.require(table)?.capacity();
            let entry = self.queue.dequeue_fitting(capacity).ok_or_else(|| {
                EngineError::internal(format!("{} fits {} but nobody was dequeued", candidate.party, table))
            })?;
            self.mirror_queue(entry.party);
            seated.push(self.seat(entry.party, table)?);
        }

        if !seated.is_empty() {
            info!("[Seating] queue pass seated {} part(ies), {} still waiting", seated.len(), self.queue.len());
        }
        Ok(seated)
    }

    /// Register a new table, then run the configured queue pass
    pub fn add_table(&mut self, id: TableId, capacity: u32) -> EngineResult<TableAdded> {
        self.tables.register(id, capacity)?;
        self.mirror_table(id);
        info!("[Tables] {} added with capacity {}", id, capacity);

        let seated = self.auto_drain()?;
        Ok(TableAdded {
            table: TableRecord::from(self.tables.require(id)?),
            seated,
        })
    }

    /// Change capacity of a FREE table
    pub fn resize_table(&mut self, id: TableId, capacity: u32) -> EngineResult<TableRecord> {
        let record = TableRecord::from(self.tables.resize(id, capacity)?);
        self.mirror_table(id);
        info!("[Tables] {} resized to {}", id, capacity);
        Ok(record)
    }

    /// DIRTY -> FREE, releasing the waiter's slot, then run the configured queue pass
    pub fn clean(&mut self, id: TableId) -> EngineResult<Cleaning> {
        if let Some(waiter) = self.tables.clean(id)? {
            self.roster.unassign_table(waiter, id)?;
            self.mirror_staff(waiter);
        }
        self.mirror_table(id);
        info!("[Tables] {} is FREE", id);

        let seated = self.auto_drain()?;
        Ok(Cleaning {
            table: TableRecord::from(self.tables.require(id)?),
            seated,
        })
    }

    pub(super) fn auto_drain(&mut self) -> EngineResult<Vec<Seating>> {
        match self.config.auto_drain {
            Some(mode) if !self.queue.is_empty() => self.drain_queue(mode),
            _ => Ok(Vec::new()),
        }
    }

    /// Place a WAITING party at a FREE table under the least-loaded waiter
    ///
    /// Any rejection leaves table, waiter and party as they were.
    fn seat(&mut self, party: PartyId, table: TableId) -> EngineResult<Seating> {
        let waiter = self.roster.least_loaded_waiter().ok_or_else(|| {
            warn!("[Seating] every waiter is at the cap of {} tables", self.roster.table_cap());
            EngineError::CapacityExceeded("no waiter has a free table slot".to_string())
        })?;

        self.roster.assign_table(waiter, table)?;
        let occupied = match self.parties.get_mut(party) {
            Ok(guest) => self.tables.occupy(table, guest),
            Err(err) => Err(err),
        };
        if let Err(err) = occupied {
            self.roster.unassign_table(waiter, table)?;
            return Err(err);
        }

        self.tables.set_waiter(table, Some(waiter))?;
        let bill = self.ledger.open_bill(table, party).id();
        self.tables.attach_bill(table, bill)?;

        self.mirror_party(party);
        self.mirror_table(table);
        self.mirror_staff(waiter);
        self.mirror_bill(bill);

        let (party_size, table_capacity) = (self.parties.require(party)?.size(), self.tables.require(table)?.capacity());
        info!(
            "[Seating] {} of {} seated at {} (capacity {}), served by {}",
            party, party_size, table, table_capacity, waiter
        );
        Ok(Seating {
            party,
            party_size,
            table,
            table_capacity,
            waiter,
            bill,
        })
    }
}
