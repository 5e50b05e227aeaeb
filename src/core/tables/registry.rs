use crate::core::errors::{EngineError, EngineResult};
use crate::core::party::{Party, PartyBook};
use crate::core::tables::table::{Table, TableStatus};
use crate::core::types::{BillId, PartyId, StaffId, TableId};
use log::debug;
use std::collections::BTreeMap;

/// What a released table left behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vacated {
    pub party: PartyId,
    pub bill: Option<BillId>,
    pub waiter: Option<StaffId>,
}

/// Manages registration and lifecycle of every table in the restaurant
#[derive(Debug, Default)]
pub struct TableRegistry {
    /// All tables, ordered by identity
    tables: BTreeMap<TableId, Table>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new FREE table
    pub fn register(&mut self, id: TableId, capacity: u32) -> EngineResult<&Table> {
        if id.0 == 0 {
            return Err(EngineError::Invalid("table number must be positive".to_string()));
        }
        if capacity == 0 {
            return Err(EngineError::Invalid(format!("{} needs a positive capacity", id)));
        }
        if self.tables.contains_key(&id) {
            return Err(EngineError::Conflict(format!("{} already exists", id)));
        }

        debug!("[Tables] registered {} with capacity {}", id, capacity);
        Ok(self.tables.entry(id).or_insert(Table::new(id, capacity)))
    }

    /// Get a table by ID
    pub fn get(&self, id: TableId) -> Option<&Table> {
        self.tables.get(&id)
    }

    /// Get a table by ID or fail with `NotFound`
    pub fn require(&self, id: TableId) -> EngineResult<&Table> {
        self.tables
            .get(&id)
            .ok_or_else(|| EngineError::NotFound(format!("{} does not exist", id)))
    }

    fn require_mut(&mut self, id: TableId) -> EngineResult<&mut Table> {
        self.tables
            .get_mut(&id)
            .ok_or_else(|| EngineError::NotFound(format!("{} does not exist", id)))
    }

    /// All tables in identity order
    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Best-fit lookup: the FREE table with the smallest capacity that still holds
    /// `min_capacity` guests, lowest identity first on ties
    pub fn find_free(&self, min_capacity: u32) -> Option<TableId> {
        self.tables
            .values()
            .filter(|table| table.is_free() && table.capacity >= min_capacity)
            .min_by_key(|table| (table.capacity, table.id))
            .map(|table| table.id)
    }

    /// Seat `party` at a FREE table that can hold it
    pub fn occupy(&mut self, id: TableId, party: &mut Party) -> EngineResult<()> {
        let table = self.require_mut(id)?;
        if table.status != TableStatus::Free {
            return Err(EngineError::InvalidState(format!(
                "{} is {:?}, only a FREE table can be occupied",
                id, table.status
            )));
        }
        if party.size() > table.capacity {
            return Err(EngineError::InvalidState(format!(
                "{} of {} guests does not fit {} (capacity {})",
                party.id(),
                party.size(),
                id,
                table.capacity
            )));
        }

        party.seat()?;
        table.status = TableStatus::Occupied;
        table.occupant = Some(party.id());
        debug!("[Tables] {} occupied by {}", id, party.id());
        Ok(())
    }

    /// OCCUPIED -> DIRTY; the occupant departs and the bill link is dropped
    ///
    /// The bill itself is left untouched, closing it belongs to the caller.
    pub fn release(&mut self, id: TableId, parties: &mut PartyBook) -> EngineResult<Vacated> {
        let table = self.require_mut(id)?;
        if table.status != TableStatus::Occupied {
            return Err(EngineError::InvalidState(format!(
                "{} is {:?}, only an OCCUPIED table can be released",
                id, table.status
            )));
        }
        let party_id = table
            .occupant
            .ok_or_else(|| EngineError::internal(format!("{} is OCCUPIED without an occupant", id)))?;

        parties.get_mut(party_id)?.depart()?;
        table.status = TableStatus::Dirty;
        table.occupant = None;
        let vacated = Vacated {
            party: party_id,
            bill: table.bill.take(),
            waiter: table.waiter,
        };
        debug!("[Tables] {} released by {}, now DIRTY", id, party_id);
        Ok(vacated)
    }

    /// DIRTY -> FREE; clears the bill and waiter links, returning the waiter that held it
    pub fn clean(&mut self, id: TableId) -> EngineResult<Option<StaffId>> {
        let table = self.require_mut(id)?;
        if table.status != TableStatus::Dirty {
            return Err(EngineError::InvalidState(format!(
                "{} is {:?}, only a DIRTY table can be cleaned",
                id, table.status
            )));
        }

        table.status = TableStatus::Free;
        table.bill = None;
        debug!("[Tables] {} cleaned", id);
        Ok(table.waiter.take())
    }

    /// Change capacity of a FREE table
    pub fn resize(&mut self, id: TableId, capacity: u32) -> EngineResult<&Table> {
        if capacity == 0 {
            return Err(EngineError::Invalid(format!("{} needs a positive capacity", id)));
        }
        let table = self.require_mut(id)?;
        if table.status != TableStatus::Free {
            return Err(EngineError::InvalidState(format!(
                "{} is {:?}, capacity can only change while FREE",
                id, table.status
            )));
        }
        table.capacity = capacity;
        Ok(table)
    }

    /// Link the open bill of the seated party
    pub(crate) fn attach_bill(&mut self, id: TableId, bill: BillId) -> EngineResult<()> {
        let table = self.require_mut(id)?;
        if table.status != TableStatus::Occupied {
            return Err(EngineError::InvalidState(format!("{} has no seated party", id)));
        }
        if let Some(existing) = table.bill {
            return Err(EngineError::Conflict(format!("{} already holds {}", id, existing)));
        }
        table.bill = Some(bill);
        Ok(())
    }

    /// Record which waiter is responsible for the table
    pub(crate) fn set_waiter(&mut self, id: TableId, waiter: Option<StaffId>) -> EngineResult<()> {
        self.require_mut(id)?.waiter = waiter;
        Ok(())
    }

    /// Count tables per status
    pub fn status_counts(&self) -> TableCounts {
        let mut counts = TableCounts {
            total: self.tables.len(),
            ..TableCounts::default()
        };
        for table in self.tables.values() {
            match table.status {
                TableStatus::Free => counts.free += 1,
                TableStatus::Occupied => counts.occupied += 1,
                TableStatus::Dirty => counts.dirty += 1,
            }
        }
        counts
    }

    /// Check that every table's links agree with its status
    pub fn validate_consistency(&self) -> Result<(), String> {
        for table in self.tables.values() {
            match table.status {
                TableStatus::Occupied if table.occupant.is_none() => {
                    return Err(format!("{} is OCCUPIED without an occupant", table.id));
                }
                TableStatus::Free | TableStatus::Dirty if table.occupant.is_some() => {
                    return Err(format!("{} is {:?} but still has an occupant", table.id, table.status));
                }
                TableStatus::Free if table.bill.is_some() || table.waiter.is_some() => {
                    return Err(format!("{} is FREE but still linked to a bill or waiter", table.id));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Statistics about table states
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub total: usize,
    pub free: usize,
    pub occupied: usize,
    pub dirty: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(capacities: &[(u32, u32)]) -> TableRegistry {
        let mut registry = TableRegistry::new();
        for &(id, capacity) in capacities {
            registry.register(TableId(id), capacity).unwrap();
        }
        registry
    }

    #[test]
    fn test_register_rejects_duplicates_and_zero_capacity() {
        let mut registry = registry_with(&[(1, 4)]);
        assert!(matches!(registry.register(TableId(1), 2), Err(EngineError::Conflict(_))));
        assert!(matches!(registry.register(TableId(2), 0), Err(EngineError::Invalid(_))));
        assert!(matches!(registry.register(TableId(0), 2), Err(EngineError::Invalid(_))));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_find_free_prefers_smallest_then_lowest_id() {
        let registry = registry_with(&[(1, 4), (2, 2), (3, 2), (4, 6)]);
        assert_eq!(registry.find_free(2), Some(TableId(2)));
        assert_eq!(registry.find_free(3), Some(TableId(1)));
        assert_eq!(registry.find_free(5), Some(TableId(4)));
        assert_eq!(registry.find_free(7), None);
    }

    #[test]
    fn test_find_free_skips_occupied_tables() {
        let mut registry = registry_with(&[(1, 2), (2, 2)]);
        let mut parties = PartyBook::new();
        let party = parties.create(2).unwrap().id();
        registry.occupy(TableId(1), parties.get_mut(party).unwrap()).unwrap();
        assert_eq!(registry.find_free(1), Some(TableId(2)));
    }

    #[test]
    fn test_full_cycle() {
        let mut registry = registry_with(&[(7, 4)]);
        let mut parties = PartyBook::new();
        let party = parties.create(3).unwrap().id();

        registry.occupy(TableId(7), parties.get_mut(party).unwrap()).unwrap();
        registry.attach_bill(TableId(7), BillId(1)).unwrap();
        registry.set_waiter(TableId(7), Some(StaffId(101))).unwrap();

        let vacated = registry.release(TableId(7), &mut parties).unwrap();
        assert_eq!(vacated.party, party);
        assert_eq!(vacated.bill, Some(BillId(1)));
        assert_eq!(registry.get(TableId(7)).unwrap().status(), TableStatus::Dirty);
        assert_eq!(registry.get(TableId(7)).unwrap().bill(), None);
        assert_eq!(parties.get(party).unwrap().status(), crate::core::party::PartyStatus::Departed);

        assert_eq!(registry.clean(TableId(7)).unwrap(), Some(StaffId(101)));
        let table = registry.get(TableId(7)).unwrap();
        assert!(table.is_free());
        assert_eq!(table.waiter(), None);
        assert!(registry.validate_consistency().is_ok());
    }

    #[test]
    fn test_illegal_transitions_are_reported() {
        let mut registry = registry_with(&[(1, 2)]);
        let mut parties = PartyBook::new();
        let big = parties.create(3).unwrap().id();

        assert!(matches!(registry.release(TableId(1), &mut parties), Err(EngineError::InvalidState(_))));
        assert!(matches!(registry.clean(TableId(1)), Err(EngineError::InvalidState(_))));
        assert!(matches!(
            registry.occupy(TableId(1), parties.get_mut(big).unwrap()),
            Err(EngineError::InvalidState(_))
        ));
        assert!(matches!(registry.clean(TableId(9)), Err(EngineError::NotFound(_))));
        assert_eq!(parties.get(big).unwrap().status(), crate::core::party::PartyStatus::Waiting);
        assert_eq!(registry.status_counts().free, 1);
    }

    #[test]
    fn test_resize_only_while_free() {
        let mut registry = registry_with(&[(1, 2)]);
        let mut parties = PartyBook::new();
        registry.resize(TableId(1), 6).unwrap();
        assert_eq!(registry.get(TableId(1)).unwrap().capacity(), 6);

        let party = parties.create(5).unwrap().id();
        registry.occupy(TableId(1), parties.get_mut(party).unwrap()).unwrap();
        assert!(matches!(registry.resize(TableId(1), 2), Err(EngineError::InvalidState(_))));
        assert_eq!(registry.get(TableId(1)).unwrap().capacity(), 6);
    }
}
