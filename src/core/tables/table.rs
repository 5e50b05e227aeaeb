use crate::core::types::{BillId, PartyId, StaffId, TableId};
use serde::{Deserialize, Serialize};

/// Table lifecycle: FREE -> OCCUPIED -> DIRTY -> FREE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    Free,
    Occupied,
    Dirty,
}

/// A dining table and its current links
///
/// Links to the occupant, the open bill and the responsible waiter are identities into
/// the owning registries, never live references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub(crate) id: TableId,
    pub(crate) capacity: u32,
    pub(crate) status: TableStatus,
    pub(crate) occupant: Option<PartyId>,
    pub(crate) bill: Option<BillId>,
    pub(crate) waiter: Option<StaffId>,
}

impl Table {
    pub(crate) fn new(id: TableId, capacity: u32) -> Self {
        Self {
            id,
            capacity,
            status: TableStatus::Free,
            occupant: None,
            bill: None,
            waiter: None,
        }
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn status(&self) -> TableStatus {
        self.status
    }

    pub fn occupant(&self) -> Option<PartyId> {
        self.occupant
    }

    pub fn bill(&self) -> Option<BillId> {
        self.bill
    }

    pub fn waiter(&self) -> Option<StaffId> {
        self.waiter
    }

    pub fn is_free(&self) -> bool {
        self.status == TableStatus::Free
    }
}
