//! Persistence collaborator boundary
//!
//! The engine owns the authoritative state and mirrors every successful mutation into a
//! [`Persistence`] bundle, one [`Store`] per entity kind.

pub mod memory;

pub use memory::MemoryStore;

use crate::core::records::{BillRecord, OrderRecord, PartyRecord, QueueRecord, StaffRecord, TableRecord};
use crate::core::types::{BillId, OrderId, PartyId, StaffId, TableId};
use log::error;
use std::fmt::Debug;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("record {0} already stored")]
    Duplicate(String),

    #[error("record {0} not stored")]
    Missing(String),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// A plain record with a stable key
pub trait Record: Clone + Debug + Send {
    type Key: Ord + Copy + Debug + Send;

    fn key(&self) -> Self::Key;
}

/// Key-value store for one entity kind
pub trait Store<R: Record>: Send {
    fn get(&self, key: R::Key) -> Option<R>;
    fn get_all(&self) -> Vec<R>;
    fn add(&mut self, record: R) -> Result<(), StoreError>;
    fn update(&mut self, record: R) -> Result<(), StoreError>;
    fn remove(&mut self, key: R::Key) -> Option<R>;
    fn next_id(&mut self) -> u64;
}

impl Record for PartyRecord {
    type Key = PartyId;
    fn key(&self) -> PartyId {
        self.id
    }
}

impl Record for TableRecord {
    type Key = TableId;
    fn key(&self) -> TableId {
        self.id
    }
}

impl Record for StaffRecord {
    type Key = StaffId;
    fn key(&self) -> StaffId {
        self.id
    }
}

impl Record for OrderRecord {
    type Key = OrderId;
    fn key(&self) -> OrderId {
        self.id
    }
}

impl Record for BillRecord {
    type Key = BillId;
    fn key(&self) -> BillId {
        self.id
    }
}

impl Record for QueueRecord {
    type Key = PartyId;
    fn key(&self) -> PartyId {
        self.party
    }
}

/// One store per entity kind
pub struct Persistence {
    pub parties: Box<dyn Store<PartyRecord>>,
    pub tables: Box<dyn Store<TableRecord>>,
    pub staff: Box<dyn Store<StaffRecord>>,
    pub orders: Box<dyn Store<OrderRecord>>,
    pub bills: Box<dyn Store<BillRecord>>,
    pub queue: Box<dyn Store<QueueRecord>>,
}

impl Persistence {
    /// Bundle of empty in-memory stores
    pub fn in_memory() -> Self {
        Self {
            parties: Box::new(MemoryStore::<PartyRecord>::new()),
            tables: Box::new(MemoryStore::<TableRecord>::new()),
            staff: Box::new(MemoryStore::<StaffRecord>::new()),
            orders: Box::new(MemoryStore::<OrderRecord>::new()),
            bills: Box::new(MemoryStore::<BillRecord>::new()),
            queue: Box::new(MemoryStore::<QueueRecord>::new()),
        }
    }
}

/// Insert or overwrite a record, logging a failed mirror
///
/// Core state is authoritative; a store that rejects the write is reported, not retried.
pub(crate) fn upsert<R: Record>(store: &mut dyn Store<R>, record: R) {
    let key = record.key();
    let result = if store.get(key).is_some() {
        store.update(record)
    } else {
        store.add(record)
    };
    if let Err(err) = result {
        error!("[Store] failed to persist {:?}: {}", key, err);
    }
}

/// Drop a record if present
pub(crate) fn discard<R: Record>(store: &mut dyn Store<R>, key: R::Key) {
    store.remove(key);
}
