use crate::core::identity::IdAllocator;
use crate::core::store::{Record, Store, StoreError};
use std::collections::BTreeMap;

/// In-memory store, ordered by key
///
/// Stand-in for a real persistence backend; also what tests inspect to check that the
/// engine mirrored its mutations.
#[derive(Debug, Clone)]
pub struct MemoryStore<R: Record> {
    records: BTreeMap<R::Key, R>,
    ids: IdAllocator,
    writes: u64,
}

impl<R: Record> MemoryStore<R> {
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            ids: IdAllocator::new(),
            writes: 0,
        }
    }

    /// Number of successful add, update and remove calls
    pub fn writes(&self) -> u64 {
        self.writes
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R: Record> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Store<R> for MemoryStore<R> {
    fn get(&self, key: R::Key) -> Option<R> {
        self.records.get(&key).cloned()
    }

    fn get_all(&self) -> Vec<R> {
        self.records.values().cloned().collect()
    }

    fn add(&mut self, record: R) -> Result<(), StoreError> {
        let key = record.key();
        if self.records.contains_key(&key) {
            return Err(StoreError::Duplicate(format!("{:?}", key)));
        }
        self.records.insert(key, record);
        self.writes += 1;
        Ok(())
    }

    fn update(&mut self, record: R) -> Result<(), StoreError> {
        let key = record.key();
        match self.records.get_mut(&key) {
            Some(slot) => {
                *slot = record;
                self.writes += 1;
                Ok(())
            }
            None => Err(StoreError::Missing(format!("{:?}", key))),
        }
    }

    fn remove(&mut self, key: R::Key) -> Option<R> {
        let removed = self.records.remove(&key);
        if removed.is_some() {
            self.writes += 1;
        }
        removed
    }

    fn next_id(&mut self) -> u64 {
        self.ids.allocate()
    }
}
