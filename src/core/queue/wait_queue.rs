use crate::core::errors::{EngineError, EngineResult};
use crate::core::identity::IdAllocator;
use crate::core::party::Party;
use crate::core::types::PartyId;
use std::collections::VecDeque;

/// One party waiting for a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEntry {
    /// Waiting party
    pub party: PartyId,
    /// Party size, fixed at arrival
    pub size: u32,
    /// Arrival ticket, increasing in enqueue order
    pub ticket: u64,
}

/// Wait list with skip-ahead extraction
///
/// Keeps parties in arrival order. Extraction takes the earliest party that fits the
/// offered capacity, so a large party at the head never blocks smaller ones behind it,
/// and the parties left behind keep their relative order.
#[derive(Debug, Default)]
pub struct WaitQueue {
    entries: VecDeque<QueueEntry>,
    tickets: IdAllocator,
}

impl WaitQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a party at the back of the queue
    pub fn enqueue(&mut self, party: &Party) -> EngineResult<QueueEntry> {
        if self.contains(party.id()) {
            return Err(EngineError::Conflict(format!("{} is already waiting", party.id())));
        }
        let entry = QueueEntry {
            party: party.id(),
            size: party.size(),
            ticket: self.tickets.allocate(),
        };
        self.entries.push_back(entry);
        Ok(entry)
    }

    /// Remove and return the first party whose size fits `capacity`
    pub fn dequeue_fitting(&mut self, capacity: u32) -> Option<QueueEntry> {
        let position = self.entries.iter().position(|entry| entry.size <= capacity)?;
        self.entries.remove(position)
    }

    /// Remove a specific party regardless of its position
    pub fn remove(&mut self, party: PartyId) -> EngineResult<QueueEntry> {
        let position = self
            .position(party)
            .ok_or_else(|| EngineError::NotFound(format!("{} is not waiting", party)))?;
        self.entries
            .remove(position)
            .ok_or_else(|| EngineError::internal(format!("queue position {} vanished", position)))
    }

    pub fn contains(&self, party: PartyId) -> bool {
        self.position(party).is_some()
    }

    /// Zero-based position of a party in the queue
    pub fn position(&self, party: PartyId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.party == party)
    }

    /// Entries front to back
    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }

    /// Copy of the current order, for passes that mutate the queue while walking it
    pub fn snapshot(&self) -> Vec<QueueEntry> {
        self.entries.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::party::PartyBook;

    fn queue_of(sizes: &[u32]) -> (WaitQueue, Vec<PartyId>) {
        let mut book = PartyBook::new();
        let mut queue = WaitQueue::new();
        let mut ids = Vec::new();
        for &size in sizes {
            let party = book.create(size).unwrap();
            ids.push(party.id());
            queue.enqueue(party).unwrap();
        }
        (queue, ids)
    }

    fn order(queue: &WaitQueue) -> Vec<PartyId> {
        queue.iter().map(|entry| entry.party).collect()
    }

    #[test]
    fn test_enqueue_rejects_duplicates() {
        let mut book = PartyBook::new();
        let mut queue = WaitQueue::new();
        let party = book.create(2).unwrap().clone();
        queue.enqueue(&party).unwrap();
        assert!(matches!(queue.enqueue(&party), Err(EngineError::Conflict(_))));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_dequeue_fitting_skips_ahead() {
        let (mut queue, ids) = queue_of(&[6, 2, 3]);
        let seated = queue.dequeue_fitting(3).unwrap();
        assert_eq!(seated.party, ids[1]);
        assert_eq!(order(&queue), vec![ids[0], ids[2]]);
    }

    #[test]
    fn test_dequeue_fitting_takes_head_when_it_fits() {
        let (mut queue, ids) = queue_of(&[2, 2]);
        assert_eq!(queue.dequeue_fitting(4).unwrap().party, ids[0]);
        assert_eq!(order(&queue), vec![ids[1]]);
    }

    #[test]
    fn test_dequeue_fitting_none_leaves_queue_alone() {
        let (mut queue, ids) = queue_of(&[6]);
        assert!(queue.dequeue_fitting(1).is_none());
        assert_eq!(order(&queue), ids);
    }

    #[test]
    fn test_remove() {
        let (mut queue, ids) = queue_of(&[4, 5, 6]);
        queue.remove(ids[1]).unwrap();
        assert_eq!(order(&queue), vec![ids[0], ids[2]]);
        assert!(matches!(queue.remove(ids[1]), Err(EngineError::NotFound(_))));
    }

    #[test]
    fn test_tickets_follow_arrival_order() {
        let (queue, _) = queue_of(&[1, 1, 1]);
        let tickets: Vec<u64> = queue.iter().map(|entry| entry.ticket).collect();
        assert_eq!(tickets, vec![1, 2, 3]);
    }
}
