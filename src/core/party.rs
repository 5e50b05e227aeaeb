use crate::core::errors::{EngineError, EngineResult};
use crate::core::identity::IdAllocator;
use crate::core::types::PartyId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle of a party inside the restaurant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartyStatus {
    Waiting,
    Seated,
    Departed,
}

/// A group of customers treated as one seating unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Party {
    id: PartyId,
    size: u32,
    status: PartyStatus,
}

impl Party {
    pub fn id(&self) -> PartyId {
        self.id
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn status(&self) -> PartyStatus {
        self.status
    }

    /// WAITING -> SEATED
    pub(crate) fn seat(&mut self) -> EngineResult<()> {
        if self.status != PartyStatus::Waiting {
            return Err(EngineError::InvalidState(format!(
                "{} cannot be seated while {:?}",
                self.id, self.status
            )));
        }
        self.status = PartyStatus::Seated;
        Ok(())
    }

    /// Any state other than DEPARTED -> DEPARTED
    pub(crate) fn depart(&mut self) -> EngineResult<()> {
        if self.status == PartyStatus::Departed {
            return Err(EngineError::InvalidState(format!("{} has already left", self.id)));
        }
        self.status = PartyStatus::Departed;
        Ok(())
    }
}

/// Arena of every party that ever arrived, keyed by identity
///
/// Parties are never removed; a finished visit leaves the party DEPARTED.
#[derive(Debug, Default)]
pub struct PartyBook {
    parties: BTreeMap<PartyId, Party>,
    ids: IdAllocator,
}

impl PartyBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a WAITING party of the given size
    pub fn create(&mut self, size: u32) -> EngineResult<&Party> {
        if size == 0 {
            return Err(EngineError::Invalid("party size must be positive".to_string()));
        }
        let id = PartyId(self.ids.allocate());
        let party = self.parties.entry(id).or_insert(Party {
            id,
            size,
            status: PartyStatus::Waiting,
        });
        Ok(party)
    }

    pub fn get(&self, id: PartyId) -> Option<&Party> {
        self.parties.get(&id)
    }

    pub fn require(&self, id: PartyId) -> EngineResult<&Party> {
        self.get(id)
            .ok_or_else(|| EngineError::NotFound(format!("{} does not exist", id)))
    }

    pub(crate) fn get_mut(&mut self, id: PartyId) -> EngineResult<&mut Party> {
        self.parties
            .get_mut(&id)
            .ok_or_else(|| EngineError::NotFound(format!("{} does not exist", id)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Party> {
        self.parties.values()
    }

    pub fn len(&self) -> usize {
        self.parties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_assigns_increasing_ids() {
        let mut book = PartyBook::new();
        let first = book.create(2).unwrap().id();
        let second = book.create(5).unwrap().id();
        assert_eq!(first, PartyId(1));
        assert_eq!(second, PartyId(2));
        assert_eq!(book.get(second).unwrap().size(), 5);
        assert_eq!(book.get(first).unwrap().status(), PartyStatus::Waiting);
    }

    #[test]
    fn test_zero_size_rejected() {
        let mut book = PartyBook::new();
        let err = book.create(0).unwrap_err();
        assert!(matches!(err, EngineError::Invalid(_)));
        assert!(book.is_empty());
    }

    #[test]
    fn test_lifecycle_is_one_way() {
        let mut book = PartyBook::new();
        let id = book.create(3).unwrap().id();
        let party = book.get_mut(id).unwrap();

        party.seat().unwrap();
        assert!(matches!(party.seat(), Err(EngineError::InvalidState(_))));
        party.depart().unwrap();
        assert_eq!(party.status(), PartyStatus::Departed);
        assert!(matches!(party.depart(), Err(EngineError::InvalidState(_))));
    }
}
