//! In-memory fact store

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use super::{FactStore, Result, StoreError};
use crate::memory::{ExtractedFact, FactKey, objects_match};

/// Fact store held entirely in process memory.
///
/// Keyed by [`FactKey`], so the uniqueness invariant holds by construction.
#[derive(Debug, Default)]
pub struct InMemoryFactStore {
    facts: Mutex<BTreeMap<FactKey, ExtractedFact>>,
}

impl InMemoryFactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored facts across all owners
    pub fn len(&self) -> usize {
        self.facts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FactStore for InMemoryFactStore {
    fn upsert(&self, fact: &ExtractedFact) -> Result<()> {
        let mut facts = self
            .facts
            .lock()
            .map_err(|_| StoreError::LockPoisoned("facts"))?;
        let key = fact.key();
        let mut stored = fact.clone();
        stored.subject = key.subject.clone();
        stored.predicate = key.predicate.clone();
        facts.insert(key, stored);
        Ok(())
    }

    fn delete_where(
        &self,
        owner_id: &str,
        subject: &str,
        predicate: Option<&str>,
        object: Option<&str>,
    ) -> Result<usize> {
        let subject = subject.trim().to_lowercase();
        let predicate = predicate.map(|p| p.trim().to_lowercase());
        let mut facts = self
            .facts
            .lock()
            .map_err(|_| StoreError::LockPoisoned("facts"))?;

        let before = facts.len();
        facts.retain(|key, fact| {
            let matches = key.owner_id == owner_id
                && key.subject == subject
                && predicate.as_ref().is_none_or(|p| &key.predicate == p)
                && object.is_none_or(|o| objects_match(o, &fact.object));
            !matches
        });
        Ok(before - facts.len())
    }

    fn query(&self, owner_id: &str, subject: Option<&str>) -> Result<Vec<ExtractedFact>> {
        let subject = subject.map(|s| s.trim().to_lowercase());
        let facts = self
            .facts
            .lock()
            .map_err(|_| StoreError::LockPoisoned("facts"))?;

        // BTreeMap order is (owner, subject, predicate)
        Ok(facts
            .iter()
            .filter(|(key, _)| {
                key.owner_id == owner_id && subject.as_ref().is_none_or(|s| &key.subject == s)
            })
            .map(|(_, fact)| fact.clone())
            .collect())
    }
}
