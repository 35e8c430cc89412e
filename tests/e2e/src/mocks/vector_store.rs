//! In-memory multi-space vector store
//!
//! Returns canned ranked lists per space, can be told to fail for a space,
//! and records which spaces were searched with what limit.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use mnemos_core::{RankedRecord, SpaceQuery, StoreError, VectorStore};

/// Canned-result [`VectorStore`]
#[derive(Default)]
pub struct MockVectorStore {
    spaces: BTreeMap<String, Vec<RankedRecord>>,
    failing: HashSet<String>,
    calls: Mutex<Vec<(String, usize)>>,
}

impl MockVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ranked list returned for `space`, best first
    pub fn with_space(mut self, space: &str, records: Vec<RankedRecord>) -> Self {
        self.spaces.insert(space.to_string(), records);
        self
    }

    /// Make every call against `space` fail as unavailable
    pub fn failing(mut self, space: &str) -> Self {
        self.failing.insert(space.to_string());
        self
    }

    /// `(space, limit)` of each search call so far
    pub fn search_calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn check(&self, space: &str) -> Result<(), StoreError> {
        if self.failing.contains(space) {
            let cause = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
            return Err(StoreError::unavailable(format!("mock:{}", space), cause));
        }
        Ok(())
    }
}

impl VectorStore for MockVectorStore {
    fn search(
        &self,
        space: &str,
        _query: &SpaceQuery,
        limit: usize,
    ) -> Result<Vec<RankedRecord>, StoreError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((space.to_string(), limit));
        }
        self.check(space)?;
        Ok(self
            .spaces
            .get(space)
            .map(|records| records.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    fn scroll(
        &self,
        space: &str,
        owner_id: &str,
        limit: usize,
    ) -> Result<Vec<RankedRecord>, StoreError> {
        self.check(space)?;
        Ok(self
            .spaces
            .get(space)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| {
                        r.payload_str("user_id")
                            .is_none_or(|owner| owner == owner_id)
                    })
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
