//! Conflict detection between a new fact and stored facts
//!
//! Detection is read-only. The caller decides whether the overwrite is persisted.

use crate::memory::{ConflictType, ExtractedFact, FactConflict, Resolution};

/// Reports the first stored fact a new fact contradicts
#[derive(Debug, Clone, Default)]
pub struct ConflictDetector {
    resolution: Resolution,
}

impl ConflictDetector {
    /// Detector using the default `prefer_new` policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Detector that stamps every conflict with the given resolution
    pub fn with_resolution(resolution: Resolution) -> Self {
        Self { resolution }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Find a stored fact with the same subject and predicate but a different object.
    ///
    /// Only the first such fact is reported. Matching objects that differ only in
    /// casing are not a conflict.
    pub fn detect(
        &self,
        new_fact: &ExtractedFact,
        existing: &[ExtractedFact],
    ) -> Option<FactConflict> {
        let old_fact = existing
            .iter()
            .find(|old| old.describes_same(new_fact) && !old.same_object(new_fact))?;

        tracing::debug!(
            owner_id = %new_fact.owner_id,
            subject = %new_fact.subject,
            predicate = %new_fact.predicate,
            "Fact conflict detected"
        );

        Some(FactConflict {
            old_fact: old_fact.clone(),
            new_fact: new_fact.clone(),
            conflict_type: ConflictType::Contradiction,
            resolution: self.resolution,
            confidence: old_fact.confidence.min(new_fact.confidence),
        })
    }
}
