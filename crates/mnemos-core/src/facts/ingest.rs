//! Fact ingestion pipeline
//!
//! extract, then for each fact: look up the stored facts for its subject,
//! detect a conflict, and overwrite. Conflict detection always happens before
//! the overwrite so the caller learns what was replaced.

use std::sync::Arc;

use serde::Serialize;

use super::{ConflictDetector, FactExtractor};
use crate::error::Result;
use crate::memory::{ExtractedFact, FactConflict};
use crate::storage::FactStore;

/// What one ingested message changed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    /// Facts extracted and stored, in extraction order
    pub facts: Vec<ExtractedFact>,
    /// Stored facts that were overwritten by a contradicting new fact
    pub conflicts: Vec<FactConflict>,
}

impl IngestReport {
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

/// Runs messages through the extractor and into a [`FactStore`]
pub struct FactIngestor {
    extractor: FactExtractor,
    detector: ConflictDetector,
    store: Arc<dyn FactStore>,
}

impl FactIngestor {
    pub fn new(store: Arc<dyn FactStore>) -> Self {
        Self::with_detector(store, ConflictDetector::new())
    }

    pub fn with_detector(store: Arc<dyn FactStore>, detector: ConflictDetector) -> Self {
        Self {
            extractor: FactExtractor::new(),
            detector,
            store,
        }
    }

    /// Extract facts from `text` and persist them for `owner_id`.
    ///
    /// A message with no extractable facts is a no-op. Store failures propagate
    /// with the facts already written left in place (each upsert is idempotent).
    pub fn ingest(&self, text: &str, owner_id: &str) -> Result<IngestReport> {
        let facts = self.extractor.extract(text, owner_id);
        let mut report = IngestReport::default();

        for fact in facts {
            let existing = self.store.query(owner_id, Some(&fact.subject))?;
            if let Some(conflict) = self.detector.detect(&fact, &existing) {
                tracing::info!(
                    owner_id = %owner_id,
                    key = %fact.key(),
                    resolution = %conflict.resolution,
                    "Overwriting conflicting fact"
                );
                report.conflicts.push(conflict);
            }
            self.store.upsert(&fact)?;
            report.facts.push(fact);
        }

        if !report.is_empty() {
            tracing::debug!(
                owner_id = %owner_id,
                facts = report.facts.len(),
                conflicts = report.conflicts.len(),
                "Ingested message"
            );
        }
        Ok(report)
    }
}
