//! Fusion policy
//!
//! Decides whether a query is worth fusing and which spaces to consult. A
//! plain factual lookup is served from the content space alone.

use std::collections::BTreeMap;

use super::fusion::{FusedRecord, RankFusionEngine};
use super::space::{CONTENT_SPACE, EMOTION_SPACE, SEMANTIC_SPACE, SpaceQuery, VectorStore};
use crate::error::Result;
use crate::text::{first_match, normalize};

/// Conversational recall
const RECALL_PATTERNS: &[&str] = &[
    "what did we discuss",
    "what did we talk about",
    "what were we talking about",
    "remember when we",
    "remember when i",
    "do you remember",
    "last time we",
    "we talked about",
];

/// Relationship and pattern questions; these also pull in the semantic space
const RELATIONSHIP_PATTERNS: &[&str] = &[
    "relationship between",
    "similar to",
    "connects",
    "connected to",
    "connection between",
    "related to",
    "in common",
    "pattern",
    "patterns",
];

/// Feeling and mood words; these pull in the emotion space
const EMOTION_KEYWORDS: &[&str] = &[
    "feel",
    "feeling",
    "feelings",
    "felt",
    "mood",
    "emotion",
    "emotional",
    "happy",
    "sad",
    "angry",
    "upset",
    "excited",
    "anxious",
    "worried",
    "scared",
    "frustrated",
    "lonely",
];

/// Keyword-driven space selection on top of a [`RankFusionEngine`]
#[derive(Debug, Clone, Default)]
pub struct FusionCoordinator {
    engine: RankFusionEngine,
}

impl FusionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(engine: RankFusionEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &RankFusionEngine {
        &self.engine
    }

    /// Whether the query reads as conversational recall or a relationship question
    pub fn should_fuse(&self, query: &str) -> bool {
        let normalized = normalize(query);
        first_match(&normalized, RECALL_PATTERNS).is_some()
            || first_match(&normalized, RELATIONSHIP_PATTERNS).is_some()
    }

    /// Spaces to consult for a query; always starts with the content space
    pub fn select_spaces(&self, query: &str) -> Vec<&'static str> {
        let normalized = normalize(query);
        let mut spaces = vec![CONTENT_SPACE];
        if first_match(&normalized, RELATIONSHIP_PATTERNS).is_some() {
            spaces.push(SEMANTIC_SPACE);
        }
        if first_match(&normalized, EMOTION_KEYWORDS).is_some() {
            spaces.push(EMOTION_SPACE);
        }
        spaces
    }

    /// Search the store according to the policy and return at most `limit` records.
    ///
    /// Non-fused queries hit the content space only and come back unannotated.
    /// When fusing, a failed semantic or emotion space is logged and skipped; a
    /// failed content space is an error.
    pub fn search<S: VectorStore + ?Sized>(
        &self,
        store: &S,
        query: &SpaceQuery,
        limit: usize,
    ) -> Result<Vec<FusedRecord>> {
        let spaces = if self.should_fuse(&query.text) {
            self.select_spaces(&query.text)
        } else {
            vec![CONTENT_SPACE]
        };

        if spaces.len() == 1 {
            tracing::debug!(owner_id = %query.owner_id, "Fusion skipped");
            let records = store.search(CONTENT_SPACE, query, limit)?;
            return Ok(records
                .into_iter()
                .take(limit)
                .map(FusedRecord::passthrough)
                .collect());
        }

        let source_limit = self.engine.effective_source_limit(limit);
        let mut results_by_space = BTreeMap::new();
        for space in spaces {
            match store.search(space, query, source_limit) {
                Ok(records) => {
                    results_by_space.insert(space.to_string(), records);
                }
                Err(e) if space != CONTENT_SPACE => {
                    tracing::warn!(space, "Skipping unavailable vector space: {}", e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::debug!(
            owner_id = %query.owner_id,
            spaces = results_by_space.len(),
            "Fusing vector spaces"
        );
        Ok(self.engine.fuse(&results_by_space, limit))
    }
}
