//! Reciprocal Rank Fusion over named vector spaces
//!
//! score(d) = sum over spaces s of weight(s) / (k + rank_s(d)), rank 1-indexed.
//!
//! Records are identified across spaces by a content prefix plus timestamp, so
//! the same exchange returned by two spaces collapses into one fused entry whose
//! score is the sum of both contributions.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::space::{CONTENT_SPACE, EMOTION_SPACE, RankedRecord, SEMANTIC_SPACE};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Configuration for rank fusion
#[derive(Debug, Clone)]
pub struct FusionConfig {
    /// RRF constant (higher = flatter rank penalty)
    pub rrf_k: f64,
    /// Per-space weights
    pub space_weights: BTreeMap<String, f64>,
    /// Weight for spaces missing from `space_weights`
    pub fallback_weight: f64,
    /// Content characters used in the record identity key
    pub identity_prefix_chars: usize,
    /// Number of results to fetch from each space before fusion
    pub source_limit_multiplier: usize,
}

impl Default for FusionConfig {
    fn default() -> Self {
        let space_weights = [
            (CONTENT_SPACE.to_string(), 0.5),
            (SEMANTIC_SPACE.to_string(), 0.3),
            (EMOTION_SPACE.to_string(), 0.2),
        ]
        .into_iter()
        .collect();

        Self {
            rrf_k: 60.0,
            space_weights,
            fallback_weight: 0.1,
            identity_prefix_chars: 100,
            source_limit_multiplier: 2,
        }
    }
}

impl FusionConfig {
    /// Weight applied to ranks from `space`
    pub fn weight_for(&self, space: &str) -> f64 {
        self.space_weights
            .get(space)
            .copied()
            .unwrap_or(self.fallback_weight)
    }

    /// Override one space's weight
    pub fn with_weight(mut self, space: impl Into<String>, weight: f64) -> Self {
        self.space_weights.insert(space.into(), weight);
        self
    }
}

// ============================================================================
// RESULT TYPES
// ============================================================================

/// How a fused record was assembled
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionMetadata {
    pub rrf_score: f64,
    /// Spaces the record appeared in, in the order they contributed
    pub source_spaces: Vec<String>,
    /// 1-indexed rank within each contributing space
    pub per_space_rank: BTreeMap<String, usize>,
}

/// A ranked record with its fusion annotation.
///
/// `fusion` is `None` when fusion was skipped and the record is passed through.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusedRecord {
    #[serde(flatten)]
    pub record: RankedRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fusion: Option<FusionMetadata>,
}

impl FusedRecord {
    /// Wrap a record without fusion metadata
    pub fn passthrough(record: RankedRecord) -> Self {
        Self {
            record,
            fusion: None,
        }
    }

    /// Accumulated RRF score, or `None` for passed-through records
    pub fn rrf_score(&self) -> Option<f64> {
        self.fusion.as_ref().map(|f| f.rrf_score)
    }
}

// ============================================================================
// FUSION ALGORITHM
// ============================================================================

/// Identity key for cross-space deduplication
pub fn record_identity(record: &RankedRecord, prefix_chars: usize) -> String {
    let prefix: String = record.content.chars().take(prefix_chars).collect();
    match record.timestamp {
        Some(ts) => format!("{}|{}", prefix, ts.to_rfc3339()),
        None => format!("{}|", prefix),
    }
}

/// Fuse ranked lists from several spaces into one list of at most `limit` records.
///
/// When at most one space has results, that space's list is returned unchanged
/// (truncated to `limit`) with no fusion metadata. Equal scores keep the order
/// in which records were first seen.
pub fn reciprocal_rank_fusion(
    results_by_space: &BTreeMap<String, Vec<RankedRecord>>,
    config: &FusionConfig,
    limit: usize,
) -> Vec<FusedRecord> {
    let mut non_empty = results_by_space.iter().filter(|(_, list)| !list.is_empty());
    let first = non_empty.next();
    if non_empty.next().is_none() {
        return first
            .map(|(_, list)| {
                list.iter()
                    .take(limit)
                    .cloned()
                    .map(FusedRecord::passthrough)
                    .collect()
            })
            .unwrap_or_default();
    }

    let mut fused: Vec<FusedRecord> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (space, list) in results_by_space {
        let weight = config.weight_for(space);
        for (position, record) in list.iter().enumerate() {
            let rank = position + 1;
            let key = record_identity(record, config.identity_prefix_chars);
            let slot = *index.entry(key).or_insert_with(|| {
                fused.push(FusedRecord {
                    record: record.clone(),
                    fusion: Some(FusionMetadata {
                        rrf_score: 0.0,
                        source_spaces: Vec::new(),
                        per_space_rank: BTreeMap::new(),
                    }),
                });
                fused.len() - 1
            });

            let Some(meta) = fused[slot].fusion.as_mut() else {
                continue;
            };
            // First appearance within a space is the one that counts
            if meta.per_space_rank.contains_key(space) {
                continue;
            }
            meta.rrf_score += weight / (config.rrf_k + rank as f64);
            meta.source_spaces.push(space.clone());
            meta.per_space_rank.insert(space.clone(), rank);
        }
    }

    fused.sort_by(|a, b| {
        let a = a.rrf_score().unwrap_or(0.0);
        let b = b.rrf_score().unwrap_or(0.0);
        b.partial_cmp(&a).unwrap_or(std::cmp::Ordering::Equal)
    });
    fused.truncate(limit);
    fused
}

// ============================================================================
// ENGINE
// ============================================================================

/// Rank fusion engine holding a [`FusionConfig`]
#[derive(Debug, Clone, Default)]
pub struct RankFusionEngine {
    config: FusionConfig,
}

impl RankFusionEngine {
    /// Create an engine with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: FusionConfig) -> Self {
        Self { config }
    }

    /// Get current configuration
    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Fuse per-space ranked lists; see [`reciprocal_rank_fusion`]
    pub fn fuse(
        &self,
        results_by_space: &BTreeMap<String, Vec<RankedRecord>>,
        limit: usize,
    ) -> Vec<FusedRecord> {
        let fused = reciprocal_rank_fusion(results_by_space, &self.config, limit);
        tracing::debug!(
            spaces = results_by_space.len(),
            results = fused.len(),
            fused = fused.first().is_some_and(|r| r.fusion.is_some()),
            "Rank fusion complete"
        );
        fused
    }

    /// Per-space fetch size for a target result count
    pub fn effective_source_limit(&self, target_limit: usize) -> usize {
        target_limit.saturating_mul(self.config.source_limit_multiplier.max(1))
    }
}

// ============================================================================
// TESTS
// ============================================================================
