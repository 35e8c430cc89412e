//! # Fusion Search Journey
//!
//! Queries flow through the fusion policy into a multi-space vector store and
//! come back as one ranking.

use std::collections::BTreeMap;

use mnemos_core::search::{CONTENT_SPACE, EMOTION_SPACE, SEMANTIC_SPACE};
use mnemos_core::{
    FusionConfig, FusionCoordinator, MemoryError, RankFusionEngine, RankedRecord, SpaceQuery,
    reciprocal_rank_fusion,
};
use mnemos_e2e_tests::mocks::{MockVectorStore, TestDataFactory};

fn abcd() -> (RankedRecord, RankedRecord, RankedRecord, RankedRecord) {
    (
        TestDataFactory::ranked("A: hiking the ridge trail at dawn", 0),
        TestDataFactory::ranked("B: the pattern in my sleep schedule", 1),
        TestDataFactory::ranked("C: grocery list for the week", 2),
        TestDataFactory::ranked("D: notes on the relationship with my sister", 3),
    )
}

fn contents(records: &[mnemos_core::FusedRecord]) -> Vec<&str> {
    records.iter().map(|r| &r.record.content[..1]).collect()
}

// ============================================================================
// RRF
// ============================================================================

#[test]
fn test_two_space_scenario_ranks_shared_record_first() {
    let (a, b, c, d) = abcd();
    let mut lists = BTreeMap::new();
    lists.insert(CONTENT_SPACE.to_string(), vec![a.clone(), b.clone(), c.clone()]);
    lists.insert(SEMANTIC_SPACE.to_string(), vec![b, d, a]);

    let fused = reciprocal_rank_fusion(&lists, &FusionConfig::default(), 10);

    assert_eq!(contents(&fused), vec!["B", "A", "C", "D"]);
    let top = fused[0].fusion.as_ref().unwrap();
    assert_eq!(top.source_spaces.len(), 2);
    assert_eq!(top.per_space_rank[CONTENT_SPACE], 2);
    assert_eq!(top.per_space_rank[SEMANTIC_SPACE], 1);
    assert!(fused[0].rrf_score().unwrap() > fused[1].rrf_score().unwrap());
}

#[test]
fn test_single_space_passes_through_truncated() {
    let (a, b, c, _) = abcd();
    let mut lists = BTreeMap::new();
    lists.insert(CONTENT_SPACE.to_string(), vec![a.clone(), b.clone(), c]);

    let fused = RankFusionEngine::new().fuse(&lists, 2);

    assert_eq!(fused.len(), 2);
    assert_eq!(fused[0].record, a);
    assert_eq!(fused[1].record, b);
    assert!(fused.iter().all(|r| r.fusion.is_none()));
}

#[test]
fn test_two_spaces_beat_one_at_better_rank() {
    let (a, b, c, d) = abcd();
    let mut lists = BTreeMap::new();
    // A: content rank 3, semantic rank 3.  C: content rank 1 only.
    lists.insert(CONTENT_SPACE.to_string(), vec![c.clone(), b.clone(), a.clone()]);
    lists.insert(SEMANTIC_SPACE.to_string(), vec![d, b, a]);

    let config = FusionConfig::default()
        .with_weight(CONTENT_SPACE, 1.0)
        .with_weight(SEMANTIC_SPACE, 1.0);
    let fused = reciprocal_rank_fusion(&lists, &config, 10);

    let score = |name: &str| {
        fused
            .iter()
            .find(|r| r.record.content.starts_with(name))
            .and_then(|r| r.rrf_score())
            .unwrap()
    };
    assert!(score("A") > score("C"));
}

// ============================================================================
// POLICY
// ============================================================================

#[test]
fn test_factual_lookup_hits_content_only() {
    let (a, b, c, d) = abcd();
    let store = MockVectorStore::new()
        .with_space(CONTENT_SPACE, vec![a, b, c])
        .with_space(SEMANTIC_SPACE, vec![d]);

    let query = SpaceQuery::new("user-1", "grocery list");
    let results = FusionCoordinator::new().search(&store, &query, 2).unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.fusion.is_none()));
    assert_eq!(store.search_calls(), vec![(CONTENT_SPACE.to_string(), 2)]);
}

#[test]
fn test_relationship_question_fuses_with_overfetch() {
    let (a, b, c, d) = abcd();
    let store = MockVectorStore::new()
        .with_space(CONTENT_SPACE, vec![a.clone(), b.clone(), c])
        .with_space(SEMANTIC_SPACE, vec![b, d, a]);

    let query = SpaceQuery::new("user-1", "is there a pattern related to my sleep?");
    let results = FusionCoordinator::new().search(&store, &query, 3).unwrap();

    assert_eq!(contents(&results), vec!["B", "A", "C"]);
    let calls = store.search_calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|(_, limit)| *limit == 6));
}

#[test]
fn test_down_emotion_space_is_skipped() {
    let (a, b, c, d) = abcd();
    let store = MockVectorStore::new()
        .with_space(CONTENT_SPACE, vec![a, b.clone(), c])
        .with_space(SEMANTIC_SPACE, vec![b, d])
        .failing(EMOTION_SPACE);

    let query = SpaceQuery::new("user-1", "what patterns are there in how I feel?");
    let results = FusionCoordinator::new().search(&store, &query, 10).unwrap();

    assert_eq!(results[0].record.content, "B: the pattern in my sleep schedule");
    assert!(
        results
            .iter()
            .filter_map(|r| r.fusion.as_ref())
            .all(|f| !f.source_spaces.iter().any(|s| s == EMOTION_SPACE))
    );
}

#[test]
fn test_down_content_space_is_an_error() {
    let store = MockVectorStore::new().failing(CONTENT_SPACE);
    let query = SpaceQuery::new("user-1", "remember when we talked about hiking?");

    let err = FusionCoordinator::new().search(&store, &query, 5).unwrap_err();
    assert!(matches!(err, MemoryError::Store(_)));
    assert!(err.is_unavailable());
}
