//! # Episodic Recall Journey
//!
//! Raw vector store records become memorable moments, insights and
//! suggestions for a response builder.

use chrono::Duration;
use mnemos_core::search::CONTENT_SPACE;
use mnemos_core::{
    ContextType, ConversationRecord, EpisodicRecall, InsightDeriver, InsightType,
    MemorabilityAnalyzer,
};
use mnemos_e2e_tests::mocks::{MockVectorStore, TestDataFactory};

// ============================================================================
// MEMORABILITY
// ============================================================================

#[test]
fn test_strong_long_record_is_memorable() {
    let analyzer = MemorabilityAnalyzer::new();
    let content = "x".repeat(250);
    let record = TestDataFactory::conversation("r1", &content, "joy", 0.9, 0.8);

    let memory = analyzer.score_memorability(&record).unwrap();
    assert!(memory.memorable_score >= 5.0);
    assert_eq!(memory.context_type, ContextType::General);
}

#[test]
fn test_record_without_signal_is_discarded() {
    let analyzer = MemorabilityAnalyzer::new();
    let record = ConversationRecord::new("r1", "user-1", "ok", chrono::Utc::now());

    let (score, _) = analyzer.score(&record);
    assert_eq!(score, 0.0);
    assert!(analyzer.score_memorability(&record).is_none());
}

#[test]
fn test_personal_disclosure_sets_context() {
    let analyzer = MemorabilityAnalyzer::new();
    let record = TestDataFactory::conversation(
        "r1",
        "When I was a kid my family imagined we would sail around the world",
        "nostalgia",
        0.85,
        0.5,
    );

    let memory = analyzer.score_memorability(&record).unwrap();
    assert_eq!(memory.context_type, ContextType::PersonalSharing);
}

// ============================================================================
// INSIGHTS
// ============================================================================

#[test]
fn test_two_of_ten_never_forms_emotional_pattern() {
    let analyzer = MemorabilityAnalyzer::new();
    let records = TestDataFactory::emotional_batch(10, "joy", 2);
    let memorable = analyzer.detect_memorable_moments(&records);
    assert_eq!(memorable.len(), 10);

    let insights = InsightDeriver::new().derive_insights(&memorable);
    assert!(
        !insights
            .iter()
            .any(|i| i.insight_type == InsightType::EmotionalPattern)
    );
}

#[test]
fn test_recurring_emotion_forms_pattern() {
    let analyzer = MemorabilityAnalyzer::new();
    let records = TestDataFactory::emotional_batch(10, "joy", 4);
    let memorable = analyzer.detect_memorable_moments(&records);

    let insights = InsightDeriver::new().derive_insights(&memorable);
    let pattern = insights
        .iter()
        .find(|i| i.insight_type == InsightType::EmotionalPattern)
        .unwrap();
    assert_eq!(pattern.reinforcement_count, 4);
    // frequency 0.4 x mean intensity 0.8
    assert!((pattern.confidence - 0.32).abs() < 1e-9);
}

// ============================================================================
// RECALL
// ============================================================================

#[test]
fn test_recall_from_vector_store() {
    let store = MockVectorStore::new().with_space(
        CONTENT_SPACE,
        vec![
            TestDataFactory::exchange(
                "user-1",
                "We went hiking in the mountains and saw the sunset",
                "That sounds amazing, tell me more!",
                "joy",
                0.9,
                0.9,
                Duration::days(2),
            ),
            TestDataFactory::exchange(
                "user-1",
                "I finally finished the hike up the mountain trail",
                "How wonderful, what made you pick that trail?",
                "pride",
                0.9,
                0.85,
                Duration::days(40),
            ),
            TestDataFactory::exchange(
                "user-1",
                "Need to buy milk",
                "Noted.",
                "neutral",
                0.2,
                0.1,
                Duration::days(1),
            ),
            TestDataFactory::exchange(
                "user-2",
                "Someone else's hiking story in the mountains",
                "Great!",
                "joy",
                0.95,
                0.95,
                Duration::days(1),
            ),
        ],
    );

    let response = EpisodicRecall::new()
        .retrieve_for_response(&store, CONTENT_SPACE, "any hiking plans?", "user-1", 5)
        .unwrap();

    assert_eq!(response.total_memorable_count, 2);
    assert_eq!(response.memories.len(), 2);
    assert!(
        response
            .memories
            .iter()
            .all(|m| m.memory.owner_id == "user-1")
    );
    assert!(response.memories[0].relevance >= response.memories[1].relevance);
    assert!(response.suggestions.len() <= 3);
    assert!(!response.suggestions.is_empty());
    assert!(
        response
            .insights
            .iter()
            .any(|i| i.insight_type == InsightType::TopicEnthusiasm)
    );
    assert!((response.average_confidence - 0.9).abs() < 1e-9);
}

#[test]
fn test_nested_emotion_payload_is_read() {
    let store = MockVectorStore::new().with_space(
        CONTENT_SPACE,
        vec![TestDataFactory::exchange_nested(
            "user-1",
            "I cried at my daughter's graduation",
            "joy",
        )],
    );

    let response = EpisodicRecall::new()
        .retrieve_for_response(&store, CONTENT_SPACE, "graduation", "user-1", 3)
        .unwrap();

    assert_eq!(response.total_memorable_count, 1);
    assert_eq!(response.memories[0].memory.primary_emotion, "joy");
}

#[test]
fn test_empty_owner_history() {
    let store = MockVectorStore::new();
    let response = EpisodicRecall::new()
        .retrieve_for_response(&store, CONTENT_SPACE, "anything", "user-1", 3)
        .unwrap();

    assert_eq!(response.total_memorable_count, 0);
    assert!(response.memories.is_empty());
    assert!(response.insights.is_empty());
    assert_eq!(response.average_confidence, 0.0);
}

#[test]
fn test_store_outage_propagates() {
    let store = MockVectorStore::new().failing(CONTENT_SPACE);
    let err = EpisodicRecall::new()
        .retrieve_for_response(&store, CONTENT_SPACE, "anything", "user-1", 3)
        .unwrap_err();
    assert!(err.is_unavailable());
}
