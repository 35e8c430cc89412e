//! Test Data Factory
//!
//! Builds vector store records and conversation records:
//! - Plain ranked records with distinct timestamps
//! - Conversation records carrying an emotion annotation in the payload
//! - Pre-built sets for memorability and insight scenarios

use chrono::{DateTime, Duration, TimeZone, Utc};
use mnemos_core::{ConversationRecord, EmotionSignal, RankedRecord};
use serde_json::json;

/// Factory for creating test data
pub struct TestDataFactory;

impl TestDataFactory {
    // ========================================================================
    // RANKED RECORDS
    // ========================================================================

    /// Fixed base time so identities are reproducible
    pub fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
            .single()
            .unwrap_or_default()
    }

    /// A ranked record whose identity is `content` at `base_time() + minutes`
    pub fn ranked(content: &str, minutes: i64) -> RankedRecord {
        RankedRecord::new(
            content,
            Some(Self::base_time() + Duration::minutes(minutes)),
            0.0,
        )
        .with_field("id", uuid::Uuid::new_v4().to_string())
    }

    /// A stored exchange as the vector store returns it, emotion fields flat
    pub fn exchange(
        owner_id: &str,
        content: &str,
        response: &str,
        emotion: &str,
        confidence: f64,
        intensity: f64,
        age: Duration,
    ) -> RankedRecord {
        RankedRecord::new(content, Some(Utc::now() - age), 0.0)
            .with_field("id", uuid::Uuid::new_v4().to_string())
            .with_field("user_id", owner_id)
            .with_field("response", response)
            .with_field("primary_emotion", emotion)
            .with_field("emotion_confidence", confidence)
            .with_field("emotional_intensity", intensity)
    }

    /// Same as [`Self::exchange`] with the emotion nested under `emotion`
    pub fn exchange_nested(owner_id: &str, content: &str, emotion: &str) -> RankedRecord {
        RankedRecord::new(content, Some(Utc::now()), 0.0)
            .with_field("id", uuid::Uuid::new_v4().to_string())
            .with_field("user_id", owner_id)
            .with_field(
                "emotion",
                json!({
                    "primaryEmotion": emotion,
                    "emotionConfidence": 0.95,
                    "emotionalIntensity": 0.9,
                }),
            )
    }

    // ========================================================================
    // CONVERSATION RECORDS
    // ========================================================================

    /// A record with the given emotion scores and no response
    pub fn conversation(
        id: &str,
        content: &str,
        emotion: &str,
        confidence: f64,
        intensity: f64,
    ) -> ConversationRecord {
        ConversationRecord::new(id, "user-1", content, Utc::now())
            .with_emotion(EmotionSignal::new(emotion, confidence, intensity))
    }

    /// `count` strongly emotional records; the first `matching` carry `emotion`,
    /// the rest cycle through other emotions
    pub fn emotional_batch(count: usize, emotion: &str, matching: usize) -> Vec<ConversationRecord> {
        const OTHERS: &[&str] = &["surprise", "gratitude", "pride", "curiosity"];
        (0..count)
            .map(|i| {
                let name = if i < matching {
                    emotion
                } else {
                    OTHERS[i % OTHERS.len()]
                };
                Self::conversation(
                    &format!("m{}", i),
                    &format!("Something happened today, moment number {}", i),
                    name,
                    0.9,
                    0.8,
                )
            })
            .collect()
    }
}
