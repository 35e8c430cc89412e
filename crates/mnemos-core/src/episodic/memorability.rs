//! # Memorability Scoring
//!
//! Decides which conversation records are "memorable moments" worth resurfacing.
//! Scoring is additive over independent signals, each with a fixed weight:
//!
//! | Signal | Condition | Weight |
//! |---|---|---|
//! | Emotion-model confidence | > 0.8 | 2.0 |
//! | Emotional intensity | > 0.7 | 2.0 |
//! | Mixed emotions present | | 1.0 |
//! | Content length | > 200 chars | 1.0 |
//! | Personal disclosure keyword | | 1.0 |
//! | Creative / analytical keyword | | 0.5 |
//! | Expertise keyword | | 0.5 |
//!
//! A record is memorable at 3.0 or above. The first keyword category that matches
//! (in table order) decides the [`ContextType`].
//!
//! A missing emotion annotation is the zero signal, so a record without one can
//! only qualify through its text.
//!
//! ```rust,ignore
//! use mnemos_core::episodic::MemorabilityAnalyzer;
//!
//! let analyzer = MemorabilityAnalyzer::new();
//! if let Some(memory) = analyzer.score_memorability(&record) {
//!     assert!(memory.memorable_score >= 3.0);
//! }
//! ```

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::memory::{ContextType, ConversationRecord, EmotionSignal, EpisodicMemory};
use crate::search::{RankedRecord, record_identity};
use crate::text::{first_match, normalize, preview};

// ============================================================================
// KEYWORDS
// ============================================================================

const PERSONAL_KEYWORDS: &[&str] = &[
    "my family",
    "my mom",
    "my mother",
    "my dad",
    "my father",
    "my wife",
    "my husband",
    "my partner",
    "my son",
    "my daughter",
    "my kids",
    "my childhood",
    "when i was",
    "i grew up",
    "i've always",
    "i feel",
    "i felt",
    "i'm afraid",
    "i struggle",
    "my dream",
    "my life",
    "personally",
];

const CREATIVE_KEYWORDS: &[&str] = &[
    "imagine",
    "what if",
    "idea",
    "create",
    "creative",
    "story",
    "poem",
    "painting",
    "drawing",
    "design",
    "invent",
    "brainstorm",
    "analyze",
    "theory",
    "philosophy",
];

const EXPERTISE_KEYWORDS: &[&str] = &[
    "explain",
    "how does",
    "algorithm",
    "technical",
    "research",
    "science",
    "engineering",
    "in my experience",
    "professional",
    "expert",
    "architecture",
    "programming",
    "medical",
];

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Signal cut-offs and weights for memorability scoring
#[derive(Debug, Clone)]
pub struct MemorabilityConfig {
    /// Minimum score for a memorable moment
    pub threshold: f64,
    pub confidence_cutoff: f64,
    pub confidence_weight: f64,
    pub intensity_cutoff: f64,
    pub intensity_weight: f64,
    pub multi_emotion_weight: f64,
    /// Content length (chars) above which the length signal fires
    pub length_cutoff: usize,
    pub length_weight: f64,
    pub personal_weight: f64,
    pub creative_weight: f64,
    pub expertise_weight: f64,
    /// Length of `content_preview`
    pub preview_chars: usize,
}

impl Default for MemorabilityConfig {
    fn default() -> Self {
        Self {
            threshold: 3.0,
            confidence_cutoff: 0.8,
            confidence_weight: 2.0,
            intensity_cutoff: 0.7,
            intensity_weight: 2.0,
            multi_emotion_weight: 1.0,
            length_cutoff: 200,
            length_weight: 1.0,
            personal_weight: 1.0,
            creative_weight: 0.5,
            expertise_weight: 0.5,
            preview_chars: 100,
        }
    }
}

// ============================================================================
// ANALYZER
// ============================================================================

/// Scores conversation records for memorable-moment status
#[derive(Debug, Clone, Default)]
pub struct MemorabilityAnalyzer {
    config: MemorabilityConfig,
}

impl MemorabilityAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MemorabilityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MemorabilityConfig {
        &self.config
    }

    /// Dominant context of a piece of text; first matching category wins
    pub fn classify_context(&self, text: &str) -> ContextType {
        let normalized = normalize(text);
        if first_match(&normalized, PERSONAL_KEYWORDS).is_some() {
            ContextType::PersonalSharing
        } else if first_match(&normalized, CREATIVE_KEYWORDS).is_some() {
            ContextType::CreativeMoment
        } else if first_match(&normalized, EXPERTISE_KEYWORDS).is_some() {
            ContextType::Expertise
        } else {
            ContextType::General
        }
    }

    /// Raw score and context type, regardless of threshold
    pub fn score(&self, record: &ConversationRecord) -> (f64, ContextType) {
        let cfg = &self.config;
        let emotion = emotion_of(record);
        let mut score = 0.0;

        if emotion.emotion_confidence > cfg.confidence_cutoff {
            score += cfg.confidence_weight;
        }
        if emotion.emotional_intensity > cfg.intensity_cutoff {
            score += cfg.intensity_weight;
        }
        if emotion.is_multi_emotion || !emotion.mixed_emotions.is_empty() {
            score += cfg.multi_emotion_weight;
        }
        if record.content.chars().count() > cfg.length_cutoff {
            score += cfg.length_weight;
        }

        let normalized = normalize(&record.content);
        let mut context = None;
        if first_match(&normalized, PERSONAL_KEYWORDS).is_some() {
            score += cfg.personal_weight;
            context.get_or_insert(ContextType::PersonalSharing);
        }
        if first_match(&normalized, CREATIVE_KEYWORDS).is_some() {
            score += cfg.creative_weight;
            context.get_or_insert(ContextType::CreativeMoment);
        }
        if first_match(&normalized, EXPERTISE_KEYWORDS).is_some() {
            score += cfg.expertise_weight;
            context.get_or_insert(ContextType::Expertise);
        }

        (score, context.unwrap_or_default())
    }

    /// Build the episodic memory for a record, or `None` below the threshold
    pub fn score_memorability(&self, record: &ConversationRecord) -> Option<EpisodicMemory> {
        let (score, context_type) = self.score(record);
        if score < self.config.threshold {
            return None;
        }

        let emotion = emotion_of(record);
        Some(EpisodicMemory {
            id: record.id.clone(),
            content: record.content.clone(),
            response: record.response.clone(),
            owner_id: record.owner_id.clone(),
            timestamp: record.timestamp,
            primary_emotion: emotion.primary_emotion,
            emotion_confidence: emotion.emotion_confidence,
            emotional_intensity: emotion.emotional_intensity,
            is_multi_emotion: emotion.is_multi_emotion || !emotion.mixed_emotions.is_empty(),
            mixed_emotions: emotion.mixed_emotions,
            memorable_score: score,
            context_type,
            content_preview: preview(&record.content, self.config.preview_chars),
        })
    }

    /// Memorable moments among `records`, highest score first
    pub fn detect_memorable_moments(&self, records: &[ConversationRecord]) -> Vec<EpisodicMemory> {
        let mut memories: Vec<EpisodicMemory> = records
            .iter()
            .filter_map(|r| self.score_memorability(r))
            .collect();
        memories.sort_by(|a, b| {
            b.memorable_score
                .partial_cmp(&a.memorable_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        if !memories.is_empty() {
            tracing::debug!(
                candidates = records.len(),
                memorable = memories.len(),
                "Memorable moments detected"
            );
        }
        memories
    }
}

fn emotion_of(record: &ConversationRecord) -> EmotionSignal {
    record.emotion.clone().unwrap_or_default().sanitized()
}

// ============================================================================
// RECORD ADAPTER
// ============================================================================

impl ConversationRecord {
    /// Read a conversation record out of a vector store result.
    ///
    /// Recognized payload fields: `id`, `user_id` / `owner_id`, `response`, and
    /// the emotion annotation either nested under `emotion` or flat
    /// (`primary_emotion`, `emotion_confidence`, ...). Anything missing falls
    /// back to empty values and the zero emotion signal.
    pub fn from_ranked(record: &RankedRecord) -> Self {
        let payload = &record.payload;
        let id = match payload.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => record_identity(record, 64),
        };
        let owner_id = ["user_id", "owner_id", "userId", "ownerId"]
            .iter()
            .find_map(|k| record.payload_str(k))
            .unwrap_or_default()
            .to_string();

        let emotion = match payload.get("emotion") {
            Some(Value::Object(nested)) => Some(EmotionSignal::from_payload(nested)),
            _ if payload.contains_key("primary_emotion") || payload.contains_key("primaryEmotion") => {
                Some(EmotionSignal::from_payload(payload))
            }
            _ => None,
        };

        Self {
            id,
            owner_id,
            content: record.content.clone(),
            response: record.payload_str("response").map(str::to_string),
            timestamp: record.timestamp.unwrap_or_else(DateTime::<Utc>::default),
            emotion,
        }
    }
}

impl From<&RankedRecord> for ConversationRecord {
    fn from(record: &RankedRecord) -> Self {
        ConversationRecord::from_ranked(record)
    }
}

// ============================================================================
// TESTS
// ============================================================================
