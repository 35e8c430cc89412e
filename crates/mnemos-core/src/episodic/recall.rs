//! Memory recall for response generation
//!
//! Composes the analyzer and the insight deriver into the single entry point a
//! response builder calls: fetch the owner's records, keep the memorable ones,
//! derive insights, re-rank against the query and emit a few suggestions.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::insights::{InsightDeriver, topics_in};
use super::memorability::MemorabilityAnalyzer;
use crate::error::{MemoryError, Result};
use crate::memory::{CharacterInsight, ContextType, ConversationRecord, EpisodicMemory};
use crate::search::VectorStore;
use crate::text::{content_tokens, first_match, normalize};

/// Words signalling each emotion family in a query
const EMOTION_FAMILIES: &[(&str, &[&str])] = &[
    ("joy", &["joy", "happy", "glad", "excited", "thrilled", "delighted", "fun"]),
    ("sadness", &["sad", "sadness", "down", "upset", "cry", "crying", "lonely", "grief"]),
    ("anger", &["angry", "anger", "mad", "furious", "annoyed", "frustrated"]),
    ("fear", &["fear", "scared", "afraid", "anxious", "worried", "nervous"]),
    ("love", &["love", "adore", "care", "grateful", "gratitude"]),
    ("surprise", &["surprise", "surprised", "shocked", "unexpected", "wow"]),
];

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Weights and windows for recall ranking
#[derive(Debug, Clone)]
pub struct RecallConfig {
    /// Records scrolled from the vector space per recall
    pub candidate_limit: usize,
    pub lexical_weight: f64,
    /// Memory context matches the query's context
    pub context_weight: f64,
    /// Memory shares a topic with the query (when context does not match)
    pub topic_weight: f64,
    pub emotion_weight: f64,
    /// Full recency weight inside this window
    pub recent_window: Duration,
    pub recent_weight: f64,
    /// Partial recency weight inside this window
    pub partial_window: Duration,
    pub partial_weight: f64,
    pub max_suggestions: usize,
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            candidate_limit: 100,
            lexical_weight: 0.4,
            context_weight: 0.2,
            topic_weight: 0.1,
            emotion_weight: 0.2,
            recent_window: Duration::days(7),
            recent_weight: 0.2,
            partial_window: Duration::days(30),
            partial_weight: 0.1,
            max_suggestions: 3,
        }
    }
}

// ============================================================================
// RESULT TYPES
// ============================================================================

/// A memorable moment with its relevance to the current query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecalledMemory {
    #[serde(flatten)]
    pub memory: EpisodicMemory,
    pub relevance: f64,
}

/// Everything a response builder needs from episodic memory
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecallResponse {
    pub memories: Vec<RecalledMemory>,
    pub insights: Vec<CharacterInsight>,
    /// Optional prompt hints; callers may ignore them
    pub suggestions: Vec<String>,
    pub total_memorable_count: usize,
    /// Mean emotion confidence across all memorable moments
    pub average_confidence: f64,
}

// ============================================================================
// RECALL
// ============================================================================

/// Episodic recall over a [`VectorStore`] space
#[derive(Debug, Clone, Default)]
pub struct EpisodicRecall {
    analyzer: MemorabilityAnalyzer,
    deriver: InsightDeriver,
    config: RecallConfig,
}

impl EpisodicRecall {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parts(
        analyzer: MemorabilityAnalyzer,
        deriver: InsightDeriver,
        config: RecallConfig,
    ) -> Self {
        Self {
            analyzer,
            deriver,
            config,
        }
    }

    pub fn config(&self) -> &RecallConfig {
        &self.config
    }

    pub fn analyzer(&self) -> &MemorabilityAnalyzer {
        &self.analyzer
    }

    /// Recall memorable moments and insights relevant to `query`.
    ///
    /// Records whose payload names a different owner are ignored. Store
    /// failures propagate; an owner with no memorable moments gets an empty
    /// response.
    pub fn retrieve_for_response<S: VectorStore + ?Sized>(
        &self,
        store: &S,
        space: &str,
        query: &str,
        owner_id: &str,
        limit: usize,
    ) -> Result<RecallResponse> {
        if owner_id.trim().is_empty() {
            return Err(MemoryError::InvalidArgument("owner_id is required".to_string()));
        }

        let records: Vec<ConversationRecord> = store
            .scroll(space, owner_id, self.config.candidate_limit)?
            .iter()
            .map(ConversationRecord::from_ranked)
            .filter(|r| r.owner_id.is_empty() || r.owner_id == owner_id)
            .map(|mut r| {
                r.owner_id = owner_id.to_string();
                r
            })
            .collect();

        let memorable = self.analyzer.detect_memorable_moments(&records);
        let response = self.compose(memorable, query, limit, Utc::now());

        tracing::debug!(
            owner_id = %owner_id,
            candidates = records.len(),
            memorable = response.total_memorable_count,
            returned = response.memories.len(),
            "Episodic recall"
        );
        Ok(response)
    }

    /// Build the response from already-scored memorable moments
    pub fn compose(
        &self,
        memorable: Vec<EpisodicMemory>,
        query: &str,
        limit: usize,
        now: DateTime<Utc>,
    ) -> RecallResponse {
        let total_memorable_count = memorable.len();
        let average_confidence = if memorable.is_empty() {
            0.0
        } else {
            memorable.iter().map(|m| m.emotion_confidence).sum::<f64>() / total_memorable_count as f64
        };

        let insights = self.deriver.derive_insights(&memorable);
        let mut memories = self.rank_for_query(memorable, query, now);
        memories.truncate(limit);
        let suggestions = self.suggestions(&memories, &insights);

        RecallResponse {
            memories,
            insights,
            suggestions,
            total_memorable_count,
            average_confidence,
        }
    }

    /// Order memories by relevance to `query`, ties broken by memorable score
    pub fn rank_for_query(
        &self,
        memories: Vec<EpisodicMemory>,
        query: &str,
        now: DateTime<Utc>,
    ) -> Vec<RecalledMemory> {
        let probe = QueryProbe::new(&self.analyzer, query);
        let mut ranked: Vec<RecalledMemory> = memories
            .into_iter()
            .map(|memory| RecalledMemory {
                relevance: self.relevance(&probe, &memory, now),
                memory,
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.relevance
                .partial_cmp(&a.relevance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    b.memory
                        .memorable_score
                        .partial_cmp(&a.memory.memorable_score)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        });
        ranked
    }

    fn relevance(&self, probe: &QueryProbe, memory: &EpisodicMemory, now: DateTime<Utc>) -> f64 {
        let cfg = &self.config;
        let mut score = 0.0;

        if !probe.tokens.is_empty() {
            let memory_tokens = content_tokens(&memory.content);
            let overlap = probe.tokens.intersection(&memory_tokens).count();
            score += cfg.lexical_weight * overlap as f64 / probe.tokens.len() as f64;
        }

        let normalized = normalize(&memory.content);
        if probe.context != ContextType::General && probe.context == memory.context_type {
            score += cfg.context_weight;
        } else if topics_in(&normalized)
            .iter()
            .any(|topic| probe.topics.contains(topic))
        {
            score += cfg.topic_weight;
        }

        if probe.matches_emotion(memory) {
            score += cfg.emotion_weight;
        }

        let age = now.signed_duration_since(memory.timestamp);
        if age < cfg.recent_window {
            score += cfg.recent_weight;
        } else if age < cfg.partial_window {
            score += cfg.partial_weight;
        }

        score
    }

    fn suggestions(&self, memories: &[RecalledMemory], insights: &[CharacterInsight]) -> Vec<String> {
        let memory_hints = memories.iter().map(|m| {
            let memory = &m.memory;
            if memory.primary_emotion.is_empty() || memory.primary_emotion == "neutral" {
                format!(
                    "Consider referencing an earlier {} moment: \"{}\"",
                    memory.context_type, memory.content_preview
                )
            } else {
                format!(
                    "Consider referencing when the user felt {}: \"{}\"",
                    memory.primary_emotion, memory.content_preview
                )
            }
        });
        let insight_hints = insights
            .iter()
            .map(|i| format!("Keep in mind ({}): {}", i.insight_type, i.description));

        interleave(memory_hints, insight_hints)
            .take(self.config.max_suggestions)
            .collect()
    }
}

/// Query features computed once per ranking pass
struct QueryProbe {
    tokens: std::collections::HashSet<String>,
    context: ContextType,
    topics: Vec<&'static str>,
    normalized: String,
}

impl QueryProbe {
    fn new(analyzer: &MemorabilityAnalyzer, query: &str) -> Self {
        let normalized = normalize(query);
        Self {
            tokens: content_tokens(query),
            context: analyzer.classify_context(query),
            topics: topics_in(&normalized),
            normalized,
        }
    }

    /// Query names the memory's primary emotion, a mixed emotion, or a word of its family
    fn matches_emotion(&self, memory: &EpisodicMemory) -> bool {
        std::iter::once(&memory.primary_emotion)
            .chain(memory.mixed_emotions.iter())
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty() && e != "neutral")
            .any(|emotion| {
                if first_match(&self.normalized, &[emotion.as_str()]).is_some() {
                    return true;
                }
                EMOTION_FAMILIES
                    .iter()
                    .find(|(family, _)| *family == emotion)
                    .is_some_and(|(_, words)| first_match(&self.normalized, words).is_some())
            })
    }
}

fn interleave<T>(
    a: impl Iterator<Item = T>,
    b: impl Iterator<Item = T>,
) -> impl Iterator<Item = T> {
    let mut a = a.fuse();
    let mut b = b.fuse();
    let mut take_a = true;
    std::iter::from_fn(move || {
        let next = if take_a {
            a.next().or_else(|| b.next())
        } else {
            b.next().or_else(|| a.next())
        };
        take_a = !take_a;
        next
    })
}

// ============================================================================
// TESTS
// ============================================================================
