//! Character insights
//!
//! Aggregates memorable moments along three independent axes:
//! - emotional pattern: a primary emotion that keeps recurring
//! - topic enthusiasm: keyword-bucketed topics discussed with strong, confident emotion
//! - personality trait: keyword density in the assistant's *response* text
//!
//! Each axis has its own minimum support (see [`InsightType::min_support`]).
//! Candidates from all axes are merged, sorted by confidence and capped.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::memory::{CharacterInsight, EpisodicMemory, InsightType, unit};
use crate::text::{count_matches, first_match, normalize};

/// Topic buckets for enthusiasm detection
pub const TOPIC_BUCKETS: &[(&str, &[&str])] = &[
    (
        "nature",
        &[
            "nature", "hiking", "hike", "forest", "mountain", "mountains", "ocean", "beach",
            "garden", "trees", "outdoors", "camping", "sunset", "animals", "birds",
        ],
    ),
    (
        "creativity",
        &[
            "art", "painting", "drawing", "music", "song", "writing", "poem", "poetry", "story",
            "creative", "design", "craft",
        ],
    ),
    (
        "technology",
        &[
            "code", "coding", "programming", "software", "computer", "technology", "tech", "ai",
            "robot", "robots", "app", "gadget",
        ],
    ),
    (
        "relationships",
        &[
            "friend", "friends", "family", "partner", "mom", "dad", "wife", "husband",
            "relationship", "kids", "children", "brother", "sister",
        ],
    ),
    (
        "learning",
        &[
            "learn", "learning", "study", "studying", "book", "books", "reading", "course",
            "class", "school", "research",
        ],
    ),
    (
        "adventure",
        &[
            "travel", "traveling", "trip", "adventure", "explore", "exploring", "journey",
            "abroad", "road trip", "climbing",
        ],
    ),
];

/// Response markers per personality trait
const TRAIT_MARKERS: &[(&str, &[&str])] = &[
    (
        "supportive",
        &[
            "you can do it", "here for you", "proud of you", "believe in you", "don't worry",
            "support", "you've got this",
        ],
    ),
    (
        "curious",
        &[
            "i wonder", "tell me more", "curious", "what made you", "how did", "fascinating",
            "interesting",
        ],
    ),
    (
        "empathetic",
        &[
            "i understand", "that sounds", "must have been", "i hear you", "sorry to hear",
            "that must", "how you feel",
        ],
    ),
    (
        "enthusiastic",
        &[
            "amazing", "wonderful", "exciting", "awesome", "fantastic", "love that", "can't wait",
        ],
    ),
    (
        "thoughtful",
        &[
            "perhaps", "consider", "on the other hand", "reflect", "it depends", "meaningful",
            "thoughtful",
        ],
    ),
];

/// Marker hits at which trait density saturates
const TRAIT_DENSITY_SATURATION: f64 = 3.0;

/// Topics mentioned in a normalized text
pub(crate) fn topics_in(normalized: &str) -> Vec<&'static str> {
    TOPIC_BUCKETS
        .iter()
        .filter(|(_, words)| first_match(normalized, words).is_some())
        .map(|(topic, _)| *topic)
        .collect()
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Thresholds for insight derivation
#[derive(Debug, Clone)]
pub struct InsightConfig {
    pub emotional_min_support: usize,
    pub topic_min_support: usize,
    pub trait_min_support: usize,
    /// Minimum share of memorable moments carrying an emotion
    pub emotion_frequency_threshold: f64,
    /// `mean intensity x mean confidence` must exceed this
    pub topic_enthusiasm_threshold: f64,
    /// Averaged `density x intensity` must exceed this
    pub trait_threshold: f64,
    pub max_insights: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            emotional_min_support: InsightType::EmotionalPattern.min_support(),
            topic_min_support: InsightType::TopicEnthusiasm.min_support(),
            trait_min_support: InsightType::PersonalityTrait.min_support(),
            emotion_frequency_threshold: 0.3,
            topic_enthusiasm_threshold: 0.6,
            trait_threshold: 0.3,
            max_insights: 10,
        }
    }
}

// ============================================================================
// DERIVER
// ============================================================================

/// Derives [`CharacterInsight`]s from a set of memorable moments
#[derive(Debug, Clone, Default)]
pub struct InsightDeriver {
    config: InsightConfig,
}

impl InsightDeriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: InsightConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    /// All insights supported by `memories`, highest confidence first
    pub fn derive_insights(&self, memories: &[EpisodicMemory]) -> Vec<CharacterInsight> {
        if memories.is_empty() {
            return Vec::new();
        }

        let mut insights = self.emotional_patterns(memories);
        insights.extend(self.topic_enthusiasm(memories));
        insights.extend(self.personality_traits(memories));

        insights.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        insights.truncate(self.config.max_insights);

        tracing::debug!(
            memories = memories.len(),
            insights = insights.len(),
            "Derived character insights"
        );
        insights
    }

    fn emotional_patterns(&self, memories: &[EpisodicMemory]) -> Vec<CharacterInsight> {
        let total = memories.len() as f64;
        let mut by_emotion: BTreeMap<String, Vec<&EpisodicMemory>> = BTreeMap::new();
        for memory in memories {
            let emotion = memory.primary_emotion.trim().to_lowercase();
            if emotion.is_empty() {
                continue;
            }
            by_emotion.entry(emotion).or_default().push(memory);
        }

        by_emotion
            .into_iter()
            .filter_map(|(emotion, support)| {
                let frequency = support.len() as f64 / total;
                if support.len() < self.config.emotional_min_support
                    || frequency < self.config.emotion_frequency_threshold
                {
                    return None;
                }
                let confidence = frequency * mean(support.iter().map(|m| m.emotional_intensity));
                Some(insight(
                    InsightType::EmotionalPattern,
                    format!(
                        "Often feels {} in memorable moments ({} of {})",
                        emotion,
                        support.len(),
                        memories.len()
                    ),
                    confidence,
                    &support,
                ))
            })
            .collect()
    }

    fn topic_enthusiasm(&self, memories: &[EpisodicMemory]) -> Vec<CharacterInsight> {
        let mut by_topic: BTreeMap<&'static str, Vec<&EpisodicMemory>> = BTreeMap::new();
        for memory in memories {
            for topic in topics_in(&normalize(&memory.content)) {
                by_topic.entry(topic).or_default().push(memory);
            }
        }

        by_topic
            .into_iter()
            .filter_map(|(topic, support)| {
                if support.len() < self.config.topic_min_support {
                    return None;
                }
                let enthusiasm = mean(support.iter().map(|m| m.emotional_intensity))
                    * mean(support.iter().map(|m| m.emotion_confidence));
                if enthusiasm <= self.config.topic_enthusiasm_threshold {
                    return None;
                }
                Some(insight(
                    InsightType::TopicEnthusiasm,
                    format!("Lights up when talking about {}", topic),
                    enthusiasm,
                    &support,
                ))
            })
            .collect()
    }

    fn personality_traits(&self, memories: &[EpisodicMemory]) -> Vec<CharacterInsight> {
        let responses: Vec<(&EpisodicMemory, String)> = memories
            .iter()
            .filter_map(|m| m.response.as_deref().map(|r| (m, normalize(r))))
            .collect();

        TRAIT_MARKERS
            .iter()
            .filter_map(|(name, markers)| {
                let mut support = Vec::new();
                let mut weighted = Vec::new();
                for (memory, response) in &responses {
                    let hits = count_matches(response, markers);
                    if hits == 0 {
                        continue;
                    }
                    let density = (hits as f64 / TRAIT_DENSITY_SATURATION).min(1.0);
                    weighted.push(density * memory.emotional_intensity);
                    support.push(*memory);
                }

                if support.len() < self.config.trait_min_support {
                    return None;
                }
                let strength = mean(weighted.into_iter());
                if strength <= self.config.trait_threshold {
                    return None;
                }
                Some(insight(
                    InsightType::PersonalityTrait,
                    format!("Responds in a {} way", name),
                    strength,
                    &support,
                ))
            })
            .collect()
    }
}

fn insight(
    insight_type: InsightType,
    description: String,
    confidence: f64,
    support: &[&EpisodicMemory],
) -> CharacterInsight {
    let first_observed = support
        .iter()
        .map(|m| m.timestamp)
        .min()
        .unwrap_or_else(DateTime::<Utc>::default);

    CharacterInsight {
        insight_type,
        description,
        confidence: unit(confidence),
        supporting_memory_ids: support.iter().map(|m| m.id.clone()).collect(),
        first_observed,
        reinforcement_count: support.len(),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

// ============================================================================
// TESTS
// ============================================================================
