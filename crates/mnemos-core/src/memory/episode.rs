//! Episodic memory types
//!
//! An [`EpisodicMemory`] is derived, never authoritative: it is recomputed from a
//! [`ConversationRecord`] and its emotion annotation whenever it is needed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Emotion annotation for one conversation record, as supplied by the
/// external emotion signal provider.
///
/// Accepts both camelCase and snake_case field names. The default value is the
/// "no signal" annotation: every score zero, which the memorability analyzer
/// treats as non-memorable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmotionSignal {
    #[serde(alias = "primary_emotion")]
    pub primary_emotion: String,
    /// Emotion-model confidence (0.0 to 1.0)
    #[serde(alias = "emotion_confidence")]
    pub emotion_confidence: f64,
    /// Emotional intensity (0.0 to 1.0)
    #[serde(alias = "emotional_intensity")]
    pub emotional_intensity: f64,
    #[serde(alias = "is_multi_emotion")]
    pub is_multi_emotion: bool,
    #[serde(alias = "mixed_emotions")]
    pub mixed_emotions: Vec<String>,
}

impl Default for EmotionSignal {
    fn default() -> Self {
        Self {
            primary_emotion: "neutral".to_string(),
            emotion_confidence: 0.0,
            emotional_intensity: 0.0,
            is_multi_emotion: false,
            mixed_emotions: Vec::new(),
        }
    }
}

impl EmotionSignal {
    /// Create a single-emotion signal
    pub fn new(primary_emotion: impl Into<String>, confidence: f64, intensity: f64) -> Self {
        Self {
            primary_emotion: primary_emotion.into(),
            emotion_confidence: confidence,
            emotional_intensity: intensity,
            ..Default::default()
        }
    }

    /// Add secondary emotions; marks the signal as multi-emotion when any are present
    pub fn with_mixed(mut self, mixed: Vec<String>) -> Self {
        self.is_multi_emotion = !mixed.is_empty();
        self.mixed_emotions = mixed;
        self
    }

    /// Replace NaN or out-of-range scores with values in `[0, 1]`
    pub fn sanitized(mut self) -> Self {
        self.emotion_confidence = unit(self.emotion_confidence);
        self.emotional_intensity = unit(self.emotional_intensity);
        if self.primary_emotion.trim().is_empty() {
            self.primary_emotion = "neutral".to_string();
        }
        self
    }

    /// Read an annotation field by field from a loosely typed payload.
    ///
    /// Each field accepts its camelCase or snake_case name. A field that is
    /// missing, null or of the wrong type takes its zero value without
    /// discarding the others.
    pub fn from_payload(payload: &Map<String, Value>) -> Self {
        let field = |camel: &str, snake: &str| {
            payload
                .get(camel)
                .filter(|v| !v.is_null())
                .or_else(|| payload.get(snake).filter(|v| !v.is_null()))
        };
        let score = |camel: &str, snake: &str| {
            field(camel, snake).and_then(Value::as_f64).unwrap_or(0.0)
        };

        let mixed_emotions: Vec<String> = field("mixedEmotions", "mixed_emotions")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let is_multi_emotion = field("isMultiEmotion", "is_multi_emotion")
            .and_then(Value::as_bool)
            .unwrap_or(!mixed_emotions.is_empty());

        Self {
            primary_emotion: field("primaryEmotion", "primary_emotion")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            emotion_confidence: score("emotionConfidence", "emotion_confidence"),
            emotional_intensity: score("emotionalIntensity", "emotional_intensity"),
            is_multi_emotion,
            mixed_emotions,
        }
        .sanitized()
    }
}

pub(crate) fn unit(value: f64) -> f64 {
    if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 }
}

/// One user/assistant exchange as returned by the vector store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRecord {
    pub id: String,
    pub owner_id: String,
    /// The user's message
    pub content: String,
    /// The assistant's reply, when stored alongside
    pub response: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// None when the emotion provider returned nothing
    pub emotion: Option<EmotionSignal>,
}

impl ConversationRecord {
    /// Create a record with no response and no emotion annotation
    pub fn new(
        id: impl Into<String>,
        owner_id: impl Into<String>,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            owner_id: owner_id.into(),
            content: content.into(),
            response: None,
            timestamp,
            emotion: None,
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = Some(response.into());
        self
    }

    pub fn with_emotion(mut self, emotion: EmotionSignal) -> Self {
        self.emotion = Some(emotion);
        self
    }
}

/// Dominant classification of a memorable moment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContextType {
    PersonalSharing,
    CreativeMoment,
    Expertise,
    #[default]
    General,
}

impl std::fmt::Display for ContextType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextType::PersonalSharing => write!(f, "personal_sharing"),
            ContextType::CreativeMoment => write!(f, "creative_moment"),
            ContextType::Expertise => write!(f, "expertise"),
            ContextType::General => write!(f, "general"),
        }
    }
}

impl std::str::FromStr for ContextType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "personal_sharing" => Ok(ContextType::PersonalSharing),
            "creative_moment" => Ok(ContextType::CreativeMoment),
            "expertise" => Ok(ContextType::Expertise),
            "general" => Ok(ContextType::General),
            _ => Err(format!("Unknown context type: {}", s)),
        }
    }
}

/// A conversation record that crossed the memorability threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodicMemory {
    pub id: String,
    pub content: String,
    /// Assistant reply, used for personality-trait analysis
    pub response: Option<String>,
    pub owner_id: String,
    pub timestamp: DateTime<Utc>,
    pub primary_emotion: String,
    pub emotion_confidence: f64,
    pub emotional_intensity: f64,
    pub is_multi_emotion: bool,
    pub mixed_emotions: Vec<String>,
    /// Additive memorability score (threshold 3.0 by default)
    pub memorable_score: f64,
    pub context_type: ContextType,
    pub content_preview: String,
}

/// Axis along which a character insight was derived
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    EmotionalPattern,
    TopicEnthusiasm,
    PersonalityTrait,
}

impl InsightType {
    /// Minimum number of supporting memories for this kind of insight
    pub fn min_support(&self) -> usize {
        match self {
            InsightType::EmotionalPattern | InsightType::PersonalityTrait => 3,
            InsightType::TopicEnthusiasm => 2,
        }
    }
}

impl std::fmt::Display for InsightType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsightType::EmotionalPattern => write!(f, "emotional_pattern"),
            InsightType::TopicEnthusiasm => write!(f, "topic_enthusiasm"),
            InsightType::PersonalityTrait => write!(f, "personality_trait"),
        }
    }
}

/// A recurring pattern inferred from several memorable moments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterInsight {
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub description: String,
    pub confidence: f64,
    pub supporting_memory_ids: Vec<String>,
    pub first_observed: DateTime<Utc>,
    pub reinforcement_count: usize,
}
