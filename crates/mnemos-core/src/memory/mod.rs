//! Memory module - Core types and data structures
//!
//! Two families of records live here:
//! - Structured facts (subject / predicate / object triples) and the conflicts
//!   raised when a new fact contradicts a stored one
//! - Episodic memories and the character insights aggregated from them

mod episode;

pub use episode::{
    CharacterInsight, ContextType, ConversationRecord, EmotionSignal, EpisodicMemory, InsightType,
};
pub(crate) use episode::unit;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// FACTS
// ============================================================================

/// A structured fact extracted from a single message.
///
/// At most one fact is stored per [`FactKey`]; a newer fact with the same key
/// replaces the older one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFact {
    /// What the fact is about ("dog", "user")
    pub subject: String,
    /// The relation ("named", "lives_in")
    pub predicate: String,
    /// The value ("Rex"); original casing is preserved
    pub object: String,
    /// Confidence in the fact (0.0 to 1.0)
    pub confidence: f64,
    /// The message the fact was extracted from
    pub source_text: String,
    /// When the fact was observed
    pub timestamp: DateTime<Utc>,
    /// The user this fact belongs to
    pub owner_id: String,
}

impl ExtractedFact {
    /// Create a fact observed now. Subject and predicate are normalized to lower case.
    pub fn new(
        owner_id: impl Into<String>,
        subject: impl AsRef<str>,
        predicate: impl AsRef<str>,
        object: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            subject: normalize_key_part(subject.as_ref()),
            predicate: normalize_key_part(predicate.as_ref()),
            object: object.into().trim().to_string(),
            confidence: unit(confidence),
            source_text: String::new(),
            timestamp: Utc::now(),
            owner_id: owner_id.into(),
        }
    }

    /// Attach the source message
    pub fn with_source(mut self, source_text: impl Into<String>) -> Self {
        self.source_text = source_text.into();
        self
    }

    /// Override the observation time
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Storage identity of this fact
    pub fn key(&self) -> FactKey {
        FactKey::new(&self.owner_id, &self.subject, &self.predicate)
    }

    /// Whether both facts describe the same subject and predicate (case-insensitive)
    pub fn describes_same(&self, other: &ExtractedFact) -> bool {
        normalize_key_part(&self.subject) == normalize_key_part(&other.subject)
            && normalize_key_part(&self.predicate) == normalize_key_part(&other.predicate)
    }

    /// Whether both facts carry the same value (case-insensitive)
    pub fn same_object(&self, other: &ExtractedFact) -> bool {
        objects_match(&self.object, &other.object)
    }
}

/// Case-insensitive, whitespace-trimmed object comparison
pub fn objects_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

fn normalize_key_part(part: &str) -> String {
    part.trim().to_lowercase()
}

/// Uniqueness key for stored facts: `(owner_id, subject, predicate)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactKey {
    pub owner_id: String,
    pub subject: String,
    pub predicate: String,
}

impl FactKey {
    /// Build a key; subject and predicate are lower-cased
    pub fn new(owner_id: &str, subject: &str, predicate: &str) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            subject: normalize_key_part(subject),
            predicate: normalize_key_part(predicate),
        }
    }
}

impl std::fmt::Display for FactKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.owner_id, self.subject, self.predicate)
    }
}

// ============================================================================
// CONFLICTS
// ============================================================================

/// Kind of disagreement between two facts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    /// Same subject and predicate, different object
    #[default]
    Contradiction,
}

impl std::fmt::Display for ConflictType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictType::Contradiction => write!(f, "contradiction"),
        }
    }
}

/// How a conflict should be settled
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Temporal recency wins
    #[default]
    PreferNew,
    /// Keep the stored fact
    PreferOld,
    /// Combine both values
    Merge,
    /// Needs a human
    Uncertain,
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolution::PreferNew => write!(f, "prefer_new"),
            Resolution::PreferOld => write!(f, "prefer_old"),
            Resolution::Merge => write!(f, "merge"),
            Resolution::Uncertain => write!(f, "uncertain"),
        }
    }
}

impl std::str::FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prefer_new" | "new" => Ok(Resolution::PreferNew),
            "prefer_old" | "old" => Ok(Resolution::PreferOld),
            "merge" => Ok(Resolution::Merge),
            "uncertain" => Ok(Resolution::Uncertain),
            _ => Err(format!("Unknown resolution: {}", s)),
        }
    }
}

/// A new fact that contradicts a stored one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactConflict {
    pub old_fact: ExtractedFact,
    pub new_fact: ExtractedFact,
    pub conflict_type: ConflictType,
    pub resolution: Resolution,
    /// Confidence in the resolution (0.0 to 1.0)
    pub confidence: f64,
}

impl FactConflict {
    /// The object value that survives the resolution, if the resolution picks one
    pub fn winning_object(&self) -> Option<&str> {
        match self.resolution {
            Resolution::PreferNew => Some(&self.new_fact.object),
            Resolution::PreferOld => Some(&self.old_fact.object),
            Resolution::Merge | Resolution::Uncertain => None,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
