//! Correction intent classifier
//!
//! A keyword-membership check, deliberately cheap. False positives only cost an
//! extra gateway round trip.

use serde::{Deserialize, Serialize};

use crate::text::{first_match, normalize};

/// Explicit requests to forget something
const DELETE_PHRASES: &[&str] = &[
    "forget that",
    "forget about",
    "forget it",
    "forget",
    "delete that",
    "delete",
    "remove that",
    "erase that",
    "don't remember",
    "stop remembering",
];

/// Statements that replace a previous value
const UPDATE_PHRASES: &[&str] = &[
    "actually",
    "correction",
    "i meant",
    "i mean",
    "that's wrong",
    "that's not right",
    "that is wrong",
    "not anymore",
    "no longer",
    "changed my mind",
    "update that",
    "let me correct",
];

/// Bare negations; weakest signal
const NEGATION_PHRASES: &[&str] = &["that's not true", "not true", "incorrect", "wrong", "nope"];

/// What kind of correction the user is asking for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionIntent {
    Update,
    Delete,
    Negation,
}

impl CorrectionIntent {
    /// Fixed confidence for each intent kind
    pub fn confidence(&self) -> f64 {
        match self {
            CorrectionIntent::Delete => 0.9,
            CorrectionIntent::Update => 0.8,
            CorrectionIntent::Negation => 0.6,
        }
    }

    fn phrases(&self) -> &'static [&'static str] {
        match self {
            CorrectionIntent::Delete => DELETE_PHRASES,
            CorrectionIntent::Update => UPDATE_PHRASES,
            CorrectionIntent::Negation => NEGATION_PHRASES,
        }
    }
}

impl std::fmt::Display for CorrectionIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorrectionIntent::Update => write!(f, "update"),
            CorrectionIntent::Delete => write!(f, "delete"),
            CorrectionIntent::Negation => write!(f, "negation"),
        }
    }
}

/// A detected correction intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionIntentMatch {
    pub intent: CorrectionIntent,
    pub matched_pattern: String,
    pub confidence: f64,
}

/// Classify a message as a correction request, or `None` for ordinary chatter.
///
/// Deletion phrases are checked first, then update phrases, then negations.
pub fn detect_correction_intent(message: &str) -> Option<CorrectionIntentMatch> {
    let normalized = normalize(message);
    [
        CorrectionIntent::Delete,
        CorrectionIntent::Update,
        CorrectionIntent::Negation,
    ]
    .into_iter()
    .find_map(|intent| {
        first_match(&normalized, intent.phrases()).map(|phrase| CorrectionIntentMatch {
            intent,
            matched_pattern: phrase.to_string(),
            confidence: intent.confidence(),
        })
    })
}
