//! Pattern-based fact extraction
//!
//! A fixed, ordered table of rules. Every rule is tried against every message and
//! every match becomes its own candidate fact, so one sentence can yield several
//! facts. Rules match case-insensitively, which is equivalent to matching the
//! lower-cased message while keeping the original casing of extracted values
//! ("Rex" stays "Rex").

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::memory::ExtractedFact;

/// Values longer than this are almost always a runaway capture
const MAX_OBJECT_CHARS: usize = 80;

/// Where a fact component comes from
#[derive(Debug, Clone, Copy)]
pub enum Slot {
    /// A capture group of the rule's pattern
    Capture(usize),
    /// A constant
    Fixed(&'static str),
    /// A constant prefix joined to a capture group ("favorite_" + "color")
    Prefixed(&'static str, usize),
}

/// One row of the extraction table
#[derive(Debug, Clone, Copy)]
pub struct ExtractionRule {
    /// Stable rule name, used in logs
    pub name: &'static str,
    pub pattern: &'static str,
    pub subject: Slot,
    pub predicate: Slot,
    pub object: Slot,
    /// Fixed confidence assigned to every fact this rule produces
    pub confidence: f64,
}

/// Extraction rules, evaluated in order
pub const EXTRACTION_RULES: &[ExtractionRule] = &[
    ExtractionRule {
        name: "possession_named",
        pattern: r"(?i)\bmy\s+(\w+)\s+is\s+(?:named|called)\s+([\w'-]+)",
        subject: Slot::Capture(1),
        predicate: Slot::Fixed("named"),
        object: Slot::Capture(2),
        confidence: 0.9,
    },
    ExtractionRule {
        name: "possession_name_is",
        pattern: r"(?i)\bmy\s+(\w+)'s\s+name\s+is\s+([\w'-]+)",
        subject: Slot::Capture(1),
        predicate: Slot::Fixed("named"),
        object: Slot::Capture(2),
        confidence: 0.9,
    },
    ExtractionRule {
        name: "have_named",
        pattern: r"(?i)\bi\s+have\s+an?\s+(\w+)\s+(?:named|called)\s+([\w'-]+)",
        subject: Slot::Capture(1),
        predicate: Slot::Fixed("named"),
        object: Slot::Capture(2),
        confidence: 0.85,
    },
    ExtractionRule {
        name: "user_name",
        pattern: r"(?i)\bmy\s+name\s+is\s+([\w'-]+)",
        subject: Slot::Fixed("user"),
        predicate: Slot::Fixed("name"),
        object: Slot::Capture(1),
        confidence: 0.95,
    },
    ExtractionRule {
        name: "favorite",
        pattern: r"(?i)\bmy\s+favou?rite\s+(\w+)\s+is\s+([^.,!?;:\n]+)",
        subject: Slot::Fixed("user"),
        predicate: Slot::Prefixed("favorite_", 1),
        object: Slot::Capture(2),
        confidence: 0.85,
    },
    ExtractionRule {
        name: "likes",
        pattern: r"(?i)\bi\s+(?:really\s+|absolutely\s+)?(?:love|like|enjoy|adore)\s+([^.,!?;:\n]+)",
        subject: Slot::Capture(1),
        predicate: Slot::Fixed("preference"),
        object: Slot::Fixed("likes"),
        confidence: 0.75,
    },
    ExtractionRule {
        name: "dislikes",
        pattern: r"(?i)\bi\s+(?:really\s+)?(?:hate|dislike|detest|can't\s+stand)\s+([^.,!?;:\n]+)",
        subject: Slot::Capture(1),
        predicate: Slot::Fixed("preference"),
        object: Slot::Fixed("dislikes"),
        confidence: 0.75,
    },
    ExtractionRule {
        name: "lives_in",
        pattern: r"(?i)\bi(?:\s+am|'m)?\s+(?:live|living)\s+in\s+([^.,!?;:\n]+)",
        subject: Slot::Fixed("user"),
        predicate: Slot::Fixed("lives_in"),
        object: Slot::Capture(1),
        confidence: 0.85,
    },
    ExtractionRule {
        name: "from",
        pattern: r"(?i)\bi(?:\s+am|'m)\s+from\s+([^.,!?;:\n]+)",
        subject: Slot::Fixed("user"),
        predicate: Slot::Fixed("from"),
        object: Slot::Capture(1),
        confidence: 0.8,
    },
    ExtractionRule {
        name: "occupation",
        pattern: r"(?i)\bi\s+work\s+as\s+(?:an?\s+)?([^.,!?;:\n]+)",
        subject: Slot::Fixed("user"),
        predicate: Slot::Fixed("occupation"),
        object: Slot::Capture(1),
        confidence: 0.85,
    },
    ExtractionRule {
        name: "employer",
        pattern: r"(?i)\bi\s+work\s+(?:at|for)\s+([^.,!?;:\n]+)",
        subject: Slot::Fixed("user"),
        predicate: Slot::Fixed("employer"),
        object: Slot::Capture(1),
        confidence: 0.85,
    },
    ExtractionRule {
        name: "age",
        pattern: r"(?i)\bi(?:\s+am|'m)\s+(\d{1,3})\s+years?\s+old\b",
        subject: Slot::Fixed("user"),
        predicate: Slot::Fixed("age"),
        object: Slot::Capture(1),
        confidence: 0.9,
    },
    ExtractionRule {
        name: "allergy",
        pattern: r"(?i)\bi(?:\s+am|'m)\s+allergic\s+to\s+([^.,!?;:\n]+)",
        subject: Slot::Capture(1),
        predicate: Slot::Fixed("allergy"),
        object: Slot::Fixed("allergic"),
        confidence: 0.9,
    },
    ExtractionRule {
        name: "birthday",
        pattern: r"(?i)\bmy\s+birthday\s+is\s+(?:on\s+)?([^.,!?;:\n]+)",
        subject: Slot::Fixed("user"),
        predicate: Slot::Fixed("birthday"),
        object: Slot::Capture(1),
        confidence: 0.9,
    },
];

struct CompiledRule {
    rule: &'static ExtractionRule,
    regex: Regex,
}

static COMPILED_RULES: Lazy<Vec<CompiledRule>> = Lazy::new(|| {
    EXTRACTION_RULES
        .iter()
        .filter_map(|rule| match Regex::new(rule.pattern) {
            Ok(regex) => Some(CompiledRule { rule, regex }),
            Err(e) => {
                tracing::warn!(rule = rule.name, "Skipping extraction rule: {}", e);
                None
            }
        })
        .collect()
});

static TRAILING_CLAUSE: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"(?i)\s+(?:and|but|because|so|too|very much|a lot)\b.*$").ok()
});

/// Stateless fact extractor over [`EXTRACTION_RULES`]
#[derive(Debug, Clone, Copy, Default)]
pub struct FactExtractor;

impl FactExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract every fact the rule table finds in `text`, stamped now.
    ///
    /// Unmatched or malformed text yields an empty list, never an error.
    pub fn extract(&self, text: &str, owner_id: &str) -> Vec<ExtractedFact> {
        self.extract_at(text, owner_id, Utc::now())
    }

    /// Same as [`FactExtractor::extract`] with an explicit observation time
    pub fn extract_at(
        &self,
        text: &str,
        owner_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Vec<ExtractedFact> {
        let normalized = text.replace(['\u{2019}', '\u{2018}'], "'");
        if normalized.trim().is_empty() {
            return Vec::new();
        }

        let mut facts = Vec::new();
        for compiled in COMPILED_RULES.iter() {
            for caps in compiled.regex.captures_iter(&normalized) {
                let Some(fact) = build_fact(compiled.rule, &caps, text, owner_id, timestamp)
                else {
                    continue;
                };
                tracing::debug!(
                    rule = compiled.rule.name,
                    subject = %fact.subject,
                    predicate = %fact.predicate,
                    "Extracted fact"
                );
                facts.push(fact);
            }
        }
        facts
    }
}

fn build_fact(
    rule: &ExtractionRule,
    caps: &Captures<'_>,
    source: &str,
    owner_id: &str,
    timestamp: DateTime<Utc>,
) -> Option<ExtractedFact> {
    let subject = strip_article(&resolve(rule.subject, caps)?);
    let predicate = resolve(rule.predicate, caps)?;
    let object = resolve(rule.object, caps)?;

    if subject.is_empty() || predicate.is_empty() || object.is_empty() {
        return None;
    }
    if object.chars().count() > MAX_OBJECT_CHARS || subject.chars().count() > MAX_OBJECT_CHARS {
        return None;
    }

    Some(
        ExtractedFact::new(owner_id, subject, predicate.replace(' ', "_"), object, rule.confidence)
            .with_source(source)
            .with_timestamp(timestamp),
    )
}

fn resolve(slot: Slot, caps: &Captures<'_>) -> Option<String> {
    let value = match slot {
        Slot::Fixed(value) => value.to_string(),
        Slot::Capture(i) => clean_value(caps.get(i)?.as_str()),
        Slot::Prefixed(prefix, i) => {
            format!("{}{}", prefix, clean_value(caps.get(i)?.as_str()).to_lowercase())
        }
    };
    Some(value)
}

/// Trim whitespace, trailing punctuation and dangling clauses
fn clean_value(raw: &str) -> String {
    let mut value = raw.trim().to_string();
    if let Some(re) = TRAILING_CLAUSE.as_ref() {
        value = re.replace(&value, "").into_owned();
    }
    value
        .trim_matches(|c: char| c.is_whitespace() || "\"'()[]".contains(c))
        .to_string()
}

fn strip_article(subject: &str) -> String {
    let lower = subject.to_lowercase();
    for article in ["the ", "a ", "an "] {
        if let Some(rest) = lower.strip_prefix(article) {
            return rest.trim().to_string();
        }
    }
    lower
}

// ============================================================================
// TESTS
// ============================================================================
