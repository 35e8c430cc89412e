//! Text helpers shared by the keyword classifiers.
//!
//! Every classifier in this crate works on the same normalized form: lower case,
//! typographic apostrophes folded to `'`, every other non-alphanumeric character
//! collapsed to a single space, padded with one space on each side. Phrase
//! membership is then a plain substring test on `" phrase "`, which gives word
//! boundaries for free ("art" does not match "start").

use std::collections::HashSet;

/// Words too common to count as lexical overlap.
const STOPWORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
    "one", "our", "out", "has", "him", "his", "how", "its", "who", "did", "get", "got", "let",
    "she", "too", "use", "that", "with", "have", "this", "will", "your", "from", "they", "been",
    "were", "what", "when", "them", "then", "than", "there", "their", "about", "would", "could",
    "should", "just", "like", "into", "some", "more", "also", "we",
];

/// Normalize text for phrase matching.
pub(crate) fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push(' ');
    let mut last_space = true;
    for ch in text.chars() {
        let ch = match ch {
            '\u{2019}' | '\u{2018}' | '`' => '\'',
            c => c,
        };
        if ch.is_alphanumeric() || ch == '\'' {
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
            last_space = false;
        } else if !last_space {
            out.push(' ');
            last_space = true;
        }
    }
    if !last_space {
        out.push(' ');
    }
    out
}

/// Check a normalized haystack (see [`normalize`]) for a phrase on word boundaries.
pub(crate) fn contains_phrase(normalized: &str, phrase: &str) -> bool {
    let needle = normalize(phrase);
    if needle.trim().is_empty() {
        return false;
    }
    normalized.contains(&needle)
}

/// First phrase from `phrases` present in the normalized haystack.
pub(crate) fn first_match<'a>(normalized: &str, phrases: &[&'a str]) -> Option<&'a str> {
    phrases
        .iter()
        .copied()
        .find(|phrase| contains_phrase(normalized, phrase))
}

/// Count how many of `phrases` occur in the normalized haystack.
pub(crate) fn count_matches(normalized: &str, phrases: &[&str]) -> usize {
    phrases
        .iter()
        .filter(|phrase| contains_phrase(normalized, phrase))
        .count()
}

/// Content-bearing tokens: normalized words of three or more characters, minus stopwords.
pub(crate) fn content_tokens(text: &str) -> HashSet<String> {
    normalize(text)
        .split_whitespace()
        .map(|w| w.trim_matches('\''))
        .filter(|w| w.chars().count() >= 3 && !STOPWORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Truncate on a char boundary, appending an ellipsis when anything was cut.
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}
