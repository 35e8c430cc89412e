//! Structured facts from free text
//!
//! - [`FactExtractor`]: ordered regex rule table, pure
//! - [`ConflictDetector`]: read-only comparison against stored facts
//! - [`FactIngestor`]: extraction, detection and overwrite against a [`crate::storage::FactStore`]

mod conflict;
mod extractor;
mod ingest;

pub use conflict::ConflictDetector;
pub use extractor::{EXTRACTION_RULES, ExtractionRule, FactExtractor, Slot};
pub use ingest::{FactIngestor, IngestReport};
