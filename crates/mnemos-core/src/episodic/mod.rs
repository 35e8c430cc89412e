//! Episodic memory
//!
//! Memorable-moment scoring, character insights and query-time recall. All of it
//! is recomputed from conversation records on demand; nothing here persists.

mod insights;
mod memorability;
mod recall;

pub use insights::{InsightConfig, InsightDeriver, TOPIC_BUCKETS};
pub use memorability::{MemorabilityAnalyzer, MemorabilityConfig};
pub use recall::{EpisodicRecall, RecallConfig, RecallResponse, RecalledMemory};
