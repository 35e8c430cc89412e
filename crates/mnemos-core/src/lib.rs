//! # Mnemos Core
//!
//! Memory intelligence for conversational agents. Turns plain conversation text
//! into durable structured facts, notices when new statements contradict what is
//! already known, fuses results from several vector spaces into one ranking and
//! picks out the exchanges worth resurfacing later.
//!
//! - **Fact Extraction**: ordered regex rule table, one candidate fact per match
//! - **Conflict Detection**: same subject and predicate, different object; newest wins
//! - **Memory Correction**: explicit update / delete / search for a tool-calling agent
//! - **Rank Fusion**: weighted Reciprocal Rank Fusion across named vector spaces
//! - **Fusion Policy**: keyword classifier deciding whether fusion is worth it
//! - **Episodic Memory**: additive memorability scoring, character insights, recall
//!
//! Storage and vector search are collaborators behind the [`FactStore`] and
//! [`VectorStore`] traits. A SQLite fact store ships with the crate.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mnemos_core::prelude::*;
//!
//! let store = Arc::new(SqliteFactStore::new(None)?);
//! let ingestor = FactIngestor::new(store.clone());
//!
//! ingestor.ingest("My dog is named Rex", "user-1")?;
//! let report = ingestor.ingest("My dog is named Max", "user-1")?;
//! assert_eq!(report.conflicts[0].old_fact.object, "Rex");
//!
//! let gateway = MemoryCorrectionGateway::new(store);
//! let found = gateway.search_facts("user-1", "dog", None)?;
//! assert_eq!(found.facts[0].object, "Max");
//! ```
//!
//! ## Feature Flags
//!
//! - `bundled-sqlite` (default): Bundle SQLite with the crate
//! - `encryption`: SQLCipher; the key is read from `MNEMOS_ENCRYPTION_KEY`

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod correction;
pub mod episodic;
pub mod error;
pub mod facts;
pub mod memory;
pub mod search;
pub mod storage;

mod text;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use error::{MEMORY_UNAVAILABLE, MemoryError, Result};

// Memory types
pub use memory::{
    CharacterInsight, ConflictType, ContextType, ConversationRecord, EmotionSignal,
    EpisodicMemory, ExtractedFact, FactConflict, FactKey, InsightType, Resolution,
};

// Facts
pub use facts::{ConflictDetector, FactExtractor, FactIngestor, IngestReport};

// Corrections
pub use correction::{
    CorrectionIntent, CorrectionIntentMatch, DeleteFactRequest, DeleteOutcome, DeleteScope,
    FactSearchOutcome, MemoryCorrectionGateway, UpdateFactRequest, UpdateOutcome,
    detect_correction_intent,
};

// Search
pub use search::{
    FusedRecord, FusionConfig, FusionCoordinator, FusionMetadata, RankFusionEngine,
    RankedRecord, SpaceQuery, VectorStore, reciprocal_rank_fusion,
};

// Episodic
pub use episodic::{
    EpisodicRecall, InsightConfig, InsightDeriver, MemorabilityAnalyzer, MemorabilityConfig,
    RecallConfig, RecallResponse, RecalledMemory,
};

// Storage
pub use storage::{FactStore, InMemoryFactStore, SqliteFactStore, StoreError};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        ConflictDetector, ExtractedFact, FactConflict, FactExtractor, FactIngestor, FactStore,
        MemoryCorrectionGateway, MemoryError, Resolution, Result, SqliteFactStore,
        detect_correction_intent,
    };

    pub use crate::{FusionCoordinator, RankFusionEngine, RankedRecord, SpaceQuery, VectorStore};

    pub use crate::{
        ConversationRecord, EmotionSignal, EpisodicRecall, InsightDeriver, MemorabilityAnalyzer,
    };
}
