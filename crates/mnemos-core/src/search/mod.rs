//! Search Module
//!
//! Multi-space retrieval:
//! - [`VectorStore`] collaborator contract and [`RankedRecord`] result shape
//! - Reciprocal Rank Fusion across spaces
//! - Keyword policy deciding when fusion is worth it

mod fusion;
mod policy;
mod space;

pub use fusion::{
    FusedRecord, FusionConfig, FusionMetadata, RankFusionEngine, reciprocal_rank_fusion,
    record_identity,
};
pub use policy::FusionCoordinator;
pub use space::{
    CONTENT_SPACE, EMOTION_SPACE, RankedRecord, SEMANTIC_SPACE, SpaceQuery, VectorStore,
};
