//! Multi-space vector store contract
//!
//! Each named space is an independent similarity index. Records come back as
//! [`RankedRecord`]s: `content` and `timestamp` are interpreted, everything else
//! rides along untouched in `payload`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::storage::StoreError;

/// Meaning of the message text
pub const CONTENT_SPACE: &str = "content";
/// Conceptual / pattern similarity
pub const SEMANTIC_SPACE: &str = "semantic";
/// Emotional tone
pub const EMOTION_SPACE: &str = "emotion";

/// One entry of a ranked list returned by a vector space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecord {
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Backend similarity score; informational only, fusion uses rank
    #[serde(default)]
    pub score: f64,
    /// Opaque pass-through fields
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl RankedRecord {
    pub fn new(content: impl Into<String>, timestamp: Option<DateTime<Utc>>, score: f64) -> Self {
        Self {
            content: content.into(),
            timestamp,
            score,
            payload: Map::new(),
        }
    }

    /// Attach an opaque payload field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// String payload field, if present
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }
}

/// A query against one or more spaces.
///
/// Embedding the text is the caller's job; `vector` is forwarded as given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpaceQuery {
    pub owner_id: String,
    pub text: String,
    #[serde(default)]
    pub vector: Option<Vec<f32>>,
}

impl SpaceQuery {
    pub fn new(owner_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            text: text.into(),
            vector: None,
        }
    }

    pub fn with_vector(mut self, vector: Vec<f32>) -> Self {
        self.vector = Some(vector);
        self
    }
}

/// Collaborator interface to a multi-space vector store.
///
/// Timeouts and retries belong to the implementation.
pub trait VectorStore: Send + Sync {
    /// Ranked search in one space, best first
    fn search(
        &self,
        space: &str,
        query: &SpaceQuery,
        limit: usize,
    ) -> Result<Vec<RankedRecord>, StoreError>;

    /// Unranked listing of an owner's records in one space
    fn scroll(
        &self,
        space: &str,
        owner_id: &str,
        limit: usize,
    ) -> Result<Vec<RankedRecord>, StoreError>;
}

impl<S: VectorStore + ?Sized> VectorStore for std::sync::Arc<S> {
    fn search(
        &self,
        space: &str,
        query: &SpaceQuery,
        limit: usize,
    ) -> Result<Vec<RankedRecord>, StoreError> {
        (**self).search(space, query, limit)
    }

    fn scroll(
        &self,
        space: &str,
        owner_id: &str,
        limit: usize,
    ) -> Result<Vec<RankedRecord>, StoreError> {
        (**self).scroll(space, owner_id, limit)
    }
}
