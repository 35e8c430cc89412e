//! Storage Module
//!
//! The fact store collaborator interface plus two bundled implementations:
//! - SQLite-backed store with a `(owner_id, subject, predicate)` unique index
//! - In-memory store for tests and ephemeral sessions
//!
//! The core never issues raw queries; it only calls the typed operations on
//! [`FactStore`]. Races between concurrent writers for the same key are settled
//! by the store: the last write it observes wins.

mod memory;
mod migrations;
mod sqlite;

pub use memory::InMemoryFactStore;
pub use migrations::MIGRATIONS;
pub use sqlite::SqliteFactStore;

use crate::memory::ExtractedFact;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Collaborator failure (store unavailable, I/O, corrupt rows)
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid timestamp
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
    /// A mutex guarding a connection was poisoned by a panicking writer
    #[error("Lock poisoned: {0}")]
    LockPoisoned(&'static str),
    /// Remote backend failure reported by a store client
    #[error("{backend} unavailable: {source}")]
    Unavailable {
        backend: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    /// Wrap an arbitrary client error from a remote backend
    pub fn unavailable(
        backend: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        StoreError::Unavailable {
            backend: backend.into(),
            source: source.into(),
        }
    }
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StoreError>;

// ============================================================================
// FACT STORE
// ============================================================================

/// Persistence collaborator for extracted facts.
///
/// Implementations must enforce the uniqueness of `(owner_id, subject, predicate)`:
/// `upsert` of a fact whose key already exists replaces the stored fact.
/// Subject and predicate comparisons are case-insensitive; object comparison in
/// `delete_where` is case-insensitive as well.
pub trait FactStore: Send + Sync {
    /// Insert or overwrite the fact stored under the same key
    fn upsert(&self, fact: &ExtractedFact) -> Result<()>;

    /// Delete matching facts and return how many were removed.
    ///
    /// `predicate` and `object` narrow the match when present.
    fn delete_where(
        &self,
        owner_id: &str,
        subject: &str,
        predicate: Option<&str>,
        object: Option<&str>,
    ) -> Result<usize>;

    /// Facts for an owner, optionally restricted to one subject,
    /// ordered by subject then predicate
    fn query(&self, owner_id: &str, subject: Option<&str>) -> Result<Vec<ExtractedFact>>;
}

impl<S: FactStore + ?Sized> FactStore for std::sync::Arc<S> {
    fn upsert(&self, fact: &ExtractedFact) -> Result<()> {
        (**self).upsert(fact)
    }

    fn delete_where(
        &self,
        owner_id: &str,
        subject: &str,
        predicate: Option<&str>,
        object: Option<&str>,
    ) -> Result<usize> {
        (**self).delete_where(owner_id, subject, predicate, object)
    }

    fn query(&self, owner_id: &str, subject: Option<&str>) -> Result<Vec<ExtractedFact>> {
        (**self).query(owner_id, subject)
    }
}
