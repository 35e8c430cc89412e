//! Test Database Manager
//!
//! Provides isolated fact stores for testing:
//! - Temporary SQLite databases that are cleaned up on drop
//! - Ingestion and correction services wired to the same store
//! - Reopening the same file to check persistence

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mnemos_core::{
    ExtractedFact, FactIngestor, FactStore, MemoryCorrectionGateway, SqliteFactStore,
};
use tempfile::TempDir;

/// Manager for test databases
///
/// # Example
///
/// ```rust,ignore
/// let db = TestDatabaseManager::new_temp();
/// db.ingestor().ingest("My dog is named Rex", "user-1")?;
/// assert_eq!(db.facts_about("user-1", "dog")[0].object, "Rex");
/// ```
pub struct TestDatabaseManager {
    /// The fact store
    pub store: Arc<SqliteFactStore>,
    /// Temporary directory (kept alive to prevent premature deletion)
    _temp_dir: TempDir,
    db_path: PathBuf,
}

impl TestDatabaseManager {
    /// Create a new store in a temporary directory
    pub fn new_temp() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test_mnemos.db");
        let store = SqliteFactStore::new(Some(db_path.clone())).expect("Failed to create test store");

        Self {
            store: Arc::new(store),
            _temp_dir: temp_dir,
            db_path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// The store as the trait object the services take
    pub fn fact_store(&self) -> Arc<dyn FactStore> {
        self.store.clone()
    }

    pub fn ingestor(&self) -> FactIngestor {
        FactIngestor::new(self.fact_store())
    }

    pub fn gateway(&self) -> MemoryCorrectionGateway {
        MemoryCorrectionGateway::new(self.fact_store())
    }

    /// Stored facts for `owner_id` about `subject`
    pub fn facts_about(&self, owner_id: &str, subject: &str) -> Vec<ExtractedFact> {
        self.store
            .query(owner_id, Some(subject))
            .expect("Failed to query facts")
    }

    /// Open a second handle on the same database file
    pub fn reopen(&self) -> SqliteFactStore {
        SqliteFactStore::new(Some(self.db_path.clone())).expect("Failed to reopen test store")
    }
}
