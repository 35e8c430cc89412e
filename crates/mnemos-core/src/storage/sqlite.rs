//! SQLite Fact Store
//!
//! Persistent [`FactStore`] with separate reader/writer connections. The
//! `UNIQUE(owner_id, subject, predicate)` constraint is the serialization point
//! for concurrent corrections: `upsert` is an `ON CONFLICT DO UPDATE`, so the
//! last write SQLite observes wins.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use rusqlite::{Connection, params};
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

use super::{FactStore, Result, StoreError};
use crate::memory::{ExtractedFact, objects_match};

/// Raw row before timestamp parsing
type FactRow = (String, String, String, String, f64, String, String);

/// SQLite-backed fact store.
///
/// All methods take `&self`, so the store can be shared as `Arc<SqliteFactStore>`.
pub struct SqliteFactStore {
    writer: Mutex<Connection>,
    reader: Mutex<Connection>,
    path: PathBuf,
}

impl SqliteFactStore {
    /// Apply PRAGMAs and optional encryption to a connection
    fn configure_connection(conn: &Connection) -> Result<()> {
        // Apply encryption key if SQLCipher is enabled and key is provided
        #[cfg(feature = "encryption")]
        {
            if let Ok(key) = std::env::var("MNEMOS_ENCRYPTION_KEY") {
                if !key.is_empty() {
                    conn.pragma_update(None, "key", &key)?;
                }
            }
        }

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA temp_store = MEMORY;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;

        Ok(())
    }

    /// Default database location in the platform data directory
    pub fn default_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "mnemos", "core").ok_or_else(|| {
            StoreError::Init("Could not determine project directories".to_string())
        })?;

        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;
        // Restrict directory permissions to owner-only on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o700);
            let _ = std::fs::set_permissions(data_dir, perms);
        }
        Ok(data_dir.join("mnemos.db"))
    }

    /// Open (or create) the store. `None` uses [`SqliteFactStore::default_path`].
    pub fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = match db_path {
            Some(p) => {
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                p
            }
            None => Self::default_path()?,
        };

        let writer_conn = Connection::open(&path)?;

        // Restrict database file permissions to owner-only on Unix
        #[cfg(unix)]
        if path.exists() {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&path, perms);
        }

        Self::configure_connection(&writer_conn)?;

        // Apply migrations on writer only
        super::migrations::apply_migrations(&writer_conn)?;

        let reader_conn = Connection::open(&path)?;
        Self::configure_connection(&reader_conn)?;

        tracing::debug!(path = %path.display(), "Fact store opened");

        Ok(Self {
            writer: Mutex::new(writer_conn),
            reader: Mutex::new(reader_conn),
            path,
        })
    }

    /// Location of the database file
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Total facts stored for an owner
    pub fn count(&self, owner_id: &str) -> Result<usize> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StoreError::LockPoisoned("reader"))?;
        let count: i64 = reader.query_row(
            "SELECT COUNT(*) FROM facts WHERE owner_id = ?1",
            params![owner_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Number of deletions recorded in the audit table for an owner
    pub fn deletion_events(&self, owner_id: &str) -> Result<usize> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StoreError::LockPoisoned("reader"))?;
        let count: i64 = reader.query_row(
            "SELECT COUNT(*) FROM fact_deletions WHERE owner_id = ?1",
            params![owner_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn row_to_fact(row: FactRow) -> Result<ExtractedFact> {
        let (owner_id, subject, predicate, object, confidence, source_text, timestamp) = row;
        let timestamp = DateTime::parse_from_rfc3339(&timestamp)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| StoreError::InvalidTimestamp(timestamp.clone()))?;
        Ok(ExtractedFact {
            subject,
            predicate,
            object,
            confidence,
            source_text,
            timestamp,
            owner_id,
        })
    }
}

impl FactStore for SqliteFactStore {
    fn upsert(&self, fact: &ExtractedFact) -> Result<()> {
        let key = fact.key();
        let writer = self
            .writer
            .lock()
            .map_err(|_| StoreError::LockPoisoned("writer"))?;

        writer.execute(
            "INSERT INTO facts (id, owner_id, subject, predicate, object, confidence, source_text, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(owner_id, subject, predicate) DO UPDATE SET
                object = excluded.object,
                confidence = excluded.confidence,
                source_text = excluded.source_text,
                timestamp = excluded.timestamp",
            params![
                Uuid::new_v4().to_string(),
                key.owner_id,
                key.subject,
                key.predicate,
                fact.object.trim(),
                fact.confidence,
                fact.source_text,
                fact.timestamp.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn delete_where(
        &self,
        owner_id: &str,
        subject: &str,
        predicate: Option<&str>,
        object: Option<&str>,
    ) -> Result<usize> {
        let subject = subject.trim().to_lowercase();
        let predicate = predicate.map(|p| p.trim().to_lowercase());

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| StoreError::LockPoisoned("writer"))?;
        let tx = writer.transaction()?;

        let candidates: Vec<(String, String)> = {
            let mut stmt = tx.prepare(
                "SELECT id, object FROM facts
                 WHERE owner_id = ?1 AND subject = ?2 AND (?3 IS NULL OR predicate = ?3)",
            )?;
            stmt.query_map(params![owner_id, subject, predicate], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        let mut deleted = 0;
        for (id, stored_object) in candidates {
            if object.is_none_or(|o| objects_match(o, &stored_object)) {
                deleted += tx.execute("DELETE FROM facts WHERE id = ?1", params![id])?;
            }
        }

        if deleted > 0 {
            tx.execute(
                "INSERT INTO fact_deletions (owner_id, subject, predicate, object, deleted_count, deleted_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    owner_id,
                    subject,
                    predicate,
                    object,
                    deleted as i64,
                    Utc::now().to_rfc3339()
                ],
            )?;
        }

        tx.commit()?;
        Ok(deleted)
    }

    fn query(&self, owner_id: &str, subject: Option<&str>) -> Result<Vec<ExtractedFact>> {
        let subject = subject.map(|s| s.trim().to_lowercase());
        let reader = self
            .reader
            .lock()
            .map_err(|_| StoreError::LockPoisoned("reader"))?;

        let mut stmt = reader.prepare(
            "SELECT owner_id, subject, predicate, object, confidence, source_text, timestamp
             FROM facts
             WHERE owner_id = ?1 AND (?2 IS NULL OR subject = ?2)
             ORDER BY subject, predicate",
        )?;

        let rows: Vec<FactRow> = stmt
            .query_map(params![owner_id, subject], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(Self::row_to_fact).collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================
