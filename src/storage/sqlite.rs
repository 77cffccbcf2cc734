//! SQLite document store implementation

use crate::storage::traits::{DocumentStore, StorageError, StorageResult};
use crate::storage::DocumentRecord;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Mutex;

/// Document store backed by a SQLite database file
///
/// The connection lives behind a mutex; every trait method takes the lock
/// for the duration of one statement.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database at the given path
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Opens an in-memory database (used by tests)
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> StorageResult<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS documents (
                doc_id       INTEGER PRIMARY KEY,
                url          TEXT NOT NULL UNIQUE,
                title        TEXT NOT NULL,
                content      TEXT NOT NULL,
                content_type TEXT NOT NULL,
                fetched_at   TEXT NOT NULL
            );",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn record_from_row(row: &Row<'_>) -> rusqlite::Result<(u64, String, String, String, String, String)> {
        Ok((
            row.get::<_, i64>(0)? as u64,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
        ))
    }

    fn build_record(
        (doc_id, url, title, content, content_type, fetched_at): (
            u64,
            String,
            String,
            String,
            String,
            String,
        ),
    ) -> StorageResult<DocumentRecord> {
        let fetched_at = DateTime::parse_from_rfc3339(&fetched_at)
            .map_err(|e| StorageError::CorruptRecord(doc_id, e.to_string()))?
            .with_timezone(&Utc);

        Ok(DocumentRecord {
            doc_id,
            url,
            title,
            content,
            content_type,
            fetched_at,
        })
    }
}

impl DocumentStore for SqliteStore {
    fn put(&self, record: &DocumentRecord) -> StorageResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO documents (doc_id, url, title, content, content_type, fetched_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.doc_id as i64,
                record.url,
                record.title,
                record.content,
                record.content_type,
                record.fetched_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn get_info(&self, doc_id: u64) -> StorageResult<Option<DocumentRecord>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT doc_id, url, title, content, content_type, fetched_at
                 FROM documents WHERE doc_id = ?1",
                params![doc_id as i64],
                Self::record_from_row,
            )
            .optional()?;

        row.map(Self::build_record).transpose()
    }

    fn all_documents(&self) -> StorageResult<Vec<DocumentRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT doc_id, url, title, content, content_type, fetched_at
             FROM documents ORDER BY doc_id",
        )?;

        let rows = stmt.query_map([], Self::record_from_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(Self::build_record(row?)?);
        }
        Ok(records)
    }

    fn count(&self) -> StorageResult<u64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn max_doc_id(&self) -> StorageResult<u64> {
        let conn = self.conn.lock().unwrap();
        let max: Option<i64> =
            conn.query_row("SELECT MAX(doc_id) FROM documents", [], |row| row.get(0))?;
        Ok(max.unwrap_or(0) as u64)
    }
}
