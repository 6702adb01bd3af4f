use crate::domain::SealedRecord;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    #[error("Database connection lock poisoned")]
    Poisoned,
}

/// Result of an insert attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Inserted,
    /// A record with the same fingerprint already exists; nothing was written.
    Duplicate,
}

/// Persistence for sealed records.
///
/// Implementations must make `insert` atomic: the uniqueness check and the
/// write happen as one step, so two concurrent inserts of the same
/// fingerprint yield exactly one `Inserted`.
pub trait SealStore: Send + Sync {
    fn insert(&self, record: &SealedRecord) -> Result<Insertion, StorageError>;
    fn find_by_fingerprint(&self, fingerprint: &str)
        -> Result<Option<SealedRecord>, StorageError>;
    /// Newest first.
    fn find_by_signer(&self, signer: &str) -> Result<Vec<SealedRecord>, StorageError>;
    /// Newest first, at most `limit` records.
    fn recent(&self, limit: usize) -> Result<Vec<SealedRecord>, StorageError>;
    fn count(&self) -> Result<usize, StorageError>;
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

const SELECT_COLUMNS: &str = "SELECT fingerprint, content, signer, sealed_at, release_at
     FROM sealed_records";

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        let _: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn new_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<(), StorageError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sealed_records (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                fingerprint TEXT UNIQUE NOT NULL,
                content TEXT NOT NULL,
                signer TEXT NOT NULL,
                sealed_at INTEGER NOT NULL,
                release_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sealed_records_signer
                ON sealed_records(signer, sealed_at);

            CREATE INDEX IF NOT EXISTS idx_sealed_records_sealed_at
                ON sealed_records(sealed_at);",
        )?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }

    fn row_to_record(row: &rusqlite::Row) -> Result<SealedRecord, rusqlite::Error> {
        Ok(SealedRecord {
            fingerprint: row.get(0)?,
            content: row.get(1)?,
            signer: row.get(2)?,
            sealed_at: millis_to_datetime(3, row.get(3)?)?,
            release_at: millis_to_datetime(4, row.get(4)?)?,
        })
    }
}

fn millis_to_datetime(column: usize, millis: i64) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::from_timestamp_millis(millis)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(column, millis))
}

impl SealStore for SqliteStore {
    fn insert(&self, record: &SealedRecord) -> Result<Insertion, StorageError> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "INSERT OR IGNORE INTO sealed_records (fingerprint, content, signer, sealed_at, release_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &record.fingerprint,
                &record.content,
                &record.signer,
                record.sealed_at.timestamp_millis(),
                record.release_at.timestamp_millis()
            ],
        )?;

        if changed == 1 {
            Ok(Insertion::Inserted)
        } else {
            Ok(Insertion::Duplicate)
        }
    }

    fn find_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> Result<Option<SealedRecord>, StorageError> {
        let conn = self.lock()?;
        let record = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE fingerprint = ?1"),
                params![fingerprint],
                Self::row_to_record,
            )
            .optional()?;

        Ok(record)
    }

    fn find_by_signer(&self, signer: &str) -> Result<Vec<SealedRecord>, StorageError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE signer = ?1 ORDER BY sealed_at DESC, seq DESC"
        ))?;
        let records = stmt
            .query_map(params![signer], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn recent(&self, limit: usize) -> Result<Vec<SealedRecord>, StorageError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} ORDER BY sealed_at DESC, seq DESC LIMIT ?1"
        ))?;
        let records = stmt
            .query_map(params![limit], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn count(&self) -> Result<usize, StorageError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM sealed_records", [], |row| {
            row.get(0)
        })?;

        usize::try_from(count)
            .map_err(|_| StorageError::SqliteError(rusqlite::Error::IntegralValueOutOfRange(0, count)))
    }
}
