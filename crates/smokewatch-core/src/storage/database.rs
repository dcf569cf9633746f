//! SQLite-backed key-value store.
//!
//! The durable state is a handful of per-category integers: a running count
//! and a last-reset stamp, keyed `<category>_count` and
//! `<category>_last_reset_time`. Missing keys read as zero; writes are
//! durable before the next read.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::data_dir;
use crate::error::{CoreError, DatabaseError};

/// SQLite database holding the kv table.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/smokewatch.db`.
    ///
    /// Creates the file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("smokewatch.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open at an explicit path. Tests and alternate frontends use this.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value INTEGER NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Read an integer by key. A missing key reads as 0.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn kv_get(&self, key: &str) -> Result<i64, DatabaseError> {
        let value: Option<i64> = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value.unwrap_or(0))
    }

    /// Write an integer by key, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn kv_set(&self, key: &str, value: i64) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        debug!(key, value, "kv write");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_zero() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.kv_get("cig_count").unwrap(), 0);
    }

    #[test]
    fn set_then_get() {
        let db = Database::open_memory().unwrap();
        db.kv_set("k", 7).unwrap();
        assert_eq!(db.kv_get("k").unwrap(), 7);
    }

    #[test]
    fn set_overwrites() {
        let db = Database::open_memory().unwrap();
        db.kv_set("k", 7).unwrap();
        db.kv_set("k", 0).unwrap();
        assert_eq!(db.kv_get("k").unwrap(), 0);
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smokewatch.db");

        let db = Database::open_at(&path).unwrap();
        db.kv_set("cig_count", 3).unwrap();
        db.kv_set("cig_last_reset_time", 1_700_000_000_000).unwrap();
        drop(db);

        // Simulated process restart.
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.kv_get("cig_count").unwrap(), 3);
        assert_eq!(db.kv_get("cig_last_reset_time").unwrap(), 1_700_000_000_000);
    }
}
