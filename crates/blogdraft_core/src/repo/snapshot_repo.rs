//! Named key-value entry repository.
//!
//! # Responsibility
//! - Persist serialized editor state under a named key.
//!
//! # Invariants
//! - `save` is an upsert; the last write wins, no merge is attempted.
//! - Values are opaque text to this layer.

use super::{ensure_table_ready, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Repository interface for local key-value entries.
pub trait KvRepository {
    /// Loads the value stored under `key`.
    fn load(&self, key: &str) -> RepoResult<Option<String>>;
    /// Stores `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Removes `key`. Returns whether an entry existed.
    fn delete(&self, key: &str) -> RepoResult<bool>;
}

/// SQLite-backed key-value repository.
pub struct SqliteKvRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "kv_entries", &["entry_key", "entry_value", "updated_at"])?;
        Ok(Self { conn })
    }
}

impl KvRepository for SqliteKvRepository<'_> {
    fn load(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT entry_value
                 FROM kv_entries
                 WHERE entry_key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (entry_key, entry_value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(entry_key) DO UPDATE SET
                entry_value = excluded.entry_value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM kv_entries WHERE entry_key = ?1;", [key])?;
        Ok(changed > 0)
    }
}
