//! Origin-scoped key-value storage.
//!
//! A synchronous string-to-string store, the local equivalent of a browser's
//! `localStorage`. The SQLite implementation keeps every origin's keys in one
//! table; the in-memory implementation backs tests and throwaway sessions.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// How long a write waits for another process holding the database lock
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS local_storage (
    origin TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TIMESTAMP NOT NULL,
    PRIMARY KEY (origin, key)
);
";

/// Synchronous string-keyed storage
pub trait KeyValueStore {
    /// Read a value, `None` when the key was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// SQLite-backed store scoped to one origin
pub struct SqliteStore {
    conn: Connection,
    origin: String,
}

impl SqliteStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>, origin: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let is_new = !path.exists();

        debug!(path = %path.display(), "Opening local storage");

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create storage directory: {}", parent.display())
                })?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open local storage at {}", path.display()))?;

        Self::with_connection(conn, origin, is_new)
    }

    /// Store living only as long as this value
    pub fn open_in_memory(origin: impl Into<String>) -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory storage")?;
        Self::with_connection(conn, origin, true)
    }

    fn with_connection(conn: Connection, origin: impl Into<String>, is_new: bool) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)
            .context("Failed to set storage busy timeout")?;
        conn.execute_batch(SCHEMA)
            .context("Failed to create local storage schema")?;

        if is_new {
            info!("Created local storage schema");
        }

        Ok(Self {
            conn,
            origin: origin.into(),
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// When `key` was last written, if ever
    pub fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        self.conn
            .query_row(
                "SELECT updated_at FROM local_storage WHERE origin = ?1 AND key = ?2",
                params![self.origin, key],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to read storage timestamp")
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM local_storage WHERE origin = ?1 AND key = ?2",
                params![self.origin, key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read key '{}'", key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO local_storage (origin, key, value, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(origin, key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at",
                params![self.origin, key, value, Utc::now()],
            )
            .with_context(|| format!("Failed to write key '{}'", key))?;

        debug!(origin = %self.origin, key = key, bytes = value.len(), "Stored value");
        Ok(())
    }
}

/// Store backed by a plain map
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}
