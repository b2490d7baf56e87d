//! Key-value storage layer for tracelink.
//!
//! Entries are persisted the way a browser app would use `localStorage`: one
//! string value per key. [`Storage`] keeps the pairs in `SQLite`;
//! [`MemoryStorage`] keeps them in a map and is used where nothing should
//! touch disk.

mod memory;
pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};

pub use memory::MemoryStorage;

/// A string-to-string store with `localStorage` semantics.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Returns `true` if it was present.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove_item(&mut self, key: &str) -> Result<bool>;
}

/// `SQLite`-backed key-value store.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let mut conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        migrations::initialize_schema(&mut conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&mut conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r"
            INSERT INTO local_storage (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value],
        )?;
        debug!(key, bytes = value.len(), "Stored value");
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM local_storage WHERE key = ?1", [key])?;
        Ok(affected > 0)
    }
}
