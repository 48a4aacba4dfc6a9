//! SQLite-backed `KeyValueStore`.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Mutex,
};

use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use super::{KeyValueStore, StoreError};

const CREATE_TABLE_SQL: &str =
    "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY NOT NULL, value TEXT NOT NULL)";
const SELECT_SQL: &str = "SELECT value FROM kv WHERE key = ?1";
const UPSERT_SQL: &str =
    "INSERT INTO kv (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value = excluded.value";

/// Error raised while opening a [`SqliteKeyValueStore`].
#[derive(Debug, Error)]
pub enum SqliteKeyValueStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Creating the key-value table failed.
    #[error("failed to prepare key-value schema: {0}")]
    Schema(#[source] rusqlite::Error),
}

/// Key-value store persisted in a single SQLite table.
///
/// Writes are single-statement upserts, so each `set` replaces the stored value
/// atomically.
pub struct SqliteKeyValueStore {
    connection: Mutex<Connection>,
}

impl fmt::Debug for SqliteKeyValueStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteKeyValueStore").finish_non_exhaustive()
    }
}

impl SqliteKeyValueStore {
    /// Open (or create) a store backed by the database at `path`.
    ///
    /// # Errors
    /// Returns [`SqliteKeyValueStoreError`] when the database cannot be opened
    /// or the table cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SqliteKeyValueStoreError> {
        let path = path.as_ref();
        let connection =
            Connection::open(path).map_err(|source| SqliteKeyValueStoreError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_connection(connection)
    }

    /// Create a store in a private in-memory database.
    ///
    /// # Errors
    /// Returns [`SqliteKeyValueStoreError`] when SQLite cannot allocate the
    /// database.
    pub fn open_in_memory() -> Result<Self, SqliteKeyValueStoreError> {
        let connection =
            Connection::open_in_memory().map_err(|source| SqliteKeyValueStoreError::OpenDatabase {
                path: PathBuf::from(":memory:"),
                source,
            })?;
        Self::from_connection(connection)
    }

    fn from_connection(connection: Connection) -> Result<Self, SqliteKeyValueStoreError> {
        connection
            .execute(CREATE_TABLE_SQL, [])
            .map_err(SqliteKeyValueStoreError::Schema)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let connection = self.connection.lock().map_err(|_| StoreError::Poisoned)?;
        connection
            .query_row(SELECT_SQL, params![key], |row| row.get::<_, String>(0))
            .optional()
            .map_err(|source| StoreError::Read {
                key: key.to_owned(),
                source: Box::new(source),
            })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let connection = self.connection.lock().map_err(|_| StoreError::Poisoned)?;
        connection
            .execute(UPSERT_SQL, params![key, value])
            .map(|_| ())
            .map_err(|source| StoreError::Write {
                key: key.to_owned(),
                source: Box::new(source),
            })
    }
}
