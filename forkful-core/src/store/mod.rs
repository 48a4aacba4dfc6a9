//! Durable string-keyed storage.
//!
//! The [`KeyValueStore`] trait is the only persistence contract the preference
//! engine relies on: fetch a value by key and overwrite a value by key. The
//! module ships an in-memory implementation and, behind feature flags, a
//! SQLite table and a directory of files.

use thiserror::Error;

#[cfg(feature = "store-fs")]
mod file;
mod memory;
#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-fs")]
pub use file::{FileKeyValueStore, FileKeyValueStoreError};
pub use memory::MemoryKeyValueStore;
#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteKeyValueStore, SqliteKeyValueStoreError};

/// Boxed backend error carried by [`StoreError`].
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by [`KeyValueStore`] implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading a key failed.
    #[error("failed to read key {key:?} from the store: {source}")]
    Read {
        /// Key being read.
        key: String,
        /// Backend failure.
        #[source]
        source: BackendError,
    },
    /// Writing a key failed.
    #[error("failed to write key {key:?} to the store: {source}")]
    Write {
        /// Key being written.
        key: String,
        /// Backend failure.
        #[source]
        source: BackendError,
    },
    /// The key cannot be represented by this backend.
    #[error("key {key:?} is not supported by this store")]
    InvalidKey {
        /// Rejected key.
        key: String,
    },
    /// A previous writer panicked while holding the store lock.
    #[error("store lock was poisoned by a panicking writer")]
    Poisoned,
}

/// Durable string-keyed storage with get/set semantics.
///
/// `set` replaces any previous value for the key as a whole; readers never
/// observe a partially written value.
///
/// # Examples
///
/// ```rust
/// use forkful_core::{KeyValueStore, MemoryKeyValueStore};
///
/// # fn main() -> Result<(), forkful_core::StoreError> {
/// let store = MemoryKeyValueStore::default();
/// assert_eq!(store.get("greeting")?, None);
/// store.set("greeting", "hello")?;
/// assert_eq!(store.get("greeting")?.as_deref(), Some("hello"));
/// # Ok(())
/// # }
/// ```
pub trait KeyValueStore: Send + Sync {
    /// Return the value stored under `key`, if any.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}
