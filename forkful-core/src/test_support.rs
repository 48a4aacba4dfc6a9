//! Test-only stores and fixtures shared by unit and behaviour tests.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{KeyValueStore, MemoryKeyValueStore, Restaurant, StoreError};

/// In-memory store that counts reads and successful writes.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryKeyValueStore,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl RecordingStore {
    /// Create a store pre-populated with a single entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            inner: MemoryKeyValueStore::with_entry(key, value),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of `get` calls made so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of `set` calls that have completed.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for RecordingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.set(key, value)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Store whose reads succeed but whose writes always fail, as when the
/// device runs out of space.
#[derive(Debug, Default)]
pub struct ReadOnlyStore {
    inner: MemoryKeyValueStore,
}

impl ReadOnlyStore {
    /// Create a store that serves `value` under `key` and rejects writes.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            inner: MemoryKeyValueStore::with_entry(key, value),
        }
    }
}

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Write {
            key: key.to_owned(),
            source: Box::new(io::Error::new(io::ErrorKind::StorageFull, "quota exceeded")),
        })
    }
}

/// Store that fails every operation.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Read {
            key: key.to_owned(),
            source: Box::new(io::Error::other("store unavailable")),
        })
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Write {
            key: key.to_owned(),
            source: Box::new(io::Error::other("store unavailable")),
        })
    }
}

/// Build a restaurant with the facet values used by scoring.
pub fn restaurant(id: &str, category: &str, price: &str) -> Restaurant {
    Restaurant::new(id, format!("Restaurant {id}"))
        .with_category(category)
        .with_price(price)
}
