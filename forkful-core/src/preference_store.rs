//! Durable, self-reinforcing record of the user's preferences.
//!
//! [`PreferenceStore`] keeps one [`PreferenceSet`] under a fixed key in any
//! [`KeyValueStore`]. Its best-effort operations (`load`, `save`, the
//! increments and `reset`) never fail: a missing or corrupt record loads as
//! the empty set and write failures are logged and dropped, so preference
//! learning can never block browsing. Callers that need to observe failures
//! use [`PreferenceStore::try_load`] and [`PreferenceStore::try_save`].
//!
//! Increments are read-modify-write cycles. The store serialises them behind
//! an in-process lock, so two increments issued back to back both land.

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, error, warn};
use thiserror::Error;

use crate::{Facet, KeyValueStore, PreferenceDecodeError, PreferenceSet, StoreError};

/// Key under which the preference record is persisted.
pub const PREFERENCES_KEY: &str = "user_preferences";

/// Errors surfaced by the fallible preference store operations.
#[derive(Debug, Error)]
pub enum PreferenceStoreError {
    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The persisted record could not be decoded.
    #[error("persisted preferences under {key:?} are unreadable: {source}")]
    Decode {
        /// Key holding the record.
        key: String,
        /// Decoding failure.
        #[source]
        source: PreferenceDecodeError,
    },
    /// The preference set could not be encoded.
    #[error("failed to encode preferences: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Preference persistence over a [`KeyValueStore`].
///
/// # Examples
/// ```
/// use forkful_core::{Facet, MemoryKeyValueStore, PreferenceStore};
///
/// let store = PreferenceStore::new(MemoryKeyValueStore::default());
/// store.increment_price_range("€€");
/// let cleared = store.reset();
/// assert!(cleared.is_empty());
/// assert_eq!(store.load().weight(Facet::PriceRange, "€€"), 0);
/// ```
#[derive(Debug)]
pub struct PreferenceStore<S> {
    backend: S,
    key: String,
    updates: Mutex<()>,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    /// Wrap `backend`, persisting under [`PREFERENCES_KEY`].
    pub fn new(backend: S) -> Self {
        Self::with_key(backend, PREFERENCES_KEY)
    }

    /// Wrap `backend`, persisting under a custom key.
    pub fn with_key(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            updates: Mutex::new(()),
        }
    }

    /// Borrow the underlying key-value store.
    pub const fn backend(&self) -> &S {
        &self.backend
    }

    /// Key the record is persisted under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the persisted record.
    ///
    /// Returns `Ok(None)` when nothing has been persisted yet.
    ///
    /// # Errors
    /// Returns [`PreferenceStoreError`] when the store cannot be read or the
    /// record cannot be decoded.
    pub fn try_load(&self) -> Result<Option<PreferenceSet>, PreferenceStoreError> {
        let Some(payload) = self.backend.get(&self.key)? else {
            return Ok(None);
        };
        PreferenceSet::from_json(&payload)
            .map(Some)
            .map_err(|source| PreferenceStoreError::Decode {
                key: self.key.clone(),
                source,
            })
    }

    /// Persist `preferences`, replacing the previous record.
    ///
    /// # Errors
    /// Returns [`PreferenceStoreError`] when encoding or writing fails.
    pub fn try_save(&self, preferences: &PreferenceSet) -> Result<(), PreferenceStoreError> {
        let payload = preferences.to_json().map_err(PreferenceStoreError::Encode)?;
        self.backend.set(&self.key, &payload)?;
        debug!("Preferences saved under {:?}: {payload}", self.key);
        Ok(())
    }

    /// Load the current preferences, falling back to the empty set.
    pub fn load(&self) -> PreferenceSet {
        match self.try_load() {
            Ok(Some(preferences)) => preferences,
            Ok(None) => {
                debug!("No preferences under {:?}; starting empty", self.key);
                PreferenceSet::default()
            }
            Err(err) => {
                warn!("Failed to load preferences, using defaults: {err}");
                PreferenceSet::default()
            }
        }
    }

    /// Persist `preferences`, logging and swallowing any failure.
    pub fn save(&self, preferences: &PreferenceSet) {
        if let Err(err) = self.try_save(preferences) {
            error!("Failed to save preferences: {err}");
        }
    }

    /// Reinforce `key` in `facet` by one and persist the result.
    ///
    /// Blank keys leave the record untouched. Returns the resulting snapshot
    /// so callers can refresh their in-memory copy.
    pub fn increment(&self, facet: Facet, key: &str) -> PreferenceSet {
        self.increment_over(&PreferenceSet::default(), facet, key)
    }

    /// Reinforce `key` on top of both the persisted record and `mirror`.
    ///
    /// Each weight starts from the larger of its persisted and mirrored
    /// values, so increments a caller holds but could not persist are
    /// carried into the next save instead of being dropped.
    ///
    /// # Examples
    /// ```
    /// use forkful_core::{Facet, MemoryKeyValueStore, PreferenceSet, PreferenceStore};
    ///
    /// let store = PreferenceStore::new(MemoryKeyValueStore::default());
    /// let mirror = PreferenceSet::new().with_weight(Facet::Category, "Pizza", 2);
    /// let updated = store.increment_over(&mirror, Facet::PriceRange, "€");
    /// assert_eq!(updated.weight(Facet::Category, "Pizza"), 2);
    /// assert_eq!(store.load(), updated);
    /// ```
    pub fn increment_over(
        &self,
        mirror: &PreferenceSet,
        facet: Facet,
        key: &str,
    ) -> PreferenceSet {
        let _update = self.lock_updates();
        let mut preferences = self.load();
        if key.trim().is_empty() {
            return preferences;
        }
        preferences.merge(mirror);
        preferences.increment(facet, key);
        self.save(&preferences);
        debug!(
            "{facet} preference {key:?} now weighs {}",
            preferences.weight(facet, key)
        );
        preferences
    }

    /// Reinforce a category preference.
    pub fn increment_category(&self, name: &str) -> PreferenceSet {
        self.increment(Facet::Category, name)
    }

    /// Reinforce a price-tier preference.
    pub fn increment_price_range(&self, tier: &str) -> PreferenceSet {
        self.increment(Facet::PriceRange, tier)
    }

    /// Overwrite the record with the empty set and return it.
    pub fn reset(&self) -> PreferenceSet {
        let _update = self.lock_updates();
        let preferences = PreferenceSet::default();
        self.save(&preferences);
        debug!("Preferences under {:?} reset to defaults", self.key);
        preferences
    }

    fn lock_updates(&self) -> MutexGuard<'_, ()> {
        self.updates.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use rstest::{fixture, rstest};

    use super::*;
    use crate::MemoryKeyValueStore;
    use crate::test_support::{ReadOnlyStore, RecordingStore, UnavailableStore};

    #[fixture]
    fn store() -> PreferenceStore<RecordingStore> {
        PreferenceStore::new(RecordingStore::default())
    }

    #[rstest]
    fn missing_record_loads_empty(store: PreferenceStore<RecordingStore>) {
        assert_eq!(store.load(), PreferenceSet::default());
        assert!(store.try_load().expect("load").is_none());
    }

    #[rstest]
    fn save_then_load_round_trips(store: PreferenceStore<RecordingStore>) {
        let preferences = PreferenceSet::new()
            .with_weight(Facet::Category, "Pizza", 3)
            .with_weight(Facet::PriceRange, "€€", 2);
        store.save(&preferences);
        assert_eq!(store.load(), preferences);
    }

    #[rstest]
    fn increments_persist_immediately(store: PreferenceStore<RecordingStore>) {
        store.increment_category("Sushi");
        let snapshot = store.increment_category("Sushi");
        assert_eq!(snapshot.weight(Facet::Category, "Sushi"), 2);
        assert_eq!(store.backend().writes(), 2);
        assert_eq!(store.load(), snapshot);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_increments_do_not_write(store: PreferenceStore<RecordingStore>, #[case] key: &str) {
        store.increment_category(key);
        store.increment_price_range(key);
        assert_eq!(store.backend().writes(), 0);
        assert!(store.load().is_empty());
    }

    #[rstest]
    fn unsaved_mirror_weights_carry_into_the_next_increment() {
        let store = PreferenceStore::new(ReadOnlyStore::default());
        let first = store.increment_over(&PreferenceSet::default(), Facet::Category, "Pizza");
        let second = store.increment_over(&first, Facet::PriceRange, "€");
        assert_eq!(second.weight(Facet::Category, "Pizza"), 1);
        assert_eq!(second.weight(Facet::PriceRange, "€"), 1);
        assert!(store.load().is_empty());
    }

    #[rstest]
    fn increment_over_prefers_larger_persisted_weights(store: PreferenceStore<RecordingStore>) {
        store.save(&PreferenceSet::new().with_weight(Facet::Category, "Pizza", 5));
        let mirror = PreferenceSet::new().with_weight(Facet::Category, "Pizza", 2);
        let updated = store.increment_over(&mirror, Facet::Category, "Pizza");
        assert_eq!(updated.weight(Facet::Category, "Pizza"), 6);
        assert_eq!(store.load(), updated);
    }

    #[rstest]
    fn blank_increment_over_ignores_the_mirror(store: PreferenceStore<RecordingStore>) {
        let mirror = PreferenceSet::new().with_weight(Facet::Category, "Pizza", 2);
        let snapshot = store.increment_over(&mirror, Facet::Category, "  ");
        assert!(snapshot.is_empty());
        assert_eq!(store.backend().writes(), 0);
    }

    #[rstest]
    fn corrupt_record_loads_empty() {
        let store = PreferenceStore::new(MemoryKeyValueStore::with_entry(
            PREFERENCES_KEY,
            "{definitely not json",
        ));
        assert!(store.load().is_empty());
        assert!(matches!(
            store.try_load(),
            Err(PreferenceStoreError::Decode { .. })
        ));
    }

    #[rstest]
    fn decode_errors_name_their_cause() {
        let store = PreferenceStore::new(MemoryKeyValueStore::with_entry(PREFERENCES_KEY, "[1,2]"));
        let err = store.try_load().expect_err("array payload");
        assert_eq!(
            err.to_string(),
            "persisted preferences under \"user_preferences\" are unreadable: \
             preference payload must be a JSON object, found an array"
        );
    }

    #[rstest]
    fn write_errors_name_their_cause() {
        let store = PreferenceStore::new(ReadOnlyStore::default());
        let err = store
            .try_save(&PreferenceSet::default())
            .expect_err("read-only store");
        assert_eq!(
            err.to_string(),
            "failed to write key \"user_preferences\" to the store: quota exceeded"
        );
    }

    #[rstest]
    fn increment_over_corrupt_record_starts_fresh() {
        let store = PreferenceStore::new(MemoryKeyValueStore::with_entry(PREFERENCES_KEY, "[1,2]"));
        let snapshot = store.increment_category("Tapas");
        assert_eq!(snapshot, PreferenceSet::new().with_weight(Facet::Category, "Tapas", 1));
        assert_eq!(store.load(), snapshot);
    }

    #[rstest]
    fn write_failures_are_swallowed() {
        let store = PreferenceStore::new(ReadOnlyStore::with_entry(
            PREFERENCES_KEY,
            r#"{"categories":{"Pizza":1},"priceRanges":{}}"#,
        ));
        let snapshot = store.increment_category("Pizza");
        assert_eq!(snapshot.weight(Facet::Category, "Pizza"), 2);
        assert_eq!(store.load().weight(Facet::Category, "Pizza"), 1);
        assert!(matches!(
            store.try_save(&snapshot),
            Err(PreferenceStoreError::Store(StoreError::Write { .. }))
        ));
    }

    #[rstest]
    fn unavailable_store_never_fails_callers() {
        let store = PreferenceStore::new(UnavailableStore);
        assert!(store.load().is_empty());
        assert!(store.reset().is_empty());
        let snapshot = store.increment_price_range("€");
        assert_eq!(snapshot.weight(Facet::PriceRange, "€"), 1);
    }

    #[rstest]
    fn reset_clears_everything(store: PreferenceStore<RecordingStore>) {
        store.increment_category("Pizza");
        store.increment_price_range("€€€");
        assert_eq!(store.reset(), PreferenceSet::default());
        assert_eq!(store.load(), PreferenceSet::default());
    }

    #[rstest]
    fn custom_keys_are_isolated() {
        let backend = MemoryKeyValueStore::default();
        let alice = PreferenceStore::with_key(&backend, "alice");
        let bob = PreferenceStore::with_key(&backend, "bob");
        alice.increment_category("Pizza");
        assert!(bob.load().is_empty());
        assert_eq!(alice.key(), "alice");
    }

    #[rstest]
    fn concurrent_increments_are_not_lost() {
        let store = Arc::new(PreferenceStore::new(MemoryKeyValueStore::default()));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..25 {
                        shared.increment_category("Pizza");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("increment thread panicked");
        }
        assert_eq!(store.load().weight(Facet::Category, "Pizza"), 200);
    }
}
