//! Facade crate for the Forkful preference learning and ranking engine.
//!
//! This crate re-exports the core domain types, the preference store and the
//! ranking engine, and exposes the durable key-value backends behind feature
//! flags.

#![forbid(unsafe_code)]

pub use forkful_core::{
    Candidate, Facet, KeyValueStore, MemoryKeyValueStore, PREFERENCES_KEY, PRICE_TIERS,
    PreferenceDecodeError, PreferenceSet, PreferenceStore, PreferenceStoreError, Reservation,
    ReservedRestaurant, Restaurant, Scorer, SearchField, StoreError,
};
pub use forkful_ranker::{
    DEFAULT_DEBOUNCE, Debouncer, FacetScorer, FetchTicket, FetchTracker, FilterSession,
    RESERVATION_FIELDS, RESTAURANT_FIELDS, RankQuery, Ranked, RankingEngine, rank_and_filter,
};

#[cfg(feature = "store-sqlite")]
pub use forkful_core::{SqliteKeyValueStore, SqliteKeyValueStoreError};

#[cfg(feature = "store-fs")]
pub use forkful_core::{FileKeyValueStore, FileKeyValueStoreError};

#[cfg(feature = "test-support")]
pub use forkful_core::test_support;
