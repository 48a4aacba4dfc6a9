//! Core domain types for the Forkful preference engine.
//!
//! The crate models the user's learned preferences as a [`PreferenceSet`]:
//! two independent facets (category and price tier) mapping values to
//! positive integer weights. A [`PreferenceStore`] persists the set through
//! any [`KeyValueStore`] and reinforces it from search and filter actions.
//! Records that can be ranked implement [`Candidate`]; [`Scorer`]
//! implementations turn a candidate and a preference snapshot into a score.
//!
//! # Examples
//!
//! ```
//! use forkful_core::{Facet, MemoryKeyValueStore, PreferenceStore};
//!
//! let store = PreferenceStore::new(MemoryKeyValueStore::default());
//! store.increment_category("Pizza");
//! store.increment_category("Pizza");
//! store.increment_price_range("€€");
//!
//! let preferences = store.load();
//! assert_eq!(preferences.weight(Facet::Category, "Pizza"), 2);
//! assert_eq!(preferences.weight(Facet::PriceRange, "€€"), 1);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod candidate;
mod facet;
mod preference_store;
mod preferences;
mod scorer;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use candidate::{Candidate, Reservation, ReservedRestaurant, Restaurant, SearchField};
pub use facet::{Facet, PRICE_TIERS, ParseFacetError};
pub use preference_store::{PREFERENCES_KEY, PreferenceStore, PreferenceStoreError};
pub use preferences::{PreferenceDecodeError, PreferenceSet};
pub use scorer::Scorer;
pub use store::{KeyValueStore, MemoryKeyValueStore, StoreError};

#[cfg(feature = "store-fs")]
pub use store::{FileKeyValueStore, FileKeyValueStoreError};
#[cfg(feature = "store-sqlite")]
pub use store::{SqliteKeyValueStore, SqliteKeyValueStoreError};
