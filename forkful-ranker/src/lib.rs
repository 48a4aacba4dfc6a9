//! Preference-aware filtering and ranking of restaurant listings.
//!
//! The [`RankingEngine`] is a pure function of a candidate list, the active
//! [`RankQuery`] and a [`PreferenceSet`](forkful_core::PreferenceSet): it
//! keeps the candidates matching the query and orders them by descending
//! preference score, leaving ties in their input order.
//!
//! [`FilterSession`] drives the engine the way a search screen does. Text
//! input passes through a [`Debouncer`] before it changes the query and is
//! learned as a category preference, price taps toggle the active tier, and
//! every learned preference is persisted through a
//! [`PreferenceStore`](forkful_core::PreferenceStore). [`FetchTracker`] lets
//! callers drop candidate lists from superseded fetches.
//!
//! # Examples
//!
//! ```
//! use forkful_core::{Facet, PreferenceSet, Restaurant};
//! use forkful_ranker::{RankQuery, RankingEngine};
//!
//! let candidates = vec![
//!     Restaurant::new("1", "Da Michele").with_category("Pizza").with_price("€"),
//!     Restaurant::new("2", "Kaito").with_category("Sushi").with_price("€€"),
//! ];
//! let preferences = PreferenceSet::new().with_weight(Facet::Category, "Sushi", 2);
//!
//! let ranked = RankingEngine::for_restaurants().rank(&candidates, &RankQuery::new(), &preferences);
//! let ids: Vec<_> = ranked.iter().map(|r| r.id.as_str()).collect();
//! assert_eq!(ids, ["2", "1"]);
//! ```

#![forbid(unsafe_code)]

mod debounce;
mod engine;
mod query;
mod scorer;
mod session;

pub use debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use engine::{Ranked, RankingEngine, rank_and_filter};
pub use query::{RankQuery, RESERVATION_FIELDS, RESTAURANT_FIELDS};
pub use scorer::FacetScorer;
pub use session::{FetchTicket, FetchTracker, FilterSession};
