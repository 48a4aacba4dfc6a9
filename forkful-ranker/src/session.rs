//! Search-screen state: debounced text, price toggles and learned
//! preferences.

use std::time::{Duration, Instant};

use forkful_core::{Candidate, Facet, KeyValueStore, PreferenceSet, PreferenceStore};
use log::debug;

use crate::{Debouncer, RankQuery, RankingEngine};

/// State behind a restaurant search screen.
///
/// The session mirrors the persisted [`PreferenceSet`] so ranking never
/// waits on storage. Text input is debounced: once typing pauses, the text
/// becomes the active filter and, when non-blank, is learned as a category
/// preference. Tapping a price tier toggles it and learns the selection.
/// Learned weights stay in the mirror even when persisting them fails.
///
/// # Examples
/// ```
/// use std::time::{Duration, Instant};
/// use forkful_core::{Facet, MemoryKeyValueStore, PreferenceStore};
/// use forkful_ranker::FilterSession;
///
/// let store = PreferenceStore::new(MemoryKeyValueStore::default());
/// let mut session = FilterSession::new(&store);
/// let now = Instant::now();
/// session.type_text("Sushi", now);
/// assert!(session.poll(now + Duration::from_millis(300)));
/// assert_eq!(session.preferences().weight(Facet::Category, "Sushi"), 1);
/// assert_eq!(session.query().text(), "Sushi");
/// ```
#[derive(Debug)]
pub struct FilterSession<'s, S> {
    store: &'s PreferenceStore<S>,
    preferences: PreferenceSet,
    query: RankQuery,
    input: Debouncer<String>,
    engine: RankingEngine,
}

impl<'s, S: KeyValueStore> FilterSession<'s, S> {
    /// Start a session, loading the persisted preferences.
    pub fn new(store: &'s PreferenceStore<S>) -> Self {
        Self {
            store,
            preferences: store.load(),
            query: RankQuery::new(),
            input: Debouncer::default(),
            engine: RankingEngine::for_restaurants(),
        }
    }

    /// Use a different quiet period for text input.
    #[must_use]
    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.input = Debouncer::new(delay);
        self
    }

    /// Rank with a different engine, for example one searching reservations.
    #[must_use]
    pub fn with_engine(mut self, engine: RankingEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Register a keystroke. The text takes effect once input goes quiet.
    pub fn type_text(&mut self, text: impl Into<String>, now: Instant) {
        self.input.schedule(text.into(), now);
    }

    /// Apply pending text whose quiet period has elapsed.
    ///
    /// Returns `true` when the query or preferences changed and results
    /// should be re-ranked.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.input
            .poll(now)
            .is_some_and(|text| self.apply_text(text))
    }

    /// Apply pending text immediately, as when the user submits the search.
    pub fn flush(&mut self) -> bool {
        self.input.flush().is_some_and(|text| self.apply_text(text))
    }

    fn apply_text(&mut self, text: String) -> bool {
        let category = text.trim();
        if !category.is_empty() {
            self.preferences = self
                .store
                .increment_over(&self.preferences, Facet::Category, category);
        }
        debug!("Search text now {text:?}");
        self.query = self.query.clone().with_text(text);
        true
    }

    /// Toggle `tier` as the active price filter and return the new filter.
    ///
    /// Tapping the active tier clears the filter. A newly selected tier is
    /// learned as a price preference.
    pub fn select_price(&mut self, tier: &str) -> &str {
        if self.query.price() == tier {
            self.query = self.query.clone().with_price("");
        } else {
            self.query = self.query.clone().with_price(tier);
            if !tier.trim().is_empty() {
                self.preferences = self
                    .store
                    .increment_over(&self.preferences, Facet::PriceRange, tier);
            }
        }
        self.query.price()
    }

    /// Forget every learned preference, persisted and mirrored.
    pub fn reset_preferences(&mut self) {
        self.preferences = self.store.reset();
    }

    /// Re-read the persisted preferences, for example after another screen
    /// changed them.
    ///
    /// Mirrored weights that never reached storage are discarded.
    pub fn reload(&mut self) {
        self.preferences = self.store.load();
    }

    /// Active filters.
    #[must_use]
    pub const fn query(&self) -> &RankQuery {
        &self.query
    }

    /// In-memory copy of the learned preferences.
    #[must_use]
    pub const fn preferences(&self) -> &PreferenceSet {
        &self.preferences
    }

    /// Whether typed text is still waiting for its quiet period.
    #[must_use]
    pub const fn has_pending_input(&self) -> bool {
        self.input.is_pending()
    }

    /// Filter and rank `candidates` with the active query and preferences.
    pub fn rank<'c, C: Candidate>(&self, candidates: &'c [C]) -> Vec<&'c C> {
        self.engine.rank(candidates, &self.query, &self.preferences)
    }
}

/// Identifies one candidate fetch issued by a [`FetchTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Orders candidate fetches so results from superseded requests can be
/// dropped.
///
/// Each [`begin`](Self::begin) supersedes every earlier ticket.
///
/// # Examples
/// ```
/// use forkful_ranker::FetchTracker;
///
/// let mut fetches = FetchTracker::default();
/// let first = fetches.begin();
/// let second = fetches.begin();
/// assert!(!fetches.is_current(first));
/// assert!(fetches.is_current(second));
/// ```
#[derive(Debug, Default)]
pub struct FetchTracker {
    latest: u64,
}

impl FetchTracker {
    /// Record a new fetch and return its ticket.
    pub const fn begin(&mut self) -> FetchTicket {
        self.latest = self.latest.wrapping_add(1);
        FetchTicket(self.latest)
    }

    /// Whether `ticket` belongs to the most recent fetch.
    #[must_use]
    pub const fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Return `results` only when `ticket` is still current.
    pub fn accept<T>(&self, ticket: FetchTicket, results: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(results)
        } else {
            debug!("Dropping results of superseded fetch {}", ticket.0);
            None
        }
    }
}
