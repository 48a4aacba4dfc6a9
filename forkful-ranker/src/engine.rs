//! Filter-then-rank over a caller-supplied candidate list.

use forkful_core::{Candidate, PreferenceSet, Scorer, SearchField};
use log::debug;

use crate::{FacetScorer, RESERVATION_FIELDS, RESTAURANT_FIELDS, RankQuery};

/// A candidate paired with the score it was ranked by.
#[derive(Debug, PartialEq)]
pub struct Ranked<'a, C> {
    /// The ranked record, borrowed from the input list.
    pub candidate: &'a C,
    /// Preference score; higher ranks earlier.
    pub score: u64,
}

impl<C> Clone for Ranked<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Ranked<'_, C> {}

/// Filters candidates by a [`RankQuery`] and orders the survivors by
/// descending preference score.
///
/// Ranking is stable: candidates with equal scores keep their input order.
/// The engine holds no state between calls and never fails; records missing
/// the searched or scored fields simply do not match or score zero.
///
/// # Examples
/// ```
/// use forkful_core::{Facet, PreferenceSet, Restaurant};
/// use forkful_ranker::{RankQuery, RankingEngine};
///
/// let candidates = vec![
///     Restaurant::new("1", "Da Michele").with_category("Pizza"),
///     Restaurant::new("2", "Kaito").with_category("Sushi"),
///     Restaurant::new("3", "Sorbillo").with_category("Pizza"),
/// ];
/// let engine = RankingEngine::for_restaurants();
/// let ranked = engine.rank(&candidates, &RankQuery::new().with_text("piz"), &PreferenceSet::new());
/// let ids: Vec<_> = ranked.iter().map(|r| r.id.as_str()).collect();
/// assert_eq!(ids, ["1", "3"]);
/// ```
#[derive(Debug, Clone)]
pub struct RankingEngine<S = FacetScorer> {
    fields: Vec<SearchField>,
    scorer: S,
}

impl RankingEngine<FacetScorer> {
    /// Engine matching restaurant names and categories.
    #[must_use]
    pub fn for_restaurants() -> Self {
        Self::with_fields(RESTAURANT_FIELDS.iter().copied())
    }

    /// Engine matching reservation restaurant names, statuses and locations.
    #[must_use]
    pub fn for_reservations() -> Self {
        Self::with_fields(RESERVATION_FIELDS.iter().copied())
    }

    /// Engine matching the given fields.
    pub fn with_fields(fields: impl IntoIterator<Item = SearchField>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
            scorer: FacetScorer,
        }
    }
}

impl Default for RankingEngine<FacetScorer> {
    fn default() -> Self {
        Self::for_restaurants()
    }
}

impl<S: Scorer> RankingEngine<S> {
    /// Replace the scorer, keeping the searched fields.
    pub fn with_scorer<T: Scorer>(self, scorer: T) -> RankingEngine<T> {
        RankingEngine {
            fields: self.fields,
            scorer,
        }
    }

    /// Fields a text query is matched against.
    #[must_use]
    pub fn fields(&self) -> &[SearchField] {
        &self.fields
    }

    /// Candidates matching `query`, in input order.
    pub fn filter<'a, C: Candidate>(&self, candidates: &'a [C], query: &RankQuery) -> Vec<&'a C> {
        let matcher = query.matcher(&self.fields);
        candidates
            .iter()
            .filter(|candidate| matcher.matches(*candidate))
            .collect()
    }

    /// Filter `candidates` by `query` and rank the survivors, keeping scores.
    pub fn rank_scored<'a, C: Candidate>(
        &self,
        candidates: &'a [C],
        query: &RankQuery,
        preferences: &PreferenceSet,
    ) -> Vec<Ranked<'a, C>> {
        let mut ranked: Vec<_> = self
            .filter(candidates, query)
            .into_iter()
            .map(|candidate| Ranked {
                candidate,
                score: self.scorer.score(candidate, preferences),
            })
            .collect();
        // `sort_by` is stable, which keeps ties in input order.
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        debug!(
            "Ranked {} of {} candidates (text {:?}, price {:?})",
            ranked.len(),
            candidates.len(),
            query.text(),
            query.price()
        );
        ranked
    }

    /// Filter `candidates` by `query` and rank the survivors.
    pub fn rank<'a, C: Candidate>(
        &self,
        candidates: &'a [C],
        query: &RankQuery,
        preferences: &PreferenceSet,
    ) -> Vec<&'a C> {
        self.rank_scored(candidates, query, preferences)
            .into_iter()
            .map(|ranked| ranked.candidate)
            .collect()
    }
}

/// Filter restaurant-like `candidates` by text and price, then rank them.
///
/// Shorthand for [`RankingEngine::for_restaurants`] with a query built from
/// `text` and `price`.
pub fn rank_and_filter<'a, C: Candidate>(
    candidates: &'a [C],
    text: &str,
    price: &str,
    preferences: &PreferenceSet,
) -> Vec<&'a C> {
    let query = RankQuery::new().with_text(text).with_price(price);
    RankingEngine::for_restaurants().rank(candidates, &query, preferences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use forkful_core::test_support::restaurant;
    use forkful_core::{Facet, Reservation, Restaurant};
    use rstest::{fixture, rstest};

    fn ids<C: Candidate>(ranked: &[&C]) -> Vec<String> {
        ranked.iter().map(|c| c.id().to_owned()).collect()
    }

    #[fixture]
    fn listing() -> Vec<Restaurant> {
        vec![
            restaurant("1", "Pizza", "€€"),
            restaurant("2", "Sushi", "€€"),
            restaurant("3", "Pizza", "€"),
        ]
    }

    #[fixture]
    fn preferences() -> PreferenceSet {
        PreferenceSet::new()
            .with_weight(Facet::Category, "Pizza", 2)
            .with_weight(Facet::PriceRange, "€€", 1)
    }

    #[rstest]
    fn ties_keep_input_order() {
        let candidates = vec![
            restaurant("A", "Pizza", "€"),
            restaurant("B", "Sushi", "€"),
            restaurant("C", "Tapas", "€"),
        ];
        let preferences = PreferenceSet::new()
            .with_weight(Facet::Category, "Pizza", 1)
            .with_weight(Facet::Category, "Sushi", 2)
            .with_weight(Facet::Category, "Tapas", 1);
        let engine = RankingEngine::for_restaurants();
        let ranked = engine.rank(&candidates, &RankQuery::new(), &preferences);
        assert_eq!(ids(&ranked), ["B", "A", "C"]);
    }

    #[rstest]
    fn ranks_by_combined_score(listing: Vec<Restaurant>, preferences: PreferenceSet) {
        let engine = RankingEngine::for_restaurants();
        let scored = engine.rank_scored(&listing, &RankQuery::new(), &preferences);
        let pairs: Vec<_> = scored
            .iter()
            .map(|ranked| (ranked.candidate.id.as_str(), ranked.score))
            .collect();
        assert_eq!(pairs, [("1", 3), ("3", 2), ("2", 1)]);
    }

    #[rstest]
    fn text_filter_keeps_relative_order(listing: Vec<Restaurant>) {
        let ranked = rank_and_filter(&listing, "piz", "", &PreferenceSet::new());
        assert_eq!(ids(&ranked), ["1", "3"]);
    }

    #[rstest]
    fn filters_combine(listing: Vec<Restaurant>, preferences: PreferenceSet) {
        let ranked = rank_and_filter(&listing, "PIZZA", "€", &preferences);
        assert_eq!(ids(&ranked), ["3"]);
    }

    #[rstest]
    fn price_filter_is_exact(listing: Vec<Restaurant>) {
        let ranked = rank_and_filter(&listing, "", "€€", &PreferenceSet::new());
        assert_eq!(ids(&ranked), ["1", "2"]);
        assert!(rank_and_filter(&listing, "", "€€€", &PreferenceSet::new()).is_empty());
    }

    #[rstest]
    fn empty_inputs_yield_empty_output(preferences: PreferenceSet) {
        let none: Vec<Restaurant> = Vec::new();
        assert!(rank_and_filter(&none, "", "", &preferences).is_empty());
    }

    #[rstest]
    fn empty_preferences_preserve_input_order(listing: Vec<Restaurant>) {
        let ranked = rank_and_filter(&listing, "", "", &PreferenceSet::new());
        assert_eq!(ids(&ranked), ["1", "2", "3"]);
    }

    #[rstest]
    fn incomplete_records_rank_last_without_failing(preferences: PreferenceSet) {
        let candidates = vec![
            Restaurant::new("bare", "Unknown"),
            restaurant("full", "Pizza", "€€"),
        ];
        let ranked = rank_and_filter(&candidates, "", "", &preferences);
        assert_eq!(ids(&ranked), ["full", "bare"]);
    }

    #[rstest]
    fn custom_scorer_replaces_facet_weights(listing: Vec<Restaurant>, preferences: PreferenceSet) {
        struct ReverseId;

        impl Scorer for ReverseId {
            fn score(&self, candidate: &dyn Candidate, _preferences: &PreferenceSet) -> u64 {
                candidate.id().parse().unwrap_or(0)
            }
        }

        let engine = RankingEngine::for_restaurants().with_scorer(ReverseId);
        let ranked = engine.rank(&listing, &RankQuery::new(), &preferences);
        assert_eq!(ids(&ranked), ["3", "2", "1"]);
    }

    #[rstest]
    fn reservations_match_status_and_location() {
        let rows: Vec<Reservation> = serde_json::from_str(
            r#"[
                {"id": "a", "status": "confirmed", "restaurants": {"name": "Kaito", "location": "Porto"}},
                {"id": "b", "status": "pending", "restaurants": {"name": "Sorbillo", "location": "Lisboa"}},
                {"id": "c", "status": "cancelled"}
            ]"#,
        )
        .expect("reservation rows");
        let engine = RankingEngine::for_reservations();
        let by = |text: &str| {
            let query = RankQuery::new().with_text(text);
            ids(&engine.rank(&rows, &query, &PreferenceSet::new()))
        };
        assert_eq!(by("pend"), ["b"]);
        assert_eq!(by("porto"), ["a"]);
        assert_eq!(by("kai"), ["a"]);
        assert_eq!(by("c"), ["a", "c"]);
    }
}
