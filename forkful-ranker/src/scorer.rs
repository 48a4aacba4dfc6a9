//! Additive preference scoring.

use forkful_core::{Candidate, Facet, PreferenceSet, Scorer};

/// Scores a candidate by summing the weight learned for each of its facet
/// values.
///
/// A restaurant in category `Pizza` priced `€€` scores
/// `categories["Pizza"] + priceRanges["€€"]`. Missing facet values and
/// unknown keys contribute nothing.
///
/// # Examples
/// ```
/// use forkful_core::{Facet, PreferenceSet, Restaurant, Scorer};
/// use forkful_ranker::FacetScorer;
///
/// let preferences = PreferenceSet::new()
///     .with_weight(Facet::Category, "Pizza", 2)
///     .with_weight(Facet::PriceRange, "€€", 1);
/// let candidate = Restaurant::new("1", "Luigi's").with_category("Pizza").with_price("€€");
/// assert_eq!(FacetScorer.score(&candidate, &preferences), 3);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FacetScorer;

impl Scorer for FacetScorer {
    fn score(&self, candidate: &dyn Candidate, preferences: &PreferenceSet) -> u64 {
        Facet::ALL
            .iter()
            .filter_map(|facet| {
                candidate
                    .facet_value(*facet)
                    .map(|value| u64::from(preferences.weight(*facet, value)))
            })
            .sum()
    }
}
