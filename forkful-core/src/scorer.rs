//! Score candidates against learned preferences.
//!
//! The `Scorer` trait assigns a relevance score to a
//! [`Candidate`](crate::Candidate) given a [`PreferenceSet`](crate::PreferenceSet).

use crate::{Candidate, PreferenceSet};

/// Calculate a preference score for a candidate.
///
/// Higher scores indicate a better match between the candidate and what the
/// user has chosen before. Implementations must be thread-safe (`Send` +
/// `Sync`) and total: a candidate with missing facet values scores what its
/// present values earn, and `0` when nothing matches.
///
/// # Examples
///
/// ```rust
/// use forkful_core::{Candidate, PreferenceSet, Restaurant, Scorer};
///
/// struct UnitScorer;
///
/// impl Scorer for UnitScorer {
///     fn score(&self, _candidate: &dyn Candidate, _preferences: &PreferenceSet) -> u64 {
///         1
///     }
/// }
///
/// let restaurant = Restaurant::new("r1", "Luigi's");
/// assert_eq!(UnitScorer.score(&restaurant, &PreferenceSet::new()), 1);
/// ```
pub trait Scorer: Send + Sync {
    /// Return a score for `candidate` according to `preferences`.
    fn score(&self, candidate: &dyn Candidate, preferences: &PreferenceSet) -> u64;
}
