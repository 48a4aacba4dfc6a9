//! Learned preference weights for every [`Facet`].
//!
//! A [`PreferenceSet`] is a pair of weight maps. Weights count how many times
//! the user actively chose a value, so they are positive integers; a value
//! with no recorded choice is absent rather than stored as zero.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::Facet;

mod codec;

pub use codec::PreferenceDecodeError;

/// Complete durable state of both facets' weight maps.
///
/// Keys are stored exactly as given: `"Pizza"` and `"pizza"` are distinct.
///
/// # Examples
/// ```
/// use forkful_core::{Facet, PreferenceSet};
///
/// let preferences = PreferenceSet::new()
///     .with_weight(Facet::Category, "Pizza", 3)
///     .with_weight(Facet::PriceRange, "€€", 2);
/// assert_eq!(preferences.weight(Facet::Category, "Pizza"), 3);
/// assert_eq!(preferences.weight(Facet::Category, "Sushi"), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PreferenceSet {
    categories: BTreeMap<String, u32>,
    #[serde(rename = "priceRanges")]
    price_ranges: BTreeMap<String, u32>,
}

impl PreferenceSet {
    /// Construct an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the weight map for `facet`.
    #[must_use]
    pub const fn weights(&self, facet: Facet) -> &BTreeMap<String, u32> {
        match facet {
            Facet::Category => &self.categories,
            Facet::PriceRange => &self.price_ranges,
        }
    }

    /// Return the weight recorded for `key`, or `0` when absent.
    #[must_use]
    pub fn weight(&self, facet: Facet, key: &str) -> u32 {
        self.weights(facet).get(key).copied().unwrap_or(0)
    }

    /// Reinforce `key` by one.
    ///
    /// Blank keys (empty or whitespace only) are ignored and `false` is
    /// returned. Weights saturate at `u32::MAX`.
    ///
    /// # Examples
    /// ```
    /// use forkful_core::{Facet, PreferenceSet};
    ///
    /// let mut preferences = PreferenceSet::new();
    /// assert!(preferences.increment(Facet::Category, "Sushi"));
    /// assert!(!preferences.increment(Facet::Category, "   "));
    /// assert_eq!(preferences.weight(Facet::Category, "Sushi"), 1);
    /// ```
    pub fn increment(&mut self, facet: Facet, key: &str) -> bool {
        if key.trim().is_empty() {
            return false;
        }
        let weight = self.weights_mut(facet).entry(key.to_owned()).or_insert(0);
        *weight = weight.saturating_add(1);
        true
    }

    /// Set the weight for `key`, removing it when `weight` is zero.
    pub fn set_weight(&mut self, facet: Facet, key: &str, weight: u32) {
        let weights = self.weights_mut(facet);
        if weight == 0 {
            weights.remove(key);
        } else {
            weights.insert(key.to_owned(), weight);
        }
    }

    /// Set a weight while returning `self` for chaining.
    #[must_use]
    pub fn with_weight(mut self, facet: Facet, key: &str, weight: u32) -> Self {
        self.set_weight(facet, key, weight);
        self
    }

    /// Raise every weight to at least the one recorded in `other`.
    ///
    /// Keys only present in `other` are copied over.
    pub fn merge(&mut self, other: &Self) {
        for facet in Facet::ALL {
            let weights = self.weights_mut(facet);
            for (key, &weight) in other.weights(facet) {
                let current = weights.entry(key.clone()).or_insert(0);
                *current = (*current).max(weight);
            }
        }
    }

    /// Report whether no weights are recorded for any facet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Facet::ALL.iter().all(|facet| self.weights(*facet).is_empty())
    }

    const fn weights_mut(&mut self, facet: Facet) -> &mut BTreeMap<String, u32> {
        match facet {
            Facet::Category => &mut self.categories,
            Facet::PriceRange => &mut self.price_ranges,
        }
    }
}
