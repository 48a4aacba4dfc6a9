//! The active search query and the fields it matches.

use forkful_core::{Candidate, Facet, SearchField};

/// Fields searched when filtering restaurant listings.
pub const RESTAURANT_FIELDS: &[SearchField] = &[SearchField::Name, SearchField::Category];

/// Fields searched when filtering a user's reservations.
pub const RESERVATION_FIELDS: &[SearchField] =
    &[SearchField::Name, SearchField::Status, SearchField::Location];

/// Text and price filters applied before ranking.
///
/// An empty text or price leaves that filter disabled.
///
/// # Examples
/// ```
/// use forkful_ranker::RankQuery;
///
/// let query = RankQuery::new().with_text("piz").with_price("€€");
/// assert_eq!(query.text(), "piz");
/// assert!(!query.is_empty());
/// assert!(RankQuery::new().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankQuery {
    text: String,
    price: String,
}

impl RankQuery {
    /// A query that keeps every candidate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            text: String::new(),
            price: String::new(),
        }
    }

    /// Set the free-text filter.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the price-tier filter.
    #[must_use]
    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = price.into();
        self
    }

    /// Free-text filter, empty when disabled.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Price-tier filter, empty when disabled.
    #[must_use]
    pub fn price(&self) -> &str {
        &self.price
    }

    /// Whether neither filter is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.price.is_empty()
    }

    pub(crate) fn matcher<'q>(&'q self, fields: &'q [SearchField]) -> Matcher<'q> {
        Matcher {
            needle: (!self.text.is_empty()).then(|| self.text.to_lowercase()),
            price: (!self.price.is_empty()).then_some(self.price.as_str()),
            fields,
        }
    }
}

/// A query prepared for repeated matching: the text is lower-cased once.
pub(crate) struct Matcher<'q> {
    needle: Option<String>,
    price: Option<&'q str>,
    fields: &'q [SearchField],
}

impl Matcher<'_> {
    pub(crate) fn matches(&self, candidate: &dyn Candidate) -> bool {
        self.matches_text(candidate) && self.matches_price(candidate)
    }

    fn matches_text(&self, candidate: &dyn Candidate) -> bool {
        let Some(needle) = self.needle.as_deref() else {
            return true;
        };
        self.fields.iter().any(|field| {
            candidate
                .search_text(*field)
                .is_some_and(|text| text.to_lowercase().contains(needle))
        })
    }

    // Exact and case-sensitive: tiers are symbols, not words.
    fn matches_price(&self, candidate: &dyn Candidate) -> bool {
        self.price
            .is_none_or(|price| candidate.facet_value(Facet::PriceRange) == Some(price))
    }
}
