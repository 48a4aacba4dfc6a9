//! Facets: the independent dimensions along which preferences are learned.
//!
//! Each facet keeps its own weight map inside a
//! [`PreferenceSet`](crate::PreferenceSet); scores from every facet are summed
//! when ranking.
//!
//! # Examples
//! ```
//! use forkful_core::Facet;
//!
//! assert_eq!(Facet::Category.as_str(), "category");
//! assert_eq!(Facet::PriceRange.to_string(), "price-range");
//! ```

use thiserror::Error;

/// Price-tier labels offered by the price filter, cheapest first.
pub const PRICE_TIERS: [&str; 3] = ["€", "€€", "€€€"];

/// A dimension of user preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Facet {
    /// Cuisine or venue category, e.g. `Pizza`.
    Category,
    /// Price tier label, e.g. `€€`.
    PriceRange,
}

impl Facet {
    /// Every facet, in scoring order.
    pub const ALL: [Self; 2] = [Self::Category, Self::PriceRange];

    /// Return the facet as a lowercase `&str`.
    ///
    /// # Examples
    /// ```
    /// use forkful_core::Facet;
    ///
    /// assert_eq!(Facet::PriceRange.as_str(), "price-range");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::PriceRange => "price-range",
        }
    }

    /// Name of the facet's weight map in the persisted JSON record.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Category => "categories",
            Self::PriceRange => "priceRanges",
        }
    }
}

impl std::fmt::Display for Facet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a [`Facet`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown facet '{0}'")]
pub struct ParseFacetError(pub String);

impl std::str::FromStr for Facet {
    type Err = ParseFacetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "category" | "categories" => Ok(Self::Category),
            "price-range" | "price" | "priceranges" => Ok(Self::PriceRange),
            _ => Err(ParseFacetError(s.to_owned())),
        }
    }
}
