//! Records that can be filtered and ranked.
//!
//! A [`Candidate`] exposes an identifier, the facet values used for scoring,
//! and the free-text fields used by search filters. [`Restaurant`] and
//! [`Reservation`] mirror the rows returned by the hosted backend and may
//! arrive with fields missing; absent values simply match nothing.

use serde::{Deserialize, Serialize};

use crate::Facet;

/// Field decoders that turn mistyped backend values into absent ones.
///
/// Rows come from a loosely typed backend. A single row with, say, a numeric
/// price must not make the whole listing undecodable, so each field is read
/// as a JSON value and anything of the wrong shape becomes `None`.
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub(super) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(text) => Some(text),
            _ => None,
        })
    }

    pub(super) fn name<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        text(deserializer).map(Option::unwrap_or_default)
    }

    pub(super) fn identifier<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(id) => id,
            Value::Number(id) => id.to_string(),
            _ => String::new(),
        })
    }

    pub(super) fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Value::deserialize(deserializer)?.as_f64())
    }

    pub(super) fn count<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<u64>,
    {
        Ok(Value::deserialize(deserializer)?
            .as_u64()
            .and_then(|count| T::try_from(count).ok()))
    }

    pub(super) fn nested<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
    }
}

/// Free-text fields a search query can match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    /// Display name of the restaurant.
    Name,
    /// Cuisine category.
    Category,
    /// Street address or neighbourhood.
    Location,
    /// Reservation status such as `confirmed`.
    Status,
}

/// A record the ranking engine can filter and score.
///
/// # Examples
/// ```
/// use forkful_core::{Candidate, Facet, Restaurant, SearchField};
///
/// let restaurant = Restaurant::new("r1", "Luigi's")
///     .with_category("Pizza")
///     .with_price("€€");
/// assert_eq!(restaurant.facet_value(Facet::Category), Some("Pizza"));
/// assert_eq!(restaurant.search_text(SearchField::Status), None);
/// ```
pub trait Candidate {
    /// Stable identifier of the record.
    fn id(&self) -> &str;

    /// Value of `facet`, when the record carries one.
    fn facet_value(&self, facet: Facet) -> Option<&str>;

    /// Text of `field`, when the record carries one.
    fn search_text(&self, field: SearchField) -> Option<&str>;
}

impl<C: Candidate + ?Sized> Candidate for &C {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn facet_value(&self, facet: Facet) -> Option<&str> {
        (**self).facet_value(facet)
    }

    fn search_text(&self, field: SearchField) -> Option<&str> {
        (**self).search_text(field)
    }
}

/// A restaurant row as served by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Restaurant {
    /// Unique identifier. Numeric identifiers are kept in their decimal form.
    #[serde(default, deserialize_with = "lenient::identifier")]
    pub id: String,
    /// Owner account, when known.
    #[serde(default, deserialize_with = "lenient::text")]
    pub user_id: Option<String>,
    /// Display name.
    #[serde(default, deserialize_with = "lenient::name")]
    pub name: String,
    /// Cover image location.
    #[serde(default, deserialize_with = "lenient::text")]
    pub image_url: Option<String>,
    /// Price tier label, one of [`PRICE_TIERS`](crate::PRICE_TIERS) in practice.
    #[serde(default, deserialize_with = "lenient::text")]
    pub price: Option<String>,
    /// Address or neighbourhood.
    #[serde(default, deserialize_with = "lenient::text")]
    pub location: Option<String>,
    /// Average rating left by diners.
    #[serde(default, deserialize_with = "lenient::number")]
    pub evaluation: Option<f64>,
    /// Phone number.
    #[serde(default, deserialize_with = "lenient::text")]
    pub contact: Option<String>,
    /// Cuisine category.
    #[serde(default, deserialize_with = "lenient::text")]
    pub category: Option<String>,
}

impl Restaurant {
    /// Construct a restaurant with only an identifier and name.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the category while returning `self` for chaining.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the price tier while returning `self` for chaining.
    #[must_use]
    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    /// Set the location while returning `self` for chaining.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl Candidate for Restaurant {
    fn id(&self) -> &str {
        &self.id
    }

    fn facet_value(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Category => self.category.as_deref(),
            Facet::PriceRange => self.price.as_deref(),
        }
    }

    fn search_text(&self, field: SearchField) -> Option<&str> {
        match field {
            SearchField::Name => Some(self.name.as_str()),
            SearchField::Category => self.category.as_deref(),
            SearchField::Location => self.location.as_deref(),
            SearchField::Status => None,
        }
    }
}

/// Restaurant summary embedded in a reservation row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReservedRestaurant {
    /// Display name.
    #[serde(default, deserialize_with = "lenient::name")]
    pub name: String,
    /// Address or neighbourhood.
    #[serde(default, deserialize_with = "lenient::text")]
    pub location: Option<String>,
    /// Cover image location.
    #[serde(default, deserialize_with = "lenient::text")]
    pub image_url: Option<String>,
}

/// A reservation row joined with its restaurant summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Reservation {
    /// Unique identifier. Numeric identifiers are kept in their decimal form.
    #[serde(default, deserialize_with = "lenient::identifier")]
    pub id: String,
    /// Account that made the reservation.
    #[serde(default, deserialize_with = "lenient::text")]
    pub user_id: Option<String>,
    /// Reserved restaurant.
    #[serde(default, deserialize_with = "lenient::text")]
    pub restaurant_id: Option<String>,
    /// Booking time as an ISO 8601 timestamp.
    #[serde(default, deserialize_with = "lenient::text")]
    pub reservation_time: Option<String>,
    /// Party size.
    #[serde(default, rename = "numberGuests", deserialize_with = "lenient::count")]
    pub number_guests: Option<u32>,
    /// Booking status such as `pending` or `confirmed`.
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
    /// Star rating left after the visit.
    #[serde(default, deserialize_with = "lenient::count")]
    pub grade: Option<u8>,
    /// Joined restaurant summary.
    #[serde(default, rename = "restaurants", deserialize_with = "lenient::nested")]
    pub restaurant: Option<ReservedRestaurant>,
}

impl Candidate for Reservation {
    fn id(&self) -> &str {
        &self.id
    }

    fn facet_value(&self, _facet: Facet) -> Option<&str> {
        None
    }

    fn search_text(&self, field: SearchField) -> Option<&str> {
        match field {
            SearchField::Name => self.restaurant.as_ref().map(|r| r.name.as_str()),
            SearchField::Location => self
                .restaurant
                .as_ref()
                .and_then(|r| r.location.as_deref()),
            SearchField::Status => self.status.as_deref(),
            SearchField::Category => None,
        }
    }
}
