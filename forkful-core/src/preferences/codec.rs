//! JSON encoding of [`PreferenceSet`] records.
//!
//! The persisted shape is `{"categories":{..},"priceRanges":{..}}`. Decoding
//! is tolerant: a facet whose value is not an object decodes as an empty map,
//! and individual entries that are not positive integers are dropped. Only a
//! payload that is not JSON, or not a JSON object, is rejected outright.

use std::collections::BTreeMap;

use log::warn;
use serde_json::{Map, Value};
use thiserror::Error;

use super::PreferenceSet;
use crate::Facet;

/// Errors raised when a persisted payload cannot be read as a preference set.
#[derive(Debug, Error)]
pub enum PreferenceDecodeError {
    /// The payload was not valid JSON.
    #[error("preference payload is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),
    /// The payload was JSON but not an object.
    #[error("preference payload must be a JSON object, found {found}")]
    NotAnObject {
        /// Kind of JSON value found at the top level.
        found: &'static str,
    },
}

impl PreferenceSet {
    /// Serialise the set to its persisted JSON form.
    ///
    /// # Errors
    /// Returns the underlying `serde_json` error if serialisation fails.
    ///
    /// # Examples
    /// ```
    /// use forkful_core::{Facet, PreferenceSet};
    ///
    /// let preferences = PreferenceSet::new().with_weight(Facet::Category, "Pizza", 3);
    /// let json = preferences.to_json().expect("serialise");
    /// assert_eq!(json, r#"{"categories":{"Pizza":3},"priceRanges":{}}"#);
    /// ```
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a persisted JSON payload, repairing partially corrupt facets.
    ///
    /// # Errors
    /// Returns [`PreferenceDecodeError`] when the payload is not JSON or its
    /// top level is not an object.
    ///
    /// # Examples
    /// ```
    /// use forkful_core::{Facet, PreferenceSet};
    ///
    /// let payload = r#"{"categories":"not-an-object","priceRanges":{"€":2}}"#;
    /// let preferences = PreferenceSet::from_json(payload).expect("decode");
    /// assert!(preferences.weights(Facet::Category).is_empty());
    /// assert_eq!(preferences.weight(Facet::PriceRange, "€"), 2);
    /// ```
    pub fn from_json(payload: &str) -> Result<Self, PreferenceDecodeError> {
        let value: Value = serde_json::from_str(payload).map_err(PreferenceDecodeError::Json)?;
        let fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(PreferenceDecodeError::NotAnObject {
                    found: json_kind(&other),
                });
            }
        };

        let mut preferences = Self::new();
        for facet in Facet::ALL {
            for (key, weight) in decode_facet(facet, fields.get(facet.field_name())) {
                preferences.set_weight(facet, &key, weight);
            }
        }
        Ok(preferences)
    }
}

fn decode_facet(facet: Facet, value: Option<&Value>) -> BTreeMap<String, u32> {
    match value {
        None => BTreeMap::new(),
        Some(Value::Object(entries)) => decode_weights(facet, entries),
        Some(other) => {
            warn!(
                "Preference facet {} was {} rather than an object; treating it as empty",
                facet.field_name(),
                json_kind(other)
            );
            BTreeMap::new()
        }
    }
}

fn decode_weights(facet: Facet, entries: &Map<String, Value>) -> BTreeMap<String, u32> {
    entries
        .iter()
        .filter_map(|(key, raw)| {
            let weight = raw.as_u64().and_then(|n| u32::try_from(n).ok());
            match weight {
                Some(0) => None,
                Some(count) => Some((key.clone(), count)),
                None => {
                    warn!(
                        "Dropped {} preference {key:?}: weight {raw} is not a positive integer",
                        facet.as_str()
                    );
                    None
                }
            }
        })
        .collect()
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
