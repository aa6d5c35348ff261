//! Order maps: logical field name to sort direction, in insertion order.

use std::fmt;

use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;

use crate::builder::{SortDir, SortField};

/// Ordered mapping from logical field name to [`SortDir`].
///
/// The order of entries is the ORDER BY sequence. Deserializing keeps the
/// document order of the JSON object. A flag equal to the number one
/// (`1` or `1.0`), `"1"` or `"asc"` is ascending; every other flag, of any
/// JSON type, is descending.
///
/// # Example
///
/// ```
/// use mik_paginate::{OrderMap, SortDir};
///
/// let order: OrderMap = serde_json::from_str(r#"{"createdAt": 0, "id": 1}"#).unwrap();
/// let fields: Vec<_> = order.iter().map(|s| (s.field.as_str(), s.dir)).collect();
/// assert_eq!(fields, vec![("createdAt", SortDir::Desc), ("id", SortDir::Asc)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderMap {
    fields: Vec<SortField>,
}

impl OrderMap {
    /// Create an empty order map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an ascending sort.
    pub fn asc(self, field: impl Into<String>) -> Self {
        self.then(field, SortDir::Asc)
    }

    /// Append a descending sort.
    pub fn desc(self, field: impl Into<String>) -> Self {
        self.then(field, SortDir::Desc)
    }

    /// Append a sort.
    pub fn then(mut self, field: impl Into<String>, dir: SortDir) -> Self {
        self.push(field, dir);
        self
    }

    /// Set the direction for a field. A key already present keeps its
    /// position; a new key is appended.
    pub fn push(&mut self, field: impl Into<String>, dir: SortDir) {
        let field = field.into();
        match self.fields.iter_mut().find(|s| s.field == field) {
            Some(existing) => existing.dir = dir,
            None => self.fields.push(SortField::new(field, dir)),
        }
    }

    /// Iterate sorts in ORDER BY sequence.
    pub fn iter(&self) -> impl Iterator<Item = &SortField> {
        self.fields.iter()
    }

    /// Number of sorted fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no ordering is requested.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, SortDir)> for OrderMap {
    fn from_iter<I: IntoIterator<Item = (K, SortDir)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (field, dir) in iter {
            map.push(field, dir);
        }
        map
    }
}

/// Wire shape of a direction flag.
#[derive(Deserialize)]
#[serde(untagged)]
enum OrderFlag {
    Int(i64),
    Float(f64),
    Text(String),
    // Any other JSON value, read only to be skipped
    #[allow(dead_code)]
    Other(IgnoredAny),
}

impl From<OrderFlag> for SortDir {
    fn from(flag: OrderFlag) -> Self {
        match flag {
            OrderFlag::Int(n) => Self::from_flag(n),
            #[allow(clippy::float_cmp)]
            OrderFlag::Float(n) if n == 1.0 => Self::Asc,
            OrderFlag::Text(s) if s == "1" || s.eq_ignore_ascii_case("asc") => Self::Asc,
            OrderFlag::Float(_) | OrderFlag::Text(_) | OrderFlag::Other(_) => Self::Desc,
        }
    }
}

impl<'de> Deserialize<'de> for OrderMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderMapVisitor;

        impl<'de> Visitor<'de> for OrderMapVisitor {
            type Value = OrderMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field name to sort direction")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<OrderMap, A::Error> {
                let mut map = OrderMap::new();
                while let Some((field, flag)) = access.next_entry::<String, OrderFlag>()? {
                    map.push(field, SortDir::from(flag));
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderMapVisitor)
    }
}
