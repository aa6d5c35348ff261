//! Filter maps: logical field name to condition.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::builder::{Operator, Value};

/// A single filter condition.
///
/// A bare scalar in a request (`{"status": "active"}`) becomes a condition
/// with [`Operator::Eq`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawCondition")]
pub struct Condition {
    /// Scalar, pair or list.
    pub value: Value,
    /// Parsed operator; unknown tokens are already [`Operator::Eq`].
    pub operator: Operator,
}

impl Condition {
    /// Create a condition with an explicit operator.
    pub fn new(operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            operator,
        }
    }

    /// Equality shorthand.
    pub fn eq(value: impl Into<Value>) -> Self {
        Self::new(Operator::Eq, value)
    }
}

/// Wire shape of a condition: `{value, operator?}` or a bare value.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCondition {
    Structured {
        value: Value,
        #[serde(default)]
        operator: Option<String>,
    },
    Bare(Value),
}

impl From<RawCondition> for Condition {
    fn from(raw: RawCondition) -> Self {
        match raw {
            RawCondition::Structured { value, operator } => Self {
                value,
                operator: Operator::from_token_or_eq(operator.as_deref()),
            },
            RawCondition::Bare(value) => Self::eq(value),
        }
    }
}

/// Mapping from logical field name to [`Condition`].
///
/// Keys are unique. Iteration is in key order so that parameter numbering
/// is stable for a given map.
///
/// # Example
///
/// ```
/// use mik_paginate::{FilterMap, Operator};
///
/// let filters = FilterMap::new()
///     .eq("status", "active")
///     .with("age", Operator::Between, vec![18, 30]);
/// assert_eq!(filters.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct FilterMap {
    conditions: BTreeMap<String, Condition>,
}

impl FilterMap {
    /// Create an empty filter map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality filter (bare scalar shorthand).
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, Condition::eq(value));
        self
    }

    /// Add a filter with an explicit operator.
    pub fn with(mut self, field: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        self.insert(field, Condition::new(op, value));
        self
    }

    /// Insert a condition, returning the one it replaced.
    pub fn insert(&mut self, field: impl Into<String>, condition: Condition) -> Option<Condition> {
        self.conditions.insert(field.into(), condition)
    }

    /// Condition for a field.
    pub fn get(&self, field: &str) -> Option<&Condition> {
        self.conditions.get(field)
    }

    /// Iterate `(field, condition)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Condition)> {
        self.conditions.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of filtered fields.
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Whether no filters are set.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Condition)> for FilterMap {
    fn from_iter<I: IntoIterator<Item = (K, Condition)>>(iter: I) -> Self {
        Self {
            conditions: iter.into_iter().map(|(k, c)| (k.into(), c)).collect(),
        }
    }
}
