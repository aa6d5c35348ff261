//! Filter and order compilers: request maps to query predicates and sorts.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use crate::builder::{Operator, Param, Predicate, SelectQuery, Value};
use crate::dialect::Dialect;
use crate::request::{Condition, FilterMap, OrderMap};

/// Handling of `bw` / `nbw` filters whose value is not a two-element pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeMode {
    /// Reject the filter with [`CompileError::MalformedRange`].
    #[default]
    Strict,
    /// Degrade to `=` (`bw`) or `!=` (`nbw`) against the whole value.
    Lenient,
}

/// Error type for filter compilation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// A range operator was given something other than a two-element array.
    #[error("range filter on `{field}` expects a two-element value")]
    MalformedRange {
        /// Logical field name of the offending filter.
        field: String,
    },
}

/// Resolves logical field names to alias-qualified physical references.
#[derive(Debug, Clone)]
pub(crate) struct FieldResolver<'a> {
    field_map: &'a BTreeMap<String, String>,
    alias: String,
}

impl<'a> FieldResolver<'a> {
    pub(crate) fn new(field_map: &'a BTreeMap<String, String>, alias: impl Into<String>) -> Self {
        Self {
            field_map,
            alias: alias.into(),
        }
    }

    /// Remapped column (or the key itself), qualified by the alias unless
    /// the column is already qualified.
    pub(crate) fn resolve(&self, key: &str) -> String {
        let column = self.field_map.get(key).map_or(key, String::as_str);
        if column.contains('.') || self.alias.is_empty() {
            column.to_string()
        } else {
            format!("{}.{column}", self.alias)
        }
    }
}

/// Compile one filter into a predicate.
///
/// Parameters are named after the logical key as written, so distinct
/// keys never share a name.
pub(crate) fn compile_condition(
    resolver: &FieldResolver<'_>,
    key: &str,
    condition: &Condition,
    range_mode: RangeMode,
) -> Result<Predicate, CompileError> {
    let field = resolver.resolve(key);
    let name = key.to_string();
    let op = condition.operator;

    if op.is_range() {
        let negated = op == Operator::NotBetween;
        if let Some((start, end)) = condition.value.as_pair() {
            return Ok(Predicate::range(
                field,
                negated,
                Param::new(format!("{name}Start"), start.clone()),
                Param::new(format!("{name}End"), end.clone()),
            ));
        }
        return match range_mode {
            RangeMode::Strict => Err(CompileError::MalformedRange {
                field: key.to_string(),
            }),
            RangeMode::Lenient => {
                tracing::trace!(field = key, operator = %op, "range filter without a pair, comparing whole value");
                let fallback = if negated { Operator::Ne } else { Operator::Eq };
                Ok(Predicate::compare(
                    field,
                    fallback,
                    Param::new(name, condition.value.clone()),
                ))
            },
        };
    }

    if op.is_set() {
        return Ok(Predicate::set(
            field,
            op == Operator::NotIn,
            name,
            condition.value.clone().into_list(),
        ));
    }

    Ok(Predicate::compare(
        field,
        op,
        Param::new(name, condition.value.clone().into_single()),
    ))
}

/// Append one AND-ed predicate per filter key.
pub(crate) fn apply_filters<D: Dialect>(
    mut query: SelectQuery<D>,
    resolver: &FieldResolver<'_>,
    filters: &FilterMap,
    range_mode: RangeMode,
) -> Result<SelectQuery<D>, CompileError> {
    for (key, condition) in filters.iter() {
        query = query.and_where(compile_condition(resolver, key, condition, range_mode)?);
    }
    Ok(query)
}

/// Append one ORDER BY clause per order key, in map order.
pub(crate) fn apply_order<D: Dialect>(
    mut query: SelectQuery<D>,
    resolver: &FieldResolver<'_>,
    order: &OrderMap,
) -> SelectQuery<D> {
    for sort in order.iter() {
        query = query.order_by(resolver.resolve(&sort.field), sort.dir);
    }
    query
}

/// Primary-key boundary predicate for cursor pages.
pub(crate) fn cursor_boundary(field: String, op: Operator, value: &Value) -> Predicate {
    Predicate::compare(field, op, Param::new("cursor", value.clone()))
}
