//! Core types for the SQL query builder.

use std::fmt;

/// Comparison operators understood by the filter compiler.
///
/// Each operator has a canonical token and, for the plain comparisons, a
/// symbolic alias. Parsing happens once, at the request boundary, through
/// [`Operator::from_token`] or [`Operator::from_token_or_eq`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operator {
    /// Equal: `=`
    #[default]
    Eq,
    /// Not equal: `!=`
    Ne,
    /// Greater than: `>`
    Gt,
    /// Less than: `<`
    Lt,
    /// Greater than or equal: `>=`
    Gte,
    /// Less than or equal: `<=`
    Lte,
    /// Pattern match: `LIKE`
    Like,
    /// Case-insensitive pattern match: `ILIKE` (Postgres) or `LIKE` (`SQLite`)
    ILike,
    /// Negated pattern match: `NOT LIKE`
    NotLike,
    /// Negated case-insensitive pattern match: `NOT ILIKE`
    NotILike,
    /// Identity test: `IS NULL`, `IS TRUE`, ...
    Is,
    /// Negated identity test: `IS NOT NULL`, ...
    IsNot,
    /// In set: `IN` or `= ANY`
    In,
    /// Not in set: `NOT IN` or `!= ALL`
    NotIn,
    /// Inclusive range: `BETWEEN $1 AND $2`
    Between,
    /// Negated range: `NOT BETWEEN $1 AND $2`
    NotBetween,
}

impl Operator {
    /// Every operator, in table order.
    pub const ALL: [Self; 16] = [
        Self::Eq,
        Self::Ne,
        Self::Gt,
        Self::Lt,
        Self::Gte,
        Self::Lte,
        Self::Like,
        Self::ILike,
        Self::NotLike,
        Self::NotILike,
        Self::Is,
        Self::IsNot,
        Self::In,
        Self::NotIn,
        Self::Between,
        Self::NotBetween,
    ];

    /// Parse an operator token (case-insensitive).
    ///
    /// # Example
    ///
    /// ```
    /// use mik_paginate::Operator;
    ///
    /// assert_eq!(Operator::from_token("bw"), Some(Operator::Between));
    /// assert_eq!(Operator::from_token(">="), Some(Operator::Gte));
    /// assert_eq!(Operator::from_token("ILIKE"), Some(Operator::ILike));
    /// assert_eq!(Operator::from_token("regex"), None);
    /// ```
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_lowercase().as_str() {
            "eq" | "=" => Some(Self::Eq),
            "neq" | "!=" => Some(Self::Ne),
            "gt" | ">" => Some(Self::Gt),
            "lt" | "<" => Some(Self::Lt),
            "gte" | ">=" => Some(Self::Gte),
            "lte" | "<=" => Some(Self::Lte),
            "like" => Some(Self::Like),
            "ilike" => Some(Self::ILike),
            "nlike" => Some(Self::NotLike),
            "nilike" => Some(Self::NotILike),
            "is" => Some(Self::Is),
            "isnot" => Some(Self::IsNot),
            "in" => Some(Self::In),
            "nin" => Some(Self::NotIn),
            "bw" => Some(Self::Between),
            "nbw" => Some(Self::NotBetween),
            _ => None,
        }
    }

    /// Parse an optional operator token, falling back to [`Operator::Eq`]
    /// when the token is missing or unknown.
    #[must_use]
    pub fn from_token_or_eq(token: Option<&str>) -> Self {
        match token {
            Some(t) => Self::from_token(t).unwrap_or_else(|| {
                tracing::trace!(token = t, "unknown filter operator, using eq");
                Self::Eq
            }),
            None => Self::Eq,
        }
    }

    /// Canonical token for this operator.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "neq",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Gte => "gte",
            Self::Lte => "lte",
            Self::Like => "like",
            Self::ILike => "ilike",
            Self::NotLike => "nlike",
            Self::NotILike => "nilike",
            Self::Is => "is",
            Self::IsNot => "isnot",
            Self::In => "in",
            Self::NotIn => "nin",
            Self::Between => "bw",
            Self::NotBetween => "nbw",
        }
    }

    /// Whether this operator takes a two-element range.
    #[must_use]
    pub const fn is_range(self) -> bool {
        matches!(self, Self::Between | Self::NotBetween)
    }

    /// Whether this operator tests set membership.
    #[must_use]
    pub const fn is_set(self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// SQL parameter values.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL `NULL`.
    Null,
    /// Boolean.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// Text.
    String(String),
    /// List, for ranges and set membership.
    Array(Vec<Value>),
}

impl Value {
    /// The two elements of a range pair, if this is a two-element array.
    #[must_use]
    pub fn as_pair(&self) -> Option<(&Self, &Self)> {
        match self {
            Self::Array(items) => match items.as_slice() {
                [start, end] => Some((start, end)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Unwrap a single-element array into its element; anything else is
    /// returned as is.
    #[must_use]
    pub fn into_single(self) -> Self {
        match self {
            Self::Array(mut items) if items.len() == 1 => items.pop().unwrap_or(Self::Null),
            other => other,
        }
    }

    /// Wrap a scalar into a one-element array; arrays are returned as is.
    #[must_use]
    pub fn into_list(self) -> Vec<Self> {
        match self {
            Self::Array(items) => items,
            other => vec![other],
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl SortDir {
    /// Interpret an order-map direction flag: `1` is ascending, anything
    /// else is descending.
    #[must_use]
    pub const fn from_flag(flag: i64) -> Self {
        if flag == 1 { Self::Asc } else { Self::Desc }
    }

    /// SQL keyword for this direction.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Sort field with direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    /// Field name.
    pub field: String,
    /// Sort direction.
    pub dir: SortDir,
}

impl SortField {
    /// Create a new sort field.
    pub fn new(field: impl Into<String>, dir: SortDir) -> Self {
        Self {
            field: field.into(),
            dir,
        }
    }
}

/// A named query parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Logical parameter name (`ageStart`, `cursor`, ...).
    pub name: String,
    /// Bound value.
    pub value: Value,
}

impl Param {
    /// Create a new named parameter.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// How a predicate's parameters are bound.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// A single value (`field op $1`).
    One(Param),
    /// A range (`field BETWEEN $1 AND $2`).
    Range {
        /// Lower bound.
        start: Param,
        /// Upper bound.
        end: Param,
    },
    /// A list for set membership; the param value is always a [`Value::Array`].
    Set(Param),
}

/// One conjunct of a WHERE clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Physical field reference, unquoted (`users.age`).
    pub field: String,
    /// Comparison operator.
    pub op: Operator,
    /// Bound parameters.
    pub binding: Binding,
}

impl Predicate {
    /// A single-value comparison.
    pub fn compare(field: impl Into<String>, op: Operator, param: Param) -> Self {
        Self {
            field: field.into(),
            op,
            binding: Binding::One(param),
        }
    }

    /// A `BETWEEN` / `NOT BETWEEN` range.
    ///
    /// `negated` selects `NOT BETWEEN`.
    pub fn range(field: impl Into<String>, negated: bool, start: Param, end: Param) -> Self {
        Self {
            field: field.into(),
            op: if negated {
                Operator::NotBetween
            } else {
                Operator::Between
            },
            binding: Binding::Range { start, end },
        }
    }

    /// An `IN` / `NOT IN` set membership test.
    pub fn set(
        field: impl Into<String>,
        negated: bool,
        name: impl Into<String>,
        values: Vec<Value>,
    ) -> Self {
        Self {
            field: field.into(),
            op: if negated { Operator::NotIn } else { Operator::In },
            binding: Binding::Set(Param::new(name, Value::Array(values))),
        }
    }
}

/// Query result with SQL string and parameters.
///
/// `names[i]` is the named parameter that positional parameter `i + 1`
/// was bound from. A list expanded into several placeholders repeats its name.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "QueryResult must be used to execute the query"]
pub struct QueryResult {
    /// Rendered SQL with positional placeholders.
    pub sql: String,
    /// Positional parameter values.
    pub params: Vec<Value>,
    /// Named parameter each positional parameter came from.
    pub names: Vec<String>,
}

impl QueryResult {
    /// First value bound under `name`.
    ///
    /// Names are logical filter keys plus the `Start` / `End` suffixes and
    /// `cursor`, so a key spelled like one of those derived names (a filter
    /// on `ageStart` next to a range on `age`) shadows the later binding.
    /// Use `names` with `params` to see every binding.
    #[must_use]
    pub fn binding(&self, name: &str) -> Option<&Value> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.params.get(i))
    }
}
