//! Pagination requests as handed over by the transport layer.
//!
//! Requests deserialize from JSON with camelCase keys:
//!
//! ```
//! use mik_paginate::{CursorDirection, CursorRequest, OffsetRequest};
//!
//! let req = OffsetRequest::from_json(r#"{
//!     "page": 2,
//!     "limit": 10,
//!     "filters": {"age": {"value": [18, 30], "operator": "bw"}},
//!     "order": {"createdAt": 0, "id": 1}
//! }"#).unwrap();
//! assert_eq!(req.page, Some(2));
//!
//! let req = CursorRequest::from_json(r#"{"prevCursor": 11, "limit": 5}"#).unwrap();
//! assert_eq!(req.resolved_direction(), CursorDirection::Prev);
//! ```

mod filter;
mod order;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::builder::Value;

pub use filter::{Condition, FilterMap};
pub use order::OrderMap;

/// Error type for request parsing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RequestError {
    /// Invalid JSON syntax or shape.
    #[error("invalid request JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Traversal direction of a cursor page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorDirection {
    /// Rows after the cursor, ascending primary key.
    #[default]
    Next,
    /// Rows before the cursor, descending primary key.
    Prev,
}

impl CursorDirection {
    /// Wire name: `"next"` or `"prev"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Prev => "prev",
        }
    }
}

impl fmt::Display for CursorDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Offset (page/limit) request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OffsetRequest {
    /// 1-based page; missing or non-positive means page 1.
    pub page: Option<i64>,
    /// Requested page size; out of range means the configured default.
    pub limit: Option<i64>,
    /// Filter conditions, AND-composed.
    pub filters: FilterMap,
    /// ORDER BY sequence.
    pub order: OrderMap,
}

impl OffsetRequest {
    /// Create an empty request (page 1, default limit).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a request from JSON.
    pub fn from_json(json: &str) -> Result<Self, RequestError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the page.
    #[must_use]
    pub fn with_page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the requested limit.
    #[must_use]
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the filters.
    #[must_use]
    pub fn with_filters(mut self, filters: FilterMap) -> Self {
        self.filters = filters;
        self
    }

    /// Set the ordering.
    #[must_use]
    pub fn with_order(mut self, order: OrderMap) -> Self {
        self.order = order;
        self
    }

    /// Effective 1-based page.
    #[must_use]
    pub fn resolved_page(&self) -> u64 {
        self.page
            .and_then(|p| u64::try_from(p).ok())
            .filter(|p| *p > 0)
            .unwrap_or(1)
    }
}

/// Cursor request.
///
/// Direction is taken from `direction` when present. Otherwise a
/// `prev_cursor` signals backward intent, and anything else is forward.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CursorRequest {
    /// Primary-key value to page after (`next`) or before (`prev`).
    pub cursor: Option<Value>,
    /// Primary-key value to page before; its presence implies `prev`.
    pub prev_cursor: Option<Value>,
    /// Explicit direction, overriding inference.
    pub direction: Option<CursorDirection>,
    /// Requested page size; out of range means the configured default.
    pub limit: Option<i64>,
    /// Filter conditions, AND-composed.
    pub filters: FilterMap,
    /// Caller ordering, applied before the primary-key tiebreak.
    pub order: OrderMap,
}

impl CursorRequest {
    /// Create an empty request (first page, forward).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a request from JSON.
    pub fn from_json(json: &str) -> Result<Self, RequestError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Page after this primary-key value.
    #[must_use]
    pub fn after(mut self, cursor: impl Into<Value>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Page before this primary-key value.
    #[must_use]
    pub fn before(mut self, cursor: impl Into<Value>) -> Self {
        self.prev_cursor = Some(cursor.into());
        self
    }

    /// Set an explicit direction.
    #[must_use]
    pub fn with_direction(mut self, direction: CursorDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Set the requested limit.
    #[must_use]
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the filters.
    #[must_use]
    pub fn with_filters(mut self, filters: FilterMap) -> Self {
        self.filters = filters;
        self
    }

    /// Set the ordering.
    #[must_use]
    pub fn with_order(mut self, order: OrderMap) -> Self {
        self.order = order;
        self
    }

    /// Effective direction: explicit, else `prev` on a previous cursor, else `next`.
    #[must_use]
    pub fn resolved_direction(&self) -> CursorDirection {
        match (self.direction, &self.prev_cursor) {
            (Some(direction), _) => direction,
            (None, Some(_)) => CursorDirection::Prev,
            (None, None) => CursorDirection::Next,
        }
    }

    /// Boundary value for a direction. `prev` reads `prev_cursor` first and
    /// falls back to `cursor`.
    #[must_use]
    pub fn boundary(&self, direction: CursorDirection) -> Option<&Value> {
        match direction {
            CursorDirection::Next => self.cursor.as_ref(),
            CursorDirection::Prev => self.prev_cursor.as_ref().or(self.cursor.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Operator, SortDir};

    #[test]
    fn test_offset_request_defaults() {
        let req = OffsetRequest::from_json("{}").unwrap();
        assert_eq!(req, OffsetRequest::new());
        assert_eq!(req.resolved_page(), 1);
        assert!(req.filters.is_empty());
        assert!(req.order.is_empty());
    }

    #[test]
    fn test_offset_request_full() {
        let req = OffsetRequest::from_json(
            r#"{
                "page": 2,
                "limit": 10,
                "filters": {"age": {"value": [18, 30], "operator": "bw"}, "active": true},
                "order": {"createdAt": 0, "id": 1}
            }"#,
        )
        .unwrap();

        assert_eq!(req.resolved_page(), 2);
        assert_eq!(req.limit, Some(10));
        assert_eq!(req.filters.get("age").unwrap().operator, Operator::Between);
        let order: Vec<_> = req.order.iter().map(|s| s.dir).collect();
        assert_eq!(order, vec![SortDir::Desc, SortDir::Asc]);
    }

    #[test]
    fn test_non_positive_page_is_first_page() {
        assert_eq!(OffsetRequest::new().with_page(0).resolved_page(), 1);
        assert_eq!(OffsetRequest::new().with_page(-3).resolved_page(), 1);
        assert_eq!(OffsetRequest::new().with_page(7).resolved_page(), 7);
    }

    #[test]
    fn test_invalid_json() {
        let err = OffsetRequest::from_json("{page: 1}").unwrap_err();
        assert!(matches!(err, RequestError::InvalidJson(_)));
        assert!(err.to_string().starts_with("invalid request JSON"));
    }

    #[test]
    fn test_direction_defaults_to_next() {
        assert_eq!(CursorRequest::new().resolved_direction(), CursorDirection::Next);
        assert_eq!(
            CursorRequest::new().after(10).resolved_direction(),
            CursorDirection::Next
        );
    }

    #[test]
    fn test_direction_inferred_from_prev_cursor() {
        let req = CursorRequest::new().before(11);
        assert_eq!(req.resolved_direction(), CursorDirection::Prev);
        assert_eq!(req.boundary(CursorDirection::Prev), Some(&Value::Int(11)));
    }

    #[test]
    fn test_explicit_direction_wins() {
        let req = CursorRequest::new()
            .before(11)
            .with_direction(CursorDirection::Next);
        assert_eq!(req.resolved_direction(), CursorDirection::Next);
        assert_eq!(req.boundary(CursorDirection::Next), None);

        let req = CursorRequest::new()
            .after(11)
            .with_direction(CursorDirection::Prev);
        assert_eq!(req.resolved_direction(), CursorDirection::Prev);
        assert_eq!(req.boundary(CursorDirection::Prev), Some(&Value::Int(11)));
    }

    #[test]
    fn test_cursor_request_json() {
        let req =
            CursorRequest::from_json(r#"{"cursor": "abc", "direction": "prev", "limit": 5}"#)
                .unwrap();
        assert_eq!(req.cursor, Some(Value::String("abc".into())));
        assert_eq!(req.resolved_direction(), CursorDirection::Prev);
        assert_eq!(req.limit, Some(5));
    }

    #[test]
    fn test_null_cursor_is_absent() {
        let req = CursorRequest::from_json(r#"{"cursor": null}"#).unwrap();
        assert_eq!(req.cursor, None);
    }

    #[test]
    fn test_direction_wire_names() {
        assert_eq!(serde_json::to_string(&CursorDirection::Prev).unwrap(), "\"prev\"");
        assert_eq!(CursorDirection::Next.to_string(), "next");
    }
}
