//! Result shapes of the two pagination modes.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::request::CursorDirection;

/// One offset page.
///
/// Serializes as `{<result_key>: rows, total, page, limit, total_page}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetPage<R> {
    /// Key the rows are serialized under.
    pub result_key: String,
    /// Rows of this page, in query order.
    pub rows: Vec<R>,
    /// Rows matching the filters, before windowing.
    pub total: u64,
    /// 1-based page number.
    pub page: u64,
    /// Effective page size.
    pub limit: u64,
    /// `ceil(total / limit)`.
    pub total_page: u64,
}

impl<R> OffsetPage<R> {
    pub(crate) fn new(result_key: &str, rows: Vec<R>, total: u64, page: u64, limit: u64) -> Self {
        Self {
            result_key: result_key.to_string(),
            rows,
            total,
            page,
            limit,
            total_page: total_pages(total, limit),
        }
    }

    /// Whether a later page has rows.
    pub const fn has_next(&self) -> bool {
        self.page < self.total_page
    }
}

/// `ceil(total / limit)`; zero when `limit` is zero.
pub(crate) const fn total_pages(total: u64, limit: u64) -> u64 {
    if limit == 0 { 0 } else { total.div_ceil(limit) }
}

/// One cursor page.
///
/// Both cursors are rows: `next_cursor` is the last row returned and
/// `prev_cursor` the first. Serializes as
/// `{<result_key>: rows, nextCursor, prevCursor, direction}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorPage<R> {
    /// Key the rows are serialized under.
    pub result_key: String,
    /// Rows of this page, in query order.
    pub rows: Vec<R>,
    /// Last row, if any.
    pub next_cursor: Option<R>,
    /// First row, if any.
    pub prev_cursor: Option<R>,
    /// Direction the page was fetched in.
    pub direction: CursorDirection,
}

impl<R: Clone> CursorPage<R> {
    pub(crate) fn new(result_key: &str, rows: Vec<R>, direction: CursorDirection) -> Self {
        Self {
            result_key: result_key.to_string(),
            next_cursor: rows.last().cloned(),
            prev_cursor: rows.first().cloned(),
            rows,
            direction,
        }
    }
}

impl<R> CursorPage<R> {
    /// Whether the page is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<R: Serialize> Serialize for OffsetPage<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5))?;
        map.serialize_entry(&self.result_key, &self.rows)?;
        map.serialize_entry("total", &self.total)?;
        map.serialize_entry("page", &self.page)?;
        map.serialize_entry("limit", &self.limit)?;
        map.serialize_entry("total_page", &self.total_page)?;
        map.end()
    }
}

impl<R: Serialize> Serialize for CursorPage<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry(&self.result_key, &self.rows)?;
        map.serialize_entry("nextCursor", &self.next_cursor)?;
        map.serialize_entry("prevCursor", &self.prev_cursor)?;
        map.serialize_entry("direction", &self.direction)?;
        map.end()
    }
}
