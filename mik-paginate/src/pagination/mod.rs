//! Offset and cursor pagination over a [`Collection`].
//!
//! # Strategies
//!
//! | Strategy   | Jump to Page | Total count | Stability | Use Case               |
//! |------------|--------------|-------------|-----------|------------------------|
//! | **Offset** | Yes          | Yes         | Unstable* | Admin panels, reports  |
//! | **Cursor** | No           | On request  | Stable    | Feeds, infinite scroll |
//!
//! *Unstable = results shift if data changes between requests
//!
//! # Example
//!
//! ```
//! use mik_paginate::{FilterMap, OffsetRequest, Operator, OrderMap, Paginator, Postgres};
//!
//! let paginator = Paginator::builder(Postgres)
//!     .map_field("createdAt", "created_at")
//!     .build();
//!
//! let request = OffsetRequest::new()
//!     .with_page(2)
//!     .with_limit(10)
//!     .with_filters(FilterMap::new().with("age", Operator::Between, vec![18, 30]))
//!     .with_order(OrderMap::new().desc("createdAt"));
//!
//! let query = paginator.offset_query("users", &request).unwrap().build();
//! assert_eq!(
//!     query.sql,
//!     r#"SELECT * FROM "users" WHERE "users"."age" BETWEEN $1 AND $2 ORDER BY "users"."created_at" DESC LIMIT 10 OFFSET 10"#
//! );
//! ```

mod collection;
mod config;
mod error;
mod page;

pub use collection::Collection;
pub use config::{ConfigError, DEFAULT_LIMIT, MAX_LIMIT, PaginatorBuilder, PaginatorConfig};
pub use error::PaginateError;
pub use page::{CursorPage, OffsetPage};

use crate::builder::{Operator, SelectQuery, SortDir};
use crate::compile::{CompileError, FieldResolver, apply_filters, apply_order, cursor_boundary};
use crate::dialect::Dialect;
use crate::request::{CursorDirection, CursorRequest, FilterMap, OffsetRequest};

/// Largest OFFSET both dialects accept (a signed 64-bit integer).
const MAX_SKIP: u64 = i64::MAX.unsigned_abs();

/// Compiles requests into queries and shapes the results.
///
/// A paginator holds only its frozen [`PaginatorConfig`], so one instance
/// can serve any number of concurrent operations.
#[derive(Debug, Clone)]
pub struct Paginator<D: Dialect> {
    dialect: D,
    config: PaginatorConfig,
}

impl<D: Dialect> Paginator<D> {
    /// Create a paginator from a configuration value.
    pub fn new(dialect: D, config: PaginatorConfig) -> Self {
        Self {
            dialect,
            config: config.normalized(),
        }
    }

    /// Start a builder from the built-in defaults.
    pub fn builder(dialect: D) -> PaginatorBuilder<D> {
        PaginatorBuilder::new(dialect)
    }

    /// The frozen configuration.
    pub const fn config(&self) -> &PaginatorConfig {
        &self.config
    }

    /// Fetch one offset page.
    pub async fn offset<C: Collection>(
        &self,
        collection: &C,
        request: &OffsetRequest,
    ) -> Result<OffsetPage<C::Row>, PaginateError<C::Error>> {
        let table = self.table_for(collection);
        let page = request.resolved_page();
        let limit = self.config.effective_limit(request.limit);

        let query = self.offset_query(table, request)?;
        let rows_query = query.build();
        let count_query = query.build_count();
        tracing::debug!(
            table,
            sql = %rows_query.sql,
            params = rows_query.params.len(),
            "offset page"
        );

        let (rows, total) = collection
            .fetch_page(&rows_query, &count_query)
            .await
            .map_err(PaginateError::Execution)?;
        Ok(OffsetPage::new(&self.config.result_key, rows, total, page, limit))
    }

    /// Fetch one cursor page.
    pub async fn cursor<C>(
        &self,
        collection: &C,
        request: &CursorRequest,
    ) -> Result<CursorPage<C::Row>, PaginateError<C::Error>>
    where
        C: Collection,
        C::Row: Clone,
    {
        let table = self.table_for(collection);
        let direction = request.resolved_direction();

        let query = self.cursor_query(table, request)?.build();
        tracing::debug!(
            table,
            %direction,
            sql = %query.sql,
            params = query.params.len(),
            "cursor page"
        );

        let rows = collection
            .fetch_rows(&query)
            .await
            .map_err(PaginateError::Execution)?;
        Ok(CursorPage::new(&self.config.result_key, rows, direction))
    }

    /// Count the rows matching a cursor request's filters.
    pub async fn cursor_total<C: Collection>(
        &self,
        collection: &C,
        request: &CursorRequest,
    ) -> Result<u64, PaginateError<C::Error>> {
        let table = self.table_for(collection);
        let query = self.filtered(table, &request.filters)?.build_count();
        tracing::debug!(table, sql = %query.sql, "cursor total");

        collection
            .fetch_count(&query)
            .await
            .map_err(PaginateError::Execution)
    }

    /// The windowed query an offset request compiles to.
    ///
    /// `build()` gives the row query and `build_count()` the total.
    pub fn offset_query(
        &self,
        table: &str,
        request: &OffsetRequest,
    ) -> Result<SelectQuery<D>, CompileError> {
        let limit = self.config.effective_limit(request.limit);
        // Pages far past the data still render a valid, empty window
        let skip = (request.resolved_page() - 1)
            .saturating_mul(limit)
            .min(MAX_SKIP);

        let query = self.filtered(table, &request.filters)?;
        let resolver = self.resolver(&query);
        let query = apply_order(query, &resolver, &request.order).limit(limit);
        Ok(if skip > 0 { query.offset(skip) } else { query })
    }

    /// The query a cursor request compiles to.
    pub fn cursor_query(
        &self,
        table: &str,
        request: &CursorRequest,
    ) -> Result<SelectQuery<D>, CompileError> {
        let direction = request.resolved_direction();
        let mut query = self.filtered(table, &request.filters)?;
        let resolver = self.resolver(&query);
        let pk = resolver.resolve(&self.config.primary_key);

        let (boundary, tiebreak) = match direction {
            CursorDirection::Next => (Operator::Gt, SortDir::Asc),
            CursorDirection::Prev => (Operator::Lt, SortDir::Desc),
        };
        if let Some(cursor) = request.boundary(direction) {
            query = query.and_where(cursor_boundary(pk.clone(), boundary, cursor));
        }

        // Caller ordering first, primary key last
        let query = apply_order(query, &resolver, &request.order);
        Ok(query
            .order_by(pk, tiebreak)
            .limit(self.config.effective_limit(request.limit)))
    }

    fn filtered(&self, table: &str, filters: &FilterMap) -> Result<SelectQuery<D>, CompileError> {
        let query = SelectQuery::new(self.dialect, table);
        let resolver = self.resolver(&query);
        apply_filters(query, &resolver, filters, self.config.range_mode)
    }

    fn resolver(&self, query: &SelectQuery<D>) -> FieldResolver<'_> {
        FieldResolver::new(&self.config.field_map, query.alias_name())
    }

    fn table_for<'a, C: Collection>(&'a self, collection: &'a C) -> &'a str {
        self.config
            .entity
            .as_deref()
            .unwrap_or_else(|| collection.table_name())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::builder::{QueryResult, Value};
    use crate::compile::RangeMode;
    use crate::dialect::{Postgres, Sqlite};
    use crate::request::OrderMap;
    use async_trait::async_trait;

    /// Records every query and answers with canned rows.
    struct Recorder {
        table: &'static str,
        rows: Vec<i64>,
        total: u64,
        seen: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn new(rows: Vec<i64>, total: u64) -> Self {
            Self {
                table: "users",
                rows,
                total,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Collection for Recorder {
        type Row = i64;
        type Error = String;

        fn table_name(&self) -> &str {
            self.table
        }

        async fn fetch_rows(&self, query: &QueryResult) -> Result<Vec<i64>, String> {
            self.seen.lock().unwrap().push(query.sql.clone());
            Ok(self.rows.clone())
        }

        async fn fetch_count(&self, query: &QueryResult) -> Result<u64, String> {
            self.seen.lock().unwrap().push(query.sql.clone());
            Ok(self.total)
        }
    }

    struct Broken;

    #[async_trait]
    impl Collection for Broken {
        type Row = i64;
        type Error = String;

        fn table_name(&self) -> &str {
            "broken"
        }

        async fn fetch_rows(&self, _query: &QueryResult) -> Result<Vec<i64>, String> {
            Err("no such column: nope".to_string())
        }

        async fn fetch_count(&self, _query: &QueryResult) -> Result<u64, String> {
            Err("no such column: nope".to_string())
        }
    }

    // =========================================================================
    // Query compilation
    // =========================================================================

    #[test]
    fn test_offset_query_windows_by_page() {
        let paginator = Paginator::builder(Postgres).build();
        let request = OffsetRequest::new().with_page(3).with_limit(20);
        let query = paginator.offset_query("users", &request).unwrap();
        assert_eq!(
            query.build().sql,
            "SELECT * FROM \"users\" LIMIT 20 OFFSET 40"
        );
    }

    #[test]
    fn test_offset_query_first_page_has_no_offset() {
        let paginator = Paginator::builder(Sqlite).build();
        let query = paginator.offset_query("users", &OffsetRequest::new()).unwrap();
        assert_eq!(query.build().sql, "SELECT * FROM \"users\" LIMIT 10");
    }

    #[test]
    fn test_offset_query_caps_skip_for_huge_pages() {
        let paginator = Paginator::builder(Sqlite).build();
        let request = OffsetRequest::new().with_page(i64::MAX).with_limit(10);
        let query = paginator.offset_query("users", &request).unwrap();
        assert_eq!(
            query.build().sql,
            format!("SELECT * FROM \"users\" LIMIT 10 OFFSET {}", i64::MAX)
        );
    }

    #[test]
    fn test_cursor_query_forces_primary_key_tiebreak() {
        let paginator = Paginator::builder(Postgres).build();
        let request = CursorRequest::new()
            .after(42)
            .with_limit(5)
            .with_order(OrderMap::new().desc("createdAt").asc("id"));

        let query = paginator.cursor_query("posts", &request).unwrap().build();
        insta::assert_snapshot!(
            query.sql,
            @r#"SELECT * FROM "posts" WHERE "posts"."id" > $1 ORDER BY "posts"."createdAt" DESC, "posts"."id" ASC, "posts"."id" ASC LIMIT 5"#
        );
        assert_eq!(query.binding("cursor"), Some(&Value::Int(42)));
    }

    #[test]
    fn test_cursor_query_prev_direction() {
        let paginator = Paginator::builder(Sqlite)
            .primary_key("userId")
            .map_field("userId", "user_id")
            .build();
        let request = CursorRequest::new().before(11);

        let query = paginator.cursor_query("users", &request).unwrap().build();
        assert_eq!(
            query.sql,
            "SELECT * FROM \"users\" WHERE \"users\".\"user_id\" < ?1 ORDER BY \"users\".\"user_id\" DESC LIMIT 10"
        );
    }

    #[test]
    fn test_cursor_query_without_cursor_has_no_boundary() {
        let paginator = Paginator::builder(Postgres).build();
        let query = paginator
            .cursor_query("users", &CursorRequest::new())
            .unwrap()
            .build();
        assert_eq!(
            query.sql,
            "SELECT * FROM \"users\" ORDER BY \"users\".\"id\" ASC LIMIT 10"
        );
    }

    #[test]
    fn test_filters_precede_cursor_boundary() {
        let paginator = Paginator::builder(Postgres).build();
        let request = CursorRequest::new()
            .after(7)
            .with_filters(FilterMap::new().eq("active", true));

        let query = paginator.cursor_query("users", &request).unwrap().build();
        assert_eq!(
            query.sql,
            "SELECT * FROM \"users\" WHERE \"users\".\"active\" = $1 AND \"users\".\"id\" > $2 ORDER BY \"users\".\"id\" ASC LIMIT 10"
        );
        assert_eq!(query.names, vec!["active".to_string(), "cursor".to_string()]);
    }

    #[test]
    fn test_malformed_range_is_rejected_by_default() {
        let paginator = Paginator::builder(Postgres).build();
        let request = OffsetRequest::new()
            .with_filters(FilterMap::new().with("age", Operator::Between, 18));
        assert!(matches!(
            paginator.offset_query("users", &request),
            Err(CompileError::MalformedRange { .. })
        ));

        let lenient = Paginator::builder(Postgres)
            .range_mode(RangeMode::Lenient)
            .build();
        let query = lenient.offset_query("users", &request).unwrap().build();
        assert!(query.sql.contains("\"users\".\"age\" = $1"));
    }

    // =========================================================================
    // Execution
    // =========================================================================

    #[tokio::test]
    async fn test_offset_runs_rows_and_count() {
        let users = Recorder::new(vec![11, 12, 13], 25);
        let paginator = Paginator::builder(Sqlite).build();
        let request = OffsetRequest::new().with_page(2).with_limit(10);

        let page = paginator.offset(&users, &request).await.unwrap();
        assert_eq!(page.rows, vec![11, 12, 13]);
        assert_eq!((page.total, page.page, page.limit, page.total_page), (25, 2, 10, 3));
        assert_eq!(
            users.seen(),
            vec![
                "SELECT * FROM \"users\" LIMIT 10 OFFSET 10".to_string(),
                "SELECT COUNT(*) FROM \"users\"".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_entity_override_wins() {
        let users = Recorder::new(vec![], 0);
        let paginator = Paginator::builder(Sqlite).entity("app_users").build();
        let total = paginator
            .cursor_total(&users, &CursorRequest::new().after(3))
            .await
            .unwrap();
        assert_eq!(total, 0);
        assert_eq!(users.seen(), vec!["SELECT COUNT(*) FROM \"app_users\"".to_string()]);
    }

    #[tokio::test]
    async fn test_cursor_shapes_rows() {
        let users = Recorder::new(vec![4, 5, 6], 0);
        let paginator = Paginator::builder(Postgres).result_key("items").build();

        let page = paginator
            .cursor(&users, &CursorRequest::new().after(3))
            .await
            .unwrap();
        assert_eq!(page.result_key, "items");
        assert_eq!(page.prev_cursor, Some(4));
        assert_eq!(page.next_cursor, Some(6));
        assert_eq!(page.direction, CursorDirection::Next);
    }

    #[tokio::test]
    async fn test_execution_errors_pass_through() {
        let paginator = Paginator::builder(Postgres).build();
        let err = paginator
            .offset(&Broken, &OffsetRequest::new())
            .await
            .unwrap_err();
        assert_eq!(err.execution().map(String::as_str), Some("no such column: nope"));
    }
}
