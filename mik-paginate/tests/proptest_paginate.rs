//! Property-based tests for limit resolution, page math and compilation.

use std::sync::Mutex;

use async_trait::async_trait;
use mik_paginate::{
    Collection, FilterMap, OffsetRequest, Operator, OrderMap, PaginatorConfig, QueryResult,
    Value, postgres, sqlite,
};
use proptest::prelude::*;
use rusqlite::Connection;

/// `SQLite` table holding ids `1..=total`.
struct Numbers {
    conn: Mutex<Connection>,
}

impl Numbers {
    fn with_rows(total: i64) -> Self {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE numbers (id INTEGER PRIMARY KEY);")
            .unwrap();
        conn.execute(
            "WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < ?1)
             INSERT INTO numbers SELECT n FROM seq WHERE n <= ?1",
            [total],
        )
        .unwrap();
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl Collection for Numbers {
    type Row = i64;
    type Error = rusqlite::Error;

    fn table_name(&self) -> &str {
        "numbers"
    }

    async fn fetch_rows(&self, query: &QueryResult) -> Result<Vec<i64>, rusqlite::Error> {
        assert!(query.params.is_empty());
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&query.sql)?;
        let rows = stmt.query_map([], |row| row.get("id"))?;
        let ids = rows.collect::<Result<Vec<i64>, _>>()?;
        Ok(ids)
    }

    async fn fetch_count(&self, query: &QueryResult) -> Result<u64, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(&query.sql, [], |row| row.get(0))?;
        Ok(count.unsigned_abs())
    }
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

// =============================================================================
// Limit Resolution Property Tests
// =============================================================================

proptest! {
    /// Limits inside (0, max] are used as given
    #[test]
    fn valid_limits_are_kept(max in 1_i64..1000, pick in 0.0_f64..1.0) {
        let limit = 1 + ((max - 1) as f64 * pick) as i64;
        let paginator = postgres().max_limit(max).build();
        prop_assert_eq!(
            paginator.config().effective_limit(Some(limit)),
            u64::try_from(limit).unwrap()
        );
    }

    /// Limits outside (0, max] fall back to the default
    #[test]
    fn invalid_limits_use_default(
        max in 1_i64..1000,
        below in i64::MIN..=0,
        above in 1_i64..1_000_000,
    ) {
        let config = postgres().max_limit(max).build().config().clone();
        prop_assert_eq!(config.effective_limit(Some(below)), config.default_limit);
        prop_assert_eq!(config.effective_limit(Some(max + above)), config.default_limit);
    }

    /// The default never exceeds the max, whatever order the setters ran in
    #[test]
    fn default_never_exceeds_max(default in -10_i64..500, max in -10_i64..500) {
        let config = postgres().default_limit(default).max_limit(max).build().config().clone();
        prop_assert!(config.default_limit >= 1);
        prop_assert!(config.default_limit <= config.max_limit);
    }
}

// =============================================================================
// Offset Window Property Tests
// =============================================================================

proptest! {
    /// The window skips (page - 1) * limit rows and takes limit rows
    #[test]
    fn offset_window_matches_page(page in 1_i64..1000, limit in 1_i64..=100) {
        let paginator = postgres().build();
        let request = OffsetRequest::new().with_page(page).with_limit(limit);
        let sql = paginator.offset_query("t", &request).unwrap().build().sql;

        let skip = (page - 1) * limit;
        let expected = if skip > 0 {
            format!("SELECT * FROM \"t\" LIMIT {limit} OFFSET {skip}")
        } else {
            format!("SELECT * FROM \"t\" LIMIT {limit}")
        };
        prop_assert_eq!(sql, expected);
    }

    /// An offset page holds exactly the rows of its window, at most limit
    /// of them, and total_page is the smallest page count covering total
    #[test]
    fn offset_page_windows_rows(
        total in 0_i64..120,
        page in 1_i64..20,
        limit in 1_i64..=25,
    ) {
        let numbers = Numbers::with_rows(total);
        let request = OffsetRequest::new()
            .with_page(page)
            .with_limit(limit)
            .with_order(OrderMap::new().asc("id"));
        let result = block_on(sqlite().build().offset(&numbers, &request)).unwrap();

        let first = (page - 1) * limit + 1;
        let expected: Vec<i64> = (first..first + limit).take_while(|id| *id <= total).collect();
        prop_assert_eq!(&result.rows, &expected);

        let (total, limit) = (total.unsigned_abs(), limit.unsigned_abs());
        prop_assert_eq!(result.total, total);
        prop_assert_eq!(result.limit, limit);
        prop_assert!(result.total_page * limit >= total);
        prop_assert!(result.total_page == 0 || (result.total_page - 1) * limit < total);
        prop_assert_eq!(result.has_next(), first.unsigned_abs() + limit <= total);
    }
}

// =============================================================================
// Filter Compilation Property Tests
// =============================================================================

fn compile(filters: FilterMap) -> QueryResult {
    postgres()
        .build()
        .offset_query("t", &OffsetRequest::new().with_filters(filters))
        .unwrap()
        .build_count()
}

proptest! {
    /// Bare scalars compile exactly like an explicit eq
    #[test]
    fn bare_scalar_is_eq(key in "[a-z][a-zA-Z0-9]{0,12}", value in any::<i64>()) {
        let bare = compile(FilterMap::new().eq(key.clone(), value));
        let explicit = compile(FilterMap::new().with(key, Operator::Eq, value));
        prop_assert_eq!(bare, explicit);
    }

    /// Range filters bind <key>Start and <key>End
    #[test]
    fn range_binds_named_bounds(
        key in "[a-z][a-zA-Z0-9]{0,12}",
        start in any::<i64>(),
        end in any::<i64>(),
    ) {
        let result = compile(FilterMap::new().with(key.clone(), Operator::Between, vec![start, end]));
        prop_assert_eq!(result.binding(&format!("{key}Start")), Some(&Value::Int(start)));
        prop_assert_eq!(result.binding(&format!("{key}End")), Some(&Value::Int(end)));
    }

    /// Every filter key adds exactly one conjunct
    #[test]
    fn one_conjunct_per_key(keys in prop::collection::btree_set("[a-z]{1,8}", 1..8)) {
        let filters: FilterMap = keys
            .iter()
            .map(|k| (k.clone(), mik_paginate::Condition::eq(1)))
            .collect();
        let result = compile(filters);
        prop_assert_eq!(result.sql.matches(" AND ").count(), keys.len() - 1);
        prop_assert_eq!(result.params.len(), keys.len());
    }
}

#[test]
fn config_default_is_consistent() {
    let config = PaginatorConfig::default();
    assert!(config.default_limit <= config.max_limit);
}
