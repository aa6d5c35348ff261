// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Code items in docs - extensive doc changes needed
#![allow(clippy::missing_errors_doc)] // # Errors sections - doc-heavy
#![allow(clippy::module_name_repetitions)] // Type names matching module - acceptable
#![allow(clippy::return_self_not_must_use)] // Builder pattern methods return Self
#![allow(clippy::must_use_candidate)] // Builder methods - fluent API doesn't need must_use
#![allow(clippy::format_push_string)] // String building style preference
#![allow(clippy::double_must_use)] // Functions returning must_use types can have their own docs

//! # mik-paginate - Offset and Cursor Pagination over SQL Collections
//!
//! Turns a declarative request (page/limit or cursor, a filter map, an order
//! map) into a bounded, parameterized query and shapes the rows into an
//! offset page or a cursor page. Supports Postgres and `SQLite` dialects.
//!
//! ## Quick Start
//!
//! ```
//! # use mik_paginate::prelude::*;
//! let paginator = postgres()
//!     .map_field("createdAt", "created_at")
//!     .max_limit(50)
//!     .build();
//!
//! let request = OffsetRequest::from_json(r#"{
//!     "page": 2,
//!     "limit": 10,
//!     "filters": {"active": true, "age": {"value": [18, 30], "operator": "bw"}},
//!     "order": {"createdAt": 0, "id": 1}
//! }"#).unwrap();
//!
//! let query = paginator.offset_query("users", &request).unwrap();
//! let rows = query.build();
//! assert!(rows.sql.contains(r#""users"."age" BETWEEN $2 AND $3"#));
//! assert!(rows.sql.ends_with(r#"ORDER BY "users"."created_at" DESC, "users"."id" ASC LIMIT 10 OFFSET 10"#));
//! assert_eq!(rows.binding("ageStart"), Some(&Value::Int(18)));
//!
//! let count = query.build_count();
//! assert!(count.sql.starts_with("SELECT COUNT(*)"));
//! ```
//!
//! Executing queries is up to a [`Collection`]; see [`Paginator::offset`],
//! [`Paginator::cursor`] and [`Paginator::cursor_total`].
//!
//! ## Supported Operators
//!
//! | Token | Alias | SQL |
//! |-------|-------|-----|
//! | `eq` | `=` | `=` |
//! | `neq` | `!=` | `!=` |
//! | `gt` | `>` | `>` |
//! | `lt` | `<` | `<` |
//! | `gte` | `>=` | `>=` |
//! | `lte` | `<=` | `<=` |
//! | `like` | | `LIKE` |
//! | `ilike` | | `ILIKE` (`LIKE` on `SQLite`) |
//! | `nlike` | | `NOT LIKE` |
//! | `nilike` | | `NOT ILIKE` (`NOT LIKE` on `SQLite`) |
//! | `is` | | `IS NULL`, `IS TRUE`, ... |
//! | `isnot` | | `IS NOT NULL`, ... |
//! | `in` | | `= ANY($1)` / `IN (?1, ?2)` |
//! | `nin` | | `!= ALL($1)` / `NOT IN (?1, ?2)` |
//! | `bw` | | `BETWEEN $1 AND $2` |
//! | `nbw` | | `NOT BETWEEN $1 AND $2` |
//!
//! Tokens are case-insensitive. Missing or unknown tokens mean `eq`.
//!
//! ## Cursor Pagination
//!
//! ```
//! # use mik_paginate::prelude::*;
//! let paginator = sqlite().build();
//! let request = CursorRequest::new()
//!     .after(42)
//!     .with_order(OrderMap::new().desc("createdAt"));
//!
//! let query = paginator.cursor_query("posts", &request).unwrap().build();
//! assert_eq!(
//!     query.sql,
//!     r#"SELECT * FROM "posts" WHERE "posts"."id" > ?1 ORDER BY "posts"."createdAt" DESC, "posts"."id" ASC LIMIT 10"#
//! );
//! ```

mod builder;
mod compile;
mod dialect;
mod pagination;
mod request;

pub use builder::{
    Binding, Operator, Param, Predicate, QueryResult, SelectQuery, SortDir, SortField, Value,
};
pub use compile::{CompileError, RangeMode};
pub use dialect::{Dialect, Postgres, Sqlite};
pub use pagination::{
    Collection, ConfigError, CursorPage, DEFAULT_LIMIT, MAX_LIMIT, OffsetPage, PaginateError,
    Paginator, PaginatorBuilder, PaginatorConfig,
};
pub use request::{
    Condition, CursorDirection, CursorRequest, FilterMap, OffsetRequest, OrderMap, RequestError,
};

/// Configure a paginator for Postgres.
///
/// Convenience function that starts a `PaginatorBuilder` with the Postgres dialect.
#[must_use]
pub fn postgres() -> PaginatorBuilder<Postgres> {
    Paginator::builder(Postgres)
}

/// Configure a paginator for `SQLite`.
///
/// Convenience function that starts a `PaginatorBuilder` with the `SQLite` dialect.
#[must_use]
pub fn sqlite() -> PaginatorBuilder<Sqlite> {
    Paginator::builder(Sqlite)
}

/// Prelude module for convenient imports.
///
/// ```
/// use mik_paginate::prelude::*;
/// let paginator = postgres().result_key("items").build();
/// assert_eq!(paginator.config().result_key, "items");
/// ```
pub mod prelude {
    pub use crate::{
        Collection, Condition, CursorDirection, CursorPage, CursorRequest, Dialect, FilterMap,
        OffsetPage, OffsetRequest, Operator, OrderMap, PaginateError, Paginator, PaginatorBuilder,
        PaginatorConfig, Postgres, QueryResult, RangeMode, SortDir, Sqlite, Value, postgres,
        sqlite,
    };
}


// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
