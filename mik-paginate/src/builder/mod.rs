//! Query builder for SQL generation with parameterization.

mod filter;
mod select;
mod types;
mod value;

// Re-export all public items
pub use select::SelectQuery;
pub use types::{Binding, Operator, Param, Predicate, QueryResult, SortDir, SortField, Value};
