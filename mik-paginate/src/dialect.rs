//! SQL dialects: placeholders, literals, set membership and identifier quoting.
//!
//! Everything the two targets disagree on lives behind [`Dialect`]; the
//! predicate renderer never branches on a concrete database.

use crate::Value;

/// Database-specific rendering rules.
pub trait Dialect: Clone + Copy {
    /// Placeholder for the 1-based parameter `idx` (`$1` or `?1`).
    fn param(&self, idx: usize) -> String;

    /// Boolean literal used after `IS` / `IS NOT`.
    fn bool_lit(&self, val: bool) -> &'static str;

    /// Membership test against a non-empty list, starting at placeholder
    /// `start_idx`. Returns the fragment and the values to bind, in order.
    fn list_membership(
        &self,
        field: &str,
        negated: bool,
        values: &[Value],
        start_idx: usize,
    ) -> (String, Vec<Value>);

    /// Case-insensitive pattern keyword, `NOT`-prefixed when `negated`.
    fn ilike_keyword(&self, negated: bool) -> &'static str;

    /// Keyword for a LIMIT without an upper bound, needed when only OFFSET is set.
    fn unbounded_limit(&self) -> &'static str;

    /// `field [NOT] IN values`.
    ///
    /// An empty list binds nothing: no row is in it (`1=0`) and every row
    /// is outside it (`1=1`).
    fn membership(
        &self,
        field: &str,
        negated: bool,
        values: &[Value],
        start_idx: usize,
    ) -> (String, Vec<Value>) {
        if values.is_empty() {
            let sql = if negated { "1=1" } else { "1=0" };
            return (sql.to_string(), Vec::new());
        }
        self.list_membership(field, negated, values, start_idx)
    }

    /// Quote a (possibly dotted) identifier: `users.age` becomes `"users"."age"`.
    fn quote_ident(&self, ident: &str) -> String {
        ident
            .split('.')
            .map(|part| {
                if part == "*" {
                    part.to_string()
                } else {
                    format!("\"{}\"", part.replace('"', "\"\""))
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Postgres dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Dialect for Postgres {
    #[inline]
    fn param(&self, idx: usize) -> String {
        format!("${idx}")
    }

    #[inline]
    fn bool_lit(&self, val: bool) -> &'static str {
        if val { "TRUE" } else { "FALSE" }
    }

    fn list_membership(
        &self,
        field: &str,
        negated: bool,
        values: &[Value],
        start_idx: usize,
    ) -> (String, Vec<Value>) {
        // One array parameter, compared element-wise
        let test = if negated { "!= ALL" } else { "= ANY" };
        let sql = format!("{field} {test}({})", self.param(start_idx));
        (sql, vec![Value::Array(values.to_vec())])
    }

    #[inline]
    fn ilike_keyword(&self, negated: bool) -> &'static str {
        if negated { "NOT ILIKE" } else { "ILIKE" }
    }

    #[inline]
    fn unbounded_limit(&self) -> &'static str {
        "ALL"
    }
}

/// `SQLite` dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Dialect for Sqlite {
    #[inline]
    fn param(&self, idx: usize) -> String {
        format!("?{idx}")
    }

    #[inline]
    fn bool_lit(&self, val: bool) -> &'static str {
        if val { "1" } else { "0" }
    }

    fn list_membership(
        &self,
        field: &str,
        negated: bool,
        values: &[Value],
        start_idx: usize,
    ) -> (String, Vec<Value>) {
        // No array binds: one placeholder per element
        let placeholders = (start_idx..start_idx + values.len())
            .map(|idx| self.param(idx))
            .collect::<Vec<_>>()
            .join(", ");
        let keyword = if negated { "NOT IN" } else { "IN" };
        (format!("{field} {keyword} ({placeholders})"), values.to_vec())
    }

    #[inline]
    fn ilike_keyword(&self, negated: bool) -> &'static str {
        // LIKE already ignores ASCII case
        if negated { "NOT LIKE" } else { "LIKE" }
    }

    #[inline]
    fn unbounded_limit(&self) -> &'static str {
        "-1"
    }
}
