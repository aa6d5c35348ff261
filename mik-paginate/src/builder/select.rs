//! SELECT query builder.

use crate::dialect::Dialect;

use super::filter::{ParamList, build_predicate_impl};
use super::types::{Binding, Param, Predicate, QueryResult, SortDir, SortField};

/// SELECT builder scoped to one table and alias.
///
/// Predicates are AND-composed in insertion order; sorts are applied in
/// insertion order. Identifiers are quoted by the dialect when rendered.
#[derive(Debug, Clone)]
pub struct SelectQuery<D: Dialect> {
    dialect: D,
    table: String,
    alias: String,
    predicates: Vec<Predicate>,
    sorts: Vec<SortField>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl<D: Dialect> SelectQuery<D> {
    /// Create a new query for the given table, aliased by its own name.
    pub fn new(dialect: D, table: impl Into<String>) -> Self {
        let table = table.into();
        Self {
            dialect,
            alias: table.clone(),
            table,
            predicates: Vec::new(),
            sorts: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Set the table alias. Empty aliases are ignored.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        if !alias.is_empty() {
            self.alias = alias;
        }
        self
    }

    /// The alias field references are qualified with.
    pub fn alias_name(&self) -> &str {
        &self.alias
    }

    /// Append a predicate (AND).
    pub fn and_where(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Append an ORDER BY clause.
    pub fn order_by(mut self, field: impl Into<String>, dir: SortDir) -> Self {
        self.sorts.push(SortField::new(field, dir));
        self
    }

    /// Skip this many rows.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Take at most this many rows.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Appended predicates, in order.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Appended sorts, in order.
    pub fn sorts(&self) -> &[SortField] {
        &self.sorts
    }

    /// Named parameters of every predicate, in bind order.
    pub fn bindings(&self) -> Vec<&Param> {
        let mut out = Vec::new();
        for predicate in &self.predicates {
            match &predicate.binding {
                Binding::One(param) | Binding::Set(param) => out.push(param),
                Binding::Range { start, end } => {
                    out.push(start);
                    out.push(end);
                },
            }
        }
        out
    }

    /// Build the windowed row query.
    pub fn build(&self) -> QueryResult {
        let mut params = ParamList::default();
        let mut sql = format!("SELECT * FROM {}", self.from_clause());

        self.push_where(&mut sql, &mut params);

        // ORDER BY clause
        if !self.sorts.is_empty() {
            sql.push_str(" ORDER BY ");
            let sort_parts: Vec<String> = self
                .sorts
                .iter()
                .map(|s| format!("{} {}", self.dialect.quote_ident(&s.field), s.dir.as_sql()))
                .collect();
            sql.push_str(&sort_parts.join(", "));
        }

        // LIMIT/OFFSET clause
        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => {
                sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}"));
            },
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {limit}")),
            (None, Some(offset)) => sql.push_str(&format!(
                " LIMIT {} OFFSET {offset}",
                self.dialect.unbounded_limit()
            )),
            (None, None) => {},
        }

        QueryResult {
            sql,
            params: params.values,
            names: params.names,
        }
    }

    /// Build the `COUNT(*)` of matching rows, ignoring order and window.
    pub fn build_count(&self) -> QueryResult {
        let mut params = ParamList::default();
        let mut sql = format!("SELECT COUNT(*) FROM {}", self.from_clause());

        self.push_where(&mut sql, &mut params);

        QueryResult {
            sql,
            params: params.values,
            names: params.names,
        }
    }

    fn from_clause(&self) -> String {
        let table = self.dialect.quote_ident(&self.table);
        if self.alias == self.table {
            table
        } else {
            format!("{table} AS {}", self.dialect.quote_ident(&self.alias))
        }
    }

    fn push_where(&self, sql: &mut String, params: &mut ParamList) {
        if self.predicates.is_empty() {
            return;
        }
        let conditions: Vec<String> = self
            .predicates
            .iter()
            .map(|p| build_predicate_impl(&self.dialect, p, params))
            .collect();
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
}
