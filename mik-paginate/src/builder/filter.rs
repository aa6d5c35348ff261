//! Predicate rendering: the operator table applied to a dialect.

use super::types::{Binding, Operator, Param, Predicate, Value};
use crate::dialect::Dialect;

/// Positional parameters collected while rendering a statement.
#[derive(Debug, Default)]
pub(super) struct ParamList {
    pub(super) values: Vec<Value>,
    pub(super) names: Vec<String>,
}

impl ParamList {
    /// Index the next pushed value will receive (1-based).
    pub(super) fn next_idx(&self) -> usize {
        self.values.len() + 1
    }

    /// Push a value and return its placeholder index.
    pub(super) fn push(&mut self, name: &str, value: Value) -> usize {
        self.values.push(value);
        self.names.push(name.to_string());
        self.values.len()
    }
}

/// Render a single predicate, appending its parameters to `params`.
pub(super) fn build_predicate_impl<D: Dialect>(
    dialect: &D,
    predicate: &Predicate,
    params: &mut ParamList,
) -> String {
    let field = dialect.quote_ident(&predicate.field);

    match (&predicate.binding, predicate.op) {
        (Binding::Range { start, end }, op) => {
            let keyword = if op == Operator::NotBetween {
                "NOT BETWEEN"
            } else {
                "BETWEEN"
            };
            let start_idx = params.push(&start.name, start.value.clone());
            let end_idx = params.push(&end.name, end.value.clone());
            format!(
                "{field} {keyword} {} AND {}",
                dialect.param(start_idx),
                dialect.param(end_idx)
            )
        },

        (Binding::Set(param), op) => build_set_impl(dialect, &field, op, param, params),

        (Binding::One(param), op) => build_compare_impl(dialect, &field, op, param, params),
    }
}

fn build_set_impl<D: Dialect>(
    dialect: &D,
    field: &str,
    op: Operator,
    param: &Param,
    params: &mut ParamList,
) -> String {
    let values = match &param.value {
        Value::Array(values) => values.as_slice(),
        other => std::slice::from_ref(other),
    };

    let (sql, bound) =
        dialect.membership(field, op == Operator::NotIn, values, params.next_idx());
    for value in bound {
        params.push(&param.name, value);
    }
    sql
}

fn build_compare_impl<D: Dialect>(
    dialect: &D,
    field: &str,
    op: Operator,
    param: &Param,
    params: &mut ParamList,
) -> String {
    match (op, &param.value) {
        // NULL handling
        (Operator::Eq | Operator::Is, Value::Null) => format!("{field} IS NULL"),
        (Operator::Ne | Operator::IsNot, Value::Null) => format!("{field} IS NOT NULL"),

        // IS TRUE / IS NOT FALSE
        (Operator::Is, Value::Bool(b)) => format!("{field} IS {}", dialect.bool_lit(*b)),
        (Operator::IsNot, Value::Bool(b)) => format!("{field} IS NOT {}", dialect.bool_lit(*b)),

        (op, value) => {
            let op_str = match op {
                Operator::Eq => "=",
                Operator::Ne => "!=",
                Operator::Gt => ">",
                Operator::Lt => "<",
                Operator::Gte => ">=",
                Operator::Lte => "<=",
                Operator::Like => "LIKE",
                Operator::NotLike => "NOT LIKE",
                Operator::ILike => dialect.ilike_keyword(false),
                Operator::NotILike => dialect.ilike_keyword(true),
                Operator::Is => "IS",
                Operator::IsNot => "IS NOT",
                // Sets and ranges carry their own bindings; a single value
                // degrades to (in)equality.
                Operator::In | Operator::Between => "=",
                Operator::NotIn | Operator::NotBetween => "!=",
            };
            let idx = params.push(&param.name, value.clone());
            format!("{field} {op_str} {}", dialect.param(idx))
        },
    }
}
