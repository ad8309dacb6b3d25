//! `IN` / `NOT IN` clauses.

use tracing::trace;

use crate::error::{QueryError, QueryResult, ResultExt};
use crate::filter::{FilterValue, SetFilter};
use crate::sql::Renderer;
use crate::validation::{InClauseSyntax, StandardInSyntax};

/// Compile `field IN ('v1','v2',...)` with literal rendering.
///
/// An empty value list is an error.
///
/// ```rust
/// use criba_query::compiler::set::compile_in;
///
/// let sql = compile_in("cat", &["10".into(), "20".into()]).unwrap();
/// assert_eq!(sql, "cat IN ('10','20')");
/// assert!(compile_in("cat", &[]).is_err());
/// ```
pub fn compile_in(field: &str, values: &[FilterValue]) -> QueryResult<String> {
    render_set(&mut Renderer::literal_mode(), &StandardInSyntax, field, values, false)
}

/// Compile `field NOT IN (...)` with literal rendering.
///
/// An empty value list yields no clause (an empty string), unlike [`compile_in`].
pub fn compile_not_in(field: &str, values: &[FilterValue]) -> QueryResult<String> {
    render_set(&mut Renderer::literal_mode(), &StandardInSyntax, field, values, true)
}

/// Compile a [`SetFilter`] as `IN`.
pub fn compile_in_filter(filter: &SetFilter) -> QueryResult<String> {
    compile_in(&filter.key, &filter.values)
}

/// Compile a [`SetFilter`] as `NOT IN`.
pub fn compile_not_in_filter(filter: &SetFilter) -> QueryResult<String> {
    compile_not_in(&filter.key, &filter.values)
}

/// Build the comma-separated list of rendered values.
///
/// Each value is trimmed and must not be empty.
pub(crate) fn render_value_list(r: &mut Renderer, values: &[FilterValue]) -> QueryResult<String> {
    let mut list = String::new();
    for value in values {
        if value.is_blank() {
            return Err(QueryError::empty_value("IN value", format!("{:?}", values)));
        }
        if !list.is_empty() {
            list.push(',');
        }
        list.push_str(&r.value(&value.trimmed()));
    }
    Ok(list)
}

pub(crate) fn render_set(
    r: &mut Renderer,
    syntax: &dyn InClauseSyntax,
    field: &str,
    values: &[FilterValue],
    negated: bool,
) -> QueryResult<String> {
    if negated && values.is_empty() {
        return Ok(String::new());
    }
    let field = field.trim();
    if field.is_empty() {
        return Err(QueryError::empty_field(field));
    }

    let list = render_value_list(r, values).wrap_err("failed to build value list")?;
    syntax
        .validate_in_shape(field, &list)
        .wrap_err("invalid IN clause")?;

    let sql = syntax.build_in_clause(field, &list, negated);
    trace!(field, negated, sql = %sql, "set condition");
    Ok(sql)
}
