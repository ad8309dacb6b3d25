//! Per-column "special" and "extra" filters.
//!
//! Both walk an ordered list of single-field groups and join each condition
//! to the previous ones with the group's own `comparacion` operator. Special
//! filters honor the column map and may compare two columns; extra filters
//! require every attribute on every group and always quote the value.

use tracing::trace;

use super::comparison::is_subquery;
use crate::error::{QueryError, QueryResult, ResultExt};
use crate::filter::{
    is_numeric_key, Bound, ColumnMap, ExtraFilter, FilterGroup, FilterValue, LogicalOperator,
    SpecialFilter,
};
use crate::sql::{escape_literal, Renderer};

/// Compile special filters with literal rendering.
///
/// ```rust
/// use criba_query::compiler::special::compile_special;
/// use criba_query::{ColumnMap, FilterGroup, SpecialFilter};
///
/// let groups = vec![
///     FilterGroup::new("t.total", SpecialFilter::new(">", 100)),
///     FilterGroup::new("t.fin", SpecialFilter::new(">=", "t.inicio").value_is_field().join("OR")),
/// ];
/// assert_eq!(
///     compile_special(&groups, &ColumnMap::new()).unwrap(),
///     "t.total > '100' OR 't.fin'>=t.inicio"
/// );
/// ```
pub fn compile_special(
    groups: &[FilterGroup<SpecialFilter>],
    columns: &ColumnMap,
) -> QueryResult<String> {
    render_special(&mut Renderer::literal_mode(), groups, columns)
}

/// Compile extra filters with literal rendering.
pub fn compile_extra(groups: &[FilterGroup<ExtraFilter>]) -> QueryResult<String> {
    render_extra(&mut Renderer::literal_mode(), groups)
}

/// Validate a group key: trimmed, non-empty and not numeric.
pub fn group_field(key: &str) -> QueryResult<&str> {
    let field = key.trim();
    if field.is_empty() {
        return Err(QueryError::empty_key(key));
    }
    if is_numeric_key(field) {
        return Err(QueryError::numeric_key(field));
    }
    Ok(field)
}

/// The field to emit for a special filter: the subquery when mapped.
pub fn special_field(field: &str, columns: &ColumnMap) -> QueryResult<String> {
    let field = field.trim();
    if field.is_empty() {
        return Err(QueryError::empty_field(field));
    }
    let subquery = is_subquery(field, columns).wrap_err("failed to check subquery column")?;
    match (subquery, columns.get(field)) {
        (true, Some(expr)) => Ok(expr.clone()),
        _ => Ok(field.to_string()),
    }
}

fn operator_text<'a>(operator: Option<&'a str>, field: &str) -> QueryResult<&'a str> {
    let operator = operator.ok_or_else(|| QueryError::missing("operador", field).with_field(field))?;
    if operator.trim().is_empty() {
        return Err(QueryError::empty_value("operador", field).with_field(field));
    }
    Ok(operator)
}

fn required_value<'a>(value: Option<&'a FilterValue>, field: &str) -> QueryResult<&'a FilterValue> {
    let value = match value {
        Some(v) if !v.is_null() => v,
        _ => return Err(QueryError::missing("valor", field).with_field(field)),
    };
    if value.is_blank() {
        return Err(QueryError::empty_value("valor", field).with_field(field));
    }
    Ok(value)
}

fn join_operator(join: Option<&str>, field: &str) -> QueryResult<LogicalOperator> {
    let join = join.ok_or_else(|| QueryError::missing("comparacion", field).with_field(field))?;
    join.parse::<LogicalOperator>()
        .map_err(|e| e.with_field(field))
}

/// Render the condition of one special filter.
pub(crate) fn render_special_condition(
    r: &mut Renderer,
    field: &str,
    filter: &SpecialFilter,
) -> QueryResult<String> {
    let operator = operator_text(filter.operator.as_deref(), field)?;
    let value = required_value(filter.value.as_ref(), field)?;

    let condition = match filter.bound {
        Bound::Literal => format!("{} {} {}", field, operator, r.value(value)),
        Bound::Field => format!("{}{}{}", r.literal(field), operator, value.as_text()),
    };
    Ok(condition)
}

pub(crate) fn render_special(
    r: &mut Renderer,
    groups: &[FilterGroup<SpecialFilter>],
    columns: &ColumnMap,
) -> QueryResult<String> {
    let mut sql = String::new();
    for group in groups {
        let key = group_field(&group.field).wrap_err("invalid special filter key")?;
        let field = special_field(key, columns)?;
        let condition = render_special_condition(r, &field, &group.filter)
            .wrap_err("failed to build special condition")?;

        if sql.is_empty() {
            sql = condition;
        } else {
            let join = join_operator(group.filter.join.as_deref(), key)?;
            sql = format!("{} {} {}", sql, join, condition);
        }
        trace!(field = key, sql = %sql, "special filter");
    }
    Ok(sql)
}

pub(crate) fn render_extra(
    r: &mut Renderer,
    groups: &[FilterGroup<ExtraFilter>],
) -> QueryResult<String> {
    let mut sql = String::new();
    for group in groups {
        let field = group_field(&group.field).wrap_err("invalid extra filter key")?;
        let filter = &group.filter;

        let value = required_value(filter.value.as_ref(), field)?;
        let operator = operator_text(filter.operator.as_deref(), field)?;
        let join = join_operator(filter.join.as_deref(), field)?;

        let condition = format!("{} {} {}", escape_literal(field), operator, r.value(value));
        if sql.is_empty() {
            sql = condition;
        } else {
            sql = format!("{} {} {}", sql, join, condition);
        }
        trace!(field, sql = %sql, "extra filter");
    }
    Ok(sql)
}
