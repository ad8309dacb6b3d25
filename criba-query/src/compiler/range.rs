//! `BETWEEN` conditions.

use tracing::trace;

use super::and_join;
use crate::error::{QueryError, QueryResult, ResultExt};
use crate::filter::{is_numeric_key, Bound, FilterMap, FilterValue, RangeFilter};
use crate::sql::Renderer;

/// Compile one range condition with literal rendering.
///
/// ```rust
/// use criba_query::compiler::range::compile_range;
/// use criba_query::RangeFilter;
///
/// let sql = compile_range("t.age", &RangeFilter::new(18, 65)).unwrap();
/// assert_eq!(sql, "t.age BETWEEN '18' AND '65'");
///
/// let sql = compile_range("t.age", &RangeFilter::new("t.min", "t.max").field_bound()).unwrap();
/// assert_eq!(sql, "'t.age' BETWEEN t.min AND t.max");
/// ```
pub fn compile_range(field: &str, filter: &RangeFilter) -> QueryResult<String> {
    render_range(&mut Renderer::literal_mode(), field, filter)
}

/// Compile a map of range filters into one AND-chained condition.
pub fn compile_ranges(filters: &FilterMap<RangeFilter>) -> QueryResult<String> {
    render_ranges(&mut Renderer::literal_mode(), filters)
}

/// Append `condition` to `acc` with an `AND` separator when needed.
///
/// A non-empty accumulator cannot take an empty condition.
pub fn chain_condition(acc: &str, condition: &str) -> QueryResult<String> {
    let acc = acc.trim();
    let condition = condition.trim();
    if !acc.is_empty() && condition.is_empty() {
        return Err(QueryError::empty_value("condition", acc)
            .with_help("a non-empty range filter cannot be extended with an empty condition"));
    }
    Ok(format!("{}{}{}", acc, and_join(acc), condition))
}

fn bound_text(value: &FilterValue, name: &str, field: &str) -> QueryResult<String> {
    if value.is_null() {
        return Err(QueryError::missing(name, field).with_field(field));
    }
    let text = value.as_text();
    if text.trim().is_empty() {
        return Err(QueryError::empty_value(name, field).with_field(field));
    }
    Ok(text.into_owned())
}

pub(crate) fn render_range(
    r: &mut Renderer,
    field: &str,
    filter: &RangeFilter,
) -> QueryResult<String> {
    let field = field.trim();
    if field.is_empty() {
        return Err(QueryError::empty_field(field));
    }
    let lower = bound_text(&filter.lower, "valor1", field)?;
    let upper = bound_text(&filter.upper, "valor2", field)?;

    let condition = match filter.bound {
        Bound::Literal => {
            let lower = r.value(&filter.lower);
            let upper = r.value(&filter.upper);
            format!("{} BETWEEN {} AND {}", field, lower, upper)
        }
        Bound::Field => format!("{} BETWEEN {} AND {}", r.literal(field), lower, upper),
    };
    trace!(field, condition = %condition, "range condition");
    Ok(condition)
}

pub(crate) fn render_ranges(
    r: &mut Renderer,
    filters: &FilterMap<RangeFilter>,
) -> QueryResult<String> {
    let mut sql = String::new();
    for (key, filter) in filters {
        let field = key.trim();
        if is_numeric_key(field) {
            return Err(QueryError::numeric_key(field));
        }
        let condition = render_range(r, field, filter).wrap_err("failed to build range condition")?;
        sql = chain_condition(&sql, &condition)?;
    }
    Ok(sql)
}
