//! Date-within-period conditions.

use tracing::trace;

use super::and_join;
use crate::error::{QueryError, QueryResult, ResultExt};
use crate::filter::DateFilter;
use crate::sql::Renderer;
use crate::validation::validate_date;

/// Compile one date condition with literal rendering (not parenthesized).
///
/// ```rust
/// use criba_query::compiler::date::compile_date;
/// use criba_query::DateFilter;
///
/// let filter = DateFilter::new("t.inicio", "t.fin", "2023-06-01");
/// assert_eq!(
///     compile_date(&filter).unwrap(),
///     "'2023-06-01' >= t.inicio AND '2023-06-01' <= t.fin"
/// );
/// ```
pub fn compile_date(filter: &DateFilter) -> QueryResult<String> {
    render_date(&mut Renderer::literal_mode(), filter)
}

/// Compile a list of date filters: AND-chained, wrapped in parentheses when non-empty.
pub fn compile_dates(filters: &[DateFilter]) -> QueryResult<String> {
    render_dates(&mut Renderer::literal_mode(), filters)
}

fn required<'a>(value: &'a str, name: &str) -> QueryResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(QueryError::empty_value(name, value));
    }
    Ok(value)
}

pub(crate) fn render_date(r: &mut Renderer, filter: &DateFilter) -> QueryResult<String> {
    let start = required(&filter.start, "campo_1")?;
    let end = required(&filter.end, "campo_2")?;
    let date = required(&filter.date, "fecha")?;
    validate_date(date)?;

    let lower = r.literal(date);
    let upper = r.literal(date);
    let condition = format!("{} >= {} AND {} <= {}", lower, start, upper, end);
    trace!(date, condition = %condition, "date condition");
    Ok(condition)
}

pub(crate) fn render_dates(r: &mut Renderer, filters: &[DateFilter]) -> QueryResult<String> {
    let mut sql = String::new();
    for filter in filters {
        let condition = render_date(r, filter).wrap_err("failed to build date condition")?;
        let and = and_join(&sql);
        sql.push_str(and);
        sql.push_str(&condition);
    }
    if sql.is_empty() {
        return Ok(sql);
    }
    Ok(format!("({})", sql))
}
