//! AND/OR combination of equality and text filters.

use tracing::trace;

use super::comparison::resolve_comparison;
use crate::error::{QueryError, QueryResult, ResultExt};
use crate::filter::{is_numeric_key, ColumnMap, EqualityFilter, FilterMap, FilterType, LogicalOperator};
use crate::sql::Renderer;

/// Compile equality filters in the given mode with literal rendering.
///
/// ```rust
/// use criba_query::compiler::conjunction::compile_conjunction;
/// use criba_query::{ColumnMap, EqualityFilter, FilterMap, FilterType};
///
/// let mut filters = FilterMap::new();
/// filters.insert("t.a".to_string(), EqualityFilter::new("x").comparison("=").logical("AND"));
/// filters.insert("t.b".to_string(), EqualityFilter::new("y"));
///
/// let sql = compile_conjunction(&filters, FilterType::Numbers, &ColumnMap::new()).unwrap();
/// assert_eq!(sql, "t.a = 'x' AND t.b = 'y'");
/// ```
pub fn compile_conjunction(
    filters: &FilterMap<EqualityFilter>,
    filter_type: FilterType,
    columns: &ColumnMap,
) -> QueryResult<String> {
    render_conjunction(&mut Renderer::literal_mode(), filters, filter_type, columns)
}

/// Numeric-mode conjunction: `field = 'value'` terms.
pub fn compile_and(filters: &FilterMap<EqualityFilter>, columns: &ColumnMap) -> QueryResult<String> {
    compile_conjunction(filters, FilterType::Numbers, columns)
}

/// Text-mode conjunction: `field LIKE '%value%'` terms.
pub fn compile_and_texts(
    filters: &FilterMap<EqualityFilter>,
    columns: &ColumnMap,
) -> QueryResult<String> {
    compile_conjunction(filters, FilterType::Texts, columns)
}

/// The comparison operator, falling back to `default` when absent or blank.
fn comparison_operator<'a>(filter: &'a EqualityFilter, default: &'a str) -> &'a str {
    match filter.comparison.as_deref().map(str::trim) {
        Some(op) if !op.is_empty() => op,
        _ => default,
    }
}

pub(crate) fn render_conjunction(
    r: &mut Renderer,
    filters: &FilterMap<EqualityFilter>,
    filter_type: FilterType,
    columns: &ColumnMap,
) -> QueryResult<String> {
    let mut sql = String::new();
    for (key, filter) in filters {
        if is_numeric_key(key) {
            return Err(QueryError::numeric_key(key.as_str())
                .with_help("keys must reference table.column"));
        }
        let comparison =
            resolve_comparison(key, filter, columns).wrap_err("failed to resolve comparison")?;

        let (logical, term) = match filter_type {
            FilterType::Numbers => {
                let logical = LogicalOperator::parse_or_default(filter.logical.as_deref())?;
                let op = comparison_operator(filter, "=");
                let term = format!("{} {} {}", comparison.field, op, r.value(&comparison.typed));
                (logical, term)
            }
            FilterType::Texts => {
                let op = comparison_operator(filter, "LIKE");
                match filter.logical.as_deref().filter(|s| !s.is_empty()) {
                    Some(raw) => {
                        let logical: LogicalOperator = raw.parse()?;
                        let term =
                            format!("{} {} {}", comparison.field, op, r.value(&comparison.typed));
                        (logical, term)
                    }
                    None => {
                        let pattern = format!("%{}%", comparison.value);
                        let term = format!("{} {} {}", comparison.field, op, r.literal(&pattern));
                        (LogicalOperator::And, term)
                    }
                }
            }
        };

        if sql.is_empty() {
            sql = term;
        } else {
            sql = format!("{} {} {}", sql, logical, term);
        }
        trace!(key = %key, mode = filter_type.as_str(), "conjunction term");
    }
    Ok(sql)
}
