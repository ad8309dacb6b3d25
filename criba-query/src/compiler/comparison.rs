//! Field/value resolution for equality filters.

use crate::error::{QueryError, QueryResult};
use crate::filter::{ColumnMap, EqualityFilter, FilterValue};
use crate::sql::escape_literal;

/// A resolved `(field, value)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// The field as it will be emitted: escaped, or a subquery verbatim.
    pub field: String,
    /// The trimmed value, not yet escaped.
    pub value: String,
    /// The trimmed value with its original type, for binding.
    pub typed: FilterValue,
    /// Whether `field` came from the column map.
    pub is_subquery: bool,
}

/// Whether `field` has a subquery in `columns`.
pub fn is_subquery(field: &str, columns: &ColumnMap) -> QueryResult<bool> {
    let field = field.trim();
    if field.is_empty() {
        return Err(QueryError::empty_field(field));
    }
    Ok(columns.contains_key(field))
}

/// Resolve the field and value of an equality filter stored under `key`.
///
/// The field is the filter's explicit `campo` or the key, escaped. When the
/// key is in `columns`, the mapped subquery replaces it unescaped.
pub fn resolve_comparison(
    key: &str,
    filter: &EqualityFilter,
    columns: &ColumnMap,
) -> QueryResult<Comparison> {
    if key.trim().is_empty() {
        return Err(QueryError::empty_key(key));
    }

    let typed = filter.value.trimmed();
    let value = typed.as_text().trim().to_string();

    let comparison = match columns.get(key) {
        Some(subquery) => Comparison {
            field: subquery.clone(),
            value,
            typed,
            is_subquery: true,
        },
        None => Comparison {
            field: escape_literal(filter.field.as_deref().unwrap_or(key)),
            value,
            typed,
            is_subquery: false,
        },
    };
    Ok(comparison)
}
