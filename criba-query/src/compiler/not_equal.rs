//! `field <> 'value'` conditions.

use tracing::trace;

use super::and_join;
use crate::error::{QueryError, QueryResult};
use crate::filter::{is_numeric_key, FilterMap, FilterValue};
use crate::sql::{escape_literal, Renderer};

/// Compile not-equal filters with literal rendering.
///
/// ```rust
/// use criba_query::compiler::not_equal::compile_not_equal;
/// use criba_query::{FilterMap, FilterValue};
///
/// let mut filters = FilterMap::new();
/// filters.insert("t.status".to_string(), FilterValue::from("baja"));
/// assert_eq!(compile_not_equal(&filters).unwrap(), "t.status <> 'baja'");
/// ```
pub fn compile_not_equal(filters: &FilterMap<FilterValue>) -> QueryResult<String> {
    render_not_equal(&mut Renderer::literal_mode(), filters)
}

pub(crate) fn render_not_equal(
    r: &mut Renderer,
    filters: &FilterMap<FilterValue>,
) -> QueryResult<String> {
    let mut sql = String::new();
    for (key, value) in filters {
        let field = key.trim();
        if field.is_empty() {
            return Err(QueryError::empty_field(key.as_str()));
        }
        if is_numeric_key(field) {
            return Err(QueryError::numeric_key(field));
        }
        let condition = format!("{} <> {}", escape_literal(field), r.value(&value.trimmed()));
        let and = and_join(&sql);
        sql.push_str(and);
        sql.push_str(&condition);
        trace!(field, "not-equal condition");
    }
    Ok(sql)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_not_equal_chain() {
        let mut filters = FilterMap::new();
        filters.insert("t.a".to_string(), FilterValue::Int(1));
        filters.insert("t.b".to_string(), FilterValue::from(" x "));
        assert_eq!(compile_not_equal(&filters).unwrap(), "t.a <> '1' AND t.b <> 'x'");
    }

    #[test]
    fn test_not_equal_empty() {
        assert_eq!(compile_not_equal(&FilterMap::new()).unwrap(), "");
    }

    #[test]
    fn test_not_equal_bad_keys() {
        let mut filters = FilterMap::new();
        filters.insert(" ".to_string(), FilterValue::Int(1));
        assert_eq!(compile_not_equal(&filters).unwrap_err().code, ErrorCode::EmptyField);

        let mut filters = FilterMap::new();
        filters.insert("7".to_string(), FilterValue::Int(1));
        assert_eq!(compile_not_equal(&filters).unwrap_err().code, ErrorCode::NumericFieldKey);
    }
}
