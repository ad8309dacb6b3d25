//! Validators and syntax hooks the compilers rely on.

use std::fmt::Debug;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::error::{QueryError, QueryResult};

/// Date format accepted by [`validate_date`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Check that every key in `keys` is present and non-null in `record`.
pub fn validate_keys_exist(keys: &[&str], record: &Map<String, Value>) -> QueryResult<()> {
    for key in keys {
        match record.get(*key) {
            Some(v) if !v.is_null() => {}
            _ => return Err(QueryError::missing(key, Value::Object(record.clone()).to_string())),
        }
    }
    Ok(())
}

/// Check that `value` is a calendar date in `YYYY-MM-DD` form.
pub fn validate_date(value: &str) -> QueryResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| QueryError::invalid_date(value).with_source(e))
}

/// Final `IN` / `NOT IN` syntax.
///
/// Value escaping stays in the set compiler; dialects only override how the
/// already-built value list is checked and wrapped.
pub trait InClauseSyntax: Debug + Send + Sync {
    /// Sanity-check the field and the pre-built value list.
    fn validate_in_shape(&self, field: &str, values_sql: &str) -> QueryResult<()> {
        if field.trim().is_empty() {
            return Err(QueryError::empty_field(field));
        }
        if values_sql.trim().is_empty() {
            return Err(QueryError::empty_value("IN value list", values_sql).with_field(field));
        }
        Ok(())
    }

    /// Render `field IN (values)` or `field NOT IN (values)`.
    fn build_in_clause(&self, field: &str, values_sql: &str, negated: bool) -> String {
        let keyword = if negated { "NOT IN" } else { "IN" };
        format!("{} {} ({})", field.trim(), keyword, values_sql)
    }
}

/// The standard SQL `IN` syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardInSyntax;

impl InClauseSyntax for StandardInSyntax {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;

    fn record(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_keys_exist() {
        let r = record(json!({"valor1": 1, "valor2": "b"}));
        assert!(validate_keys_exist(&["valor1", "valor2"], &r).is_ok());
    }

    #[test]
    fn test_keys_missing_or_null() {
        let r = record(json!({"valor1": 1, "valor2": null}));
        let err = validate_keys_exist(&["valor1", "valor2"], &r).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingRequiredAttribute);
        assert!(err.message.contains("valor2"));
    }

    #[test]
    fn test_validate_date() {
        let date = validate_date("2024-02-29").unwrap();
        assert_eq!(date.to_string(), "2024-02-29");
        assert_eq!(validate_date("2023-02-29").unwrap_err().code, ErrorCode::InvalidDate);
        assert_eq!(validate_date("created_at").unwrap_err().code, ErrorCode::InvalidDate);
    }

    #[test]
    fn test_standard_in_syntax() {
        let syntax = StandardInSyntax;
        assert!(syntax.validate_in_shape("cat", "'1'").is_ok());
        assert_eq!(
            syntax.validate_in_shape(" ", "'1'").unwrap_err().code,
            ErrorCode::EmptyField
        );
        assert_eq!(
            syntax.validate_in_shape("cat", "").unwrap_err().code,
            ErrorCode::EmptyValue
        );
        assert_eq!(syntax.build_in_clause("cat", "'1','2'", false), "cat IN ('1','2')");
        assert_eq!(syntax.build_in_clause("cat", "'1'", true), "cat NOT IN ('1')");
    }
}
