//! Filter types accepted by the compilers.
//!
//! Each filter category has its own typed variant. Collections keyed by field
//! name are [`FilterMap`]s (insertion-ordered, since the order of the emitted
//! conditions follows the caller's order). Per-column groups whose order and
//! repetition matter are `Vec<FilterGroup<_>>`.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Filters keyed by field name, in caller order.
pub type FilterMap<T> = IndexMap<String, T>;

/// Logical field name → subquery SQL expression.
///
/// When a field is a key of this map, compilers that accept it emit the
/// mapped expression verbatim in place of the field.
pub type ColumnMap = IndexMap<String, String>;

/// A scalar value used in a filter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Null value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// String value.
    String(String),
}

impl FilterValue {
    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The textual form used when the value is written into SQL.
    ///
    /// `Null` and `false` are empty, `true` is `"1"`.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Null => Cow::Borrowed(""),
            Self::Bool(true) => Cow::Borrowed("1"),
            Self::Bool(false) => Cow::Borrowed(""),
            Self::Int(v) => Cow::Owned(v.to_string()),
            Self::Float(v) => Cow::Owned(v.to_string()),
            Self::String(s) => Cow::Borrowed(s.as_str()),
        }
    }

    /// Check whether the textual form is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.as_text().trim().is_empty()
    }

    /// A copy with surrounding whitespace removed from strings.
    pub fn trimmed(&self) -> Self {
        match self {
            Self::String(s) => Self::String(s.trim().to_string()),
            other => other.clone(),
        }
    }

    /// Convert a JSON scalar. Arrays and objects are not scalars.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        use serde_json::Value;
        match value {
            Value::Null => Some(Self::Null),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Self::Int(i)),
                None => n.as_f64().map(Self::Float),
            },
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for FilterValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

/// Check whether a key looks like a number rather than a field reference.
///
/// Accepts the usual decimal forms with optional sign, fraction and
/// exponent, surrounded by optional whitespace.
pub fn is_numeric_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty()
        && key.chars().any(|c| c.is_ascii_digit())
        && key
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        && key.parse::<f64>().is_ok()
}

/// Logical operator joining two conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogicalOperator {
    /// `AND`
    #[default]
    And,
    /// `OR`
    Or,
}

impl LogicalOperator {
    /// Get the SQL keyword.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// Parse an optional operator, falling back to `AND`.
    pub fn parse_or_default(raw: Option<&str>) -> Result<Self, QueryError> {
        raw.map_or(Ok(Self::And), |s| s.parse())
    }
}

impl FromStr for LogicalOperator {
    type Err = QueryError;

    /// Exactly `AND` or `OR` after trimming; case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "AND" => Ok(Self::And),
            "OR" => Ok(Self::Or),
            _ => Err(QueryError::invalid_logical_operator(s)),
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Selects how equality filters are compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Plain comparisons, `=` by default.
    #[default]
    #[serde(rename = "numeros")]
    Numbers,
    /// Substring search, `LIKE '%value%'` by default.
    #[serde(rename = "textos")]
    Texts,
}

impl FilterType {
    /// The selector string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numbers => "numeros",
            Self::Texts => "textos",
        }
    }
}

impl FromStr for FilterType {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "numeros" => Ok(Self::Numbers),
            "textos" => Ok(Self::Texts),
            _ => Err(QueryError::invalid_filter_type(s)),
        }
    }
}

/// Whether a bound/value is a literal or a reference to another field.
///
/// The two variants quote opposite sides of the condition:
/// - `Literal`: `field BETWEEN 'a' AND 'b'`, `field = 'v'`
/// - `Field`: `'field' BETWEEN a AND b`, `'field'=v`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bound {
    /// The value is a literal and gets quoted.
    #[default]
    Literal,
    /// The value is a field reference and is emitted as is.
    Field,
}

impl Bound {
    /// `Field` when `is_field` is set.
    pub fn from_flag(is_field: bool) -> Self {
        if is_field { Self::Field } else { Self::Literal }
    }
}

/// An equality or text filter for one field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EqualityFilter {
    /// The value to compare against.
    pub value: FilterValue,
    /// Explicit field, overriding the map key (`campo`).
    pub field: Option<String>,
    /// Comparison operator (`comparacion`), e.g. `=`, `<>`, `LIKE`.
    pub comparison: Option<String>,
    /// Logical operator (`operador`) joining this condition to the previous one.
    pub logical: Option<String>,
}

impl EqualityFilter {
    /// Create a filter comparing against `value`.
    pub fn new(value: impl Into<FilterValue>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// Use an explicit field instead of the key.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Set the comparison operator.
    pub fn comparison(mut self, op: impl Into<String>) -> Self {
        self.comparison = Some(op.into());
        self
    }

    /// Set the logical operator.
    pub fn logical(mut self, op: impl Into<String>) -> Self {
        self.logical = Some(op.into());
        self
    }
}

/// A `BETWEEN` filter for one field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RangeFilter {
    /// Lower bound (`valor1`). `Null` counts as absent.
    pub lower: FilterValue,
    /// Upper bound (`valor2`). `Null` counts as absent.
    pub upper: FilterValue,
    /// Whether the bounds are field references (`valor_campo`).
    pub bound: Bound,
}

impl RangeFilter {
    /// Create a literal range.
    pub fn new(lower: impl Into<FilterValue>, upper: impl Into<FilterValue>) -> Self {
        Self {
            lower: lower.into(),
            upper: upper.into(),
            bound: Bound::Literal,
        }
    }

    /// Treat the bounds as field references.
    pub fn field_bound(mut self) -> Self {
        self.bound = Bound::Field;
        self
    }
}

/// An `IN` / `NOT IN` filter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SetFilter {
    /// The field (`llave`).
    pub key: String,
    /// The candidate values.
    pub values: Vec<FilterValue>,
}

impl SetFilter {
    /// Create a set filter.
    pub fn new<I, V>(key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        Self {
            key: key.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// A date-within-period filter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DateFilter {
    /// Expression for the start of the period (`campo_1`), emitted as is.
    pub start: String,
    /// Expression for the end of the period (`campo_2`), emitted as is.
    pub end: String,
    /// The date to test (`fecha`), `YYYY-MM-DD`.
    pub date: String,
}

impl DateFilter {
    /// Create a date filter.
    pub fn new(start: impl Into<String>, end: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            date: date.into(),
        }
    }
}

/// A per-column condition with its own operator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecialFilter {
    /// Comparison operator (`operador`).
    pub operator: Option<String>,
    /// Value (`valor`).
    pub value: Option<FilterValue>,
    /// Whether `value` is a field reference (`valor_es_campo`).
    pub bound: Bound,
    /// Logical operator joining this group to the previous one (`comparacion`).
    pub join: Option<String>,
}

impl SpecialFilter {
    /// Create a special filter.
    pub fn new(operator: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self {
            operator: Some(operator.into()),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Treat the value as a field reference.
    pub fn value_is_field(mut self) -> Self {
        self.bound = Bound::Field;
        self
    }

    /// Set the logical operator joining to the previous group.
    pub fn join(mut self, op: impl Into<String>) -> Self {
        self.join = Some(op.into());
        self
    }
}

/// A per-column condition where every attribute is mandatory.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtraFilter {
    /// Comparison operator (`operador`).
    pub operator: Option<String>,
    /// Value (`valor`).
    pub value: Option<FilterValue>,
    /// Logical operator (`comparacion`), required even on the first group.
    pub join: Option<String>,
}

impl ExtraFilter {
    /// Create an extra filter.
    pub fn new(
        operator: impl Into<String>,
        value: impl Into<FilterValue>,
        join: impl Into<String>,
    ) -> Self {
        Self {
            operator: Some(operator.into()),
            value: Some(value.into()),
            join: Some(join.into()),
        }
    }
}

/// One single-field entry of an ordered group collection.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterGroup<T> {
    /// The group's key: the field name.
    pub field: String,
    /// The filter for that field.
    pub filter: T,
}

impl<T> FilterGroup<T> {
    /// Create a group.
    pub fn new(field: impl Into<String>, filter: T) -> Self {
        Self {
            field: field.into(),
            filter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_filter_value_from() {
        assert_eq!(FilterValue::from(42i32), FilterValue::Int(42));
        assert_eq!(FilterValue::from("hello"), FilterValue::String("hello".to_string()));
        assert_eq!(FilterValue::from(true), FilterValue::Bool(true));
        assert_eq!(FilterValue::from(None::<i64>), FilterValue::Null);
    }

    #[test]
    fn test_filter_value_text() {
        assert_eq!(FilterValue::Null.as_text(), "");
        assert_eq!(FilterValue::Bool(true).as_text(), "1");
        assert_eq!(FilterValue::Bool(false).as_text(), "");
        assert_eq!(FilterValue::Float(2.5).as_text(), "2.5");
        assert!(FilterValue::from("   ").is_blank());
        assert!(!FilterValue::Int(0).is_blank());
    }

    #[test]
    fn test_filter_value_trimmed() {
        assert_eq!(FilterValue::from("  x ").trimmed(), FilterValue::from("x"));
        assert_eq!(FilterValue::Int(7).trimmed(), FilterValue::Int(7));
    }

    #[test]
    fn test_filter_value_from_json() {
        let v = serde_json::json!(7);
        assert_eq!(FilterValue::from_json(&v), Some(FilterValue::Int(7)));
        assert_eq!(FilterValue::from_json(&serde_json::json!([1])), None);
        assert_eq!(FilterValue::from_json(&serde_json::json!({})), None);
    }

    #[test]
    fn test_numeric_keys() {
        assert!(is_numeric_key("0"));
        assert!(is_numeric_key(" 12 "));
        assert!(is_numeric_key("-1.5e3"));
        assert!(!is_numeric_key("t.a"));
        assert!(!is_numeric_key(""));
        assert!(!is_numeric_key("inf"));
        assert!(!is_numeric_key("1a"));
    }

    #[test]
    fn test_logical_operator_parse() {
        assert_eq!(" AND ".parse::<LogicalOperator>().unwrap(), LogicalOperator::And);
        assert_eq!("OR".parse::<LogicalOperator>().unwrap(), LogicalOperator::Or);
        let err = "and".parse::<LogicalOperator>().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidLogicalOperator);
        assert_eq!(LogicalOperator::parse_or_default(None).unwrap(), LogicalOperator::And);
    }

    #[test]
    fn test_filter_type_parse() {
        assert_eq!("numeros".parse::<FilterType>().unwrap(), FilterType::Numbers);
        assert_eq!("textos".parse::<FilterType>().unwrap(), FilterType::Texts);
        let err = "fechas".parse::<FilterType>().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFilterTypeTag);
    }

    #[test]
    fn test_builders() {
        let range = RangeFilter::new(1, 10).field_bound();
        assert_eq!(range.bound, Bound::Field);

        let special = SpecialFilter::new(">", "t.b").value_is_field().join("OR");
        assert_eq!(special.bound, Bound::Field);
        assert_eq!(special.join.as_deref(), Some("OR"));

        let set = SetFilter::new("cat", ["10", "20"]);
        assert_eq!(set.values.len(), 2);
    }
}
