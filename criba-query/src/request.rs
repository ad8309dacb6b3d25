//! A whole filter request, as callers send it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::bundle::CompiledFilterBundle;
use crate::error::{QueryError, QueryResult};
use crate::filter::{ColumnMap, FilterValue};

/// Every filter category of one query.
///
/// Categories are kept as raw JSON until compilation, where
/// [`crate::input`] checks their shapes. Absent categories compile to empty
/// fragments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterRequest {
    /// Equality or text filters (`filtro`).
    #[serde(rename = "filtro", skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    /// `numeros` or `textos` (`tipo_filtro`).
    #[serde(rename = "tipo_filtro", skip_serializing_if = "Option::is_none")]
    pub filter_type: Option<String>,
    /// Special filter groups (`filtro_especial`).
    #[serde(rename = "filtro_especial", skip_serializing_if = "Option::is_none")]
    pub special: Option<Value>,
    /// Range filters (`filtro_rango`).
    #[serde(rename = "filtro_rango", skip_serializing_if = "Option::is_none")]
    pub range: Option<Value>,
    /// Extra filter groups (`filtro_extra`).
    #[serde(rename = "filtro_extra", skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
    /// `IN` filter (`in`).
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub in_set: Option<Value>,
    /// `NOT IN` filter (`not_in`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_in: Option<Value>,
    /// Not-equal filters (`diferente_de`).
    #[serde(rename = "diferente_de", skip_serializing_if = "Option::is_none")]
    pub not_equal: Option<Value>,
    /// Date filters (`filtro_fecha`).
    #[serde(rename = "filtro_fecha", skip_serializing_if = "Option::is_none")]
    pub dates: Option<Value>,
    /// Raw SQL passed through untouched (`sql_extra`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_extra: Option<String>,
    /// Subquery columns (`columnas_extra`).
    #[serde(rename = "columnas_extra", skip_serializing_if = "ColumnMap::is_empty")]
    pub columns: ColumnMap,
}

impl FilterRequest {
    /// Parse a request from JSON text.
    pub fn from_json(json: &str) -> QueryResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            QueryError::invalid_shape(format!("invalid filter request: {}", e), json).with_source(e)
        })
    }

    /// Parse a request from a JSON value.
    pub fn from_value(value: Value) -> QueryResult<Self> {
        let data = value.to_string();
        serde_json::from_value(value).map_err(|e| {
            QueryError::invalid_shape(format!("invalid filter request: {}", e), data).with_source(e)
        })
    }
}

/// The result of [`crate::FilterCompiler::compile`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompiledRequest {
    /// The compiled fragments.
    pub bundle: CompiledFilterBundle,
    /// Bound parameters across all fragments, in placeholder order.
    pub params: Vec<FilterValue>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;

    #[test]
    fn test_wire_keys() {
        let req = FilterRequest::from_json(
            r#"{"filtro": {"t.a": 1}, "tipo_filtro": "textos", "in": {"llave": "x", "values": []},
                "columnas_extra": {"total": "(SELECT 1)"}, "sql_extra": "1 = 1"}"#,
        )
        .unwrap();
        assert!(req.filter.is_some());
        assert_eq!(req.filter_type.as_deref(), Some("textos"));
        assert!(req.in_set.is_some());
        assert_eq!(req.columns["total"], "(SELECT 1)");
        assert_eq!(req.sql_extra.as_deref(), Some("1 = 1"));
    }

    #[test]
    fn test_empty_request() {
        let req = FilterRequest::from_json("{}").unwrap();
        assert_eq!(req, FilterRequest::default());
    }

    #[test]
    fn test_invalid_json() {
        let err = FilterRequest::from_json("[1, 2]").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidShape);

        let err = FilterRequest::from_value(json!({"columnas_extra": [1]})).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidShape);
    }

    #[test]
    fn test_serialize_skips_absent() {
        let req = FilterRequest {
            sql_extra: Some("a = 1".into()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({"sql_extra": "a = 1"}));
    }
}
