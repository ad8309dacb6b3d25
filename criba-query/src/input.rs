//! JSON intake: turns the loosely shaped request categories into typed filters.
//!
//! Each function accepts the raw JSON of one category (`None` or `null` when
//! the category is absent) and either returns the typed collection or a
//! shape error. No SQL is produced here.

use serde_json::{Map, Value};

use crate::error::{QueryError, QueryResult};
use crate::filter::{
    is_numeric_key, Bound, DateFilter, EqualityFilter, ExtraFilter, FilterGroup, FilterMap,
    FilterValue, RangeFilter, SetFilter, SpecialFilter,
};
use crate::validation::validate_keys_exist;

/// Whether a JSON value counts as "set" for boolean flags.
///
/// `null`, `false`, `0`, `""`, `"0"` and empty collections are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn absent(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// A keyed category: an object, or an empty array standing for "no entries".
///
/// A non-empty array has positional keys, which cannot be field references.
fn keyed<'a>(value: &'a Value, category: &str) -> QueryResult<Option<&'a Map<String, Value>>> {
    match value {
        Value::Object(map) => Ok(Some(map)),
        Value::Array(items) if items.is_empty() => Ok(None),
        Value::Array(_) => Err(QueryError::numeric_key(value.to_string())
            .with_help(format!("`{}` must be an object keyed by table.column", category))),
        _ => Err(QueryError::invalid_shape(
            format!("`{}` must be an object", category),
            value.to_string(),
        )),
    }
}

/// A list category: an array, or an object whose values are taken in order.
fn listed<'a>(value: &'a Value, category: &str) -> QueryResult<Vec<&'a Value>> {
    match value {
        Value::Array(items) => Ok(items.iter().collect()),
        Value::Object(map) => Ok(map.values().collect()),
        _ => Err(QueryError::invalid_shape(
            format!("`{}` must be an array", category),
            value.to_string(),
        )),
    }
}

fn record<'a>(value: &'a Value, what: &str) -> QueryResult<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        QueryError::invalid_shape(format!("{} must be an object", what), value.to_string())
    })
}

fn scalar(value: &Value, what: &str) -> QueryResult<FilterValue> {
    FilterValue::from_json(value).ok_or_else(|| {
        QueryError::invalid_shape(format!("{} must be a scalar", what), value.to_string())
    })
}

fn text(value: &Value, what: &str) -> QueryResult<String> {
    Ok(scalar(value, what)?.as_text().into_owned())
}

fn optional_text(map: &Map<String, Value>, key: &str) -> QueryResult<Option<String>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => text(v, key).map(Some),
    }
}

fn optional_scalar(map: &Map<String, Value>, key: &str) -> QueryResult<Option<FilterValue>> {
    match map.get(key) {
        None => Ok(None),
        Some(v) => scalar(v, key).map(Some),
    }
}

/// The single `{ field: entry }` pair of a group.
fn single_entry<'a>(group: &'a Value, category: &str) -> QueryResult<(&'a str, &'a Value)> {
    let map = record(group, &format!("each `{}` group", category))?;
    let mut entries = map.iter();
    match (entries.next(), entries.next()) {
        (Some((field, entry)), None) => Ok((field.as_str(), entry)),
        _ => Err(QueryError::invalid_shape(
            format!("each `{}` group must have exactly one field", category),
            group.to_string(),
        )),
    }
}

/// Parse `filtro`: field → scalar or `{value, campo?, comparacion?, operador?}`.
pub fn equality_filters(value: Option<&Value>) -> QueryResult<FilterMap<EqualityFilter>> {
    let mut filters = FilterMap::new();
    let Some(map) = absent(value).map(|v| keyed(v, "filtro")).transpose()?.flatten() else {
        return Ok(filters);
    };

    for (key, entry) in map {
        let filter = match entry {
            Value::Object(attrs) if attrs.is_empty() => {
                return Err(QueryError::empty_value("filter entry", entry.to_string())
                    .with_field(key.as_str()));
            }
            Value::Object(attrs) => {
                let value = attrs.get("value").filter(|v| !v.is_null()).ok_or_else(|| {
                    QueryError::missing("value", entry.to_string()).with_field(key.as_str())
                })?;
                EqualityFilter {
                    value: scalar(value, "value")?,
                    field: optional_text(attrs, "campo")?,
                    comparison: optional_text(attrs, "comparacion")?,
                    logical: optional_text(attrs, "operador")?,
                }
            }
            Value::Array(_) => {
                return Err(QueryError::invalid_shape(
                    "filter entry must be a scalar or an object",
                    entry.to_string(),
                )
                .with_field(key.as_str()));
            }
            other => EqualityFilter::new(scalar(other, "value")?),
        };
        filters.insert(key.clone(), filter);
    }
    Ok(filters)
}

/// Parse `filtro_rango`: field → `{valor1, valor2, valor_campo?}`.
pub fn range_filters(value: Option<&Value>) -> QueryResult<FilterMap<RangeFilter>> {
    let mut filters = FilterMap::new();
    let Some(map) = absent(value).map(|v| keyed(v, "filtro_rango")).transpose()?.flatten() else {
        return Ok(filters);
    };

    for (key, entry) in map {
        let attrs = record(entry, "a range filter")?;
        validate_keys_exist(&["valor1", "valor2"], attrs).map_err(|e| e.with_field(key.as_str()))?;
        let filter = RangeFilter {
            lower: scalar(&attrs["valor1"], "valor1")?,
            upper: scalar(&attrs["valor2"], "valor2")?,
            bound: Bound::from_flag(attrs.get("valor_campo").is_some_and(is_truthy)),
        };
        filters.insert(key.clone(), filter);
    }
    Ok(filters)
}

/// Parse `in` / `not_in`: `{llave, values: [...]}`.
///
/// An absent category, `{}` or `[]` means no filter.
pub fn set_filter(value: Option<&Value>) -> QueryResult<Option<SetFilter>> {
    let Some(value) = absent(value) else {
        return Ok(None);
    };
    let attrs = match value {
        Value::Object(map) if map.is_empty() => return Ok(None),
        Value::Array(items) if items.is_empty() => return Ok(None),
        _ => record(value, "an IN filter")?,
    };

    validate_keys_exist(&["llave", "values"], attrs)?;
    let key = text(&attrs["llave"], "llave")?;
    let Value::Array(items) = &attrs["values"] else {
        return Err(QueryError::invalid_shape("`values` must be an array", attrs["values"].to_string())
            .with_field(key));
    };
    let values = items
        .iter()
        .map(|item| scalar(item, "an IN value"))
        .collect::<QueryResult<Vec<_>>>()?;

    Ok(Some(SetFilter { key, values }))
}

/// Parse `filtro_fecha`: a list of `{campo_1, campo_2, fecha}`.
pub fn date_filters(value: Option<&Value>) -> QueryResult<Vec<DateFilter>> {
    let Some(value) = absent(value) else {
        return Ok(Vec::new());
    };
    listed(value, "filtro_fecha")?
        .into_iter()
        .map(|entry| {
            let attrs = record(entry, "a date filter")?;
            validate_keys_exist(&["campo_1", "campo_2", "fecha"], attrs)?;
            Ok(DateFilter {
                start: text(&attrs["campo_1"], "campo_1")?,
                end: text(&attrs["campo_2"], "campo_2")?,
                date: text(&attrs["fecha"], "fecha")?,
            })
        })
        .collect()
}

/// Parse `filtro_especial`: a list of `{ field: {operador, valor, valor_es_campo?, comparacion?} }`.
pub fn special_groups(value: Option<&Value>) -> QueryResult<Vec<FilterGroup<SpecialFilter>>> {
    let Some(value) = absent(value) else {
        return Ok(Vec::new());
    };
    listed(value, "filtro_especial")?
        .into_iter()
        .map(|group| {
            let (field, entry) = single_entry(group, "filtro_especial")?;
            let attrs = record(entry, "a special filter")?;
            let filter = SpecialFilter {
                operator: optional_text(attrs, "operador")?,
                value: optional_scalar(attrs, "valor")?,
                bound: Bound::from_flag(attrs.get("valor_es_campo").is_some_and(is_truthy)),
                join: optional_text(attrs, "comparacion")?,
            };
            Ok(FilterGroup::new(field, filter))
        })
        .collect()
}

/// Parse `filtro_extra`: a list of `{ field: {operador, valor, comparacion} }`.
pub fn extra_groups(value: Option<&Value>) -> QueryResult<Vec<FilterGroup<ExtraFilter>>> {
    let Some(value) = absent(value) else {
        return Ok(Vec::new());
    };
    listed(value, "filtro_extra")?
        .into_iter()
        .map(|group| {
            let (field, entry) = single_entry(group, "filtro_extra")?;
            let attrs = record(entry, "an extra filter")?;
            let filter = ExtraFilter {
                operator: optional_text(attrs, "operador")?,
                value: optional_scalar(attrs, "valor")?,
                join: optional_text(attrs, "comparacion")?,
            };
            Ok(FilterGroup::new(field, filter))
        })
        .collect()
}

/// Parse `diferente_de`: field → scalar.
pub fn not_equal_filters(value: Option<&Value>) -> QueryResult<FilterMap<FilterValue>> {
    let mut filters = FilterMap::new();
    let Some(map) = absent(value).map(|v| keyed(v, "diferente_de")).transpose()?.flatten() else {
        return Ok(filters);
    };
    for (key, entry) in map {
        if is_numeric_key(key) {
            return Err(QueryError::numeric_key(key.as_str()));
        }
        filters.insert(key.clone(), scalar(entry, "a not-equal value")?);
    }
    Ok(filters)
}
