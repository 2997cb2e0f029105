//! Result normalization for the tool-call boundary.
//!
//! Everything handed back to the model must be JSON-primitive: dates as
//! ISO-8601 text, money as floats, no NULLs, no internal columns. This is
//! the one hard data-integrity contract in the system.

use rusqlite::types::ValueRef;
use rusqlite::Row;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::AnalyticsError;

/// One labelled data point, the common shape for trend and grouping
/// results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelValue {
    pub label: String,
    pub value: f64,
}

impl LabelValue {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Convert a SQL row into a JSON object keyed by column name.
///
/// NULL columns and internal columns (leading underscore) are stripped;
/// remaining values are mapped to JSON primitives. BLOB columns never
/// appear in the ERP schema and are skipped defensively.
pub fn row_to_object(row: &Row<'_>, columns: &[String]) -> Result<Value, AnalyticsError> {
    let mut object = Map::new();
    for (idx, column) in columns.iter().enumerate() {
        if column.starts_with('_') {
            continue;
        }
        let value = match row
            .get_ref(idx)
            .map_err(|e| AnalyticsError::Storage(e.to_string()))?
        {
            ValueRef::Null => continue,
            ValueRef::Integer(i) => Value::from(i),
            ValueRef::Real(f) => Value::from(f),
            ValueRef::Text(t) => Value::from(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(_) => continue,
        };
        object.insert(column.clone(), value);
    }
    Ok(Value::Object(object))
}

/// Assert that a JSON value is primitive-clean: objects and arrays of
/// strings, numbers, and booleans only — no nulls anywhere.
///
/// Used by tests to enforce the tool-boundary invariant; cheap enough to
/// call from debug assertions as well.
pub fn is_primitive_clean(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(_) | Value::Number(_) | Value::String(_) => true,
        Value::Array(items) => items.iter().all(is_primitive_clean),
        Value::Object(map) => map.values().all(is_primitive_clean),
    }
}
