//! Host JSON to and from grid data.
//!
//! Columns are plain serde. Rows are arrays of JSON objects; each field is
//! typed by the column whose accessor matches its key, and fields no column
//! claims are kept with an inferred type so they survive a round trip.

use std::fs;
use std::path::Path;

use editgrid_core::{CellType, CellValue, ColumnDef, Row};
use serde_json::{Map, Value};

use crate::coerce::{parse_date, parse_number};
use crate::error::LoadError;

pub fn read_json_file(path: &Path) -> Result<Value, LoadError> {
    let text = fs::read_to_string(path).map_err(|e| LoadError::Io(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&text).map_err(|e| LoadError::Json(format!("{}: {e}", path.display())))
}

pub fn columns_from_json(value: &Value) -> Result<Vec<ColumnDef>, LoadError> {
    if !value.is_array() {
        return Err(LoadError::Shape("columns must be an array".to_string()));
    }
    let columns: Vec<ColumnDef> =
        serde_json::from_value(value.clone()).map_err(|e| LoadError::Json(e.to_string()))?;

    for (i, column) in columns.iter().enumerate() {
        if columns[..i].iter().any(|c| c.id == column.id) {
            return Err(LoadError::Shape(format!("duplicate column id '{}'", column.id)));
        }
    }
    Ok(columns)
}

pub fn rows_from_json(value: &Value, columns: &[ColumnDef]) -> Result<Vec<Row>, LoadError> {
    let Some(items) = value.as_array() else {
        return Err(LoadError::Shape("rows must be an array".to_string()));
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item.as_object() {
            Some(fields) => Ok(row_from_object(fields, columns)),
            None => Err(LoadError::Shape(format!("row {i} is not an object"))),
        })
        .collect()
}

fn row_from_object(fields: &Map<String, Value>, columns: &[ColumnDef]) -> Row {
    fields
        .iter()
        .map(|(key, v)| {
            let value = match columns.iter().find(|c| c.key() == key.as_str()) {
                Some(column) => value_from_json(v, column.cell_type),
                None => infer_value(v),
            };
            (key.as_str(), value)
        })
        .collect()
}

/// Type a JSON field for a column.
pub fn value_from_json(v: &Value, cell_type: CellType) -> CellValue {
    match (cell_type, v) {
        (_, Value::Null) => CellValue::Empty,
        (CellType::Checkbox, Value::Bool(b)) => CellValue::Bool(*b),
        (CellType::Checkbox, Value::String(s)) => CellValue::Bool(s.trim().eq_ignore_ascii_case("true")),
        (CellType::Checkbox, other) => CellValue::Bool(infer_value(other).truthy()),
        (CellType::Number, Value::String(s)) => CellValue::Number(parse_number(s)),
        (CellType::Date, Value::String(s)) => match parse_date(s) {
            Some(date) => CellValue::Date(date),
            None => CellValue::Text(s.clone()),
        },
        (CellType::Select, Value::String(s)) => CellValue::Choice(s.clone()),
        (CellType::Select, Value::Number(n)) => CellValue::Choice(n.to_string()),
        _ => infer_value(v),
    }
}

/// Type a JSON field no column claims.
pub fn infer_value(v: &Value) -> CellValue {
    match v {
        Value::Null => CellValue::Empty,
        Value::Bool(b) => CellValue::Bool(*b),
        Value::Number(n) => CellValue::Number(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => CellValue::Text(s.clone()),
        other => CellValue::Text(other.to_string()),
    }
}

pub fn value_to_json(value: &CellValue) -> Value {
    match value {
        CellValue::Empty => Value::Null,
        CellValue::Text(s) | CellValue::Choice(s) => Value::String(s.clone()),
        CellValue::Bool(b) => Value::Bool(*b),
        CellValue::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
        // Whole numbers print without a fractional part
        CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15 => {
            Value::from(*n as i64)
        }
        CellValue::Number(n) => serde_json::Number::from_f64(*n)
            .map(Value::Number)
            .unwrap_or(Value::Null),
    }
}

pub fn rows_to_json(rows: &[Row]) -> Value {
    Value::Array(
        rows.iter()
            .map(|row| {
                Value::Object(
                    row.iter()
                        .map(|(k, v)| (k.clone(), value_to_json(v)))
                        .collect(),
                )
            })
            .collect(),
    )
}
