use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A typed cell value. Which variant a cell holds is decided by the
/// column's declared `CellType` at coercion time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
    /// The stored value of a select option (not its label)
    Choice(String),
}

static EMPTY: CellValue = CellValue::Empty;

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    pub fn choice(s: impl Into<String>) -> Self {
        CellValue::Choice(s.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Boolean truthiness, used by checkbox cells regardless of the stored variant.
    pub fn truthy(&self) -> bool {
        match self {
            CellValue::Empty => false,
            CellValue::Bool(b) => *b,
            CellValue::Number(n) => *n != 0.0 && !n.is_nan(),
            CellValue::Text(s) | CellValue::Choice(s) => !s.is_empty(),
            CellValue::Date(_) => true,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Borrow the inner string of text-like variants.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) | CellValue::Choice(s) => Some(s),
            _ => None,
        }
    }
}

/// One externally-owned record: a mapping from column accessor to value.
///
/// The grid never assigns identity to rows; they are addressed by position only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, CellValue>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.0.get(key)
    }

    /// Value under `key`, or `CellValue::Empty` when absent.
    pub fn value(&self, key: &str) -> &CellValue {
        self.0.get(key).unwrap_or(&EMPTY)
    }

    pub fn set(&mut self, key: impl Into<String>, value: CellValue) {
        self.0.insert(key.into(), value);
    }

    pub fn with(mut self, key: impl Into<String>, value: CellValue) -> Self {
        self.set(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<CellValue> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CellValue)> {
        self.0.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, CellValue)>>(iter: I) -> Self {
        Row(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_reads_as_empty() {
        let row = Row::new().with("name", CellValue::text("Ada"));
        assert_eq!(row.value("name"), &CellValue::text("Ada"));
        assert_eq!(row.value("missing"), &CellValue::Empty);
        assert!(row.get("missing").is_none());
    }

    #[test]
    fn test_truthiness() {
        assert!(!CellValue::Empty.truthy());
        assert!(CellValue::Bool(true).truthy());
        assert!(!CellValue::Bool(false).truthy());
        assert!(!CellValue::Number(0.0).truthy());
        assert!(CellValue::Number(2.5).truthy());
        assert!(!CellValue::text("").truthy());
        assert!(CellValue::text("x").truthy());
    }

    #[test]
    fn test_row_serializes_as_plain_map() {
        let row: Row = [("qty", CellValue::Number(5.0))].into_iter().collect();
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["qty"]["type"], "number");
        assert_eq!(json["qty"]["value"], 5.0);
    }
}
