use serde::{Deserialize, Serialize};

use crate::value::CellValue;

/// The declared type of a column. Drives display, edit primitive and
/// paste coercion for every cell in the column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    #[default]
    Text,
    Number,
    Select,
    Date,
    Checkbox,
    File,
    Readonly,
}

/// One entry of a select column's option list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Column width in pixels with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidthBounds {
    pub width: f32,
    pub min: f32,
    pub max: f32,
}

impl Default for WidthBounds {
    fn default() -> Self {
        Self {
            width: 150.0,
            min: 60.0,
            max: 600.0,
        }
    }
}

/// Host-supplied check run against a committed value. The engine stores it
/// but never calls it; validation stays with the host.
pub type Validator = fn(&CellValue) -> Result<(), String>;

fn default_editable() -> bool {
    true
}

/// Column definition. `id` is the sole addressing key for selection,
/// editing and clipboard mapping and must not change for the grid's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    pub id: String,
    #[serde(default)]
    pub header: String,
    /// Key into the row record. Falls back to `id` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessor: Option<String>,
    #[serde(default)]
    pub cell_type: CellType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default)]
    pub width: WidthBounds,
    #[serde(default = "default_editable")]
    pub editable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip)]
    pub validator: Option<Validator>,
}

impl ColumnDef {
    pub fn new(id: impl Into<String>, header: impl Into<String>, cell_type: CellType) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            accessor: None,
            cell_type,
            options: Vec::new(),
            width: WidthBounds::default(),
            editable: true,
            placeholder: None,
            validator: None,
        }
    }

    pub fn with_accessor(mut self, accessor: impl Into<String>) -> Self {
        self.accessor = Some(accessor.into());
        self
    }

    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_width(mut self, width: WidthBounds) -> Self {
        self.width = width;
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Key used to read and write this column in a row record.
    pub fn key(&self) -> &str {
        self.accessor.as_deref().unwrap_or(&self.id)
    }

    /// Whether cells in this column accept edits and pastes.
    /// Readonly columns never do, whatever the `editable` flag says.
    pub fn is_editable(&self) -> bool {
        self.editable && self.cell_type != CellType::Readonly
    }

    /// Label for a stored select value, if it matches an option.
    pub fn option_label(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }

    pub fn clamp_width(&self, px: f32) -> f32 {
        let (lo, hi) = if self.width.min <= self.width.max {
            (self.width.min, self.width.max)
        } else {
            (self.width.max, self.width.min)
        };
        px.clamp(lo, hi)
    }

    pub fn validate(&self, value: &CellValue) -> Result<(), String> {
        match self.validator {
            Some(check) => check(value),
            None => Ok(()),
        }
    }
}

/// Position of a column id within a column list.
pub fn column_index(columns: &[ColumnDef], id: &str) -> Option<usize> {
    columns.iter().position(|c| c.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positive(value: &CellValue) -> Result<(), String> {
        match value {
            CellValue::Number(n) if *n < 0.0 => Err("must be positive".to_string()),
            _ => Ok(()),
        }
    }

    #[test]
    fn test_accessor_falls_back_to_id() {
        let col = ColumnDef::new("amount", "Amount", CellType::Number);
        assert_eq!(col.key(), "amount");
        let col = col.with_accessor("gift_amount");
        assert_eq!(col.key(), "gift_amount");
    }

    #[test]
    fn test_readonly_is_never_editable() {
        let col = ColumnDef::new("id", "ID", CellType::Readonly);
        assert!(col.editable);
        assert!(!col.is_editable());
        let col = ColumnDef::new("name", "Name", CellType::Text).with_editable(false);
        assert!(!col.is_editable());
    }

    #[test]
    fn test_option_label_lookup() {
        let col = ColumnDef::new("status", "Status", CellType::Select).with_options(vec![
            SelectOption::new("open", "Open"),
            SelectOption::new("closed", "Closed"),
        ]);
        assert_eq!(col.option_label("closed"), Some("Closed"));
        assert_eq!(col.option_label("pending"), None);
    }

    #[test]
    fn test_clamp_width() {
        let col = ColumnDef::new("a", "A", CellType::Text).with_width(WidthBounds {
            width: 100.0,
            min: 50.0,
            max: 200.0,
        });
        assert_eq!(col.clamp_width(10.0), 50.0);
        assert_eq!(col.clamp_width(120.0), 120.0);
        assert_eq!(col.clamp_width(900.0), 200.0);
    }

    #[test]
    fn test_validator_is_optional() {
        let col = ColumnDef::new("qty", "Qty", CellType::Number);
        assert!(col.validate(&CellValue::Number(-1.0)).is_ok());
        let col = col.with_validator(positive);
        assert!(col.validate(&CellValue::Number(-1.0)).is_err());
        assert!(col.validate(&CellValue::Number(3.0)).is_ok());
    }

    #[test]
    fn test_deserialize_camel_case_defaults() {
        let json = r#"{"id":"qty","header":"Qty","cellType":"number"}"#;
        let col: ColumnDef = serde_json::from_str(json).unwrap();
        assert_eq!(col.cell_type, CellType::Number);
        assert!(col.editable);
        assert!(col.options.is_empty());
        assert_eq!(col.width, WidthBounds::default());
    }
}
