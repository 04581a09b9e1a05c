// Delimited export of selected rows

use std::fs;
use std::path::Path;

use editgrid_core::{ColumnDef, Row};

use crate::coerce::to_edit_string;
use crate::error::ExportError;
use crate::rows::normalize_indices;

/// Header label for a column; the id stands in for an empty header.
fn header_label(column: &ColumnDef) -> &str {
    if column.header.is_empty() {
        &column.id
    } else {
        &column.header
    }
}

/// Render the rows at `indices` (ascending, deduplicated, out-of-range
/// dropped) as delimited text: one header record of column labels, then one
/// record per row in raw edit-string form.
pub fn rows_to_delimited(
    rows: &[Row],
    columns: &[ColumnDef],
    indices: &[usize],
    delimiter: u8,
) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(columns.iter().map(header_label))?;
    for index in normalize_indices(indices, rows.len()) {
        let row = &rows[index];
        writer.write_record(columns.iter().map(|c| to_edit_string(row.value(c.key()))))?;
    }

    let bytes = writer.into_inner().map_err(|e| ExportError::Io(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Csv(e.to_string()))
}

pub fn export_to_path(
    rows: &[Row],
    columns: &[ColumnDef],
    indices: &[usize],
    delimiter: u8,
    path: &Path,
) -> Result<(), ExportError> {
    let text = rows_to_delimited(rows, columns, indices, delimiter)?;
    fs::write(path, text).map_err(|e| ExportError::Io(e.to_string()))
}
