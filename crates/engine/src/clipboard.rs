//! Clipboard bridge.
//!
//! This module contains:
//! - `ClipboardBackend`, the seam to the system clipboard, with an in-memory
//!   implementation (and an `arboard` one behind `system-clipboard`)
//! - The wire format: tab-separated columns, newline-separated rows
//! - Copy block construction from a cell selection
//! - Paste planning: mapping a parsed block onto grid coordinates
//!
//! The grid drives these; failures reaching the clipboard are logged there and
//! never surface to the caller.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use editgrid_core::{column_index, CellCoord, CellValue, ColumnDef, Row};
use log::debug;

use crate::coerce::{coerce_for_column, to_edit_string};
use crate::error::ClipboardError;

/// Access to a text clipboard.
pub trait ClipboardBackend {
    fn read_text(&mut self) -> Result<String, ClipboardError>;
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Process-local clipboard. Clones share contents, so a host (or a test) can
/// keep a handle while the grid owns another.
#[derive(Debug, Clone)]
pub struct MemoryClipboard {
    contents: Rc<RefCell<Option<String>>>,
    available: bool,
}

impl Default for MemoryClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self {
            contents: Rc::new(RefCell::new(None)),
            available: true,
        }
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let clipboard = Self::new();
        clipboard.set(text);
        clipboard
    }

    /// A clipboard that refuses every access, like a browser without permission.
    pub fn unavailable() -> Self {
        Self {
            contents: Rc::new(RefCell::new(None)),
            available: false,
        }
    }

    pub fn get(&self) -> Option<String> {
        self.contents.borrow().clone()
    }

    pub fn set(&self, text: impl Into<String>) {
        *self.contents.borrow_mut() = Some(text.into());
    }
}

impl ClipboardBackend for MemoryClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        if !self.available {
            return Err(ClipboardError::PermissionDenied);
        }
        Ok(self.contents.borrow().clone().unwrap_or_default())
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if !self.available {
            return Err(ClipboardError::PermissionDenied);
        }
        self.set(text);
        Ok(())
    }
}

/// The operating system clipboard.
#[cfg(feature = "system-clipboard")]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        arboard::Clipboard::new()
            .map(|inner| Self { inner })
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))
    }
}

#[cfg(feature = "system-clipboard")]
impl ClipboardBackend for SystemClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        self.inner
            .get_text()
            .map_err(|e| ClipboardError::Read(e.to_string()))
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.inner
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }
}

// ============================================================================
// Wire format
// ============================================================================

/// Join a 2-D block: tabs between columns, newlines between rows.
pub fn serialize_block(block: &[Vec<String>]) -> String {
    block
        .iter()
        .map(|row| row.join("\t"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split clipboard text into rows and columns. CRLF line endings are accepted
/// and a single trailing line break (as spreadsheet applications append) is
/// dropped. Empty text yields an empty block.
pub fn parse_block(text: &str) -> Vec<Vec<String>> {
    let text = text
        .strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text);
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n')
        .map(|line| {
            line.strip_suffix('\r')
                .unwrap_or(line)
                .split('\t')
                .map(str::to_string)
                .collect()
        })
        .collect()
}

// ============================================================================
// Copy
// ============================================================================

/// A copied block plus where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CopyBlock {
    pub row_indices: Vec<usize>,
    pub column_ids: Vec<String>,
    pub cells: Vec<Vec<String>>,
}

impl CopyBlock {
    pub fn to_text(&self) -> String {
        serialize_block(&self.cells)
    }
}

/// Build the logical rectangle for a selection: the distinct row indices
/// (ascending) crossed with the distinct column ids (in column-list order).
/// A sparse selection therefore copies cells that were never selected.
pub fn copy_block(rows: &[Row], columns: &[ColumnDef], selection: &[CellCoord]) -> Option<CopyBlock> {
    let row_indices: Vec<usize> = selection
        .iter()
        .map(|c| c.row)
        .filter(|r| *r < rows.len())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let col_positions: BTreeSet<usize> = selection
        .iter()
        .filter_map(|c| column_index(columns, &c.column))
        .collect();
    if row_indices.is_empty() || col_positions.is_empty() {
        return None;
    }

    let cells = row_indices
        .iter()
        .map(|&r| {
            col_positions
                .iter()
                .map(|&c| to_edit_string(rows[r].value(columns[c].key())))
                .collect()
        })
        .collect();

    Some(CopyBlock {
        row_indices,
        column_ids: col_positions.iter().map(|&c| columns[c].id.clone()).collect(),
        cells,
    })
}

// ============================================================================
// Paste
// ============================================================================

/// Top-left target of a paste: the smallest selected row and the leftmost
/// selected column.
pub fn paste_anchor(selection: &[CellCoord], columns: &[ColumnDef]) -> Option<(usize, usize)> {
    let row = selection.iter().map(|c| c.row).min()?;
    let col = selection
        .iter()
        .filter_map(|c| column_index(columns, &c.column))
        .min()?;
    Some((row, col))
}

/// One cell a paste will write.
#[derive(Debug, Clone, PartialEq)]
pub struct PasteWrite {
    pub row: usize,
    pub column: usize,
    pub value: CellValue,
}

/// Map a parsed block onto the grid from `anchor`. Cells past the last row or
/// column, and cells in non-editable columns, are dropped: paste never
/// creates rows or columns.
pub fn plan_paste(
    block: &[Vec<String>],
    anchor: (usize, usize),
    row_count: usize,
    columns: &[ColumnDef],
) -> Vec<PasteWrite> {
    let (anchor_row, anchor_col) = anchor;
    let mut writes = Vec::new();

    for (row_offset, line) in block.iter().enumerate() {
        let row = anchor_row + row_offset;
        if row >= row_count {
            debug!("paste overflow: {} row(s) past the end ignored", block.len() - row_offset);
            break;
        }
        for (col_offset, text) in line.iter().enumerate() {
            let column = anchor_col + col_offset;
            let Some(def) = columns.get(column) else {
                debug!("paste overflow: column offset {col_offset} past the last column");
                break;
            };
            if !def.is_editable() {
                continue;
            }
            writes.push(PasteWrite {
                row,
                column,
                value: coerce_for_column(text, def),
            });
        }
    }

    writes
}
