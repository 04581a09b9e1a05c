//! Selection & editing tracker.
//!
//! Holds the cell-level selection, the single in-edit cell and the row-level
//! selection. The two selections are independent: row selection is driven by
//! a checkbox column and feeds bulk delete/export, cell selection is driven by
//! pointer and keyboard navigation and feeds copy/paste.
//!
//! The tracker only arbitrates *whether* a cell may enter edit mode. Committing
//! the previous edit is the grid's job; it must call [`SelectionTracker::end_edit`]
//! before starting a new one so that at most one cell is ever in edit.

use std::collections::BTreeSet;

use log::debug;

use crate::column::{column_index, ColumnDef};
use crate::coord::{CellCoord, CellRange};

/// The cell currently in edit plus any uncommitted text typed into its editor.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub coord: CellCoord,
    /// `None` until the edit primitive reports input.
    pub draft: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    /// Selected cells in selection order, without duplicates.
    selected: Vec<CellCoord>,
    /// Fixed corner for rectangle extension.
    anchor: Option<CellCoord>,
    /// Moving corner for rectangle extension.
    focus: Option<CellCoord>,
    editing: Option<EditSession>,
    selected_rows: BTreeSet<usize>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // === Cell selection ===

    pub fn selected_cells(&self) -> &[CellCoord] {
        &self.selected
    }

    pub fn anchor(&self) -> Option<&CellCoord> {
        self.anchor.as_ref()
    }

    pub fn is_selected(&self, coord: &CellCoord) -> bool {
        self.selected.contains(coord)
    }

    /// True if `coord` is the one and only selected cell.
    pub fn is_sole_selection(&self, coord: &CellCoord) -> bool {
        self.selected.len() == 1 && self.selected[0] == *coord
    }

    /// Replace the selection with a single cell (click).
    pub fn select_cell(&mut self, coord: CellCoord) {
        self.selected = vec![coord.clone()];
        self.anchor = Some(coord.clone());
        self.focus = Some(coord);
    }

    /// Select the rectangle between the anchor and `coord`, in column-list
    /// order (shift+click / shift+arrow). Without an anchor this is a plain
    /// `select_cell`.
    pub fn extend_to(&mut self, coord: CellCoord, columns: &[ColumnDef]) {
        let anchor = match &self.anchor {
            Some(a) => a.clone(),
            None => return self.select_cell(coord),
        };
        let (Some(anchor_col), Some(focus_col)) = (
            column_index(columns, &anchor.column),
            column_index(columns, &coord.column),
        ) else {
            return self.select_cell(coord);
        };

        let range = CellRange::new(anchor.row, anchor_col, coord.row, focus_col);
        self.selected = range
            .cells()
            .map(|(row, col)| CellCoord::new(row, columns[col].id.clone()))
            .collect();
        self.focus = Some(coord);
    }

    /// Move the single selection by a delta from the anchor, clamped to the
    /// grid. Collapses any rectangle. Returns the new selected cell.
    pub fn move_by(
        &mut self,
        d_row: isize,
        d_col: isize,
        row_count: usize,
        columns: &[ColumnDef],
    ) -> Option<CellCoord> {
        if row_count == 0 || columns.is_empty() {
            return None;
        }
        let (row, col) = match &self.anchor {
            Some(a) => (a.row, column_index(columns, &a.column).unwrap_or(0)),
            None => (0, 0),
        };
        let new_row = (row as isize + d_row).clamp(0, row_count as isize - 1) as usize;
        let new_col = (col as isize + d_col).clamp(0, columns.len() as isize - 1) as usize;
        let coord = CellCoord::new(new_row, columns[new_col].id.clone());
        self.select_cell(coord.clone());
        Some(coord)
    }

    /// Grow the rectangle by moving its far corner (the focus) by a delta.
    pub fn extend_by(
        &mut self,
        d_row: isize,
        d_col: isize,
        row_count: usize,
        columns: &[ColumnDef],
    ) -> Option<CellCoord> {
        if row_count == 0 || columns.is_empty() {
            return None;
        }
        let focus = self.focus.clone()?;
        let col = column_index(columns, &focus.column).unwrap_or(0);
        let new_row = (focus.row as isize + d_row).clamp(0, row_count as isize - 1) as usize;
        let new_col = (col as isize + d_col).clamp(0, columns.len() as isize - 1) as usize;
        let coord = CellCoord::new(new_row, columns[new_col].id.clone());
        self.extend_to(coord.clone(), columns);
        Some(coord)
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
        self.anchor = None;
        self.focus = None;
    }

    // === Editing ===

    pub fn editing(&self) -> Option<&CellCoord> {
        self.editing.as_ref().map(|s| &s.coord)
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self, coord: &CellCoord) -> bool {
        self.editing().is_some_and(|c| c == coord)
    }

    /// Whether a cell in `column` may enter edit mode at all.
    pub fn can_edit(column: &ColumnDef, editing_enabled: bool) -> bool {
        editing_enabled && column.is_editable()
    }

    /// Put `coord` into edit mode. Refused (returns false) when grid editing
    /// is disabled or the column is not editable.
    pub fn start_edit(&mut self, coord: CellCoord, column: &ColumnDef, editing_enabled: bool) -> bool {
        if !Self::can_edit(column, editing_enabled) {
            debug!("edit refused at {coord}: column '{}' is not editable", column.id);
            return false;
        }
        self.editing = Some(EditSession { coord, draft: None });
        true
    }

    /// Record text typed into the active editor. No-op when nothing is in edit.
    pub fn set_draft(&mut self, text: impl Into<String>) -> bool {
        match self.editing.as_mut() {
            Some(session) => {
                session.draft = Some(text.into());
                true
            }
            None => false,
        }
    }

    /// Leave edit mode, handing back the session so the caller can commit its draft.
    pub fn end_edit(&mut self) -> Option<EditSession> {
        self.editing.take()
    }

    // === Row selection ===

    pub fn selected_rows(&self) -> &BTreeSet<usize> {
        &self.selected_rows
    }

    pub fn is_row_selected(&self, row: usize) -> bool {
        self.selected_rows.contains(&row)
    }

    pub fn toggle_row_selection(&mut self, row: usize, selected: bool) {
        if selected {
            self.selected_rows.insert(row);
        } else {
            self.selected_rows.remove(&row);
        }
    }

    pub fn select_all_rows(&mut self, selected: bool, row_count: usize) {
        if selected {
            self.selected_rows = (0..row_count).collect();
        } else {
            self.selected_rows.clear();
        }
    }

    pub fn clear_row_selection(&mut self) {
        self.selected_rows.clear();
    }
}
