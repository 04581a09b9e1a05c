//! The grid: rows, columns and every piece of interaction state in one
//! explicit struct.
//!
//! Each public operation is a guarded transition. Out-of-range coordinates,
//! disabled features and empty stacks make an operation a no-op that returns
//! `false` (or `None`); nothing here panics or returns an error to the caller.
//! State is always updated before the listener is notified.

use editgrid_config::GridSettings;
use editgrid_core::{column_index, CellCoord, CellType, CellValue, ColumnDef, Row, SelectionTracker};
use log::{debug, warn};

use crate::cell::{CellEffect, CellInput, CellPresentation, CellUnit};
use crate::clipboard::{copy_block, paste_anchor, parse_block, plan_paste, ClipboardBackend, MemoryClipboard};
use crate::coerce::coerce_for_column;
use crate::error::ExportError;
use crate::events::{EventCallback, GridEvent, HistoryDirection};
use crate::export::rows_to_delimited;
use crate::history::History;
use crate::keymap::{resolve, GridCommand, KeyInput};
use crate::rows::{normalize_indices, remove_rows};
use crate::viewport::{layout, ViewportLayout, ViewportMetrics};

/// Produces the record appended by [`Grid::add_row`].
pub type RowFactory = Box<dyn FnMut() -> Row>;

pub struct Grid {
    rows: Vec<Row>,
    columns: Vec<ColumnDef>,
    settings: GridSettings,
    tracker: SelectionTracker,
    history: History,
    /// Last copied block. Only gates the paste affordance; paste itself
    /// always re-reads the clipboard backend.
    clipboard_buffer: Option<Vec<Vec<String>>>,
    clipboard: Box<dyn ClipboardBackend>,
    listener: Option<EventCallback>,
    row_factory: Option<RowFactory>,
    focused: bool,
}

impl Grid {
    pub fn new(rows: Vec<Row>, columns: Vec<ColumnDef>) -> Self {
        let settings = GridSettings::default();
        Self {
            rows,
            columns,
            history: History::new(settings.history_depth),
            settings,
            tracker: SelectionTracker::new(),
            clipboard_buffer: None,
            clipboard: Box::new(MemoryClipboard::new()),
            listener: None,
            row_factory: None,
            focused: false,
        }
    }

    /// Replace the settings. Resets history, since its depth comes from them.
    pub fn with_settings(mut self, settings: GridSettings) -> Self {
        self.history = History::new(settings.history_depth);
        self.settings = settings;
        self
    }

    pub fn with_clipboard(mut self, clipboard: impl ClipboardBackend + 'static) -> Self {
        self.clipboard = Box::new(clipboard);
        self
    }

    pub fn on_event(mut self, listener: impl FnMut(&GridEvent) + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn with_row_factory(mut self, factory: impl FnMut() -> Row + 'static) -> Self {
        self.row_factory = Some(Box::new(factory));
        self
    }

    fn emit(&mut self, event: GridEvent) {
        if let Some(listener) = self.listener.as_mut() {
            listener(&event);
        }
    }

    fn snapshot(&mut self) {
        if self.settings.undo {
            self.history.snapshot(&self.rows);
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.tracker
    }

    pub fn selected_cells(&self) -> &[CellCoord] {
        self.tracker.selected_cells()
    }

    pub fn editing(&self) -> Option<&CellCoord> {
        self.tracker.editing()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn clipboard_buffer(&self) -> Option<&[Vec<String>]> {
        self.clipboard_buffer.as_deref()
    }

    /// Whether to show a paste affordance. The system clipboard may hold
    /// something else by the time paste runs.
    pub fn can_paste(&self) -> bool {
        self.settings.paste && self.clipboard_buffer.is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.settings.undo && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.settings.undo && self.history.can_redo()
    }

    pub fn column(&self, id: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn value(&self, coord: &CellCoord) -> Option<&CellValue> {
        let column = self.column(&coord.column)?;
        self.rows.get(coord.row).map(|row| row.value(column.key()))
    }

    fn is_valid(&self, coord: &CellCoord) -> bool {
        coord.row < self.rows.len() && column_index(&self.columns, &coord.column).is_some()
    }

    /// Take the host's row array as authoritative. Positional selection and
    /// edit state are kept; coordinates that no longer exist are ignored by
    /// later operations.
    pub fn resync(&mut self, rows: Vec<Row>) {
        debug!("resync: {} -> {} rows", self.rows.len(), rows.len());
        self.rows = rows;
    }

    // ========================================================================
    // Cell selection
    // ========================================================================

    fn emit_selection(&mut self) {
        let cells = self.tracker.selected_cells().to_vec();
        self.emit(GridEvent::SelectionChanged { cells });
    }

    /// Select a single cell. Selecting away from a cell in edit commits it.
    pub fn select_cell(&mut self, coord: CellCoord) -> bool {
        if !self.settings.selection || !self.is_valid(&coord) {
            return false;
        }
        if self.tracker.editing().is_some_and(|c| *c != coord) {
            self.end_edit();
        }
        self.tracker.select_cell(coord);
        self.emit_selection();
        true
    }

    /// Select the rectangle from the anchor to `coord`.
    pub fn extend_selection(&mut self, coord: CellCoord) -> bool {
        if !self.settings.selection || !self.is_valid(&coord) {
            return false;
        }
        if self.tracker.editing().is_some() {
            self.end_edit();
        }
        self.tracker.extend_to(coord, &self.columns);
        self.emit_selection();
        true
    }

    pub fn move_selection(&mut self, d_row: isize, d_col: isize) -> bool {
        if !self.settings.selection {
            return false;
        }
        if self.tracker.move_by(d_row, d_col, self.rows.len(), &self.columns).is_none() {
            return false;
        }
        self.emit_selection();
        true
    }

    pub fn extend_selection_by(&mut self, d_row: isize, d_col: isize) -> bool {
        if !self.settings.selection {
            return false;
        }
        if self.tracker.extend_by(d_row, d_col, self.rows.len(), &self.columns).is_none() {
            return false;
        }
        self.emit_selection();
        true
    }

    pub fn clear_selection(&mut self) {
        self.tracker.clear_selection();
        self.emit_selection();
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Put `coord` into edit mode, committing whatever cell was in edit before.
    /// Checkbox and non-editable cells are refused.
    pub fn begin_edit(&mut self, coord: CellCoord) -> bool {
        if !self.is_valid(&coord) {
            return false;
        }
        if self.tracker.is_editing(&coord) {
            return true;
        }
        let Some(idx) = column_index(&self.columns, &coord.column) else {
            return false;
        };
        if self.columns[idx].cell_type == CellType::Checkbox
            || !SelectionTracker::can_edit(&self.columns[idx], self.settings.editing)
        {
            debug!("begin_edit refused at {coord}");
            return false;
        }

        self.end_edit();
        self.tracker.start_edit(coord, &self.columns[idx], self.settings.editing)
    }

    /// Replace the draft of the cell in edit.
    pub fn update_draft(&mut self, text: impl Into<String>) -> bool {
        self.tracker.set_draft(text)
    }

    /// Leave edit mode, committing the draft if one was typed. Returns the
    /// cell that was in edit.
    pub fn end_edit(&mut self) -> Option<CellCoord> {
        let session = self.tracker.end_edit()?;
        if let Some(draft) = session.draft {
            if let Some(column) = self.column(&session.coord.column) {
                let value = coerce_for_column(&draft, column);
                self.cell_changed(session.coord.row, &session.coord.column, value);
            }
        }
        Some(session.coord)
    }

    /// Write one cell: snapshot, store, notify. The column's validator is not
    /// consulted; validating committed values is left to the listener.
    pub fn cell_changed(&mut self, row: usize, column_id: &str, value: CellValue) -> bool {
        if row >= self.rows.len() {
            debug!("cell_changed: row {row} out of range");
            return false;
        }
        let Some(idx) = column_index(&self.columns, column_id) else {
            debug!("cell_changed: unknown column '{column_id}'");
            return false;
        };
        if !self.columns[idx].is_editable() {
            return false;
        }

        self.snapshot();
        self.rows[row].set(self.columns[idx].key(), value.clone());
        self.emit(GridEvent::CellChanged {
            row,
            column_id: column_id.to_string(),
            value,
        });
        true
    }

    fn cell_unit_effects(&self, coord: &CellCoord, input: CellInput) -> Option<Vec<CellEffect>> {
        if !self.is_valid(coord) {
            return None;
        }
        let column = self.column(&coord.column)?;
        let value = self.rows[coord.row].value(column.key());
        let session = self.tracker.edit_session().filter(|s| s.coord == *coord);
        let unit = CellUnit::new(column, value)
            .with_selection(self.tracker.is_selected(coord), self.tracker.is_sole_selection(coord))
            .with_session(session)
            .with_editing_enabled(self.settings.editing);
        Some(unit.handle(input))
    }

    /// Feed pointer or editor input to one cell and apply what it asks for.
    /// Returns false when the input had no effect.
    pub fn handle_cell_input(&mut self, coord: &CellCoord, input: CellInput) -> bool {
        let Some(effects) = self.cell_unit_effects(coord, input) else {
            return false;
        };
        if effects.is_empty() {
            return false;
        }
        for effect in effects {
            match effect {
                CellEffect::Select => {
                    self.select_cell(coord.clone());
                }
                CellEffect::StartEdit => {
                    self.begin_edit(coord.clone());
                }
                CellEffect::UpdateDraft(text) => {
                    self.tracker.set_draft(text);
                }
                CellEffect::ValueChanged(value) => {
                    self.cell_changed(coord.row, &coord.column, value);
                }
                // The draft, if any, was committed by the preceding ValueChanged
                CellEffect::EndEdit => {
                    self.tracker.end_edit();
                }
            }
        }
        true
    }

    pub fn present_cell(&self, coord: &CellCoord) -> Option<CellPresentation> {
        if !self.is_valid(coord) {
            return None;
        }
        let column = self.column(&coord.column)?;
        let value = self.rows[coord.row].value(column.key());
        let session = self.tracker.edit_session().filter(|s| s.coord == *coord);
        Some(
            CellUnit::new(column, value)
                .with_selection(self.tracker.is_selected(coord), self.tracker.is_sole_selection(coord))
                .with_session(session)
                .with_editing_enabled(self.settings.editing)
                .present(),
        )
    }

    // ========================================================================
    // Row selection
    // ========================================================================

    fn emit_row_selection(&mut self) {
        let rows = self.tracker.selected_rows().iter().copied().collect();
        self.emit(GridEvent::RowSelectionChanged { rows });
    }

    pub fn toggle_row_selection(&mut self, row: usize, selected: bool) -> bool {
        if row >= self.rows.len() {
            return false;
        }
        self.tracker.toggle_row_selection(row, selected);
        self.emit_row_selection();
        true
    }

    pub fn select_all_rows(&mut self, selected: bool) {
        self.tracker.select_all_rows(selected, self.rows.len());
        self.emit_row_selection();
    }

    // ========================================================================
    // Clipboard
    // ========================================================================

    /// Copy the logical rectangle of the cell selection. Clipboard write
    /// failures are logged; the copy still counts.
    pub fn copy(&mut self) -> bool {
        if !self.settings.copy {
            return false;
        }
        let Some(block) = copy_block(&self.rows, &self.columns, self.tracker.selected_cells()) else {
            debug!("copy with nothing selected");
            return false;
        };

        if let Err(e) = self.clipboard.write_text(&block.to_text()) {
            warn!("copy: {e}");
        }
        self.clipboard_buffer = Some(block.cells);
        let cells = self.tracker.selected_cells().to_vec();
        self.emit(GridEvent::Copied { cells });
        true
    }

    /// Read the clipboard backend and paste at the selection anchor.
    pub fn paste(&mut self) -> bool {
        if !self.settings.paste {
            return false;
        }
        match self.clipboard.read_text() {
            Ok(text) => self.paste_text(&text),
            Err(e) => {
                warn!("paste: {e}");
                false
            }
        }
    }

    /// Paste a tab/newline block at the selection anchor as one undo step.
    /// Overflow past the last row or column is dropped.
    pub fn paste_text(&mut self, text: &str) -> bool {
        if !self.settings.paste {
            return false;
        }
        let block = parse_block(text);
        if block.is_empty() {
            return false;
        }
        let Some(anchor) = paste_anchor(self.tracker.selected_cells(), &self.columns) else {
            debug!("paste with nothing selected");
            return false;
        };
        let writes = plan_paste(&block, anchor, self.rows.len(), &self.columns);
        if writes.is_empty() {
            debug!("paste at {anchor:?} writes no cells");
            return false;
        }

        self.snapshot();
        for write in writes {
            self.rows[write.row].set(self.columns[write.column].key(), write.value);
        }
        self.emit(GridEvent::Pasted { rows: block });
        true
    }

    // ========================================================================
    // History
    // ========================================================================

    pub fn undo(&mut self) -> bool {
        if !self.settings.undo {
            return false;
        }
        let Some(previous) = self.history.undo(&self.rows) else {
            return false;
        };
        self.rows = previous;
        self.emit(GridEvent::HistoryApplied { direction: HistoryDirection::Undo });
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.settings.undo {
            return false;
        }
        let Some(next) = self.history.redo(&self.rows) else {
            return false;
        };
        self.rows = next;
        self.emit(GridEvent::HistoryApplied { direction: HistoryDirection::Redo });
        true
    }

    // ========================================================================
    // Row lifecycle
    // ========================================================================

    /// Append a row from the factory (an empty record without one). Returns
    /// its index. Selection is untouched.
    pub fn add_row(&mut self) -> Option<usize> {
        if !self.settings.row_add {
            return None;
        }
        let row = match self.row_factory.as_mut() {
            Some(factory) => factory(),
            None => Row::new(),
        };
        self.snapshot();
        self.rows.push(row);
        let index = self.rows.len() - 1;
        self.emit(GridEvent::RowAdded { index });
        Some(index)
    }

    /// Remove the rows at `indices` (pre-deletion numbering, any order) and
    /// clear the row selection.
    pub fn delete_rows(&mut self, indices: &[usize]) -> bool {
        if !self.settings.row_delete {
            return false;
        }
        let indices = normalize_indices(indices, self.rows.len());
        if indices.is_empty() {
            return false;
        }

        self.snapshot();
        let rows = std::mem::take(&mut self.rows);
        self.rows = remove_rows(rows, &indices);
        self.tracker.clear_row_selection();
        self.emit(GridEvent::RowsDeleted { indices });
        true
    }

    pub fn delete_selected_rows(&mut self) -> bool {
        let indices: Vec<usize> = self.tracker.selected_rows().iter().copied().collect();
        if indices.is_empty() {
            return false;
        }
        self.delete_rows(&indices)
    }

    /// Selected rows as delimited text with a header line.
    pub fn export_selected_rows(&self, delimiter: u8) -> Result<String, ExportError> {
        let indices: Vec<usize> = self.tracker.selected_rows().iter().copied().collect();
        rows_to_delimited(&self.rows, &self.columns, &indices, delimiter)
    }

    // ========================================================================
    // Keyboard
    // ========================================================================

    pub fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn has_focus(&self) -> bool {
        self.focused
    }

    /// Handle a key press at the grid root. Ignored unless the grid has focus.
    pub fn handle_key(&mut self, input: &KeyInput) -> bool {
        if !self.focused {
            return false;
        }
        match resolve(input, self.tracker.editing().is_some()) {
            Some(command) => self.run_command(command),
            None => false,
        }
    }

    pub fn run_command(&mut self, command: GridCommand) -> bool {
        match command {
            GridCommand::Copy => self.copy(),
            GridCommand::Paste => self.paste(),
            GridCommand::Undo => self.undo(),
            GridCommand::Redo => self.redo(),
            GridCommand::DeleteSelectedRows => self.delete_selected_rows(),
            GridCommand::Move { d_row, d_col } => self.move_selection(d_row, d_col),
            GridCommand::Extend { d_row, d_col } => self.extend_selection_by(d_row, d_col),
            GridCommand::BeginEdit => match self.tracker.anchor().cloned() {
                Some(coord) => self.begin_edit(coord),
                None => false,
            },
            GridCommand::CommitEdit | GridCommand::ExitEdit => self.end_edit().is_some(),
        }
    }

    // ========================================================================
    // Viewport
    // ========================================================================

    pub fn viewport_metrics(&self, scroll_top: f32, viewport_height: f32) -> ViewportMetrics {
        ViewportMetrics {
            total_rows: self.rows.len(),
            row_height: self.settings.row_height,
            header_height: self.settings.header_height,
            scroll_top,
            viewport_height,
            overscan: self.settings.overscan,
        }
    }

    /// Height of the scroll container body for the current row count.
    pub fn body_height(&self) -> f32 {
        self.settings.body_height(self.rows.len())
    }

    /// Body layout for a scroll position, virtualized per settings.
    pub fn viewport(&self, scroll_top: f32, viewport_height: f32) -> ViewportLayout {
        layout(
            &self.viewport_metrics(scroll_top, viewport_height),
            self.settings.virtualize_rows,
        )
    }
}
