//! Event types for host notifications.
//!
//! The grid updates its own state first and notifies second, so a listener
//! that panics or misbehaves cannot leave the grid half-updated.

use editgrid_core::{CellCoord, CellValue};

/// Which way a history step went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryDirection {
    Undo,
    Redo,
}

/// Events emitted by `Grid`.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// A single cell was written through the `cell_changed` entry point.
    CellChanged {
        row: usize,
        column_id: String,
        value: CellValue,
    },
    /// A row produced by the row factory was appended at `index`.
    RowAdded { index: usize },
    /// Rows were removed. Indices use pre-deletion numbering, ascending.
    RowsDeleted { indices: Vec<usize> },
    /// The cell-level selection changed.
    SelectionChanged { cells: Vec<CellCoord> },
    /// The row-level selection changed.
    RowSelectionChanged { rows: Vec<usize> },
    /// A block was copied from these cells.
    Copied { cells: Vec<CellCoord> },
    /// A parsed clipboard block was pasted (raw strings, before coercion).
    Pasted { rows: Vec<Vec<String>> },
    /// Rows were replaced from history.
    HistoryApplied { direction: HistoryDirection },
}

/// Callback type for receiving grid events.
pub type EventCallback = Box<dyn FnMut(&GridEvent)>;

/// Simple event collector for testing.
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Vec<GridEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: GridEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[GridEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Filter to only CellChanged events as `(row, column_id, value)`.
    pub fn cell_changes(&self) -> Vec<(usize, &str, &CellValue)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GridEvent::CellChanged { row, column_id, value } => Some((*row, column_id.as_str(), value)),
                _ => None,
            })
            .collect()
    }

    /// Filter to only RowsDeleted events.
    pub fn rows_deleted(&self) -> Vec<&[usize]> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GridEvent::RowsDeleted { indices } => Some(indices.as_slice()),
                _ => None,
            })
            .collect()
    }

    /// Filter to only Pasted events.
    pub fn pastes(&self) -> Vec<&[Vec<String>]> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GridEvent::Pasted { rows } => Some(rows.as_slice()),
                _ => None,
            })
            .collect()
    }

    pub fn count_where(&self, pred: impl Fn(&GridEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}
