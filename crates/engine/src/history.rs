//! Undo/Redo history for grid data.
//!
//! Each entry is a full deep copy of the row array taken *before* a mutation.
//! A structurally shared row list could replace the copies behind the same API.

use editgrid_core::Row;
use log::debug;

pub const DEFAULT_DEPTH: usize = 20;

#[derive(Debug, Clone)]
pub struct History {
    undo_stack: Vec<Vec<Row>>,
    redo_stack: Vec<Vec<Row>>,
    max_entries: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}

impl History {
    pub fn new(max_entries: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_entries,
        }
    }

    /// Record the pre-mutation state. Clears the redo stack.
    pub fn snapshot(&mut self, rows: &[Row]) {
        Self::push_bounded(&mut self.undo_stack, rows.to_vec(), self.max_entries);
        self.redo_stack.clear();
    }

    fn push_bounded(stack: &mut Vec<Vec<Row>>, entry: Vec<Row>, max: usize) {
        stack.push(entry);
        // Limit history size
        while stack.len() > max {
            stack.remove(0);
        }
    }

    /// Pop the last snapshot, saving `current` for redo. Returns the rows to restore.
    pub fn undo(&mut self, current: &[Row]) -> Option<Vec<Row>> {
        let Some(previous) = self.undo_stack.pop() else {
            debug!("undo with empty history");
            return None;
        };
        Self::push_bounded(&mut self.redo_stack, current.to_vec(), self.max_entries);
        Some(previous)
    }

    /// Mirror of [`History::undo`].
    pub fn redo(&mut self, current: &[Row]) -> Option<Vec<Row>> {
        let Some(next) = self.redo_stack.pop() else {
            debug!("redo with empty history");
            return None;
        };
        Self::push_bounded(&mut self.undo_stack, current.to_vec(), self.max_entries);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
