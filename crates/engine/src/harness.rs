//! Test harness for grid operations with event tracking.
//!
//! `GridHarness` wraps a `Grid` whose listener feeds a shared
//! `EventCollector` and whose clipboard backend is a `MemoryClipboard` the
//! test keeps a handle to.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use editgrid_config::GridSettings;
use editgrid_core::{CellCoord, CellValue, ColumnDef, Row};

use crate::cell::CellInput;
use crate::clipboard::MemoryClipboard;
use crate::events::EventCollector;
use crate::grid::Grid;

pub struct GridHarness {
    pub grid: Grid,
    pub clipboard: MemoryClipboard,
    events: Rc<RefCell<EventCollector>>,
}

impl GridHarness {
    pub fn new(rows: Vec<Row>, columns: Vec<ColumnDef>) -> Self {
        Self::wrap(Grid::new(rows, columns))
    }

    pub fn with_settings(rows: Vec<Row>, columns: Vec<ColumnDef>, settings: GridSettings) -> Self {
        Self::wrap(Grid::new(rows, columns).with_settings(settings))
    }

    /// Attach event collection and a shared clipboard to an existing grid.
    pub fn wrap(grid: Grid) -> Self {
        let events = Rc::new(RefCell::new(EventCollector::new()));
        let clipboard = MemoryClipboard::new();
        let sink = Rc::clone(&events);
        let grid = grid
            .with_clipboard(clipboard.clone())
            .on_event(move |e| sink.borrow_mut().push(e.clone()));
        Self { grid, clipboard, events }
    }

    pub fn events(&self) -> Ref<'_, EventCollector> {
        self.events.borrow()
    }

    pub fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }

    /// Current value at `(row, column_id)`, `Empty` when out of range.
    pub fn value(&self, row: usize, column_id: &str) -> CellValue {
        self.grid
            .value(&CellCoord::new(row, column_id))
            .cloned()
            .unwrap_or_default()
    }

    /// Double-activate a cell, type `text`, and commit with Enter/Tab.
    pub fn type_into(&mut self, row: usize, column_id: &str, text: &str) {
        let coord = CellCoord::new(row, column_id);
        self.grid.handle_cell_input(&coord, CellInput::DoubleActivate);
        self.grid.handle_cell_input(&coord, CellInput::Input(text.to_string()));
        self.grid.handle_cell_input(&coord, CellInput::Commit);
    }
}
