pub mod cell;
pub mod clipboard;
pub mod coerce;
pub mod error;
pub mod events;
pub mod export;
pub mod grid;
pub mod history;
pub mod keymap;
pub mod load;
pub mod rows;
pub mod viewport;

#[cfg(test)]
pub mod harness;

pub use editgrid_config::GridSettings;
pub use editgrid_core::{CellCoord, CellType, CellValue, ColumnDef, Row, SelectOption};

pub use cell::{CellEffect, CellInput, CellMode, CellPresentation, CellUnit, EditorKind};
pub use clipboard::{ClipboardBackend, MemoryClipboard};
pub use error::{ClipboardError, ExportError, LoadError};
pub use events::{EventCallback, EventCollector, GridEvent, HistoryDirection};
pub use grid::{Grid, RowFactory};
pub use keymap::{GridCommand, Key, KeyInput, Modifiers};
pub use viewport::{RowPlacement, RowWindow, ViewportLayout, ViewportMetrics};
