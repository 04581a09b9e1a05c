//! Core types shared by the grid engine: column definitions, typed cell
//! values, row records, cell coordinates and the selection/editing tracker.

pub mod column;
pub mod coord;
pub mod selection;
pub mod value;

pub use column::{column_index, CellType, ColumnDef, SelectOption, Validator, WidthBounds};
pub use coord::{CellCoord, CellRange};
pub use selection::{EditSession, SelectionTracker};
pub use value::{CellValue, Row};
