use std::fmt;

use serde::{Deserialize, Serialize};

/// Address of one grid cell. Valid only while `row` is below the current
/// row count and `column` names a known column; coordinates are positional
/// and are not rebased when rows are inserted or removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: usize,
    pub column: String,
}

impl CellCoord {
    pub fn new(row: usize, column: impl Into<String>) -> Self {
        Self {
            row,
            column: column.into(),
        }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// A rectangular block of cells by row and column position, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl CellRange {
    /// Create a new range, normalizing so start <= end.
    pub fn new(r1: usize, c1: usize, r2: usize, c2: usize) -> Self {
        Self {
            start_row: r1.min(r2),
            start_col: c1.min(c2),
            end_row: r1.max(r2),
            end_col: c1.max(c2),
        }
    }

    pub fn single(row: usize, col: usize) -> Self {
        Self::new(row, col, row, col)
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.start_row && row <= self.end_row && col >= self.start_col && col <= self.end_col
    }

    pub fn rows(&self) -> usize {
        self.end_row - self.start_row + 1
    }

    pub fn cols(&self) -> usize {
        self.end_col - self.start_col + 1
    }

    pub fn cell_count(&self) -> usize {
        self.rows() * self.cols()
    }

    /// Iterate over all positions in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let (start_col, end_col) = (self.start_col, self.end_col);
        (self.start_row..=self.end_row).flat_map(move |r| (start_col..=end_col).map(move |c| (r, c)))
    }

    pub fn is_single(&self) -> bool {
        self.start_row == self.end_row && self.start_col == self.end_col
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_normalizes() {
        let r = CellRange::new(4, 3, 1, 0);
        assert_eq!((r.start_row, r.start_col, r.end_row, r.end_col), (1, 0, 4, 3));
        assert_eq!(r.cell_count(), 16);
    }

    #[test]
    fn test_range_cells_row_major() {
        let r = CellRange::new(0, 0, 1, 1);
        let cells: Vec<_> = r.cells().collect();
        assert_eq!(cells, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert!(r.contains(1, 1));
        assert!(!r.contains(2, 0));
    }

    #[test]
    fn test_coords_order_by_row_then_column() {
        let mut coords = vec![
            CellCoord::new(2, "a"),
            CellCoord::new(0, "b"),
            CellCoord::new(0, "a"),
        ];
        coords.sort();
        assert_eq!(coords[0], CellCoord::new(0, "a"));
        assert_eq!(coords[2], CellCoord::new(2, "a"));
        assert_eq!(coords[1].to_string(), "(0, b)");
    }
}
