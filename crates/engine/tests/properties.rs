// Property-based tests for history, paste and viewport invariants.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;

use editgrid_engine::viewport::{layout, visible_window, ViewportMetrics};
use editgrid_engine::{CellCoord, CellType, CellValue, ColumnDef, Grid, Row};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const COLUMN_IDS: [&str; 4] = ["name", "qty", "done", "id"];

fn columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("name", "Name", CellType::Text),
        ColumnDef::new("qty", "Qty", CellType::Number),
        ColumnDef::new("done", "Done", CellType::Checkbox),
        ColumnDef::new("id", "ID", CellType::Readonly),
    ]
}

fn rows(n: usize) -> Vec<Row> {
    (0..n)
        .map(|i| {
            Row::new()
                .with("name", CellValue::text(format!("row {i}")))
                .with("qty", CellValue::Number(i as f64 * 10.0))
                .with("done", CellValue::Bool(i % 2 == 0))
                .with("id", CellValue::text(format!("#{i}")))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Clipboard-ish cell text: numbers, words, booleans, blanks.
fn arb_cell_text() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => r"-?[0-9]{1,5}(\.[0-9]{1,2})?",
        2 => r"[a-zA-Z ]{0,10}",
        1 => prop_oneof![Just("true".to_string()), Just("FALSE".to_string())],
        1 => Just(String::new()),
    ]
}

fn arb_block(max_rows: usize, max_cols: usize) -> impl Strategy<Value = Vec<Vec<String>>> {
    (1..=max_cols).prop_flat_map(move |cols| {
        prop::collection::vec(prop::collection::vec(arb_cell_text(), cols), 1..=max_rows)
    })
}

#[derive(Debug, Clone)]
enum Op {
    Edit { row: usize, col: usize, text: String },
    Paste { row: usize, col: usize, block: Vec<Vec<String>> },
    AddRow,
    Delete { indices: Vec<usize> },
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..6usize, 0..3usize, arb_cell_text())
            .prop_map(|(row, col, text)| Op::Edit { row, col, text }),
        2 => (0..6usize, 0..4usize, arb_block(3, 3))
            .prop_map(|(row, col, block)| Op::Paste { row, col, block }),
        1 => Just(Op::AddRow),
        1 => prop::collection::vec(0..6usize, 1..3).prop_map(|indices| Op::Delete { indices }),
    ]
}

fn serialize(block: &[Vec<String>]) -> String {
    block
        .iter()
        .map(|r| r.join("\t"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Apply an op; true if it mutated the grid (and so pushed one snapshot).
fn apply(grid: &mut Grid, op: &Op) -> bool {
    match op {
        Op::Edit { row, col, text } => {
            let coord = CellCoord::new(*row, COLUMN_IDS[*col]);
            if !grid.begin_edit(coord) {
                return false;
            }
            grid.update_draft(text.clone());
            grid.end_edit().is_some() && grid.history().undo_len() > 0
        }
        Op::Paste { row, col, block } => {
            if !grid.select_cell(CellCoord::new(*row, COLUMN_IDS[*col])) {
                return false;
            }
            grid.paste_text(&serialize(block))
        }
        Op::AddRow => grid.add_row().is_some(),
        Op::Delete { indices } => grid.delete_rows(indices),
    }
}

// ---------------------------------------------------------------------------
// Undo / redo symmetry
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn prop_undo_redo_symmetry(ops in prop::collection::vec(arb_op(), 1..=20)) {
        let initial = rows(4);
        let mut grid = Grid::new(initial.clone(), columns());

        let mut applied = 0;
        for op in &ops {
            let before = grid.history().undo_len();
            if apply(&mut grid, op) && grid.history().undo_len() > before {
                applied += 1;
            }
        }
        prop_assert_eq!(grid.history().undo_len(), applied);
        let final_rows = grid.rows().to_vec();

        for _ in 0..applied {
            prop_assert!(grid.undo());
        }
        prop_assert_eq!(grid.rows(), initial.as_slice());
        prop_assert!(!grid.undo());

        for _ in 0..applied {
            prop_assert!(grid.redo());
        }
        prop_assert_eq!(grid.rows(), final_rows.as_slice());
        prop_assert!(!grid.redo());
    }
}

// ---------------------------------------------------------------------------
// Paste bounds
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn prop_paste_never_grows_grid(
        row_count in 1..6usize,
        anchor_row in 0..6usize,
        anchor_col in 0..4usize,
        block in arb_block(8, 6),
    ) {
        let initial = rows(row_count);
        let mut grid = Grid::new(initial.clone(), columns());
        let selected = grid.select_cell(CellCoord::new(anchor_row, COLUMN_IDS[anchor_col]));
        prop_assert_eq!(selected, anchor_row < row_count);

        grid.paste_text(&serialize(&block));

        prop_assert_eq!(grid.rows().len(), row_count);
        for (r, (after, before)) in grid.rows().iter().zip(&initial).enumerate() {
            // No new keys appear in any row
            prop_assert_eq!(after.len(), before.len());
            // Readonly never changes
            prop_assert_eq!(after.value("id"), before.value("id"));
            for (c, id) in COLUMN_IDS.iter().enumerate() {
                let in_block = selected
                    && r >= anchor_row
                    && r < anchor_row + block.len()
                    && c >= anchor_col
                    && c < anchor_col + block[r - anchor_row].len();
                if !in_block {
                    prop_assert_eq!(after.value(id), before.value(id));
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Virtualization
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn prop_small_dataset_renders_identically(
        total in 0..40usize,
        row_height in 8.0f32..64.0,
        slack in 1.0f32..400.0,
        header in 0.0f32..60.0,
    ) {
        let viewport = total as f32 * row_height + slack;
        let m = ViewportMetrics::new(total, row_height, viewport).with_header(header);
        let virtualized = layout(&m, true);
        let full = layout(&m, false);
        prop_assert_eq!(virtualized.rows.len(), total);
        prop_assert_eq!(virtualized, full);
    }

    #[test]
    fn prop_window_covers_viewport(
        total in 1..5000usize,
        row_height in 8.0f32..64.0,
        viewport in 0.0f32..2000.0,
        scroll_frac in 0.0f32..1.0,
        overscan in 0..10usize,
    ) {
        let scroll = scroll_frac * total as f32 * row_height;
        let m = ViewportMetrics::new(total, row_height, viewport)
            .with_scroll(scroll)
            .with_overscan(overscan);
        let w = visible_window(&m).unwrap();
        prop_assert!(w.start <= w.end);
        prop_assert!(w.end < total);

        let first_visible = ((scroll / row_height).floor() as usize).min(total - 1);
        prop_assert!(w.contains(first_visible));
        prop_assert_eq!(w.start, first_visible.saturating_sub(overscan));

        let l = layout(&m, true);
        for p in &l.rows {
            prop_assert_eq!(p.top, p.index as f32 * row_height);
        }
        prop_assert_eq!(l.spacer_height, total as f32 * row_height);
    }
}
