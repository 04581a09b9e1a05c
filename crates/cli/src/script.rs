// Script replay for `egrid apply`
//
// A script is a JSON array of steps, each tagged by "op":
//   [{"op": "double_activate", "row": 0, "column": "qty"},
//    {"op": "input", "row": 0, "column": "qty", "text": "12"},
//    {"op": "key", "key": "Tab"}]

use editgrid_engine::{CellCoord, CellInput, Grid, Key, KeyInput, Modifiers};
use log::debug;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Select { row: usize, column: String },
    Extend { row: usize, column: String },
    Activate { row: usize, column: String },
    DoubleActivate { row: usize, column: String },
    Input { row: usize, column: String, text: String },
    Commit { row: usize, column: String },
    Cancel { row: usize, column: String },
    Blur { row: usize, column: String },
    Toggle { row: usize, column: String },
    Choose { row: usize, column: String, value: String },
    /// A chord like "Enter", "ctrl+c" or "cmd+shift+z".
    Key { key: String },
    AddRow,
    /// Mark rows as selected (row-level selection).
    SelectRows { rows: Vec<usize> },
    /// Delete the given rows, or the row selection when omitted.
    DeleteRows {
        #[serde(default)]
        rows: Option<Vec<usize>>,
    },
    Copy,
    Paste,
    Undo,
    Redo,
}

/// Parse a key chord. Modifier names are case-insensitive; the final
/// segment is the key.
pub fn parse_key(chord: &str) -> Result<KeyInput, String> {
    let mut modifiers = Modifiers::default();
    let parts: Vec<&str> = chord.split('+').map(str::trim).collect();
    let Some((key_name, mods)) = parts.split_last() else {
        return Err("empty key".to_string());
    };

    for m in mods {
        match m.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => modifiers.ctrl = true,
            "cmd" | "meta" | "super" => modifiers.meta = true,
            "shift" => modifiers.shift = true,
            "alt" | "option" => modifiers.alt = true,
            other => return Err(format!("unknown modifier '{other}' in '{chord}'")),
        }
    }

    let key = match key_name.to_ascii_lowercase().as_str() {
        "enter" | "return" => Key::Enter,
        "tab" => Key::Tab,
        "escape" | "esc" => Key::Escape,
        "delete" | "del" => Key::Delete,
        "backspace" => Key::Backspace,
        "up" | "arrowup" => Key::ArrowUp,
        "down" | "arrowdown" => Key::ArrowDown,
        "left" | "arrowleft" => Key::ArrowLeft,
        "right" | "arrowright" => Key::ArrowRight,
        "f2" => Key::F2,
        _ => {
            let mut chars = key_name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c),
                _ => return Err(format!("unknown key '{key_name}' in '{chord}'")),
            }
        }
    };

    Ok(KeyInput::new(key, modifiers))
}

/// Run every step against `grid`. Steps that the grid refuses are no-ops,
/// as they would be interactively; only malformed key chords fail.
pub fn run(grid: &mut Grid, steps: &[Step]) -> Result<(), String> {
    for (i, step) in steps.iter().enumerate() {
        let applied = run_step(grid, step)?;
        debug!("step {i}: {step:?} -> {applied}");
    }
    Ok(())
}

fn cell(grid: &mut Grid, row: usize, column: &str, input: CellInput) -> bool {
    grid.handle_cell_input(&CellCoord::new(row, column), input)
}

fn run_step(grid: &mut Grid, step: &Step) -> Result<bool, String> {
    let applied = match step {
        Step::Select { row, column } => grid.select_cell(CellCoord::new(*row, column.as_str())),
        Step::Extend { row, column } => grid.extend_selection(CellCoord::new(*row, column.as_str())),
        Step::Activate { row, column } => cell(grid, *row, column, CellInput::Activate),
        Step::DoubleActivate { row, column } => cell(grid, *row, column, CellInput::DoubleActivate),
        Step::Input { row, column, text } => cell(grid, *row, column, CellInput::Input(text.clone())),
        Step::Commit { row, column } => cell(grid, *row, column, CellInput::Commit),
        Step::Cancel { row, column } => cell(grid, *row, column, CellInput::Cancel),
        Step::Blur { row, column } => cell(grid, *row, column, CellInput::Blur),
        Step::Toggle { row, column } => cell(grid, *row, column, CellInput::Toggle),
        Step::Choose { row, column, value } => cell(grid, *row, column, CellInput::Choose(value.clone())),
        Step::Key { key } => grid.handle_key(&parse_key(key)?),
        Step::AddRow => grid.add_row().is_some(),
        Step::SelectRows { rows } => rows
            .iter()
            .fold(false, |any, &row| grid.toggle_row_selection(row, true) || any),
        Step::DeleteRows { rows: Some(rows) } => grid.delete_rows(rows),
        Step::DeleteRows { rows: None } => grid.delete_selected_rows(),
        Step::Copy => grid.copy(),
        Step::Paste => grid.paste(),
        Step::Undo => grid.undo(),
        Step::Redo => grid.redo(),
    };
    Ok(applied)
}
