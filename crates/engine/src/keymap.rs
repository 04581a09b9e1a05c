//! Keyboard surface.
//!
//! Maps key presses captured at the grid root to grid commands. While a cell
//! is in edit only the commit/exit keys are claimed; every other key belongs
//! to the edit primitive.

/// A key, independent of any windowing toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Escape,
    Delete,
    Backspace,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    F2,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    /// Cmd on macOS.
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        meta: false,
        shift: false,
        alt: false,
    };

    /// Ctrl or Cmd, whichever the platform uses for shortcuts.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    pub fn shift(key: Key) -> Self {
        Self::new(key, Modifiers { shift: true, ..Modifiers::NONE })
    }

    /// Ctrl+`ch`.
    pub fn ctrl(ch: char) -> Self {
        Self::new(Key::Char(ch), Modifiers { ctrl: true, ..Modifiers::NONE })
    }

    /// Cmd+`ch`.
    pub fn cmd(ch: char) -> Self {
        Self::new(Key::Char(ch), Modifiers { meta: true, ..Modifiers::NONE })
    }

    /// Ctrl+Shift+`ch`.
    pub fn ctrl_shift(ch: char) -> Self {
        Self::new(
            Key::Char(ch),
            Modifiers { ctrl: true, shift: true, ..Modifiers::NONE },
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCommand {
    Copy,
    Paste,
    Undo,
    Redo,
    DeleteSelectedRows,
    Move { d_row: isize, d_col: isize },
    Extend { d_row: isize, d_col: isize },
    BeginEdit,
    CommitEdit,
    ExitEdit,
}

fn arrow_delta(key: Key) -> Option<(isize, isize)> {
    match key {
        Key::ArrowUp => Some((-1, 0)),
        Key::ArrowDown => Some((1, 0)),
        Key::ArrowLeft => Some((0, -1)),
        Key::ArrowRight => Some((0, 1)),
        _ => None,
    }
}

/// Resolve a key press to a grid command, or `None` if the grid ignores it.
pub fn resolve(input: &KeyInput, editing: bool) -> Option<GridCommand> {
    let m = input.modifiers;

    if editing {
        return match input.key {
            Key::Enter | Key::Tab => Some(GridCommand::CommitEdit),
            Key::Escape => Some(GridCommand::ExitEdit),
            _ => None,
        };
    }

    if m.command() {
        let Key::Char(ch) = input.key else {
            return None;
        };
        return match (ch.to_ascii_lowercase(), m.shift) {
            ('c', false) => Some(GridCommand::Copy),
            ('v', false) => Some(GridCommand::Paste),
            ('z', false) => Some(GridCommand::Undo),
            ('z', true) | ('y', _) => Some(GridCommand::Redo),
            _ => None,
        };
    }

    if let Some((d_row, d_col)) = arrow_delta(input.key) {
        return Some(if m.shift {
            GridCommand::Extend { d_row, d_col }
        } else {
            GridCommand::Move { d_row, d_col }
        });
    }

    match input.key {
        Key::Delete => Some(GridCommand::DeleteSelectedRows),
        Key::Enter | Key::F2 => Some(GridCommand::BeginEdit),
        _ => None,
    }
}
