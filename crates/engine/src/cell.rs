//! Cell interaction unit.
//!
//! A per-cell state machine, Display -> Editing -> Display, evaluated against
//! the tracker's current state. A unit is built on demand for one cell, asked
//! how to present itself, and fed pointer/keyboard input; it answers with
//! effects the grid applies in order. It owns no state of its own.
//!
//! Enter, Tab, Escape and blur all leave edit mode the same way: the draft is
//! committed. Escape does not restore the pre-edit value.

use editgrid_core::{CellType, CellValue, ColumnDef, EditSession};
use log::debug;

use crate::coerce::{coerce_for_column, to_display_string, to_edit_string};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellMode {
    Display,
    Editing,
}

/// The input primitive that captures keystrokes for a cell type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    TextInput,
    NumberInput,
    DateInput,
    /// Option list; opens as soon as the cell enters edit.
    Dropdown,
    /// Checkbox: always live, no separate edit mode.
    Toggle,
}

impl EditorKind {
    pub fn for_type(cell_type: CellType) -> Option<Self> {
        match cell_type {
            CellType::Text | CellType::File => Some(EditorKind::TextInput),
            CellType::Number => Some(EditorKind::NumberInput),
            CellType::Date => Some(EditorKind::DateInput),
            CellType::Select => Some(EditorKind::Dropdown),
            CellType::Checkbox => Some(EditorKind::Toggle),
            CellType::Readonly => None,
        }
    }
}

/// Everything a rendering surface needs to paint one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellPresentation {
    pub mode: CellMode,
    /// Display string in Display mode, editor contents in Editing mode.
    pub text: String,
    pub editor: Option<EditorKind>,
    pub dropdown_open: bool,
    pub selected: bool,
    /// Checkbox state; `None` for other cell types.
    pub checked: Option<bool>,
    pub placeholder: Option<String>,
}

/// Input delivered to a cell by the rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub enum CellInput {
    /// Single click / tap.
    Activate,
    /// Double click.
    DoubleActivate,
    /// New editor contents.
    Input(String),
    /// Enter or Tab.
    Commit,
    /// Escape.
    Cancel,
    /// Editor lost focus.
    Blur,
    /// Checkbox clicked.
    Toggle,
    /// Dropdown option chosen, by option value. Unknown values are ignored.
    Choose(String),
}

/// What the grid must do in response to a cell input.
#[derive(Debug, Clone, PartialEq)]
pub enum CellEffect {
    Select,
    StartEdit,
    UpdateDraft(String),
    ValueChanged(CellValue),
    EndEdit,
}

pub struct CellUnit<'a> {
    column: &'a ColumnDef,
    value: &'a CellValue,
    selected: bool,
    sole_selection: bool,
    /// The edit session, only if it belongs to this cell.
    session: Option<&'a EditSession>,
    editing_enabled: bool,
}

impl<'a> CellUnit<'a> {
    pub fn new(column: &'a ColumnDef, value: &'a CellValue) -> Self {
        Self {
            column,
            value,
            selected: false,
            sole_selection: false,
            session: None,
            editing_enabled: true,
        }
    }

    pub fn with_selection(mut self, selected: bool, sole: bool) -> Self {
        self.selected = selected;
        self.sole_selection = selected && sole;
        self
    }

    pub fn with_session(mut self, session: Option<&'a EditSession>) -> Self {
        self.session = session;
        self
    }

    pub fn with_editing_enabled(mut self, enabled: bool) -> Self {
        self.editing_enabled = enabled;
        self
    }

    fn is_checkbox(&self) -> bool {
        self.column.cell_type == CellType::Checkbox
    }

    fn can_edit(&self) -> bool {
        self.editing_enabled && self.column.is_editable()
    }

    /// Checkboxes and readonly cells never report Editing.
    pub fn mode(&self) -> CellMode {
        if self.session.is_some() && self.can_edit() && !self.is_checkbox() {
            CellMode::Editing
        } else {
            CellMode::Display
        }
    }

    pub fn present(&self) -> CellPresentation {
        let mode = self.mode();
        let text = match (mode, self.session) {
            (CellMode::Editing, Some(EditSession { draft: Some(draft), .. })) => draft.clone(),
            (CellMode::Editing, _) => to_edit_string(self.value),
            (CellMode::Display, _) => to_display_string(self.value, self.column),
        };
        let editor = match mode {
            CellMode::Editing => EditorKind::for_type(self.column.cell_type),
            CellMode::Display if self.is_checkbox() => Some(EditorKind::Toggle),
            CellMode::Display => None,
        };
        CellPresentation {
            mode,
            text,
            editor,
            dropdown_open: editor == Some(EditorKind::Dropdown),
            selected: self.selected,
            checked: self.is_checkbox().then(|| self.value.truthy()),
            placeholder: self.column.placeholder.clone(),
        }
    }

    pub fn handle(&self, input: CellInput) -> Vec<CellEffect> {
        match self.mode() {
            CellMode::Display => self.handle_display(input),
            CellMode::Editing => self.handle_editing(input),
        }
    }

    fn handle_display(&self, input: CellInput) -> Vec<CellEffect> {
        match input {
            CellInput::Activate => {
                if self.sole_selection && self.can_edit() && !self.is_checkbox() {
                    vec![CellEffect::StartEdit]
                } else {
                    vec![CellEffect::Select]
                }
            }
            CellInput::DoubleActivate => {
                if self.can_edit() && !self.is_checkbox() {
                    vec![CellEffect::Select, CellEffect::StartEdit]
                } else {
                    vec![CellEffect::Select]
                }
            }
            CellInput::Toggle if self.is_checkbox() && self.can_edit() => {
                vec![CellEffect::ValueChanged(CellValue::Bool(!self.value.truthy()))]
            }
            _ => Vec::new(),
        }
    }

    fn handle_editing(&self, input: CellInput) -> Vec<CellEffect> {
        match input {
            CellInput::Input(text) => vec![CellEffect::UpdateDraft(text)],
            CellInput::Commit | CellInput::Cancel | CellInput::Blur => self.commit_effects(),
            CellInput::Choose(value) if self.column.cell_type == CellType::Select => {
                if !self.column.options.iter().any(|o| o.value == value) {
                    debug!("ignoring unknown option '{}' for column '{}'", value, self.column.id);
                    return Vec::new();
                }
                vec![CellEffect::ValueChanged(CellValue::Choice(value)), CellEffect::EndEdit]
            }
            _ => Vec::new(),
        }
    }

    fn commit_effects(&self) -> Vec<CellEffect> {
        let mut effects = Vec::with_capacity(2);
        if let Some(draft) = self.session.and_then(|s| s.draft.as_deref()) {
            effects.push(CellEffect::ValueChanged(coerce_for_column(draft, self.column)));
        }
        effects.push(CellEffect::EndEdit);
        effects
    }
}
