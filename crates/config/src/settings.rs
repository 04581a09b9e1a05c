// Grid settings
// Loaded from ~/.config/editgrid/settings.json

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

/// Feature flags and layout values for one grid instance. Every flag is
/// independently togglable; `search`, `filter`, `sort` and
/// `virtualize_columns` are carried for the host and not acted on by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    // Features
    #[serde(rename = "features.selection")]
    pub selection: bool,

    #[serde(rename = "features.editing")]
    pub editing: bool,

    #[serde(rename = "features.copy")]
    pub copy: bool,

    #[serde(rename = "features.paste")]
    pub paste: bool,

    #[serde(rename = "features.undo")]
    pub undo: bool,

    #[serde(rename = "features.search")]
    pub search: bool,

    #[serde(rename = "features.filter")]
    pub filter: bool,

    #[serde(rename = "features.sort")]
    pub sort: bool,

    #[serde(rename = "features.rowAdd")]
    pub row_add: bool,

    #[serde(rename = "features.rowDelete")]
    pub row_delete: bool,

    #[serde(rename = "features.virtualizeRows")]
    pub virtualize_rows: bool,

    #[serde(rename = "features.virtualizeColumns")]
    pub virtualize_columns: bool,

    // Layout
    #[serde(rename = "grid.rowHeight")]
    pub row_height: f32,

    #[serde(rename = "grid.headerHeight")]
    pub header_height: f32,

    #[serde(rename = "grid.maxHeight")]
    pub max_height: f32,

    #[serde(rename = "grid.overscan")]
    pub overscan: usize,

    // History
    #[serde(rename = "history.depth")]
    pub history_depth: usize,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            selection: true,
            editing: true,
            copy: true,
            paste: true,
            undo: true,
            search: true,
            filter: true,
            sort: true,
            row_add: true,
            row_delete: true,
            virtualize_rows: true,
            virtualize_columns: false,
            row_height: 36.0,
            header_height: 40.0,
            max_height: 600.0,
            overscan: 5,
            history_depth: 20,
        }
    }
}

impl GridSettings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("editgrid");
        config_dir.join("settings.json")
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`. A missing file yields defaults silently; an
    /// unreadable or malformed one yields defaults with a warning.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_json_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("Error parsing {}: {}; using default settings", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON. Lines starting with `//` are treated as comments.
    pub fn from_json_str(contents: &str) -> Result<Self, String> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned).map_err(|e| e.to_string())
    }

    /// Save settings to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;

        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Save current settings to the default location
    pub fn save(&self) -> Result<(), String> {
        self.save_to(&Self::config_path())
    }

    /// Height of the scrollable body for `total_rows` rows, capped by `max_height`.
    pub fn body_height(&self, total_rows: usize) -> f32 {
        let content = total_rows as f32 * self.row_height;
        let cap = (self.max_height - self.header_height).max(0.0);
        content.min(cap).max(0.0)
    }
}
