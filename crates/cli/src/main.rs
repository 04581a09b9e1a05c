// egrid - drive the editgrid engine headlessly
//
// Loads columns and rows from JSON, replays interaction scripts, computes
// viewport windows and exports row selections.

mod exit_codes;
mod script;

use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use editgrid_config::GridSettings;
use editgrid_engine::export::{export_to_path, rows_to_delimited};
use editgrid_engine::load::{columns_from_json, read_json_file, rows_from_json, rows_to_json};
use editgrid_engine::viewport::{layout, ViewportMetrics, DEFAULT_OVERSCAN};
use editgrid_engine::{ColumnDef, ExportError, Grid, LoadError, MemoryClipboard, Row};
use log::info;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "egrid")]
#[command(about = "Headless editable data grid")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay an interaction script against a grid and print the result
    #[command(after_help = "\
Examples:
  egrid apply --columns cols.json --rows rows.json --script edit.json
  egrid apply --columns cols.json --rows rows.json --script paste.json --clipboard block.tsv")]
    Apply {
        /// Column definitions (JSON array)
        #[arg(long)]
        columns: PathBuf,

        /// Row records (JSON array of objects)
        #[arg(long)]
        rows: PathBuf,

        /// Script steps (JSON array)
        #[arg(long)]
        script: PathBuf,

        /// Grid settings file (defaults when omitted)
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Initial clipboard contents (text file)
        #[arg(long)]
        clipboard: Option<PathBuf>,
    },

    /// Compute which rows a scroll position materializes
    Window {
        #[arg(long)]
        total: usize,

        #[arg(long)]
        row_height: f32,

        #[arg(long, default_value_t = 0.0)]
        scroll: f32,

        #[arg(long)]
        viewport: f32,

        #[arg(long, default_value_t = DEFAULT_OVERSCAN)]
        overscan: usize,

        /// Render every row
        #[arg(long)]
        no_virtualize: bool,
    },

    /// Export selected rows as CSV (or TSV)
    Export {
        #[arg(long)]
        columns: PathBuf,

        #[arg(long)]
        rows: PathBuf,

        /// Row indices, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        select: Vec<usize>,

        /// Tab-separated instead of comma-separated
        #[arg(long)]
        tsv: bool,

        /// Write to a file instead of stdout
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  editgrid-engine ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

/// Send library `log` records and our own to stderr, filtered by RUST_LOG.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Commands::Apply { columns, rows, script, settings, clipboard } => {
            cmd_apply(&columns, &rows, &script, settings.as_deref(), clipboard.as_deref())
        }
        Commands::Window { total, row_height, scroll, viewport, overscan, no_virtualize } => {
            cmd_window(total, row_height, scroll, viewport, overscan, no_virtualize)
        }
        Commands::Export { columns, rows, select, tsv, out } => {
            cmd_export(&columns, &rows, &select, tsv, out.as_deref())
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn runtime(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<LoadError> for CliError {
    fn from(e: LoadError) -> Self {
        match e {
            LoadError::Io(_) => CliError::usage(e.to_string()),
            _ => CliError::runtime(e.to_string()),
        }
    }
}

impl From<ExportError> for CliError {
    fn from(e: ExportError) -> Self {
        CliError::runtime(e.to_string())
    }
}

fn load_grid_data(columns: &Path, rows: &Path) -> Result<(Vec<ColumnDef>, Vec<Row>), CliError> {
    let columns = columns_from_json(&read_json_file(columns)?)?;
    let rows = rows_from_json(&read_json_file(rows)?, &columns)?;
    Ok((columns, rows))
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| CliError::runtime(e.to_string()))?;
    println!("{text}");
    Ok(())
}

// ============================================================================
// apply
// ============================================================================

fn cmd_apply(
    columns: &Path,
    rows: &Path,
    script_path: &Path,
    settings: Option<&Path>,
    clipboard: Option<&Path>,
) -> Result<(), CliError> {
    let (columns, rows) = load_grid_data(columns, rows)?;
    let steps: Vec<script::Step> = serde_json::from_value(read_json_file(script_path)?)
        .map_err(|e| CliError::runtime(format!("{}: {e}", script_path.display())))?;

    let settings = match settings {
        Some(path) if !path.exists() => {
            return Err(CliError::usage(format!("settings file not found: {}", path.display())));
        }
        Some(path) => GridSettings::load_from(path),
        None => GridSettings::default(),
    };

    let clipboard = match clipboard {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| CliError::usage(format!("{}: {e}", path.display())))?;
            MemoryClipboard::with_text(text)
        }
        None => MemoryClipboard::new(),
    };

    let event_count = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&event_count);
    let mut grid = Grid::new(rows, columns)
        .with_settings(settings)
        .with_clipboard(clipboard.clone())
        .on_event(move |_| counter.set(counter.get() + 1));
    grid.set_focus(true);

    info!("replaying {} step(s)", steps.len());
    script::run(&mut grid, &steps).map_err(|msg| {
        CliError::usage(msg).with_hint("keys look like \"Enter\", \"ctrl+c\" or \"cmd+shift+z\"")
    })?;

    print_json(&json!({
        "rows": rows_to_json(grid.rows()),
        "events": event_count.get(),
        "clipboard": clipboard.get(),
    }))
}

// ============================================================================
// window
// ============================================================================

fn cmd_window(
    total: usize,
    row_height: f32,
    scroll: f32,
    viewport: f32,
    overscan: usize,
    no_virtualize: bool,
) -> Result<(), CliError> {
    if !row_height.is_finite() || row_height < 0.0 {
        return Err(CliError::usage(format!("invalid --row-height {row_height}")));
    }

    let metrics = ViewportMetrics::new(total, row_height, viewport)
        .with_scroll(scroll)
        .with_overscan(overscan);
    let body = layout(&metrics, !no_virtualize);

    print_json(&json!({
        "start": body.rows.first().map(|p| p.index),
        "end": body.rows.last().map(|p| p.index),
        "rendered": body.rows.len(),
        "first_top": body.rows.first().map(|p| p.top),
        "spacer_height": body.spacer_height,
        "virtualized": !no_virtualize,
    }))
}

// ============================================================================
// export
// ============================================================================

fn cmd_export(
    columns: &Path,
    rows: &Path,
    select: &[usize],
    tsv: bool,
    out: Option<&Path>,
) -> Result<(), CliError> {
    let (columns, rows) = load_grid_data(columns, rows)?;
    if let Some(bad) = select.iter().find(|&&i| i >= rows.len()) {
        return Err(CliError::usage(format!(
            "row {bad} out of range ({} row(s) loaded)",
            rows.len()
        )));
    }

    let delimiter = if tsv { b'\t' } else { b',' };
    match out {
        Some(path) => export_to_path(&rows, &columns, select, delimiter, path)?,
        None => print!("{}", rows_to_delimited(&rows, &columns, select, delimiter)?),
    }
    Ok(())
}
