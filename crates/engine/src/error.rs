use std::fmt;

/// Failure to reach the system clipboard. Environmental, never a user error:
/// the clipboard bridge logs these and carries on.
#[derive(Debug, Clone, PartialEq)]
pub enum ClipboardError {
    /// No clipboard in this context (headless, unsupported platform).
    Unavailable(String),
    /// The platform refused access.
    PermissionDenied,
    Read(String),
    Write(String),
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "clipboard unavailable: {msg}"),
            Self::PermissionDenied => write!(f, "clipboard access denied"),
            Self::Read(msg) => write!(f, "clipboard read failed: {msg}"),
            Self::Write(msg) => write!(f, "clipboard write failed: {msg}"),
        }
    }
}

impl std::error::Error for ClipboardError {}

/// Error converting host JSON into columns or rows.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// Malformed JSON or a column definition serde rejected.
    Json(String),
    /// Well-formed JSON of the wrong shape (e.g. rows not an array of objects).
    Shape(String),
    Io(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON error: {msg}"),
            Self::Shape(msg) => write!(f, "unexpected shape: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Error exporting selected rows.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportError {
    Csv(String),
    Io(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        ExportError::Csv(e.to_string())
    }
}
