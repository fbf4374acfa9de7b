/// Validation errors for deck JSON.
///
/// Every variant except [`SchemaError::InvalidJson`] carries the path of the
/// offending field, written the way it appears in the input
/// (`slides[2].shapes[0].width`).
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SchemaError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// Input is not JSON (after lenient cleanup, if enabled)
    #[error("invalid JSON at line {line}, column {column}: {message}")]
    InvalidJson {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("{path}: missing required field")]
    MissingField { path: String },

    #[error("{path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{path}: {value} is out of range ({constraint})")]
    OutOfRange {
        path: String,
        value: f64,
        constraint: String,
    },

    #[error("{path}: unknown shape kind '{kind}' (expected textbox, table, image or shape)")]
    UnknownKind { path: String, kind: String },

    #[error("{path}: row has {found} cells, expected {expected}")]
    JaggedTable {
        path: String,
        expected: usize,
        found: usize,
    },

    #[error("{path}: must not be empty")]
    Empty { path: String },

    #[error("{path}: {reason}")]
    InvalidValue { path: String, reason: String },
}

impl SchemaError {
    /// Field path of the error; `None` for unparseable input.
    pub fn path(&self) -> Option<&str> {
        match self {
            SchemaError::InvalidJson { .. } => None,
            SchemaError::MissingField { path }
            | SchemaError::TypeMismatch { path, .. }
            | SchemaError::OutOfRange { path, .. }
            | SchemaError::UnknownKind { path, .. }
            | SchemaError::JaggedTable { path, .. }
            | SchemaError::Empty { path }
            | SchemaError::InvalidValue { path, .. } => Some(path),
        }
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        SchemaError::InvalidJson {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}
