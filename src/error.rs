//! Error types for HYPE input preparation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving, aligning or writing HYPE tables.
///
/// Every variant except the I/O wrappers is fatal for the pipeline that
/// raised it. A missing mapped column during resolution is not an error and
/// is only reported through `tracing`.
#[derive(Debug, Error)]
pub enum HypeError {
    /// A column matched as part of a family has no digit run to number it by.
    #[error("column '{column}' matched prefix '{prefix}' but carries no numeric suffix")]
    MalformedColumnName { column: String, prefix: String },

    /// Two mapping entries claimed the same physical column.
    #[error("column '{column}' is matched by both '{first}' and '{second}'")]
    OverlappingMapping {
        column: String,
        first: String,
        second: String,
    },

    /// An operation would leave two columns with the same name.
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    /// A column required by the operation is absent.
    #[error("required column '{0}' not found")]
    MissingColumn(String),

    /// An identifier value cannot be converted to an integer.
    #[error("identifier column '{column}' holds non-integer value '{value}' at row {row}")]
    InvalidIdentifier {
        column: String,
        row: usize,
        value: String,
    },

    /// The sort key column holds a value that is not numeric.
    #[error("sort key '{column}' holds non-numeric value '{value}' at row {row}")]
    NonNumericSortKey {
        column: String,
        row: usize,
        value: String,
    },

    /// Two aligned tables disagree on their index values or order.
    #[error(
        "the indexes of tables {left} and {right} are different or in a different order \
         (first difference at position {position})"
    )]
    IndexMismatch {
        left: usize,
        right: usize,
        position: usize,
    },

    /// A list parameter does not have one value per soil or land-cover class.
    #[error("parameter '{key}' has {actual} values but {expected} classes are declared")]
    ArityMismatch {
        key: String,
        expected: usize,
        actual: usize,
    },

    /// A column was built with a length different from the table's row count.
    #[error("column '{column}' has {actual} values but the table has {expected} rows")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Invalid configuration or command-line input.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HypeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HypeError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, HypeError>;
