//! Error types for loading, normalizing and querying company data.

use std::path::PathBuf;

use serde::Serialize;

/// Result type for pipeline operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Failure to produce a table from the input file. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Input file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed table: {0}")]
    Malformed(String),

    #[error("Input has an empty header row")]
    EmptyHeader,

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Failed to build table: {0}")]
    Frame(#[from] polars::prelude::PolarsError),
}

impl LoadError {
    /// Classify a `csv` reader error, keeping I/O failures apart from format problems.
    pub(crate) fn from_csv(path: Option<&std::path::Path>, err: csv::Error) -> Self {
        let position = err
            .position()
            .map(|p| format!(" (line {})", p.line()))
            .unwrap_or_default();
        let message = format!("{}{}", err, position);
        match (path, err.into_kind()) {
            (Some(path), csv::ErrorKind::Io(source)) => LoadError::Io {
                path: path.to_path_buf(),
                source,
            },
            _ => LoadError::Malformed(message),
        }
    }
}

/// A field that does not convert to its expected type.
///
/// `row` is the zero-based data row index in the source table.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("Row {row}, column '{column}': cannot parse {value:?}: {reason}")]
pub struct ParseError {
    pub row: usize,
    pub column: String,
    pub value: String,
    pub reason: String,
}

impl ParseError {
    pub fn new(
        row: usize,
        column: impl Into<String>,
        value: Option<&str>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            row,
            column: column.into(),
            value: value.unwrap_or("<missing>").to_string(),
            reason: reason.into(),
        }
    }
}

/// Malformed query input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Criterion {index} has a blank {field}")]
    BlankField { index: usize, field: &'static str },
}

/// Configuration file problems.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("No analysis.toml found in standard locations")]
    NotFound,

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Umbrella error for a full analysis run.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("DataFrame error: {0}")]
    Frame(#[from] polars::prelude::PolarsError),
}
