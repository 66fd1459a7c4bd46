//! Error types for the validator.
//!
//! A quality-check FAIL is data, never an error. Everything in here is an
//! infrastructure problem that aborts the run.
use thiserror::Error;

/// Failures of the tabular medium: reading the input, writing artifacts,
/// appending to the audit history.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("cannot open '{path}': {source}")]
    Open { path: String, source: std::io::Error },
    #[error("malformed CSV in '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("row {line} of '{path}' has {found} fields, header has {expected}")]
    RaggedRow { path: String, line: u64, expected: usize, found: usize },
    #[error("cannot write '{path}': {source}")]
    Write { path: String, source: std::io::Error },
    #[error("cannot replace '{path}': {source}")]
    Persist { path: String, source: tempfile::PersistError },
}

impl StorageError {
    pub(crate) fn csv(path: &str, source: csv::Error) -> Self {
        StorageError::Csv { path: path.to_string(), source }
    }

    pub(crate) fn write(path: &str, source: std::io::Error) -> Self {
        StorageError::Write { path: path.to_string(), source }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: String },
    #[error("invalid TOML in '{path}': {message}")]
    Parse { path: String, message: String },
    #[error("invalid value for '{field}': {message}")]
    Invalid { field: String, message: String },
}

/// Top-level error of a validation run.
#[derive(Error, Debug)]
pub enum QualityError {
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("input is missing required column '{column}'")]
    MissingColumn { column: String },
}

pub type Result<T, E = QualityError> = std::result::Result<T, E>;
