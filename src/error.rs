// src/error.rs

//! Error types for log parsing, analysis and rendering.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort an analysis run.
///
/// Line and row numbers are 1-based so they match what an editor shows.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Opening or reading an input file failed.
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader itself failed (I/O or invalid UTF-8 in a record).
    #[error("CSV read error in '{}': {source}", .path.display())]
    Csv {
        /// File being read.
        path: PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// A required field pattern did not match an error-log line.
    #[error("{}:{line_number}: missing '{field}' field in line: {line:?}", .path.display())]
    MissingField {
        /// Error log being parsed.
        path: PathBuf,
        /// 1-based line number.
        line_number: usize,
        /// Name of the absent field ("Target", "Error" or "Elapsed Time").
        field: &'static str,
        /// Raw line content.
        line: String,
    },

    /// A field matched its pattern but is not a valid number (e.g. "1.2.3").
    #[error("{}:{line_number}: invalid number {value:?} for '{field}' in line: {line:?}", .path.display())]
    InvalidNumber {
        /// Error log being parsed.
        path: PathBuf,
        /// 1-based line number.
        line_number: usize,
        /// Field the number belongs to.
        field: &'static str,
        /// Offending text.
        value: String,
        /// Raw line content.
        line: String,
    },

    /// A trial CSV row does not have exactly the fixed column count.
    #[error("{}: row {row}: expected {expected} columns, found {actual}: {raw:?}", .path.display())]
    RowWidth {
        /// Trial log being parsed.
        path: PathBuf,
        /// 1-based row number.
        row: usize,
        /// Required column count.
        expected: usize,
        /// Column count found.
        actual: usize,
        /// Raw row content.
        raw: String,
    },

    /// A trial CSV field is not a valid number.
    #[error("{}: row {row}, column {column}: invalid number {value:?} in row: {raw:?}", .path.display())]
    InvalidField {
        /// Trial log being parsed.
        path: PathBuf,
        /// 1-based row number.
        row: usize,
        /// 0-based column index.
        column: usize,
        /// Offending field text.
        value: String,
        /// Raw row content.
        raw: String,
    },

    /// The second pass over a trial CSV saw a different row count than the first.
    #[error("{}: row count changed between passes (counted {counted}, read {read})", .path.display())]
    RowCountChanged {
        /// Trial log being parsed.
        path: PathBuf,
        /// Rows counted in the first pass.
        counted: usize,
        /// Rows read in the second pass.
        read: usize,
    },

    /// Jerk input arrays disagree in length.
    #[error("jerk input mismatch: {times} timestamps but {samples} acceleration samples")]
    LengthMismatch {
        /// Length of the time vector.
        times: usize,
        /// Row count of the acceleration table.
        samples: usize,
    },

    /// A field-extraction pattern failed to compile.
    #[error("invalid field pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// No runs were given to the pipeline.
    #[error("no runs to analyze")]
    NoRuns,

    /// The plotting backend failed while drawing or saving a figure.
    #[error("failed to render '{}': {message}", .path.display())]
    Render {
        /// Output image path.
        path: PathBuf,
        /// Backend error text.
        message: String,
    },
}

impl AnalysisError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wraps a CSV reader error with the path it happened on.
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    /// Wraps a plotting backend failure for the figure at `path`.
    pub fn render(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::Render {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, AnalysisError>;
