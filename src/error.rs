//! Error types for loading, cleaning and exporting delivery data.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// Source file missing, unreadable, or an export target not writable.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A numeric column held a value that survived the missing-value pass
    /// but is not a number.
    #[error("Clean error at row {row}, column {column}: '{value}' is not numeric")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("Clean error at row {row}, column Order_Date: '{value}' does not match dd-mm-yyyy")]
    InvalidDate { row: usize, value: String },

    #[error("Clean error at row {row}, column {column}: unknown category '{value}'")]
    UnknownCategory {
        row: usize,
        column: &'static str,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, DashboardError>;
