//! Structured error conditions raised by the report pipeline

use thiserror::Error;

/// Errors callers may want to match on.
///
/// These travel inside `anyhow::Error`; use `downcast_ref::<ReportError>()`
/// to recover them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("Required input file not found: {file}")]
    MissingInput { file: String },

    #[error("Table '{table}' is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("Cannot map column '{from}' to '{to}' in table '{table}': {reason}")]
    KeyMapping {
        table: String,
        from: String,
        to: String,
        reason: String,
    },
}
