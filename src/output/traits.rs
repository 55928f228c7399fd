//! Output writer trait and errors

use crate::output::table::CourseTable;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Persists a finished course table
///
/// A writer is invoked once per run, after every course has been
/// collected.
pub trait TableWriter {
    /// Writes the table to `path`, replacing any existing file
    fn write(&self, table: &CourseTable, path: &Path) -> OutputResult<()>;
}
