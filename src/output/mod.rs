//! Output module for the course spreadsheet
//!
//! This module handles:
//! - Accumulating course rows under the fixed header
//! - Persisting the finished table as an xlsx workbook

mod table;
mod traits;
mod xlsx;

pub use table::{CourseTable, HEADER, SHEET_NAME};
pub use traits::{OutputError, OutputResult, TableWriter};
pub use xlsx::XlsxWriter;
