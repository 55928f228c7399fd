//! Excel workbook output

use crate::output::table::{CourseTable, SHEET_NAME};
use crate::output::traits::{OutputResult, TableWriter};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

/// Writes the course table as a single-sheet xlsx workbook
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxWriter;

impl TableWriter for XlsxWriter {
    fn write(&self, table: &CourseTable, path: &Path) -> OutputResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (col, title) in table.header().iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *title, &header_format)?;
        }

        for (index, row) in table.rows().iter().enumerate() {
            let row_num = index as u32 + 1;
            for (col, value) in row.iter().enumerate() {
                worksheet.write_string(row_num, col as u16, value.as_str())?;
            }
        }

        workbook.save(path)?;
        tracing::debug!("Wrote {} rows to {}", table.len(), path.display());

        Ok(())
    }
}
