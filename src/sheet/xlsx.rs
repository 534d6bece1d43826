//! Excel workbook export: one worksheet per sheet, named as written.

use crate::Result;
use crate::sheet::{CellValue, Workbook};

use anyhow::{Context, bail};
use std::path::Path;

pub fn save_xlsx(workbook: &Workbook, path: &Path) -> Result<()> {
    let mut book = rust_xlsxwriter::Workbook::new();

    for name in workbook.sheet_names() {
        let sheet = book.add_worksheet();
        sheet
            .set_name(name.as_str())
            .with_context(|| format!("invalid sheet name {:?}", name))?;

        for (cell, value) in workbook.cells(name) {
            if cell.row == 0 || cell.col == 0 {
                bail!("cell {:?} is outside the sheet (rows and columns start at 1)", cell);
            }
            let row = cell.row - 1;
            let col = u16::try_from(cell.col - 1)
                .with_context(|| format!("column {} is past the last worksheet column", cell.col))?;
            match value {
                CellValue::Empty => {}
                CellValue::Text(s) => {
                    sheet
                        .write_string(row, col, s.as_str())
                        .with_context(|| format!("write cell {}", cell))?;
                }
                CellValue::Int(n) => {
                    sheet
                        .write_number(row, col, *n as f64)
                        .with_context(|| format!("write cell {}", cell))?;
                }
            }
        }
    }

    book.save(path)
        .with_context(|| format!("write workbook {}", path.display()))
}
