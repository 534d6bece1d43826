//! Table-writing collaborator: an in-memory workbook saved as XLSX, CSV or HTML.

pub mod delimited;
pub mod html;
pub mod xlsx;

use crate::Result;
use crate::layout::CellRef;

use anyhow::bail;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Int(n) => write!(f, "{}", n),
        }
    }
}

pub trait TableWriter {
    fn set_cell(&mut self, sheet: &str, cell: CellRef, value: CellValue);
    fn save(&self, path: &Path) -> Result<()>;
}

/// On-disk format, picked from the output file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFormat {
    Xlsx,
    Csv,
    Html,
}

impl SaveFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("xlsx") => Ok(SaveFormat::Xlsx),
            Some("csv") => Ok(SaveFormat::Csv),
            Some("html") | Some("htm") => Ok(SaveFormat::Html),
            _ => bail!(
                "unsupported output file {}: expected .xlsx, .csv, .html or .htm",
                path.display()
            ),
        }
    }
}

/// Sparse sheets keyed by name, kept in creation order.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    order: Vec<String>,
    sheets: BTreeMap<String, BTreeMap<CellRef, CellValue>>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.order
    }

    pub fn get(&self, sheet: &str, cell: CellRef) -> Option<&CellValue> {
        self.sheets.get(sheet)?.get(&cell)
    }

    /// Non-empty cells of `sheet` in row-major order.
    pub fn cells(&self, sheet: &str) -> impl Iterator<Item = (CellRef, &CellValue)> {
        self.sheets
            .get(sheet)
            .into_iter()
            .flat_map(|cells| cells.iter().map(|(c, v)| (*c, v)))
    }

    /// Dense rows from A1 to the last non-empty row and column.
    pub fn grid(&self, sheet: &str) -> Vec<Vec<String>> {
        let Some(cells) = self.sheets.get(sheet) else {
            return Vec::new();
        };
        let rows = cells.keys().map(|c| c.row).max().unwrap_or(0);
        let cols = cells.keys().map(|c| c.col).max().unwrap_or(0);

        let mut grid = vec![vec![String::new(); cols as usize]; rows as usize];
        for (cell, value) in cells {
            if cell.row == 0 || cell.col == 0 {
                continue;
            }
            grid[(cell.row - 1) as usize][(cell.col - 1) as usize] = value.to_string();
        }
        grid
    }
}

impl TableWriter for Workbook {
    /// Last write wins; writing `Empty` clears the cell.
    fn set_cell(&mut self, sheet: &str, cell: CellRef, value: CellValue) {
        if !self.sheets.contains_key(sheet) {
            self.order.push(sheet.to_string());
        }
        let cells = self.sheets.entry(sheet.to_string()).or_default();
        if value.is_empty() {
            cells.remove(&cell);
        } else {
            cells.insert(cell, value);
        }
    }

    fn save(&self, path: &Path) -> Result<()> {
        match SaveFormat::from_path(path)? {
            SaveFormat::Xlsx => xlsx::save_xlsx(self, path),
            SaveFormat::Csv => delimited::save_csv(self, path),
            SaveFormat::Html => html::save_html(self, path),
        }
    }
}
