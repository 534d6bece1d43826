//! CSV export of a workbook. CSV has no sheets, so only the first one is written.

use crate::Result;
use crate::sheet::Workbook;

use anyhow::Context;
use std::io::Write;
use std::path::Path;

pub fn save_csv(workbook: &Workbook, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("create output file {}", path.display()))?;
    write_csv(workbook, file).with_context(|| format!("write CSV to {}", path.display()))
}

pub fn write_csv<W: Write>(workbook: &Workbook, writer: W) -> Result<()> {
    let names = workbook.sheet_names();
    if names.len() > 1 {
        tracing::warn!(
            sheets = names.len(),
            "CSV output keeps only the first sheet ({})",
            names[0]
        );
    }

    let mut out = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    if let Some(first) = names.first() {
        for row in workbook.grid(first) {
            out.write_record(&row)?;
        }
    }
    out.flush()?;
    Ok(())
}
