use crate::Result;
use crate::layout::column_name;
use crate::sheet::Workbook;

use anyhow::Context;
use std::path::Path;

pub fn save_html(workbook: &Workbook, path: &Path) -> Result<()> {
    std::fs::write(path, render_html(workbook))
        .with_context(|| format!("write HTML report {}", path.display()))
}

/// Render every sheet as a self-contained HTML table with spreadsheet-style
/// row numbers and column letters.
///
/// The template is filled with `replace` rather than `format!()` because
/// the CSS is full of `{}`.
pub fn render_html(workbook: &Workbook) -> String {
    const TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Checkpoint Report</title>
<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 16px; }
  h2 { font-size: 16px; margin: 16px 0 8px; }
  table { border-collapse: collapse; }
  th, td { border: 1px solid #ddd; padding: 4px 8px; font-size: 13px; white-space: nowrap; }
  th { background: #f5f5f5; color: #555; font-weight: normal; }
  .num { text-align: right; font-variant-numeric: tabular-nums; }
</style>
</head>
<body>
__SHEETS__
</body>
</html>
"#;

    let mut sheets = String::new();
    for name in workbook.sheet_names() {
        sheets.push_str(&render_sheet(name, &workbook.grid(name)));
    }
    TEMPLATE.replace("__SHEETS__", &sheets)
}

fn render_sheet(name: &str, grid: &[Vec<String>]) -> String {
    let cols = grid.first().map_or(0, Vec::len);

    let mut out = String::new();
    out.push_str(&format!("<h2>{}</h2>\n<table>\n<thead><tr><th></th>", escape_html(name)));
    for c in 1..=cols {
        out.push_str(&format!("<th>{}</th>", column_name(c as u32)));
    }
    out.push_str("</tr></thead>\n<tbody>\n");

    for (r, row) in grid.iter().enumerate() {
        out.push_str(&format!("<tr><th>{}</th>", r + 1));
        for value in row {
            if !value.is_empty() && value.parse::<i64>().is_ok() {
                out.push_str(&format!("<td class=\"num\">{}</td>", value));
            } else {
                out.push_str(&format!("<td>{}</td>", escape_html(value)));
            }
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
    out
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
