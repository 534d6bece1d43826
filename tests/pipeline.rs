use checkpoint_report::layout::{CellRef, Layout};
use checkpoint_report::log::{LogExtractor, read_log_file};
use checkpoint_report::report::{self, SHEET_NAME};
use checkpoint_report::sheet::{CellValue, TableWriter, Workbook};

use pretty_assertions::assert_eq;
use std::io::Read;
use std::path::Path;

const LOG: &str = "\
2021-06-01 10:00:00,001 INFO  [MAIN_Init]    time:2021-06-01 10:00:00.001
2021-06-01 10:00:00,010 INFO  [MAIN_LoadConfigTime]    time:2021-06-01 10:00:00.010
2021-06-01 10:00:00,100 INFO  [SUB_2002_Start]    time:2021-06-01 10:00:00.100
2021-06-01 10:00:00,101 INFO  [SUB_2001_Start]    time:2021-06-01 10:00:00.101
2021-06-01 10:00:00,150 INFO  [SUB_2001_Query]    time:2021-06-01 10:00:00.150
2021-06-01 10:00:00,300 INFO  [SUB_TIME_2001] Query:40,Write:12
2021-06-01 10:00:00,310 INFO  [SUB_TIME_2002] Query:20,Write:timeout
2021-06-01 10:00:00,320 INFO  [SUB_TIME_2003] Query:40,Write:15
2021-06-01 10:00:01,000 INFO  [MAIN_TIME] Init:9,LoadConfigTime:30,Finish:1000
";

fn run(log: &Path) -> Workbook {
    let text = read_log_file(log).unwrap();
    let extractor = LogExtractor::new().unwrap();
    let main = extractor.extract_main(&text);
    let sub = extractor.extract_sub(&text);

    let mut wb = Workbook::new();
    report::apply(&report::build_report(&Layout::default(), &main, &sub), &mut wb);
    wb
}

fn cell(wb: &Workbook, row: u32, col: u32) -> String {
    wb.get(SHEET_NAME, CellRef::new(row, col))
        .map(CellValue::to_string)
        .unwrap_or_default()
}

fn write_log(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("run.log");
    std::fs::write(&path, LOG).unwrap();
    path
}

#[test]
fn full_report_layout() {
    let dir = tempfile::tempdir().unwrap();
    let wb = run(&write_log(dir.path()));

    // Main block: Init row 1, LoadConfig row 2 via the *Time alias, Finish row 13.
    assert_eq!(cell(&wb, 1, 1), "Initialize");
    assert_eq!(cell(&wb, 1, 2), "9");
    assert_eq!(cell(&wb, 1, 3), "2021-06-01 10:00:00.001");
    assert_eq!(cell(&wb, 2, 2), "30");
    assert_eq!(cell(&wb, 2, 3), "2021-06-01 10:00:00.010");
    assert_eq!(cell(&wb, 13, 1), "Finish");
    assert_eq!(cell(&wb, 13, 2), "1000");
    assert_eq!(cell(&wb, 13, 3), "");

    // Header row; default sub headers: Start=B, ..., Query=F, ..., Write=M.
    assert_eq!(cell(&wb, 19, 1), "RuleID");
    assert_eq!(cell(&wb, 19, 2), "Start");
    assert_eq!(cell(&wb, 19, 6), "Query");
    assert_eq!(cell(&wb, 19, 13), "Write");

    let rule_ids: Vec<String> = (20..=22).map(|r| cell(&wb, r, 1)).collect();
    assert_eq!(rule_ids, vec!["2001", "2002", "2003"]);
    assert_eq!(cell(&wb, 20, 2), "2021-06-01 10:00:00.101");
    assert_eq!(cell(&wb, 20, 6), "40");
    assert_eq!(cell(&wb, 21, 13), "timeout");
    assert_eq!(cell(&wb, 23, 1), "");

    // Query samples 40, 20, 40.
    let query_stats: Vec<String> = (14..=18).map(|r| cell(&wb, r, 6)).collect();
    assert_eq!(query_stats, vec!["40", "40", "33", "20", "40"]);
    // Write samples 12, 15 (timeout skipped).
    let write_stats: Vec<String> = (14..=18).map(|r| cell(&wb, r, 13)).collect();
    assert_eq!(write_stats, vec!["12", "15", "13", "12", "15"]);
    // Start has dates only.
    assert!((14..=18).all(|r| cell(&wb, r, 2).is_empty()));
}

#[test]
fn rerun_produces_identical_cells() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(dir.path());
    let first = run(&log);
    let second = run(&log);
    assert_eq!(first.grid(SHEET_NAME), second.grid(SHEET_NAME));
}

#[test]
fn saves_csv_and_html() {
    let dir = tempfile::tempdir().unwrap();
    let wb = run(&write_log(dir.path()));

    let csv_path = dir.path().join("out.csv");
    wb.save(&csv_path).unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 22);
    assert!(lines[0].starts_with("Initialize,9,2021-06-01 10:00:00.001"));
    assert!(lines[18].starts_with("RuleID,Start,Load,Parse,Prepare,Query"));

    let html_path = dir.path().join("out.html");
    wb.save(&html_path).unwrap();
    let html = std::fs::read_to_string(&html_path).unwrap();
    assert!(html.contains("<td>RuleID</td>"));
}

fn zip_entry(archive: &mut zip::ZipArchive<std::fs::File>, name: &str) -> String {
    let mut entry = archive.by_name(name).unwrap();
    let mut text = String::new();
    entry.read_to_string(&mut text).unwrap();
    text
}

#[test]
fn saves_xlsx_with_named_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let wb = run(&write_log(dir.path()));

    let path = dir.path().join("log-parsed.xlsx");
    wb.save(&path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"PK"));

    let mut archive = zip::ZipArchive::new(std::fs::File::open(&path).unwrap()).unwrap();
    let workbook = zip_entry(&mut archive, "xl/workbook.xml");
    assert!(workbook.contains(&format!("name=\"{}\"", SHEET_NAME)));

    let strings = zip_entry(&mut archive, "xl/sharedStrings.xml");
    assert!(strings.contains("Initialize"));
    assert!(strings.contains("RuleID"));
}

#[test]
fn save_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let wb = run(&write_log(dir.path()));
    assert!(wb.save(&dir.path().join("nope").join("out.csv")).is_err());
}

#[test]
fn unreadable_log_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_log_file(&dir.path().join("missing.log")).unwrap_err();
    assert!(err.to_string().contains("missing.log"));
}
