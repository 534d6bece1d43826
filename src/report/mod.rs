//! Report assembly: turn the extracted timelines into labeled cell writes.
//!
//! Sheet layout (rows and columns 1-based):
//! - rows 1..: main block, one row per main header: name | total | date
//! - rows 14..=18: stats labels in column A (`more` on top, `max` right
//!   above the header row), per-sub-header stats in columns B..
//! - row 19: `RuleID` followed by the sub header keys
//! - rows 20..: one row per rule id, total (or date) per sub header

use crate::layout::{CellRef, Layout};
use crate::log::{MainTimeline, SubTimeline};
use crate::sheet::{CellValue, TableWriter};
use crate::stats::{Stats, compute_stats};

use std::collections::BTreeMap;

pub const SHEET_NAME: &str = "Sheet1";

pub const MAIN_BLOCK_START_ROW: u32 = 1;
pub const MAIN_NAME_COL: u32 = 1;
pub const MAIN_TOTAL_COL: u32 = 2;
pub const MAIN_DATE_COL: u32 = 3;

pub const SUB_HEADER_ROW: u32 = 19;
pub const SUB_BLOCK_START_ROW: u32 = 20;
pub const RULE_ID_COL: u32 = 1;
pub const FIRST_SUB_COL: u32 = 2;
pub const RULE_ID_LABEL: &str = "RuleID";

/// One summary statistic and its row label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    Max,
    Min,
    Avg,
    Mid,
    More,
}

impl StatKind {
    /// Laid out upward from the header row in this order: `max` on row 18,
    /// ..., `more` on row 14.
    pub const ALL: [StatKind; 5] = [
        StatKind::Max,
        StatKind::Min,
        StatKind::Avg,
        StatKind::Mid,
        StatKind::More,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StatKind::Max => "max",
            StatKind::Min => "min",
            StatKind::Avg => "avg",
            StatKind::Mid => "mid",
            StatKind::More => "more",
        }
    }

    pub fn value(self, stats: &Stats) -> i64 {
        match self {
            StatKind::Max => stats.max,
            StatKind::Min => stats.min,
            StatKind::Avg => stats.avg,
            StatKind::Mid => stats.mid,
            StatKind::More => stats.more,
        }
    }
}

pub const STATS_TOP_ROW: u32 = SUB_HEADER_ROW - StatKind::ALL.len() as u32;

/// One cell assignment destined for the table writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellWrite {
    pub sheet: String,
    pub cell: CellRef,
    pub value: CellValue,
}

impl CellWrite {
    fn new(cell: CellRef, value: CellValue) -> Self {
        Self {
            sheet: SHEET_NAME.to_string(),
            cell,
            value,
        }
    }
}

fn stat_row(index: usize) -> u32 {
    SUB_HEADER_ROW - 1 - index as u32
}

fn text(value: Option<&str>) -> CellValue {
    value.map_or(CellValue::Empty, |s| CellValue::Text(s.to_string()))
}

/// Integer totals per sub header, in rule id order. Non-integer totals and
/// date-only checkpoints contribute nothing.
pub fn collect_samples(layout: &Layout, sub: &SubTimeline) -> BTreeMap<String, Vec<i64>> {
    let mut samples: BTreeMap<String, Vec<i64>> = BTreeMap::new();
    for (_, timeline) in sub.iter() {
        for key in &layout.sub {
            let total = timeline.get(key).and_then(|ev| ev.total.as_deref());
            if let Some(n) = total.and_then(|t| t.parse::<i64>().ok()) {
                samples.entry(key.clone()).or_default().push(n);
            }
        }
    }
    samples
}

/// Stats per sub header, in header order. `None` when a header has no
/// integer samples.
pub fn sub_stats(layout: &Layout, sub: &SubTimeline) -> Vec<(String, Option<Stats>)> {
    let samples = collect_samples(layout, sub);
    layout
        .sub
        .iter()
        .map(|key| {
            let values = samples.get(key).map(Vec::as_slice).unwrap_or_default();
            (key.clone(), compute_stats(values))
        })
        .collect()
}

/// Lay out the whole report: main block, sub block, then the stats block.
/// Later writes to the same cell win.
pub fn build_report(layout: &Layout, main: &MainTimeline, sub: &SubTimeline) -> Vec<CellWrite> {
    let mut writes = Vec::new();
    build_main_block(layout, main, &mut writes);
    build_sub_block(layout, sub, &mut writes);
    build_stats_block(layout, sub, &mut writes);
    writes
}

fn build_main_block(layout: &Layout, main: &MainTimeline, writes: &mut Vec<CellWrite>) {
    for (i, header) in layout.main.iter().enumerate() {
        let row = MAIN_BLOCK_START_ROW + i as u32;
        let event = main.resolve(&header.key);
        let total = event.and_then(|ev| ev.total.as_deref());
        let date = event.and_then(|ev| ev.date.as_deref());

        writes.push(CellWrite::new(
            CellRef::new(row, MAIN_NAME_COL),
            CellValue::Text(header.name.clone()),
        ));
        writes.push(CellWrite::new(CellRef::new(row, MAIN_TOTAL_COL), text(total)));
        writes.push(CellWrite::new(CellRef::new(row, MAIN_DATE_COL), text(date)));
    }
}

fn build_sub_block(layout: &Layout, sub: &SubTimeline, writes: &mut Vec<CellWrite>) {
    for (i, (rule_id, timeline)) in sub.iter().enumerate() {
        let row = SUB_BLOCK_START_ROW + i as u32;
        writes.push(CellWrite::new(
            CellRef::new(row, RULE_ID_COL),
            CellValue::Text(rule_id.to_string()),
        ));
        for (j, key) in layout.sub.iter().enumerate() {
            let value = timeline.get(key).and_then(|ev| ev.display_value());
            writes.push(CellWrite::new(
                CellRef::new(row, FIRST_SUB_COL + j as u32),
                text(value),
            ));
        }
    }
}

fn build_stats_block(layout: &Layout, sub: &SubTimeline, writes: &mut Vec<CellWrite>) {
    writes.push(CellWrite::new(
        CellRef::new(SUB_HEADER_ROW, RULE_ID_COL),
        CellValue::Text(RULE_ID_LABEL.to_string()),
    ));
    for (i, kind) in StatKind::ALL.iter().enumerate() {
        writes.push(CellWrite::new(
            CellRef::new(stat_row(i), RULE_ID_COL),
            CellValue::Text(kind.label().to_string()),
        ));
    }

    for (j, (key, stats)) in sub_stats(layout, sub).into_iter().enumerate() {
        let col = FIRST_SUB_COL + j as u32;
        writes.push(CellWrite::new(
            CellRef::new(SUB_HEADER_ROW, col),
            CellValue::Text(key),
        ));
        for (i, kind) in StatKind::ALL.iter().enumerate() {
            let value = stats
                .as_ref()
                .map_or(CellValue::Empty, |s| CellValue::Int(kind.value(s)));
            writes.push(CellWrite::new(CellRef::new(stat_row(i), col), value));
        }
    }
}

/// Replay `writes` into a table writer.
pub fn apply(writes: &[CellWrite], writer: &mut dyn TableWriter) {
    for w in writes {
        writer.set_cell(&w.sheet, w.cell, w.value.clone());
    }
}
