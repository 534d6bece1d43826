//! Checkpoint timing report: extract `MAIN_`/`SUB_` checkpoint events from an
//! application log, aggregate per-rule timing statistics and lay the result
//! out as a spreadsheet.

pub mod diagnostics;
pub mod layout;
pub mod log;
pub mod open;
pub mod report;
pub mod sheet;
pub mod stats;

pub type Result<T> = anyhow::Result<T>;
