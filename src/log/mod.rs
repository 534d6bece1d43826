//! Checkpoint log handling: event records, extraction passes and the log source.

pub mod event;
pub mod extract;
pub mod source;

pub use event::{MainTimeline, SubTimeline, TimedEvent, Timeline};
pub use extract::LogExtractor;
pub use source::{FilePicker, LogReadError, choose_log_path, read_log_file};
