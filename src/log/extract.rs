//! Checkpoint extraction over the full log text.
//!
//! Main thread lines look like
//!   `[MAIN_LoadConfig]   time:2021-06-01 10:00:00.123`
//! with one summary line carrying the totals:
//!   `... MAIN_TIME ... LoadConfig:12,ParseRules:40`
//!
//! Sub thread lines carry a rule id between prefix and checkpoint name:
//!   `[SUB_1001_Query]   time:2021-06-01 10:00:01.456`
//!   `... SUB_TIME_1001] Query:18,Write:err`

use crate::Result;
use crate::log::event::{MainTimeline, SubTimeline};

use regex::Regex;

// ASCII classes only: `\w`/`\d` in the regex crate are Unicode-aware.
const TIMESTAMP: &str = r"[0-9]{4}-[0-9]{2}-[0-9]{2}\s[0-9]{2}:[0-9]{2}:[0-9]{2}.[0-9]{3}";

// The separator before the captured fragment must not cross a line break.
const MAIN_TOTALS_LINE_RE: &str = r"MAIN_TIME.*[^\S\n](\S+)";
const MAIN_TOTAL_PAIR_RE: &str = r"([[:word:]]+):([0-9]+)";
const SUB_TOTALS_LINE_RE: &str = r".*SUB_TIME_([0-9]+)\S+[^\S\n]([^\n]*)";
const SUB_TOTAL_PAIR_RE: &str = r"([[:word:]]+):([[:alnum:]_]+)";

/// Compiled patterns for both extraction passes.
#[derive(Debug, Clone)]
pub struct LogExtractor {
    main_time: Regex,
    main_totals_line: Regex,
    main_total_pair: Regex,
    sub_time: Regex,
    sub_totals_line: Regex,
    sub_total_pair: Regex,
}

impl LogExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            main_time: Regex::new(&format!(r"MAIN_([[:word:]]+)\]\s+time:({TIMESTAMP})"))?,
            main_totals_line: Regex::new(MAIN_TOTALS_LINE_RE)?,
            main_total_pair: Regex::new(MAIN_TOTAL_PAIR_RE)?,
            sub_time: Regex::new(&format!(
                r"SUB_([[:word:]]+)_([[:word:]]+)\]\s+time:({TIMESTAMP})"
            ))?,
            sub_totals_line: Regex::new(SUB_TOTALS_LINE_RE)?,
            sub_total_pair: Regex::new(SUB_TOTAL_PAIR_RE)?,
        })
    }

    /// Build the main-thread timeline.
    ///
    /// Pass 1 records a date for every `MAIN_<key>] time:<ts>` token; pass 2
    /// reads `<key>:<digits>` pairs from the last field of the first
    /// `MAIN_TIME` line. Without any timestamp token the summary line is
    /// never consulted and the timeline is empty.
    pub fn extract_main(&self, text: &str) -> MainTimeline {
        let mut timeline = MainTimeline::new();

        for caps in self.main_time.captures_iter(text) {
            timeline.entry(&caps[1]).record_date(&caps[2]);
        }
        if timeline.is_empty() {
            tracing::debug!("no MAIN_ timestamp tokens found");
            return timeline;
        }

        let Some(line) = self.main_totals_line.captures(text) else {
            tracing::warn!("log has main checkpoints but no MAIN_TIME summary line");
            return timeline;
        };
        let fragment = line.get(1).map_or("", |m| m.as_str());
        for caps in self.main_total_pair.captures_iter(fragment) {
            timeline.entry(&caps[1]).set_total(&caps[2]);
        }

        tracing::debug!(checkpoints = timeline.len(), "extracted main timeline");
        timeline
    }

    /// Build the per-rule sub-thread timelines.
    ///
    /// Pass 1 keeps the first `SUB_<rule>_<key>] time:<ts>` date per
    /// (rule, key). Pass 2 reads `<key>:<value>` pairs from every
    /// `SUB_TIME_<rule>...` line; values may be non-numeric.
    pub fn extract_sub(&self, text: &str) -> SubTimeline {
        let mut sub = SubTimeline::new();

        for caps in self.sub_time.captures_iter(text) {
            sub.rule_mut(&caps[1]).entry(&caps[2]).record_date(&caps[3]);
        }

        for line in self.sub_totals_line.captures_iter(text) {
            let rule_id = &line[1];
            let rest = line.get(2).map_or("", |m| m.as_str());
            for caps in self.sub_total_pair.captures_iter(rest) {
                sub.rule_mut(rule_id).entry(&caps[1]).set_total(&caps[2]);
            }
        }

        tracing::debug!(rules = sub.len(), "extracted sub timelines");
        sub
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extractor() -> LogExtractor {
        LogExtractor::new().unwrap()
    }

    const SAMPLE: &str = "\
2021-06-01 10:00:00,001 INFO [MAIN_Init]  time:2021-06-01 10:00:00.001
2021-06-01 10:00:00,120 INFO [MAIN_LoadConfig]  time:2021-06-01 10:00:00.120
2021-06-01 10:00:00,130 INFO [SUB_1001_Query]  time:2021-06-01 10:00:00.130
2021-06-01 10:00:00,140 INFO [SUB_1001_Query]  time:2021-06-01 10:00:09.999
2021-06-01 10:00:00,150 INFO [SUB_1002_Query]  time:2021-06-01 10:00:00.150
2021-06-01 10:00:00,160 INFO [SUB_TIME_1001] Query:18,Write:err
2021-06-01 10:00:00,170 INFO [SUB_TIME_1002] Query:25
2021-06-01 10:00:01,000 INFO [MAIN_TIME] Init:5,LoadConfig:119,FinishTime:880
";

    #[test]
    fn main_dates_and_totals_are_merged_by_key() {
        let main = extractor().extract_main(SAMPLE);
        assert_eq!(main.len(), 3);

        let init = main.get("Init").unwrap();
        assert_eq!(init.date.as_deref(), Some("2021-06-01 10:00:00.001"));
        assert_eq!(init.total.as_deref(), Some("5"));

        let load = main.get("LoadConfig").unwrap();
        assert_eq!(load.total.as_deref(), Some("119"));

        // Introduced only by the summary line.
        let finish = main.get("FinishTime").unwrap();
        assert_eq!(finish.date, None);
        assert_eq!(finish.total.as_deref(), Some("880"));
    }

    #[test]
    fn main_totals_line_alone_yields_nothing() {
        let text = "INFO [MAIN_TIME] Init:5,LoadConfig:119\n";
        assert!(extractor().extract_main(text).is_empty());
    }

    #[test]
    fn main_without_totals_line_keeps_dates() {
        let text = "[MAIN_Init] time:2021-06-01 10:00:00.001\n";
        let main = extractor().extract_main(text);
        assert_eq!(main.len(), 1);
        assert_eq!(main.get("Init").unwrap().total, None);
    }

    #[test]
    fn main_totals_fragment_stays_on_its_line() {
        let text = "[MAIN_Init] time:2021-06-01 10:00:00.001\n[MAIN_TIME] Init:5\nNext:9 trailing\n";
        let main = extractor().extract_main(text);
        assert_eq!(main.get("Init").unwrap().total.as_deref(), Some("5"));
        assert!(main.get("Next").is_none());
    }

    #[test]
    fn main_first_timestamp_wins() {
        let text = "\
[MAIN_Init] time:2021-06-01 10:00:00.001
[MAIN_Init] time:2021-06-01 11:00:00.001
";
        let main = extractor().extract_main(text);
        assert_eq!(
            main.get("Init").unwrap().date.as_deref(),
            Some("2021-06-01 10:00:00.001")
        );
    }

    #[test]
    fn sub_first_timestamp_wins() {
        let sub = extractor().extract_sub(SAMPLE);
        let query = sub.rule("1001").unwrap().get("Query").unwrap();
        assert_eq!(query.date.as_deref(), Some("2021-06-01 10:00:00.130"));
        assert_eq!(query.total.as_deref(), Some("18"));
    }

    #[test]
    fn sub_totals_accept_non_numeric_values() {
        let sub = extractor().extract_sub(SAMPLE);
        let write = sub.rule("1001").unwrap().get("Write").unwrap();
        assert_eq!(write.date, None);
        assert_eq!(write.total.as_deref(), Some("err"));
        assert_eq!(
            sub.rule("1002").unwrap().get("Query").unwrap().total.as_deref(),
            Some("25")
        );
    }

    #[test]
    fn sub_totals_create_unseen_rules() {
        let text = "[SUB_TIME_77] Parse:3\n";
        let sub = extractor().extract_sub(text);
        assert_eq!(sub.len(), 1);
        assert_eq!(
            sub.rule("77").unwrap().get("Parse").unwrap().total.as_deref(),
            Some("3")
        );
    }

    #[test]
    fn sub_rule_id_splits_at_last_underscore() {
        let text = "[SUB_12_Load_Data] time:2021-06-01 10:00:00.001\n";
        let sub = extractor().extract_sub(text);
        assert!(sub.rule("12_Load").unwrap().get("Data").is_some());
    }

    #[test]
    fn unmatched_text_is_empty() {
        let ex = extractor();
        assert!(ex.extract_main("nothing to see").is_empty());
        assert!(ex.extract_sub("nothing to see").is_empty());
    }
}
