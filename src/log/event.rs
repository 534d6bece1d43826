use serde::Serialize;
use std::collections::BTreeMap;

/// Suffix under which some checkpoints are logged a second time
/// (`Load` vs. `LoadTime`).
pub const ALIAS_SUFFIX: &str = "Time";

/// One checkpoint: the timestamp it was reached and, if the summary line
/// reported one, its total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimedEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<String>,
}

impl TimedEvent {
    pub fn is_blank(&self) -> bool {
        self.date.is_none() && self.total.is_none()
    }

    /// Keep the first timestamp seen; later ones are ignored.
    pub fn record_date(&mut self, date: &str) {
        if self.date.is_none() {
            self.date = Some(date.to_string());
        }
    }

    /// Totals are set, not merged: the last summary value wins.
    pub fn set_total(&mut self, total: &str) {
        self.total = Some(total.to_string());
    }

    /// Cell text for the sub block: total, else date, else nothing.
    pub fn display_value(&self) -> Option<&str> {
        self.total.as_deref().or(self.date.as_deref())
    }
}

/// Checkpoint name -> event, for one thread.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Timeline {
    events: BTreeMap<String, TimedEvent>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&TimedEvent> {
        self.events.get(key)
    }

    /// Look up `key`, falling back to `key + "Time"` when the canonical
    /// entry is missing or carries neither a date nor a total.
    pub fn resolve(&self, key: &str) -> Option<&TimedEvent> {
        match self.events.get(key) {
            Some(event) if !event.is_blank() => Some(event),
            primary => self
                .events
                .get(&format!("{key}{ALIAS_SUFFIX}"))
                .or(primary),
        }
    }

    /// Entry for `key`, created empty if absent. Keys are never removed.
    pub fn entry(&mut self, key: &str) -> &mut TimedEvent {
        self.events.entry(key.to_string()).or_default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TimedEvent)> {
        self.events.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// The single top-level timeline of a log file.
pub type MainTimeline = Timeline;

/// One timeline per rule id. Rules iterate in lexicographic id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubTimeline {
    rules: BTreeMap<String, Timeline>,
}

impl SubTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(&self, rule_id: &str) -> Option<&Timeline> {
        self.rules.get(rule_id)
    }

    pub fn rule_mut(&mut self, rule_id: &str) -> &mut Timeline {
        self.rules.entry(rule_id.to_string()).or_default()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Timeline)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }
}
