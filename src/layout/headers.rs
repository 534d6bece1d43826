//! Header layout (layout.json) and its validated form.
//!
//! JSON shape:
//! {
//!   "main": [ { "key": "LoadConfig", "name": "Load configuration" }, ... ],
//!   "sub":  [ "Query", "Fetch", ... ]
//! }
//!
//! Main headers become rows of the main block in list order; sub headers
//! become columns of the sub and stats blocks in list order.

use crate::Result;
use crate::report::{STATS_TOP_ROW, SUB_HEADER_ROW};

use anyhow::{Context, bail};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct LayoutSpec {
    #[serde(default)]
    pub main: Vec<MainHeaderSpec>,

    #[serde(default)]
    pub sub: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainHeaderSpec {
    pub key: String,

    /// Display label. Defaults to `key`.
    #[serde(default)]
    pub name: Option<String>,
}

/// One main-block row: checkpoint key and the label written next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainHeader {
    pub key: String,
    pub name: String,
}

/// Validated header layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub main: Vec<MainHeader>,
    pub sub: Vec<String>,
}

const DEFAULT_MAIN: &[(&str, &str)] = &[
    ("Init", "Initialize"),
    ("LoadConfig", "Load configuration"),
    ("ConnectDB", "Connect database"),
    ("LoadRules", "Load rules"),
    ("ParseRules", "Parse rules"),
    ("BuildIndex", "Build index"),
    ("FetchData", "Fetch data"),
    ("Dispatch", "Dispatch rules"),
    ("WaitRules", "Wait for rules"),
    ("Merge", "Merge results"),
    ("Persist", "Persist results"),
    ("Cleanup", "Clean up"),
    ("Finish", "Finish"),
];

const DEFAULT_SUB: &[&str] = &[
    "Start",
    "Load",
    "Parse",
    "Prepare",
    "Query",
    "Fetch",
    "Filter",
    "Transform",
    "Compute",
    "Aggregate",
    "Validate",
    "Write",
    "Commit",
    "Notify",
    "End",
];

impl Default for Layout {
    fn default() -> Self {
        Self {
            main: DEFAULT_MAIN
                .iter()
                .map(|(key, name)| MainHeader {
                    key: key.to_string(),
                    name: name.to_string(),
                })
                .collect(),
            sub: DEFAULT_SUB.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl LayoutSpec {
    /// Validate and normalize:
    /// - both header lists non-empty, keys trimmed and non-empty
    /// - keys unique within each list
    /// - the main block ends above the RuleID header row; rows shared
    ///   with the stats block are allowed with a warning
    pub fn validate_and_build(&self) -> Result<Layout> {
        if self.main.is_empty() {
            bail!("layout.json must contain at least 1 main header");
        }
        if self.sub.is_empty() {
            bail!("layout.json must contain at least 1 sub header");
        }

        let clear_rows = (STATS_TOP_ROW - 1) as usize;
        let max_main = (SUB_HEADER_ROW - 1) as usize;
        if self.main.len() > max_main {
            bail!(
                "layout.json has {} main headers; at most {} fit above the RuleID header row",
                self.main.len(),
                max_main
            );
        }
        if self.main.len() > clear_rows {
            tracing::warn!(
                main_headers = self.main.len(),
                "main rows {}..={} share the stats block; their first three columns get overwritten by stats",
                STATS_TOP_ROW,
                self.main.len()
            );
        }

        let mut seen = BTreeSet::new();
        let mut main = Vec::with_capacity(self.main.len());
        for h in &self.main {
            let key = h.key.trim();
            if key.is_empty() {
                bail!("main header with empty key in layout.json");
            }
            if !seen.insert(key) {
                bail!("duplicate main header key in layout.json: {}", key);
            }
            let name = h
                .name
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(key);
            main.push(MainHeader {
                key: key.to_string(),
                name: name.to_string(),
            });
        }

        let mut seen = BTreeSet::new();
        let mut sub = Vec::with_capacity(self.sub.len());
        for key in &self.sub {
            let key = key.trim();
            if key.is_empty() {
                bail!("sub header with empty key in layout.json");
            }
            if !seen.insert(key) {
                bail!("duplicate sub header key in layout.json: {}", key);
            }
            sub.push(key.to_string());
        }

        Ok(Layout { main, sub })
    }
}

impl Layout {
    /// Load `path` if given, otherwise the built-in headers.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read layout file {}", path.display()))?;
        let spec: LayoutSpec = serde_json::from_str(&text)
            .with_context(|| format!("parse layout file {}", path.display()))?;
        spec.validate_and_build()
            .with_context(|| format!("invalid layout file {}", path.display()))
    }
}
