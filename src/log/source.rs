//! Where the log comes from: picking a path and reading it.

use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

/// Used whenever picking a log file fails for any reason.
pub const DEFAULT_LOG_PATH: &str = "./222.log";

pub const PICKER_TITLE: &str = "Select a log file";

/// (description, accepted extensions)
pub const LOG_FILTERS: &[(&str, &[&str])] = &[("Log/Text file", &["log", "txt"])];

#[derive(Debug, thiserror::Error)]
pub enum PickError {
    #[error("no file chosen")]
    Cancelled,

    #[error("{} does not match any of the accepted file types", path.display())]
    Filtered { path: PathBuf },

    #[error("no interactive terminal to prompt on")]
    NotInteractive,

    #[error("failed to read the chosen path")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
#[error("failed to read log file {}", path.display())]
pub struct LogReadError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

pub trait FilePicker {
    fn choose(&self, title: &str, filters: &[(&str, &[&str])]) -> Result<PathBuf, PickError>;
}

/// A path handed over on the command line.
#[derive(Debug, Clone)]
pub struct ArgPicker {
    path: Option<PathBuf>,
}

impl ArgPicker {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl FilePicker for ArgPicker {
    fn choose(&self, _title: &str, filters: &[(&str, &[&str])]) -> Result<PathBuf, PickError> {
        let path = self.path.clone().ok_or(PickError::Cancelled)?;
        check_filters(path, filters)
    }
}

/// Asks for a path on stdin. An empty answer counts as a cancel.
#[derive(Debug, Clone, Default)]
pub struct PromptPicker;

impl FilePicker for PromptPicker {
    fn choose(&self, title: &str, filters: &[(&str, &[&str])]) -> Result<PathBuf, PickError> {
        let stdin = std::io::stdin();
        if !stdin.is_terminal() {
            return Err(PickError::NotInteractive);
        }

        let accepted: Vec<String> = filters
            .iter()
            .map(|(name, exts)| format!("{} (*.{})", name, exts.join(", *.")))
            .collect();
        eprint!("{} [{}]: ", title, accepted.join("; "));
        std::io::stderr().flush()?;

        let mut answer = String::new();
        stdin.lock().read_line(&mut answer)?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(PickError::Cancelled);
        }
        check_filters(PathBuf::from(answer), filters)
    }
}

fn check_filters(path: PathBuf, filters: &[(&str, &[&str])]) -> Result<PathBuf, PickError> {
    if filters.is_empty() {
        return Ok(path);
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let accepted = ext.is_some_and(|ext| {
        filters
            .iter()
            .any(|(_, exts)| exts.iter().any(|e| e.eq_ignore_ascii_case(&ext)))
    });
    if accepted {
        Ok(path)
    } else {
        Err(PickError::Filtered { path })
    }
}

/// Ask `picker` for a log path; any failure falls back to `DEFAULT_LOG_PATH`.
pub fn choose_log_path(picker: &dyn FilePicker) -> PathBuf {
    match picker.choose(PICKER_TITLE, LOG_FILTERS) {
        Ok(path) => path,
        Err(err) => {
            tracing::warn!(error = %err, fallback = DEFAULT_LOG_PATH, "using default log path");
            PathBuf::from(DEFAULT_LOG_PATH)
        }
    }
}

/// Load the whole log at once. Invalid UTF-8 is replaced rather than rejected.
pub fn read_log_file(path: &Path) -> Result<String, LogReadError> {
    let bytes = std::fs::read(path).map_err(|source| LogReadError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
