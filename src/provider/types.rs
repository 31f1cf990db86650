use serde::{Deserialize, Serialize};

/// Marker used as the `date` of the actively written log file, which has no
/// date suffix in its name.
pub const CURRENT_LOG: &str = "CURRENT";

/// Name of the sentinel entry returned when no log files are visible.
pub const NO_LOG_FILES: &str = "NO_LOG_FILES";

/// Placeholder for the date and size columns of the sentinel entry.
pub const NO_LOG_PLACEHOLDER: &str = "---";

/// A single entry of a resolved log index.
///
/// `name` is the bare filename without any path. `size` is pre-formatted at
/// construction time (see [`crate::provider::format_size`]), not a raw byte
/// count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub name: String,
    pub date: String,
    pub size: String,
}

impl LogEntry {
    pub fn new(name: impl Into<String>, date: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
            size: size.into(),
        }
    }

    /// The sentinel entry standing in for an empty index. Display data
    /// only, never a real file.
    pub fn no_logs() -> Self {
        Self::new(NO_LOG_FILES, NO_LOG_PLACEHOLDER, NO_LOG_PLACEHOLDER)
    }

    pub fn is_sentinel(&self) -> bool {
        self.name == NO_LOG_FILES
    }
}

/// Where the logs for the current request live. Derived per call from the
/// remote logging flag, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    Local,
    Remote,
}

/// Sort entries ascending by name, case-insensitive, ordinal. The sort is
/// stable, so equal keys keep their original relative order.
pub fn sort_entries(entries: &mut [LogEntry]) {
    entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
}

/// Sort a resolved index, substituting the sentinel entry when it is empty.
/// Callers always receive at least one entry.
pub fn sorted_or_sentinel(mut entries: Vec<LogEntry>) -> Vec<LogEntry> {
    if entries.is_empty() {
        return vec![LogEntry::no_logs()];
    }
    sort_entries(&mut entries);
    entries
}
