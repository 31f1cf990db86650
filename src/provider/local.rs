use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, warn};

use crate::provider::types::{sorted_or_sentinel, LogEntry, CURRENT_LOG};
use crate::provider::{format_size, LogError, LogResult};

/// Default wildcard matched against local log filenames.
pub const LOG_FILE_PATTERN: &str = "*.log*";

/// Token splitting a rotated filename into base name and date suffix.
/// A name without it is the actively written log.
pub const LOG_DATE_SEPARATOR: &str = ".log.";

/// Lists the log directory of the current server instance.
pub struct LocalLogLister {
    directory: PathBuf,
    pattern: String,
}

impl LocalLogLister {
    pub fn new(directory: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            pattern: pattern.into(),
        }
    }

    /// Scan the log directory and build index entries for every file whose
    /// name matches the wildcard. Unreadable single files are skipped; a
    /// directory that cannot be enumerated is an error.
    pub fn index(&self) -> LogResult<Vec<LogEntry>> {
        let matcher = wildcard_matcher(&self.pattern)?;
        let dir = fs::read_dir(&self.directory)
            .map_err(|e| LogError::retrieval(self.directory.display().to_string(), e))?;

        let mut entries = Vec::new();
        for item in dir {
            let item = match item {
                Ok(item) => item,
                Err(e) => {
                    warn!("skipping unreadable directory entry: {}", e);
                    continue;
                }
            };
            let path = item.path();
            if !path.is_file() {
                continue;
            }
            let name = item.file_name().to_string_lossy().into_owned();
            if !matcher.is_match(&name) {
                debug!("skipping non-log file {}", name);
                continue;
            }
            let size = match item.metadata() {
                Ok(meta) => format_size(meta.len()),
                Err(e) => {
                    warn!("skipping {}: cannot read metadata: {}", path.display(), e);
                    continue;
                }
            };
            entries.push(LogEntry::new(&name, date_of(&name), size));
        }
        Ok(sorted_or_sentinel(entries))
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// Extract the date suffix of a rotated log filename, or the current-log
/// marker when the name carries no date.
fn date_of(name: &str) -> String {
    let parts: Vec<&str> = name.split(LOG_DATE_SEPARATOR).collect();
    if parts.len() == 2 {
        parts[1].to_string()
    } else {
        CURRENT_LOG.to_string()
    }
}

/// Translate a filename wildcard (`*`, `?`) into an anchored regex.
fn wildcard_matcher(pattern: &str) -> LogResult<Regex> {
    let mut translated = String::with_capacity(pattern.len() + 8);
    translated.push('^');
    for ch in pattern.chars() {
        match ch {
            '*' => translated.push_str(".*"),
            '?' => translated.push('.'),
            _ => translated.push_str(&regex::escape(&ch.to_string())),
        }
    }
    translated.push('$');
    Regex::new(&translated)
        .map_err(|e| LogError::Configuration(format!("invalid log file pattern '{pattern}': {e}")))
}
