use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::provider::{LogResult, LogStream};

/// Content type declared on every packaged log download. Fixed by the
/// transport convention regardless of the actual log format.
pub const DOWNLOAD_CONTENT_TYPE: &str = "application/zip";

/// Transport envelope for a retrieved log file.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadPackage {
    pub file_name: String,
    pub content_type: String,
    pub downloaded_at: DateTime<Utc>,
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl DownloadPackage {
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: DOWNLOAD_CONTENT_TYPE.to_string(),
            downloaded_at: Utc::now(),
            data,
        }
    }

    /// Drain an open log stream into an envelope. The stream is consumed
    /// and released whether or not the read succeeds.
    pub async fn from_stream(stream: LogStream) -> LogResult<Self> {
        let file_name = stream.name().to_string();
        let data = stream.into_bytes().await?;
        Ok(Self::new(file_name, data))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
