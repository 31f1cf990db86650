// Module declarations
pub mod file;
pub mod local;
pub mod remote;
pub mod size;
pub mod stream;
pub mod types;
pub mod url;

use async_trait::async_trait;

use crate::download::DownloadPackage;

// Re-export types for convenience
pub use file::FileLogProvider;
pub use local::LocalLogLister;
pub use remote::RemoteLogClient;
pub use size::format_size;
pub use stream::LogStream;
pub use types::{LogEntry, SourceMode};

/// Result type for log provider operations
pub type LogResult<T> = Result<T, LogError>;

/// Errors that can occur while resolving or retrieving logs
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// The caller is not permitted to view the requested index. Distinct
    /// from an empty index and from transport failures.
    #[error("access denied: domain '{domain}' / server '{server_key}' is outside the caller's scope")]
    AccessDenied { domain: String, server_key: String },

    #[error("invalid syslog endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("cannot retrieve '{target}'")]
    Retrieval {
        target: String,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl LogError {
    /// Wrap an underlying I/O or transport failure, keeping the cause chain.
    pub fn retrieval(
        target: impl Into<String>,
        cause: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Retrieval {
            target: target.into(),
            cause: cause.into(),
        }
    }
}

/// Uniform contract for log index resolution and file retrieval,
/// regardless of whether logs live on local disk or on the remote
/// aggregation server.
#[async_trait]
pub trait LogFileProvider: Send + Sync {
    /// Resolve the sorted log index visible to the caller for the given
    /// tenant domain and server key.
    async fn log_index(&self, domain: &str, server_key: &str) -> LogResult<Vec<LogEntry>>;

    /// Retrieve a single log file for a tenant, wrapped in the transport
    /// envelope.
    async fn download(
        &self,
        log_file: &str,
        tenant_domain: &str,
        service_name: Option<&str>,
    ) -> LogResult<DownloadPackage>;
}
