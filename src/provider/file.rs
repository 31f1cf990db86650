use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{LogSettings, SyslogEndpoint};
use crate::context::{RequestContext, ServiceCatalog, TenantDirectory, SUPER_TENANT_DOMAIN};
use crate::download::DownloadPackage;
use crate::provider::url::build_log_url;
use crate::provider::{
    LocalLogLister, LogEntry, LogError, LogFileProvider, LogResult, LogStream, RemoteLogClient,
    SourceMode,
};

/// Log provider backed by the local log directory and, when remote logging
/// is enabled, the syslog aggregation server.
///
/// Constructed fresh per request from immutable values; holds no state
/// across calls.
pub struct FileLogProvider<C> {
    ctx: RequestContext,
    logs: LogSettings,
    syslog: SyslogEndpoint,
    collaborators: C,
}

impl<C> FileLogProvider<C>
where
    C: TenantDirectory + ServiceCatalog,
{
    pub fn new(ctx: RequestContext, logs: LogSettings, syslog: SyslogEndpoint, collaborators: C) -> Self {
        Self {
            ctx,
            logs,
            syslog,
            collaborators,
        }
    }

    /// Where logs for this request live, derived from the remote logging
    /// flag at call time.
    pub fn source_mode(&self) -> SourceMode {
        if self.syslog.enabled {
            SourceMode::Remote
        } else {
            SourceMode::Local
        }
    }

    /// Index of the logs a tenant service keeps on the aggregation server.
    /// Managers may name another service of their scope.
    pub async fn remote_index(
        &self,
        tenant_id: i64,
        service_name: Option<&str>,
    ) -> LogResult<Vec<LogEntry>> {
        let url = build_log_url(
            &self.syslog.url,
            "",
            tenant_id,
            service_name,
            &self.ctx,
            &self.collaborators,
        )?;
        let client = RemoteLogClient::new(self.syslog.clone())?;
        client.fetch_index(&url).await
    }

    /// Open a byte stream to a named log file. Remote logging takes
    /// precedence; without it, local files are readable by the super
    /// tenant only.
    pub async fn open_stream(
        &self,
        log_file: &str,
        tenant_id: i64,
        service_name: Option<&str>,
    ) -> LogResult<LogStream> {
        match self.source_mode() {
            SourceMode::Remote => {
                let url = build_log_url(
                    &self.syslog.url,
                    log_file,
                    tenant_id,
                    service_name,
                    &self.ctx,
                    &self.collaborators,
                )?;
                let client = RemoteLogClient::new(self.syslog.clone())?;
                let response = client.fetch(&url).await?;
                Ok(LogStream::Remote {
                    name: basename(log_file),
                    response,
                })
            }
            SourceMode::Local => {
                if !self.ctx.is_super_tenant() {
                    return Err(LogError::Configuration(
                        "remote log collection is not configured; local logs are restricted to the super tenant"
                            .to_string(),
                    ));
                }
                let name = basename(log_file);
                let path = self.logs.directory.join(&name);
                let file = tokio::fs::File::open(&path)
                    .await
                    .map_err(|e| LogError::retrieval(log_file, e))?;
                Ok(LogStream::Local { name, file })
            }
        }
    }

    fn authorize(&self, domain: &str, server_key: &str) -> LogResult<()> {
        let domain_granted = (domain.is_empty() && self.ctx.is_super_tenant())
            || domain.eq_ignore_ascii_case(SUPER_TENANT_DOMAIN);
        let server_granted =
            server_key.is_empty() || server_key.eq_ignore_ascii_case(&self.ctx.server_key);
        if domain_granted && server_granted {
            Ok(())
        } else {
            Err(LogError::AccessDenied {
                domain: domain.to_string(),
                server_key: server_key.to_string(),
            })
        }
    }
}

#[async_trait]
impl<C> LogFileProvider for FileLogProvider<C>
where
    C: TenantDirectory + ServiceCatalog,
{
    async fn log_index(&self, domain: &str, server_key: &str) -> LogResult<Vec<LogEntry>> {
        self.authorize(domain, server_key)?;
        match self.source_mode() {
            SourceMode::Remote => self.remote_index(self.ctx.tenant_id, None).await,
            SourceMode::Local => {
                LocalLogLister::new(self.logs.directory.clone(), self.logs.file_pattern.clone())
                    .index()
            }
        }
    }

    async fn download(
        &self,
        log_file: &str,
        tenant_domain: &str,
        service_name: Option<&str>,
    ) -> LogResult<DownloadPackage> {
        let request = Uuid::new_v4();
        debug!(request = %request, file = log_file, domain = tenant_domain, "resolving log download");

        let tenant_id = self.collaborators.tenant_id(tenant_domain)?;
        let stream = self.open_stream(log_file, tenant_id, service_name).await?;
        let package = DownloadPackage::from_stream(stream).await?;

        info!(
            request = %request,
            file = %package.file_name,
            bytes = package.len(),
            "log download packaged"
        );
        Ok(package)
    }
}

/// Bare filename of a possibly path-qualified log file reference.
fn basename(log_file: &str) -> String {
    match Path::new(log_file).file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => log_file.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{RequestContext, SUPER_TENANT_ID};
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::tempdir;

    struct Collaborators {
        tenants: HashMap<String, i64>,
    }

    impl Collaborators {
        fn new() -> Self {
            let mut tenants = HashMap::new();
            tenants.insert("acme.example".to_string(), 7);
            Self { tenants }
        }
    }

    impl TenantDirectory for Collaborators {
        fn tenant_id(&self, domain: &str) -> LogResult<i64> {
            if domain.is_empty() || domain.eq_ignore_ascii_case(SUPER_TENANT_DOMAIN) {
                return Ok(SUPER_TENANT_ID);
            }
            self.tenants
                .get(domain)
                .copied()
                .ok_or_else(|| LogError::Configuration(format!("unknown tenant '{domain}'")))
        }
    }

    impl ServiceCatalog for Collaborators {
        fn is_managed_service(&self, _server_key: &str) -> LogResult<bool> {
            Ok(true)
        }
    }

    fn local_settings(dir: &Path) -> (LogSettings, SyslogEndpoint) {
        let logs = LogSettings {
            directory: dir.to_path_buf(),
            file_pattern: "*.log*".to_string(),
        };
        (logs, SyslogEndpoint::default())
    }

    fn super_provider(dir: &Path) -> FileLogProvider<Collaborators> {
        let (logs, syslog) = local_settings(dir);
        let ctx = RequestContext::new(SUPER_TENANT_DOMAIN, SUPER_TENANT_ID, "gateway");
        FileLogProvider::new(ctx, logs, syslog, Collaborators::new())
    }

    fn tenant_provider(dir: &Path) -> FileLogProvider<Collaborators> {
        let (logs, syslog) = local_settings(dir);
        let ctx = RequestContext::new("acme.example", 7, "gateway");
        FileLogProvider::new(ctx, logs, syslog, Collaborators::new())
    }

    #[tokio::test]
    async fn super_tenant_lists_local_logs() {
        let dir = tempdir().unwrap();
        std::fs::File::create(dir.path().join("server.log"))
            .unwrap()
            .write_all(b"x")
            .unwrap();

        let provider = super_provider(dir.path());
        let entries = provider.log_index("", "").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "server.log");
    }

    #[tokio::test]
    async fn super_domain_name_is_accepted_case_insensitively() {
        let dir = tempdir().unwrap();
        let provider = tenant_provider(dir.path());
        let entries = provider.log_index("SUPER.TENANT", "").await.unwrap();
        assert!(entries[0].is_sentinel());
    }

    #[tokio::test]
    async fn tenant_caller_with_empty_domain_is_denied() {
        let dir = tempdir().unwrap();
        let provider = tenant_provider(dir.path());
        let err = provider.log_index("", "").await.unwrap_err();
        assert!(matches!(err, LogError::AccessDenied { .. }));
    }

    #[tokio::test]
    async fn foreign_domain_is_denied() {
        let dir = tempdir().unwrap();
        let provider = super_provider(dir.path());
        let err = provider.log_index("acme.example", "").await.unwrap_err();
        assert!(matches!(err, LogError::AccessDenied { .. }));
    }

    #[tokio::test]
    async fn foreign_server_key_is_denied() {
        let dir = tempdir().unwrap();
        let provider = super_provider(dir.path());
        let err = provider.log_index("", "reporting").await.unwrap_err();
        assert!(matches!(err, LogError::AccessDenied { .. }));

        // The caller's own server key is accepted, case-insensitively.
        assert!(provider.log_index("", "GATEWAY").await.is_ok());
    }

    #[tokio::test]
    async fn tenant_cannot_read_local_files_without_remote_logging() {
        let dir = tempdir().unwrap();
        std::fs::File::create(dir.path().join("server.log")).unwrap();

        let provider = tenant_provider(dir.path());
        let err = provider
            .open_stream("server.log", 7, None)
            .await
            .unwrap_err();
        assert!(matches!(err, LogError::Configuration(_)));
    }

    #[tokio::test]
    async fn super_tenant_download_strips_directory_prefixes() {
        let dir = tempdir().unwrap();
        std::fs::File::create(dir.path().join("server.log"))
            .unwrap()
            .write_all(b"log body")
            .unwrap();

        let provider = super_provider(dir.path());
        let package = provider
            .download("/var/tmp/../server.log", "", None)
            .await
            .unwrap();
        assert_eq!(package.file_name, "server.log");
        assert_eq!(package.data, b"log body");
        assert_eq!(package.content_type, "application/zip");
    }

    #[tokio::test]
    async fn missing_local_file_is_a_retrieval_error() {
        let dir = tempdir().unwrap();
        let provider = super_provider(dir.path());
        let err = provider.download("absent.log", "", None).await.unwrap_err();
        assert!(matches!(err, LogError::Retrieval { .. }));
    }

    #[test]
    fn source_mode_follows_the_remote_flag() {
        let dir = tempdir().unwrap();
        let provider = super_provider(dir.path());
        assert_eq!(provider.source_mode(), SourceMode::Local);

        let (logs, mut syslog) = local_settings(dir.path());
        syslog.enabled = true;
        let ctx = RequestContext::new(SUPER_TENANT_DOMAIN, SUPER_TENANT_ID, "gateway");
        let provider = FileLogProvider::new(ctx, logs, syslog, Collaborators::new());
        assert_eq!(provider.source_mode(), SourceMode::Remote);
    }
}
