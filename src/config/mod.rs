use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::context::{RequestContext, ServiceCatalog, TenantDirectory, SUPER_TENANT_DOMAIN, SUPER_TENANT_ID};
use crate::provider::local::LOG_FILE_PATTERN;
use crate::provider::{LogError, LogResult};

/// Location of the local log directory and the filename convention its
/// entries follow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    /// Directory holding the current server's log files.
    pub directory: PathBuf,

    /// Wildcard matched against log filenames (`*` and `?`).
    pub file_pattern: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./logs"),
            file_pattern: LOG_FILE_PATTERN.to_string(),
        }
    }
}

/// Connection settings for the remote log aggregation server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyslogEndpoint {
    /// Whether remote log collection is enabled for this deployment.
    pub enabled: bool,

    /// Base URL of the aggregation server's log tree.
    pub url: String,

    pub username: String,
    pub password: String,

    /// Port applied when the URL does not name one.
    pub port: u16,

    /// Authentication realm, reported back when credentials are rejected.
    pub realm: String,

    /// Request timeout for index fetches and downloads.
    pub timeout_secs: u64,
}

impl Default for SyslogEndpoint {
    fn default() -> Self {
        Self {
            enabled: false,
            url: String::new(),
            username: String::new(),
            password: String::new(),
            port: 443,
            realm: "syslog".to_string(),
            timeout_secs: 30,
        }
    }
}

impl SyslogEndpoint {
    /// Validate the endpoint before any remote call is attempted.
    pub fn validate(&self) -> Result<(), String> {
        if self.url.is_empty() {
            return Err("syslog server URL is not configured".to_string());
        }
        if self.username.is_empty() {
            return Err("syslog server username is not configured".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("syslog request timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Identity of the current server instance within the deployment.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerSettings {
    /// Key of this server, compared against requested server keys and the
    /// manager key.
    pub server_key: String,

    /// Tenant domain this server instance runs under.
    pub tenant_domain: String,

    /// Server keys belonging to the centrally managed service group.
    pub managed_services: Vec<String>,
}

/// Full configuration, loaded from a YAML file with environment overrides.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub logs: LogSettings,

    #[serde(default)]
    pub syslog: SyslogEndpoint,

    #[serde(default)]
    pub server: ServerSettings,

    /// Known tenant domains and their numeric ids.
    #[serde(default)]
    pub tenants: HashMap<String, i64>,
}

impl Settings {
    /// Load settings from the given file, or from the default location, or
    /// fall back to defaults when no file exists. Environment variables
    /// override file values either way.
    pub fn load(path: Option<&Path>) -> LogResult<Self> {
        let _ = dotenv::dotenv();

        let file = path.map(Path::to_path_buf).or_else(default_config_path);
        let mut settings = match file {
            Some(ref p) if p.exists() => Self::from_file(p)?,
            Some(ref p) if path.is_some() => {
                return Err(LogError::Configuration(format!(
                    "config file not found: {}",
                    p.display()
                )))
            }
            _ => Self::default(),
        };
        settings.apply_env();
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> LogResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            LogError::Configuration(format!("cannot read config {}: {e}", path.display()))
        })?;
        serde_yaml::from_str(&raw).map_err(|e| {
            LogError::Configuration(format!("cannot parse config {}: {e}", path.display()))
        })
    }

    /// Override file values with `LOGVAULT_*` environment variables.
    fn apply_env(&mut self) {
        if let Ok(dir) = env::var("LOGVAULT_LOGS_DIR") {
            self.logs.directory = PathBuf::from(dir);
        }
        if let Ok(pattern) = env::var("LOGVAULT_LOG_PATTERN") {
            self.logs.file_pattern = pattern;
        }
        if let Ok(enabled) = env::var("LOGVAULT_SYSLOG_ENABLED") {
            self.syslog.enabled = enabled.to_lowercase() == "true" || enabled == "1";
        }
        if let Ok(url) = env::var("LOGVAULT_SYSLOG_URL") {
            self.syslog.url = url;
        }
        if let Ok(user) = env::var("LOGVAULT_SYSLOG_USERNAME") {
            self.syslog.username = user;
        }
        if let Ok(password) = env::var("LOGVAULT_SYSLOG_PASSWORD") {
            self.syslog.password = password;
        }
        if let Ok(port) = env::var("LOGVAULT_SYSLOG_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.syslog.port = port;
            }
        }
        if let Ok(timeout) = env::var("LOGVAULT_SYSLOG_TIMEOUT") {
            if let Ok(timeout_secs) = timeout.parse::<u64>() {
                self.syslog.timeout_secs = timeout_secs;
            }
        }
        if let Ok(key) = env::var("LOGVAULT_SERVER_KEY") {
            self.server.server_key = key;
        }
        if let Ok(domain) = env::var("LOGVAULT_TENANT_DOMAIN") {
            self.server.tenant_domain = domain;
        }
    }

    /// Build the request context of the server instance described by this
    /// configuration.
    pub fn request_context(&self) -> LogResult<RequestContext> {
        let tenant_id = self.tenant_id(&self.server.tenant_domain)?;
        Ok(RequestContext::new(
            self.server.tenant_domain.clone(),
            tenant_id,
            self.server.server_key.clone(),
        ))
    }

    /// Copy with secrets blanked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.syslog.password.is_empty() {
            copy.syslog.password = "********".to_string();
        }
        copy
    }
}

impl TenantDirectory for Settings {
    fn tenant_id(&self, domain: &str) -> LogResult<i64> {
        if domain.is_empty() || domain.eq_ignore_ascii_case(SUPER_TENANT_DOMAIN) {
            return Ok(SUPER_TENANT_ID);
        }
        self.tenants
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(domain))
            .map(|(_, id)| *id)
            .ok_or_else(|| LogError::Configuration(format!("unknown tenant domain '{domain}'")))
    }
}

impl ServiceCatalog for Settings {
    fn is_managed_service(&self, server_key: &str) -> LogResult<bool> {
        Ok(self
            .server
            .managed_services
            .iter()
            .any(|key| key.eq_ignore_ascii_case(server_key)))
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("logvault").join("config.yaml"))
}
