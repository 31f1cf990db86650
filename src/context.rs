use serde::{Deserialize, Serialize};

use crate::provider::LogError;

/// Tenant id of the privileged default tenant with cross-tenant visibility.
pub const SUPER_TENANT_ID: i64 = -1000;

/// Domain name of the super tenant. Compared case-insensitively.
pub const SUPER_TENANT_DOMAIN: &str = "super.tenant";

/// Server key of the management service, which may view logs across the
/// services of its tenant scope.
pub const MANAGER_SERVICE_KEY: &str = "manager";

/// Role of the calling server within the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Manager,
    Service,
}

/// Identity and deployment context of the caller, resolved externally and
/// passed into every operation. Read-only for the duration of a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    pub tenant_domain: String,
    pub tenant_id: i64,
    pub role: Role,
    /// Key of the server instance handling this request.
    pub server_key: String,
}

impl RequestContext {
    /// Build a context, deriving the role from the server key: the
    /// management service is identified by its well-known key.
    pub fn new(tenant_domain: impl Into<String>, tenant_id: i64, server_key: impl Into<String>) -> Self {
        let server_key = server_key.into();
        let role = if server_key.eq_ignore_ascii_case(MANAGER_SERVICE_KEY) {
            Role::Manager
        } else {
            Role::Service
        };
        Self {
            tenant_domain: tenant_domain.into(),
            tenant_id,
            role,
            server_key,
        }
    }

    pub fn is_super_tenant(&self) -> bool {
        self.tenant_id == SUPER_TENANT_ID
    }

    pub fn is_manager(&self) -> bool {
        self.role == Role::Manager
    }
}

/// Resolves tenant domains to tenant ids.
pub trait TenantDirectory: Send + Sync {
    /// Look up the numeric id for a tenant domain. The empty domain and the
    /// super-tenant domain both resolve to the super tenant.
    fn tenant_id(&self, domain: &str) -> Result<i64, LogError>;
}

/// Answers whether a server key belongs to the centrally managed service
/// group. Standalone deployments are routed by their own server key.
pub trait ServiceCatalog: Send + Sync {
    fn is_managed_service(&self, server_key: &str) -> Result<bool, LogError>;
}
