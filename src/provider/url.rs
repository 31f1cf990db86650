use crate::context::{RequestContext, ServiceCatalog, MANAGER_SERVICE_KEY};
use crate::provider::{LogError, LogResult};

/// Path separator of the remote log tree.
pub const URL_SEPARATOR: &str = "/";

/// Build the canonical URL under which the aggregation server exposes a log
/// file (or, with an empty `log_file`, a directory index).
///
/// The layout is `<base>/<tenant-id>/<service>/<file>`. Which tenant id and
/// service segment apply depends on who is asking:
///
/// - a super-tenant manager addresses the requested `tenant_id`, routed to
///   `service_name` when given, otherwise to the management service. When
///   the current server is not part of the managed service group, it is
///   routed by its own server key instead;
/// - any other super-tenant caller addresses `tenant_id` under its own
///   server key;
/// - tenant-scoped callers always address their own tenant id, with the
///   same manager/service routing.
pub fn build_log_url(
    base_url: &str,
    log_file: &str,
    tenant_id: i64,
    service_name: Option<&str>,
    ctx: &RequestContext,
    catalog: &dyn ServiceCatalog,
) -> LogResult<String> {
    if base_url.is_empty() {
        return Err(LogError::InvalidEndpoint(
            "syslog server URL is empty".to_string(),
        ));
    }
    let base = base_url.strip_suffix(URL_SEPARATOR).unwrap_or(base_url);
    let dir = |id: i64, leaf: &str| format!("{base}{URL_SEPARATOR}{id}{URL_SEPARATOR}{leaf}{URL_SEPARATOR}");

    let service = service_name.filter(|s| !s.is_empty());
    let path = if ctx.is_super_tenant() {
        if ctx.is_manager() {
            let routed = match service {
                Some(name) => dir(tenant_id, name),
                None => dir(tenant_id, MANAGER_SERVICE_KEY),
            };
            // Standalone deployments route by their own server key even
            // when acting as manager.
            if catalog.is_managed_service(&ctx.server_key)? {
                routed
            } else {
                dir(tenant_id, &ctx.server_key)
            }
        } else {
            dir(tenant_id, &ctx.server_key)
        }
    } else if ctx.is_manager() {
        match service {
            Some(name) => dir(ctx.tenant_id, name),
            None => dir(ctx.tenant_id, MANAGER_SERVICE_KEY),
        }
    } else {
        dir(ctx.tenant_id, &ctx.server_key)
    };

    Ok(format!("{}{}", encode_spaces(&path), encode_spaces(log_file)))
}

/// Percent-encode literal spaces. Only spaces: the remote tree uses no
/// other characters that need escaping.
fn encode_spaces(s: &str) -> String {
    s.replace(' ', "%20")
}
