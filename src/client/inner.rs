//! Internal client state.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{RetryConfig, Sleeper, TlsConfig};
use crate::transport::RestTransport;

pub(crate) struct ClientInner {
    /// Tenant (or master) base URL, without a trailing slash.
    pub url: String,

    /// Admin API transport; holds the access token.
    pub transport: RestTransport,

    /// TLS configuration, reused by API clients of this tenant.
    pub tls_config: TlsConfig,

    /// Request timeout.
    pub timeout: Option<Duration>,

    /// Sleeper shared by every retry and polling loop.
    pub sleeper: Arc<dyn Sleeper>,

    /// Schedule used by `wait_for_tenant`.
    pub readiness: RetryConfig,
}

impl ClientInner {
    pub(crate) fn admin_api_url(&self) -> String {
        format!("{}/admin/api", self.url)
    }

    pub(crate) fn master_api_url(&self) -> String {
        format!("{}/master/api", self.url)
    }
}

impl std::fmt::Debug for ClientInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientInner")
            .field("url", &self.url)
            .field("transport", &self.transport)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
