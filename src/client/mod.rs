//! The top-level admin API client.
//!
//! A [`Client`] is bound to one tenant (or to the master portal) and one
//! access token. It hands out [`ResourceClient`] collection handles for every
//! top-level kind; everything else is reached by navigating from those.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use threescale::Client;
//!
//! # async fn example() -> threescale::Result<()> {
//! let client = Client::builder()
//!     .url("https://acme-admin.3scale.net")
//!     .token("provider-access-token")
//!     .build()
//!     .await?;
//!
//! for service in client.services().list().await? {
//!     println!("{:?}", service.entity_name());
//! }
//! # Ok(())
//! # }
//! ```

mod builder;
mod inner;

pub use builder::{ClientBuilder, HasToken, HasUrl, NoToken, NoUrl};

use std::sync::Arc;

use crate::admin::{Analytics, Webhooks};
use crate::config::{EnvConfig, RetryConfig, Sleeper};
use crate::resource::{Anchor, Resource, ResourceClient, ResourceKind, kinds};
use crate::transport::{AdminRequest, RawResponse};
use crate::Error;

/// The 3scale admin API client.
///
/// ## Thread Safety
///
/// `Client` is `Clone` and thread-safe. Clones share one connection pool.
/// Resource handles obtained from it hold a clone and carry no locks; a
/// single [`Resource`]'s cache is not meant for concurrent mutation.
#[derive(Clone)]
pub struct Client {
    inner: Arc<inner::ClientInner>,
}

impl Client {
    /// Creates a new client builder.
    ///
    /// The builder uses the typestate pattern: `build()` is only available
    /// once both the URL and the access token are set.
    pub fn builder() -> ClientBuilder<NoUrl, NoToken> {
        ClientBuilder::new()
    }

    /// Builds a tenant client from `THREESCALE_PROVIDER_URL`,
    /// `THREESCALE_PROVIDER_TOKEN` and the optional `THREESCALE_SSL_VERIFY`.
    pub async fn from_env() -> Result<Self, Error> {
        Self::from_config(EnvConfig::provider()?).await
    }

    /// Builds a master client from `THREESCALE_MASTER_URL` and
    /// `THREESCALE_MASTER_TOKEN`.
    pub async fn master_from_env() -> Result<Self, Error> {
        Self::from_config(EnvConfig::master()?).await
    }

    async fn from_config(config: EnvConfig) -> Result<Self, Error> {
        Self::builder()
            .url(config.url)
            .token(config.token)
            .ssl_verify(config.ssl_verify)
            .build()
            .await
    }

    pub(crate) fn from_inner(inner: inner::ClientInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    // ========================================================================
    // Settings
    // ========================================================================

    /// Returns the base URL, without a trailing slash.
    pub fn url(&self) -> &str {
        &self.inner.url
    }

    /// Returns `<url>/admin/api`.
    pub fn admin_api_url(&self) -> String {
        self.inner.admin_api_url()
    }

    /// Returns `<url>/master/api`.
    pub fn master_api_url(&self) -> String {
        self.inner.master_api_url()
    }

    /// Returns whether non-success responses become errors by default.
    pub fn throws(&self) -> bool {
        self.inner.transport.throws()
    }

    /// Returns whether TLS certificates are verified.
    pub fn ssl_verify(&self) -> bool {
        !self.inner.tls_config.skip_verification
    }

    /// Returns the TLS configuration.
    pub fn tls_config(&self) -> &crate::TlsConfig {
        &self.inner.tls_config
    }

    /// Returns the request timeout, if any.
    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.inner.timeout
    }

    /// Returns the sleeper shared by retry and polling loops.
    pub fn sleeper(&self) -> Arc<dyn Sleeper> {
        Arc::clone(&self.inner.sleeper)
    }

    /// Returns the tenant readiness schedule.
    pub fn readiness(&self) -> &RetryConfig {
        &self.inner.readiness
    }

    /// Sends a raw admin API request.
    ///
    /// The access token and the `.json` suffix are added by the transport.
    pub async fn request(&self, request: AdminRequest) -> Result<RawResponse, Error> {
        self.inner.transport.send(request).await
    }

    // ========================================================================
    // Collections
    // ========================================================================

    /// Returns the collection of any top-level kind.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for kinds that only exist below a
    /// parent resource; reach those through [`Resource::child`].
    pub fn resource_by_kind(&self, kind: &'static ResourceKind) -> Result<ResourceClient, Error> {
        if kind.anchor() == Anchor::Parent {
            return Err(Error::configuration(format!(
                "{} resources are only reachable below a parent resource",
                kind
            )));
        }
        Ok(ResourceClient::root(self.clone(), kind))
    }

    fn root(&self, kind: &'static ResourceKind) -> ResourceClient {
        ResourceClient::root(self.clone(), kind)
    }

    /// API products.
    pub fn services(&self) -> ResourceClient {
        self.root(&kinds::SERVICE)
    }

    /// Developer accounts.
    pub fn accounts(&self) -> ResourceClient {
        self.root(&kinds::ACCOUNT)
    }

    /// Account plans.
    pub fn account_plans(&self) -> ResourceClient {
        self.root(&kinds::ACCOUNT_PLAN)
    }

    /// Backend APIs.
    pub fn backends(&self) -> ResourceClient {
        self.root(&kinds::BACKEND)
    }

    /// API documentation specs.
    pub fn active_docs(&self) -> ResourceClient {
        self.root(&kinds::ACTIVE_DOC)
    }

    /// Provider admin users.
    pub fn providers(&self) -> ResourceClient {
        self.root(&kinds::PROVIDER)
    }

    /// Tenants (master API).
    pub fn tenants(&self) -> ResourceClient {
        self.root(&kinds::TENANT)
    }

    /// Personal access tokens.
    pub fn access_tokens(&self) -> ResourceClient {
        self.root(&kinds::ACCESS_TOKEN)
    }

    /// Custom policies of the tenant.
    pub fn policy_registry(&self) -> ResourceClient {
        self.root(&kinds::POLICY_REGISTRY)
    }

    /// Custom field definitions.
    pub fn fields_definitions(&self) -> ResourceClient {
        self.root(&kinds::FIELDS_DEFINITION)
    }

    /// Users of the provider account.
    pub fn provider_account_users(&self) -> ResourceClient {
        self.root(&kinds::PROVIDER_ACCOUNT_USER)
    }

    /// Invoices.
    pub fn invoices(&self) -> ResourceClient {
        self.root(&kinds::INVOICE)
    }

    /// Developer portal SSO integrations.
    pub fn dev_portal_auth_providers(&self) -> ResourceClient {
        self.root(&kinds::DEV_PORTAL_AUTH_PROVIDER)
    }

    /// Admin portal SSO integrations.
    pub fn admin_portal_auth_providers(&self) -> ResourceClient {
        self.root(&kinds::ADMIN_PORTAL_AUTH_PROVIDER)
    }

    /// Tenant settings (a singleton).
    pub fn settings(&self) -> ResourceClient {
        self.root(&kinds::SETTINGS)
    }

    /// The provider account itself (a singleton, not yet loaded).
    pub fn provider_account(&self) -> Resource {
        self.root(&kinds::PROVIDER_ACCOUNT).single()
    }

    /// Webhook settings.
    pub fn webhooks(&self) -> Webhooks {
        Webhooks::new(self.root(&kinds::WEBHOOK))
    }

    /// Usage statistics.
    pub fn analytics(&self) -> Analytics {
        Analytics::new(self.clone())
    }

    // ========================================================================
    // Tenant readiness
    // ========================================================================

    /// Polls until the tenant looks provisioned.
    ///
    /// Each probe requires account plans to be readable, at least one
    /// service to be listed and the proxy of the first service to be
    /// readable. Probes never raise on a status; the loop follows
    /// [`readiness`](Self::readiness) and sleeps through the client's
    /// [`Sleeper`].
    ///
    /// Returns `true` once a probe passes and `false` when the schedule runs
    /// out. A fresh tenant's host may refuse connections for a while, so
    /// retriable transport failures count as "not ready" unless the schedule
    /// disables `retry_on_connection_error`; other failures are returned.
    pub async fn wait_for_tenant(&self) -> Result<bool, Error> {
        let schedule = self.readiness().clone();
        for attempt in 1..=schedule.max_attempts {
            match self.tenant_ready().await {
                Ok(true) => {
                    tracing::info!(url = %self.url(), attempt, "tenant is ready");
                    return Ok(true);
                },
                Ok(false) => {},
                Err(e) if schedule.retry_on_connection_error && e.is_retriable() => {
                    tracing::debug!(url = %self.url(), attempt, error = %e, "tenant unreachable");
                },
                Err(e) => return Err(e),
            }
            if attempt < schedule.max_attempts {
                let delay = schedule.delay_for_attempt(attempt);
                tracing::debug!(
                    url = %self.url(),
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "tenant not ready yet"
                );
                self.inner.sleeper.sleep(delay).await;
            }
        }
        tracing::warn!(
            url = %self.url(),
            attempts = schedule.max_attempts,
            "tenant still not ready"
        );
        Ok(false)
    }

    async fn tenant_ready(&self) -> Result<bool, Error> {
        let plans = self
            .request(AdminRequest::get(self.account_plans().url()).throws(false))
            .await?;
        if !plans.is_success() {
            return Ok(false);
        }

        let services = self.services();
        let response = self
            .request(AdminRequest::get(services.url()).throws(false))
            .await?;
        if !response.is_success() {
            return Ok(false);
        }
        let Some(service) = services.wrap_many(response)?.into_iter().next() else {
            return Ok(false);
        };

        let proxy = service.proxy();
        let response = self
            .request(AdminRequest::get(proxy.url()).throws(false))
            .await?;
        Ok(response.is_success())
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("url", &self.inner.url)
            .field("throws", &self.throws())
            .finish_non_exhaustive()
    }
}
