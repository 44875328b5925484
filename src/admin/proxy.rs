//! Gateway configuration: deploys, promoted configurations, policies and
//! OpenID Connect settings.

use serde_json::{Value, json};

use crate::kinds;
use crate::resource::{EntityId, ListRequest, Resource, ResourceClient};
use crate::transport::AdminRequest;
use crate::Error;

/// The default environment configurations are read from.
pub const SANDBOX: &str = "sandbox";
/// The environment configurations are promoted to.
pub const PRODUCTION: &str = "production";

impl Resource {
    /// Deploys the proxy to the staging gateway: POST `<proxy>/deploy`.
    pub async fn deploy(&self) -> Result<Resource, Error> {
        let proxy = self.as_proxy("deploy")?;
        let url = format!("{}/deploy", proxy.url());
        tracing::info!(op = "deploy", url = %url, "deploying proxy to staging");
        let response = self.client().request(AdminRequest::post(url)).await?;
        proxy.collection().wrap(response)
    }

    /// Promoted configurations of the proxy.
    pub fn configs(&self) -> ProxyConfigs {
        ProxyConfigs {
            collection: self.proxy_handle().child(&kinds::PROXY_CONFIG),
        }
    }

    /// Promotes a configuration version between environments.
    pub async fn promote(&self, version: u32, from: &str, to: &str) -> Result<Resource, Error> {
        self.configs().promote(version, from, to).await
    }

    /// The policy chain of the proxy.
    pub fn policies(&self) -> PolicyChain {
        PolicyChain {
            chain: self.proxy_handle().child(&kinds::POLICY_CHAIN).single(),
        }
    }

    /// Reads the OpenID Connect settings of the proxy.
    pub async fn oidc(&self) -> Result<Value, Error> {
        let url = self.oidc_url();
        tracing::debug!(op = "read", kind = %kinds::OIDC_CONFIGURATION, url = %url, "reading OIDC configuration");
        self.client().request(AdminRequest::get(url)).await?.json()
    }

    /// Patches the OpenID Connect settings of the proxy.
    pub async fn oidc_update(&self, params: impl Into<Value>) -> Result<Value, Error> {
        let url = self.oidc_url();
        tracing::info!(op = "update", kind = %kinds::OIDC_CONFIGURATION, url = %url, "patching OIDC configuration");
        self.client()
            .request(AdminRequest::patch(url).json(params))
            .await?
            .json()
    }

    fn oidc_url(&self) -> String {
        self.proxy_handle()
            .child(&kinds::OIDC_CONFIGURATION)
            .url()
    }

    /// The proxy itself, or the proxy of a service.
    fn proxy_handle(&self) -> Resource {
        if self.kind() == &kinds::PROXY {
            self.clone()
        } else {
            self.proxy()
        }
    }

    fn as_proxy(&self, op: &str) -> Result<Resource, Error> {
        self.collection()
            .ensure_kind(&[&kinds::SERVICE, &kinds::PROXY], op)?;
        Ok(self.proxy_handle())
    }
}

// ============================================================================
// Proxy configurations
// ============================================================================

/// Promoted configurations of a proxy (`<proxy>/configs`).
///
/// Configurations are grouped by environment (`sandbox`, `production`) and
/// versioned within each.
///
/// ```rust,no_run
/// # async fn example(client: threescale::Client) -> threescale::Result<()> {
/// let proxy = client.services().read(42).proxy();
/// let latest = proxy.configs().latest("sandbox").await?;
/// let version = latest.attr("version").cloned();
/// proxy.configs().promote(1, "sandbox", "production").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ProxyConfigs {
    collection: ResourceClient,
}

impl ProxyConfigs {
    /// The unscoped collection.
    pub fn collection(&self) -> &ResourceClient {
        &self.collection
    }

    /// Lists the configurations of one environment.
    pub fn list(&self, env: &str) -> ListRequest {
        self.collection.scoped(env).list()
    }

    /// The newest configuration of an environment.
    pub async fn latest(&self, env: &str) -> Result<Resource, Error> {
        let scoped = self.collection.scoped(env);
        let url = format!("{}/latest", scoped.url());
        tracing::info!(op = "latest", env = env, url = %url, "reading latest proxy configuration");
        let response = scoped.client().request(AdminRequest::get(url)).await?;
        scoped.wrap(response)
    }

    /// One configuration version of an environment.
    pub async fn version(&self, version: u32, env: &str) -> Result<Resource, Error> {
        let scoped = self.collection.scoped(env);
        let url = scoped.entity_url(Some(&EntityId::from(version)));
        tracing::info!(op = "version", env = env, version, url = %url, "reading proxy configuration");
        let response = scoped.client().request(AdminRequest::get(url)).await?;
        scoped.wrap(response)
    }

    /// Promotes `version` from one environment to another:
    /// POST `configs/<from>/<version>/promote` with `{"to": <to>}`.
    pub async fn promote(&self, version: u32, from: &str, to: &str) -> Result<Resource, Error> {
        let url = format!("{}/{}/{}/promote", self.collection.url(), from, version);
        tracing::info!(op = "promote", version, from = from, to = to, url = %url, "promoting proxy configuration");
        let response = self
            .collection
            .client()
            .request(AdminRequest::post(url).json(json!({ "to": to })))
            .await?;
        self.collection.wrap(response)
    }
}

// ============================================================================
// Policy chain
// ============================================================================

/// The policy chain of a proxy (`<proxy>/policies`).
///
/// The chain is read and written as a whole: `append` and `insert` fetch the
/// current `policies_config`, edit it locally and PUT the result back.
#[derive(Debug, Clone)]
pub struct PolicyChain {
    chain: Resource,
}

impl PolicyChain {
    /// The chain URL.
    pub fn url(&self) -> String {
        self.chain.url()
    }

    /// Fetches the chain.
    pub async fn read(&self) -> Result<Value, Error> {
        Ok(Value::Object(self.chain.fetch().await?))
    }

    /// Replaces the chain.
    pub async fn update(&self, params: impl Into<Value>) -> Result<Resource, Error> {
        self.chain.collection().update_at(None, params.into()).await
    }

    /// Appends policies at the end of the chain.
    pub async fn append<I>(&self, policies: I) -> Result<Resource, Error>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut params = self.chain.fetch().await?;
        policies_config(&mut params)?.extend(policies);
        self.write_back(params).await
    }

    /// Inserts policies starting at `index`, keeping their order.
    pub async fn insert<I>(&self, index: usize, policies: I) -> Result<Resource, Error>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut params = self.chain.fetch().await?;
        let config = policies_config(&mut params)?;
        for (offset, policy) in policies.into_iter().enumerate() {
            let at = (index + offset).min(config.len());
            config.insert(at, policy);
        }
        self.write_back(params).await
    }

    async fn write_back(
        &self,
        mut params: serde_json::Map<String, Value>,
    ) -> Result<Resource, Error> {
        let service_id = self.service_id().await?;
        params.insert("service_id".to_string(), service_id.to_json());
        self.update(Value::Object(params)).await
    }

    async fn service_id(&self) -> Result<EntityId, Error> {
        if let Some(id) = self.chain.collection().ancestor_id(&kinds::SERVICE) {
            return Ok(id);
        }
        let mut proxy = self
            .chain
            .parent()
            .ok_or_else(|| Error::invalid_argument("policy chain has no proxy"))?;
        proxy
            .get_id("service_id")
            .await?
            .ok_or_else(|| Error::invalid_response("proxy has no service_id attribute"))
    }
}

fn policies_config(params: &mut serde_json::Map<String, Value>) -> Result<&mut Vec<Value>, Error> {
    params
        .entry("policies_config")
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .ok_or_else(|| Error::invalid_response("policies_config is not an array"))
}
