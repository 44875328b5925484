//! Tenants, managed through the master API.

use std::ops::Deref;

use serde_json::{Value, json};

use crate::kinds;
use crate::resource::{EntityId, Resource, ResourceClient};
use crate::transport::AdminRequest;
use crate::{Client, Error};

/// A tenant (provider account) as seen from the master API.
///
/// Tenant payloads nest everything below `signup`: the id is at
/// `signup.account.id`, the admin portal at `signup.account.admin_base_url`
/// and, right after creation, the admin access token at
/// `signup.access_token.value`.
///
/// ## Example
///
/// ```rust,no_run
/// # async fn example(master: threescale::Client) -> threescale::Result<()> {
/// let tenant = master
///     .create_tenant(serde_json::json!({
///         "org_name": "acme",
///         "username": "admin",
///         "email": "admin@acme.test",
///         "password": "secret",
///     }))
///     .await?;
///
/// // A new tenant takes a while to be provisioned.
/// if tenant.wait_tenant_ready().await? {
///     let admin = tenant.admin_api(true).await?;
///     let services = admin.services().list().await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Tenant {
    resource: Resource,
}

impl Tenant {
    /// Wraps a loaded tenant resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource is not loaded or carries no `signup`
    /// section.
    pub fn from_resource(resource: Resource) -> Result<Self, Error> {
        if resource.pointer("/signup/account").is_none() {
            return Err(Error::invalid_response(
                "tenant payload has no signup.account section",
            ));
        }
        Ok(Self { resource })
    }

    /// The underlying resource.
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Unwraps the underlying resource.
    pub fn into_resource(self) -> Resource {
        self.resource
    }

    /// The admin portal URL of the tenant.
    pub fn admin_base_url(&self) -> Option<&str> {
        self.resource
            .pointer("/signup/account/admin_base_url")
            .and_then(Value::as_str)
    }

    /// The admin access token. Only present in the creation answer.
    pub fn admin_token(&self) -> Option<&str> {
        self.resource
            .pointer("/signup/access_token/value")
            .and_then(Value::as_str)
    }

    /// Builds a client for the tenant's own admin API.
    ///
    /// The new client shares the sleeper, readiness schedule and `throws`
    /// setting of the master client.
    pub async fn admin_api(&self, ssl_verify: bool) -> Result<Client, Error> {
        let url = self
            .admin_base_url()
            .ok_or_else(|| Error::invalid_response("tenant has no admin_base_url"))?;
        let token = self.admin_token().ok_or_else(|| {
            Error::configuration("tenant has no admin access token; it is only returned on creation")
        })?;
        let master = self.resource.client();
        Client::builder()
            .url(url)
            .token(token)
            .ssl_verify(ssl_verify)
            .throws(master.throws())
            .sleeper(master.sleeper())
            .readiness(master.readiness().clone())
            .build()
            .await
    }

    /// Polls the tenant's admin API until it looks provisioned.
    ///
    /// `true` means there is a good chance the tenant is ready; `false`
    /// means the readiness schedule ran out first. SSL verification is off
    /// for these probes.
    pub async fn wait_tenant_ready(&self) -> Result<bool, Error> {
        self.admin_api(false).await?.wait_for_tenant().await
    }

    /// Triggers billing for the whole tenant.
    pub async fn trigger_billing(&self, date: &str) -> Result<bool, Error> {
        self.resource
            .collection()
            .trigger_billing(self.resource.require_id()?.clone(), date)
            .await
    }

    /// Triggers billing for one account of the tenant.
    pub async fn trigger_billing_account(
        &self,
        account_id: impl Into<EntityId>,
        date: &str,
    ) -> Result<bool, Error> {
        self.resource
            .collection()
            .trigger_billing_account(self.resource.require_id()?.clone(), account_id, date)
            .await
    }
}

impl Deref for Tenant {
    type Target = Resource;

    fn deref(&self) -> &Resource {
        &self.resource
    }
}

impl TryFrom<Resource> for Tenant {
    type Error = Error;

    fn try_from(resource: Resource) -> Result<Self, Error> {
        Self::from_resource(resource)
    }
}

impl ResourceClient {
    /// Triggers billing for a whole tenant:
    /// POST `/master/api/providers/<id>/billing_jobs`. Returns whether the
    /// call succeeded.
    pub async fn trigger_billing(
        &self,
        tenant_id: impl Into<EntityId>,
        date: &str,
    ) -> Result<bool, Error> {
        self.ensure_kind(&[&kinds::TENANT], "trigger_billing")?;
        let url = format!("{}/billing_jobs", self.entity_url(Some(&tenant_id.into())));
        self.post_billing_job(url, date).await
    }

    /// Triggers billing for one account of a tenant.
    pub async fn trigger_billing_account(
        &self,
        tenant_id: impl Into<EntityId>,
        account_id: impl Into<EntityId>,
        date: &str,
    ) -> Result<bool, Error> {
        self.ensure_kind(&[&kinds::TENANT], "trigger_billing_account")?;
        let account_id = account_id.into();
        let url = format!(
            "{}/accounts/{}/billing_jobs",
            self.entity_url(Some(&tenant_id.into())),
            urlencoding::encode(account_id.as_str())
        );
        self.post_billing_job(url, date).await
    }

    async fn post_billing_job(&self, url: String, date: &str) -> Result<bool, Error> {
        tracing::info!(op = "trigger_billing", url = %url, date = date, "triggering billing");
        let response = self
            .client()
            .request(AdminRequest::post(url).json(json!({ "date": date })))
            .await?;
        Ok(response.is_success())
    }
}

impl Client {
    /// Creates a tenant (master API).
    pub async fn create_tenant(&self, params: impl Into<Value>) -> Result<Tenant, Error> {
        Tenant::from_resource(self.tenants().create(params).await?)
    }

    /// Reads a tenant. Unlike other reads this fetches immediately, because
    /// the tenant id and URLs live inside the payload.
    pub async fn tenant(&self, tenant_id: impl Into<EntityId>) -> Result<Tenant, Error> {
        let mut resource = self.tenants().read(tenant_id);
        resource.entity().await?;
        Tenant::from_resource(resource)
    }
}
