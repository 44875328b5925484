//! The provider side of a tenant: admin users, their permissions and their
//! access tokens.

use serde_json::Value;

use crate::kinds;
use crate::resource::{EntityId, Resource, ResourceClient};
use crate::transport::AdminRequest;
use crate::Error;

use super::account::extract_answer;

/// Every admin portal section a member can be given access to.
pub const ALL_SECTIONS: &[&str] = &[
    "portal",
    "finance",
    "settings",
    "partners",
    "monitoring",
    "plans",
    "policy_registry",
];

impl ResourceClient {
    /// Creates an access token for an admin user:
    /// PUT `/admin/api/providers/<id>/access_tokens`.
    pub async fn create_token(
        &self,
        entity_id: impl Into<EntityId>,
        params: impl Into<Value>,
    ) -> Result<Value, Error> {
        self.ensure_kind(&[&kinds::PROVIDER], "create_token")?;
        let url = format!("{}/access_tokens", self.entity_url(Some(&entity_id.into())));
        tracing::info!(op = "create_token", url = %url, "creating access token");
        let response = self
            .client()
            .request(AdminRequest::put(url).json(params))
            .await?;
        extract_answer(&response)
    }

    /// Replaces the permissions of a provider account member.
    ///
    /// Empty lists are sent as the literal `[]` the platform expects for "no
    /// access".
    pub async fn permissions_update(
        &self,
        entity_id: impl Into<EntityId>,
        allowed_services: &[EntityId],
        allowed_sections: &[&str],
    ) -> Result<Value, Error> {
        self.ensure_kind(&[&kinds::PROVIDER_ACCOUNT_USER], "permissions_update")?;
        let mut form: Vec<(&str, String)> = Vec::new();
        if allowed_services.is_empty() {
            form.push(("allowed_service_ids[]", "[]".to_string()));
        }
        form.extend(
            allowed_services
                .iter()
                .map(|id| ("allowed_service_ids[]", id.to_string())),
        );
        if allowed_sections.is_empty() {
            form.push(("allowed_sections[]", "[]".to_string()));
        }
        form.extend(
            allowed_sections
                .iter()
                .map(|section| ("allowed_sections[]", section.to_string())),
        );

        let url = self.permissions_url(&entity_id.into());
        tracing::info!(op = "permissions_update", url = %url, "changing user permissions");
        self.client()
            .request(AdminRequest::put(url).form(form))
            .await?
            .json()
    }

    /// Grants a member access to every admin portal section.
    pub async fn allow_all_sections(&self, entity_id: impl Into<EntityId>) -> Result<Value, Error> {
        self.permissions_update(entity_id, &[], ALL_SECTIONS).await
    }

    /// Reads the permissions of a provider account member.
    pub async fn permissions_read(&self, entity_id: impl Into<EntityId>) -> Result<Value, Error> {
        self.ensure_kind(&[&kinds::PROVIDER_ACCOUNT_USER], "permissions_read")?;
        let url = self.permissions_url(&entity_id.into());
        self.client().request(AdminRequest::get(url)).await?.json()
    }

    fn permissions_url(&self, entity_id: &EntityId) -> String {
        format!("{}/permissions", self.entity_url(Some(entity_id)))
    }
}

impl Resource {
    /// Creates an access token for this admin user.
    pub async fn create_token(&self, params: impl Into<Value>) -> Result<Value, Error> {
        self.collection()
            .create_token(self.require_id()?.clone(), params)
            .await
    }

    /// Replaces the permissions of this member.
    pub async fn permissions_update(
        &self,
        allowed_services: &[EntityId],
        allowed_sections: &[&str],
    ) -> Result<Value, Error> {
        self.collection()
            .permissions_update(self.require_id()?.clone(), allowed_services, allowed_sections)
            .await
    }

    /// Grants this member access to every section.
    pub async fn allow_all_sections(&self) -> Result<Value, Error> {
        self.collection()
            .allow_all_sections(self.require_id()?.clone())
            .await
    }

    /// Reads the permissions of this member.
    pub async fn permissions_read(&self) -> Result<Value, Error> {
        self.collection()
            .permissions_read(self.require_id()?.clone())
            .await
    }
}
