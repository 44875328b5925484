//! Developer accounts and their applications.

use serde_json::{Map, Value, json};

use crate::kinds;
use crate::resource::{EntityId, Resource, ResourceClient};
use crate::transport::{AdminRequest, RawResponse};
use crate::Error;

impl ResourceClient {
    /// Signs up a developer account together with its first user:
    /// POST `/admin/api/signup`.
    pub async fn signup(&self, params: impl Into<Value>) -> Result<Resource, Error> {
        self.ensure_kind(&[&kinds::ACCOUNT], "signup")?;
        self.create(params).await
    }

    /// Changes the account plan of an account.
    pub async fn set_plan(
        &self,
        entity_id: impl Into<EntityId>,
        plan_id: impl Into<EntityId>,
    ) -> Result<Resource, Error> {
        self.ensure_kind(&[&kinds::ACCOUNT], "set_plan")?;
        self.change_plan_at(&entity_id.into(), &plan_id.into()).await
    }

    /// Sends a message to a developer account and returns the decoded answer.
    pub async fn send_message(
        &self,
        entity_id: impl Into<EntityId>,
        body: &str,
        subject: Option<&str>,
    ) -> Result<Value, Error> {
        self.ensure_kind(&[&kinds::ACCOUNT], "send_message")?;
        let mut params = Map::new();
        params.insert("body".to_string(), Value::from(body));
        if let Some(subject) = subject {
            params.insert("subject".to_string(), Value::from(subject));
        }
        let url = format!("{}/messages", self.entity_url(Some(&entity_id.into())));
        tracing::info!(op = "send_message", url = %url, "sending message to account");
        let response = self
            .client()
            .request(AdminRequest::post(url).json(Value::Object(params)))
            .await?;
        extract_answer(&response)
    }

    /// Moves an application to another application plan.
    pub async fn change_plan(
        &self,
        entity_id: impl Into<EntityId>,
        plan_id: impl Into<EntityId>,
    ) -> Result<Resource, Error> {
        self.ensure_kind(&[&kinds::APPLICATION], "change_plan")?;
        self.change_plan_at(&entity_id.into(), &plan_id.into()).await
    }

    /// Gives an application its own copy of its plan.
    pub async fn customize_plan(&self, entity_id: impl Into<EntityId>) -> Result<Resource, Error> {
        self.plan_action(&entity_id.into(), "customize_plan").await
    }

    /// Returns an application from its custom plan to the original one.
    pub async fn decustomize_plan(
        &self,
        entity_id: impl Into<EntityId>,
    ) -> Result<Resource, Error> {
        self.plan_action(&entity_id.into(), "decustomize_plan").await
    }

    async fn change_plan_at(&self, entity_id: &EntityId, plan_id: &EntityId) -> Result<Resource, Error> {
        let url = format!("{}/change_plan", self.entity_url(Some(entity_id)));
        tracing::info!(op = "change_plan", kind = %self.kind(), plan_id = %plan_id, url = %url, "changing plan");
        let response = self
            .client()
            .request(AdminRequest::put(url).json(json!({ "plan_id": plan_id.to_json() })))
            .await?;
        self.wrap(response)
    }

    async fn plan_action(&self, entity_id: &EntityId, action: &str) -> Result<Resource, Error> {
        self.ensure_kind(&[&kinds::APPLICATION], action)?;
        let url = format!("{}/{}", self.entity_url(Some(entity_id)), action);
        tracing::info!(op = action, url = %url, "application plan action");
        let response = self.client().request(AdminRequest::put(url)).await?;
        self.wrap(response)
    }
}

impl Resource {
    /// Applications of an account.
    pub fn applications(&self) -> ResourceClient {
        self.child(&kinds::APPLICATION)
    }

    /// Users of an account.
    pub fn users(&self) -> ResourceClient {
        self.child(&kinds::ACCOUNT_USER)
    }

    /// Keys of an application.
    pub fn keys(&self) -> ResourceClient {
        self.child(&kinds::APPLICATION_KEY)
    }

    /// Referrer filters of an application.
    pub fn referrer_filters(&self) -> ResourceClient {
        self.child(&kinds::REFERRER_FILTER)
    }

    /// Changes the plan of this account.
    pub async fn set_plan(&self, plan_id: impl Into<EntityId>) -> Result<Resource, Error> {
        self.collection().set_plan(self.require_id()?.clone(), plan_id).await
    }

    /// Sends a message to this account.
    pub async fn send_message(&self, body: &str, subject: Option<&str>) -> Result<Value, Error> {
        self.collection()
            .send_message(self.require_id()?.clone(), body, subject)
            .await
    }

    /// Moves this application to another plan.
    pub async fn change_plan(&self, plan_id: impl Into<EntityId>) -> Result<Resource, Error> {
        self.collection()
            .change_plan(self.require_id()?.clone(), plan_id)
            .await
    }

    /// Gives this application its own copy of its plan.
    pub async fn customize_plan(&self) -> Result<Resource, Error> {
        self.collection()
            .customize_plan(self.require_id()?.clone())
            .await
    }

    /// Returns this application to its original plan.
    pub async fn decustomize_plan(&self) -> Result<Resource, Error> {
        self.collection()
            .decustomize_plan(self.require_id()?.clone())
            .await
    }

    /// Stores credit card details for this account. The raw response is
    /// returned as is.
    pub async fn credit_card_set(&self, params: impl Into<Value>) -> Result<RawResponse, Error> {
        let url = self.credit_card_url()?;
        tracing::info!(op = "credit_card_set", url = %url, "setting credit card");
        self.client()
            .request(AdminRequest::put(url).json(params))
            .await
    }

    /// Removes the credit card details of this account.
    pub async fn credit_card_delete(&self) -> Result<RawResponse, Error> {
        let url = self.credit_card_url()?;
        tracing::info!(op = "credit_card_delete", url = %url, "deleting credit card");
        self.client().request(AdminRequest::delete(url)).await
    }

    fn credit_card_url(&self) -> Result<String, Error> {
        self.collection()
            .ensure_kind(&[&kinds::ACCOUNT], "credit card")?;
        Ok(format!("{}/credit_card", self.url()))
    }
}

/// Decodes a response body and unwraps a single-key envelope.
pub(crate) fn extract_answer(response: &RawResponse) -> Result<Value, Error> {
    let value: Value = response.json()?;
    Ok(match value {
        Value::Object(map) if map.len() == 1 => {
            map.into_iter().next().map(|(_, inner)| inner).unwrap_or(Value::Null)
        },
        other => other,
    })
}
