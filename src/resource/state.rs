//! State transitions and plan defaults.
//!
//! Both are PUTs on a sub-path of the entity URL. The state name is sent
//! as given and the server alone decides whether a transition is legal; a
//! refused one comes back as an ordinary API error.

use serde_json::Value;

use super::{EntityId, Resource, ResourceClient};
use crate::Error;
use crate::transport::AdminRequest;

impl ResourceClient {
    /// Moves a resource to `state`: PUT `<entity_url>/<state>`.
    ///
    /// ```rust,no_run
    /// # async fn example(client: threescale::Client) -> threescale::Result<()> {
    /// let account = client.accounts().set_state(17, "approve").await?;
    /// assert_eq!(account.attr_str("state"), Some("approved"));
    /// # Ok(())
    /// # }
    /// ```
    pub async fn set_state(
        &self,
        entity_id: impl Into<EntityId>,
        state: &str,
    ) -> Result<Resource, Error> {
        self.set_state_at(Some(&entity_id.into()), state).await
    }

    pub(crate) async fn set_state_at(
        &self,
        entity_id: Option<&EntityId>,
        state: &str,
    ) -> Result<Resource, Error> {
        let url = format!("{}/{}", self.entity_url(entity_id), state);
        tracing::info!(op = "set_state", kind = %self.kind(), state = state, url = %url, "state transition");
        let response = self.client().request(AdminRequest::put(url)).await?;
        self.wrap(response)
    }

    /// Marks a plan as the default of its collection: PUT `<entity_url>/default`.
    pub async fn set_default(&self, entity_id: impl Into<EntityId>) -> Result<Resource, Error> {
        self.set_default_at(Some(&entity_id.into())).await
    }

    pub(crate) async fn set_default_at(
        &self,
        entity_id: Option<&EntityId>,
    ) -> Result<Resource, Error> {
        if !self.kind().is_plan() {
            return Err(Error::invalid_argument(format!(
                "{} is not a plan kind",
                self.kind()
            )));
        }
        let url = format!("{}/default", self.entity_url(entity_id));
        tracing::info!(op = "set_default", kind = %self.kind(), url = %url, "set default plan");
        let response = self.client().request(AdminRequest::put(url)).await?;
        self.wrap(response)
    }

    /// Returns the first listed plan whose `default` flag is `true`.
    pub async fn get_default(&self) -> Result<Option<Resource>, Error> {
        Ok(self
            .select(Resource::is_default)
            .await?
            .into_iter()
            .next())
    }
}

impl Resource {
    /// Moves this resource to `state` and returns the new server state.
    pub async fn set_state(&self, state: &str) -> Result<Resource, Error> {
        self.collection()
            .set_state_at(self.entity_id(), state)
            .await
    }

    /// Marks this plan as the default one.
    pub async fn set_default(&self) -> Result<Resource, Error> {
        self.collection().set_default_at(self.entity_id()).await
    }

    /// Returns `true` if the cached `default` attribute is `true`.
    pub fn is_default(&self) -> bool {
        self.attr("default") == Some(&Value::Bool(true))
    }
}

macro_rules! state_transitions {
    ($($(#[$doc:meta])* $name:ident => $state:literal;)*) => {
        impl ResourceClient {
            $(
                $(#[$doc])*
                pub async fn $name(&self, entity_id: impl Into<EntityId>) -> Result<Resource, Error> {
                    self.set_state(entity_id, $state).await
                }
            )*
        }

        impl Resource {
            $(
                $(#[$doc])*
                pub async fn $name(&self) -> Result<Resource, Error> {
                    self.set_state($state).await
                }
            )*
        }
    };
}

state_transitions! {
    /// Approves a pending account.
    approve => "approve";
    /// Rejects a pending account.
    reject => "reject";
    /// Moves an account back to pending.
    make_pending => "make_pending";
    /// Accepts a pending application.
    accept => "accept";
    /// Suspends an application or user.
    suspend => "suspend";
    /// Resumes a suspended application or user.
    resume => "resume";
    /// Lifts a user suspension.
    unsuspend => "unsuspend";
    /// Activates a pending user.
    activate => "activate";
    /// Grants a developer account user the admin role.
    set_as_admin => "set_as_admin";
    /// Grants a developer account user the member role.
    set_as_member => "set_as_member";
    /// Grants a provider account user the admin role.
    set_role_admin => "admin";
    /// Grants a provider account user the member role.
    set_role_member => "member";
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod wiremock_tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::ErrorKind;
    use crate::test_util::client_for;

    #[tokio::test]
    async fn test_approve_puts_state_path() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/admin/api/accounts/17/approve.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "account": {"id": 17, "org_name": "acme", "state": "approved"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let account = client.accounts().approve(17).await.unwrap();
        assert_eq!(account.attr_str("state"), Some("approved"));
    }

    #[tokio::test]
    async fn test_resource_suspend() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/admin/api/accounts/3/applications/9/suspend.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "application": {"id": 9, "state": "suspended"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let app = client.accounts().read(3).applications().read(9);
        let suspended = app.suspend().await.unwrap();
        assert_eq!(suspended.attr_str("state"), Some("suspended"));
    }

    #[tokio::test]
    async fn test_any_state_is_sent_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/admin/api/services/5/publish.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "service": {"id": 5, "state": "published"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let service = client.services().set_state(5, "publish").await.unwrap();
        assert_eq!(service.attr_str("state"), Some("published"));
    }

    #[tokio::test]
    async fn test_server_decides_illegal_transition() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/admin/api/services/1/approve.json"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_string(r#"{"errors":{"base":["cannot transition"]}}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.services().approve(1).await.unwrap_err();
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.kind(), ErrorKind::Unprocessable);
        assert!(err.body().unwrap().contains("cannot transition"));
    }

    #[tokio::test]
    async fn test_server_refusal_is_an_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/admin/api/accounts/4/reject.json"))
            .respond_with(ResponseTemplate::new(422).set_body_string("{\"errors\":{}}"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.accounts().reject(4).await.unwrap_err();
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.kind(), ErrorKind::Unprocessable);
    }

    #[tokio::test]
    async fn test_set_and_get_default_plan() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/admin/api/services/2/application_plans/8/default.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "application_plan": {"id": 8, "system_name": "gold", "default": true}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/admin/api/services/2/application_plans.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "plans": [
                    {"application_plan": {"id": 7, "system_name": "basic", "default": false}},
                    {"application_plan": {"id": 8, "system_name": "gold", "default": true}}
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let plans = client.services().read(2).app_plans();
        let plan = plans.set_default(8).await.unwrap();
        assert!(plan.is_default());

        let found = plans.get_default().await.unwrap().unwrap();
        assert_eq!(found.entity_id().unwrap().as_str(), "8");
    }

    #[tokio::test]
    async fn test_get_default_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/api/account_plans.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "plans": [{"account_plan": {"id": 1, "default": false}}]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(client.account_plans().get_default().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_default_on_non_plan_kind() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;
        let err = client.services().set_default(1).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
