//! Applications and the credentials they use against their service.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::api_client::{ApiClientBuilder, ApiResponse};
use crate::auth::{AuthContext, AuthFactory, AuthMode, AuthRegistry, ClientAuth, CredentialsLocation};
use crate::resource::{Entity, Resource, kinds};
use crate::Error;

/// An application: a developer account's subscription to a service plan.
///
/// Wraps the application [`Resource`] (and derefs to it) and adds what is
/// needed to call the service's gateway as that application: resolving its
/// credentials ([`authobj`](Self::authobj)) and building an
/// [`ApiClient`](crate::ApiClient).
///
/// ## Example
///
/// ```rust,no_run
/// use threescale::Application;
///
/// # async fn example(client: threescale::Client) -> threescale::Result<()> {
/// let resource = client.accounts().read(3).applications().read(9);
/// let mut app = Application::try_from(resource)?;
///
/// let api = app.api_client().build().await?;
/// let response = api.get("/get").await?;
/// assert_eq!(response.status_code(), 200);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Application {
    resource: Resource,
    registry: AuthRegistry,
    api_client_verify: Option<bool>,
}

impl TryFrom<Resource> for Application {
    type Error = Error;

    fn try_from(resource: Resource) -> Result<Self, Error> {
        resource
            .collection()
            .ensure_kind(&[&kinds::APPLICATION], "Application")?;
        Ok(Self {
            resource,
            registry: AuthRegistry::default(),
            api_client_verify: None,
        })
    }
}

impl Deref for Application {
    type Target = Resource;

    fn deref(&self) -> &Resource {
        &self.resource
    }
}

impl DerefMut for Application {
    fn deref_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }
}

impl Application {
    /// Returns the wrapped resource.
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Unwraps the resource.
    pub fn into_resource(self) -> Resource {
        self.resource
    }

    /// The service the application is bound to, not yet loaded.
    pub async fn service(&mut self) -> Result<Resource, Error> {
        let service_id = self
            .resource
            .get_id("service_id")
            .await?
            .ok_or_else(|| Error::invalid_response("application has no service_id"))?;
        Ok(self.resource.client().services().read(service_id))
    }

    /// The auth factories consulted by [`authobj`](Self::authobj).
    pub fn registry(&self) -> &AuthRegistry {
        &self.registry
    }

    /// Registers (or replaces) the factory of an auth mode for this
    /// application.
    pub fn register_auth(&mut self, mode: impl Into<AuthMode>, factory: Arc<dyn AuthFactory>) {
        self.registry.register(mode.into(), factory);
    }

    /// Resolves the credentials of the application.
    ///
    /// The mode defaults to the service's `backend_version` and the location
    /// to the proxy's `credentials_location`.
    ///
    /// # Errors
    ///
    /// A configuration error for a mode without a registered factory (this
    /// is checked before the proxy is read) or for an unknown credentials
    /// location.
    pub async fn authobj(
        &mut self,
        mode: Option<AuthMode>,
        location: Option<CredentialsLocation>,
    ) -> Result<ClientAuth, Error> {
        let mut service = self.service().await?;
        let mode = match mode {
            Some(mode) => mode,
            None => service
                .get_str("backend_version")
                .await?
                .map(|version| AuthMode::from_backend_version(&version))
                .ok_or_else(|| Error::invalid_response("service has no backend_version"))?,
        };
        let factory = self.registry.resolve(&mode)?;

        let proxy = service.proxy().fetch().await?;
        let location = match location {
            Some(location) => location,
            None => credentials_location(&proxy)?,
        };

        let app_entity = self.resource.entity().await?.clone();
        tracing::debug!(
            op = "authobj",
            mode = %mode,
            location = %location,
            url = %self.resource.url(),
            "resolving application credentials"
        );
        let ctx = AuthContext::new(self.resource.clone(), app_entity, proxy, location);
        factory.create(&ctx).await
    }

    /// The default SSL verification of API clients built from this
    /// application; `None` keeps the library default.
    pub fn api_client_verify(&self) -> Option<bool> {
        self.api_client_verify
    }

    /// Changes the default SSL verification of API clients.
    pub fn set_api_client_verify(&mut self, verify: Option<bool>) {
        self.api_client_verify = verify;
    }

    /// Starts building an API client bound to this application.
    pub fn api_client(&self) -> ApiClientBuilder {
        ApiClientBuilder::new(self.clone())
    }

    /// Sends the integration test request: a GET of `relpath`, or of the
    /// proxy's `api_test_path` when `None`, through a fresh API client.
    pub async fn test_request(
        &mut self,
        relpath: Option<&str>,
        verify: Option<bool>,
    ) -> Result<ApiResponse, Error> {
        let relpath = match relpath {
            Some(relpath) => relpath.to_string(),
            None => {
                let proxy = self.service().await?.proxy().fetch().await?;
                proxy
                    .get("api_test_path")
                    .and_then(|v| v.as_str())
                    .unwrap_or("/")
                    .to_string()
            },
        };
        let mut builder = self.api_client();
        if let Some(verify) = verify {
            builder = builder.verify(verify);
        }
        builder.build().await?.get(relpath).await
    }
}

fn credentials_location(proxy: &Entity) -> Result<CredentialsLocation, Error> {
    proxy
        .get("credentials_location")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::invalid_response("proxy has no credentials_location"))?
        .parse()
}

impl Resource {
    /// Wraps an application resource into an [`Application`].
    pub fn into_application(self) -> Result<Application, Error> {
        Application::try_from(self)
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod wiremock_tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::auth::AuthFuture;
    use crate::test_util::client_for;
    use crate::{Client, ErrorKind};

    async fn mount_app(server: &MockServer, backend_version: &str, location: &str) {
        Mock::given(method("GET"))
            .and(path("/admin/api/accounts/3/applications/9.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "application": {
                    "id": 9,
                    "service_id": 2,
                    "user_key": "uk-123",
                    "application_id": "app-1"
                }
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/admin/api/services/2.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "service": {"id": 2, "backend_version": backend_version}
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/admin/api/services/2/proxy.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "proxy": {
                    "credentials_location": location,
                    "auth_user_key": "user_key",
                    "auth_app_id": "app_id",
                    "auth_app_key": "app_key",
                    "api_test_path": "/status"
                }
            })))
            .mount(server)
            .await;
    }

    fn application(client: &Client) -> Application {
        client
            .accounts()
            .read(3)
            .applications()
            .read(9)
            .into_application()
            .unwrap()
    }

    #[tokio::test]
    async fn test_user_key_credentials() {
        let server = MockServer::start().await;
        mount_app(&server, "1", "query").await;

        let client = client_for(&server).await;
        let mut app = application(&client);
        let auth = app.authobj(None, None).await.unwrap();
        assert_eq!(auth.location(), CredentialsLocation::Query);
        assert_eq!(
            auth.credentials(),
            &[("user_key".to_string(), "uk-123".to_string())]
        );
    }

    #[tokio::test]
    async fn test_app_id_key_credentials() {
        let server = MockServer::start().await;
        mount_app(&server, "2", "authorization").await;
        Mock::given(method("GET"))
            .and(path("/admin/api/accounts/3/applications/9/keys.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "keys": [{"key": {"value": "secret-1"}}, {"key": {"value": "secret-2"}}]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let mut app = application(&client);
        let auth = app.authobj(None, None).await.unwrap();
        assert_eq!(auth.location(), CredentialsLocation::Authorization);
        assert_eq!(
            auth.credentials(),
            &[
                ("app_id".to_string(), "app-1".to_string()),
                ("app_key".to_string(), "secret-1".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_explicit_mode_and_location() {
        let server = MockServer::start().await;
        mount_app(&server, "2", "query").await;

        let client = client_for(&server).await;
        let mut app = application(&client);
        let auth = app
            .authobj(Some(AuthMode::UserKey), Some(CredentialsLocation::Headers))
            .await
            .unwrap();
        assert_eq!(auth.location(), CredentialsLocation::Headers);
        assert_eq!(auth.credentials()[0].1, "uk-123");
    }

    #[tokio::test]
    async fn test_unknown_mode_is_configuration_error() {
        let server = MockServer::start().await;
        mount_app(&server, "oidc", "query").await;

        let client = client_for(&server).await;
        let mut app = application(&client);
        let err = app.authobj(None, None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(
            err.message(),
            "Unknown credentials for configuration oidc"
        );
    }

    #[tokio::test]
    async fn test_unknown_location_is_configuration_error() {
        let server = MockServer::start().await;
        mount_app(&server, "1", "cookie").await;

        let client = client_for(&server).await;
        let mut app = application(&client);
        let err = app.authobj(None, None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[derive(Debug)]
    struct BearerFactory;

    impl AuthFactory for BearerFactory {
        fn create<'a>(&'a self, ctx: &'a AuthContext) -> AuthFuture<'a> {
            Box::pin(async move {
                let token = ctx.app_str("application_id")?;
                Ok(ClientAuth::new(
                    ctx.location(),
                    [("Authorization", format!("Bearer {}", token))],
                ))
            })
        }
    }

    #[tokio::test]
    async fn test_registered_factory() {
        let server = MockServer::start().await;
        mount_app(&server, "oidc", "headers").await;

        let client = client_for(&server).await;
        let mut app = application(&client);
        app.register_auth("oidc", Arc::new(BearerFactory));
        let auth = app.authobj(None, None).await.unwrap();
        assert_eq!(
            auth.credentials(),
            &[("Authorization".to_string(), "Bearer app-1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_service_lookup() {
        let server = MockServer::start().await;
        mount_app(&server, "1", "query").await;

        let client = client_for(&server).await;
        let mut app = application(&client);
        let mut service = app.service().await.unwrap();
        assert!(service.url().ends_with("/admin/api/services/2"));
        assert_eq!(
            service.get_str("backend_version").await.unwrap().as_deref(),
            Some("1")
        );
    }
}
