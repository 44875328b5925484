//! API client construction.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;

use super::{ApiClient, ApiClientInner, Endpoint};
use crate::application::Application;
use crate::auth::ClientAuth;
use crate::config::{RetryConfig, Sleeper, TlsConfig};
use crate::user_agent;
use crate::Error;

/// How the API client authenticates.
#[derive(Debug, Clone)]
enum AuthSetting {
    /// Resolve the application's credentials on first use.
    Resolve,
    /// Use the given credentials.
    Preset(ClientAuth),
    /// Send requests without credentials.
    Disabled,
}

/// Builder for an [`ApiClient`], obtained from
/// [`Application::api_client`](crate::Application::api_client).
///
/// ## Defaults
///
/// - endpoint: [`Endpoint::Sandbox`] (the staging gateway)
/// - SSL verification: the application's
///   [`api_client_verify`](crate::Application::api_client_verify)
///   preference, else on
/// - retries: [`RetryConfig::default`], i.e. 8 attempts retrying 503 and 404
/// - credentials: resolved from the application on first call
///
/// ## Example
///
/// ```rust,no_run
/// # async fn example(app: threescale::Application) -> threescale::Result<()> {
/// use threescale::api_client::Endpoint;
///
/// // Assert a deliberate 404 instead of retrying it
/// let api = app
///     .api_client()
///     .endpoint(Endpoint::Production)
///     .verify(false)
///     .without_retry_statuses([404])
///     .build()
///     .await?;
/// let response = api.get("/does-not-exist").await?;
/// assert_eq!(response.status_code(), 404);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ApiClientBuilder {
    application: Application,
    endpoint: Endpoint,
    verify: Option<bool>,
    tls_config: TlsConfig,
    retry: RetryConfig,
    sleeper: Option<Arc<dyn Sleeper>>,
    timeout: Option<Duration>,
    auth: AuthSetting,
}

impl ApiClientBuilder {
    pub(crate) fn new(application: Application) -> Self {
        let timeout = application.client().timeout();
        Self {
            application,
            endpoint: Endpoint::default(),
            verify: None,
            tls_config: TlsConfig::default(),
            retry: RetryConfig::default(),
            sleeper: None,
            timeout,
            auth: AuthSetting::Resolve,
        }
    }

    /// Selects the staging or the production gateway.
    #[must_use]
    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Overrides SSL verification for this client.
    #[must_use]
    pub fn verify(mut self, verify: bool) -> Self {
        self.verify = Some(verify);
        self
    }

    /// Sets the TLS configuration, e.g. a client certificate for gateways
    /// behind mutual TLS. Verification still follows [`verify`](Self::verify).
    #[must_use]
    pub fn tls_config(mut self, config: TlsConfig) -> Self {
        self.tls_config = config;
        self
    }

    /// Replaces the retry configuration.
    #[must_use]
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    /// Stops retrying the given statuses.
    #[must_use]
    pub fn without_retry_statuses(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.retry = self.retry.without_statuses(statuses);
        self
    }

    /// Sets the sleeper used between attempts. Defaults to the admin
    /// client's sleeper.
    #[must_use]
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Uses the given credentials instead of resolving the application's.
    #[must_use]
    pub fn auth(mut self, auth: ClientAuth) -> Self {
        self.auth = AuthSetting::Preset(auth);
        self
    }

    /// Sends requests without any credentials.
    #[must_use]
    pub fn without_auth(mut self) -> Self {
        self.auth = AuthSetting::Disabled;
        self
    }

    /// Builds the client.
    ///
    /// Looks up the application's service (fetching the application if it
    /// is not loaded yet). Neither the gateway URL nor the credentials are
    /// resolved here.
    pub async fn build(self) -> Result<ApiClient, Error> {
        let mut application = self.application;
        let proxy = application.service().await?.proxy();

        let verify = self
            .verify
            .or(application.api_client_verify())
            .unwrap_or(true);
        let tls_config = self.tls_config.with_verification(verify);

        let mut http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent::user_agent());
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http = tls_config.apply(http)?.build().map_err(|e| {
            Error::configuration(format!("failed to create HTTP client: {}", e)).with_source(e)
        })?;

        let sleeper = self
            .sleeper
            .unwrap_or_else(|| application.client().sleeper());
        let auth = match self.auth {
            AuthSetting::Resolve => Some(OnceCell::new()),
            AuthSetting::Preset(auth) => Some(OnceCell::new_with(Some(auth))),
            AuthSetting::Disabled => None,
        };

        tracing::debug!(
            application = %application.url(),
            endpoint = self.endpoint.attribute(),
            verify,
            max_attempts = self.retry.max_attempts,
            "created API client"
        );

        Ok(ApiClient {
            inner: Arc::new(ApiClientInner {
                application,
                proxy,
                endpoint: self.endpoint,
                http,
                retry: self.retry,
                sleeper,
                auth,
            }),
        })
    }
}
