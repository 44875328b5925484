//! Admin client construction.

use std::{marker::PhantomData, sync::Arc, time::Duration};

use super::inner::ClientInner;
use crate::{
    Client, Error,
    config::{RetryConfig, Sleeper, TlsConfig, TokioSleeper},
    transport::RestTransport,
};

/// No portal URL given yet.
pub struct NoUrl;

/// Portal URL given.
pub struct HasUrl;

/// No access token given yet.
pub struct NoToken;

/// Access token given.
pub struct HasToken;

/// Builds a [`Client`] for one admin or master portal.
///
/// [`build`](ClientBuilder::build) only exists once both `url()` (the
/// portal, e.g. `https://acme-admin.3scale.net`) and `token()` (a provider
/// or master access token) have been called.
///
/// Everything else is optional:
///
/// - `throws()`: turn non-success responses into errors (default `true`)
/// - `ssl_verify()` / `insecure()` / `tls_config()`: TLS settings
/// - `timeout()`: per-request timeout
/// - `sleeper()`: the sleeper used by retry and polling loops
/// - `readiness()` / `wait_for_tenant()`: tenant readiness polling
///
/// ## Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use threescale::Client;
///
/// # async fn example() -> threescale::Result<()> {
/// let client = Client::builder()
///     .url("https://acme-admin.3scale.net")
///     .token("provider-access-token")
///     .ssl_verify(false)
///     .timeout(Duration::from_secs(30))
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder<UrlState, TokenState> {
    url: Option<String>,
    token: Option<String>,
    throws: bool,
    tls_config: TlsConfig,
    timeout: Option<Duration>,
    sleeper: Arc<dyn Sleeper>,
    readiness: RetryConfig,
    wait_for_tenant: bool,
    _url_state: PhantomData<UrlState>,
    _token_state: PhantomData<TokenState>,
}

impl ClientBuilder<NoUrl, NoToken> {
    /// An empty builder; see [`Client::builder`].
    pub fn new() -> Self {
        Self {
            url: None,
            token: None,
            throws: true,
            tls_config: TlsConfig::default(),
            timeout: None,
            sleeper: Arc::new(TokioSleeper),
            readiness: RetryConfig::tenant_readiness(),
            wait_for_tenant: false,
            _url_state: PhantomData,
            _token_state: PhantomData,
        }
    }
}

impl Default for ClientBuilder<NoUrl, NoToken> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ClientBuilder<NoUrl, T> {
    /// Sets the tenant (or master) base URL.
    ///
    /// A trailing slash is ignored.
    pub fn url(self, url: impl Into<String>) -> ClientBuilder<HasUrl, T> {
        ClientBuilder {
            url: Some(url.into()),
            token: self.token,
            throws: self.throws,
            tls_config: self.tls_config,
            timeout: self.timeout,
            sleeper: self.sleeper,
            readiness: self.readiness,
            wait_for_tenant: self.wait_for_tenant,
            _url_state: PhantomData,
            _token_state: PhantomData,
        }
    }
}

impl<U> ClientBuilder<U, NoToken> {
    /// Sets the access token. It is sent as the `access_token` query
    /// parameter of every admin API call.
    pub fn token(self, token: impl Into<String>) -> ClientBuilder<U, HasToken> {
        ClientBuilder {
            url: self.url,
            token: Some(token.into()),
            throws: self.throws,
            tls_config: self.tls_config,
            timeout: self.timeout,
            sleeper: self.sleeper,
            readiness: self.readiness,
            wait_for_tenant: self.wait_for_tenant,
            _url_state: PhantomData,
            _token_state: PhantomData,
        }
    }
}

impl<U, T> ClientBuilder<U, T> {
    /// Sets whether non-success responses become errors.
    ///
    /// With `false`, framework calls hand the raw response to the envelope
    /// decoder instead; individual requests can still override this.
    #[must_use]
    pub fn throws(mut self, throws: bool) -> Self {
        self.throws = throws;
        self
    }

    /// Enables or disables TLS certificate verification.
    #[must_use]
    pub fn ssl_verify(mut self, verify: bool) -> Self {
        self.tls_config = self.tls_config.with_verification(verify);
        self
    }

    /// Disables TLS certificate verification.
    ///
    /// **WARNING**: only for installations with self-signed certificates.
    #[must_use]
    pub fn insecure(self) -> Self {
        self.ssl_verify(false)
    }

    /// Replaces the certificate settings, e.g. to trust a private CA.
    #[must_use]
    pub fn tls_config(mut self, config: TlsConfig) -> Self {
        self.tls_config = config;
        self
    }

    /// Sets the per-request timeout. No timeout is applied by default.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the sleeper used between retry and polling attempts.
    #[must_use]
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Sets the polling schedule of [`Client::wait_for_tenant`].
    #[must_use]
    pub fn readiness(mut self, config: RetryConfig) -> Self {
        self.readiness = config;
        self
    }

    /// Makes [`build`](ClientBuilder::build) wait until the tenant looks
    /// provisioned, polling on the given schedule.
    #[must_use]
    pub fn wait_for_tenant(mut self, config: RetryConfig) -> Self {
        self.readiness = config;
        self.wait_for_tenant = true;
        self
    }
}

impl ClientBuilder<HasUrl, HasToken> {
    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL is invalid or the TLS
    /// settings cannot be applied. When waiting for the tenant was
    /// requested, transport errors of the readiness probes surface too.
    pub async fn build(self) -> Result<Client, Error> {
        let url = self
            .url
            .ok_or_else(|| Error::configuration("URL is required"))?;
        let token = self
            .token
            .ok_or_else(|| Error::configuration("access token is required"))?;
        if token.trim().is_empty() {
            return Err(Error::configuration("access token must not be empty"));
        }

        let url = url.trim_end_matches('/').to_string();
        let parsed_url = url::Url::parse(&format!("{}/", url))?;
        if !matches!(parsed_url.scheme(), "http" | "https") {
            return Err(Error::configuration(format!(
                "unsupported URL scheme '{}'",
                parsed_url.scheme()
            )));
        }

        let transport = RestTransport::new(
            parsed_url,
            token,
            &self.tls_config,
            self.throws,
            self.timeout,
        )?;

        let client = Client::from_inner(ClientInner {
            url,
            transport,
            tls_config: self.tls_config,
            timeout: self.timeout,
            sleeper: self.sleeper,
            readiness: self.readiness,
        });

        if self.wait_for_tenant {
            let ready = client.wait_for_tenant().await?;
            tracing::info!(url = %client.url(), ready, "tenant readiness checked");
        }

        Ok(client)
    }
}
