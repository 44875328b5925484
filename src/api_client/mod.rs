//! A resilient HTTP client for an application's proxied API.
//!
//! The gateway needs a moment after configuration changes: a freshly
//! promoted configuration answers 503 until it is loaded, a new mapping rule
//! answers 404 until it propagates. The [`ApiClient`] therefore retries those
//! statuses with exponential backoff and, when the budget runs out, hands the
//! last response back instead of failing.
//!
//! ```text
//! ApiClient::get("/get")
//!   ├─ credentials: resolved once from the application, then cached
//!   ├─ base URL:    fetched from the proxy on every call
//!   └─ attempts:    1s, 2s, 4s, ... between tries, up to 8 tries
//! ```

mod builder;
mod request;

pub use builder::ApiClientBuilder;
pub use request::ApiRequest;

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use reqwest::Method;
use tokio::sync::OnceCell;
use url::Url;

use crate::application::Application;
use crate::auth::ClientAuth;
use crate::config::{RetryConfig, Sleeper};
use crate::resource::Resource;
use crate::transport::{PreparedRequest, RawResponse, map_reqwest_error};
use crate::Error;

/// Longest body prefix written to the debug log.
const LOGGED_BODY_CHARS: usize = 1000;

// ============================================================================
// Endpoint
// ============================================================================

/// Which gateway of the service the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endpoint {
    /// The staging gateway (`sandbox_endpoint`).
    #[default]
    Sandbox,
    /// The production gateway (`endpoint`).
    Production,
}

impl Endpoint {
    /// The proxy attribute holding the gateway URL.
    pub fn attribute(&self) -> &'static str {
        match self {
            Endpoint::Sandbox => "sandbox_endpoint",
            Endpoint::Production => "endpoint",
        }
    }
}

// ============================================================================
// Response
// ============================================================================

/// A response from the proxied API.
///
/// Derefs to [`RawResponse`]. A status outside 2xx is not an error here; the
/// caller decides what it means.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    response: RawResponse,
    request: PreparedRequest,
    attempts: u32,
}

impl ApiResponse {
    /// The request as it was sent, credentials included.
    pub fn request(&self) -> &PreparedRequest {
        &self.request
    }

    /// How many attempts were made.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Unwraps the response.
    pub fn into_raw(self) -> RawResponse {
        self.response
    }
}

impl Deref for ApiResponse {
    type Target = RawResponse;

    fn deref(&self) -> &RawResponse {
        &self.response
    }
}

// ============================================================================
// API Client
// ============================================================================

/// An HTTP client bound to one application.
///
/// Cheap to clone; clones share the connection pool and the resolved
/// credentials. Credentials are resolved at most once per client: if the
/// application's keys rotate, build a new client.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    application: Application,
    proxy: Resource,
    endpoint: Endpoint,
    http: reqwest::Client,
    retry: RetryConfig,
    sleeper: Arc<dyn Sleeper>,
    auth: Option<OnceCell<ClientAuth>>,
}

impl ApiClient {
    /// The application this client calls as.
    pub fn application(&self) -> &Application {
        &self.inner.application
    }

    /// The gateway this client talks to.
    pub fn endpoint(&self) -> Endpoint {
        self.inner.endpoint
    }

    /// The retry configuration.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.inner.retry
    }

    /// Starts a request with any method. `path` is resolved against the
    /// gateway URL the way a browser resolves a link.
    pub fn request(&self, method: Method, path: impl Into<String>) -> ApiRequest<'_> {
        ApiRequest::new(self, method, path.into())
    }

    /// Starts a GET request.
    pub fn get(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::GET, path)
    }

    /// Starts a POST request.
    pub fn post(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::POST, path)
    }

    /// Starts a PUT request.
    pub fn put(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::PUT, path)
    }

    /// Starts a PATCH request.
    pub fn patch(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::PATCH, path)
    }

    /// Starts a DELETE request.
    pub fn delete(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::DELETE, path)
    }

    /// The gateway URL, read from the current proxy configuration.
    pub async fn base_url(&self) -> Result<Url, Error> {
        let attribute = self.inner.endpoint.attribute();
        let proxy = self.inner.proxy.fetch().await?;
        let endpoint = proxy
            .get(attribute)
            .and_then(|v| v.as_str())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::invalid_response(format!("proxy has no {}", attribute)))?;
        Ok(Url::parse(endpoint)?)
    }

    /// The credentials, resolved on first use. `None` when the client was
    /// built without authentication.
    pub async fn auth(&self) -> Result<Option<&ClientAuth>, Error> {
        let Some(cell) = &self.inner.auth else {
            return Ok(None);
        };
        let auth = cell
            .get_or_try_init(|| async {
                let mut application = self.inner.application.clone();
                application.authobj(None, None).await
            })
            .await?;
        Ok(Some(auth))
    }

    pub(crate) async fn prepare(
        &self,
        method: Method,
        path: &str,
    ) -> Result<PreparedRequest, Error> {
        let url = self.base_url().await?.join(path)?;
        Ok(PreparedRequest::new(method, url))
    }

    /// Sends a prepared request, retrying transient failures.
    pub(crate) async fn execute(&self, mut request: PreparedRequest) -> Result<ApiResponse, Error> {
        if let Some(auth) = self.auth().await? {
            auth.apply(&mut request);
        }
        tracing::debug!(curl = %request.to_curl(), "sending API request");

        let retry = &self.inner.retry;
        let mut attempt = 1;
        loop {
            let last_attempt = attempt >= retry.max_attempts;
            match request.to_reqwest(&self.inner.http).send().await {
                Ok(response) => {
                    let response = RawResponse::read(response).await?;
                    if last_attempt || !retry.should_retry_status(response.status_code()) {
                        log_response(&response, attempt);
                        return Ok(ApiResponse {
                            response,
                            request,
                            attempts: attempt,
                        });
                    }
                    tracing::debug!(
                        status = response.status_code(),
                        attempt,
                        url = %request.url(),
                        "retrying transient status"
                    );
                },
                Err(e) => {
                    let error = map_reqwest_error(e);
                    if last_attempt || !retry.retry_on_connection_error || !error.is_retriable() {
                        return Err(error);
                    }
                    tracing::warn!(
                        error = %error,
                        attempt,
                        url = %request.url(),
                        "retrying failed API request"
                    );
                },
            }
            self.inner.sleeper.sleep(retry.delay_for_attempt(attempt)).await;
            attempt += 1;
        }
    }
}

fn log_response(response: &RawResponse, attempts: u32) {
    let body = response.text();
    let truncated: String = body.chars().take(LOGGED_BODY_CHARS).collect();
    tracing::debug!(
        status = response.status_code(),
        headers = ?response.headers(),
        body = %truncated,
        attempts,
        "API response"
    );
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("application", &self.inner.application.url())
            .field("endpoint", &self.inner.endpoint)
            .field("retry", &self.inner.retry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_attribute() {
        assert_eq!(Endpoint::default(), Endpoint::Sandbox);
        assert_eq!(Endpoint::Sandbox.attribute(), "sandbox_endpoint");
        assert_eq!(Endpoint::Production.attribute(), "endpoint");
    }
}
