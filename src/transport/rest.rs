//! Admin API transport using reqwest.
//!
//! Every call made by the resource framework goes through
//! [`RestTransport::send`]: the access token is appended as a query
//! parameter, `.json` is appended to the URL, and non-success responses are
//! either turned into an API error or handed back untouched, depending on
//! `throws`.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use serde_json::Value;
use url::Url;

use super::{RawResponse, map_reqwest_error};
use crate::config::TlsConfig;
use crate::user_agent;
use crate::Error;

// ============================================================================
// Admin Request
// ============================================================================

/// Where an [`AdminRequest`] is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// An absolute URL (without the `.json` suffix).
    Url(String),
    /// A path joined onto the transport's base URL.
    Path(String),
}

/// Body of an [`AdminRequest`].
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// A JSON document.
    Json(Value),
    /// `application/x-www-form-urlencoded` pairs; names may repeat.
    Form(Vec<(String, String)>),
}

/// A single admin API call.
///
/// ## Example
///
/// ```rust
/// use threescale::transport::AdminRequest;
///
/// let request = AdminRequest::get("https://tenant-admin.example.com/admin/api/services")
///     .param("page", 2)
///     .throws(false);
/// assert_eq!(request.method(), &reqwest::Method::GET);
/// ```
#[derive(Debug, Clone)]
pub struct AdminRequest {
    method: Method,
    target: Target,
    params: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<Body>,
    throws: Option<bool>,
}

impl AdminRequest {
    /// Creates a request against an absolute URL.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            target: Target::Url(url.into()),
            params: Vec::new(),
            headers: Vec::new(),
            body: None,
            throws: None,
        }
    }

    /// Creates a request against a path relative to the tenant URL.
    pub fn path(method: Method, path: impl Into<String>) -> Self {
        Self {
            target: Target::Path(path.into()),
            ..Self::new(method, String::new())
        }
    }

    /// Creates a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// Creates a POST request.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// Creates a PUT request.
    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    /// Creates a PATCH request.
    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(Method::PATCH, url)
    }

    /// Creates a DELETE request.
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    /// Adds several query parameters.
    #[must_use]
    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.to_string())));
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn json(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(Body::Json(body.into()));
        self
    }

    /// Sets a form-encoded body.
    #[must_use]
    pub fn form<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let pairs = pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.body = Some(Body::Form(pairs));
        self
    }

    /// Overrides the client's `throws` setting for this call.
    #[must_use]
    pub fn throws(mut self, throws: bool) -> Self {
        self.throws = Some(throws);
        self
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the target.
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Returns the query parameters added so far.
    pub fn query(&self) -> &[(String, String)] {
        &self.params
    }

    /// Returns the body, if any.
    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }
}

// ============================================================================
// REST Transport
// ============================================================================

/// Admin API transport.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct RestTransport {
    client: reqwest::Client,
    base_url: Url,
    token: Arc<str>,
    throws: bool,
}

impl std::fmt::Debug for RestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestTransport")
            .field("base_url", &self.base_url.as_str())
            .field("throws", &self.throws)
            .finish_non_exhaustive()
    }
}

impl RestTransport {
    /// Creates a new transport for the tenant at `base_url`.
    pub fn new(
        base_url: Url,
        token: impl Into<Arc<str>>,
        tls_config: &TlsConfig,
        throws: bool,
        timeout: Option<Duration>,
    ) -> Result<Self, Error> {
        let mut client_builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent::user_agent());
        if let Some(timeout) = timeout {
            client_builder = client_builder.timeout(timeout);
        }
        let client_builder = tls_config.apply(client_builder)?;

        let client = client_builder.build().map_err(|e| {
            Error::configuration(format!("failed to create HTTP client: {}", e)).with_source(e)
        })?;

        tracing::debug!(
            url = %base_url,
            throws,
            ssl_verify = !tls_config.skip_verification,
            "created admin API transport"
        );

        Ok(Self {
            client,
            base_url,
            token: token.into(),
            throws,
        })
    }

    /// Returns the tenant base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the default `throws` setting.
    pub fn throws(&self) -> bool {
        self.throws
    }

    /// Resolves the final URL of a request, without the access token.
    pub fn resolve(&self, request: &AdminRequest) -> Result<Url, Error> {
        let mut url = match &request.target {
            Target::Url(url) => Url::parse(url)?,
            Target::Path(path) => self.base_url.join(path)?,
        };
        let path = format!("{}.json", url.path());
        url.set_path(&path);
        if !request.params.is_empty() {
            url.query_pairs_mut().extend_pairs(
                request
                    .params
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            );
        }
        Ok(url)
    }

    /// Sends a request.
    ///
    /// # Errors
    ///
    /// Returns an API error carrying status, reason and body for a non-success
    /// response when `throws` is in effect, and a transport error when the
    /// request cannot be sent at all.
    pub async fn send(&self, request: AdminRequest) -> Result<RawResponse, Error> {
        let throws = request.throws.unwrap_or(self.throws);
        let url = self.resolve(&request)?;

        tracing::debug!(
            method = %request.method,
            url = %url,
            params = ?request.params,
            headers = ?request.headers,
            body = ?request.body,
            "sending admin API request"
        );

        let mut authenticated = url.clone();
        authenticated
            .query_pairs_mut()
            .append_pair("access_token", &self.token);

        let mut builder = self
            .client
            .request(request.method.clone(), authenticated)
            .header(ACCEPT, HeaderValue::from_static("application/json"));
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        match &request.body {
            Some(Body::Json(body)) => builder = builder.json(body),
            Some(Body::Form(pairs)) => {
                let encoded = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                    .finish();
                builder = builder
                    .header(
                        CONTENT_TYPE,
                        HeaderValue::from_static("application/x-www-form-urlencoded"),
                    )
                    .body(encoded);
            },
            None => {},
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let response = RawResponse::read(response).await?;

        if response.is_success() {
            tracing::debug!(
                method = %request.method,
                url = %url,
                status = response.status_code(),
                "admin API response"
            );
        } else {
            tracing::error!(
                method = %request.method,
                url = %url,
                status = response.status_code(),
                body = %response.text(),
                "admin API request failed"
            );
            if throws {
                return Err(response.to_error());
            }
        }

        Ok(response)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn transport() -> RestTransport {
        RestTransport::new(
            Url::parse("https://tenant-admin.example.com/").unwrap(),
            "secret",
            &TlsConfig::default(),
            true,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_appends_json_and_params() {
        let request = AdminRequest::get("https://tenant-admin.example.com/admin/api/services")
            .param("page", 1)
            .param("per_page", 500);
        let url = transport().resolve(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "https://tenant-admin.example.com/admin/api/services.json?page=1&per_page=500"
        );
    }

    #[test]
    fn test_resolve_path_target() {
        let request = AdminRequest::path(Method::GET, "admin/api/account_plans");
        let url = transport().resolve(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "https://tenant-admin.example.com/admin/api/account_plans.json"
        );
    }

    #[test]
    fn test_resolve_keeps_existing_query_after_suffix() {
        let request =
            AdminRequest::get("https://tenant-admin.example.com/admin/api/services?x=1")
                .param("page", 2);
        let url = transport().resolve(&request).unwrap();
        assert_eq!(url.path(), "/admin/api/services.json");
        assert_eq!(
            url.as_str(),
            "https://tenant-admin.example.com/admin/api/services.json?x=1&page=2"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        assert!(!format!("{:?}", transport()).contains("secret"));
    }
}

// Wiremock-based async tests
#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod wiremock_tests {
    use super::*;
    use crate::ErrorKind;
    use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_transport(server: &MockServer, throws: bool) -> RestTransport {
        RestTransport::new(
            Url::parse(&format!("{}/", server.uri())).unwrap(),
            "test-token",
            &TlsConfig::default(),
            throws,
            Some(Duration::from_secs(5)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_send_adds_token_and_suffix() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/admin/api/services.json"))
            .and(query_param("access_token", "test-token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"services": []})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transport = create_test_transport(&server, true);
        let response = transport
            .send(AdminRequest::get(format!("{}/admin/api/services", server.uri())))
            .await
            .unwrap();
        assert_eq!(response.status_code(), 200);
    }

    #[tokio::test]
    async fn test_send_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/admin/api/services.json"))
            .and(body_json(serde_json::json!({"name": "echo"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(
                serde_json::json!({"service": {"id": 1, "name": "echo"}}),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let transport = create_test_transport(&server, true);
        let response = transport
            .send(
                AdminRequest::post(format!("{}/admin/api/services", server.uri()))
                    .json(serde_json::json!({"name": "echo"})),
            )
            .await
            .unwrap();
        assert_eq!(response.status_code(), 201);
    }

    #[tokio::test]
    async fn test_send_form_body_repeats_names() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/admin/api/users/5/permissions.json"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string(
                "allowed_sections%5B%5D=portal&allowed_sections%5B%5D=finance",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let transport = create_test_transport(&server, true);
        transport
            .send(
                AdminRequest::put(format!("{}/admin/api/users/5/permissions", server.uri()))
                    .form([("allowed_sections[]", "portal"), ("allowed_sections[]", "finance")]),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_send_throws_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/admin/api/services/3.json"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden by policy"))
            .mount(&server)
            .await;

        let transport = create_test_transport(&server, true);
        let err = transport
            .send(AdminRequest::delete(format!("{}/admin/api/services/3", server.uri())))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.body(), Some("forbidden by policy"));
    }

    #[tokio::test]
    async fn test_send_without_throws_returns_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/admin/api/services/3.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let transport = create_test_transport(&server, true);
        let response = transport
            .send(
                AdminRequest::get(format!("{}/admin/api/services/3", server.uri())).throws(false),
            )
            .await
            .unwrap();
        assert_eq!(response.status_code(), 404);

        let transport = create_test_transport(&server, false);
        let response = transport
            .send(AdminRequest::get(format!("{}/admin/api/services/3", server.uri())))
            .await
            .unwrap();
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_connection_error() {
        let transport = RestTransport::new(
            Url::parse("http://127.0.0.1:1/").unwrap(),
            "t",
            &TlsConfig::default(),
            true,
            Some(Duration::from_secs(2)),
        )
        .unwrap();
        let err = transport
            .send(AdminRequest::path(Method::GET, "admin/api/services"))
            .await
            .unwrap_err();
        assert!(err.is_retriable() || err.kind() == ErrorKind::Transport);
    }
}
