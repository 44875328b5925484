//! Fully resolved outgoing requests and their curl rendering.

use std::fmt;

use reqwest::Method;
use url::Url;

/// A request whose URL, headers and body are final.
///
/// The [`ApiClient`](crate::ApiClient) builds one per call, lets the
/// authentication strategy inject credentials into it, and logs it as a curl
/// command line before sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    method: Method,
    url: Url,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl PreparedRequest {
    /// Creates a request without headers or body.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the URL including the query string.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the headers in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns the body bytes, if any.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Appends a header. An existing header with the same name is replaced.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }

    /// Appends a query parameter.
    pub fn append_query(&mut self, name: &str, value: &str) {
        self.url.query_pairs_mut().append_pair(name, value);
    }

    /// Sets the raw body.
    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.body = Some(body.into());
    }

    /// Renders the request as an equivalent curl command line.
    ///
    /// ```rust
    /// use threescale::transport::PreparedRequest;
    ///
    /// let mut request = PreparedRequest::new(
    ///     reqwest::Method::POST,
    ///     "http://example.invalid/".parse().unwrap(),
    /// );
    /// request.set_header("X-Header", "this");
    /// request.set_body("key=value");
    /// assert_eq!(
    ///     request.to_curl(),
    ///     "curl -X POST -H 'X-Header: this' -d key=value http://example.invalid/"
    /// );
    /// ```
    pub fn to_curl(&self) -> String {
        let mut parts = vec!["curl".to_string(), "-X".to_string(), self.method.to_string()];
        for (name, value) in &self.headers {
            parts.push(format!("-H '{}: {}'", name, value));
        }
        if let Some(body) = &self.body {
            parts.push(format!("-d {}", String::from_utf8_lossy(body)));
        }
        parts.push(self.url.to_string());
        parts.join(" ")
    }

    /// Converts into a reqwest request builder on `client`.
    pub(crate) fn to_reqwest(&self, client: &reqwest::Client) -> reqwest::RequestBuilder {
        let mut builder = client.request(self.method.clone(), self.url.clone());
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &self.body {
            builder = builder.body(body.clone());
        }
        builder
    }
}

impl fmt::Display for PreparedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_curl())
    }
}

/// Renders a request as a curl command line.
pub fn request_to_curl(request: &PreparedRequest) -> String {
    request.to_curl()
}
