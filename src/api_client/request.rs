//! Requests against the proxied API.

use std::future::{Future, IntoFuture};
use std::pin::Pin;

use reqwest::Method;
use serde_json::Value;

use super::{ApiClient, ApiResponse};
use crate::Error;

/// A pending request; await it to send.
///
/// ```rust,no_run
/// # async fn example(api: threescale::ApiClient) -> threescale::Result<()> {
/// let response = api
///     .post("/anything")
///     .header("X-Trace", "1")
///     .query("debug", "true")
///     .json(serde_json::json!({"name": "widget"}))
///     .await?;
/// println!("{} after {} attempts", response.status(), response.attempts());
/// # Ok(())
/// # }
/// ```
#[must_use = "requests do nothing unless awaited"]
pub struct ApiRequest<'a> {
    client: &'a ApiClient,
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<Body>,
}

enum Body {
    Json(Value),
    Raw(Vec<u8>),
}

impl<'a> ApiRequest<'a> {
    pub(crate) fn new(client: &'a ApiClient, method: Method, path: String) -> Self {
        Self {
            client,
            method,
            path,
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Adds a query parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Adds a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets a JSON body.
    pub fn json(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(Body::Json(body.into()));
        self
    }

    /// Sets a raw body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(Body::Raw(body.into()));
        self
    }

    async fn execute(self) -> Result<ApiResponse, Error> {
        let mut request = self.client.prepare(self.method, &self.path).await?;
        for (name, value) in &self.query {
            request.append_query(name, value);
        }
        for (name, value) in self.headers {
            request.set_header(name, value);
        }
        match self.body {
            Some(Body::Json(value)) => {
                request.set_header("Content-Type", "application/json");
                request.set_body(serde_json::to_vec(&value)?);
            },
            Some(Body::Raw(bytes)) => request.set_body(bytes),
            None => {},
        }
        self.client.execute(request).await
    }
}

impl<'a> IntoFuture for ApiRequest<'a> {
    type Output = Result<ApiResponse, Error>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send + 'a>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.execute())
    }
}

impl std::fmt::Debug for ApiRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}
