//! Buffered HTTP responses.

use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

use crate::Error;

/// A fully buffered HTTP response.
///
/// Returned by the admin transport when `throws` is disabled and by the
/// [`ApiClient`](crate::ApiClient), which never turns a status into an error.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl RawResponse {
    pub(crate) fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub(crate) async fn read(response: reqwest::Response) -> Result<Self, Error> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(super::map_reqwest_error)?;
        Ok(Self::new(status, headers, body))
    }

    /// Returns the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the status code as a number.
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Returns the canonical reason phrase, or an empty string.
    pub fn reason(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the raw body.
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Returns the body decoded as UTF-8 (lossy).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.body).map_err(Error::from)
    }

    /// Converts a non-success response into an API error.
    pub fn error_for_status(self) -> Result<Self, Error> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(self.to_error())
        }
    }

    /// Builds the API error describing this response.
    pub fn to_error(&self) -> Error {
        Error::api(self.status_code(), self.reason(), self.text())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn response(status: u16, body: &'static str) -> RawResponse {
        RawResponse::new(
            StatusCode::from_u16(status).unwrap(),
            HeaderMap::new(),
            Bytes::from_static(body.as_bytes()),
        )
    }

    #[test]
    fn test_success_passthrough() {
        let res = response(200, r#"{"service":{"id":1}}"#);
        assert!(res.is_success());
        let value: serde_json::Value = res.json().unwrap();
        assert_eq!(value["service"]["id"], 1);
        assert!(res.error_for_status().is_ok());
    }

    #[test]
    fn test_error_for_status() {
        let err = response(404, "Not found").error_for_status().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.reason(), Some("Not Found"));
        assert_eq!(err.body(), Some("Not found"));
    }

    #[test]
    fn test_invalid_json() {
        let err = response(200, "<html>").json::<serde_json::Value>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidResponse);
    }
}
