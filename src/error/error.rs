//! The crate-wide error type.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use super::ErrorKind;

/// Failure of any operation in this crate.
///
/// An admin API rejection keeps the full response: status code, reason
/// phrase and body. Which code a rejection carries varies between platform
/// versions (deleting a plan in use has answered both 403 and 422), so
/// assert on [`status`](Error::status) or [`kind`](Error::kind) as loosely
/// as the situation needs.
///
/// ```rust
/// use threescale::{Error, ErrorKind};
///
/// let err = Error::api(404, "Not Found", r#"{"status":"Not found"}"#);
/// assert_eq!(err.kind(), ErrorKind::NotFound);
/// assert_eq!(err.status(), Some(404));
/// assert_eq!(
///     err.to_string(),
///     r#"not found: Response(404 Not Found): {"status":"Not found"}"#
/// );
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    response: Option<ApiFailure>,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

#[derive(Debug)]
struct ApiFailure {
    status: u16,
    reason: String,
    body: String,
}

impl Error {
    /// An error of `kind` with a free-form message.
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            response: None,
            source: None,
        }
    }

    /// An admin API rejection. The message reads
    /// `Response(<status> <reason>): <body>`.
    pub fn api(status: u16, reason: impl Into<String>, body: impl Into<String>) -> Self {
        let failure = ApiFailure {
            status,
            reason: reason.into(),
            body: body.into(),
        };
        let message = format!(
            "Response({} {}): {}",
            failure.status, failure.reason, failure.body
        );
        Self {
            kind: ErrorKind::from_http_status(status),
            message: message.into(),
            response: Some(failure),
            source: None,
        }
    }

    /// Something this crate will not send: unknown auth mode, bad URL and
    /// the like. Raised before any network traffic.
    pub fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// A caller-supplied value the admin API would reject anyway.
    pub fn invalid_argument(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// A body that did not have the expected shape.
    pub fn invalid_response(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidResponse, message)
    }

    /// Attaches the underlying cause.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Category for matching.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Human-readable description, without the kind prefix.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status of an admin API rejection.
    #[inline]
    pub fn status(&self) -> Option<u16> {
        self.response.as_ref().map(|r| r.status)
    }

    /// Reason phrase of an admin API rejection, e.g. `Unprocessable Entity`.
    pub fn reason(&self) -> Option<&str> {
        self.response.as_ref().map(|r| r.reason.as_str())
    }

    /// Raw body of an admin API rejection.
    pub fn body(&self) -> Option<&str> {
        self.response.as_ref().map(|r| r.body.as_str())
    }

    /// See [`ErrorKind::is_retriable`].
    #[inline]
    pub fn is_retriable(&self) -> bool {
        self.kind.is_retriable()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::configuration(format!("invalid URL: {}", err)).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::invalid_response(format!("JSON error: {}", err)).with_source(err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_keeps_response() {
        let body = r#"{"errors":{"system_name":["has already been taken"]}}"#;
        let err = Error::api(422, "Unprocessable Entity", body);
        assert_eq!(err.kind(), ErrorKind::Unprocessable);
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.reason(), Some("Unprocessable Entity"));
        assert_eq!(err.body(), Some(body));
        assert_eq!(
            err.message(),
            format!("Response(422 Unprocessable Entity): {body}")
        );
    }

    #[test]
    fn test_local_errors_have_no_status() {
        let err = Error::configuration("Unknown credentials for configuration oidc");
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.status().is_none());
        assert!(err.body().is_none());
        assert!(!err.is_retriable());
        assert_eq!(
            err.to_string(),
            "configuration error: Unknown credentials for configuration oidc"
        );
    }

    #[test]
    fn test_bad_url_is_configuration() {
        let err: Error = url::Url::parse("tenant-admin").unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_bad_json_is_invalid_response() {
        let err: Error = serde_json::from_str::<serde_json::Value>("<html>")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::InvalidResponse);
        assert!(err.message().starts_with("JSON error"));
    }
}
