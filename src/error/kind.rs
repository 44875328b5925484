//! Coarse error categories.

/// What went wrong, coarsely.
///
/// Admin API failures are classified from their status code by
/// [`ErrorKind::from_http_status`]. The exact code is still on the
/// [`Error`](crate::Error), so match on the kind for control flow and read
/// [`Error::status`](crate::Error::status) when the number itself matters.
///
/// Only gateway-style hiccups are [retriable](ErrorKind::is_retriable):
/// `Unavailable`, `Timeout`, `RateLimited` and `Connection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// 401: the access token was rejected.
    #[error("unauthorized")]
    Unauthorized,

    /// 403: the token lacks the scope for this call, or the feature is not
    /// enabled on the tenant.
    #[error("forbidden")]
    Forbidden,

    /// 404. Objects created a moment ago can still answer this.
    #[error("not found")]
    NotFound,

    /// 400 and any 4xx without a more specific kind.
    #[error("invalid argument")]
    InvalidArgument,

    /// 409.
    #[error("conflict")]
    Conflict,

    /// 422 and 423: validation rejected the parameters, e.g. a duplicate
    /// system name or a plan still in use.
    #[error("unprocessable")]
    Unprocessable,

    /// 429.
    #[error("rate limited")]
    RateLimited,

    /// 500 and any 5xx without a more specific kind.
    #[error("internal error")]
    Internal,

    /// 502 or 503, typically a gateway still loading its configuration.
    #[error("service unavailable")]
    Unavailable,

    /// 504, or the client gave up waiting.
    #[error("timeout")]
    Timeout,

    /// The server could not be reached at all.
    #[error("connection error")]
    Connection,

    /// Any other failure inside the HTTP stack.
    #[error("transport error")]
    Transport,

    /// A response body that is not the JSON shape this crate expects.
    #[error("invalid response")]
    InvalidResponse,

    /// A request this crate refuses to build: unknown auth mode, unknown
    /// credentials location, bad URL, missing token.
    #[error("configuration error")]
    Configuration,

    /// A status outside 4xx and 5xx.
    #[error("unknown error")]
    Unknown,
}

impl ErrorKind {
    /// Whether another attempt may succeed without changing the request.
    ///
    /// ```rust
    /// use threescale::ErrorKind;
    ///
    /// assert!(ErrorKind::from_http_status(503).is_retriable());
    /// assert!(!ErrorKind::from_http_status(422).is_retriable());
    /// ```
    #[inline]
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable | Self::Timeout | Self::RateLimited | Self::Connection
        )
    }

    /// Classifies an HTTP status code.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            422 | 423 => Self::Unprocessable,
            429 => Self::RateLimited,
            502 | 503 => Self::Unavailable,
            504 => Self::Timeout,
            400..=499 => Self::InvalidArgument,
            500..=599 => Self::Internal,
            _ => Self::Unknown,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(401, ErrorKind::Unauthorized ; "bad token")]
    #[test_case(403, ErrorKind::Forbidden ; "missing scope")]
    #[test_case(404, ErrorKind::NotFound ; "missing object")]
    #[test_case(422, ErrorKind::Unprocessable ; "validation failure")]
    #[test_case(423, ErrorKind::Unprocessable ; "locked")]
    #[test_case(400, ErrorKind::InvalidArgument ; "bad request")]
    #[test_case(418, ErrorKind::InvalidArgument ; "other client error")]
    #[test_case(503, ErrorKind::Unavailable ; "gateway not ready")]
    #[test_case(504, ErrorKind::Timeout ; "gateway timeout")]
    #[test_case(507, ErrorKind::Internal ; "other server error")]
    #[test_case(302, ErrorKind::Unknown ; "redirect")]
    fn test_classifies_status(status: u16, expected: ErrorKind) {
        assert_eq!(ErrorKind::from_http_status(status), expected);
    }

    #[test]
    fn test_only_transient_kinds_retry() {
        let retriable: Vec<u16> = [401, 403, 404, 409, 422, 429, 500, 502, 503, 504]
            .into_iter()
            .filter(|s| ErrorKind::from_http_status(*s).is_retriable())
            .collect();
        assert_eq!(retriable, vec![429, 502, 503, 504]);
        assert!(ErrorKind::Connection.is_retriable());
        assert!(!ErrorKind::Configuration.is_retriable());
    }

    #[test]
    fn test_display_is_lowercase_phrase() {
        assert_eq!(ErrorKind::Unprocessable.to_string(), "unprocessable");
        assert_eq!(ErrorKind::Configuration.to_string(), "configuration error");
    }
}
