//! Credential injection into outgoing requests.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::CredentialsLocation;
use crate::transport::PreparedRequest;

/// Resolved credentials plus where to put them.
///
/// For [`CredentialsLocation::Authorization`] the first credential value is
/// the Basic user name and the second, if any, the password; a single user
/// key is sent with an empty password.
///
/// ```rust
/// use threescale::auth::{ClientAuth, CredentialsLocation};
/// use threescale::transport::PreparedRequest;
///
/// let auth = ClientAuth::new(CredentialsLocation::Query, [("user_key", "abc")]);
/// let mut request = PreparedRequest::new(
///     reqwest::Method::GET,
///     "https://echo.example.com/get".parse().unwrap(),
/// );
/// auth.apply(&mut request);
/// assert_eq!(request.url().as_str(), "https://echo.example.com/get?user_key=abc");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ClientAuth {
    location: CredentialsLocation,
    credentials: Vec<(String, String)>,
}

impl ClientAuth {
    /// Creates a strategy from ordered credential pairs.
    pub fn new<I, K, V>(location: CredentialsLocation, credentials: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            location,
            credentials: credentials
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Where the credentials go.
    pub fn location(&self) -> CredentialsLocation {
        self.location
    }

    /// The credential pairs, in order.
    pub fn credentials(&self) -> &[(String, String)] {
        &self.credentials
    }

    /// Adds the credentials to a request.
    pub fn apply(&self, request: &mut PreparedRequest) {
        match self.location {
            CredentialsLocation::Authorization => {
                let mut values = self.credentials.iter().map(|(_, v)| v.as_str());
                let user = values.next().unwrap_or_default();
                let password = values.next().unwrap_or_default();
                let encoded = STANDARD.encode(format!("{}:{}", user, password));
                request.set_header("Authorization", format!("Basic {}", encoded));
            },
            CredentialsLocation::Headers => {
                for (name, value) in &self.credentials {
                    request.set_header(name.as_str(), value.as_str());
                }
            },
            CredentialsLocation::Query => {
                for (name, value) in &self.credentials {
                    request.append_query(name, value);
                }
            },
        }
    }
}

impl fmt::Debug for ClientAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.credentials.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("ClientAuth")
            .field("location", &self.location)
            .field("credentials", &names)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use reqwest::Method;

    use super::*;

    fn request() -> PreparedRequest {
        PreparedRequest::new(Method::GET, "https://echo.example.com/get".parse().unwrap())
    }

    fn header<'a>(request: &'a PreparedRequest, name: &str) -> Option<&'a str> {
        request
            .headers()
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_user_key_basic_has_empty_password() {
        let auth = ClientAuth::new(CredentialsLocation::Authorization, [("user_key", "abc")]);
        let mut req = request();
        auth.apply(&mut req);
        // "abc:" in base64
        assert_eq!(header(&req, "authorization"), Some("Basic YWJjOg=="));
        assert!(req.url().query().is_none());
    }

    #[test]
    fn test_app_id_key_basic() {
        let auth = ClientAuth::new(
            CredentialsLocation::Authorization,
            [("app_id", "id1"), ("app_key", "key1")],
        );
        let mut req = request();
        auth.apply(&mut req);
        assert_eq!(
            header(&req, "Authorization"),
            Some(format!("Basic {}", STANDARD.encode("id1:key1")).as_str())
        );
    }

    #[test]
    fn test_headers() {
        let auth = ClientAuth::new(
            CredentialsLocation::Headers,
            [("app_id", "id1"), ("app_key", "key1")],
        );
        let mut req = request();
        auth.apply(&mut req);
        assert_eq!(header(&req, "app_id"), Some("id1"));
        assert_eq!(header(&req, "app_key"), Some("key1"));
        assert!(req.url().query().is_none());
    }

    #[test]
    fn test_query() {
        let auth = ClientAuth::new(
            CredentialsLocation::Query,
            [("app_id", "id1"), ("app_key", "key 1")],
        );
        let mut req = request();
        auth.apply(&mut req);
        assert_eq!(req.url().query(), Some("app_id=id1&app_key=key+1"));
        assert!(header(&req, "authorization").is_none());
    }

    #[test]
    fn test_debug_hides_values() {
        let auth = ClientAuth::new(CredentialsLocation::Query, [("user_key", "secret")]);
        let debug = format!("{:?}", auth);
        assert!(debug.contains("user_key"));
        assert!(!debug.contains("secret"));
    }
}
