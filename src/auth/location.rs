//! Where credentials go on an outgoing request.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Where the gateway expects application credentials, as configured by the
/// proxy's `credentials_location`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialsLocation {
    /// HTTP Basic authentication (`Authorization` header).
    Authorization,
    /// One header per credential.
    Headers,
    /// One query parameter per credential.
    Query,
}

impl CredentialsLocation {
    /// The configuration value.
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialsLocation::Authorization => "authorization",
            CredentialsLocation::Headers => "headers",
            CredentialsLocation::Query => "query",
        }
    }
}

impl FromStr for CredentialsLocation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "authorization" => Ok(CredentialsLocation::Authorization),
            "headers" => Ok(CredentialsLocation::Headers),
            "query" => Ok(CredentialsLocation::Query),
            other => Err(Error::configuration(format!(
                "Unknown credentials location '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for CredentialsLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
