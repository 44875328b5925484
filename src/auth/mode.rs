//! Authentication modes of a service.

use std::fmt;

/// How applications of a service authenticate, from the service's
/// `backend_version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AuthMode {
    /// A single user key (`backend_version` `1`).
    UserKey,
    /// An application id plus key pair (`backend_version` `2`).
    AppIdKey,
    /// OpenID Connect (`backend_version` `oidc`). No factory is registered for
    /// it by default.
    Oidc,
    /// Any other mode, for factories registered at runtime.
    Custom(String),
}

impl AuthMode {
    /// Maps a `backend_version` value to a mode.
    pub fn from_backend_version(version: &str) -> Self {
        match version {
            "1" => AuthMode::UserKey,
            "2" => AuthMode::AppIdKey,
            "oidc" => AuthMode::Oidc,
            other => AuthMode::Custom(other.to_string()),
        }
    }

    /// The `backend_version` value of the mode.
    pub fn key(&self) -> &str {
        match self {
            AuthMode::UserKey => "1",
            AuthMode::AppIdKey => "2",
            AuthMode::Oidc => "oidc",
            AuthMode::Custom(key) => key,
        }
    }
}

impl From<&str> for AuthMode {
    fn from(version: &str) -> Self {
        Self::from_backend_version(version)
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("1", AuthMode::UserKey)]
    #[test_case("2", AuthMode::AppIdKey)]
    #[test_case("oidc", AuthMode::Oidc)]
    #[test_case("jwt", AuthMode::Custom("jwt".to_string()))]
    fn test_round_trip_key(raw: &str, mode: AuthMode) {
        assert_eq!(AuthMode::from_backend_version(raw), mode);
        assert_eq!(mode.key(), raw);
    }
}
