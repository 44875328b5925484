//! Environment-based client configuration.

use crate::Error;

/// Environment variable holding the provider (tenant) URL.
pub const PROVIDER_URL_VAR: &str = "THREESCALE_PROVIDER_URL";
/// Environment variable holding the provider access token.
pub const PROVIDER_TOKEN_VAR: &str = "THREESCALE_PROVIDER_TOKEN";
/// Environment variable holding the master URL.
pub const MASTER_URL_VAR: &str = "THREESCALE_MASTER_URL";
/// Environment variable holding the master access token.
pub const MASTER_TOKEN_VAR: &str = "THREESCALE_MASTER_TOKEN";
/// Environment variable toggling SSL verification (`false`/`0`/`no` disable it).
pub const SSL_VERIFY_VAR: &str = "THREESCALE_SSL_VERIFY";

/// Connection settings read from the environment.
#[derive(Clone, PartialEq, Eq)]
pub struct EnvConfig {
    /// Base URL of the tenant or master portal.
    pub url: String,
    /// Access token.
    pub token: String,
    /// Whether to verify TLS certificates.
    pub ssl_verify: bool,
}

impl std::fmt::Debug for EnvConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvConfig")
            .field("url", &self.url)
            .field("token", &"[REDACTED]")
            .field("ssl_verify", &self.ssl_verify)
            .finish()
    }
}

impl EnvConfig {
    /// Reads the provider settings.
    pub fn provider() -> Result<Self, Error> {
        Self::read(PROVIDER_URL_VAR, PROVIDER_TOKEN_VAR, |name| std::env::var(name).ok())
    }

    /// Reads the master settings.
    pub fn master() -> Result<Self, Error> {
        Self::read(MASTER_URL_VAR, MASTER_TOKEN_VAR, |name| std::env::var(name).ok())
    }

    pub(crate) fn read(
        url_var: &str,
        token_var: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, Error> {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| {
                    Error::configuration(format!("environment variable {} not set", name))
                })
        };
        let url = required(url_var)?;
        let token = required(token_var)?;
        let ssl_verify = lookup(SSL_VERIFY_VAR)
            .map(|v| parse_flag(&v))
            .unwrap_or(true);
        Ok(Self {
            url,
            token,
            ssl_verify,
        })
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "no" | "off"
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use test_case::test_case;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_reads_provider_vars() {
        let config = EnvConfig::read(
            PROVIDER_URL_VAR,
            PROVIDER_TOKEN_VAR,
            lookup(&[
                (PROVIDER_URL_VAR, "https://tenant-admin.example.com"),
                (PROVIDER_TOKEN_VAR, "secret"),
            ]),
        )
        .unwrap();
        assert_eq!(config.url, "https://tenant-admin.example.com");
        assert_eq!(config.token, "secret");
        assert!(config.ssl_verify);
        assert!(!format!("{:?}", config).contains("secret"));
    }

    #[test]
    fn test_missing_token_is_configuration_error() {
        let err = EnvConfig::read(
            MASTER_URL_VAR,
            MASTER_TOKEN_VAR,
            lookup(&[(MASTER_URL_VAR, "https://master.example.com")]),
        )
        .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
        assert!(err.message().contains(MASTER_TOKEN_VAR));
    }

    #[test_case("false", false)]
    #[test_case("0", false)]
    #[test_case("No", false)]
    #[test_case("true", true)]
    #[test_case("1", true)]
    fn test_ssl_verify_flag(value: &str, expected: bool) {
        let config = EnvConfig::read(
            PROVIDER_URL_VAR,
            PROVIDER_TOKEN_VAR,
            lookup(&[
                (PROVIDER_URL_VAR, "https://t.example.com"),
                (PROVIDER_TOKEN_VAR, "t"),
                (SSL_VERIFY_VAR, value),
            ]),
        )
        .unwrap();
        assert_eq!(config.ssl_verify, expected);
    }
}
