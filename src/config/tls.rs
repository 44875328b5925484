//! Certificate handling for the admin portal and for gateways.

use std::path::{Path, PathBuf};

use crate::Error;

/// Certificates presented to, and trusted from, the server.
///
/// The defaults trust the system roots and verify the server. On-premise
/// installations often sit behind a private CA, which `ca_cert_file` or
/// `ca_cert_pem` adds to the trust store; `skip_verification` is the
/// `ssl_verify = false` escape hatch for self-signed ones. A client
/// identity is only needed for gateways that demand mutual TLS.
///
/// ```rust
/// use threescale::TlsConfig;
///
/// let gateway_tls = TlsConfig::builder()
///     .ca_cert_file("certs/internal-ca.pem")
///     .client_cert_file("certs/app.pem")
///     .client_key_file("certs/app.key")
///     .build();
/// assert!(gateway_tls.has_client_identity());
/// ```
#[derive(Debug, Clone, Default, bon::Builder)]
pub struct TlsConfig {
    /// Extra trusted root, read from disk.
    #[builder(into)]
    pub ca_cert_file: Option<PathBuf>,

    /// Extra trusted root, inline PEM. Wins over `ca_cert_file`.
    #[builder(into)]
    pub ca_cert_pem: Option<String>,

    /// PEM certificate presented to the server.
    #[builder(into)]
    pub client_cert_file: Option<PathBuf>,

    /// PEM private key matching `client_cert_file`.
    #[builder(into)]
    pub client_key_file: Option<PathBuf>,

    /// Accept any server certificate.
    #[builder(default)]
    pub skip_verification: bool,
}

impl TlsConfig {
    /// Whether both halves of a client identity are set.
    pub fn has_client_identity(&self) -> bool {
        matches!(
            (&self.client_cert_file, &self.client_key_file),
            (Some(_), Some(_))
        )
    }

    /// Turns server verification on or off, leaving the rest untouched.
    #[must_use]
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.skip_verification = !verify;
        self
    }

    #[cfg(any(feature = "rustls", feature = "native-tls"))]
    pub(crate) fn apply(
        &self,
        builder: reqwest::ClientBuilder,
    ) -> Result<reqwest::ClientBuilder, Error> {
        let mut builder = builder.danger_accept_invalid_certs(self.skip_verification);

        let root = match (&self.ca_cert_pem, &self.ca_cert_file) {
            (Some(pem), _) => Some(pem.as_bytes().to_vec()),
            (None, Some(path)) => Some(read_pem(path, "CA certificate")?),
            (None, None) => None,
        };
        if let Some(pem) = root {
            let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                Error::configuration(format!("invalid CA certificate: {}", e)).with_source(e)
            })?;
            builder = builder.add_root_certificate(cert);
        }

        if let (Some(cert), Some(key)) = (&self.client_cert_file, &self.client_key_file) {
            let cert = read_pem(cert, "client certificate")?;
            let key = read_pem(key, "client key")?;
            builder = builder.identity(identity(&cert, &key)?);
        }

        Ok(builder)
    }

    #[cfg(not(any(feature = "rustls", feature = "native-tls")))]
    pub(crate) fn apply(
        &self,
        builder: reqwest::ClientBuilder,
    ) -> Result<reqwest::ClientBuilder, Error> {
        let customized = self.skip_verification
            || self.ca_cert_pem.is_some()
            || self.ca_cert_file.is_some()
            || self.has_client_identity();
        if customized {
            return Err(Error::configuration(
                "TLS settings need the `rustls` or `native-tls` feature",
            ));
        }
        Ok(builder)
    }
}

#[cfg_attr(not(any(feature = "rustls", feature = "native-tls")), allow(dead_code))]
fn read_pem(path: &Path, what: &str) -> Result<Vec<u8>, Error> {
    std::fs::read(path).map_err(|e| {
        Error::configuration(format!("cannot read {} {}: {}", what, path.display(), e))
            .with_source(e)
    })
}

#[cfg(feature = "rustls")]
fn identity(cert: &[u8], key: &[u8]) -> Result<reqwest::Identity, Error> {
    let mut pem = Vec::with_capacity(cert.len() + key.len() + 1);
    pem.extend_from_slice(cert);
    pem.push(b'\n');
    pem.extend_from_slice(key);
    reqwest::Identity::from_pem(&pem)
        .map_err(|e| Error::configuration(format!("invalid client identity: {}", e)).with_source(e))
}

#[cfg(all(feature = "native-tls", not(feature = "rustls")))]
fn identity(cert: &[u8], key: &[u8]) -> Result<reqwest::Identity, Error> {
    reqwest::Identity::from_pkcs8_pem(cert, key)
        .map_err(|e| Error::configuration(format!("invalid client identity: {}", e)).with_source(e))
}
