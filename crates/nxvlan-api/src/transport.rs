// HTTP transport for NX-API endpoints
//
// Builds the `reqwest::Client` a switch is reached through: certificate
// trust, request and connect deadlines, JSON accept header. Credentials
// are not part of the transport; the envelope client sends basic auth on
// every POST since NX-API keeps no session between calls.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Certificate, Client, ClientBuilder};

use crate::error::Error;

const USER_AGENT: &str = concat!("nxvlan/", env!("CARGO_PKG_VERSION"));

/// Upper bound on the TCP + TLS handshake, independent of the request timeout.
pub const CONNECT_TIMEOUT_CAP: Duration = Duration::from_secs(10);

/// How the switch's management certificate is trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Trust the PEM bundle at this path in addition to the system store.
    CustomCa(PathBuf),
    /// Accept any certificate (lab and sandbox switches ship self-signed ones).
    DangerAcceptInvalid,
}

impl TlsMode {
    fn configure(&self, builder: ClientBuilder) -> Result<ClientBuilder, Error> {
        Ok(match self {
            Self::System => builder,
            Self::CustomCa(path) => builder.add_root_certificate(load_ca(path)?),
            Self::DangerAcceptInvalid => builder.danger_accept_invalid_certs(true),
        })
    }
}

fn load_ca(path: &Path) -> Result<Certificate, Error> {
    let pem = std::fs::read(path)
        .map_err(|e| Error::Tls(format!("failed to read CA cert {}: {e}", path.display())))?;
    Certificate::from_pem(&pem).map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))
}

/// Transport settings for one switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Deadline for a whole exchange, connect through body.
    pub timeout: Duration,
}

impl TransportConfig {
    /// Connect deadline: the request timeout, capped at [`CONNECT_TIMEOUT_CAP`].
    pub fn connect_timeout(&self) -> Duration {
        self.timeout.min(CONNECT_TIMEOUT_CAP)
    }

    /// Build the HTTP client. A zero timeout is refused.
    pub fn build_client(&self) -> Result<Client, Error> {
        if self.timeout.is_zero() {
            return Err(Error::InvalidTimeout);
        }

        let builder = Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout())
            .user_agent(USER_AGENT)
            .default_headers(json_headers());

        self.tls
            .configure(builder)?
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

/// Headers sent with every request.
fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn transport(tls: TlsMode, secs: u64) -> TransportConfig {
        TransportConfig {
            tls,
            timeout: Duration::from_secs(secs),
        }
    }

    #[test]
    fn connect_deadline_is_capped() {
        assert_eq!(transport(TlsMode::System, 3).connect_timeout(), Duration::from_secs(3));
        assert_eq!(transport(TlsMode::System, 120).connect_timeout(), CONNECT_TIMEOUT_CAP);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let cfg = transport(TlsMode::System, 0);
        assert!(matches!(cfg.build_client(), Err(Error::InvalidTimeout)));
    }

    #[test]
    fn lab_and_system_modes_build() {
        assert!(transport(TlsMode::System, 5).build_client().is_ok());
        assert!(transport(TlsMode::DangerAcceptInvalid, 5).build_client().is_ok());
    }

    #[test]
    fn missing_ca_file_is_a_tls_error() {
        let cfg = transport(TlsMode::CustomCa("/nonexistent/ca.pem".into()), 5);
        let err = cfg.build_client().unwrap_err();
        assert!(matches!(err, Error::Tls(msg) if msg.contains("/nonexistent/ca.pem")));
    }
}
