// ── Runtime connection configuration ──
//
// These types describe *how* to reach one switch. They carry credential
// data and connection tuning but never touch disk; the CLI builds a
// `DeviceConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use nxvlan_api::ConfigDecodePolicy;

use crate::error::CoreError;

/// Default NX-API endpoint path on the management interface.
pub const DEFAULT_ENDPOINT_PATH: &str = "/ins";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed lab switches).
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for talking to a single switch.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Full NX-API URL (e.g. `https://sbx-nxos-mgmt.cisco.com/ins`).
    pub endpoint: Url,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// How undecodable config replies are judged.
    pub decode_policy: ConfigDecodePolicy,
}

impl DeviceConfig {
    /// Config with the default TLS policy, timeout and decode policy.
    pub fn new(endpoint: Url, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            endpoint,
            username: username.into(),
            password,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            decode_policy: ConfigDecodePolicy::default(),
        }
    }
}

/// Build the endpoint URL from a host spec and API path.
///
/// Accepts a bare host (`10.0.0.5`, `switch:8443`) or a full URL; bare
/// hosts get `https://`. Any path already on the host spec is replaced.
pub fn endpoint_url(host: &str, path: &str) -> Result<Url, CoreError> {
    let host = host.trim().trim_end_matches('/');
    if host.is_empty() {
        return Err(CoreError::Config {
            message: "switch host is empty".into(),
        });
    }

    let with_scheme = if host.contains("://") {
        host.to_owned()
    } else {
        format!("https://{host}")
    };

    let mut url = Url::parse(&with_scheme).map_err(|e| CoreError::Config {
        message: format!("invalid switch host '{host}': {e}"),
    })?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(CoreError::Config {
            message: format!("invalid switch host '{host}': no host name"),
        });
    }

    let path = path.trim();
    if path.starts_with('/') {
        url.set_path(path);
    } else {
        url.set_path(&format!("/{path}"));
    }
    Ok(url)
}
