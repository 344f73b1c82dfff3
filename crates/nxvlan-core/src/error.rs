// ── Core error types ──
//
// User-facing errors from nxvlan-core. The `From<nxvlan_api::Error>` impl
// translates transport-layer failures into domain-appropriate variants so
// consumers never match on reqwest or serde errors.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to switch at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Switch request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Reply errors ─────────────────────────────────────────────────
    #[error("Switch returned HTTP {status}")]
    Http { status: u16, body: String },

    #[error("Unexpected reply from switch: {message}")]
    Decode { message: String },

    // ── Operation errors ─────────────────────────────────────────────
    /// A config batch was refused by the device. Commands before the
    /// failing one may already be applied.
    #[error("Switch rejected the change: {message}")]
    Rejected {
        message: String,
        command: Option<String>,
    },

    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("VLAN {identifier} not found")]
    VlanNotFound { identifier: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<nxvlan_api::Error> for CoreError {
    fn from(err: nxvlan_api::Error) -> Self {
        match err {
            nxvlan_api::Error::Network(ref e) if e.is_timeout() => {
                CoreError::Timeout { timeout_secs: 0 }
            }
            nxvlan_api::Error::Network(e) => CoreError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string),
                reason: e.to_string(),
            },
            nxvlan_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            nxvlan_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            nxvlan_api::Error::InvalidTimeout => CoreError::Config {
                message: "request timeout must be positive".into(),
            },
            nxvlan_api::Error::Http {
                status: status @ (401 | 403),
                ..
            } => CoreError::AuthenticationFailed {
                message: format!("switch refused credentials (HTTP {status})"),
            },
            nxvlan_api::Error::Http { status, body } => CoreError::Http { status, body },
            nxvlan_api::Error::Decode { message, body: _ } => CoreError::Decode { message },
            nxvlan_api::Error::InvalidBatch { reason } => CoreError::Validation {
                field: "command".into(),
                reason,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_authentication_failed() {
        let err = CoreError::from(nxvlan_api::Error::Http {
            status: 401,
            body: String::new(),
        });
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    }

    #[test]
    fn other_statuses_keep_status() {
        let err = CoreError::from(nxvlan_api::Error::Http {
            status: 500,
            body: "oops".into(),
        });
        assert!(matches!(err, CoreError::Http { status: 500, .. }));
    }

    #[test]
    fn invalid_batch_is_a_validation_error() {
        let err = CoreError::from(nxvlan_api::Error::InvalidBatch {
            reason: "command #1 is empty".into(),
        });
        assert_eq!(err.to_string(), "Invalid command: command #1 is empty");
    }
}
