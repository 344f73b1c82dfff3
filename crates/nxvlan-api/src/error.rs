use thiserror::Error;

/// Top-level error type for the `nxvlan-api` crate.
///
/// Classifies every way an envelope exchange can fail before the reply
/// reaches the normalizer. Device-reported failures inside a well-formed
/// reply are not errors at this layer; see [`crate::ConfigOutcome`].
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// Network-level failure (connection refused, DNS, timeout, TLS handshake).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Endpoint URL could not be parsed or joined.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration could not be applied to the HTTP client.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Request timeout was zero.
    #[error("Request timeout must be positive")]
    InvalidTimeout,

    // ── HTTP ────────────────────────────────────────────────────────
    /// The device answered with a non-200 status.
    #[error("HTTP {status} from device")]
    Http { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// Reply body was not the JSON envelope we expected, with the raw body for debugging.
    #[error("Decode error: {message}")]
    Decode { message: String, body: String },

    // ── Request ─────────────────────────────────────────────────────
    /// The batch was rejected before anything was sent.
    #[error("Invalid command batch: {reason}")]
    InvalidBatch { reason: String },
}

impl Error {
    /// Returns `true` for failures a caller might reasonably retry.
    ///
    /// The client itself never retries.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }

    /// Returns `true` if this is a request timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Network(e) if e.is_timeout())
    }

    /// Returns `true` if the device refused the configured credentials.
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self, Self::Http { status: 401 | 403, .. })
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_rejection_is_recognised_from_status() {
        let err = Error::Http {
            status: 401,
            body: String::new(),
        };
        assert!(err.is_auth_rejected());
        assert!(!err.is_transient());
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn gateway_errors_are_transient() {
        let err = Error::Http {
            status: 503,
            body: "busy".into(),
        };
        assert!(err.is_transient());
        assert!(!err.is_auth_rejected());
    }

    #[test]
    fn decode_error_keeps_message_in_display() {
        let err = Error::Decode {
            message: "expected value at line 1 column 1".into(),
            body: "<html>".into(),
        };
        assert_eq!(
            err.to_string(),
            "Decode error: expected value at line 1 column 1"
        );
    }
}
