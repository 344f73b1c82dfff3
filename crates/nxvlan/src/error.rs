//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use nxvlan_config::ConfigError;
use nxvlan_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to switch at {url}")]
    #[diagnostic(
        code(nxvlan::connection_failed),
        help(
            "{reason}\n\
             Check that NX-API is enabled (`feature nxapi`) and reachable.\n\
             Self-signed certificate? Try: nxvlan auth test --insecure"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(nxvlan::timeout),
        help("Increase timeout with --timeout or check switch responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed")]
    #[diagnostic(
        code(nxvlan::auth_failed),
        help(
            "{message}\n\
             Verify the username and password for this switch.\n\
             Run: nxvlan config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No {what} configured for profile '{profile}'")]
    #[diagnostic(
        code(nxvlan::no_credentials),
        help(
            "Configure credentials with: nxvlan config init\n\
             Or set NXVLAN_USERNAME / NXVLAN_PASSWORD."
        )
    )]
    NoCredentials { profile: String, what: String },

    // ── Device ───────────────────────────────────────────────────────

    #[error("VLAN {identifier} not found")]
    #[diagnostic(
        code(nxvlan::not_found),
        help("Run: nxvlan vlans list to see configured VLANs")
    )]
    NotFound { identifier: String },

    #[error("Switch rejected the change: {message}")]
    #[diagnostic(
        code(nxvlan::rejected),
        help("Failing command: {command}\nCommands before it may already be applied.")
    )]
    Rejected { message: String, command: String },

    #[error("Unexpected reply from switch: {message}")]
    #[diagnostic(code(nxvlan::device_reply))]
    DeviceReply { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(nxvlan::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(nxvlan::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: nxvlan config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(nxvlan::no_config),
        help(
            "Create one with: nxvlan config init\n\
             Or pass --host, --username and --password.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(nxvlan::config))]
    Config(Box<figment::Error>),

    #[error("Configuration error: {message}")]
    #[diagnostic(code(nxvlan::config))]
    ConfigFile { message: String },

    #[error("Keyring error: {reason}")]
    #[diagnostic(
        code(nxvlan::keyring),
        help("Store the password in the profile or NXVLAN_PASSWORD instead.")
    )]
    Keyring { reason: String },

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(nxvlan::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Http { status, body } => CliError::DeviceReply {
                message: if body.trim().is_empty() {
                    format!("HTTP {status}")
                } else {
                    format!("HTTP {status}: {}", body.trim())
                },
            },

            CoreError::Decode { message } => CliError::DeviceReply { message },

            CoreError::Rejected { message, command } => CliError::Rejected {
                message,
                command: command.unwrap_or_else(|| "(unknown)".into()),
            },

            CoreError::Validation { field, reason } => CliError::Validation { field, reason },

            CoreError::VlanNotFound { identifier } => CliError::NotFound { identifier },

            CoreError::Config { message } => CliError::ConfigFile { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile, what } => CliError::NoCredentials {
                profile,
                what: what.into(),
            },
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Keyring(e) => CliError::Keyring {
                reason: e.to_string(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            ConfigError::Serialization(e) => CliError::ConfigFile {
                message: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let cases = [
            (
                CoreError::AuthenticationFailed {
                    message: "HTTP 401".into(),
                },
                exit_code::AUTH,
            ),
            (
                CoreError::VlanNotFound {
                    identifier: "10".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::Rejected {
                    message: "invalid mode".into(),
                    command: Some("exit".into()),
                },
                exit_code::REJECTED,
            ),
            (
                CoreError::ConnectionFailed {
                    url: "https://switch/ins".into(),
                    reason: "refused".into(),
                },
                exit_code::CONNECTION,
            ),
            (CoreError::Timeout { timeout_secs: 30 }, exit_code::TIMEOUT),
            (
                CoreError::Validation {
                    field: "vlan name".into(),
                    reason: "must not be empty".into(),
                },
                exit_code::USAGE,
            ),
            (
                CoreError::Http {
                    status: 500,
                    body: String::new(),
                },
                exit_code::GENERAL,
            ),
        ];
        for (core, code) in cases {
            assert_eq!(CliError::from(core).exit_code(), code);
        }
    }

    #[test]
    fn http_body_is_kept_in_message() {
        let err = CliError::from(CoreError::Http {
            status: 500,
            body: " Internal error ".into(),
        });
        assert_eq!(
            err.to_string(),
            "Unexpected reply from switch: HTTP 500: Internal error"
        );
    }
}
