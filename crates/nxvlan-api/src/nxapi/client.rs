// NX-API HTTP client
//
// Wraps `reqwest::Client` with the `ins_api` envelope, HTTP basic auth and
// outcome classification. One POST per batch, no retries, no state kept
// between calls.

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::error::Error;
use crate::nxapi::models::{CommandBatch, CommandMode, ConfigDecodePolicy, DeviceResponse};
use crate::nxapi::normalize::{ConfigOutcome, evaluate_config_outcome};
use crate::transport::TransportConfig;

/// Longest slice of a reply body copied into log events.
const BODY_PREVIEW_LEN: usize = 256;

/// HTTP client for a single switch's NX-API endpoint.
pub struct NxApiClient {
    http: reqwest::Client,
    endpoint: Url,
    username: String,
    password: SecretString,
    decode_policy: ConfigDecodePolicy,
}

impl NxApiClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `endpoint` is the full API URL, e.g. `https://switch.example.net/ins`.
    pub fn new(
        endpoint: Url,
        username: String,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, endpoint, username, password))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        endpoint: Url,
        username: String,
        password: SecretString,
    ) -> Self {
        Self {
            http,
            endpoint,
            username,
            password,
            decode_policy: ConfigDecodePolicy::default(),
        }
    }

    /// Set how undecodable config replies are treated.
    pub fn with_decode_policy(mut self, policy: ConfigDecodePolicy) -> Self {
        self.decode_policy = policy;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn decode_policy(&self) -> ConfigDecodePolicy {
        self.decode_policy
    }

    /// Submit one batch and classify the exchange.
    ///
    /// - non-200 status: `Error::Http` with the body
    /// - connect/timeout/TLS failure: `Error::Network`
    /// - undecodable 200 reply: `Error::Decode` for show batches; for
    ///   config batches under `ConfigDecodePolicy::Lenient`, a response
    ///   with no outputs and the raw body kept
    pub async fn execute(&self, batch: &CommandBatch) -> Result<DeviceResponse, Error> {
        batch.validate()?;

        debug!(
            mode = %batch.mode(),
            commands = batch.len(),
            "POST {}",
            self.endpoint
        );

        let resp = self
            .http
            .post(self.endpoint.clone())
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .header(CONTENT_TYPE, "application/json")
            .json(&batch.envelope())
            .send()
            .await
            .map_err(|e| self.network_failure(e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.network_failure(e))?;

        if status != StatusCode::OK {
            Diagnostic::error(DiagnosticCode::HttpError, "device returned non-200 status")
                .with("endpoint", &self.endpoint)
                .with("status", status.as_u16())
                .with("body", preview(&body))
                .emit();
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        match DeviceResponse::from_json(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e)
                if batch.mode() == CommandMode::Config
                    && self.decode_policy == ConfigDecodePolicy::Lenient =>
            {
                Diagnostic::warning(
                    DiagnosticCode::UnverifiedOutcome,
                    "config reply could not be decoded; assuming success from HTTP 200",
                )
                .with("cause", e)
                .with("body", preview(&body))
                .emit();
                Ok(DeviceResponse::undecoded(body))
            }
            Err(e) => {
                Diagnostic::error(DiagnosticCode::DecodeError, "reply is not a valid ins_api envelope")
                    .with("mode", batch.mode())
                    .with("cause", &e)
                    .with("body", preview(&body))
                    .emit();
                Err(Error::Decode {
                    message: e.to_string(),
                    body,
                })
            }
        }
    }

    /// Run read-only commands.
    pub async fn show<I, S>(&self, commands: I) -> Result<DeviceResponse, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.execute(&CommandBatch::show(commands)).await
    }

    /// Run config commands and reduce the reply to one outcome.
    pub async fn configure<I, S>(&self, commands: I) -> Result<ConfigOutcome, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let resp = self.execute(&CommandBatch::config(commands)).await?;
        Ok(evaluate_config_outcome(&resp))
    }

    fn network_failure(&self, err: reqwest::Error) -> Error {
        Diagnostic::error(DiagnosticCode::NetworkError, "request to device failed")
            .with("endpoint", &self.endpoint)
            .with("timeout", err.is_timeout())
            .with("cause", &err)
            .emit();
        Error::Network(err)
    }
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(BODY_PREVIEW_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
