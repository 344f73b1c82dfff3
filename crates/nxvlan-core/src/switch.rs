// ── Switch facade ──
//
// One configured switch. Two layers over the same calls:
//
// - Result-returning methods (`fetch_vlans`, `query_vlan`, `execute`,
//   `check_authentication`) for callers that want typed failures.
// - The collaborator contract used by the CLI menu and exports
//   (`create_vlan` .. `test_authentication`): failures collapse into
//   `false` or an empty result, and a diagnostic goes to the sink.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};
use url::Url;

use nxvlan_api::nxapi::{evaluate_config_outcome, extract_show_body, parse_vlan_table};
use nxvlan_api::transport::{TlsMode, TransportConfig};
use nxvlan_api::{ConfigOutcome, Diagnostic, DiagnosticCode, NxApiClient};

use crate::command::VlanCommand;
use crate::config::{DeviceConfig, TlsVerification};
use crate::convert::vlan_records;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::CoreError;
use crate::lookup;
use crate::model::{PortMode, VlanId, VlanRecord};

const SHOW_VLAN_BRIEF: &str = "show vlan brief";
const SHOW_VERSION: &str = "show version";
const UNKNOWN_ERROR: &str = "Unknown error";

/// Handle to a single switch's NX-API endpoint.
pub struct Switch {
    client: NxApiClient,
    sink: Arc<dyn DiagnosticSink>,
    timeout: Duration,
}

impl Switch {
    /// Build the HTTP client for `config`. Nothing is sent until the
    /// first operation.
    pub fn new(config: DeviceConfig) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let client = NxApiClient::new(config.endpoint, config.username, config.password, &transport)?
            .with_decode_policy(config.decode_policy);

        Ok(Self {
            client,
            sink: Arc::new(TracingSink),
            timeout: config.timeout,
        })
    }

    /// Route diagnostics to `sink` instead of `tracing`.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn endpoint(&self) -> &Url {
        self.client.endpoint()
    }

    pub fn username(&self) -> &str {
        self.client.username()
    }

    // ── Result-returning operations ──────────────────────────────────

    /// All VLANs from `show vlan brief`, in device order.
    pub async fn fetch_vlans(&self) -> Result<Vec<VlanRecord>, CoreError> {
        self.show_vlan_table(SHOW_VLAN_BRIEF).await
    }

    /// Ask the device for one VLAN (`show vlan id N`).
    pub async fn query_vlan(&self, id: VlanId) -> Result<Option<VlanRecord>, CoreError> {
        let records = self.show_vlan_table(&format!("show vlan id {id}")).await?;
        Ok(records.into_iter().find(|r| r.id() == id))
    }

    /// Apply one change. A device rejection becomes `CoreError::Rejected`;
    /// earlier commands in the batch are not rolled back.
    pub async fn execute(&self, command: &VlanCommand) -> Result<ConfigOutcome, CoreError> {
        command.validate()?;
        let batch = command.to_batch();
        debug!(change = %command.describe(), input = %batch.input(), "submitting config batch");

        let resp = self
            .client
            .execute(&batch)
            .await
            .map_err(|e| self.classify(e))?;

        match evaluate_config_outcome(&resp) {
            ConfigOutcome::Rejected {
                command, message, ..
            } => Err(CoreError::Rejected { message, command }),
            outcome => {
                if let Some(diag) = outcome.diagnostic() {
                    self.sink.report(&diag);
                }
                info!(change = %command.describe(), "config batch applied");
                Ok(outcome)
            }
        }
    }

    /// Round-trip a harmless show command to prove the credentials work.
    pub async fn check_authentication(&self) -> Result<(), CoreError> {
        let resp = self
            .client
            .show([SHOW_VERSION])
            .await
            .map_err(|e| self.classify(e))?;
        if let Some((_, output)) = resp.first_failure() {
            return Err(rejected(output.msg.as_deref(), SHOW_VERSION));
        }
        debug!(user = self.username(), "credentials accepted");
        Ok(())
    }

    // ── Collaborator contract ────────────────────────────────────────

    pub async fn create_vlan(&self, id: u16, name: &str) -> bool {
        let result = match VlanId::new(id) {
            Ok(id) => {
                self.execute(&VlanCommand::Create {
                    id,
                    name: name.to_owned(),
                })
                .await
            }
            Err(e) => Err(e),
        };
        self.settle("create_vlan", result.map(|_| true), false)
    }

    pub async fn delete_vlan(&self, id: u16) -> bool {
        let result = match VlanId::new(id) {
            Ok(id) => self.execute(&VlanCommand::Delete { id }).await,
            Err(e) => Err(e),
        };
        self.settle("delete_vlan", result.map(|_| true), false)
    }

    pub async fn list_vlans(&self) -> Vec<VlanRecord> {
        let result = self.fetch_vlans().await;
        self.settle("list_vlans", result, Vec::new())
    }

    pub async fn count_vlans(&self) -> usize {
        self.list_vlans().await.len()
    }

    /// Lookup by id in normalized form: `10` and `"10"` are the same VLAN.
    pub async fn find_vlan_by_id(&self, id: impl Display) -> Option<VlanRecord> {
        let records = self.list_vlans().await;
        lookup::find_by_id(&records, id).cloned()
    }

    /// Case-insensitive substring match on the VLAN name.
    pub async fn find_vlans_by_name(&self, needle: &str) -> Vec<VlanRecord> {
        let records = self.list_vlans().await;
        lookup::find_by_name(&records, needle)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn assign_port(&self, vlan: u16, interface: &str, mode: PortMode) -> bool {
        let result = match VlanId::new(vlan) {
            Ok(vlan) => {
                self.execute(&VlanCommand::AssignPort {
                    vlan,
                    interface: interface.to_owned(),
                    mode,
                })
                .await
            }
            Err(e) => Err(e),
        };
        self.settle("assign_port", result.map(|_| true), false)
    }

    pub async fn test_authentication(&self) -> bool {
        let result = self.check_authentication().await.map(|()| true);
        self.settle("test_authentication", result, false)
    }

    // ── Internals ────────────────────────────────────────────────────

    async fn show_vlan_table(&self, command: &str) -> Result<Vec<VlanRecord>, CoreError> {
        let resp = self
            .client
            .show([command])
            .await
            .map_err(|e| self.classify(e))?;

        if let Some((_, output)) = resp.first_failure() {
            return Err(rejected(output.msg.as_deref(), command));
        }

        let Some(body) = extract_show_body(&resp) else {
            self.sink.report(
                &Diagnostic::warning(DiagnosticCode::ShapeError, "reply carried no command body")
                    .with("command", command),
            );
            return Ok(Vec::new());
        };

        let (records, diagnostics) = vlan_records(parse_vlan_table(body)).into_parts();
        for diag in &diagnostics {
            self.sink.report(&diag.clone().with("command", command));
        }
        debug!(command, vlans = records.len(), "VLAN table decoded");
        Ok(records)
    }

    /// Translate a transport error, filling in what only the facade knows.
    fn classify(&self, err: nxvlan_api::Error) -> CoreError {
        match CoreError::from(err) {
            CoreError::Timeout { .. } => CoreError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            },
            CoreError::ConnectionFailed { url, reason } if url.is_empty() => {
                CoreError::ConnectionFailed {
                    url: self.endpoint().to_string(),
                    reason,
                }
            }
            other => other,
        }
    }

    /// Fold a failure into `fallback`, reporting it to the sink.
    fn settle<T>(&self, operation: &str, result: Result<T, CoreError>, fallback: T) -> T {
        match result {
            Ok(value) => value,
            Err(err) => {
                self.sink
                    .report(&failure_diagnostic(&err).with("operation", operation));
                fallback
            }
        }
    }
}

fn build_transport(config: &DeviceConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

fn rejected(msg: Option<&str>, command: &str) -> CoreError {
    CoreError::Rejected {
        message: msg
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(UNKNOWN_ERROR)
            .to_owned(),
        command: Some(command.to_owned()),
    }
}

/// The diagnostic describing a failed operation.
///
/// Device rejections carry the device message verbatim so callers can
/// show it as the failure reason.
pub fn failure_diagnostic(err: &CoreError) -> Diagnostic {
    match err {
        CoreError::Rejected { message, command } => {
            let diag = Diagnostic::error(DiagnosticCode::DeviceError, message.clone());
            match command {
                Some(cmd) => diag.with("command", cmd),
                None => diag,
            }
        }
        CoreError::ConnectionFailed { url, .. } => {
            Diagnostic::error(DiagnosticCode::NetworkError, err.to_string()).with("endpoint", url)
        }
        CoreError::Timeout { timeout_secs } => {
            Diagnostic::error(DiagnosticCode::NetworkError, err.to_string())
                .with("timeout_secs", timeout_secs)
        }
        CoreError::AuthenticationFailed { .. } => {
            Diagnostic::error(DiagnosticCode::HttpError, err.to_string())
        }
        CoreError::Http { status, .. } => {
            Diagnostic::error(DiagnosticCode::HttpError, err.to_string()).with("status", status)
        }
        CoreError::Decode { .. } => Diagnostic::error(DiagnosticCode::DecodeError, err.to_string()),
        CoreError::Validation { .. }
        | CoreError::VlanNotFound { .. }
        | CoreError::Config { .. } => {
            Diagnostic::error(DiagnosticCode::InvalidRequest, err.to_string())
        }
    }
}
