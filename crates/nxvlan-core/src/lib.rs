// nxvlan-core: VLAN domain layer between nxvlan-api and the CLI.

pub mod command;
pub mod config;
pub mod convert;
pub mod diagnostics;
pub mod error;
pub mod lookup;
pub mod model;
pub mod switch;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::VlanCommand;
pub use config::{DeviceConfig, TlsVerification};
pub use diagnostics::{CollectingSink, DiagnosticSink, TracingSink};
pub use error::CoreError;
pub use model::{PortMode, VlanId, VlanRecord};
pub use switch::Switch;

pub use nxvlan_api::{ConfigDecodePolicy, ConfigOutcome, Diagnostic, DiagnosticCode, Severity};
