// nxvlan-api: Async Rust client for the Cisco Nexus NX-API command envelope

pub mod diagnostic;
pub mod error;
pub mod nxapi;
pub mod transport;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use error::Error;
pub use nxapi::{
    COMMAND_SEPARATOR, CommandBatch, CommandMode, CommandOutput, ConfigDecodePolicy, ConfigOutcome, DeviceResponse,
    Normalized, NxApiClient, OneOrMany, VlanBriefRow,
};
pub use transport::{TlsMode, TransportConfig};
