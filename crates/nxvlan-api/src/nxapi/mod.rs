// NX-API client modules
//
// The `ins_api` envelope: request/reply models, the HTTP exchange, and the
// normalizer that hides the device's inconsistent nesting.

pub mod client;
pub mod models;
pub mod normalize;

pub use client::NxApiClient;
pub use models::{
    COMMAND_SEPARATOR, CommandBatch, CommandMode, CommandOutput, ConfigDecodePolicy,
    DeviceResponse, OneOrMany, SUCCESS_CODE,
};
pub use normalize::{
    ConfigOutcome, Normalized, VlanBriefRow, evaluate_config_outcome, extract_show_body,
    parse_vlan_table,
};
