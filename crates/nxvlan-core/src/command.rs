// ── VLAN commands ──
//
// State-changing operations, each rendered to one config batch.

use nxvlan_api::{COMMAND_SEPARATOR, CommandBatch};
use serde::Serialize;

use crate::error::CoreError;
use crate::model::{PortMode, VlanId};

/// A config change to apply on the switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum VlanCommand {
    Create {
        id: VlanId,
        name: String,
    },
    Delete {
        id: VlanId,
    },
    AssignPort {
        vlan: VlanId,
        interface: String,
        mode: PortMode,
    },
}

impl VlanCommand {
    /// Check free-text arguments before they are spliced into commands.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            Self::Create { name, .. } => check_argument("vlan name", name),
            Self::Delete { .. } => Ok(()),
            Self::AssignPort { interface, .. } => check_argument("interface", interface),
        }
    }

    /// Render the device command sequence.
    pub fn to_batch(&self) -> CommandBatch {
        match self {
            Self::Create { id, name } => {
                CommandBatch::config([format!("vlan {id}"), format!("name {}", name.trim()), "exit".into()])
            }
            Self::Delete { id } => CommandBatch::config([format!("no vlan {id}")]),
            Self::AssignPort {
                vlan,
                interface,
                mode,
            } => {
                let membership = match mode {
                    PortMode::Access => format!("switchport access vlan {vlan}"),
                    PortMode::Trunk => format!("switchport trunk allowed vlan add {vlan}"),
                };
                CommandBatch::config([
                    format!("interface {}", interface.trim()),
                    format!("switchport mode {mode}"),
                    membership,
                ])
            }
        }
    }

    /// Short label for logs and confirmation prompts.
    pub fn describe(&self) -> String {
        match self {
            Self::Create { id, name } => format!("create VLAN {id} ({name})"),
            Self::Delete { id } => format!("delete VLAN {id}"),
            Self::AssignPort {
                vlan,
                interface,
                mode,
            } => format!("assign {interface} to VLAN {vlan} as {mode}"),
        }
    }
}

fn check_argument(field: &str, value: &str) -> Result<(), CoreError> {
    let invalid = |reason: &str| CoreError::Validation {
        field: field.into(),
        reason: reason.into(),
    };
    if value.trim().is_empty() {
        return Err(invalid("must not be empty"));
    }
    if value.contains(COMMAND_SEPARATOR) || value.contains(['\n', '\r']) {
        return Err(invalid("must not contain ';' or line breaks"));
    }
    Ok(())
}
