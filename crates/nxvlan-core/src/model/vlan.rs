// ── VLAN domain types ──

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::CoreError;

/// An 802.1Q VLAN id in the range the switch accepts (1-4094).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct VlanId(u16);

impl VlanId {
    pub const MIN: u16 = 1;
    pub const MAX: u16 = 4094;

    pub fn new(id: u16) -> Result<Self, CoreError> {
        if (Self::MIN..=Self::MAX).contains(&id) {
            Ok(Self(id))
        } else {
            Err(CoreError::Validation {
                field: "vlan id".into(),
                reason: format!("{id} is outside {}-{}", Self::MIN, Self::MAX),
            })
        }
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for VlanId {
    type Error = CoreError;

    fn try_from(id: u16) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<VlanId> for u16 {
    fn from(id: VlanId) -> Self {
        id.0
    }
}

impl FromStr for VlanId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let id: u16 = trimmed.parse().map_err(|_| CoreError::Validation {
            field: "vlan id".into(),
            reason: format!("'{trimmed}' is not a number"),
        })?;
        Self::new(id)
    }
}

impl fmt::Display for VlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Switchport mode used when binding an interface to a VLAN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PortMode {
    #[default]
    Access,
    Trunk,
}

/// One VLAN as reported by the switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VlanRecord {
    pub(crate) id: VlanId,
    pub(crate) name: String,
    pub(crate) state: String,
    pub(crate) shut_state: String,
    pub(crate) ports: Vec<String>,
}

impl VlanRecord {
    pub fn id(&self) -> VlanId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Operational state, e.g. `active` or `suspend`.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Administrative state, e.g. `noshutdown` or `shutdown`.
    pub fn shut_state(&self) -> &str {
        &self.shut_state
    }

    /// Member interfaces, when the reply listed them.
    pub fn ports(&self) -> &[String] {
        &self.ports
    }

    /// The name NX-OS assigns when none was configured (`VLAN0010`).
    pub fn default_name(id: VlanId) -> String {
        format!("VLAN{:04}", id.get())
    }
}
